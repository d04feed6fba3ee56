// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tokio::sync::{mpsc, oneshot};

use crate::Application;

/// Identifies one registered [`EventLoop`] inside an [`Application`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct EventLoopId(pub u64);

/// Completes when the [`Application`] resumes a paused loop. If the application drops the
/// paused handle without calling resume, this completes with an error, which a loop
/// should treat the same way.
pub type ResumeReceiver = oneshot::Receiver<()>;

/// Sent to every registered [`EventLoop`] by [`Application::pause()`]. The caller is
/// blocked until [`PauseRequest::acknowledge()`] is called.
#[derive(Debug)]
pub struct PauseRequest {
    ack_sender: oneshot::Sender<()>,
    resume_receiver: ResumeReceiver,
}

impl PauseRequest {
    pub(crate) fn new() -> (Self, oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (ack_sender, ack_receiver) = oneshot::channel();
        let (resume_sender, resume_receiver) = oneshot::channel();
        (
            Self {
                ack_sender,
                resume_receiver,
            },
            ack_receiver,
            resume_sender,
        )
    }

    /// Reports that the loop has reached a safe state. Wait on the returned receiver to
    /// find out when to continue.
    #[must_use]
    pub fn acknowledge(self) -> ResumeReceiver {
        let _ = self.ack_sender.send(());
        self.resume_receiver
    }
}

/// Sent to every registered [`EventLoop`] once termination begins. Acknowledging it is
/// the last thing a loop does.
#[derive(Debug)]
pub struct TerminateRequest {
    ack_sender: oneshot::Sender<()>,
}

impl TerminateRequest {
    pub(crate) fn new() -> (Self, oneshot::Receiver<()>) {
        let (ack_sender, ack_receiver) = oneshot::channel();
        (Self { ack_sender }, ack_receiver)
    }

    pub fn acknowledge(self) { let _ = self.ack_sender.send(()); }
}

/// The sending halves kept by the [`Application`] for one registered loop.
#[derive(Debug)]
pub(crate) struct LifecycleSenders {
    pub pause_sender: mpsc::Sender<PauseRequest>,
    pub terminate_sender: mpsc::Sender<TerminateRequest>,
}

/// The receiving halves of the lifecycle channels for a single loop. Obtain one from
/// [`Application::new_event_loop()`]. Dropping it (or calling [`EventLoop::delete()`])
/// unregisters the loop, so the application stops waiting for it.
#[derive(Debug)]
pub struct EventLoop {
    pub id: EventLoopId,
    pub pause_receiver: mpsc::Receiver<PauseRequest>,
    pub terminate_receiver: mpsc::Receiver<TerminateRequest>,
    app: Application,
}

impl EventLoop {
    pub(crate) fn new(
        id: EventLoopId,
        app: Application,
    ) -> (Self, LifecycleSenders) {
        // Capacity 1: a request is a rendezvous, the sender waits for the ack anyway.
        let (pause_sender, pause_receiver) = mpsc::channel(1);
        let (terminate_sender, terminate_receiver) = mpsc::channel(1);
        (
            Self {
                id,
                pause_receiver,
                terminate_receiver,
                app,
            },
            LifecycleSenders {
                pause_sender,
                terminate_sender,
            },
        )
    }

    #[must_use]
    pub fn app(&self) -> &Application { &self.app }

    /// Unregister this loop from its application.
    pub fn delete(self) { drop(self); }
}

impl Drop for EventLoop {
    fn drop(&mut self) { self.app.unregister_event_loop(self.id); }
}

/// Every loop the application currently drives, in registration order.
#[derive(Debug, Default)]
pub(crate) struct EventLoopRegistry {
    next_id: u64,
    entries: Vec<(EventLoopId, LifecycleSenders)>,
    /// Set once termination has drained every loop. Loops created after that point are
    /// told to terminate straight away.
    pub is_closed: bool,
}

impl EventLoopRegistry {
    pub fn next_id(&mut self) -> EventLoopId {
        self.next_id += 1;
        EventLoopId(self.next_id)
    }

    pub fn register(&mut self, id: EventLoopId, senders: LifecycleSenders) {
        self.entries.push((id, senders));
    }

    pub fn unregister(&mut self, id: EventLoopId) {
        self.entries.retain(|(entry_id, _)| *entry_id != id);
    }

    pub fn pause_senders(&self) -> Vec<mpsc::Sender<PauseRequest>> {
        self.entries
            .iter()
            .map(|(_, senders)| senders.pause_sender.clone())
            .collect()
    }

    /// Removes every loop, handing back the channels used to terminate them.
    pub fn drain_terminate_senders(&mut self) -> Vec<mpsc::Sender<TerminateRequest>> {
        self.entries
            .drain(..)
            .map(|(_, senders)| senders.terminate_sender)
            .collect()
    }

    pub fn len(&self) -> usize { self.entries.len() }
}
