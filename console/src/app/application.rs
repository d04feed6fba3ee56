// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter},
          sync::{Arc,
                 atomic::{AtomicBool, Ordering}}};

use tokio::{runtime::Handle, sync::{oneshot, watch}};

use super::{EventLoop, EventLoopId, EventLoopRegistry, PauseRequest, SharedMessageOutput,
            StdoutMessageOutput, TerminateRequest};
use crate::{OutputDevice, StdMutex};

/// Shared, read only view of "has termination begun". Hand this to code that must not
/// hold on to the whole [`Application`], such as a [`crate::MessageOutput`] registered on
/// it.
#[derive(Debug, Clone, Default)]
pub struct TerminationFlag(Arc<AtomicBool>);

impl TerminationFlag {
    #[must_use]
    pub fn is_set(&self) -> bool { self.0.load(Ordering::SeqCst) }

    /// Returns `true` only for the call that flipped the flag.
    pub(crate) fn try_set(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

/// The owning application of the console. Cheap to clone, every clone refers to the same
/// instance.
///
/// # Lifecycle
///
/// 1. Event loops register with [`Application::new_event_loop()`].
/// 2. [`Application::pause()`] asks every registered loop to reach a safe state and waits
///    for each acknowledgment. [`PausedApplication::resume()`] lets them continue.
/// 3. [`Application::request_exit()`] starts termination in the background: every loop
///    is sent a [`TerminateRequest`] in turn and its acknowledgment awaited. Once all of
///    them are done, [`Application::await_termination()`] completes.
///
/// Termination wins over everything else. After it begins, pausing is a no-op and new
/// event loops are told to terminate as soon as they are created.
#[derive(Clone)]
pub struct Application {
    inner: Arc<ApplicationInner>,
}

struct ApplicationInner {
    verbose: bool,
    termination_flag: TerminationFlag,
    terminated_sender: watch::Sender<bool>,
    event_loops: StdMutex<EventLoopRegistry>,
    message_output: StdMutex<SharedMessageOutput>,
    runtime_handle: Handle,
}

impl Debug for Application {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("verbose", &self.inner.verbose)
            .field("termination_in_progress", &self.termination_in_progress())
            .field("has_terminated", &self.has_terminated())
            .finish_non_exhaustive()
    }
}

impl Application {
    /// Messages go to stdout until something else is registered with
    /// [`Application::set_message_output()`].
    ///
    /// # Panics
    ///
    /// If called outside of a tokio runtime. Termination runs as a task on that runtime.
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        let (terminated_sender, _) = watch::channel(false);
        let default_output: SharedMessageOutput =
            Arc::new(StdoutMessageOutput::new(OutputDevice::new_stdout()));
        Self {
            inner: Arc::new(ApplicationInner {
                verbose,
                termination_flag: TerminationFlag::default(),
                terminated_sender,
                event_loops: StdMutex::new(EventLoopRegistry::default()),
                message_output: StdMutex::new(default_output),
                runtime_handle: Handle::current(),
            }),
        }
    }

    #[must_use]
    pub fn verbose(&self) -> bool { self.inner.verbose }

    #[must_use]
    pub fn termination_in_progress(&self) -> bool {
        self.inner.termination_flag.is_set()
    }

    #[must_use]
    pub fn termination_flag(&self) -> TerminationFlag {
        self.inner.termination_flag.clone()
    }

    /// `true` once every event loop has acknowledged termination.
    #[must_use]
    pub fn has_terminated(&self) -> bool { *self.inner.terminated_sender.borrow() }

    /// Completes once every event loop has acknowledged termination.
    pub async fn await_termination(&self) {
        let mut terminated_receiver = self.inner.terminated_sender.subscribe();
        let _ = terminated_receiver.wait_for(|it| *it).await;
    }

    /// Begins termination, without waiting for it. Calling this more than once is
    /// harmless. Safe to call from any thread, including the blocking ones.
    pub fn request_exit(&self) {
        if !self.inner.termination_flag.try_set() {
            return;
        }
        tracing::debug!(message = "application: exit requested");
        let inner = self.inner.clone();
        self.inner
            .runtime_handle
            .spawn(terminate_event_loops(inner));
    }

    /// Registers a new event loop.
    ///
    /// # Panics
    ///
    /// If the registry lock is poisoned.
    #[must_use]
    pub fn new_event_loop(&self) -> EventLoop {
        let mut registry = self.inner.event_loops.lock().unwrap();
        let id = registry.next_id();
        let (event_loop, senders) = EventLoop::new(id, self.clone());
        if registry.is_closed {
            // Too late to run, tell it so right away.
            let (request, _ack_receiver) = TerminateRequest::new();
            let _ = senders.terminate_sender.try_send(request);
        } else {
            registry.register(id, senders);
        }
        event_loop
    }

    pub(crate) fn unregister_event_loop(&self, id: EventLoopId) {
        if let Ok(mut registry) = self.inner.event_loops.lock() {
            registry.unregister(id);
        }
    }

    /// # Panics
    ///
    /// If the registry lock is poisoned.
    #[must_use]
    pub fn event_loop_count(&self) -> usize {
        self.inner.event_loops.lock().unwrap().len()
    }

    /// Asks every registered event loop to pause, one at a time, and waits until each has
    /// acknowledged. Loops that terminate or go away instead are skipped. Must not be
    /// called from inside one of the loops being paused.
    ///
    /// # Panics
    ///
    /// If the registry lock is poisoned.
    pub async fn pause(&self) -> PausedApplication {
        let mut resume_senders = vec![];

        if self.termination_in_progress() {
            return PausedApplication { resume_senders };
        }

        let pause_senders = self.inner.event_loops.lock().unwrap().pause_senders();
        for pause_sender in pause_senders {
            let (request, ack_receiver, resume_sender) = PauseRequest::new();
            if pause_sender.send(request).await.is_err() {
                continue;
            }
            if ack_receiver.await.is_ok() {
                resume_senders.push(resume_sender);
            }
        }

        tracing::debug!(
            message = "application: paused",
            paused_loop_count = resume_senders.len()
        );
        PausedApplication { resume_senders }
    }

    /// Registers the sink that [`Application::print_msg()`] writes to, and returns the
    /// one it replaces.
    ///
    /// # Panics
    ///
    /// If the message output lock is poisoned.
    pub fn set_message_output(&self, output: SharedMessageOutput) -> SharedMessageOutput {
        let mut current = self.inner.message_output.lock().unwrap();
        std::mem::replace(&mut *current, output)
    }

    /// Prints `text` through the registered sink. The sink lock is released before
    /// printing, so a sink may itself call back into the application.
    ///
    /// # Panics
    ///
    /// If the message output lock is poisoned.
    pub fn print_msg(&self, text: &str) {
        let output = self.inner.message_output.lock().unwrap().clone();
        output.print_msg(text);
    }
}

/// Sends a [`TerminateRequest`] to every loop and waits for each acknowledgment. Loops
/// registered while this runs are picked up by the next pass.
async fn terminate_event_loops(inner: Arc<ApplicationInner>) {
    loop {
        let terminate_senders = {
            let Ok(mut registry) = inner.event_loops.lock() else {
                break;
            };
            let drained = registry.drain_terminate_senders();
            if drained.is_empty() {
                registry.is_closed = true;
                break;
            }
            drained
        };

        for terminate_sender in terminate_senders {
            let (request, ack_receiver) = TerminateRequest::new();
            if terminate_sender.send(request).await.is_ok() {
                let _ = ack_receiver.await;
            }
        }
    }

    tracing::debug!(message = "application: terminated");
    inner.terminated_sender.send_replace(true);
}

/// Returned by [`Application::pause()`]. The paused loops continue when this is resumed,
/// or dropped.
#[derive(Debug)]
pub struct PausedApplication {
    resume_senders: Vec<oneshot::Sender<()>>,
}

impl PausedApplication {
    /// How many loops acknowledged the pause.
    #[must_use]
    pub fn paused_loop_count(&self) -> usize { self.resume_senders.len() }

    pub fn resume(self) {
        for resume_sender in self.resume_senders {
            let _ = resume_sender.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::MessageOutput;

    #[derive(Default)]
    struct RecordingOutput {
        lines: StdMutex<Vec<String>>,
    }

    impl MessageOutput for RecordingOutput {
        fn print_msg(&self, text: &str) {
            self.lines.lock().unwrap().push(text.to_string());
        }
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_request_exit_terminates_every_loop() {
        let app = Application::new(false);
        let mut first = app.new_event_loop();
        let mut second = app.new_event_loop();

        app.request_exit();
        assert!(app.termination_in_progress());
        assert!(!app.has_terminated());

        let request = first.terminate_receiver.recv().await.unwrap();
        request.acknowledge();
        let request = second.terminate_receiver.recv().await.unwrap();
        request.acknowledge();

        app.await_termination().await;
        assert!(app.has_terminated());
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_request_exit_twice_is_harmless() {
        let app = Application::new(false);
        app.request_exit();
        app.request_exit();
        tokio::time::timeout(Duration::from_secs(1), app.await_termination())
            .await
            .unwrap();
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_event_loop_created_after_termination_is_told_to_terminate() {
        let app = Application::new(false);
        app.request_exit();
        app.await_termination().await;

        let mut late = app.new_event_loop();
        assert!(late.terminate_receiver.recv().await.is_some());
        assert_eq!(app.event_loop_count(), 0);
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_pause_waits_for_ack_then_resume() {
        let app = Application::new(false);
        let mut event_loop = app.new_event_loop();

        let loop_task = tokio::spawn(async move {
            let request = event_loop.pause_receiver.recv().await.unwrap();
            let resume_receiver = request.acknowledge();
            resume_receiver.await.is_ok()
        });

        let paused = app.pause().await;
        assert_eq!(paused.paused_loop_count(), 1);
        paused.resume();

        assert!(loop_task.await.unwrap());
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_pause_after_termination_is_a_no_op() {
        let app = Application::new(false);
        let _event_loop = app.new_event_loop();
        app.request_exit();

        let paused = app.pause().await;
        assert_eq!(paused.paused_loop_count(), 0);
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_set_message_output_returns_previous() {
        let app = Application::new(false);
        let first = Arc::new(RecordingOutput::default());
        let second = Arc::new(RecordingOutput::default());

        let _stdout = app.set_message_output(first.clone());
        app.print_msg("to first");

        let previous = app.set_message_output(second.clone());
        app.print_msg("to second");
        previous.print_msg("direct");

        assert_eq!(*first.lines.lock().unwrap(), vec!["to first", "direct"]);
        assert_eq!(*second.lines.lock().unwrap(), vec!["to second"]);
    }
}
