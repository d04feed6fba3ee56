// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::mpsc::{self, Receiver, Sender, SyncSender};

use strum_macros::{Display, IntoStaticStr};

use super::MachineStatus;
use crate::MachineError;

/// Display magnification.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum DisplayScale {
    #[strum(serialize = "1x")]
    X1,
    #[strum(serialize = "2x")]
    X2,
}

impl TryFrom<i64> for DisplayScale {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::X1),
            2 => Ok(Self::X2),
            other => Err(other),
        }
    }
}

#[derive(Debug, IntoStaticStr)]
pub enum MachineCommand {
    Reset,
    LoadSnapshot {
        data: Vec<u8>,
        reply: SyncSender<Result<(), MachineError>>,
    },
    SaveSnapshot {
        reply: SyncSender<Result<Vec<u8>, MachineError>>,
    },
    CloseAllDisplays {
        finished: SyncSender<()>,
    },
    AddDisplay(DisplayScale),
    SetFps(f64),
    SetUlaEmulationAccuracy(bool),
    CloseAllAudioReceivers {
        finished: SyncSender<()>,
    },
    AddAudioReceiver,
    QueryStatus {
        reply: SyncSender<MachineStatus>,
    },
}

/// The sending end of the machine's command channel. Every method blocks until the
/// machine has accepted the command, and those that wait for a reply block until it
/// arrives.
#[derive(Debug, Clone)]
pub struct MachineHandle {
    command_sender: Sender<MachineCommand>,
}

impl MachineHandle {
    #[must_use]
    pub fn new() -> (Self, Receiver<MachineCommand>) {
        let (command_sender, command_receiver) = mpsc::channel();
        (Self { command_sender }, command_receiver)
    }

    /// # Errors
    ///
    /// [`MachineError::Disconnected`] if the machine thread is gone.
    pub fn send(&self, command: MachineCommand) -> Result<(), MachineError> {
        self.command_sender
            .send(command)
            .map_err(|_| MachineError::Disconnected)
    }

    /// Sends a command built around a fresh reply channel, and waits for the reply.
    fn request<T>(
        &self,
        command: impl FnOnce(SyncSender<T>) -> MachineCommand,
    ) -> Result<T, MachineError> {
        let (reply_sender, reply_receiver) = mpsc::sync_channel(1);
        self.send(command(reply_sender))?;
        reply_receiver
            .recv()
            .map_err(|_| MachineError::Disconnected)
    }

    /// # Errors
    ///
    /// [`MachineError::Disconnected`] if the machine thread is gone.
    pub fn reset(&self) -> Result<(), MachineError> { self.send(MachineCommand::Reset) }

    /// # Errors
    ///
    /// [`MachineError::Snapshot`] if `data` is not a valid snapshot.
    pub fn load_snapshot(&self, data: Vec<u8>) -> Result<(), MachineError> {
        self.request(|reply| MachineCommand::LoadSnapshot { data, reply })?
    }

    /// # Errors
    ///
    /// If the state can't be serialized, or the machine thread is gone.
    pub fn save_snapshot(&self) -> Result<Vec<u8>, MachineError> {
        self.request(|reply| MachineCommand::SaveSnapshot { reply })?
    }

    /// Returns once every display is closed.
    ///
    /// # Errors
    ///
    /// [`MachineError::Disconnected`] if the machine thread is gone.
    pub fn close_all_displays(&self) -> Result<(), MachineError> {
        self.request(|finished| MachineCommand::CloseAllDisplays { finished })
    }

    /// # Errors
    ///
    /// [`MachineError::Disconnected`] if the machine thread is gone.
    pub fn add_display(&self, scale: DisplayScale) -> Result<(), MachineError> {
        self.send(MachineCommand::AddDisplay(scale))
    }

    /// # Errors
    ///
    /// [`MachineError::Disconnected`] if the machine thread is gone.
    pub fn set_fps(&self, fps: f64) -> Result<(), MachineError> {
        self.send(MachineCommand::SetFps(fps))
    }

    /// # Errors
    ///
    /// [`MachineError::Disconnected`] if the machine thread is gone.
    pub fn set_ula_emulation_accuracy(&self, accurate: bool) -> Result<(), MachineError> {
        self.send(MachineCommand::SetUlaEmulationAccuracy(accurate))
    }

    /// Returns once every audio receiver is closed.
    ///
    /// # Errors
    ///
    /// [`MachineError::Disconnected`] if the machine thread is gone.
    pub fn close_all_audio_receivers(&self) -> Result<(), MachineError> {
        self.request(|finished| MachineCommand::CloseAllAudioReceivers { finished })
    }

    /// # Errors
    ///
    /// [`MachineError::Disconnected`] if the machine thread is gone.
    pub fn add_audio_receiver(&self) -> Result<(), MachineError> {
        self.send(MachineCommand::AddAudioReceiver)
    }

    /// # Errors
    ///
    /// [`MachineError::Disconnected`] if the machine thread is gone.
    pub fn status(&self) -> Result<MachineStatus, MachineError> {
        self.request(|reply| MachineCommand::QueryStatus { reply })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case(1, Ok(DisplayScale::X1))]
    #[test_case(2, Ok(DisplayScale::X2))]
    #[test_case(3, Err(3))]
    #[test_case(0, Err(0))]
    fn test_display_scale_from_integer(value: i64, expected: Result<DisplayScale, i64>) {
        assert_eq!(DisplayScale::try_from(value), expected);
    }

    #[test]
    fn test_disconnected_machine() {
        let (machine, command_receiver) = MachineHandle::new();
        drop(command_receiver);

        assert!(matches!(machine.reset(), Err(MachineError::Disconnected)));
        assert!(matches!(
            machine.save_snapshot(),
            Err(MachineError::Disconnected)
        ));
    }

    #[test]
    fn test_request_waits_for_reply() {
        let (machine, command_receiver) = MachineHandle::new();
        let machine_thread = std::thread::spawn(move || {
            if let Ok(MachineCommand::CloseAllDisplays { finished }) = command_receiver.recv() {
                finished.send(()).unwrap();
            }
        });

        machine.close_all_displays().unwrap();
        machine_thread.join().unwrap();
    }
}
