// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io,
          sync::mpsc::{Receiver, RecvTimeoutError},
          thread::{self, JoinHandle},
          time::Duration};

use super::{DEFAULT_FPS, MEMORY_SIZE, MachineCommand, MachineHandle, MachineState,
            MachineStatus};
use crate::{Application, print_msg};

/// A stand in for an emulated computer. It advances one frame per tick at the configured
/// rate, and keeps track of which displays and audio receivers are attached.
#[derive(Debug)]
pub struct SimulatedMachine {
    app: Application,
    state: MachineState,
    status: MachineStatus,
}

/// Starts the machine thread. It runs until every [`MachineHandle`] is dropped.
///
/// # Errors
///
/// If the thread can't be spawned.
pub fn spawn_simulated_machine(app: Application) -> io::Result<(MachineHandle, JoinHandle<()>)> {
    let (machine, command_receiver) = MachineHandle::new();
    let join_handle = thread::Builder::new()
        .name("simulated-machine".into())
        .spawn(move || SimulatedMachine::new(app).run(&command_receiver))?;
    Ok((machine, join_handle))
}

impl SimulatedMachine {
    #[must_use]
    pub fn new(app: Application) -> Self {
        Self {
            app,
            state: MachineState::default(),
            status: MachineStatus::default(),
        }
    }

    fn run(mut self, command_receiver: &Receiver<MachineCommand>) {
        loop {
            match command_receiver.recv_timeout(self.frame_interval()) {
                Ok(command) => self.apply(command),
                Err(RecvTimeoutError::Timeout) => self.run_frame(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        tracing::debug!(message = "simulated machine: exit");
    }

    fn frame_interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.status.fps)
            .unwrap_or_else(|_| Duration::from_secs_f64(1.0 / DEFAULT_FPS))
    }

    fn run_frame(&mut self) {
        self.state.frame_count += 1;
        let offset = usize::try_from(self.state.frame_count).unwrap_or_default() % MEMORY_SIZE;
        self.state.memory[offset] = self.state.memory[offset].wrapping_add(1);
    }

    pub fn apply(&mut self, command: MachineCommand) {
        let command_name: &'static str = (&command).into();
        tracing::debug!(message = "simulated machine: command", command_name);

        match command {
            MachineCommand::Reset => {
                self.state = MachineState::default();
                self.status.reset_count += 1;
                if self.app.verbose() {
                    print_msg!(self.app, "machine: reset");
                }
            }
            MachineCommand::LoadSnapshot { data, reply } => {
                let result = MachineState::from_snapshot(&data).map(|state| {
                    self.state = state;
                });
                let _ = reply.send(result);
            }
            MachineCommand::SaveSnapshot { reply } => {
                let _ = reply.send(self.state.to_snapshot());
            }
            MachineCommand::CloseAllDisplays { finished } => {
                self.status.displays.clear();
                let _ = finished.send(());
            }
            MachineCommand::AddDisplay(scale) => self.status.displays.push(scale),
            MachineCommand::SetFps(fps) => {
                if fps.is_finite() && fps > 0.0 {
                    self.status.fps = fps;
                } else {
                    tracing::warn!(message = "simulated machine: ignoring fps", fps);
                }
            }
            MachineCommand::SetUlaEmulationAccuracy(accurate) => {
                self.status.ula_accuracy = accurate;
            }
            MachineCommand::CloseAllAudioReceivers { finished } => {
                self.status.audio_receiver_count = 0;
                let _ = finished.send(());
            }
            MachineCommand::AddAudioReceiver => self.status.audio_receiver_count += 1,
            MachineCommand::QueryStatus { reply } => {
                let status = MachineStatus {
                    frame_count: self.state.frame_count,
                    ..self.status.clone()
                };
                let _ = reply.send(status);
            }
        }
    }
}
