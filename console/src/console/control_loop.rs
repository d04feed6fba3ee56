// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::Write;

use strum_macros::Display;

use super::{LineDelivery, LineReaderHandle, SafePromptState, SignalRouter};
use crate::{Application, CommandRegistry, EvalEngine, Evaluator, EventLoop, OutputDevice,
            PauseRequest, SharedLineEditorControl, TerminateRequest,
            lock_output_device_as_mut, print_msg};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum ConsoleState {
    Reading,
    Dispatching,
    Paused,
    Terminated,
}

/// Why [`crate::Console::run()`] returned.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum ConsoleExit {
    /// The application terminated.
    Terminated,
    /// Input ended and the console was configured to leave the application running.
    EndOfInput,
}

/// The console's event loop. It never reads from the terminal itself, it only waits, in
/// this order of priority, for:
/// 1. a terminate request, which is final;
/// 2. a pause request;
/// 3. the next line from the reader thread.
pub(crate) struct ConsoleControlLoop<'a, E> {
    pub app: Application,
    pub event_loop: EventLoop,
    pub reader: &'a mut LineReaderHandle,
    pub evaluator: &'a Evaluator<E>,
    pub command_registry: &'a CommandRegistry,
    pub output_device: OutputDevice,
    pub prompt_state: SafePromptState,
    pub controls: SharedLineEditorControl,
    pub exit_app_if_end_of_input: bool,
    pub signal_router: Option<SignalRouter>,
    pub state: ConsoleState,
    pub is_reader_alive: bool,
}

impl<E: EvalEngine> ConsoleControlLoop<'_, E> {
    pub async fn run(mut self) -> ConsoleExit {
        self.install_signal_router();

        loop {
            self.set_state(ConsoleState::Reading);

            tokio::select! {
                biased;

                // This branch is cancel safe because recv is cancel safe.
                maybe_terminate_request = self.event_loop.terminate_receiver.recv() => {
                    return self.terminate(maybe_terminate_request);
                }

                // This branch is cancel safe because recv is cancel safe.
                Some(pause_request) = self.event_loop.pause_receiver.recv() => {
                    if let Some(exit) = self.pause(pause_request).await {
                        return exit;
                    }
                }

                // This branch is cancel safe because recv is cancel safe.
                maybe_delivery = self.reader.line_receiver.recv(), if self.is_reader_alive => {
                    match maybe_delivery {
                        Some(LineDelivery::Line(line)) => self.dispatch(&line),
                        Some(LineDelivery::EndOfInput) => {
                            self.uninstall_signal_router();
                            if self.exit_app_if_end_of_input {
                                self.app.request_exit();
                            } else {
                                return self.end_of_input();
                            }
                        }
                        // The reader exited without a delivery, it was cancelled.
                        None => self.is_reader_alive = false,
                    }
                }
            }
        }
    }

    fn set_state(&mut self, state: ConsoleState) {
        if self.state != state {
            tracing::trace!(message = "console loop: state", from = %self.state, to = %state);
            self.state = state;
        }
    }

    fn dispatch(&mut self, line: &str) {
        self.set_state(ConsoleState::Dispatching);
        if line.is_empty() {
            self.app.print_msg(&self.command_registry.render_help());
        } else {
            self.evaluator.run(line);
        }
        self.reader.acknowledge();
    }

    fn terminate(&mut self, maybe_request: Option<TerminateRequest>) -> ConsoleExit {
        self.uninstall_signal_router();
        self.reader.cancel();
        self.set_state(ConsoleState::Terminated);
        if self.app.verbose() {
            print_msg!(self.app, "console loop: exit");
        }
        if let Some(request) = maybe_request {
            request.acknowledge();
        }
        ConsoleExit::Terminated
    }

    fn end_of_input(self) -> ConsoleExit {
        tracing::debug!(message = "console loop: end of input, application keeps running");
        self.event_loop.delete();
        ConsoleExit::EndOfInput
    }

    /// Returns `Some` if the application terminated instead of resuming.
    ///
    /// # Panics
    ///
    /// If the prompt state lock is poisoned.
    async fn pause(&mut self, request: PauseRequest) -> Option<ConsoleExit> {
        self.set_state(ConsoleState::Paused);
        self.uninstall_signal_router();

        let was_visible = {
            let term = lock_output_device_as_mut!(self.output_device);
            let mut prompt_state = self.prompt_state.lock().unwrap();
            let was_visible = prompt_state.visible;
            // Nothing is drawn while paused, so messages must not try to redraw either.
            prompt_state.visible = false;
            drop(prompt_state);
            // Erases every row of the prompt and line, then keeps the editor quiet.
            let _ = self.controls.discard_current_line(term);
            let _ = term.flush();
            was_visible
        };

        tracing::debug!(message = "console loop: paused", was_visible);
        let resume_receiver = request.acknowledge();

        tokio::select! {
            biased;

            // This branch is cancel safe because recv is cancel safe.
            maybe_terminate_request = self.event_loop.terminate_receiver.recv() => {
                return Some(self.terminate(maybe_terminate_request));
            }

            // Resumed, or the paused handle was dropped. Either way, carry on.
            _ = resume_receiver => {}
        }

        tracing::debug!(message = "console loop: resumed");
        self.install_signal_router();
        if was_visible {
            let term = lock_output_device_as_mut!(self.output_device);
            self.prompt_state.lock().unwrap().visible = true;
            let _ = self.controls.redraw(term);
            let _ = term.flush();
        }
        None
    }

    fn install_signal_router(&mut self) {
        // A mock device is not a terminal, there is nothing to restore.
        if self.output_device.is_mock || self.signal_router.is_some() || !self.is_reader_alive {
            return;
        }
        match SignalRouter::install(
            self.controls.clone(),
            self.output_device.clone(),
            self.prompt_state.clone(),
        ) {
            Ok(signal_router) => self.signal_router = Some(signal_router),
            Err(error) => {
                tracing::warn!(message = "console loop: can't route signals", ?error);
            }
        }
    }

    fn uninstall_signal_router(&mut self) {
        if let Some(signal_router) = self.signal_router.take() {
            signal_router.uninstall();
        }
    }
}
