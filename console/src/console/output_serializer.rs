// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{self, Write};

use super::SafePromptState;
use crate::{MessageOutput, OutputDevice, SharedLineEditorControl, TerminationFlag,
            lock_output_device_as_mut, ok, write_message_block};

/// The [`MessageOutput`] a running console registers on its application. It is the only
/// thing that writes messages to the terminal while the console owns it.
///
/// For each message, while holding the [`OutputDevice`] lock:
/// 1. If the prompt is visible, erase the prompt and the line being typed, all of its
///    rows when it wraps.
/// 2. Write the message, followed by a newline if it lacks one.
/// 3. If the prompt had been visible and the application is not terminating, redraw the
///    prompt and the partially typed line. Otherwise record that the prompt is hidden.
///
/// Messages from different threads therefore never interleave, and never land in the
/// middle of the user's input.
#[allow(missing_debug_implementations)]
pub struct ConsoleMessageOutput {
    output_device: OutputDevice,
    prompt_state: SafePromptState,
    controls: SharedLineEditorControl,
    termination_flag: TerminationFlag,
}

impl ConsoleMessageOutput {
    #[must_use]
    pub fn new(
        output_device: OutputDevice,
        prompt_state: SafePromptState,
        controls: SharedLineEditorControl,
        termination_flag: TerminationFlag,
    ) -> Self {
        Self {
            output_device,
            prompt_state,
            controls,
            termination_flag,
        }
    }

    /// # Panics
    ///
    /// If the prompt state lock is poisoned.
    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    fn write_around_prompt(&self, term: &mut dyn Write, text: &str) -> io::Result<()> {
        let mut prompt_state = self.prompt_state.lock().unwrap();

        let was_visible = prompt_state.visible;
        if was_visible {
            self.controls.clear_current_line(term)?;
        }

        write_message_block(term, text)?;

        if was_visible && !self.termination_flag.is_set() {
            self.controls.redraw(term)?;
        } else {
            prompt_state.visible = false;
        }

        term.flush()?;
        ok!()
    }
}

impl MessageOutput for ConsoleMessageOutput {
    fn print_msg(&self, text: &str) {
        let term = lock_output_device_as_mut!(self.output_device);
        // Logging from here would come straight back through this sink.
        let _ = self.write_around_prompt(term, text);
    }
}
