// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{self, Write},
          sync::{Arc,
                 atomic::{AtomicBool, Ordering}},
          thread,
          time::Duration};

use crossterm::{event, terminal};

use super::{History, LineEditEvent, LineEditor, LineEditorControl, LineState, ReadLineOutcome,
            SharedLineEditorControl};
use crate::{OutputDevice, StdMutex, lock_output_device_as_mut, ok};

/// How often a blocked [`TermLineEditor::read_line()`] wakes up to check whether it has
/// been cancelled or suspended.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

const FALLBACK_TERM_SIZE: (u16, u16) = (80, 24);

/// Interactive line editor on a real terminal. The terminal is put in raw mode for the
/// duration of each [`LineEditor::read_line()`] call, and key events are polled with
/// [`POLL_INTERVAL`] so that the read can be cancelled without a key press.
#[allow(missing_debug_implementations)]
pub struct TermLineEditor {
    output_device: OutputDevice,
    shared: Arc<TermEditorShared>,
}

/// State shared between the reading thread and [`LineEditorControl`] callers.
#[derive(Debug)]
struct TermEditorShared {
    line_state: StdMutex<LineState>,
    history: StdMutex<History>,
    is_cancelled: AtomicBool,
}

/// Leaves raw mode when dropped, even if the read loop bails out with an error.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) { let _ = terminal::disable_raw_mode(); }
}

impl TermLineEditor {
    #[must_use]
    pub fn new(output_device: OutputDevice) -> Self {
        Self {
            output_device,
            shared: Arc::new(TermEditorShared {
                line_state: StdMutex::new(LineState::new(String::new(), FALLBACK_TERM_SIZE)),
                history: StdMutex::new(History::default()),
                is_cancelled: AtomicBool::new(false),
            }),
        }
    }

    /// # Panics
    ///
    /// If the history lock is poisoned.
    #[must_use]
    pub fn history_entries(&self) -> Vec<String> {
        self.shared.history.lock().unwrap().entries.iter().cloned().collect()
    }

    /// # Panics
    ///
    /// If the line state or history lock is poisoned.
    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    fn try_read_line(&mut self, prompt: &str) -> io::Result<ReadLineOutcome> {
        if self.shared.is_cancelled() {
            return Ok(ReadLineOutcome::Cancelled);
        }

        let _raw_mode = RawModeGuard::enable()?;

        {
            let term = lock_output_device_as_mut!(self.output_device);
            let mut line_state = self.shared.line_state.lock().unwrap();
            line_state.term_size = terminal::size().unwrap_or(FALLBACK_TERM_SIZE);
            line_state.begin_read(prompt, term)?;
        }

        let outcome = loop {
            if self.shared.is_cancelled() {
                break ReadLineOutcome::Cancelled;
            }

            // Whoever suspended the line owns the terminal, leave the keys alone.
            if self.shared.line_state.lock().unwrap().liveness.is_suspended() {
                thread::sleep(POLL_INTERVAL);
                continue;
            }

            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            let event = event::read()?;

            let term = lock_output_device_as_mut!(self.output_device);
            let mut line_state = self.shared.line_state.lock().unwrap();
            let mut history = self.shared.history.lock().unwrap();
            match line_state.apply_event_and_render(&event, term, &mut history)? {
                Some(LineEditEvent::Line(line)) => break ReadLineOutcome::Line(line),
                Some(LineEditEvent::Eof) => break ReadLineOutcome::EndOfInput,
                Some(LineEditEvent::Interrupted | LineEditEvent::Resized) | None => {}
            }
        };

        let term = lock_output_device_as_mut!(self.output_device);
        let mut line_state = self.shared.line_state.lock().unwrap();
        if outcome == ReadLineOutcome::Cancelled {
            line_state.discard(term)?;
        }
        line_state.end_read();

        Ok(outcome)
    }
}

impl LineEditor for TermLineEditor {
    fn read_line(&mut self, prompt: &str) -> ReadLineOutcome {
        match self.try_read_line(prompt) {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(
                    message = "term line editor: read failed, treating it as end of input",
                    ?error
                );
                ReadLineOutcome::EndOfInput
            }
        }
    }

    fn controls(&self) -> SharedLineEditorControl { self.shared.clone() }
}

impl TermEditorShared {
    fn is_cancelled(&self) -> bool { self.is_cancelled.load(Ordering::SeqCst) }
}

impl LineEditorControl for TermEditorShared {
    fn add_history(&self, line: &str) { self.history.lock().unwrap().update(line); }

    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    fn discard_current_line(&self, term: &mut dyn Write) -> io::Result<()> {
        let mut line_state = self.line_state.lock().unwrap();
        let was_rendering = line_state.is_rendering();
        line_state.discard(term)?;
        if was_rendering {
            terminal::disable_raw_mode()?;
        }
        ok!()
    }

    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    fn clear_current_line(&self, term: &mut dyn Write) -> io::Result<()> {
        self.line_state.lock().unwrap().clear(term)
    }

    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    fn redraw(&self, term: &mut dyn Write) -> io::Result<()> {
        let mut line_state = self.line_state.lock().unwrap();
        if !line_state.is_reading {
            return ok!();
        }
        if line_state.liveness.is_suspended() {
            terminal::enable_raw_mode()?;
        }
        line_state.redraw(term)
    }

    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    fn recompute_geometry(&self, term: &mut dyn Write) -> io::Result<()> {
        let term_size = terminal::size()?;
        self.line_state.lock().unwrap().resize(term_size, term)
    }

    fn cancel(&self) { self.is_cancelled.store(true, Ordering::SeqCst); }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use emu_test_fixtures::StdoutMock;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ConsoleMessageOutput, MessageOutput, PromptState, TerminationFlag};

    /// Starts a read on `editor` without raw mode, and types `text` after the prompt.
    fn begin_read_and_type(
        editor: &TermLineEditor,
        term_size: (u16, u16),
        prompt: &str,
        text: &str,
    ) {
        let term = lock_output_device_as_mut!(editor.output_device);
        let mut line_state = editor.shared.line_state.lock().unwrap();
        let mut history = editor.shared.history.lock().unwrap();
        line_state.term_size = term_size;
        line_state.begin_read(prompt, term).unwrap();
        for c in text.chars() {
            let key = Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
            line_state
                .apply_event_and_render(&key, term, &mut history)
                .unwrap();
        }
    }

    #[test]
    fn test_cancelled_editor_returns_without_touching_the_terminal() {
        let stdout_mock = StdoutMock::default();
        let mut editor = TermLineEditor::new(OutputDevice::new_mock(stdout_mock.clone()));

        editor.controls().cancel();

        assert_eq!(editor.read_line("emu> "), ReadLineOutcome::Cancelled);
        assert!(stdout_mock.get_copy_of_buffer().is_empty());
    }

    #[test]
    fn test_controls_share_history() {
        let editor = TermLineEditor::new(OutputDevice::new_mock(StdoutMock::default()));
        let controls = editor.controls();

        controls.add_history("reset()");
        controls.add_history("reset()");
        controls.add_history("sound(false)");

        assert_eq!(editor.history_entries(), vec!["sound(false)", "reset()"]);
    }

    #[test]
    fn test_discard_and_redraw_outside_a_read_render_nothing() {
        let mut stdout_mock = StdoutMock::default();
        let editor = TermLineEditor::new(OutputDevice::new_mock(stdout_mock.clone()));
        let controls = editor.controls();

        controls.discard_current_line(&mut stdout_mock).unwrap();
        controls.redraw(&mut stdout_mock).unwrap();

        assert!(stdout_mock.get_copy_of_buffer().is_empty());
    }

    #[test]
    fn test_clear_current_line_erases_every_wrapped_row() {
        let mut stdout_mock = StdoutMock::default();
        let editor = TermLineEditor::new(OutputDevice::new_mock(stdout_mock.clone()));
        // 5 columns of prompt and 12 of text on a 10 column terminal: two rows.
        begin_read_and_type(&editor, (10, 24), "emu> ", "abcdefghijkl");
        stdout_mock.clear();

        editor.controls().clear_current_line(&mut stdout_mock).unwrap();

        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\u{1b}[1G\u{1b}[1A\u{1b}[J"
        );
        // Still reading, with the text intact.
        assert!(!editor.shared.line_state.lock().unwrap().liveness.is_suspended());
        assert_eq!(editor.shared.line_state.lock().unwrap().line, "abcdefghijkl");
    }

    #[test]
    fn test_message_over_wrapped_line_leaves_no_stale_row() {
        let stdout_mock = StdoutMock::default();
        let output_device = OutputDevice::new_mock(stdout_mock.clone());
        let editor = TermLineEditor::new(output_device.clone());
        begin_read_and_type(&editor, (10, 24), "emu> ", "abcdefghijkl");
        stdout_mock.clear();

        let prompt_state = PromptState::new_safe();
        prompt_state.lock().unwrap().visible = true;
        let output = ConsoleMessageOutput::new(
            output_device,
            prompt_state.clone(),
            editor.controls(),
            TerminationFlag::default(),
        );
        output.print_msg("MSG");

        let written = stdout_mock.get_copy_of_buffer_as_string();
        let (erase, redrawn) = written.split_once("MSG\r\n").unwrap();
        // Back up to the first row of the wrapped line before clearing downwards.
        assert_eq!(erase, "\u{1b}[1G\u{1b}[1A\u{1b}[J");
        assert!(redrawn.starts_with("emu> abcdefghijkl"));
        assert!(prompt_state.lock().unwrap().visible);
    }
}
