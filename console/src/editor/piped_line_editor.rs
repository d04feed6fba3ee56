// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{self, BufRead, Write},
          sync::{Arc,
                 atomic::{AtomicBool, Ordering}}};

use super::{History, LineEditor, LineEditorControl, ReadLineOutcome, SharedLineEditorControl};
use crate::{StdMutex, ok};

/// Reads lines from a non interactive source, such as a pipe or a file. Nothing is echoed
/// and there is no prompt, so the rendering controls do nothing.
#[allow(missing_debug_implementations)]
pub struct PipedLineEditor<R> {
    reader: R,
    controls: Arc<PipedLineEditorControl>,
}

#[derive(Debug, Default)]
struct PipedLineEditorControl {
    history: StdMutex<History>,
    is_cancelled: AtomicBool,
}

impl<R: BufRead + Send> PipedLineEditor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            controls: Arc::new(PipedLineEditorControl::default()),
        }
    }

    fn is_cancelled(&self) -> bool { self.controls.is_cancelled.load(Ordering::SeqCst) }
}

impl<R: BufRead + Send> LineEditor for PipedLineEditor<R> {
    fn read_line(&mut self, _prompt: &str) -> ReadLineOutcome {
        if self.is_cancelled() {
            return ReadLineOutcome::Cancelled;
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => ReadLineOutcome::EndOfInput,
            Ok(_) if self.is_cancelled() => ReadLineOutcome::Cancelled,
            Ok(_) => ReadLineOutcome::Line(line.trim_end_matches(['\n', '\r']).to_string()),
            Err(error) => {
                tracing::warn!(
                    message = "piped line editor: read failed, treating it as end of input",
                    ?error
                );
                ReadLineOutcome::EndOfInput
            }
        }
    }

    fn controls(&self) -> SharedLineEditorControl { self.controls.clone() }
}

impl LineEditorControl for PipedLineEditorControl {
    fn add_history(&self, line: &str) {
        if let Ok(mut history) = self.history.lock() {
            history.update(line);
        }
    }

    fn discard_current_line(&self, _term: &mut dyn Write) -> io::Result<()> { ok!() }

    // Nothing was drawn, the prompt is never echoed.
    fn clear_current_line(&self, _term: &mut dyn Write) -> io::Result<()> { ok!() }

    fn redraw(&self, _term: &mut dyn Write) -> io::Result<()> { ok!() }

    fn recompute_geometry(&self, _term: &mut dyn Write) -> io::Result<()> { ok!() }

    fn cancel(&self) { self.is_cancelled.store(true, Ordering::SeqCst); }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_reads_lines_then_end_of_input() {
        let mut editor = PipedLineEditor::new(Cursor::new("reset()\r\n\nfps(25)"));

        assert_eq!(
            editor.read_line("emu> "),
            ReadLineOutcome::Line("reset()".into())
        );
        assert_eq!(editor.read_line("emu> "), ReadLineOutcome::Line(String::new()));
        assert_eq!(
            editor.read_line("emu> "),
            ReadLineOutcome::Line("fps(25)".into())
        );
        assert_eq!(editor.read_line("emu> "), ReadLineOutcome::EndOfInput);
    }

    #[test]
    fn test_cancel() {
        let mut editor = PipedLineEditor::new(Cursor::new("reset()\n"));
        editor.controls().cancel();
        assert_eq!(editor.read_line("emu> "), ReadLineOutcome::Cancelled);
    }

    #[test]
    fn test_read_error_is_end_of_input() {
        struct FailingReader;

        impl io::Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("device went away"))
            }
        }

        let mut editor = PipedLineEditor::new(io::BufReader::new(FailingReader));
        assert_eq!(editor.read_line("emu> "), ReadLineOutcome::EndOfInput);
    }
}
