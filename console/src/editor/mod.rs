// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Line editors that the console reads user input with.
//!
//! A line editor is split in two halves:
//! 1. [`LineEditor`] performs the blocking read. Only the console's reader thread owns
//!    it, so there is never more than one read outstanding.
//! 2. [`LineEditorControl`] is shared. The console loop, the signal router and the
//!    message output use it to touch the in progress line (discard it, redraw it, cancel
//!    the read) while the reader thread is blocked.
//!
//! Every [`LineEditorControl`] method that renders takes the locked terminal as an
//! argument. Callers lock the [`crate::OutputDevice`] first, which keeps the lock order
//! the same everywhere.

// Attach sources.
pub mod history;
pub mod line_state;
pub mod piped_line_editor;
pub mod term_line_editor;

// Re-export.
pub use history::*;
pub use line_state::*;
pub use piped_line_editor::*;
pub use term_line_editor::*;

// External crates.
use std::{io::{self, IsTerminal, Write},
          sync::Arc};

use crate::OutputDevice;

// Type aliases.
pub type SharedLineEditorControl = Arc<dyn LineEditorControl>;

// Constants.
pub const HISTORY_SIZE_MAX: usize = 1_000;

/// What a single [`LineEditor::read_line()`] call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadLineOutcome {
    /// A line the user submitted, without its line terminator.
    Line(String),
    /// The input source is exhausted (Ctrl+D on an empty line, or a closed pipe).
    EndOfInput,
    /// [`LineEditorControl::cancel()`] was called while reading.
    Cancelled,
}

/// The blocking half of a line editor.
pub trait LineEditor: Send {
    /// Shows `prompt` and blocks until the user submits a line, input ends, or the read
    /// is cancelled.
    fn read_line(&mut self, prompt: &str) -> ReadLineOutcome;

    /// The shared half of this editor.
    fn controls(&self) -> SharedLineEditorControl;
}

/// The shared half of a line editor.
pub trait LineEditorControl: Send + Sync {
    fn add_history(&self, line: &str);

    /// Drops any partially entered text, erases the prompt from `term` and gives the
    /// terminal back in a clean state. The editor stays quiet until
    /// [`LineEditorControl::redraw()`] is called.
    ///
    /// # Errors
    ///
    /// If writing to `term` fails.
    fn discard_current_line(&self, term: &mut dyn Write) -> io::Result<()>;

    /// Erases the prompt and the current line from `term`, every row of it when the line
    /// wraps, and leaves the cursor in the first column. The text is kept, and
    /// [`LineEditorControl::redraw()`] puts it back.
    ///
    /// # Errors
    ///
    /// If writing to `term` fails.
    fn clear_current_line(&self, term: &mut dyn Write) -> io::Result<()>;

    /// Renders the prompt and the current line again, when a read is in progress.
    ///
    /// # Errors
    ///
    /// If writing to `term` fails.
    fn redraw(&self, term: &mut dyn Write) -> io::Result<()>;

    /// Queries the terminal size again and re-renders.
    ///
    /// # Errors
    ///
    /// If writing to `term` fails.
    fn recompute_geometry(&self, term: &mut dyn Write) -> io::Result<()>;

    /// Makes the read in progress (or the next one) return
    /// [`ReadLineOutcome::Cancelled`].
    fn cancel(&self);
}

/// A [`TermLineEditor`] when stdin is an interactive terminal, otherwise a
/// [`PipedLineEditor`] reading stdin line by line.
#[must_use]
pub fn new_line_editor_for_stdin(output_device: OutputDevice) -> Box<dyn LineEditor> {
    if io::stdin().is_terminal() {
        Box::new(TermLineEditor::new(output_device))
    } else {
        Box::new(PipedLineEditor::new(io::BufReader::new(io::stdin())))
    }
}
