// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{self, Write};

use crossterm::{QueueableCommand, cursor,
                event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
                terminal::{Clear,
                           ClearType::{All, FromCursorDown}}};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use super::History;
use crate::ok;

/// Whether [`LineState`] renders. It is [`LineStateLiveness::Suspended`] between
/// [`LineState::discard()`] and [`LineState::redraw()`], when someone else (a signal
/// handler, or the console being paused) owns the screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LineStateLiveness {
    Live,
    Suspended,
}

impl LineStateLiveness {
    #[must_use]
    pub fn is_suspended(&self) -> bool { matches!(self, LineStateLiveness::Suspended) }
}

/// What applying one terminal event to a [`LineState`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEditEvent {
    Line(String),
    Eof,
    /// Ctrl+C, the line was discarded and a fresh prompt drawn.
    Interrupted,
    Resized,
}

/// This struct actually handles the line editing and rendering for
/// [`super::TermLineEditor`]. All rendering goes to the `term` passed in, which callers
/// have already locked.
#[derive(Debug)]
pub struct LineState {
    /// Unicode line.
    pub line: String,

    /// Index of grapheme in line.
    pub line_cursor_grapheme: usize,

    /// Column of grapheme in line, counting the prompt.
    pub current_column: u16,

    pub prompt: String,

    /// Terminal width and height.
    pub term_size: (u16, u16),

    /// `true` while a [`super::LineEditor::read_line()`] call is waiting on this state.
    pub is_reading: bool,

    pub liveness: LineStateLiveness,
}

macro_rules! early_return_if_not_rendering {
    ($self:ident @None) => {
        if !$self.is_rendering() {
            return Ok(None);
        }
    };

    ($self:ident @Unit) => {
        if !$self.is_rendering() {
            return Ok(());
        }
    };
}

fn display_width(text: &str) -> u16 { u16::try_from(text.width()).unwrap_or(u16::MAX) }

impl LineState {
    #[must_use]
    pub fn new(prompt: String, term_size: (u16, u16)) -> Self {
        let current_column = display_width(&prompt);
        Self {
            line: String::new(),
            line_cursor_grapheme: 0,
            current_column,
            prompt,
            term_size,
            is_reading: false,
            liveness: LineStateLiveness::Live,
        }
    }

    #[must_use]
    pub fn is_rendering(&self) -> bool { self.is_reading && !self.liveness.is_suspended() }

    /// Starts a fresh read: empty line, cursor after `prompt`, prompt drawn.
    ///
    /// # Errors
    ///
    /// If writing to `term` fails.
    pub fn begin_read(&mut self, prompt: &str, term: &mut dyn Write) -> io::Result<()> {
        self.prompt.clear();
        self.prompt.push_str(prompt);
        self.line.clear();
        self.line_cursor_grapheme = 0;
        self.is_reading = true;
        self.liveness = LineStateLiveness::Live;
        self.move_cursor(0);
        self.render_and_flush(term)
    }

    pub fn end_read(&mut self) { self.is_reading = false; }

    /// Drops the partially entered line, erases prompt and line from `term`, and stops
    /// rendering until [`LineState::redraw()`].
    ///
    /// # Errors
    ///
    /// If writing to `term` fails.
    pub fn discard(&mut self, term: &mut dyn Write) -> io::Result<()> {
        if self.is_rendering() {
            self.clear(term)?;
            term.queue(cursor::MoveToColumn(0))?;
            term.flush()?;
        }
        self.line.clear();
        self.line_cursor_grapheme = 0;
        self.move_cursor(0);
        self.liveness = LineStateLiveness::Suspended;
        ok!()
    }

    /// Resumes rendering and draws prompt and line at the cursor position. Does nothing
    /// unless a read is in progress.
    ///
    /// # Errors
    ///
    /// If writing to `term` fails.
    pub fn redraw(&mut self, term: &mut dyn Write) -> io::Result<()> {
        self.liveness = LineStateLiveness::Live;
        self.render_and_flush(term)
    }

    /// # Errors
    ///
    /// If writing to `term` fails.
    pub fn resize(&mut self, term_size: (u16, u16), term: &mut dyn Write) -> io::Result<()> {
        self.term_size = term_size;
        self.clear_and_render_and_flush(term)
    }

    /// Gets the number of lines wrapped.
    fn line_height(&self, pos: u16) -> u16 { pos / self.term_size.0.max(1) }

    /// Move from a position on the line to the start.
    fn move_to_beginning(&self, term: &mut dyn Write, from: u16) -> io::Result<()> {
        let move_up = self.line_height(from.saturating_sub(1));
        term.queue(cursor::MoveToColumn(0))?;
        if move_up != 0 {
            term.queue(cursor::MoveUp(move_up))?;
        }

        ok!()
    }

    /// Move from the start of the line to some position.
    fn move_from_beginning(&self, term: &mut dyn Write, to: u16) -> io::Result<()> {
        let line_height = self.line_height(to.saturating_sub(1));
        let line_remaining_len = to % self.term_size.0.max(1);
        if line_height != 0 {
            term.queue(cursor::MoveDown(line_height))?;
        }
        if line_remaining_len != 0 {
            term.queue(cursor::MoveRight(line_remaining_len))?;
        }

        ok!()
    }

    /// Move cursor by one unicode grapheme either left (negative) or right (positive).
    pub fn move_cursor(&mut self, change: isize) {
        if change > 0 {
            let count = self.line.graphemes(true).count();
            self.line_cursor_grapheme =
                usize::min(self.line_cursor_grapheme + change.unsigned_abs(), count);
        } else {
            self.line_cursor_grapheme = self
                .line_cursor_grapheme
                .saturating_sub(change.unsigned_abs());
        }

        let (pos, str) = self.current_grapheme().unwrap_or((0, ""));
        let pos = pos + str.len();

        self.current_column =
            display_width(&self.prompt).saturating_add(display_width(&self.line[0..pos]));
    }

    #[must_use]
    pub fn current_grapheme(&self) -> Option<(usize, &str)> {
        self.line
            .grapheme_indices(true)
            .take(self.line_cursor_grapheme)
            .last()
    }

    #[must_use]
    pub fn next_grapheme(&self) -> Option<(usize, &str)> {
        let total = self.line.grapheme_indices(true).count();
        if self.line_cursor_grapheme == total {
            return None;
        }
        self.line
            .grapheme_indices(true)
            .take(self.line_cursor_grapheme + 1)
            .last()
    }

    fn reset_cursor(&self, term: &mut dyn Write) -> io::Result<()> {
        self.move_to_beginning(term, self.current_column)
    }

    fn set_cursor(&self, term: &mut dyn Write) -> io::Result<()> {
        self.move_from_beginning(term, self.current_column)
    }

    /// Clear current line.
    ///
    /// # Errors
    ///
    /// If writing to `term` fails.
    pub fn clear(&self, term: &mut dyn Write) -> io::Result<()> {
        early_return_if_not_rendering!(self @Unit);

        self.move_to_beginning(term, self.current_column)?;
        term.queue(Clear(FromCursorDown))?;

        ok!()
    }

    /// Render line (prompt + line) and flush.
    ///
    /// # Errors
    ///
    /// If writing to `term` fails.
    pub fn render_and_flush(&mut self, term: &mut dyn Write) -> io::Result<()> {
        early_return_if_not_rendering!(self @Unit);

        write!(term, "{}{}", self.prompt, self.line)?;

        let total_line_len = display_width(&self.prompt).saturating_add(display_width(&self.line));

        self.move_to_beginning(term, total_line_len)?;
        self.move_from_beginning(term, self.current_column)?;

        term.flush()?;

        ok!()
    }

    /// Clear line and render.
    ///
    /// # Errors
    ///
    /// If writing to `term` fails.
    pub fn clear_and_render_and_flush(&mut self, term: &mut dyn Write) -> io::Result<()> {
        early_return_if_not_rendering!(self @Unit);

        self.clear(term)?;
        self.render_and_flush(term)?;

        ok!()
    }

    /// Applies one terminal event. Key releases and events that arrive while suspended are
    /// ignored.
    ///
    /// # Errors
    ///
    /// If writing to `term` fails.
    pub fn apply_event_and_render(
        &mut self,
        event: &Event,
        term: &mut dyn Write,
        history: &mut History,
    ) -> io::Result<Option<LineEditEvent>> {
        use apply_event_and_render_helper::{handle_control_key, handle_regular_key};

        match event {
            Event::Key(KeyEvent {
                code,
                modifiers: KeyModifiers::CONTROL,
                kind: KeyEventKind::Press,
                ..
            }) => handle_control_key(self, *code, term),
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => handle_regular_key(self, *code, term, history),
            Event::Resize(width, height) => {
                early_return_if_not_rendering!(self @None);
                self.resize((*width, *height), term)?;
                Ok(Some(LineEditEvent::Resized))
            }
            _ => Ok(None),
        }
    }
}

mod apply_event_and_render_helper {
    use super::{All, Clear, History, KeyCode, LineEditEvent, LineState, QueueableCommand,
                UnicodeSegmentation, Write, cursor, io};

    type EventResult = io::Result<Option<LineEditEvent>>;

    pub fn handle_control_key(
        line_state: &mut LineState,
        code: KeyCode,
        term: &mut dyn Write,
    ) -> EventResult {
        early_return_if_not_rendering!(line_state @None);

        match code {
            KeyCode::Char('d') => handle_ctrl_d(line_state, term),
            KeyCode::Char('c') => handle_ctrl_c(line_state, term),
            KeyCode::Char('l') => handle_ctrl_l(line_state, term),
            KeyCode::Char('u') => handle_ctrl_u(line_state, term),
            KeyCode::Char('k') => handle_ctrl_k(line_state, term),
            KeyCode::Char('w') => handle_ctrl_w(line_state, term),
            KeyCode::Char('a') => move_cursor_and_flush(line_state, term, -100_000),
            KeyCode::Char('e') => move_cursor_and_flush(line_state, term, 100_000),
            _ => Ok(None),
        }
    }

    pub fn handle_regular_key(
        line_state: &mut LineState,
        code: KeyCode,
        term: &mut dyn Write,
        history: &mut History,
    ) -> EventResult {
        early_return_if_not_rendering!(line_state @None);

        match code {
            KeyCode::Enter => handle_enter(line_state, term, history),
            KeyCode::Backspace => handle_backspace(line_state, term),
            KeyCode::Delete => handle_delete(line_state, term),
            KeyCode::Left => move_cursor_and_flush(line_state, term, -1),
            KeyCode::Right => move_cursor_and_flush(line_state, term, 1),
            KeyCode::Home => move_cursor_and_flush(line_state, term, -100_000),
            KeyCode::End => move_cursor_and_flush(line_state, term, 100_000),
            KeyCode::Up => {
                let entry = history.search_next().map(str::to_string);
                replace_line(line_state, term, entry)
            }
            KeyCode::Down => {
                let entry = history.search_previous().map(str::to_string);
                replace_line(line_state, term, entry)
            }
            KeyCode::Char(c) => handle_char(line_state, term, c),
            _ => Ok(None),
        }
    }

    // End of transmission, or delete forward when there is text.
    fn handle_ctrl_d(line_state: &mut LineState, term: &mut dyn Write) -> EventResult {
        if !line_state.line.is_empty() {
            return handle_delete(line_state, term);
        }
        line_state.clear(term)?;
        term.queue(cursor::MoveToColumn(0))?;
        term.flush()?;
        Ok(Some(LineEditEvent::Eof))
    }

    // Show what was abandoned, then start over on a fresh prompt.
    fn handle_ctrl_c(line_state: &mut LineState, term: &mut dyn Write) -> EventResult {
        line_state.move_cursor(100_000);
        line_state.clear(term)?;
        write!(term, "{}{}^C\r\n", line_state.prompt, line_state.line)?;
        line_state.line.clear();
        line_state.move_cursor(-100_000);
        line_state.render_and_flush(term)?;
        Ok(Some(LineEditEvent::Interrupted))
    }

    // Clear screen.
    fn handle_ctrl_l(line_state: &mut LineState, term: &mut dyn Write) -> EventResult {
        term.queue(Clear(All))?.queue(cursor::MoveTo(0, 0))?;
        line_state.render_and_flush(term)?;
        Ok(None)
    }

    // Clear to start.
    fn handle_ctrl_u(line_state: &mut LineState, term: &mut dyn Write) -> EventResult {
        if let Some((pos, str)) = line_state.current_grapheme() {
            let pos = pos + str.len();
            line_state.clear(term)?;
            line_state.line.drain(0..pos);
            line_state.move_cursor(-100_000);
            line_state.render_and_flush(term)?;
        }
        Ok(None)
    }

    // Clear to end.
    fn handle_ctrl_k(line_state: &mut LineState, term: &mut dyn Write) -> EventResult {
        if let Some((pos, _)) = line_state.next_grapheme() {
            line_state.clear(term)?;
            line_state.line.truncate(pos);
            line_state.render_and_flush(term)?;
        }
        Ok(None)
    }

    // Clear last word.
    fn handle_ctrl_w(line_state: &mut LineState, term: &mut dyn Write) -> EventResult {
        let count = line_state.line.graphemes(true).count();
        let skip_count = count - line_state.line_cursor_grapheme;
        let start_grapheme = line_state
            .line
            .graphemes(true)
            .rev()
            .skip(skip_count)
            .enumerate()
            .skip_while(|(_, str)| *str == " ")
            .find(|(_, str)| *str == " ")
            .map_or(0, |(offset, _)| line_state.line_cursor_grapheme - offset);
        let removed = line_state.line_cursor_grapheme - start_grapheme;
        if removed == 0 {
            return Ok(None);
        }

        let start = byte_offset(&line_state.line, start_grapheme);
        let end = byte_offset(&line_state.line, line_state.line_cursor_grapheme);

        line_state.clear(term)?;
        line_state.line.drain(start..end);
        line_state.move_cursor(-isize::try_from(removed).unwrap_or(isize::MAX));
        line_state.render_and_flush(term)?;
        Ok(None)
    }

    fn byte_offset(line: &str, grapheme_index: usize) -> usize {
        line.grapheme_indices(true)
            .nth(grapheme_index)
            .map_or(line.len(), |(pos, _)| pos)
    }

    // Echo the finished line and leave the cursor on the next row.
    fn handle_enter(
        line_state: &mut LineState,
        term: &mut dyn Write,
        history: &mut History,
    ) -> EventResult {
        line_state.clear(term)?;
        write!(term, "{}{}\r\n", line_state.prompt, line_state.line)?;
        term.flush()?;

        let line = std::mem::take(&mut line_state.line);
        line_state.move_cursor(-100_000);
        line_state.end_read();
        history.reset_position();

        Ok(Some(LineEditEvent::Line(line)))
    }

    fn handle_backspace(line_state: &mut LineState, term: &mut dyn Write) -> EventResult {
        if let Some((pos, str)) = line_state.current_grapheme() {
            let len = pos + str.len();
            line_state.clear(term)?;
            line_state.line.replace_range(pos..len, "");
            line_state.move_cursor(-1);
            line_state.render_and_flush(term)?;
        }
        Ok(None)
    }

    fn handle_delete(line_state: &mut LineState, term: &mut dyn Write) -> EventResult {
        if let Some((pos, str)) = line_state.next_grapheme() {
            let len = pos + str.len();
            line_state.clear(term)?;
            line_state.line.replace_range(pos..len, "");
            line_state.render_and_flush(term)?;
        }
        Ok(None)
    }

    fn move_cursor_and_flush(
        line_state: &mut LineState,
        term: &mut dyn Write,
        change: isize,
    ) -> EventResult {
        line_state.reset_cursor(term)?;
        line_state.move_cursor(change);
        line_state.set_cursor(term)?;
        term.flush()?;
        Ok(None)
    }

    fn replace_line(
        line_state: &mut LineState,
        term: &mut dyn Write,
        maybe_entry: Option<String>,
    ) -> EventResult {
        if let Some(entry) = maybe_entry {
            line_state.clear(term)?;
            line_state.line = entry;
            line_state.move_cursor(100_000);
            line_state.render_and_flush(term)?;
        }
        Ok(None)
    }

    fn handle_char(line_state: &mut LineState, term: &mut dyn Write, c: char) -> EventResult {
        line_state.clear(term)?;

        let (g_pos, g_str) = line_state.current_grapheme().unwrap_or((0, ""));
        let pos = g_pos + g_str.len();
        let count_before = line_state.line.graphemes(true).count();
        line_state.line.insert(pos, c);

        // A combining character joins the previous grapheme instead of adding one.
        if line_state.line.graphemes(true).count() > count_before {
            line_state.move_cursor(1);
        } else {
            line_state.move_cursor(0);
        }

        line_state.render_and_flush(term)?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;
    use emu_test_fixtures::StdoutMock;
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> Event { Event::Key(KeyEvent::new(code, KeyModifiers::NONE)) }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn reading_line_state(prompt: &str, stdout_mock: &mut StdoutMock) -> LineState {
        let mut line_state = LineState::new(String::new(), (100, 100));
        line_state.begin_read(prompt, stdout_mock).unwrap();
        line_state
    }

    fn type_text(
        line_state: &mut LineState,
        text: &str,
        stdout_mock: &mut StdoutMock,
        history: &mut History,
    ) {
        for c in text.chars() {
            line_state
                .apply_event_and_render(&key(KeyCode::Char(c)), stdout_mock, history)
                .unwrap();
        }
    }

    #[test]
    fn test_add_char() {
        let mut stdout_mock = StdoutMock::default();
        let mut history = History::default();
        let mut line_state = reading_line_state("emu> ", &mut stdout_mock);

        let it = line_state
            .apply_event_and_render(&key(KeyCode::Char('a')), &mut stdout_mock, &mut history)
            .unwrap();

        assert_eq!(it, None);
        assert_eq!(line_state.line, "a");
        assert_eq!(line_state.current_column, 6);
    }

    #[test]
    fn test_move_cursor_and_edit_in_the_middle() {
        let mut stdout_mock = StdoutMock::default();
        let mut history = History::default();
        let mut line_state = reading_line_state("> ", &mut stdout_mock);
        type_text(&mut line_state, "reet()", &mut stdout_mock, &mut history);

        for _ in 0..4 {
            line_state
                .apply_event_and_render(&key(KeyCode::Left), &mut stdout_mock, &mut history)
                .unwrap();
        }
        type_text(&mut line_state, "s", &mut stdout_mock, &mut history);
        assert_eq!(line_state.line, "reset()");
        assert_eq!(line_state.line_cursor_grapheme, 3);

        line_state
            .apply_event_and_render(&key(KeyCode::Backspace), &mut stdout_mock, &mut history)
            .unwrap();
        assert_eq!(line_state.line, "reet()");

        line_state
            .apply_event_and_render(&ctrl('k'), &mut stdout_mock, &mut history)
            .unwrap();
        assert_eq!(line_state.line, "re");

        line_state
            .apply_event_and_render(&ctrl('u'), &mut stdout_mock, &mut history)
            .unwrap();
        assert_eq!(line_state.line, "");
    }

    #[test]
    fn test_ctrl_w_deletes_previous_word() {
        let mut stdout_mock = StdoutMock::default();
        let mut history = History::default();
        let mut line_state = reading_line_state("> ", &mut stdout_mock);
        type_text(&mut line_state, "print(1) fps(", &mut stdout_mock, &mut history);

        line_state
            .apply_event_and_render(&ctrl('w'), &mut stdout_mock, &mut history)
            .unwrap();

        assert_eq!(line_state.line, "print(1) ");
        assert_eq!(line_state.line_cursor_grapheme, 9);
    }

    #[test]
    fn test_enter_returns_line_and_ends_read() {
        let mut stdout_mock = StdoutMock::default();
        let mut history = History::default();
        let mut line_state = reading_line_state("emu> ", &mut stdout_mock);
        type_text(&mut line_state, "help()", &mut stdout_mock, &mut history);

        let it = line_state
            .apply_event_and_render(&key(KeyCode::Enter), &mut stdout_mock, &mut history)
            .unwrap();

        assert_eq!(it, Some(LineEditEvent::Line("help()".into())));
        assert!(!line_state.is_reading);
        assert!(
            stdout_mock
                .get_copy_of_buffer_as_string()
                .ends_with("emu> help()\r\n")
        );
    }

    #[test]
    fn test_ctrl_d_on_empty_line_is_eof() {
        let mut stdout_mock = StdoutMock::default();
        let mut history = History::default();
        let mut line_state = reading_line_state("emu> ", &mut stdout_mock);

        let it = line_state
            .apply_event_and_render(&ctrl('d'), &mut stdout_mock, &mut history)
            .unwrap();
        assert_eq!(it, Some(LineEditEvent::Eof));
    }

    #[test]
    fn test_ctrl_d_with_text_deletes_forward() {
        let mut stdout_mock = StdoutMock::default();
        let mut history = History::default();
        let mut line_state = reading_line_state("emu> ", &mut stdout_mock);
        type_text(&mut line_state, "ab", &mut stdout_mock, &mut history);
        line_state
            .apply_event_and_render(&key(KeyCode::Home), &mut stdout_mock, &mut history)
            .unwrap();

        let it = line_state
            .apply_event_and_render(&ctrl('d'), &mut stdout_mock, &mut history)
            .unwrap();
        assert_eq!(it, None);
        assert_eq!(line_state.line, "b");
    }

    #[test]
    fn test_ctrl_c_discards_line_and_keeps_reading() {
        let mut stdout_mock = StdoutMock::default();
        let mut history = History::default();
        let mut line_state = reading_line_state("emu> ", &mut stdout_mock);
        type_text(&mut line_state, "oops", &mut stdout_mock, &mut history);

        let it = line_state
            .apply_event_and_render(&ctrl('c'), &mut stdout_mock, &mut history)
            .unwrap();

        assert_eq!(it, Some(LineEditEvent::Interrupted));
        assert_eq!(line_state.line, "");
        assert!(line_state.is_reading);
        assert!(
            stdout_mock
                .get_copy_of_buffer_as_string()
                .contains("emu> oops^C\r\nemu> ")
        );
    }

    #[test]
    fn test_history_navigation() {
        let mut stdout_mock = StdoutMock::default();
        let mut history = History::default();
        history.update("reset()");
        history.update("fps(25)");
        let mut line_state = reading_line_state("emu> ", &mut stdout_mock);

        line_state
            .apply_event_and_render(&key(KeyCode::Up), &mut stdout_mock, &mut history)
            .unwrap();
        assert_eq!(line_state.line, "fps(25)");

        line_state
            .apply_event_and_render(&key(KeyCode::Up), &mut stdout_mock, &mut history)
            .unwrap();
        assert_eq!(line_state.line, "reset()");

        line_state
            .apply_event_and_render(&key(KeyCode::Down), &mut stdout_mock, &mut history)
            .unwrap();
        assert_eq!(line_state.line, "fps(25)");
        assert_eq!(line_state.line_cursor_grapheme, 7);
    }

    #[test]
    fn test_discard_suspends_until_redraw() {
        let mut stdout_mock = StdoutMock::default();
        let mut history = History::default();
        let mut line_state = reading_line_state("emu> ", &mut stdout_mock);
        type_text(&mut line_state, "half typed", &mut stdout_mock, &mut history);

        line_state.discard(&mut stdout_mock).unwrap();
        assert_eq!(line_state.line, "");
        assert!(line_state.liveness.is_suspended());

        // Ignored while suspended.
        stdout_mock.clear();
        type_text(&mut line_state, "x", &mut stdout_mock, &mut history);
        assert_eq!(line_state.line, "");
        assert!(stdout_mock.get_copy_of_buffer().is_empty());

        line_state.redraw(&mut stdout_mock).unwrap();
        assert!(!line_state.liveness.is_suspended());
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string_strip_ansi(), "emu> ");
    }

    #[test]
    fn test_redraw_without_read_in_progress_renders_nothing() {
        let mut stdout_mock = StdoutMock::default();
        let mut line_state = LineState::new("emu> ".into(), (80, 24));

        line_state.redraw(&mut stdout_mock).unwrap();

        assert!(stdout_mock.get_copy_of_buffer().is_empty());
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut stdout_mock = StdoutMock::default();
        let mut history = History::default();
        let mut line_state = reading_line_state("emu> ", &mut stdout_mock);

        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('z'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        let it = line_state
            .apply_event_and_render(&release, &mut stdout_mock, &mut history)
            .unwrap();

        assert_eq!(it, None);
        assert_eq!(line_state.line, "");
    }

    #[test]
    fn test_resize_rerenders() {
        let mut stdout_mock = StdoutMock::default();
        let mut history = History::default();
        let mut line_state = reading_line_state("emu> ", &mut stdout_mock);

        let it = line_state
            .apply_event_and_render(&Event::Resize(40, 10), &mut stdout_mock, &mut history)
            .unwrap();

        assert_eq!(it, Some(LineEditEvent::Resized));
        assert_eq!(line_state.term_size, (40, 10));
    }
}
