// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::VecDeque;

use super::HISTORY_SIZE_MAX;

/// Submitted lines, newest first, for Up/Down navigation in [`super::TermLineEditor`].
#[derive(Debug)]
pub struct History {
    pub entries: VecDeque<String>,
    pub max_size: usize,
    current_position: Option<usize>,
}

impl Default for History {
    fn default() -> Self { Self::new(HISTORY_SIZE_MAX) }
}

impl History {
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::default(),
            max_size,
            current_position: None,
        }
    }
}

impl History {
    /// Adds a line. Empty lines and repeats of the newest entry are skipped.
    pub fn update(&mut self, line: &str) {
        if line.is_empty() || self.entries.front().is_some_and(|it| it == line) {
            return;
        }

        self.entries.push_front(line.to_string());

        // Reset offset to newest entry.
        self.current_position = None;

        if self.entries.len() > self.max_size {
            self.entries.pop_back();
        }
    }

    /// Forget the navigation position, so the next Up starts at the newest entry.
    pub fn reset_position(&mut self) { self.current_position = None; }

    /// Step to an older entry (Up).
    pub fn search_next(&mut self) -> Option<&str> {
        if let Some(index) = &mut self.current_position {
            if *index < self.entries.len() - 1 {
                *index += 1;
            }
            Some(&self.entries[*index])
        } else if !self.entries.is_empty() {
            self.current_position = Some(0);
            Some(&self.entries[0])
        } else {
            None
        }
    }

    /// Step to a newer entry (Down). Stepping past the newest entry yields an empty line.
    pub fn search_previous(&mut self) -> Option<&str> {
        if let Some(index) = &mut self.current_position {
            if *index == 0 {
                self.current_position = None;
                return Some("");
            }
            *index -= 1;
            Some(&self.entries[*index])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_update() {
        let mut history = History::new(2);
        history.update("reset()");
        assert_eq!(history.entries.front(), Some(&"reset()".to_string()));

        history.update("");
        assert_eq!(history.entries.len(), 1);

        history.update("reset()");
        assert_eq!(history.entries.len(), 1);

        history.update("fps(50)");
        assert_eq!(history.entries.front(), Some(&"fps(50)".to_string()));
        assert_eq!(history.entries.len(), 2);

        history.update("sound(true)");
        assert_eq!(history.entries.len(), 2);
        assert!(history.entries.contains(&"fps(50)".to_string()));
        assert!(history.entries.contains(&"sound(true)".to_string()));
    }

    #[test]
    fn test_search_next() {
        let mut history = History::new(2);
        history.update("test1");
        history.update("test2");
        history.update("test3");

        assert_eq!(history.search_next(), Some("test3"));
        assert_eq!(history.search_next(), Some("test2"));
        assert_eq!(history.search_next(), Some("test2"));
    }

    #[test]
    fn test_search_previous() {
        let mut history = History::new(2);
        history.update("test1");
        history.update("test2");
        history.update("test3");

        assert_eq!(history.search_previous(), None);
        assert_eq!(history.search_next(), Some("test3"));
        assert_eq!(history.search_previous(), Some(""));
        assert_eq!(history.search_previous(), None);
    }

    #[test]
    fn test_reset_position() {
        let mut history = History::default();
        history.update("old");
        history.update("new");

        assert_eq!(history.search_next(), Some("new"));
        assert_eq!(history.search_next(), Some("old"));
        history.reset_position();
        assert_eq!(history.search_next(), Some("new"));
    }
}
