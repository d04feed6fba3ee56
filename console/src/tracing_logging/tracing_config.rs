// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::{Debug, Formatter};

use tracing_core::LevelFilter;

use crate::Application;

pub const DEFAULT_LOG_FILE_PATH: &str = "log.txt";

/// Where logs go, and how much of them. Pass it to [`crate::init_tracing()`].
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub writer_config: WriterConfig,
    pub level_filter: LevelFilter,
}

#[derive(Debug, Clone)]
pub enum WriterConfig {
    None,
    Display(DisplayPreference),
    File(String /* log file path */),
    DisplayAndFile(DisplayPreference, String /* log file path */),
}

#[derive(Clone)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
    /// Each log line becomes one [`Application::print_msg()`] call.
    MessageOutput(Application),
}

impl Debug for DisplayPreference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayPreference::Stdout => write!(f, "Stdout"),
            DisplayPreference::Stderr => write!(f, "Stderr"),
            DisplayPreference::MessageOutput(_) => write!(f, "MessageOutput"),
        }
    }
}

impl TracingConfig {
    /// Picks the writers from the two command line switches. Logging is off unless one of
    /// them is set.
    #[must_use]
    pub fn new(
        log_to_file: bool,
        log_to_display: Option<DisplayPreference>,
        level_filter: LevelFilter,
    ) -> Self {
        let file_path = DEFAULT_LOG_FILE_PATH.to_string();
        let writer_config = match (log_to_file, log_to_display) {
            (true, Some(display)) => WriterConfig::DisplayAndFile(display, file_path),
            (true, None) => WriterConfig::File(file_path),
            (false, Some(display)) => WriterConfig::Display(display),
            (false, None) => WriterConfig::None,
        };
        Self {
            writer_config,
            level_filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_config_from_switches() {
        let level_filter = LevelFilter::INFO;
        assert!(matches!(
            TracingConfig::new(false, None, level_filter).writer_config,
            WriterConfig::None
        ));
        assert!(matches!(
            TracingConfig::new(true, None, level_filter).writer_config,
            WriterConfig::File(path) if path == DEFAULT_LOG_FILE_PATH
        ));
        assert!(matches!(
            TracingConfig::new(false, Some(DisplayPreference::Stderr), level_filter)
                .writer_config,
            WriterConfig::Display(DisplayPreference::Stderr)
        ));
        assert!(matches!(
            TracingConfig::new(true, Some(DisplayPreference::Stdout), level_filter)
                .writer_config,
            WriterConfig::DisplayAndFile(DisplayPreference::Stdout, _)
        ));
    }
}
