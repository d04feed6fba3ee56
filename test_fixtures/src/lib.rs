// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Reusable fixtures for testing the `emu_console` crate end to end.
//!
//! 1. [`StdoutMock`] stands in for the terminal. Everything the console renders can be
//!    inspected as a string, with or without ANSI escape sequences.
//! 2. [`StdinMock`] stands in for piped stdin. It blocks like a real pipe until a test
//!    feeds it a line, and reports end of input once the [`StdinFeeder`] is dropped.
//! 3. [`TempDir`] is a scratch folder for scripts and snapshot files, deleted on drop.
//!
//! ```
//! use std::io::Write;
//! use emu_test_fixtures::StdoutMock;
//!
//! let mut stdout_mock = StdoutMock::default();
//! let stdout_mock_clone = stdout_mock.clone(); // Points to the same inner buffer.
//!
//! stdout_mock.write_all(b"hello world").unwrap();
//!
//! assert_eq!(stdout_mock_clone.get_copy_of_buffer_as_string(), "hello world");
//! ```

// Attach sources.
pub mod input_device_fixtures;
pub mod output_device_fixtures;
pub mod temp_dir;

// Re-export.
pub use input_device_fixtures::*;
pub use output_device_fixtures::*;
pub use temp_dir::*;
