// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{Result, Write},
          sync::{Arc, Mutex}};

use strip_ansi_escapes::strip;

/// You can safely clone this struct, since it only contains an `Arc<Mutex<Vec<u8>>>`.
/// The inner `buffer` will not be cloned, just the [Arc] will be cloned.
///
/// Hand a clone to the code under test (usually wrapped in an `OutputDevice`) and keep
/// one in the test to inspect what was rendered.
#[derive(Clone, Debug, Default)]
pub struct StdoutMock {
    pub buffer: Arc<Mutex<Vec<u8>>>,
}

impl StdoutMock {
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl StdoutMock {
    /// # Panics
    ///
    /// If the buffer lock is poisoned.
    #[must_use]
    pub fn get_copy_of_buffer(&self) -> Vec<u8> { self.buffer.lock().unwrap().clone() }

    /// # Panics
    ///
    /// If the buffer lock is poisoned, or the buffer is not valid UTF-8.
    #[must_use]
    pub fn get_copy_of_buffer_as_string(&self) -> String {
        let buffer_data = self.buffer.lock().unwrap();
        String::from_utf8(buffer_data.clone()).expect("utf8")
    }

    /// # Panics
    ///
    /// If the buffer lock is poisoned, or the buffer is not valid UTF-8.
    #[must_use]
    pub fn get_copy_of_buffer_as_string_strip_ansi(&self) -> String {
        let buffer_data = self.buffer.lock().unwrap();
        let buffer_data = strip(buffer_data.as_slice());
        String::from_utf8(buffer_data).expect("utf8")
    }

    /// Drop everything written so far.
    ///
    /// # Panics
    ///
    /// If the buffer lock is poisoned.
    pub fn clear(&self) { self.buffer.lock().unwrap().clear(); }
}

impl Write for StdoutMock {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> { Ok(()) }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_stdout_mock_no_strip_ansi() {
        let mut stdout_mock = StdoutMock::default();
        let stdout_mock_clone = stdout_mock.clone(); // Points to the same inner value as `stdout_mock`.

        let normal_text = "hello world";

        stdout_mock.write_all(normal_text.as_bytes()).unwrap();
        stdout_mock.flush().unwrap();

        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), normal_text);
        assert_eq!(stdout_mock_clone.get_copy_of_buffer_as_string(), normal_text);
    }

    #[test]
    fn test_stdout_mock_strip_ansi() {
        let mut stdout_mock = StdoutMock::default();
        let stdout_mock_clone = stdout_mock.clone();

        let escaped_text = "\u{1b}[31mhello\u{1b}[0m \u{1b}[2Kworld";

        stdout_mock.write_all(escaped_text.as_bytes()).unwrap();

        assert_eq!(
            stdout_mock_clone.get_copy_of_buffer_as_string_strip_ansi(),
            "hello world"
        );
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), escaped_text);
    }

    #[test]
    fn test_stdout_mock_clear() {
        let mut stdout_mock = StdoutMock::default();
        stdout_mock.write_all(b"discard me").unwrap();
        stdout_mock.clear();
        assert!(stdout_mock.get_copy_of_buffer().is_empty());
    }
}
