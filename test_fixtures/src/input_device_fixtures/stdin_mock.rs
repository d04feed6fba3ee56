// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::VecDeque,
          io::{Read, Result},
          sync::mpsc::{Receiver, Sender, channel}};

/// A [Read] implementation that behaves like a pipe. [`Read::read()`] blocks until the
/// paired [`StdinFeeder`] sends more bytes, and returns `Ok(0)` (end of input) once the
/// feeder has been dropped and everything it sent has been consumed.
///
/// Wrap it in a [`std::io::BufReader`] to drive a line based reader from a test.
#[derive(Debug)]
pub struct StdinMock {
    receiver: Receiver<Vec<u8>>,
    pending: VecDeque<u8>,
}

/// The sending half of a [`StdinMock`]. Dropping it closes the pipe.
#[derive(Debug, Clone)]
pub struct StdinFeeder {
    sender: Sender<Vec<u8>>,
}

impl StdinMock {
    #[must_use]
    pub fn new() -> (Self, StdinFeeder) {
        let (sender, receiver) = channel();
        (
            Self {
                receiver,
                pending: VecDeque::new(),
            },
            StdinFeeder { sender },
        )
    }
}

impl StdinFeeder {
    /// Sends `line` followed by a newline. Returns `false` if the reader is gone.
    pub fn feed_line(&self, line: &str) -> bool {
        let mut bytes = line.as_bytes().to_vec();
        bytes.push(b'\n');
        self.feed_bytes(bytes)
    }

    /// Sends raw bytes. Returns `false` if the reader is gone.
    pub fn feed_bytes(&self, bytes: Vec<u8>) -> bool { self.sender.send(bytes).is_ok() }
}

impl Read for StdinMock {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while self.pending.is_empty() {
            match self.receiver.recv() {
                Ok(bytes) => self.pending.extend(bytes),
                // Feeder dropped.
                Err(_) => return Ok(0),
            }
        }

        let count = buf.len().min(self.pending.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..count)) {
            *slot = byte;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use std::{io::{BufRead, BufReader},
              thread,
              time::Duration};

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_reads_fed_lines_then_eof() {
        let (stdin_mock, feeder) = StdinMock::new();
        let mut reader = BufReader::new(stdin_mock);

        assert!(feeder.feed_line("reset()"));
        assert!(feeder.feed_line("fps(50)"));
        drop(feeder);

        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        assert_eq!(line, "reset()\n");

        line.clear();
        reader.read_line(&mut line).unwrap();
        assert_eq!(line, "fps(50)\n");

        line.clear();
        assert_eq!(reader.read_line(&mut line).unwrap(), 0);
    }

    #[test]
    fn test_read_blocks_until_fed() {
        let (stdin_mock, feeder) = StdinMock::new();

        let join_handle = thread::spawn(move || {
            let mut reader = BufReader::new(stdin_mock);
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            line
        });

        thread::sleep(Duration::from_millis(20));
        assert!(!join_handle.is_finished());

        feeder.feed_line("late");
        assert_eq!(join_handle.join().unwrap(), "late\n");
    }

    #[test]
    fn test_small_buffer_reads_are_split() {
        let (mut stdin_mock, feeder) = StdinMock::new();
        feeder.feed_bytes(b"abcdef".to_vec());

        let mut buf = [0_u8; 4];
        assert_eq!(stdin_mock.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"abcd");
        assert_eq!(stdin_mock.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ef");
    }
}
