// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{self, Write};

use crate::{Application, OutputDevice, lock_output_device_as_mut, ok};

/// A sink for whole messages. Implementations must be safe to call from any thread, and
/// each call must come out as one uninterrupted block of text.
pub trait MessageOutput: Send + Sync {
    fn print_msg(&self, text: &str);
}

/// Writes `text` to `term`, making sure it ends with a newline. Every `\n` is written as
/// `\r\n`, so the text also lines up when the terminal is in raw mode.
///
/// # Errors
///
/// If writing to `term` fails.
pub fn write_message_block(term: &mut dyn Write, text: &str) -> io::Result<()> {
    for line in text.split_inclusive('\n') {
        match line.strip_suffix('\n') {
            Some(content) => {
                term.write_all(content.as_bytes())?;
                term.write_all(b"\r\n")?;
            }
            None => term.write_all(line.as_bytes())?,
        }
    }
    if !text.ends_with('\n') {
        term.write_all(b"\r\n")?;
    }
    ok!()
}

/// The sink an [`Application`] starts with. It knows nothing about prompts, it just
/// serializes messages on the output device lock.
#[allow(missing_debug_implementations)]
pub struct StdoutMessageOutput {
    output_device: OutputDevice,
}

impl StdoutMessageOutput {
    #[must_use]
    pub fn new(output_device: OutputDevice) -> Self { Self { output_device } }
}

impl MessageOutput for StdoutMessageOutput {
    fn print_msg(&self, text: &str) {
        let term = lock_output_device_as_mut!(self.output_device);
        // Nowhere left to report a failed write to.
        let _ = write_message_block(term, text).and_then(|()| term.flush());
    }
}

/// Cloneable object that implements [`Write`] and forwards whole lines to
/// [`Application::print_msg()`]. This is what the tracing display layer writes to, so log
/// output goes through the same serialized sink as every other message and never
/// corrupts the prompt.
///
/// # Nothing is output without terminating with a newline, unless you call [`MessageWriter::flush()`]
///
/// Bytes are buffered until a line feed (`'\n'`) is written.
#[derive(Debug)]
pub struct MessageWriter {
    /// Holds the data that has not been forwarded yet.
    pub buffer: Vec<u8>,
    app: Application,
}

impl MessageWriter {
    #[must_use]
    pub fn new(app: Application) -> Self {
        Self {
            buffer: Vec::new(),
            app,
        }
    }

    fn forward_buffer(&mut self) {
        let text = String::from_utf8_lossy(&self.buffer);
        let text = text.strip_suffix('\n').unwrap_or(&text);
        self.app.print_msg(text);
        self.buffer.clear();
    }
}

/// Each clone gets its own empty buffer, but prints through the same application.
impl Clone for MessageWriter {
    fn clone(&self) -> Self { Self::new(self.app.clone()) }
}

impl Write for MessageWriter {
    fn write(&mut self, payload: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(payload);
        if self.buffer.ends_with(b"\n") {
            self.forward_buffer();
        }
        Ok(payload.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buffer.is_empty() {
            self.forward_buffer();
        }
        ok!()
    }
}
