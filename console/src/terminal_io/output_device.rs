// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use super::{SafeRawTerminal, SendRawTerminal, StdMutex};

pub type LockedOutputDevice<'a> = &'a mut dyn std::io::Write;

/// This struct represents the terminal that the console renders to.
/// - It is safe to clone, all clones share one mutex.
/// - That mutex is the global output lock. Every write to the terminal, whether it comes
///   from the line editor, a signal handler, or [`crate::ConsoleMessageOutput`], happens
///   while holding it.
/// - To write to it, see [`Self::lock()`] or the [`crate::lock_output_device_as_mut`]
///   macro.
#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct OutputDevice {
    pub resource: SafeRawTerminal,
    pub is_mock: bool,
}

impl Default for OutputDevice {
    fn default() -> Self { Self::new_stdout() }
}

impl OutputDevice {
    #[must_use]
    pub fn new_stdout() -> Self {
        Self {
            resource: Arc::new(StdMutex::new(std::io::stdout())),
            is_mock: false,
        }
    }

    /// Wrap any writer, usually a `StdoutMock` from the test fixtures crate.
    #[must_use]
    pub fn new_mock(writer: impl std::io::Write + Send + 'static) -> Self {
        Self {
            resource: Arc::new(StdMutex::new(writer)),
            is_mock: true,
        }
    }
}

impl OutputDevice {
    /// Locks the output device for writing.
    ///
    /// ```
    /// use std::io::Write;
    /// use emu_console::{OutputDevice, LockedOutputDevice};
    ///
    /// let device = OutputDevice::new_stdout();
    /// let mut_ref: LockedOutputDevice<'_> = &mut *device.lock();
    /// let _ = mut_ref.write_all(b"Hello, world!\n");
    /// ```
    ///
    /// # Panics
    ///
    /// This method will panic if the mutex is poisoned, which can happen if a thread
    /// panics while holding the lock.
    pub fn lock(&self) -> std::sync::MutexGuard<'_, SendRawTerminal> {
        self.resource.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use emu_test_fixtures::StdoutMock;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::lock_output_device_as_mut;

    #[test]
    fn test_stdout_output_device_is_not_mock() {
        let device = OutputDevice::new_stdout();
        assert!(!device.is_mock);
    }

    #[test]
    fn test_clones_share_the_same_writer() {
        let stdout_mock = StdoutMock::default();
        let device = OutputDevice::new_mock(stdout_mock.clone());
        let device_clone = device.clone();
        assert!(device.is_mock);

        {
            let mut_ref: LockedOutputDevice<'_> = lock_output_device_as_mut!(device);
            mut_ref.write_all(b"one ").unwrap();
        }
        {
            let mut_ref: LockedOutputDevice<'_> = lock_output_device_as_mut!(device_clone);
            mut_ref.write_all(b"two").unwrap();
        }

        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "one two");
    }
}
