// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Syntactic sugar for `Ok(())` or `Ok(value)`.
///
/// ```
/// use emu_console::ok;
///
/// fn it_works() -> std::io::Result<u8> { ok!(42) }
/// fn it_also_works() -> std::io::Result<()> { ok!() }
/// # assert_eq!(it_works().unwrap(), 42);
/// # assert!(it_also_works().is_ok());
/// ```
#[macro_export]
macro_rules! ok {
    // No args.
    () => {
        Ok(())
    };
    // With arg.
    ($value:expr) => {
        Ok($value)
    };
}

/// Macro to simplify locking and getting a mutable reference to the output device.
/// Don't call this again in the same scope, it will deadlock! A safe approach is to use
/// this macro in a separate block scope.
///
/// The terminal device lock is the outermost lock in this crate. Take it first, then
/// [`crate::PromptState`], then the line editor state.
///
/// ```
/// use std::io::Write;
/// use emu_console::{lock_output_device_as_mut, LockedOutputDevice, OutputDevice};
/// let device = OutputDevice::new_stdout();
/// { // Start a new block scope to avoid deadlock.
///     let mut_ref: LockedOutputDevice<'_> = lock_output_device_as_mut!(device);
///     let _ = mut_ref.write_all(b"Hello, world!\n");
/// } // The lock is released here.
/// ```
#[macro_export]
macro_rules! lock_output_device_as_mut {
    ($device:expr) => {
        &mut *$device.lock()
    };
}

/// Format a message and print it through [`crate::Application::print_msg()`], which routes
/// it to whatever [`crate::MessageOutput`] is currently registered.
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use emu_console::{print_msg, Application};
/// let app = Application::new(false);
/// print_msg!(app, "wrote snapshot {:?}", "game.snap");
/// # }
/// ```
#[macro_export]
macro_rules! print_msg {
    ($app:expr, $($format:tt)*) => {
        $app.print_msg(&format!($($format)*))
    };
}
