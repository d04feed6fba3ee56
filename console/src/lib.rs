// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! An interactive command console for a long running process, such as an emulator.
//!
//! The console reads lines from the user and evaluates each one as Lua, against a single
//! session that lives as long as the console. Meanwhile the owning [`Application`] can
//! pause the console or terminate it at any time, and any thread can print messages
//! without corrupting the line the user is typing.
//!
//! # How the pieces fit
//!
//! 1. [`Application`] owns the lifecycle. It sends pause and terminate requests to every
//!    registered [`EventLoop`], and waits for each to acknowledge.
//! 2. [`Console`] is one such event loop. Blocking reads happen on a dedicated reader
//!    thread using a [`LineEditor`], and lines are handed over one at a time.
//! 3. [`ConsoleMessageOutput`] is registered as the application's [`MessageOutput`]
//!    while the console runs. It erases the prompt, prints, and redraws the prompt, all
//!    while holding the terminal lock.
//! 4. [`SignalRouter`] keeps the terminal usable when the process is sent a signal in the
//!    middle of a read.
//!
//! # Running a console
//!
//! ```no_run
//! use emu_console::{Application, ConsoleConfig, ConsoleInstanceRegistry, ConsoleIo,
//!                   OutputDevice, new_line_editor_for_stdin, new_lua_console,
//!                   spawn_simulated_machine};
//! use miette::IntoDiagnostic;
//!
//! # #[tokio::main]
//! # async fn main() -> miette::Result<()> {
//! let app = Application::new(false);
//! let (machine, _machine_thread) = spawn_simulated_machine(app.clone()).into_diagnostic()?;
//! let output_device = OutputDevice::new_stdout();
//! let io = ConsoleIo {
//!     editor: new_line_editor_for_stdin(output_device.clone()),
//!     output_device,
//! };
//! let console = new_lua_console(
//!     ConsoleInstanceRegistry::global(),
//!     app.clone(),
//!     ConsoleConfig::default(),
//!     machine,
//!     io,
//! )
//! .into_diagnostic()?;
//! console.run().await.into_diagnostic()?;
//! app.await_termination().await;
//! # Ok(())
//! # }
//! ```

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod app;
pub mod clap_config;
pub mod commands;
pub mod console;
pub mod decl_macros;
pub mod editor;
pub mod error;
pub mod eval;
pub mod machine;
pub mod terminal_io;
pub mod tracing_logging;

// Re-export.
pub use app::*;
pub use clap_config::*;
pub use commands::*;
pub use console::*;
pub use editor::*;
pub use error::*;
pub use eval::*;
pub use machine::*;
pub use terminal_io::*;
pub use tracing_logging::*;
