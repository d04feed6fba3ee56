// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The interactive console.
//!
//! Three units cooperate while a console runs:
//! 1. The control loop, on the task that called [`Console::run()`]. It answers pause and
//!    terminate requests from the [`crate::Application`] and evaluates lines.
//! 2. The reader thread, which owns the [`crate::LineEditor`] and is the only place that
//!    blocks on input. It hands over one line at a time and waits for an acknowledgment
//!    before reading the next.
//! 3. The [`SignalRouter`] thread, active while a read can be outstanding.
//!
//! All three, and any other thread that prints through the application, write to the
//! terminal only while holding the [`crate::OutputDevice`] lock. Locks are always taken
//! in this order: output device, [`PromptState`], line editor state.

// Attach sources.
pub mod console_config;
pub mod console_impl;
pub mod control_loop;
pub mod instance_registry;
pub mod line_reader;
pub mod output_serializer;
pub mod prompt_state;
pub mod signal_router;

// Re-export.
pub use console_config::*;
pub use console_impl::*;
pub use control_loop::*;
pub use instance_registry::*;
pub use line_reader::*;
pub use output_serializer::*;
pub use prompt_state::*;
pub use signal_router::*;
