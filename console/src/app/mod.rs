// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The long running process that owns the console.
//!
//! An [`Application`] drives every registered [`EventLoop`] through a pause and terminate
//! rendezvous. Each request carries a single use acknowledgment channel, so the caller
//! only continues once the loop has reached a safe state. It also owns the currently
//! registered [`MessageOutput`], which is where every printed message ends up.

// Attach sources.
pub mod application;
pub mod event_loop;
pub mod message_output;

// Re-export.
pub use application::*;
pub use event_loop::*;
pub use message_output::*;

// External crates.
use std::sync::Arc;

// Type aliases.
pub type SharedMessageOutput = Arc<dyn MessageOutput>;
