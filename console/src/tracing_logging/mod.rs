// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Tracing setup for the console binary. Logs can go to a file, to the display, or both.
//! Display output is routed through [`crate::Application::print_msg()`], so log lines
//! never land in the middle of the prompt.

// Attach sources.
pub mod rolling_file_appender_impl;
pub mod tracing_config;
pub mod tracing_setup;
pub mod writer_config;

// Re-export.
pub use tracing_config::*;
pub use tracing_setup::*;
pub use writer_config::*;
