// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod builtins;
pub mod command_registry;

// Re-export.
pub use builtins::*;
pub use command_registry::*;
