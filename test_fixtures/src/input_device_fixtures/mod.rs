// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod stdin_mock;

// Re-export.
pub use stdin_mock::*;
