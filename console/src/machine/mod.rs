// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The machine the console controls. It runs on its own thread and is driven only through
//! [`MachineCommand`]s. Commands that produce a result carry a single use reply channel,
//! which the sender blocks on.

// Attach sources.
pub mod machine_command;
pub mod machine_state;
pub mod simulated_machine;

// Re-export.
pub use machine_command::*;
pub use machine_state::*;
pub use simulated_machine::*;
