// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;

pub const DEFAULT_PROMPT: &str = "emu> ";
pub const DEFAULT_SCRIPT_DIRECTORY: &str = "scripts";
pub const DEFAULT_STARTUP_SCRIPT: &str = "startup";

/// Settings for one [`crate::Console`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub prompt: String,
    /// Where `<name>.lua` scripts are looked up.
    pub script_dir: PathBuf,
    /// Required script, run before the first prompt.
    pub startup_script: String,
    /// When input ends, terminate the whole application instead of only the console.
    pub exit_app_if_end_of_input: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.into(),
            script_dir: PathBuf::from(DEFAULT_SCRIPT_DIRECTORY),
            startup_script: DEFAULT_STARTUP_SCRIPT.into(),
            exit_app_if_end_of_input: true,
        }
    }
}
