// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io, path::PathBuf};

/// Failures reported by an [`crate::EvalEngine`]. The [`crate::Evaluator`] turns these into
/// printed diagnostics, so the console loop never sees them.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("compile error: {0}")]
    Compile(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}

/// Failures while loading and running a script file from the script folder.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("can't read script {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("script {path:?} failed: {source}")]
    Eval {
        path: PathBuf,
        #[source]
        source: EvalError,
    },
}

/// Failures reported by the controlled machine. They are printed by the command that
/// triggered them and never abort the console.
#[derive(Debug, thiserror::Error)]
pub enum MachineError {
    #[error("the machine is no longer running")]
    Disconnected,

    #[error("invalid snapshot: {0}")]
    Snapshot(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors that escape the console. Only the single instance check and the startup script
/// can stop a console before its read loop begins.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("running multiple consoles in one process is unsupported")]
    MultipleConsoles,

    #[error("startup script failed")]
    StartupScript(#[source] ScriptError),

    #[error("can't set up the evaluation engine: {0}")]
    Engine(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
