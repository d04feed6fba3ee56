// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Evaluation of console input and script files.
//!
//! [`EvalEngine`] is the seam between the console and the language it speaks. The
//! [`Evaluator`] owns one engine session for the lifetime of the console, so anything a
//! command defines stays defined for the next one.

// Attach sources.
pub mod evaluator;
pub mod lua_engine;
pub mod script_loader;

// Re-export.
pub use evaluator::*;
pub use lua_engine::*;
pub use script_loader::*;

use crate::EvalError;

/// A persistent evaluation session.
pub trait EvalEngine {
    /// Compiled form of some source text, ready to run in this session.
    type Executable;

    /// # Errors
    ///
    /// [`EvalError::Compile`] if `source` is not valid. Nothing runs in that case.
    fn compile(&self, source: &str) -> Result<Self::Executable, EvalError>;

    /// # Errors
    ///
    /// [`EvalError::Runtime`] if execution fails part way.
    fn execute(&self, executable: Self::Executable) -> Result<(), EvalError>;
}

/// What happens when a script file can't be found.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScriptRequirement {
    /// A missing file is an error.
    Required,
    /// A missing file is skipped silently.
    Optional,
}
