// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::{Path, PathBuf};

use super::{EvalEngine, ScriptRequirement, read_script, script_path};
use crate::{Application, EvalError, ScriptError};

/// Runs console input against one persistent [`EvalEngine`] session. Errors from
/// [`Evaluator::run()`] are printed through the [`Application`] and never reach the
/// caller.
#[derive(Debug)]
pub struct Evaluator<E> {
    engine: E,
    app: Application,
    script_dir: PathBuf,
}

impl<E: EvalEngine> Evaluator<E> {
    pub fn new(engine: E, app: Application, script_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            app,
            script_dir: script_dir.into(),
        }
    }

    pub fn engine(&self) -> &E { &self.engine }

    pub fn script_dir(&self) -> &Path { &self.script_dir }

    /// # Errors
    ///
    /// The compile or runtime error, if any. A compile error means nothing ran.
    pub fn try_run(&self, source: &str) -> Result<(), EvalError> {
        let executable = self.engine.compile(source)?;
        self.engine.execute(executable)
    }

    /// Like [`Evaluator::try_run()`], but the error is printed instead of returned.
    pub fn run(&self, source: &str) {
        if let Err(error) = self.try_run(source) {
            self.app.print_msg(&error.to_string());
        }
    }

    /// Evaluates `<script_dir>/<name>.lua`.
    ///
    /// # Errors
    ///
    /// [`ScriptError::Read`] if the script can't be read (a missing optional script is
    /// fine), or [`ScriptError::Eval`] if it fails.
    pub fn run_script(
        &self,
        name: &str,
        requirement: ScriptRequirement,
    ) -> Result<(), ScriptError> {
        let path = script_path(&self.script_dir, name);
        let Some(source) = read_script(&path, requirement)? else {
            tracing::debug!(message = "evaluator: optional script not found", ?path);
            return Ok(());
        };
        self.try_run(&source)
            .map_err(|source| ScriptError::Eval { path, source })
    }
}
