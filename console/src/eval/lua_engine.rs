// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::Path;

use mlua::{Function, Lua};

use super::{EvalEngine, ScriptRequirement, read_script};
use crate::{EvalError, ScriptError};

/// Chunk name used in error messages for lines typed at the prompt.
pub const CONSOLE_CHUNK_NAME: &str = "=console";

/// A Lua 5.4 session. Globals defined by one line are visible to the next.
///
/// [`Lua`] is not [`Send`], so neither is this, and the console loop that owns it runs on
/// the task that created it.
#[allow(missing_debug_implementations)]
pub struct LuaEngine {
    lua: Lua,
}

impl Default for LuaEngine {
    fn default() -> Self { Self::new() }
}

impl LuaEngine {
    #[must_use]
    pub fn new() -> Self { Self { lua: Lua::new() } }

    /// The underlying session, for registering native functions.
    #[must_use]
    pub fn lua(&self) -> &Lua { &self.lua }
}

impl EvalEngine for LuaEngine {
    type Executable = Function;

    fn compile(&self, source: &str) -> Result<Function, EvalError> {
        compile_lua(&self.lua, source, CONSOLE_CHUNK_NAME)
    }

    fn execute(&self, executable: Function) -> Result<(), EvalError> {
        execute_lua(&executable)
    }
}

/// # Errors
///
/// [`EvalError::Compile`] on a syntax error.
pub fn compile_lua(lua: &Lua, source: &str, chunk_name: &str) -> Result<Function, EvalError> {
    lua.load(source)
        .set_name(chunk_name)
        .into_function()
        .map_err(|error| EvalError::Compile(error.to_string()))
}

/// # Errors
///
/// [`EvalError::Runtime`] if the chunk raises an error.
pub fn execute_lua(function: &Function) -> Result<(), EvalError> {
    function
        .call::<()>(())
        .map_err(|error| EvalError::Runtime(error.to_string()))
}

/// Loads `path` and runs it in `lua`. This is the path taken by scripts started from
/// inside Lua, where only the callback's `&Lua` is at hand.
///
/// # Errors
///
/// [`ScriptError::Read`] if the file can't be read, [`ScriptError::Eval`] if it fails to
/// compile or run.
pub fn run_lua_script(
    lua: &Lua,
    path: &Path,
    requirement: ScriptRequirement,
) -> Result<(), ScriptError> {
    let Some(source) = read_script(path, requirement)? else {
        return Ok(());
    };
    let chunk_name = format!("@{}", path.display());
    compile_lua(lua, &source, &chunk_name)
        .and_then(|function| execute_lua(&function))
        .map_err(|source| ScriptError::Eval {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use emu_test_fixtures::create_temp_dir;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_session_state_persists_between_lines() {
        let engine = LuaEngine::new();

        let define = engine.compile("counter = 40").unwrap();
        engine.execute(define).unwrap();
        let add = engine.compile("counter = counter + 2").unwrap();
        engine.execute(add).unwrap();

        let counter: i64 = engine.lua().globals().get("counter").unwrap();
        assert_eq!(counter, 42);
    }

    #[test]
    fn test_compile_error_runs_nothing() {
        let engine = LuaEngine::new();

        let result = engine.compile("touched = true; reset(");

        assert!(matches!(result, Err(EvalError::Compile(_))));
        let touched: Option<bool> = engine.lua().globals().get("touched").unwrap();
        assert_eq!(touched, None);
    }

    #[test]
    fn test_runtime_error() {
        let engine = LuaEngine::new();
        let function = engine.compile("undefined_function()").unwrap();

        let Err(EvalError::Runtime(message)) = engine.execute(function) else {
            panic!("expected a runtime error");
        };
        assert!(message.contains("undefined_function"));
    }

    #[test]
    fn test_run_lua_script() {
        let temp_dir = create_temp_dir().unwrap();
        let good = temp_dir.write_file("good.lua", "from_script = 'yes'").unwrap();
        let bad = temp_dir.write_file("bad.lua", "error('boom')").unwrap();
        let engine = LuaEngine::new();

        run_lua_script(engine.lua(), &good, ScriptRequirement::Required).unwrap();
        let from_script: String = engine.lua().globals().get("from_script").unwrap();
        assert_eq!(from_script, "yes");

        let error =
            run_lua_script(engine.lua(), &bad, ScriptRequirement::Required).unwrap_err();
        assert!(matches!(error, ScriptError::Eval { .. }));
        assert!(error.to_string().contains("boom"));

        let missing = temp_dir.path.join("missing.lua");
        assert!(run_lua_script(engine.lua(), &missing, ScriptRequirement::Optional).is_ok());
    }
}
