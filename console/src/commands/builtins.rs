// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The native functions available at the prompt. Each one is a Lua global, and each one
//! does nothing once the application has begun terminating.

use std::{fs, io,
          path::{Path, PathBuf},
          sync::Arc,
          thread,
          time::Duration};

use mlua::{Lua, Variadic};

use super::CommandRegistry;
use crate::{Application, ConsoleError, DisplayScale, LuaEngine, MachineHandle,
            ScriptRequirement, print_msg, run_lua_script, script_path};

/// What the built in commands act on.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub app: Application,
    pub machine: MachineHandle,
    pub script_dir: PathBuf,
}

/// Registers every command in `registry` as a Lua global, and replaces Lua's `print` so
/// its output goes through [`Application::print_msg()`].
///
/// # Errors
///
/// [`ConsoleError::Engine`] if a function can't be registered.
pub fn define_builtin_commands(
    engine: &LuaEngine,
    context: &CommandContext,
    registry: Arc<CommandRegistry>,
) -> Result<(), ConsoleError> {
    define_all(engine.lua(), context, registry)
        .map_err(|error| ConsoleError::Engine(error.to_string()))
}

/// Early return from a command callback while the application is terminating.
macro_rules! return_if_terminating {
    ($app:expr) => {
        if $app.termination_in_progress() {
            return Ok(());
        }
    };
}

fn define_all(
    lua: &Lua,
    context: &CommandContext,
    registry: Arc<CommandRegistry>,
) -> mlua::Result<()> {
    let globals = lua.globals();

    {
        let app = context.app.clone();
        globals.set(
            "print",
            lua.create_function(move |_, args: Variadic<mlua::Value>| {
                let text = args
                    .iter()
                    .map(mlua::Value::to_string)
                    .collect::<mlua::Result<Vec<_>>>()?
                    .join("\t");
                app.print_msg(&text);
                Ok(())
            })?,
        )?;
    }

    {
        let app = context.app.clone();
        globals.set(
            "help",
            lua.create_function(move |_, ()| {
                return_if_terminating!(app);
                app.print_msg(&registry.render_help());
                Ok(())
            })?,
        )?;
    }

    {
        let app = context.app.clone();
        globals.set(
            "exit",
            lua.create_function(move |_, ()| {
                return_if_terminating!(app);
                app.request_exit();
                Ok(())
            })?,
        )?;
    }

    {
        let CommandContext { app, machine, .. } = context.clone();
        globals.set(
            "reset",
            lua.create_function(move |_, ()| {
                return_if_terminating!(app);
                if let Err(error) = machine.reset() {
                    print_msg!(app, "{error}");
                }
                Ok(())
            })?,
        )?;
    }

    {
        let CommandContext { app, machine, .. } = context.clone();
        globals.set(
            "load",
            lua.create_function(move |_, path: String| {
                return_if_terminating!(app);
                let data = match fs::read(&path) {
                    Ok(data) => data,
                    Err(error) => {
                        print_msg!(app, "can't read {path:?}: {error}");
                        return Ok(());
                    }
                };
                if let Err(error) = machine.load_snapshot(data) {
                    print_msg!(app, "{error}");
                }
                Ok(())
            })?,
        )?;
    }

    {
        let CommandContext { app, machine, .. } = context.clone();
        globals.set(
            "save",
            lua.create_function(move |_, path: String| {
                return_if_terminating!(app);
                let data = match machine.save_snapshot() {
                    Ok(data) => data,
                    Err(error) => {
                        print_msg!(app, "{error}");
                        return Ok(());
                    }
                };
                if let Err(error) = write_private_file(Path::new(&path), &data) {
                    print_msg!(app, "can't write {path:?}: {error}");
                    return Ok(());
                }
                if app.verbose() {
                    print_msg!(app, "wrote snapshot {path:?}");
                }
                Ok(())
            })?,
        )?;
    }

    {
        let CommandContext { app, machine, .. } = context.clone();
        globals.set(
            "scale",
            lua.create_function(move |_, n: i64| {
                return_if_terminating!(app);
                let Ok(scale) = DisplayScale::try_from(n) else {
                    print_msg!(app, "unsupported scale {n}, use 1 or 2");
                    return Ok(());
                };
                if let Err(error) = machine
                    .close_all_displays()
                    .and_then(|()| machine.add_display(scale))
                {
                    print_msg!(app, "{error}");
                }
                Ok(())
            })?,
        )?;
    }

    {
        let CommandContext { app, machine, .. } = context.clone();
        globals.set(
            "fps",
            lua.create_function(move |_, n: f64| {
                return_if_terminating!(app);
                if !(n.is_finite() && n > 0.0) {
                    print_msg!(app, "fps must be a positive number, got {n}");
                    return Ok(());
                }
                if let Err(error) = machine.set_fps(n) {
                    print_msg!(app, "{error}");
                }
                Ok(())
            })?,
        )?;
    }

    {
        let CommandContext { app, machine, .. } = context.clone();
        globals.set(
            "ULA_accuracy",
            lua.create_function(move |_, accurate: bool| {
                return_if_terminating!(app);
                if let Err(error) = machine.set_ula_emulation_accuracy(accurate) {
                    print_msg!(app, "{error}");
                }
                Ok(())
            })?,
        )?;
    }

    {
        let CommandContext { app, machine, .. } = context.clone();
        globals.set(
            "sound",
            lua.create_function(move |_, enable: bool| {
                return_if_terminating!(app);
                let result = if enable {
                    machine.add_audio_receiver()
                } else {
                    machine.close_all_audio_receivers()
                };
                if let Err(error) = result {
                    print_msg!(app, "{error}");
                }
                Ok(())
            })?,
        )?;
    }

    {
        let app = context.app.clone();
        globals.set(
            "wait",
            lua.create_function(move |_, milliseconds: u64| {
                return_if_terminating!(app);
                // Commands run one after another, so holding up this one is the point.
                thread::sleep(Duration::from_millis(milliseconds));
                Ok(())
            })?,
        )?;
    }

    for (name, requirement) in [
        ("script", ScriptRequirement::Required),
        ("optionalScript", ScriptRequirement::Optional),
    ] {
        let app = context.app.clone();
        let script_dir = context.script_dir.clone();
        globals.set(
            name,
            lua.create_function(move |lua, script_name: String| {
                return_if_terminating!(app);
                let path = script_path(&script_dir, &script_name);
                if let Err(error) = run_lua_script(lua, &path, requirement) {
                    print_msg!(app, "{error}");
                }
                Ok(())
            })?,
        )?;
    }

    Ok(())
}

/// Writes `data` to `path`, readable and writable only by the owner on unix.
fn write_private_file(path: &Path, data: &[u8]) -> io::Result<()> {
    use std::io::Write;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)?.write_all(data)
}
