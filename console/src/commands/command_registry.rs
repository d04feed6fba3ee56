// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::Write;

/// One entry in the help listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub signature: &'static str,
    pub help: &'static str,
}

/// The commands available at the prompt, in the order the help listing shows them. Built
/// once at startup and read only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRegistry {
    commands: Vec<CommandSpec>,
}

macro_rules! command {
    ($name:literal, $signature:literal, $help:literal) => {
        CommandSpec {
            name: $name,
            signature: $signature,
            help: $help,
        }
    };
}

impl CommandRegistry {
    #[must_use]
    pub fn new(commands: Vec<CommandSpec>) -> Self { Self { commands } }

    /// Every command defined by [`crate::define_builtin_commands()`].
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            command!("help", "help()", "This help"),
            command!("exit", "exit()", "Terminate this program"),
            command!("reset", "reset()", "Reset the emulated machine"),
            command!(
                "load",
                "load(path: string)",
                "Load state from file (snapshot format)"
            ),
            command!(
                "save",
                "save(path: string)",
                "Save state to file (snapshot format)"
            ),
            command!("scale", "scale(n: integer)", "Change the display scale"),
            command!(
                "fps",
                "fps(n: number)",
                "Change the display refresh frequency"
            ),
            command!(
                "ULA_accuracy",
                "ULA_accuracy(accurate: boolean)",
                "Enable/disable accurate emulation of screen bitmap and screen attributes"
            ),
            command!("sound", "sound(enable: boolean)", "Enable or disable sound"),
            command!(
                "wait",
                "wait(milliseconds: integer)",
                "Wait the specified amount of time before issuing the next command"
            ),
            command!(
                "script",
                "script(name: string)",
                "Load and evaluate the specified Lua script"
            ),
            command!(
                "optionalScript",
                "optionalScript(name: string)",
                "Load (if found) and evaluate the specified Lua script"
            ),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> { self.commands.iter() }

    #[must_use]
    pub fn len(&self) -> usize { self.commands.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }

    /// The help listing, signatures padded to a common width, followed by a blank line.
    #[must_use]
    pub fn render_help(&self) -> String {
        let width = self
            .commands
            .iter()
            .map(|it| it.signature.len())
            .max()
            .unwrap_or(1)
            .max(1);

        let mut acc = String::from("\nAvailable commands:\n");
        for CommandSpec {
            signature, help, ..
        } in &self.commands
        {
            // Writing to a String can't fail.
            let _ = writeln!(acc, "    {signature:<width$}  {help}");
        }
        acc.push('\n');
        acc
    }
}
