// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use super::{ConsoleConfig, ConsoleControlLoop, ConsoleExit, ConsoleInstanceGuard,
            ConsoleInstanceRegistry, ConsoleMessageOutput, ConsoleState, LineReaderArgs,
            PromptState, spawn_line_reader};
use crate::{Application, CommandContext, CommandRegistry, ConsoleError, EvalEngine,
            Evaluator, LineEditor, LuaEngine, MachineHandle, OutputDevice,
            ScriptRequirement, define_builtin_commands};

pub const HINT_MESSAGE: &str = "Hint: Input an empty line to see available commands";

/// Where a console reads lines from and draws to.
#[allow(missing_debug_implementations)]
pub struct ConsoleIo {
    pub editor: Box<dyn LineEditor>,
    pub output_device: OutputDevice,
}

/// An interactive command console attached to an [`Application`].
///
/// Lines are read on a dedicated thread and evaluated one at a time on the task that
/// calls [`Console::run()`]. Everything the console, the evaluated commands, and any other
/// thread print while it runs goes through [`ConsoleMessageOutput`], so output never
/// tramples the line being typed.
#[allow(missing_debug_implementations)]
pub struct Console<'r, E> {
    app: Application,
    config: ConsoleConfig,
    evaluator: Evaluator<E>,
    command_registry: Arc<CommandRegistry>,
    io: ConsoleIo,
    _instance_guard: ConsoleInstanceGuard<'r>,
}

impl<'r, E: EvalEngine> Console<'r, E> {
    /// Claims the single console slot in `instance_registry`. The help listing shows the
    /// built in commands.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::MultipleConsoles`] if another console holds the slot.
    pub fn try_new(
        instance_registry: &'r ConsoleInstanceRegistry,
        app: Application,
        config: ConsoleConfig,
        engine: E,
        io: ConsoleIo,
    ) -> Result<Self, ConsoleError> {
        let instance_guard = instance_registry.try_claim()?;
        Ok(Self::new_claimed(
            instance_guard,
            app,
            config,
            engine,
            Arc::new(CommandRegistry::builtin()),
            io,
        ))
    }

    fn new_claimed(
        instance_guard: ConsoleInstanceGuard<'r>,
        app: Application,
        config: ConsoleConfig,
        engine: E,
        command_registry: Arc<CommandRegistry>,
        io: ConsoleIo,
    ) -> Self {
        let evaluator = Evaluator::new(engine, app.clone(), config.script_dir.clone());
        Self {
            app,
            config,
            evaluator,
            command_registry,
            io,
            _instance_guard: instance_guard,
        }
    }

    pub fn evaluator(&self) -> &Evaluator<E> { &self.evaluator }

    /// Runs the startup script, then reads and evaluates lines until the application
    /// terminates or input ends.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::StartupScript`] if the startup script is missing or fails. The
    /// application has been asked to exit by the time this returns.
    pub async fn run(self) -> Result<ConsoleExit, ConsoleError> {
        let Self {
            app,
            config,
            evaluator,
            command_registry,
            io: ConsoleIo {
                editor,
                output_device,
            },
            _instance_guard,
        } = self;

        if let Err(error) =
            evaluator.run_script(&config.startup_script, ScriptRequirement::Required)
        {
            app.print_msg(&error.to_string());
            app.request_exit();
            return Err(ConsoleError::StartupScript(error));
        }

        if app.termination_in_progress() {
            return Ok(ConsoleExit::Terminated);
        }

        // Printed before the reader starts, so it always comes before the first prompt.
        app.print_msg(HINT_MESSAGE);

        let event_loop = app.new_event_loop();
        let prompt_state = PromptState::new_safe();
        let controls = editor.controls();

        let previous_output = app.set_message_output(Arc::new(ConsoleMessageOutput::new(
            output_device.clone(),
            prompt_state.clone(),
            controls.clone(),
            app.termination_flag(),
        )));

        let mut reader = match spawn_line_reader(LineReaderArgs {
            editor,
            prompt: config.prompt.clone(),
            output_device: output_device.clone(),
            prompt_state: prompt_state.clone(),
            termination_flag: app.termination_flag(),
        }) {
            Ok(reader) => reader,
            Err(error) => {
                app.set_message_output(previous_output);
                return Err(error.into());
            }
        };

        let exit = ConsoleControlLoop {
            app: app.clone(),
            event_loop,
            reader: &mut reader,
            evaluator: &evaluator,
            command_registry: &command_registry,
            output_device,
            prompt_state,
            controls,
            exit_app_if_end_of_input: config.exit_app_if_end_of_input,
            signal_router: None,
            state: ConsoleState::Reading,
            is_reader_alive: true,
        }
        .run()
        .await;

        if !reader.shutdown().await {
            tracing::debug!(message = "console: reader thread is still blocked, leaving it");
        }
        app.set_message_output(previous_output);

        tracing::debug!(message = "console: exit", %exit);
        Ok(exit)
    }
}

/// A console that speaks Lua, with every built in command registered against `machine`.
///
/// # Errors
///
/// [`ConsoleError::MultipleConsoles`] if another console holds the slot, or
/// [`ConsoleError::Engine`] if the commands can't be registered.
pub fn new_lua_console(
    instance_registry: &ConsoleInstanceRegistry,
    app: Application,
    config: ConsoleConfig,
    machine: MachineHandle,
    io: ConsoleIo,
) -> Result<Console<'_, LuaEngine>, ConsoleError> {
    let instance_guard = instance_registry.try_claim()?;

    let engine = LuaEngine::new();
    let command_registry = Arc::new(CommandRegistry::builtin());
    let command_context = CommandContext {
        app: app.clone(),
        machine,
        script_dir: config.script_dir.clone(),
    };
    define_builtin_commands(&engine, &command_context, command_registry.clone())?;

    Ok(Console::new_claimed(
        instance_guard,
        app,
        config,
        engine,
        command_registry,
        io,
    ))
}
