// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Runs a simulated machine with an interactive Lua console attached to it.
//!
//! For more information on how to use CLAP, here are some resources:
//! 1. [Tutorial](https://developerlife.com/2023/09/17/tuify-clap/)
//! 2. [Video](https://youtu.be/lzMYDA6St0s)

use clap::Parser;
use emu_console::{Application, CLIArg, ConsoleConfig, ConsoleExit, ConsoleInstanceRegistry,
                  ConsoleIo, DisplayPreference, OutputDevice, TracingConfig, init_tracing,
                  new_line_editor_for_stdin, new_lua_console, ok, spawn_simulated_machine};
use miette::IntoDiagnostic;
use tracing_core::LevelFilter;

#[tokio::main]
#[allow(clippy::needless_return)]
async fn main() -> miette::Result<()> {
    let cli_arg = CLIArg::parse();
    let verbose = cli_arg.global_options.verbose;

    let app = Application::new(verbose);

    let log_to_display = cli_arg
        .global_options
        .log_to_console
        .then(|| DisplayPreference::MessageOutput(app.clone()));
    let level_filter = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    init_tracing(TracingConfig::new(
        cli_arg.global_options.enable_logging,
        log_to_display,
        level_filter,
    ))?;

    // % is Display, ? is Debug.
    tracing::debug!(message = "Start logging...", cli_arg = ?cli_arg);

    let (machine, machine_thread) = spawn_simulated_machine(app.clone()).into_diagnostic()?;

    let output_device = OutputDevice::new_stdout();
    let io = ConsoleIo {
        editor: new_line_editor_for_stdin(output_device.clone()),
        output_device,
    };
    let console = new_lua_console(
        ConsoleInstanceRegistry::global(),
        app.clone(),
        ConsoleConfig::from(&cli_arg),
        // The console's handle goes away with the console. This one keeps the machine
        // running until the application terminates.
        machine.clone(),
        io,
    )
    .into_diagnostic()?;

    // With the console gone, SIGINT and SIGTERM take their default action and end the
    // process.
    match console.run().await.into_diagnostic()? {
        ConsoleExit::Terminated | ConsoleExit::EndOfInput => app.await_termination().await,
    }

    drop(machine);
    if machine_thread.join().is_err() {
        tracing::error!(message = "simulated machine thread panicked");
    }

    tracing::debug!(message = "Stop logging...");

    ok!()
}
