// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::{ConsoleConfig, DEFAULT_PROMPT, DEFAULT_SCRIPT_DIRECTORY, DEFAULT_STARTUP_SCRIPT};

#[derive(Debug, Parser)]
#[command(bin_name = "emu-console")]
#[command(about = "Interactive Lua command console for a simulated machine")]
#[command(version)]
#[command(next_line_help = true)]
/// More info:
/// - <https://docs.rs/clap/latest/clap/_derive/#overview>
pub struct CLIArg {
    #[command(flatten)]
    pub console_options: ConsoleOption,

    #[command(flatten)]
    pub global_options: GlobalOption,
}

#[derive(Debug, Args)]
pub struct ConsoleOption {
    #[arg(long, default_value = DEFAULT_PROMPT, help = "Prompt shown while waiting for a command")]
    pub prompt: String,

    #[arg(
        long,
        default_value = DEFAULT_SCRIPT_DIRECTORY,
        help = "Folder that `script(name)` loads `<name>.lua` from"
    )]
    pub script_dir: PathBuf,

    #[arg(
        long,
        default_value = DEFAULT_STARTUP_SCRIPT,
        help = "Script that must run successfully before the first prompt"
    )]
    pub startup_script: String,

    #[arg(
        long,
        short = 'k',
        help = "When input ends, close the console but keep the machine running until Ctrl+C"
    )]
    pub keep_running_on_end_of_input: bool,
}

#[derive(Debug, Args)]
pub struct GlobalOption {
    #[arg(
        global = true,
        long,
        short = 'v',
        help = "Print extra messages, and log at DEBUG level"
    )]
    pub verbose: bool,

    #[arg(
        global = true,
        long,
        short = 'l',
        help = "Log app output to a file named `log.txt` for debugging"
    )]
    pub enable_logging: bool,

    #[arg(
        global = true,
        long,
        help = "Also show log output in the console, above the prompt"
    )]
    pub log_to_console: bool,
}

impl From<&CLIArg> for ConsoleConfig {
    fn from(cli_arg: &CLIArg) -> Self {
        let options = &cli_arg.console_options;
        Self {
            prompt: options.prompt.clone(),
            script_dir: options.script_dir.clone(),
            startup_script: options.startup_script.clone(),
            exit_app_if_end_of_input: !options.keep_running_on_end_of_input,
        }
    }
}
