//! commfx CLI - Command-line interface for communication-theory audio effects
//!
//! Applies Doppler, AM channel and the simpler toolbox effects to WAV files,
//! prints effect defaults and compares recordings.

mod cli_args;
mod commands;
mod wav;

use clap::Parser;
use std::process::ExitCode;

use cli_args::{Cli, Commands};
use commands::process::ProcessArgs;
use wav::WavEncoding;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Process {
            input,
            output,
            chain,
            effect,
            seed,
            float,
            json,
        } => commands::process::run(
            ProcessArgs {
                input: &input,
                output: &output,
                chain: chain.as_deref(),
                effect: effect.as_deref(),
                seed,
                encoding: if float {
                    WavEncoding::Float32
                } else {
                    WavEncoding::Pcm16
                },
            },
            json,
        ),
        Commands::Params { effect, json } => commands::params::run(&effect, json),
        Commands::Compare { a, b, json } => commands::compare::run(&a, &b, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
