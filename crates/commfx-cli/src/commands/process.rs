//! Process command implementation
//!
//! Reads a WAV file, runs an effect chain over it and writes the result.

use anyhow::Result;
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use commfx_effects::{ChainSpec, EffectChain, EffectSpec};

use super::json_output::{error_codes, JsonError, ProcessOutput, ProcessResult};
use crate::wav::{read_wav, write_wav, WavEncoding};

/// Arguments of the process command.
#[derive(Debug, Clone, Copy)]
pub struct ProcessArgs<'a> {
    pub input: &'a str,
    pub output: &'a str,
    pub chain: Option<&'a str>,
    pub effect: Option<&'a str>,
    pub seed: Option<u32>,
    pub encoding: WavEncoding,
}

/// Run the process command
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(args: ProcessArgs<'_>, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(args)
    } else {
        run_human(args)
    }
}

fn run_human(args: ProcessArgs<'_>) -> Result<ExitCode> {
    let spec = resolve_chain(args.chain, args.effect, args.seed)?;
    let result = execute(&args, &spec)?;

    println!("{}", "Processing:".cyan().bold());
    println!("  {} {}", "Input:".dimmed(), result.input);
    println!(
        "  {} {} Hz, {} ch, {} samples",
        "Format:".dimmed(),
        result.sample_rate,
        result.channels,
        result.samples
    );
    println!("  {} {}", "Seed:".dimmed(), result.seed);
    println!();

    println!("{}", "Effects:".bold());
    if result.passes.is_empty() {
        println!("  {} empty chain, input copied", "!!".yellow());
    }
    for pass in &result.passes {
        println!(
            "  {} [{}] {:<12} {} {:.3}  {} {:.3}",
            "->".green(),
            pass.index + 1,
            pass.name,
            "peak".dimmed(),
            pass.peak,
            "rms".dimmed(),
            pass.rms
        );
    }
    println!();
    println!("{} Wrote {}", "ok".green(), result.output);

    Ok(ExitCode::SUCCESS)
}

fn run_json(args: ProcessArgs<'_>) -> Result<ExitCode> {
    let outcome =
        resolve_chain(args.chain, args.effect, args.seed).and_then(|spec| execute(&args, &spec));

    let (output, code) = match outcome {
        Ok(result) => (ProcessOutput::success(result), ExitCode::SUCCESS),
        Err(error) => (ProcessOutput::failure(vec![error]), ExitCode::from(1)),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(code)
}

/// Builds the chain description from `--chain` or `--effect`, applying `--seed`.
fn resolve_chain(
    chain: Option<&str>,
    effect: Option<&str>,
    seed: Option<u32>,
) -> Result<ChainSpec, JsonError> {
    let mut spec = match (chain, effect) {
        (Some(path), _) => {
            let text = fs::read_to_string(path).map_err(|e| {
                JsonError::new(
                    error_codes::FILE_READ,
                    format!("Failed to read chain file: {}", e),
                )
                .with_file(path)
            })?;
            ChainSpec::from_json(&text).map_err(|e| {
                JsonError::new(
                    error_codes::CHAIN_PARSE,
                    format!("Invalid chain description: {}", e),
                )
                .with_file(path)
            })?
        }
        (None, Some(name)) => {
            let effect = EffectSpec::with_defaults(name)
                .map_err(|e| JsonError::new(e.code(), e.to_string()))?;
            ChainSpec::single(effect, 0)
        }
        (None, None) => {
            return Err(JsonError::new(
                error_codes::NO_EFFECTS,
                "Either --chain or --effect is required",
            ))
        }
    };

    if let Some(seed) = seed {
        spec.seed = seed;
    }
    Ok(spec)
}

/// Reads, processes and writes; nothing is written if processing fails.
fn execute(args: &ProcessArgs<'_>, spec: &ChainSpec) -> Result<ProcessResult, JsonError> {
    let audio = read_wav(Path::new(args.input)).map_err(|e| {
        JsonError::new(error_codes::FILE_READ, format!("{:#}", e)).with_file(args.input)
    })?;

    let chain = EffectChain::from_spec(spec);
    let processed = chain
        .process(&audio.buffer, audio.sample_rate, spec.seed)
        .map_err(|e| JsonError::new(e.code(), e.to_string()))?;

    write_wav(
        Path::new(args.output),
        &processed.buffer,
        audio.sample_rate,
        args.encoding,
    )
    .map_err(|e| {
        JsonError::new(error_codes::FILE_WRITE, format!("{:#}", e)).with_file(args.output)
    })?;

    Ok(ProcessResult {
        input: args.input.to_string(),
        output: args.output.to_string(),
        sample_rate: audio.sample_rate,
        channels: processed.buffer.num_channels(),
        samples: processed.buffer.num_samples(),
        seed: spec.seed,
        passes: processed.passes,
    })
}
