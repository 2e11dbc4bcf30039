//! Compare command implementation
//!
//! Compares two WAV files: content hashes, SNR of B against A, the dominant
//! frequency of each and their best normalized cross-correlation. Used to
//! judge how faithfully a channel effect preserves its input.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use commfx_effects::analysis::{dominant_frequency, max_normalized_correlation, snr_db};

use super::json_output::{error_codes, CompareOutput, CompareResult, JsonError};
use crate::wav::{read_wav, WavAudio};

/// Largest lag searched by the correlation metric, in samples.
const MAX_CORRELATION_LAG: usize = 1000;

/// Run the compare command
///
/// # Arguments
/// * `path_a` - Path to the first file (reference)
/// * `path_b` - Path to the second file (comparison target)
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(path_a: &str, path_b: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(path_a, path_b)
    } else {
        run_human(path_a, path_b)
    }
}

fn run_human(path_a: &str, path_b: &str) -> Result<ExitCode> {
    let data_a = fs::read(path_a).with_context(|| format!("Failed to read file A: {}", path_a))?;
    let data_b = fs::read(path_b).with_context(|| format!("Failed to read file B: {}", path_b))?;
    let audio_a = read_wav(Path::new(path_a))?;
    let audio_b = read_wav(Path::new(path_b))?;

    let result = compare(path_a, path_b, &data_a, &data_b, &audio_a, &audio_b);

    println!("{}", "Comparing files:".cyan().bold());
    println!("  {} {}", "A:".dimmed(), path_a);
    println!("  {} {}", "B:".dimmed(), path_b);
    println!("{} {}", "Hash A:".dimmed(), &result.hash_a[..16]);
    println!("{} {}", "Hash B:".dimmed(), &result.hash_b[..16]);

    if result.identical {
        println!("\n{}", "Files are byte-identical!".green().bold());
    }
    if audio_a.sample_rate != audio_b.sample_rate {
        println!(
            "{} sample rates differ ({} Hz vs {} Hz)",
            "!!".yellow(),
            audio_a.sample_rate,
            audio_b.sample_rate
        );
    }

    println!("\n{}", "Comparison Metrics:".cyan().bold());
    match result.snr_db {
        Some(snr) => println!("  {:<16} {:.2} dB", "SNR:", snr),
        None => println!("  {:<16} {}", "SNR:", "inf (signals match)".green()),
    }
    println!(
        "  {:<16} {:.1} Hz -> {:.1} Hz",
        "Dominant freq:", result.dominant_freq_a, result.dominant_freq_b
    );
    println!("  {:<16} {:.4}", "Correlation:", result.correlation);

    Ok(ExitCode::SUCCESS)
}

fn run_json(path_a: &str, path_b: &str) -> Result<ExitCode> {
    let outcome = load(path_a).and_then(|(data_a, audio_a)| {
        load(path_b).map(|(data_b, audio_b)| {
            compare(path_a, path_b, &data_a, &data_b, &audio_a, &audio_b)
        })
    });

    let (output, code) = match outcome {
        Ok(result) => (CompareOutput::success(result), ExitCode::SUCCESS),
        Err(error) => (CompareOutput::failure(vec![error]), ExitCode::from(1)),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(code)
}

fn load(path: &str) -> Result<(Vec<u8>, WavAudio), JsonError> {
    let read_error =
        |message: String| JsonError::new(error_codes::FILE_READ, message).with_file(path);
    let data = fs::read(path).map_err(|e| read_error(format!("Failed to read file: {}", e)))?;
    let audio = read_wav(Path::new(path)).map_err(|e| read_error(format!("{:#}", e)))?;
    Ok((data, audio))
}

/// Metrics use the first channel of each file.
fn compare(
    path_a: &str,
    path_b: &str,
    data_a: &[u8],
    data_b: &[u8],
    audio_a: &WavAudio,
    audio_b: &WavAudio,
) -> CompareResult {
    let a = audio_a.buffer.channel(0).unwrap_or(&[]);
    let b = audio_b.buffer.channel(0).unwrap_or(&[]);

    let snr = snr_db(a, b);

    CompareResult {
        path_a: path_a.to_string(),
        path_b: path_b.to_string(),
        hash_a: blake3::hash(data_a).to_hex().to_string(),
        hash_b: blake3::hash(data_b).to_hex().to_string(),
        identical: data_a == data_b,
        snr_db: snr.is_finite().then_some(snr),
        dominant_freq_a: dominant_frequency(a, f64::from(audio_a.sample_rate)),
        dominant_freq_b: dominant_frequency(b, f64::from(audio_b.sample_rate)),
        correlation: max_normalized_correlation(a, b, MAX_CORRELATION_LAG),
    }
}
