//! CLI argument definitions for the commfx command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Parser, Subcommand};

/// commfx - Communication-theory audio effects for WAV files
#[derive(Parser)]
#[command(name = "commfx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Apply an effect chain to a WAV file
    Process {
        /// Path to the input WAV file
        #[arg(short, long)]
        input: String,

        /// Path to the output WAV file
        #[arg(short, long)]
        output: String,

        /// Path to a JSON chain description
        #[arg(short, long, conflicts_with = "effect")]
        chain: Option<String>,

        /// Apply a single effect with default parameters (doppler, am-channel,
        /// pcm, companding, aliasing, convolution-reverb)
        #[arg(short, long)]
        effect: Option<String>,

        /// Seed for the channel noise and carrier jitter (overrides the chain's seed)
        #[arg(long)]
        seed: Option<u32>,

        /// Write 32-bit float samples instead of 16-bit PCM
        #[arg(long)]
        float: bool,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the default parameters of an effect
    Params {
        /// Effect name (doppler, am-channel, pcm, companding, aliasing,
        /// convolution-reverb)
        #[arg(short, long)]
        effect: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Compare two WAV files (SNR, dominant frequency, correlation)
    Compare {
        /// Path to the first file (reference)
        #[arg(short, long)]
        a: String,

        /// Path to the second file (comparison target)
        #[arg(short, long)]
        b: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}
