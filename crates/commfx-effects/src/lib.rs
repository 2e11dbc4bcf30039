//! commfx effects
//!
//! Audio effects that demonstrate communication-theory concepts on real
//! recordings:
//!
//! - **Doppler shift** - frequency-domain bin remapping around an
//!   oversampling rate converter
//! - **AM channel** - standard AM, DSB-SC and SSB through a noisy channel,
//!   with carrier recovery and envelope or synchronous detection
//! - **PCM, A-law companding, aliasing and convolution reverb** - the simpler
//!   single-pass effects of the same toolbox
//!
//! # Determinism
//!
//! Every effect is a pure function of its parameters, the input buffer, the
//! sample rate and a seed. Randomness (carrier synchronization error, channel
//! noise) uses PCG32 with per-pass and per-channel seeds derived via BLAKE3,
//! so equal inputs give byte-identical outputs.
//!
//! # Example
//!
//! ```ignore
//! use commfx_effects::{AudioBuffer, ChainSpec, EffectChain};
//!
//! let spec = ChainSpec::from_json(json)?;
//! let chain = EffectChain::from_spec(&spec);
//! let output = chain.process(&AudioBuffer::mono(samples), 44100, spec.seed)?;
//! ```
//!
//! # Crate Structure
//!
//! - [`effects`] - The [`Effect`] contract and every effect
//! - [`chain`] - Runs effects in sequence
//! - [`config`] - Serializable effect and chain descriptions
//! - [`resample`] - Integer-factor rate converter
//! - [`filter`] - Biquad, first-order and FIR filters
//! - [`spectral`] - FFT and analytic-signal helpers
//! - [`analysis`] - Level, frequency and similarity measurements
//! - [`rng`] - Deterministic RNG with seed derivation

pub mod analysis;
pub mod buffer;
pub mod chain;
pub mod config;
pub mod effects;
pub mod error;
pub mod filter;
pub mod params;
pub mod resample;
pub mod rng;
pub mod spectral;

// Re-export main types at crate root
pub use buffer::AudioBuffer;
pub use chain::{ChainOutput, EffectChain, PassReport};
pub use config::{ChainSpec, EffectSpec};
pub use effects::{
    AliasingEffect, AliasingParams, AmChannelEffect, AmChannelParams, AmMode, CompandingEffect,
    CompandingParams, ConvolutionReverb, DopplerEffect, DopplerParams, Effect, ImpulseKind,
    PcmEffect, PcmParams, ReverbParams,
};
pub use error::{AudioError, AudioResult};
pub use params::{ParamSnapshot, ParamValue};
