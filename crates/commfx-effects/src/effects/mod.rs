//! The effect contract and the effects that implement it.
//!
//! Every effect is a batch transform `buffer, sample_rate -> buffer` that
//! preserves channel count and sample count. Effects hold no state between
//! calls beyond their read-only parameter set.
//!
//! - [`doppler`] - frequency-domain Doppler shift with oversampling
//! - [`am_channel`] - AM / DSB-SC / SSB modulate, noisy channel, demodulate
//! - [`pcm`] - uniform quantization at a reduced bit depth
//! - [`companding`] - A-law compress, quantize, expand
//! - [`aliasing`] - decimate and hold, with an optional anti-alias filter
//! - [`reverb`] - convolution with a synthetic impulse response

pub mod aliasing;
pub mod am_channel;
pub mod companding;
pub mod doppler;
pub mod pcm;
pub mod reverb;

pub use aliasing::{AliasingEffect, AliasingParams};
pub use am_channel::{AmChannelEffect, AmChannelParams, AmMode};
pub use companding::{CompandingEffect, CompandingParams};
pub use doppler::{DopplerEffect, DopplerParams};
pub use pcm::{PcmEffect, PcmParams};
pub use reverb::{ConvolutionReverb, ImpulseKind, ReverbParams};

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, AudioResult};
use crate::params::{ParamSnapshot, ParamValue};

/// Common trait for all effects.
pub trait Effect: Send + Sync {
    /// Display name of the effect.
    fn name(&self) -> &'static str;

    /// Processes a whole buffer.
    ///
    /// # Arguments
    /// * `input` - Buffer to transform (left untouched)
    /// * `sample_rate` - Sample rate in Hz, must be positive
    /// * `seed` - Seed for any randomness the effect uses
    ///
    /// # Returns
    /// A new buffer with the same channel and sample count, or an error.
    /// On error no buffer is produced.
    fn process(&self, input: &AudioBuffer, sample_rate: u32, seed: u32)
        -> AudioResult<AudioBuffer>;

    /// Snapshot of the current parameters.
    fn params(&self) -> ParamSnapshot;

    /// Updates one parameter by name, applying the effect's clamping rules.
    ///
    /// Unknown names are ignored. A value of the wrong kind, or a non-finite
    /// number, resets the parameter to its default.
    fn set_param(&mut self, name: &str, value: ParamValue);

    /// Applies every entry of `params` through [`Effect::set_param`].
    fn set_params(&mut self, params: &ParamSnapshot) {
        for (name, value) in params {
            self.set_param(name, value.clone());
        }
    }
}

/// Validates the sample rate passed to `process`.
pub(crate) fn check_sample_rate(sample_rate: u32) -> AudioResult<f64> {
    if sample_rate == 0 {
        return Err(AudioError::InvalidSampleRate { rate: sample_rate });
    }
    Ok(sample_rate as f64)
}

/// Builds the output buffer, enforcing the shape and finiteness guarantees.
pub(crate) fn assemble(
    effect: &str,
    input: &AudioBuffer,
    channels: Vec<Vec<f64>>,
) -> AudioResult<AudioBuffer> {
    let expected_channels = input.num_channels();
    let expected_samples = input.num_samples();

    if channels.len() != expected_channels
        || channels.iter().any(|ch| ch.len() != expected_samples)
    {
        return Err(AudioError::ShapeMismatch {
            expected_channels,
            expected_samples,
            channels: channels.len(),
            samples: channels.first().map_or(0, Vec::len),
        });
    }

    let output = AudioBuffer::new(channels)?;
    if !output.is_finite() {
        return Err(AudioError::computation(format!(
            "{} produced non-finite samples",
            effect
        )));
    }
    Ok(output)
}
