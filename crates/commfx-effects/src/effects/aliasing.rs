//! Sample-rate reduction with audible aliasing.
//!
//! Each channel is decimated to roughly the target rate and then held
//! (zero-order hold) back up to the input rate, giving the stepped waveform
//! of a cheap converter. Without the optional anti-alias filter, content above
//! the target Nyquist frequency folds back into the audible band.

use serde::{Deserialize, Serialize};

use super::{assemble, check_sample_rate, Effect};
use crate::buffer::{fit_length, AudioBuffer};
use crate::error::AudioResult;
use crate::filter::{clamp_cutoff, BiquadFilter};
use crate::params::{ParamSnapshot, ParamValue};
use crate::resample::downsample;

const DEFAULT_TARGET_RATE: u32 = 4000;

/// Second-order sections cascaded in the anti-alias filter.
const ANTI_ALIAS_SECTIONS: usize = 2;

/// Aliasing effect parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliasingParams {
    /// Rate to decimate to, in Hz. Must be positive.
    pub target_sample_rate: u32,
    /// Low-pass at the target Nyquist frequency before decimating.
    pub anti_alias: bool,
}

impl Default for AliasingParams {
    fn default() -> Self {
        Self {
            target_sample_rate: DEFAULT_TARGET_RATE,
            anti_alias: false,
        }
    }
}

impl AliasingParams {
    /// Replaces a zero target rate with the default.
    pub fn validated(self) -> Self {
        let target_sample_rate = if self.target_sample_rate == 0 {
            DEFAULT_TARGET_RATE
        } else {
            self.target_sample_rate
        };
        Self {
            target_sample_rate,
            anti_alias: self.anti_alias,
        }
    }

    /// Decimation step at `sample_rate`, or `None` when the target does not
    /// reduce the rate by at least a factor of two.
    pub fn step(&self, sample_rate: u32) -> Option<usize> {
        let step = (sample_rate / self.target_sample_rate) as usize;
        (step > 1).then_some(step)
    }
}

/// Repeats every sample `factor` times.
pub fn hold(samples: &[f64], factor: usize) -> Vec<f64> {
    samples
        .iter()
        .flat_map(|&s| std::iter::repeat(s).take(factor))
        .collect()
}

/// Decimate-and-hold rate reduction.
#[derive(Debug, Clone, Default)]
pub struct AliasingEffect {
    params: AliasingParams,
}

impl AliasingEffect {
    /// Creates the effect, clamping the given parameters.
    pub fn new(params: AliasingParams) -> Self {
        Self {
            params: params.validated(),
        }
    }

    /// Current (validated) parameters.
    pub fn config(&self) -> &AliasingParams {
        &self.params
    }

    fn reduce_channel(&self, channel: &[f64], sample_rate: f64, step: usize) -> Vec<f64> {
        let source = if self.params.anti_alias {
            let cutoff = clamp_cutoff(
                f64::from(self.params.target_sample_rate) / 2.0,
                sample_rate,
            );
            (0..ANTI_ALIAS_SECTIONS).fold(channel.to_vec(), |signal, _| {
                BiquadFilter::lowpass(cutoff, sample_rate).process_buffer_copy(&signal)
            })
        } else {
            channel.to_vec()
        };

        let held = hold(&downsample(&source, step), step);
        fit_length(held, channel.len())
    }
}

impl Effect for AliasingEffect {
    fn name(&self) -> &'static str {
        "aliasing"
    }

    fn process(
        &self,
        input: &AudioBuffer,
        sample_rate: u32,
        _seed: u32,
    ) -> AudioResult<AudioBuffer> {
        let rate = check_sample_rate(sample_rate)?;
        let Some(step) = self.params.step(sample_rate) else {
            return Ok(input.clone());
        };

        let channels = input
            .channels()
            .iter()
            .map(|ch| self.reduce_channel(ch, rate, step))
            .collect();
        assemble(self.name(), input, channels)
    }

    fn params(&self) -> ParamSnapshot {
        let p = &self.params;
        let mut snapshot = ParamSnapshot::new();
        snapshot.insert("target_sample_rate".into(), p.target_sample_rate.into());
        snapshot.insert("anti_alias".into(), p.anti_alias.into());
        snapshot
    }

    fn set_param(&mut self, name: &str, value: ParamValue) {
        let mut next = self.params.clone();
        match name {
            "target_sample_rate" => {
                next.target_sample_rate = value.as_u32().unwrap_or(DEFAULT_TARGET_RATE)
            }
            "anti_alias" => next.anti_alias = value.as_bool().unwrap_or(false),
            _ => return,
        }
        self.params = next.validated();
    }
}
