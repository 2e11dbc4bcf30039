//! Uniform PCM quantization at a reduced bit depth.

use serde::{Deserialize, Serialize};

use super::{assemble, check_sample_rate, Effect};
use crate::buffer::AudioBuffer;
use crate::error::AudioResult;
use crate::params::{ParamSnapshot, ParamValue};

/// Smallest bit depth accepted.
pub const MIN_BIT_DEPTH: u32 = 1;

/// Largest bit depth accepted.
pub const MAX_BIT_DEPTH: u32 = 24;

const DEFAULT_BIT_DEPTH: u32 = 4;

/// PCM quantizer parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PcmParams {
    /// Bits per sample, 1 to 24.
    pub bit_depth: u32,
}

impl Default for PcmParams {
    fn default() -> Self {
        Self {
            bit_depth: DEFAULT_BIT_DEPTH,
        }
    }
}

impl PcmParams {
    /// Clamps the bit depth into range.
    pub fn validated(self) -> Self {
        Self {
            bit_depth: self.bit_depth.clamp(MIN_BIT_DEPTH, MAX_BIT_DEPTH),
        }
    }

    /// Number of quantization steps, `2^bit_depth`.
    pub fn levels(&self) -> f64 {
        f64::from(self.bit_depth).exp2()
    }
}

/// Maps `sample` onto one of `levels` steps spanning [-1, 1].
///
/// The sample is shifted to [0, 1], floored onto the step grid and shifted
/// back, so every output is `2k / levels - 1` for an integer `k`.
pub fn quantize(sample: f64, levels: f64) -> f64 {
    let unit = (sample + 1.0) / 2.0;
    (unit * levels).floor() / levels * 2.0 - 1.0
}

/// Bit-depth reduction.
#[derive(Debug, Clone, Default)]
pub struct PcmEffect {
    params: PcmParams,
}

impl PcmEffect {
    /// Creates the effect, clamping the given parameters.
    pub fn new(params: PcmParams) -> Self {
        Self {
            params: params.validated(),
        }
    }

    /// Current (validated) parameters.
    pub fn config(&self) -> &PcmParams {
        &self.params
    }
}

impl Effect for PcmEffect {
    fn name(&self) -> &'static str {
        "pcm"
    }

    fn process(
        &self,
        input: &AudioBuffer,
        sample_rate: u32,
        _seed: u32,
    ) -> AudioResult<AudioBuffer> {
        check_sample_rate(sample_rate)?;
        let levels = self.params.levels();

        let channels = input
            .channels()
            .iter()
            .map(|ch| ch.iter().map(|&s| quantize(s, levels)).collect())
            .collect();
        assemble(self.name(), input, channels)
    }

    fn params(&self) -> ParamSnapshot {
        let mut snapshot = ParamSnapshot::new();
        snapshot.insert("bit_depth".into(), self.params.bit_depth.into());
        snapshot
    }

    fn set_param(&mut self, name: &str, value: ParamValue) {
        if name == "bit_depth" {
            let bit_depth = value.as_u32().unwrap_or(DEFAULT_BIT_DEPTH);
            self.params = PcmParams { bit_depth }.validated();
        }
    }
}
