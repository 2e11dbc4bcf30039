//! A-law companded PCM, as used on telephone trunks.
//!
//! The signal is compressed with the A-law curve, quantized uniformly and
//! expanded again. Quiet passages get finer steps than a plain uniform
//! quantizer of the same bit depth would give them.

use serde::{Deserialize, Serialize};

use super::pcm::{quantize, MAX_BIT_DEPTH, MIN_BIT_DEPTH};
use super::{assemble, check_sample_rate, Effect};
use crate::analysis::peak;
use crate::buffer::AudioBuffer;
use crate::error::AudioResult;
use crate::params::{ParamSnapshot, ParamValue};

/// Smallest compression parameter; `A = 1` is a straight line.
pub const MIN_A: f64 = 1.0;

/// Largest compression parameter accepted.
pub const MAX_A: f64 = 1000.0;

/// The ITU-T G.711 compression parameter.
pub const G711_A: f64 = 87.6;

const DEFAULT_BIT_DEPTH: u32 = 8;

/// A-law companding parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompandingParams {
    /// Bits per sample of the uniform quantizer, 1 to 24.
    pub bit_depth: u32,
    /// Compression parameter `A`.
    pub a: f64,
    /// When false the A-law stages are skipped and only the quantizer runs.
    pub companding: bool,
}

impl Default for CompandingParams {
    fn default() -> Self {
        Self {
            bit_depth: DEFAULT_BIT_DEPTH,
            a: G711_A,
            companding: true,
        }
    }
}

impl CompandingParams {
    /// Applies the clamping rules to every field.
    pub fn validated(self) -> Self {
        let a = if self.a.is_finite() {
            self.a.clamp(MIN_A, MAX_A)
        } else {
            G711_A
        };
        Self {
            bit_depth: self.bit_depth.clamp(MIN_BIT_DEPTH, MAX_BIT_DEPTH),
            a,
            companding: self.companding,
        }
    }
}

/// A-law compression of a sample in [-1, 1].
pub fn a_law_compress(x: f64, a: f64) -> f64 {
    let denom = 1.0 + a.ln();
    let magnitude = x.abs();
    let y = if magnitude < 1.0 / a {
        a * magnitude / denom
    } else {
        (1.0 + (a * magnitude).ln()) / denom
    };
    y.copysign(x)
}

/// Inverse of [`a_law_compress`].
pub fn a_law_expand(y: f64, a: f64) -> f64 {
    let denom = 1.0 + a.ln();
    let magnitude = y.abs();
    let x = if magnitude < 1.0 / denom {
        magnitude * denom / a
    } else {
        (magnitude * denom - 1.0).exp() / a
    };
    x.copysign(y)
}

/// Compress, quantize, expand.
#[derive(Debug, Clone, Default)]
pub struct CompandingEffect {
    params: CompandingParams,
}

impl CompandingEffect {
    /// Creates the effect, clamping the given parameters.
    pub fn new(params: CompandingParams) -> Self {
        Self {
            params: params.validated(),
        }
    }

    /// Current (validated) parameters.
    pub fn config(&self) -> &CompandingParams {
        &self.params
    }

    fn code_sample(&self, sample: f64, levels: f64) -> f64 {
        let a = self.params.a;
        if self.params.companding {
            a_law_expand(quantize(a_law_compress(sample, a), levels), a)
        } else {
            quantize(sample, levels)
        }
    }
}

impl Effect for CompandingEffect {
    fn name(&self) -> &'static str {
        "companding"
    }

    fn process(
        &self,
        input: &AudioBuffer,
        sample_rate: u32,
        _seed: u32,
    ) -> AudioResult<AudioBuffer> {
        check_sample_rate(sample_rate)?;
        let levels = f64::from(self.params.bit_depth).exp2();

        // Overloaded input is scaled back into range before coding
        let loudest = peak(&input.to_interleaved());
        let gain = if loudest > 1.0 { 1.0 / loudest } else { 1.0 };

        let channels = input
            .channels()
            .iter()
            .map(|ch| {
                ch.iter()
                    .map(|&s| self.code_sample(s * gain, levels))
                    .collect()
            })
            .collect();
        assemble(self.name(), input, channels)
    }

    fn params(&self) -> ParamSnapshot {
        let p = &self.params;
        let mut snapshot = ParamSnapshot::new();
        snapshot.insert("bit_depth".into(), p.bit_depth.into());
        snapshot.insert("a".into(), p.a.into());
        snapshot.insert("companding".into(), p.companding.into());
        snapshot
    }

    fn set_param(&mut self, name: &str, value: ParamValue) {
        let mut next = self.params.clone();
        match name {
            "bit_depth" => next.bit_depth = value.as_u32().unwrap_or(DEFAULT_BIT_DEPTH),
            "a" => next.a = value.as_f64().unwrap_or(G711_A),
            "companding" => next.companding = value.as_bool().unwrap_or(true),
            _ => return,
        }
        self.params = next.validated();
    }
}
