//! Convolution reverb with a synthetic impulse response.
//!
//! The room (or device) is a linear time-invariant system described by its
//! impulse response; the wet signal is the input convolved with it, computed
//! as a product of spectra. The response is synthesized from seeded noise
//! shaped by a decay envelope.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use super::{assemble, check_sample_rate, Effect};
use crate::analysis::peak;
use crate::buffer::AudioBuffer;
use crate::error::AudioResult;
use crate::params::{ParamSnapshot, ParamValue};
use crate::rng::{create_channel_rng, gaussian};
use crate::spectral::{forward_fft, inverse_fft};

const DEFAULT_MIX: f64 = 0.3;

/// Added to the wet peak before normalizing so silence stays finite.
const WET_PEAK_FLOOR: f64 = 1e-9;

/// Key under which the impulse-response noise stream is derived.
const RNG_KEY: &str = "convolution_reverb";

/// Shape of the synthetic impulse response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImpulseKind {
    /// Two-second metallic spring tank: noise times a 50 Hz/s chirp, slow decay.
    #[default]
    Spring,
    /// Short, dull reflections inside a small cabinet (0.2 s, fast decay).
    OldRadio,
}

impl ImpulseKind {
    /// Parses a kind name. Unknown names give [`ImpulseKind::Spring`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "old_radio" => ImpulseKind::OldRadio,
            _ => ImpulseKind::Spring,
        }
    }

    /// Canonical kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpulseKind::Spring => "spring",
            ImpulseKind::OldRadio => "old_radio",
        }
    }

    /// Length of the response in seconds.
    pub fn duration(&self) -> f64 {
        match self {
            ImpulseKind::Spring => 2.0,
            ImpulseKind::OldRadio => 0.2,
        }
    }

    /// Deterministic part of the response at time `t` seconds.
    fn shape(&self, t: f64) -> f64 {
        match self {
            ImpulseKind::Spring => (2.0 * PI * 50.0 * t * t).sin() * (-3.0 * t).exp(),
            ImpulseKind::OldRadio => (-20.0 * t).exp(),
        }
    }
}

impl fmt::Display for ImpulseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ImpulseKind {
    fn from(name: String) -> Self {
        ImpulseKind::from_name(&name)
    }
}

impl From<ImpulseKind> for String {
    fn from(kind: ImpulseKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Convolution reverb parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverbParams {
    /// Impulse response shape.
    pub ir_type: ImpulseKind,
    /// Wet share of the output, 0 (dry) to 1 (wet only).
    pub mix: f64,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            ir_type: ImpulseKind::Spring,
            mix: DEFAULT_MIX,
        }
    }
}

impl ReverbParams {
    /// Clamps the mix into [0, 1].
    pub fn validated(self) -> Self {
        let mix = if self.mix.is_finite() {
            self.mix.clamp(0.0, 1.0)
        } else {
            DEFAULT_MIX
        };
        Self {
            ir_type: self.ir_type,
            mix,
        }
    }
}

/// Synthesizes an impulse response of `kind` at `sample_rate`, peak-normalized.
///
/// Time runs from 0 to the kind's duration inclusive over the response's
/// samples.
pub fn synthetic_ir(kind: ImpulseKind, sample_rate: f64, rng: &mut Pcg32) -> Vec<f64> {
    let len = (sample_rate * kind.duration()) as usize;
    let dt = kind.duration() / len.saturating_sub(1).max(1) as f64;

    let mut ir: Vec<f64> = (0..len)
        .map(|i| gaussian(rng) * kind.shape(i as f64 * dt))
        .collect();

    let loudest = peak(&ir);
    if loudest > 0.0 {
        for s in ir.iter_mut() {
            *s /= loudest;
        }
    }
    ir
}

/// Linear convolution of `signal` with `ir`, truncated to `signal.len()`.
///
/// Both are zero-padded to a power of two at least as long as the full
/// convolution, so the circular product has no wrap-around.
pub fn fft_convolve(signal: &[f64], ir: &[f64]) -> Vec<f64> {
    if signal.is_empty() || ir.is_empty() {
        return vec![0.0; signal.len()];
    }

    let size = (signal.len() + ir.len() - 1).next_power_of_two();
    let mut padded_signal = signal.to_vec();
    padded_signal.resize(size, 0.0);
    let mut padded_ir = ir.to_vec();
    padded_ir.resize(size, 0.0);

    let product = forward_fft(&padded_signal)
        .into_iter()
        .zip(forward_fft(&padded_ir))
        .map(|(a, b)| a * b)
        .collect();

    inverse_fft(product)
        .into_iter()
        .take(signal.len())
        .map(|c| c.re)
        .collect()
}

/// Convolution reverb.
#[derive(Debug, Clone, Default)]
pub struct ConvolutionReverb {
    params: ReverbParams,
}

impl ConvolutionReverb {
    /// Creates the effect, clamping the given parameters.
    pub fn new(params: ReverbParams) -> Self {
        Self {
            params: params.validated(),
        }
    }

    /// Current (validated) parameters.
    pub fn config(&self) -> &ReverbParams {
        &self.params
    }
}

impl Effect for ConvolutionReverb {
    fn name(&self) -> &'static str {
        "convolution_reverb"
    }

    fn process(
        &self,
        input: &AudioBuffer,
        sample_rate: u32,
        seed: u32,
    ) -> AudioResult<AudioBuffer> {
        let rate = check_sample_rate(sample_rate)?;
        let mix = self.params.mix;

        // One response shared by every channel
        let mut rng = create_channel_rng(seed, RNG_KEY, 0);
        let ir = synthetic_ir(self.params.ir_type, rate, &mut rng);

        let wet: Vec<Vec<f64>> = input
            .channels()
            .iter()
            .map(|ch| fft_convolve(ch, &ir))
            .collect();
        let wet_peak = wet.iter().map(|ch| peak(ch)).fold(0.0_f64, f64::max) + WET_PEAK_FLOOR;

        let channels = input
            .channels()
            .iter()
            .zip(&wet)
            .map(|(dry, wet)| {
                dry.iter()
                    .zip(wet)
                    .map(|(&d, &w)| d * (1.0 - mix) + w / wet_peak * mix)
                    .collect()
            })
            .collect();
        assemble(self.name(), input, channels)
    }

    fn params(&self) -> ParamSnapshot {
        let p = &self.params;
        let mut snapshot = ParamSnapshot::new();
        snapshot.insert("ir_type".into(), p.ir_type.as_str().into());
        snapshot.insert("mix".into(), p.mix.into());
        snapshot
    }

    fn set_param(&mut self, name: &str, value: ParamValue) {
        let mut next = self.params.clone();
        match name {
            "ir_type" => {
                next.ir_type = value
                    .as_str()
                    .map_or(ImpulseKind::Spring, ImpulseKind::from_name)
            }
            "mix" => next.mix = value.as_f64().unwrap_or(DEFAULT_MIX),
            _ => return,
        }
        self.params = next.validated();
    }
}
