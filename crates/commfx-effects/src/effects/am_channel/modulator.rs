//! Transmit side: preprocessing, carrier generation, modulation and channel noise.

use rand::Rng;
use rand_pcg::Pcg32;
use rustfft::num_complex::Complex;
use std::f64::consts::PI;

use super::types::AmMode;
use crate::buffer::peak_normalize;
use crate::filter::{BiquadFilter, FirstOrderFilter};
use crate::rng::gaussian;
use crate::spectral::analytic_signal;

/// Pre-emphasis / de-emphasis corner frequency in Hz.
pub(super) const EMPHASIS_CUTOFF_HZ: f64 = 3000.0;

/// A cosine carrier with fixed frequency and starting phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Carrier {
    pub frequency: f64,
    pub phase: f64,
}

impl Carrier {
    /// Draws a carrier with a frequency error within `nominal * tolerance`
    /// and a uniformly random phase.
    pub fn jittered(nominal: f64, tolerance: f64, rng: &mut Pcg32) -> Self {
        let offset = (rng.gen::<f64>() * 2.0 - 1.0) * nominal * tolerance;
        let phase = rng.gen::<f64>() * 2.0 * PI;
        Self {
            frequency: nominal + offset,
            phase,
        }
    }

    pub fn samples(&self, len: usize, sample_rate: f64) -> Vec<f64> {
        let step = 2.0 * PI * self.frequency / sample_rate;
        (0..len)
            .map(|n| (step * n as f64 + self.phase).cos())
            .collect()
    }
}

/// Peak-normalizes the channel and optionally applies pre-emphasis.
pub(super) fn preprocess(channel: &[f64], pre_emphasis: bool, sample_rate: f64) -> Vec<f64> {
    let mut signal = channel.to_vec();
    peak_normalize(&mut signal);

    if pre_emphasis {
        FirstOrderFilter::highpass(EMPHASIS_CUTOFF_HZ, sample_rate).process_buffer_copy(&signal)
    } else {
        signal
    }
}

/// Modulates `message` onto `carrier`.
pub(super) fn modulate(
    message: &[f64],
    carrier: &[f64],
    mode: AmMode,
    modulation_index: f64,
    carrier_freq: f64,
    sample_rate: f64,
) -> Vec<f64> {
    let m = modulation_index;
    match mode {
        AmMode::Standard => message
            .iter()
            .zip(carrier)
            .map(|(x, c)| (1.0 + m * x) * c)
            .collect(),
        AmMode::DsbSc => message.iter().zip(carrier).map(|(x, c)| m * x * c).collect(),
        AmMode::Ssb => {
            let product: Vec<Complex<f64>> = analytic_signal(message)
                .into_iter()
                .zip(carrier)
                .map(|(a, &c)| a * (m * c))
                .collect();

            // The lowpass has real coefficients, so the real part of the
            // filtered product is the filtered real part.
            let mut lowpass = BiquadFilter::lowpass(carrier_freq, sample_rate);
            product.iter().map(|z| lowpass.process(z.re)).collect()
        }
    }
}

/// Adds white Gaussian noise at `snr_db` below the signal's mean-square power.
pub(super) fn add_channel_noise(signal: &mut [f64], snr_db: f64, rng: &mut Pcg32) {
    if signal.is_empty() {
        return;
    }
    let signal_power = signal.iter().map(|s| s * s).sum::<f64>() / signal.len() as f64;
    let noise_power = signal_power / 10f64.powf(snr_db / 10.0);
    let sigma = noise_power.sqrt();

    for s in signal.iter_mut() {
        *s += sigma * gaussian(rng);
    }
}
