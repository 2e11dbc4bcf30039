//! Carrier recovery for suppressed-carrier modes.
//!
//! Squaring `x(t) cos(wt + p)` leaves a tone at `2w` with phase `2p`. That
//! tone is isolated with a narrow bandpass, its instantaneous phase is
//! measured from the analytic signal and halved, and a straight line through
//! the halved phase gives the carrier's frequency and phase. Halving leaves
//! the phase filtering error and a possible half-turn ambiguity, so a final
//! search over candidate phase offsets keeps the one that demodulates the
//! most energy.

use std::f64::consts::PI;

use super::demodulator::DEMOD_CUTOFF_HZ;
use crate::filter::BiquadFilter;
use crate::spectral::{analytic_signal, unwrap_phase};

/// Half-width of the bandpass around the doubled carrier, in Hz.
pub(super) const RECOVERY_HALF_BANDWIDTH_HZ: f64 = 100.0;

/// Number of phase offsets tried when aligning the recovered carrier.
pub(super) const CANDIDATE_PHASES: usize = 64;

/// Fraction of the signal skipped by the line fit while the bandpass settles.
const SETTLE_FRACTION: f64 = 0.1;

/// Highest bandpass edge, as a fraction of Nyquist.
const MAX_EDGE_RATIO: f64 = 0.98;

/// Where the doubled carrier is looked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct RecoveryBand {
    pub low: f64,
    pub high: f64,
    /// The doubled carrier sits above Nyquist and appears mirrored.
    pub folded: bool,
}

impl RecoveryBand {
    /// Band of width 200 Hz around `2 * carrier_freq`, folded below Nyquist
    /// when needed and clamped to the nearest feasible band.
    pub fn around_doubled(carrier_freq: f64, sample_rate: f64) -> Self {
        let nyquist = sample_rate / 2.0;
        let doubled = 2.0 * carrier_freq;
        let folded = doubled > nyquist;
        let center = if folded { sample_rate - doubled } else { doubled };

        let high = (center + RECOVERY_HALF_BANDWIDTH_HZ).min(nyquist * MAX_EDGE_RATIO);
        let mut low = (center - RECOVERY_HALF_BANDWIDTH_HZ).max(1.0);
        if low >= high {
            // Requested band lies past the top edge; use the nearest one below it.
            low = (high - 2.0 * RECOVERY_HALF_BANDWIDTH_HZ).max(high * 0.5);
        }

        Self { low, high, folded }
    }
}

/// Rebuilds the carrier of a suppressed-carrier signal.
///
/// Returns `received.len()` samples of a unit cosine aligned with the
/// transmitted carrier up to the residual estimation error.
pub(super) fn recover_carrier(received: &[f64], carrier_freq: f64, sample_rate: f64) -> Vec<f64> {
    let len = received.len();
    let nominal_step = 2.0 * PI * carrier_freq / sample_rate;
    if len < 2 {
        return (0..len).map(|n| (nominal_step * n as f64).cos()).collect();
    }

    let band = RecoveryBand::around_doubled(carrier_freq, sample_rate);
    let squared: Vec<f64> = received.iter().map(|s| s * s).collect();
    let mut stage1 = BiquadFilter::bandpass_edges(band.low, band.high, sample_rate);
    let mut stage2 = BiquadFilter::bandpass_edges(band.low, band.high, sample_rate);
    let tone: Vec<f64> = squared
        .iter()
        .map(|&s| stage2.process(stage1.process(s)))
        .collect();

    let wrapped: Vec<f64> = analytic_signal(&tone).iter().map(|z| z.arg()).collect();
    let measured = unwrap_phase(&wrapped);

    let halved: Vec<f64> = measured
        .iter()
        .enumerate()
        .map(|(n, &p)| {
            let doubled = if band.folded {
                2.0 * PI * n as f64 - p
            } else {
                p
            };
            doubled / 2.0
        })
        .collect();

    let settle = ((len as f64 * SETTLE_FRACTION) as usize).min(len - 2);
    let (step, offset) = fit_line(&halved[settle..], settle).unwrap_or((nominal_step, 0.0));

    let delta = best_phase_offset(received, step, offset, sample_rate);
    (0..len)
        .map(|n| (step * n as f64 + offset + delta).cos())
        .collect()
}

/// Least-squares line `y = slope * n + intercept` through samples starting at `start`.
fn fit_line(ys: &[f64], start: usize) -> Option<(f64, f64)> {
    let count = ys.len() as f64;
    if ys.len() < 2 {
        return None;
    }
    let mean_n = start as f64 + (count - 1.0) / 2.0;
    let mean_y = ys.iter().sum::<f64>() / count;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, &y) in ys.iter().enumerate() {
        let dn = (start + i) as f64 - mean_n;
        sxy += dn * (y - mean_y);
        sxx += dn * dn;
    }
    if sxx <= 0.0 || !sxy.is_finite() {
        return None;
    }
    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_n))
}

/// Phase offset, out of [`CANDIDATE_PHASES`] evenly spaced ones, that
/// maximizes the energy of the synchronously detected baseband.
///
/// With in-phase and quadrature products `I` and `Q` low-passed to the
/// message band, detecting with offset `d` gives `I cos d - Q sin d`, so each
/// candidate is scored from three sums without re-filtering.
fn best_phase_offset(received: &[f64], step: f64, offset: f64, sample_rate: f64) -> f64 {
    let mut i_filter = BiquadFilter::lowpass(DEMOD_CUTOFF_HZ, sample_rate);
    let mut q_filter = BiquadFilter::lowpass(DEMOD_CUTOFF_HZ, sample_rate);

    let (mut ii, mut iq, mut qq) = (0.0, 0.0, 0.0);
    for (n, &r) in received.iter().enumerate() {
        let theta = step * n as f64 + offset;
        let i = i_filter.process(r * theta.cos());
        let q = q_filter.process(r * theta.sin());
        ii += i * i;
        iq += i * q;
        qq += q * q;
    }

    let mut best_delta = 0.0;
    let mut best_energy = f64::NEG_INFINITY;
    for k in 0..CANDIDATE_PHASES {
        let delta = 2.0 * PI * k as f64 / CANDIDATE_PHASES as f64;
        let (sin_d, cos_d) = delta.sin_cos();
        let energy = ii * cos_d * cos_d - 2.0 * iq * sin_d * cos_d + qq * sin_d * sin_d;
        if energy > best_energy {
            best_energy = energy;
            best_delta = delta;
        }
    }
    best_delta
}
