//! Integer-factor rate conversion.
//!
//! [`upsample`] zero-stuffs and removes the resulting spectral images with a
//! windowed-sinc lowpass; [`downsample`] keeps every k-th sample and does no
//! filtering, so any content above the new Nyquist frequency aliases. Callers
//! that do not want that aliasing must band-limit beforehand.

use crate::filter::{design_lowpass_fir, fir_filter_same};

/// Tap count of the anti-imaging filter.
pub const INTERPOLATION_TAPS: usize = 31;

/// Raises the sample rate by an integer factor.
///
/// The output has `channel.len() * factor` samples. The anti-imaging filter
/// has normalized cutoff `1 / factor` and is scaled so the original samples
/// reappear unchanged at positions `i * factor`. A factor of 0 or 1 returns
/// a copy of the input.
pub fn upsample(channel: &[f64], factor: usize) -> Vec<f64> {
    if factor <= 1 {
        return channel.to_vec();
    }

    let mut stuffed = vec![0.0; channel.len() * factor];
    for (i, &s) in channel.iter().enumerate() {
        stuffed[i * factor] = s;
    }

    let taps = interpolation_taps(factor);
    fir_filter_same(&stuffed, &taps)
}

/// Lowers the sample rate by keeping every `factor`-th sample.
///
/// A factor of 0 or 1 returns a copy of the input.
pub fn downsample(channel: &[f64], factor: usize) -> Vec<f64> {
    if factor <= 1 {
        return channel.to_vec();
    }
    channel.iter().step_by(factor).copied().collect()
}

/// Lowpass taps for `factor`x interpolation, center tap scaled to 1.0.
///
/// Every other tap at a multiple of `factor` from the center is a zero of the
/// sinc, so stuffed samples pass through exactly.
fn interpolation_taps(factor: usize) -> Vec<f64> {
    let mut taps = design_lowpass_fir(INTERPOLATION_TAPS, 1.0 / factor as f64);
    let center = taps[taps.len() / 2];
    for t in taps.iter_mut() {
        *t /= center;
    }
    taps
}
