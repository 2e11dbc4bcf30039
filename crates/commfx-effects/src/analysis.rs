//! Signal measurements used by tests and the CLI report.
//!
//! All functions are pure and deterministic.

use crate::spectral::forward_fft;
use std::f64::consts::PI;

/// Lowest frequency considered by [`dominant_frequency`].
const MIN_DOMINANT_HZ: f64 = 20.0;

/// Error power below which [`snr_db`] reports an infinite SNR.
const NOISE_FLOOR: f64 = 1e-10;

/// Peak absolute sample value.
pub fn peak(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0_f64, |a, &b| a.max(b.abs()))
}

/// Root-mean-square level.
pub fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt()
}

/// Frequency of the strongest spectral bin, in Hz.
///
/// Uses a Hann-windowed FFT over the whole signal, so the resolution is
/// `sample_rate / samples.len()`. Bins below 20 Hz are ignored. Returns 0.0
/// for signals too short to analyze.
pub fn dominant_frequency(samples: &[f64], sample_rate: f64) -> f64 {
    let n = samples.len();
    if n < 64 {
        return 0.0;
    }

    let windowed: Vec<f64> = samples
        .iter()
        .enumerate()
        .map(|(i, &s)| s * 0.5 * (1.0 - (2.0 * PI * i as f64 / n as f64).cos()))
        .collect();
    let spectrum = forward_fft(&windowed);

    let resolution = sample_rate / n as f64;
    let min_bin = (MIN_DOMINANT_HZ / resolution).ceil() as usize;

    let mut max_magnitude = 0.0;
    let mut max_bin = 0;
    for (i, c) in spectrum.iter().enumerate().take(n / 2 + 1).skip(min_bin) {
        let magnitude = c.norm();
        if magnitude > max_magnitude {
            max_magnitude = magnitude;
            max_bin = i;
        }
    }

    max_bin as f64 * resolution
}

/// Signal-to-noise ratio of `processed` against `reference`, in dB.
///
/// The signals are aligned to their common length and the difference is
/// treated as noise. Returns `f64::INFINITY` when they are (near) identical.
pub fn snr_db(reference: &[f64], processed: &[f64]) -> f64 {
    let len = reference.len().min(processed.len());
    let reference = &reference[..len];
    let processed = &processed[..len];

    let signal_power: f64 = reference.iter().map(|s| s * s).sum();
    let noise_power: f64 = reference
        .iter()
        .zip(processed)
        .map(|(a, b)| (a - b) * (a - b))
        .sum();

    if noise_power < NOISE_FLOOR {
        return f64::INFINITY;
    }
    10.0 * (signal_power / noise_power).log10()
}

/// Largest normalized cross-correlation between `a` and `b` over lags
/// `-max_lag..=max_lag`.
///
/// Each lag compares the overlapping region only, normalized by the energy of
/// that region, so the result lies in [-1, 1] and is insensitive to gain.
pub fn max_normalized_correlation(a: &[f64], b: &[f64], max_lag: usize) -> f64 {
    let len = a.len().min(b.len());
    let max_lag = max_lag.min(len.saturating_sub(1));
    let mut best = f64::NEG_INFINITY;

    for lag in -(max_lag as isize)..=(max_lag as isize) {
        let (a_start, b_start) = if lag >= 0 {
            (0, lag as usize)
        } else {
            ((-lag) as usize, 0)
        };
        let overlap = len - lag.unsigned_abs();
        let a_seg = &a[a_start..a_start + overlap];
        let b_seg = &b[b_start..b_start + overlap];

        let dot: f64 = a_seg.iter().zip(b_seg).map(|(x, y)| x * y).sum();
        let energy_a: f64 = a_seg.iter().map(|x| x * x).sum();
        let energy_b: f64 = b_seg.iter().map(|y| y * y).sum();
        let denom = (energy_a * energy_b).sqrt();

        if denom > 0.0 {
            best = best.max(dot / denom);
        }
    }

    if best.is_finite() {
        best
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, sample_rate: f64, len: usize, phase: f64) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f64 / sample_rate + phase).sin())
            .collect()
    }

    #[test]
    fn test_peak_and_rms() {
        assert_eq!(peak(&[0.1, -0.8, 0.5]), 0.8);
        assert_eq!(rms(&[]), 0.0);

        let tone = sine(100.0, 8000.0, 8000, 0.0);
        assert!((rms(&tone) - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-3);
    }

    #[test]
    fn test_dominant_frequency_of_tone() {
        let sr = 44100.0;
        let tone = sine(440.0, sr, 44100, 0.0);
        let freq = dominant_frequency(&tone, sr);
        assert!((freq - 440.0).abs() <= 1.0, "got {}", freq);
    }

    #[test]
    fn test_dominant_frequency_ignores_dc() {
        let sr = 8000.0;
        let signal: Vec<f64> = sine(1000.0, sr, 4000, 0.0)
            .iter()
            .map(|s| 0.3 * s + 5.0)
            .collect();
        let freq = dominant_frequency(&signal, sr);
        assert!((freq - 1000.0).abs() <= 2.0, "got {}", freq);

        assert_eq!(dominant_frequency(&[1.0; 10], sr), 0.0);
    }

    #[test]
    fn test_snr() {
        let reference = sine(440.0, 44100.0, 1000, 0.0);
        assert_eq!(snr_db(&reference, &reference), f64::INFINITY);

        let scaled: Vec<f64> = reference.iter().map(|s| s * 0.9).collect();
        // Error is 10% of the signal: 20 dB
        assert!((snr_db(&reference, &scaled) - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_correlation_finds_shifted_copy() {
        let sr = 8000.0;
        let a = sine(200.0, sr, 2000, 0.0);
        let b: Vec<f64> = sine(200.0, sr, 2000, -0.5).iter().map(|s| s * 0.2).collect();

        assert!(max_normalized_correlation(&a, &b, 40) > 0.99);
        assert!(max_normalized_correlation(&a, &b, 0) < 0.9);
    }

    #[test]
    fn test_correlation_of_silence_is_zero() {
        assert_eq!(max_normalized_correlation(&[0.0; 10], &[1.0; 10], 3), 0.0);
        assert_eq!(max_normalized_correlation(&[], &[], 3), 0.0);
    }
}
