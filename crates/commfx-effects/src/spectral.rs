//! FFT helpers built on `rustfft`.
//!
//! Spectra produced here are ephemeral: created and consumed inside a single
//! effect call for a single channel.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::f64::consts::PI;

/// Forward DFT of a real signal.
pub fn forward_fft(signal: &[f64]) -> Vec<Complex<f64>> {
    let mut spectrum: Vec<Complex<f64>> = signal.iter().map(|&s| Complex::new(s, 0.0)).collect();
    if spectrum.is_empty() {
        return spectrum;
    }
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(spectrum.len());
    fft.process(&mut spectrum);
    spectrum
}

/// Inverse DFT, normalized by `1/N`.
pub fn inverse_fft(mut spectrum: Vec<Complex<f64>>) -> Vec<Complex<f64>> {
    let n = spectrum.len();
    if n == 0 {
        return spectrum;
    }
    let mut planner = FftPlanner::new();
    let ifft = planner.plan_fft_inverse(n);
    ifft.process(&mut spectrum);

    let scale = 1.0 / n as f64;
    for c in spectrum.iter_mut() {
        *c *= scale;
    }
    spectrum
}

/// Frequency in Hz of each DFT bin, in standard FFT order.
///
/// Bins `0..=(n-1)/2` are non-negative; the rest are negative frequencies.
pub fn fft_frequencies(n: usize, sample_rate: f64) -> Vec<f64> {
    let resolution = sample_rate / n.max(1) as f64;
    (0..n)
        .map(|i| {
            let k = if i <= (n - 1) / 2 {
                i as f64
            } else {
                i as f64 - n as f64
            };
            k * resolution
        })
        .collect()
}

/// Analytic signal of a real input (FFT-based Hilbert transform).
///
/// The real part equals the input; the imaginary part is its Hilbert
/// transform. Negative-frequency bins are zeroed and positive ones doubled.
pub fn analytic_signal(signal: &[f64]) -> Vec<Complex<f64>> {
    let n = signal.len();
    let mut spectrum = forward_fft(signal);
    if n == 0 {
        return spectrum;
    }

    let half = n / 2;
    for (i, c) in spectrum.iter_mut().enumerate() {
        let weight = if i == 0 || (n % 2 == 0 && i == half) {
            1.0
        } else if i <= (n - 1) / 2 {
            2.0
        } else {
            0.0
        };
        *c *= weight;
    }

    inverse_fft(spectrum)
}

/// Removes 2π jumps between consecutive phase samples.
pub fn unwrap_phase(phase: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(phase.len());
    let mut offset = 0.0;
    let mut prev: Option<f64> = None;

    for &p in phase {
        if let Some(last) = prev {
            let mut delta = p - last;
            while delta > PI {
                delta -= 2.0 * PI;
                offset -= 2.0 * PI;
            }
            while delta < -PI {
                delta += 2.0 * PI;
                offset += 2.0 * PI;
            }
        }
        out.push(p + offset);
        prev = Some(p);
    }
    out
}
