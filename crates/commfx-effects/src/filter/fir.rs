//! Windowed-sinc FIR design and delay-compensated FIR filtering.

use std::f64::consts::PI;

/// Designs a linear-phase lowpass FIR (Hamming-windowed sinc).
///
/// The tap count is forced odd so the filter has an integer group delay.
/// Taps are scaled for unity gain at DC.
///
/// # Arguments
/// * `num_taps` - Requested number of taps (rounded up to odd)
/// * `cutoff` - Cutoff as a fraction of Nyquist, in (0, 1]
pub fn design_lowpass_fir(num_taps: usize, cutoff: f64) -> Vec<f64> {
    let num_taps = if num_taps % 2 == 0 { num_taps + 1 } else { num_taps };
    let cutoff = cutoff.clamp(f64::EPSILON, 1.0);
    let center = (num_taps - 1) as f64 / 2.0;

    let mut taps: Vec<f64> = (0..num_taps)
        .map(|n| {
            let m = n as f64 - center;
            cutoff * sinc(cutoff * m) * hamming(n, num_taps)
        })
        .collect();

    let sum: f64 = taps.iter().sum();
    if sum.abs() > f64::EPSILON {
        for t in taps.iter_mut() {
            *t /= sum;
        }
    }
    taps
}

/// Convolves `signal` with `taps`, aligned so the filter's group delay is removed.
///
/// The output has the same length as the input; samples beyond either end
/// are treated as zero.
pub fn fir_filter_same(signal: &[f64], taps: &[f64]) -> Vec<f64> {
    let len = signal.len();
    let half = taps.len() / 2;
    let mut output = vec![0.0; len];

    // Scatter form: silent input positions (zero-stuffing) cost nothing.
    for (i, &x) in signal.iter().enumerate() {
        if x == 0.0 {
            continue;
        }
        for (j, &h) in taps.iter().enumerate() {
            let n = i + j;
            if n < half {
                continue;
            }
            let n = n - half;
            if n >= len {
                break;
            }
            output[n] += h * x;
        }
    }
    output
}

#[inline]
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

#[inline]
fn hamming(n: usize, size: usize) -> f64 {
    if size <= 1 {
        return 1.0;
    }
    0.54 - 0.46 * (2.0 * PI * n as f64 / (size - 1) as f64).cos()
}
