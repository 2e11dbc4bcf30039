//! Filter designs used by the effects.
//!
//! This module provides second-order biquads (coefficients from the Audio EQ
//! Cookbook, Q = 0.707 giving a Butterworth response), first-order bilinear
//! low/high-pass sections, and windowed-sinc FIR design in [`fir`]. Filters
//! are built fresh for every `process` call and never cached.

pub mod fir;

pub use fir::{design_lowpass_fir, fir_filter_same};

use std::f64::consts::PI;

/// Butterworth Q for a second-order section.
pub const BUTTERWORTH_Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Highest cutoff allowed, as a fraction of the Nyquist frequency.
const MAX_CUTOFF_RATIO: f64 = 0.98;

/// Lowest cutoff allowed, as a fraction of the Nyquist frequency.
const MIN_CUTOFF_RATIO: f64 = 1e-4;

/// Keeps a cutoff strictly inside `(0, nyquist)` so every design is feasible.
pub fn clamp_cutoff(cutoff: f64, sample_rate: f64) -> f64 {
    let nyquist = sample_rate / 2.0;
    cutoff
        .min(nyquist * MAX_CUTOFF_RATIO)
        .max(nyquist * MIN_CUTOFF_RATIO)
}

/// Biquad filter coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoeffs {
    /// Creates lowpass filter coefficients.
    ///
    /// # Arguments
    /// * `cutoff` - Cutoff frequency in Hz (clamped inside Nyquist)
    /// * `q` - Q factor, 0.707 is Butterworth
    /// * `sample_rate` - Sample rate in Hz
    pub fn lowpass(cutoff: f64, q: f64, sample_rate: f64) -> Self {
        let (sin_omega, cos_omega) = omega(cutoff, sample_rate);
        let alpha = sin_omega / (2.0 * q.max(0.5));

        Self::normalize(
            (1.0 - cos_omega) / 2.0,
            1.0 - cos_omega,
            (1.0 - cos_omega) / 2.0,
            1.0 + alpha,
            -2.0 * cos_omega,
            1.0 - alpha,
        )
    }

    /// Creates highpass filter coefficients.
    pub fn highpass(cutoff: f64, q: f64, sample_rate: f64) -> Self {
        let (sin_omega, cos_omega) = omega(cutoff, sample_rate);
        let alpha = sin_omega / (2.0 * q.max(0.5));

        Self::normalize(
            (1.0 + cos_omega) / 2.0,
            -(1.0 + cos_omega),
            (1.0 + cos_omega) / 2.0,
            1.0 + alpha,
            -2.0 * cos_omega,
            1.0 - alpha,
        )
    }

    /// Creates bandpass filter coefficients (constant 0 dB peak gain).
    ///
    /// # Arguments
    /// * `center` - Center frequency in Hz
    /// * `q` - Q factor (bandwidth = center / Q)
    /// * `sample_rate` - Sample rate in Hz
    pub fn bandpass(center: f64, q: f64, sample_rate: f64) -> Self {
        let (sin_omega, cos_omega) = omega(center, sample_rate);
        let alpha = sin_omega / (2.0 * q.max(0.5));

        Self::normalize(
            alpha,
            0.0,
            -alpha,
            1.0 + alpha,
            -2.0 * cos_omega,
            1.0 - alpha,
        )
    }

    fn normalize(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

fn omega(freq: f64, sample_rate: f64) -> (f64, f64) {
    let w = 2.0 * PI * clamp_cutoff(freq, sample_rate) / sample_rate;
    (w.sin(), w.cos())
}

/// Biquad filter state.
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    coeffs: BiquadCoeffs,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl BiquadFilter {
    /// Creates a new biquad filter with the given coefficients.
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Creates a Butterworth lowpass filter.
    pub fn lowpass(cutoff: f64, sample_rate: f64) -> Self {
        Self::new(BiquadCoeffs::lowpass(cutoff, BUTTERWORTH_Q, sample_rate))
    }

    /// Creates a Butterworth highpass filter.
    pub fn highpass(cutoff: f64, sample_rate: f64) -> Self {
        Self::new(BiquadCoeffs::highpass(cutoff, BUTTERWORTH_Q, sample_rate))
    }

    /// Creates a bandpass filter spanning `low..high` Hz.
    ///
    /// The center is the geometric mean of the edges and Q follows from the
    /// bandwidth.
    pub fn bandpass_edges(low: f64, high: f64, sample_rate: f64) -> Self {
        let center = (low * high).sqrt();
        let q = center / (high - low).max(f64::EPSILON);
        Self::new(BiquadCoeffs::bandpass(center, q, sample_rate))
    }

    /// Processes a single sample through the filter.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.coeffs.b0 * input + self.coeffs.b1 * self.x1 + self.coeffs.b2 * self.x2
            - self.coeffs.a1 * self.y1
            - self.coeffs.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Processes a buffer of samples, returning a new buffer.
    pub fn process_buffer_copy(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&s| self.process(s)).collect()
    }
}

/// First-order filter designed with the bilinear transform.
///
/// Used as the matched pre-emphasis (highpass) / de-emphasis (lowpass) pair.
#[derive(Debug, Clone)]
pub struct FirstOrderFilter {
    b0: f64,
    b1: f64,
    a1: f64,
    x1: f64,
    y1: f64,
}

impl FirstOrderFilter {
    /// Creates a first-order Butterworth lowpass.
    pub fn lowpass(cutoff: f64, sample_rate: f64) -> Self {
        let k = prewarp(cutoff, sample_rate);
        Self::with_coeffs(k / (1.0 + k), k / (1.0 + k), (k - 1.0) / (k + 1.0))
    }

    /// Creates a first-order Butterworth highpass.
    pub fn highpass(cutoff: f64, sample_rate: f64) -> Self {
        let k = prewarp(cutoff, sample_rate);
        Self::with_coeffs(1.0 / (1.0 + k), -1.0 / (1.0 + k), (k - 1.0) / (k + 1.0))
    }

    fn with_coeffs(b0: f64, b1: f64, a1: f64) -> Self {
        Self {
            b0,
            b1,
            a1,
            x1: 0.0,
            y1: 0.0,
        }
    }

    /// Processes a single sample.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.b0 * input + self.b1 * self.x1 - self.a1 * self.y1;
        self.x1 = input;
        self.y1 = output;
        output
    }

    /// Processes a buffer of samples, returning a new buffer.
    pub fn process_buffer_copy(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&s| self.process(s)).collect()
    }
}

fn prewarp(cutoff: f64, sample_rate: f64) -> f64 {
    (PI * clamp_cutoff(cutoff, sample_rate) / sample_rate).tan()
}
