//! Doppler shift by frequency-domain bin remapping.
//!
//! A moving source observed at rest is heard at `f * c / (c - v)`. Each
//! channel is optionally oversampled, transformed, its spectrum stretched by
//! the Doppler factor, transformed back, and returned to the input rate.

use rustfft::num_complex::Complex;
use serde::{Deserialize, Serialize};

use super::{assemble, check_sample_rate, Effect};
use crate::buffer::{fit_length, AudioBuffer};
use crate::error::{AudioError, AudioResult};
use crate::params::{ParamSnapshot, ParamValue};
use crate::resample::{downsample, upsample};
use crate::spectral::{fft_frequencies, forward_fft, inverse_fft};

/// Largest source speed accepted, in m/s (either direction).
pub const MAX_VELOCITY: f64 = 100.0;

/// Oversampling factors the effect accepts.
pub const SUPPORTED_OVERSAMPLE_FACTORS: [u32; 5] = [1, 2, 4, 8, 16];

/// Lowest frequency the remap ever keeps, in Hz.
const AUDIBLE_FLOOR_HZ: f64 = 20.0;

const DEFAULT_VELOCITY: f64 = 30.0;
const DEFAULT_SOUND_SPEED: f64 = 343.0;
const DEFAULT_OVERSAMPLE_FACTOR: u32 = 4;
const DEFAULT_FREQ_RANGE: (f64, f64) = (20.0, 15000.0);

/// Doppler effect parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DopplerParams {
    /// Source velocity towards the listener in m/s. Negative moves away.
    pub velocity: f64,
    /// Propagation speed in m/s.
    pub sound_speed: f64,
    /// Whether to oversample around the spectral remap.
    pub oversample: bool,
    /// Oversampling factor, one of 1, 2, 4, 8, 16.
    pub oversample_factor: u32,
    /// Band of source frequencies kept by the remap, in Hz.
    pub freq_range: (f64, f64),
}

impl Default for DopplerParams {
    fn default() -> Self {
        Self {
            velocity: DEFAULT_VELOCITY,
            sound_speed: DEFAULT_SOUND_SPEED,
            oversample: true,
            oversample_factor: DEFAULT_OVERSAMPLE_FACTOR,
            freq_range: DEFAULT_FREQ_RANGE,
        }
    }
}

impl DopplerParams {
    /// Applies the clamping rules to every field.
    pub fn validated(self) -> Self {
        let velocity = if self.velocity.is_finite() {
            self.velocity.clamp(-MAX_VELOCITY, MAX_VELOCITY)
        } else {
            DEFAULT_VELOCITY
        };

        let sound_speed = if self.sound_speed.is_finite() {
            self.sound_speed.max(1.0)
        } else {
            DEFAULT_SOUND_SPEED
        };

        let oversample_factor = if SUPPORTED_OVERSAMPLE_FACTORS.contains(&self.oversample_factor) {
            self.oversample_factor
        } else {
            DEFAULT_OVERSAMPLE_FACTOR
        };

        let (lo, hi) = self.freq_range;
        let freq_range = if lo.is_finite() && hi.is_finite() {
            let (lo, hi) = (lo.max(0.0), hi.max(0.0));
            if hi < lo {
                (hi, lo)
            } else {
                (lo, hi)
            }
        } else {
            DEFAULT_FREQ_RANGE
        };

        Self {
            velocity,
            sound_speed,
            oversample: self.oversample,
            oversample_factor,
            freq_range,
        }
    }

    /// `c / (c - v)`, or an error when the source moves at the propagation speed.
    pub fn doppler_factor(&self) -> AudioResult<f64> {
        let denominator = self.sound_speed - self.velocity;
        if denominator == 0.0 {
            return Err(AudioError::computation(format!(
                "velocity equals sound speed ({} m/s); Doppler factor is undefined",
                self.sound_speed
            )));
        }
        Ok(self.sound_speed / denominator)
    }

    /// Oversampling factor in effect, 1 when oversampling is disabled.
    pub fn effective_oversample(&self) -> usize {
        if self.oversample {
            self.oversample_factor as usize
        } else {
            1
        }
    }
}

/// Doppler shift effect.
#[derive(Debug, Clone, Default)]
pub struct DopplerEffect {
    params: DopplerParams,
}

impl DopplerEffect {
    /// Creates the effect, clamping the given parameters.
    pub fn new(params: DopplerParams) -> Self {
        Self {
            params: params.validated(),
        }
    }

    /// Current (validated) parameters.
    pub fn config(&self) -> &DopplerParams {
        &self.params
    }

    fn shift_channel(&self, channel: &[f64], sample_rate: f64, factor: f64) -> Vec<f64> {
        let oversample = self.params.effective_oversample();
        let working_rate = sample_rate * oversample as f64;

        let working = upsample(channel, oversample);
        let shifted = shift_spectrum(&working, working_rate, factor, self.params.freq_range);
        let restored = downsample(&shifted, oversample);

        fit_length(restored, channel.len())
    }
}

impl Effect for DopplerEffect {
    fn name(&self) -> &'static str {
        "doppler"
    }

    fn process(
        &self,
        input: &AudioBuffer,
        sample_rate: u32,
        _seed: u32,
    ) -> AudioResult<AudioBuffer> {
        let rate = check_sample_rate(sample_rate)?;
        let factor = self.params.doppler_factor()?;

        if factor == 1.0 {
            return Ok(input.clone());
        }

        let channels = input
            .channels()
            .iter()
            .map(|ch| self.shift_channel(ch, rate, factor))
            .collect();
        assemble(self.name(), input, channels)
    }

    fn params(&self) -> ParamSnapshot {
        let p = &self.params;
        let mut snapshot = ParamSnapshot::new();
        snapshot.insert("velocity".into(), p.velocity.into());
        snapshot.insert("sound_speed".into(), p.sound_speed.into());
        snapshot.insert("oversample".into(), p.oversample.into());
        snapshot.insert("oversample_factor".into(), p.oversample_factor.into());
        snapshot.insert("freq_range".into(), p.freq_range.into());
        snapshot
    }

    fn set_param(&mut self, name: &str, value: ParamValue) {
        let mut next = self.params.clone();
        match name {
            "velocity" => next.velocity = value.as_f64().unwrap_or(DEFAULT_VELOCITY),
            "sound_speed" => next.sound_speed = value.as_f64().unwrap_or(DEFAULT_SOUND_SPEED),
            "oversample" => next.oversample = value.as_bool().unwrap_or(true),
            "oversample_factor" => {
                next.oversample_factor = value.as_u32().unwrap_or(DEFAULT_OVERSAMPLE_FACTOR)
            }
            "freq_range" => next.freq_range = value.as_range().unwrap_or(DEFAULT_FREQ_RANGE),
            _ => return,
        }
        self.params = next.validated();
    }
}

/// Band of source frequencies kept by the remap at `sample_rate`.
///
/// The upper edge is held below Nyquist and shrunk so that no kept frequency
/// lands above Nyquist once multiplied by `doppler_factor`.
pub fn valid_band(sample_rate: f64, doppler_factor: f64, freq_range: (f64, f64)) -> (f64, f64) {
    let nyquist = sample_rate / 2.0;
    let lower = freq_range.0.max(AUDIBLE_FLOOR_HZ);
    let mut upper = freq_range.1.min(nyquist - 1.0);
    if upper * doppler_factor > nyquist {
        upper = nyquist / doppler_factor;
    }
    (lower, upper)
}

/// Remaps the spectrum of `signal` so bin `i` moves to `round(i * doppler_factor)`.
///
/// Halfway destinations round to the even bin (`2.5 -> 2`, `3.5 -> 4`), which
/// fixes which sources collide. Only non-negative bins are remapped, in
/// ascending order; a later source overwrites an earlier one landing on the
/// same destination, bins outside the valid band are written as zero, and
/// destinations no source reaches stay zero. The negative half is rebuilt as
/// the conjugate mirror so the result is real.
pub fn shift_spectrum(
    signal: &[f64],
    sample_rate: f64,
    doppler_factor: f64,
    freq_range: (f64, f64),
) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }

    let spectrum = forward_fft(signal);
    let freqs = fft_frequencies(n, sample_rate);
    let (lower, upper) = valid_band(sample_rate, doppler_factor, freq_range);
    let half = n / 2;

    let mut shifted = vec![Complex::new(0.0, 0.0); n];
    for i in 0..=half {
        let dest = (i as f64 * doppler_factor).round_ties_even();
        if !(0.0..=half as f64).contains(&dest) {
            continue;
        }
        let f = freqs[i].abs();
        shifted[dest as usize] = if f >= lower && f <= upper {
            spectrum[i]
        } else {
            Complex::new(0.0, 0.0)
        };
    }

    for k in 1..n {
        let mirror = n - k;
        if mirror <= k {
            break;
        }
        shifted[mirror] = shifted[k].conj();
    }

    inverse_fft(shifted).into_iter().map(|c| c.re).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::dominant_frequency;
    use std::f64::consts::PI;

    fn tone_at_bin(bin: usize, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * bin as f64 * i as f64 / n as f64).sin())
            .collect()
    }

    #[test]
    fn test_validated_clamps() {
        let params = DopplerParams {
            velocity: 500.0,
            sound_speed: 0.0,
            oversample: true,
            oversample_factor: 3,
            freq_range: (8000.0, -5.0),
        }
        .validated();

        assert_eq!(params.velocity, MAX_VELOCITY);
        assert_eq!(params.sound_speed, 1.0);
        assert_eq!(params.oversample_factor, 4);
        assert_eq!(params.freq_range, (0.0, 8000.0));

        let params = DopplerParams {
            velocity: f64::NAN,
            ..Default::default()
        }
        .validated();
        assert_eq!(params.velocity, 30.0);
    }

    #[test]
    fn test_doppler_factor() {
        let params = DopplerParams::default();
        let factor = params.doppler_factor().unwrap();
        assert!((factor - 343.0 / 313.0).abs() < 1e-12);

        let receding = DopplerParams {
            velocity: -30.0,
            ..Default::default()
        };
        assert!(receding.doppler_factor().unwrap() < 1.0);

        let singular = DopplerParams {
            velocity: 50.0,
            sound_speed: 50.0,
            ..Default::default()
        };
        assert!(singular.doppler_factor().unwrap_err().is_computation());
    }

    #[test]
    fn test_valid_band_shrinks_upper_edge() {
        let (lo, hi) = valid_band(44100.0, 1.0, (5.0, 30000.0));
        assert_eq!(lo, 20.0);
        assert_eq!(hi, 22049.0);

        let (_, hi) = valid_band(44100.0, 2.0, (20.0, 15000.0));
        assert_eq!(hi, 11025.0);
    }

    #[test]
    fn test_shift_spectrum_moves_tone() {
        let n = 4096;
        let sr = 8192.0;
        // Bin 500 is 1000 Hz at this rate; factor 1.5 moves it to bin 750
        let shifted = shift_spectrum(&tone_at_bin(500, n), sr, 1.5, (20.0, 4000.0));

        assert_eq!(shifted.len(), n);
        let freq = dominant_frequency(&shifted, sr);
        assert!((freq - 1500.0).abs() <= 2.0, "got {}", freq);
    }

    #[test]
    fn test_shift_spectrum_keeps_amplitude() {
        let n = 2048;
        let shifted = shift_spectrum(&tone_at_bin(100, n), 2048.0, 1.2, (20.0, 1000.0));
        let peak = shifted.iter().fold(0.0_f64, |a, &b| a.max(b.abs()));
        assert!((peak - 1.0).abs() < 0.01, "peak was {}", peak);
    }

    #[test]
    fn test_shift_spectrum_masks_out_of_band() {
        let n = 2048;
        // 10 Hz sits below the audible floor and is removed
        let shifted = shift_spectrum(&tone_at_bin(10, n), 2048.0, 1.1, (0.0, 1000.0));
        assert!(shifted.iter().all(|s| s.abs() < 1e-9));
        assert!(shift_spectrum(&[], 2048.0, 1.1, (0.0, 1000.0)).is_empty());
    }

    /// Magnitudes of bins `0..=n/2` of a real signal.
    fn half_spectrum(signal: &[f64]) -> Vec<f64> {
        let spectrum = forward_fft(signal);
        spectrum[..=signal.len() / 2].iter().map(|c| c.norm()).collect()
    }

    fn cosine_at_bins(bins: &[(usize, f64)], n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                bins.iter()
                    .map(|&(bin, amp)| amp * (2.0 * PI * bin as f64 * i as f64 / n as f64).cos())
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_shift_spectrum_half_bins_round_to_even() {
        // 64 points at 640 Hz: 10 Hz per bin. Bin 5 lands on 2.5 and goes to
        // bin 2; rounding up would put it on bin 3, where bin 6 overwrites it.
        let n = 64;
        let shifted = shift_spectrum(&cosine_at_bins(&[(5, 1.0)], n), 640.0, 0.5, (20.0, 300.0));
        let magnitudes = half_spectrum(&shifted);

        assert!((magnitudes[2] - 32.0).abs() < 1e-9, "bin 2 is {}", magnitudes[2]);
        for (bin, m) in magnitudes.iter().enumerate().filter(|(bin, _)| *bin != 2) {
            assert!(*m < 1e-9, "bin {} is {}", bin, m);
        }
    }

    #[test]
    fn test_shift_spectrum_later_source_overwrites() {
        // With factor 0.5, bins 3, 4 and 5 all land on bin 2. Bin 5 is written
        // last, so only its amplitude survives; nothing is summed.
        let n = 64;
        let input = cosine_at_bins(&[(4, 1.0), (5, 0.5)], n);
        let magnitudes = half_spectrum(&shift_spectrum(&input, 640.0, 0.5, (20.0, 300.0)));

        assert!((magnitudes[2] - 16.0).abs() < 1e-9, "bin 2 is {}", magnitudes[2]);
    }

    #[test]
    fn test_shift_spectrum_unreached_bins_are_zero() {
        // Factor 2 sends every source to an even bin; odd bins get no source.
        // The valid band is 20..160 Hz (160 * 2 stays at Nyquist), so sources
        // 2..=16 survive on destinations 4..=32.
        let n = 64;
        let all_bins: Vec<(usize, f64)> = (1..32).map(|bin| (bin, 1.0)).collect();
        let shifted = shift_spectrum(&cosine_at_bins(&all_bins, n), 640.0, 2.0, (20.0, 300.0));
        let magnitudes = half_spectrum(&shifted);

        for bin in (1..=31).step_by(2) {
            assert!(magnitudes[bin] < 1e-9, "odd bin {} is {}", bin, magnitudes[bin]);
        }
        for bin in (4..=30).step_by(2) {
            assert!((magnitudes[bin] - 32.0).abs() < 1e-9, "bin {} is {}", bin, magnitudes[bin]);
        }
        // Bin 1 (10 Hz) is below the band and lands on bin 2 as zero
        assert!(magnitudes[2] < 1e-9);
    }

    #[test]
    fn test_zero_velocity_is_identity() {
        let effect = DopplerEffect::new(DopplerParams {
            velocity: 0.0,
            ..Default::default()
        });
        let input = AudioBuffer::new(vec![vec![0.5, -0.2, 0.1], vec![0.0, 1.0, -1.0]]).unwrap();
        let output = effect.process(&input, 44100, 0).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_process_preserves_shape() {
        let effect = DopplerEffect::default();
        let input = AudioBuffer::new(vec![tone_at_bin(40, 1000), tone_at_bin(80, 1000)]).unwrap();

        let output = effect.process(&input, 44100, 7).unwrap();
        assert_eq!(output.num_channels(), 2);
        assert_eq!(output.num_samples(), 1000);
        assert!(output.is_finite());

        let empty = AudioBuffer::mono(Vec::new());
        assert_eq!(effect.process(&empty, 44100, 7).unwrap().num_samples(), 0);
    }

    #[test]
    fn test_process_rejects_zero_sample_rate() {
        let effect = DopplerEffect::default();
        let input = AudioBuffer::mono(vec![0.0; 16]);
        assert!(matches!(
            effect.process(&input, 0, 0),
            Err(AudioError::InvalidSampleRate { rate: 0 })
        ));
    }

    #[test]
    fn test_set_param_rules() {
        let mut effect = DopplerEffect::default();

        effect.set_param("velocity", (-250.0).into());
        assert_eq!(effect.config().velocity, -MAX_VELOCITY);

        effect.set_param("velocity", "fast".into());
        assert_eq!(effect.config().velocity, DEFAULT_VELOCITY);

        effect.set_param("oversample_factor", 8.0.into());
        assert_eq!(effect.config().oversample_factor, 8);
        effect.set_param("oversample_factor", 2.5.into());
        assert_eq!(effect.config().oversample_factor, 4);

        effect.set_param("freq_range", (500.0, 100.0).into());
        assert_eq!(effect.config().freq_range, (100.0, 500.0));

        let before = effect.params();
        effect.set_param("no_such_param", 1.0.into());
        assert_eq!(effect.params(), before);
    }

    #[test]
    fn test_params_snapshot_names() {
        let snapshot = DopplerEffect::default().params();
        let names: Vec<&str> = snapshot.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["freq_range", "oversample", "oversample_factor", "sound_speed", "velocity"]
        );
        assert_eq!(snapshot["velocity"], ParamValue::Number(30.0));
    }
}
