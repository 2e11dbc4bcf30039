//! Receive side: envelope and synchronous detection, de-emphasis.

use super::modulator::EMPHASIS_CUTOFF_HZ;
use crate::error::{AudioError, AudioResult};
use crate::filter::{BiquadFilter, FirstOrderFilter};

/// Lowpass cutoff of both detectors, in Hz.
pub(super) const DEMOD_CUTOFF_HZ: f64 = 5000.0;

/// Envelope detector: rectify, lowpass, remove DC.
pub(super) fn envelope_detect(received: &[f64], sample_rate: f64) -> Vec<f64> {
    let mut lowpass = BiquadFilter::lowpass(DEMOD_CUTOFF_HZ, sample_rate);
    let mut envelope: Vec<f64> = received.iter().map(|s| lowpass.process(s.abs())).collect();

    if !envelope.is_empty() {
        let mean = envelope.iter().sum::<f64>() / envelope.len() as f64;
        for s in envelope.iter_mut() {
            *s -= mean;
        }
    }
    envelope
}

/// Synchronous detector: mix with the recovered carrier, lowpass, undo the
/// modulation index.
///
/// Fails when `modulation_index` is zero, since the gain `2 / m` is undefined.
pub(super) fn synchronous_detect(
    received: &[f64],
    carrier: &[f64],
    modulation_index: f64,
    sample_rate: f64,
) -> AudioResult<Vec<f64>> {
    if modulation_index == 0.0 {
        return Err(AudioError::computation(
            "modulation index is 0; suppressed-carrier gain 2/m is undefined",
        ));
    }
    let gain = 2.0 / modulation_index;

    let mut lowpass = BiquadFilter::lowpass(DEMOD_CUTOFF_HZ, sample_rate);
    Ok(received
        .iter()
        .zip(carrier)
        .map(|(r, c)| lowpass.process(r * c) * gain)
        .collect())
}

/// First-order lowpass matching the pre-emphasis corner.
pub(super) fn de_emphasize(signal: &[f64], sample_rate: f64) -> Vec<f64> {
    FirstOrderFilter::lowpass(EMPHASIS_CUTOFF_HZ, sample_rate).process_buffer_copy(signal)
}
