//! Multichannel sample buffer shared by every effect.

use crate::analysis::peak;
use crate::error::{AudioError, AudioResult};

/// An ordered collection of equally long channels of `f64` samples.
///
/// Samples are nominally in [-1.0, 1.0]. The buffer carries no sample rate;
/// the rate travels alongside it into [`Effect::process`](crate::effects::Effect::process).
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f64>>,
}

impl AudioBuffer {
    /// Creates a buffer from per-channel sample vectors.
    ///
    /// Fails when there are no channels or the channels differ in length.
    pub fn new(channels: Vec<Vec<f64>>) -> AudioResult<Self> {
        let Some(first) = channels.first() else {
            return Err(AudioError::invalid_buffer("buffer needs at least one channel"));
        };
        let len = first.len();
        if let Some((index, ch)) = channels.iter().enumerate().find(|(_, ch)| ch.len() != len) {
            return Err(AudioError::invalid_buffer(format!(
                "channel {} has {} samples, expected {}",
                index,
                ch.len(),
                len
            )));
        }
        Ok(Self { channels })
    }

    /// Creates a single-channel buffer.
    pub fn mono(samples: Vec<f64>) -> Self {
        Self {
            channels: vec![samples],
        }
    }

    /// Creates a buffer from interleaved frames.
    pub fn from_interleaved(samples: &[f64], num_channels: usize) -> AudioResult<Self> {
        if num_channels == 0 {
            return Err(AudioError::invalid_buffer("buffer needs at least one channel"));
        }
        if samples.len() % num_channels != 0 {
            return Err(AudioError::invalid_buffer(format!(
                "{} interleaved samples do not divide into {} channels",
                samples.len(),
                num_channels
            )));
        }
        let frames = samples.len() / num_channels;
        let channels = (0..num_channels)
            .map(|ch| (0..frames).map(|f| samples[f * num_channels + ch]).collect())
            .collect();
        Ok(Self { channels })
    }

    /// Returns the samples interleaved frame by frame.
    pub fn to_interleaved(&self) -> Vec<f64> {
        let frames = self.num_samples();
        let mut out = Vec::with_capacity(frames * self.num_channels());
        for f in 0..frames {
            for ch in &self.channels {
                out.push(ch[f]);
            }
        }
        out
    }

    /// Number of channels (always at least 1).
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of samples per channel.
    pub fn num_samples(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Returns true if the channels hold no samples.
    pub fn is_empty(&self) -> bool {
        self.num_samples() == 0
    }

    /// Borrow a single channel.
    pub fn channel(&self, index: usize) -> Option<&[f64]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Borrow all channels.
    pub fn channels(&self) -> &[Vec<f64>] {
        &self.channels
    }

    /// Returns true if every sample is finite.
    pub fn is_finite(&self) -> bool {
        self.channels.iter().flatten().all(|s| s.is_finite())
    }
}

/// Pads (repeating the last sample) or truncates `samples` to exactly `len`.
pub fn fit_length(mut samples: Vec<f64>, len: usize) -> Vec<f64> {
    if samples.len() > len {
        samples.truncate(len);
    } else if samples.len() < len {
        let edge = samples.last().copied().unwrap_or(0.0);
        samples.resize(len, edge);
    }
    samples
}

/// Scales `samples` so the peak absolute value is 1.0.
///
/// A silent channel is left untouched.
pub fn peak_normalize(samples: &mut [f64]) {
    let max = peak(samples);
    if max > 0.0 {
        for s in samples.iter_mut() {
            *s /= max;
        }
    }
}
