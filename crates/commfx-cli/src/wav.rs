//! WAV file reading and writing.

use anyhow::{bail, Context, Result};
use std::path::Path;

use commfx_effects::AudioBuffer;

/// A decoded WAV file.
#[derive(Debug, Clone, PartialEq)]
pub struct WavAudio {
    /// Samples as `f64` in [-1.0, 1.0], one vector per channel.
    pub buffer: AudioBuffer,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

/// Sample encoding used when writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavEncoding {
    /// 16-bit signed integer PCM.
    Pcm16,
    /// 32-bit IEEE float.
    Float32,
}

/// Reads a WAV file.
///
/// Supports 8, 16, 24 and 32-bit integer PCM and 32-bit float.
pub fn read_wav(path: &Path) -> Result<WavAudio> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
    let spec = reader.spec();

    let samples: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Int => {
            if !matches!(spec.bits_per_sample, 8 | 16 | 24 | 32) {
                bail!(
                    "Unsupported bit depth in '{}': {} bits (supported: 8, 16, 24, 32)",
                    path.display(),
                    spec.bits_per_sample
                );
            }
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / scale))
                .collect::<Result<_, _>>()
                .with_context(|| format!("Failed to read samples from {}", path.display()))?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()
            .with_context(|| format!("Failed to read samples from {}", path.display()))?,
    };

    let buffer = AudioBuffer::from_interleaved(&samples, spec.channels as usize)
        .with_context(|| format!("Malformed WAV data in {}", path.display()))?;

    Ok(WavAudio {
        buffer,
        sample_rate: spec.sample_rate,
    })
}

/// Writes a buffer as a WAV file. Integer output is clipped to [-1.0, 1.0].
pub fn write_wav(
    path: &Path,
    buffer: &AudioBuffer,
    sample_rate: u32,
    encoding: WavEncoding,
) -> Result<()> {
    let channels = u16::try_from(buffer.num_channels())
        .with_context(|| format!("Too many channels: {}", buffer.num_channels()))?;
    let (bits_per_sample, sample_format) = match encoding {
        WavEncoding::Pcm16 => (16, hound::SampleFormat::Int),
        WavEncoding::Float32 => (32, hound::SampleFormat::Float),
    };
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample,
        sample_format,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;
    for sample in buffer.to_interleaved() {
        match encoding {
            WavEncoding::Pcm16 => {
                writer.write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f64).round() as i16)?
            }
            WavEncoding::Float32 => writer.write_sample(sample as f32)?,
        }
    }
    writer
        .finalize()
        .with_context(|| format!("Failed to finalize WAV file: {}", path.display()))?;
    Ok(())
}
