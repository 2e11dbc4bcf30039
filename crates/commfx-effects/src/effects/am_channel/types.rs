//! AM channel modes and parameters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest carrier frequency accepted, in Hz.
pub const MIN_CARRIER_HZ: f64 = 20.0;

/// Distance kept between the carrier and Nyquist, in Hz.
pub const NYQUIST_MARGIN_HZ: f64 = 100.0;

/// Largest channel SNR, in dB. Above this the channel is effectively clean.
pub const MAX_SNR_DB: f64 = 40.0;

/// Largest fractional carrier frequency error.
pub const MAX_SYNC_TOLERANCE: f64 = 0.1;

pub(super) const DEFAULT_CARRIER_HZ: f64 = 10000.0;
pub(super) const DEFAULT_MODULATION_INDEX: f64 = 0.7;
pub(super) const DEFAULT_SNR_DB: f64 = 35.0;
pub(super) const DEFAULT_SYNC_TOLERANCE: f64 = 0.01;

/// Modulation scheme used on the simulated channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AmMode {
    /// Full-carrier AM, `(1 + m x) c`, received with an envelope detector.
    #[default]
    Standard,
    /// Double sideband, suppressed carrier, `m x c`.
    DsbSc,
    /// Single sideband via the analytic signal and a lowpass at the carrier.
    Ssb,
}

impl AmMode {
    /// Parses a mode name. Unknown names give [`AmMode::Standard`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "dsb-sc" => AmMode::DsbSc,
            "ssb" => AmMode::Ssb,
            _ => AmMode::Standard,
        }
    }

    /// Canonical mode name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AmMode::Standard => "standard",
            AmMode::DsbSc => "dsb-sc",
            AmMode::Ssb => "ssb",
        }
    }

    /// True for modes that need carrier recovery and synchronous detection.
    pub fn is_suppressed_carrier(&self) -> bool {
        !matches!(self, AmMode::Standard)
    }
}

impl fmt::Display for AmMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for AmMode {
    fn from(name: String) -> Self {
        AmMode::from_name(&name)
    }
}

impl From<AmMode> for String {
    fn from(mode: AmMode) -> Self {
        mode.as_str().to_string()
    }
}

/// AM channel parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmChannelParams {
    /// Nominal carrier frequency in Hz.
    pub carrier_freq: f64,
    /// Modulation index, 0.0 to 1.0.
    pub modulation_index: f64,
    /// Modulation scheme.
    pub mode: AmMode,
    /// Channel signal-to-noise ratio in dB, 0 to 40.
    pub snr_db: f64,
    /// Carrier frequency error as a fraction of the carrier, 0.0 to 0.1.
    pub sync_tolerance: f64,
    /// Emphasize highs before modulation and restore them after demodulation.
    pub pre_emphasis: bool,
}

impl Default for AmChannelParams {
    fn default() -> Self {
        Self {
            carrier_freq: DEFAULT_CARRIER_HZ,
            modulation_index: DEFAULT_MODULATION_INDEX,
            mode: AmMode::Standard,
            snr_db: DEFAULT_SNR_DB,
            sync_tolerance: DEFAULT_SYNC_TOLERANCE,
            pre_emphasis: true,
        }
    }
}

impl AmChannelParams {
    /// Applies the clamping rules to every field.
    ///
    /// The carrier's upper bound depends on the sample rate and is applied
    /// by [`AmChannelParams::working_carrier`] instead.
    pub fn validated(self) -> Self {
        Self {
            carrier_freq: finite_or(self.carrier_freq, DEFAULT_CARRIER_HZ).max(MIN_CARRIER_HZ),
            modulation_index: finite_or(self.modulation_index, DEFAULT_MODULATION_INDEX)
                .clamp(0.0, 1.0),
            mode: self.mode,
            snr_db: finite_or(self.snr_db, DEFAULT_SNR_DB).clamp(0.0, MAX_SNR_DB),
            sync_tolerance: finite_or(self.sync_tolerance, DEFAULT_SYNC_TOLERANCE)
                .clamp(0.0, MAX_SYNC_TOLERANCE),
            pre_emphasis: self.pre_emphasis,
        }
    }

    /// Carrier frequency clamped to `[20, sample_rate / 2 - 100]`.
    pub fn working_carrier(&self, sample_rate: f64) -> f64 {
        let upper = (sample_rate / 2.0 - NYQUIST_MARGIN_HZ).max(MIN_CARRIER_HZ);
        self.carrier_freq.clamp(MIN_CARRIER_HZ, upper)
    }
}

fn finite_or(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        default
    }
}
