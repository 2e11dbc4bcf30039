//! The AM channel effect: each channel is sent through a modulator, a noisy
//! channel and a receiver.

use rand_pcg::Pcg32;

use super::demodulator::{de_emphasize, envelope_detect, synchronous_detect};
use super::modulator::{add_channel_noise, modulate, preprocess, Carrier};
use super::recovery::recover_carrier;
use super::types::{
    AmChannelParams, AmMode, DEFAULT_CARRIER_HZ, DEFAULT_MODULATION_INDEX, DEFAULT_SNR_DB,
    DEFAULT_SYNC_TOLERANCE,
};
use crate::buffer::{peak_normalize, AudioBuffer};
use crate::effects::{assemble, check_sample_rate, Effect};
use crate::error::AudioResult;
use crate::params::{ParamSnapshot, ParamValue};
use crate::rng::create_channel_rng;

/// Key under which per-channel RNG streams are derived.
const RNG_KEY: &str = "am_channel";

/// AM / DSB-SC / SSB round trip through a noisy channel.
#[derive(Debug, Clone, Default)]
pub struct AmChannelEffect {
    params: AmChannelParams,
}

impl AmChannelEffect {
    /// Creates the effect, clamping the given parameters.
    pub fn new(params: AmChannelParams) -> Self {
        Self {
            params: params.validated(),
        }
    }

    /// Current (validated) parameters.
    pub fn config(&self) -> &AmChannelParams {
        &self.params
    }

    /// Runs one channel through the whole link.
    fn process_channel(
        &self,
        channel: &[f64],
        sample_rate: f64,
        carrier_freq: f64,
        rng: &mut Pcg32,
    ) -> AudioResult<Vec<f64>> {
        let p = &self.params;
        let len = channel.len();

        let message = preprocess(channel, p.pre_emphasis, sample_rate);

        let carrier =
            Carrier::jittered(carrier_freq, p.sync_tolerance, rng).samples(len, sample_rate);
        let mut received = modulate(
            &message,
            &carrier,
            p.mode,
            p.modulation_index,
            carrier_freq,
            sample_rate,
        );
        add_channel_noise(&mut received, p.snr_db, rng);

        let demodulated = if p.mode.is_suppressed_carrier() {
            let local = recover_carrier(&received, carrier_freq, sample_rate);
            synchronous_detect(&received, &local, p.modulation_index, sample_rate)?
        } else {
            envelope_detect(&received, sample_rate)
        };

        let mut output = if p.pre_emphasis {
            de_emphasize(&demodulated, sample_rate)
        } else {
            demodulated
        };
        peak_normalize(&mut output);
        Ok(output)
    }
}

impl Effect for AmChannelEffect {
    fn name(&self) -> &'static str {
        "am_channel"
    }

    fn process(
        &self,
        input: &AudioBuffer,
        sample_rate: u32,
        seed: u32,
    ) -> AudioResult<AudioBuffer> {
        let rate = check_sample_rate(sample_rate)?;
        let carrier_freq = self.params.working_carrier(rate);

        let channels = input
            .channels()
            .iter()
            .enumerate()
            .map(|(index, ch)| {
                let mut rng = create_channel_rng(seed, RNG_KEY, index as u32);
                self.process_channel(ch, rate, carrier_freq, &mut rng)
            })
            .collect::<AudioResult<Vec<_>>>()?;

        assemble(self.name(), input, channels)
    }

    fn params(&self) -> ParamSnapshot {
        let p = &self.params;
        let mut snapshot = ParamSnapshot::new();
        snapshot.insert("carrier_freq".into(), p.carrier_freq.into());
        snapshot.insert("modulation_index".into(), p.modulation_index.into());
        snapshot.insert("mode".into(), p.mode.as_str().into());
        snapshot.insert("snr_db".into(), p.snr_db.into());
        snapshot.insert("sync_tolerance".into(), p.sync_tolerance.into());
        snapshot.insert("pre_emphasis".into(), p.pre_emphasis.into());
        snapshot
    }

    fn set_param(&mut self, name: &str, value: ParamValue) {
        let mut next = self.params.clone();
        match name {
            "carrier_freq" => next.carrier_freq = value.as_f64().unwrap_or(DEFAULT_CARRIER_HZ),
            "modulation_index" => {
                next.modulation_index = value.as_f64().unwrap_or(DEFAULT_MODULATION_INDEX)
            }
            "mode" => next.mode = value.as_str().map_or(AmMode::Standard, AmMode::from_name),
            "snr_db" => next.snr_db = value.as_f64().unwrap_or(DEFAULT_SNR_DB),
            "sync_tolerance" => {
                next.sync_tolerance = value.as_f64().unwrap_or(DEFAULT_SYNC_TOLERANCE)
            }
            "pre_emphasis" => next.pre_emphasis = value.as_bool().unwrap_or(true),
            _ => return,
        }
        self.params = next.validated();
    }
}
