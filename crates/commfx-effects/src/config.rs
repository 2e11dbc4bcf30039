//! Serializable effect and chain descriptions.
//!
//! A chain description is a JSON document such as
//!
//! ```json
//! {
//!   "seed": 42,
//!   "effects": [
//!     { "type": "doppler", "velocity": -20.0 },
//!     { "type": "am_channel", "mode": "dsb-sc", "snr_db": 25.0 },
//!     { "type": "pcm", "bit_depth": 6 }
//!   ]
//! }
//! ```
//!
//! Omitted fields take their defaults; out-of-range values are clamped when
//! the effect is built.

use serde::{Deserialize, Serialize};

use crate::effects::{
    AliasingEffect, AliasingParams, AmChannelEffect, AmChannelParams, CompandingEffect,
    CompandingParams, ConvolutionReverb, DopplerEffect, DopplerParams, Effect, PcmEffect,
    PcmParams, ReverbParams,
};
use crate::error::{AudioError, AudioResult};

/// Effect type names accepted by [`EffectSpec::with_defaults`].
pub const EFFECT_TYPES: [&str; 6] = [
    "doppler",
    "am_channel",
    "pcm",
    "companding",
    "aliasing",
    "convolution_reverb",
];

/// One effect with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectSpec {
    /// Doppler shift.
    Doppler(DopplerParams),
    /// AM channel round trip.
    AmChannel(AmChannelParams),
    /// Bit-depth reduction.
    Pcm(PcmParams),
    /// A-law companded PCM.
    Companding(CompandingParams),
    /// Decimate and hold.
    Aliasing(AliasingParams),
    /// Convolution reverb.
    ConvolutionReverb(ReverbParams),
}

impl EffectSpec {
    /// Default-parameter description of the effect called `name`.
    ///
    /// Dashes are accepted in place of underscores (`am-channel`).
    pub fn with_defaults(name: &str) -> AudioResult<Self> {
        match name.trim().replace('-', "_").as_str() {
            "doppler" => Ok(EffectSpec::Doppler(DopplerParams::default())),
            "am_channel" => Ok(EffectSpec::AmChannel(AmChannelParams::default())),
            "pcm" => Ok(EffectSpec::Pcm(PcmParams::default())),
            "companding" => Ok(EffectSpec::Companding(CompandingParams::default())),
            "aliasing" => Ok(EffectSpec::Aliasing(AliasingParams::default())),
            "convolution_reverb" => Ok(EffectSpec::ConvolutionReverb(ReverbParams::default())),
            other => Err(AudioError::invalid_param(
                "type",
                format!("unknown effect '{}', expected one of {:?}", other, EFFECT_TYPES),
            )),
        }
    }

    /// Builds the effect, clamping parameters.
    pub fn build(&self) -> Box<dyn Effect> {
        match self {
            EffectSpec::Doppler(params) => Box::new(DopplerEffect::new(params.clone())),
            EffectSpec::AmChannel(params) => Box::new(AmChannelEffect::new(params.clone())),
            EffectSpec::Pcm(params) => Box::new(PcmEffect::new(params.clone())),
            EffectSpec::Companding(params) => Box::new(CompandingEffect::new(params.clone())),
            EffectSpec::Aliasing(params) => Box::new(AliasingEffect::new(params.clone())),
            EffectSpec::ConvolutionReverb(params) => {
                Box::new(ConvolutionReverb::new(params.clone()))
            }
        }
    }

    /// The `type` tag of this effect.
    pub fn type_name(&self) -> &'static str {
        match self {
            EffectSpec::Doppler(_) => "doppler",
            EffectSpec::AmChannel(_) => "am_channel",
            EffectSpec::Pcm(_) => "pcm",
            EffectSpec::Companding(_) => "companding",
            EffectSpec::Aliasing(_) => "aliasing",
            EffectSpec::ConvolutionReverb(_) => "convolution_reverb",
        }
    }
}

/// An ordered effect chain and the seed it runs with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainSpec {
    /// Base seed; each pass derives its own seed from it.
    #[serde(default)]
    pub seed: u32,
    /// Effects applied in order.
    #[serde(default)]
    pub effects: Vec<EffectSpec>,
}

impl ChainSpec {
    /// Parses a chain description from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the chain description to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// A chain holding a single effect.
    pub fn single(effect: EffectSpec, seed: u32) -> Self {
        Self {
            seed,
            effects: vec![effect],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::AmMode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_chain_with_defaults() {
        let json = r#"{
            "seed": 7,
            "effects": [
                { "type": "doppler", "velocity": -20.0 },
                { "type": "am_channel", "mode": "dsb-sc" }
            ]
        }"#;
        let chain = ChainSpec::from_json(json).unwrap();

        assert_eq!(chain.seed, 7);
        assert_eq!(
            chain.effects[0],
            EffectSpec::Doppler(DopplerParams {
                velocity: -20.0,
                ..Default::default()
            })
        );
        assert_eq!(
            chain.effects[1],
            EffectSpec::AmChannel(AmChannelParams {
                mode: AmMode::DsbSc,
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_unknown_effect_type_is_rejected() {
        let json = r#"{ "effects": [ { "type": "reverb" } ] }"#;
        assert!(ChainSpec::from_json(json).is_err());
    }

    #[test]
    fn test_freq_range_is_an_array() {
        let json = r#"{ "type": "doppler", "freq_range": [100.0, 8000.0] }"#;
        let spec: EffectSpec = serde_json::from_str(json).unwrap();
        match spec {
            EffectSpec::Doppler(params) => assert_eq!(params.freq_range, (100.0, 8000.0)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_with_defaults() {
        assert_eq!(
            EffectSpec::with_defaults("am-channel").unwrap(),
            EffectSpec::AmChannel(AmChannelParams::default())
        );
        assert_eq!(EffectSpec::with_defaults("doppler").unwrap().type_name(), "doppler");

        let err = EffectSpec::with_defaults("flanger").unwrap_err();
        assert_eq!(err.code(), "FX_003");
        assert!(err.to_string().contains("flanger"));
    }

    #[test]
    fn test_every_type_builds_under_its_own_name() {
        for name in EFFECT_TYPES {
            let spec = EffectSpec::with_defaults(name).unwrap();
            assert_eq!(spec.type_name(), name);
            assert_eq!(spec.build().name(), name);
        }
        assert_eq!(
            EffectSpec::with_defaults("convolution-reverb").unwrap(),
            EffectSpec::ConvolutionReverb(ReverbParams::default())
        );
    }

    #[test]
    fn test_parse_peer_effects() {
        let json = r#"{
            "effects": [
                { "type": "pcm", "bit_depth": 6 },
                { "type": "companding", "companding": false },
                { "type": "aliasing", "target_sample_rate": 8000, "anti_alias": true },
                { "type": "convolution_reverb", "ir_type": "old_radio", "mix": 0.5 }
            ]
        }"#;
        let chain = ChainSpec::from_json(json).unwrap();

        assert_eq!(chain.effects[0], EffectSpec::Pcm(PcmParams { bit_depth: 6 }));
        assert_eq!(
            chain.effects[1],
            EffectSpec::Companding(CompandingParams {
                companding: false,
                ..Default::default()
            })
        );
        assert_eq!(
            chain.effects[2],
            EffectSpec::Aliasing(AliasingParams {
                target_sample_rate: 8000,
                anti_alias: true,
            })
        );
        assert_eq!(
            chain.effects[3],
            EffectSpec::ConvolutionReverb(ReverbParams {
                ir_type: crate::effects::ImpulseKind::OldRadio,
                mix: 0.5,
            })
        );
    }

    #[test]
    fn test_build_clamps() {
        let spec = EffectSpec::AmChannel(AmChannelParams {
            snr_db: 100.0,
            ..Default::default()
        });
        let effect = spec.build();
        assert_eq!(effect.name(), "am_channel");
        assert_eq!(spec.type_name(), "am_channel");
        assert_eq!(effect.params()["snr_db"].as_f64(), Some(40.0));
    }

    #[test]
    fn test_json_round_trip() {
        let chain = ChainSpec::single(EffectSpec::Doppler(DopplerParams::default()), 3);
        let json = chain.to_json_pretty().unwrap();
        assert!(json.contains("\"type\": \"doppler\""));
        assert_eq!(ChainSpec::from_json(&json).unwrap(), chain);
    }
}
