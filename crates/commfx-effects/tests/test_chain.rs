//! Integration tests for chains built from JSON descriptions.

use commfx_effects::{AudioBuffer, ChainSpec, EffectChain, EffectSpec};
use pretty_assertions::assert_eq;
use std::f64::consts::PI;

const SR: u32 = 22050;

fn stereo_input() -> AudioBuffer {
    let left: Vec<f64> = (0..4096)
        .map(|i| (2.0 * PI * 500.0 * i as f64 / SR as f64).sin())
        .collect();
    let right: Vec<f64> = left.iter().map(|s| s * 0.5).collect();
    AudioBuffer::new(vec![left, right]).unwrap()
}

const CHAIN_JSON: &str = r#"{
    "seed": 42,
    "effects": [
        { "type": "doppler", "velocity": 20.0, "oversample_factor": 2 },
        { "type": "am_channel", "mode": "ssb", "carrier_freq": 6000.0 }
    ]
}"#;

#[test]
fn test_chain_from_json_runs_in_order() {
    let spec = ChainSpec::from_json(CHAIN_JSON).unwrap();
    let chain = EffectChain::from_spec(&spec);
    assert_eq!(chain.names(), vec!["doppler", "am_channel"]);

    let output = chain.process(&stereo_input(), SR, spec.seed).unwrap();
    assert_eq!(output.buffer.num_channels(), 2);
    assert_eq!(output.buffer.num_samples(), 4096);

    let names: Vec<&str> = output.passes.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["doppler", "am_channel"]);
    assert!(output.passes.iter().all(|p| p.peak.is_finite() && p.rms.is_finite()));
}

#[test]
fn test_chain_is_deterministic_per_seed() {
    let spec = ChainSpec::from_json(CHAIN_JSON).unwrap();
    let chain = EffectChain::from_spec(&spec);
    let input = stereo_input();

    let a = chain.process(&input, SR, 42).unwrap();
    let b = chain.process(&input, SR, 42).unwrap();
    assert_eq!(a, b);

    let c = chain.process(&input, SR, 43).unwrap();
    assert_ne!(a.buffer, c.buffer);
}

#[test]
fn test_repeated_effect_gets_its_own_seed() {
    let spec = ChainSpec {
        seed: 5,
        effects: vec![
            EffectSpec::AmChannel(Default::default()),
            EffectSpec::AmChannel(Default::default()),
        ],
    };
    let input = stereo_input();

    let twice = EffectChain::from_spec(&spec).process(&input, SR, 5).unwrap();
    assert_eq!(twice.passes.len(), 2);
    assert_eq!(twice.passes[0].index, 0);
    assert_eq!(twice.passes[1].index, 1);
    assert_ne!(twice.passes[0].rms, twice.passes[1].rms);
}

#[test]
fn test_failing_pass_returns_error() {
    let json = r#"{ "effects": [
        { "type": "am_channel" },
        { "type": "doppler", "velocity": 80.0, "sound_speed": 80.0 }
    ] }"#;
    let chain = EffectChain::from_spec(&ChainSpec::from_json(json).unwrap());
    let err = chain.process(&stereo_input(), SR, 0).unwrap_err();
    assert!(err.is_computation());
    assert_eq!(err.code(), "FX_004");
}

#[test]
fn test_peer_effects_chain() {
    let json = r#"{
        "seed": 9,
        "effects": [
            { "type": "aliasing", "target_sample_rate": 8000, "anti_alias": true },
            { "type": "companding", "bit_depth": 8 },
            { "type": "pcm", "bit_depth": 6 },
            { "type": "convolution_reverb", "ir_type": "old_radio", "mix": 0.4 }
        ]
    }"#;
    let spec = ChainSpec::from_json(json).unwrap();
    let chain = EffectChain::from_spec(&spec);
    assert_eq!(
        chain.names(),
        vec!["aliasing", "companding", "pcm", "convolution_reverb"]
    );

    let output = chain.process(&stereo_input(), SR, spec.seed).unwrap();
    assert_eq!(output.buffer.num_channels(), 2);
    assert_eq!(output.buffer.num_samples(), 4096);
    assert!(output.buffer.is_finite());
    assert_eq!(output, chain.process(&stereo_input(), SR, spec.seed).unwrap());
}
