//! Integration tests for the integer-factor rate converter.

use commfx_effects::resample::{downsample, upsample};
use commfx_effects::spectral::{fft_frequencies, forward_fft};
use std::f64::consts::PI;

fn test_signal(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let t = i as f64;
            0.6 * (t * 0.07).sin() + 0.3 * (t * 0.31 + 1.0).cos() - 0.1 * (t * 1.3).sin()
        })
        .collect()
}

#[test]
fn test_down_after_up_is_identity() {
    let input = test_signal(777);
    for factor in [2, 4, 8] {
        let restored = downsample(&upsample(&input, factor), factor);
        assert_eq!(restored.len(), input.len(), "factor {}", factor);
        for (i, (a, b)) in input.iter().zip(&restored).enumerate() {
            assert!((a - b).abs() < 1e-9, "factor {} sample {}: {} vs {}", factor, i, a, b);
        }
    }
}

#[test]
fn test_upsample_suppresses_images() {
    let sr = 8000.0;
    let factor = 4;
    // 1000 Hz lands on an exact bin of both the input and the analysis window
    let input: Vec<f64> = (0..1024)
        .map(|i| (2.0 * PI * 1000.0 * i as f64 / sr).sin())
        .collect();
    let up = upsample(&input, factor);
    assert_eq!(up.len(), 4096);

    // Analyze the middle of the output, away from the zero-padded edges
    let window = &up[1024..3072];
    let spectrum = forward_fft(window);
    let freqs = fft_frequencies(window.len(), sr * factor as f64);

    let total: f64 = spectrum.iter().map(|c| c.norm_sqr()).sum();
    let images: f64 = spectrum
        .iter()
        .zip(&freqs)
        .filter(|(_, f)| f.abs() > 4500.0)
        .map(|(c, _)| c.norm_sqr())
        .sum();

    assert!(images / total < 1e-3, "image energy ratio {}", images / total);
}

#[test]
fn test_decimation_aliases_without_filtering() {
    // A 3 kHz tone at 8 kHz, decimated by 2, folds to 1 kHz
    let sr = 8000.0;
    let input: Vec<f64> = (0..800)
        .map(|i| (2.0 * PI * 3000.0 * i as f64 / sr).cos())
        .collect();
    let decimated = downsample(&input, 2);

    for (i, &s) in decimated.iter().enumerate() {
        let alias = (2.0 * PI * 1000.0 * i as f64 / (sr / 2.0)).cos();
        assert!((s - alias).abs() < 1e-9);
    }
}

#[test]
fn test_non_oversampling_factors_are_noops() {
    let input = test_signal(50);
    assert_eq!(upsample(&input, 1), input);
    assert_eq!(upsample(&input, 0), input);
    assert_eq!(downsample(&input, 1), input);
    assert_eq!(downsample(&input, 0), input);
}
