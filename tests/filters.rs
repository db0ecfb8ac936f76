//! Tests for the filters

use feedback_synth::utils::biquad::{BiquadKind, StereoBiquad};
use feedback_synth::utils::filter::{DcBlocker, FrequencyApproximation, Svf};

const SAMPLE_RATE: f32 = 48000.0;

fn biquad(kind: BiquadKind, cutoff: f32) -> StereoBiquad {
    let mut filter = StereoBiquad::new(kind);
    filter.init(SAMPLE_RATE);
    filter.set_q(0.9);
    filter.set_cutoff(cutoff);
    filter
}

#[test]
fn low_pass_passes_dc() {
    let mut filter = biquad(BiquadKind::LowPass, 1000.0);
    let (mut left, mut right) = (0.0, 0.0);

    for _ in 0..4800 {
        left = 1.0;
        right = 0.0;
        filter.process_stereo(&mut left, &mut right);
    }

    assert!((left - 1.0).abs() < 1e-3);
    assert_eq!(right, 0.0);
}

#[test]
fn low_pass_rejects_nyquist() {
    let mut filter = biquad(BiquadKind::LowPass, 1000.0);
    let mut peak: f32 = 0.0;

    for n in 0..4800 {
        let x = if n % 2 == 0 { 1.0 } else { -1.0 };
        let (mut left, mut right) = (x, -x);
        filter.process_stereo(&mut left, &mut right);
        if n >= 2400 {
            peak = peak.max(left.abs()).max(right.abs());
        }
    }

    assert!(peak < 1e-3);
}

#[test]
fn high_pass_rejects_dc() {
    let mut filter = biquad(BiquadKind::HighPass, 250.0);
    let (mut left, mut right) = (0.0, 0.0);

    for _ in 0..48000 {
        left = 1.0;
        right = -1.0;
        filter.process_stereo(&mut left, &mut right);
    }

    assert!(left.abs() < 1e-3);
    assert!(right.abs() < 1e-3);
}

#[test]
fn high_pass_passes_nyquist() {
    let mut filter = biquad(BiquadKind::HighPass, 250.0);
    let mut peak: f32 = 0.0;

    for n in 0..4800 {
        let x = if n % 2 == 0 { 1.0 } else { -1.0 };
        let (mut left, mut right) = (x, x);
        filter.process_stereo(&mut left, &mut right);
        if n >= 2400 {
            peak = peak.max(left.abs());
        }
    }

    assert!((peak - 1.0).abs() < 1e-2);
}

#[test]
fn biquad_cutoff_is_clamped() {
    let mut filter = biquad(BiquadKind::LowPass, 1000.0);

    filter.set_cutoff(30000.0);
    assert_eq!(filter.cutoff(), SAMPLE_RATE * 0.49);
    filter.set_cutoff(-5.0);
    assert_eq!(filter.cutoff(), 1.0);

    filter.set_q(0.0);
    assert_eq!(filter.q(), 0.1);
}

#[test]
fn dc_blocker() {
    let mut filter = DcBlocker::new();
    filter.init(1.0 - 20.0 / SAMPLE_RATE);

    let mut out = 0.0;
    for _ in 0..48000 {
        out = filter.process(0.5);
    }

    assert!(out.abs() < 1e-3);
}

#[test]
fn svf_low_pass() {
    let mut filter = Svf::new();
    filter.init();
    filter.set_f_q(0.01, 0.5, FrequencyApproximation::Fast);

    let mut out = 0.0;
    for _ in 0..4800 {
        out = filter.process(1.0);
    }

    assert!((out - 1.0).abs() < 1e-3);
}

#[test]
fn svf_rejects_high_frequencies() {
    let mut filter = Svf::new();
    filter.init();
    filter.set_f_q(0.005, 0.5, FrequencyApproximation::Fast);

    let mut peak: f32 = 0.0;
    for n in 0..4800 {
        let out = filter.process(if n % 2 == 0 { 1.0 } else { -1.0 });
        if n >= 2400 {
            peak = peak.max(out.abs());
        }
    }

    assert!(peak < 1e-3);
}
