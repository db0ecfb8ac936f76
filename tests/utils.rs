//! Tests for the utility functions

use feedback_synth::utils::parameter_smoother::ParameterSmoother;
use feedback_synth::utils::units::*;
use feedback_synth::utils::*;
use feedback_synth::SampleRate;

#[test]
fn soft_clip_saturates() {
    assert_eq!(soft_clip(0.0), 0.0);
    assert_eq!(soft_clip(3.0), 1.0);
    assert_eq!(soft_clip(-3.0), -1.0);
    assert_eq!(soft_clip(100.0), 1.0);
    assert_eq!(soft_clip(-100.0), -1.0);
    assert_eq!(soft_clip(f32::INFINITY), 1.0);

    // Close to unity gain for small signals.
    assert!((soft_clip(0.01) - 0.01).abs() < 1e-4);

    let mut previous = -1.0;
    for n in -250..=250 {
        let y = soft_clip(n as f32 * 0.01);
        assert!(y >= previous);
        assert!(y.abs() <= 1.0);
        previous = y;
    }
}

#[test]
fn unit_conversions() {
    assert_eq!(note_to_frequency(69.0), 440.0);
    assert!((note_to_frequency(57.0) - 220.0).abs() < 1e-3);
    assert!((note_to_frequency(81.0) - 880.0).abs() < 1e-3);
    assert!((note_to_frequency(40.0) - 82.4069).abs() < 1e-3);

    assert_eq!(decibels_to_gain(0.0), 1.0);
    assert!((decibels_to_gain(-6.0) - 0.501187).abs() < 1e-5);
    assert!((decibels_to_gain(20.0) - 10.0).abs() < 1e-4);
    assert!((decibels_to_gain(-60.0) - 0.001).abs() < 1e-7);

    assert!((semitones_to_ratio(12.0) - 2.0).abs() < 1e-6);

    let sample_rate = SampleRate::new(48000.0);
    assert_eq!(sample_rate.seconds_to_samples(0.5), 24000.0);
    assert!((sample_rate.normalize(24000.0) - 0.5).abs() < 1e-6);
}

#[test]
fn one_pole_time_constant() {
    let sample_rate = 48000.0;
    let coefficient = one_pole_coefficient(0.01, sample_rate);

    let mut value = 0.0;
    for _ in 0..480 {
        one_pole(&mut value, 1.0, coefficient);
    }

    assert!((value - (1.0 - (-1.0f32).exp())).abs() < 1e-3);
}

#[test]
fn parameter_smoother() {
    let mut smoother = ParameterSmoother::new(0.0, 0.1);
    assert_eq!(smoother.current(), 0.0);

    smoother.set_target(10.0);
    assert_eq!(smoother.target(), 10.0);
    assert_eq!(smoother.next(), 1.0);

    for _ in 0..500 {
        smoother.next();
    }
    assert!((smoother.current() - 10.0).abs() < 1e-4);

    smoother.jump_to(-2.0);
    assert_eq!(smoother.current(), -2.0);
    assert_eq!(smoother.next(), -2.0);

    smoother.set_coefficient(1.0);
    smoother.set_target(3.0);
    assert_eq!(smoother.next(), 3.0);
    assert_eq!(smoother.coefficient(), 1.0);
}

#[test]
fn crossfade_endpoints() {
    assert_eq!(crossfade(2.0, 4.0, 0.0), 2.0);
    assert_eq!(crossfade(2.0, 4.0, 1.0), 4.0);
    assert_eq!(crossfade(2.0, 4.0, 0.5), 3.0);
}
