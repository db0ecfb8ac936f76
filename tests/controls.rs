//! Tests for the control surface

use feedback_synth::controls::Controls;
use feedback_synth::engine::parameters::{Mapping, Parameter, ParameterBlock};
use feedback_synth::engine::Engine;

const CONTROL_RATE: f32 = 48000.0 / 32.0;

#[test]
fn publishes_defaults() {
    let parameters = ParameterBlock::new();
    parameters.set(Parameter::FeedbackGain, 6.0);

    let controls = Controls::new(&parameters, CONTROL_RATE);

    for parameter in Parameter::ALL {
        assert_eq!(parameters.get(parameter), parameter.range().default);
        assert_eq!(controls.value(parameter), parameter.range().default);
    }
}

#[test]
fn normalized_mapping() {
    let parameters = ParameterBlock::new();
    let mut controls = Controls::new(&parameters, CONTROL_RATE);

    controls.update_normalized(Parameter::FeedbackLpfCutoff, 0.0);
    assert_eq!(parameters.get(Parameter::FeedbackLpfCutoff), 100.0);
    controls.update_normalized(Parameter::FeedbackLpfCutoff, 1.0);
    assert_eq!(parameters.get(Parameter::FeedbackLpfCutoff), 18000.0);

    controls.update_normalized(Parameter::EchoDelayFeedback, 2.0);
    assert_eq!(parameters.get(Parameter::EchoDelayFeedback), 1.5);
    controls.update_normalized(Parameter::EchoDelayFeedback, f32::NAN);
    assert_eq!(parameters.get(Parameter::EchoDelayFeedback), 0.0);

    let pitch = Parameter::StringPitch.range();
    assert_eq!(pitch.mapping, Mapping::Exponential);
    assert_eq!(pitch.map(0.5), 30.0);
    assert_eq!(pitch.map(1.0), 72.0);
}

#[test]
fn out_of_range_values_are_clamped() {
    let parameters = ParameterBlock::new();
    let mut controls = Controls::new(&parameters, CONTROL_RATE);

    controls.update(Parameter::FeedbackDelay, 5.0);
    assert_eq!(parameters.get(Parameter::FeedbackDelay), 0.2);

    controls.update(Parameter::FeedbackHpfCutoff, -100.0);
    assert_eq!(parameters.get(Parameter::FeedbackHpfCutoff), 32.0);

    controls.update(Parameter::FeedbackGain, 0.0);
    controls.update(Parameter::FeedbackGain, f32::NAN);
    assert_eq!(parameters.get(Parameter::FeedbackGain), -60.0);

    for parameter in Parameter::ALL {
        let range = parameter.range();
        assert_eq!(parameter.clamp(f32::INFINITY), range.max);
        assert_eq!(parameter.clamp(f32::NEG_INFINITY), range.min);
        assert_eq!(parameter.clamp(f32::NAN), range.default);
    }
}

#[test]
fn pitch_is_smoothed() {
    let parameters = ParameterBlock::new();
    let mut controls = Controls::new(&parameters, CONTROL_RATE);

    controls.update_normalized(Parameter::StringPitch, 1.0);
    assert_eq!(controls.target(Parameter::StringPitch), 72.0);
    assert_eq!(parameters.get(Parameter::StringPitch), 40.0);

    controls.process();
    let first = parameters.get(Parameter::StringPitch);
    assert!(first > 40.0 && first < 41.0);

    let mut previous = first;
    for _ in 0..3000 {
        controls.process();
        let value = parameters.get(Parameter::StringPitch);
        assert!(value >= previous && value <= 72.0);
        previous = value;
    }
    assert!(72.0 - previous < 0.01);

    // Unsmoothed parameters follow immediately.
    controls.update(Parameter::EchoDelayTime, 2.0);
    assert_eq!(parameters.get(Parameter::EchoDelayTime), 2.0);
}

#[test]
fn single_update_keeps_gliding() {
    let parameters = ParameterBlock::new();
    let mut controls = Controls::new(&parameters, CONTROL_RATE);

    // One control change, then two seconds of ticks without any further input.
    controls.update_normalized(Parameter::StringPitch, 1.0);
    for _ in 0..(2.0 * CONTROL_RATE) as usize {
        controls.process();
    }

    assert!((parameters.get(Parameter::StringPitch) - 72.0).abs() < 0.01);
    assert_eq!(controls.value(Parameter::StringPitch), parameters.get(Parameter::StringPitch));
}

#[test]
fn controls_drive_engine() {
    let parameters = ParameterBlock::new();
    let mut controls = Controls::new(&parameters, CONTROL_RATE);
    let mut engine = Engine::new(&std::alloc::System, 48000.0).unwrap();
    let mut left = [0.0f32; 32];
    let mut right = [0.0f32; 32];

    controls.update(Parameter::FeedbackDelay, 0.1);
    controls.update(Parameter::FeedbackLpfCutoff, 5000.0);
    controls.update(Parameter::EchoDelayTime, 1.0);

    std::thread::scope(|scope| {
        scope.spawn(|| {
            engine.update_parameters(&parameters);
            engine.render(&mut left, &mut right);
        });
    });

    assert_eq!(engine.feedback_delay_target(), 4800.0);
    assert_eq!(engine.feedback_lpf_cutoff(), 5000.0);
    assert_eq!(engine.echo_delay_targets(), [48000.0, 48000.0]);
}
