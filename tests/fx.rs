//! Tests for the effects


use feedback_synth::fx::*;
use feedback_synth::utils::soft_clip;

const SAMPLE_RATE: f32 = 48000.0;

#[test]
fn echo_delay_impulse() {
    let mut buffer = vec![0.0f32; 48000];
    let mut echo = echo_delay::EchoDelay::new(&mut buffer);
    echo.init(SAMPLE_RATE);
    echo.set_delay_time(0.25, true);
    echo.set_feedback(0.5);

    assert_eq!(echo.max_delay(), 48000);
    assert_eq!(echo.delay(), 12000.0);

    let mut out = Vec::new();
    for n in 0..48000 {
        let in_ = if n == 0 { 1.0 } else { 0.0 };
        out.push(echo.process(in_));
    }

    assert_eq!(out[12000], 1.0);
    assert!((out[24000] - soft_clip(0.5)).abs() < 1e-6);
    assert!(out[36000] > 0.0 && out[36000] < out[24000]);
    assert!(out[..12000].iter().all(|sample| *sample == 0.0));

    wav_writer::write("fx/echo_delay_impulse.wav", &out).ok();
}

#[test]
fn echo_delay_bounded_above_unity_feedback() {
    let mut buffer = vec![0.0f32; 48000];
    let mut echo = echo_delay::EchoDelay::new(&mut buffer);
    echo.init(SAMPLE_RATE);
    echo.set_delay_time(0.01, true);
    echo.set_feedback(1.5);

    let mut out = Vec::new();
    for n in 0..(SAMPLE_RATE as usize * 4) {
        let in_ = if (n / 120) % 2 == 0 { 1.0 } else { -1.0 };
        let sample = echo.process(in_);
        assert!(sample.is_finite());
        assert!(sample.abs() <= 2.0);
        out.push(sample * 0.5);
    }

    wav_writer::write("fx/echo_delay_saturated.wav", &out).ok();
}

#[test]
fn echo_delay_glides() {
    let mut buffer = vec![0.0f32; 48000];
    let mut echo = echo_delay::EchoDelay::new(&mut buffer);
    echo.init(SAMPLE_RATE);
    echo.set_lag_time(0.05);
    echo.set_delay_time(0.1, true);
    echo.set_delay_time(0.5, false);

    assert_eq!(echo.target_delay(), 24000.0);

    let mut previous = echo.delay();
    for _ in 0..4800 {
        echo.process(0.0);
        assert!(echo.delay() >= previous);
        previous = echo.delay();
    }
    assert!(previous > 4800.0 && previous < 24000.0);

    for _ in 0..48000 {
        echo.process(0.0);
    }
    assert!((echo.delay() - 24000.0).abs() < 4.0);

    // Out of range times stay inside the buffer.
    echo.set_delay_time(10.0, true);
    assert_eq!(echo.delay(), 47999.0);
    echo.set_delay_time(-1.0, true);
    assert_eq!(echo.delay(), 1.0);
}
