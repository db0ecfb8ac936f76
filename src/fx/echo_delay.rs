//! Echo with feedback and smoothed delay time.
//!
//! The delay memory is provided by the caller, usually from
//! [`crate::memory::allocate_buffer`]. Delay time changes glide with a one-pole lag so that
//! turning the time knob produces a tape-like pitch bend instead of clicks. The regenerated
//! signal passes through a soft clipper, which keeps the tail bounded for feedback ratios
//! above 1.0.

use crate::utils::delay_line::DelayLine;
use crate::utils::parameter_smoother::ParameterSmoother;
use crate::utils::{one_pole_coefficient, soft_clip};
use crate::SampleRate;

const DEFAULT_LAG_TIME: f32 = 0.5;

#[derive(Debug)]
pub struct EchoDelay<'a> {
    line: DelayLine<&'a mut [f32]>,
    sample_rate: SampleRate,
    delay: ParameterSmoother,
    feedback: f32,
}

impl<'a> EchoDelay<'a> {
    pub fn new(buffer: &'a mut [f32]) -> Self {
        Self {
            line: DelayLine::from_buffer(buffer),
            sample_rate: SampleRate::default(),
            delay: ParameterSmoother::new(1.0, 1.0),
            feedback: 0.0,
        }
    }

    pub fn init(&mut self, sample_rate: f32) {
        self.sample_rate = SampleRate::new(sample_rate);
        self.line.reset();
        self.delay.jump_to(1.0);
        self.feedback = 0.0;
        self.set_lag_time(DEFAULT_LAG_TIME);
    }

    /// Longest delay in samples.
    pub fn max_delay(&self) -> usize {
        self.line.max_delay()
    }

    /// Set the delay time in seconds. `instant` skips the glide.
    pub fn set_delay_time(&mut self, seconds: f32, instant: bool) {
        let max = self.line.max_delay().saturating_sub(1) as f32;
        let samples = self
            .sample_rate
            .seconds_to_samples(seconds)
            .clamp(1.0, max.max(1.0));

        if instant {
            self.delay.jump_to(samples);
        } else {
            self.delay.set_target(samples);
        }
    }

    /// Feedback ratio. Above 1.0 the tail grows until the soft clipper holds it.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.max(0.0);
    }

    /// Time constant of the delay time glide in seconds.
    pub fn set_lag_time(&mut self, seconds: f32) {
        self.delay.set_coefficient(one_pole_coefficient(
            seconds.max(0.0),
            self.sample_rate.sample_rate_hz,
        ));
    }

    /// Current (smoothed) delay in samples.
    pub fn delay(&self) -> f32 {
        self.delay.current()
    }

    /// Delay in samples the glide is heading to.
    pub fn target_delay(&self) -> f32 {
        self.delay.target()
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    #[inline]
    pub fn process(&mut self, in_: f32) -> f32 {
        let delay = self.delay.next();
        let out = self.line.read_frac(delay);
        self.line.write(in_ + soft_clip(self.feedback * out));

        out
    }
}
