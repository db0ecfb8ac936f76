//! One-pole smoothing of control values evaluated at audio rate.
//!
//! The control side only ever calls [`ParameterSmoother::set_target`]; the audio side owns the
//! current value and advances it with [`ParameterSmoother::next`] once per sample.

use super::one_pole;

#[derive(Debug, Default, Copy, Clone)]
pub struct ParameterSmoother {
    current: f32,
    target: f32,
    coefficient: f32,
}

impl ParameterSmoother {
    pub fn new(value: f32, coefficient: f32) -> Self {
        Self {
            current: value,
            target: value,
            coefficient,
        }
    }

    #[inline]
    pub fn set_coefficient(&mut self, coefficient: f32) {
        self.coefficient = coefficient;
    }

    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Move current and target to `value` without ramping.
    #[inline]
    pub fn jump_to(&mut self, value: f32) {
        self.current = value;
        self.target = value;
    }

    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> f32 {
        one_pole(&mut self.current, self.target, self.coefficient);
        self.current
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn coefficient(&self) -> f32 {
        self.coefficient
    }
}
