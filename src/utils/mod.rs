//! Utility functions.
//!
//! Small building blocks shared by the DSP primitives and the engine.

pub mod biquad;
pub mod delay_line;
pub mod filter;
pub mod parameter_smoother;
pub mod random;
pub mod units;

#[allow(unused_imports)]
use num_traits::float::Float;

#[inline]
pub fn one_pole(out: &mut f32, in_: f32, coefficient: f32) {
    *out += (coefficient) * ((in_) - *out);
}

/// Coefficient for [`one_pole`] reaching ~63% of a step after `time` seconds.
#[inline]
pub fn one_pole_coefficient(time: f32, sample_rate: f32) -> f32 {
    1.0 - (-1.0 / (time * sample_rate)).exp()
}

#[inline]
pub fn crossfade(a: f32, b: f32, fade: f32) -> f32 {
    a + (b - a) * fade
}

#[inline]
pub fn soft_limit(x: f32) -> f32 {
    x * (27.0 + x * x) / (27.0 + 9.0 * x * x)
}

/// Smooth saturation reaching ±1.0 at ±3.0 and holding beyond.
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    if x < -3.0 {
        -1.0
    } else if x > 3.0 {
        1.0
    } else {
        soft_limit(x)
    }
}
