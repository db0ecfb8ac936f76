//! Self-oscillating feedback synthesizer voice.
//!
//! A noise floor excites a pair of Karplus-Strong strings whose output is driven into a soft
//! clipper, filtered and written back into a feedback delay line. The loop output is mixed with
//! a stereo echo. Everything runs per sample without allocation after construction, so the
//! [`engine::Engine`] can be called from a hard real-time audio callback.
//!
//! Parameters cross from a control context to the audio context through a lock-free
//! [`engine::parameters::ParameterBlock`], typically fed by [`controls::Controls`].

#![cfg_attr(not(test), no_std)]

pub mod controls;
pub mod engine;
pub mod error;
pub mod fx;
pub mod memory;
pub mod noise;
pub mod physical_modelling;
pub mod utils;

pub use error::Error;

/// Sample rate context for DSP calculations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRate {
    /// Sample rate in Hz
    pub sample_rate_hz: f32,
    /// Reciprocal of sample rate (1.0 / sample_rate_hz) for fast multiplication
    pub inv_sr: f32,
}

impl SampleRate {
    /// Create a new sample rate context.
    pub fn new(sample_rate_hz: f32) -> Self {
        Self {
            sample_rate_hz,
            inv_sr: 1.0 / sample_rate_hz,
        }
    }

    /// Convert a duration in seconds into samples.
    #[inline]
    pub fn seconds_to_samples(&self, seconds: f32) -> f32 {
        seconds * self.sample_rate_hz
    }

    /// Convert a frequency in Hz into a frequency normalized to the sample rate.
    #[inline]
    pub fn normalize(&self, frequency_hz: f32) -> f32 {
        frequency_hz * self.inv_sr
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self::new(48000.0)
    }
}
