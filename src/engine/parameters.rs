//! Parameter table and lock-free hand-over from the control context to the audio context.
//!
//! Every parameter is a single `f32` stored as bits in an [`AtomicU32`]. The control context
//! is the only writer ([`ParameterBlock::set`]), the audio context the only reader
//! ([`crate::engine::Engine::update_parameters`]). Relaxed ordering is sufficient: each value is
//! independent and a reader seeing an update one block late is harmless.

use core::sync::atomic::{AtomicU32, Ordering};

pub const NUM_PARAMETERS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    /// String pitch as note number.
    StringPitch = 0,
    /// Gain in dB applied where the loop is written back into the feedback delay.
    FeedbackGain = 1,
    /// Feedback delay time in seconds.
    FeedbackDelay = 2,
    /// Cutoff of the low-pass filter in the feedback loop in Hz.
    FeedbackLpfCutoff = 3,
    /// Cutoff of the high-pass filter in the feedback loop in Hz.
    FeedbackHpfCutoff = 4,
    /// Echo delay time in seconds.
    EchoDelayTime = 5,
    /// Echo feedback ratio. Values above 1.0 make the echo self-reinforcing.
    EchoDelayFeedback = 6,
}

/// Response curve applied to normalized control positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mapping {
    Linear,
    /// Quadratic curve, more resolution at the low end.
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    pub default: f32,
    pub min: f32,
    pub max: f32,
    pub mapping: Mapping,
    /// Control-rate smoothing time constant in seconds, `0.0` for none.
    pub smoothing_time: f32,
}

impl ParameterRange {
    /// Clamp a value into the range. NaN falls back to the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Map a normalized position `0.0..1.0` onto the range.
    #[inline]
    pub fn map(&self, normalized: f32) -> f32 {
        let x = if normalized.is_nan() {
            0.0
        } else {
            normalized.clamp(0.0, 1.0)
        };
        let x = match self.mapping {
            Mapping::Linear => x,
            Mapping::Exponential => x * x,
        };

        self.min + x * (self.max - self.min)
    }
}

const RANGES: [ParameterRange; NUM_PARAMETERS] = [
    ParameterRange {
        default: 40.0,
        min: 16.0,
        max: 72.0,
        mapping: Mapping::Exponential,
        smoothing_time: 0.2,
    },
    ParameterRange {
        default: -60.0,
        min: -60.0,
        max: 12.0,
        mapping: Mapping::Linear,
        smoothing_time: 0.0,
    },
    ParameterRange {
        default: 0.001,
        min: 0.001,
        max: 0.2,
        mapping: Mapping::Linear,
        smoothing_time: 0.0,
    },
    ParameterRange {
        default: 18000.0,
        min: 100.0,
        max: 18000.0,
        mapping: Mapping::Linear,
        smoothing_time: 0.0,
    },
    ParameterRange {
        default: 250.0,
        min: 32.0,
        max: 2000.0,
        mapping: Mapping::Linear,
        smoothing_time: 0.0,
    },
    ParameterRange {
        default: 0.5,
        min: 0.05,
        max: 5.0,
        mapping: Mapping::Linear,
        smoothing_time: 0.0,
    },
    ParameterRange {
        default: 0.0,
        min: 0.0,
        max: 1.5,
        mapping: Mapping::Linear,
        smoothing_time: 0.0,
    },
];

impl Parameter {
    pub const ALL: [Parameter; NUM_PARAMETERS] = [
        Parameter::StringPitch,
        Parameter::FeedbackGain,
        Parameter::FeedbackDelay,
        Parameter::FeedbackLpfCutoff,
        Parameter::FeedbackHpfCutoff,
        Parameter::EchoDelayTime,
        Parameter::EchoDelayFeedback,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn range(self) -> &'static ParameterRange {
        &RANGES[self.index()]
    }

    #[inline]
    pub fn clamp(self, value: f32) -> f32 {
        self.range().clamp(value)
    }
}

/// Current parameter values shared between the control and audio contexts.
#[derive(Debug)]
pub struct ParameterBlock {
    values: [AtomicU32; NUM_PARAMETERS],
}

impl Default for ParameterBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterBlock {
    /// Block holding the default of every parameter.
    pub fn new() -> Self {
        Self {
            values: core::array::from_fn(|index| AtomicU32::new(RANGES[index].default.to_bits())),
        }
    }

    /// Publish a value, clamped to the parameter range. Control context only.
    #[inline]
    pub fn set(&self, parameter: Parameter, value: f32) {
        self.values[parameter.index()].store(parameter.clamp(value).to_bits(), Ordering::Relaxed);
    }

    #[inline]
    pub fn get(&self, parameter: Parameter) -> f32 {
        f32::from_bits(self.bits(parameter))
    }

    #[inline]
    pub(crate) fn bits(&self, parameter: Parameter) -> u32 {
        self.values[parameter.index()].load(Ordering::Relaxed)
    }
}
