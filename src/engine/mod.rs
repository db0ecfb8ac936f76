//! Feedback synthesizer engine.
//!
//! Signal flow per sample:
//!
//! ```text
//!  noise ──┬─► (+) ─► string L ─► drive/clip ─┐
//!          │    ▲                             ├─► low-pass ─► high-pass ─┬─► × gain ─► feedback delay L/R
//!          └─► (+) ─► string R ─► drive/clip ─┘                          │        (read back at the top)
//!               ▲                                                        └─► dry/echo mix ─► × trim ─► out L/R
//!        feedback delay L/R
//! ```
//!
//! The soft clipper bounds the energy circulating in the loop, so gains above unity make the
//! voice self-oscillate instead of diverging.
//!
//! # Contexts
//!
//! [`Engine::process`] runs in the audio callback. It never allocates, blocks or fails. The
//! setters take `&mut self` and must therefore be called between `process` calls of the same
//! context. A separate control context publishes values through a [`ParameterBlock`] instead;
//! the audio context picks them up with [`Engine::update_parameters`]. Target values are thus
//! written only by the control side, smoothed values only by the audio side.

pub mod parameters;

use core::alloc::GlobalAlloc;

use self::parameters::{Parameter, ParameterBlock, NUM_PARAMETERS};
use crate::fx::echo_delay::EchoDelay;
use crate::memory::allocate_buffer;
use crate::noise::white_noise::WhiteNoise;
use crate::physical_modelling::string::String;
use crate::utils::biquad::{BiquadKind, StereoBiquad};
use crate::utils::delay_line::FixedDelayLine;
use crate::utils::parameter_smoother::ParameterSmoother;
use crate::utils::units::{decibels_to_gain, note_to_frequency};
use crate::utils::{one_pole_coefficient, soft_clip};
use crate::{Error, SampleRate};

pub const NUM_CHANNELS: usize = 2;

/// Feedback delay capacity, long enough for 250ms at 48kHz.
pub const MAX_FEEDBACK_DELAY_SAMPLES: usize = 12000;

/// Echo delay capacity, long enough for 5s at 48kHz.
pub const MAX_ECHO_DELAY_SAMPLES: usize = 48000 * 5;

/// Offset of the right channel feedback read against the left one.
/// Tuned by ear, it sets the width of the stereo image.
pub const STEREO_OFFSET_SAMPLES: f32 = 4.0;

const FEEDBACK_DELAY_SMOOTHING_TIME: f32 = 0.2;
const INITIAL_FEEDBACK_DELAY_SAMPLES: f32 = 64.0;
const NOISE_FLOOR_DB: f32 = -90.0;
const DRIVE: f32 = 4.0;
const ECHO_MIX: f32 = 0.5;
const OUTPUT_TRIM: f32 = 0.25;

const STRING_NOTE: f32 = 40.0;
const STRING_DAMPING: f32 = 0.5;
const STRING_BRIGHTNESS: f32 = 0.85;

const ECHO_DELAY_TIME: f32 = 5.0;
const ECHO_FEEDBACK: f32 = 0.5;
const ECHO_LAG_TIME: f32 = 0.5;

const FILTER_Q: f32 = 0.9;
const LPF_CUTOFF: f32 = 18000.0;
const HPF_CUTOFF: f32 = 60.0;

// Never stored by a ParameterBlock, which only holds clamped values.
const NOT_APPLIED: u32 = u32::MAX;

/// Feedback delay read offset of the right channel for a given left channel offset.
#[inline]
pub fn right_channel_delay(delay: f32) -> f32 {
    (delay - STEREO_OFFSET_SAMPLES).max(1.0)
}

#[derive(Debug)]
struct Channel<'a> {
    string: String,
    feedback_delay: FixedDelayLine<MAX_FEEDBACK_DELAY_SAMPLES>,
    echo_delay: EchoDelay<'a>,
}

impl<'a> Channel<'a> {
    fn new(echo_buffer: &'a mut [f32]) -> Self {
        Self {
            string: String::new(),
            feedback_delay: FixedDelayLine::new(),
            echo_delay: EchoDelay::new(echo_buffer),
        }
    }

    fn init(&mut self, sample_rate: f32) {
        self.string.init(sample_rate);
        self.string.set_brightness(STRING_BRIGHTNESS);
        self.string.set_frequency(note_to_frequency(STRING_NOTE));
        self.string.set_damping(STRING_DAMPING);

        self.feedback_delay.init();

        self.echo_delay.init(sample_rate);
        self.echo_delay.set_delay_time(ECHO_DELAY_TIME, true);
        self.echo_delay.set_feedback(ECHO_FEEDBACK);
        self.echo_delay.set_lag_time(ECHO_LAG_TIME);
    }
}

#[derive(Debug)]
pub struct Engine<'a> {
    sample_rate: SampleRate,
    feedback_gain: f32,
    feedback_delay: ParameterSmoother,

    noise: WhiteNoise,
    channels: [Channel<'a>; NUM_CHANNELS],
    lpf: StereoBiquad,
    hpf: StereoBiquad,

    applied: [u32; NUM_PARAMETERS],
}

impl<'a> Engine<'a> {
    /// Allocate the echo memories from `buffer_allocator` and initialize the engine.
    ///
    /// This is the only fallible step: the engine cannot run without its echo buffers.
    pub fn new<T: GlobalAlloc>(buffer_allocator: &'a T, sample_rate: f32) -> Result<Self, Error> {
        let mut engine = Self {
            sample_rate: SampleRate::new(sample_rate),
            feedback_gain: 0.0,
            feedback_delay: ParameterSmoother::default(),
            noise: WhiteNoise::new(),
            channels: [
                Channel::new(allocate_buffer(buffer_allocator, MAX_ECHO_DELAY_SAMPLES)?),
                Channel::new(allocate_buffer(buffer_allocator, MAX_ECHO_DELAY_SAMPLES)?),
            ],
            lpf: StereoBiquad::new(BiquadKind::LowPass),
            hpf: StereoBiquad::new(BiquadKind::HighPass),
            applied: [NOT_APPLIED; NUM_PARAMETERS],
        };

        engine.init(sample_rate);

        Ok(engine)
    }

    /// Reset all state to the power-on defaults. Does not allocate, but touches every buffer,
    /// so it should not be called from the audio callback.
    pub fn init(&mut self, sample_rate: f32) {
        self.sample_rate = SampleRate::new(sample_rate);
        self.feedback_gain = decibels_to_gain(Parameter::FeedbackGain.range().default);
        self.feedback_delay = ParameterSmoother::new(
            INITIAL_FEEDBACK_DELAY_SAMPLES,
            one_pole_coefficient(FEEDBACK_DELAY_SMOOTHING_TIME, sample_rate),
        );

        self.noise.init();
        self.noise.set_amplitude(decibels_to_gain(NOISE_FLOOR_DB));

        for channel in self.channels.iter_mut() {
            channel.init(sample_rate);
        }

        self.lpf.init(sample_rate);
        self.lpf.set_q(FILTER_Q);
        self.lpf.set_cutoff(LPF_CUTOFF);

        self.hpf.init(sample_rate);
        self.hpf.set_q(FILTER_Q);
        self.hpf.set_cutoff(HPF_CUTOFF);

        self.applied = [NOT_APPLIED; NUM_PARAMETERS];

        log::info!("Feedback engine initialized at {} Hz", sample_rate);
    }

    /// Set the pitch of both strings from a note number.
    pub fn set_string_pitch(&mut self, note: f32) {
        let frequency = note_to_frequency(Parameter::StringPitch.clamp(note));
        for channel in self.channels.iter_mut() {
            channel.string.set_frequency(frequency);
        }
    }

    pub fn set_feedback_gain(&mut self, gain_db: f32) {
        self.feedback_gain = decibels_to_gain(Parameter::FeedbackGain.clamp(gain_db));
    }

    /// Set the feedback delay time in seconds. The read offset glides to it in [`Self::process`].
    pub fn set_feedback_delay(&mut self, delay: f32) {
        let samples = self
            .sample_rate
            .seconds_to_samples(Parameter::FeedbackDelay.clamp(delay));
        self.feedback_delay
            .set_target(samples.clamp(1.0, (MAX_FEEDBACK_DELAY_SAMPLES - 1) as f32));
    }

    pub fn set_feedback_lpf_cutoff(&mut self, cutoff: f32) {
        self.lpf.set_cutoff(Parameter::FeedbackLpfCutoff.clamp(cutoff));
    }

    pub fn set_feedback_hpf_cutoff(&mut self, cutoff: f32) {
        self.hpf.set_cutoff(Parameter::FeedbackHpfCutoff.clamp(cutoff));
    }

    /// Set the echo time in seconds. Each echo glides to it with its own lag.
    pub fn set_echo_delay_time(&mut self, time: f32) {
        let time = Parameter::EchoDelayTime.clamp(time);
        for channel in self.channels.iter_mut() {
            channel.echo_delay.set_delay_time(time, false);
        }
    }

    pub fn set_echo_delay_feedback(&mut self, feedback: f32) {
        let feedback = Parameter::EchoDelayFeedback.clamp(feedback);
        for channel in self.channels.iter_mut() {
            channel.echo_delay.set_feedback(feedback);
        }
    }

    /// Dispatch a value to the matching setter.
    pub fn set_parameter(&mut self, parameter: Parameter, value: f32) {
        match parameter {
            Parameter::StringPitch => self.set_string_pitch(value),
            Parameter::FeedbackGain => self.set_feedback_gain(value),
            Parameter::FeedbackDelay => self.set_feedback_delay(value),
            Parameter::FeedbackLpfCutoff => self.set_feedback_lpf_cutoff(value),
            Parameter::FeedbackHpfCutoff => self.set_feedback_hpf_cutoff(value),
            Parameter::EchoDelayTime => self.set_echo_delay_time(value),
            Parameter::EchoDelayFeedback => self.set_echo_delay_feedback(value),
        }
    }

    /// Apply the values of `parameters` that changed since the previous call.
    /// The first call after [`Self::init`] applies all of them.
    pub fn update_parameters(&mut self, parameters: &ParameterBlock) {
        for parameter in Parameter::ALL {
            let bits = parameters.bits(parameter);
            if self.applied[parameter.index()] != bits {
                self.applied[parameter.index()] = bits;
                self.set_parameter(parameter, f32::from_bits(bits));
            }
        }
    }

    #[inline]
    pub fn process(&mut self, out_left: &mut f32, out_right: &mut f32) {
        // Audio-rate smoothed controls.
        let delay = self.feedback_delay.next();

        let noise = self.noise.process();

        // Feedback loop.
        let [left, right] = &mut self.channels;

        let in_left = left.feedback_delay.read_frac(delay) + noise;
        let in_right = right.feedback_delay.read_frac(right_channel_delay(delay)) + noise;

        let mut sample_left = soft_clip(left.string.process(in_left) * DRIVE);
        let mut sample_right = soft_clip(right.string.process(in_right) * DRIVE);

        self.lpf.process_stereo(&mut sample_left, &mut sample_right);
        self.hpf.process_stereo(&mut sample_left, &mut sample_right);

        left.feedback_delay.write(sample_left * self.feedback_gain);
        right.feedback_delay.write(sample_right * self.feedback_gain);

        // Output.
        let mix_left = sample_left * ECHO_MIX + left.echo_delay.process(sample_left) * ECHO_MIX;
        let mix_right =
            sample_right * ECHO_MIX + right.echo_delay.process(sample_right) * ECHO_MIX;

        *out_left = mix_left * OUTPUT_TRIM;
        *out_right = mix_right * OUTPUT_TRIM;
    }

    /// Render a block, one [`Self::process`] call per frame.
    #[inline]
    pub fn render(&mut self, out_left: &mut [f32], out_right: &mut [f32]) {
        for (left, right) in out_left.iter_mut().zip(out_right.iter_mut()) {
            self.process(left, right);
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate.sample_rate_hz
    }

    /// Linear gain applied where the loop is written back.
    pub fn feedback_gain(&self) -> f32 {
        self.feedback_gain
    }

    /// Smoothed feedback delay read offset in samples.
    pub fn feedback_delay(&self) -> f32 {
        self.feedback_delay.current()
    }

    /// Feedback delay read offset in samples the smoothing heads to.
    pub fn feedback_delay_target(&self) -> f32 {
        self.feedback_delay.target()
    }

    pub fn smoothing_coefficient(&self) -> f32 {
        self.feedback_delay.coefficient()
    }

    pub fn string_frequencies(&self) -> [f32; NUM_CHANNELS] {
        [
            self.channels[0].string.frequency(),
            self.channels[1].string.frequency(),
        ]
    }

    pub fn feedback_lpf_cutoff(&self) -> f32 {
        self.lpf.cutoff()
    }

    pub fn feedback_hpf_cutoff(&self) -> f32 {
        self.hpf.cutoff()
    }

    /// Target delay of both echoes in samples.
    pub fn echo_delay_targets(&self) -> [f32; NUM_CHANNELS] {
        [
            self.channels[0].echo_delay.target_delay(),
            self.channels[1].echo_delay.target_delay(),
        ]
    }

    pub fn echo_delay_feedback(&self) -> [f32; NUM_CHANNELS] {
        [
            self.channels[0].echo_delay.feedback(),
            self.channels[1].echo_delay.feedback(),
        ]
    }
}
