//! Comb filter / KS string. "Lite" version of the implementation used in Rings.
//!
//! The string is excited by an arbitrary input signal and processes one sample at a time.
//! Frequency, damping, brightness and non-linearity are set separately; the derived
//! coefficients are recomputed in the setters so that [`String::process`] stays cheap.

// Based on MIT-licensed code (c) 2016 by Emilie Gillet (emilie.o.gillet@gmail.com)

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::utils::delay_line::FixedDelayLine;
use crate::utils::filter::{DcBlocker, FrequencyApproximation, Svf};
use crate::utils::random::Random;
use crate::utils::units::semitones_to_ratio;
use crate::utils::{crossfade, one_pole};
use crate::SampleRate;

pub const DELAY_LINE_SIZE: usize = 1024;

/// Smoothing applied to delay changes, per processed sample.
const DELAY_SMOOTHING: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringNonLinearity {
    CurvedBridge,
    Dispersion,
}

#[derive(Debug)]
pub struct String {
    string: FixedDelayLine<DELAY_LINE_SIZE>,
    stretch: FixedDelayLine<{ DELAY_LINE_SIZE / 4 }>,

    iir_damping_filter: Svf,
    dc_blocker: DcBlocker,
    random: Random,

    sample_rate: SampleRate,
    frequency: f32,
    damping: f32,
    brightness: f32,
    non_linearity_amount: f32,

    // Derived from the parameters above.
    non_linearity: StringNonLinearity,
    src_ratio: f32,
    target_delay: f32,
    stretch_point: f32,
    stretch_correction: f32,
    noise_amount: f32,
    noise_filter: f32,
    bridge_curving: f32,
    ap_gain: f32,

    delay: f32,
    dispersion_noise: f32,
    curved_bridge: f32,

    // Very crappy linear interpolation upsampler used for low pitches that
    // do not fit the delay line. Rarely used.
    src_phase: f32,
    out_sample: [f32; 2],
}

impl Default for String {
    fn default() -> Self {
        Self::new()
    }
}

impl String {
    pub fn new() -> Self {
        Self {
            string: FixedDelayLine::new(),
            stretch: FixedDelayLine::new(),
            iir_damping_filter: Svf::default(),
            dc_blocker: DcBlocker::default(),
            random: Random::default(),
            sample_rate: SampleRate::default(),
            frequency: 220.0,
            damping: 0.5,
            brightness: 0.5,
            non_linearity_amount: 0.0,
            non_linearity: StringNonLinearity::CurvedBridge,
            src_ratio: 1.0,
            target_delay: 0.0,
            stretch_point: 0.0,
            stretch_correction: 1.0,
            noise_amount: 0.0,
            noise_filter: 0.0,
            bridge_curving: 0.0,
            ap_gain: 0.0,
            delay: 0.0,
            dispersion_noise: 0.0,
            curved_bridge: 0.0,
            src_phase: 0.0,
            out_sample: [0.0; 2],
        }
    }

    pub fn init(&mut self, sample_rate: f32) {
        self.sample_rate = SampleRate::new(sample_rate);
        self.frequency = 220.0;
        self.damping = 0.5;
        self.brightness = 0.5;
        self.non_linearity_amount = 0.0;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.string.reset();
        self.stretch.reset();
        self.iir_damping_filter.init();
        self.dc_blocker.init(1.0 - 20.0 * self.sample_rate.inv_sr);
        self.random = Random::default();
        self.dispersion_noise = 0.0;
        self.curved_bridge = 0.0;
        self.out_sample = [0.0; 2];
        self.src_phase = 0.0;
        self.update_coefficients();
        self.delay = self.target_delay;
    }

    /// Set the fundamental frequency in Hz.
    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency.clamp(1.0, self.sample_rate.sample_rate_hz * 0.25);
        self.update_coefficients();
    }

    /// Energy loss per period, `0.0..1.0`. Values close to 1.0 crossfade to infinite decay.
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(0.0, 1.0);
        self.update_coefficients();
    }

    /// High frequency content of the decay, `0.0..1.0`.
    pub fn set_brightness(&mut self, brightness: f32) {
        self.brightness = brightness.clamp(0.0, 1.0);
        self.update_coefficients();
    }

    /// `-1.0..0.0` bends the bridge (sitar-like), `0.0..1.0` adds dispersion.
    pub fn set_non_linearity(&mut self, non_linearity_amount: f32) {
        self.non_linearity_amount = non_linearity_amount.clamp(-1.0, 1.0);
        self.update_coefficients();
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    fn update_coefficients(&mut self) {
        let f0 = self.sample_rate.normalize(self.frequency);
        let delay = (1.0 / f0).clamp(4.0, DELAY_LINE_SIZE as f32 - 4.0);

        // If there is not enough delay time in the delay line, we play at the
        // lowest possible note and we upsample on the fly with a shitty linear
        // interpolator. We don't care because it's a corner case (f0 < 11.7Hz
        // at 48kHz).
        self.src_ratio = delay * f0;
        if self.src_ratio >= 0.9999 {
            // Make sure that the linear interpolator does not get in the way.
            self.src_phase = 1.0;
            self.src_ratio = 1.0;
        }

        let damping = self.damping;
        let mut brightness = self.brightness;
        let mut damping_cutoff =
            f32::min(12.0 + damping * damping * 60.0 + brightness * 24.0, 84.0);
        let mut damping_f = f32::min(f0 * semitones_to_ratio(damping_cutoff), 0.499);

        // Crossfade to infinite decay.
        if damping >= 0.95 {
            let to_infinite = 20.0 * (damping - 0.95);
            brightness += to_infinite * (1.0 - brightness);
            damping_f += to_infinite * (0.4999 - damping_f);
            damping_cutoff += to_infinite * (128.0 - damping_cutoff);
        }

        self.iir_damping_filter
            .set_f_q(damping_f, 0.5, FrequencyApproximation::Fast);

        // The damping filter lags the loop by its phase shift at f0.
        let cutoff_ratio = semitones_to_ratio(damping_cutoff);
        let damping_compensation = 1.0 - (1.0 / cutoff_ratio).atan() / core::f32::consts::PI;
        self.target_delay = delay * damping_compensation;

        let amount = self.non_linearity_amount.abs();
        self.non_linearity = if self.non_linearity_amount <= 0.0 {
            StringNonLinearity::CurvedBridge
        } else {
            StringNonLinearity::Dispersion
        };

        self.stretch_point = amount * (2.0 - amount) * 0.225;
        self.stretch_correction = (160.0 * self.sample_rate.inv_sr * delay).clamp(1.0, 2.1);

        let noise_amount_sqrt = if amount > 0.75 {
            4.0 * (amount - 0.75)
        } else {
            0.0
        };
        self.noise_amount = noise_amount_sqrt * noise_amount_sqrt * 0.1;
        self.noise_filter = 0.06 + 0.94 * brightness * brightness;
        self.bridge_curving = amount * amount * 0.01;
        self.ap_gain = -0.618 * amount / (0.15 + amount);
    }

    #[inline]
    pub fn process(&mut self, in_: f32) -> f32 {
        self.src_phase += self.src_ratio;
        if self.src_phase > 1.0 {
            self.src_phase -= 1.0;

            one_pole(&mut self.delay, self.target_delay, DELAY_SMOOTHING);
            let mut delay = self.delay;
            let mut s;

            match self.non_linearity {
                StringNonLinearity::Dispersion => {
                    let noise = self.random.get_float() - 0.5;
                    one_pole(&mut self.dispersion_noise, noise, self.noise_filter);
                    delay *= 1.0 + self.dispersion_noise * self.noise_amount;

                    let ap_delay = delay * self.stretch_point;
                    let main_delay = delay
                        - ap_delay
                            * (0.408 - self.stretch_point * 0.308)
                            * self.stretch_correction;
                    if ap_delay >= 4.0 && main_delay >= 4.0 {
                        s = self.string.read_frac(main_delay);
                        s = self.stretch.allpass(s, ap_delay as usize, self.ap_gain);
                    } else {
                        s = self.string.read_hermite(delay);
                    }
                }
                StringNonLinearity::CurvedBridge => {
                    delay *= 1.0 - self.curved_bridge * self.bridge_curving;
                    s = self.string.read_hermite(delay);

                    let value = s.abs() - 0.025;
                    let sign = if s > 0.0 { 1.0 } else { -1.5 };
                    self.curved_bridge = (value.abs() + value) * sign;
                }
            }

            s += in_.clamp(-20.0, 20.0);
            s = self.dc_blocker.process(s);
            s = self.iir_damping_filter.process(s);
            self.string.write(s);

            self.out_sample[1] = self.out_sample[0];
            self.out_sample[0] = s;
        }

        crossfade(self.out_sample[1], self.out_sample[0], self.src_phase)
    }
}
