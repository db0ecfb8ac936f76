//! Zero-delay-feedback state variable filter and DC blocker.

// Based on MIT-licensed code (c) 2014 by Olivier Gillet (ol.gillet@gmail.com)

#[derive(Debug, Clone, Copy)]
pub enum FrequencyApproximation {
    Fast,
    Dirty,
}

const M_PI_F: f32 = core::f32::consts::PI;
const M_PI_POW_3: f32 = M_PI_F * M_PI_F * M_PI_F;
const M_PI_POW_5: f32 = M_PI_POW_3 * M_PI_F * M_PI_F;

/// Prewarped filter coefficient `tan(pi * f)` for a frequency normalized to the sample rate.
#[inline]
pub fn tan(f: f32, approximation: FrequencyApproximation) -> f32 {
    match approximation {
        FrequencyApproximation::Dirty => {
            // Optimized for frequencies below 8kHz.
            const A: f32 = 3.736e-01 * M_PI_POW_3;
            f * (M_PI_F + A * f * f)
        }
        FrequencyApproximation::Fast => {
            // Coefficients tuned for the 16Hz to 16kHz range at 48kHz.
            const A: f32 = 3.260e-01 * M_PI_POW_3;
            const B: f32 = 1.823e-01 * M_PI_POW_5;
            let f2 = f * f;
            f * (M_PI_F + f2 * (A + B * f2))
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct DcBlocker {
    pole: f32,
    x: f32,
    y: f32,
}

impl DcBlocker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(&mut self, pole: f32) {
        self.x = 0.0;
        self.y = 0.0;
        self.pole = pole;
    }

    #[inline]
    pub fn process(&mut self, in_: f32) -> f32 {
        let old_x = self.x;
        self.x = in_;
        self.y = self.y * self.pole + self.x - old_x;
        self.y
    }
}

#[derive(Debug, Default, Clone)]
pub struct Svf {
    g: f32,
    r: f32,
    h: f32,
    state_1: f32,
    state_2: f32,
}

impl Svf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(&mut self) {
        self.set_f_q(0.01, 100.0, FrequencyApproximation::Dirty);
        self.reset();
    }

    pub fn reset(&mut self) {
        self.state_1 = 0.0;
        self.state_2 = 0.0;
    }

    /// Set frequency and resonance from true units. Various approximations
    /// are available to avoid the cost of tanf.
    #[inline]
    pub fn set_f_q(&mut self, f: f32, resonance: f32, approximation: FrequencyApproximation) {
        self.g = tan(f, approximation);
        self.r = 1.0 / resonance;
        self.h = 1.0 / (1.0 + self.r * self.g + self.g * self.g);
    }

    /// Low-pass output.
    #[inline]
    pub fn process(&mut self, in_: f32) -> f32 {
        let hp = (in_ - self.r * self.state_1 - self.g * self.state_1 - self.state_2) * self.h;
        let bp = self.g * hp + self.state_1;
        self.state_1 = self.g * hp + bp;
        let lp = self.g * bp + self.state_2;
        self.state_2 = self.g * bp + lp;

        lp
    }
}
