//! Second-order filter shared by a stereo pair of channels.
//!
//! Coefficients follow the RBJ audio EQ cookbook; processing uses the transposed direct form II.
//! One coefficient set drives two independent state pairs, so both channels always share
//! cutoff and resonance.

#[allow(unused_imports)]
use num_traits::float::Float;

/// Highest cutoff accepted, as a fraction of the sample rate.
const MAX_NORMALIZED_CUTOFF: f32 = 0.49;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiquadKind {
    LowPass,
    HighPass,
}

#[derive(Debug, Clone)]
pub struct StereoBiquad {
    kind: BiquadKind,
    sample_rate: f32,
    cutoff: f32,
    q: f32,

    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    z1: [f32; 2],
    z2: [f32; 2],
}

impl StereoBiquad {
    pub fn new(kind: BiquadKind) -> Self {
        Self {
            kind,
            sample_rate: 48000.0,
            cutoff: 1000.0,
            q: core::f32::consts::FRAC_1_SQRT_2,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: [0.0; 2],
            z2: [0.0; 2],
        }
    }

    pub fn init(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.reset();
        self.update_coefficients();
    }

    pub fn reset(&mut self) {
        self.z1 = [0.0; 2];
        self.z2 = [0.0; 2];
    }

    pub fn set_q(&mut self, q: f32) {
        self.q = q.max(0.1);
        self.update_coefficients();
    }

    /// Set the cutoff in Hz, kept below Nyquist.
    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff = cutoff.clamp(1.0, self.sample_rate * MAX_NORMALIZED_CUTOFF);
        self.update_coefficients();
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    fn update_coefficients(&mut self) {
        let w0 = core::f32::consts::TAU * self.cutoff / self.sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * self.q);
        let a0 = 1.0 + alpha;

        let (b0, b1) = match self.kind {
            BiquadKind::LowPass => ((1.0 - cos_w0) * 0.5, 1.0 - cos_w0),
            BiquadKind::HighPass => ((1.0 + cos_w0) * 0.5, -(1.0 + cos_w0)),
        };

        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b0 / a0;
        self.a1 = -2.0 * cos_w0 / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    #[inline]
    fn tick(&mut self, channel: usize, x: f32) -> f32 {
        let y = self.b0 * x + self.z1[channel];
        self.z1[channel] = self.b1 * x - self.a1 * y + self.z2[channel];
        self.z2[channel] = self.b2 * x - self.a2 * y;
        y
    }

    #[inline]
    pub fn process_stereo(&mut self, left: &mut f32, right: &mut f32) {
        *left = self.tick(0, *left);
        *right = self.tick(1, *right);
    }
}
