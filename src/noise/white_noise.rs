//! White noise source with adjustable amplitude.

use crate::utils::random::Random;

const DEFAULT_SEED: u32 = 0x1234_5678;

#[derive(Debug, Clone)]
pub struct WhiteNoise {
    random: Random,
    amplitude: f32,
}

impl Default for WhiteNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl WhiteNoise {
    pub fn new() -> Self {
        Self {
            random: Random::new(DEFAULT_SEED),
            amplitude: 1.0,
        }
    }

    pub fn init(&mut self) {
        self.random.seed(DEFAULT_SEED);
        self.amplitude = 1.0;
    }

    /// Set the peak amplitude of the output as a linear gain.
    #[inline]
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    #[inline]
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Uniformly distributed sample in `-amplitude..amplitude`.
    #[inline]
    pub fn process(&mut self) -> f32 {
        (self.random.get_float() * 2.0 - 1.0) * self.amplitude
    }
}
