//! Noise generators.

pub mod white_noise;
