//! Unit conversions.

#[allow(unused_imports)]
use num_traits::float::Float;

#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    (semitones * (1.0 / 12.0)).exp2()
}

/// Frequency in Hz of a (fractional) MIDI note number, A4 = note 69 = 440 Hz.
#[inline]
pub fn note_to_frequency(midi_note: f32) -> f32 {
    440.0 * semitones_to_ratio(midi_note - 69.0)
}

/// Linear gain for a level in dB.
#[inline]
pub fn decibels_to_gain(decibels: f32) -> f32 {
    10.0f32.powf(decibels * 0.05)
}
