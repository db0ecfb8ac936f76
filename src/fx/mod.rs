//! Effects.

pub mod echo_delay;
