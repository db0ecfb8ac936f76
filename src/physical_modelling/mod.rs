//! Physical modelling components.

pub mod string;
