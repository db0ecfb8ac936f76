//! Control surface façade.
//!
//! Turns control positions into parameter values and publishes them to a [`ParameterBlock`]
//! shared with the audio context. Reading the hardware itself is up to the caller.
//!
//! [`Controls::update`] and [`Controls::update_normalized`] only move a parameter's target and
//! may be called whenever a control changes. [`Controls::process`] must be called exactly once
//! per control tick, i.e. `control_rate` times per second, usually once per audio block. It
//! advances the smoothed parameters and publishes them. Unsmoothed parameters are published as
//! soon as they are updated.
//!
//! The block is borrowed for the lifetime of the controls, so it has to be created first and
//! dropped last:
//!
//! ```
//! use feedback_synth::controls::Controls;
//! use feedback_synth::engine::parameters::{Parameter, ParameterBlock};
//!
//! let parameters = ParameterBlock::new();
//! let mut controls = Controls::new(&parameters, 48000.0 / 32.0);
//! controls.update_normalized(Parameter::FeedbackGain, 0.75);
//! assert_eq!(parameters.get(Parameter::FeedbackGain), -6.0);
//! ```

use crate::engine::parameters::{Parameter, ParameterBlock, NUM_PARAMETERS};
use crate::utils::{one_pole, one_pole_coefficient};

#[derive(Debug)]
pub struct Controls<'a> {
    parameters: &'a ParameterBlock,
    targets: [f32; NUM_PARAMETERS],
    values: [f32; NUM_PARAMETERS],
    coefficients: [f32; NUM_PARAMETERS],
}

impl<'a> Controls<'a> {
    /// Bind to `parameters`, ticked by [`Self::process`] `control_rate` times per second.
    pub fn new(parameters: &'a ParameterBlock, control_rate: f32) -> Self {
        let mut controls = Self {
            parameters,
            targets: [0.0; NUM_PARAMETERS],
            values: [0.0; NUM_PARAMETERS],
            coefficients: [1.0; NUM_PARAMETERS],
        };

        for parameter in Parameter::ALL {
            let range = parameter.range();
            let index = parameter.index();

            controls.targets[index] = range.default;
            controls.values[index] = range.default;
            if range.smoothing_time > 0.0 {
                controls.coefficients[index] =
                    one_pole_coefficient(range.smoothing_time, control_rate);
            }

            parameters.set(parameter, range.default);
        }

        controls
    }

    /// Update from a normalized control position `0.0..1.0`, applying the response curve
    /// of the parameter.
    pub fn update_normalized(&mut self, parameter: Parameter, normalized: f32) {
        let value = parameter.range().map(normalized);
        self.update(parameter, value);
    }

    /// Update from a value in the parameter's own unit.
    pub fn update(&mut self, parameter: Parameter, value: f32) {
        let index = parameter.index();
        self.targets[index] = parameter.clamp(value);

        if parameter.range().smoothing_time <= 0.0 {
            self.values[index] = self.targets[index];
            self.parameters.set(parameter, self.values[index]);
        }
    }

    /// Advance the smoothed parameters by one control tick and publish them.
    pub fn process(&mut self) {
        for parameter in Parameter::ALL {
            if parameter.range().smoothing_time > 0.0 {
                let index = parameter.index();
                one_pole(
                    &mut self.values[index],
                    self.targets[index],
                    self.coefficients[index],
                );
                self.parameters.set(parameter, self.values[index]);
            }
        }
    }

    /// Last value published for `parameter`.
    pub fn value(&self, parameter: Parameter) -> f32 {
        self.values[parameter.index()]
    }

    /// Value `parameter` is heading to.
    pub fn target(&self, parameter: Parameter) -> f32 {
        self.targets[parameter.index()]
    }
}
