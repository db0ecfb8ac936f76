//! Feedback voice with MIDI control changes standing in for the hardware knobs.
//!
//! CC 21..27 map to the engine parameters in the order of [`Parameter::ALL`], CC 28 sets the
//! output volume. Note messages are ignored; the voice drones on its own.

use audio_midi_shell::{AudioGenerator, AudioMidiShell};
use simple_logger::SimpleLogger;

use feedback_synth::controls::Controls;
use feedback_synth::engine::parameters::{Parameter, ParameterBlock};
use feedback_synth::engine::Engine;

const SAMPLE_RATE: u32 = 48000;
const BLOCK_SIZE: usize = 32;

const FIRST_PARAMETER_CC: u8 = 21;
const VOLUME_CC: u8 = 28;

fn main() -> ! {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init()
        .unwrap();

    AudioMidiShell::run_forever(SAMPLE_RATE, BLOCK_SIZE, App::new());
}

#[derive(Debug)]
struct App {
    engine: Engine<'static>,
    parameters: &'static ParameterBlock,
    controls: Controls<'static>,
    volume: f32,
}

impl App {
    pub fn new() -> Self {
        let parameters: &'static ParameterBlock = Box::leak(Box::new(ParameterBlock::new()));
        let control_rate = SAMPLE_RATE as f32 / BLOCK_SIZE as f32;

        Self {
            engine: Engine::new(&std::alloc::System, SAMPLE_RATE as f32).unwrap(),
            parameters,
            controls: Controls::new(parameters, control_rate),
            volume: 1.0,
        }
    }
}

impl AudioGenerator for App {
    fn init(&mut self, _block_size: usize) {
        self.engine.init(SAMPLE_RATE as f32);

        // Start from an audible patch instead of the silent power-on defaults.
        self.controls.update(Parameter::FeedbackGain, -6.0);
        self.controls.update(Parameter::FeedbackDelay, 0.05);
        self.controls.update(Parameter::EchoDelayFeedback, 0.4);
    }

    fn process(&mut self, samples_left: &mut [f32], samples_right: &mut [f32]) {
        // One control tick per block.
        self.controls.process();
        self.engine.update_parameters(self.parameters);
        self.engine.render(samples_left, samples_right);

        for sample in samples_left.iter_mut().chain(samples_right.iter_mut()) {
            *sample *= self.volume;
        }
    }

    fn process_midi(&mut self, message: Vec<u8>) {
        if message.len() < 3 || message[0] & 0xF0 != 0xB0 {
            return;
        }

        let value = message[2] as f32 / 127.0;

        match message[1] {
            VOLUME_CC => {
                self.volume = value;
                log::info!("Volume: {}", self.volume);
            }
            cc if (FIRST_PARAMETER_CC..VOLUME_CC).contains(&cc) => {
                let parameter = Parameter::ALL[(cc - FIRST_PARAMETER_CC) as usize];
                self.controls.update_normalized(parameter, value);
                log::info!("{:?}: {}", parameter, self.controls.target(parameter));
            }
            _ => {}
        }
    }
}
