//! Audio callback: runs on the cpal audio thread.
//!
//! Drains commands from the ring buffer, mixes pad voices and the metronome
//! click, applies the shared gain stage, and taps the post-gain signal for the
//! analyser.

use std::sync::Arc;

use ringbuf::traits::{Consumer, Producer};
use ringbuf::{HeapCons, HeapProd};

use super::click::click_tone;
use super::command::AudioCommand;
use super::gain::GainStage;
use super::voice::Voice;
use crate::instrument::{SampleData, PAD_COUNT};

/// State that lives on the audio thread. Accessed only from the cpal callback.
pub struct AudioCallback {
    commands: HeapCons<AudioCommand>,
    analysis: HeapProd<f32>,
    samples: Vec<Option<Arc<SampleData>>>,
    voices: Vec<Voice>,
    click: Vec<f32>,
    click_voice: Voice,
    gain: GainStage,
    channels: usize,
}

impl AudioCallback {
    pub fn new(
        commands: HeapCons<AudioCommand>,
        analysis: HeapProd<f32>,
        channels: u16,
        sample_rate: u32,
    ) -> Self {
        Self {
            commands,
            analysis,
            samples: vec![None; PAD_COUNT],
            voices: vec![Voice::idle(); PAD_COUNT],
            click: click_tone(sample_rate),
            click_voice: Voice::idle(),
            gain: GainStage::default(),
            channels: channels.max(1) as usize,
        }
    }

    /// Called by cpal for each output buffer. `output` is interleaved.
    pub fn process(&mut self, output: &mut [f32]) {
        while let Some(cmd) = self.commands.try_pop() {
            self.apply(cmd);
        }

        for frame in output.chunks_mut(self.channels) {
            let mut mix = 0.0;
            for (voice, sample) in self.voices.iter_mut().zip(&self.samples) {
                if let Some(sample) = sample {
                    mix += voice.next(sample.frames());
                }
            }
            mix += self.click_voice.next(&self.click);

            let out = self.gain.process(mix);
            frame.fill(out);
            // Analyser lagging behind is fine; drop what doesn't fit.
            let _ = self.analysis.try_push(out);
        }
    }

    fn apply(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Bind { pad, sample } => {
                if let (Some(slot), Some(voice)) =
                    (self.samples.get_mut(pad), self.voices.get_mut(pad))
                {
                    voice.stop();
                    *slot = Some(sample);
                }
            }
            AudioCommand::Play { pad, rate, volume } => {
                let bound = self.samples.get(pad).is_some_and(Option::is_some);
                if let (true, Some(voice)) = (bound, self.voices.get_mut(pad)) {
                    voice.start(rate, volume);
                }
            }
            AudioCommand::SetGain(gain) => self.gain.set_gain(gain),
            AudioCommand::Click => self.click_voice.start(1.0, 1.0),
        }
    }

    pub fn gain(&self) -> f32 {
        self.gain.gain()
    }

    pub fn is_playing(&self, pad: usize) -> bool {
        self.voices.get(pad).is_some_and(Voice::is_active)
    }
}
