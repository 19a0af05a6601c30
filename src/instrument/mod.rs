//! Instrument: pads, controls, metronome and the lazy audio graph behind them.
//!
//! All state lives here and is driven from the UI thread. Every method takes
//! the current [`Instant`] instead of reading the clock, so the whole trigger
//! pipeline runs deterministically in tests.

pub mod controls;
pub mod kit;
pub mod metronome;
pub mod pad;
pub mod sample;

use std::time::Instant;

use tracing::{debug, info, warn};

pub use controls::ControlState;
pub use kit::DrumSound;
pub use metronome::{Metronome, MetronomeState, METRONOME_BPM};
pub use pad::{pad_for_key, Pad, PadBank, PadVisual, SampleSource, PAD_COUNT, PAD_KEYS};
pub use sample::{SampleData, SampleError};

use crate::audio::{AudioCommand, AudioContext};

/// The playable instrument.
pub struct Instrument {
    pads: PadBank,
    controls: ControlState,
    metronome: Metronome,
    audio: AudioContext,
}

impl Instrument {
    pub fn new(pads: PadBank, controls: ControlState, audio: AudioContext) -> Self {
        Self {
            pads,
            controls,
            metronome: Metronome::default(),
            audio,
        }
    }

    pub fn pads(&self) -> &PadBank {
        &self.pads
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn metronome(&self) -> &Metronome {
        &self.metronome
    }

    pub fn audio(&self) -> &AudioContext {
        &self.audio
    }

    /// Play a pad. Returns `false` for unknown or inert pads, which are left
    /// untouched.
    ///
    /// The first trigger creates the audio graph and binds every loaded pad.
    /// Audio failures are logged; the pad still flashes.
    pub fn trigger(&mut self, index: usize, now: Instant) -> bool {
        match self.pads.get(index) {
            None => {
                debug!(pad = index, "trigger ignored: no such pad");
                return false;
            }
            Some(pad) if pad.is_inert() => {
                debug!(pad = index, "trigger ignored: no sample");
                return false;
            }
            Some(_) => {}
        }

        if self.ensure_audio() {
            // Retries a binding that failed when the graph was created.
            self.bind_pad(index);
            let cmd = AudioCommand::Play {
                pad: index,
                rate: self.controls.speed(),
                volume: self.controls.volume(),
            };
            if let Err(e) = self.audio.send(cmd) {
                warn!(pad = index, "playback failed: {e}");
            }
        }

        if let Some(pad) = self.pads.get_mut(index) {
            pad.flash(now);
        }
        true
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.controls.set_volume(volume);
        self.push_gain();
    }

    pub fn nudge_volume(&mut self, delta: f32) {
        self.controls.nudge_volume(delta);
        self.push_gain();
    }

    /// Affects triggers from now on; voices already playing keep their rate.
    pub fn set_speed(&mut self, speed: f32) {
        self.controls.set_speed(speed);
    }

    pub fn nudge_speed(&mut self, delta: f32) {
        self.controls.nudge_speed(delta);
    }

    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.controls.toggle_mute();
        self.push_gain();
        muted
    }

    /// Switch the metronome. Needs the audio graph, so this creates it if no
    /// pad has been played yet.
    pub fn toggle_metronome(&mut self, now: Instant) -> MetronomeState {
        self.ensure_audio();
        let state = self.metronome.toggle(now);
        self.controls
            .set_metronome_enabled(state == MetronomeState::On);
        info!(?state, bpm = self.metronome.bpm(), "metronome");
        state
    }

    /// Advance timers: flash expiry, metronome clicks and the analyser.
    ///
    /// A due click rebuilds a graph dropped by [`reconnect`](Self::reconnect).
    pub fn tick(&mut self, now: Instant) {
        self.pads.expire(now);

        if self.metronome.poll(now) && self.ensure_audio() {
            if let Err(e) = self.audio.send(AudioCommand::Click) {
                warn!("metronome click dropped: {e}");
            }
        }

        self.audio.pump_analysis();
    }

    /// Drop the graph (failed or live). The next interaction rebuilds it.
    pub fn reconnect(&mut self) {
        self.audio.reset();
    }

    /// Latest byte frequency data, if the graph exists.
    pub fn analysis(&self) -> Option<&[u8]> {
        self.audio.analysis()
    }

    fn ensure_audio(&mut self) -> bool {
        if self.audio.is_ready() {
            return true;
        }
        if !self.audio.ensure() {
            return false;
        }

        for index in 0..self.pads.len() {
            self.bind_pad(index);
        }
        self.push_gain();
        true
    }

    /// Bind one pad's sample unless the graph already has it.
    fn bind_pad(&mut self, index: usize) {
        if self.audio.is_bound(index) {
            return;
        }
        let Some(sample) = self.pads.get(index).and_then(Pad::sample) else {
            return;
        };
        if let Err(e) = self.audio.bind(index, sample) {
            warn!(pad = index, "bind failed: {e}");
        }
    }

    fn push_gain(&mut self) {
        if !self.audio.is_ready() {
            return;
        }
        if let Err(e) = self.audio.send(AudioCommand::SetGain(self.controls.gain())) {
            warn!("gain update dropped: {e}");
        }
    }
}
