//! Control state: volume, speed, mute and metronome flags shared by playback.

/// Lowest playback speed multiplier.
pub const SPEED_MIN: f32 = 0.5;
/// Highest playback speed multiplier.
pub const SPEED_MAX: f32 = 1.6;

/// Step applied by the volume up/down keys.
pub const VOLUME_STEP: f32 = 0.05;
/// Step applied by the speed up/down keys.
pub const SPEED_STEP: f32 = 0.1;

/// Parameters written by the control surface and read by playback and the
/// metronome. Every setter clamps and is idempotent.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    volume: f32,
    speed: f32,
    muted: bool,
    metronome_enabled: bool,
}

impl ControlState {
    pub fn new(volume: f32, speed: f32) -> Self {
        let mut state = Self::default();
        state.set_volume(volume);
        state.set_speed(speed);
        state
    }

    /// The volume slider value in `[0, 1]`. Unaffected by mute.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn metronome_enabled(&self) -> bool {
        self.metronome_enabled
    }

    /// Multiplier for the shared gain stage: zero while muted, otherwise the
    /// slider value.
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    /// Set the volume slider; NaN is ignored.
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_nan() {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }

    /// Set the speed slider; NaN is ignored.
    pub fn set_speed(&mut self, speed: f32) {
        if !speed.is_nan() {
            self.speed = speed.clamp(SPEED_MIN, SPEED_MAX);
        }
    }

    pub fn nudge_volume(&mut self, delta: f32) {
        self.set_volume(round_step(self.volume + delta));
    }

    pub fn nudge_speed(&mut self, delta: f32) {
        self.set_speed(round_step(self.speed + delta));
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub(crate) fn set_metronome_enabled(&mut self, enabled: bool) {
        self.metronome_enabled = enabled;
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            volume: 0.8,
            speed: 1.0,
            muted: false,
            metronome_enabled: false,
        }
    }
}

/// Snap to two decimals so repeated nudges land on exact slider positions.
fn round_step(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
