//! Shared gain stage: global volume/mute multiplier followed by a hard ceiling.

/// Gain stage every voice and the metronome pass through.
#[derive(Debug, Clone)]
pub struct GainStage {
    gain: f32,
    ceiling: f32,
}

impl GainStage {
    /// `ceiling` should be in `(0.0, 1.0]`.
    pub fn new(gain: f32, ceiling: f32) -> Self {
        debug_assert!(ceiling > 0.0 && ceiling <= 1.0);
        Self {
            gain: gain.clamp(0.0, 1.0),
            ceiling,
        }
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    #[inline]
    pub fn process(&self, sample: f32) -> f32 {
        (sample * self.gain).clamp(-self.ceiling, self.ceiling)
    }
}

impl Default for GainStage {
    fn default() -> Self {
        Self {
            gain: 1.0,
            ceiling: 0.95,
        }
    }
}
