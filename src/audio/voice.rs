//! Voice: one playback cursor over a mono sample.

/// Playback cursor with its own rate and volume.
///
/// Rate and volume are fixed when the voice starts; a restart resets the
/// cursor to the first frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pos: f64,
    rate: f64,
    volume: f32,
    active: bool,
}

impl Voice {
    pub const fn idle() -> Self {
        Self {
            pos: 0.0,
            rate: 1.0,
            volume: 1.0,
            active: false,
        }
    }

    /// (Re)start from the beginning.
    pub fn start(&mut self, rate: f32, volume: f32) {
        self.pos = 0.0;
        self.rate = rate.max(0.0) as f64;
        self.volume = volume;
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Produce the next output frame from `frames` and advance the cursor.
    #[inline]
    pub fn next(&mut self, frames: &[f32]) -> f32 {
        if !self.active {
            return 0.0;
        }
        let idx = self.pos as usize;
        let Some(&s0) = frames.get(idx) else {
            self.active = false;
            return 0.0;
        };
        let s1 = frames.get(idx + 1).copied().unwrap_or(0.0);
        let frac = (self.pos - idx as f64) as f32;
        self.pos += self.rate;
        (s0 + (s1 - s0) * frac) * self.volume
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::idle()
    }
}
