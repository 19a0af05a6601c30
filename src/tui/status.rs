//! Status bar: volume, speed, metronome and audio output state.

use crate::audio::GraphState;
use crate::instrument::Instrument;

/// Audio output indicator.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioStatus {
    /// Nothing played yet.
    Idle,
    Ready(String),
    Failed(String),
}

/// Status information for the TUI status bar.
#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub volume: f32,
    pub speed: f32,
    pub muted: bool,
    pub metronome: bool,
    pub bpm: f64,
    pub audio: AudioStatus,
}

impl StatusInfo {
    pub fn from_instrument(inst: &Instrument) -> Self {
        let controls = inst.controls();
        let audio = match inst.audio().state() {
            GraphState::Uninitialized => AudioStatus::Idle,
            GraphState::Ready(sink) => AudioStatus::Ready(sink.name().to_string()),
            GraphState::Failed(e) => AudioStatus::Failed(e.clone()),
        };
        Self {
            volume: controls.volume(),
            speed: controls.speed(),
            muted: controls.is_muted(),
            metronome: inst.metronome().is_on(),
            bpm: inst.metronome().bpm(),
            audio,
        }
    }

    /// "VOL 80%", or "MUTED".
    pub fn volume_display(&self) -> String {
        if self.muted {
            "MUTED".to_string()
        } else {
            format!("VOL {:.0}%", self.volume * 100.0)
        }
    }

    /// "1.00x".
    pub fn speed_display(&self) -> String {
        format!("{:.2}x", self.speed)
    }

    /// "MET 90" or "MET off".
    pub fn metronome_display(&self) -> String {
        if self.metronome {
            format!("MET {:.0}", self.bpm)
        } else {
            "MET off".to_string()
        }
    }

    /// Output name shortened to `max` characters.
    pub fn audio_display(&self, max: usize) -> String {
        match &self.audio {
            AudioStatus::Idle => "audio: idle".to_string(),
            AudioStatus::Failed(_) => "NO AUDIO (r: retry)".to_string(),
            AudioStatus::Ready(name) => {
                if name.chars().count() > max {
                    let mut t: String = name.chars().take(max.saturating_sub(1)).collect();
                    t.push('\u{2026}'); // ellipsis
                    t
                } else {
                    name.clone()
                }
            }
        }
    }
}

impl Default for StatusInfo {
    fn default() -> Self {
        Self {
            volume: 0.8,
            speed: 1.0,
            muted: false,
            metronome: false,
            bpm: 90.0,
            audio: AudioStatus::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_display() {
        let status = StatusInfo::default();
        assert_eq!(status.volume_display(), "VOL 80%");
        let muted = StatusInfo {
            muted: true,
            ..Default::default()
        };
        assert_eq!(muted.volume_display(), "MUTED");
    }

    #[test]
    fn speed_display() {
        let status = StatusInfo {
            speed: 1.6,
            ..Default::default()
        };
        assert_eq!(status.speed_display(), "1.60x");
    }

    #[test]
    fn metronome_display() {
        assert_eq!(StatusInfo::default().metronome_display(), "MET off");
        let on = StatusInfo {
            metronome: true,
            ..Default::default()
        };
        assert_eq!(on.metronome_display(), "MET 90");
    }

    #[test]
    fn long_device_names_are_truncated() {
        let status = StatusInfo {
            audio: AudioStatus::Ready("Built-in Output Speakers".into()),
            ..Default::default()
        };
        assert_eq!(status.audio_display(12), "Built-in Ou\u{2026}");
        assert_eq!(status.audio_display(40), "Built-in Output Speakers");
    }

    #[test]
    fn failed_audio_hints_at_retry() {
        let status = StatusInfo {
            audio: AudioStatus::Failed("no device".into()),
            ..Default::default()
        };
        assert!(status.audio_display(12).contains("retry"));
    }
}
