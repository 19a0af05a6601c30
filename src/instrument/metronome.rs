//! Metronome: a two-state click timer.

use std::time::{Duration, Instant};

use crate::timer::PeriodicTask;

/// Fixed metronome tempo.
pub const METRONOME_BPM: f64 = 90.0;

/// Metronome state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetronomeState {
    Off,
    On,
}

/// Emits one click per beat while on.
#[derive(Debug, Clone)]
pub struct Metronome {
    bpm: f64,
    task: PeriodicTask,
}

impl Metronome {
    pub fn new(bpm: f64) -> Self {
        let bpm = bpm.max(1.0);
        Self {
            bpm,
            task: PeriodicTask::new(Duration::from_secs_f64(60.0 / bpm)),
        }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Time between clicks, `60000 / bpm` milliseconds.
    pub fn interval(&self) -> Duration {
        self.task.interval()
    }

    pub fn state(&self) -> MetronomeState {
        if self.task.is_running() {
            MetronomeState::On
        } else {
            MetronomeState::Off
        }
    }

    pub fn is_on(&self) -> bool {
        self.task.is_running()
    }

    /// Flip between on and off. Turning on schedules the first click one
    /// interval from `now`; turning off cancels any pending click.
    pub fn toggle(&mut self, now: Instant) -> MetronomeState {
        if self.task.is_running() {
            self.task.stop();
        } else {
            self.task.start(now);
        }
        self.state()
    }

    /// Whether a click is due at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.task.poll(now)
    }

    /// When the next click will fire, if on.
    pub fn next_click(&self) -> Option<Instant> {
        self.task.next_due()
    }
}

impl Default for Metronome {
    fn default() -> Self {
        Self::new(METRONOME_BPM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn ninety_bpm_is_about_667ms() {
        let m = Metronome::default();
        let ms = m.interval().as_secs_f64() * 1000.0;
        assert!((ms - 666.667).abs() < 0.01, "interval was {ms}ms");
    }

    #[test]
    fn starts_off() {
        let mut m = Metronome::default();
        assert_eq!(m.state(), MetronomeState::Off);
        assert!(!m.poll(Instant::now() + 10_000 * MS));
    }

    #[test]
    fn clicks_once_per_interval_when_on() {
        let mut m = Metronome::default();
        let t0 = Instant::now();
        assert_eq!(m.toggle(t0), MetronomeState::On);

        assert!(!m.poll(t0 + 600 * MS));
        assert!(m.poll(t0 + 667 * MS));
        assert!(!m.poll(t0 + 700 * MS));
        assert!(m.poll(t0 + 1334 * MS));
    }

    #[test]
    fn on_then_off_leaves_no_pending_click() {
        let mut m = Metronome::default();
        let t0 = Instant::now();
        m.toggle(t0);
        assert_eq!(m.toggle(t0 + 10 * MS), MetronomeState::Off);
        assert_eq!(m.next_click(), None);
        assert!(!m.poll(t0 + 5000 * MS));
    }
}
