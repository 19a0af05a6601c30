//! Pads: the fixed registry of triggerable samples, their keys and visual state.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::kit::{DrumSound, KIT_SAMPLE_RATE, KIT_SEED};
use super::sample::SampleData;
use crate::timer::Deadline;

/// Number of pads on the instrument.
pub const PAD_COUNT: usize = 7;

/// Trigger keys, one per pad, matched case-insensitively.
pub const PAD_KEYS: [char; PAD_COUNT] = ['a', 's', 'd', 'f', 'g', 'h', 'j'];

/// How long a pad shows as "playing" after a trigger.
pub const PLAYING_FLASH: Duration = Duration::from_millis(280);
/// How long the ripple around a pad lasts after a trigger.
pub const RIPPLE_FLASH: Duration = Duration::from_millis(500);

/// Look up the pad bound to a key. Unknown keys return `None`.
pub fn pad_for_key(key: char) -> Option<usize> {
    let lower = key.to_ascii_lowercase();
    PAD_KEYS.iter().position(|&k| k == lower)
}

/// Where a pad's sound came from.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleSource {
    /// Decoded from a file on disk.
    File(PathBuf),
    /// Synthesized built-in sound.
    Builtin(DrumSound),
}

/// Transient visual state of a pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadVisual {
    Idle,
    /// Recently triggered; implies rippling.
    Playing,
    /// Playing flash ended but the ripple is still fading.
    Rippling,
}

/// One triggerable unit: a key, an optional sample, and its flash timers.
#[derive(Debug, Clone)]
pub struct Pad {
    index: usize,
    key: char,
    label: String,
    sample: Option<Arc<SampleData>>,
    playing: Deadline,
    ripple: Deadline,
}

impl Pad {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn key(&self) -> char {
        self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sample(&self) -> Option<&Arc<SampleData>> {
        self.sample.as_ref()
    }

    /// A pad without a sample ignores every trigger.
    pub fn is_inert(&self) -> bool {
        self.sample.is_none()
    }

    /// Start the playing and ripple flashes.
    pub fn flash(&mut self, now: Instant) {
        self.playing.arm(now, PLAYING_FLASH);
        self.ripple.arm(now, RIPPLE_FLASH);
    }

    pub fn visual(&self, now: Instant) -> PadVisual {
        if self.playing.is_active(now) {
            PadVisual::Playing
        } else if self.ripple.is_active(now) {
            PadVisual::Rippling
        } else {
            PadVisual::Idle
        }
    }

    /// Clear expired flashes.
    pub fn expire(&mut self, now: Instant) {
        self.playing.expire(now);
        self.ripple.expire(now);
    }
}

/// The fixed set of pads, created once at startup.
#[derive(Debug, Clone)]
pub struct PadBank {
    pads: Vec<Pad>,
}

impl PadBank {
    /// Build the bank from one optional source per pad. A file that fails to
    /// load leaves its pad inert; the failure is logged, never raised.
    pub fn load(sources: &[Option<SampleSource>]) -> Self {
        let pads = (0..PAD_COUNT)
            .map(|index| {
                let source = sources
                    .get(index)
                    .cloned()
                    .flatten()
                    .unwrap_or(SampleSource::Builtin(DrumSound::for_pad(index)));
                let (label, sample) = resolve(index, &source);
                Pad {
                    index,
                    key: PAD_KEYS[index],
                    label,
                    sample: sample.map(Arc::new),
                    playing: Deadline::default(),
                    ripple: Deadline::default(),
                }
            })
            .collect();
        Self { pads }
    }

    /// Every pad bound to its built-in sound.
    pub fn builtin() -> Self {
        Self::load(&[])
    }

    /// Build directly from samples; `None` entries become inert pads.
    pub fn from_samples(samples: Vec<Option<SampleData>>) -> Self {
        let mut samples = samples.into_iter();
        let pads = (0..PAD_COUNT)
            .map(|index| {
                let sample = samples.next().flatten();
                Pad {
                    index,
                    key: PAD_KEYS[index],
                    label: format!("pad {}", index + 1),
                    sample: sample.map(Arc::new),
                    playing: Deadline::default(),
                    ripple: Deadline::default(),
                }
            })
            .collect();
        Self { pads }
    }

    pub fn get(&self, index: usize) -> Option<&Pad> {
        self.pads.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Pad> {
        self.pads.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pad> {
        self.pads.iter()
    }

    pub fn len(&self) -> usize {
        self.pads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pads.is_empty()
    }

    pub fn expire(&mut self, now: Instant) {
        for pad in &mut self.pads {
            pad.expire(now);
        }
    }
}

fn resolve(index: usize, source: &SampleSource) -> (String, Option<SampleData>) {
    match source {
        SampleSource::Builtin(sound) => (
            sound.label().to_string(),
            Some(sound.render(KIT_SAMPLE_RATE, KIT_SEED)),
        ),
        SampleSource::File(path) => {
            let label = file_label(path);
            match SampleData::from_path(path) {
                Ok(sample) => {
                    info!(pad = index, path = %path.display(), frames = sample.len(), "loaded sample");
                    (label, Some(sample))
                }
                Err(e) => {
                    warn!(pad = index, path = %path.display(), "pad disabled: {e}");
                    (label, None)
                }
            }
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
