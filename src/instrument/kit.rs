//! Built-in drum kit: synthesized fallback sounds for pads without a sample file.
//!
//! Noise sources use a seeded `ChaCha8Rng`, so the same seed always yields
//! the same kit.

use std::f64::consts::TAU;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::sample::SampleData;

/// Sample rate the built-in sounds are rendered at. The graph resamples them
/// to the device rate when they are bound.
pub const KIT_SAMPLE_RATE: u32 = 44100;

/// Seed for the built-in kit's noise generators.
pub const KIT_SEED: u64 = 0x7461_7070;

/// The seven built-in drum sounds, in pad order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrumSound {
    Kick,
    Snare,
    ClosedHat,
    OpenHat,
    Clap,
    Tom,
    Rim,
}

impl DrumSound {
    pub const ALL: [DrumSound; 7] = [
        DrumSound::Kick,
        DrumSound::Snare,
        DrumSound::ClosedHat,
        DrumSound::OpenHat,
        DrumSound::Clap,
        DrumSound::Tom,
        DrumSound::Rim,
    ];

    /// Built-in sound for a pad index, cycling if there are more pads than sounds.
    pub fn for_pad(index: usize) -> DrumSound {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            DrumSound::Kick => "kick",
            DrumSound::Snare => "snare",
            DrumSound::ClosedHat => "hat",
            DrumSound::OpenHat => "open hat",
            DrumSound::Clap => "clap",
            DrumSound::Tom => "tom",
            DrumSound::Rim => "rim",
        }
    }

    /// Render the sound as a mono sample.
    pub fn render(self, sample_rate: u32, seed: u64) -> SampleData {
        let frames = match self {
            DrumSound::Kick => kick(sample_rate),
            DrumSound::Snare => snare(sample_rate, seed),
            DrumSound::ClosedHat => hat(sample_rate, seed.wrapping_add(1), 0.08),
            DrumSound::OpenHat => hat(sample_rate, seed.wrapping_add(2), 0.35),
            DrumSound::Clap => clap(sample_rate, seed.wrapping_add(3)),
            DrumSound::Tom => tom(sample_rate),
            DrumSound::Rim => rim(sample_rate),
        };
        SampleData::from_mono(normalize(frames, KIT_PEAK), sample_rate)
    }
}

/// Peak level every built-in sound is normalized to.
const KIT_PEAK: f32 = 0.9;

fn normalize(mut frames: Vec<f32>, target: f32) -> Vec<f32> {
    let peak = frames.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    if peak > f32::EPSILON {
        let scale = target / peak;
        frames.iter_mut().for_each(|s| *s *= scale);
    }
    frames
}

fn frame_count(sample_rate: u32, secs: f64) -> usize {
    (sample_rate as f64 * secs) as usize
}

/// Sine with a downward pitch sweep. Shared by kick and tom.
fn swept_sine(sample_rate: u32, secs: f64, from_hz: f64, to_hz: f64, sweep: f64, decay: f64) -> Vec<f32> {
    let n = frame_count(sample_rate, secs);
    let mut phase = 0.0_f64;
    (0..n)
        .map(|i| {
            let norm = i as f64 / n as f64;
            let freq = to_hz + (from_hz - to_hz) * (-norm * sweep).exp();
            phase += freq / sample_rate as f64;
            ((phase * TAU).sin() * (-norm * decay).exp()) as f32
        })
        .collect()
}

fn kick(sample_rate: u32) -> Vec<f32> {
    swept_sine(sample_rate, 0.25, 150.0, 50.0, 8.0, 10.0)
}

fn tom(sample_rate: u32) -> Vec<f32> {
    swept_sine(sample_rate, 0.3, 220.0, 110.0, 5.0, 7.0)
}

fn snare(sample_rate: u32, seed: u64) -> Vec<f32> {
    let n = frame_count(sample_rate, 0.2);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut phase = 0.0_f64;
    (0..n)
        .map(|i| {
            let norm = i as f64 / n as f64;
            phase += 180.0 / sample_rate as f64;
            let body = (phase * TAU).sin() * (-norm * 15.0).exp();
            let noise: f64 = rng.gen_range(-1.0..1.0) * (-norm * 12.0).exp();
            (body * 0.5 + noise * 0.5) as f32
        })
        .collect()
}

/// High-passed noise; `secs` sets closed versus open.
fn hat(sample_rate: u32, seed: u64, secs: f64) -> Vec<f32> {
    let n = frame_count(sample_rate, secs);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (mut prev_in, mut prev_out) = (0.0_f64, 0.0_f64);
    (0..n)
        .map(|i| {
            let norm = i as f64 / n as f64;
            let noise: f64 = rng.gen_range(-1.0..1.0);
            let filtered = 0.85 * (prev_out + noise - prev_in);
            prev_in = noise;
            prev_out = filtered;
            (filtered * (-norm * 6.0).exp() * 0.6) as f32
        })
        .collect()
}

fn clap(sample_rate: u32, seed: u64) -> Vec<f32> {
    let n = frame_count(sample_rate, 0.15);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut out = vec![0.0f32; n];

    // three 10ms bursts, then a band-limited tail
    let burst_len = frame_count(sample_rate, 0.01).max(1);
    for offset in [0.0, 0.015, 0.030] {
        let start = frame_count(sample_rate, offset);
        for (j, frame) in out.iter_mut().skip(start).take(burst_len).enumerate() {
            let env = (-(j as f64 / burst_len as f64) * 15.0).exp();
            *frame += (rng.gen_range(-1.0..1.0) * env * 0.7) as f32;
        }
    }

    let tail_start = frame_count(sample_rate, 0.04);
    let coeff = 600.0 / sample_rate as f64;
    let mut state = 0.0_f64;
    for (j, frame) in out.iter_mut().skip(tail_start).enumerate() {
        let t = j as f64 / sample_rate as f64;
        state += (rng.gen_range(-1.0..1.0) - state) * coeff;
        *frame += (state * (-t * 18.0).exp() * 0.5) as f32;
    }
    out
}

fn rim(sample_rate: u32) -> Vec<f32> {
    let n = frame_count(sample_rate, 0.06);
    (0..n)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            let tone = (t * 1700.0 * TAU).sin() * 0.6 + (t * 820.0 * TAU).sin() * 0.4;
            (tone * (-t * 90.0).exp() * 0.8) as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(sample: &SampleData) -> f32 {
        sample.frames().iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn every_sound_is_audible_and_bounded() {
        for sound in DrumSound::ALL {
            let sample = sound.render(KIT_SAMPLE_RATE, KIT_SEED);
            assert!(!sample.is_empty(), "{} is empty", sound.label());
            let p = peak(&sample);
            assert!(p > 0.01, "{} is silent", sound.label());
            assert!(p <= KIT_PEAK + 1e-6, "{} clips: {p}", sound.label());
        }
    }

    #[test]
    fn noise_sounds_are_deterministic_per_seed() {
        let a = DrumSound::Snare.render(KIT_SAMPLE_RATE, 7);
        let b = DrumSound::Snare.render(KIT_SAMPLE_RATE, 7);
        let c = DrumSound::Snare.render(KIT_SAMPLE_RATE, 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn open_hat_rings_longer_than_closed() {
        let closed = DrumSound::ClosedHat.render(KIT_SAMPLE_RATE, KIT_SEED);
        let open = DrumSound::OpenHat.render(KIT_SAMPLE_RATE, KIT_SEED);
        assert!(open.duration_secs() > closed.duration_secs());
    }

    #[test]
    fn kick_starts_at_zero_crossing() {
        let kick = DrumSound::Kick.render(KIT_SAMPLE_RATE, KIT_SEED);
        assert!(kick.frames()[0].abs() < 0.05);
    }

    #[test]
    fn pads_map_to_distinct_sounds() {
        let labels: Vec<_> = (0..7).map(|i| DrumSound::for_pad(i).label()).collect();
        let mut unique = labels.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 7);
        assert_eq!(DrumSound::for_pad(7), DrumSound::Kick);
    }
}
