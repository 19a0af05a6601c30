//! Metronome click: a short square-wave burst with an exponential decay.

/// Click pitch in Hz.
pub const CLICK_FREQ: f64 = 1000.0;
/// Time for the envelope to fall from full level to [`CLICK_FLOOR`].
pub const CLICK_DECAY_SECS: f64 = 0.05;
/// Envelope level at the end of the decay.
pub const CLICK_FLOOR: f64 = 0.001;
/// Peak amplitude before the gain stage.
const CLICK_LEVEL: f64 = 0.5;

/// Render one click at `sample_rate`.
pub fn click_tone(sample_rate: u32) -> Vec<f32> {
    let sr = sample_rate.max(1) as f64;
    let n = (sr * CLICK_DECAY_SECS).ceil() as usize;
    (0..n)
        .map(|i| {
            let t = i as f64 / sr;
            let phase = (t * CLICK_FREQ).fract();
            let square = if phase < 0.5 { 1.0 } else { -1.0 };
            let env = CLICK_FLOOR.powf(t / CLICK_DECAY_SECS);
            (square * env * CLICK_LEVEL) as f32
        })
        .collect()
}
