//! Spectrum analyser: windowed FFT over the most recent output samples.
//!
//! Produces one byte per frequency bin the same way a browser analyser node
//! does: Blackman window, magnitude normalized by FFT size, exponential
//! smoothing over time, then a dB scale mapped linearly onto `0..=255`.

use std::f32::consts::TAU;
use std::sync::Arc;

use realfft::num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use tracing::debug;

/// FFT window length in samples.
pub const FFT_SIZE: usize = 2048;
/// Number of frequency bins exposed, `FFT_SIZE / 2`.
pub const BIN_COUNT: usize = FFT_SIZE / 2;
/// Weight of the previous frame in the time smoothing.
pub const SMOOTHING: f32 = 0.8;
/// Level mapped to byte 0.
pub const MIN_DB: f32 = -100.0;
/// Level mapped to byte 255.
pub const MAX_DB: f32 = -30.0;

/// Analyser state. Fed with mono samples, read as byte frequency data.
pub struct Analyser {
    fft: Arc<dyn RealToComplex<f32>>,
    window: Vec<f32>,
    history: Vec<f32>,
    write_pos: usize,
    frame: Vec<f32>,
    spectrum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    bytes: Vec<u8>,
}

impl Analyser {
    pub fn new() -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);
        let spectrum = fft.make_output_vec();
        let scratch = fft.make_scratch_vec();
        Self {
            fft,
            window: blackman(FFT_SIZE),
            history: vec![0.0; FFT_SIZE],
            write_pos: 0,
            frame: vec![0.0; FFT_SIZE],
            spectrum,
            scratch,
            smoothed: vec![0.0; BIN_COUNT],
            bytes: vec![0; BIN_COUNT],
        }
    }

    /// Append samples to the analysis window. Only the newest
    /// [`FFT_SIZE`] samples are kept.
    pub fn push_samples(&mut self, samples: &[f32]) {
        let skip = samples.len().saturating_sub(FFT_SIZE);
        for &s in &samples[skip..] {
            self.history[self.write_pos] = s;
            self.write_pos = (self.write_pos + 1) % FFT_SIZE;
        }
    }

    /// Run one analysis frame over the current window and return the bytes.
    pub fn update(&mut self) -> &[u8] {
        for (i, out) in self.frame.iter_mut().enumerate() {
            *out = self.history[(self.write_pos + i) % FFT_SIZE] * self.window[i];
        }

        if let Err(e) =
            self.fft
                .process_with_scratch(&mut self.frame, &mut self.spectrum, &mut self.scratch)
        {
            debug!(error = %e, "analyser frame skipped");
            return &self.bytes;
        }

        let scale = 1.0 / FFT_SIZE as f32;
        let span = MAX_DB - MIN_DB;
        for ((bin, smoothed), byte) in self
            .spectrum
            .iter()
            .zip(self.smoothed.iter_mut())
            .zip(self.bytes.iter_mut())
        {
            let magnitude = bin.norm() * scale;
            let mut next = SMOOTHING * *smoothed + (1.0 - SMOOTHING) * magnitude;
            if !next.is_finite() {
                next = 0.0;
            }
            *smoothed = next;

            let db = if next > 0.0 {
                20.0 * next.log10()
            } else {
                f32::NEG_INFINITY
            };
            *byte = ((db - MIN_DB) / span * 255.0).clamp(0.0, 255.0) as u8;
        }

        &self.bytes
    }

    /// Bytes from the most recent [`update`](Analyser::update).
    pub fn byte_frequency_data(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Analyser {
    fn default() -> Self {
        Self::new()
    }
}

fn blackman(len: usize) -> Vec<f32> {
    let (a0, a1, a2) = (0.42, 0.5, 0.08);
    (0..len)
        .map(|i| {
            let x = i as f32 / len as f32;
            a0 - a1 * (TAU * x).cos() + a2 * (2.0 * TAU * x).cos()
        })
        .collect()
}
