//! Pad samples: WAV decoding to mono f32 and rate conversion for the output device.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// Errors raised while loading a sample file.
#[derive(Debug)]
pub enum SampleError {
    /// The file could not be opened.
    Io(std::io::Error),
    /// WAV decoding error.
    Wav(hound::Error),
    /// The file decoded to zero frames.
    Empty,
}

impl std::fmt::Display for SampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleError::Io(e) => write!(f, "cannot open sample: {e}"),
            SampleError::Wav(e) => write!(f, "WAV error: {e}"),
            SampleError::Empty => write!(f, "WAV file contains no samples"),
        }
    }
}

impl std::error::Error for SampleError {}

impl From<hound::Error> for SampleError {
    fn from(e: hound::Error) -> Self {
        SampleError::Wav(e)
    }
}

impl From<std::io::Error> for SampleError {
    fn from(e: std::io::Error) -> Self {
        SampleError::Io(e)
    }
}

/// Mono sample frames at a known sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleData {
    frames: Vec<f32>,
    sample_rate: u32,
}

impl SampleData {
    pub fn from_mono(frames: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            frames,
            sample_rate,
        }
    }

    /// Open and decode a WAV file from disk.
    pub fn from_path(path: &Path) -> Result<Self, SampleError> {
        let file = BufReader::new(File::open(path)?);
        Self::from_wav(file)
    }

    /// Decode a WAV stream, averaging all channels down to mono.
    ///
    /// Integer files of any bit depth are scaled to `[-1.0, 1.0)`; float files
    /// pass through unchanged. The native sample rate is kept; conversion
    /// happens once the output rate is known (see [`resampled`](Self::resampled)).
    pub fn from_wav<R: Read + Seek>(reader: R) -> Result<Self, SampleError> {
        let wav = hound::WavReader::new(reader)?;
        let spec = wav.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let scale = (1u64 << (spec.bits_per_sample - 1)) as f32;
                wav.into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()?
            }
            hound::SampleFormat::Float => wav.into_samples::<f32>().collect::<Result<_, _>>()?,
        };

        let frames: Vec<f32> = interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();

        if frames.is_empty() {
            return Err(SampleError::Empty);
        }

        Ok(Self {
            frames,
            sample_rate: spec.sample_rate,
        })
    }

    /// A copy of this sample converted to `target_rate` by linear interpolation.
    pub fn resampled(&self, target_rate: u32) -> Self {
        if target_rate == self.sample_rate || target_rate == 0 {
            return self.clone();
        }
        Self {
            frames: resample_linear(&self.frames, self.sample_rate, target_rate),
            sample_rate: target_rate,
        }
    }

    pub fn frames(&self) -> &[f32] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Length in seconds at normal speed.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames.len() as f64 / self.sample_rate as f64
    }
}

fn resample_linear(input: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if input.len() < 2 {
        return input.to_vec();
    }

    let step = source_rate as f64 / target_rate as f64;
    let out_len = (input.len() as f64 / step).ceil() as usize;
    let last = input.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = pos as usize;
            if idx >= last {
                return input[last];
            }
            let frac = (pos - idx as f64) as f32;
            input[idx] + (input[idx + 1] - input[idx]) * frac
        })
        .collect()
}
