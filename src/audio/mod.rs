//! Audio graph: one cpal output stream, a lock-free command queue in, and a
//! lock-free sample tap out for the analyser.
//!
//! The UI thread sends [`AudioCommand`]s through [`AudioSink`]; the audio
//! thread drains them in its callback, mixes the pad voices and the metronome
//! click through the shared [`GainStage`], and pushes the post-gain signal back
//! for spectrum analysis.

pub mod analyser;
pub mod callback;
pub mod click;
pub mod command;
pub mod context;
pub mod gain;
pub mod voice;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::{
    traits::{Consumer, Producer, Split},
    HeapRb,
};
use tracing::{error, info};

pub use analyser::Analyser;
pub use command::AudioCommand;
pub use context::{AudioContext, GraphState, SinkFactory};
pub use gain::GainStage;
pub use voice::Voice;

use callback::AudioCallback;

/// Command ring buffer capacity (number of commands).
const RING_BUFFER_CAPACITY: usize = 1024;

/// Analysis tap capacity in samples. Covers several UI frames of output.
const ANALYSIS_CAPACITY: usize = 16384;

/// Audio errors.
#[derive(Debug)]
pub enum AudioError {
    /// No audio output device found.
    NoOutputDevice,
    /// Failed to query device configuration.
    DeviceConfig(String),
    /// Failed to build the audio stream.
    StreamBuild(String),
    /// Failed to start the audio stream.
    StreamPlay(String),
    /// Ring buffer is full; the audio thread is not draining fast enough.
    BufferFull,
    /// The graph has not been created, or creating it failed.
    Unavailable,
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::NoOutputDevice => write!(f, "no audio output device found"),
            AudioError::DeviceConfig(e) => write!(f, "device config error: {e}"),
            AudioError::StreamBuild(e) => write!(f, "stream build error: {e}"),
            AudioError::StreamPlay(e) => write!(f, "stream play error: {e}"),
            AudioError::BufferFull => write!(f, "audio command ring buffer is full"),
            AudioError::Unavailable => write!(f, "audio output is not available"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Where the instrument sends its audio commands.
///
/// [`AudioGraph`] is the real device; tests substitute recording sinks.
pub trait AudioSink {
    /// Queue one command for the audio thread.
    fn send(&mut self, cmd: AudioCommand) -> Result<(), AudioError>;

    /// Output sample rate. Samples are resampled to this before binding.
    fn sample_rate(&self) -> u32;

    /// Move any tapped output samples into `out`.
    fn drain_analysis(&mut self, out: &mut Vec<f32>);

    /// Human-readable output name for the status bar.
    fn name(&self) -> &str {
        "audio output"
    }
}

/// The live audio graph. Owns the cpal stream and both ring buffer ends the
/// UI thread uses.
pub struct AudioGraph {
    _stream: cpal::Stream,
    producer: ringbuf::HeapProd<AudioCommand>,
    analysis: ringbuf::HeapCons<f32>,
    sample_rate: u32,
    channels: u16,
    device_name: String,
}

impl AudioGraph {
    /// Open and start the default output device at its default config.
    pub fn open() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels();

        Self::build_with_device(&device, sample_rate, channels)
    }

    fn build_with_device(
        device: &cpal::Device,
        sample_rate: u32,
        channels: u16,
    ) -> Result<Self, AudioError> {
        let (producer, commands) = HeapRb::<AudioCommand>::new(RING_BUFFER_CAPACITY).split();
        let (tap, analysis) = HeapRb::<f32>::new(ANALYSIS_CAPACITY).split();

        let mut audio_callback = AudioCallback::new(commands, tap, channels, sample_rate);

        let stream_config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let err_fn = |err: cpal::StreamError| {
            error!("audio stream error: {err}");
        };

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    audio_callback.process(data);
                },
                err_fn,
                None,
            )
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))?;

        let device_name = device.name().unwrap_or_else(|_| "audio output".into());
        info!(device = %device_name, sample_rate, channels, "audio graph started");

        Ok(Self {
            _stream: stream,
            producer,
            analysis,
            sample_rate,
            channels,
            device_name,
        })
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

impl AudioSink for AudioGraph {
    fn send(&mut self, cmd: AudioCommand) -> Result<(), AudioError> {
        self.producer
            .try_push(cmd)
            .map_err(|_| AudioError::BufferFull)
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn drain_analysis(&mut self, out: &mut Vec<f32>) {
        let mut chunk = [0.0f32; 1024];
        loop {
            let n = self.analysis.pop_slice(&mut chunk);
            if n == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n]);
        }
    }

    fn name(&self) -> &str {
        &self.device_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires audio device; run manually with `cargo test -- --ignored`
    fn test_audio_graph_creation() {
        let graph = AudioGraph::open();
        assert!(graph.is_ok(), "AudioGraph::open() failed: {:?}", graph.err());
        let graph = graph.unwrap();
        assert!(graph.sample_rate() > 0);
        assert!(graph.channels() > 0);
    }

    #[test]
    #[ignore] // Requires audio device
    fn test_send_commands() {
        let mut graph = AudioGraph::open().expect("no audio device");
        assert!(graph.send(AudioCommand::SetGain(0.5)).is_ok());
        assert!(graph.send(AudioCommand::Click).is_ok());
    }

    #[test]
    fn test_audio_error_display() {
        assert_eq!(
            AudioError::NoOutputDevice.to_string(),
            "no audio output device found"
        );
        assert_eq!(
            AudioError::BufferFull.to_string(),
            "audio command ring buffer is full"
        );
        assert_eq!(
            AudioError::DeviceConfig("test".to_string()).to_string(),
            "device config error: test"
        );
        assert_eq!(
            AudioError::Unavailable.to_string(),
            "audio output is not available"
        );
    }
}
