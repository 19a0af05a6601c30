//! Lazy audio context: creates the graph on first use and binds each pad's
//! sample at most once per graph.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::{Analyser, AudioCommand, AudioError, AudioGraph, AudioSink};
use crate::instrument::SampleData;

/// Builds a sink. Called at most once per [`AudioContext::reset`] cycle.
pub type SinkFactory = Box<dyn FnMut() -> Result<Box<dyn AudioSink>, AudioError>>;

/// Lifecycle of the shared graph.
pub enum GraphState {
    /// Never requested.
    Uninitialized,
    /// Live graph.
    Ready(Box<dyn AudioSink>),
    /// Creation failed. Stays failed until [`AudioContext::reset`].
    Failed(String),
}

impl fmt::Debug for GraphState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphState::Uninitialized => write!(f, "Uninitialized"),
            GraphState::Ready(sink) => write!(f, "Ready({})", sink.name()),
            GraphState::Failed(e) => write!(f, "Failed({e})"),
        }
    }
}

/// Owns the graph, the analyser and the record of which pads are bound.
pub struct AudioContext {
    factory: SinkFactory,
    state: GraphState,
    analyser: Option<Analyser>,
    bound: HashSet<usize>,
    /// Per pad: the source sample and its copy at the output rate. Survives
    /// [`AudioContext::reset`] so a reconnect to the same device is free.
    resampled: HashMap<usize, (Arc<SampleData>, Arc<SampleData>)>,
    builds: usize,
    tap: Vec<f32>,
}

impl AudioContext {
    pub fn new(factory: SinkFactory) -> Self {
        Self {
            factory,
            state: GraphState::Uninitialized,
            analyser: None,
            bound: HashSet::new(),
            resampled: HashMap::new(),
            builds: 0,
            tap: Vec::new(),
        }
    }

    /// Context backed by the default output device.
    pub fn with_default_device() -> Self {
        Self::new(Box::new(|| {
            AudioGraph::open().map(|graph| Box::new(graph) as Box<dyn AudioSink>)
        }))
    }

    /// Create the graph if it has never been requested. Returns whether a
    /// graph is live afterwards. A failed attempt is not retried.
    pub fn ensure(&mut self) -> bool {
        if matches!(self.state, GraphState::Uninitialized) {
            self.builds += 1;
            self.state = match (self.factory)() {
                Ok(sink) => {
                    info!(output = sink.name(), "audio context ready");
                    self.analyser = Some(Analyser::new());
                    GraphState::Ready(sink)
                }
                Err(e) => {
                    warn!("audio unavailable: {e}");
                    GraphState::Failed(e.to_string())
                }
            };
        }
        self.is_ready()
    }

    pub fn state(&self) -> &GraphState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, GraphState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, GraphState::Failed(_))
    }

    /// How many times the factory has been called.
    pub fn builds(&self) -> usize {
        self.builds
    }

    /// Output name when ready.
    pub fn output_name(&self) -> Option<&str> {
        match &self.state {
            GraphState::Ready(sink) => Some(sink.name()),
            _ => None,
        }
    }

    pub fn is_bound(&self, pad: usize) -> bool {
        self.bound.contains(&pad)
    }

    /// Attach `sample` to `pad`'s voice. Returns `Ok(false)` when the pad was
    /// already bound to this graph, leaving the first binding in place.
    pub fn bind(&mut self, pad: usize, sample: &Arc<SampleData>) -> Result<bool, AudioError> {
        let GraphState::Ready(sink) = &mut self.state else {
            return Err(AudioError::Unavailable);
        };
        if self.bound.contains(&pad) {
            return Ok(false);
        }

        let rate = sink.sample_rate();
        let sample = if sample.sample_rate() == rate {
            Arc::clone(sample)
        } else {
            let cached = self
                .resampled
                .get(&pad)
                .filter(|(source, converted)| {
                    Arc::ptr_eq(source, sample) && converted.sample_rate() == rate
                })
                .map(|(_, converted)| Arc::clone(converted));
            match cached {
                Some(converted) => converted,
                None => {
                    let started = Instant::now();
                    let converted = Arc::new(sample.resampled(rate));
                    info!(
                        pad,
                        from = sample.sample_rate(),
                        to = rate,
                        frames = converted.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "resampled pad sample"
                    );
                    self.resampled
                        .insert(pad, (Arc::clone(sample), Arc::clone(&converted)));
                    converted
                }
            }
        };
        sink.send(AudioCommand::Bind { pad, sample })?;
        self.bound.insert(pad);
        debug!(pad, sample_rate = rate, "pad bound");
        Ok(true)
    }

    pub fn send(&mut self, cmd: AudioCommand) -> Result<(), AudioError> {
        match &mut self.state {
            GraphState::Ready(sink) => sink.send(cmd),
            _ => Err(AudioError::Unavailable),
        }
    }

    /// Feed any tapped output into the analyser and refresh its bytes.
    pub fn pump_analysis(&mut self) {
        let (GraphState::Ready(sink), Some(analyser)) = (&mut self.state, &mut self.analyser)
        else {
            return;
        };
        self.tap.clear();
        sink.drain_analysis(&mut self.tap);
        analyser.push_samples(&self.tap);
        analyser.update();
    }

    /// Latest byte frequency data, or `None` before the graph exists.
    pub fn analysis(&self) -> Option<&[u8]> {
        self.analyser.as_ref().map(Analyser::byte_frequency_data)
    }

    /// Drop the graph and forget every binding. The next [`ensure`]
    /// builds a fresh graph.
    ///
    /// [`ensure`]: AudioContext::ensure
    pub fn reset(&mut self) {
        self.state = GraphState::Uninitialized;
        self.analyser = None;
        self.bound.clear();
        info!("audio context reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        sent: Vec<AudioCommand>,
    }

    struct Recorder {
        log: Rc<RefCell<Log>>,
        rate: u32,
        pending: Vec<f32>,
    }

    impl AudioSink for Recorder {
        fn send(&mut self, cmd: AudioCommand) -> Result<(), AudioError> {
            self.log.borrow_mut().sent.push(cmd);
            Ok(())
        }

        fn sample_rate(&self) -> u32 {
            self.rate
        }

        fn drain_analysis(&mut self, out: &mut Vec<f32>) {
            out.append(&mut self.pending);
        }
    }

    fn recording(rate: u32) -> (AudioContext, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let shared = Rc::clone(&log);
        let ctx = AudioContext::new(Box::new(move || {
            Ok(Box::new(Recorder {
                log: Rc::clone(&shared),
                rate,
                pending: vec![0.5; 4096],
            }) as Box<dyn AudioSink>)
        }));
        (ctx, log)
    }

    fn failing() -> AudioContext {
        AudioContext::new(Box::new(|| Err(AudioError::NoOutputDevice)))
    }

    fn sample(rate: u32) -> Arc<SampleData> {
        Arc::new(SampleData::from_mono(vec![0.5; 100], rate))
    }

    #[test]
    fn nothing_is_built_until_asked() {
        let (ctx, _) = recording(44100);
        assert_eq!(ctx.builds(), 0);
        assert!(!ctx.is_ready());
        assert!(ctx.analysis().is_none());
    }

    #[test]
    fn ensure_builds_once() {
        let (mut ctx, _) = recording(44100);
        assert!(ctx.ensure());
        assert!(ctx.ensure());
        assert!(ctx.ensure());
        assert_eq!(ctx.builds(), 1);
        assert!(ctx.analysis().is_some());
    }

    #[test]
    fn failure_is_latched() {
        let mut ctx = failing();
        assert!(!ctx.ensure());
        assert!(!ctx.ensure());
        assert_eq!(ctx.builds(), 1);
        assert!(ctx.is_failed());
        assert!(matches!(ctx.send(AudioCommand::Click), Err(AudioError::Unavailable)));
    }

    #[test]
    fn bind_is_idempotent() {
        let (mut ctx, log) = recording(44100);
        ctx.ensure();
        let s = sample(44100);
        assert!(ctx.bind(2, &s).unwrap());
        assert!(!ctx.bind(2, &s).unwrap());
        assert!(ctx.is_bound(2));

        let binds = log
            .borrow()
            .sent
            .iter()
            .filter(|c| matches!(c, AudioCommand::Bind { pad: 2, .. }))
            .count();
        assert_eq!(binds, 1);
    }

    #[test]
    fn bind_resamples_to_the_output_rate() {
        let (mut ctx, log) = recording(48000);
        ctx.ensure();
        ctx.bind(0, &sample(24000)).unwrap();
        match &log.borrow().sent[0] {
            AudioCommand::Bind { sample, .. } => {
                assert_eq!(sample.sample_rate(), 48000);
                assert_eq!(sample.len(), 200);
            }
            other => panic!("expected Bind, got {other:?}"),
        };
    }

    #[test]
    fn resampled_copy_is_reused_after_reset() {
        let (mut ctx, log) = recording(48000);
        let s = sample(24000);
        ctx.ensure();
        ctx.bind(0, &s).unwrap();
        ctx.reset();
        ctx.ensure();
        ctx.bind(0, &s).unwrap();

        let log = log.borrow();
        let bound: Vec<&Arc<SampleData>> = log
            .sent
            .iter()
            .filter_map(|c| match c {
                AudioCommand::Bind { sample, .. } => Some(sample),
                _ => None,
            })
            .collect();
        assert_eq!(bound.len(), 2);
        assert!(Arc::ptr_eq(bound[0], bound[1]));
    }

    #[test]
    fn a_different_source_is_resampled_again() {
        let (mut ctx, log) = recording(48000);
        ctx.ensure();
        ctx.bind(0, &sample(24000)).unwrap();
        ctx.reset();
        ctx.ensure();
        ctx.bind(0, &Arc::new(SampleData::from_mono(vec![0.1; 50], 24000)))
            .unwrap();

        match &log.borrow().sent.last() {
            Some(AudioCommand::Bind { sample, .. }) => assert_eq!(sample.len(), 100),
            other => panic!("expected Bind, got {other:?}"),
        };
    }

    #[test]
    fn bind_without_graph_fails() {
        let mut ctx = failing();
        ctx.ensure();
        assert!(matches!(
            ctx.bind(0, &sample(44100)),
            Err(AudioError::Unavailable)
        ));
    }

    #[test]
    fn reset_allows_a_fresh_graph() {
        let (mut ctx, _) = recording(44100);
        ctx.ensure();
        ctx.bind(1, &sample(44100)).unwrap();
        ctx.reset();
        assert!(!ctx.is_ready());
        assert!(!ctx.is_bound(1));

        assert!(ctx.ensure());
        assert_eq!(ctx.builds(), 2);
        assert!(ctx.bind(1, &sample(44100)).unwrap());
    }

    #[test]
    fn pump_feeds_the_analyser() {
        let (mut ctx, _) = recording(44100);
        ctx.pump_analysis();
        assert!(ctx.analysis().is_none());

        ctx.ensure();
        ctx.pump_analysis();
        let bytes = ctx.analysis().unwrap();
        assert_eq!(bytes.len(), 1024);
        // A constant 0.5 lands in the DC bin.
        assert!(bytes[0] > 0);
    }
}
