//! Test doubles for voxframe-core integration tests.
//!
//! [`RecordingBackend`] implements every engine trait and appends each call,
//! creation and drop to a shared log so tests can check ordering and the
//! arguments the pipeline derives.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use voxframe_core::*;

/// Small configuration: 8 kHz, 1 ms period (8 samples), 256-point frames.
pub fn small_config() -> VocoderConfig {
    VocoderConfig::default()
        .with_sample_rate(8000.0)
        .with_frame_period_ms(1.0)
        .with_fft_size(256)
        .with_pitch_range(71.0, 800.0)
        .with_silence_threshold(1e-3)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Created(&'static str),
    Dropped(&'static str),
    Silence { len: usize },
    Pitch { current: Vec<f64>, delayed: Vec<f64> },
    Aperiodicity { pitch: f64, is_silent: bool },
    Envelope { pitch: f64, is_voiced: bool, is_silent: bool },
    Prime { pitch: f64, is_voiced: bool, is_silent: bool, ap: f64, sp: f64 },
}

impl Event {
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Event::Silence { .. } => Some(Stage::SilenceDetect),
            Event::Pitch { .. } => Some(Stage::PitchEstimate),
            Event::Aperiodicity { .. } => Some(Stage::AperiodicityAnalyze),
            Event::Envelope { .. } => Some(Stage::EnvelopeAnalyze),
            Event::Prime { .. } => Some(Stage::SynthesisPrime),
            _ => None,
        }
    }
}

pub type Log = Arc<Mutex<Vec<Event>>>;

fn record(log: &Log, event: Event) {
    log.lock().unwrap().push(event);
}

/// Recording engine double.
pub struct RecordingBackend {
    pub log: Log,
    /// Pitch every estimate returns.
    pub pitch: f64,
    /// Constructor that fails, by context name.
    pub fail_on: Option<&'static str>,
    /// Output of every synthesized sample; `None` echoes the last primed envelope.
    pub synth_value: Option<f64>,
}

impl RecordingBackend {
    pub fn new() -> (Self, Log) {
        let log = Log::default();
        (
            Self {
                log: log.clone(),
                pitch: 200.0,
                fail_on: None,
                synth_value: None,
            },
            log,
        )
    }

    fn create(&self, name: &'static str) -> Result<Context> {
        if self.fail_on == Some(name) {
            return Err(Error::Engine(format!("{name} unavailable")));
        }
        record(&self.log, Event::Created(name));
        Ok(Context {
            name,
            log: self.log.clone(),
            pitch: self.pitch,
            synth_value: self.synth_value,
            last_envelope: 0.0,
        })
    }
}

impl Drop for RecordingBackend {
    fn drop(&mut self) {
        record(&self.log, Event::Dropped("backend"));
    }
}

/// One recording context; plays every per-purpose role.
pub struct Context {
    name: &'static str,
    log: Log,
    pitch: f64,
    synth_value: Option<f64>,
    last_envelope: f64,
}

impl Drop for Context {
    fn drop(&mut self) {
        record(&self.log, Event::Dropped(self.name));
    }
}

impl PitchAnalyzer for Context {
    fn estimate(&mut self, current: &[f64], delayed: &[f64]) -> f64 {
        record(
            &self.log,
            Event::Pitch {
                current: current.to_vec(),
                delayed: delayed.to_vec(),
            },
        );
        self.pitch
    }
}

impl AperiodicityAnalyzer for Context {
    fn analyze(&mut self, _window: &[f64], pitch: f64, is_silent: bool, ap: &mut [f64]) -> bool {
        record(&self.log, Event::Aperiodicity { pitch, is_silent });
        ap.fill(0.25);
        pitch > 0.0 && !is_silent
    }
}

impl EnvelopeAnalyzer for Context {
    fn analyze(
        &mut self,
        window: &[f64],
        pitch: f64,
        is_voiced: bool,
        is_silent: bool,
        sp: &mut [f64],
    ) {
        record(
            &self.log,
            Event::Envelope {
                pitch,
                is_voiced,
                is_silent,
            },
        );
        sp.fill(window.last().copied().unwrap_or(0.0));
    }
}

impl Synthesizer for Context {
    fn prime(&mut self, frame: SynthesisFrame<'_>) {
        record(
            &self.log,
            Event::Prime {
                pitch: frame.pitch,
                is_voiced: frame.is_voiced,
                is_silent: frame.is_silent,
                ap: frame.aperiodicity[0],
                sp: frame.envelope[0],
            },
        );
        self.last_envelope = frame.envelope[0];
    }

    fn next_sample(&mut self) -> f64 {
        self.synth_value.unwrap_or(self.last_envelope)
    }
}

impl VocoderBackend for RecordingBackend {
    type Pitch = Context;
    type Aperiodicity = Context;
    type Envelope = Context;
    type Synthesis = Context;

    fn name(&self) -> &str {
        "recording"
    }

    fn is_silent(&self, window: &[f64], threshold: f64) -> bool {
        record(&self.log, Event::Silence { len: window.len() });
        let energy = window.iter().map(|x| x * x).sum::<f64>() / window.len() as f64;
        energy.sqrt() < threshold
    }

    fn create_pitch(&self, _config: &VocoderConfig) -> Result<Context> {
        self.create("pitch")
    }

    fn create_aperiodicity(&self, _config: &VocoderConfig) -> Result<Context> {
        self.create("aperiodicity")
    }

    fn create_envelope(&self, _config: &VocoderConfig) -> Result<Context> {
        self.create("envelope")
    }

    fn create_synthesis(&self, _config: &VocoderConfig) -> Result<Context> {
        self.create("synthesis")
    }
}

/// Stage events only, in call order.
pub fn stage_events(log: &Log) -> Vec<Event> {
    log.lock()
        .unwrap()
        .iter()
        .filter(|e| e.stage().is_some())
        .cloned()
        .collect()
}

/// Drop events only, in drop order.
pub fn dropped(log: &Log) -> Vec<&'static str> {
    log.lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            Event::Dropped(name) => Some(*name),
            _ => None,
        })
        .collect()
}

/// Ramp `1, 2, 3, ...` scaled to stay well above the silence threshold.
pub fn ramp(len: usize) -> Vec<f64> {
    (1..=len).map(|i| i as f64 * 0.01).collect()
}
