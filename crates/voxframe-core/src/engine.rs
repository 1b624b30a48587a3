//! Capability interface of the analysis/synthesis engine.
//!
//! A [`VocoderBackend`] is the shared engine context. It answers silence
//! queries itself and creates the four per-purpose contexts a session owns.
//! Every method below except the `create_*` constructors runs on the audio
//! thread and must not block or allocate.

use crate::config::VocoderConfig;
use crate::Result;

/// Fundamental frequency estimator.
pub trait PitchAnalyzer: Send {
    /// Estimate pitch in Hz from two windows one sample apart. `0.0` means
    /// undetermined (unvoiced or silent).
    fn estimate(&mut self, current: &[f64], delayed: &[f64]) -> f64;
}

/// Band aperiodicity estimator and voicing decision.
pub trait AperiodicityAnalyzer: Send {
    /// Fill `aperiodicity` (`num_bins` values) and return whether the frame is voiced.
    fn analyze(
        &mut self,
        window: &[f64],
        pitch: f64,
        is_silent: bool,
        aperiodicity: &mut [f64],
    ) -> bool;
}

/// Spectral envelope estimator.
pub trait EnvelopeAnalyzer: Send {
    /// Fill `envelope` (`num_bins` values).
    fn analyze(
        &mut self,
        window: &[f64],
        pitch: f64,
        is_voiced: bool,
        is_silent: bool,
        envelope: &mut [f64],
    );
}

/// Parameters of one resynthesis frame.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisFrame<'a> {
    pub pitch: f64,
    pub is_voiced: bool,
    pub is_silent: bool,
    pub aperiodicity: &'a [f64],
    pub envelope: &'a [f64],
}

/// Sample-rate resynthesis driven by sparse frame updates.
pub trait Synthesizer: Send {
    /// Set up internal state for the samples that follow.
    fn prime(&mut self, frame: SynthesisFrame<'_>);

    /// Produce the next output sample.
    fn next_sample(&mut self) -> f64;
}

/// Shared engine context and factory for the per-purpose contexts.
pub trait VocoderBackend: Send {
    type Pitch: PitchAnalyzer;
    type Aperiodicity: AperiodicityAnalyzer;
    type Envelope: EnvelopeAnalyzer;
    type Synthesis: Synthesizer;

    /// Engine name for logs.
    fn name(&self) -> &str;

    fn is_silent(&self, window: &[f64], threshold: f64) -> bool;

    fn create_pitch(&self, config: &VocoderConfig) -> Result<Self::Pitch>;

    fn create_aperiodicity(&self, config: &VocoderConfig) -> Result<Self::Aperiodicity>;

    fn create_envelope(&self, config: &VocoderConfig) -> Result<Self::Envelope>;

    fn create_synthesis(&self, config: &VocoderConfig) -> Result<Self::Synthesis>;
}
