//! # Voxframe Engine
//!
//! Reference analysis/resynthesis engine for `voxframe-core`.
//!
//! - **Silence**: RMS of the current window against the configured threshold
//! - **Pitch**: YIN on a pre-emphasised window pair ([`YinPitch`])
//! - **Aperiodicity**: harmonic-band energy ratios and the voicing decision ([`HarmonicAperiodicity`])
//! - **Envelope**: cepstrally smoothed power spectrum ([`CepstralEnvelope`])
//! - **Synthesis**: pitch-synchronous overlap-add of mixed-phase pulses ([`PulseSynthesizer`])
//!
//! Each context plans its FFTs and sizes its buffers when it is created;
//! nothing allocates once a session is running.
//!
//! ## Example
//!
//! ```ignore
//! use voxframe_core::{Arc, ModulationChannel, Session, VocoderConfig};
//! use voxframe_engine::ReferenceBackend;
//!
//! let modulation = Arc::new(ModulationChannel::new());
//! let mut session = Session::open(VocoderConfig::default(), ReferenceBackend::new(), modulation)?;
//! session.process(&input, &mut output);
//! ```

pub mod aperiodicity;
pub mod envelope;
pub mod pitch;
pub mod synthesis;

mod spectrum;

pub use aperiodicity::HarmonicAperiodicity;
pub use envelope::CepstralEnvelope;
pub use pitch::YinPitch;
pub use synthesis::PulseSynthesizer;

use voxframe_core::{Result, VocoderBackend, VocoderConfig};

/// Seed for the synthesizer's noise phases unless one is given.
pub const DEFAULT_SEED: u64 = 0x5eed_f0f0;

/// Engine context for the reference analyzers and synthesizer.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceBackend {
    seed: u64,
}

impl ReferenceBackend {
    pub fn new() -> Self {
        Self { seed: DEFAULT_SEED }
    }

    /// Use a specific seed for the aperiodic noise.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for ReferenceBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Root mean square of `window`; 0 for an empty window.
pub fn rms(window: &[f64]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = window.iter().map(|x| x * x).sum();
    (sum_sq / window.len() as f64).sqrt()
}

impl VocoderBackend for ReferenceBackend {
    type Pitch = YinPitch;
    type Aperiodicity = HarmonicAperiodicity;
    type Envelope = CepstralEnvelope;
    type Synthesis = PulseSynthesizer;

    fn name(&self) -> &str {
        "reference"
    }

    fn is_silent(&self, window: &[f64], threshold: f64) -> bool {
        // NaN input counts as silence rather than feeding the analyzers.
        !(rms(window) >= threshold)
    }

    fn create_pitch(&self, config: &VocoderConfig) -> Result<Self::Pitch> {
        Ok(YinPitch::new(config))
    }

    fn create_aperiodicity(&self, config: &VocoderConfig) -> Result<Self::Aperiodicity> {
        Ok(HarmonicAperiodicity::new(config))
    }

    fn create_envelope(&self, config: &VocoderConfig) -> Result<Self::Envelope> {
        Ok(CepstralEnvelope::new(config))
    }

    fn create_synthesis(&self, config: &VocoderConfig) -> Result<Self::Synthesis> {
        tracing::debug!(seed = self.seed, "creating pulse synthesizer");
        Ok(PulseSynthesizer::new(config, self.seed))
    }
}
