//! Builder for configuring and constructing a `Vocoder`.

use crate::core::{Arc, ModulationChannel, RunFlag, VocoderConfig};
use crate::engine::ReferenceBackend;
use crate::io::DEFAULT_BUFFER_SIZE;
use crate::{Result, Vocoder};

/// Starts from [`VocoderConfig::default`] (or a loaded config) and applies
/// overrides on top. The config is validated in [`build`](Self::build), so
/// a bad combination is reported before any stream or file is touched.
///
/// # Example
///
/// ```ignore
/// use voxframe::prelude::*;
///
/// let vocoder = Vocoder::builder()
///     .fft_size(1024)
///     .pitch_ceiling(600.0)
///     .build()?;
///
/// vocoder.process_file("in.wav", "out.wav")?;
/// ```
pub struct VocoderBuilder {
    config: VocoderConfig,
    buffer_size: usize,
    seed: Option<u64>,
}

impl Default for VocoderBuilder {
    fn default() -> Self {
        Self::from_config(VocoderConfig::default())
    }
}

impl VocoderBuilder {
    pub fn from_config(config: VocoderConfig) -> Self {
        Self {
            config,
            buffer_size: DEFAULT_BUFFER_SIZE,
            seed: None,
        }
    }

    /// Ignored by file processing, which uses the file's rate.
    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    /// Default: 5 ms
    pub fn frame_period_ms(mut self, period_ms: f64) -> Self {
        self.config.frame_period_ms = period_ms;
        self
    }

    /// Default: 2048
    pub fn fft_size(mut self, fft_size: usize) -> Self {
        self.config.fft_size = fft_size;
        self
    }

    /// Default: 71 Hz
    pub fn pitch_floor(mut self, hz: f64) -> Self {
        self.config.pitch_floor = hz;
        self
    }

    /// Default: 800 Hz
    pub fn pitch_ceiling(mut self, hz: f64) -> Self {
        self.config.pitch_ceiling = hz;
        self
    }

    pub fn silence_threshold(mut self, threshold: f64) -> Self {
        self.config.silence_threshold = threshold;
        self
    }

    /// Samples per `process` call in file mode; ring headroom in live mode.
    /// Default: 4096
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Seed for the synthesizer's noise phases.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &VocoderConfig {
        &self.config
    }

    pub fn build(self) -> Result<Vocoder> {
        self.config.validate()?;
        if self.buffer_size == 0 {
            return Err(crate::core::Error::InvalidConfig(
                "Buffer size must be at least 1".to_string(),
            )
            .into());
        }

        let backend = self
            .seed
            .map_or_else(ReferenceBackend::new, ReferenceBackend::with_seed);

        Ok(Vocoder::from_parts(
            self.config,
            self.buffer_size,
            backend,
            Arc::new(ModulationChannel::new()),
            RunFlag::new(),
        ))
    }
}
