//! Vocoder session configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration constants consumed at session open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocoderConfig {
    /// Stream sample rate in Hz.
    pub sample_rate: f64,
    /// Analysis period in milliseconds.
    pub frame_period_ms: f64,
    /// FFT size in samples. The frame delay line holds `fft_size + 1` samples.
    pub fft_size: usize,
    /// Lowest pitch the estimator searches for (Hz).
    pub pitch_floor: f64,
    /// Highest pitch the estimator searches for (Hz).
    pub pitch_ceiling: f64,
    /// Silence threshold in engine units (linear RMS for the reference engine).
    pub silence_threshold: f64,
}

impl Default for VocoderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            frame_period_ms: 5.0,
            fft_size: 2048,
            pitch_floor: 71.0,
            pitch_ceiling: 800.0,
            silence_threshold: 1.0e-3,
        }
    }
}

impl VocoderConfig {
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_frame_period_ms(mut self, period_ms: f64) -> Self {
        self.frame_period_ms = period_ms;
        self
    }

    pub fn with_fft_size(mut self, fft_size: usize) -> Self {
        self.fft_size = fft_size;
        self
    }

    pub fn with_pitch_range(mut self, floor: f64, ceiling: f64) -> Self {
        self.pitch_floor = floor;
        self.pitch_ceiling = ceiling;
        self
    }

    pub fn with_silence_threshold(mut self, threshold: f64) -> Self {
        self.silence_threshold = threshold;
        self
    }

    /// Frame period in samples: `round(period_ms * sample_rate / 1000)`.
    #[inline]
    pub fn period_samples(&self) -> usize {
        (self.frame_period_ms * self.sample_rate / 1000.0).round() as usize
    }

    /// Number of spectral bins (`fft_size / 2 + 1`).
    #[inline]
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Delay line length (`fft_size + 1`).
    #[inline]
    pub fn frame_len(&self) -> usize {
        self.fft_size + 1
    }

    pub fn validate(&self) -> Result<()> {
        if !(8000.0..=384000.0).contains(&self.sample_rate) {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range (8000-384000 Hz)",
                self.sample_rate
            )));
        }
        if !self.frame_period_ms.is_finite() || self.frame_period_ms <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "frame_period_ms {} must be positive",
                self.frame_period_ms
            )));
        }
        if self.period_samples() == 0 {
            return Err(Error::InvalidConfig(format!(
                "frame_period_ms {} is shorter than one sample at {} Hz",
                self.frame_period_ms, self.sample_rate
            )));
        }
        if self.fft_size < 64 || !self.fft_size.is_power_of_two() {
            return Err(Error::InvalidConfig(format!(
                "fft_size {} must be a power of two >= 64",
                self.fft_size
            )));
        }
        let nyquist = self.sample_rate / 2.0;
        if !(self.pitch_floor > 0.0
            && self.pitch_floor < self.pitch_ceiling
            && self.pitch_ceiling < nyquist)
        {
            return Err(Error::InvalidConfig(format!(
                "pitch range {}-{} Hz must satisfy 0 < floor < ceiling < {} Hz",
                self.pitch_floor, self.pitch_ceiling, nyquist
            )));
        }
        let longest_period = (self.sample_rate / self.pitch_floor).ceil() as usize;
        if self.fft_size < longest_period * 2 {
            return Err(Error::InvalidConfig(format!(
                "fft_size {} too short for pitch floor {} Hz (need >= {})",
                self.fft_size,
                self.pitch_floor,
                longest_period * 2
            )));
        }
        if !self.silence_threshold.is_finite() || self.silence_threshold < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "silence_threshold {} must be finite and non-negative",
                self.silence_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VocoderConfig::default();
        assert_eq!(config.sample_rate, 48000.0);
        assert_eq!(config.period_samples(), 240);
        assert_eq!(config.num_bins(), 1025);
        assert_eq!(config.frame_len(), 2049);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_period_rounding() {
        let config = VocoderConfig::default().with_sample_rate(44100.0);
        // 220.5 rounds away from zero
        assert_eq!(config.period_samples(), 221);
    }

    #[test]
    fn test_rejects_bad_values() {
        let base = VocoderConfig::default();
        assert!(base.clone().with_sample_rate(1000.0).validate().is_err());
        assert!(base.clone().with_frame_period_ms(0.0).validate().is_err());
        assert!(base.clone().with_fft_size(1000).validate().is_err());
        assert!(base.clone().with_pitch_range(800.0, 71.0).validate().is_err());
        assert!(base.clone().with_pitch_range(71.0, 30000.0).validate().is_err());
        assert!(base.clone().with_fft_size(1024).validate().is_err());
        assert!(base.with_silence_threshold(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: VocoderConfig = serde::Deserialize::deserialize(
            serde::de::value::MapDeserializer::<_, serde::de::value::Error>::new(
                [("fft_size", 4096usize)].into_iter(),
            ),
        )
        .unwrap();
        assert_eq!(config.fft_size, 4096);
        assert_eq!(config.pitch_floor, 71.0);
    }
}
