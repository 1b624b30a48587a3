//! Cepstrally smoothed spectral envelope.

use crate::spectrum::Spectrum;
use rustfft::num_complex::Complex;
use voxframe_core::{EnvelopeAnalyzer, VocoderConfig};

/// Envelope written for silent frames.
pub const SILENT_ENVELOPE: f64 = 1e-12;

/// Added to power before the log so empty bins stay finite.
const POWER_FLOOR: f64 = 1e-20;

/// Lifter length for unvoiced frames, in seconds.
const UNVOICED_LIFTER_SECS: f64 = 0.0015;

/// Shortest lifter kept for voiced frames, in samples.
const MIN_LIFTER: usize = 8;

/// Power envelope of a frame: the log power spectrum with its quefrencies
/// at and above the pitch period removed.
pub struct CepstralEnvelope {
    sample_rate: f64,
    spectrum: Spectrum,
    power: Vec<f64>,
}

impl CepstralEnvelope {
    pub fn new(config: &VocoderConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            spectrum: Spectrum::new(config.fft_size),
            power: vec![0.0; config.num_bins()],
        }
    }

    fn lifter_cutoff(&self, pitch: f64, is_voiced: bool) -> usize {
        let half = self.spectrum.size() / 2;
        let cutoff = if is_voiced && pitch > 0.0 && pitch.is_finite() {
            ((0.8 * self.sample_rate / pitch).round() as usize).max(MIN_LIFTER)
        } else {
            (UNVOICED_LIFTER_SECS * self.sample_rate).round() as usize
        };
        cutoff.clamp(1, half)
    }
}

impl EnvelopeAnalyzer for CepstralEnvelope {
    fn analyze(
        &mut self,
        window: &[f64],
        pitch: f64,
        is_voiced: bool,
        is_silent: bool,
        envelope: &mut [f64],
    ) {
        if is_silent {
            envelope.fill(SILENT_ENVELOPE);
            return;
        }

        let cutoff = self.lifter_cutoff(pitch, is_voiced);
        let Self {
            spectrum, power, ..
        } = self;

        spectrum.power(window, power);
        spectrum.load_hermitian(|k| Complex::new((power[k] + POWER_FLOOR).ln(), 0.0));
        spectrum.inverse();

        let size = spectrum.size();
        let scale = 1.0 / size as f64;
        for (n, c) in spectrum.buffer_mut().iter_mut().enumerate() {
            let quefrency = n.min(size - n);
            *c = if quefrency < cutoff {
                Complex::new(c.re * scale, 0.0)
            } else {
                Complex::new(0.0, 0.0)
            };
        }
        spectrum.forward();

        for (out, bin) in envelope.iter_mut().zip(spectrum.buffer()) {
            *out = bin.re.exp();
        }
    }
}
