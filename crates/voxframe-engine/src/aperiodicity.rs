//! Harmonic-band aperiodicity and the voicing decision.

use crate::spectrum::Spectrum;
use voxframe_core::{AperiodicityAnalyzer, VocoderConfig};

/// Lowest aperiodicity written for a band; keeps the noise mix non-zero.
const MIN_APERIODICITY: f64 = 0.001;

/// Energy-weighted periodicity below [`VOICING_CUTOFF_HZ`] needed to call a frame voiced.
const VOICING_PERIODICITY: f64 = 0.5;

const VOICING_CUTOFF_HZ: f64 = 4000.0;

/// Half-width of the harmonic peak as a fraction of the harmonic spacing.
const PEAK_WIDTH: f64 = 0.15;

/// Per-harmonic aperiodicity: the share of each harmonic band's energy that
/// lies away from the harmonic peak.
pub struct HarmonicAperiodicity {
    sample_rate: f64,
    fft_size: usize,
    spectrum: Spectrum,
    power: Vec<f64>,
}

impl HarmonicAperiodicity {
    pub fn new(config: &VocoderConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            fft_size: config.fft_size,
            spectrum: Spectrum::new(config.fft_size),
            power: vec![0.0; config.num_bins()],
        }
    }
}

impl AperiodicityAnalyzer for HarmonicAperiodicity {
    fn analyze(
        &mut self,
        window: &[f64],
        pitch: f64,
        is_silent: bool,
        aperiodicity: &mut [f64],
    ) -> bool {
        if is_silent || !(pitch > 0.0 && pitch.is_finite()) {
            aperiodicity.fill(1.0);
            return false;
        }

        self.spectrum.power(window, &mut self.power);

        let bins = self.power.len().min(aperiodicity.len());
        let spacing = (pitch * self.fft_size as f64 / self.sample_rate).max(1.0);
        let peak_half_width = (spacing * PEAK_WIDTH).max(1.0);
        let cutoff_bin = VOICING_CUTOFF_HZ * self.fft_size as f64 / self.sample_rate;

        let mut weighted_periodicity = 0.0;
        let mut voicing_energy = 0.0;
        let mut last = 1.0;
        let mut harmonic = 1usize;

        loop {
            let centre = harmonic as f64 * spacing;
            let band_lo = (centre - spacing * 0.5).max(0.0).ceil() as usize;
            let band_hi = ((centre + spacing * 0.5).floor() as usize).min(bins - 1);
            if band_lo >= bins {
                break;
            }

            let mut total = 0.0;
            let mut peak = 0.0;
            for k in band_lo..=band_hi {
                total += self.power[k];
                if (k as f64 - centre).abs() <= peak_half_width {
                    peak += self.power[k];
                }
            }

            let periodicity = if total > 0.0 { peak / total } else { 0.0 };
            last = (1.0 - periodicity).clamp(MIN_APERIODICITY, 1.0);
            aperiodicity[band_lo..=band_hi].fill(last);

            if centre <= cutoff_bin {
                weighted_periodicity += periodicity * total;
                voicing_energy += total;
            }

            if band_hi + 1 >= bins {
                break;
            }
            harmonic += 1;
        }

        // Bins below the first harmonic band inherit its value.
        let first_band = ((spacing * 0.5).ceil() as usize).min(bins);
        let first_value = aperiodicity.get(first_band).copied().unwrap_or(last);
        aperiodicity[..first_band].fill(first_value);

        voicing_energy > 0.0 && weighted_periodicity / voicing_energy > VOICING_PERIODICITY
    }
}
