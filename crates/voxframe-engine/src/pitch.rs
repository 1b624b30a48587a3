//! Pitch estimation using the YIN algorithm
//!
//! The estimator runs on a pre-emphasised signal built from the two analysis
//! windows, `current[n] - 0.97 * delayed[n]`, which removes DC and tilts the
//! spectrum towards the harmonics YIN locks onto.
//!
//! 1. **Difference function** - d(τ) = Σ(x[j] - x[j+τ])²
//! 2. **Cumulative mean normalized difference** - d'(τ)
//! 3. **Absolute threshold** - first τ where d'(τ) < threshold, then its local minimum
//! 4. **Parabolic interpolation** - sub-sample accuracy

use voxframe_core::{PitchAnalyzer, VocoderConfig};

const PRE_EMPHASIS: f64 = 0.97;

/// Dips below this are accepted as soon as they are found.
const YIN_THRESHOLD: f64 = 0.15;

/// Global minimum above this means no usable period.
const YIN_ACCEPT: f64 = 0.35;

/// YIN pitch estimator with pre-allocated buffers.
pub struct YinPitch {
    sample_rate: f64,
    pitch_floor: f64,
    pitch_ceiling: f64,
    min_period: usize,
    max_period: usize,

    emphasized: Vec<f64>,
    difference: Vec<f64>,
    cumulative_mean: Vec<f64>,
    last_aperiodicity: f64,
}

impl YinPitch {
    pub fn new(config: &VocoderConfig) -> Self {
        let min_period = ((config.sample_rate / config.pitch_ceiling).floor() as usize).max(2);
        let max_period = ((config.sample_rate / config.pitch_floor).ceil() as usize)
            .min(config.fft_size / 2);

        Self {
            sample_rate: config.sample_rate,
            pitch_floor: config.pitch_floor,
            pitch_ceiling: config.pitch_ceiling,
            min_period,
            max_period,
            emphasized: vec![0.0; config.fft_size],
            difference: vec![0.0; max_period + 2],
            cumulative_mean: vec![0.0; max_period + 2],
            last_aperiodicity: 1.0,
        }
    }

    /// d'(τ) at the last accepted period (1.0 when none was found).
    pub fn last_aperiodicity(&self) -> f64 {
        self.last_aperiodicity
    }

    fn compute_difference(&mut self, max_period: usize) {
        let x = &self.emphasized;
        let width = x.len() - max_period;
        self.difference[0] = 0.0;
        for tau in 1..=max_period {
            let mut sum = 0.0;
            for j in 0..width {
                let delta = x[j] - x[j + tau];
                sum += delta * delta;
            }
            self.difference[tau] = sum;
        }
    }

    fn compute_cumulative_mean(&mut self, max_period: usize) {
        self.cumulative_mean[0] = 1.0;
        let mut running_sum = 0.0;
        for tau in 1..=max_period {
            running_sum += self.difference[tau];
            self.cumulative_mean[tau] = if running_sum > 0.0 {
                self.difference[tau] * tau as f64 / running_sum
            } else {
                1.0
            };
        }
    }

    /// Returns (period, d'(period)); period 0 when nothing is usable.
    fn find_period(&self, max_period: usize) -> (usize, f64) {
        let cmnd = &self.cumulative_mean;
        let mut tau = self.min_period;
        while tau < max_period {
            if cmnd[tau] < YIN_THRESHOLD {
                while tau + 1 < max_period && cmnd[tau + 1] < cmnd[tau] {
                    tau += 1;
                }
                return (tau, cmnd[tau]);
            }
            tau += 1;
        }

        let (best, value) = (self.min_period..max_period)
            .map(|t| (t, cmnd[t]))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap_or((0, 1.0));
        if value < YIN_ACCEPT {
            (best, value)
        } else {
            (0, 1.0)
        }
    }

    fn parabolic_interpolation(&self, tau: usize, max_period: usize) -> f64 {
        if tau < 1 || tau + 1 > max_period {
            return tau as f64;
        }
        let s0 = self.cumulative_mean[tau - 1];
        let s1 = self.cumulative_mean[tau];
        let s2 = self.cumulative_mean[tau + 1];
        let denominator = 2.0 * (2.0 * s1 - s2 - s0);
        if denominator.abs() < f64::EPSILON {
            return tau as f64;
        }
        tau as f64 + (s2 - s0) / denominator
    }
}

impl PitchAnalyzer for YinPitch {
    fn estimate(&mut self, current: &[f64], delayed: &[f64]) -> f64 {
        let len = self.emphasized.len().min(current.len()).min(delayed.len());
        let max_period = self.max_period.min(len / 2);
        self.last_aperiodicity = 1.0;
        if max_period <= self.min_period {
            return 0.0;
        }

        for ((x, &c), &d) in self.emphasized[..len]
            .iter_mut()
            .zip(current)
            .zip(delayed)
        {
            *x = c - PRE_EMPHASIS * d;
        }

        self.compute_difference(max_period);
        self.compute_cumulative_mean(max_period);

        let (period, aperiodicity) = self.find_period(max_period);
        if period == 0 {
            return 0.0;
        }

        let refined = self.parabolic_interpolation(period, max_period);
        let frequency = self.sample_rate / refined;
        if !frequency.is_finite() || frequency < self.pitch_floor || frequency > self.pitch_ceiling
        {
            return 0.0;
        }

        self.last_aperiodicity = aperiodicity;
        frequency
    }
}
