//! Pitch-synchronous overlap-add resynthesis.
//!
//! A phase accumulator advances once per output sample. Each wrap emits one
//! pulse: an `fft_size` frame built from the current envelope (magnitude)
//! and aperiodicity (how much of that magnitude gets a random phase). The
//! pulse is centred, Hann-windowed and added into a ring of `fft_size`
//! samples that [`Synthesizer::next_sample`] drains one slot at a time.
//!
//! Voiced frames pulse at the primed pitch. Unvoiced frames pulse once per
//! frame period with fully random phase, which yields shaped noise. Silent
//! frames emit nothing; whatever is already in the ring still plays out.

use crate::spectrum::Spectrum;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use rustfft::num_complex::Complex;
use std::f64::consts::TAU;
use voxframe_core::{SynthesisFrame, Synthesizer, VocoderConfig};

pub struct PulseSynthesizer {
    sample_rate: f64,
    period_samples: f64,
    spectrum: Spectrum,

    ring: Vec<f64>,
    read_pos: usize,
    phase: f64,

    pitch: f64,
    is_voiced: bool,
    is_silent: bool,
    amplitude: Vec<f64>,
    aperiodicity: Vec<f64>,

    rng: Pcg32,
}

impl PulseSynthesizer {
    pub fn new(config: &VocoderConfig, seed: u64) -> Self {
        let bins = config.num_bins();
        Self {
            sample_rate: config.sample_rate,
            period_samples: config.period_samples() as f64,
            spectrum: Spectrum::new(config.fft_size),
            ring: vec![0.0; config.fft_size],
            read_pos: 0,
            phase: 0.0,
            pitch: 0.0,
            is_voiced: false,
            is_silent: true,
            amplitude: vec![0.0; bins],
            aperiodicity: vec![1.0; bins],
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Phase increment per sample under the primed frame.
    fn step(&self) -> f64 {
        if self.is_voiced && self.pitch > 0.0 && self.pitch.is_finite() {
            self.pitch / self.sample_rate
        } else {
            1.0 / self.period_samples
        }
    }

    fn emit_pulse(&mut self, step: f64) {
        let size = self.spectrum.size();
        // Pulse spacing in samples turns per-pulse magnitude into per-harmonic amplitude.
        let gain = 2.0 / (step * size as f64);
        let voiced = self.is_voiced;

        let Self {
            spectrum,
            ring,
            read_pos,
            amplitude,
            aperiodicity,
            rng,
            ..
        } = self;

        spectrum.load_hermitian(|k| {
            let magnitude = amplitude[k] * gain;
            let noise = Complex::from_polar(1.0, rng.gen_range(0.0..TAU));
            if voiced {
                let ap = aperiodicity[k].clamp(0.0, 1.0);
                (Complex::new((1.0 - ap).sqrt(), 0.0) + noise * ap.sqrt()) * magnitude
            } else {
                noise * magnitude
            }
        });
        spectrum.inverse();

        let scale = 1.0 / size as f64;
        let half = size / 2;
        for n in 0..size {
            // Rotate so the zero-phase pulse sits mid-window.
            let sample = spectrum.buffer()[(n + half) % size].re * scale;
            ring[(*read_pos + n) % size] += sample * spectrum.window()[n];
        }
    }
}

impl Synthesizer for PulseSynthesizer {
    fn prime(&mut self, frame: SynthesisFrame<'_>) {
        self.pitch = frame.pitch;
        self.is_voiced = frame.is_voiced;
        self.is_silent = frame.is_silent;
        for (amp, &power) in self.amplitude.iter_mut().zip(frame.envelope) {
            *amp = power.max(0.0).sqrt();
        }
        self.aperiodicity
            .iter_mut()
            .zip(frame.aperiodicity)
            .for_each(|(dst, &src)| *dst = src);
    }

    fn next_sample(&mut self) -> f64 {
        if !self.is_silent {
            let step = self.step();
            self.phase += step;
            if self.phase >= 1.0 {
                self.phase = self.phase.fract();
                self.emit_pulse(step);
            }
        }

        let out = self.ring[self.read_pos];
        self.ring[self.read_pos] = 0.0;
        self.read_pos = (self.read_pos + 1) % self.ring.len();
        out
    }
}
