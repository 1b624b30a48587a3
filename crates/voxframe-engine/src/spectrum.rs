//! FFT workspace shared by the analyzers and the synthesizer.

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Preplanned forward/inverse FFT with its own buffers. Nothing here
/// allocates after construction.
pub(crate) struct Spectrum {
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    window: Vec<f64>,
    buffer: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl Spectrum {
    pub(crate) fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        Self {
            forward,
            inverse,
            window: hann(size),
            buffer: vec![Complex::new(0.0, 0.0); size],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
        }
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub(crate) fn window(&self) -> &[f64] {
        &self.window
    }

    #[inline]
    pub(crate) fn buffer_mut(&mut self) -> &mut [Complex<f64>] {
        &mut self.buffer
    }

    #[inline]
    pub(crate) fn buffer(&self) -> &[Complex<f64>] {
        &self.buffer
    }

    #[inline]
    pub(crate) fn forward(&mut self) {
        self.forward
            .process_with_scratch(&mut self.buffer, &mut self.scratch);
    }

    /// Unnormalized inverse transform.
    #[inline]
    pub(crate) fn inverse(&mut self) {
        self.inverse
            .process_with_scratch(&mut self.buffer, &mut self.scratch);
    }

    /// Hann-windowed power spectrum of `signal` into `out` (`size / 2 + 1` bins).
    pub(crate) fn power(&mut self, signal: &[f64], out: &mut [f64]) {
        for ((slot, &x), &w) in self.buffer.iter_mut().zip(signal).zip(&self.window) {
            *slot = Complex::new(x * w, 0.0);
        }
        self.forward();
        for (bin, value) in out.iter_mut().zip(&self.buffer) {
            *bin = value.norm_sqr();
        }
    }

    /// Load a half spectrum (`size / 2 + 1` bins) as a Hermitian-symmetric full spectrum.
    pub(crate) fn load_hermitian(&mut self, mut half: impl FnMut(usize) -> Complex<f64>) {
        let size = self.buffer.len();
        let nyquist = size / 2;
        for k in 0..=nyquist {
            self.buffer[k] = half(k);
        }
        self.buffer[0].im = 0.0;
        self.buffer[nyquist].im = 0.0;
        for k in 1..nyquist {
            self.buffer[size - k] = self.buffer[k].conj();
        }
    }
}

/// Periodic Hann window.
pub(crate) fn hann(size: usize) -> Vec<f64> {
    (0..size)
        .map(|n| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * n as f64 / size as f64).cos())
        .collect()
}
