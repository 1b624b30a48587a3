//! Test helpers and fixtures for voxframe integration tests
//!
//! Every test runs offline through WAV files in a temp dir; nothing touches
//! audio hardware or the terminal.

#![allow(dead_code)]

use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;

/// Sample rate of generated fixtures.
pub const TEST_SAMPLE_RATE: u32 = 16000;

/// Values below this are considered silent (~-80dB).
pub const SILENCE_THRESHOLD: f64 = 0.0001;

/// Voiced test signal: a few harmonics of `pitch` at moderate level.
pub fn generate_voice(pitch: f64, sample_rate: u32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            let sum: f64 = (1..=4)
                .map(|h| (2.0 * std::f64::consts::PI * pitch * h as f64 * t).sin() / h as f64)
                .sum();
            (0.3 * sum) as f32
        })
        .collect()
}

pub fn generate_silence(num_samples: usize) -> Vec<f32> {
    vec![0.0; num_samples]
}

/// Write a mono 32-bit float WAV fixture.
pub fn write_wav(path: &Path, sample_rate: u32, samples: &[f32]) {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec).expect("Failed to create fixture");
    for &s in samples {
        writer.write_sample(s).expect("Failed to write fixture");
    }
    writer.finalize().expect("Failed to finalize fixture");
}

/// Read a float WAV (as written by the file transport).
pub fn read_wav(path: &Path) -> (hound::WavSpec, Vec<f32>) {
    let mut reader = hound::WavReader::open(path).expect("Failed to open output");
    let spec = reader.spec();
    let samples = reader
        .samples::<f32>()
        .collect::<Result<Vec<_>, _>>()
        .expect("Failed to read output");
    (spec, samples)
}

pub fn peak(samples: &[f32]) -> f64 {
    samples.iter().map(|s| s.abs() as f64).fold(0.0, f64::max)
}
