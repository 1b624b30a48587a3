//! Fixtures for transport tests: signal generators and WAV writers.

use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;

pub const TEST_SAMPLE_RATE: u32 = 16000;

/// Sine at `frequency` with amplitude 0.5.
pub fn generate_sine(frequency: f64, sample_rate: u32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            (0.5 * (2.0 * std::f64::consts::PI * frequency * t).sin()) as f32
        })
        .collect()
}

/// Write interleaved float samples.
pub fn write_float_wav(path: &Path, sample_rate: u32, channels: u16, samples: &[f32]) {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

/// Write mono 16-bit PCM.
pub fn write_pcm16_wav(path: &Path, sample_rate: u32, samples: &[f32]) {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer
            .write_sample((s * i16::MAX as f32).round() as i16)
            .unwrap();
    }
    writer.finalize().unwrap();
}
