//! Offline transport: mono WAV in, 32-bit float mono WAV out.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;
use std::time::{Duration, Instant};
use voxframe_core::{Arc, ModulationChannel, Session, SessionReport, VocoderBackend, VocoderConfig};

/// Buffer size handed to [`Session::process`] unless one is given.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// A decoded mono WAV file.
#[derive(Debug, Clone, PartialEq)]
pub struct MonoClip {
    pub sample_rate: u32,
    pub samples: Vec<f64>,
}

/// Decode a mono WAV file. Integer samples are scaled to [-1.0, 1.0).
pub fn read_mono(path: impl AsRef<Path>) -> Result<MonoClip> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    if spec.channels != 1 {
        return Err(Error::UnsupportedChannels(spec.channels));
    }

    let samples = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            if !(1..=32).contains(&spec.bits_per_sample) {
                return Err(Error::UnsupportedFormat(format!(
                    "{}-bit integer WAV",
                    spec.bits_per_sample
                )));
            }
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f64 * scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    Ok(MonoClip {
        sample_rate: spec.sample_rate,
        samples,
    })
}

/// Sample rate from a WAV header, without decoding any samples.
pub fn probe_sample_rate(path: impl AsRef<Path>) -> Result<u32> {
    Ok(WavReader::open(path)?.spec().sample_rate)
}

/// Encode `samples` as a 32-bit float mono WAV file.
pub fn write_mono(path: impl AsRef<Path>, sample_rate: u32, samples: &[f64]) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample as f32)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Timing of one offline run.
#[derive(Debug, Clone, Copy)]
pub struct FileRun {
    pub report: SessionReport,
    pub sample_rate: u32,
    /// Wall time from session open to close.
    pub total: Duration,
    /// Time spent inside [`Session::process`].
    pub processing: Duration,
}

/// Run `input` through a session in `buffer_size` chunks and write the
/// result to `output`. The file's sample rate replaces `config.sample_rate`.
/// The output has exactly as many samples as the input.
pub fn process_file<B: VocoderBackend>(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: VocoderConfig,
    backend: B,
    modulation: Arc<ModulationChannel>,
    buffer_size: usize,
) -> Result<FileRun> {
    let input = input.as_ref();
    let output = output.as_ref();
    let clip = read_mono(input)?;
    let config = config.with_sample_rate(f64::from(clip.sample_rate));
    let buffer_size = buffer_size.max(1);

    tracing::info!(
        input = %input.display(),
        samples = clip.samples.len(),
        sample_rate = clip.sample_rate,
        buffer_size,
        "Processing..."
    );

    let begin = Instant::now();
    let mut session = Session::open(config, backend, modulation)?;
    let mut rendered = vec![0.0; clip.samples.len()];
    let mut processing = Duration::ZERO;

    for (src, dst) in clip
        .samples
        .chunks(buffer_size)
        .zip(rendered.chunks_mut(buffer_size))
    {
        let call = Instant::now();
        session.process(src, dst);
        processing += call.elapsed();
    }

    let report = session.close();
    let total = begin.elapsed();

    write_mono(output, clip.sample_rate, &rendered)?;

    tracing::info!(
        output = %output.display(),
        total_secs = total.as_secs_f64(),
        processing_secs = processing.as_secs_f64(),
        frames = report.frames_analyzed,
        "Processing done"
    );

    Ok(FileRun {
        report,
        sample_rate: clip.sample_rate,
        total,
        processing,
    })
}
