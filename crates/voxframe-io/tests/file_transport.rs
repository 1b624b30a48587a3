//! Offline WAV transport against the reference engine.

mod helpers;

use approx::assert_relative_eq;
use helpers::*;
use voxframe_core::{Arc, ModulationChannel, VocoderConfig};
use voxframe_engine::ReferenceBackend;
use voxframe_io::{process_file, read_mono, write_mono, Error};

fn config() -> VocoderConfig {
    VocoderConfig::default().with_fft_size(1024)
}

#[test]
fn test_output_matches_input_length_and_rate() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    // Not a multiple of the buffer size, so the last chunk is short.
    let samples = generate_sine(220.0, TEST_SAMPLE_RATE, 10_000);
    write_float_wav(&input, TEST_SAMPLE_RATE, 1, &samples);

    let run = process_file(
        &input,
        &output,
        config(),
        ReferenceBackend::new(),
        Arc::new(ModulationChannel::new()),
        4096,
    )
    .unwrap();

    let rendered = read_mono(&output).unwrap();
    assert_eq!(rendered.sample_rate, TEST_SAMPLE_RATE);
    assert_eq!(rendered.samples.len(), samples.len());
    assert!(rendered.samples.iter().all(|s| s.is_finite()));

    assert_eq!(run.sample_rate, TEST_SAMPLE_RATE);
    assert_eq!(run.report.samples_processed, samples.len() as u64);
    assert_eq!(run.report.non_finite_samples, 0);
    // The file's rate sets the period: 5 ms at 16 kHz is 80 samples.
    assert_eq!(run.report.frames_analyzed, 10_000 / 80);
    assert!(run.processing <= run.total);
}

#[test]
fn test_chunk_size_does_not_change_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    write_float_wav(
        &input,
        TEST_SAMPLE_RATE,
        1,
        &generate_sine(180.0, TEST_SAMPLE_RATE, 6000),
    );

    let render = |buffer_size: usize| {
        let output = dir.path().join(format!("out-{buffer_size}.wav"));
        process_file(
            &input,
            &output,
            config(),
            ReferenceBackend::with_seed(9),
            Arc::new(ModulationChannel::new()),
            buffer_size,
        )
        .unwrap();
        read_mono(&output).unwrap().samples
    };

    assert_eq!(render(4096), render(333));
}

#[test]
fn test_pcm_input_is_scaled() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pcm.wav");
    write_pcm16_wav(&path, TEST_SAMPLE_RATE, &[0.0, 0.5, -0.5, 1.0]);

    let clip = read_mono(&path).unwrap();
    assert_eq!(clip.samples.len(), 4);
    assert_eq!(clip.samples[0], 0.0);
    assert_relative_eq!(clip.samples[1], 0.5, epsilon = 1e-4);
    assert_relative_eq!(clip.samples[2], -0.5, epsilon = 1e-4);
    assert!(clip.samples[3] < 1.0);
}

#[test]
fn test_written_output_is_float() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("float.wav");
    write_mono(&path, 22050, &[0.25, -0.125]).unwrap();

    let reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 22050);
    assert_eq!(spec.bits_per_sample, 32);
    assert_eq!(spec.sample_format, hound::SampleFormat::Float);
    assert_eq!(read_mono(&path).unwrap().samples, vec![0.25, -0.125]);
}

#[test]
fn test_stereo_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("stereo.wav");
    let output = dir.path().join("out.wav");
    write_float_wav(&input, TEST_SAMPLE_RATE, 2, &[0.0; 64]);

    let result = process_file(
        &input,
        &output,
        config(),
        ReferenceBackend::new(),
        Arc::new(ModulationChannel::new()),
        4096,
    );
    assert!(matches!(result, Err(Error::UnsupportedChannels(2))));
    assert!(!output.exists());
}

#[test]
fn test_invalid_config_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_float_wav(&input, TEST_SAMPLE_RATE, 1, &[0.0; 64]);

    let result = process_file(
        &input,
        &output,
        config().with_fft_size(1000),
        ReferenceBackend::new(),
        Arc::new(ModulationChannel::new()),
        4096,
    );
    assert!(matches!(
        result,
        Err(Error::Core(voxframe_core::Error::InvalidConfig(_)))
    ));
    assert!(!output.exists());
}
