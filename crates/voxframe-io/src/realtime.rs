//! Live duplex transport on the default CPAL input and output devices.
//!
//! The capture callback pushes the first input channel into an SPSC ring.
//! The playback callback hands each block to a [`PlaybackRenderer`]. The
//! session sits behind a mutex the playback callback only `try_lock`s, so the
//! driving thread can take it back and close it once the streams are gone.

use crate::playback::{PlaybackRenderer, SharedSession, SCRATCH_FRAMES};
use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;
use ringbuf::traits::{Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::time::Duration;
use voxframe_core::{
    Arc, ModulationChannel, RunFlag, SessionHandle, SessionReport, VocoderBackend, VocoderConfig,
};

/// How often the driving thread checks the run flag.
pub const DRIVER_POLL: Duration = Duration::from_millis(100);

/// Stream audio through a session until `run` is stopped, then close it.
///
/// `buffer_size` sizes the capture ring (four buffers of headroom).
pub fn run_realtime<B>(
    config: VocoderConfig,
    backend: B,
    modulation: Arc<ModulationChannel>,
    run: &RunFlag,
    buffer_size: usize,
) -> Result<SessionReport>
where
    B: VocoderBackend + 'static,
{
    let host = cpal::default_host();
    let input_device = host
        .default_input_device()
        .ok_or_else(|| Error::InvalidDevice("No input device available".to_string()))?;
    let output_device = host
        .default_output_device()
        .ok_or_else(|| Error::InvalidDevice("No output device available".to_string()))?;

    let sample_rate = cpal::SampleRate(config.sample_rate.round() as u32);
    let input_supported = input_device.default_input_config()?;
    let output_supported = output_device.default_output_config()?;
    let mut input_config: cpal::StreamConfig = input_supported.config();
    let mut output_config: cpal::StreamConfig = output_supported.config();
    input_config.sample_rate = sample_rate;
    output_config.sample_rate = sample_rate;

    let session: SharedSession<B> = Arc::new(Mutex::new(SessionHandle::open(
        config, backend, modulation,
    )?));

    let (producer, consumer) = HeapRb::<f32>::new(buffer_size.max(SCRATCH_FRAMES) * 4).split();

    let input_stream = match input_supported.sample_format() {
        cpal::SampleFormat::F32 => build_input::<f32>(&input_device, &input_config, producer)?,
        cpal::SampleFormat::I16 => build_input::<i16>(&input_device, &input_config, producer)?,
        cpal::SampleFormat::U16 => build_input::<u16>(&input_device, &input_config, producer)?,
        format => {
            return Err(Error::UnsupportedFormat(format!("input {:?}", format)));
        }
    };
    let output_stream = match output_supported.sample_format() {
        cpal::SampleFormat::F32 => {
            build_output::<f32, B>(&output_device, &output_config, consumer, session.clone())?
        }
        cpal::SampleFormat::I16 => {
            build_output::<i16, B>(&output_device, &output_config, consumer, session.clone())?
        }
        cpal::SampleFormat::U16 => {
            build_output::<u16, B>(&output_device, &output_config, consumer, session.clone())?
        }
        format => {
            return Err(Error::UnsupportedFormat(format!("output {:?}", format)));
        }
    };

    input_stream.play()?;
    output_stream.play()?;

    tracing::info!(
        input = %input_device.name().unwrap_or_default(),
        output = %output_device.name().unwrap_or_default(),
        sample_rate = sample_rate.0,
        input_channels = input_config.channels,
        output_channels = output_config.channels,
        "Streaming audio. Press 'x' to stop."
    );

    while run.is_running() {
        std::thread::sleep(DRIVER_POLL);
    }

    drop(output_stream);
    drop(input_stream);

    let report = session.lock().close()?;
    tracing::info!(?report, "stream stopped");
    Ok(report)
}

fn build_input<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut producer: HeapProd<f32>,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    let channels = config.channels.max(1) as usize;

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            for frame in data.chunks(channels) {
                // Full ring: the playback side is behind, drop the sample.
                let _ = producer.try_push(frame[0].to_sample::<f32>());
            }
        },
        |_err| {
            // Audio stream error - cannot log from callback
        },
        None,
    )?;

    Ok(stream)
}

fn build_output<T, B>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    consumer: HeapCons<f32>,
    session: SharedSession<B>,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
    B: VocoderBackend + 'static,
{
    let mut playback = PlaybackRenderer::new(consumer, session, config.channels as usize);

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                playback.render(data, |s| T::from_sample(s));
            }));

            if result.is_err() {
                // Panic in callback - output silence
                for sample in data.iter_mut() {
                    *sample = T::from_sample(0.0f32);
                }
            }
        },
        |_err| {
            // Audio stream error - cannot log from callback
        },
        None,
    )?;

    Ok(stream)
}
