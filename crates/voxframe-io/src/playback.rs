//! Playback-side block rendering for the live transport.
//!
//! Kept free of any device type so the callback body can run against a plain
//! ring and session handle.

use parking_lot::Mutex;
use ringbuf::traits::Consumer;
use ringbuf::HeapCons;
use voxframe_core::{Arc, SessionHandle, VocoderBackend};

/// Longest block the playback callback processes in one call.
pub const SCRATCH_FRAMES: usize = 8192;

/// Session slot shared between the playback callback and the driving thread.
pub type SharedSession<B> = Arc<Mutex<SessionHandle<B>>>;

/// Pulls captured samples, runs the session and fans out to every channel.
pub struct PlaybackRenderer<B: VocoderBackend> {
    consumer: HeapCons<f32>,
    session: SharedSession<B>,
    channels: usize,
    input: Vec<f64>,
    output: Vec<f64>,
}

impl<B: VocoderBackend> PlaybackRenderer<B> {
    pub fn new(consumer: HeapCons<f32>, session: SharedSession<B>, channels: usize) -> Self {
        Self {
            consumer,
            session,
            channels: channels.max(1),
            input: vec![0.0; SCRATCH_FRAMES],
            output: vec![0.0; SCRATCH_FRAMES],
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Fill an interleaved block.
    ///
    /// Underrun reads as silence on the input side. A contended lock or a
    /// closed handle writes silence on the output side.
    pub fn render<T: Copy>(&mut self, data: &mut [T], convert: impl Fn(f32) -> T) {
        let channels = self.channels;
        for block in data.chunks_mut(SCRATCH_FRAMES * channels) {
            let frames = block.len().div_ceil(channels);
            let input = &mut self.input[..frames];
            let output = &mut self.output[..frames];

            for sample in input.iter_mut() {
                *sample = self.consumer.try_pop().map_or(0.0, f64::from);
            }

            match self.session.try_lock() {
                Some(mut handle) => {
                    if handle.process(input, output).is_err() {
                        output.fill(0.0);
                    }
                }
                None => output.fill(0.0),
            }

            for (frame, &value) in block.chunks_mut(channels).zip(output.iter()) {
                frame.fill(convert(value as f32));
            }
        }
    }
}
