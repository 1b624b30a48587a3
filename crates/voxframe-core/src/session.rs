//! Engine session: every resource bound to one audio stream.
//!
//! A [`Session`] acquires its frame assembler, engine contexts and scratch
//! buffers in [`Session::open`] and releases all of them together, in reverse
//! order of acquisition, when it is closed or dropped. [`SessionHandle`] is
//! the nullable slot a transport keeps the session in.

use crate::config::VocoderConfig;
use crate::engine::VocoderBackend;
use crate::frame::FrameAssembler;
use crate::modulation::ModulationChannel;
use crate::stage::FrameOutcome;
use crate::{Error, Result};
use serde::Serialize;
use std::sync::Arc;

/// Owned engine resources.
///
/// Fields drop top to bottom, so they are declared in release order: the
/// reverse of the acquisition order in [`Session::open`].
pub(crate) struct Resources<B: VocoderBackend> {
    pub(crate) envelope_buf: Vec<f64>,
    pub(crate) aperiodicity_buf: Vec<f64>,
    pub(crate) waveform: Vec<f64>,
    pub(crate) synthesis: B::Synthesis,
    pub(crate) envelope: B::Envelope,
    pub(crate) aperiodicity: B::Aperiodicity,
    pub(crate) pitch: B::Pitch,
    pub(crate) backend: B,
    pub(crate) frame: FrameAssembler,
}

/// Counters reported when a session closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub samples_processed: u64,
    pub frames_analyzed: u64,
    /// Non-finite synthesized samples replaced with silence.
    pub non_finite_samples: u64,
}

/// One live analysis/resynthesis session.
pub struct Session<B: VocoderBackend> {
    pub(crate) config: VocoderConfig,
    pub(crate) modulation: Arc<ModulationChannel>,
    pub(crate) resources: Resources<B>,
    pub(crate) report: SessionReport,
    pub(crate) last_frame: Option<FrameOutcome>,
}

impl<B: VocoderBackend> Session<B> {
    /// Validate `config` and acquire every resource. On error nothing
    /// acquired so far survives.
    pub fn open(
        config: VocoderConfig,
        backend: B,
        modulation: Arc<ModulationChannel>,
    ) -> Result<Self> {
        config.validate()?;

        let frame = FrameAssembler::new(config.fft_size, config.period_samples());
        let pitch = backend.create_pitch(&config)?;
        let aperiodicity = backend.create_aperiodicity(&config)?;
        let envelope = backend.create_envelope(&config)?;
        let synthesis = backend.create_synthesis(&config)?;
        let waveform = vec![0.0; config.frame_len()];
        let aperiodicity_buf = vec![0.0; config.num_bins()];
        let envelope_buf = vec![0.0; config.num_bins()];

        tracing::info!(
            engine = backend.name(),
            sample_rate = config.sample_rate,
            period_samples = config.period_samples(),
            fft_size = config.fft_size,
            "session opened"
        );

        Ok(Self {
            config,
            modulation,
            resources: Resources {
                envelope_buf,
                aperiodicity_buf,
                waveform,
                synthesis,
                envelope,
                aperiodicity,
                pitch,
                backend,
                frame,
            },
            report: SessionReport::default(),
            last_frame: None,
        })
    }

    /// Release every resource and return the final counters.
    pub fn close(self) -> SessionReport {
        let report = self.report;
        drop(self.resources);

        if report.non_finite_samples > 0 {
            tracing::warn!(
                non_finite_samples = report.non_finite_samples,
                "synthesis produced non-finite samples (replaced with silence)"
            );
        }
        tracing::info!(
            samples = report.samples_processed,
            frames = report.frames_analyzed,
            "session closed"
        );
        report
    }

    pub fn config(&self) -> &VocoderConfig {
        &self.config
    }

    pub fn modulation(&self) -> &Arc<ModulationChannel> {
        &self.modulation
    }

    pub fn backend(&self) -> &B {
        &self.resources.backend
    }

    /// Counters so far.
    pub fn report(&self) -> SessionReport {
        self.report
    }

    /// Results of the most recent completed frame, if any.
    pub fn last_frame(&self) -> Option<FrameOutcome> {
        self.last_frame
    }
}

/// Nullable session slot. Closing empties it; a second close is an error.
pub struct SessionHandle<B: VocoderBackend> {
    session: Option<Session<B>>,
}

impl<B: VocoderBackend> SessionHandle<B> {
    pub fn open(
        config: VocoderConfig,
        backend: B,
        modulation: Arc<ModulationChannel>,
    ) -> Result<Self> {
        Ok(Self::new(Session::open(config, backend, modulation)?))
    }

    pub fn new(session: Session<B>) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session<B>> {
        self.session.as_ref()
    }

    /// Run the pipeline on one buffer. Fails only if the handle was closed.
    #[inline]
    pub fn process(&mut self, input: &[f64], output: &mut [f64]) -> Result<()> {
        match self.session.as_mut() {
            Some(session) => {
                session.process(input, output);
                Ok(())
            }
            None => Err(Error::SessionClosed),
        }
    }

    pub fn close(&mut self) -> Result<SessionReport> {
        self.session
            .take()
            .map(Session::close)
            .ok_or(Error::SessionClosed)
    }
}
