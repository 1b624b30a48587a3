//! Per-sample orchestration: frame assembly, the analysis sequence, and
//! unconditional sample-rate synthesis output.
//!
//! # RT Safety
//! Nothing in this module allocates, locks, logs or sleeps. The modulation
//! scalars are read with atomic loads once per completed frame.

use crate::engine::{
    AperiodicityAnalyzer, EnvelopeAnalyzer, PitchAnalyzer, SynthesisFrame, Synthesizer,
    VocoderBackend,
};
use crate::frame::AnalysisFrame;
use crate::session::Session;
use crate::stage::{FrameOutcome, ModulatedPitch, Stage, ANALYSIS_SEQUENCE};

/// Run the pipeline on one buffer. See [`Session::process`].
#[inline]
pub fn process<B: VocoderBackend>(session: &mut Session<B>, input: &[f64], output: &mut [f64]) {
    session.process(input, output);
}

impl<B: VocoderBackend> Session<B> {
    /// Process one buffer of mono samples.
    ///
    /// Emits one output sample per input sample. `output` should be as long
    /// as `input`; any extra output is filled with silence and extra input is
    /// left unprocessed.
    #[inline]
    pub fn process(&mut self, input: &[f64], output: &mut [f64]) {
        let count = input.len().min(output.len());
        let (head, tail) = output.split_at_mut(count);

        for (&sample, out) in input.iter().zip(head.iter_mut()) {
            if self.resources.frame.push(sample) {
                self.analyze_frame();
            }

            let value = self.resources.synthesis.next_sample();
            *out = if value.is_finite() {
                value
            } else {
                self.report.non_finite_samples += 1;
                0.0
            };
        }

        tail.fill(0.0);
        self.report.samples_processed += count as u64;
    }

    fn analyze_frame(&mut self) {
        let res = &mut self.resources;
        res.frame.copy_into(&mut res.waveform);
        let windows = AnalysisFrame::from_line(&res.waveform);
        let modulation = self.modulation.read();

        self.report.frames_analyzed += 1;
        let mut outcome = FrameOutcome {
            index: self.report.frames_analyzed,
            ..FrameOutcome::default()
        };

        for stage in ANALYSIS_SEQUENCE {
            match stage {
                Stage::SilenceDetect => {
                    outcome.is_silent = res
                        .backend
                        .is_silent(windows.current, self.config.silence_threshold);
                }
                Stage::PitchEstimate => {
                    outcome.pitch = res.pitch.estimate(windows.current, windows.delayed);
                    outcome.modulated = ModulatedPitch::derive(
                        outcome.pitch,
                        &modulation,
                        self.config.pitch_floor,
                        self.config.pitch_ceiling,
                    );
                }
                Stage::AperiodicityAnalyze => {
                    outcome.is_voiced = res.aperiodicity.analyze(
                        windows.current,
                        outcome.modulated.aperiodicity,
                        outcome.is_silent,
                        &mut res.aperiodicity_buf,
                    );
                }
                Stage::EnvelopeAnalyze => {
                    res.envelope.analyze(
                        windows.current,
                        outcome.modulated.envelope,
                        outcome.is_voiced,
                        outcome.is_silent,
                        &mut res.envelope_buf,
                    );
                }
                Stage::SynthesisPrime => {
                    res.synthesis.prime(SynthesisFrame {
                        pitch: outcome.modulated.synthesis,
                        is_voiced: outcome.is_voiced,
                        is_silent: outcome.is_silent,
                        aperiodicity: &res.aperiodicity_buf,
                        envelope: &res.envelope_buf,
                    });
                }
            }
        }

        self.last_frame = Some(outcome);
    }
}
