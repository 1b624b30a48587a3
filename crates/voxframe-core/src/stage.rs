//! The fixed per-frame analysis sequence.
//!
//! Each [`Stage`] declares the values it reads and writes, so the order in
//! [`ANALYSIS_SEQUENCE`] can be checked against its data dependencies.

use crate::modulation::ModulationSnapshot;

/// Value flowing between stages of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    CurrentWindow,
    DelayedWindow,
    Modulation,
    Silence,
    Pitch,
    Voiced,
    Aperiodicity,
    Envelope,
    SynthesisState,
}

impl Slot {
    /// Values available before the first stage runs.
    pub const FRAME_INPUTS: [Slot; 3] = [Slot::CurrentWindow, Slot::DelayedWindow, Slot::Modulation];
}

/// One step of the analysis and resynthesis-setup cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    SilenceDetect,
    PitchEstimate,
    AperiodicityAnalyze,
    EnvelopeAnalyze,
    SynthesisPrime,
}

/// Stage order run on every completed frame.
pub const ANALYSIS_SEQUENCE: [Stage; 5] = [
    Stage::SilenceDetect,
    Stage::PitchEstimate,
    Stage::AperiodicityAnalyze,
    Stage::EnvelopeAnalyze,
    Stage::SynthesisPrime,
];

impl Stage {
    pub fn reads(self) -> &'static [Slot] {
        match self {
            Stage::SilenceDetect => &[Slot::CurrentWindow],
            Stage::PitchEstimate => &[Slot::CurrentWindow, Slot::DelayedWindow],
            Stage::AperiodicityAnalyze => &[
                Slot::CurrentWindow,
                Slot::Pitch,
                Slot::Modulation,
                Slot::Silence,
            ],
            Stage::EnvelopeAnalyze => &[
                Slot::CurrentWindow,
                Slot::Pitch,
                Slot::Modulation,
                Slot::Voiced,
                Slot::Silence,
            ],
            Stage::SynthesisPrime => &[
                Slot::Pitch,
                Slot::Modulation,
                Slot::Voiced,
                Slot::Silence,
                Slot::Aperiodicity,
                Slot::Envelope,
            ],
        }
    }

    pub fn writes(self) -> &'static [Slot] {
        match self {
            Stage::SilenceDetect => &[Slot::Silence],
            Stage::PitchEstimate => &[Slot::Pitch],
            Stage::AperiodicityAnalyze => &[Slot::Voiced, Slot::Aperiodicity],
            Stage::EnvelopeAnalyze => &[Slot::Envelope],
            Stage::SynthesisPrime => &[Slot::SynthesisState],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::SilenceDetect => "silence",
            Stage::PitchEstimate => "pitch",
            Stage::AperiodicityAnalyze => "aperiodicity",
            Stage::EnvelopeAnalyze => "envelope",
            Stage::SynthesisPrime => "synthesis",
        }
    }
}

/// Pitch after modulation and range guarding.
///
/// An undetermined pitch (`0.0`) stays undetermined. A non-finite product
/// becomes undetermined. Anything else is clamped to `[floor, ceiling]`.
#[inline]
pub fn modulate_pitch(pitch: f64, multiplier: f64, floor: f64, ceiling: f64) -> f64 {
    if pitch == 0.0 {
        return 0.0;
    }
    let modulated = pitch * multiplier;
    if !modulated.is_finite() {
        return 0.0;
    }
    modulated.clamp(floor, ceiling)
}

/// The three independently modulated pitch values of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModulatedPitch {
    pub aperiodicity: f64,
    pub envelope: f64,
    pub synthesis: f64,
}

impl ModulatedPitch {
    pub fn derive(pitch: f64, modulation: &ModulationSnapshot, floor: f64, ceiling: f64) -> Self {
        Self {
            aperiodicity: modulate_pitch(pitch, modulation.pitch_for_ap, floor, ceiling),
            envelope: modulate_pitch(pitch, modulation.pitch_for_sp, floor, ceiling),
            synthesis: modulate_pitch(pitch, modulation.pitch_for_synthesis, floor, ceiling),
        }
    }
}

/// Results of the most recent completed frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameOutcome {
    /// Frames completed since session open, this one included.
    pub index: u64,
    pub is_silent: bool,
    /// Unmodulated estimator output.
    pub pitch: f64,
    pub modulated: ModulatedPitch,
    pub is_voiced: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequence_respects_dependencies() {
        let mut available: HashSet<Slot> = Slot::FRAME_INPUTS.into_iter().collect();
        for stage in ANALYSIS_SEQUENCE {
            for slot in stage.reads() {
                assert!(
                    available.contains(slot),
                    "{} reads {:?} before it is produced",
                    stage.name(),
                    slot
                );
            }
            available.extend(stage.writes().iter().copied());
        }
        assert!(available.contains(&Slot::SynthesisState));
    }

    #[test]
    fn test_pitch_estimate_is_unmodulated() {
        assert!(!Stage::PitchEstimate.reads().contains(&Slot::Modulation));
        assert!(!Stage::SilenceDetect.reads().contains(&Slot::Modulation));
    }

    #[test]
    fn test_modulate_pitch() {
        assert_eq!(modulate_pitch(200.0, 1.5, 71.0, 800.0), 300.0);
        assert_eq!(modulate_pitch(0.0, 1.5, 71.0, 800.0), 0.0);
        assert_eq!(modulate_pitch(0.0, f64::NAN, 71.0, 800.0), 0.0);
        assert_eq!(modulate_pitch(200.0, f64::NAN, 71.0, 800.0), 0.0);
        assert_eq!(modulate_pitch(200.0, f64::INFINITY, 71.0, 800.0), 0.0);
        assert_eq!(modulate_pitch(200.0, -1.0, 71.0, 800.0), 71.0);
        assert_eq!(modulate_pitch(700.0, 2.0, 71.0, 800.0), 800.0);
    }

    #[test]
    fn test_derive_uses_each_multiplier() {
        let modulation = ModulationSnapshot {
            pitch_for_ap: 0.5,
            pitch_for_sp: 1.0,
            pitch_for_synthesis: 2.0,
        };
        let pitch = ModulatedPitch::derive(200.0, &modulation, 71.0, 800.0);
        assert_eq!(pitch.aperiodicity, 100.0);
        assert_eq!(pitch.envelope, 200.0);
        assert_eq!(pitch.synthesis, 400.0);
    }
}
