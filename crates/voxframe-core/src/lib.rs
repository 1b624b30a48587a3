//! Real-time orchestration kernel of a frame-synchronous vocoder.
//!
//! # Primary API
//!
//! - [`Session`] / [`SessionHandle`]: engine resources bound to one stream
//! - [`Session::process`]: per-buffer pipeline, called from the audio thread
//! - [`ModulationChannel`]: live pitch multipliers shared with the control thread
//! - [`RunFlag`]: cooperative cancellation for the control loop and stream driver
//! - [`spawn_control_thread`]: keystroke polling loop
//!
//! The analysis/synthesis math lives behind the [`VocoderBackend`] traits.
//!
//! # Example
//!
//! ```ignore
//! use voxframe_core::*;
//!
//! let modulation = Arc::new(ModulationChannel::new());
//! let mut session = Session::open(VocoderConfig::default(), backend, modulation.clone())?;
//!
//! // In the audio callback
//! session.process(&input, &mut output);
//!
//! let report = session.close();
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::VocoderConfig;

pub(crate) mod lockfree;
pub use lockfree::{AtomicDouble, AtomicFlag};

pub mod modulation;
pub use modulation::{
    Command, ModulationChannel, ModulationSnapshot, ModulationTarget, MODULATION_STEP, QUIT_KEY,
};

mod run_flag;
pub use run_flag::RunFlag;

pub mod frame;
pub use frame::{AnalysisFrame, FrameAssembler};

pub mod engine;
pub use engine::{
    AperiodicityAnalyzer, EnvelopeAnalyzer, PitchAnalyzer, SynthesisFrame, Synthesizer,
    VocoderBackend,
};

pub mod stage;
pub use stage::{modulate_pitch, FrameOutcome, ModulatedPitch, Slot, Stage, ANALYSIS_SEQUENCE};

mod session;
pub use session::{Session, SessionHandle, SessionReport};

mod pipeline;
pub use pipeline::process;

pub mod control;
pub use control::{run_control_loop, spawn_control_thread, KeySource, POLL_INTERVAL};

pub use std::sync::Arc;
