//! # Voxframe - Frame-synchronous Real-time Vocoder
//!
//! Analysis/resynthesis vocoder with live pitch modulation.
//!
//! ## Architecture
//!
//! Voxframe is an umbrella crate that coordinates:
//! - **voxframe-core** - Orchestration kernel (frame assembly, analysis sequence, session lifecycle, control loop)
//! - **voxframe-engine** - Reference engine (YIN pitch, band aperiodicity, cepstral envelope, pulse synthesis)
//! - **voxframe-io** - Transports (WAV files, live CPAL duplex, terminal keys)
//!
//! ## Quick Start
//!
//! ```ignore
//! use voxframe::prelude::*;
//!
//! let vocoder = Vocoder::builder()
//!     .frame_period_ms(5.0)
//!     .build()?;
//!
//! // Pitch multipliers can change at any time, from any thread
//! vocoder.modulation().set(ModulationTarget::Synthesis, 1.2);
//!
//! let run = vocoder.process_file("voice.wav", "voice-up.wav")?;
//! println!("{} frames", run.report.frames_analyzed);
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Everything below
//! - `live` - Live duplex streaming through CPAL

/// Re-export of voxframe-core for direct access
pub use voxframe_core as core;

/// Re-export of the reference engine
pub use voxframe_engine as engine;

/// Re-export of the transports
pub use voxframe_io as io;

pub use voxframe_core::{
    // Lock-free primitives
    AtomicDouble,
    AtomicFlag,

    // Modulation
    Command,
    ModulationChannel,
    ModulationSnapshot,
    ModulationTarget,

    // Cancellation
    RunFlag,

    // Session
    Session,
    SessionHandle,
    SessionReport,
    VocoderBackend,
    VocoderConfig,
};

pub use voxframe_engine::ReferenceBackend;
pub use voxframe_io::{FileRun, TerminalKeys};

mod error;
pub use error::{Error, Result};

mod builder;
mod vocoder;

pub use builder::VocoderBuilder;
pub use vocoder::Vocoder;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{Vocoder, VocoderBuilder};

    pub use crate::core::{
        Arc, ModulationChannel, ModulationTarget, RunFlag, SessionReport, VocoderConfig,
    };

    pub use crate::engine::ReferenceBackend;

    pub use crate::io::{FileRun, TerminalKeys};
}
