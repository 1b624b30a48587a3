//! # Voxframe IO
//!
//! Transports that drive a `voxframe-core` session:
//! - **File**: mono WAV in, 32-bit float mono WAV out ([`process_file`])
//! - **Live**: default CPAL input and output devices ([`run_realtime`], `live` feature)
//! - **Terminal**: raw-mode key source for the control thread ([`TerminalKeys`])
//!   and a raw-mode-safe log writer ([`LogWriter`])
//!
//! Config files are JSON ([`load_config`]).

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{load_config, save_config};

pub mod file;
pub use file::{
    probe_sample_rate, process_file, read_mono, write_mono, FileRun, MonoClip, DEFAULT_BUFFER_SIZE,
};

pub mod playback;
pub use playback::{PlaybackRenderer, SharedSession, SCRATCH_FRAMES};

#[cfg(feature = "live")]
pub mod realtime;
#[cfg(feature = "live")]
pub use realtime::run_realtime;

pub mod terminal;
pub use terminal::{LogWriter, TerminalKeys};
