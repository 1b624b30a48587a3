//! Error types for voxframe-io.

use thiserror::Error;

/// Error type for transport operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] voxframe_core::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Invalid config file: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Only monaural audio is supported (input has {0} channels)")]
    UnsupportedChannels(u16),

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid device: {0}")]
    InvalidDevice(String),

    #[cfg(feature = "live")]
    #[error("Audio device not available")]
    DeviceNotAvailable(#[from] cpal::DefaultStreamConfigError),

    #[cfg(feature = "live")]
    #[error("Failed to build audio stream")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[cfg(feature = "live")]
    #[error("Failed to play audio stream")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
