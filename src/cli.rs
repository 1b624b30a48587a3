use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use voxframe::io::{load_config, DEFAULT_BUFFER_SIZE};
use voxframe::{VocoderBuilder, VocoderConfig};

#[derive(Debug, Parser)]
#[command(name = "voxframe", version)]
#[command(about = "Frame-synchronous vocoder with live pitch modulation")]
#[command(
    after_help = "Keys: q/a raise/lower aperiodicity pitch, w/s envelope pitch, e/d synthesis pitch, x quits."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Mode,
}

#[derive(Debug, Subcommand)]
pub enum Mode {
    /// Process a mono WAV file into a 32-bit float mono WAV file.
    File {
        input: PathBuf,
        output: PathBuf,

        #[command(flatten)]
        options: SessionOptions,
    },

    /// Stream the default input device to the default output device.
    #[cfg(feature = "live")]
    Live {
        /// Stream sample rate in Hz [default: 48000, or the config file's].
        #[arg(long)]
        sample_rate: Option<u32>,

        #[command(flatten)]
        options: SessionOptions,
    },
}

impl Mode {
    pub fn options(&self) -> &SessionOptions {
        match self {
            Mode::File { options, .. } => options,
            #[cfg(feature = "live")]
            Mode::Live { options, .. } => options,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct SessionOptions {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Analysis period in milliseconds.
    #[arg(long)]
    pub period_ms: Option<f64>,

    /// FFT size in samples (power of two).
    #[arg(long)]
    pub fft_size: Option<usize>,

    /// Lowest pitch searched for, in Hz.
    #[arg(long)]
    pub pitch_floor: Option<f64>,

    /// Highest pitch searched for, in Hz.
    #[arg(long)]
    pub pitch_ceiling: Option<f64>,

    /// Linear RMS below which a frame counts as silent.
    #[arg(long)]
    pub silence_threshold: Option<f64>,

    /// Samples per processing call.
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
    pub buffer_size: usize,

    /// Do not read keys from the terminal.
    #[arg(long)]
    pub no_control: bool,
}

impl SessionOptions {
    /// Builder from the config file (if any) with flag overrides applied.
    pub fn builder(&self) -> Result<VocoderBuilder> {
        let config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("load config {}", path.display()))?,
            None => VocoderConfig::default(),
        };

        let mut builder = VocoderBuilder::from_config(config).buffer_size(self.buffer_size);
        if let Some(period_ms) = self.period_ms {
            builder = builder.frame_period_ms(period_ms);
        }
        if let Some(fft_size) = self.fft_size {
            builder = builder.fft_size(fft_size);
        }
        if let Some(hz) = self.pitch_floor {
            builder = builder.pitch_floor(hz);
        }
        if let Some(hz) = self.pitch_ceiling {
            builder = builder.pitch_ceiling(hz);
        }
        if let Some(threshold) = self.silence_threshold {
            builder = builder.silence_threshold(threshold);
        }
        Ok(builder)
    }
}
