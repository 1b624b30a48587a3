mod cli;

use std::io;
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use voxframe::io::LogWriter;
use voxframe::{SessionReport, TerminalKeys, Vocoder};

use cli::{Cli, Mode};

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let options = cli.command.options().clone();

    // Validate against the rate the session will actually run at.
    let builder = options.builder()?;
    let builder = match &cli.command {
        Mode::File { input, .. } => {
            let rate = voxframe::io::probe_sample_rate(input)
                .with_context(|| format!("open {}", input.display()))?;
            builder.sample_rate(f64::from(rate))
        }
        #[cfg(feature = "live")]
        Mode::Live {
            sample_rate: Some(rate),
            ..
        } => builder.sample_rate(f64::from(*rate)),
        #[cfg(feature = "live")]
        Mode::Live { .. } => builder,
    };
    let vocoder = builder.build()?;

    let control = if options.no_control {
        None
    } else {
        spawn_control(&vocoder)
    };

    let result = run(&vocoder, &cli.command);

    // Shutdown order: stop the flag, then join the control thread.
    vocoder.stop();
    if let Some(handle) = control {
        match handle.join() {
            Ok(Ok(())) => {}
            Ok(Err(error)) => tracing::warn!(%error, "control thread failed"),
            Err(_) => tracing::warn!("control thread panicked"),
        }
    }

    let report = result?;
    tracing::info!(
        samples = report.samples_processed,
        frames = report.frames_analyzed,
        non_finite = report.non_finite_samples,
        "session report"
    );
    println!("\nExited cleanly.");
    Ok(())
}

fn run(vocoder: &Vocoder, mode: &Mode) -> Result<SessionReport> {
    match mode {
        Mode::File { input, output, .. } => {
            let run = vocoder.process_file(input, output)?;
            Ok(run.report)
        }
        #[cfg(feature = "live")]
        Mode::Live { .. } => Ok(vocoder.run_live()?),
    }
}

/// Without a terminal (piped stdin, CI) the run proceeds with fixed multipliers.
fn spawn_control(vocoder: &Vocoder) -> Option<JoinHandle<voxframe::core::Result<()>>> {
    let keys = match TerminalKeys::new() {
        Ok(keys) => keys,
        Err(error) => {
            tracing::warn!(%error, "terminal unavailable, running without key control");
            return None;
        }
    };
    match vocoder.spawn_control(keys, io::stdout()) {
        Ok(handle) => Some(handle),
        Err(error) => {
            tracing::warn!(%error, "failed to start control thread");
            None
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(LogWriter::new)
        .try_init();
}
