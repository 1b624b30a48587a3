//! Vocoder that ties a session, the control thread and a transport together

use crate::core::{
    spawn_control_thread, Arc, KeySource, ModulationChannel, RunFlag, VocoderConfig,
};
use crate::engine::ReferenceBackend;
use crate::io::FileRun;
use crate::Result;
use std::io::Write;
use std::path::Path;
use std::thread::JoinHandle;

/// One configured vocoder: the validated config, the reference engine and
/// the state shared with the control thread.
///
/// The [`ModulationChannel`] outlives individual sessions, so multipliers
/// set before a run (or carried over from a previous one) apply from its
/// first frame.
///
/// # Example
///
/// ```ignore
/// use voxframe::prelude::*;
///
/// let vocoder = Vocoder::builder().build()?;
/// vocoder.modulation().set(ModulationTarget::Synthesis, 1.5);
///
/// let control = vocoder.spawn_control(TerminalKeys::new()?, std::io::stdout())?;
/// let report = vocoder.run_live()?;
/// vocoder.stop();
/// control.join();
/// ```
pub struct Vocoder {
    config: VocoderConfig,
    buffer_size: usize,
    backend: ReferenceBackend,
    modulation: Arc<ModulationChannel>,
    run: RunFlag,
}

impl Vocoder {
    /// Create a new vocoder builder
    pub fn builder() -> crate::VocoderBuilder {
        crate::VocoderBuilder::default()
    }

    pub(crate) fn from_parts(
        config: VocoderConfig,
        buffer_size: usize,
        backend: ReferenceBackend,
        modulation: Arc<ModulationChannel>,
        run: RunFlag,
    ) -> Self {
        Self {
            config,
            buffer_size,
            backend,
            modulation,
            run,
        }
    }

    pub fn config(&self) -> &VocoderConfig {
        &self.config
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn modulation(&self) -> &Arc<ModulationChannel> {
        &self.modulation
    }

    pub fn run_flag(&self) -> &RunFlag {
        &self.run
    }

    pub fn is_running(&self) -> bool {
        self.run.is_running()
    }

    /// Ask the control thread and the live driver to wind down.
    pub fn stop(&self) {
        self.run.stop();
    }

    /// Start the keystroke loop on its own thread. It ends on the quit key,
    /// on [`stop`](Self::stop), or on a key source error.
    pub fn spawn_control<K, W>(
        &self,
        keys: K,
        status: W,
    ) -> Result<JoinHandle<crate::core::Result<()>>>
    where
        K: KeySource + Send + 'static,
        W: Write + Send + 'static,
    {
        Ok(spawn_control_thread(
            keys,
            self.modulation.clone(),
            self.run.clone(),
            status,
        )?)
    }

    /// Process a mono WAV file into a 32-bit float mono WAV file.
    pub fn process_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<FileRun> {
        Ok(crate::io::process_file(
            input,
            output,
            self.config.clone(),
            self.backend,
            self.modulation.clone(),
            self.buffer_size,
        )?)
    }

    /// Stream the default input device to the default output device until
    /// the run flag is stopped.
    #[cfg(feature = "live")]
    pub fn run_live(&self) -> Result<crate::core::SessionReport> {
        Ok(crate::io::run_realtime(
            self.config.clone(),
            self.backend,
            self.modulation.clone(),
            &self.run,
            self.buffer_size,
        )?)
    }
}
