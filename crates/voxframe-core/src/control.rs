//! Control thread: keystrokes to modulation updates.
//!
//! The loop polls a [`KeySource`] without blocking, sleeps [`POLL_INTERVAL`]
//! when no key is pending, and stops when the [`RunFlag`] is cleared or the
//! quit key arrives. The key source is owned by the loop and dropped on every
//! exit path, so a source that holds terminal state restores it in `Drop`.

use crate::modulation::{Command, ModulationChannel};
use crate::run_flag::RunFlag;
use crate::Result;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Sleep between polls when no key is pending.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Non-blocking single-key input.
pub trait KeySource {
    /// Return the next pending key, or `None` if nothing is available.
    fn read_key(&mut self) -> io::Result<Option<char>>;
}

impl<K: KeySource + ?Sized> KeySource for Box<K> {
    fn read_key(&mut self) -> io::Result<Option<char>> {
        (**self).read_key()
    }
}

/// Run the control loop on the current thread until stopped.
///
/// Any read or status write error stops `run` and is returned.
pub fn run_control_loop<K, W>(
    mut keys: K,
    modulation: &ModulationChannel,
    run: &RunFlag,
    status: &mut W,
) -> Result<()>
where
    K: KeySource,
    W: Write,
{
    while run.is_running() {
        match poll_once(&mut keys, modulation, status) {
            Ok(Some(Command::Quit)) => {
                tracing::debug!("quit key received");
                run.stop();
                break;
            }
            Ok(_) => {}
            Err(err) => {
                run.stop();
                return Err(err.into());
            }
        }
    }
    Ok(())
}

/// One iteration: read a key, apply it, redraw the status line.
fn poll_once<K, W>(
    keys: &mut K,
    modulation: &ModulationChannel,
    status: &mut W,
) -> io::Result<Option<Command>>
where
    K: KeySource,
    W: Write,
{
    let Some(key) = keys.read_key()? else {
        thread::sleep(POLL_INTERVAL);
        return Ok(None);
    };

    let command = Command::from_key(key);
    if let Some(command) = command.filter(|c| *c != Command::Quit) {
        modulation.apply(command);
        status.write_all(modulation.status_line().as_bytes())?;
        status.flush()?;
    }
    Ok(command)
}

/// Spawn the control loop on a named thread.
pub fn spawn_control_thread<K, W>(
    keys: K,
    modulation: Arc<ModulationChannel>,
    run: RunFlag,
    mut status: W,
) -> io::Result<JoinHandle<Result<()>>>
where
    K: KeySource + Send + 'static,
    W: Write + Send + 'static,
{
    thread::Builder::new()
        .name("voxframe-control".into())
        .spawn(move || run_control_loop(keys, &modulation, &run, &mut status))
}
