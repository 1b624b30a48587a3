//! Live pitch modulation shared between the control thread and the audio thread.
//!
//! Three independent multipliers scale the estimated pitch before it reaches
//! aperiodicity analysis, spectral-envelope analysis and resynthesis. Each
//! scalar is its own atomic, so concurrent updates resolve as
//! last-write-wins per field and the audio thread never takes a lock.

use crate::lockfree::AtomicDouble;
use serde::{Deserialize, Serialize};

/// Increment applied by one modulation keystroke.
pub const MODULATION_STEP: f64 = 0.1;

/// Key that stops the session.
pub const QUIT_KEY: char = 'x';

/// Pipeline stage a modulation scalar feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModulationTarget {
    Aperiodicity,
    Envelope,
    Synthesis,
}

/// Action decoded from one keystroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Adjust { target: ModulationTarget, delta: f64 },
    Quit,
}

impl Command {
    /// Decode a keystroke. Unrecognized keys yield `None`.
    pub fn from_key(key: char) -> Option<Self> {
        use ModulationTarget::*;
        let (target, delta) = match key {
            'q' => (Aperiodicity, MODULATION_STEP),
            'a' => (Aperiodicity, -MODULATION_STEP),
            'w' => (Envelope, MODULATION_STEP),
            's' => (Envelope, -MODULATION_STEP),
            'e' => (Synthesis, MODULATION_STEP),
            'd' => (Synthesis, -MODULATION_STEP),
            QUIT_KEY => return Some(Command::Quit),
            _ => return None,
        };
        Some(Command::Adjust { target, delta })
    }
}

/// One consistent read of the three multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModulationSnapshot {
    pub pitch_for_ap: f64,
    pub pitch_for_sp: f64,
    pub pitch_for_synthesis: f64,
}

impl Default for ModulationSnapshot {
    fn default() -> Self {
        Self {
            pitch_for_ap: 1.0,
            pitch_for_sp: 1.0,
            pitch_for_synthesis: 1.0,
        }
    }
}

/// Shared modulation state. Written by the control thread, read by the audio thread.
#[derive(Debug)]
pub struct ModulationChannel {
    pitch_for_ap: AtomicDouble,
    pitch_for_sp: AtomicDouble,
    pitch_for_synthesis: AtomicDouble,
}

impl Default for ModulationChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ModulationChannel {
    pub fn new() -> Self {
        Self {
            pitch_for_ap: AtomicDouble::new(1.0),
            pitch_for_sp: AtomicDouble::new(1.0),
            pitch_for_synthesis: AtomicDouble::new(1.0),
        }
    }

    fn scalar(&self, target: ModulationTarget) -> &AtomicDouble {
        match target {
            ModulationTarget::Aperiodicity => &self.pitch_for_ap,
            ModulationTarget::Envelope => &self.pitch_for_sp,
            ModulationTarget::Synthesis => &self.pitch_for_synthesis,
        }
    }

    /// RT-safe read of all three multipliers.
    #[inline]
    pub fn read(&self) -> ModulationSnapshot {
        ModulationSnapshot {
            pitch_for_ap: self.pitch_for_ap.get(),
            pitch_for_sp: self.pitch_for_sp.get(),
            pitch_for_synthesis: self.pitch_for_synthesis.get(),
        }
    }

    pub fn get(&self, target: ModulationTarget) -> f64 {
        self.scalar(target).get()
    }

    /// No clamping: the value is stored as given.
    pub fn set(&self, target: ModulationTarget, value: f64) {
        self.scalar(target).set(value);
    }

    /// Apply a decoded command. Returns `false` for [`Command::Quit`], which
    /// leaves the scalars untouched.
    pub fn apply(&self, command: Command) -> bool {
        match command {
            Command::Adjust { target, delta } => {
                self.scalar(target).add(delta);
                true
            }
            Command::Quit => false,
        }
    }

    pub fn reset(&self) {
        self.pitch_for_ap.set(1.0);
        self.pitch_for_sp.set(1.0);
        self.pitch_for_synthesis.set(1.0);
    }

    /// One-line status display, carriage-return prefixed so it redraws in place.
    pub fn status_line(&self) -> String {
        let snapshot = self.read();
        format!(
            "\r[fo_mod_ap: {:.2}] [fo_mod_sp: {:.2}] [fo_mod_syn: {:.2}]        ",
            snapshot.pitch_for_ap, snapshot.pitch_for_sp, snapshot.pitch_for_synthesis
        )
    }
}
