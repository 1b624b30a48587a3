//! Cooperative cancellation token shared by the control loop and the stream driver.

use crate::lockfree::AtomicFlag;
use std::sync::Arc;

/// Process-wide run flag. Starts running; any clone may stop it.
///
/// Stopping is one-way: once stopped a flag never runs again.
#[derive(Debug, Clone)]
pub struct RunFlag {
    running: Arc<AtomicFlag>,
}

impl RunFlag {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicFlag::new(true)),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Signal every holder to stop. Returns `true` if this call stopped it.
    pub fn stop(&self) -> bool {
        self.running.swap(false)
    }
}

impl Default for RunFlag {
    fn default() -> Self {
        Self::new()
    }
}
