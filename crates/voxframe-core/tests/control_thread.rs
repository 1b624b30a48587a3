//! Control thread behaviour with scripted key sources.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use voxframe_core::*;

/// Scripted keys; reports `None` once the script runs out. Marks itself
/// restored when dropped, like a terminal guard.
struct ScriptedKeys {
    keys: VecDeque<char>,
    restored: Arc<AtomicBool>,
}

impl ScriptedKeys {
    fn new(keys: &str) -> (Self, Arc<AtomicBool>) {
        let restored = Arc::new(AtomicBool::new(false));
        (
            Self {
                keys: keys.chars().collect(),
                restored: restored.clone(),
            },
            restored,
        )
    }
}

impl KeySource for ScriptedKeys {
    fn read_key(&mut self) -> io::Result<Option<char>> {
        Ok(self.keys.pop_front())
    }
}

impl Drop for ScriptedKeys {
    fn drop(&mut self) {
        self.restored.store(true, Ordering::SeqCst);
    }
}

#[test]
fn test_five_increments_then_quit() {
    let modulation = Arc::new(ModulationChannel::new());
    let run = RunFlag::new();
    let (keys, restored) = ScriptedKeys::new("qqqqqx");

    let handle = spawn_control_thread(keys, modulation.clone(), run.clone(), io::sink()).unwrap();
    handle.join().unwrap().unwrap();

    assert!(!run.is_running());
    assert!(restored.load(Ordering::SeqCst));

    let snapshot = modulation.read();
    assert!((snapshot.pitch_for_ap - 1.5).abs() < 1e-9);
    assert_eq!(snapshot.pitch_for_sp, 1.0);
    assert_eq!(snapshot.pitch_for_synthesis, 1.0);
}

#[test]
fn test_quit_terminates_promptly() {
    let modulation = Arc::new(ModulationChannel::new());
    let run = RunFlag::new();
    let (keys, restored) = ScriptedKeys::new("x");

    let start = Instant::now();
    let handle = spawn_control_thread(keys, modulation, run.clone(), io::sink()).unwrap();
    handle.join().unwrap().unwrap();

    assert!(start.elapsed() < POLL_INTERVAL + Duration::from_millis(200));
    assert!(!run.is_running());
    assert!(restored.load(Ordering::SeqCst));
}

#[test]
fn test_external_stop_ends_idle_loop() {
    let modulation = Arc::new(ModulationChannel::new());
    let run = RunFlag::new();
    let (keys, restored) = ScriptedKeys::new("");

    let handle = spawn_control_thread(keys, modulation, run.clone(), io::sink()).unwrap();
    std::thread::sleep(Duration::from_millis(30));
    assert!(!handle.is_finished());

    let stopped_at = Instant::now();
    run.stop();
    handle.join().unwrap().unwrap();

    assert!(stopped_at.elapsed() < POLL_INTERVAL + Duration::from_millis(200));
    assert!(restored.load(Ordering::SeqCst));
}

#[test]
fn test_updates_are_visible_to_reader_thread() {
    let modulation = Arc::new(ModulationChannel::new());
    let run = RunFlag::new();
    let (keys, _) = ScriptedKeys::new("eeeddx");

    let handle = spawn_control_thread(keys, modulation.clone(), run.clone(), io::sink()).unwrap();
    handle.join().unwrap().unwrap();

    let reader = std::thread::spawn(move || modulation.read().pitch_for_synthesis);
    let value = reader.join().unwrap();
    assert!((value - 1.1).abs() < 1e-9);
}
