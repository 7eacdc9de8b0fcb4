//! env.rs — the Environment collaborator consumed by the patcher and the scanner

use crate::error::EnvError;
use crate::frame::Frame;
use serde::{Deserialize, Serialize};

// ── Actions ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Noop,
    Fire,
    Left,
    Right,
}

impl Action {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "noop" | "0" => Some(Action::Noop),
            "fire" | "1" => Some(Action::Fire),
            "left" | "l" => Some(Action::Left),
            "right" | "r" => Some(Action::Right),
            _ => None,
        }
    }
}

// ── Step outcome ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    pub frame_number: u64,
    pub score: u8,
}

#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub frame: Frame,
    pub reward: f32,
    pub done: bool,
    pub info: StepInfo,
}

// ── Environment ───────────────────────────────────────────────────────────────

/// A steppable machine whose whole addressable state is a fixed-length byte array.
///
/// Callers are strictly sequential: no method is expected to be invoked concurrently.
pub trait Environment {
    /// Current RAM, length N.
    fn get_memory(&self) -> &[u8];

    /// Write one cell. Fails with `InvalidMemoryIndex` (and writes nothing) when `index >= N`.
    fn set_memory(&mut self, index: usize, value: u8) -> Result<(), EnvError>;

    /// Advance the machine by one frame.
    fn step(&mut self, action: Action) -> StepOutcome;

    /// Render the current state without advancing it.
    fn render(&self) -> Frame;

    /// Return to the start-of-episode state.
    fn reset(&mut self);

    fn ram_len(&self) -> usize {
        self.get_memory().len()
    }

    /// Write a full snapshot back, cell by cell. The length is checked before any write.
    fn restore_memory(&mut self, snapshot: &[u8]) -> Result<(), EnvError> {
        let expected = self.ram_len();
        if snapshot.len() != expected {
            return Err(EnvError::SnapshotLength { expected, got: snapshot.len() });
        }
        for (i, &v) in snapshot.iter().enumerate() {
            self.set_memory(i, v)?;
        }
        Ok(())
    }
}

/// Opaque whole-machine state, saved and loaded by the host.
pub trait Snapshot {
    fn save_state(&self) -> Vec<u8>;

    /// Load a blob produced by `save_state`. On error the machine is left untouched.
    fn load_state(&mut self, data: &[u8]) -> Result<(), EnvError>;

    fn save_state_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        std::fs::write(path, self.save_state())
    }

    fn load_state_from_file(&mut self, path: &std::path::Path) -> std::io::Result<()> {
        let data = std::fs::read(path)?;
        self.load_state(&data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }
}
