use std::fmt;

// ── Error ─────────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    /// Index outside `[0, len)`.
    InvalidMemoryIndex { index: i64, len: usize },
    /// Value outside `[0, 255]`.
    InvalidMemoryValue { index: i64, value: i64 },
    /// Restore snapshot does not match the environment's RAM length.
    SnapshotLength { expected: usize, got: usize },
    /// Opaque state blob could not be decoded.
    InvalidState(String),
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvError::InvalidMemoryIndex { index, len } => {
                write!(f, "InvalidMemoryIndex: {index} (ram has {len} cells)")
            }
            EnvError::InvalidMemoryValue { index, value } => {
                write!(f, "InvalidMemoryValue: {value} for cell {index} (must be 0..=255)")
            }
            EnvError::SnapshotLength { expected, got } => {
                write!(f, "SnapshotLength: expected {expected} cells, got {got}")
            }
            EnvError::InvalidState(s) => write!(f, "InvalidState: {s}"),
        }
    }
}

impl std::error::Error for EnvError {}
