use hack_env::EnvError;
use hack_modes::PatchError;
use std::fmt;

// ── ScanError ─────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    OutOfRangePixel { x: usize, y: usize, width: usize, height: usize },
    NoProbeValues,
    Env(EnvError),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::OutOfRangePixel { x, y, width, height } => {
                write!(f, "OutOfRangePixel: ({x}, {y}) outside {width}x{height} frame")
            }
            ScanError::NoProbeValues => write!(f, "scan needs at least one probe value"),
            ScanError::Env(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ScanError {}

impl From<EnvError> for ScanError {
    fn from(e: EnvError) -> Self { ScanError::Env(e) }
}

// ── SessionError ──────────────────────────────────────────────────────────────
#[derive(Debug)]
pub enum SessionError {
    Parse(String),
    Paused,
    NotPaused,
    Env(EnvError),
    Scan(ScanError),
    Patch(PatchError),
    Io(std::io::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Parse(s) => write!(f, "{s}"),
            SessionError::Paused => write!(f, "paused (use 'pause' to resume)"),
            SessionError::NotPaused => write!(f, "pause first (use 'pause')"),
            SessionError::Env(e) => write!(f, "{e}"),
            SessionError::Scan(e) => write!(f, "{e}"),
            SessionError::Patch(e) => write!(f, "{e}"),
            SessionError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<EnvError> for SessionError {
    fn from(e: EnvError) -> Self { SessionError::Env(e) }
}

impl From<ScanError> for SessionError {
    fn from(e: ScanError) -> Self { SessionError::Scan(e) }
}

impl From<PatchError> for SessionError {
    fn from(e: PatchError) -> Self { SessionError::Patch(e) }
}

impl From<std::io::Error> for SessionError {
    fn from(e: std::io::Error) -> Self { SessionError::Io(e) }
}
