use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    UnknownGame(String),
    UnknownEntity { game: String, entity: String },
    UnknownMode { entity: String, mode: u8 },
    BadModif(String),
    AmbiguousModif { token: String, matches: Vec<String> },
    ReservedMode { entity: String },
    DuplicateMode { entity: String, mode: u8 },
    DuplicateEntity(String),
    OverlappingCells { first: String, second: String, cell: usize },
    CellOutOfRange { cell: usize, len: usize },
    Config(String),
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::UnknownGame(g) => write!(f, "unknown game: {g}"),
            PatchError::UnknownEntity { game, entity } => write!(f, "{game} has no entity class '{entity}'"),
            PatchError::UnknownMode { entity, mode } => write!(f, "{entity} has no mode {mode}"),
            PatchError::BadModif(t) => write!(f, "malformed modification '{t}' (expected e.g. s3 or fish1)"),
            PatchError::AmbiguousModif { token, matches } => {
                write!(f, "modification '{token}' matches several entity classes: {matches:?}")
            }
            PatchError::ReservedMode { entity } => write!(f, "{entity}: mode 0 is reserved for the unmodified game"),
            PatchError::DuplicateMode { entity, mode } => write!(f, "{entity}: mode {mode} defined twice"),
            PatchError::DuplicateEntity(e) => write!(f, "entity class '{e}' given more than once"),
            PatchError::OverlappingCells { first, second, cell } => {
                write!(f, "entity classes {first} and {second} both write cell {cell}")
            }
            PatchError::CellOutOfRange { cell, len } => write!(f, "cell {cell} outside ram of {len} cells"),
            PatchError::Config(s) => write!(f, "config: {s}"),
        }
    }
}

impl std::error::Error for PatchError {}
