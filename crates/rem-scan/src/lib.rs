//! rem-scan — find the RAM cells behind a screen pixel and poke at them
//!
//! `scanner` zeroes one cell at a time, steps the environment and watches a single pixel.
//! `inspector`, `grid` and `session` are the host-side pieces of the interactive RAM view.

pub mod cli;
pub mod error;
pub mod grid;
pub mod inspector;
pub mod scanner;
pub mod session;

pub use crate::error::{ScanError, SessionError};
pub use crate::inspector::RamInspector;
pub use crate::scanner::*;
pub use crate::session::{Command, Session};
