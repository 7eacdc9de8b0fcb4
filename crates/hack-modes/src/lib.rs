pub mod config;
pub mod error;
pub mod games;
pub mod patcher;
pub mod rule;
pub mod table;

pub use crate::config::*;
pub use crate::error::PatchError;
pub use crate::patcher::*;
pub use crate::rule::*;
pub use crate::table::*;
