//! hack-env — environment contract shared by the RAM patcher and the causative-cell scanner
//!
//! An environment owns a fixed-length RAM snapshot (one byte per cell), advances one step per
//! action and renders an RGB frame. `SpriteMachine` is the reference implementation used by the
//! runners and tests.

pub mod env;
pub mod error;
pub mod frame;
pub mod machine;
pub mod memory;

pub use crate::env::*;
pub use crate::error::EnvError;
pub use crate::frame::{Frame, Rgb};
pub use crate::machine::SpriteMachine;
