//! memory.rs — validated writes from host-side (wide, possibly negative) integers
//!
//! `write_checked` rejects anything out of range and is meant for programmatic writes.
//! `write_clamped` only rejects a bad index and saturates the value; interactive
//! increment/decrement edits go through it.

use crate::env::Environment;
use crate::error::EnvError;

pub const CELL_MAX: i64 = u8::MAX as i64;

/// Short-lived restore point: a private copy of the current RAM.
pub fn snapshot<E: Environment + ?Sized>(env: &E) -> Vec<u8> {
    env.get_memory().to_vec()
}

pub fn check_index<E: Environment + ?Sized>(env: &E, index: i64) -> Result<usize, EnvError> {
    let len = env.ram_len();
    if index < 0 || index >= len as i64 {
        return Err(EnvError::InvalidMemoryIndex { index, len });
    }
    Ok(index as usize)
}

pub fn write_checked<E: Environment + ?Sized>(env: &mut E, index: i64, value: i64) -> Result<(), EnvError> {
    let cell = check_index(env, index)?;
    if !(0..=CELL_MAX).contains(&value) {
        return Err(EnvError::InvalidMemoryValue { index, value });
    }
    env.set_memory(cell, value as u8)
}

/// Returns the value actually written.
pub fn write_clamped<E: Environment + ?Sized>(env: &mut E, index: i64, value: i64) -> Result<u8, EnvError> {
    let cell = check_index(env, index)?;
    let v = value.clamp(0, CELL_MAX) as u8;
    env.set_memory(cell, v)?;
    Ok(v)
}

/// Cells whose value differs between two snapshots of equal length.
pub fn diff(before: &[u8], after: &[u8]) -> Vec<(usize, u8, u8)> {
    before.iter().zip(after).enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, (&a, &b))| (i, a, b))
        .collect()
}
