//! inspector.rs — RAM cell editing state behind the grid view
//!
//! Typed values are committed through a checked write (values above 255 are rejected and RAM
//! is left as it was). Wheel-style increment/decrement saturate at 0 and 255.

use hack_env::memory::{check_index, write_checked, write_clamped};
use hack_env::{EnvError, Environment};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct RamInspector {
    active: Option<usize>,
    input: String,
    hidden: BTreeSet<usize>,
    candidates: BTreeSet<usize>,
}

impl RamInspector {
    pub fn new() -> Self { Self::default() }

    pub fn with_hidden(cells: impl IntoIterator<Item = usize>) -> Self {
        RamInspector { hidden: cells.into_iter().collect(), ..Self::default() }
    }

    pub fn select(&mut self, cell: usize) {
        self.active = Some(cell);
        self.input.clear();
    }

    pub fn active(&self) -> Option<usize> { self.active }

    pub fn input(&self) -> &str { &self.input }

    /// Appends a digit to the pending value. Ignored without an active cell.
    pub fn push_digit(&mut self, c: char) -> bool {
        if self.active.is_none() || !c.is_ascii_digit() { return false; }
        self.input.push(c);
        true
    }

    pub fn backspace(&mut self) {
        if self.active.is_some() { self.input.pop(); }
    }

    pub fn cancel(&mut self) {
        self.active = None;
        self.input.clear();
    }

    /// Write the pending value to the active cell and unselect it. An empty input just
    /// unselects.
    pub fn commit<E: Environment + ?Sized>(&mut self, env: &mut E) -> Result<Option<u8>, EnvError> {
        let Some(cell) = self.active else { return Ok(None) };
        let input = std::mem::take(&mut self.input);
        self.active = None;
        if input.is_empty() { return Ok(None); }
        // digit-only input; too many digits for i64 is still just "too large"
        let value = input.parse::<i64>().unwrap_or(i64::MAX);
        write_checked(env, cell as i64, value)?;
        Ok(Some(value as u8))
    }

    pub fn increment<E: Environment + ?Sized>(&self, env: &mut E, cell: usize) -> Result<u8, EnvError> {
        let idx = check_index(env, cell as i64)?;
        let v = env.get_memory()[idx];
        write_clamped(env, cell as i64, v as i64 + 1)
    }

    pub fn decrement<E: Environment + ?Sized>(&self, env: &mut E, cell: usize) -> Result<u8, EnvError> {
        let idx = check_index(env, cell as i64)?;
        let v = env.get_memory()[idx];
        write_clamped(env, cell as i64, v as i64 - 1)
    }

    /// Returns whether the cell is hidden afterwards.
    pub fn toggle_hidden(&mut self, cell: usize) -> bool {
        if self.hidden.remove(&cell) { return false; }
        self.hidden.insert(cell);
        true
    }

    pub fn is_hidden(&self, cell: usize) -> bool { self.hidden.contains(&cell) }

    pub fn hidden(&self) -> &BTreeSet<usize> { &self.hidden }

    pub fn set_candidates(&mut self, cells: BTreeSet<usize>) { self.candidates = cells; }

    pub fn candidates(&self) -> &BTreeSet<usize> { &self.candidates }

    pub fn is_candidate(&self, cell: usize) -> bool { self.candidates.contains(&cell) }
}
