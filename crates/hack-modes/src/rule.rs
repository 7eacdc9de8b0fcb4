//! rule.rs — per-cell rewrite rules behind every behavior mode
//!
//! A rule looks at one cell's current value and either leaves it alone (`None`) or names the
//! value to write. Rules never read cells other than the ones they write.

use hack_env::{EnvError, Environment};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition { pub from: u8, pub to: u8 }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Clamp { pub threshold: u8, pub value: u8 }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModeRule {
    /// Write `value` every step.
    Pin { value: u8 },
    /// Exact-match jumps between boundary sentinels; any other value is untouched.
    Bounce { transitions: &'static [Transition] },
    /// Sawtooth: `v < upper` advances by `step` (saturating), `v > upper` drops to `floor`.
    Ramp { upper: u8, step: u8, floor: u8 },
    /// Values above `above.threshold` become `above.value`, below `below.threshold` become `below.value`.
    ClampBand { above: Option<Clamp>, below: Option<Clamp> },
}

impl ModeRule {
    pub fn next_value(&self, v: u8) -> Option<u8> {
        match *self {
            ModeRule::Pin { value } => Some(value),
            ModeRule::Bounce { transitions } => transitions.iter().find(|t| t.from == v).map(|t| t.to),
            ModeRule::Ramp { upper, step, floor } => {
                if v < upper { Some(v.saturating_add(step)) }
                else if v > upper { Some(floor) }
                else { None }
            }
            ModeRule::ClampBand { above, below } => {
                if let Some(c) = above.filter(|c| v > c.threshold) { return Some(c.value); }
                below.filter(|c| v < c.threshold).map(|c| c.value)
            }
        }
    }

    /// Rewrite `cells` in place. Each cell is read once, before its write. Returns the number
    /// of writes issued.
    pub fn apply_to<E: Environment + ?Sized>(&self, env: &mut E, cells: &[usize]) -> Result<usize, EnvError> {
        let mut writes = 0;
        for &cell in cells {
            let current = *env.get_memory().get(cell)
                .ok_or(EnvError::InvalidMemoryIndex { index: cell as i64, len: env.ram_len() })?;
            if let Some(next) = self.next_value(current) {
                env.set_memory(cell, next)?;
                writes += 1;
            }
        }
        Ok(writes)
    }
}
