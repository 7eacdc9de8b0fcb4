//! config.rs — which mode each entity class runs, from JSON or from modif tokens
//!
//! A modif token is an entity-class prefix followed by the mode number: `s3`, `fish1`,
//! `shark_4`. The prefix must name exactly one class of the game.

use crate::error::PatchError;
use crate::games;
use crate::table::GameTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_GAME: &str = "FishingDerby";

// ── ModeConfig ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModeConfig {
    modes: BTreeMap<String, u8>,
}

impl ModeConfig {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, entity: impl Into<String>, mode: u8) -> Self {
        self.set(entity, mode);
        self
    }

    pub fn set(&mut self, entity: impl Into<String>, mode: u8) {
        self.modes.insert(entity.into(), mode);
    }

    /// 0 (unmodified) for classes not mentioned.
    pub fn mode_for(&self, entity: &str) -> u8 {
        self.modes.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(entity))
            .map(|(_, &m)| m)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.modes.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn is_unmodified(&self) -> bool { self.modes.values().all(|&m| m == 0) }

    /// Later entries override earlier ones for the same class.
    pub fn merged(&self, other: &ModeConfig) -> ModeConfig {
        let mut out = self.clone();
        for (k, v) in other.iter() {
            out.modes.retain(|existing, _| !existing.eq_ignore_ascii_case(k));
            out.set(k, v);
        }
        out
    }

    pub fn from_modifs<S: AsRef<str>>(game: &GameTable, modifs: &[S]) -> Result<Self, PatchError> {
        let mut cfg = ModeConfig::new();
        for token in modifs {
            let (entity, mode) = parse_modif(game, token.as_ref())?;
            cfg = cfg.merged(&ModeConfig::new().with(entity, mode));
        }
        Ok(cfg)
    }
}

/// Split `fish1` into the canonical class name and mode.
pub fn parse_modif<'g>(game: &'g GameTable, token: &str) -> Result<(&'g str, u8), PatchError> {
    let token = token.trim();
    let head = token.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &token[head.len()..];
    let prefix = head.trim_end_matches(['_', '-']);
    if digits.is_empty() || prefix.is_empty() {
        return Err(PatchError::BadModif(token.into()));
    }
    let mode: u8 = digits.parse().map_err(|_| PatchError::BadModif(token.into()))?;
    let class = game.entity_by_prefix(prefix)?;
    Ok((class.name, mode))
}

// ── HackConfig (JSON file) ────────────────────────────────────────────────────

/// On-disk run configuration. `switch_modifs` are layered over the initial modes once the
/// host reaches `switch_frame`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HackConfig {
    #[serde(default = "default_game")]
    pub game: String,
    #[serde(default)]
    pub modes: ModeConfig,
    #[serde(default)]
    pub modifs: Vec<String>,
    #[serde(default)]
    pub switch_modifs: Vec<String>,
    #[serde(default)]
    pub switch_frame: u64,
}

fn default_game() -> String { DEFAULT_GAME.into() }

impl Default for HackConfig {
    fn default() -> Self {
        Self {
            game: default_game(),
            modes: ModeConfig::default(),
            modifs: vec![],
            switch_modifs: vec![],
            switch_frame: 0,
        }
    }
}

impl HackConfig {
    pub fn load(path: &Path) -> Result<Self, PatchError> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| PatchError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&s)
    }

    pub fn from_json(s: &str) -> Result<Self, PatchError> {
        serde_json::from_str(s).map_err(|e| PatchError::Config(e.to_string()))
    }

    pub fn table(&self) -> Result<&'static GameTable, PatchError> {
        games::lookup(&self.game).ok_or_else(|| PatchError::UnknownGame(self.game.clone()))
    }

    /// `modes` with `modifs` applied on top.
    pub fn initial_modes(&self) -> Result<ModeConfig, PatchError> {
        let table = self.table()?;
        Ok(self.modes.merged(&ModeConfig::from_modifs(table, &self.modifs)?))
    }

    /// Modes in force from `switch_frame` on, or None when there is no switch.
    pub fn switch_modes(&self) -> Result<Option<ModeConfig>, PatchError> {
        if self.switch_modifs.is_empty() { return Ok(None); }
        let table = self.table()?;
        let switched = ModeConfig::from_modifs(table, &self.switch_modifs)?;
        Ok(Some(self.initial_modes()?.merged(&switched)))
    }
}
