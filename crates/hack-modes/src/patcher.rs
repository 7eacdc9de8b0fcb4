//! patcher.rs — applies the selected mode of every entity class once per step
//!
//! Modes are fixed when the `Patcher` is built. Different modes later in a run (switch frame)
//! come from a second `Patcher` that `PatchedEnv` installs once it reaches that step.

use crate::config::{HackConfig, ModeConfig};
use crate::error::PatchError;
use crate::table::{GameTable, ModeEntry};
use hack_env::{Action, EnvError, Environment, Frame, Snapshot, StepOutcome};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy)]
pub struct ActiveMode {
    pub entity: &'static str,
    pub entry: &'static ModeEntry,
}

#[derive(Debug, Clone)]
pub struct Patcher {
    game: &'static GameTable,
    active: Vec<ActiveMode>,
}

impl Patcher {
    pub fn new(game: &'static GameTable, config: &ModeConfig) -> Result<Self, PatchError> {
        game.validate()?;
        let mut seen = BTreeSet::new();
        let mut active = vec![];
        for (name, mode) in config.iter() {
            let class = game.entity(name).ok_or_else(|| PatchError::UnknownEntity {
                game: game.name.into(),
                entity: name.into(),
            })?;
            if !seen.insert(class.name) {
                return Err(PatchError::DuplicateEntity(class.name.into()));
            }
            if mode == 0 { continue; }
            let entry = class.mode(mode)
                .ok_or_else(|| PatchError::UnknownMode { entity: class.name.into(), mode })?;
            log::info!("{}: {} mode {} ({})", game.name, class.name, mode, entry.label);
            active.push(ActiveMode { entity: class.name, entry });
        }
        Ok(Patcher { game, active })
    }

    pub fn unmodified(game: &'static GameTable) -> Self {
        Patcher { game, active: vec![] }
    }

    pub fn game(&self) -> &'static GameTable { self.game }

    pub fn active(&self) -> &[ActiveMode] { &self.active }

    pub fn is_empty(&self) -> bool { self.active.is_empty() }

    /// Cells written by the active modes.
    pub fn cells(&self) -> BTreeSet<usize> {
        self.active.iter().flat_map(|a| a.entry.cells.iter().copied()).collect()
    }

    pub fn check_bounds(&self, ram_len: usize) -> Result<(), PatchError> {
        match self.cells().into_iter().find(|&c| c >= ram_len) {
            Some(cell) => Err(PatchError::CellOutOfRange { cell, len: ram_len }),
            None => Ok(()),
        }
    }

    /// One step's worth of overrides. Must run every step; the override is not self-sustaining.
    pub fn apply<E: Environment + ?Sized>(&self, env: &mut E) -> Result<(), EnvError> {
        for a in &self.active {
            let writes = a.entry.rule.apply_to(env, a.entry.cells)?;
            if writes > 0 {
                log::trace!("{} mode {}: {} write(s)", a.entity, a.entry.mode, writes);
            }
        }
        Ok(())
    }
}

// ── PatchedEnv ────────────────────────────────────────────────────────────────

/// Environment adapter that runs the patcher right before every inner step, so the frame the
/// step returns already reflects the override.
///
/// An optional switch patcher takes over once the adapter has taken `switch_frame` steps. Every
/// step counts, scan probes included. `reset` starts the count again from zero.
pub struct PatchedEnv<E> {
    inner: E,
    patcher: Patcher,
    switch: Option<(u64, Patcher)>,
    steps: u64,
}

impl<E: Environment> PatchedEnv<E> {
    pub fn new(inner: E, patcher: Patcher) -> Result<Self, PatchError> {
        patcher.check_bounds(inner.ram_len())?;
        Ok(PatchedEnv { inner, patcher, switch: None, steps: 0 })
    }

    /// Initial and switch patchers for a run configuration.
    pub fn from_config(inner: E, config: &HackConfig) -> Result<Self, PatchError> {
        let table = config.table()?;
        let initial = config.initial_modes()?;
        if initial.is_unmodified() {
            log::info!("{}: no modifications at start", table.name);
        }
        let env = PatchedEnv::new(inner, Patcher::new(table, &initial)?)?;
        match config.switch_modes()? {
            Some(modes) => env.with_switch(config.switch_frame, Patcher::new(table, &modes)?),
            None => Ok(env),
        }
    }

    pub fn with_switch(mut self, frame: u64, patcher: Patcher) -> Result<Self, PatchError> {
        patcher.check_bounds(self.inner.ram_len())?;
        if patcher.game().name != self.patcher.game().name {
            return Err(PatchError::Config(format!(
                "switch modes are for {}, the run uses {}",
                patcher.game().name,
                self.patcher.game().name
            )));
        }
        self.switch = Some((frame, patcher));
        Ok(self)
    }

    /// Replaces the patcher used before the switch frame.
    pub fn replace_patcher(&mut self, patcher: Patcher) -> Result<(), PatchError> {
        patcher.check_bounds(self.inner.ram_len())?;
        self.patcher = patcher;
        Ok(())
    }

    /// Patcher in force for the next step.
    pub fn patcher(&self) -> &Patcher {
        match &self.switch {
            Some((frame, p)) if self.steps >= *frame => p,
            _ => &self.patcher,
        }
    }

    pub fn is_switched(&self) -> bool {
        matches!(&self.switch, Some((frame, _)) if self.steps >= *frame)
    }

    pub fn steps(&self) -> u64 { self.steps }

    pub fn inner(&self) -> &E { &self.inner }
}

impl<E: Environment> Environment for PatchedEnv<E> {
    fn get_memory(&self) -> &[u8] { self.inner.get_memory() }

    fn set_memory(&mut self, index: usize, value: u8) -> Result<(), EnvError> {
        self.inner.set_memory(index, value)
    }

    fn step(&mut self, action: Action) -> StepOutcome {
        if matches!(&self.switch, Some((frame, _)) if self.steps == *frame) {
            log::info!("switch modes active from step {}", self.steps);
        }
        let patcher = match &self.switch {
            Some((frame, p)) if self.steps >= *frame => p,
            _ => &self.patcher,
        };
        // bounds were checked on construction, so a failure here means the inner env shrank
        if let Err(e) = patcher.apply(&mut self.inner) {
            log::warn!("patcher skipped: {e}");
        }
        self.steps += 1;
        self.inner.step(action)
    }

    fn render(&self) -> Frame { self.inner.render() }

    fn reset(&mut self) {
        self.steps = 0;
        self.inner.reset()
    }
}

impl<E: Snapshot> Snapshot for PatchedEnv<E> {
    fn save_state(&self) -> Vec<u8> { self.inner.save_state() }

    fn load_state(&mut self, data: &[u8]) -> Result<(), EnvError> { self.inner.load_state(data) }
}
