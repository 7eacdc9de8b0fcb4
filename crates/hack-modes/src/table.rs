//! table.rs — static per-game hack tables: entity class → modes → (cells, rule)

use crate::error::PatchError;
use crate::rule::ModeRule;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Serialize)]
pub struct ModeEntry {
    pub mode: u8,
    pub label: &'static str,
    pub cells: &'static [usize],
    pub rule: ModeRule,
}

#[derive(Debug, Serialize)]
pub struct EntityClass {
    pub name: &'static str,
    pub modes: &'static [ModeEntry],
}

impl EntityClass {
    pub fn mode(&self, mode: u8) -> Option<&ModeEntry> {
        self.modes.iter().find(|m| m.mode == mode)
    }

    /// Every cell any of this class's modes may write.
    pub fn cells(&self) -> BTreeSet<usize> {
        self.modes.iter().flat_map(|m| m.cells.iter().copied()).collect()
    }
}

#[derive(Debug, Serialize)]
pub struct GameTable {
    pub name: &'static str,
    pub entities: &'static [EntityClass],
}

impl GameTable {
    pub fn entity(&self, name: &str) -> Option<&EntityClass> {
        self.entities.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Resolve a modif prefix ("s", "fi", "shark") to exactly one entity class.
    pub fn entity_by_prefix(&self, prefix: &str) -> Result<&EntityClass, PatchError> {
        if let Some(exact) = self.entity(prefix) { return Ok(exact); }
        let p = prefix.to_ascii_lowercase();
        let matches: Vec<&EntityClass> = self.entities.iter()
            .filter(|e| e.name.to_ascii_lowercase().starts_with(&p))
            .collect();
        match matches.as_slice() {
            [one] => Ok(*one),
            [] => Err(PatchError::UnknownEntity { game: self.name.into(), entity: prefix.into() }),
            many => Err(PatchError::AmbiguousModif {
                token: prefix.into(),
                matches: many.iter().map(|e| e.name.to_string()).collect(),
            }),
        }
    }

    /// Table invariants: unique class names, unique non-zero modes per class, and pairwise
    /// disjoint cell sets across classes so classes compose in any order.
    pub fn validate(&self) -> Result<(), PatchError> {
        let mut names = BTreeSet::new();
        for e in self.entities {
            if !names.insert(e.name.to_ascii_lowercase()) {
                return Err(PatchError::DuplicateEntity(e.name.into()));
            }
            let mut modes = BTreeSet::new();
            for m in e.modes {
                if m.mode == 0 { return Err(PatchError::ReservedMode { entity: e.name.into() }); }
                if !modes.insert(m.mode) {
                    return Err(PatchError::DuplicateMode { entity: e.name.into(), mode: m.mode });
                }
            }
        }
        for (i, a) in self.entities.iter().enumerate() {
            let cells = a.cells();
            for b in &self.entities[i + 1..] {
                if let Some(&cell) = cells.intersection(&b.cells()).next() {
                    return Err(PatchError::OverlappingCells { first: a.name.into(), second: b.name.into(), cell });
                }
            }
        }
        Ok(())
    }
}
