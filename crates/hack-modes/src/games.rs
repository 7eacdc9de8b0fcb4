//! games.rs — hack catalog

use crate::rule::{Clamp, ModeRule, Transition};
use crate::table::{EntityClass, GameTable, ModeEntry};

// ── Fishing Derby ─────────────────────────────────────────────────────────────

pub const FISHING_DERBY_SHARK_X: usize = 75;
pub const FISHING_DERBY_FISH_X: [usize; 6] = [69, 70, 71, 72, 73, 74];

const SHARK_CELLS: &[usize] = &[FISHING_DERBY_SHARK_X];
const FISH_CELLS: &[usize] = &FISHING_DERBY_FISH_X;

pub static FISHING_DERBY: GameTable = GameTable {
    name: "FishingDerby",
    entities: &[
        EntityClass {
            name: "shark",
            modes: &[
                ModeEntry { mode: 1, label: "no movement (easy)", cells: SHARK_CELLS, rule: ModeRule::Pin { value: 105 } },
                ModeEntry { mode: 2, label: "no movement (hard)", cells: SHARK_CELLS, rule: ModeRule::Pin { value: 25 } },
                ModeEntry {
                    mode: 3,
                    label: "teleport",
                    cells: SHARK_CELLS,
                    rule: ModeRule::Bounce {
                        transitions: &[Transition { from: 100, to: 25 }, Transition { from: 30, to: 105 }],
                    },
                },
                ModeEntry {
                    mode: 4,
                    label: "speed",
                    cells: SHARK_CELLS,
                    rule: ModeRule::Ramp { upper: 120, step: 5, floor: 1 },
                },
            ],
        },
        EntityClass {
            name: "fish",
            modes: &[
                ModeEntry {
                    mode: 1,
                    label: "all on player's side",
                    cells: FISH_CELLS,
                    rule: ModeRule::ClampBand { above: Some(Clamp { threshold: 86, value: 44 }), below: None },
                },
                ModeEntry {
                    mode: 2,
                    label: "all on enemy's side",
                    cells: FISH_CELLS,
                    rule: ModeRule::ClampBand { above: None, below: Some(Clamp { threshold: 70, value: 116 }) },
                },
                ModeEntry {
                    mode: 3,
                    label: "always in the middle",
                    cells: FISH_CELLS,
                    rule: ModeRule::ClampBand {
                        above: Some(Clamp { threshold: 86, value: 70 }),
                        below: Some(Clamp { threshold: 70, value: 86 }),
                    },
                },
            ],
        },
    ],
};

pub static ALL: &[&GameTable] = &[&FISHING_DERBY];

pub fn lookup(name: &str) -> Option<&'static GameTable> {
    ALL.iter().copied().find(|g| g.name.eq_ignore_ascii_case(name))
}
