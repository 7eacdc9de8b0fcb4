//! machine.rs — SpriteMachine, a 128-cell fishing scene used as the reference environment
//!
//! RAM layout follows Fishing Derby's: six fish x-positions at 69..=74 and the shark
//! x-position at 75, so the Fishing Derby hack table drives it unchanged. Every bit of game
//! state lives in RAM and `render` is a pure function of RAM.

use crate::env::{Action, Environment, Snapshot, StepInfo, StepOutcome};
use crate::error::EnvError;
use crate::frame::{Frame, Rgb};
use serde::{Deserialize, Serialize};

// ── Hardware constants ──────────────────────────────────────────────────────
pub const RAM_SIZE: usize = 128;
pub const LCD_WIDTH: usize = 160;
pub const LCD_HEIGHT: usize = 210;
pub const STATE_VERSION: &str = "hack.sav.v1";

// ── RAM map ──────────────────────────────────────────────────────────────────
pub const FRAME_COUNTER: usize = 0;
pub const WATER_COLOR: usize = 1;
pub const HOOK_X: usize = 60;
pub const SCORE: usize = 61;
/// Bit i set: fish i swims right.
pub const FISH_DIRS: usize = 62;
pub const SHARK_DIR: usize = 63;
pub const FISH_X0: usize = 69;
pub const FISH_COUNT: usize = 6;
pub const SHARK_X: usize = 75;

// ── Scene geometry ───────────────────────────────────────────────────────────
pub const FISH_MIN_X: u8 = 20;
pub const FISH_MAX_X: u8 = 136;
pub const SHARK_MIN_X: u8 = 25;
pub const SHARK_MAX_X: u8 = 105;
pub const HOOK_Y: usize = 48;
pub const SHARK_Y: usize = 70;
pub const SHARK_W: usize = 16;
pub const SHARK_H: usize = 6;
pub const FISH_Y0: usize = 100;
pub const FISH_ROW: usize = 16;
pub const FISH_W: usize = 8;
pub const FISH_H: usize = 4;
pub const WIN_SCORE: u8 = 99;

const WATER: [Rgb; 4] = [[24, 26, 167], [45, 50, 184], [0, 28, 136], [66, 72, 200]];
const FISH_RGB: Rgb = [232, 232, 74];
const SHARK_RGB: Rgb = [92, 186, 92];
const HOOK_RGB: Rgb = [255, 255, 255];
const SCORE_RGB: Rgb = [252, 144, 144];

#[derive(Debug, Serialize, Deserialize)]
struct MachineState {
    version: String,
    frames: u64,
    ram: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct SpriteMachine {
    ram: [u8; RAM_SIZE],
    frames: u64,
}

impl Default for SpriteMachine {
    fn default() -> Self { Self::new() }
}

impl SpriteMachine {
    pub fn new() -> Self {
        let mut m = SpriteMachine { ram: [0; RAM_SIZE], frames: 0 };
        m.reset();
        m
    }

    pub fn frames(&self) -> u64 { self.frames }

    pub fn fish_x(&self, i: usize) -> u8 { self.ram[FISH_X0 + i] }

    pub fn shark_x(&self) -> u8 { self.ram[SHARK_X] }

    pub fn state_summary(&self) -> String {
        let fish: Vec<u8> = (0..FISH_COUNT).map(|i| self.fish_x(i)).collect();
        format!(
            "Frame={} | Shark={} | Fish={:?} | Hook={} | Score={}",
            self.frames, self.shark_x(), fish, self.ram[HOOK_X], self.ram[SCORE]
        )
    }

    fn move_hook(&mut self, action: Action) {
        let x = self.ram[HOOK_X];
        self.ram[HOOK_X] = match action {
            Action::Left => x.saturating_sub(1).max(FISH_MIN_X),
            Action::Right => x.saturating_add(1).min(FISH_MAX_X),
            _ => x,
        };
    }

    fn move_fish(&mut self) {
        let mut dirs = self.ram[FISH_DIRS];
        for i in 0..FISH_COUNT {
            let bit = 1u8 << i;
            let (x, right) = bounce(self.ram[FISH_X0 + i], dirs & bit != 0, FISH_MIN_X, FISH_MAX_X);
            self.ram[FISH_X0 + i] = x;
            if right { dirs |= bit } else { dirs &= !bit }
        }
        self.ram[FISH_DIRS] = dirs;
    }

    fn move_shark(&mut self) {
        let (x, right) = bounce(self.ram[SHARK_X], self.ram[SHARK_DIR] != 0, SHARK_MIN_X, SHARK_MAX_X);
        self.ram[SHARK_X] = x;
        self.ram[SHARK_DIR] = right as u8;
    }

    /// Fish under the hook on a Fire step are caught and respawn at the far edge.
    fn catch(&mut self, action: Action) -> u8 {
        if action != Action::Fire { return 0; }
        let hook = self.ram[HOOK_X];
        let mut caught = 0u8;
        for i in 0..FISH_COUNT {
            if self.ram[FISH_X0 + i] == hook {
                self.ram[FISH_X0 + i] = FISH_MAX_X;
                caught += 1;
            }
        }
        self.ram[SCORE] = self.ram[SCORE].saturating_add(caught);
        caught
    }
}

/// One pixel of travel, turning around at (or beyond) either edge.
fn bounce(x: u8, right: bool, min: u8, max: u8) -> (u8, bool) {
    match (right, x) {
        (true, x) if x >= max => (x - 1, false),
        (true, x) => (x + 1, true),
        (false, x) if x <= min => (x + 1, true),
        (false, x) => (x - 1, false),
    }
}

impl Environment for SpriteMachine {
    fn get_memory(&self) -> &[u8] { &self.ram }

    fn set_memory(&mut self, index: usize, value: u8) -> Result<(), EnvError> {
        let cell = self.ram.get_mut(index)
            .ok_or(EnvError::InvalidMemoryIndex { index: index as i64, len: RAM_SIZE })?;
        *cell = value;
        Ok(())
    }

    fn step(&mut self, action: Action) -> StepOutcome {
        self.frames += 1;
        self.ram[FRAME_COUNTER] = self.ram[FRAME_COUNTER].wrapping_add(1);
        self.move_hook(action);
        self.move_fish();
        self.move_shark();
        let caught = self.catch(action);
        StepOutcome {
            frame: self.render(),
            reward: caught as f32,
            done: self.ram[SCORE] >= WIN_SCORE,
            info: StepInfo { frame_number: self.frames, score: self.ram[SCORE] },
        }
    }

    fn render(&self) -> Frame {
        let water = WATER[(self.ram[WATER_COLOR] % WATER.len() as u8) as usize];
        let mut f = Frame::new(LCD_WIDTH, LCD_HEIGHT, water);
        f.fill_rect(0, 0, self.ram[SCORE] as usize, 4, SCORE_RGB);
        f.fill_rect(self.ram[HOOK_X] as usize, HOOK_Y, 2, 2, HOOK_RGB);
        f.fill_rect(self.ram[SHARK_X] as usize, SHARK_Y, SHARK_W, SHARK_H, SHARK_RGB);
        for i in 0..FISH_COUNT {
            f.fill_rect(self.fish_x(i) as usize, FISH_Y0 + i * FISH_ROW, FISH_W, FISH_H, FISH_RGB);
        }
        f
    }

    fn reset(&mut self) {
        self.ram = [0; RAM_SIZE];
        self.frames = 0;
        self.ram[HOOK_X] = 40;
        for (i, x) in [30u8, 50, 70, 90, 110, 130].into_iter().enumerate() {
            self.ram[FISH_X0 + i] = x;
        }
        self.ram[FISH_DIRS] = 0b01_0101;
        self.ram[SHARK_X] = 60;
        self.ram[SHARK_DIR] = 1;
    }
}

impl Snapshot for SpriteMachine {
    fn save_state(&self) -> Vec<u8> {
        let state = MachineState { version: STATE_VERSION.into(), frames: self.frames, ram: self.ram.to_vec() };
        serde_json::to_vec(&state).unwrap_or_default()
    }

    fn load_state(&mut self, data: &[u8]) -> Result<(), EnvError> {
        let state: MachineState = serde_json::from_slice(data)
            .map_err(|e| EnvError::InvalidState(format!("load_state: {e}")))?;
        if state.version != STATE_VERSION {
            return Err(EnvError::InvalidState(format!("unsupported version {}", state.version)));
        }
        let ram: [u8; RAM_SIZE] = state.ram.as_slice().try_into()
            .map_err(|_| EnvError::SnapshotLength { expected: RAM_SIZE, got: state.ram.len() })?;
        self.ram = ram;
        self.frames = state.frames;
        log::debug!("loaded state at frame {}", self.frames);
        Ok(())
    }
}
