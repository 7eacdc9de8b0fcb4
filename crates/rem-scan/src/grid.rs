//! grid.rs — RAM grid geometry and a text rendition of it

use crate::inspector::RamInspector;
use std::fmt::Write as FmtWrite;

pub const RAM_RENDER_WIDTH: usize = 1000;
pub const RAM_CELL_WIDTH: usize = 115;
pub const RAM_CELL_HEIGHT: usize = 45;
pub const RAM_ROW_PADDING: usize = 10;
pub const RAM_COLUMN_PADDING: usize = 15;
pub const GRID_ANCHOR: usize = 28;
pub const CELL_GAP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: usize,
    pub cell_width: usize,
    pub cell_height: usize,
    pub left: usize,
    pub top: usize,
    pub cells: usize,
}

impl GridLayout {
    /// Window is the game frame plus up to `RAM_RENDER_WIDTH` for the grid, capped to the
    /// screen. Cells shrink uniformly when the rows would not fit the window height.
    pub fn fit(frame_width: usize, frame_height: usize, screen_width: usize, screen_height: usize, cells: usize) -> Self {
        let window_width = (frame_width + RAM_RENDER_WIDTH).min(screen_width);
        let window_height = frame_height.min(screen_height);

        let columns = (window_width.saturating_sub(frame_width) / (RAM_CELL_WIDTH + RAM_ROW_PADDING)).max(1);
        let rows = cells.div_ceil(columns);
        let max_rows = window_height / (RAM_CELL_HEIGHT + RAM_COLUMN_PADDING);

        let (cell_width, cell_height) = if rows > max_rows {
            let scale = max_rows as f64 / rows as f64;
            ((RAM_CELL_WIDTH as f64 * scale) as usize, (RAM_CELL_HEIGHT as f64 * scale) as usize)
        } else {
            (RAM_CELL_WIDTH, RAM_CELL_HEIGHT)
        };

        GridLayout { columns, cell_width, cell_height, left: frame_width + GRID_ANCHOR, top: GRID_ANCHOR, cells }
    }

    pub fn rows(&self) -> usize { self.cells.div_ceil(self.columns) }

    /// `(x, y, w, h)` of a cell in window coordinates.
    pub fn cell_rect(&self, idx: usize) -> (usize, usize, usize, usize) {
        let col = idx % self.columns;
        let row = idx / self.columns;
        (
            self.left + col * (self.cell_width + CELL_GAP),
            self.top + row * (self.cell_height + CELL_GAP),
            self.cell_width,
            self.cell_height,
        )
    }

    /// Cell under a window point, gaps included in the cell to their upper-left.
    pub fn cell_at(&self, px: usize, py: usize) -> Option<usize> {
        if px < self.left || py < self.top { return None; }
        let col = (px - self.left) / (self.cell_width + CELL_GAP);
        let row = (py - self.top) / (self.cell_height + CELL_GAP);
        if col >= self.columns { return None; }
        let idx = row * self.columns + col;
        (idx < self.cells).then_some(idx)
    }
}

/// One line per grid row. `>` marks the active cell (showing the pending input), `*` a scan
/// candidate; hidden cells show `--`.
pub fn render_text(memory: &[u8], columns: usize, inspector: &RamInspector) -> String {
    let columns = columns.max(1);
    let mut out = String::new();
    for (row, chunk) in memory.chunks(columns).enumerate() {
        for (col, &value) in chunk.iter().enumerate() {
            let idx = row * columns + col;
            let mark = if inspector.active() == Some(idx) {
                '>'
            } else if inspector.is_candidate(idx) {
                '*'
            } else {
                ' '
            };
            let shown = if inspector.active() == Some(idx) {
                format!("{}_", inspector.input())
            } else if inspector.is_hidden(idx) {
                "--".to_string()
            } else {
                value.to_string()
            };
            let _ = write!(out, "{mark}{idx:>3}:{shown:<4}");
        }
        out.push('\n');
    }
    out
}
