//! scanner.rs — causative-cell scan
//!
//! For every RAM cell: write a probe value, step once with the probe action, read the target
//! pixel, restore the reference RAM. Cells whose probe changes the pixel are candidates.
//!
//! Probe values default to `[0]`. Writing arbitrary non-zero values into arbitrary cells can
//! wedge a real emulator, so anything else has to be asked for explicitly. With several probe
//! values they are tried in the configured order and `TieBreak` decides whether the first
//! change ends the cell.

use hack_env::memory;
use hack_env::{Action, Environment, Frame, Rgb};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::ScanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TieBreak {
    /// Stop probing a cell at the first value that changes the pixel.
    #[default]
    FirstChange,
    /// Try every probe value and record each one that changes the pixel.
    EveryChange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub probe_values: Vec<u8>,
    pub probe_action: Action,
    pub tie_break: TieBreak,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { probe_values: vec![0], probe_action: Action::Noop, tie_break: TieBreak::FirstChange }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellHit {
    pub index: usize,
    pub probe_value: u8,
    pub pixel: Rgb,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub x: usize,
    pub y: usize,
    pub reference_pixel: Rgb,
    pub hits: Vec<CellHit>,
    /// Probes issued (cells × values actually tried).
    pub probed: usize,
    pub aborted: bool,
}

impl ScanReport {
    pub fn candidates(&self) -> BTreeSet<usize> {
        self.hits.iter().map(|h| h.index).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeControl {
    Continue,
    Abort,
}

/// Called after every probe, once RAM is back to the reference snapshot.
pub trait ProbeObserver {
    fn on_probe(&mut self, index: usize, value: u8, frame: &Frame) -> ProbeControl;
}

impl<F> ProbeObserver for F
where
    F: FnMut(usize, u8, &Frame) -> ProbeControl,
{
    fn on_probe(&mut self, index: usize, value: u8, frame: &Frame) -> ProbeControl {
        self(index, value, frame)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self { Scanner { config } }

    pub fn config(&self) -> &ScanConfig { &self.config }

    pub fn find_causative_cells<E: Environment + ?Sized>(
        &self,
        env: &mut E,
        x: usize,
        y: usize,
    ) -> Result<BTreeSet<usize>, ScanError> {
        Ok(self.scan(env, x, y)?.candidates())
    }

    pub fn scan<E: Environment + ?Sized>(&self, env: &mut E, x: usize, y: usize) -> Result<ScanReport, ScanError> {
        self.scan_with(env, x, y, |_: usize, _: u8, _: &Frame| ProbeControl::Continue)
    }

    /// Full scan with a per-probe observer. Input is validated before RAM is touched, and RAM
    /// equals the pre-scan snapshot whenever this returns, whether it completes, aborts or fails.
    pub fn scan_with<E, O>(&self, env: &mut E, x: usize, y: usize, mut observer: O) -> Result<ScanReport, ScanError>
    where
        E: Environment + ?Sized,
        O: ProbeObserver,
    {
        if self.config.probe_values.is_empty() {
            return Err(ScanError::NoProbeValues);
        }
        let frame = env.render();
        if !frame.contains(x, y) {
            return Err(ScanError::OutOfRangePixel { x, y, width: frame.width, height: frame.height });
        }

        let reference = memory::snapshot(env);
        let (reference_pixel, _) = self.observe(env, &reference, x, y)?;
        log::info!("scan ({x}, {y}): reference pixel {reference_pixel:?}, {} cells", reference.len());

        let mut report = ScanReport { x, y, reference_pixel, hits: vec![], probed: 0, aborted: false };
        'cells: for index in 0..reference.len() {
            for &value in &self.config.probe_values {
                if let Err(e) = env.set_memory(index, value) {
                    env.restore_memory(&reference)?;
                    return Err(e.into());
                }
                let (pixel, frame) = self.observe(env, &reference, x, y)?;
                report.probed += 1;

                let changed = pixel != reference_pixel;
                if changed {
                    log::debug!("cell {index} = {value}: pixel {reference_pixel:?} -> {pixel:?}");
                    report.hits.push(CellHit { index, probe_value: value, pixel });
                }
                if observer.on_probe(index, value, &frame) == ProbeControl::Abort {
                    log::info!("scan aborted after cell {index}");
                    report.aborted = true;
                    break 'cells;
                }
                if changed && self.config.tie_break == TieBreak::FirstChange {
                    break;
                }
            }
        }

        log::info!("scan ({x}, {y}): {} candidate cell(s) {:?}", report.hits.len(), report.candidates());
        Ok(report)
    }

    /// Step with the probe action, read `(x, y)`, then put `reference` back. The restore runs
    /// before any error from the read is returned.
    fn observe<E: Environment + ?Sized>(
        &self,
        env: &mut E,
        reference: &[u8],
        x: usize,
        y: usize,
    ) -> Result<(Rgb, Frame), ScanError> {
        env.step(self.config.probe_action);
        let frame = env.render();
        env.restore_memory(reference)?;
        let pixel = frame.pixel(x, y).ok_or(ScanError::OutOfRangePixel {
            x,
            y,
            width: frame.width,
            height: frame.height,
        })?;
        Ok((pixel, frame))
    }
}

/// Scan with the default zero-probe configuration.
pub fn find_causative_cells<E: Environment + ?Sized>(
    env: &mut E,
    x: usize,
    y: usize,
) -> Result<BTreeSet<usize>, ScanError> {
    Scanner::default().find_causative_cells(env, x, y)
}
