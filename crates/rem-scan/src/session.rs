//! session.rs — line-oriented host around an environment, a scanner and the RAM inspector
//!
//! Commands:
//!   step [n] [noop|fire|left|right]   scan <x> <y>   click <px> <py>   grid
//!   select <i>   type <digits>   backspace   enter   esc
//!   inc <i>   dec <i>   hide <i>   pause   save [file]   load <file>   reset   help   quit

use crate::error::SessionError;
use crate::grid::{render_text, GridLayout};
use crate::inspector::RamInspector;
use crate::scanner::{ProbeControl, Scanner};
use hack_env::{Action, Environment, Frame, Snapshot};
use std::fmt::Write as FmtWrite;
use std::path::PathBuf;

pub const DEFAULT_COLUMNS: usize = 8;
pub const DEFAULT_SCREEN: (usize, usize) = (1920, 1080);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Step { count: u64, action: Action },
    Scan { x: usize, y: usize },
    /// Window point: left of the frame edge scans that pixel, over the grid selects a cell.
    Click { px: usize, py: usize },
    Select(usize),
    Type(String),
    Backspace,
    Enter,
    Escape,
    Inc(usize),
    Dec(usize),
    Hide(usize),
    Grid,
    Pause,
    Save(Option<PathBuf>),
    Load(PathBuf),
    Reset,
    Help,
    Quit,
}

impl Command {
    /// `Ok(None)` for blank lines and `#` comments.
    pub fn parse(line: &str) -> Result<Option<Command>, SessionError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else { return Ok(None) };
        if head.starts_with('#') { return Ok(None); }
        let rest: Vec<&str> = words.collect();

        let cmd = match head {
            "step" | "s" => {
                let mut count = 1u64;
                let mut action = Action::Noop;
                for w in &rest {
                    if let Ok(n) = w.parse() { count = n; }
                    else { action = Action::parse(w).ok_or_else(|| SessionError::Parse(format!("unknown action: {w}")))?; }
                }
                Command::Step { count, action }
            }
            "scan" => Command::Scan { x: number(&rest, 0, "scan <x> <y>")?, y: number(&rest, 1, "scan <x> <y>")? },
            "click" => Command::Click { px: number(&rest, 0, "click <px> <py>")?, py: number(&rest, 1, "click <px> <py>")? },
            "select" => Command::Select(number(&rest, 0, "select <cell>")?),
            "type" => {
                let digits = rest.concat();
                if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                    return Err(SessionError::Parse("type <digits>".into()));
                }
                Command::Type(digits)
            }
            "backspace" | "bs" => Command::Backspace,
            "enter" => Command::Enter,
            "esc" => Command::Escape,
            "inc" => Command::Inc(number(&rest, 0, "inc <cell>")?),
            "dec" => Command::Dec(number(&rest, 0, "dec <cell>")?),
            "hide" => Command::Hide(number(&rest, 0, "hide <cell>")?),
            "grid" | "g" => Command::Grid,
            "pause" | "p" => Command::Pause,
            "save" => Command::Save(rest.first().map(PathBuf::from)),
            "load" => Command::Load(PathBuf::from(
                rest.first().ok_or_else(|| SessionError::Parse("load <file>".into()))?,
            )),
            "reset" | "r" => Command::Reset,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(SessionError::Parse(format!("unknown command: {other}"))),
        };
        Ok(Some(cmd))
    }
}

fn number<T: std::str::FromStr>(rest: &[&str], i: usize, usage: &str) -> Result<T, SessionError> {
    rest.get(i)
        .and_then(|w| w.parse().ok())
        .ok_or_else(|| SessionError::Parse(format!("usage: {usage}")))
}

pub struct Session<E> {
    env: E,
    scanner: Scanner,
    inspector: RamInspector,
    layout: GridLayout,
    game_name: String,
    columns: usize,
    paused: bool,
    running: bool,
}

impl<E: Environment + Snapshot> Session<E> {
    pub fn new(env: E, scanner: Scanner, game_name: impl Into<String>) -> Self {
        let layout = fit_layout(&env, DEFAULT_SCREEN);
        Session {
            env,
            scanner,
            inspector: RamInspector::new(),
            layout,
            game_name: game_name.into(),
            columns: DEFAULT_COLUMNS,
            paused: false,
            running: true,
        }
    }

    pub fn with_inspector(mut self, inspector: RamInspector) -> Self {
        self.inspector = inspector;
        self
    }

    pub fn with_screen(mut self, width: usize, height: usize) -> Self {
        self.layout = fit_layout(&self.env, (width, height));
        self
    }

    pub fn layout(&self) -> &GridLayout { &self.layout }

    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }

    pub fn env(&self) -> &E { &self.env }

    pub fn env_mut(&mut self) -> &mut E { &mut self.env }

    pub fn inspector(&self) -> &RamInspector { &self.inspector }

    pub fn is_paused(&self) -> bool { self.paused }

    pub fn is_running(&self) -> bool { self.running }

    pub fn default_state_path(&self) -> PathBuf {
        PathBuf::from(format!("state_{}.sav", self.game_name))
    }

    pub fn grid(&self) -> String {
        render_text(self.env.get_memory(), self.columns, &self.inspector)
    }

    /// Sorted hidden cells, for printing when the session ends.
    pub fn hidden_report(&self) -> Option<String> {
        if self.inspector.hidden().is_empty() { return None; }
        let cells: Vec<String> = self.inspector.hidden().iter().map(|c| c.to_string()).collect();
        Some(format!("no_render list: {}", cells.join(" ")))
    }

    pub fn execute(&mut self, cmd: Command) -> Result<String, SessionError> {
        let mut out = String::new();
        match cmd {
            Command::Step { count, action } => {
                if self.paused { return Err(SessionError::Paused); }
                let mut taken = 0u64;
                for _ in 0..count {
                    let o = self.env.step(action);
                    taken += 1;
                    if o.reward != 0.0 { let _ = writeln!(out, "reward: {}", o.reward); }
                    if o.done {
                        let _ = writeln!(out, "episode done at frame {}", o.info.frame_number);
                        break;
                    }
                }
                let _ = write!(out, "stepped {taken} x {action:?}");
            }
            Command::Scan { x, y } => {
                let mut probes = 0usize;
                let report = self.scanner.scan_with(&mut self.env, x, y, |index: usize, _: u8, _: &Frame| {
                    probes += 1;
                    if probes % 32 == 0 { log::debug!("scan progress: cell {index}"); }
                    ProbeControl::Continue
                })?;
                let cells = report.candidates();
                self.inspector.cancel();
                let listed: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
                let _ = writeln!(
                    out,
                    "pixel ({x}, {y}) = {:?}; {} candidate cell(s): {}",
                    report.reference_pixel,
                    cells.len(),
                    listed.join(" ")
                );
                self.inspector.set_candidates(cells);
                out.push_str(&self.grid());
            }
            Command::Click { px, py } => {
                if px < self.env.render().width {
                    return self.execute(Command::Scan { x: px, y: py });
                }
                match self.layout.cell_at(px, py) {
                    Some(cell) => return self.execute(Command::Select(cell)),
                    None => { let _ = write!(out, "no cell at ({px}, {py})"); }
                }
            }
            Command::Select(cell) => {
                hack_env::memory::check_index(&self.env, cell as i64)?;
                self.inspector.select(cell);
                let _ = write!(out, "cell {cell} selected");
            }
            Command::Type(digits) => {
                if self.inspector.active().is_none() { return Err(SessionError::Parse("select a cell first".into())); }
                for c in digits.chars() { self.inspector.push_digit(c); }
                let _ = write!(out, "input: {}", self.inspector.input());
            }
            Command::Backspace => {
                self.inspector.backspace();
                let _ = write!(out, "input: {}", self.inspector.input());
            }
            Command::Enter => {
                let cell = self.inspector.active();
                match (cell, self.inspector.commit(&mut self.env)?) {
                    (Some(c), Some(v)) => { let _ = write!(out, "cell {c} = {v}"); }
                    _ => out.push_str("nothing written"),
                }
            }
            Command::Escape => {
                self.inspector.cancel();
                out.push_str("selection cleared");
            }
            Command::Inc(cell) => {
                let v = self.inspector.increment(&mut self.env, cell)?;
                let _ = write!(out, "cell {cell} = {v}");
            }
            Command::Dec(cell) => {
                let v = self.inspector.decrement(&mut self.env, cell)?;
                let _ = write!(out, "cell {cell} = {v}");
            }
            Command::Hide(cell) => {
                let hidden = self.inspector.toggle_hidden(cell);
                let _ = write!(out, "cell {cell} {}", if hidden { "hidden" } else { "shown" });
            }
            Command::Grid => out.push_str(&self.grid()),
            Command::Pause => {
                self.paused = !self.paused;
                out.push_str(if self.paused { "paused" } else { "resumed" });
            }
            Command::Save(path) => {
                if !self.paused { return Err(SessionError::NotPaused); }
                let path = path.unwrap_or_else(|| self.default_state_path());
                self.env.save_state_to_file(&path)?;
                let _ = write!(out, "State saved in {}.", path.display());
            }
            Command::Load(path) => {
                self.env.load_state_from_file(&path)?;
                let _ = write!(out, "State loaded from {}", path.display());
            }
            Command::Reset => {
                self.env.reset();
                out.push_str("reset");
            }
            Command::Help => out.push_str(HELP),
            Command::Quit => {
                self.running = false;
                out.push_str(&self.hidden_report().unwrap_or_default());
            }
        }
        Ok(out)
    }
}

const HELP: &str = "\
step [n] [noop|fire|left|right]  advance the game (refused while paused)
scan <x> <y>                     find RAM cells that change pixel (x, y)
click <px> <py>                  window point: scan on the frame, select on the grid
grid                             show RAM (> active, * candidate, -- hidden)
select <i> / type <digits> / backspace / enter / esc
                                 edit a cell; values above 255 are rejected
inc <i> / dec <i>                nudge a cell by one, clamped to 0..=255
hide <i>                         toggle hiding a cell in the grid
pause                            pause or resume
save [file] / load <file>        state snapshots (save needs pause)
reset / help / quit";

fn fit_layout<E: Environment>(env: &E, (width, height): (usize, usize)) -> GridLayout {
    let frame = env.render();
    GridLayout::fit(frame.width, frame.height, width, height, env.ram_len())
}
