use crate::inspector::RamInspector;
use crate::scanner::{ScanConfig, Scanner, TieBreak};
use crate::session::{Command, Session, DEFAULT_COLUMNS};
use hack_env::{Action, Environment, Snapshot, SpriteMachine};
use hack_modes::{HackConfig, PatchedEnv};
use std::error::Error;
use std::io::{BufRead, Write};
use std::path::PathBuf;

struct Options {
    config: HackConfig,
    warmup: u64,
    action: Action,
    load_state: Option<PathBuf>,
    hidden: Vec<usize>,
    scan: ScanConfig,
    columns: usize,
    json: bool,
    positional: Vec<String>,
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 { print_help(); std::process::exit(2); }
    match args[1].as_str() {
        "scan" => run_scan(&args[2..]),
        "grid" => run_grid(&args[2..]),
        "repl" => run_repl(&args[2..]),
        "--help" | "-h" | "help" => { print_help(); Ok(()) }
        _ => { eprintln!("unknown command: {}", args[1]); print_help(); std::process::exit(2); }
    }
}

fn run_scan(args: &[String]) -> Result<(), Box<dyn Error>> {
    let opts = parse_options(args)?;
    let x: usize = opts.positional.first().ok_or("missing <x>")?.parse()?;
    let y: usize = opts.positional.get(1).ok_or("missing <y>")?.parse()?;
    let mut session = build_session(&opts)?;
    if opts.json {
        let report = Scanner::new(opts.scan.clone()).scan(session.env_mut(), x, y)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!("{}", session.execute(Command::Scan { x, y })?);
    finish(&session);
    Ok(())
}

fn run_grid(args: &[String]) -> Result<(), Box<dyn Error>> {
    let opts = parse_options(args)?;
    let mut session = build_session(&opts)?;
    println!("{}", session.execute(Command::Grid)?);
    finish(&session);
    Ok(())
}

fn run_repl(args: &[String]) -> Result<(), Box<dyn Error>> {
    let opts = parse_options(args)?;
    let mut session = build_session(&opts)?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    eprintln!("remscan: 'help' lists commands");
    while session.is_running() {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 { break; }
        let result = Command::parse(&line).and_then(|cmd| match cmd {
            Some(Command::Quit) => { session.execute(Command::Quit).map(|_| String::new()) }
            Some(cmd) => session.execute(cmd),
            None => Ok(String::new()),
        });
        match result {
            Ok(out) if out.is_empty() => {}
            Ok(out) => println!("{out}"),
            Err(e) => println!("error: {e}"),
        }
    }
    finish(&session);
    Ok(())
}

fn finish<E: Environment + Snapshot>(session: &Session<E>) {
    if let Some(report) = session.hidden_report() {
        println!();
        println!("{report}");
    }
}

/// Reference machine, optional saved state, hacks from the config, then `warmup` frames.
fn build_session(opts: &Options) -> Result<Session<PatchedEnv<SpriteMachine>>, Box<dyn Error>> {
    let table = opts.config.table()?;
    let mut machine = SpriteMachine::new();
    if let Some(p) = &opts.load_state {
        machine.load_state_from_file(p)?;
        println!("State loaded from {}", p.display());
    }
    let mut env = PatchedEnv::from_config(machine, &opts.config)?;
    for _ in 0..opts.warmup {
        env.step(opts.action);
    }
    log::info!("{} after {} warm-up frame(s): {}", table.name, opts.warmup, env.inner().state_summary());

    Ok(Session::new(env, Scanner::new(opts.scan.clone()), table.name)
        .with_inspector(RamInspector::with_hidden(opts.hidden.iter().copied()))
        .with_columns(opts.columns))
}

fn parse_options(args: &[String]) -> Result<Options, Box<dyn Error>> {
    let mut config: Option<HackConfig> = None;
    let mut game: Option<String> = None;
    let mut modifs: Vec<String> = vec![];
    let mut switch_modifs: Vec<String> = vec![];
    let mut switch_frame: Option<u64> = None;
    let mut opts = Options {
        config: HackConfig::default(),
        warmup: 0,
        action: Action::Noop,
        load_state: None,
        hidden: vec![],
        scan: ScanConfig::default(),
        columns: DEFAULT_COLUMNS,
        json: false,
        positional: vec![],
    };
    let mut probes: Vec<u8> = vec![];

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => { i += 1; config = Some(HackConfig::load(&PathBuf::from(require_arg(args, i, "--config")?))?); }
            "--game" => { i += 1; game = Some(require_arg(args, i, "--game")?.to_string()); }
            "--modif" | "-m" => { modifs.extend(take_values(args, &mut i)); }
            "--switch-modif" => { switch_modifs.extend(take_values(args, &mut i)); }
            "--switch-frame" => { i += 1; switch_frame = Some(require_arg(args, i, "--switch-frame")?.parse()?); }
            "--frames" => { i += 1; opts.warmup = require_arg(args, i, "--frames")?.parse()?; }
            "--action" => {
                i += 1;
                let a = require_arg(args, i, "--action")?;
                opts.action = Action::parse(a).ok_or_else(|| format!("unknown action: {a}"))?;
            }
            "--load-state" => { i += 1; opts.load_state = Some(PathBuf::from(require_arg(args, i, "--load-state")?)); }
            "--hide" => {
                for v in take_values(args, &mut i) { opts.hidden.push(v.parse()?); }
            }
            "--probe" => {
                for v in take_values(args, &mut i) { probes.push(v.parse()?); }
            }
            "--every-change" => opts.scan.tie_break = TieBreak::EveryChange,
            "--json" => opts.json = true,
            "--columns" => { i += 1; opts.columns = require_arg(args, i, "--columns")?.parse()?; }
            other if other.starts_with("--") => return Err(format!("unexpected argument: {other}").into()),
            other => opts.positional.push(other.to_string()),
        }
        i += 1;
    }

    opts.config = config.unwrap_or_default();
    if let Some(g) = game { opts.config.game = g; }
    opts.config.modifs.extend(modifs);
    opts.config.switch_modifs.extend(switch_modifs);
    if let Some(f) = switch_frame { opts.config.switch_frame = f; }
    if !probes.is_empty() {
        log::warn!("non-default probe values {probes:?}: non-zero writes can wedge a real emulator");
        opts.scan.probe_values = probes;
    }
    Ok(opts)
}

fn take_values(args: &[String], i: &mut usize) -> Vec<String> {
    let mut out = vec![];
    while *i + 1 < args.len() && !args[*i + 1].starts_with("--") {
        *i += 1;
        out.push(args[*i].clone());
    }
    out
}

fn require_arg<'a>(args: &'a [String], idx: usize, flag: &str) -> Result<&'a str, Box<dyn Error>> {
    args.get(idx).map(|s| s.as_str()).ok_or_else(|| format!("missing value for {flag}").into())
}

fn print_help() {
    eprintln!("\
remscan <command> [options]

Commands:
  scan <x> <y>   list RAM cells whose zeroing changes pixel (x, y)
  grid           print the RAM grid
  repl           interactive session on stdin ('help' inside for commands)

Options:
  --config <hack.json>    game + modes (see hackplay)
  --game <name>           hack table (default FishingDerby)
  --modif <tok> ...       modifications applied every step, e.g. s3 f1
  --switch-modif <tok> .. modifications layered on at --switch-frame
  --switch-frame <n>      step at which switch modifs take over
  --frames <n>            warm-up frames before the command
  --action <a>            action for warm-up frames
  --load-state <file>     start from a saved state
  --hide <cell> ...       cells not to show in the grid
  --probe <v> ...         probe values (default 0)
  --every-change          record every probe value that changes the pixel
  --columns <n>           grid columns (default 8)
  --json                  scan: print the full report as JSON

Examples:
  remscan scan 68 72 --modif s1
  remscan scan 5 200 --probe 0 2 --every-change --json
  remscan grid --frames 120 --hide 0 1
  remscan repl --load-state state_FishingDerby.sav
");
}
