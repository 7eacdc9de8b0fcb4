//! hackplay — run the reference fishing machine with RAM hacks applied every step
//!
//! Usage:
//!   hackplay [--config <hack.json>] [--game <name>] [--modif <tok> ...]
//!            [--switch-modif <tok> ...] [--switch-frame <n>] [--frames <n>]
//!            [--action noop|fire|left|right] [--load-state <file>] [--save-state <file>] [--list]
//!
//! Examples:
//!   hackplay --modif s3 f1 --frames 300
//!   hackplay --modif shark4 --switch-modif fish3 --switch-frame 120

use hack_env::machine::{LCD_HEIGHT, RAM_SIZE};
use hack_env::{Action, Environment, Snapshot, SpriteMachine};
use hack_modes::{HackConfig, PatchedEnv};
use std::error::Error;
use std::path::PathBuf;

struct Args {
    config: HackConfig,
    frames: u64,
    action: Action,
    load_state: Option<PathBuf>,
    save_state: Option<PathBuf>,
    list: bool,
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("hackplay: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&argv)?;
    let table = args.config.table()?;

    if args.list {
        println!("{}", serde_json::to_string_pretty(table)?);
        return Ok(());
    }

    let mut machine = SpriteMachine::new();
    if let Some(p) = &args.load_state {
        machine.load_state_from_file(p)?;
        log::info!("state loaded from {}", p.display());
    }

    let mut env = PatchedEnv::from_config(machine, &args.config)?;

    println!("hackplay | game={} | frames={} | action={:?} | ram={} cells",
             env.patcher().game().name, args.frames, args.action, RAM_SIZE);

    let mut total_reward = 0.0f32;
    let mut played = 0u64;
    for _ in 0..args.frames {
        let out = env.step(args.action);
        played += 1;
        if out.reward != 0.0 {
            println!("reward: {} (frame {})", out.reward, out.info.frame_number);
            total_reward += out.reward;
        }
        if played % 60 == 0 {
            log::info!("{}", env.inner().state_summary());
        }
        if out.done {
            println!("episode done at frame {}", out.info.frame_number);
            break;
        }
    }

    println!("=== HACKPLAY COMPLETE ===");
    println!("Frames: {} | Reward: {} | {}", played, total_reward, env.inner().state_summary());
    println!();
    println!("Final frame ({} rows):", LCD_HEIGHT / 2);
    print!("{}", env.render().to_ascii());

    if let Some(p) = &args.save_state {
        env.save_state_to_file(p)?;
        println!("State saved in {}", p.display());
    }
    Ok(())
}

fn parse_args(argv: &[String]) -> Result<Args, Box<dyn Error>> {
    let mut config: Option<HackConfig> = None;
    let mut game: Option<String> = None;
    let mut modifs: Vec<String> = vec![];
    let mut switch_modifs: Vec<String> = vec![];
    let mut switch_frame: Option<u64> = None;
    let mut frames = 600u64;
    let mut action = Action::Noop;
    let mut load_state = None;
    let mut save_state = None;
    let mut list = false;

    let mut i = 0usize;
    while i < argv.len() {
        match argv[i].as_str() {
            "--config" => { i += 1; config = Some(HackConfig::load(&PathBuf::from(require_arg(argv, i, "--config")?))?); }
            "--game" => { i += 1; game = Some(require_arg(argv, i, "--game")?.to_string()); }
            "--modif" | "-m" => { modifs.extend(take_values(argv, &mut i)); }
            "--switch-modif" => { switch_modifs.extend(take_values(argv, &mut i)); }
            "--switch-frame" => { i += 1; switch_frame = Some(require_arg(argv, i, "--switch-frame")?.parse()?); }
            "--frames" => { i += 1; frames = require_arg(argv, i, "--frames")?.parse()?; }
            "--action" => {
                i += 1;
                let a = require_arg(argv, i, "--action")?;
                action = Action::parse(a).ok_or_else(|| format!("unknown action: {a}"))?;
            }
            "--load-state" => { i += 1; load_state = Some(PathBuf::from(require_arg(argv, i, "--load-state")?)); }
            "--save-state" => { i += 1; save_state = Some(PathBuf::from(require_arg(argv, i, "--save-state")?)); }
            "--list" => list = true,
            "--help" | "-h" => { print_help(); std::process::exit(0); }
            other => return Err(format!("unexpected argument: {other}").into()),
        }
        i += 1;
    }

    let mut config = config.unwrap_or_default();
    if let Some(g) = game { config.game = g; }
    config.modifs.extend(modifs);
    config.switch_modifs.extend(switch_modifs);
    if let Some(f) = switch_frame { config.switch_frame = f; }
    Ok(Args { config, frames, action, load_state, save_state, list })
}

/// Values following a multi-valued flag, up to the next `--flag`. Leaves `i` on the last value.
fn take_values(argv: &[String], i: &mut usize) -> Vec<String> {
    let mut out = vec![];
    while *i + 1 < argv.len() && !argv[*i + 1].starts_with("--") {
        *i += 1;
        out.push(argv[*i].clone());
    }
    out
}

fn require_arg<'a>(args: &'a [String], idx: usize, flag: &str) -> Result<&'a str, Box<dyn Error>> {
    args.get(idx).map(|s| s.as_str()).ok_or_else(|| format!("missing value for {flag}").into())
}

fn print_help() {
    eprintln!("\
hackplay [options]

Options:
  --config <hack.json>       run configuration (game, modes, modifs, switch_modifs, switch_frame)
  --game <name>              hack table to use (default FishingDerby)
  --modif <tok> ...          modifications, e.g. s3 f1 shark4
  --switch-modif <tok> ...   modifications layered on at --switch-frame
  --switch-frame <n>         frame at which switch modifs take over
  --frames <n>               frames to run (default 600)
  --action <a>               action every frame: noop, fire, left, right
  --load-state <file>        start from a saved state
  --save-state <file>        save the final state
  --list                     print the game's hack table as JSON and exit
");
}
