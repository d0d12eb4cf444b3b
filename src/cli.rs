use serde::Serialize;

use crate::combat::{entropy_seed, resolve_combat, DefenderProfile, Rng, WeaponProfile};
use crate::config::Config;
use crate::data::loader::{MONSTERS_FILE, WEAPONS_FILE};
use crate::data::{
    load_monster_catalog, load_weapon_catalog, validate_catalogs, Catalogs, ValidationSeverity,
};
use crate::game::{advance_turn, CombatLogEntry, GameState};
use crate::optimizer::monte_carlo::{run_monte_carlo_parallel, setup_state};
use crate::optimizer::{default_layout, parse_layout_list, rank_layouts_with_progress, Placement};
use crate::parallel::WorkerPool;
use crate::server;

const USAGE: &str = "usage: quintal <serve|resolve|play|simulate|rank|validate>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Resolve,
    Play,
    Simulate,
    Rank,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("resolve") => Some(Command::Resolve),
        Some("play") => Some(Command::Play),
        Some("simulate") => Some(Command::Simulate),
        Some("rank") => Some(Command::Rank),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let config = Config::from_env();
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(&config),
        Some(Command::Resolve) => handle_resolve(args, &config),
        Some(Command::Play) => handle_play(args, &config),
        Some(Command::Simulate) => handle_simulate(args, &config),
        Some(Command::Rank) => handle_rank(args, &config),
        Some(Command::Validate) => handle_validate(args, &config),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn handle_serve(config: &Config) -> i32 {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start async runtime: {err}");
            return 1;
        }
    };
    match runtime.block_on(server::run_server(config)) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_resolve(args: &[String], config: &Config) -> i32 {
    let (Some(weapon_id), Some(monster_id)) = (args.get(2), args.get(3)) else {
        eprintln!("usage: quintal resolve <weapon-id> <monster-id> [current-hp] [seed]");
        return 2;
    };
    let Some(catalogs) = load_catalogs(config) else {
        return 1;
    };
    let Some(weapon) = catalogs.weapons.get(weapon_id) else {
        eprintln!("unknown weapon '{weapon_id}'");
        return 1;
    };
    let Some(monster) = catalogs.monsters.get(monster_id) else {
        eprintln!("unknown monster '{monster_id}'");
        return 1;
    };

    let hp = parse_u32_arg(args.get(4), "current-hp", monster.hp);
    let seed = parse_seed_arg(args.get(5));
    let result = resolve_combat(
        &WeaponProfile::from(weapon),
        &DefenderProfile::from_template(monster, hp),
        &mut Rng::new(seed),
    );
    print_json(&serde_json::json!({ "seed": seed, "result": result }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayedTurn {
    turn: u32,
    log: Vec<CombatLogEntry>,
    escaped: Vec<String>,
    monsters_on_board: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayReport {
    seed: u64,
    layout: Vec<Placement>,
    turns: Vec<PlayedTurn>,
    final_state: GameState,
}

fn handle_play(args: &[String], config: &Config) -> i32 {
    let Some(catalogs) = load_catalogs(config) else {
        return 1;
    };
    let (seed, rest) = split_seed(&args[2.min(args.len())..]);
    let Some(layout) = parse_layout(rest, &catalogs) else {
        return 2;
    };

    let mut rng = Rng::new(seed);
    let mut state = match setup_state(&layout, &catalogs) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("invalid layout: {err}");
            return 1;
        }
    };
    if let Err(err) = state.start(&catalogs.monsters, &mut rng) {
        eprintln!("cannot start game: {err}");
        return 1;
    }

    let mut turns = Vec::new();
    while !state.is_terminal() {
        let played = state.current_turn;
        let outcome = advance_turn(&state, &catalogs.monsters, &catalogs.weapons, &mut rng);
        turns.push(PlayedTurn {
            turn: played,
            log: outcome.log,
            escaped: outcome.escaped,
            monsters_on_board: outcome.state.monsters.len(),
        });
        state = outcome.state;
    }

    print_json(&PlayReport {
        seed,
        layout,
        turns,
        final_state: state,
    })
}

fn handle_simulate(args: &[String], config: &Config) -> i32 {
    let games = parse_u32_arg(args.get(2), "games", 1000).max(1) as usize;
    let Some(catalogs) = load_catalogs(config) else {
        return 1;
    };
    let (seed, rest) = split_seed(&args[3.min(args.len())..]);
    let Some(layout) = parse_layout(rest, &catalogs) else {
        return 2;
    };

    match run_monte_carlo_parallel(&layout, &catalogs, games, seed) {
        Ok(result) => print_json(&serde_json::json!({ "seed": seed, "result": result })),
        Err(err) => {
            eprintln!("simulation failed: {err}");
            1
        }
    }
}

/// `rank <games> [seed] <layout>...`, each layout a comma-separated list of placements.
fn handle_rank(args: &[String], config: &Config) -> i32 {
    let games = parse_u32_arg(args.get(2), "games", 500).max(1) as usize;
    let (seed, rest) = split_seed(&args[3.min(args.len())..]);
    if rest.is_empty() {
        eprintln!("usage: quintal rank <games> [seed] <weapon@path:zone,...> [<layout>...]");
        return 2;
    }
    let mut candidates = Vec::with_capacity(rest.len());
    for raw in rest {
        match parse_layout_list(raw) {
            Ok(layout) => candidates.push(layout),
            Err(err) => {
                eprintln!("invalid layout '{raw}': {err}");
                return 2;
            }
        }
    }
    let Some(catalogs) = load_catalogs(config) else {
        return 1;
    };

    let pool = WorkerPool::with_workers(config.workers);
    let ranked = rank_layouts_with_progress(&candidates, &catalogs, games, seed, &pool, |done, total| {
        eprintln!("ranked {done}/{total} layouts");
    });
    match ranked {
        Ok(ranked) => print_json(&serde_json::json!({ "seed": seed, "games": games, "ranked": ranked })),
        Err(err) => {
            eprintln!("ranking failed: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String], config: &Config) -> i32 {
    let weapons_path = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| config.data_dir.join(WEAPONS_FILE).display().to_string());
    let monsters_path = args
        .get(3)
        .cloned()
        .unwrap_or_else(|| config.data_dir.join(MONSTERS_FILE).display().to_string());

    let weapons = match load_weapon_catalog(&weapons_path) {
        Ok(weapons) => weapons,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };
    let monsters = match load_monster_catalog(&monsters_path) {
        Ok(monsters) => monsters,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };

    let report = validate_catalogs(&weapons, &monsters);
    for diag in &report.diagnostics {
        eprintln!("- {diag}");
    }
    if report.has_errors() {
        eprintln!(
            "validation failed: {} error(s)",
            report.with_severity(ValidationSeverity::Error).count()
        );
        1
    } else {
        println!(
            "validation passed: {} weapons, {} monsters, {} warning(s)",
            weapons.len(),
            monsters.len(),
            report.with_severity(ValidationSeverity::Warning).count()
        );
        0
    }
}

fn load_catalogs(config: &Config) -> Option<Catalogs> {
    match Catalogs::load(&config.data_dir) {
        Ok(catalogs) => Some(catalogs),
        Err(err) => {
            eprintln!("failed to load catalogs: {err}");
            None
        }
    }
}

/// An optional leading numeric seed, then the remaining arguments.
fn split_seed(args: &[String]) -> (u64, &[String]) {
    match args.first().and_then(|raw| raw.parse::<u64>().ok()) {
        Some(seed) => (seed, &args[1..]),
        None => (entropy_seed(), args),
    }
}

fn parse_layout(args: &[String], catalogs: &Catalogs) -> Option<Vec<Placement>> {
    if args.is_empty() {
        return Some(default_layout(catalogs));
    }
    let mut layout = Vec::with_capacity(args.len());
    for raw in args {
        match raw.parse::<Placement>() {
            Ok(placement) => layout.push(placement),
            Err(err) => {
                eprintln!("invalid placement: {err}");
                return None;
            }
        }
    }
    Some(layout)
}

fn print_json<T: Serialize>(payload: &T) -> i32 {
    match serde_json::to_string_pretty(payload) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            1
        }
    }
}

fn parse_u32_arg(raw: Option<&String>, name: &str, default: u32) -> u32 {
    raw.and_then(|value| value.parse::<u32>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}

fn parse_seed_arg(raw: Option<&String>) -> u64 {
    match raw {
        Some(value) => value.parse::<u64>().unwrap_or_else(|_| {
            eprintln!("invalid seed '{value}', using a random one");
            entropy_seed()
        }),
        None => entropy_seed(),
    }
}
