//! Plays many seeded games of one weapon layout and aggregates the outcomes.
//! Game `i` uses seed `seed + i`, so sequential and parallel runs agree exactly.

use rayon::prelude::*;
use serde::Serialize;

use crate::combat::Rng;
use crate::data::Catalogs;
use crate::game::{advance_turn, GamePhase, GameState, SetupError};
use crate::optimizer::Placement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub victory: bool,
    pub turns: u32,
    pub monsters_defeated: u32,
    pub monsters_escaped: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub layout: Vec<Placement>,
    pub games: usize,
    pub victories: usize,
    pub win_rate: f64,
    pub avg_defeated: f64,
    pub avg_escaped: f64,
    pub avg_turns: f64,
}

/// Validates the layout once and returns the setup-phase state every game starts from.
pub fn setup_state(layout: &[Placement], catalogs: &Catalogs) -> Result<GameState, SetupError> {
    let mut state = GameState::new();
    for placement in layout {
        state.place_weapon(
            &catalogs.weapons,
            &placement.weapon_id,
            placement.path,
            placement.zone,
        )?;
    }
    Ok(state)
}

/// Plays one game from setup to victory or defeat.
pub fn play_game(
    setup: &GameState,
    catalogs: &Catalogs,
    seed: u64,
) -> Result<GameSummary, SetupError> {
    let mut rng = Rng::new(seed);
    let mut state = setup.clone();
    state.start(&catalogs.monsters, &mut rng)?;

    while state.phase == GamePhase::Playing {
        state = advance_turn(&state, &catalogs.monsters, &catalogs.weapons, &mut rng).state;
    }

    Ok(GameSummary {
        victory: state.phase == GamePhase::Victory,
        turns: state.current_turn,
        monsters_defeated: state.monsters_defeated,
        monsters_escaped: state.monsters_escaped,
    })
}

pub fn run_monte_carlo(
    layout: &[Placement],
    catalogs: &Catalogs,
    games: usize,
    seed: u64,
) -> Result<SimulationResult, SetupError> {
    run_monte_carlo_with_parallelism(layout, catalogs, games, seed, false)
}

/// Like [run_monte_carlo] but distributes games across all CPU cores via Rayon.
pub fn run_monte_carlo_parallel(
    layout: &[Placement],
    catalogs: &Catalogs,
    games: usize,
    seed: u64,
) -> Result<SimulationResult, SetupError> {
    run_monte_carlo_with_parallelism(layout, catalogs, games, seed, true)
}

fn run_monte_carlo_with_parallelism(
    layout: &[Placement],
    catalogs: &Catalogs,
    games: usize,
    seed: u64,
    parallel: bool,
) -> Result<SimulationResult, SetupError> {
    let setup = setup_state(layout, catalogs)?;
    let run_one = |game: usize| play_game(&setup, catalogs, seed.wrapping_add(game as u64));

    let summaries: Vec<GameSummary> = if parallel {
        (0..games).into_par_iter().map(run_one).collect::<Result<_, _>>()?
    } else {
        (0..games).map(run_one).collect::<Result<_, _>>()?
    };

    Ok(aggregate(layout, &summaries))
}

fn aggregate(layout: &[Placement], summaries: &[GameSummary]) -> SimulationResult {
    let games = summaries.len();
    let victories = summaries.iter().filter(|s| s.victory).count();
    let mean = |value: fn(&GameSummary) -> u32| {
        if games == 0 {
            0.0
        } else {
            summaries.iter().map(|s| f64::from(value(s))).sum::<f64>() / games as f64
        }
    };

    SimulationResult {
        layout: layout.to_vec(),
        games,
        victories,
        win_rate: if games == 0 {
            0.0
        } else {
            victories as f64 / games as f64
        },
        avg_defeated: mean(|s| s.monsters_defeated),
        avg_escaped: mean(|s| s.monsters_escaped),
        avg_turns: mean(|s| s.turns),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DEFAULT_DATA_DIR;
    use crate::game::{Path, Zone};

    fn layout() -> Vec<Placement> {
        Path::ALL
            .into_iter()
            .map(|path| Placement::new("weapon-2", path, Zone::Yard))
            .collect()
    }

    #[test]
    fn parallel_matches_sequential() {
        let catalogs = Catalogs::load(DEFAULT_DATA_DIR).expect("bundled data");
        let sequential = run_monte_carlo(&layout(), &catalogs, 64, 7).expect("valid layout");
        let parallel = run_monte_carlo_parallel(&layout(), &catalogs, 64, 7).expect("valid layout");
        assert_eq!(sequential, parallel);
        assert_eq!(sequential.games, 64);
        assert!((0.0..=1.0).contains(&sequential.win_rate));
    }

    #[test]
    fn every_game_ends_within_the_turn_limit() {
        let catalogs = Catalogs::load(DEFAULT_DATA_DIR).expect("bundled data");
        let setup = setup_state(&layout(), &catalogs).expect("valid layout");
        for seed in 0..50 {
            let summary = play_game(&setup, &catalogs, seed).expect("game runs");
            assert!(summary.turns <= 10);
            if !summary.victory {
                assert!(summary.monsters_escaped >= 3);
            }
        }
    }

    #[test]
    fn invalid_layout_is_reported() {
        let catalogs = Catalogs::load(DEFAULT_DATA_DIR).expect("bundled data");
        let short = vec![Placement::new("weapon-1", Path::Left, Zone::Yard)];
        assert!(matches!(
            run_monte_carlo(&short, &catalogs, 4, 1),
            Err(SetupError::NotEnoughWeapons { .. })
        ));
    }

    #[test]
    fn zero_games_yield_zero_rates() {
        let catalogs = Catalogs::load(DEFAULT_DATA_DIR).expect("bundled data");
        let result = run_monte_carlo(&layout(), &catalogs, 0, 1).expect("valid layout");
        assert_eq!(result.games, 0);
        assert_eq!(result.win_rate, 0.0);
    }
}
