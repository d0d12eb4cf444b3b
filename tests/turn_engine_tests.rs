use proptest::prelude::*;
use quintal::combat::{Rng, ScriptedSource};
use quintal::data::{Catalogs, DEFAULT_DATA_DIR};
use quintal::game::{advance_turn, spawn_monster, GamePhase, GameState, Path, Zone};

fn catalogs() -> Catalogs {
    Catalogs::load(DEFAULT_DATA_DIR).expect("bundled data")
}

/// A game already in play with no weapons and one monster on the street.
fn undefended_game(catalogs: &Catalogs, seed: u64) -> GameState {
    let mut state = GameState::new();
    let first = spawn_monster(&catalogs.monsters, &mut Rng::new(seed)).expect("regular monster");
    state.phase = GamePhase::Playing;
    state.current_turn = 1;
    state.monsters.push(first);
    state
}

#[test]
fn starting_a_game_puts_one_monster_on_the_board() {
    let catalogs = catalogs();
    let mut state = GameState::new();
    assert_eq!(state.phase, GamePhase::Setup);
    assert_eq!(state.current_turn, 0);
    assert!(state.placed_weapons.is_empty());
    assert!(state.monsters.is_empty());

    for (path, weapon) in Path::ALL.into_iter().zip(["weapon-1", "weapon-3", "weapon-8"]) {
        state
            .place_weapon(&catalogs.weapons, weapon, path, Zone::Yard)
            .expect("free cell");
    }
    state.start(&catalogs.monsters, &mut Rng::new(3)).expect("three weapons placed");

    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.current_turn, 1);
    assert_eq!(state.monsters.len(), 1);
    assert_eq!(state.monsters[0].zone, Zone::Street);
}

#[test]
fn undefended_yard_is_overrun_before_the_last_turn() {
    let catalogs = catalogs();
    let mut state = undefended_game(&catalogs, 1);
    let mut rng = ScriptedSource::new(2).uniforms([0.0; 16]);
    let mut last_escaped = 0;

    for _ in 0..state.max_turns {
        if state.is_terminal() {
            break;
        }
        state = advance_turn(&state, &catalogs.monsters, &catalogs.weapons, &mut rng).state;
        assert!(state.monsters_escaped >= last_escaped);
        last_escaped = state.monsters_escaped;
    }

    assert_eq!(state.phase, GamePhase::Defeat);
    assert!(state.monsters_escaped >= state.max_escaped);
    assert!(state.current_turn <= state.max_turns);
}

#[test]
fn finished_games_do_not_advance() {
    let catalogs = catalogs();
    for phase in [GamePhase::Victory, GamePhase::Defeat, GamePhase::Setup] {
        let mut state = undefended_game(&catalogs, 4);
        state.phase = phase;
        state.monsters_escaped = 2;

        let outcome = advance_turn(&state, &catalogs.monsters, &catalogs.weapons, &mut Rng::new(9));

        assert_eq!(outcome.state, state);
        assert!(outcome.log.is_empty());
        assert!(outcome.escaped.is_empty());
    }
}

#[test]
fn seeded_games_replay_identically() {
    let catalogs = catalogs();
    let play = |seed: u64| {
        let mut rng = Rng::new(seed);
        let mut state = undefended_game(&catalogs, seed);
        let mut logs = Vec::new();
        while !state.is_terminal() {
            let outcome = advance_turn(&state, &catalogs.monsters, &catalogs.weapons, &mut rng);
            logs.extend(outcome.log);
            state = outcome.state;
        }
        (state, logs)
    };

    assert_eq!(play(21), play(21));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn escapes_never_decrease_and_defeat_is_final(seed in any::<u64>()) {
        let catalogs = catalogs();
        let mut state = GameState::new();
        for path in Path::ALL {
            state.place_weapon(&catalogs.weapons, "weapon-7", path, Zone::House).expect("free cell");
        }
        let mut rng = Rng::new(seed);
        state.start(&catalogs.monsters, &mut rng).expect("three weapons placed");

        let mut escaped = 0;
        for _ in 0..(state.max_turns + 2) {
            let next = advance_turn(&state, &catalogs.monsters, &catalogs.weapons, &mut rng).state;
            prop_assert!(next.monsters_escaped >= escaped);
            if next.monsters_escaped >= next.max_escaped {
                prop_assert_eq!(next.phase, GamePhase::Defeat);
            }
            prop_assert!(next.current_turn <= next.max_turns);
            escaped = next.monsters_escaped;
            state = next;
        }
        prop_assert!(state.is_terminal());
    }
}
