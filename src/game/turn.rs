//! One discrete step of the backyard defence.
//!
//! Order within a turn matters and is fixed:
//! 1. monsters already standing in the house escape,
//! 2. lanes with monsters on them become revealed,
//! 3. every placed weapon attacks every live monster in its cell,
//! 4. defeated monsters leave the board,
//! 5. survivors advance one zone,
//! 6. a new monster may spawn,
//! 7. win/lose conditions are evaluated and the turn counter moves.
//!
//! A monster that reaches the house therefore sits there for one turn, exposed to house
//! weapons, before it counts as escaped.

use serde::Serialize;

use crate::combat::{resolve_combat, DefenderProfile, RandomSource, WeaponProfile};
use crate::data::{MonsterCatalog, WeaponCatalog};
use crate::game::board::{Path, Zone};
use crate::game::spawn::{spawn_chance, spawn_monster, MAX_ACTIVE_MONSTERS};
use crate::game::state::{GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatLogEntry {
    pub turn: u32,
    pub weapon: String,
    pub monster: String,
    pub damage: u32,
    pub path: Path,
    pub monster_defeated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    pub state: GameState,
    pub log: Vec<CombatLogEntry>,
    /// Ids of the monsters that escaped at the start of this turn.
    pub escaped: Vec<String>,
}

/// Advances `state` by exactly one turn and returns the new snapshot; the input is untouched.
///
/// Outside the playing phase this is a no-op: the same state comes back with an empty log.
/// Placed weapons or monsters whose ids are missing from the catalogs are skipped.
pub fn advance_turn<R: RandomSource + ?Sized>(
    state: &GameState,
    monsters: &MonsterCatalog,
    weapons: &WeaponCatalog,
    rng: &mut R,
) -> TurnOutcome {
    let mut next = state.clone();
    if next.phase != GamePhase::Playing {
        tracing::debug!(phase = %next.phase, "advance ignored outside playing phase");
        return TurnOutcome {
            state: next,
            log: Vec::new(),
            escaped: Vec::new(),
        };
    }

    let turn = next.current_turn;

    let (escaped, remaining): (Vec<_>, Vec<_>) = next
        .monsters
        .drain(..)
        .partition(|monster| monster.zone == Zone::House);
    next.monsters = remaining;
    next.monsters_escaped = next.monsters_escaped.saturating_add(escaped.len() as u32);
    let escaped: Vec<String> = escaped.into_iter().map(|monster| monster.id).collect();

    for monster in &next.monsters {
        if !next.revealed_paths.contains(&monster.path) {
            next.revealed_paths.push(monster.path);
        }
    }

    let log = run_combat(&mut next, monsters, weapons, rng, turn);

    let before = next.monsters.len();
    next.monsters.retain(|monster| monster.current_hp > 0);
    next.monsters_defeated = next
        .monsters_defeated
        .saturating_add((before - next.monsters.len()) as u32);

    for monster in &mut next.monsters {
        monster.zone = monster.zone.next();
    }

    // Always draw, so the random stream does not depend on board occupancy.
    let roll = rng.next_f64();
    if roll < spawn_chance(turn) && next.monsters.len() < MAX_ACTIVE_MONSTERS {
        if let Some(spawned) = spawn_monster(monsters, rng) {
            tracing::debug!(monster = %spawned.monster_id, path = %spawned.path, "monster spawned");
            next.monsters.push(spawned);
        }
    }

    resolve_phase(&mut next);

    tracing::debug!(
        turn,
        attacks = log.len(),
        escaped = escaped.len(),
        active = next.monsters.len(),
        defeated = next.monsters_defeated,
        "turn resolved"
    );
    if next.phase != GamePhase::Playing {
        tracing::info!(
            phase = %next.phase,
            turn = next.current_turn,
            defeated = next.monsters_defeated,
            escaped = next.monsters_escaped,
            "game over"
        );
    }

    TurnOutcome {
        state: next,
        log,
        escaped,
    }
}

/// Weapons fire in placement order; within a cell monsters are attacked in spawn order.
/// A monster brought to 0 HP by one weapon is skipped by every later weapon.
fn run_combat<R: RandomSource + ?Sized>(
    state: &mut GameState,
    monsters: &MonsterCatalog,
    weapons: &WeaponCatalog,
    rng: &mut R,
    turn: u32,
) -> Vec<CombatLogEntry> {
    let mut log = Vec::new();

    for placed in &state.placed_weapons {
        let Some(weapon) = weapons.get(&placed.weapon_id) else {
            tracing::warn!(weapon = %placed.weapon_id, "placed weapon missing from catalog");
            continue;
        };
        let profile = WeaponProfile::from(weapon);

        for target in state.monsters.iter_mut().filter(|monster| {
            monster.path == placed.path && monster.zone == placed.zone && monster.current_hp > 0
        }) {
            let Some(template) = monsters.get(&target.monster_id) else {
                tracing::warn!(monster = %target.monster_id, "monster missing from catalog");
                continue;
            };
            let defender = DefenderProfile::from_template(template, target.current_hp);
            let result = resolve_combat(&profile, &defender, rng);
            target.current_hp = result.monster_remaining_hp;

            log.push(CombatLogEntry {
                turn,
                weapon: weapon.name.clone(),
                monster: template.name.clone(),
                damage: result.total_damage,
                path: placed.path,
                monster_defeated: result.monster_defeated,
            });
        }
    }

    log
}

fn resolve_phase(state: &mut GameState) {
    if state.monsters_escaped >= state.max_escaped {
        state.phase = GamePhase::Defeat;
    } else if state.current_turn >= state.max_turns && state.monsters.is_empty() {
        state.phase = GamePhase::Victory;
    } else {
        state.current_turn = state.current_turn.saturating_add(1);
        if state.current_turn >= state.max_turns {
            state.phase = if state.monsters_escaped < state.max_escaped {
                GamePhase::Victory
            } else {
                GamePhase::Defeat
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{Element, Rng, ScriptedSource};
    use crate::data::{MonsterCategory, MonsterTemplate, WeaponRecord};
    use crate::game::board::Room;
    use crate::game::state::{MonsterInPlay, PlacedWeapon};

    /// Uniform that never triggers a spawn.
    const NO_SPAWN: f64 = 0.999;

    fn weapons() -> WeaponCatalog {
        WeaponCatalog::new(vec![
            WeaponRecord::new("nerf", "Sentinela Nerf", 3, Element::Physical),
            WeaponRecord::new("hose", "Cobra de Mangueira", 2, Element::Water),
        ])
    }

    fn monsters() -> MonsterCatalog {
        MonsterCatalog::new(vec![
            MonsterTemplate::new("capelobo", "Capelobo", 4, "Eletricidade/Perfuração", "Físico Leve", MonsterCategory::Regular),
            MonsterTemplate::new("curupira", "Curupira", 2, "Armadilhas Manuais", "Sensores", MonsterCategory::Regular),
        ])
    }

    fn playing(weapons: Vec<PlacedWeapon>, monsters: Vec<MonsterInPlay>) -> GameState {
        GameState {
            phase: GamePhase::Playing,
            current_turn: 1,
            placed_weapons: weapons,
            monsters,
            ..GameState::new()
        }
    }

    fn placed(weapon_id: &str, path: Path, zone: Zone) -> PlacedWeapon {
        PlacedWeapon {
            id: format!("placed-{path}-{zone}"),
            weapon_id: weapon_id.to_string(),
            path,
            zone,
        }
    }

    fn monster(id: &str, template: &str, hp: u32, path: Path, zone: Zone) -> MonsterInPlay {
        MonsterInPlay {
            id: id.to_string(),
            monster_id: template.to_string(),
            current_hp: hp,
            path,
            zone,
            target_room: path.target_room(),
        }
    }

    #[test]
    fn house_monsters_escape_before_combat() {
        let state = playing(
            vec![placed("nerf", Path::Left, Zone::House)],
            vec![monster("a", "capelobo", 4, Path::Left, Zone::House)],
        );
        let mut rng = ScriptedSource::new(1).uniforms([NO_SPAWN]);

        let outcome = advance_turn(&state, &monsters(), &weapons(), &mut rng);

        assert_eq!(outcome.escaped, vec!["a".to_string()]);
        assert_eq!(outcome.state.monsters_escaped, 1);
        assert!(outcome.log.is_empty());
        assert!(outcome.state.monsters.is_empty());
        assert_eq!(outcome.state.current_turn, 2);
    }

    #[test]
    fn weapon_damages_monster_in_its_cell_then_survivor_advances() {
        let state = playing(
            vec![placed("nerf", Path::Center, Zone::Street)],
            vec![monster("a", "capelobo", 4, Path::Center, Zone::Street)],
        );
        // Physical vs "Físico Leve": resisted. Weakness "Perfuração" matches: 4 dice.
        let mut rng = ScriptedSource::new(1).dice([6, 6, 1, 1]).uniforms([NO_SPAWN]);

        let outcome = advance_turn(&state, &monsters(), &weapons(), &mut rng);

        assert_eq!(outcome.log.len(), 1);
        assert_eq!(outcome.log[0].damage, 1);
        assert_eq!(outcome.log[0].weapon, "Sentinela Nerf");
        assert_eq!(outcome.log[0].monster, "Capelobo");
        assert_eq!(outcome.log[0].turn, 1);
        let survivor = &outcome.state.monsters[0];
        assert_eq!(survivor.current_hp, 3);
        assert_eq!(survivor.zone, Zone::Yard);
        assert_eq!(survivor.target_room, Room::Kitchen);
        assert_eq!(outcome.state.revealed_paths, vec![Path::Center]);
    }

    #[test]
    fn monster_killed_by_first_weapon_is_skipped_by_second() {
        let state = playing(
            vec![
                placed("hose", Path::Right, Zone::Yard),
                placed("nerf", Path::Right, Zone::Yard),
            ],
            vec![monster("a", "curupira", 2, Path::Right, Zone::Yard)],
        );
        let mut rng = ScriptedSource::new(1).dice([5, 6]).uniforms([NO_SPAWN]);

        let outcome = advance_turn(&state, &monsters(), &weapons(), &mut rng);

        assert_eq!(outcome.log.len(), 1);
        assert!(outcome.log[0].monster_defeated);
        assert_eq!(outcome.state.monsters_defeated, 1);
        assert!(outcome.state.monsters.is_empty());
    }

    #[test]
    fn every_weapon_in_a_cell_attacks_every_monster() {
        let state = playing(
            vec![
                placed("hose", Path::Left, Zone::Yard),
                placed("nerf", Path::Left, Zone::Yard),
            ],
            vec![
                monster("a", "capelobo", 4, Path::Left, Zone::Yard),
                monster("b", "capelobo", 4, Path::Left, Zone::Yard),
                monster("c", "capelobo", 4, Path::Center, Zone::Yard),
            ],
        );
        let mut rng = ScriptedSource::new(1)
            .dice([1; 12])
            .uniforms([NO_SPAWN]);

        let outcome = advance_turn(&state, &monsters(), &weapons(), &mut rng);

        assert_eq!(outcome.log.len(), 4);
        assert!(outcome.log.iter().all(|entry| entry.path == Path::Left));
        assert_eq!(outcome.log[0].weapon, "Cobra de Mangueira");
        assert_eq!(outcome.log[2].weapon, "Sentinela Nerf");
        assert_eq!(rng.pending_dice(), 0);
    }

    #[test]
    fn spawn_respects_chance_and_cap() {
        let state = playing(Vec::new(), Vec::new());
        let mut rng = ScriptedSource::new(4).uniforms([0.44]);
        let outcome = advance_turn(&state, &monsters(), &weapons(), &mut rng);
        assert_eq!(outcome.state.monsters.len(), 1);
        assert_eq!(outcome.state.monsters[0].zone, Zone::Street);

        let crowded: Vec<MonsterInPlay> = (0..6)
            .map(|i| monster(&format!("m{i}"), "capelobo", 4, Path::Left, Zone::Street))
            .collect();
        let state = playing(Vec::new(), crowded);
        let mut rng = ScriptedSource::new(4).uniforms([0.0]);
        let outcome = advance_turn(&state, &monsters(), &weapons(), &mut rng);
        assert_eq!(outcome.state.monsters.len(), 6);
    }

    #[test]
    fn third_escape_is_defeat() {
        let mut state = playing(
            Vec::new(),
            vec![monster("a", "capelobo", 4, Path::Left, Zone::House)],
        );
        state.monsters_escaped = 2;
        let outcome = advance_turn(&state, &monsters(), &weapons(), &mut Rng::new(2));
        assert_eq!(outcome.state.phase, GamePhase::Defeat);
        assert_eq!(outcome.state.monsters_escaped, 3);
        assert_eq!(outcome.state.current_turn, 1);
    }

    #[test]
    fn reaching_the_last_turn_is_victory_even_with_monsters_left() {
        let mut state = playing(
            Vec::new(),
            vec![monster("a", "capelobo", 4, Path::Left, Zone::Street)],
        );
        state.current_turn = 9;
        let mut rng = ScriptedSource::new(1).uniforms([NO_SPAWN]);
        let outcome = advance_turn(&state, &monsters(), &weapons(), &mut rng);
        assert_eq!(outcome.state.current_turn, 10);
        assert_eq!(outcome.state.phase, GamePhase::Victory);
        assert_eq!(outcome.state.monsters.len(), 1);
    }

    #[test]
    fn terminal_and_setup_states_are_left_alone() {
        let mut rng = Rng::new(8);
        for phase in [GamePhase::Setup, GamePhase::Victory, GamePhase::Defeat] {
            let state = GameState {
                phase,
                ..playing(Vec::new(), vec![monster("a", "capelobo", 4, Path::Left, Zone::House)])
            };
            let outcome = advance_turn(&state, &monsters(), &weapons(), &mut rng);
            assert_eq!(outcome.state, state);
            assert!(outcome.log.is_empty());
            assert!(outcome.escaped.is_empty());
        }
    }

    #[test]
    fn unknown_catalog_entries_are_skipped() {
        let state = playing(
            vec![placed("railgun", Path::Left, Zone::Street)],
            vec![monster("a", "capelobo", 4, Path::Left, Zone::Street)],
        );
        let mut rng = ScriptedSource::new(1).uniforms([NO_SPAWN]);
        let outcome = advance_turn(&state, &monsters(), &weapons(), &mut rng);
        assert!(outcome.log.is_empty());
        assert_eq!(outcome.state.monsters[0].zone, Zone::Yard);
    }

    #[test]
    fn input_snapshot_is_not_mutated() {
        let state = playing(
            vec![placed("nerf", Path::Left, Zone::Street)],
            vec![monster("a", "capelobo", 4, Path::Left, Zone::Street)],
        );
        let before = state.clone();
        let _ = advance_turn(&state, &monsters(), &weapons(), &mut Rng::new(77));
        assert_eq!(state, before);
    }
}
