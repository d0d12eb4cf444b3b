use crate::combat::RandomSource;
use crate::data::MonsterCatalog;
use crate::game::board::{Path, Zone};
use crate::game::state::MonsterInPlay;

/// Never spawn while this many monsters are already on the board.
pub const MAX_ACTIVE_MONSTERS: usize = 6;

const BASE_SPAWN_CHANCE: f64 = 0.4;
const SPAWN_CHANCE_PER_TURN: f64 = 0.05;

/// Chance that a new monster appears at the end of `turn`. Uncapped: from turn 12 on it is
/// certain.
pub fn spawn_chance(turn: u32) -> f64 {
    BASE_SPAWN_CHANCE + SPAWN_CHANCE_PER_TURN * f64::from(turn)
}

/// A random regular monster at full HP in the street of a random lane.
///
/// The id is a v4 UUID built from the random source, so a seeded game replays the same ids.
/// Returns `None` when the catalog has no regular template.
pub fn spawn_monster<R: RandomSource + ?Sized>(
    monsters: &MonsterCatalog,
    rng: &mut R,
) -> Option<MonsterInPlay> {
    let regular = monsters.regular();
    if regular.is_empty() {
        return None;
    }
    let template = regular[rng.pick_index(regular.len())];
    let path = Path::ALL[rng.pick_index(Path::ALL.len())];

    let mut id_bytes = [0_u8; 16];
    id_bytes[..8].copy_from_slice(&rng.next_u64().to_le_bytes());
    id_bytes[8..].copy_from_slice(&rng.next_u64().to_le_bytes());
    let id = uuid::Builder::from_random_bytes(id_bytes).into_uuid();

    Some(MonsterInPlay {
        id: format!("monster-{id}"),
        monster_id: template.id.clone(),
        current_hp: template.max_hp,
        path,
        zone: Zone::Street,
        target_room: path.target_room(),
    })
}
