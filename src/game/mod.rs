pub mod board;
pub mod spawn;
pub mod state;
pub mod turn;

pub use board::{Path, Room, Zone};
pub use spawn::{spawn_chance, spawn_monster, MAX_ACTIVE_MONSTERS};
pub use state::{
    GamePhase, GameState, MonsterInPlay, PlacedWeapon, SetupError, MAX_ESCAPED, MAX_TURNS,
    MIN_WEAPONS_TO_START,
};
pub use turn::{advance_turn, CombatLogEntry, TurnOutcome};
