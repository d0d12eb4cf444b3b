//! Game session state and the setup-phase operations that build it.
//!
//! During setup the player places weapons (at most one per lane/depth cell) and may remove
//! them again. Starting the game freezes the layout; from then on only the turn engine
//! changes the state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::RandomSource;
use crate::data::{MonsterCatalog, WeaponCatalog};
use crate::game::board::{Path, Room, Zone};
use crate::game::spawn::spawn_monster;

pub const MAX_TURNS: u32 = 10;
pub const MAX_ESCAPED: u32 = 3;
pub const MIN_WEAPONS_TO_START: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Setup,
    Playing,
    Victory,
    Defeat,
}

impl GamePhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Playing => "playing",
            Self::Victory => "victory",
            Self::Defeat => "defeat",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedWeapon {
    pub id: String,
    pub weapon_id: String,
    pub path: Path,
    pub zone: Zone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterInPlay {
    pub id: String,
    pub monster_id: String,
    pub current_hp: u32,
    pub path: Path,
    pub zone: Zone,
    pub target_room: Room,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub phase: GamePhase,
    pub current_turn: u32,
    pub max_turns: u32,
    pub placed_weapons: Vec<PlacedWeapon>,
    pub monsters: Vec<MonsterInPlay>,
    pub monsters_defeated: u32,
    pub monsters_escaped: u32,
    pub max_escaped: u32,
    /// Lanes in the order a monster was first seen on them.
    pub revealed_paths: Vec<Path>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("weapons can only be changed during setup (phase is {0})")]
    NotInSetup(GamePhase),
    #[error("{path}/{zone} already holds a weapon")]
    CellOccupied { path: Path, zone: Zone },
    #[error("unknown weapon '{0}'")]
    UnknownWeapon(String),
    #[error("no placed weapon with id '{0}'")]
    UnknownPlacement(String),
    #[error("at least {required} weapons must be placed (have {placed})")]
    NotEnoughWeapons { placed: usize, required: usize },
    #[error("monster catalog has no regular monster to spawn")]
    NoSpawnableMonsters,
}

impl GameState {
    /// A fresh session: setup phase, turn 0, empty board.
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Setup,
            current_turn: 0,
            max_turns: MAX_TURNS,
            placed_weapons: Vec::new(),
            monsters: Vec::new(),
            monsters_defeated: 0,
            monsters_escaped: 0,
            max_escaped: MAX_ESCAPED,
            revealed_paths: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn weapon_at(&self, path: Path, zone: Zone) -> Option<&PlacedWeapon> {
        self.placed_weapons
            .iter()
            .find(|placed| placed.path == path && placed.zone == zone)
    }

    /// Places a catalog weapon on an empty cell. The placement id is derived from the cell,
    /// which is unique while the weapon stands there.
    pub fn place_weapon(
        &mut self,
        weapons: &WeaponCatalog,
        weapon_id: &str,
        path: Path,
        zone: Zone,
    ) -> Result<&PlacedWeapon, SetupError> {
        self.ensure_setup()?;
        if weapons.get(weapon_id).is_none() {
            return Err(SetupError::UnknownWeapon(weapon_id.to_string()));
        }
        if self.weapon_at(path, zone).is_some() {
            return Err(SetupError::CellOccupied { path, zone });
        }

        let index = self.placed_weapons.len();
        self.placed_weapons.push(PlacedWeapon {
            id: format!("placed-{path}-{zone}"),
            weapon_id: weapon_id.to_string(),
            path,
            zone,
        });
        Ok(&self.placed_weapons[index])
    }

    pub fn remove_weapon(&mut self, placement_id: &str) -> Result<PlacedWeapon, SetupError> {
        self.ensure_setup()?;
        let index = self
            .placed_weapons
            .iter()
            .position(|placed| placed.id == placement_id)
            .ok_or_else(|| SetupError::UnknownPlacement(placement_id.to_string()))?;
        Ok(self.placed_weapons.remove(index))
    }

    /// Leaves setup: turn 1 with a single freshly spawned monster on the board.
    pub fn start<R: RandomSource + ?Sized>(
        &mut self,
        monsters: &MonsterCatalog,
        rng: &mut R,
    ) -> Result<(), SetupError> {
        self.ensure_setup()?;
        if self.placed_weapons.len() < MIN_WEAPONS_TO_START {
            return Err(SetupError::NotEnoughWeapons {
                placed: self.placed_weapons.len(),
                required: MIN_WEAPONS_TO_START,
            });
        }
        let first = spawn_monster(monsters, rng).ok_or(SetupError::NoSpawnableMonsters)?;

        tracing::info!(
            weapons = self.placed_weapons.len(),
            monster = %first.monster_id,
            path = %first.path,
            "game started"
        );
        self.phase = GamePhase::Playing;
        self.current_turn = 1;
        self.monsters = vec![first];
        Ok(())
    }

    fn ensure_setup(&self) -> Result<(), SetupError> {
        if self.phase == GamePhase::Setup {
            Ok(())
        } else {
            Err(SetupError::NotInSetup(self.phase))
        }
    }
}
