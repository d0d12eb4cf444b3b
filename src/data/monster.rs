//! Monster templates (folklore creatures) and their weakness/resistance cards.
//! Used to build a DefenderProfile for combat and to pick spawns in the turn engine.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::{tags_in, AffinityTag};
use crate::data::CatalogError;

pub const DEFAULT_MONSTERS_PATH: &str = "data/monsters.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonsterCategory {
    Regular,
    Boss,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weakness {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resistance {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    /// Printed on some cards but not applied: a matching resistance always costs exactly one
    /// success, immune or not.
    #[serde(default)]
    pub is_immune: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterTemplate {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub hp: u32,
    pub max_hp: u32,
    #[serde(default)]
    pub movement: u32,
    pub weakness: Weakness,
    pub resistance: Resistance,
    pub category: MonsterCategory,
    #[serde(skip)]
    weakness_tags: Vec<AffinityTag>,
    #[serde(skip)]
    resistance_tags: Vec<AffinityTag>,
}

impl MonsterTemplate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        hp: u32,
        weakness: &str,
        resistance: &str,
        category: MonsterCategory,
    ) -> Self {
        let mut template = Self {
            id: id.into(),
            name: name.into(),
            description: None,
            hp,
            max_hp: hp,
            movement: 1,
            weakness: Weakness {
                kind: weakness.to_string(),
                description: String::new(),
            },
            resistance: Resistance {
                kind: resistance.to_string(),
                description: String::new(),
                is_immune: false,
            },
            category,
            weakness_tags: Vec::new(),
            resistance_tags: Vec::new(),
        };
        template.index_affinities();
        template
    }

    /// Recomputes the tag sets from the free-text categories. Called once per template when a
    /// catalog is built; deserialization alone leaves the tags empty.
    pub fn index_affinities(&mut self) {
        self.weakness_tags = tags_in(&self.weakness.kind);
        self.resistance_tags = tags_in(&self.resistance.kind);
    }

    pub fn weakness_tags(&self) -> &[AffinityTag] {
        &self.weakness_tags
    }

    pub fn resistance_tags(&self) -> &[AffinityTag] {
        &self.resistance_tags
    }

    pub fn is_regular(&self) -> bool {
        self.category == MonsterCategory::Regular
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterFile {
    #[serde(default)]
    pub data_version: Option<String>,
    pub monsters: Vec<MonsterTemplate>,
}

#[derive(Debug, Clone, Default)]
pub struct MonsterCatalog {
    monsters: Vec<MonsterTemplate>,
}

impl MonsterCatalog {
    pub fn new(mut monsters: Vec<MonsterTemplate>) -> Self {
        for template in &mut monsters {
            template.index_affinities();
        }
        Self { monsters }
    }

    pub fn get(&self, id: &str) -> Option<&MonsterTemplate> {
        self.monsters.iter().find(|monster| monster.id == id)
    }

    /// Templates eligible for automatic spawning, in catalog order. Bosses never auto-spawn.
    pub fn regular(&self) -> Vec<&MonsterTemplate> {
        self.monsters.iter().filter(|m| m.is_regular()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonsterTemplate> {
        self.monsters.iter()
    }

    pub fn as_slice(&self) -> &[MonsterTemplate] {
        &self.monsters
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }
}

pub fn load_monster_catalog(path: impl AsRef<Path>) -> Result<MonsterCatalog, CatalogError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file: MonsterFile = serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    Ok(MonsterCatalog::new(file.monsters))
}
