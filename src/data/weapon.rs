//! Weapon catalog: craftable backyard weapons, their dice and element.
//! Loaded from data/weapons.json; never mutated once built.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::Element;
use crate::data::CatalogError;

pub const DEFAULT_WEAPONS_PATH: &str = "data/weapons.json";

/// The four cards that craft a weapon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recipe {
    pub essential: String,
    pub base: String,
    pub basic: String,
    pub trigger: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Base number of dice rolled per attack.
    pub firepower: u32,
    pub element: Element,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Recipe>,
}

impl WeaponRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, firepower: u32, element: Element) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            firepower,
            element,
            recipe: None,
        }
    }
}

/// On-disk shape of data/weapons.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponFile {
    #[serde(default)]
    pub data_version: Option<String>,
    pub weapons: Vec<WeaponRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct WeaponCatalog {
    weapons: Vec<WeaponRecord>,
}

impl WeaponCatalog {
    pub fn new(weapons: Vec<WeaponRecord>) -> Self {
        Self { weapons }
    }

    pub fn get(&self, id: &str) -> Option<&WeaponRecord> {
        self.weapons.iter().find(|weapon| weapon.id == id)
    }

    /// The weapon crafted from exactly this card combination, if any.
    pub fn weapon_by_recipe(&self, recipe: &Recipe) -> Option<&WeaponRecord> {
        self.weapons
            .iter()
            .find(|weapon| weapon.recipe.as_ref() == Some(recipe))
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeaponRecord> {
        self.weapons.iter()
    }

    pub fn as_slice(&self) -> &[WeaponRecord] {
        &self.weapons
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}

pub fn load_weapon_catalog(path: impl AsRef<Path>) -> Result<WeaponCatalog, CatalogError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file: WeaponFile = serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    Ok(WeaponCatalog::new(file.weapons))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(essential: &str, base: &str) -> Recipe {
        Recipe {
            essential: essential.to_string(),
            base: base.to_string(),
            basic: "basic-1".to_string(),
            trigger: "trigger-1".to_string(),
        }
    }

    #[test]
    fn lookup_by_id_and_recipe() {
        let mut nerf = WeaponRecord::new("weapon-1", "Sentinela Nerf", 3, Element::Physical);
        nerf.recipe = Some(recipe("essential-1", "base-1"));
        let catalog = WeaponCatalog::new(vec![
            nerf,
            WeaponRecord::new("weapon-3", "Sentinela de Fogo", 4, Element::Fire),
        ]);

        assert_eq!(catalog.get("weapon-3").map(|w| w.firepower), Some(4));
        assert!(catalog.get("weapon-99").is_none());
        assert_eq!(
            catalog
                .weapon_by_recipe(&recipe("essential-1", "base-1"))
                .map(|w| w.id.as_str()),
            Some("weapon-1")
        );
        assert!(catalog.weapon_by_recipe(&recipe("essential-1", "base-2")).is_none());
    }

    #[test]
    fn parses_camel_case_record() {
        let raw = r#"{"id":"weapon-22","name":"Congelador CO2","firepower":4,"element":"ice"}"#;
        let record: WeaponRecord = serde_json::from_str(raw).expect("weapon should parse");
        assert_eq!(record.element, Element::Ice);
        assert!(record.recipe.is_none());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_weapon_catalog("data/does-not-exist.json").expect_err("should fail");
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
