//! Loads the weapon and monster catalogs from a data directory and reports
//! data-validation findings once at load time.

use std::path::Path;

use crate::data::monster::{load_monster_catalog, MonsterCatalog};
use crate::data::validate::{validate_catalogs, ValidationReport, ValidationSeverity};
use crate::data::weapon::{load_weapon_catalog, WeaponCatalog};
use crate::data::CatalogError;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const WEAPONS_FILE: &str = "weapons.json";
pub const MONSTERS_FILE: &str = "monsters.json";

/// Both read-only reference tables, passed explicitly to every operation that needs them.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub weapons: WeaponCatalog,
    pub monsters: MonsterCatalog,
}

impl Catalogs {
    pub fn new(weapons: WeaponCatalog, monsters: MonsterCatalog) -> Self {
        Self { weapons, monsters }
    }

    /// Reads `<dir>/weapons.json` and `<dir>/monsters.json`. Validation findings are logged,
    /// never fatal: a catalog with warnings still plays.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let data_dir = data_dir.as_ref();
        let weapons = load_weapon_catalog(data_dir.join(WEAPONS_FILE))?;
        let monsters = load_monster_catalog(data_dir.join(MONSTERS_FILE))?;
        let catalogs = Self::new(weapons, monsters);

        let report = catalogs.validate();
        log_report(&report);
        tracing::info!(
            dir = %data_dir.display(),
            weapons = catalogs.weapons.len(),
            monsters = catalogs.monsters.len(),
            "catalogs loaded"
        );
        Ok(catalogs)
    }

    pub fn validate(&self) -> ValidationReport {
        validate_catalogs(&self.weapons, &self.monsters)
    }
}

fn log_report(report: &ValidationReport) {
    for diag in &report.diagnostics {
        match diag.severity {
            ValidationSeverity::Error => {
                tracing::error!(context = %diag.context, "{}", diag.message)
            }
            ValidationSeverity::Warning => {
                tracing::warn!(context = %diag.context, "{}", diag.message)
            }
            ValidationSeverity::Info => {
                tracing::debug!(context = %diag.context, "{}", diag.message)
            }
        }
    }
}
