pub mod loader;
pub mod monster;
pub mod validate;
pub mod weapon;

pub use loader::{Catalogs, DEFAULT_DATA_DIR};
pub use monster::{
    load_monster_catalog, MonsterCatalog, MonsterCategory, MonsterTemplate, Resistance, Weakness,
    DEFAULT_MONSTERS_PATH,
};
pub use validate::{validate_catalogs, ValidationDiagnostic, ValidationReport, ValidationSeverity};
pub use weapon::{load_weapon_catalog, Recipe, WeaponCatalog, WeaponRecord, DEFAULT_WEAPONS_PATH};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unable to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse json '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
