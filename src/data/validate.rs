use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::combat::tags_in;
use crate::data::{MonsterCatalog, WeaponCatalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn with_severity(
        &self,
        severity: ValidationSeverity,
    ) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(move |diag| diag.severity == severity)
    }
}

pub fn validate_catalogs(weapons: &WeaponCatalog, monsters: &MonsterCatalog) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_weapons(&mut report, weapons);
    validate_monsters(&mut report, monsters);
    report
}

fn validate_weapons(report: &mut ValidationReport, weapons: &WeaponCatalog) {
    let mut seen_ids = HashSet::new();
    let mut seen_recipes = HashSet::new();

    for (index, weapon) in weapons.iter().enumerate() {
        let context = format!("weapons[{index}] id='{}'", weapon.id);
        if weapon.id.trim().is_empty() {
            report.push(ValidationSeverity::Error, &context, "missing non-empty 'id'");
        } else if !seen_ids.insert(weapon.id.as_str()) {
            report.push(
                ValidationSeverity::Error,
                &context,
                format!("duplicate id '{}'", weapon.id),
            );
        }
        if weapon.name.trim().is_empty() {
            report.push(ValidationSeverity::Error, &context, "missing non-empty 'name'");
        }
        if weapon.firepower == 0 {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.firepower"),
                "firepower is 0; this weapon never rolls a die",
            );
        }
        if let Some(recipe) = &weapon.recipe {
            if !seen_recipes.insert(recipe) {
                report.push(
                    ValidationSeverity::Warning,
                    format!("{context}.recipe"),
                    "card combination already crafts another weapon; lookups return the first",
                );
            }
        }
    }
}

fn validate_monsters(report: &mut ValidationReport, monsters: &MonsterCatalog) {
    let mut seen_ids = HashSet::new();

    for (index, monster) in monsters.iter().enumerate() {
        let context = format!("monsters[{index}] id='{}'", monster.id);
        if monster.id.trim().is_empty() {
            report.push(ValidationSeverity::Error, &context, "missing non-empty 'id'");
        } else if !seen_ids.insert(monster.id.as_str()) {
            report.push(
                ValidationSeverity::Error,
                &context,
                format!("duplicate id '{}'", monster.id),
            );
        }
        if monster.hp == 0 {
            report.push(ValidationSeverity::Error, format!("{context}.hp"), "hp must be positive");
        }
        if monster.hp != monster.max_hp {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.hp"),
                format!("template hp {} differs from maxHp {}", monster.hp, monster.max_hp),
            );
        }

        check_affinity(report, format!("{context}.weakness"), &monster.weakness.kind);
        check_affinity(report, format!("{context}.resistance"), &monster.resistance.kind);

        if monster.resistance.is_immune {
            report.push(
                ValidationSeverity::Info,
                format!("{context}.resistance.isImmune"),
                "immunity is not applied; a matching resistance removes one success",
            );
        }
    }

    if !monsters.is_empty() && monsters.regular().is_empty() {
        report.push(
            ValidationSeverity::Warning,
            "monsters",
            "no regular monster; nothing can spawn",
        );
    }
}

fn check_affinity(report: &mut ValidationReport, context: String, category: &str) {
    let tags = tags_in(category);
    match tags.len() {
        0 => report.push(
            ValidationSeverity::Warning,
            context,
            format!("category '{category}' matches no element keyword"),
        ),
        1 => {}
        _ => {
            let keywords: Vec<&str> = tags.iter().map(|tag| tag.keyword()).collect();
            report.push(
                ValidationSeverity::Warning,
                context,
                format!(
                    "category '{category}' matches several keywords: {}",
                    keywords.join(", ")
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Element;
    use crate::data::{MonsterCategory, MonsterTemplate, WeaponRecord};

    #[test]
    fn clean_catalog_has_no_diagnostics() {
        let weapons = WeaponCatalog::new(vec![WeaponRecord::new("w", "Nerf", 3, Element::Physical)]);
        let monsters = MonsterCatalog::new(vec![MonsterTemplate::new(
            "m",
            "Boitatá",
            4,
            "Gelo",
            "Fogo",
            MonsterCategory::Regular,
        )]);
        let report = validate_catalogs(&weapons, &monsters);
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    }

    #[test]
    fn duplicate_ids_and_bad_hp_are_errors() {
        let weapons = WeaponCatalog::new(vec![
            WeaponRecord::new("w", "A", 1, Element::Fire),
            WeaponRecord::new("w", "B", 0, Element::Fire),
        ]);
        let mut broken = MonsterTemplate::new("m", "Saci", 3, "Gelo", "Fogo", MonsterCategory::Regular);
        broken.max_hp = 5;
        let monsters = MonsterCatalog::new(vec![broken]);

        let report = validate_catalogs(&weapons, &monsters);

        assert!(report.has_errors());
        assert_eq!(report.with_severity(ValidationSeverity::Error).count(), 2);
        assert!(report
            .with_severity(ValidationSeverity::Warning)
            .any(|diag| diag.context.ends_with(".firepower")));
    }

    #[test]
    fn ambiguous_and_unmatched_categories_warn() {
        let monsters = MonsterCatalog::new(vec![MonsterTemplate::new(
            "m",
            "Cuca",
            10,
            "Água/Som/Lama",
            "Tudo Isolado",
            MonsterCategory::Boss,
        )]);
        let report = validate_catalogs(&WeaponCatalog::default(), &monsters);
        let warnings: Vec<_> = report.with_severity(ValidationSeverity::Warning).collect();
        assert!(warnings.iter().any(|d| d.message.contains("several keywords")));
        assert!(warnings.iter().any(|d| d.message.contains("no element keyword")));
        assert!(warnings.iter().any(|d| d.message.contains("nothing can spawn")));
        assert!(!report.has_errors());
    }
}
