//! Element and weakness/resistance tag tables.
//!
//! Monster cards describe weaknesses and resistances as free text ("Água/Som/Lama").
//! That text is reduced to a set of [AffinityTag]s once, when the catalog is built; combat
//! only ever asks whether an (element, tag) pair is listed in one of the fixed tables below.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Physical,
    Fire,
    Water,
    Electric,
    Ice,
    Earth,
    Sound,
}

impl Element {
    pub const ALL: [Element; 7] = [
        Self::Physical,
        Self::Fire,
        Self::Water,
        Self::Electric,
        Self::Ice,
        Self::Earth,
        Self::Sound,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Fire => "fire",
            Self::Water => "water",
            Self::Electric => "electric",
            Self::Ice => "ice",
            Self::Earth => "earth",
            Self::Sound => "sound",
        }
    }

    /// Weakness tags this element exploits for one bonus die. Fire exploits none.
    pub const fn weakness_tags(self) -> &'static [AffinityTag] {
        use AffinityTag::*;
        match self {
            Self::Physical => &[Physical, Traps, Piercing],
            Self::Fire => &[],
            Self::Water => &[Fire, Electricity],
            Self::Electric => &[Electricity, Shock],
            Self::Ice => &[Fire, Ice],
            Self::Earth => &[GroundTraps, Mud, Water],
            Self::Sound => &[Sound, Water],
        }
    }

    /// Resistance tags that cost this element one success.
    pub const fn resistance_tags(self) -> &'static [AffinityTag] {
        use AffinityTag::*;
        match self {
            Self::Physical => &[Physical, Sensors],
            Self::Fire => &[Fire, Heat],
            Self::Water => &[Water],
            Self::Electric => &[Electricity],
            Self::Ice => &[Ice, Cold],
            Self::Earth => &[Earth, Mud],
            Self::Sound => &[Sound],
        }
    }

    pub fn exploits(self, weakness: &[AffinityTag]) -> bool {
        self.weakness_tags().iter().any(|tag| weakness.contains(tag))
    }

    pub fn is_resisted_by(self, resistance: &[AffinityTag]) -> bool {
        self.resistance_tags().iter().any(|tag| resistance.contains(tag))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffinityTag {
    Physical,
    Traps,
    Piercing,
    Water,
    Ice,
    Fire,
    Electricity,
    Shock,
    GroundTraps,
    Mud,
    Sound,
    Sensors,
    Heat,
    Cold,
    Earth,
}

impl AffinityTag {
    pub const ALL: [AffinityTag; 15] = [
        Self::Physical,
        Self::Traps,
        Self::Piercing,
        Self::Water,
        Self::Ice,
        Self::Fire,
        Self::Electricity,
        Self::Shock,
        Self::GroundTraps,
        Self::Mud,
        Self::Sound,
        Self::Sensors,
        Self::Heat,
        Self::Cold,
        Self::Earth,
    ];

    /// Keyword as printed on the monster cards.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Physical => "Físico",
            Self::Traps => "Armadilhas",
            Self::Piercing => "Perfuração",
            Self::Water => "Água",
            Self::Ice => "Gelo",
            Self::Fire => "Fogo",
            Self::Electricity => "Eletricidade",
            Self::Shock => "Choque",
            Self::GroundTraps => "Armadilhas de Chão",
            Self::Mud => "Lama",
            Self::Sound => "Som",
            Self::Sensors => "Sensores",
            Self::Heat => "Calor",
            Self::Cold => "Frio",
            Self::Earth => "Terra",
        }
    }
}

/// Every tag whose keyword appears in `category`, ignoring case.
///
/// Containment is deliberate: "Armadilhas de Chão" carries both `GroundTraps` and `Traps`,
/// "Físico Leve" carries `Physical`.
pub fn tags_in(category: &str) -> Vec<AffinityTag> {
    let haystack = category.to_lowercase();
    AffinityTag::ALL
        .into_iter()
        .filter(|tag| haystack.contains(&tag.keyword().to_lowercase()))
        .collect()
}
