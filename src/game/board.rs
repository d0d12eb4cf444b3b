//! Board topology: three lanes, three depths, one room behind each lane.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Path {
    Left,
    Center,
    Right,
}

impl Path {
    pub const ALL: [Path; 3] = [Self::Left, Self::Center, Self::Right];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    /// The room a monster on this lane is heading for.
    pub const fn target_room(self) -> Room {
        match self {
            Self::Left => Room::Bedroom,
            Self::Center => Room::Kitchen,
            Self::Right => Room::Living,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|path| path.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Street,
    Yard,
    House,
}

impl Zone {
    pub const ALL: [Zone; 3] = [Self::Street, Self::Yard, Self::House];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Street => "street",
            Self::Yard => "yard",
            Self::House => "house",
        }
    }

    /// One step toward the house; the house is the last stop.
    pub const fn next(self) -> Zone {
        match self {
            Self::Street => Self::Yard,
            Self::Yard | Self::House => Self::House,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|zone| zone.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Room {
    Bedroom,
    Kitchen,
    Living,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zones_advance_and_saturate_at_house() {
        assert_eq!(Zone::Street.next(), Zone::Yard);
        assert_eq!(Zone::Yard.next(), Zone::House);
        assert_eq!(Zone::House.next(), Zone::House);
    }

    #[test]
    fn every_path_targets_a_distinct_room() {
        assert_eq!(Path::Left.target_room(), Room::Bedroom);
        assert_eq!(Path::Center.target_room(), Room::Kitchen);
        assert_eq!(Path::Right.target_room(), Room::Living);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Path::parse(" Center "), Some(Path::Center));
        assert_eq!(Zone::parse("YARD"), Some(Zone::Yard));
        assert_eq!(Zone::parse("garage"), None);
    }
}
