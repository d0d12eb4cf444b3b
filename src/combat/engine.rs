//! Dice combat between one weapon and one monster.
//!
//! A weapon rolls `firepower` d6, plus one die when its element exploits the monster's
//! weakness. Every 4+ is a hit; a matching resistance cancels one hit. Each surviving hit
//! removes one HP.

use serde::Serialize;

use crate::combat::affinity::{AffinityTag, Element};
use crate::combat::rng::RandomSource;
use crate::data::{MonsterTemplate, WeaponRecord};

/// Lowest die face that counts as a hit.
pub const HIT_THRESHOLD: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponProfile {
    pub firepower: u32,
    pub element: Element,
}

impl From<&WeaponRecord> for WeaponProfile {
    fn from(record: &WeaponRecord) -> Self {
        Self {
            firepower: record.firepower,
            element: record.element,
        }
    }
}

/// The defender as seen at the moment of the attack: `hp` is current, not maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefenderProfile<'a> {
    pub hp: u32,
    pub weakness: &'a [AffinityTag],
    pub resistance: &'a [AffinityTag],
}

impl<'a> DefenderProfile<'a> {
    pub fn from_template(template: &'a MonsterTemplate, current_hp: u32) -> Self {
        Self {
            hp: current_hp,
            weakness: template.weakness_tags(),
            resistance: template.resistance_tags(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DieRoll {
    pub value: u8,
    pub is_hit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatResult {
    pub dice_rolls: Vec<DieRoll>,
    pub total_damage: u32,
    pub hits: u32,
    /// Counted against the raw hits, so `hits + misses` falls one short of the pool when
    /// resistance cancelled a hit.
    pub misses: u32,
    pub is_weakness: bool,
    pub is_resistance: bool,
    pub extra_dice_from_weakness: u32,
    pub reduced_success_from_resistance: u32,
    pub monster_defeated: bool,
    pub monster_remaining_hp: u32,
}

impl CombatResult {
    pub fn dice_pool(&self) -> usize {
        self.dice_rolls.len()
    }
}

pub fn is_hit(value: u8) -> bool {
    value >= HIT_THRESHOLD
}

/// Resolves one attack. Total: zero firepower or an already-defeated defender simply yields
/// no damage.
pub fn resolve_combat<R: RandomSource + ?Sized>(
    weapon: &WeaponProfile,
    defender: &DefenderProfile<'_>,
    rng: &mut R,
) -> CombatResult {
    let extra_dice = u32::from(weapon.element.exploits(defender.weakness));
    let total_dice = weapon.firepower + extra_dice;

    let dice_rolls: Vec<DieRoll> = (0..total_dice)
        .map(|_| {
            let value = rng.roll_d6();
            DieRoll {
                value,
                is_hit: is_hit(value),
            }
        })
        .collect();

    let resisted = weapon.element.is_resisted_by(defender.resistance);
    let raw_hits = dice_rolls.iter().filter(|roll| roll.is_hit).count() as u32;
    let hits = if resisted {
        raw_hits.saturating_sub(1)
    } else {
        raw_hits
    };

    let total_damage = hits;
    let remaining_hp = defender.hp.saturating_sub(total_damage);

    CombatResult {
        dice_rolls,
        total_damage,
        hits,
        misses: total_dice - raw_hits,
        is_weakness: extra_dice > 0,
        is_resistance: resisted,
        extra_dice_from_weakness: extra_dice,
        reduced_success_from_resistance: u32::from(resisted),
        monster_defeated: remaining_hp == 0,
        monster_remaining_hp: remaining_hp,
    }
}
