pub mod affinity;
pub mod engine;
pub mod rng;

pub use affinity::{tags_in, AffinityTag, Element};
pub use engine::{
    is_hit, resolve_combat, CombatResult, DefenderProfile, DieRoll, WeaponProfile, HIT_THRESHOLD,
};
pub use rng::{entropy_seed, RandomSource, Rng, ScriptedSource};
