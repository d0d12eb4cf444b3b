//! Random sources for dice rolls and spawn decisions. Uses SplitMix64 for throughput and good
//! statistical quality. Deterministic: same seed produces the same sequence. Not cryptographically secure.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

/// Anything the resolver and turn engine can draw randomness from.
///
/// Only [RandomSource::next_u64] is required; the dice, coin-flip and pick helpers derive from it
/// so a seeded source replays the exact same game.
pub trait RandomSource {
    fn next_u64(&mut self) -> u64;

    /// A fair six-sided die, 1..=6.
    fn roll_d6(&mut self) -> u8 {
        (self.next_u64() % 6) as u8 + 1
    }

    /// Uniform float in [0, 1) built from the top 53 bits.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform index in `0..len`. Returns 0 for empty or single-element ranges.
    fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        (self.next_u64() % len as u64) as usize
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }

    fn roll_d6(&mut self) -> u8 {
        (**self).roll_d6()
    }

    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        (**self).pick_index(len)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }
}

impl RandomSource for Rng {
    #[inline]
    fn next_u64(&mut self) -> u64 {
        Rng::next_u64(self)
    }
}

/// Seed for callers that did not ask for a reproducible run.
/// Falls back to the wall clock when the OS source is unavailable.
pub fn entropy_seed() -> u64 {
    let mut bytes = [0_u8; 8];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => u64::from_le_bytes(bytes),
        Err(err) => {
            tracing::warn!(%err, "os entropy unavailable, seeding from clock");
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_nanos() as u64)
                .unwrap_or(SPLITMIX64_GOLDEN)
        }
    }
}

/// Replays forced outcomes in order, then defers to a seeded [Rng].
///
/// Dice, uniforms and picks are queued independently, so a test can pin the dice of one
/// combat without having to predict how many draws the spawn step makes.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    dice: VecDeque<u8>,
    uniforms: VecDeque<f64>,
    picks: VecDeque<usize>,
    fallback: Rng,
}

impl ScriptedSource {
    pub fn new(seed: u64) -> Self {
        Self {
            dice: VecDeque::new(),
            uniforms: VecDeque::new(),
            picks: VecDeque::new(),
            fallback: Rng::new(seed),
        }
    }

    /// Shorthand for a source that only forces dice.
    pub fn with_dice(dice: impl IntoIterator<Item = u8>) -> Self {
        Self::new(0).dice(dice)
    }

    pub fn dice(mut self, dice: impl IntoIterator<Item = u8>) -> Self {
        self.dice.extend(dice);
        self
    }

    pub fn uniforms(mut self, uniforms: impl IntoIterator<Item = f64>) -> Self {
        self.uniforms.extend(uniforms);
        self
    }

    pub fn picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    pub fn pending_dice(&self) -> usize {
        self.dice.len()
    }
}

impl RandomSource for ScriptedSource {
    fn next_u64(&mut self) -> u64 {
        self.fallback.next_u64()
    }

    fn roll_d6(&mut self) -> u8 {
        match self.dice.pop_front() {
            Some(value) => value,
            None => (self.fallback.next_u64() % 6) as u8 + 1,
        }
    }

    fn next_f64(&mut self) -> f64 {
        match self.uniforms.pop_front() {
            Some(value) => value,
            None => (self.fallback.next_u64() >> 11) as f64 / (1u64 << 53) as f64,
        }
    }

    fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        match self.picks.pop_front() {
            Some(index) => index % len,
            None => (self.fallback.next_u64() % len as u64) as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitmix64_deterministic() {
        let mut a = Rng::new(7);
        let mut b = Rng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn splitmix64_different_seeds_differ() {
        let mut a = Rng::new(1);
        let mut b = Rng::new(2);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn d6_stays_in_range_and_hits_every_face() {
        let mut rng = Rng::new(42);
        let mut seen = [false; 6];
        for _ in 0..1_000 {
            let value = rng.roll_d6();
            assert!((1..=6).contains(&value));
            seen[usize::from(value - 1)] = true;
        }
        assert!(seen.iter().all(|face| *face));
    }

    #[test]
    fn uniform_is_half_open() {
        let mut rng = Rng::new(3);
        for _ in 0..1_000 {
            let value = rng.next_f64();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn scripted_source_replays_queue_then_falls_back() {
        let mut source = ScriptedSource::with_dice([6, 5, 2]).uniforms([0.25]).picks([4]);
        assert_eq!(source.roll_d6(), 6);
        assert_eq!(source.roll_d6(), 5);
        assert_eq!(source.roll_d6(), 2);
        assert_eq!(source.pending_dice(), 0);
        assert!((1..=6).contains(&source.roll_d6()));
        assert_eq!(source.next_f64(), 0.25);
        assert_eq!(source.pick_index(3), 1);
    }
}
