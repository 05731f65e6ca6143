//! Deterministic dice source.
//!
//! Every roll is derived from the session seed and the roll counter, so a
//! recorded command stream replays to the same faces.

use crate::config::GameConfig;
use crate::state::DiceFaces;

/// RNG oracle for deterministic random number generation.
///
/// Implementations must produce the same value for the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a die with N sides (1-N inclusive).
    fn roll_die(&self, seed: u64, sides: u32) -> u32 {
        (self.next_u32(seed) % sides.max(1)) + 1
    }

    /// Rolls both movement dice for roll number `roll_count`.
    fn roll_pair(&self, game_seed: u64, roll_count: u64) -> DiceFaces {
        DiceFaces::new(
            self.roll_die(compute_seed(game_seed, roll_count, 0), GameConfig::DIE_SIDES),
            self.roll_die(compute_seed(game_seed, roll_count, 1), GameConfig::DIE_SIDES),
        )
    }
}

/// PCG-XSH-RR generator: 64-bit state, 32-bit output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Mixes the session seed, roll counter and die index into one seed.
///
/// `context` separates independent draws within the same roll (0 for die A,
/// 1 for die B).
pub fn compute_seed(game_seed: u64, roll_count: u64, context: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= roll_count.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // SplitMix64 finalizer
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
