//! RNG oracle for deterministic dice.
//!
//! Every probabilistic decision in a resolution (to-hit roll, intercept check,
//! scatter direction, minefield clearance) makes exactly one call into the
//! oracle with a seed derived from the session seed and the attack being
//! resolved.
//!
//! # Determinism
//!
//! All RNG implementations must be deterministic: given the same seed,
//! they must produce the same value. Replays and audits depend on it.

/// RNG oracle for deterministic random number generation.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Roll a die with N sides (1-N inclusive).
    fn roll_die(&self, seed: u64, sides: u32) -> u32 {
        (self.next_u32(seed) % sides.max(1)) + 1
    }

    /// Roll two six-sided dice and return their sum (2-12 inclusive).
    ///
    /// Both dice come from a single draw so the roll stays one oracle call.
    fn roll_2d6(&self, seed: u64) -> u32 {
        let value = self.next_u32(seed);
        let first = value % 6 + 1;
        let second = (value / 6) % 6 + 1;
        first + second
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR: 32-bit output from 64-bit state. Stateless from the caller's
/// point of view: the seed is the state.
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
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Compute a deterministic seed for one random decision.
///
/// # Arguments
///
/// * `session_seed` - Base seed set at session start
/// * `nonce` - Turn and attack combined by [`attack_nonce`]
/// * `actor_id` - Unit performing the action
/// * `context` - Which roll inside the resolution (see [`RollContext`])
pub fn compute_seed(session_seed: u64, nonce: u64, actor_id: u32, context: u32) -> u64 {
    // Constants are based on SplitMix64 and FxHash multipliers
    let mut hash = session_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor_id as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Packs a turn and an attack id into one nonce.
pub const fn attack_nonce(turn: u32, attack: u32) -> u64 {
    ((turn as u64) << 32) | attack as u64
}

/// Seed source for every roll made while resolving one attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RollSeeds {
    session_seed: u64,
    nonce: u64,
    actor: u32,
}

impl RollSeeds {
    pub const fn new(session_seed: u64, turn: u32, attack: u32, actor: u32) -> Self {
        Self {
            session_seed,
            nonce: attack_nonce(turn, attack),
            actor,
        }
    }

    pub fn seed(&self, context: RollContext) -> u64 {
        compute_seed(self.session_seed, self.nonce, self.actor, context.code())
    }
}

/// Distinguishes the independent rolls made while resolving one attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RollContext {
    ToHit,
    Intercept,
    /// One per round in a bay.
    Scatter(u8),
    /// One per minefield hex touched by a blast, in blast order.
    Minefield(u16),
}

impl RollContext {
    pub const fn code(self) -> u32 {
        match self {
            RollContext::ToHit => 0,
            RollContext::Intercept => 1,
            RollContext::Scatter(round) => 0x100 + round as u32,
            RollContext::Minefield(index) => 0x1_0000 + index as u32,
        }
    }
}
