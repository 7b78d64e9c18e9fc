//! Seeded randomness for reproducible tie-breaking.
//!
//! Every random decision the scheduler makes (ordering equal-speed
//! participants) is drawn from a [`TieBreaker`] stream derived from the
//! battle seed. Given the same seed and the same sequence of draws, the
//! stream yields the same values, which is what makes a battle replayable.

/// Stateless RNG oracle: maps a fully-mixed seed to a random value.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// Uses the PCG-XSH-RR variant, which produces 32-bit output from 64-bit
/// state: one LCG step followed by an xorshift and a random rotation.
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
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

/// Compute a deterministic seed from battle components.
///
/// * `battle_seed` - Base seed set at battle start
/// * `nonce` - Draw sequence number within one stream
/// * `stream` - Independent stream identifier (one per ordering queue)
/// * `context` - Distinguishes multiple draws for the same nonce
pub fn compute_seed(battle_seed: u64, nonce: u64, stream: u32, context: u32) -> u64 {
    // SplitMix64 / FxHash multipliers with a murmur3 finalizer
    let mut hash = battle_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (stream as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xc4ceb9fe1a85ec53);
    hash ^= hash >> 33;

    hash
}

/// Seeded, stateful stream of tie-break draws.
///
/// Queues draw one 64-bit *ticket* per pushed element. Sorting equal keys by
/// ticket is a uniformly random permutation of the tied group, yet the order
/// never changes while the group is queued: re-sorting with no state change
/// is idempotent, and removing an element leaves the rest in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TieBreaker {
    seed: u64,
    stream: u32,
    drawn: u64,
}

impl TieBreaker {
    pub fn new(seed: u64) -> Self {
        Self::with_stream(seed, 0)
    }

    /// Creates an independent stream for the same battle seed.
    pub fn with_stream(seed: u64, stream: u32) -> Self {
        Self {
            seed,
            stream,
            drawn: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn stream(&self) -> u32 {
        self.stream
    }

    /// Number of 32-bit values drawn so far.
    pub fn drawn(&self) -> u64 {
        self.drawn
    }

    pub fn next_u32(&mut self) -> u32 {
        let value = PcgRng.next_u32(compute_seed(self.seed, self.drawn, self.stream, 0));
        self.drawn += 1;
        value
    }

    /// Draws a 64-bit tie-break ticket.
    pub fn next_ticket(&mut self) -> u64 {
        let high = u64::from(self.next_u32());
        let low = u64::from(self.next_u32());
        (high << 32) | low
    }

    /// Uniform value in `0..bound` (rejection sampling, no modulo bias).
    ///
    /// Returns 0 when `bound` is 0 or 1.
    pub fn below(&mut self, bound: u32) -> u32 {
        if bound <= 1 {
            return 0;
        }
        // Largest multiple of `bound` representable in u32 space.
        let zone = u32::MAX - (u32::MAX - bound + 1) % bound;
        loop {
            let value = self.next_u32();
            if value <= zone {
                return value % bound;
            }
        }
    }

    /// Fisher–Yates shuffle driven by this stream.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i as u32 + 1) as usize;
            items.swap(i, j);
        }
    }
}
