//! Uniform random index sources used by the identity sampler.
//!
//! Sampling only ever needs two primitives: a uniform index into a pool and
//! an unbiased coin flip. Keeping them behind [`IndexSource`] lets tests
//! replay exact sequences and assert collision and shortfall behaviour.

use std::num::NonZeroUsize;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniformly distributed pool indices and coin flips.
pub trait IndexSource {
    /// Returns an index in `0..len`.
    fn pick(&mut self, len: NonZeroUsize) -> usize;

    /// Returns an unbiased coin flip. `true` selects the female pool.
    fn coin_flip(&mut self) -> bool;
}

/// ChaCha8-backed index source.
///
/// # Example
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use user_generation::{IndexSource, RandomIndexSource};
///
/// let len = NonZeroUsize::new(10).expect("non-zero");
/// let mut first = RandomIndexSource::seeded(42);
/// let mut second = RandomIndexSource::seeded(42);
///
/// assert_eq!(first.pick(len), second.pick(len));
/// ```
#[derive(Debug, Clone)]
pub struct RandomIndexSource {
    rng: ChaCha8Rng,
}

impl RandomIndexSource {
    /// Creates a reproducible source from a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a source seeded from the operating system.
    #[must_use]
    pub fn from_os_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
        }
    }

    /// Uses `seed` when present, operating system entropy otherwise.
    #[must_use]
    pub fn for_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_os_entropy, Self::seeded)
    }
}

impl IndexSource for RandomIndexSource {
    fn pick(&mut self, len: NonZeroUsize) -> usize {
        self.rng.random_range(0..len.get())
    }

    fn coin_flip(&mut self) -> bool {
        self.rng.random()
    }
}

/// Replays fixed pick and flip sequences, wrapping around at the end.
///
/// Picks larger than the requested length are clamped to the last index. An
/// empty pick script always yields `0`; an empty flip script always yields
/// `true`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedIndexSource {
    picks: Vec<usize>,
    flips: Vec<bool>,
    pick_cursor: usize,
    flip_cursor: usize,
}

impl ScriptedIndexSource {
    /// Creates a source that replays `picks` and `flips` in order.
    #[must_use]
    pub const fn new(picks: Vec<usize>, flips: Vec<bool>) -> Self {
        Self {
            picks,
            flips,
            pick_cursor: 0,
            flip_cursor: 0,
        }
    }
}

fn next_scripted<T: Copy>(script: &[T], cursor: &mut usize) -> Option<T> {
    if *cursor >= script.len() {
        *cursor = 0;
    }
    let value = script.get(*cursor).copied();
    *cursor += 1;
    value
}

impl IndexSource for ScriptedIndexSource {
    fn pick(&mut self, len: NonZeroUsize) -> usize {
        next_scripted(&self.picks, &mut self.pick_cursor)
            .map_or(0, |value| value.min(len.get() - 1))
    }

    fn coin_flip(&mut self) -> bool {
        next_scripted(&self.flips, &mut self.flip_cursor).unwrap_or(true)
    }
}
