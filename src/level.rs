//! Random level generation for new nodes.
//!
//! Every node of a skip list is present at level 0, and each higher level holds
//! a random subset of the level below it. With a geometric distribution the
//! chance that a node reaches level `k` is `p^(k-1)`, which keeps the expected
//! height logarithmic in the number of keys without any rebalancing.
//!
//! The random source is chosen once and handed to the generator; nothing in
//! this crate reseeds it when a map is created. The default [`ProcessRng`]
//! draws from `fastrand`'s thread-global generator, which is seeded a single
//! time per thread for the life of the process. Tests and benchmarks can pass
//! any seeded `rand` generator instead.

use rand::{Rng, RngCore};

use crate::error::SkipDictError;

/// The maximum number of levels a map can use, and the default header width.
pub const MAX_LEVELS: usize = 32;

/// The default probability that a node is promoted to the next level.
pub const DEFAULT_P: f64 = 0.5;

/// Chooses the level of each newly inserted node.
pub trait LevelGenerator {
    /// The highest level this generator can return.
    ///
    /// The map sizes its header to this many forward slots.
    fn max_level(&self) -> usize;

    /// Draws the level of a new node, in `1..=self.max_level()`.
    fn next_level(&mut self) -> usize;
}

/// A handle to the process-wide `fastrand` generator.
///
/// Holds no state of its own, so creating any number of maps never restarts
/// the random sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRng;

impl RngCore for ProcessRng {
    fn next_u32(&mut self) -> u32 {
        fastrand::u32(..)
    }

    fn next_u64(&mut self) -> u64 {
        fastrand::u64(..)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        fastrand::fill(dst);
    }
}

/// A level generator producing geometrically distributed levels.
///
/// Starting from 1, the level is incremented while a uniform sample in
/// `[0, 1)` is below `p`, capped at `max_level`.
#[derive(Debug, Clone)]
pub struct Geometric<R = ProcessRng> {
    max_level: usize,
    p: f64,
    rng: R,
}

impl Geometric<ProcessRng> {
    /// Creates a generator backed by the process-wide random source.
    pub fn new(max_level: usize, p: f64) -> Result<Self, SkipDictError> {
        Self::with_rng(max_level, p, ProcessRng)
    }
}

impl Default for Geometric<ProcessRng> {
    fn default() -> Self {
        Geometric {
            max_level: MAX_LEVELS,
            p: DEFAULT_P,
            rng: ProcessRng,
        }
    }
}

impl<R: Rng> Geometric<R> {
    /// Creates a generator drawing from `rng`.
    ///
    /// Fails with [`SkipDictError::InvalidArgument`] if `max_level` is outside
    /// `1..=MAX_LEVELS` or `p` is outside the open interval `(0, 1)`.
    pub fn with_rng(max_level: usize, p: f64, rng: R) -> Result<Self, SkipDictError> {
        validate(max_level, p)?;
        Ok(Geometric { max_level, p, rng })
    }

    /// The promotion probability.
    pub fn probability(&self) -> f64 {
        self.p
    }
}

impl<R: Rng> LevelGenerator for Geometric<R> {
    fn max_level(&self) -> usize {
        self.max_level
    }

    fn next_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rng.random::<f64>() < self.p {
            level += 1;
        }
        level
    }
}

fn validate(max_level: usize, p: f64) -> Result<(), SkipDictError> {
    if max_level == 0 || max_level > MAX_LEVELS {
        return Err(SkipDictError::InvalidArgument(format!(
            "max_level must be between 1 and {}, got {}",
            MAX_LEVELS, max_level
        )));
    }
    // Written so that NaN is rejected too.
    if !(p > 0.0 && p < 1.0) {
        return Err(SkipDictError::InvalidArgument(format!(
            "probability must be in (0, 1), got {}",
            p
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_levels_within_bounds() {
        let mut generator = Geometric::with_rng(4, 0.9, StdRng::seed_from_u64(1)).unwrap();
        for _ in 0..10_000 {
            let level = generator.next_level();
            assert!((1..=4).contains(&level), "level {} out of range", level);
        }
    }

    #[test]
    fn test_single_level_cap() {
        let mut generator = Geometric::with_rng(1, 0.5, StdRng::seed_from_u64(2)).unwrap();
        assert!((0..1000).all(|_| generator.next_level() == 1));
    }

    #[test]
    fn test_geometric_distribution() {
        const TRIALS: usize = 200_000;
        let mut generator = Geometric::with_rng(MAX_LEVELS, DEFAULT_P, StdRng::seed_from_u64(42)).unwrap();

        let mut at_least = [0usize; MAX_LEVELS + 1];
        for _ in 0..TRIALS {
            let level = generator.next_level();
            for k in 1..=level {
                at_least[k] += 1;
            }
        }

        assert_eq!(at_least[1], TRIALS);
        for k in 2..=6 {
            let expected = DEFAULT_P.powi(k as i32 - 1);
            let observed = at_least[k] as f64 / TRIALS as f64;
            assert!(
                (observed - expected).abs() < 0.01,
                "P(level >= {}) = {}, expected about {}",
                k,
                observed,
                expected
            );
        }
    }

    #[test]
    fn test_truncation_at_cap() {
        // With p close to 1 almost every draw runs into the cap.
        let mut generator = Geometric::with_rng(3, 0.999, StdRng::seed_from_u64(3)).unwrap();
        let tall = (0..1000).filter(|_| generator.next_level() == 3).count();
        assert!(tall > 990);
    }

    #[test]
    fn test_process_rng_default() {
        let mut generator: Geometric = Geometric::default();
        assert_eq!(generator.max_level(), MAX_LEVELS);
        assert_eq!(generator.probability(), DEFAULT_P);
        let level = generator.next_level();
        assert!((1..=MAX_LEVELS).contains(&level));
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(Geometric::new(0, 0.5), Err(SkipDictError::InvalidArgument(_))));
        assert!(matches!(
            Geometric::new(MAX_LEVELS + 1, 0.5),
            Err(SkipDictError::InvalidArgument(_))
        ));
        assert!(matches!(Geometric::new(8, 0.0), Err(SkipDictError::InvalidArgument(_))));
        assert!(matches!(Geometric::new(8, 1.0), Err(SkipDictError::InvalidArgument(_))));
        assert!(matches!(Geometric::new(8, f64::NAN), Err(SkipDictError::InvalidArgument(_))));
        assert!(Geometric::new(8, 0.25).is_ok());
    }
}
