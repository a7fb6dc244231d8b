//! Configuration for `SkipDict` instances.
//!
//! # Example
//!
//! ```
//! use skipdict::SkipDict;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut dict = SkipDict::<u64, String>::builder()
//!     .max_level(16)
//!     .probability(0.25)
//!     .rng(StdRng::seed_from_u64(7))
//!     .build()
//!     .unwrap();
//!
//! dict.set(1, "one".to_string()).unwrap();
//! assert_eq!(dict.max_level(), 16);
//! ```

use std::marker::PhantomData;

use crate::error::SkipDictError;
use crate::level::{DEFAULT_P, Geometric, MAX_LEVELS, ProcessRng};
use crate::policy::{KeyPolicy, NoHooks, OpenKeys, OwnershipHooks};
use crate::SkipDict;

/// A builder for creating a [`SkipDict`] with custom configuration.
///
/// Settings are validated by [`SkipDictBuilder::build`], which fails with
/// [`SkipDictError::InvalidArgument`] on an out-of-range level cap or
/// probability.
pub struct SkipDictBuilder<K, V, R = ProcessRng, P = OpenKeys, H = NoHooks> {
    max_level: usize,
    probability: f64,
    rng: R,
    policy: P,
    hooks: H,
    _phantom: PhantomData<(K, V)>,
}

impl<K, V> Default for SkipDictBuilder<K, V> {
    fn default() -> Self {
        Self {
            max_level: MAX_LEVELS,
            probability: DEFAULT_P,
            rng: ProcessRng,
            policy: OpenKeys,
            hooks: NoHooks,
            _phantom: PhantomData,
        }
    }
}

impl<K, V, R, P, H> SkipDictBuilder<K, V, R, P, H> {
    /// Sets the highest level a node may reach, in `1..=MAX_LEVELS`.
    pub fn max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    /// Sets the probability of promoting a node to the next level, in `(0, 1)`.
    pub fn probability(mut self, p: f64) -> Self {
        self.probability = p;
        self
    }

    /// Draws node levels from `rng` instead of the process-wide generator.
    pub fn rng<R2: rand::Rng>(self, rng: R2) -> SkipDictBuilder<K, V, R2, P, H> {
        SkipDictBuilder {
            max_level: self.max_level,
            probability: self.probability,
            rng,
            policy: self.policy,
            hooks: self.hooks,
            _phantom: PhantomData,
        }
    }

    /// Installs a key policy, e.g. [`UniformKeys`](crate::UniformKeys).
    pub fn key_policy<P2: KeyPolicy<K>>(self, policy: P2) -> SkipDictBuilder<K, V, R, P2, H> {
        SkipDictBuilder {
            max_level: self.max_level,
            probability: self.probability,
            rng: self.rng,
            policy,
            hooks: self.hooks,
            _phantom: PhantomData,
        }
    }

    /// Installs hooks notified of every key and value acquire and release.
    pub fn hooks<H2: OwnershipHooks<K, V>>(self, hooks: H2) -> SkipDictBuilder<K, V, R, P, H2> {
        SkipDictBuilder {
            max_level: self.max_level,
            probability: self.probability,
            rng: self.rng,
            policy: self.policy,
            hooks,
            _phantom: PhantomData,
        }
    }
}

impl<K, V, R, P, H> SkipDictBuilder<K, V, R, P, H>
where
    R: rand::Rng,
    P: KeyPolicy<K>,
    H: OwnershipHooks<K, V>,
{
    /// Builds an empty `SkipDict` with the specified configuration.
    pub fn build(self) -> Result<SkipDict<K, V, Geometric<R>, P, H>, SkipDictError> {
        let generator = Geometric::with_rng(self.max_level, self.probability, self.rng)?;
        Ok(SkipDict::from_parts(generator, self.policy, self.hooks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelGenerator;

    #[test]
    fn test_default_builder() {
        let dict = SkipDict::<u32, u32>::builder().build().unwrap();
        assert_eq!(dict.max_level(), MAX_LEVELS);
        assert_eq!(dict.level(), 1);
    }

    #[test]
    fn test_custom_levels() {
        let mut dict = SkipDict::<u32, u32>::builder()
            .max_level(2)
            .probability(0.75)
            .build()
            .unwrap();
        for i in 0..100 {
            dict.set(i, i).unwrap();
        }
        assert_eq!(dict.max_level(), 2);
        assert!(dict.level() <= 2);
    }

    #[test]
    fn test_invalid_configuration() {
        let err = SkipDict::<u32, u32>::builder().max_level(0).build().err();
        assert!(matches!(err, Some(SkipDictError::InvalidArgument(_))));

        let err = SkipDict::<u32, u32>::builder().max_level(MAX_LEVELS + 1).build().err();
        assert!(matches!(err, Some(SkipDictError::InvalidArgument(_))));

        let err = SkipDict::<u32, u32>::builder().probability(1.5).build().err();
        assert!(matches!(err, Some(SkipDictError::InvalidArgument(_))));
    }

    #[test]
    fn test_generator_honours_settings() {
        let generator = Geometric::with_rng(3, 0.5, ProcessRng).unwrap();
        assert_eq!(generator.max_level(), 3);
        assert_eq!(generator.probability(), 0.5);
    }
}
