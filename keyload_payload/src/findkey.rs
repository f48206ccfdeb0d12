//! Findkey lookups.

use rand::Rng;

use crate::{Error, key, pool::KeyPool};

/// Bounds for the `count` query parameter, inclusive.
pub(crate) const COUNT_MINIMUM: u8 = 1;
pub(crate) const COUNT_MAXIMUM: u8 = 20;

fn reuse_probability() -> f64 {
    0.7
}

/// One findkey lookup: the key to resolve and how many holders to ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    /// The key whose holders are being looked up.
    pub key: String,
    /// Number of holders requested, within `[1, 20]`.
    pub count: u8,
}

/// Generates findkey lookups biased toward previously advertised keys.
///
/// With `reuse_probability`, and a non-empty pool, the looked-up key comes
/// from the pool; otherwise it is a fresh content hash that the service has
/// (almost certainly) never seen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FindkeyGenerator {
    /// Probability that a lookup reuses an advertised key.
    pub reuse_probability: f64,
}

impl Default for FindkeyGenerator {
    fn default() -> Self {
        Self {
            reuse_probability: reuse_probability(),
        }
    }
}

impl FindkeyGenerator {
    /// Confirm that the reuse probability is well-formed.
    ///
    /// # Errors
    ///
    /// Returns an error if `reuse_probability` lies outside `[0.0, 1.0]`.
    pub fn validate(&self) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&self.reuse_probability) {
            return Err(Error::Validation(format!(
                "findkey reuse_probability must lie in [0.0, 1.0], got {}",
                self.reuse_probability
            )));
        }
        Ok(())
    }

    /// Generate one lookup against the current pool snapshot.
    pub fn generate<R>(&self, pool: &KeyPool, rng: &mut R) -> Lookup
    where
        R: Rng + ?Sized,
    {
        let reuse = rng.random_bool(self.reuse_probability);
        let known = if reuse { pool.choose(rng) } else { None };
        let key = match known {
            Some(key) => key.to_string(),
            None => key::content_hash(rng),
        };

        Lookup {
            key,
            count: rng.random_range(COUNT_MINIMUM..=COUNT_MAXIMUM),
        }
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::SmallRng};

    use super::{COUNT_MAXIMUM, COUNT_MINIMUM, FindkeyGenerator};
    use crate::pool::KeyPool;

    // The count parameter stays within [1, 20].
    proptest! {
        #[test]
        fn count_within_bounds(seed: u64) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let pool = KeyPool::new();
            let lookup = FindkeyGenerator::default().generate(&pool, &mut rng);

            prop_assert!(lookup.count >= COUNT_MINIMUM);
            prop_assert!(lookup.count <= COUNT_MAXIMUM);
        }
    }

    // An empty pool must fall back to a fresh content hash, never erroring.
    #[test]
    fn empty_pool_generates_fresh_key() {
        let mut rng = SmallRng::seed_from_u64(3);
        let pool = KeyPool::new();

        for _ in 0..64 {
            let lookup = FindkeyGenerator::default().generate(&pool, &mut rng);
            assert!(lookup.key.starts_with("sha256:"));
        }
    }

    // The empirical pool-selection fraction converges on the configured
    // reuse probability. Pool keys are distinguishable by prefix.
    #[test]
    fn reuse_rate_tracks_probability() {
        let mut rng = SmallRng::seed_from_u64(909);
        let mut pool = KeyPool::new();
        pool.extend((0..16).map(|i| format!("pool-{i}")));

        let generator = FindkeyGenerator::default();
        let total = 10_000;
        let reused = (0..total)
            .filter(|_| generator.generate(&pool, &mut rng).key.starts_with("pool-"))
            .count();

        let fraction = reused as f64 / f64::from(total);
        assert!(
            (fraction - 0.7).abs() < 0.03,
            "observed reuse fraction {fraction}"
        );
    }

    #[test]
    fn probability_bounds_validated() {
        assert!(
            FindkeyGenerator {
                reuse_probability: 1.1
            }
            .validate()
            .is_err()
        );
        assert!(FindkeyGenerator::default().validate().is_ok());
    }
}
