//! Sync request bodies.
//!
//! Sync traffic reconciles a holder's full key set, so bodies are large and
//! mix previously advertised keys with fresh ones.

use rand::Rng;

use crate::{Error, Generator, common::Body, key, pool::KeyPool};

/// Fewest keys a sync body will carry.
pub(crate) const KEYS_MINIMUM: u16 = 50;
/// Most keys a sync body will carry.
pub(crate) const KEYS_MAXIMUM: u16 = 2_000;

fn reuse_probability() -> f64 {
    0.3
}

/// Generates sync bodies: a fresh holder plus [`KEYS_MINIMUM`] to
/// [`KEYS_MAXIMUM`] keys, each independently drawn from the advertised-key
/// pool with `reuse_probability` when the pool is non-empty.
///
/// The pool is read-only from this generator's perspective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncGenerator {
    /// Probability that a key slot reuses an advertised key.
    pub reuse_probability: f64,
    /// Shape of freshly generated keys.
    pub shape: key::Shape,
}

impl Default for SyncGenerator {
    fn default() -> Self {
        Self {
            reuse_probability: reuse_probability(),
            shape: key::Shape::default(),
        }
    }
}

impl SyncGenerator {
    /// Confirm that the reuse probability and key shape are well-formed.
    ///
    /// # Errors
    ///
    /// Returns an error if `reuse_probability` lies outside `[0.0, 1.0]` or
    /// the key shape's length range is inverted.
    pub fn validate(&self) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&self.reuse_probability) {
            return Err(Error::Validation(format!(
                "sync reuse_probability must lie in [0.0, 1.0], got {}",
                self.reuse_probability
            )));
        }
        self.shape.validate()
    }

    /// Generate one sync body against the current pool snapshot.
    ///
    /// An empty pool forces fresh generation for every slot; the reuse draw
    /// is consumed either way.
    pub fn generate<R>(&self, pool: &KeyPool, rng: &mut R) -> Body
    where
        R: Rng + ?Sized,
    {
        let holder: crate::Holder = rng.random();
        let total_keys = rng.random_range(KEYS_MINIMUM..=KEYS_MAXIMUM);

        let mut keys = Vec::with_capacity(usize::from(total_keys));
        for _ in 0..total_keys {
            let reuse = rng.random_bool(self.reuse_probability);
            let known = if reuse { pool.choose(rng) } else { None };
            match known {
                Some(key) => keys.push(key.to_string()),
                None => keys.push(self.shape.generate(rng)),
            }
        }

        Body {
            keys,
            holder: holder.to_string(),
        }
    }
}
