//! Advertise request bodies.

use rand::Rng;

use crate::{Generator, common::Body, key};

/// Most keys an advertise body will carry. The minimum is zero: holders may
/// legitimately advertise nothing.
pub(crate) const KEYS_MAXIMUM: u16 = 1_000;

/// Generates advertise bodies: a fresh holder plus up to [`KEYS_MAXIMUM`]
/// fresh content keys.
///
/// The caller is responsible for appending the emitted keys to the run's
/// [`crate::KeyPool`] so later findkey and sync traffic can reuse them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvertiseGenerator;

impl<'a> Generator<'a> for AdvertiseGenerator {
    type Output = Body;

    fn generate<R>(&'a self, rng: &mut R) -> Body
    where
        R: Rng + ?Sized,
    {
        let holder: crate::Holder = rng.random();
        let total_keys = rng.random_range(0..=KEYS_MAXIMUM);
        let keys = (0..total_keys).map(|_| key::content_hash(rng)).collect();

        Body {
            keys,
            holder: holder.to_string(),
        }
    }
}
