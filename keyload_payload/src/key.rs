//! Key identifier generation.
//!
//! Two key shapes occur in the wild: content-addressed `sha256:` digests
//! and long opaque tokens. A run picks exactly one shape for the fresh keys
//! in its sync bodies; advertise keys and findkey fallback keys are always
//! content hashes.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Error, Generator};

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Characters permitted in opaque keys.
const OPAQUE_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

fn minimum_length() -> u32 {
    100
}

fn maximum_length() -> u32 {
    10_000
}

/// The shape of freshly generated keys.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[serde(deny_unknown_fields)]
pub enum Shape {
    /// `sha256:` followed by 64 lowercase hex characters.
    ContentHash,
    /// A token over `[A-Za-z0-9._-]` with uniform random length.
    Opaque {
        /// Minimum token length, inclusive.
        #[serde(default = "minimum_length")]
        minimum_length: u32,
        /// Maximum token length, inclusive.
        #[serde(default = "maximum_length")]
        maximum_length: u32,
    },
}

impl Default for Shape {
    fn default() -> Self {
        Self::ContentHash
    }
}

impl Shape {
    /// Confirm that the length range is not inverted.
    ///
    /// # Errors
    ///
    /// Returns an error if `minimum_length` exceeds `maximum_length`.
    pub fn validate(&self) -> Result<(), Error> {
        match *self {
            Self::ContentHash => Ok(()),
            Self::Opaque {
                minimum_length,
                maximum_length,
            } => {
                if minimum_length > maximum_length {
                    return Err(Error::Validation(format!(
                        "opaque key minimum_length {minimum_length} exceeds maximum_length {maximum_length}"
                    )));
                }
                Ok(())
            }
        }
    }
}

impl<'a> Generator<'a> for Shape {
    type Output = String;

    fn generate<R>(&'a self, rng: &mut R) -> String
    where
        R: rand::Rng + ?Sized,
    {
        match *self {
            Self::ContentHash => content_hash(rng),
            Self::Opaque {
                minimum_length,
                maximum_length,
            } => opaque(rng, minimum_length, maximum_length),
        }
    }
}

/// Produce `sha256:` plus 64 lowercase hex characters from 32 random bytes.
///
/// There is no security requirement here, only format realism, so the bytes
/// come straight from the caller's rng.
pub fn content_hash<R>(rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes);

    let mut key = String::with_capacity("sha256:".len() + 64);
    key.push_str("sha256:");
    for byte in bytes {
        key.push(char::from(HEX[usize::from(byte >> 4)]));
        key.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }
    key
}

/// Produce an opaque token with uniform length in the given inclusive range.
pub fn opaque<R>(rng: &mut R, minimum_length: u32, maximum_length: u32) -> String
where
    R: Rng + ?Sized,
{
    let length = rng.random_range(minimum_length..=maximum_length) as usize;
    let mut key = String::with_capacity(length);
    for _ in 0..length {
        let idx = rng.random_range(0..OPAQUE_ALPHABET.len());
        key.push(char::from(OPAQUE_ALPHABET[idx]));
    }
    key
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::SmallRng};

    use super::{Shape, content_hash, opaque};
    use crate::Generator;

    // Content hashes are always `sha256:` plus 64 lowercase hex characters.
    proptest! {
        #[test]
        fn content_hash_shape(seed: u64) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let key = content_hash(&mut rng);

            prop_assert_eq!(key.len(), "sha256:".len() + 64);
            let digest = key.strip_prefix("sha256:").expect("missing prefix");
            prop_assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    // Opaque key length is always within the requested inclusive bounds and
    // the alphabet is respected.
    proptest! {
        #[test]
        fn opaque_length_bounds(seed: u64, minimum in 1_u32..100, spread in 0_u32..1_000) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let maximum = minimum + spread;
            let key = opaque(&mut rng, minimum, maximum);

            prop_assert!(key.len() >= minimum as usize);
            prop_assert!(key.len() <= maximum as usize);
            prop_assert!(key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-'));
        }
    }

    #[test]
    fn inverted_range_rejected() {
        let shape = Shape::Opaque {
            minimum_length: 10,
            maximum_length: 9,
        };
        assert!(shape.validate().is_err());

        let shape = Shape::Opaque {
            minimum_length: 10,
            maximum_length: 10,
        };
        assert!(shape.validate().is_ok());
    }

    #[test]
    fn default_is_content_hash() {
        let mut rng = SmallRng::seed_from_u64(0);
        let key = Shape::default().generate(&mut rng);
        assert!(key.starts_with("sha256:"));
    }
}
