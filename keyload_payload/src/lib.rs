//! The keyload payloads
//!
//! This library supports request-body generation for the keyload project.

#![deny(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

pub use advertise::AdvertiseGenerator;
pub use common::{Body, Holder};
pub use findkey::{FindkeyGenerator, Lookup};
pub use pool::KeyPool;
pub use sync::SyncGenerator;

pub mod advertise;
pub mod common;
pub mod findkey;
pub mod key;
pub mod pool;
pub mod sync;

/// Errors related to payload configuration
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Generate instances of `Self::Output` from a source of randomness.
///
/// Implementations that consult shared state -- the advertised-key pool --
/// take it as an explicit argument on an inherent method instead, keeping
/// this trait for self-contained generation.
pub trait Generator<'a> {
    /// The type generated by this implementation.
    type Output: 'a;

    /// Generate a new instance of `Self::Output`.
    fn generate<R>(&'a self, rng: &mut R) -> Self::Output
    where
        R: rand::Rng + ?Sized;
}
