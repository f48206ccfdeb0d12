//! The advertised-key pool.

use rand::{Rng, seq::IndexedRandom};

/// Every key that has appeared in an emitted advertise body so far.
///
/// The pool is append-only for the duration of a run and read selection is
/// uniform over its current contents. It is owned by the emitter and passed
/// by reference to the builders that consult it.
#[derive(Debug, Default)]
pub struct KeyPool {
    keys: Vec<String>,
}

impl KeyPool {
    /// Construct an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append keys from an advertise body, preserving order.
    pub fn extend<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.keys.extend(keys);
    }

    /// Select a key uniformly at random, `None` when the pool is empty.
    pub fn choose<R>(&self, rng: &mut R) -> Option<&str>
    where
        R: Rng + ?Sized,
    {
        self.keys.choose(rng).map(String::as_str)
    }

    /// Total keys accumulated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether any key has been advertised yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The accumulated keys, in advertisement order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}
