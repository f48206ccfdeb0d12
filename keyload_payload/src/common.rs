//! Value types shared by advertise and sync bodies.

use core::fmt;

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

/// Port every generated holder listens on.
pub(crate) const HOLDER_PORT: u16 = 5123;

/// A network holder endpoint, rendered as `<ipv4>:<port>`.
///
/// Addresses sit in a private-range-like scheme: first octet fixed at 10,
/// fourth octet never 0 or 255. Holders are freshly generated per body and
/// never pooled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Holder {
    one: u8,
    two: u8,
    three: u8,
}

impl Distribution<Holder> for StandardUniform {
    fn sample<R>(&self, rng: &mut R) -> Holder
    where
        R: Rng + ?Sized,
    {
        Holder {
            one: rng.random(),
            two: rng.random(),
            three: rng.random_range(1..=254),
        }
    }
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "10.{}.{}.{}:{}",
            self.one, self.two, self.three, HOLDER_PORT
        )
    }
}

/// The JSON body carried by advertise and sync requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    /// Keys the holder claims to possess.
    pub keys: Vec<String>,
    /// The holder endpoint, `<ipv4>:<port>`.
    pub holder: String,
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng, rngs::SmallRng};

    use super::Holder;

    // Every rendered holder must parse back as `10.b.c.d:5123` with the
    // fourth octet avoiding network/broadcast-like values.
    proptest! {
        #[test]
        fn holder_shape(seed: u64) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let holder: Holder = rng.random();
            let rendered = holder.to_string();

            let (address, port) = rendered.rsplit_once(':').expect("missing port");
            prop_assert_eq!(port, "5123");

            let octets: Vec<u8> = address
                .split('.')
                .map(|o| o.parse().expect("octet out of range"))
                .collect();
            prop_assert_eq!(octets.len(), 4);
            prop_assert_eq!(octets[0], 10);
            prop_assert!(octets[3] >= 1 && octets[3] <= 254);
        }
    }
}
