//! Traffic mix planning.
//!
//! One knob -- the advertise request count -- fixes the absolute number of
//! requests of every kind. The plan arranges those requests into an ordered
//! slot sequence, either uniformly shuffled or with sync traffic clustered
//! into burst periods to simulate spiking load.

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

/// The kind of request occupying a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Kind {
    /// A holder registers the keys it possesses.
    Advertise,
    /// Look up the holders for one key.
    Findkey,
    /// Bulk reconciliation of a holder's key set.
    Sync,
}

/// One planned request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// The request kind this slot will emit.
    pub kind: Kind,
    /// Per-kind ordinal, kept for bookkeeping only.
    pub index: u64,
}

/// Absolute request counts per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    /// Number of advertise requests.
    pub advertise: u64,
    /// Number of findkey requests.
    pub findkey: u64,
    /// Number of sync requests.
    pub sync: u64,
}

impl Counts {
    /// Derive counts from the advertise request count.
    ///
    /// Findkey traffic is ten times advertise and sync is a twentieth of
    /// findkey, floored at one so every run carries at least one sync
    /// request. Non-positive input degrades to zero advertise and findkey
    /// rather than erroring.
    #[must_use]
    pub fn derive(advertise_requests: i64) -> Self {
        let advertise = u64::try_from(advertise_requests.max(0)).unwrap_or_default();
        let findkey = advertise.saturating_mul(10);
        let sync = (findkey / 20).max(1);

        Self {
            advertise,
            findkey,
            sync,
        }
    }

    /// Total slots across all kinds.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.advertise + self.findkey + self.sync
    }
}

fn default_burst_periods() -> u32 {
    3
}

/// Slot interleaving policy.
///
/// Both policies emit identical per-kind counts; only the ordering differs.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[serde(deny_unknown_fields)]
pub enum Arrangement {
    /// Uniform random permutation of the whole request multiset.
    Uniform,
    /// Advertise and findkey traffic split into contiguous segments with
    /// the sync requests clustered immediately after each segment.
    Burst {
        /// Number of burst periods in the run.
        #[serde(default = "default_burst_periods")]
        periods: u32,
    },
}

impl Default for Arrangement {
    fn default() -> Self {
        Self::Burst {
            periods: default_burst_periods(),
        }
    }
}

impl Arrangement {
    /// Produce the ordered slot sequence for `counts`.
    pub fn sequence<R>(&self, counts: Counts, rng: &mut R) -> Vec<Slot>
    where
        R: Rng + ?Sized,
    {
        match *self {
            Self::Uniform => {
                let mut slots = kind_slots(Kind::Advertise, counts.advertise);
                slots.extend(kind_slots(Kind::Findkey, counts.findkey));
                slots.extend(kind_slots(Kind::Sync, counts.sync));
                slots.shuffle(rng);
                slots
            }
            // A run always has at least one period.
            Self::Burst { periods } => burst_sequence(counts, periods.max(1) as usize, rng),
        }
    }
}

fn kind_slots(kind: Kind, total: u64) -> Vec<Slot> {
    (0..total).map(|index| Slot { kind, index }).collect()
}

/// Arrange `counts` into `periods` burst periods.
///
/// The shuffled non-sync slots split into `periods` contiguous segments of
/// `len / periods`, the final segment absorbing any remainder. Sync slots
/// split into `periods` groups of `sync / periods` with the remainder
/// distributed one-per-group to the first `sync % periods` groups. Output
/// alternates segment, group, segment, group and so on; groups may be empty
/// when `periods` exceeds the sync count.
fn burst_sequence<R>(counts: Counts, periods: usize, rng: &mut R) -> Vec<Slot>
where
    R: Rng + ?Sized,
{
    let mut steady = kind_slots(Kind::Advertise, counts.advertise);
    steady.extend(kind_slots(Kind::Findkey, counts.findkey));
    steady.shuffle(rng);

    let segment_length = steady.len() / periods;
    let sync_total = usize::try_from(counts.sync).unwrap_or_default();
    let sync_base = sync_total / periods;
    let sync_remainder = sync_total % periods;

    let mut sequence = Vec::with_capacity(steady.len() + sync_total);
    let mut steady_slots = steady.into_iter();
    let mut sync_slots = kind_slots(Kind::Sync, counts.sync).into_iter();

    for period in 0..periods {
        if period == periods - 1 {
            sequence.extend(steady_slots.by_ref());
        } else {
            sequence.extend(steady_slots.by_ref().take(segment_length));
        }
        let group = sync_base + usize::from(period < sync_remainder);
        sequence.extend(sync_slots.by_ref().take(group));
    }

    sequence
}
