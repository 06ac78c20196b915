//! Fixed set ordering and the availability scan

use std::collections::HashMap;

use thiserror::Error;
use tsa_common::db::SetId;

use super::mt19937;

/// Seed of the randomised prefix. Changing it reshuffles work already handed out.
pub const ORDER_SEED: u32 = 85;

/// Number of leading sets walked in randomised order
pub const RANDOMIZED_SETS: u32 = 52;

/// Maximum number of annotators assigned to one set
pub const MAX_ANNOTATORS_PER_SET: i64 = 3;

/// Allocation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Every set after the starting point already has its annotators
    #[error("no set with fewer than {MAX_ANNOTATORS_PER_SET} annotators remains")]
    OutOfWork,

    /// The starting set does not appear in the ordering
    #[error("set {0} is not part of the assignment order")]
    UnknownSet(SetId),
}

/// Immutable walk order over all sets
///
/// Built once at startup and shared read-only between handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOrder {
    sets: Vec<SetId>,
    positions: HashMap<SetId, usize>,
}

impl SetOrder {
    /// Seeded permutation of the first [`RANDOMIZED_SETS`] ids, then the rest ascending
    ///
    /// With fewer than [`RANDOMIZED_SETS`] sets in the store, permuted ids that
    /// do not exist are dropped and the survivors keep their relative order.
    pub fn compute(total_sets: i64, seed: u32) -> Self {
        let total = total_sets.max(0);

        let mut sets: Vec<SetId> = mt19937::permutation(RANDOMIZED_SETS, seed)
            .into_iter()
            .map(SetId::from)
            .filter(|&set| set < total)
            .collect();
        sets.extend(SetId::from(RANDOMIZED_SETS)..total);

        Self::from_sets(sets)
    }

    /// Ordering over an explicit list of sets
    pub fn from_sets(sets: Vec<SetId>) -> Self {
        let positions = sets
            .iter()
            .enumerate()
            .map(|(idx, &set)| (set, idx))
            .collect();
        Self { sets, positions }
    }

    pub fn as_slice(&self) -> &[SetId] {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Index of `set` in the walk order
    pub fn position(&self, set: SetId) -> Option<usize> {
        self.positions.get(&set).copied()
    }

    /// The set that comes latest in walk order, ignoring unknown ids
    pub fn furthest<I>(&self, sets: I) -> Option<SetId>
    where
        I: IntoIterator<Item = SetId>,
    {
        sets.into_iter()
            .filter_map(|set| self.position(set))
            .max()
            .map(|idx| self.sets[idx])
    }

    /// First set with fewer than [`MAX_ANNOTATORS_PER_SET`] assignments
    ///
    /// Scans from the beginning, or strictly after `start_after` when given
    /// (its own count is not rechecked).
    pub fn next_available<F>(
        &self,
        start_after: Option<SetId>,
        count_of: F,
    ) -> Result<SetId, AllocationError>
    where
        F: Fn(SetId) -> i64,
    {
        let start = match start_after {
            Some(set) => self
                .position(set)
                .ok_or(AllocationError::UnknownSet(set))?
                + 1,
            None => 0,
        };

        self.sets[start..]
            .iter()
            .copied()
            .find(|&set| count_of(set) < MAX_ANNOTATORS_PER_SET)
            .ok_or(AllocationError::OutOfWork)
    }
}
