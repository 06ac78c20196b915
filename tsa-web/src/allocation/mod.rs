//! Set assignment across annotators
//!
//! The walk order over sets is fixed for the life of the process
//! ([`SetOrder`]). Allocation scans that order for the first set below the
//! annotator cap and records the assignment with an atomic conditional
//! insert; if another annotator filled the set in between, the scan resumes
//! after it.

pub mod mt19937;
mod order;

pub use order::{AllocationError, SetOrder, MAX_ANNOTATORS_PER_SET, ORDER_SEED, RANDOMIZED_SETS};

use tracing::{debug, info};
use tsa_common::db::SetId;

use crate::db::AnnotationStore;
use crate::error::AppResult;

/// Assign the first open set after `start_after` to `annotator`
pub async fn allocate(
    order: &SetOrder,
    store: &AnnotationStore,
    start_after: Option<SetId>,
    annotator: &str,
) -> AppResult<SetId> {
    let mut cursor = start_after;

    loop {
        let counts = store.assignment_counts().await?;
        let candidate =
            order.next_available(cursor, |set| counts.get(&set).copied().unwrap_or(0))?;

        if store.assign_if_open(candidate, annotator).await? {
            info!("Assigned set {} to {}", candidate, annotator);
            return Ok(candidate);
        }

        debug!("Set {} filled before it could be assigned to {}", candidate, annotator);
        cursor = Some(candidate);
    }
}

/// Assign the annotator's next set, continuing after the furthest one they hold
///
/// The furthest set is taken in walk order, not by time. This does not
/// return to the most recently assigned set: every call records a fresh
/// assignment, so each visit to `/` (a page refresh included) takes one of
/// the next open set's slots. The annotator always enters the new set at its
/// first pack.
pub async fn resume(
    order: &SetOrder,
    store: &AnnotationStore,
    annotator: &str,
) -> AppResult<SetId> {
    let held = store.sets_of(annotator).await?;
    let furthest = order.furthest(held);
    debug!("{} resumes after set {:?}", annotator, furthest);

    allocate(order, store, furthest, annotator).await
}
