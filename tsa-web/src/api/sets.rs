//! Set navigation routes
//!
//! - `GET /`: assign the annotator's next set and enter it at pack 1
//! - `GET /next_set/{set}`: interstitial after the last pack of a set
//! - `GET /set/{set}/start`: assign the next open set after `{set}`

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
};
use tracing::info;
use tsa_common::db::SetId;

use super::pages;
use super::session::Annotator;
use crate::allocation;
use crate::error::{AppError, AppResult};
use crate::AppState;

/// Location of the first pack of a set
pub fn first_pack_location(set: SetId) -> String {
    format!("/set/{}/pack/1", set)
}

/// GET /
///
/// Resumes after the furthest set the annotator holds in walk order. The
/// new set is always entered at its first pack.
pub async fn home(State(state): State<AppState>, annotator: Annotator) -> AppResult<Redirect> {
    let set = allocation::resume(&state.order, &state.store, annotator.name()).await?;
    info!("set_number: {} for {}", set, annotator.name());

    Ok(Redirect::to(&first_pack_location(set)))
}

/// GET /next_set/{set}
pub async fn next_set(
    State(state): State<AppState>,
    Path(set): Path<SetId>,
) -> AppResult<Html<String>> {
    if state.order.position(set).is_none() {
        return Err(AppError::NotFound(format!("set {}", set)));
    }

    Ok(Html(pages::next_set(set)))
}

/// GET /set/{set}/start
pub async fn start_next_set(
    State(state): State<AppState>,
    Path(completed): Path<SetId>,
    annotator: Annotator,
) -> AppResult<Redirect> {
    let set =
        allocation::allocate(&state.order, &state.store, Some(completed), annotator.name()).await?;
    info!(
        "{} finished set {}, continuing with set {}",
        annotator.name(),
        completed,
        set
    );

    Ok(Redirect::to(&first_pack_location(set)))
}
