//! Pack display and submission routes

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use tracing::{debug, info};
use tsa_common::db::{Pack, SetId};

use super::pages::{self, PackView};
use super::session::Annotator;
use crate::error::{AppError, AppResult};
use crate::submission::PackSubmission;
use crate::thread::build_forest;
use crate::AppState;

async fn load_pack(state: &AppState, set: SetId, pos: i64) -> AppResult<Pack> {
    state
        .store
        .fetch_pack(set, pos)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pack {} in set {}", pos, set)))
}

/// Where to go after submitting `pack`
pub fn next_location(pack: &Pack) -> String {
    if pack.is_last_in_set() {
        format!("/next_set/{}", pack.set_nb)
    } else {
        format!("/set/{}/pack/{}", pack.set_nb, pack.pos + 1)
    }
}

/// GET /set/{set}/pack/{pos}
pub async fn show_pack(
    State(state): State<AppState>,
    Path((set, pos)): Path<(SetId, i64)>,
    annotator: Annotator,
) -> AppResult<Html<String>> {
    let pack = load_pack(&state, set, pos).await?;
    let records = state.store.fetch_tweets(pack.id).await?;
    let forest = build_forest(records);
    debug!(
        "Pack {} (set {}, pos {}): {} threads, {} tweets",
        pack.id,
        pack.set_nb,
        pack.pos,
        forest.len(),
        forest.iter().map(|root| root.subtree_len()).sum::<usize>()
    );

    let pack_annotation = state.store.pack_annotation(pack.id, annotator.name()).await?;
    let tweet_annotations = state
        .store
        .tweet_annotations(pack.id, annotator.name())
        .await?;

    Ok(Html(pages::pack_page(&PackView {
        annotator: annotator.name(),
        pack: &pack,
        forest: &forest,
        pack_annotation: pack_annotation.as_deref(),
        tweet_annotations: &tweet_annotations,
    })))
}

/// POST /annotate/set/{set}/pack/{pos}
///
/// Validates the whole form before writing; the pack annotation and all
/// tweet annotations commit together before the redirect is sent.
pub async fn annotate_pack(
    State(state): State<AppState>,
    Path((set, pos)): Path<(SetId, i64)>,
    annotator: Annotator,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<Redirect> {
    let submission = PackSubmission::from_pairs(fields)?;
    let pack = load_pack(&state, set, pos).await?;

    info!(
        "pack annotation: {} by {} ({} tweets): {}",
        pack.id,
        annotator.name(),
        submission.tweets.len(),
        submission.annotation
    );
    state
        .store
        .save_submission(pack.id, annotator.name(), &submission)
        .await?;

    Ok(Redirect::to(&next_location(&pack)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(pos: i64, set_size: i64) -> Pack {
        Pack {
            id: 1,
            cnt: 10,
            set_nb: 14,
            pos,
            set_size,
        }
    }

    #[test]
    fn test_next_location() {
        assert_eq!(next_location(&pack(1, 3)), "/set/14/pack/2");
        assert_eq!(next_location(&pack(3, 3)), "/next_set/14");
    }
}
