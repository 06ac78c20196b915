//! tsa-web library - tweet stance annotation service
//!
//! Annotators log in with a name, are handed a set of tweet packs, and label
//! every reply in each pack's reconstructed threads with its stance towards
//! the previous tweet and towards the source tweet.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub mod allocation;
pub mod api;
pub mod cli;
pub mod db;
pub mod error;
pub mod submission;
pub mod thread;

use allocation::SetOrder;
use db::AnnotationStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: AnnotationStore,
    /// Walk order over sets, fixed at startup
    pub order: Arc<SetOrder>,
    /// Key for session cookie signatures
    pub session_secret: i64,
}

impl AppState {
    pub fn new(store: AnnotationStore, order: SetOrder, session_secret: i64) -> Self {
        Self {
            store,
            order: Arc::new(order),
            session_secret,
        }
    }
}

/// Build application router
///
/// `/login`, `/next_set/{set}` and `/health` are public; every other page
/// answers with the login prompt when the session cookie is missing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::home))
        .route("/login", get(api::login_page).post(api::login))
        .route("/set/:set/pack/:pos", get(api::show_pack))
        .route("/annotate/set/:set/pack/:pos", post(api::annotate_pack))
        .route("/next_set/:set", get(api::next_set))
        .route("/set/:set/start", get(api::start_next_set))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
