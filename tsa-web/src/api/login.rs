//! Login routes
//!
//! There is no password: the submitted username becomes the session
//! identity.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Redirect},
    Form,
};
use serde::Deserialize;
use tracing::info;
use tsa_common::session::validate_username;

use super::pages;
use super::session::session_cookie;
use crate::error::AppResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
}

/// GET /login
pub async fn login_page() -> Html<String> {
    Html(pages::login_form())
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<impl IntoResponse> {
    let username = validate_username(&form.username)?;
    info!("Login: {}", username);

    Ok((
        [(header::SET_COOKIE, session_cookie(&username, state.session_secret))],
        Redirect::to("/"),
    ))
}
