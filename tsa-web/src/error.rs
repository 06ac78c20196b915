//! Error types for tsa-web
//!
//! Every handler returns [`AppResult`]; [`AppError`] renders the matching
//! status code and a small HTML page.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::allocation::AllocationError;
use crate::api::pages;
use crate::submission::SubmissionError;

/// Seconds a client should wait before retrying after a store failure
const RETRY_AFTER_SECS: &str = "2";

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// No session identity: prompt to log in
    #[error("not logged in")]
    Unauthenticated,

    /// Every set is already taken by its maximum number of annotators
    #[error("no set is available for annotation")]
    OutOfWork,

    /// Requested pack or set does not exist (404)
    #[error("not found: {0}")]
    NotFound(String),

    /// Annotation form that cannot be stored as submitted (400)
    #[error("malformed submission: {0}")]
    MalformedSubmission(String),

    /// Store failure; the transaction was rolled back and the request may be retried (503)
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// tsa-common error
    #[error("common error: {0}")]
    Common(#[from] tsa_common::Error),
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::OutOfWork => AppError::OutOfWork,
            AllocationError::UnknownSet(set) => AppError::NotFound(format!("set {}", set)),
        }
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        AppError::MalformedSubmission(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthenticated => (StatusCode::OK, Html(pages::login_prompt())).into_response(),
            AppError::OutOfWork => {
                warn!("Allocation exhausted the set order");
                (StatusCode::CONFLICT, Html(pages::out_of_work())).into_response()
            }
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Html(pages::error_page("Not found", &format!("No such {}.", what))),
            )
                .into_response(),
            AppError::MalformedSubmission(reason) => {
                warn!("Rejected submission: {}", reason);
                (
                    StatusCode::BAD_REQUEST,
                    Html(pages::error_page("Invalid submission", &reason)),
                )
                    .into_response()
            }
            AppError::Store(err) => {
                error!("Store error: {}", err);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    [(header::RETRY_AFTER, RETRY_AFTER_SECS)],
                    Html(pages::error_page(
                        "Temporarily unavailable",
                        "Nothing was saved. Please retry in a moment.",
                    )),
                )
                    .into_response()
            }
            AppError::Common(tsa_common::Error::InvalidInput(reason)) => (
                StatusCode::BAD_REQUEST,
                Html(pages::error_page("Invalid input", &reason)),
            )
                .into_response(),
            AppError::Common(tsa_common::Error::Database(err)) => AppError::Store(err).into_response(),
            AppError::Common(err) => {
                error!("Internal error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(pages::error_page("Internal error", &err.to_string())),
                )
                    .into_response()
            }
        }
    }
}

/// Result type for handlers and services
pub type AppResult<T> = Result<T, AppError>;
