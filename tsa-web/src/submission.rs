//! Pack submission form decoding
//!
//! The annotation form posts `annotation` once and `tweet_id`,
//! `tweet_annotation_prev`, `tweet_annotation_src` once per annotated tweet,
//! in matching order. Arrays of different lengths are rejected instead of
//! being paired up to the shortest one.

use thiserror::Error;
use tsa_common::db::TweetAnnotation;

/// Submission validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("missing field: annotation")]
    MissingAnnotation,

    #[error(
        "mismatched tweet fields: {ids} tweet_id, {prev} tweet_annotation_prev, {src} tweet_annotation_src"
    )]
    LengthMismatch { ids: usize, prev: usize, src: usize },

    #[error("empty tweet_id at index {0}")]
    EmptyTweetId(usize),
}

/// Decoded annotations for one pack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackSubmission {
    /// Free-text pack-level annotation
    pub annotation: String,
    pub tweets: Vec<TweetAnnotation>,
}

impl PackSubmission {
    /// Decode url-encoded form pairs, preserving repeated-field order
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, SubmissionError> {
        let mut annotation = None;
        let mut ids = Vec::new();
        let mut prev = Vec::new();
        let mut src = Vec::new();

        for (key, value) in pairs {
            match key.as_str() {
                "annotation" => annotation = Some(value),
                "tweet_id" => ids.push(value),
                "tweet_annotation_prev" => prev.push(value),
                "tweet_annotation_src" => src.push(value),
                _ => {}
            }
        }

        let annotation = annotation.ok_or(SubmissionError::MissingAnnotation)?;

        if ids.len() != prev.len() || ids.len() != src.len() {
            return Err(SubmissionError::LengthMismatch {
                ids: ids.len(),
                prev: prev.len(),
                src: src.len(),
            });
        }

        if let Some(idx) = ids.iter().position(|id| id.trim().is_empty()) {
            return Err(SubmissionError::EmptyTweetId(idx));
        }

        let tweets = ids
            .into_iter()
            .zip(prev)
            .zip(src)
            .map(|((tweet_id, annotation_prev), annotation_src)| TweetAnnotation {
                tweet_id,
                annotation_prev: Some(annotation_prev),
                annotation_src: Some(annotation_src),
            })
            .collect();

        Ok(Self { annotation, tweets })
    }
}
