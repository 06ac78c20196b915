//! Pack and tweet annotation persistence

use std::collections::{HashMap, HashSet};

use tracing::debug;
use tsa_common::db::TweetAnnotation;

use super::AnnotationStore;
use crate::error::{AppError, AppResult};
use crate::submission::PackSubmission;

impl AnnotationStore {
    /// Upsert the pack annotation and every tweet annotation in one transaction
    ///
    /// Every submitted tweet must belong to the pack, otherwise nothing is
    /// written. Nothing is visible to other readers until the commit; any
    /// failure rolls the whole submission back.
    pub async fn save_submission(
        &self,
        pack_id: i64,
        annotator: &str,
        submission: &PackSubmission,
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let members: HashSet<String> =
            sqlx::query_scalar("SELECT CAST(id_tweet AS TEXT) FROM tweet WHERE pack = ?")
                .bind(pack_id)
                .fetch_all(&mut *tx)
                .await?
                .into_iter()
                .collect();
        if let Some(foreign) = submission
            .tweets
            .iter()
            .find(|tweet| !members.contains(&tweet.tweet_id))
        {
            return Err(AppError::MalformedSubmission(format!(
                "tweet {} is not part of pack {}",
                foreign.tweet_id, pack_id
            )));
        }

        sqlx::query(
            "INSERT OR REPLACE INTO pack_annotation (id_pack, annotator, annotation) VALUES (?, ?, ?)",
        )
        .bind(pack_id)
        .bind(annotator)
        .bind(&submission.annotation)
        .execute(&mut *tx)
        .await?;

        for tweet in &submission.tweets {
            debug!(
                "tweet annotation: ({}, {}, {:?}, {:?})",
                tweet.tweet_id, annotator, tweet.annotation_prev, tweet.annotation_src
            );

            sqlx::query(
                r#"
                INSERT OR REPLACE INTO tweet_annotation
                    (id_tweet, annotator, annotation_prev, annotation_src)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&tweet.tweet_id)
            .bind(annotator)
            .bind(&tweet.annotation_prev)
            .bind(&tweet.annotation_src)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Previously stored pack annotation of `annotator`
    pub async fn pack_annotation(
        &self,
        pack_id: i64,
        annotator: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(Option<String>,)> = sqlx::query_as(
            "SELECT annotation FROM pack_annotation WHERE id_pack = ? AND annotator = ?",
        )
        .bind(pack_id)
        .bind(annotator)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(|(annotation,)| annotation))
    }

    /// Previously stored tweet annotations of `annotator` for one pack, by tweet id
    pub async fn tweet_annotations(
        &self,
        pack_id: i64,
        annotator: &str,
    ) -> Result<HashMap<String, TweetAnnotation>, sqlx::Error> {
        let rows: Vec<(String, Option<String>, Option<String>)> = sqlx::query_as(
            r#"
            SELECT CAST(a.id_tweet AS TEXT), a.annotation_prev, a.annotation_src
            FROM tweet_annotation a
            JOIN tweet t ON CAST(t.id_tweet AS TEXT) = CAST(a.id_tweet AS TEXT)
            WHERE t.pack = ? AND a.annotator = ?
            "#,
        )
        .bind(pack_id)
        .bind(annotator)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(tweet_id, annotation_prev, annotation_src)| {
                (
                    tweet_id.clone(),
                    TweetAnnotation {
                        tweet_id,
                        annotation_prev,
                        annotation_src,
                    },
                )
            })
            .collect())
    }
}
