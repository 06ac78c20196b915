//! Set assignment queries

use std::collections::HashMap;

use tsa_common::db::SetId;

use super::AnnotationStore;
use crate::allocation::MAX_ANNOTATORS_PER_SET;

impl AnnotationStore {
    /// Round trip to the database
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Number of rows in `sets`
    pub async fn count_sets(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM sets")
            .fetch_one(&self.pool)
            .await
    }

    /// Assignment count of every set that has at least one assignment
    pub async fn assignment_counts(&self) -> Result<HashMap<SetId, i64>, sqlx::Error> {
        let rows: Vec<(SetId, i64)> =
            sqlx::query_as("SELECT set_nb, COUNT(*) FROM set_annotation GROUP BY set_nb")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().collect())
    }

    /// Every set ever assigned to `annotator`
    pub async fn sets_of(&self, annotator: &str) -> Result<Vec<SetId>, sqlx::Error> {
        sqlx::query_scalar("SELECT set_nb FROM set_annotation WHERE annotator = ?")
            .bind(annotator)
            .fetch_all(&self.pool)
            .await
    }

    /// Record an assignment if the set is still below the annotator cap
    ///
    /// Count and insert run as one statement, so SQLite evaluates the cap
    /// under the write lock. Returns `false` when the set filled up first.
    pub async fn assign_if_open(&self, set: SetId, annotator: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO set_annotation (set_nb, annotator)
            SELECT ?, ?
            WHERE (SELECT COUNT(*) FROM set_annotation WHERE set_nb = ?) < ?
            "#,
        )
        .bind(set)
        .bind(annotator)
        .bind(set)
        .bind(MAX_ANNOTATORS_PER_SET)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
