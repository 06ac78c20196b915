//! Store access layer for tsa-web
//!
//! All queries go through [`AnnotationStore`], which wraps the pool built at
//! startup. Writes are single statements or explicit transactions and are
//! committed before the caller responds.

use sqlx::SqlitePool;

mod annotations;
mod assignments;
mod packs;

/// Typed access to the annotation database
#[derive(Clone)]
pub struct AnnotationStore {
    pool: SqlitePool,
}

impl AnnotationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}
