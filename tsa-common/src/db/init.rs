//! Database initialization
//!
//! The pack and tweet tables are filled by an external loader; this module
//! only guarantees that every table the service touches exists, so an empty
//! database file boots cleanly.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Concurrent writers wait this long for the write lock before failing
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Open (creating if needed) the database and ensure the schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Per-connection options: every pooled connection gets WAL and the busy timeout
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);
    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create every table and index the service relies on (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_sets_table(pool).await?;
    create_pack_table(pool).await?;
    create_tweet_table(pool).await?;
    create_set_annotation_table(pool).await?;
    create_pack_annotation_table(pool).await?;
    create_tweet_annotation_table(pool).await?;
    create_settings_table(pool).await?;
    Ok(())
}

async fn create_sets_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sets (
            set_nb INTEGER PRIMARY KEY,
            size INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_pack_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pack (
            id_pack INTEGER PRIMARY KEY,
            cnt INTEGER NOT NULL,
            set_nb INTEGER NOT NULL,
            pos INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_pack_set_pos ON pack(set_nb, pos)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_tweet_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tweet (
            id_tweet TEXT PRIMARY KEY,
            pack INTEGER NOT NULL,
            text TEXT NOT NULL,
            user TEXT,
            replies_to TEXT,
            quoting TEXT,
            quoting_id TEXT,
            images TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tweet_pack ON tweet(pack)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_set_annotation_table(pool: &SqlitePool) -> Result<()> {
    // No uniqueness: the same annotator may be assigned a set twice
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS set_annotation (
            set_nb INTEGER NOT NULL,
            annotator TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_set_annotation_set ON set_annotation(set_nb)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_pack_annotation_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pack_annotation (
            id_pack INTEGER NOT NULL,
            annotator TEXT NOT NULL,
            annotation TEXT,
            PRIMARY KEY (id_pack, annotator)
        )
        "#,
    )
    .execute(pool)
    .await?;

    ensure_unique_key(pool, "pack_annotation", "id_pack, annotator").await
}

async fn create_tweet_annotation_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tweet_annotation (
            id_tweet TEXT NOT NULL,
            annotator TEXT NOT NULL,
            annotation_prev TEXT,
            annotation_src TEXT,
            PRIMARY KEY (id_tweet, annotator)
        )
        "#,
    )
    .execute(pool)
    .await?;

    ensure_unique_key(pool, "tweet_annotation", "id_tweet, annotator").await
}

async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Add a unique index on the upsert key of an annotation table
///
/// Databases created by older tooling may lack the key; upserts then degrade
/// to plain inserts. Existing duplicates make the index impossible, which is
/// logged rather than treated as fatal.
async fn ensure_unique_key(pool: &SqlitePool, table: &str, columns: &str) -> Result<()> {
    let sql = format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS uq_{table}_key ON {table}({columns})",
        table = table,
        columns = columns,
    );

    if let Err(e) = sqlx::query(&sql).execute(pool).await {
        warn!(
            "Could not enforce unique ({}) on {}: {} - annotation upserts may duplicate rows",
            columns, table, e
        );
    }

    Ok(())
}
