//! Shared fixtures for tsa-web integration tests
#![allow(dead_code)]

use sqlx::SqlitePool;
use tempfile::TempDir;
use tsa_common::db::init_database;

/// Sets `(set_nb, size)` of the fixture store
pub const SETS: [(i64, i64); 3] = [(0, 2), (1, 2), (2, 1)];

/// Packs `(id_pack, cnt, set_nb, pos)` of the fixture store
pub const PACKS: [(i64, i64, i64, i64); 5] = [
    (10, 3, 1, 1),
    (11, 1, 1, 2),
    (20, 1, 0, 1),
    (21, 1, 0, 2),
    (30, 1, 2, 1),
];

/// Fresh database in a temporary directory, schema created, no rows
pub async fn empty_store() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("tweet_annotation.sqlite"))
        .await
        .unwrap();
    (dir, pool)
}

/// Database with three sets, five packs and a small thread in pack 10
///
/// Pack 10 holds source tweet 100, reply 101 (to 100), quote 102 (of 101)
/// and 103, a reply to a tweet outside the pack.
pub async fn seeded_store() -> (TempDir, SqlitePool) {
    let (dir, pool) = empty_store().await;

    for (set_nb, size) in SETS {
        sqlx::query("INSERT INTO sets (set_nb, size) VALUES (?, ?)")
            .bind(set_nb)
            .bind(size)
            .execute(&pool)
            .await
            .unwrap();
    }

    for (id, cnt, set_nb, pos) in PACKS {
        sqlx::query("INSERT INTO pack (id_pack, cnt, set_nb, pos) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(cnt)
            .bind(set_nb)
            .bind(pos)
            .execute(&pool)
            .await
            .unwrap();
    }

    let tweets: [(&str, i64, &str, &str, Option<&str>, Option<&str>, Option<&str>); 6] = [
        ("103", 10, "@carol out of thread", "dave", Some("999"), None, None),
        ("101", 10, "@alice I disagree", "bob", Some("100"), None, None),
        (
            "100",
            10,
            "Source claim #topic",
            "alice",
            None,
            None,
            Some("['https://pbs.example/a.jpg']"),
        ),
        ("102", 10, "Look at this <b>", "erin", None, Some("101"), None),
        ("110", 11, "second pack", "frank", None, None, None),
        ("200", 20, "set zero", "gina", None, None, None),
    ];

    for (id, pack, text, user, replies_to, quoting, images) in tweets {
        sqlx::query(
            r#"
            INSERT INTO tweet (id_tweet, pack, text, user, replies_to, quoting, quoting_id, images)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(pack)
        .bind(text)
        .bind(user)
        .bind(replies_to)
        .bind(quoting)
        .bind(quoting)
        .bind(images)
        .execute(&pool)
        .await
        .unwrap();
    }

    (dir, pool)
}

/// Give `set` to `count` throwaway annotators
pub async fn fill_set(pool: &SqlitePool, set: i64, count: usize) {
    for i in 0..count {
        sqlx::query("INSERT INTO set_annotation (set_nb, annotator) VALUES (?, ?)")
            .bind(set)
            .bind(format!("filler-{}-{}", set, i))
            .execute(pool)
            .await
            .unwrap();
    }
}

/// Number of annotators assigned to `set`
pub async fn assignment_count(pool: &SqlitePool, set: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM set_annotation WHERE set_nb = ?")
        .bind(set)
        .fetch_one(pool)
        .await
        .unwrap()
}
