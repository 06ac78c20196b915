//! Pack and tweet queries (read-only)

use tsa_common::db::{Pack, SetId, TweetRecord};

use super::AnnotationStore;

type TweetRow = (
    String,
    i64,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

impl AnnotationStore {
    /// Pack at `pos` within `set`, with the size of the set
    pub async fn fetch_pack(&self, set: SetId, pos: i64) -> Result<Option<Pack>, sqlx::Error> {
        let row: Option<(i64, i64, SetId, i64, i64)> = sqlx::query_as(
            r#"
            SELECT p.id_pack, p.cnt, s.set_nb, p.pos, s.size
            FROM pack p
            JOIN sets s ON s.set_nb = p.set_nb
            WHERE p.set_nb = ? AND p.pos = ?
            "#,
        )
        .bind(set)
        .bind(pos)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, cnt, set_nb, pos, set_size)| Pack {
            id,
            cnt,
            set_nb,
            pos,
            set_size,
        }))
    }

    /// Tweets of a pack in ascending numeric identifier order
    ///
    /// Loaders have stored identifiers both as text and as integers; every
    /// identifier column is read back as text.
    pub async fn fetch_tweets(&self, pack_id: i64) -> Result<Vec<TweetRecord>, sqlx::Error> {
        let rows: Vec<TweetRow> = sqlx::query_as(
            r#"
            SELECT CAST(id_tweet AS TEXT), pack, CAST(text AS TEXT), CAST(user AS TEXT),
                   CAST(replies_to AS TEXT), CAST(quoting AS TEXT),
                   CAST(quoting_id AS TEXT), CAST(images AS TEXT)
            FROM tweet
            WHERE pack = ?
            ORDER BY CAST(id_tweet AS INTEGER)
            "#,
        )
        .bind(pack_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, pack, text, user, replies_to, quoting, quoting_id, images)| TweetRecord {
                    id,
                    pack,
                    text,
                    user,
                    replies_to,
                    quoting,
                    quoting_id,
                    images,
                },
            )
            .collect())
    }
}
