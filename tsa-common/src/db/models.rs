//! Database models

use serde::{Deserialize, Serialize};

/// Set identifier (`sets.set_nb`)
pub type SetId = i64;

/// A pack row joined with the size of its owning set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pack {
    pub id: i64,
    /// Number of tweets in the pack
    pub cnt: i64,
    pub set_nb: SetId,
    /// 1-based position within the set
    pub pos: i64,
    /// Number of packs in the owning set
    pub set_size: i64,
}

impl Pack {
    /// True when this is the final pack of its set
    pub fn is_last_in_set(&self) -> bool {
        self.pos >= self.set_size
    }
}

/// A flat tweet row as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetRecord {
    /// Textual identifier, compared numerically
    pub id: String,
    pub pack: i64,
    pub text: String,
    pub user: Option<String>,
    /// Identifier of the tweet this one replies to
    pub replies_to: Option<String>,
    /// Quote target as recorded by the collector
    pub quoting: Option<String>,
    /// Identifier of the quoted tweet
    pub quoting_id: Option<String>,
    /// Serialized image list
    pub images: Option<String>,
}

/// Stored per-tweet stance annotation of one annotator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetAnnotation {
    pub tweet_id: String,
    pub annotation_prev: Option<String>,
    pub annotation_src: Option<String>,
}
