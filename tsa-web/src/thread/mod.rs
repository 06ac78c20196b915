//! Thread reconstruction for one pack
//!
//! Flat tweet rows are turned into a forest of [`Tweet`]s: replies and
//! quotes hang under the tweet they target when that tweet appears earlier
//! in the pack, everything else is a root. Each tweet carries its text with
//! mention, hashtag and reply-preamble markup already applied.

mod forest;
mod images;
mod markup;

pub use forest::{build_forest, numeric_id};
pub use images::{decode_images, Image, ImageDecodeError};
pub use markup::{escape_html, render_text, IN_REPLY_TO_LABEL};

use serde::Serialize;
use tracing::warn;
use tsa_common::db::TweetRecord;

/// A tweet prepared for display, with its attached replies and quotes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tweet {
    pub id: String,
    pub pack: i64,
    pub user: Option<String>,
    pub replies_to: Option<String>,
    pub quoting: Option<String>,
    pub quoting_id: Option<String>,
    /// Escaped text with markup spans inserted
    pub text: String,
    pub images: Vec<Image>,
    /// Replies and quotes, in identifier order
    pub replies: Vec<Tweet>,
}

impl Tweet {
    pub fn from_record(record: TweetRecord) -> Self {
        // A bad image list only costs the images, not the whole pack page
        let images = decode_images(record.images.as_deref()).unwrap_or_else(|e| {
            warn!("Ignoring images of tweet {}: {}", record.id, e);
            Vec::new()
        });

        Self {
            text: render_text(&record.text),
            id: record.id,
            pack: record.pack,
            user: record.user,
            replies_to: record.replies_to,
            quoting: record.quoting,
            quoting_id: record.quoting_id,
            images,
            replies: Vec::new(),
        }
    }

    /// Number of tweets in this subtree, this one included
    pub fn subtree_len(&self) -> usize {
        1 + self.replies.iter().map(Tweet::subtree_len).sum::<usize>()
    }
}
