//! Reply/quote forest construction

use std::collections::HashMap;

use tsa_common::db::TweetRecord;

use super::Tweet;

/// Numeric value of a textual identifier
///
/// Follows SQLite's `CAST(x AS INTEGER)`, so the in-memory order matches the
/// store's `ORDER BY`: leading spaces and one sign are accepted, parsing stops
/// at the first non-digit, out-of-range values clamp to the `i64` bounds and
/// non-numeric ids are 0.
pub fn numeric_id(id: &str) -> i64 {
    let trimmed = id.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];
    if digits.is_empty() {
        return 0;
    }

    match (digits.parse::<i64>(), negative) {
        (Ok(value), true) => -value,
        (Ok(value), false) => value,
        (Err(_), true) => i64::MIN,
        (Err(_), false) => i64::MAX,
    }
}

/// Rebuild the reply/quote forest of one pack
///
/// Records are processed in ascending numeric id order (stable for ties).
/// A record hangs under its reply target if that target was already
/// processed, otherwise under its quoted tweet if already processed,
/// otherwise it becomes a root. Every record appears exactly once.
pub fn build_forest(mut records: Vec<TweetRecord>) -> Vec<Tweet> {
    records.sort_by_key(|record| numeric_id(&record.id));

    let mut seen: HashMap<String, usize> = HashMap::with_capacity(records.len());
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut roots = Vec::new();

    for (pos, record) in records.iter().enumerate() {
        let lookup = |target: &Option<String>| target.as_ref().and_then(|id| seen.get(id)).copied();

        match lookup(&record.replies_to).or_else(|| lookup(&record.quoting_id)) {
            Some(parent) => children[parent].push(pos),
            None => roots.push(pos),
        }

        // Registered after the lookup: a tweet never attaches to itself
        seen.insert(record.id.clone(), pos);
    }

    let mut slots: Vec<Option<Tweet>> = records
        .into_iter()
        .map(|record| Some(Tweet::from_record(record)))
        .collect();

    // Children sit at higher positions than their parent, so walking
    // backwards finishes every subtree before it is moved into its parent
    for pos in (0..slots.len()).rev() {
        let replies: Vec<Tweet> = children[pos]
            .iter()
            .filter_map(|&child| slots[child].take())
            .collect();

        if let Some(tweet) = slots[pos].as_mut() {
            tweet.replies = replies;
        }
    }

    roots
        .into_iter()
        .filter_map(|root| slots[root].take())
        .collect()
}
