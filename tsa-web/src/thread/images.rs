//! Stored image list decoding
//!
//! Collectors stored the optional image list as a serialized list literal.
//! Two shapes are accepted, both parsed as data and never evaluated:
//! - a JSON array whose entries are URL strings or objects
//! - a list of single- or double-quoted strings, e.g. `['a.jpg', "b.png"]`
//!
//! `NULL`, empty, `None`, `null` and `[]` all mean "no images".

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Object keys tried, in order, to find the URL of an image object
const URL_KEYS: [&str; 4] = ["url", "media_url_https", "media_url", "src"];

/// One image attached to a tweet
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Image {
    Url(String),
    Object(Map<String, Value>),
}

impl Image {
    /// Displayable URL of the image, if it has one
    pub fn url(&self) -> Option<&str> {
        match self {
            Image::Url(url) => Some(url),
            Image::Object(map) => URL_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str)),
        }
    }
}

/// Image list decoding failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageDecodeError {
    #[error("image list is not a list: {0:?}")]
    NotAList(String),

    #[error("image entry {0} is neither a string nor an object")]
    UnsupportedEntry(usize),

    #[error("malformed image list at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: &'static str },
}

/// Decode a stored image list
pub fn decode_images(stored: Option<&str>) -> Result<Vec<Image>, ImageDecodeError> {
    let trimmed = match stored.map(str::trim) {
        None | Some("") | Some("None") | Some("null") => return Ok(Vec::new()),
        Some(trimmed) => trimmed,
    };

    if !trimmed.starts_with('[') {
        return Err(ImageDecodeError::NotAList(trimmed.chars().take(40).collect()));
    }

    match serde_json::from_str::<Vec<Value>>(trimmed) {
        Ok(values) => values
            .into_iter()
            .enumerate()
            .map(|(idx, value)| match value {
                Value::String(url) => Ok(Image::Url(url)),
                Value::Object(map) => Ok(Image::Object(map)),
                _ => Err(ImageDecodeError::UnsupportedEntry(idx)),
            })
            .collect(),
        Err(_) => parse_string_list(trimmed).map(|urls| urls.into_iter().map(Image::Url).collect()),
    }
}

/// Parse a bracketed list of quoted strings
fn parse_string_list(input: &str) -> Result<Vec<String>, ImageDecodeError> {
    let malformed = |offset, reason| ImageDecodeError::Malformed { offset, reason };

    let mut chars = input.char_indices().peekable();
    match chars.next() {
        Some((_, '[')) => {}
        _ => return Err(malformed(0, "expected '['")),
    }

    let mut items = Vec::new();
    loop {
        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        let (offset, quote) = match chars.next() {
            Some((_, ']')) => break,
            Some((offset, c)) if c == '\'' || c == '"' => (offset, c),
            Some((offset, _)) => return Err(malformed(offset, "expected a quoted string")),
            None => return Err(malformed(input.len(), "unterminated list")),
        };

        let mut item = String::new();
        loop {
            match chars.next() {
                Some((_, c)) if c == quote => break,
                Some((_, '\\')) => match chars.next() {
                    Some((_, 'n')) => item.push('\n'),
                    Some((_, 't')) => item.push('\t'),
                    Some((_, c)) if c == '\\' || c == '\'' || c == '"' => item.push(c),
                    Some((_, c)) => {
                        item.push('\\');
                        item.push(c);
                    }
                    None => return Err(malformed(input.len(), "unterminated escape")),
                },
                Some((_, c)) => item.push(c),
                None => return Err(malformed(offset, "unterminated string")),
            }
        }
        items.push(item);

        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        match chars.next() {
            Some((_, ',')) => continue,
            Some((_, ']')) => break,
            Some((offset, _)) => return Err(malformed(offset, "expected ',' or ']'")),
            None => return Err(malformed(input.len(), "unterminated list")),
        }
    }

    if let Some((offset, _)) = chars.find(|(_, c)| !c.is_whitespace()) {
        return Err(malformed(offset, "trailing characters after list"));
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_values_mean_no_images() {
        for stored in [None, Some(""), Some("  "), Some("None"), Some("null"), Some("[]")] {
            assert_eq!(decode_images(stored), Ok(Vec::new()), "{:?}", stored);
        }
    }

    #[test]
    fn test_single_quoted_literal_list() {
        let images =
            decode_images(Some("['https://pbs.example/a.jpg', \"https://pbs.example/b.png\"]"))
                .unwrap();

        let urls: Vec<_> = images.iter().filter_map(Image::url).collect();
        assert_eq!(urls, vec!["https://pbs.example/a.jpg", "https://pbs.example/b.png"]);
    }

    #[test]
    fn test_escapes_and_trailing_comma() {
        let images = decode_images(Some(r"['it\'s.jpg', ]")).unwrap();
        assert_eq!(images, vec![Image::Url("it's.jpg".to_string())]);
    }

    #[test]
    fn test_json_objects_accepted() {
        let images = decode_images(Some(
            r#"[{"media_url_https": "https://pbs.example/c.jpg", "type": "photo"}, {"type": "video"}]"#,
        ))
        .unwrap();

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].url(), Some("https://pbs.example/c.jpg"));
        assert_eq!(images[1].url(), None);
    }

    #[test]
    fn test_code_is_rejected_not_run() {
        assert!(matches!(
            decode_images(Some("__import__('os').system('rm -rf /')")),
            Err(ImageDecodeError::NotAList(_))
        ));
        assert!(matches!(
            decode_images(Some("[__import__('os')]")),
            Err(ImageDecodeError::Malformed { .. })
        ));
        assert!(matches!(
            decode_images(Some("['a.jpg'] + ['b.jpg']")),
            Err(ImageDecodeError::Malformed { .. })
        ));
    }

    #[test]
    fn test_unsupported_json_entries_rejected() {
        assert_eq!(
            decode_images(Some(r#"["a.jpg", 42]"#)),
            Err(ImageDecodeError::UnsupportedEntry(1))
        );
    }

    #[test]
    fn test_unterminated_input_rejected() {
        assert!(decode_images(Some("['a.jpg'")).is_err());
        assert!(decode_images(Some("['a.jpg")).is_err());
    }
}
