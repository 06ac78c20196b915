//! Tweet text markup
//!
//! Three transforms, applied to HTML-escaped text:
//! - a leading run of mentions becomes an in-reply-to preamble
//! - `#token` becomes a hashtag span
//! - `@token` becomes a mention span, also inside the preamble
//!
//! A token runs from its marker to the next whitespace. A token of one kind
//! that contains the other marker nests a span of the other kind from that
//! marker to the end of the token.

use once_cell::sync::Lazy;
use regex::Regex;

/// Label introducing the in-reply-to preamble
pub const IN_REPLY_TO_LABEL: &str = "En réponse à : ";

const MENTION: char = '@';
const HASHTAG: char = '#';

/// Shortest leading run, not crossing a newline, followed by whitespace and a
/// non-mention character. Only the capture is the preamble.
static REPLY_TO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(@[^\n]*?)\s[^@]").expect("valid reply-to pattern"));

/// A marker up to the next whitespace
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[#@]\S*").expect("valid token pattern"));

/// Render raw tweet text as markup
///
/// # Examples
///
/// ```
/// use tsa_web::thread::render_text;
///
/// assert_eq!(
///     render_text("say #topic now"),
///     r#"say <span class="hashtag">#topic</span> now"#
/// );
/// ```
pub fn render_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 64);

    let rest = match reply_preamble_end(raw) {
        Some(end) => {
            out.push_str(r#"<span class="inReplyTo">"#);
            out.push_str(IN_REPLY_TO_LABEL);
            mark_tokens(&raw[..end], &mut out);
            out.push_str("<br/><br/></span>");
            &raw[end..]
        }
        None => raw,
    };

    mark_tokens(rest, &mut out);
    out
}

/// Byte length of the in-reply-to run, if the text opens with one
fn reply_preamble_end(text: &str) -> Option<usize> {
    REPLY_TO_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|run| run.end())
}

fn mark_tokens(text: &str, out: &mut String) {
    let mut last = 0;

    for token in TOKEN_RE.find_iter(text) {
        escape_into(&text[last..token.start()], out);
        wrap_token(token.as_str(), out);
        last = token.end();
    }

    escape_into(&text[last..], out);
}

/// Wrap a token that starts with a marker
fn wrap_token(token: &str, out: &mut String) {
    let (class, other) = if token.starts_with(HASHTAG) {
        ("hashtag", MENTION)
    } else {
        ("mention", HASHTAG)
    };

    out.push_str(r#"<span class=""#);
    out.push_str(class);
    out.push_str(r#"">"#);

    // Markers are ASCII, so index 1 is a char boundary
    match token[1..].find(other) {
        Some(offset) => {
            escape_into(&token[..1 + offset], out);
            wrap_token(&token[1 + offset..], out);
        }
        None => escape_into(token, out),
    }

    out.push_str("</span>");
}

/// Escape text for HTML element and attribute content
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(text, &mut out);
    out
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_preamble_wraps_leading_mention() {
        assert_eq!(
            render_text("@alice hi there"),
            concat!(
                r#"<span class="inReplyTo">En réponse à : "#,
                r#"<span class="mention">@alice</span><br/><br/></span>"#,
                " hi there"
            )
        );
    }

    #[test]
    fn test_preamble_spans_consecutive_mentions() {
        assert_eq!(
            render_text("@alice @bob ok"),
            concat!(
                r#"<span class="inReplyTo">En réponse à : "#,
                r#"<span class="mention">@alice</span> <span class="mention">@bob</span>"#,
                "<br/><br/></span> ok"
            )
        );
    }

    #[test]
    fn test_hashtag_only() {
        assert_eq!(
            render_text("say #topic now"),
            r#"say <span class="hashtag">#topic</span> now"#
        );
    }

    #[test]
    fn test_inner_mention_is_not_a_preamble() {
        assert_eq!(
            render_text("text #Tag and @User_target."),
            concat!(
                r#"text <span class="hashtag">#Tag</span> and "#,
                r#"<span class="mention">@User_target.</span>"#
            )
        );
    }

    #[test]
    fn test_lone_mention_without_following_word() {
        // No whitespace followed by a non-mention character: no preamble
        assert_eq!(render_text("@alice"), r#"<span class="mention">@alice</span>"#);
        assert_eq!(
            render_text("@alice @bob"),
            r#"<span class="mention">@alice</span> <span class="mention">@bob</span>"#
        );
    }

    #[test]
    fn test_preamble_does_not_cross_newline() {
        assert_eq!(
            render_text("@a\nb"),
            concat!(
                r#"<span class="inReplyTo">En réponse à : "#,
                r#"<span class="mention">@a</span><br/><br/></span>"#,
                "\nb"
            )
        );
        assert_eq!(
            render_text("@a @b\n@c d"),
            concat!(
                r#"<span class="mention">@a</span> <span class="mention">@b</span>"#,
                "\n",
                r#"<span class="mention">@c</span> d"#
            )
        );
    }

    #[test]
    fn test_nested_marker_inside_token() {
        assert_eq!(
            render_text("x #a@b y"),
            r#"x <span class="hashtag">#a<span class="mention">@b</span></span> y"#
        );
    }

    #[test]
    fn test_raw_html_is_escaped() {
        assert_eq!(
            render_text("<b>bold</b> & #x<y"),
            r#"&lt;b&gt;bold&lt;/b&gt; &amp; <span class="hashtag">#x&lt;y</span>"#
        );
    }

    #[test]
    fn test_empty_and_plain_text() {
        assert_eq!(render_text(""), "");
        assert_eq!(render_text("plain words"), "plain words");
        assert_eq!(render_text("a # b"), r#"a <span class="hashtag">#</span> b"#);
    }
}
