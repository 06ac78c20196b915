//! HTML pages
//!
//! Pages are plain `format!` templates. Every value that originates from the
//! store or the request goes through [`escape_html`]; tweet text arrives
//! already escaped and marked up by the thread renderer.

use std::collections::HashMap;

use tsa_common::db::{Pack, SetId, TweetAnnotation};

use crate::thread::{escape_html, Tweet};

/// Stance choices offered for both facets: (value, label)
pub const STANCE_OPTIONS: [(&str, &str); 5] = [
    ("", "-"),
    ("support", "Support"),
    ("deny", "Deny"),
    ("query", "Query"),
    ("comment", "Comment"),
];

const STYLE: &str = r#"
        body {
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 900px;
            margin: 30px auto;
            padding: 0 20px;
            line-height: 1.5;
            color: #222;
        }
        h1 {
            border-bottom: 2px solid #0066cc;
            padding-bottom: 8px;
        }
        .tweet {
            border: 1px solid #ccd;
            border-radius: 6px;
            padding: 10px 14px;
            margin: 10px 0;
            background: #fafbff;
        }
        .replies {
            margin-left: 28px;
            border-left: 3px solid #e0e4f0;
            padding-left: 10px;
        }
        .user { font-weight: 600; color: #555; }
        .inReplyTo { color: #888; font-size: 0.9em; }
        .mention { color: #0066cc; }
        .hashtag { color: #2a8a2a; }
        .stance { margin-top: 6px; font-size: 0.9em; }
        .stance select { margin-right: 14px; }
        .tweet img { max-width: 240px; margin: 6px 6px 0 0; }
        textarea { width: 100%; min-height: 80px; }
        .button {
            display: inline-block;
            padding: 8px 18px;
            background: #0066cc;
            color: white;
            border: 0;
            border-radius: 4px;
            text-decoration: none;
            cursor: pointer;
        }
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape_html(title),
        style = STYLE,
        body = body,
    )
}

/// GET /login form
pub fn login_form() -> String {
    layout(
        "Login",
        r#"<h1>Tweet stance annotation</h1>
<form action="" method="post">
    <p><input type="text" name="username" required/></p>
    <p><input type="submit" value="Login" class="button"/></p>
</form>"#,
    )
}

/// Shown instead of any page that needs a session
pub fn login_prompt() -> String {
    layout(
        "Not logged in",
        r#"<p>You are not logged in</p>
<p><a href="/login"><b>click here to log in</b></a></p>"#,
    )
}

pub fn out_of_work() -> String {
    layout(
        "No set available",
        r#"<h1>No set available</h1>
<p>Every remaining set already has its annotators. Thank you for your work!</p>"#,
    )
}

pub fn error_page(title: &str, message: &str) -> String {
    layout(
        title,
        &format!(
            r#"<h1>{}</h1>
<p>{}</p>
<p><a href="/">Back</a></p>"#,
            escape_html(title),
            escape_html(message)
        ),
    )
}

/// Interstitial between two sets
pub fn next_set(set: SetId) -> String {
    layout(
        "Set complete",
        &format!(
            r#"<h1>Set {set} complete</h1>
<p>All packs of this set have been annotated.</p>
<p><a href="/set/{set}/start" class="button">Start next set</a></p>"#,
            set = set
        ),
    )
}

/// Everything the pack page shows
pub struct PackView<'a> {
    pub annotator: &'a str,
    pub pack: &'a Pack,
    pub forest: &'a [Tweet],
    pub pack_annotation: Option<&'a str>,
    pub tweet_annotations: &'a HashMap<String, TweetAnnotation>,
}

/// Pack page with the reconstructed threads and the annotation form
///
/// The pack's first root is the source tweet and gets no stance selects;
/// every other tweet posts `tweet_id`, `tweet_annotation_prev` and
/// `tweet_annotation_src` in that order.
pub fn pack_page(view: &PackView<'_>) -> String {
    let pack = view.pack;

    let mut threads = String::new();
    for (idx, root) in view.forest.iter().enumerate() {
        render_tweet(root, idx != 0, view.tweet_annotations, &mut threads);
    }

    let submit_label = if pack.is_last_in_set() {
        "Finish set"
    } else {
        "Next pack"
    };

    let body = format!(
        r#"<h1>Set {set} &middot; pack {pos} / {size}</h1>
<p>Annotator: <b>{annotator}</b> &middot; {cnt} tweets</p>
<form action="/annotate/set/{set}/pack/{pos}" method="post">
{threads}
    <h2>Pack annotation</h2>
    <textarea name="annotation">{annotation}</textarea>
    <p><input type="submit" value="{submit_label}" class="button"/></p>
</form>"#,
        set = pack.set_nb,
        pos = pack.pos,
        size = pack.set_size,
        annotator = escape_html(view.annotator),
        cnt = pack.cnt,
        threads = threads,
        annotation = escape_html(view.pack_annotation.unwrap_or("")),
        submit_label = submit_label,
    );

    layout(&format!("Set {} - pack {}", pack.set_nb, pack.pos), &body)
}

fn render_tweet(
    tweet: &Tweet,
    annotatable: bool,
    annotations: &HashMap<String, TweetAnnotation>,
    out: &mut String,
) {
    out.push_str(&format!(
        r#"<div class="tweet" id="tweet-{id}">
    <div class="user">{user}</div>
    <div class="text">{text}</div>
"#,
        id = escape_html(&tweet.id),
        user = escape_html(tweet.user.as_deref().unwrap_or("")),
        text = tweet.text,
    ));

    for url in tweet.images.iter().filter_map(|image| image.url()) {
        out.push_str(&format!(
            "    <img src=\"{}\" alt=\"\" loading=\"lazy\"/>\n",
            escape_html(url)
        ));
    }

    if annotatable {
        let stored = annotations.get(&tweet.id);
        let prev = stored.and_then(|a| a.annotation_prev.as_deref());
        let src = stored.and_then(|a| a.annotation_src.as_deref());

        out.push_str(&format!(
            r#"    <div class="stance">
        <input type="hidden" name="tweet_id" value="{id}"/>
        Previous tweet: {prev}
        Source tweet: {src}
    </div>
"#,
            id = escape_html(&tweet.id),
            prev = stance_select("tweet_annotation_prev", prev),
            src = stance_select("tweet_annotation_src", src),
        ));
    }

    if !tweet.replies.is_empty() {
        out.push_str("    <div class=\"replies\">\n");
        for reply in &tweet.replies {
            render_tweet(reply, true, annotations, out);
        }
        out.push_str("    </div>\n");
    }

    out.push_str("</div>\n");
}

fn stance_select(name: &str, selected: Option<&str>) -> String {
    let options: String = STANCE_OPTIONS
        .iter()
        .map(|(value, label)| {
            let marker = if Some(*value) == selected { " selected" } else { "" };
            format!(r#"<option value="{}"{}>{}</option>"#, value, marker, label)
        })
        .collect();

    format!(r#"<select name="{}">{}</select>"#, name, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsa_common::db::TweetRecord;

    fn tweet(id: &str, text: &str) -> Tweet {
        Tweet::from_record(TweetRecord {
            id: id.to_string(),
            pack: 3,
            text: text.to_string(),
            user: Some("<anon>".to_string()),
            replies_to: None,
            quoting: None,
            quoting_id: None,
            images: Some("['https://pbs.example/x.jpg']".to_string()),
        })
    }

    #[test]
    fn test_source_tweet_has_no_stance_fields() {
        let mut root = tweet("1", "source #tag");
        root.replies.push(tweet("2", "@a reply"));
        let second_root = tweet("3", "another");
        let pack = Pack {
            id: 3,
            cnt: 3,
            set_nb: 14,
            pos: 2,
            set_size: 2,
        };
        let annotations = HashMap::from([(
            "2".to_string(),
            TweetAnnotation {
                tweet_id: "2".to_string(),
                annotation_prev: Some("deny".to_string()),
                annotation_src: None,
            },
        )]);

        let html = pack_page(&PackView {
            annotator: "bob",
            pack: &pack,
            forest: &[root, second_root],
            pack_annotation: Some("<prior>"),
            tweet_annotations: &annotations,
        });

        assert_eq!(html.matches(r#"name="tweet_id""#).count(), 2);
        assert!(!html.contains(r#"name="tweet_id" value="1""#));
        assert!(html.contains(r#"action="/annotate/set/14/pack/2""#));
        assert!(html.contains(r#"<option value="deny" selected>"#));
        assert!(html.contains("&lt;prior&gt;"));
        assert!(html.contains("&lt;anon&gt;"));
        assert!(html.contains(r#"<img src="https://pbs.example/x.jpg""#));
        assert!(html.contains("Finish set"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = error_page("Oops", "<script>");
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
