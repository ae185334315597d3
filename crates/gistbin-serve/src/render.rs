//! HTML pages.
//!
//! All rendering uses [maud](https://maud.lambda.xyz/); gist names and
//! contents are escaped on output.

use gistbin_core::{FullGist, encode_code};
use maud::{DOCTYPE, Markup, html};

use crate::config::{Localization, RateLimiterConfig};

/// Common page wrapper.
fn page_shell(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                link rel="stylesheet" href="/index.css";
            }
            body {
                main { (body) }
            }
        }
    }
}

/// The gist creator form.
pub fn home(loc: &Localization, limiter: &RateLimiterConfig) -> Markup {
    let body = html! {
        h1 { (loc.creator_title) }
        input id="name-input" type="text" placeholder=(loc.name_placeholder);
        textarea id="data-input" placeholder=(loc.content_placeholder) {}
        input id="surl-input" type="text" placeholder=(loc.code_placeholder);
        button id="create-button" type="button" { (loc.create_button) }
        div id="create-result-bar" {}
        input id="surl-output" type="text" readonly placeholder=(loc.result_placeholder);
        p class="rate-limits" { (loc.rate_limit_notice(limiter)) }
        script src="/index.js" {}
    };

    page_shell(&loc.creator_title, body)
}

/// Link to the creator form pre-filled from a stored gist. `code` is already
/// encoded; `directory` is the decoded path segment.
fn edit_href(code: &str, directory: Option<&str>) -> String {
    match directory.filter(|d| !d.is_empty()) {
        Some(dir) => format!("/?edit={code}&dir={}", encode_code(dir)),
        None => format!("/?edit={code}"),
    }
}

/// A stored gist, read from `directory` (or the default namespace).
pub fn gist_view(loc: &Localization, gist: &FullGist, directory: Option<&str>) -> Markup {
    let title = format!("{} - {}", gist.name, loc.view_title);
    let body = html! {
        h1 class="gist-name" { (gist.name) }
        pre class="gist-content" { (gist.content) }
        a class="button" href=(edit_href(&gist.code, directory)) { (loc.edit_button) }
    };

    page_shell(&title, body)
}

/// Shown when no gist exists under the requested code.
pub fn not_found(loc: &Localization) -> Markup {
    let body = html! {
        h1 { (loc.not_found) }
        a href="/" { (loc.creator_title) }
    };

    page_shell(&loc.not_found, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gist_view_escapes_content() {
        let gist = FullGist {
            content: "<script>alert(1)</script>".to_string(),
            name: "a & b".to_string(),
            code: "Aabcdefg".to_string(),
        };
        let html = gist_view(&Localization::default(), &gist, None).into_string();
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("a &amp; b"));
        assert!(html.contains("/?edit=Aabcdefg"));
        assert!(html.contains("Edit Gist"));
    }

    #[test]
    fn edit_link_keeps_directory() {
        let gist = FullGist {
            content: "in a".to_string(),
            name: "shared".to_string(),
            code: "shared".to_string(),
        };
        let html = gist_view(&Localization::default(), &gist, Some("my dir")).into_string();
        // maud escapes the ampersand inside the attribute
        assert!(html.contains("/?edit=shared&amp;dir=my%20dir"));

        assert_eq!(edit_href("shared", Some("")), "/?edit=shared");
        assert_eq!(edit_href("shared", None), "/?edit=shared");
    }

    #[test]
    fn home_shows_rate_limit_notice() {
        let html = home(&Localization::default(), &RateLimiterConfig::default()).into_string();
        assert!(html.contains("Rate limits apply: 30 gists in 5 minutes"));
        assert!(html.contains("id=\"data-input\""));
        assert!(html.contains("src=\"/index.js\""));
    }

    #[test]
    fn not_found_uses_localized_text() {
        let loc = Localization {
            not_found: "Nichts gefunden".to_string(),
            ..Localization::default()
        };
        assert!(not_found(&loc).into_string().contains("Nichts gefunden"));
    }
}
