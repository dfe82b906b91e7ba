//! URL document loader.
//!
//! Fetches a page over HTTP and extracts its visible text. HTML gets a
//! small tag-stripping pass (script/style contents dropped, a handful of
//! entities decoded); plain-text responses pass through unchanged.

use std::time::Duration;

use docent_core::corpus::DocumentLoader;
use docent_types::document::{Document, DocumentSource};
use docent_types::error::CorpusError;

/// Loads the corpus by fetching a single URL.
pub struct WebLoader {
    client: reqwest::Client,
    url: String,
}

impl WebLoader {
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("docent/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            url: url.into(),
        }
    }
}

impl DocumentLoader for WebLoader {
    async fn load(&self) -> Result<Vec<Document>, CorpusError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CorpusError::Fetch {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CorpusError::Fetch {
                url: self.url.clone(),
                message: format!("server returned {status}"),
            });
        }

        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("text/html"));

        let body = response.text().await.map_err(|e| CorpusError::Fetch {
            url: self.url.clone(),
            message: e.to_string(),
        })?;

        let text = if is_html || looks_like_html(&body) {
            strip_html(&body)
        } else {
            body
        };

        if text.trim().is_empty() {
            return Err(CorpusError::EmptyContent(self.url.clone()));
        }

        Ok(vec![Document::new(
            DocumentSource::Url {
                url: self.url.clone(),
            },
            text,
        )])
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

fn looks_like_html(body: &str) -> bool {
    let head = body.trim_start();
    head.starts_with("<!DOCTYPE") || head.starts_with("<!doctype") || head.starts_with("<html")
}

/// Tags that end a line of prose when they open or close.
const BLOCK_TAGS: [&str; 14] = [
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "table",
];

fn starts_with_ci(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn is_block_tag(tag: &str) -> bool {
    let name: String = tag
        .trim_start_matches('<')
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCK_TAGS.contains(&name.as_str())
}

/// Extract visible text from HTML.
///
/// Drops tags and the contents of `<script>`/`<style>` elements, decodes
/// the common entities, and collapses runs of blank lines. Good enough
/// for prose pages; structured extraction is not a goal here.
fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len() / 2);
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        rest = &rest[lt..];

        // script/style contents are dropped entirely
        let skip_closer = if starts_with_ci(rest, "<script") {
            Some("</script")
        } else if starts_with_ci(rest, "<style") {
            Some("</style")
        } else {
            None
        };

        if let Some(closer) = skip_closer {
            match rest.to_ascii_lowercase().find(closer) {
                Some(pos) => rest = &rest[pos..],
                None => {
                    // Unclosed script/style swallows the remainder
                    rest = "";
                    break;
                }
            }
        }

        // Consume the tag through '>', emitting a separator so words
        // from adjacent elements don't fuse
        match rest.find('>') {
            Some(gt) => {
                out.push(if is_block_tag(&rest[..gt]) { '\n' } else { ' ' });
                rest = &rest[gt + 1..];
            }
            None => {
                rest = "";
            }
        }
    }
    out.push_str(rest);

    let decoded = out
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    // Collapse whitespace: trim each line, drop runs of empty lines
    let mut lines: Vec<&str> = Vec::new();
    for line in decoded.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if lines.last().is_some_and(|l| !l.is_empty()) {
                lines.push("");
            }
        } else {
            lines.push(trimmed);
        }
    }
    lines.join("\n").trim().to_string()
}
