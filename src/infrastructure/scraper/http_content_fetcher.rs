use async_trait::async_trait;

use crate::application::ports::{ContentFetchError, ContentFetcher};
use crate::domain::{SourceKind, SourceReference};

/// Fetches URL sources over HTTP and reduces the body to plain text; raw
/// text sources pass through unchanged.
pub struct HttpContentFetcher {
    client: reqwest::Client,
    max_chars: usize,
}

impl HttpContentFetcher {
    pub fn new(max_chars: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            max_chars,
        }
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch(&self, source: &SourceReference) -> Result<String, ContentFetchError> {
        let text = match source.kind {
            SourceKind::RawText => source.value.clone(),
            SourceKind::Url => {
                tracing::debug!(url = %source.value, "Fetching source content");
                let response = self
                    .client
                    .get(&source.value)
                    .send()
                    .await
                    .map_err(|e| ContentFetchError::RequestFailed(format!("request: {}", e)))?;

                if !response.status().is_success() {
                    return Err(ContentFetchError::RequestFailed(format!(
                        "status {} for {}",
                        response.status(),
                        source.value
                    )));
                }

                let body = response
                    .text()
                    .await
                    .map_err(|e| ContentFetchError::RequestFailed(format!("read body: {}", e)))?;
                html_to_text(&body)
            }
        };

        let mut text = text.trim().to_string();
        if text.is_empty() {
            return Err(ContentFetchError::EmptyContent(source.value.clone()));
        }
        if text.chars().count() > self.max_chars {
            text = text.chars().take(self.max_chars).collect();
            tracing::debug!(
                max_chars = self.max_chars,
                "Truncated fetched content to the configured budget"
            );
        }
        Ok(text)
    }
}

/// Crude HTML-to-text reduction: drops script/style blocks and tags,
/// decodes the common entities and collapses whitespace. Good enough to
/// feed a prompt; not an HTML parser.
pub fn html_to_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len() / 2);
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        rest = &rest[open..];

        let skip_to = if starts_with_ci(rest, "<script") {
            find_ci(rest, "</script>").map(|i| i + "</script>".len())
        } else if starts_with_ci(rest, "<style") {
            find_ci(rest, "</style>").map(|i| i + "</style>".len())
        } else {
            rest.find('>').map(|i| i + 1)
        };

        match skip_to {
            Some(end) => {
                // Block-level boundaries keep words from running together.
                text.push(' ');
                rest = &rest[end..];
            }
            None => {
                rest = "";
            }
        }
    }
    text.push_str(rest);

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn starts_with_ci(haystack: &str, prefix: &str) -> bool {
    haystack.len() >= prefix.len()
        && haystack.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

// Byte offsets are safe to slice on: the needles are pure ASCII, so a match
// always starts and ends on a char boundary.
fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}
