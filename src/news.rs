//! News search provider.
//!
//! Searches DuckDuckGo's HTML endpoint (no API key) and fetches each hit's
//! page, reducing it to readable text. The [`NewsSearch`] trait is the seam
//! the `fetch_news` tool and tests program against.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

/// A fetched news article.
#[derive(Debug, Clone)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub text: String,
}

/// Content search provider: query to fetched articles.
#[async_trait]
pub trait NewsSearch: Send + Sync {
    async fn search_and_fetch(
        &self,
        query: &str,
        max_results: usize,
    ) -> anyhow::Result<Vec<Article>>;
}

/// Per-article text cap before handing content to the model.
const MAX_ARTICLE_CHARS: usize = 4000;

/// DuckDuckGo-backed [`NewsSearch`] implementation.
pub struct DuckDuckGoNews {
    client: reqwest::Client,
}

struct SearchHit {
    title: String,
    url: String,
    snippet: String,
}

impl DuckDuckGoNews {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; Newsdesk/0.1)")
            .timeout(Duration::from_secs(15))
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }

    async fn fetch_page_text(&self, url: &str) -> anyhow::Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP error: {}", status);
        }

        let is_html = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.contains("text/html"))
            .unwrap_or(true);

        let body = response.text().await?;
        let text = if is_html { strip_html(&body) } else { body };

        if text.len() > MAX_ARTICLE_CHARS {
            let end = safe_truncate_index(&text, MAX_ARTICLE_CHARS);
            Ok(format!("{}... [truncated]", &text[..end]))
        } else {
            Ok(text)
        }
    }
}

impl Default for DuckDuckGoNews {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NewsSearch for DuckDuckGoNews {
    async fn search_and_fetch(
        &self,
        query: &str,
        max_results: usize,
    ) -> anyhow::Result<Vec<Article>> {
        let url = format!(
            "https://html.duckduckgo.com/html/?q={}",
            urlencoding::encode(query)
        );

        let html = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let hits = parse_search_results(&html, max_results);
        debug!(query, hits = hits.len(), "news search returned");

        let mut articles = Vec::with_capacity(hits.len());
        for hit in hits {
            // Fall back to the search snippet when the page itself is
            // unreachable; a thin article beats a missing one.
            let text = match self.fetch_page_text(&hit.url).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(url = %hit.url, error = %e, "failed to fetch article page");
                    hit.snippet.clone()
                }
            };
            articles.push(Article {
                url: hit.url,
                title: hit.title,
                text,
            });
        }

        Ok(articles)
    }
}

/// Pull title, url, and snippet out of DuckDuckGo's HTML results page.
fn parse_search_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    let mut hits = Vec::new();

    for chunk in html.split("class=\"result__body\"").skip(1) {
        if hits.len() >= max_results {
            break;
        }

        let title = tag_text(chunk, "class=\"result__a\"");
        let snippet = tag_text(chunk, "class=\"result__snippet\"");
        let url = tag_text(chunk, "class=\"result__url\"");

        let (Some(title), Some(url)) = (title, url) else {
            continue;
        };
        let url = url.trim();
        if title.is_empty() || url.is_empty() {
            continue;
        }

        // The displayed URL omits the scheme.
        let url = if url.starts_with("http") {
            url.to_string()
        } else {
            format!("https://{}", url)
        };

        hits.push(SearchHit {
            title: decode_entities(&title),
            url,
            snippet: decode_entities(&snippet.unwrap_or_default()),
        });
    }

    hits
}

/// Text content of the first element carrying `marker` in `chunk`.
fn tag_text(chunk: &str, marker: &str) -> Option<String> {
    chunk
        .split(marker)
        .nth(1)?
        .split('>')
        .nth(1)?
        .split('<')
        .next()
        .map(|s| s.to_string())
}

/// Reduce an HTML page to whitespace-normalized text.
fn strip_html(html: &str) -> String {
    let mut text = html.to_string();

    for tag in ["script", "style"] {
        let open = format!("<{}", tag);
        let close = format!("</{}>", tag);
        while let Some(start) = text.find(&open) {
            match text[start..].find(&close) {
                Some(end) => {
                    text = format!("{}{}", &text[..start], &text[start + end + close.len()..]);
                }
                None => break,
            }
        }
    }

    let mut out = String::with_capacity(text.len() / 2);
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    // Decode before collapsing whitespace so &nbsp; folds away too.
    decode_entities(&out)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

/// Largest index at or below `max` that is a char boundary.
fn safe_truncate_index(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    let mut idx = max;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_HTML: &str = r#"
        <div class="result__body">
            <a class="result__a" href="/l/?u=x">Rocket launch succeeds</a>
            <a class="result__snippet" href="/l/?u=x">The launch went well &amp; landed.</a>
            <span class="result__url">
                example.com/rocket</span>
        </div>
        <div class="result__body">
            <a class="result__a" href="/l/?u=y">Second story</a>
            <a class="result__snippet" href="/l/?u=y">More details here.</a>
            <span class="result__url">
                news.example.org/story</span>
        </div>
    "#;

    #[test]
    fn parses_titles_urls_and_snippets() {
        let hits = parse_search_results(RESULTS_HTML, 5);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Rocket launch succeeds");
        assert_eq!(hits[0].url, "https://example.com/rocket");
        assert_eq!(hits[0].snippet, "The launch went well & landed.");
    }

    #[test]
    fn respects_max_results() {
        let hits = parse_search_results(RESULTS_HTML, 1);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn strips_tags_scripts_and_entities() {
        let html = "<html><script>var x = 1;</script><body><p>Hello&nbsp;<b>world</b></p></body></html>";
        assert_eq!(strip_html(html), "Hello world");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let s = "aéﬄ𝔘";
        for max in 0..=s.len() {
            let idx = safe_truncate_index(s, max);
            assert!(idx <= max || s.len() <= max);
            assert!(s.is_char_boundary(idx));
        }
    }
}
