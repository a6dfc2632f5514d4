//! `fetch_news` tool: topic query to a block of fetched article text.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::news::NewsSearch;

use super::Tool;

const DEFAULT_MAX_RESULTS: usize = 5;

/// Searches the news provider and concatenates the fetched articles.
pub struct FetchNews {
    news: Arc<dyn NewsSearch>,
}

impl FetchNews {
    pub fn new(news: Arc<dyn NewsSearch>) -> Self {
        Self { news }
    }
}

#[async_trait]
impl Tool for FetchNews {
    fn name(&self) -> &str {
        "fetch_news"
    }

    fn description(&self) -> &str {
        "Search recent news for a topic. Returns the URL, title, and article text of each result, ready to be summarized or quoted."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "News topic or search query"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of articles to fetch (default: 5)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let query = args["query"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'query' argument"))?;
        let max_results = args["max_results"]
            .as_u64()
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_MAX_RESULTS);

        // Search failures become readable tool output so the model can
        // explain them to the user instead of the turn aborting.
        let articles = match self.news.search_and_fetch(query, max_results).await {
            Ok(articles) => articles,
            Err(e) => return Ok(format!("Failed to fetch news for '{}': {}", query, e)),
        };

        if articles.is_empty() {
            return Ok(format!("No news found for: {}", query));
        }

        let block = articles
            .iter()
            .map(|a| format!("URL: {}\nTitle: {}\n\n{}", a.url, a.title, a.text))
            .collect::<Vec<_>>()
            .join("\n\n---\n\n");

        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::Article;

    struct StubNews {
        articles: Vec<Article>,
    }

    #[async_trait]
    impl NewsSearch for StubNews {
        async fn search_and_fetch(
            &self,
            _query: &str,
            max_results: usize,
        ) -> anyhow::Result<Vec<Article>> {
            Ok(self.articles.iter().take(max_results).cloned().collect())
        }
    }

    struct FailingNews;

    #[async_trait]
    impl NewsSearch for FailingNews {
        async fn search_and_fetch(
            &self,
            _query: &str,
            _max_results: usize,
        ) -> anyhow::Result<Vec<Article>> {
            anyhow::bail!("connection refused")
        }
    }

    fn article(n: usize) -> Article {
        Article {
            url: format!("https://example.com/{}", n),
            title: format!("Story {}", n),
            text: format!("Body of story {}", n),
        }
    }

    #[tokio::test]
    async fn formats_articles_into_a_delimited_block() {
        let tool = FetchNews::new(Arc::new(StubNews {
            articles: vec![article(1), article(2)],
        }));

        let out = tool.execute(json!({"query": "space"})).await.unwrap();
        assert!(out.contains("URL: https://example.com/1"));
        assert!(out.contains("Title: Story 2"));
        assert!(out.contains("\n\n---\n\n"));
    }

    #[tokio::test]
    async fn provider_failure_becomes_tool_output() {
        let tool = FetchNews::new(Arc::new(FailingNews));
        let out = tool.execute(json!({"query": "space"})).await.unwrap();
        assert!(out.contains("Failed to fetch news"));
        assert!(out.contains("connection refused"));
    }

    #[tokio::test]
    async fn missing_query_is_an_error() {
        let tool = FetchNews::new(Arc::new(StubNews { articles: vec![] }));
        let err = tool.execute(json!({})).await.unwrap_err();
        assert!(err.to_string().contains("query"));
    }

    #[tokio::test]
    async fn empty_results_are_reported() {
        let tool = FetchNews::new(Arc::new(StubNews { articles: vec![] }));
        let out = tool.execute(json!({"query": "obscure"})).await.unwrap();
        assert_eq!(out, "No news found for: obscure");
    }
}
