//! Health research tool backed by a web search provider
//!
//! Search is an external service that may be slow or down; failures are
//! returned to the agent as tool errors.

use super::{Tool, ToolOutput};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_ENDPOINT: &str = "https://api.duckduckgo.com/";
const MAX_RELATED_TOPICS: usize = 5;

/// Search provider failure
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search service unavailable: {0}")]
    Unavailable(String),
    #[error("unexpected search response: {0}")]
    BadResponse(String),
}

/// A web search provider
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a query and return a plain-text summary of the results
    async fn search(&self, query: &str) -> Result<String, SearchError>;
}

/// DuckDuckGo Instant Answer API client
pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
}

impl DuckDuckGoSearch {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("wellbeing-agent/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SearchError::Unavailable(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Endpoint from `SEARCH_ENDPOINT`, defaulting to the public API
    pub fn from_env() -> Result<Self, SearchError> {
        Self::new(std::env::var("SEARCH_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()))
    }

    fn summarize(query: &str, answer: InstantAnswer) -> String {
        let mut lines = Vec::new();

        if let Some(direct) = answer.answer.as_str().filter(|s| !s.is_empty()) {
            lines.push(direct.to_string());
        }
        if !answer.abstract_text.is_empty() {
            let source = if answer.abstract_source.is_empty() {
                String::new()
            } else {
                format!(" (source: {})", answer.abstract_source)
            };
            lines.push(format!("{}{source}", answer.abstract_text));
        }
        if !answer.definition.is_empty() {
            lines.push(answer.definition);
        }

        let mut related = Vec::new();
        collect_topics(&answer.related_topics, &mut related);
        lines.extend(
            related
                .into_iter()
                .take(MAX_RELATED_TOPICS)
                .map(|text| format!("- {text}")),
        );

        if lines.is_empty() {
            format!("No results found for \"{query}\".")
        } else {
            lines.join("\n")
        }
    }
}

fn collect_topics(topics: &[RelatedTopic], out: &mut Vec<String>) {
    for topic in topics {
        if let Some(text) = topic.text.as_deref().filter(|t| !t.is_empty()) {
            out.push(text.to_string());
        }
        collect_topics(&topic.topics, out);
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> Result<String, SearchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Unavailable(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Unavailable(format!("failed to read response: {e}")))?;
        let answer: InstantAnswer =
            serde_json::from_str(&body).map_err(|e| SearchError::BadResponse(e.to_string()))?;

        Ok(Self::summarize(query, answer))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswer {
    #[serde(default)]
    abstract_text: String,
    #[serde(default)]
    abstract_source: String,
    /// Usually a string, occasionally an object for calculator-style answers
    #[serde(default)]
    answer: serde_json::Value,
    #[serde(default)]
    definition: String,
    #[serde(default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RelatedTopic {
    #[serde(default)]
    text: Option<String>,
    /// Grouped topics nest one level
    #[serde(default)]
    topics: Vec<RelatedTopic>,
}

/// Tool wrapper around a search backend
pub struct HealthResearchTool {
    backend: std::sync::Arc<dyn SearchBackend>,
}

impl HealthResearchTool {
    pub fn new(backend: std::sync::Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for HealthResearchTool {
    fn name(&self) -> &'static str {
        "Health_Research"
    }

    fn description(&self) -> String {
        "Search for current health, fitness, or mental wellness information when you need up-to-date data. Input is a short search query.".to_string()
    }

    fn input_format(&self) -> &'static str {
        "a short web search query"
    }

    async fn run(&self, input: &str) -> ToolOutput {
        let query = input.trim();
        if query.is_empty() {
            return ToolOutput::error("Invalid input: search query is empty");
        }
        match self.backend.search(query).await {
            Ok(results) => ToolOutput::success(results),
            Err(e) => {
                tracing::warn!(error = %e, "Health research search failed");
                ToolOutput::error(format!("Search failed: {e}"))
            }
        }
    }
}
