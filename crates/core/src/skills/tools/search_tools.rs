//! # Search Tools
//!
//! Web search for the research roles. Delegates to SearXNG-style JSON
//! backends and flattens the results into a plain-text summary the
//! roles can read directly.

use radkit::macros::tool;
use radkit::tools::ToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

const DEFAULT_MAX_RESULTS: u32 = 5;

/// Why a search failed
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no search backend reachable")]
    NoBackend,
}

/// Search the web and return a plain-text summary of the results.
pub async fn search_text(query: &str, max_results: u32) -> Result<String, SearchError> {
    // Build list of endpoints to try:
    // 1. SEARXNG_URL env var (user configured)
    // 2. Public instances
    // 3. Local fallback
    let mut endpoints: Vec<String> = Vec::new();

    if let Ok(custom_url) = std::env::var("SEARXNG_URL") {
        endpoints.push(format!("{}/search", custom_url.trim_end_matches('/')));
    }

    // Public SearXNG instances (subset of reliable ones)
    // Full list: https://searx.space/
    endpoints.extend([
        "https://searx.be/search".to_string(),
        "https://search.sapti.me/search".to_string(),
        "https://searx.tiekoetter.com/search".to_string(),
    ]);

    endpoints.push("http://localhost:8888/search".to_string());
    endpoints.push("http://127.0.0.1:8888/search".to_string());

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .map_err(|_| SearchError::NoBackend)?;

    for endpoint in endpoints {
        let url = format!("{}?q={}&format=json", endpoint, urlencoding::encode(query));

        if let Ok(response) = client.get(&url).send().await {
            if let Ok(body) = response.json::<serde_json::Value>().await {
                if let Some(results) = body.get("results").and_then(|r| r.as_array()) {
                    return Ok(format_results(query, results, max_results));
                }
            }
        }
    }

    Err(SearchError::NoBackend)
}

/// Search the web, encoding any failure as an inline error string.
///
/// The string form of a failure always starts with `"Error searching"`.
pub async fn search_lossy(query: &str) -> String {
    match search_text(query, DEFAULT_MAX_RESULTS).await {
        Ok(summary) => summary,
        Err(e) => format!("Error searching {}: {}", query, e),
    }
}

/// Flatten raw backend results into numbered title/url/snippet lines.
pub fn format_results(query: &str, results: &[serde_json::Value], max_results: u32) -> String {
    let mut lines = vec![format!("Search results for \"{}\":", query)];

    for (i, result) in results.iter().take(max_results as usize).enumerate() {
        let title = result.get("title").and_then(|t| t.as_str()).unwrap_or("");
        let url = result.get("url").and_then(|u| u.as_str()).unwrap_or("");
        let snippet = result.get("content").and_then(|c| c.as_str()).unwrap_or("");
        lines.push(format!("{}. {}\n   {}\n   {}", i + 1, title, url, snippet));
    }

    if lines.len() == 1 {
        lines.push("(no results)".to_string());
    }

    lines.join("\n")
}

/// Arguments for web search
#[derive(Deserialize, JsonSchema)]
pub struct SearchWebArgs {
    /// Search query
    pub query: String,
    /// Maximum number of results (default: 5)
    pub max_results: Option<u32>,
}

/// Search the web for information
#[tool(
    description = "Search the web for information. Returns a plain-text summary of result titles, URLs and snippets."
)]
pub async fn search_web(args: SearchWebArgs) -> ToolResult {
    let max_results = args.max_results.unwrap_or(DEFAULT_MAX_RESULTS);

    match search_text(&args.query, max_results).await {
        Ok(summary) => ToolResult::success(json!({
            "query": args.query,
            "results": summary
        })),
        Err(e) => ToolResult::error(format!("Error searching {}: {}", args.query, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_results() {
        let results = vec![
            json!({"title": "Rust 2026", "url": "https://example.com/a", "content": "state of rust"}),
            json!({"title": "Async", "url": "https://example.com/b", "content": "tokio"}),
        ];
        let summary = format_results("rust", &results, 5);
        assert!(summary.starts_with("Search results for \"rust\""));
        assert!(summary.contains("1. Rust 2026"));
        assert!(summary.contains("https://example.com/b"));
    }

    #[test]
    fn test_format_results_respects_limit() {
        let results: Vec<_> = (0..10)
            .map(|i| json!({"title": format!("r{}", i), "url": "u", "content": "c"}))
            .collect();
        let summary = format_results("q", &results, 3);
        assert!(summary.contains("3. r2"));
        assert!(!summary.contains("4. r3"));
    }

    #[test]
    fn test_format_results_empty() {
        let summary = format_results("q", &[], 5);
        assert!(summary.contains("(no results)"));
    }
}
