//! # Scrape Tools
//!
//! Page fetching for the research roles: retrieve a URL, strip
//! script/style markup, collapse whitespace, and bound the excerpt
//! length so a single page cannot flood a prompt.

use radkit::macros::tool;
use radkit::tools::ToolResult;
use schemars::JsonSchema;
use scraper::{Html, Node};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Maximum characters of page text handed to a role
pub const MAX_EXCERPT_CHARS: usize = 5000;

const FETCH_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "blogsmith/0.1";

/// Why a page fetch failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("failed to read body: {0}")]
    Body(String),
}

/// Fetch a URL and return its visible text, bounded to
/// [`MAX_EXCERPT_CHARS`] characters.
pub async fn fetch_page_text(url: &str) -> Result<String, FetchError> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| FetchError::Request(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Request(e.to_string()))?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().as_u16()));
    }

    let html = response
        .text()
        .await
        .map_err(|e| FetchError::Body(e.to_string()))?;

    Ok(extract_text(&html))
}

/// Fetch a URL, encoding any failure as an inline error string.
///
/// Callers that feed prose to a role get text either way; the string
/// form of a failure always starts with `"Error scraping"`.
pub async fn fetch_lossy(url: &str) -> String {
    match fetch_page_text(url).await {
        Ok(text) => text,
        Err(e) => format!("Error scraping {}: {}", url, e),
    }
}

/// Strip markup from an HTML document and collapse whitespace.
///
/// Script, style, and noscript subtrees are dropped entirely. Output
/// is truncated at [`MAX_EXCERPT_CHARS`] characters.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut raw = String::new();
    collect_text(document.tree.root(), &mut raw);

    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > MAX_EXCERPT_CHARS {
        collapsed.chars().take(MAX_EXCERPT_CHARS).collect()
    } else {
        collapsed
    }
}

fn collect_text(node: ego_tree::NodeRef<'_, Node>, out: &mut String) {
    if let Some(element) = node.value().as_element() {
        let name = element.name();
        if name == "script" || name == "style" || name == "noscript" {
            return;
        }
    }
    if let Some(text) = node.value().as_text() {
        out.push_str(text);
        out.push(' ');
    }
    for child in node.children() {
        collect_text(child, out);
    }
}

/// Arguments for page scraping
#[derive(Deserialize, JsonSchema)]
pub struct ScrapePageArgs {
    /// URL of the page to fetch
    pub url: String,
}

/// Scrape the visible text of a web page
#[tool(
    description = "Fetch a web page and return its visible text with markup stripped. Text is truncated to 5000 characters."
)]
pub async fn scrape_page(args: ScrapePageArgs) -> ToolResult {
    match fetch_page_text(&args.url).await {
        Ok(text) => ToolResult::success(json!({
            "url": args.url,
            "text": text
        })),
        Err(e) => ToolResult::error(format!("Error scraping {}: {}", args.url, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_strips_script_and_style() {
        let html = r#"<html><head><style>body { color: red; }</style></head>
            <body><script>var x = 1;</script><p>Hello   world</p>
            <noscript>enable js</noscript></body></html>"#;
        let text = extract_text(html);
        assert_eq!(text, "Hello world");
    }

    #[test]
    fn test_extract_text_collapses_whitespace() {
        let html = "<p>one\n\n  two</p><p>three</p>";
        assert_eq!(extract_text(html), "one two three");
    }

    #[test]
    fn test_extract_text_truncates() {
        let body = "word ".repeat(3000);
        let html = format!("<p>{}</p>", body);
        let text = extract_text(&html);
        assert_eq!(text.chars().count(), MAX_EXCERPT_CHARS);
    }

    #[tokio::test]
    async fn test_fetch_lossy_unreachable_host() {
        // Port 9 (discard) is not listening locally; the fetch must
        // come back as prose, not a panic or an Err.
        let text = fetch_lossy("http://127.0.0.1:9/nothing").await;
        assert!(
            text.starts_with("Error scraping"),
            "got: {}",
            &text[..text.len().min(80)]
        );
    }
}
