//! # Researcher Skill
//!
//! A2A-native skill that gathers material about the blog topic.
//! Uses the shared search and scrape tools to pull findings from
//! multiple sources.

use crate::models::ModelConfig;
use crate::run_llm_worker;
use crate::skills::tools::{diagram_tools, scrape_tools, search_tools};
use async_trait::async_trait;
use radkit::agent::{Artifact, OnRequestResult, SkillHandler};
use radkit::errors::{AgentError, AgentResult};
use radkit::macros::{skill, LLMOutput};
use radkit::models::Content;
use radkit::runtime::context::{ProgressSender, State};
use radkit::runtime::AgentRuntime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output from the researcher skill
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct ResearchOutput {
    /// Narrative summary of what was found
    pub summary: String,
    /// Key findings, statistics and expert opinions worth quoting
    pub key_findings: Vec<String>,
    /// URLs of the sources actually used
    #[serde(default)]
    pub sources: Vec<String>,
}

impl ResearchOutput {
    /// Render the research as text for the next pipeline step
    pub fn rendered(&self) -> String {
        let mut out = String::from("# Research Findings\n\n");
        out.push_str(&self.summary);
        if !self.key_findings.is_empty() {
            out.push_str("\n\n## Key Findings\n");
            for finding in &self.key_findings {
                out.push_str(&format!("- {}\n", finding));
            }
        }
        if !self.sources.is_empty() {
            out.push_str("\n## Sources\n");
            for source in &self.sources {
                out.push_str(&format!("- {}\n", source));
            }
        }
        out
    }
}

/// Researcher skill for gathering topic material
#[skill(
    id = "research",
    name = "Research Specialist",
    description = "Gathers comprehensive information about a blog topic from multiple sources using web search and page scraping.",
    tags = ["research", "search", "blog"],
    examples = ["Research Rust async runtimes", "Gather sources on retrieval networks"],
    input_modes = ["text/plain", "application/json"],
    output_modes = ["application/json"]
)]
pub struct ResearcherSkill {
    config: ModelConfig,
}

impl ResearcherSkill {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn with_model(model: &str) -> Self {
        Self::new(ModelConfig::new(model))
    }

    pub fn default() -> Self {
        Self::new(ModelConfig::default())
    }

    /// SDK-style call for direct Coordinator integration.
    /// Bypasses radkit runtime, calls LLM with tools directly.
    pub async fn run(instruction: &str, config: &ModelConfig) -> anyhow::Result<ResearchOutput> {
        run_llm_worker!(
            config,
            ResearchOutput,
            SYSTEM_PROMPT,
            instruction,
            search_tools::search_web,
            scrape_tools::scrape_page,
            diagram_tools::make_diagram,
        )
    }
}

#[async_trait]
impl SkillHandler for ResearcherSkill {
    async fn on_request(
        &self,
        _state: &mut State,
        progress: &ProgressSender,
        _runtime: &dyn AgentRuntime,
        content: Content,
    ) -> AgentResult<OnRequestResult> {
        let instruction = content.first_text().unwrap_or_default();

        progress.send_update("Researching topic...").await?;

        let result = run_llm_worker!(
            &self.config,
            ResearchOutput,
            SYSTEM_PROMPT,
            instruction,
            search_tools::search_web,
            scrape_tools::scrape_page,
            diagram_tools::make_diagram,
        )
        .map_err(|e| AgentError::Internal {
            component: "researcher_skill".to_string(),
            reason: e.to_string(),
        })?;

        progress.send_update("Research complete.").await?;

        let artifact =
            Artifact::from_json("research.json", &result).map_err(|e| AgentError::Internal {
                component: "researcher_skill".to_string(),
                reason: format!("Failed to create artifact: {}", e),
            })?;

        Ok(OnRequestResult::Completed {
            message: Some(Content::from_text(&result.summary)),
            artifacts: vec![artifact],
        })
    }
}

const SYSTEM_PROMPT: &str = include_str!("defaults/researcher.md");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_includes_sources() {
        let output = ResearchOutput {
            summary: "Rust adoption keeps growing.".to_string(),
            key_findings: vec!["38% of teams evaluated Rust in 2025".to_string()],
            sources: vec!["https://example.com/report".to_string()],
        };
        let text = output.rendered();
        assert!(text.contains("Rust adoption"));
        assert!(text.contains("## Key Findings"));
        assert!(text.contains("https://example.com/report"));
    }
}
