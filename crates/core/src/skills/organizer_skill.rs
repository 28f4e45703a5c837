//! # Organizer Skill
//!
//! A2A-native skill that turns research findings and curated assets
//! into a structured outline for the writer.

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

/// One planned section of the post
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct OutlineSection {
    /// Section heading
    pub heading: String,
    /// Key points to cover, in order
    pub points: Vec<String>,
}

/// Output from the organizer skill
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct OutlineOutput {
    /// Ordered sections of the planned post
    pub sections: Vec<OutlineSection>,
}

impl OutlineOutput {
    /// Render the outline as text for the next pipeline step
    pub fn rendered(&self) -> String {
        let mut out = String::from("# Blog Outline\n");
        for section in &self.sections {
            out.push_str(&format!("\n## {}\n", section.heading));
            for point in &section.points {
                out.push_str(&format!("- {}\n", point));
            }
        }
        out
    }
}

/// Organizer skill for structuring the post
#[skill(
    id = "organize",
    name = "Content Organizer",
    description = "Organizes research findings into a coherent blog outline with sections, key points and asset placements.",
    tags = ["outline", "structure", "blog"],
    examples = ["Outline a post from these findings"],
    input_modes = ["text/plain", "application/json"],
    output_modes = ["application/json"]
)]
pub struct OrganizerSkill {
    config: ModelConfig,
}

impl OrganizerSkill {
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
    pub async fn run(instruction: &str, config: &ModelConfig) -> anyhow::Result<OutlineOutput> {
        run_llm_worker!(
            config,
            OutlineOutput,
            SYSTEM_PROMPT,
            instruction,
            search_tools::search_web,
            scrape_tools::scrape_page,
            diagram_tools::make_diagram,
        )
    }
}

#[async_trait]
impl SkillHandler for OrganizerSkill {
    async fn on_request(
        &self,
        _state: &mut State,
        progress: &ProgressSender,
        _runtime: &dyn AgentRuntime,
        content: Content,
    ) -> AgentResult<OnRequestResult> {
        let instruction = content.first_text().unwrap_or_default();

        progress.send_update("Structuring the outline...").await?;

        let result = run_llm_worker!(
            &self.config,
            OutlineOutput,
            SYSTEM_PROMPT,
            instruction,
            search_tools::search_web,
            scrape_tools::scrape_page,
            diagram_tools::make_diagram,
        )
        .map_err(|e| AgentError::Internal {
            component: "organizer_skill".to_string(),
            reason: e.to_string(),
        })?;

        progress.send_update("Outline complete.").await?;

        let artifact =
            Artifact::from_json("outline.json", &result).map_err(|e| AgentError::Internal {
                component: "organizer_skill".to_string(),
                reason: format!("Failed to create artifact: {}", e),
            })?;

        Ok(OnRequestResult::Completed {
            message: Some(Content::from_text(&format!(
                "Outline with {} sections",
                result.sections.len()
            ))),
            artifacts: vec![artifact],
        })
    }
}

const SYSTEM_PROMPT: &str = include_str!("defaults/organizer.md");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_outline() {
        let outline = OutlineOutput {
            sections: vec![OutlineSection {
                heading: "Why Rust".to_string(),
                points: vec!["safety".to_string(), "speed".to_string()],
            }],
        };
        let text = outline.rendered();
        assert!(text.contains("## Why Rust"));
        assert!(text.contains("- safety"));
    }
}
