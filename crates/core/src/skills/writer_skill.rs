//! # Writer Skill
//!
//! A2A-native skill that drafts the full post in Markdown from the
//! outline, research, and curated assets.

use crate::models::ModelConfig;
use crate::run_llm_worker;
use crate::skills::tools::{diagram_tools, scrape_tools, search_tools};
use async_trait::async_trait;
use radkit::agent::{OnRequestResult, SkillHandler};
use radkit::errors::{AgentError, AgentResult};
use radkit::macros::{skill, LLMOutput};
use radkit::models::Content;
use radkit::runtime::context::{ProgressSender, State};
use radkit::runtime::AgentRuntime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output from the writer skill
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct DraftOutput {
    /// The complete drafted post in Markdown
    pub markdown: String,
}

/// Writer skill for drafting the post
#[skill(
    id = "write",
    name = "Content Writer",
    description = "Writes a complete blog post in Markdown from an outline, embedding curated visual assets verbatim.",
    tags = ["writing", "markdown", "blog"],
    examples = ["Write the post from this outline"],
    input_modes = ["text/plain", "application/json"],
    output_modes = ["application/json"]
)]
pub struct WriterSkill {
    config: ModelConfig,
}

impl WriterSkill {
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
    pub async fn run(instruction: &str, config: &ModelConfig) -> anyhow::Result<DraftOutput> {
        run_llm_worker!(
            config,
            DraftOutput,
            SYSTEM_PROMPT,
            instruction,
            search_tools::search_web,
            scrape_tools::scrape_page,
            diagram_tools::make_diagram,
        )
    }
}

#[async_trait]
impl SkillHandler for WriterSkill {
    async fn on_request(
        &self,
        _state: &mut State,
        progress: &ProgressSender,
        _runtime: &dyn AgentRuntime,
        content: Content,
    ) -> AgentResult<OnRequestResult> {
        let instruction = content.first_text().unwrap_or_default();

        progress.send_update("Drafting the post...").await?;

        let result = run_llm_worker!(
            &self.config,
            DraftOutput,
            SYSTEM_PROMPT,
            instruction,
            search_tools::search_web,
            scrape_tools::scrape_page,
            diagram_tools::make_diagram,
        )
        .map_err(|e| AgentError::Internal {
            component: "writer_skill".to_string(),
            reason: e.to_string(),
        })?;

        progress.send_update("Draft complete.").await?;

        Ok(OnRequestResult::Completed {
            message: Some(Content::from_text(&result.markdown)),
            artifacts: vec![],
        })
    }
}

const SYSTEM_PROMPT: &str = include_str!("defaults/writer.md");
