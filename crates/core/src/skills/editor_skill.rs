//! # Editor Skill
//!
//! A2A-native skill that polishes the drafted post. Optional last
//! stage of the pipeline.

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

/// Output from the editor skill
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct EditedOutput {
    /// The polished final post in Markdown
    pub markdown: String,
}

/// Editor skill for final polish
#[skill(
    id = "edit",
    name = "Content Editor",
    description = "Polishes a drafted blog post: grammar, consistency, flow, and Markdown formatting.",
    tags = ["editing", "markdown", "blog"],
    examples = ["Polish this draft"],
    input_modes = ["text/plain", "application/json"],
    output_modes = ["application/json"]
)]
pub struct EditorSkill {
    config: ModelConfig,
}

impl EditorSkill {
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
    pub async fn run(instruction: &str, config: &ModelConfig) -> anyhow::Result<EditedOutput> {
        run_llm_worker!(
            config,
            EditedOutput,
            SYSTEM_PROMPT,
            instruction,
            search_tools::search_web,
            scrape_tools::scrape_page,
            diagram_tools::make_diagram,
        )
    }
}

#[async_trait]
impl SkillHandler for EditorSkill {
    async fn on_request(
        &self,
        _state: &mut State,
        progress: &ProgressSender,
        _runtime: &dyn AgentRuntime,
        content: Content,
    ) -> AgentResult<OnRequestResult> {
        let instruction = content.first_text().unwrap_or_default();

        progress.send_update("Polishing the draft...").await?;

        let result = run_llm_worker!(
            &self.config,
            EditedOutput,
            SYSTEM_PROMPT,
            instruction,
            search_tools::search_web,
            scrape_tools::scrape_page,
            diagram_tools::make_diagram,
        )
        .map_err(|e| AgentError::Internal {
            component: "editor_skill".to_string(),
            reason: e.to_string(),
        })?;

        progress.send_update("Edit complete.").await?;

        Ok(OnRequestResult::Completed {
            message: Some(Content::from_text(&result.markdown)),
            artifacts: vec![],
        })
    }
}

const SYSTEM_PROMPT: &str = include_str!("defaults/editor.md");
