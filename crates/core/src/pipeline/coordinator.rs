//! # Pipeline Coordinator
//!
//! Walks the fixed step table from research to final Markdown. Each
//! step's text output joins a running transcript that forms the next
//! step's input; there is no parallelism between steps, no branching,
//! and no retry. Any step failure surfaces as a single failure at the
//! run boundary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::mpsc;

use crate::models::{LlmProvider, ModelConfig};
use crate::skills::curator_skill::render_assets;
use crate::skills::{CuratorSkill, EditorSkill, OrganizerSkill, ResearcherSkill, WriterSkill};

use super::events::{PipelineEvent, PipelineEventKind};
use super::stages::PipelineStage;
use super::steps::{default_steps, Role};

/// The heading the final document is guaranteed to contain
pub const IMAGE_CREDITS_HEADING: &str = "## Image Credits";

/// Default model for the curator when nothing else is configured.
/// Curation is selection work; a cheaper model is enough.
const DEFAULT_CURATOR_MODEL: &str = "claude-3-5-haiku-20241022";

/// Configuration for the coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Global LLM provider (default: Anthropic)
    #[serde(default)]
    pub global_provider: LlmProvider,
    /// Global model to use for all roles
    pub global_model: Option<String>,
    /// Base URL override for LLM API (for OpenAI-compatible endpoints)
    pub base_url: Option<String>,
    /// Per-role model overrides (role id -> model name)
    #[serde(default)]
    pub per_role_models: HashMap<String, String>,
    /// Per-role provider overrides (role id -> provider)
    #[serde(default)]
    pub per_role_providers: HashMap<String, LlmProvider>,
    /// Model for the Image Curator (cheaper model for selection work)
    pub curator_model: Option<String>,
    /// Whether the editor step runs
    pub include_editor: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            global_provider: LlmProvider::Anthropic,
            global_model: None,
            base_url: None,
            per_role_models: HashMap::new(),
            per_role_providers: HashMap::new(),
            curator_model: None,
            include_editor: true,
        }
    }
}

/// The pipeline coordinator
pub struct Coordinator {
    config: PipelineConfig,
    stage: PipelineStage,
    events: Vec<PipelineEvent>,
    event_tx: Option<mpsc::Sender<PipelineEvent>>,
}

impl Coordinator {
    /// Create a new coordinator
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            stage: PipelineStage::Research,
            events: Vec::new(),
            event_tx: None,
        }
    }

    /// Set event channel for streaming progress
    pub fn with_event_channel(mut self, tx: mpsc::Sender<PipelineEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Current stage, for status reporting
    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Events recorded so far
    pub fn events(&self) -> &[PipelineEvent] {
        &self.events
    }

    /// Get model config for a specific role
    fn get_model_config(&self, role_id: &str) -> ModelConfig {
        let provider = self
            .config
            .per_role_providers
            .get(role_id)
            .cloned()
            .unwrap_or_else(|| self.config.global_provider.clone());

        let model = self
            .config
            .per_role_models
            .get(role_id)
            .cloned()
            .or_else(|| {
                if role_id == Role::Curator.id() {
                    self.config.curator_model.clone()
                } else {
                    None
                }
            })
            .or_else(|| self.config.global_model.clone())
            .unwrap_or_else(|| {
                if role_id == Role::Curator.id() && provider == LlmProvider::Anthropic {
                    DEFAULT_CURATOR_MODEL.to_string()
                } else {
                    provider.default_model().to_string()
                }
            });

        let base_url = if provider.supports_base_url() {
            self.config.base_url.clone()
        } else {
            None
        };

        ModelConfig {
            provider,
            model,
            base_url,
        }
    }

    /// Emit an event
    async fn emit(&mut self, event: PipelineEvent) {
        self.events.push(event.clone());
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event).await;
        }
    }

    /// Run the pipeline for a title and topic brief.
    ///
    /// Returns the final Markdown document. The caller is expected to
    /// have validated that title and prompts are non-empty.
    #[tracing::instrument(skip(self, prompts), fields(title = %title))]
    pub async fn run(&mut self, title: &str, prompts: &str) -> Result<String> {
        self.emit(PipelineEvent::new(
            PipelineEventKind::PipelineStarted,
            "coordinator",
        ))
        .await;

        match self.execute_steps(title, prompts).await {
            Ok(markdown) => {
                self.stage = PipelineStage::Complete;
                self.emit(PipelineEvent::new(
                    PipelineEventKind::PipelineCompleted,
                    "coordinator",
                ))
                .await;
                Ok(markdown)
            }
            Err(e) => {
                self.stage = PipelineStage::Failed;
                self.emit(
                    PipelineEvent::new(PipelineEventKind::PipelineFailed, "coordinator")
                        .with_data(serde_json::json!({ "error": format!("{:#}", e) })),
                )
                .await;
                Err(e)
            }
        }
    }

    async fn execute_steps(&mut self, title: &str, prompts: &str) -> Result<String> {
        let steps = default_steps(self.config.include_editor);
        let mut transcript = String::new();
        let mut latest = String::new();

        for step in &steps {
            self.stage = step.role.stage();
            self.emit(PipelineEvent::new(
                PipelineEventKind::StepStarted,
                step.role.id(),
            ))
            .await;

            let instruction = step.instruction_for(title, prompts);
            let input = if transcript.is_empty() {
                instruction
            } else {
                format!(
                    "{}\n\n---\n\nMaterial from previous steps:\n{}",
                    instruction, transcript
                )
            };

            let config = self.get_model_config(step.role.id());
            let output = match self.run_role(step.role, &input, &config).await {
                Ok(text) => text,
                Err(e) => {
                    self.emit(
                        PipelineEvent::new(PipelineEventKind::StepFailed, step.role.id())
                            .with_data(serde_json::json!({ "error": e.to_string() })),
                    )
                    .await;
                    return Err(e).with_context(|| format!("{} failed", step.role.title()));
                }
            };

            transcript.push_str(&format!(
                "\n\n# Output of {}\n\n{}",
                step.role.title(),
                output
            ));
            latest = output;

            self.emit(PipelineEvent::new(
                PipelineEventKind::StepCompleted,
                step.role.id(),
            ))
            .await;
        }

        Ok(ensure_image_credits(&latest))
    }

    /// Run one role over its input and render the output as text.
    ///
    /// The curator's typed asset list is validated here, at the
    /// boundary between curation and writing; invalid descriptors are
    /// dropped rather than passed on.
    async fn run_role(&self, role: Role, input: &str, config: &ModelConfig) -> Result<String> {
        match role {
            Role::Researcher => Ok(ResearcherSkill::run(input, config).await?.rendered()),
            Role::Curator => {
                let output = CuratorSkill::run(input, config).await?;
                let (assets, dropped) = output.validated();
                if dropped > 0 {
                    tracing::warn!(dropped, "dropped invalid visual asset descriptors");
                }
                Ok(render_assets(&assets))
            }
            Role::Organizer => Ok(OrganizerSkill::run(input, config).await?.rendered()),
            Role::Writer => Ok(WriterSkill::run(input, config).await?.markdown),
            Role::Editor => Ok(EditorSkill::run(input, config).await?.markdown),
        }
    }
}

/// Guarantee the final document carries an Image Credits section.
pub fn ensure_image_credits(markdown: &str) -> String {
    if markdown.contains(IMAGE_CREDITS_HEADING) {
        markdown.to_string()
    } else {
        format!("{}\n\n{}\n", markdown.trim_end(), IMAGE_CREDITS_HEADING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_image_credits_appends_when_missing() {
        let output = ensure_image_credits("# Post\n\nBody text.");
        assert!(output.contains(IMAGE_CREDITS_HEADING));
        assert!(output.ends_with("## Image Credits\n"));
    }

    #[test]
    fn test_ensure_image_credits_keeps_existing() {
        let input = "# Post\n\n## Image Credits\n- photo by x\n";
        let output = ensure_image_credits(input);
        assert_eq!(output, input);
        assert_eq!(output.matches(IMAGE_CREDITS_HEADING).count(), 1);
    }

    #[test]
    fn test_default_config_includes_editor() {
        assert!(PipelineConfig::default().include_editor);
    }

    #[test]
    fn test_get_model_config_global_override() {
        let config = PipelineConfig {
            global_model: Some("gpt-4o".to_string()),
            global_provider: LlmProvider::OpenAI,
            ..PipelineConfig::default()
        };
        let coordinator = Coordinator::new(config);
        let mc = coordinator.get_model_config("writer");
        assert_eq!(mc.provider, LlmProvider::OpenAI);
        assert_eq!(mc.model, "gpt-4o");
    }

    #[test]
    fn test_get_model_config_per_role_override_wins() {
        let mut per_role = HashMap::new();
        per_role.insert("editor".to_string(), "claude-opus-4-20250514".to_string());
        let config = PipelineConfig {
            global_model: Some("claude-sonnet-4-20250514".to_string()),
            per_role_models: per_role,
            ..PipelineConfig::default()
        };
        let coordinator = Coordinator::new(config);
        assert_eq!(
            coordinator.get_model_config("editor").model,
            "claude-opus-4-20250514"
        );
        assert_eq!(
            coordinator.get_model_config("writer").model,
            "claude-sonnet-4-20250514"
        );
    }

    #[test]
    fn test_curator_defaults_to_cheap_model() {
        let coordinator = Coordinator::new(PipelineConfig::default());
        assert_eq!(
            coordinator.get_model_config("curator").model,
            DEFAULT_CURATOR_MODEL
        );
        assert_ne!(
            coordinator.get_model_config("writer").model,
            DEFAULT_CURATOR_MODEL
        );
    }

    #[test]
    fn test_base_url_only_for_supporting_providers() {
        let config = PipelineConfig {
            base_url: Some("http://localhost:4000/v1".to_string()),
            ..PipelineConfig::default()
        };
        let coordinator = Coordinator::new(config);
        // Anthropic does not take a base URL override.
        assert!(coordinator.get_model_config("writer").base_url.is_none());
    }
}
