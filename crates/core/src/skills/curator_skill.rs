//! # Curator Skill
//!
//! A2A-native skill that selects the visual assets for a post:
//! external images found via search, described images to generate,
//! and diagram skeletons from the diagram tool.
//!
//! The asset list is the one typed contract between pipeline steps,
//! so it is validated at this boundary instead of trusting free-text
//! compliance from the model.

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

/// What kind of visual an asset descriptor refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, LLMOutput)]
#[serde(rename_all = "snake_case")]
pub enum VisualAssetKind {
    ExternalImage,
    GeneratedImage,
    Diagram,
}

/// A single visual asset descriptor
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct VisualAsset {
    /// Kind tag
    pub kind: VisualAssetKind,
    /// Exact Markdown fragment to embed (image reference or fenced mermaid block)
    pub markdown: String,
    /// What the asset shows and why it belongs in the post
    pub description: String,
    /// Placement hint for the writer
    pub placement: String,
}

impl VisualAsset {
    /// Whether the descriptor is usable by the writer.
    ///
    /// An asset needs a non-empty fragment, and the fragment has to
    /// match its kind tag: images embed with `![`, diagrams with a
    /// fenced mermaid block.
    pub fn is_valid(&self) -> bool {
        let fragment = self.markdown.trim();
        if fragment.is_empty() || self.description.trim().is_empty() {
            return false;
        }
        match self.kind {
            VisualAssetKind::ExternalImage | VisualAssetKind::GeneratedImage => {
                fragment.contains("![")
            }
            VisualAssetKind::Diagram => fragment.starts_with("```mermaid"),
        }
    }
}

/// Output from the curator skill
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct CurationOutput {
    /// Curated visual asset descriptors
    pub assets: Vec<VisualAsset>,
}

impl CurationOutput {
    /// Split the assets into usable descriptors and a dropped count.
    pub fn validated(self) -> (Vec<VisualAsset>, usize) {
        let total = self.assets.len();
        let kept: Vec<VisualAsset> = self.assets.into_iter().filter(|a| a.is_valid()).collect();
        let dropped = total - kept.len();
        (kept, dropped)
    }
}

/// Render validated assets as text for the next pipeline step
pub fn render_assets(assets: &[VisualAsset]) -> String {
    if assets.is_empty() {
        return "# Curated Visual Assets\n\n(none)\n".to_string();
    }
    let mut out = String::from("# Curated Visual Assets\n");
    for (i, asset) in assets.iter().enumerate() {
        out.push_str(&format!(
            "\n## Asset {} ({:?})\n\nPlacement: {}\n\n{}\n\n{}\n",
            i + 1,
            asset.kind,
            asset.placement,
            asset.description,
            asset.markdown,
        ));
    }
    out
}

/// Curator skill for visual asset selection
#[skill(
    id = "curate",
    name = "Image Curator",
    description = "Selects images and diagram skeletons for a blog post and returns structured visual asset descriptors.",
    tags = ["images", "diagrams", "blog"],
    examples = ["Curate visuals for a post on RetNet", "Pick diagrams for an architecture article"],
    input_modes = ["text/plain", "application/json"],
    output_modes = ["application/json"]
)]
pub struct CuratorSkill {
    config: ModelConfig,
}

impl CuratorSkill {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn with_model(model: &str) -> Self {
        Self::new(ModelConfig::new(model))
    }

    /// Uses a cheaper model by default; curation is selection, not prose
    pub fn default() -> Self {
        Self::new(ModelConfig::new("claude-3-5-haiku-20241022"))
    }

    /// SDK-style call for direct Coordinator integration.
    pub async fn run(instruction: &str, config: &ModelConfig) -> anyhow::Result<CurationOutput> {
        run_llm_worker!(
            config,
            CurationOutput,
            SYSTEM_PROMPT,
            instruction,
            search_tools::search_web,
            scrape_tools::scrape_page,
            diagram_tools::make_diagram,
        )
    }
}

#[async_trait]
impl SkillHandler for CuratorSkill {
    async fn on_request(
        &self,
        _state: &mut State,
        progress: &ProgressSender,
        _runtime: &dyn AgentRuntime,
        content: Content,
    ) -> AgentResult<OnRequestResult> {
        let instruction = content.first_text().unwrap_or_default();

        progress.send_update("Curating visual assets...").await?;

        let result = run_llm_worker!(
            &self.config,
            CurationOutput,
            SYSTEM_PROMPT,
            instruction,
            search_tools::search_web,
            scrape_tools::scrape_page,
            diagram_tools::make_diagram,
        )
        .map_err(|e| AgentError::Internal {
            component: "curator_skill".to_string(),
            reason: e.to_string(),
        })?;

        progress.send_update("Curation complete.").await?;

        let artifact =
            Artifact::from_json("assets.json", &result).map_err(|e| AgentError::Internal {
                component: "curator_skill".to_string(),
                reason: format!("Failed to create artifact: {}", e),
            })?;

        Ok(OnRequestResult::Completed {
            message: Some(Content::from_text(&format!(
                "{} visual assets curated",
                result.assets.len()
            ))),
            artifacts: vec![artifact],
        })
    }
}

const SYSTEM_PROMPT: &str = include_str!("defaults/curator.md");

#[cfg(test)]
mod tests {
    use super::*;

    fn diagram_asset() -> VisualAsset {
        VisualAsset {
            kind: VisualAssetKind::Diagram,
            markdown: "```mermaid\ngraph TD\n    A --> B\n```".to_string(),
            description: "Request flow".to_string(),
            placement: "after the intro".to_string(),
        }
    }

    #[test]
    fn test_valid_diagram_asset() {
        assert!(diagram_asset().is_valid());
    }

    #[test]
    fn test_kind_mismatch_is_invalid() {
        let mut asset = diagram_asset();
        asset.kind = VisualAssetKind::ExternalImage;
        assert!(!asset.is_valid());
    }

    #[test]
    fn test_empty_fragment_is_invalid() {
        let mut asset = diagram_asset();
        asset.markdown = "   ".to_string();
        assert!(!asset.is_valid());
    }

    #[test]
    fn test_validated_drops_bad_assets() {
        let output = CurationOutput {
            assets: vec![
                diagram_asset(),
                VisualAsset {
                    kind: VisualAssetKind::ExternalImage,
                    markdown: "not an image".to_string(),
                    description: "broken".to_string(),
                    placement: "anywhere".to_string(),
                },
            ],
        };
        let (kept, dropped) = output.validated();
        assert_eq!(kept.len(), 1);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_render_assets_includes_fragment() {
        let text = render_assets(&[diagram_asset()]);
        assert!(text.contains("```mermaid"));
        assert!(text.contains("after the intro"));
    }

    #[test]
    fn test_render_assets_empty() {
        assert!(render_assets(&[]).contains("(none)"));
    }
}
