//! # Pipeline Stages
//!
//! The stages of the blog generation pipeline. The sequence is static;
//! there is no branching and no retry.

use serde::{Deserialize, Serialize};

/// Stage of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Researcher is gathering material
    Research,
    /// Curator is selecting visual assets
    Curation,
    /// Organizer is building the outline
    Organization,
    /// Writer is drafting the post
    Writing,
    /// Editor is polishing the draft
    Editing,
    /// Complete
    Complete,
    /// Failed
    Failed,
}

impl PipelineStage {
    /// Advance to the next stage
    pub fn advance(self) -> Self {
        match self {
            Self::Research => Self::Curation,
            Self::Curation => Self::Organization,
            Self::Organization => Self::Writing,
            Self::Writing => Self::Editing,
            Self::Editing => Self::Complete,
            Self::Complete => Self::Complete,
            Self::Failed => Self::Failed,
        }
    }

    /// Stable label for status reporting
    pub fn label(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Curation => "curation",
            Self::Organization => "organization",
            Self::Writing => "writing",
            Self::Editing => "editing",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }

    /// Whether the pipeline reached a terminal stage
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_advance_is_linear() {
        let mut stage = PipelineStage::Research;
        let expected = [
            PipelineStage::Curation,
            PipelineStage::Organization,
            PipelineStage::Writing,
            PipelineStage::Editing,
            PipelineStage::Complete,
            PipelineStage::Complete,
        ];
        for want in expected {
            stage = stage.advance();
            assert_eq!(stage, want);
        }
    }

    #[test]
    fn test_failed_is_absorbing() {
        assert_eq!(PipelineStage::Failed.advance(), PipelineStage::Failed);
        assert!(PipelineStage::Failed.is_terminal());
    }
}
