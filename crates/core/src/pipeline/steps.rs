//! # Pipeline Steps
//!
//! The declarative step table: an ordered list of (role, instruction
//! template, expected output shape). Adding or removing a step is an
//! edit here, not a change to the executor. Only the first step's
//! instruction interpolates the caller's title and prompts.

use serde::{Deserialize, Serialize};

use super::stages::PipelineStage;

/// A worker role in the crew
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Researcher,
    Curator,
    Organizer,
    Writer,
    Editor,
}

impl Role {
    /// Stable identifier used for per-role config overrides and events
    pub fn id(&self) -> &'static str {
        match self {
            Self::Researcher => "researcher",
            Self::Curator => "curator",
            Self::Organizer => "organizer",
            Self::Writer => "writer",
            Self::Editor => "editor",
        }
    }

    /// Human-readable role title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Researcher => "Research Specialist",
            Self::Curator => "Image Curator",
            Self::Organizer => "Content Organizer",
            Self::Writer => "Content Writer",
            Self::Editor => "Content Editor",
        }
    }

    /// The pipeline stage this role runs in
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Researcher => PipelineStage::Research,
            Self::Curator => PipelineStage::Curation,
            Self::Organizer => PipelineStage::Organization,
            Self::Writer => PipelineStage::Writing,
            Self::Editor => PipelineStage::Editing,
        }
    }
}

/// One ordered unit of pipeline work
#[derive(Debug, Clone)]
pub struct StepSpec {
    /// Role assigned to this step
    pub role: Role,
    /// Instruction template; `{title}` and `{prompts}` are substituted
    pub instruction: &'static str,
    /// Free-text description of the expected output shape
    pub expected_output: &'static str,
}

impl StepSpec {
    /// Interpolate the caller's title and prompts into the instruction
    pub fn instruction_for(&self, title: &str, prompts: &str) -> String {
        let body = self
            .instruction
            .replace("{title}", title)
            .replace("{prompts}", prompts);
        format!("{}\n\nExpected output: {}", body, self.expected_output)
    }
}

const RESEARCH_STEP: StepSpec = StepSpec {
    role: Role::Researcher,
    instruction: "Research thoroughly about {title}.\n\
        Consider these aspects: {prompts}\n\
        Find relevant articles, studies, and expert opinions.\n\
        Use the search and scrape tools to gather comprehensive information.",
    expected_output: "A comprehensive research summary including key findings \
        from multiple sources, relevant statistics and data, expert opinions \
        and quotes, and current trends and developments.",
};

const CURATION_STEP: StepSpec = StepSpec {
    role: Role::Curator,
    instruction: "Curate visual assets for the post based on the research.\n\
        Request diagrams where a concept benefits from one, and find or \
        describe images for the rest.\n\
        Return structured visual asset descriptors.",
    expected_output: "A list of visual asset descriptors, each with a kind tag, \
        an exact Markdown fragment, a description, and a placement hint.",
};

const ORGANIZATION_STEP: StepSpec = StepSpec {
    role: Role::Organizer,
    instruction: "Create a structured outline based on the research findings.\n\
        Organize information logically and ensure good flow between sections.\n\
        Prioritize the most relevant and engaging content, and note where \
        each curated visual asset fits.",
    expected_output: "A detailed blog outline including main sections with \
        headings, key points for each section, supporting information and \
        examples, and logical flow and progression.",
};

const WRITING_STEP: StepSpec = StepSpec {
    role: Role::Writer,
    instruction: "Write a comprehensive blog post in markdown format using the outline.\n\
        Include proper headings, lists, and emphasis where appropriate.\n\
        Embed each curated visual asset's Markdown fragment verbatim at its placement.\n\
        Add relevant quotes and citations from the research.\n\
        Close with an `## Image Credits` section.",
    expected_output: "A complete blog post in markdown format with clear headings \
        and subheadings, well-structured paragraphs, proper formatting, citations \
        and references, an engaging introduction and conclusion, and an Image \
        Credits section.",
};

const EDITING_STEP: StepSpec = StepSpec {
    role: Role::Editor,
    instruction: "Review and polish the blog post.\n\
        Ensure proper markdown formatting.\n\
        Check for clarity, consistency, and flow.\n\
        Verify all citations and references.\n\
        Keep embedded visuals and the Image Credits section intact.",
    expected_output: "A polished final draft with corrected grammar and spelling, \
        consistent formatting, improved flow and readability, and verified \
        citations and links.",
};

/// The fixed ordered step list.
///
/// The editor step is config-gated; everything else always runs.
pub fn default_steps(include_editor: bool) -> Vec<StepSpec> {
    let mut steps = vec![
        RESEARCH_STEP,
        CURATION_STEP,
        ORGANIZATION_STEP,
        WRITING_STEP,
    ];
    if include_editor {
        steps.push(EDITING_STEP);
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_steps_order() {
        let steps = default_steps(true);
        let roles: Vec<Role> = steps.iter().map(|s| s.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::Researcher,
                Role::Curator,
                Role::Organizer,
                Role::Writer,
                Role::Editor
            ]
        );
    }

    #[test]
    fn test_editor_step_is_config_gated() {
        let steps = default_steps(false);
        assert_eq!(steps.len(), 4);
        assert!(steps.iter().all(|s| s.role != Role::Editor));
    }

    #[test]
    fn test_only_first_step_interpolates() {
        let steps = default_steps(true);
        let first = steps[0].instruction_for("Rust in 2026", "adoption, tooling");
        assert!(first.contains("Rust in 2026"));
        assert!(first.contains("adoption, tooling"));

        // Later templates carry no placeholders to substitute.
        for step in &steps[1..] {
            assert!(!step.instruction.contains("{title}"));
            assert!(!step.instruction.contains("{prompts}"));
        }
    }

    #[test]
    fn test_instruction_includes_expected_output() {
        let text = RESEARCH_STEP.instruction_for("T", "P");
        assert!(text.contains("Expected output:"));
    }
}
