//! # A2A Agent Definitions
//!
//! Composes the blog crew from skills using radkit's Agent::builder().
//! Each role can run as an A2A server exposing its skill; the server
//! also uses this roster to build its agent discovery card.

use crate::models::ModelConfig;
use radkit::agent::{Agent, AgentDefinition};

use crate::skills::{CuratorSkill, EditorSkill, OrganizerSkill, ResearcherSkill, WriterSkill};

/// The Researcher Agent
///
/// First role in the crew. Gathers material about the topic.
pub fn researcher_agent(config: ModelConfig) -> AgentDefinition {
    Agent::builder()
        .with_name("Research Specialist")
        .with_description(
            "Gathers comprehensive information about the blog topic from \
             multiple sources using web search and page scraping.",
        )
        .with_skill(ResearcherSkill::new(config))
        .build()
}

/// The Image Curator Agent
///
/// Second role. Selects images and diagram skeletons for the post.
pub fn curator_agent(config: ModelConfig) -> AgentDefinition {
    Agent::builder()
        .with_name("Image Curator")
        .with_description(
            "Selects visual assets for the post and returns structured \
             descriptors the writer embeds verbatim.",
        )
        .with_skill(CuratorSkill::new(config))
        .build()
}

/// The Content Organizer Agent
///
/// Third role. Structures research into an outline.
pub fn organizer_agent(config: ModelConfig) -> AgentDefinition {
    Agent::builder()
        .with_name("Content Organizer")
        .with_description(
            "Organizes research findings into a clear, logical outline \
             with asset placements.",
        )
        .with_skill(OrganizerSkill::new(config))
        .build()
}

/// The Content Writer Agent
///
/// Fourth role. Drafts the complete post in Markdown.
pub fn writer_agent(config: ModelConfig) -> AgentDefinition {
    Agent::builder()
        .with_name("Content Writer")
        .with_description(
            "Writes an engaging blog post in Markdown from the outline, \
             embedding curated visuals and closing with image credits.",
        )
        .with_skill(WriterSkill::new(config))
        .build()
}

/// The Content Editor Agent
///
/// Optional fifth role. Polishes the final draft.
pub fn editor_agent(config: ModelConfig) -> AgentDefinition {
    Agent::builder()
        .with_name("Content Editor")
        .with_description(
            "Polishes the drafted post for clarity, consistency and \
             correct Markdown formatting.",
        )
        .with_skill(EditorSkill::new(config))
        .build()
}

/// Create the full blog crew (all roles, pipeline order)
pub fn create_crew(config: ModelConfig) -> Vec<AgentDefinition> {
    vec![
        researcher_agent(config.clone()),
        curator_agent(config.clone()),
        organizer_agent(config.clone()),
        writer_agent(config.clone()),
        editor_agent(config),
    ]
}
