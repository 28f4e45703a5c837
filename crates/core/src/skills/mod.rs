//! # Blogsmith Skills
//!
//! A2A-native worker roles and the tools they share.
//!
//! ## Architecture
//!
//! ```text
//! Agent (A2A server)
//!   └── Skills (#[skill] + SkillHandler)
//!         └── Tools (#[tool] functions)
//! ```
//!
//! ## The crew
//!
//! Pipeline order, each role consuming the previous role's output:
//! - `ResearcherSkill` - Gather material about the topic
//! - `CuratorSkill` - Select images and diagram skeletons
//! - `OrganizerSkill` - Structure findings into an outline
//! - `WriterSkill` - Draft the post in Markdown
//! - `EditorSkill` - Polish the final draft (optional stage)
//!
//! All roles are bound to the same three read-only tools: web search,
//! page scraping, and diagram synthesis.

pub mod llm_helpers;
pub mod prompts;
pub mod tools;

// Worker roles
pub mod curator_skill;
pub mod editor_skill;
pub mod organizer_skill;
pub mod researcher_skill;
pub mod writer_skill;

// Agent Definitions (compose skills into agents)
pub mod agent_definitions;

// Re-exports for convenience
pub use curator_skill::{CurationOutput, CuratorSkill, VisualAsset, VisualAssetKind};
pub use editor_skill::{EditedOutput, EditorSkill};
pub use organizer_skill::{OrganizerSkill, OutlineOutput};
pub use researcher_skill::{ResearchOutput, ResearcherSkill};
pub use writer_skill::{DraftOutput, WriterSkill};

// Agent factory functions
pub use agent_definitions::{
    create_crew, curator_agent, editor_agent, organizer_agent, researcher_agent, writer_agent,
};
