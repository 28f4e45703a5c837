//! # Blogsmith Core
//!
//! The "Brain" of the Blogsmith system - contains all business logic,
//! skill implementations, rendering, and state management.
//!
//! ## Architecture
//!
//! - `skills/` - A2A-native worker roles (ResearcherSkill, CuratorSkill, etc.)
//! - `models/` - Centralized LLM provider configuration
//! - `pipeline/` - The fixed step table and the coordinator that walks it
//! - `render/` - Markdown to styled HTML and PDF output
//! - `state/` - SQLite persistence for blog posts and prompt templates
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blogsmith_core::pipeline::{Coordinator, PipelineConfig};
//!
//! let mut coordinator = Coordinator::new(PipelineConfig::default());
//! let markdown = coordinator.run("Rust in 2026", "adoption, tooling, async").await?;
//! ```

pub mod models;
pub mod pipeline;
pub mod render;
pub mod skills;
pub mod state;
