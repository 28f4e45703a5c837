//! # Pipeline
//!
//! The fixed blog generation pipeline: a declarative step table, a
//! sequential coordinator that walks it, and the events it emits.

pub mod coordinator;
pub mod events;
pub mod stages;
pub mod steps;

pub use coordinator::{ensure_image_credits, Coordinator, PipelineConfig, IMAGE_CREDITS_HEADING};
pub use events::{PipelineEvent, PipelineEventKind};
pub use stages::PipelineStage;
pub use steps::{default_steps, Role, StepSpec};
