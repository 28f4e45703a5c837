//! Default role prompts bundled at compile time.
//!
//! These are used for seeding the database on first run.
//! At runtime, prompts are loaded from the database to allow customization.

/// Research Specialist - gathers information about the topic
pub const RESEARCHER: &str = include_str!("defaults/researcher.md");

/// Image Curator - selects images and diagrams for the post
pub const CURATOR: &str = include_str!("defaults/curator.md");

/// Content Organizer - structures research into an outline
pub const ORGANIZER: &str = include_str!("defaults/organizer.md");

/// Content Writer - drafts the post in Markdown
pub const WRITER: &str = include_str!("defaults/writer.md");

/// Content Editor - polishes the final draft
pub const EDITOR: &str = include_str!("defaults/editor.md");

/// All default prompts with their slugs for seeding
pub fn all_defaults() -> Vec<(&'static str, &'static str)> {
    vec![
        ("researcher", RESEARCHER),
        ("curator", CURATOR),
        ("organizer", ORGANIZER),
        ("writer", WRITER),
        ("editor", EDITOR),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_prompts_non_empty() {
        for (slug, content) in all_defaults() {
            assert!(!content.is_empty(), "Prompt '{}' should not be empty", slug);
            assert!(content.len() > 50, "Prompt '{}' seems too short", slug);
        }
    }

    #[test]
    fn test_prompt_count() {
        assert_eq!(all_defaults().len(), 5, "Should have 5 default prompts");
    }
}
