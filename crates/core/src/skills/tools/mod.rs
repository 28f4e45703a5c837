//! # Shared Tools
//!
//! The three tool capabilities shared by every worker role:
//! web search, page scraping, and diagram synthesis. The same tool
//! functions are bound to each role at construction time; they hold
//! no mutable state.

pub mod diagram_tools;
pub mod scrape_tools;
pub mod search_tools;
