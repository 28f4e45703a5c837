//! # Blog Post State
//!
//! Post storage using SQLite. Each generated post is a row in the
//! `posts` table, created only after generation fully succeeds and
//! never updated in place.

use super::db::BlogDb;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// A generated blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    /// Unique post identifier
    pub id: String,
    /// Post title
    pub title: String,
    /// The caller's free-text topic brief
    pub prompts: String,
    /// The pipeline's final Markdown output
    pub generated_content: String,
    /// Duplicate of `generated_content` (observed schema)
    pub markdown_content: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Manager for post storage in SQLite
pub struct PostManager {
    conn: Arc<Mutex<rusqlite::Connection>>,
}

impl PostManager {
    /// Create a new PostManager from a BlogDb
    pub fn new(db: &BlogDb) -> Self {
        Self {
            conn: db.connection(),
        }
    }

    /// Create a post record for a completed generation run
    pub fn create(&self, title: &str, prompts: &str, generated_content: &str) -> Result<BlogPost> {
        let id = generate_post_id();
        let now = Utc::now();

        let post = BlogPost {
            id: id.clone(),
            title: title.to_string(),
            prompts: prompts.to_string(),
            generated_content: generated_content.to_string(),
            markdown_content: generated_content.to_string(),
            created_at: now,
            updated_at: now,
        };

        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO posts (id, title, prompts, generated_content, markdown_content, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                post.id,
                post.title,
                post.prompts,
                post.generated_content,
                post.markdown_content,
                post.created_at.to_rfc3339(),
                post.updated_at.to_rfc3339(),
            ],
        )
        .context("Failed to create post")?;

        Ok(post)
    }

    /// Load a post by ID
    pub fn load(&self, id: &str) -> Result<BlogPost> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let post = conn
            .query_row(
                r#"
            SELECT id, title, prompts, generated_content, markdown_content, created_at, updated_at
            FROM posts WHERE id = ?1
            "#,
                params![id],
                |row| Ok(Self::row_to_post(row)?),
            )
            .context("Post not found")?;

        Ok(post)
    }

    /// List all posts, newest first
    pub fn list_all(&self) -> Result<Vec<BlogPost>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, title, prompts, generated_content, markdown_content, created_at, updated_at
            FROM posts
            ORDER BY created_at DESC
            "#,
        )?;

        let posts = stmt
            .query_map([], |row| Ok(Self::row_to_post(row)?))?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to list posts")?;

        Ok(posts)
    }

    /// Delete a post
    pub fn delete(&self, id: &str) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        conn.execute("DELETE FROM posts WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn row_to_post(row: &rusqlite::Row) -> rusqlite::Result<BlogPost> {
        let id: String = row.get(0)?;
        let title: String = row.get(1)?;
        let prompts: String = row.get(2)?;
        let generated_content: String = row.get(3)?;
        let markdown_content: String = row.get(4)?;
        let created_at_str: String = row.get(5)?;
        let updated_at_str: String = row.get(6)?;

        Ok(BlogPost {
            id,
            title,
            prompts,
            generated_content,
            markdown_content,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

/// Generate a unique post ID (timestamp-based)
fn generate_post_id() -> String {
    let now = Utc::now();
    format!("p-{}", now.format("%Y%m%d-%H%M%S%3f"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_post_id_generation() {
        let id = generate_post_id();
        assert!(id.starts_with("p-"));
    }

    #[test]
    fn test_post_crud() {
        let path = ".blogsmith/test_posts.db";
        let _ = fs::remove_file(path);

        let db = BlogDb::open_at(path).unwrap();
        let pm = PostManager::new(&db);

        let post = pm
            .create("Rust in 2026", "adoption, tooling", "# Post\n\n## Image Credits\n")
            .unwrap();
        assert_eq!(post.generated_content, post.markdown_content);

        let loaded = pm.load(&post.id).unwrap();
        assert_eq!(loaded.title, "Rust in 2026");
        assert_eq!(loaded.prompts, "adoption, tooling");

        let all = pm.list_all().unwrap();
        assert_eq!(all.len(), 1);

        pm.delete(&post.id).unwrap();
        assert!(pm.load(&post.id).is_err());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_list_all_newest_first() {
        let path = ".blogsmith/test_posts_order.db";
        let _ = fs::remove_file(path);

        let db = BlogDb::open_at(path).unwrap();
        let pm = PostManager::new(&db);

        pm.create("first", "a", "one").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        pm.create("second", "b", "two").unwrap();

        let all = pm.list_all().unwrap();
        assert_eq!(all[0].title, "second");
        assert_eq!(all[1].title, "first");

        let _ = fs::remove_file(path);
    }
}
