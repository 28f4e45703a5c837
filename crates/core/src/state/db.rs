//! # Unified Blogsmith Database
//!
//! Single SQLite database for all Blogsmith state persistence: blog
//! posts and the editable role prompts, at `.blogsmith/blogsmith.db`.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::skills::prompts;

/// Schema version for migrations
const SCHEMA_VERSION: i32 = 1;

/// Unified database manager for all Blogsmith state
pub struct BlogDb {
    conn: Arc<Mutex<Connection>>,
}

impl BlogDb {
    /// Open or create the unified database at `.blogsmith/blogsmith.db`
    pub fn open() -> Result<Self> {
        Self::open_at(".blogsmith/blogsmith.db")
    }

    /// Open database at a specific path (useful for testing)
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let conn = Connection::open(path.as_ref()).context("Failed to open blogsmith database")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Get a shared connection for use by other modules
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    /// Run schema migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY)",
            [],
        )?;

        let current_version: i32 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_version",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        if current_version < 1 {
            self.migrate_v1(&conn)?;
            conn.execute(
                "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                [1],
            )?;
        }

        Ok(())
    }

    /// Migration to version 1 - complete schema
    fn migrate_v1(&self, conn: &Connection) -> Result<()> {
        // Blog posts. `markdown_content` duplicates `generated_content`
        // in the observed schema and is kept that way.
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                prompts TEXT NOT NULL,
                generated_content TEXT NOT NULL,
                markdown_content TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        // Role prompts (system prompts with version control)
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS prompt_templates (
                slug TEXT PRIMARY KEY,
                version INTEGER NOT NULL DEFAULT 1,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_posts_created ON posts(created_at)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_prompts_slug ON prompt_templates(slug)",
            [],
        )?;

        tracing::info!("BlogDb initialized with schema version {}", SCHEMA_VERSION);

        Ok(())
    }

    // =========================================================================
    // Prompt Template Methods
    // =========================================================================

    /// Seed default prompts if the table is empty
    pub fn seed_prompts(&self) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM prompt_templates", [], |row| {
            row.get(0)
        })?;

        if count > 0 {
            tracing::debug!("Prompts already seeded ({} found)", count);
            return Ok(0);
        }

        let defaults = prompts::all_defaults();
        let mut inserted = 0;

        for (slug, content) in defaults {
            conn.execute(
                "INSERT INTO prompt_templates (slug, version, content) VALUES (?1, 1, ?2)",
                params![slug, content],
            )?;
            inserted += 1;
        }

        tracing::info!("Seeded {} default prompts", inserted);
        Ok(inserted)
    }

    /// Get a prompt by slug
    pub fn get_prompt(&self, slug: &str) -> Result<String> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        conn.query_row(
            "SELECT content FROM prompt_templates WHERE slug = ?1",
            params![slug],
            |row| row.get(0),
        )
        .with_context(|| format!("Prompt '{}' not found", slug))
    }

    /// Get a prompt with its version
    pub fn get_prompt_versioned(&self, slug: &str) -> Result<(String, i32)> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        conn.query_row(
            "SELECT content, version FROM prompt_templates WHERE slug = ?1",
            params![slug],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .with_context(|| format!("Prompt '{}' not found", slug))
    }

    /// Update a prompt (increments version automatically)
    pub fn set_prompt(&self, slug: &str, content: &str) -> Result<i32> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let current_version: i32 = conn
            .query_row(
                "SELECT version FROM prompt_templates WHERE slug = ?1",
                params![slug],
                |row| row.get(0),
            )
            .unwrap_or(0);

        let new_version = current_version + 1;

        conn.execute(
            r#"
            INSERT INTO prompt_templates (slug, version, content, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(slug) DO UPDATE SET
                version = ?2,
                content = ?3,
                updated_at = datetime('now')
            "#,
            params![slug, new_version, content],
        )?;

        tracing::debug!("Updated prompt '{}' to version {}", slug, new_version);
        Ok(new_version)
    }

    /// List all prompt slugs with versions
    pub fn list_prompts(&self) -> Result<Vec<(String, i32)>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let mut stmt = conn.prepare("SELECT slug, version FROM prompt_templates ORDER BY slug")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut prompts = Vec::new();
        for row in rows {
            prompts.push(row?);
        }
        Ok(prompts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_blog_db_open_creates_tables() {
        let path = ".blogsmith/test_blogsmith.db";
        let _ = fs::remove_file(path);

        let db = BlogDb::open_at(path).unwrap();
        let conn = db.connection();
        let conn = conn.lock().unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"posts".to_string()));
        assert!(tables.contains(&"prompt_templates".to_string()));

        drop(conn);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_schema_version_tracking() {
        let path = ".blogsmith/test_blogsmith_version.db";
        let _ = fs::remove_file(path);

        // Open twice - should not fail on second open
        let _db1 = BlogDb::open_at(path).unwrap();
        drop(_db1);

        let db2 = BlogDb::open_at(path).unwrap();
        let conn = db2.connection();
        let conn = conn.lock().unwrap();

        let version: i32 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                row.get(0)
            })
            .unwrap();

        assert_eq!(version, SCHEMA_VERSION);

        drop(conn);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_prompt_seeding() {
        let path = ".blogsmith/test_prompts.db";
        let _ = fs::remove_file(path);

        let db = BlogDb::open_at(path).unwrap();

        let count = db.seed_prompts().unwrap();
        assert!(count > 0, "Should seed default prompts");

        let count2 = db.seed_prompts().unwrap();
        assert_eq!(count2, 0, "Should not re-seed");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_prompt_crud() {
        let path = ".blogsmith/test_prompt_crud.db";
        let _ = fs::remove_file(path);

        let db = BlogDb::open_at(path).unwrap();
        db.seed_prompts().unwrap();

        let content = db.get_prompt("writer").unwrap();
        assert!(
            content.to_lowercase().contains("writer"),
            "Should contain prompt content"
        );

        let new_version = db.set_prompt("writer", "New writer prompt v2").unwrap();
        assert_eq!(new_version, 2, "Version should increment");

        let (content, version) = db.get_prompt_versioned("writer").unwrap();
        assert_eq!(content, "New writer prompt v2");
        assert_eq!(version, 2);

        let _ = fs::remove_file(path);
    }
}
