//! SQLite-backed durable documentation cache
//!
//! One row per `(owner, name, options)` equivalence class, upserted after
//! every successful generation and kept until explicitly refreshed. This
//! tier is an optimization only: callers log and swallow every error here
//! and fall back to fresh generation.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};

use crate::error::CacheError;
use crate::pipeline::options::ContextOptions;

/// Schema version - increment to trigger nuke-and-rebuild
const SCHEMA_VERSION: i32 = 1;

type Result<T> = std::result::Result<T, CacheError>;

/// A cached document row
#[derive(Debug, Clone)]
pub struct CachedDoc {
    pub documentation: String,
    #[allow(dead_code)]
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Statistics about the durable cache state
#[derive(Debug)]
pub struct StoreStats {
    pub total_entries: usize,
    pub distinct_repos: usize,
    pub oldest_entry: Option<i64>,
    pub newest_entry: Option<i64>,
}

/// Statistics about a clear operation
#[derive(Debug)]
pub struct ClearStats {
    pub entries_removed: usize,
}

/// Durable documentation store
pub struct DocStore {
    conn: Connection,
}

impl DocStore {
    /// Open or create the store at the default XDG cache location
    pub fn open() -> Result<Self> {
        Self::open_at(&Self::cache_dir()?)
    }

    /// Get the cache directory path (~/.cache/repodoc on Linux/macOS)
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_base = dirs::cache_dir().ok_or(CacheError::NoCacheDir)?;
        Ok(cache_base.join("repodoc"))
    }

    /// Open the store at a specific directory (configurable, and used by
    /// tests)
    pub fn open_at(cache_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(cache_dir)
            .map_err(|e| CacheError::Io(format!("Failed to create cache dir: {}", e)))?;

        let db_path = cache_dir.join("docs.db");
        let conn = Connection::open(&db_path)?;

        // Check schema version - nuke if mismatched
        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            log::info!(
                "Doc cache schema version mismatch ({} != {}), rebuilding",
                version,
                SCHEMA_VERSION
            );
            drop(conn);
            std::fs::remove_file(&db_path)
                .map_err(|e| CacheError::Io(format!("Failed to remove cache DB: {}", e)))?;
            return Self::open_at(cache_dir);
        }

        // One row per (repo, options) equivalence class; custom_prompt is
        // stored normalized, absent == empty. Timestamps are unix millis.
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS doc_cache (
                repo_owner TEXT NOT NULL,
                repo_name TEXT NOT NULL,
                include_readme INTEGER NOT NULL,
                include_source_code INTEGER NOT NULL,
                include_issues INTEGER NOT NULL,
                include_pull_requests INTEGER NOT NULL,
                quick_mode INTEGER NOT NULL,
                custom_prompt TEXT NOT NULL,
                documentation TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (
                    repo_owner, repo_name,
                    include_readme, include_source_code,
                    include_issues, include_pull_requests,
                    quick_mode, custom_prompt
                )
            );

            CREATE INDEX IF NOT EXISTS idx_doc_cache_repo
                ON doc_cache(repo_owner, repo_name);
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self { conn })
    }

    /// Find the cached document whose options are option-equal to `options`.
    ///
    /// Queries by `(owner, name)` and filters the candidate rows in memory,
    /// since one repository may hold several variants under different option
    /// combinations.
    pub fn find(
        &self,
        owner: &str,
        name: &str,
        options: &ContextOptions,
    ) -> Result<Option<CachedDoc>> {
        let mut stmt = self.conn.prepare(
            "SELECT include_readme, include_source_code, include_issues,
                    include_pull_requests, quick_mode, custom_prompt,
                    documentation, created_at, updated_at
             FROM doc_cache
             WHERE repo_owner = ?1 AND repo_name = ?2",
        )?;

        let rows = stmt.query_map(params![owner, name], |row| {
            let row_options = ContextOptions {
                include_readme: row.get::<_, i64>(0)? != 0,
                include_source_code: row.get::<_, i64>(1)? != 0,
                include_issues: row.get::<_, i64>(2)? != 0,
                include_pull_requests: row.get::<_, i64>(3)? != 0,
                quick_mode: row.get::<_, i64>(4)? != 0,
                custom_prompt: Some(row.get::<_, String>(5)?),
            };
            let doc = CachedDoc {
                documentation: row.get(6)?,
                created_at: millis_to_datetime(row.get(7)?),
                updated_at: millis_to_datetime(row.get(8)?),
            };
            Ok((row_options, doc))
        })?;

        for row in rows {
            let (row_options, doc) = row?;
            if row_options == *options {
                return Ok(Some(doc));
            }
        }

        Ok(None)
    }

    /// Upsert the document for `(owner, name, options)`.
    ///
    /// On conflict only `documentation` and `updated_at` change;
    /// `created_at` keeps its insert-time value. A write stamped older than
    /// the stored row is a no-op, so a late-arriving result from an
    /// abandoned request cannot clobber a fresher one.
    pub fn upsert(
        &self,
        owner: &str,
        name: &str,
        options: &ContextOptions,
        documentation: &str,
    ) -> Result<()> {
        self.upsert_at(owner, name, options, documentation, Utc::now().timestamp_millis())
    }

    fn upsert_at(
        &self,
        owner: &str,
        name: &str,
        options: &ContextOptions,
        documentation: &str,
        now_millis: i64,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO doc_cache (
                repo_owner, repo_name,
                include_readme, include_source_code, include_issues,
                include_pull_requests, quick_mode, custom_prompt,
                documentation, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
             ON CONFLICT (
                repo_owner, repo_name,
                include_readme, include_source_code, include_issues,
                include_pull_requests, quick_mode, custom_prompt
             ) DO UPDATE SET
                documentation = excluded.documentation,
                updated_at = excluded.updated_at
             WHERE excluded.updated_at >= updated_at",
            params![
                owner,
                name,
                options.include_readme,
                options.include_source_code,
                options.include_issues,
                options.include_pull_requests,
                options.quick_mode,
                options.custom_prompt(),
                documentation,
                now_millis,
            ],
        )?;
        Ok(())
    }

    /// Get store statistics
    pub fn stats(&self) -> Result<StoreStats> {
        let total_entries: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM doc_cache", [], |r| r.get(0))?;

        let distinct_repos: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT repo_owner || '/' || repo_name) FROM doc_cache",
            [],
            |r| r.get(0),
        )?;

        let oldest: Option<i64> =
            self.conn
                .query_row("SELECT MIN(updated_at) FROM doc_cache", [], |r| r.get(0))?;

        let newest: Option<i64> =
            self.conn
                .query_row("SELECT MAX(updated_at) FROM doc_cache", [], |r| r.get(0))?;

        Ok(StoreStats {
            total_entries: total_entries as usize,
            distinct_repos: distinct_repos as usize,
            oldest_entry: oldest,
            newest_entry: newest,
        })
    }

    /// Clear all cached documents
    pub fn clear_all(&self) -> Result<ClearStats> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM doc_cache", [], |r| r.get(0))?;

        self.conn.execute("DELETE FROM doc_cache", [])?;

        Ok(ClearStats {
            entries_removed: count as usize,
        })
    }
}

fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
}
