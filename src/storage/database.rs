//! Database Layer with Connection Pooling
//!
//! SQLite-backed audit history featuring:
//! - Connection pooling via r2d2 for concurrent access
//! - WAL mode for optimal read/write performance
//! - Version-tracked schema for forward migrations

use std::path::Path;
use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, Row, params};

use super::records::{AnalysisRecord, AnalysisStatus};
use crate::types::{AnalysisResult, Result, ResultExt, VetError};

/// Shared database handle for async contexts.
pub type SharedDatabase = Arc<Database>;

const SCHEMA: &str = include_str!("schema.sql");

/// Current schema version for migration tracking
const SCHEMA_VERSION: u32 = 1;

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool
    pub max_size: u32,
    /// Timeout for acquiring a connection (seconds)
    pub connection_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: 4,
            connection_timeout_secs: 30,
        }
    }
}

/// Thread-safe database with connection pooling.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open database with connection pooling at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, PoolConfig::default())
    }

    /// Open database with custom pool configuration.
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: PoolConfig) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let manager =
            SqliteConnectionManager::file(path.as_ref()).with_init(Self::configure_connection);

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(std::time::Duration::from_secs(
                config.connection_timeout_secs,
            ))
            .build(manager)
            .map_err(|e| VetError::Storage(format!("Failed to create connection pool: {}", e)))?;

        Ok(Self { pool })
    }

    /// Open an in-memory database for testing or temporary use.
    pub fn open_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory().with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| VetError::Storage(format!("Failed to create in-memory pool: {}", e)))?;

        Ok(Self { pool })
    }

    fn configure_connection(conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| VetError::Storage(format!("Failed to acquire database connection: {}", e)))
    }

    /// Initialize database schema.
    pub fn initialize(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA)
            .with_context("Failed to initialize database schema")?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .with_context("Failed to set schema version")?;
        Ok(())
    }

    // =========================================================================
    // Audit Lifecycle
    // =========================================================================

    /// Create a new pending audit row and return its record.
    pub fn insert_pending(&self, repo_url: &str) -> Result<AnalysisRecord> {
        let record = AnalysisRecord::pending(repo_url);
        let ts = record.created_at.to_rfc3339();

        self.conn()?
            .execute(
                "INSERT INTO analyses (id, repo_url, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.id,
                    record.repo_url,
                    record.status.as_str(),
                    ts,
                    ts
                ],
            )
            .with_context("Failed to insert pending analysis")?;

        tracing::debug!(id = %record.id, "Created pending analysis");
        Ok(record)
    }

    /// Mark an audit as running.
    pub fn set_running(&self, id: &str) -> Result<()> {
        self.update_status(id, AnalysisStatus::Running)
    }

    /// Mark an audit as completed and store its report.
    pub fn complete(&self, id: &str, summary: &str, result: &AnalysisResult) -> Result<()> {
        let result_json =
            serde_json::to_string(result).with_context("Failed to serialize analysis result")?;
        let now = chrono::Utc::now().to_rfc3339();

        let updated = self
            .conn()?
            .execute(
                "UPDATE analyses
                 SET status = ?1, summary = ?2, result = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![
                    AnalysisStatus::Completed.as_str(),
                    summary,
                    result_json,
                    now,
                    id
                ],
            )
            .with_context("Failed to complete analysis")?;

        if updated == 0 {
            return Err(VetError::NotFound(format!("Analysis not found: {}", id)));
        }
        Ok(())
    }

    /// Mark an audit as failed with an error message.
    pub fn fail(&self, id: &str, error_message: &str) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let updated = self
            .conn()?
            .execute(
                "UPDATE analyses
                 SET status = ?1, error_message = ?2, updated_at = ?3
                 WHERE id = ?4",
                params![AnalysisStatus::Failed.as_str(), error_message, now, id],
            )
            .with_context("Failed to mark analysis as failed")?;

        if updated == 0 {
            return Err(VetError::NotFound(format!("Analysis not found: {}", id)));
        }
        Ok(())
    }

    fn update_status(&self, id: &str, status: AnalysisStatus) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let updated = self
            .conn()?
            .execute(
                "UPDATE analyses SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status.as_str(), now, id],
            )
            .with_context("Failed to update analysis status")?;

        if updated == 0 {
            return Err(VetError::NotFound(format!("Analysis not found: {}", id)));
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Load one audit by id.
    pub fn get(&self, id: &str) -> Result<Option<AnalysisRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, repo_url, status, summary, result, error_message,
                        created_at, updated_at
                 FROM analyses WHERE id = ?1",
            )
            .with_context("Failed to prepare analysis query")?;

        match stmt.query_row(params![id], Self::row_to_record) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(VetError::Storage(format!("Failed to load analysis: {}", e))),
        }
    }

    /// List audits, newest first.
    pub fn list(&self, limit: usize) -> Result<Vec<AnalysisRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, repo_url, status, summary, result, error_message,
                        created_at, updated_at
                 FROM analyses
                 ORDER BY created_at DESC
                 LIMIT ?1",
            )
            .with_context("Failed to prepare history query")?;

        let records = stmt
            .query_map(params![limit as i64], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context("Failed to fetch analysis history")?;

        Ok(records)
    }

    /// Resolve an id prefix to a full id. Errors when the prefix is
    /// ambiguous; returns None when nothing matches.
    pub fn resolve_id(&self, prefix: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT id FROM analyses WHERE id LIKE ?1 || '%' LIMIT 2")
            .with_context("Failed to prepare id lookup")?;

        let mut ids: Vec<String> = stmt
            .query_map(params![prefix], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context("Failed to resolve analysis id")?;

        match ids.len() {
            0 => Ok(None),
            1 => Ok(ids.pop()),
            _ => Err(VetError::Storage(format!(
                "Ambiguous analysis id prefix: {}",
                prefix
            ))),
        }
    }

    /// Delete one audit. Returns whether a row existed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let deleted = self
            .conn()?
            .execute("DELETE FROM analyses WHERE id = ?1", params![id])
            .with_context("Failed to delete analysis")?;
        Ok(deleted > 0)
    }

    fn row_to_record(row: &Row<'_>) -> std::result::Result<AnalysisRecord, rusqlite::Error> {
        let status_str: String = row.get(2)?;
        let status = status_str.parse::<AnalysisStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let result_json: Option<String> = row.get(4)?;
        let result: Option<AnalysisResult> = match result_json {
            Some(json) => Some(serde_json::from_str(&json).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    4,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?),
            None => None,
        };

        Ok(AnalysisRecord {
            id: row.get(0)?,
            repo_url: row.get(1)?,
            status,
            summary: row.get(3)?,
            result,
            error_message: row.get(5)?,
            created_at: parse_timestamp(row, 6)?,
            updated_at: parse_timestamp(row, 7)?,
        })
    }
}

fn parse_timestamp(
    row: &Row<'_>,
    idx: usize,
) -> std::result::Result<chrono::DateTime<chrono::Utc>, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    chrono::DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::normalize_response;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db
    }

    fn sample_result() -> AnalysisResult {
        normalize_response("{}").unwrap()
    }

    #[test]
    fn test_lifecycle_pending_to_completed() {
        let db = test_db();
        let record = db.insert_pending("https://github.com/acme/demo").unwrap();
        assert_eq!(record.status, AnalysisStatus::Pending);

        db.set_running(&record.id).unwrap();
        let loaded = db.get(&record.id).unwrap().unwrap();
        assert_eq!(loaded.status, AnalysisStatus::Running);
        assert!(loaded.result.is_none());

        let result = sample_result();
        db.complete(&record.id, "A demo repository", &result).unwrap();

        let loaded = db.get(&record.id).unwrap().unwrap();
        assert_eq!(loaded.status, AnalysisStatus::Completed);
        assert_eq!(loaded.summary.as_deref(), Some("A demo repository"));
        assert_eq!(loaded.result.as_ref(), Some(&result));
        assert!(loaded.updated_at >= loaded.created_at);
    }

    #[test]
    fn test_lifecycle_failure_keeps_error_message() {
        let db = test_db();
        let record = db.insert_pending("https://github.com/acme/demo").unwrap();
        db.set_running(&record.id).unwrap();
        db.fail(&record.id, "upstream returned 502").unwrap();

        let loaded = db.get(&record.id).unwrap().unwrap();
        assert_eq!(loaded.status, AnalysisStatus::Failed);
        assert_eq!(loaded.error_message.as_deref(), Some("upstream returned 502"));
        assert!(loaded.result.is_none());
    }

    #[test]
    fn test_updates_on_missing_id_are_not_found() {
        let db = test_db();
        assert!(matches!(
            db.set_running("no-such-id"),
            Err(VetError::NotFound(_))
        ));
        assert!(matches!(
            db.fail("no-such-id", "x"),
            Err(VetError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_is_newest_first_and_limited() {
        let db = test_db();
        for i in 0..5 {
            let record = db
                .insert_pending(&format!("https://github.com/acme/repo{}", i))
                .unwrap();
            // Force distinct created_at ordering.
            db.conn()
                .unwrap()
                .execute(
                    "UPDATE analyses SET created_at = ?1 WHERE id = ?2",
                    params![format!("2026-01-0{}T00:00:00+00:00", i + 1), record.id],
                )
                .unwrap();
        }

        let records = db.list(3).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].repo_url.ends_with("repo4"));
        assert!(records[1].repo_url.ends_with("repo3"));
    }

    #[test]
    fn test_resolve_id_prefix() {
        let db = test_db();
        let record = db.insert_pending("https://github.com/acme/demo").unwrap();

        let resolved = db.resolve_id(&record.id[..8]).unwrap();
        assert_eq!(resolved.as_deref(), Some(record.id.as_str()));
        assert_eq!(db.resolve_id("zzzzzzzz").unwrap(), None);
    }

    #[test]
    fn test_delete() {
        let db = test_db();
        let record = db.insert_pending("https://github.com/acme/demo").unwrap();
        assert!(db.delete(&record.id).unwrap());
        assert!(!db.delete(&record.id).unwrap());
        assert!(db.get(&record.id).unwrap().is_none());
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("audits.db");
        let db = Database::open(&path).unwrap();
        db.initialize().unwrap();
        assert!(path.exists());
    }
}
