//! SQLite-backed scan history ledger

use super::codec::{decode_entities, encode_entities};
use crate::domain::{
    DetectedEntity, FileMetadata, Result, ScanMode, ScanRecord, StorageError,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Schema version stored in `PRAGMA user_version`
pub const SCHEMA_VERSION: i64 = 1;

const EXPECTED_COLUMNS: [&str; 8] = [
    "id",
    "file_path",
    "scan_time",
    "file_size",
    "file_modified",
    "file_checksum",
    "scan_mode",
    "pii_entities",
];

const UPSERT_SQL: &str = "
    INSERT INTO scan_history
        (file_path, scan_time, file_size, file_modified, file_checksum, scan_mode, pii_entities)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    ON CONFLICT (file_checksum, scan_mode) DO UPDATE SET
        file_path = excluded.file_path,
        scan_time = excluded.scan_time,
        file_size = excluded.file_size,
        file_modified = excluded.file_modified,
        pii_entities = excluded.pii_entities";

/// Result of looking up a content fingerprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Never scanned with this content and mode
    NotFound,
    /// Scanned, nothing detected
    Clean,
    /// Scanned, entities detected
    Flagged(Vec<DetectedEntity>),
}

impl LookupOutcome {
    pub fn is_found(&self) -> bool {
        !matches!(self, LookupOutcome::NotFound)
    }

    /// The `(found, entities)` pair; entities are `None` when not found
    pub fn into_parts(self) -> (bool, Option<Vec<DetectedEntity>>) {
        match self {
            LookupOutcome::NotFound => (false, None),
            LookupOutcome::Clean => (true, Some(Vec::new())),
            LookupOutcome::Flagged(entities) => (true, Some(entities)),
        }
    }
}

/// Filter for [`ScanHistoryStore::list_records`]
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Only records of this mode
    pub mode: Option<ScanMode>,
    /// Only records with at least one entity
    pub flagged_only: bool,
    /// Most recent N records
    pub limit: Option<usize>,
}

/// Scan history ledger keyed by `(file_checksum, scan_mode)`
///
/// A connection is opened for each operation and closed when it returns.
#[derive(Debug, Clone)]
pub struct ScanHistoryStore {
    path: PathBuf,
}

impl ScanHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> std::result::Result<Connection, StorageError> {
        let conn = Connection::open(&self.path).map_err(|e| StorageError::Open {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }

    /// Create the schema, repairing an unusable file
    ///
    /// Safe to call at every start. A file that is not a SQLite database is
    /// deleted and recreated; a `scan_history` table with another layout is
    /// dropped and recreated. Both discard prior history, which only costs a
    /// re-scan.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Schema`] when the schema cannot be created,
    /// even after repair.
    pub fn initialize(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StorageError::Schema(format!(
                        "Failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        match self.prepare_schema() {
            Ok(()) => {}
            Err(e) if is_unreadable(&e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "History store is not a usable database, recreating"
                );
                std::fs::remove_file(&self.path).map_err(|e| {
                    StorageError::Schema(format!(
                        "Failed to remove corrupt history store {}: {}",
                        self.path.display(),
                        e
                    ))
                })?;
                self.prepare_schema()
                    .map_err(|e| StorageError::Schema(e.to_string()))?;
            }
            Err(e) => return Err(StorageError::Schema(e.to_string()).into()),
        }

        tracing::debug!(path = %self.path.display(), "History store initialized");
        Ok(())
    }

    fn prepare_schema(&self) -> rusqlite::Result<()> {
        let conn = Connection::open(&self.path)?;
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        let columns = table_columns(&conn)?;

        if !columns.is_empty() && (version != SCHEMA_VERSION || !missing_columns(&columns).is_empty())
        {
            tracing::warn!(
                path = %self.path.display(),
                version,
                "History table has an unexpected layout, recreating"
            );
            conn.execute_batch(
                "DROP INDEX IF EXISTS idx_scan_history_path;
                 DROP TABLE IF EXISTS scan_history;",
            )?;
        }

        conn.execute_batch(include_str!("schema.sql"))
    }

    /// Look up a prior scan of this content in this mode
    ///
    /// Storage and decoding errors are logged and reported as
    /// [`LookupOutcome::NotFound`], which forces a re-scan.
    pub fn lookup(&self, checksum: &str, mode: ScanMode) -> LookupOutcome {
        match self.try_lookup(checksum, mode) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(
                    checksum,
                    mode = %mode,
                    error = %e,
                    "History lookup failed, treating file as not scanned"
                );
                LookupOutcome::NotFound
            }
        }
    }

    /// Look up a prior scan, surfacing storage errors
    pub fn try_lookup(
        &self,
        checksum: &str,
        mode: ScanMode,
    ) -> std::result::Result<LookupOutcome, StorageError> {
        let conn = self.connect()?;
        let stored: Option<String> = conn
            .query_row(
                "SELECT pii_entities FROM scan_history WHERE file_checksum = ?1 AND scan_mode = ?2",
                params![checksum, mode.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match stored {
            None => Ok(LookupOutcome::NotFound),
            Some(stored) => {
                let entities = decode_entities(&stored)?;
                if entities.is_empty() {
                    Ok(LookupOutcome::Clean)
                } else {
                    Ok(LookupOutcome::Flagged(entities))
                }
            }
        }
    }

    /// Record a scan result, replacing any record with the same key
    ///
    /// # Arguments
    ///
    /// * `path` - Path the content was scanned under
    /// * `entities` - Detected entities in chunk order (may be empty)
    /// * `metadata` - Size and modification time observed before scanning
    /// * `checksum` - Content fingerprint for `mode`
    /// * `mode` - Scan mode
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] when the row cannot be written.
    pub fn record(
        &self,
        path: &Path,
        entities: &[DetectedEntity],
        metadata: &FileMetadata,
        checksum: &str,
        mode: ScanMode,
    ) -> Result<()> {
        let encoded = encode_entities(entities)?;
        let size = i64::try_from(metadata.size).map_err(|_| {
            StorageError::Write(format!("File size {} out of range", metadata.size))
        })?;
        let file_path = path.to_string_lossy().into_owned();

        let conn = self.connect()?;
        conn.execute(
            UPSERT_SQL,
            params![
                file_path,
                Utc::now().to_rfc3339(),
                size,
                metadata.modified.to_rfc3339(),
                checksum,
                mode.as_str(),
                encoded,
            ],
        )
        .map_err(|e| StorageError::Write(e.to_string()))?;

        tracing::debug!(
            path = %path.display(),
            checksum,
            mode = %mode,
            entities = entities.len(),
            "Scan recorded"
        );
        Ok(())
    }

    /// Check database integrity and the table layout
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Integrity`] when SQLite reports damage and
    /// [`StorageError::Schema`] when the table is missing or malformed.
    pub fn verify(&self) -> Result<()> {
        let conn = self.connect()?;
        let status: String = conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))
            .map_err(|e| StorageError::Integrity(e.to_string()))?;
        if status != "ok" {
            return Err(StorageError::Integrity(status).into());
        }

        let columns = table_columns(&conn)?;
        if columns.is_empty() {
            return Err(StorageError::Schema("scan_history table is missing".to_string()).into());
        }
        let missing = missing_columns(&columns);
        if !missing.is_empty() {
            return Err(StorageError::Schema(format!(
                "scan_history is missing columns: {}",
                missing.join(", ")
            ))
            .into());
        }

        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version != SCHEMA_VERSION {
            return Err(StorageError::Schema(format!(
                "Schema version {} (expected {})",
                version, SCHEMA_VERSION
            ))
            .into());
        }
        Ok(())
    }

    /// Number of records
    pub fn count(&self) -> Result<u64> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM scan_history", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Recorded scans, most recent first
    ///
    /// Rows whose stored values cannot be decoded are logged and skipped.
    pub fn list_records(&self, filter: &RecordFilter) -> Result<Vec<ScanRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, file_path, scan_time, file_size, file_modified, file_checksum, scan_mode, pii_entities
             FROM scan_history
             WHERE ?1 IS NULL OR scan_mode = ?1
             ORDER BY scan_time DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![filter.mode.map(|m| m.as_str())], |row| {
            Ok(RawRecord {
                id: row.get(0)?,
                file_path: row.get(1)?,
                scan_time: row.get(2)?,
                file_size: row.get(3)?,
                file_modified: row.get(4)?,
                file_checksum: row.get(5)?,
                scan_mode: row.get(6)?,
                pii_entities: row.get(7)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            let raw = row.map_err(StorageError::from)?;
            let id = raw.id;
            match raw.into_record() {
                Ok(record) => {
                    if filter.flagged_only && !record.has_pii() {
                        continue;
                    }
                    records.push(record);
                    if filter.limit.is_some_and(|limit| records.len() >= limit) {
                        break;
                    }
                }
                Err(e) => tracing::warn!(id, error = %e, "Skipping undecodable history row"),
            }
        }
        Ok(records)
    }
}

struct RawRecord {
    id: i64,
    file_path: String,
    scan_time: String,
    file_size: i64,
    file_modified: String,
    file_checksum: String,
    scan_mode: String,
    pii_entities: String,
}

impl RawRecord {
    fn into_record(self) -> std::result::Result<ScanRecord, StorageError> {
        let scan_mode = self
            .scan_mode
            .parse::<ScanMode>()
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        Ok(ScanRecord {
            id: self.id,
            file_path: self.file_path,
            scan_time: parse_timestamp(&self.scan_time)?,
            file_size: self.file_size.max(0) as u64,
            file_modified: parse_timestamp(&self.file_modified)?,
            file_checksum: self.file_checksum,
            scan_mode,
            pii_entities: decode_entities(&self.pii_entities)?,
        })
    }
}

fn parse_timestamp(value: &str) -> std::result::Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StorageError::Corrupt(format!("Invalid timestamp '{}': {}", value, e)))
}

fn table_columns(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("PRAGMA table_info(scan_history)")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}

fn missing_columns(columns: &[String]) -> Vec<&'static str> {
    EXPECTED_COLUMNS
        .iter()
        .copied()
        .filter(|expected| !columns.iter().any(|c| c == expected))
        .collect()
}

fn is_unreadable(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::NotADatabase) | Some(ErrorCode::DatabaseCorrupt)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ScanHistoryStore {
        let store = ScanHistoryStore::new(dir.path().join("history.db"));
        store.initialize().unwrap();
        store
    }

    fn metadata() -> FileMetadata {
        FileMetadata {
            size: 25,
            modified: Utc::now(),
        }
    }

    #[test]
    fn test_lookup_outcome_parts() {
        assert_eq!(LookupOutcome::NotFound.into_parts(), (false, None));
        assert_eq!(LookupOutcome::Clean.into_parts(), (true, Some(vec![])));
        assert!(LookupOutcome::Clean.is_found());
    }

    #[test]
    fn test_missing_columns() {
        let columns = vec!["id".to_string(), "file_path".to_string()];
        let missing = missing_columns(&columns);
        assert_eq!(missing.len(), 6);
        assert!(missing.contains(&"scan_mode"));
    }

    #[test]
    fn test_record_then_lookup() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let entities = vec![DetectedEntity::new("jane@example.com", "email")];

        store
            .record(Path::new("/data/a.txt"), &entities, &metadata(), "abc", ScanMode::Full)
            .unwrap();

        assert_eq!(
            store.lookup("abc", ScanMode::Full),
            LookupOutcome::Flagged(entities)
        );
        assert_eq!(store.lookup("abc", ScanMode::Lite), LookupOutcome::NotFound);
    }

    #[test]
    fn test_undecodable_row_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let conn = Connection::open(store.path()).unwrap();
        conn.execute(
            "INSERT INTO scan_history (file_path, scan_time, file_size, file_modified, file_checksum, scan_mode, pii_entities)
             VALUES ('a', '2024-01-01T00:00:00+00:00', 1, '2024-01-01T00:00:00+00:00', 'abc', 'full', '[{''text'': ''x''}]')",
            [],
        )
        .unwrap();

        assert_eq!(store.lookup("abc", ScanMode::Full), LookupOutcome::NotFound);
        assert!(matches!(
            store.try_lookup("abc", ScanMode::Full),
            Err(StorageError::Corrupt(_))
        ));
    }

    #[test]
    fn test_scan_mode_check_constraint() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let conn = Connection::open(store.path()).unwrap();
        let result = conn.execute(
            "INSERT INTO scan_history (file_path, scan_time, file_size, file_modified, file_checksum, scan_mode, pii_entities)
             VALUES ('a', 't', 1, 't', 'abc', 'deep', '{}')",
            [],
        );
        assert!(result.is_err());
    }
}
