//! Artifact bookkeeping in a single SQLite table.
//!
//! Every image the tool writes (procedural, GAN stub or augmentation output)
//! gets one row in `synthetic_images`:
//!
//! ```text
//! id              TEXT PRIMARY KEY    UUID v4
//! filename        TEXT NOT NULL UNIQUE
//! generator_type  TEXT NOT NULL       "procedural" | "augmentation" | "GAN"
//! resolution      TEXT NOT NULL       "WxH"
//! notes           TEXT NOT NULL
//! created_at      TEXT NOT NULL       UTC timestamp
//! ```
//!
//! Rows are append-only: nothing here updates or deletes them.
//!
//! ## Failure semantics
//!
//! [`ArtifactStore::insert`] runs inside its own transaction. Any error drops
//! the transaction before commit, which rolls it back, so a failed insert can
//! never leave a partial row behind. A filename collision surfaces as
//! [`PersistenceError::DuplicateFilename`]; the existing row is untouched.
//!
//! Generators talk to the store through the [`ArtifactSink`] trait, which lets
//! tests substitute a recording mock that fails on demand.

use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, ffi, params};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Name of the artifact table.
pub const TABLE: &str = "synthetic_images";

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("An artifact named {0} is already recorded")]
    DuplicateFilename(String),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown generator type: {0}")]
pub struct UnknownGeneratorType(pub String);

/// Which producer created an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneratorType {
    #[serde(rename = "procedural")]
    Procedural,
    #[serde(rename = "augmentation")]
    Augmentation,
    #[serde(rename = "GAN")]
    Gan,
}

impl GeneratorType {
    /// Every tag, in the order totals are reported.
    pub const ALL: [GeneratorType; 3] = [
        GeneratorType::Procedural,
        GeneratorType::Augmentation,
        GeneratorType::Gan,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GeneratorType::Procedural => "procedural",
            GeneratorType::Augmentation => "augmentation",
            GeneratorType::Gan => "GAN",
        }
    }
}

impl fmt::Display for GeneratorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeneratorType {
    type Err = UnknownGeneratorType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "procedural" => Ok(GeneratorType::Procedural),
            "augmentation" => Ok(GeneratorType::Augmentation),
            "GAN" => Ok(GeneratorType::Gan),
            other => Err(UnknownGeneratorType(other.to_string())),
        }
    }
}

impl ToSql for GeneratorType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for GeneratorType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// One persisted artifact description.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactRecord {
    pub id: String,
    pub filename: String,
    pub generator_type: GeneratorType,
    /// `"WxH"`, see [`naming::resolution`](crate::naming::resolution).
    pub resolution: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl ArtifactRecord {
    /// New record with a fresh UUID and the current time.
    pub fn new(
        filename: impl Into<String>,
        generator_type: GeneratorType,
        resolution: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            filename: filename.into(),
            generator_type,
            resolution: resolution.into(),
            notes: notes.into(),
            created_at: Utc::now(),
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            filename: row.get(1)?,
            generator_type: row.get(2)?,
            resolution: row.get(3)?,
            notes: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

/// Anything that can durably record an artifact.
pub trait ArtifactSink {
    /// Persist one record, all-or-nothing.
    fn insert(&mut self, record: &ArtifactRecord) -> Result<(), PersistenceError>;
}

const SELECT_COLUMNS: &str = "id, filename, generator_type, resolution, notes, created_at";

/// SQLite-backed artifact table.
pub struct ArtifactStore {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl ArtifactStore {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self {
            conn,
            db_path: Some(path.to_path_buf()),
        };
        store.init_schema()?;
        tracing::debug!(path = %path.display(), "artifact store opened");
        Ok(store)
    }

    /// Private in-memory database, schema included.
    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Location of the database file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Create the artifact table and its index if they don't exist yet.
    ///
    /// Safe to call on every start.
    pub fn init_schema(&self) -> Result<(), PersistenceError> {
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {TABLE} (
                id              TEXT PRIMARY KEY,
                filename        TEXT NOT NULL UNIQUE,
                generator_type  TEXT NOT NULL,
                resolution      TEXT NOT NULL,
                notes           TEXT NOT NULL DEFAULT '',
                created_at      TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_{TABLE}_created_at
                ON {TABLE}(created_at DESC);"
        ))?;
        Ok(())
    }

    /// Insert one record in its own transaction.
    pub fn insert(&mut self, record: &ArtifactRecord) -> Result<(), PersistenceError> {
        let tx = self.conn.transaction()?;
        let inserted = tx.execute(
            &format!("INSERT INTO {TABLE} ({SELECT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            params![
                record.id,
                record.filename,
                record.generator_type,
                record.resolution,
                record.notes,
                record.created_at,
            ],
        );
        // Returning early drops `tx`, which rolls back.
        match inserted {
            Ok(_) => {}
            Err(e) if is_duplicate_filename(&e) => {
                return Err(PersistenceError::DuplicateFilename(record.filename.clone()));
            }
            Err(e) => return Err(e.into()),
        }
        tx.commit()?;
        Ok(())
    }

    /// Most recently created records first, at most `limit` of them.
    pub fn query_recent(&self, limit: usize) -> Result<Vec<ArtifactRecord>, PersistenceError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM {TABLE}
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?1"
        ))?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map([limit], ArtifactRecord::from_row)?;

        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }

    /// Look up a single record by filename.
    pub fn find_by_filename(
        &self,
        filename: &str,
    ) -> Result<Option<ArtifactRecord>, PersistenceError> {
        let record = self
            .conn
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM {TABLE} WHERE filename = ?1"),
                [filename],
                ArtifactRecord::from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Number of rows, optionally restricted to one generator.
    pub fn count(&self, generator: Option<GeneratorType>) -> Result<usize, PersistenceError> {
        let count: i64 = match generator {
            Some(g) => self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {TABLE} WHERE generator_type = ?1"),
                [g],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {TABLE}"), [], |row| {
                    row.get(0)
                })?,
        };
        Ok(count as usize)
    }
}

impl ArtifactSink for ArtifactStore {
    fn insert(&mut self, record: &ArtifactRecord) -> Result<(), PersistenceError> {
        ArtifactStore::insert(self, record)
    }
}

impl fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}

fn is_duplicate_filename(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, Some(msg))
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                && msg.ends_with(".filename")
    )
}
