//! Storage layer for kaizen.
//!
//! This module provides `SQLite`-backed durable slots. A slot is a named
//! location holding one whole collection as a JSON array; saving a slot
//! replaces its previous content in a single statement.

pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

use schema::SCHEMA_STATEMENTS;

/// Durable key-value store for entity collections.
///
/// Provides:
/// - Whole-collection load and save keyed by slot name
/// - Checksum verification on load, reporting corrupted slots
/// - One-time seeding of absent slots
#[derive(Debug)]
pub struct Store {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Store {
    /// Open or create a store database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // Durable writes: a save must be on disk before the call returns
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=FULL;")?;
        Self::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        Self::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<()> {
        for statement in SCHEMA_STATEMENTS {
            conn.execute(statement, [])?;
        }
        Ok(())
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the collection stored under `key`.
    ///
    /// An absent slot yields an empty collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corruption`] if the slot exists but its checksum does
    /// not match or its JSON does not decode into `Vec<T>`, and a database
    /// error if the query fails.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT value, checksum FROM slots WHERE key = ?1",
                [key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((value, checksum)) = row else {
            debug!(key, "Slot absent, loading empty collection");
            return Ok(Vec::new());
        };

        if Self::checksum(&value) != checksum {
            return Err(Error::corruption(key, "checksum mismatch"));
        }

        serde_json::from_str(&value).map_err(|e| Error::corruption(key, e.to_string()))
    }

    /// Replace the collection stored under `key`.
    ///
    /// The write is a single `INSERT OR REPLACE`, so readers observe either
    /// the previous collection or the new one.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database write fails.
    pub fn save<T: Serialize>(&self, key: &str, records: &[T]) -> Result<()> {
        let value = serde_json::to_string(records)?;
        let checksum = Self::checksum(&value);
        let updated_at = Utc::now().to_rfc3339();

        self.conn.execute(
            r"
            INSERT OR REPLACE INTO slots (key, value, checksum, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![key, value, checksum, updated_at],
        )?;

        debug!(key, records = records.len(), "Saved collection");
        Ok(())
    }

    /// Load `key`, seeding it from `factory` the first time it is accessed.
    ///
    /// Only an absent slot is seeded. A slot that exists, even holding an
    /// empty array, is returned unchanged, so calling this again is a
    /// pass-through.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corruption`] for an unreadable slot (nothing is
    /// written over it), or a database error.
    pub fn seed_if_empty<T, F>(&self, key: &str, factory: F) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Vec<T>,
    {
        if self.contains(key)? {
            return self.load(key);
        }

        let records = factory();
        self.save(key, &records)?;
        info!(key, records = records.len(), "Seeded collection with sample data");
        Ok(records)
    }

    /// Check whether a slot exists under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn contains(&self, key: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM slots WHERE key = ?1",
            [key],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Remove the slot under `key` entirely.
    ///
    /// Returns `true` if a slot was removed, `false` if none existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM slots WHERE key = ?1", [key])?;
        if affected > 0 {
            info!(key, "Removed collection");
        }
        Ok(affected > 0)
    }

    /// Get store statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StoreStats> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, LENGTH(value), updated_at FROM slots ORDER BY key")?;
        let slots = stmt
            .query_map([], |row| {
                let key: String = row.get(0)?;
                let bytes: i64 = row.get(1)?;
                let updated_at: String = row.get(2)?;
                Ok(SlotInfo {
                    key,
                    bytes: u64::try_from(bytes).unwrap_or(0),
                    updated_at: DateTime::parse_from_rfc3339(&updated_at)
                        .ok()
                        .map(|dt| dt.with_timezone(&Utc)),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StoreStats {
            slots,
            db_size_bytes,
        })
    }

    /// Compute the BLAKE3 checksum of a serialized slot value.
    fn checksum(value: &str) -> String {
        blake3::hash(value.as_bytes()).to_hex().to_string()
    }
}

/// Per-slot details reported by [`Store::stats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotInfo {
    /// Slot key.
    pub key: String,
    /// Size of the serialized collection in bytes.
    pub bytes: u64,
    /// When the slot was last written.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Statistics about the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// All slots currently stored.
    pub slots: Vec<SlotInfo>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
