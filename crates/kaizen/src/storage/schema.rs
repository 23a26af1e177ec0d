//! `SQLite` schema definitions for the slot store.

/// SQL statement to create the slots table.
///
/// Each row is one named collection: `value` holds the whole collection as a
/// JSON array and `checksum` the BLAKE3 digest of `value`.
pub const CREATE_SLOTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS slots (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    checksum TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_SLOTS_TABLE];
