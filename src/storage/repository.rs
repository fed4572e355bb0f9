//! SQLite repository holding hotel documents

use anyhow::{Context, Result};
use chrono::Utc;
use regex::Regex;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

use super::schema::create_tables;
use crate::types::HotelRecord;

/// Persistence boundary used by the pipeline
pub trait RecordSink {
    /// Insert one record into `collection`. No deduplication is done.
    fn insert_one(&self, collection: &str, record: &HotelRecord) -> Result<()>;
}

/// Collection holding the records of one place: `<database>.<place slug>`
///
/// The slug is lowercased and every run of characters that are not letters
/// or digits becomes `_`, so places differing only in case or punctuation
/// ("New York", "new-york") share a collection.
pub fn collection_name(database: &str, place: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap());

    let lowered = place.trim().to_lowercase();
    let slug = re.replace_all(&lowered, "_");
    let slug = slug.trim_matches('_');
    let slug = if slug.is_empty() { "unnamed" } else { slug };

    format!("{}.{}", database, slug)
}

/// Repository for hotel documents
pub struct HotelRepository {
    conn: Connection,
}

impl HotelRepository {
    /// Open the store at `db_path`, initializing the database if needed
    pub fn new(db_path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create database directory")?;
            }
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database {}", db_path.display()))?;

        create_tables(&conn)?;

        Ok(Self { conn })
    }

    /// Create an in-memory repository (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        create_tables(&conn)?;
        Ok(Self { conn })
    }

    /// Number of documents in a collection
    #[cfg(test)]
    pub fn count(&self, collection: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// All records of a collection in insertion order
    #[cfg(test)]
    pub fn find_all(&self, collection: &str) -> Result<Vec<HotelRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT document FROM documents WHERE collection = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![collection], |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(serde_json::from_str(&row?)?);
        }
        Ok(records)
    }
}

impl RecordSink for HotelRepository {
    fn insert_one(&self, collection: &str, record: &HotelRecord) -> Result<()> {
        let document = serde_json::to_string(record).context("Failed to serialize record")?;

        self.conn
            .execute(
                r#"
                INSERT INTO documents (collection, document, inserted_at)
                VALUES (?1, ?2, ?3)
                "#,
                params![collection, document, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("Failed to insert record into {}", collection))?;

        debug!("Inserted {:?} into {}", record.name, collection);
        Ok(())
    }
}
