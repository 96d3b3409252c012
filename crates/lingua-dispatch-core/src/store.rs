//! Append-only translation store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::{Db, Tree};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::util::is_blank;

/// Keyspace holding translation rows
const TABLE: &str = "translations";

/// A translation about to be stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTranslation {
    pub original_message: String,
    pub translated_message: String,
    pub language: String,
    pub model: String,
}

impl NewTranslation {
    pub fn new(
        original_message: impl Into<String>,
        translated_message: impl Into<String>,
        language: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            original_message: original_message.into(),
            translated_message: translated_message.into(),
            language: language.into(),
            model: model.into(),
        }
    }

    /// Reject blank fields, naming the first one found.
    pub fn validate(&self) -> Result<()> {
        [
            ("original_message", &self.original_message),
            ("translated_message", &self.translated_message),
            ("language", &self.language),
            ("model", &self.model),
        ]
        .into_iter()
        .find(|(_, value)| is_blank(value))
        .map_or(Ok(()), |(field, _)| Err(Error::Validation { field }))
    }
}

/// A stored translation row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Surrogate key assigned by the store
    pub id: u64,
    pub original_message: String,
    pub translated_message: String,
    pub language: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
}

/// Durable storage for completed translations
#[async_trait]
pub trait TranslationStore: Send + Sync {
    /// Append a record; the store assigns `id` and `created_at`.
    async fn record(&self, entry: NewTranslation) -> Result<TranslationRecord>;

    /// All records, newest first.
    async fn list(&self) -> Result<Vec<TranslationRecord>>;
}

/// Store backed by an embedded sled database
pub struct SledStore {
    db: Db,
    table: Tree,
}

impl SledStore {
    /// Open (or create) the store at `path` and ensure its schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Storage(format!(
                    "Failed to create store directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let db = sled::open(path).map_err(|e| {
            let err_str = e.to_string();
            if err_str.contains("WouldBlock") || err_str.contains("lock") {
                Error::Storage(format!(
                    "Store locked at {}\n\n\
                    Another process is using it, or a previous instance crashed.\n\
                    To fix: rm {}/db/LOCK",
                    path.display(),
                    path.display()
                ))
            } else {
                Error::Storage(format!("Failed to open store at {}: {}", path.display(), e))
            }
        })?;

        debug!("Opened translation store at {}", path.display());

        Self::with_db(db)
    }

    /// A throwaway store removed when dropped
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| Error::Storage(e.to_string()))?;
        Self::with_db(db)
    }

    /// Schema-ensure: opening the tree creates it when absent.
    fn with_db(db: Db) -> Result<Self> {
        let table = db
            .open_tree(TABLE)
            .map_err(|e| Error::Storage(format!("Failed to open table {TABLE}: {e}")))?;
        info!("Table \"{}\" is ready ({} rows)", TABLE, table.len());
        Ok(Self { db, table })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[async_trait]
impl TranslationStore for SledStore {
    async fn record(&self, entry: NewTranslation) -> Result<TranslationRecord> {
        // generate_id is monotonic and safe across concurrent writers
        let id = self
            .db
            .generate_id()
            .map_err(|e| Error::Storage(format!("Failed to allocate id: {e}")))?
            + 1;

        let record = TranslationRecord {
            id,
            original_message: entry.original_message,
            translated_message: entry.translated_message,
            language: entry.language,
            model: entry.model,
            created_at: Utc::now(),
        };

        let row = serde_json::to_vec(&record).map_err(|e| Error::Storage(e.to_string()))?;

        self.table
            .insert(id.to_be_bytes(), row)
            .map_err(|e| Error::Storage(e.to_string()))?;

        self.table
            .flush()
            .map_err(|e| Error::Storage(format!("Flush failed: {e}")))?;

        debug!("Stored translation {}", id);
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<TranslationRecord>> {
        let mut records = self
            .table
            .iter()
            .values()
            .map(|row| {
                let row = row.map_err(|e| Error::Storage(e.to_string()))?;
                serde_json::from_slice::<TranslationRecord>(&row)
                    .map_err(|e| Error::Storage(format!("Corrupt row: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }
}
