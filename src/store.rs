//! The document store: one [`Document`], its last-saved time, and
//! write-through persistence.
//!
//! Every mutation replaces a whole section (or the whole document) and is
//! then saved to the backing [`Database`], if any. A failed save is logged
//! and remembered but never undoes the in-memory change: for the current
//! session the in-memory document is authoritative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::{Database, StoredRecord};
use crate::error::{DocError, Result};
use crate::models::{Document, Section, SectionKey};
use crate::render;

/// Fixed key the document is stored under.
pub const STORAGE_KEY: &str = "documentation-storage";

/// Version written alongside the payload.
///
/// - `0`: the payload is a bare document.
/// - `1`: the payload is `{"data": <document>, "lastSaved": <rfc3339|null>}`.
pub const STORAGE_VERSION: i64 = 1;

/// The persisted envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub data: Document,
    #[serde(default)]
    pub last_saved: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedStateRef<'a> {
    data: &'a Document,
    last_saved: Option<DateTime<Utc>>,
}

pub struct DocumentStore {
    data: Document,
    last_saved: Option<DateTime<Utc>>,
    db: Option<Database>,
    persistence_error: Option<String>,
}

impl DocumentStore {
    /// A store with no durable backing.
    pub fn in_memory() -> Self {
        Self {
            data: Document::new(),
            last_saved: None,
            db: None,
            persistence_error: None,
        }
    }

    /// A store backed by `db`, hydrated from whatever it holds.
    ///
    /// Unreadable or unknown stored state falls back to the empty document.
    pub fn open(db: Database) -> Self {
        let mut store = Self::in_memory();

        match db.load_record(STORAGE_KEY) {
            Ok(Some(record)) => {
                if let Some(state) = decode_record(&record) {
                    tracing::info!(
                        "Loaded documentation (version {}, saved {})",
                        record.version,
                        record.updated_at.to_rfc3339()
                    );
                    store.data = state.data;
                    store.last_saved = state.last_saved;
                }
            }
            Ok(None) => tracing::debug!("No stored documentation, starting empty"),
            Err(e) => {
                tracing::warn!("Failed to load stored documentation: {:#}", e);
                store.persistence_error = Some(e.to_string());
            }
        }

        store.db = Some(db);
        store
    }

    pub fn document(&self) -> &Document {
        &self.data
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    /// The most recent persistence failure, cleared by the next successful save.
    pub fn persistence_error(&self) -> Option<&str> {
        self.persistence_error.as_deref()
    }

    pub fn section(&self, key: SectionKey) -> Section {
        self.data.section(key)
    }

    /// Replace one section wholesale and record the save time.
    ///
    /// A rejected section leaves the store, its save time and the persisted
    /// state untouched.
    pub fn update_section(&mut self, section: Section) -> Result<()> {
        let key = section.key();
        self.data.replace_section(section)?;
        tracing::debug!("Updated section {}", key);
        self.last_saved = Some(Utc::now());
        self.persist();
        Ok(())
    }

    /// Replace one section from loosely typed JSON.
    ///
    /// A value that does not fit the section's shape is rejected and leaves
    /// the store untouched.
    pub fn update_section_json(&mut self, key: SectionKey, value: Value) -> Result<()> {
        let section = Section::from_value(key, value).map_err(|e| DocError::InvalidSection {
            section: key,
            reason: e.to_string(),
        })?;
        self.update_section(section)
    }

    /// Reset to the empty document and forget the save time.
    pub fn clear_data(&mut self) {
        tracing::info!("Clearing documentation");
        self.data = Document::new();
        self.last_saved = None;
        self.persist();
    }

    /// Pretty-printed JSON snapshot of the document.
    pub fn export_data(&self) -> Result<String> {
        render::json::render(&self.data)
    }

    /// Replace the document with one parsed from `json`.
    ///
    /// Returns `false` and leaves the store untouched when the text is not a
    /// document.
    pub fn import_data(&mut self, json: &str) -> bool {
        match self.try_import_data(json) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Import rejected: {}", e);
                false
            }
        }
    }

    /// [`DocumentStore::import_data`], reporting why an import was rejected.
    pub fn try_import_data(&mut self, json: &str) -> Result<()> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| DocError::InvalidImport(e.to_string()))?;
        if !value.is_object() {
            return Err(DocError::InvalidImport(
                "expected a JSON object at the top level".to_string(),
            ));
        }
        // Sections missing from the payload take their empty defaults
        let data: Document =
            serde_json::from_value(value).map_err(|e| DocError::InvalidImport(e.to_string()))?;

        tracing::info!("Imported documentation ({} sections filled)", data.filled_count());
        self.data = data;
        self.last_saved = Some(Utc::now());
        self.persist();
        Ok(())
    }

    /// Share of the twelve sections that are structurally filled, in whole
    /// percent.
    pub fn completion_percentage(&self) -> u8 {
        let total = SectionKey::ALL.len() as f64;
        let filled = self.data.filled_count() as f64;
        (filled / total * 100.0).round() as u8
    }

    fn persist(&mut self) {
        let Some(db) = &self.db else {
            return;
        };

        let state = PersistedStateRef {
            data: &self.data,
            last_saved: self.last_saved,
        };
        let result = serde_json::to_string(&state)
            .map_err(anyhow::Error::from)
            .and_then(|payload| db.save_record(STORAGE_KEY, STORAGE_VERSION, &payload));

        match result {
            Ok(_) => self.persistence_error = None,
            Err(e) => {
                tracing::warn!("Failed to persist documentation: {:#}", e);
                self.persistence_error = Some(DocError::Storage(e.to_string()).to_string());
            }
        }
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Decode a stored record, migrating older payload versions.
///
/// Returns `None` for unknown versions and undecodable payloads so the
/// caller starts from the empty document.
pub fn decode_record(record: &StoredRecord) -> Option<PersistedState> {
    let decoded = match record.version {
        0 => serde_json::from_str::<Document>(&record.payload).map(|data| PersistedState {
            data,
            last_saved: None,
        }),
        STORAGE_VERSION => serde_json::from_str::<PersistedState>(&record.payload),
        other => {
            tracing::warn!(
                "Stored documentation has unknown version {}, starting empty",
                other
            );
            return None;
        }
    };

    match decoded {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!("Stored documentation is unreadable, starting empty: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldMap, Overview};

    fn record(version: i64, payload: &str) -> StoredRecord {
        StoredRecord {
            key: STORAGE_KEY.to_string(),
            version,
            payload: payload.to_string(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_decode_current_version() {
        let state = decode_record(&record(
            1,
            r#"{"data":{"overview":{"projectName":"EcoTrack"}},"lastSaved":null}"#,
        ))
        .unwrap();
        assert_eq!(state.data.project_name(), Some("EcoTrack"));
        assert!(state.last_saved.is_none());
    }

    #[test]
    fn test_decode_bare_document_from_version_zero() {
        let state = decode_record(&record(0, r#"{"design":{"typography":"Inter"}}"#)).unwrap();
        assert_eq!(state.data.design.get("typography"), Some("Inter"));
    }

    #[test]
    fn test_decode_unknown_version_falls_back() {
        assert!(decode_record(&record(7, r#"{"data":{}}"#)).is_none());
        assert!(decode_record(&record(1, "not json")).is_none());
    }

    #[test]
    fn test_update_section_sets_last_saved() {
        let mut store = DocumentStore::in_memory();
        assert!(store.last_saved().is_none());

        store
            .update_section(Section::Map(
                SectionKey::Testing,
                FieldMap::new().with("unitTests", "cargo test"),
            ))
            .unwrap();
        assert!(store.last_saved().is_some());
        assert_eq!(store.completion_percentage(), 8);
    }

    #[test]
    fn test_mistagged_map_section_is_not_saved() {
        let mut store = DocumentStore::in_memory();

        let err = store
            .update_section(Section::Map(
                SectionKey::Api,
                FieldMap::new().with("baseUrl", "https://api.eco"),
            ))
            .unwrap_err();

        assert!(matches!(err, DocError::InvalidSection { section: SectionKey::Api, .. }));
        assert!(store.last_saved().is_none());
        assert_eq!(store.completion_percentage(), 0);
    }

    #[test]
    fn test_wrong_shape_json_leaves_section_untouched() {
        let mut store = DocumentStore::in_memory();
        store
            .update_section(Section::Overview(Overview {
                project_name: Some("EcoTrack".to_string()),
                ..Default::default()
            }))
            .unwrap();

        let err = store
            .update_section_json(SectionKey::Overview, serde_json::json!(["not", "a", "map"]))
            .unwrap_err();
        assert!(matches!(err, DocError::InvalidSection { .. }));
        assert_eq!(store.document().project_name(), Some("EcoTrack"));
    }

    #[test]
    fn test_import_rejects_non_object() {
        let mut store = DocumentStore::in_memory();
        assert!(!store.import_data("[1, 2, 3]"));
        assert!(!store.import_data(r#"{"personas": "nobody"}"#));
        assert!(store.last_saved().is_none());
    }
}
