//! In-memory document store, used for tests and local fixture runs.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use super::{Document, DocumentStore, StoreError};

type Collections = HashMap<String, HashMap<String, Document>>;

/// Shared, clonable in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document.
    pub fn insert(&self, collection: &str, document: Document) {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(document.id.clone(), document);
    }

    /// Build a store from fixture JSON shaped as
    /// `{ "<collection>": { "<id>": { "<field>": "<value>", ... } } }`.
    ///
    /// Non-string field values are skipped.
    pub fn from_fixture_json(json: &str) -> Result<Self, StoreError> {
        let raw: HashMap<String, HashMap<String, HashMap<String, serde_json::Value>>> =
            serde_json::from_str(json)?;

        let store = Self::new();
        for (collection, documents) in raw {
            for (id, fields) in documents {
                let mut document = Document::new(id);
                for (name, value) in fields {
                    if let serde_json::Value::String(value) = value {
                        document.fields.insert(name, value);
                    }
                }
                store.insert(&collection, document);
            }
        }
        Ok(store)
    }

    /// Load a fixture file (see [`MemoryStore::from_fixture_json`]).
    pub fn from_fixture_file(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_fixture_json(&json)?;
        tracing::info!(path = %path.display(), documents = store.len(), "loaded fixture store");
        Ok(store)
    }

    /// Total number of documents across all collections.
    pub fn len(&self) -> usize {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(HashMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }
}
