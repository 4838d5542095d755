//! Document store access.
//!
//! The card service only reads two collections (`answers` and `questions`)
//! by document ID. [`DocumentStore`] is the seam between the resolver and
//! the actual backend, so the resolver can be exercised against an
//! in-memory store in tests.

mod firestore;
mod memory;

use std::collections::HashMap;
use std::future::Future;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

/// Collection holding answers (`questionId`, optional `body`).
pub const ANSWERS: &str = "answers";

/// Collection holding questions (`body`).
pub const QUESTIONS: &str = "questions";

/// A fetched document with its string-valued fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Document ID within its collection.
    pub id: String,
    /// String fields by name. Non-string fields are not carried.
    pub fields: HashMap<String, String>,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: HashMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Document store error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Transport failure (connect, timeout, body read).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store answered with a non-success status other than 404.
    #[error("unexpected status {status} for {collection}/{id}")]
    Status {
        status: reqwest::StatusCode,
        collection: String,
        id: String,
    },

    /// The response body was not a document.
    #[error("malformed document: {0}")]
    Decode(#[from] serde_json::Error),

    /// The store is not reachable for another reason.
    #[error("{0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether a single retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(err) => err.is_timeout() || err.is_connect(),
            Self::Status { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            Self::Decode(_) | Self::Unavailable(_) => false,
        }
    }
}

/// Read-only access to a document store.
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by collection and ID. `Ok(None)` means it does not exist.
    fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<Option<Document>, StoreError>> + Send;
}

/// The configured store backend.
#[derive(Debug, Clone)]
pub enum Store {
    Firestore(FirestoreStore),
    Memory(MemoryStore),
}

impl Store {
    /// Short backend name for logs and health output.
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Firestore(_) => "firestore",
            Self::Memory(_) => "memory",
        }
    }
}

impl DocumentStore for Store {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        match self {
            Self::Firestore(store) => store.get(collection, id).await,
            Self::Memory(store) => store.get(collection, id).await,
        }
    }
}
