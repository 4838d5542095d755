//! Firestore REST backend.
//!
//! Documents are fetched with
//! `GET {base}/projects/{project}/databases/(default)/documents/{collection}/{id}`.
//! Pointing the base URL at the Firestore emulator works unchanged.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::Deserialize;

use super::{Document, DocumentStore, StoreError};
use crate::config::Config;

/// Firestore document as returned by the REST API.
#[derive(Debug, Deserialize)]
struct RawDocument {
    /// Full resource name, ending in the document ID.
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    fields: HashMap<String, RawValue>,
}

/// A typed Firestore value. Only strings are of interest here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawValue {
    #[serde(default)]
    string_value: Option<String>,
}

/// Document store backed by the Firestore REST API.
#[derive(Clone)]
pub struct FirestoreStore {
    client: reqwest::Client,
    documents_url: Url,
    token: Option<String>,
}

impl std::fmt::Debug for FirestoreStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreStore")
            .field("documents_url", &self.documents_url.as_str())
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl FirestoreStore {
    /// Build a store from the service configuration.
    pub fn new(config: &Config) -> Result<Self, StoreError> {
        Self::with_options(
            &config.store_url,
            &config.store_project,
            config.store_token.clone(),
            config.store_timeout,
        )
    }

    /// Build a store for an explicit base URL and project.
    ///
    /// `timeout` bounds each individual request, including the body read.
    pub fn with_options(
        base_url: &str,
        project: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let mut documents_url = Url::parse(base_url)
            .map_err(|e| StoreError::Unavailable(format!("invalid store URL {base_url}: {e}")))?;
        documents_url
            .path_segments_mut()
            .map_err(|()| StoreError::Unavailable(format!("store URL {base_url} cannot be a base")))?
            .pop_if_empty()
            .extend(["projects", project, "databases", "(default)", "documents"]);

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            documents_url,
            token,
        })
    }

    fn document_url(&self, collection: &str, id: &str) -> Url {
        let mut url = self.documents_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.extend([collection, id]);
        }
        url
    }

    async fn fetch(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let mut request = self.client.get(self.document_url(collection, id));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StoreError::Status {
                status,
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        let body = response.text().await?;
        parse_document(id, &body).map(Some)
    }
}

impl DocumentStore for FirestoreStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        match self.fetch(collection, id).await {
            Err(err) if err.is_transient() => {
                tracing::warn!(
                    collection = %collection,
                    id = %id,
                    error = %err,
                    "transient store error, retrying once"
                );
                self.fetch(collection, id).await
            }
            result => result,
        }
    }
}

/// Decode a REST document body, keeping only string fields.
fn parse_document(requested_id: &str, body: &str) -> Result<Document, StoreError> {
    let raw: RawDocument = serde_json::from_str(body)?;

    let id = raw
        .name
        .as_deref()
        .and_then(|name| name.rsplit('/').next())
        .filter(|id| !id.is_empty())
        .unwrap_or(requested_id)
        .to_string();

    let fields = raw
        .fields
        .into_iter()
        .filter_map(|(name, value)| value.string_value.map(|v| (name, v)))
        .collect();

    Ok(Document { id, fields })
}
