//! Client interface for the 5e rules catalog.
//!
//! The catalog resolves named game entities (classes, subclasses, spells,
//! items, backgrounds) identified by `(name, source)` to structured rule data.
//! This crate provides:
//! - The [`Catalog`] trait the mechanics engine consumes
//! - [`HttpCatalog`], a client for a catalog service over HTTP
//! - [`MemoryCatalog`], an in-process catalog for embedding and offline use

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Catalog error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse catalog record: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// The kind of entity being looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Class,
    Subclass,
    Spell,
    Item,
    Background,
}

impl EntityKind {
    /// Path segment used by the catalog service for this kind.
    pub fn segment(&self) -> &'static str {
        match self {
            EntityKind::Class => "classes",
            EntityKind::Subclass => "subclasses",
            EntityKind::Spell => "spells",
            EntityKind::Item => "items",
            EntityKind::Background => "backgrounds",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Class => "class",
            EntityKind::Subclass => "subclass",
            EntityKind::Spell => "spell",
            EntityKind::Item => "item",
            EntityKind::Background => "background",
        };
        write!(f, "{name}")
    }
}

/// A source of structured rule data.
///
/// `Ok(None)` means the catalog answered and has no such entity. `Err` means
/// the catalog could not answer.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn lookup(
        &self,
        kind: EntityKind,
        name: &str,
        source: &str,
    ) -> Result<Option<serde_json::Value>, Error>;
}

// ============================================================================
// HTTP client
// ============================================================================

/// Catalog service client.
///
/// Entities are fetched from `GET {base_url}/{kind}/{source}/{name}`.
#[derive(Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    /// Create a new client for the catalog service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            base_url: base_url.into(),
        }
    }

    /// Create a client from the CATALOG_URL environment variable.
    pub fn from_env() -> Result<Self, Error> {
        let base_url = std::env::var("CATALOG_URL")
            .map_err(|_| Error::Config("CATALOG_URL not set".to_string()))?;
        Ok(Self::new(base_url))
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn entity_url(&self, kind: EntityKind, name: &str, source: &str) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid catalog URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Catalog URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend([kind.segment(), source, name]);
        Ok(url)
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn lookup(
        &self,
        kind: EntityKind,
        name: &str,
        source: &str,
    ) -> Result<Option<serde_json::Value>, Error> {
        let url = self.entity_url(kind, name, source)?;
        tracing::debug!(%kind, name, source, %url, "catalog request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                message: body,
            });
        }

        let value = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;
        Ok(Some(value))
    }
}

// ============================================================================
// In-memory catalog
// ============================================================================

/// An in-process catalog backed by a map.
///
/// Names and sources match case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    entries: HashMap<(EntityKind, String, String), serde_json::Value>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity record.
    pub fn with_entry(
        mut self,
        kind: EntityKind,
        name: &str,
        source: &str,
        record: serde_json::Value,
    ) -> Self {
        self.entries.insert(Self::key(kind, name, source), record);
        self
    }

    /// Load every record in a 5etools-style array (`[{ "name", "source", ... }]`).
    pub fn with_records(
        mut self,
        kind: EntityKind,
        records: &serde_json::Value,
    ) -> Result<Self, Error> {
        let array = records
            .as_array()
            .ok_or_else(|| Error::Parse(format!("expected an array of {kind} records")))?;
        for record in array {
            let name = record.get("name").and_then(|v| v.as_str());
            let source = record.get("source").and_then(|v| v.as_str());
            match (name, source) {
                (Some(name), Some(source)) => {
                    self.entries
                        .insert(Self::key(kind, name, source), record.clone());
                }
                _ => return Err(Error::Parse(format!("{kind} record without name/source"))),
            }
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key(kind: EntityKind, name: &str, source: &str) -> (EntityKind, String, String) {
        (kind, name.to_lowercase(), source.to_lowercase())
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn lookup(
        &self,
        kind: EntityKind,
        name: &str,
        source: &str,
    ) -> Result<Option<serde_json::Value>, Error> {
        Ok(self.entries.get(&Self::key(kind, name, source)).cloned())
    }
}
