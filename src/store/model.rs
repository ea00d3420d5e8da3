//! Records held by the document store.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::{extract_metadata, AnimationDocument, DocumentMetadata};
use crate::error::{LottieError, LottieResult};

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Unguessable session identifier (random UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Allocates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a caller-supplied identifier (e.g. from a cookie).
    pub fn parse(s: &str) -> LottieResult<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| LottieError::invalid_uuid(s))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SessionId {
    type Err = LottieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Opaque document identifier, unique within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a random identifier, as done for fresh uploads.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// =============================================================================
// DOCUMENT RECORD
// =============================================================================

/// A stored document plus its upload-time metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub display_name: String,
    #[serde(skip)]
    pub document: AnimationDocument,
    /// Snapshot taken when the record was created.
    pub metadata: DocumentMetadata,
    pub created_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Creates a record, computing its metadata snapshot.
    pub fn new(
        id: impl Into<DocumentId>,
        display_name: impl Into<String>,
        document: AnimationDocument,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            metadata: extract_metadata(&document),
            document,
            created_at: Utc::now(),
        }
    }

    /// Pretty-printed JSON of the current document.
    pub fn export_json(&self) -> LottieResult<String> {
        self.document.to_json_pretty()
    }

    /// File name to offer for a download: the display name, with `.json`
    /// appended when missing.
    pub fn export_file_name(&self) -> String {
        let name = self.display_name.trim();
        let name = if name.is_empty() { self.id.as_str() } else { name };
        if name.to_ascii_lowercase().ends_with(".json") {
            name.to_string()
        } else {
            format!("{}.json", name)
        }
    }
}

// =============================================================================
// SESSION RECORD
// =============================================================================

/// One user's isolation boundary.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub documents: HashMap<DocumentId, DocumentRecord>,
}

impl SessionRecord {
    pub fn new(id: SessionId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            documents: HashMap::new(),
        }
    }

    /// True once the session is strictly older than `ttl` at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at > ttl
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
