//! In-memory, per-session document store.
//!
//! This module provides `DocumentStore`, the process-wide owner of every
//! uploaded document:
//! - One coarse `parking_lot::Mutex` guards the session map; every operation
//!   is atomic with respect to the others
//! - Transforms run outside the lock via [`DocumentStore::transform`]
//! - Sessions older than the configured TTL are swept on session creation

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info};

use super::config::StoreConfig;
use super::model::{DocumentId, DocumentRecord, SessionId, SessionRecord};
use crate::document::AnimationDocument;
use crate::error::LottieResult;

/// Counts reported by [`DocumentStore::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub sessions: usize,
    pub documents: usize,
}

/// Session-scoped document registry.
///
/// Construct once at startup and share by reference (e.g. `Arc<DocumentStore>`).
/// Lookups hand out clones; a miss is `None`, never an error.
pub struct DocumentStore {
    sessions: Mutex<HashMap<SessionId, SessionRecord>>,
    config: StoreConfig,
}

impl DocumentStore {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Creates an empty store with the default 24h session TTL.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // =========================================================================
    // SESSIONS
    // =========================================================================

    /// Allocates a new session and sweeps expired ones.
    pub fn create_session(&self) -> SessionId {
        self.create_session_at(Utc::now())
    }

    fn create_session_at(&self, now: DateTime<Utc>) -> SessionId {
        let id = SessionId::new();

        let mut sessions = self.sessions.lock();
        sessions.insert(id, SessionRecord::new(id, now));
        let evicted = self.sweep(&mut sessions, now);
        drop(sessions);

        info!(session = %id, evicted, "Created session");
        id
    }

    /// Returns `session` if it is live, otherwise a newly created session.
    pub fn get_or_create_session(&self, session: Option<&SessionId>) -> SessionId {
        match session {
            Some(id) if self.session_exists(id) => *id,
            _ => self.create_session(),
        }
    }

    pub fn session_exists(&self, session: &SessionId) -> bool {
        self.sessions.lock().contains_key(session)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    // =========================================================================
    // DOCUMENTS
    // =========================================================================

    /// Inserts or overwrites a document. The session is created if it has
    /// expired or never existed.
    pub fn put_document(&self, session: &SessionId, record: DocumentRecord) {
        let document_id = record.id.clone();
        let mut sessions = self.sessions.lock();
        let entry = sessions
            .entry(*session)
            .or_insert_with(|| SessionRecord::new(*session, Utc::now()));
        entry.documents.insert(document_id.clone(), record);
        let total = entry.len();
        drop(sessions);

        debug!(session = %session, document = %document_id, total, "Added document");
    }

    /// Returns a copy of the stored record.
    pub fn get_document(
        &self,
        session: &SessionId,
        document: &DocumentId,
    ) -> Option<DocumentRecord> {
        let found = self
            .sessions
            .lock()
            .get(session)
            .and_then(|s| s.documents.get(document))
            .cloned();
        debug!(
            session = %session,
            document = %document,
            found = found.is_some(),
            "Looked up document"
        );
        found
    }

    /// Swaps in a new document body, keeping id, name, metadata snapshot and
    /// creation time. Returns `false` (and does nothing) when absent.
    pub fn replace_document(
        &self,
        session: &SessionId,
        document: &DocumentId,
        new_document: AnimationDocument,
    ) -> bool {
        let mut sessions = self.sessions.lock();
        match sessions
            .get_mut(session)
            .and_then(|s| s.documents.get_mut(document))
        {
            Some(record) => {
                record.document = new_document;
                true
            }
            None => false,
        }
    }

    /// All records of a session, in no particular order. Unknown sessions
    /// yield an empty list.
    pub fn list_documents(&self, session: &SessionId) -> Vec<DocumentRecord> {
        self.sessions
            .lock()
            .get(session)
            .map(|s| s.documents.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn remove_document(
        &self,
        session: &SessionId,
        document: &DocumentId,
    ) -> Option<DocumentRecord> {
        self.sessions
            .lock()
            .get_mut(session)
            .and_then(|s| s.documents.remove(document))
    }

    /// Runs `f` on a copy of the stored document without holding the lock,
    /// then stores the rewritten document.
    ///
    /// Returns `Ok(None)` if the document does not exist. Errors from `f`
    /// leave the stored document unchanged.
    pub fn transform<T, F>(
        &self,
        session: &SessionId,
        document: &DocumentId,
        f: F,
    ) -> LottieResult<Option<T>>
    where
        F: FnOnce(&AnimationDocument) -> LottieResult<(AnimationDocument, T)>,
    {
        let Some(record) = self.get_document(session, document) else {
            return Ok(None);
        };
        let (updated, output) = f(&record.document)?;
        self.replace_document(session, document, updated);
        Ok(Some(output))
    }

    // =========================================================================
    // EVICTION
    // =========================================================================

    /// Removes every session older than the TTL. Returns how many were removed.
    pub fn evict_expired(&self) -> usize {
        self.evict_expired_at(Utc::now())
    }

    /// Same as [`evict_expired`](Self::evict_expired) against an explicit clock.
    pub fn evict_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.lock();
        self.sweep(&mut sessions, now)
    }

    fn sweep(&self, sessions: &mut HashMap<SessionId, SessionRecord>, now: DateTime<Utc>) -> usize {
        let ttl = self.config.session_ttl();
        let before = sessions.len();
        sessions.retain(|id, session| {
            let expired = session.is_expired(now, ttl);
            if expired {
                info!(session = %id, documents = session.len(), "Evicted expired session");
            }
            !expired
        });
        before - sessions.len()
    }

    // =========================================================================
    // DIAGNOSTICS
    // =========================================================================

    /// Session and document totals; per-session counts go to the debug log.
    pub fn stats(&self) -> StoreStats {
        let sessions = self.sessions.lock();
        let mut documents = 0;
        for (id, session) in sessions.iter() {
            debug!(session = %id, documents = session.len(), "Session");
            documents += session.len();
        }
        StoreStats {
            sessions: sessions.len(),
            documents,
        }
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Layer;
    use crate::error::LottieError;
    use chrono::Duration;
    use std::sync::Arc;
    use std::thread;

    fn record(id: &str) -> DocumentRecord {
        DocumentRecord::new(
            id,
            format!("{}.json", id),
            AnimationDocument::new(100, 100, 30.0, 0.0, 60.0).with_layer(Layer::new("a")),
        )
    }

    #[test]
    fn test_new_store() {
        let store = DocumentStore::new();
        assert_eq!(store.session_count(), 0);
        assert_eq!(store.stats(), StoreStats { sessions: 0, documents: 0 });
    }

    #[test]
    fn test_create_session() {
        let store = DocumentStore::new();
        let id = store.create_session();
        assert!(store.session_exists(&id));
        assert!(store.list_documents(&id).is_empty());
    }

    #[test]
    fn test_get_or_create_session() {
        let store = DocumentStore::new();
        let id = store.create_session();
        assert_eq!(store.get_or_create_session(Some(&id)), id);

        let unknown = SessionId::new();
        let fresh = store.get_or_create_session(Some(&unknown));
        assert_ne!(fresh, unknown);
        assert!(store.session_exists(&fresh));

        let from_none = store.get_or_create_session(None);
        assert!(store.session_exists(&from_none));
        assert_eq!(store.session_count(), 3);
    }

    #[test]
    fn test_put_and_get() {
        let store = DocumentStore::new();
        let session = store.create_session();
        store.put_document(&session, record("doc-1"));

        let found = store.get_document(&session, &"doc-1".into()).unwrap();
        assert_eq!(found.display_name, "doc-1.json");
        assert_eq!(found.metadata.layer_count, 1);
        assert!(store.get_document(&session, &"missing".into()).is_none());
    }

    #[test]
    fn test_put_creates_missing_session() {
        let store = DocumentStore::new();
        let session = SessionId::new();
        store.put_document(&session, record("doc-1"));
        assert!(store.session_exists(&session));
        assert_eq!(store.list_documents(&session).len(), 1);
    }

    #[test]
    fn test_put_overwrites() {
        let store = DocumentStore::new();
        let session = store.create_session();
        store.put_document(&session, record("doc-1"));
        let mut second = record("doc-1");
        second.display_name = "renamed.json".to_string();
        store.put_document(&session, second);

        let docs = store.list_documents(&session);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].display_name, "renamed.json");
    }

    #[test]
    fn test_replace_keeps_other_fields() {
        let store = DocumentStore::new();
        let session = store.create_session();
        let original = record("doc-1");
        let created_at = original.created_at;
        store.put_document(&session, original);

        let replacement = AnimationDocument::new(1, 1, 1.0, 0.0, 1.0);
        assert!(store.replace_document(&session, &"doc-1".into(), replacement.clone()));

        let found = store.get_document(&session, &"doc-1".into()).unwrap();
        assert_eq!(found.document, replacement);
        assert_eq!(found.display_name, "doc-1.json");
        assert_eq!(found.created_at, created_at);
        assert_eq!(found.metadata.width, 100);
    }

    #[test]
    fn test_replace_missing_is_noop() {
        let store = DocumentStore::new();
        let session = store.create_session();
        assert!(!store.replace_document(&session, &"nope".into(), AnimationDocument::default()));
        assert!(!store.replace_document(
            &SessionId::new(),
            &"nope".into(),
            AnimationDocument::default()
        ));
        assert!(store.list_documents(&session).is_empty());
    }

    #[test]
    fn test_list_unknown_session_is_empty() {
        let store = DocumentStore::new();
        assert!(store.list_documents(&SessionId::new()).is_empty());
    }

    #[test]
    fn test_session_isolation() {
        let store = DocumentStore::new();
        let s1 = store.create_session();
        let s2 = store.create_session();
        store.put_document(&s1, record("shared-id"));
        let mut other = record("shared-id");
        other.display_name = "other.json".to_string();
        store.put_document(&s2, other);
        store.put_document(&s1, record("only-s1"));

        let s1_names: Vec<String> = store
            .list_documents(&s1)
            .into_iter()
            .map(|r| r.display_name)
            .collect();
        let s2_docs = store.list_documents(&s2);
        assert_eq!(s1_names.len(), 2);
        assert!(!s1_names.contains(&"other.json".to_string()));
        assert_eq!(s2_docs.len(), 1);
        assert_eq!(s2_docs[0].display_name, "other.json");
        assert!(store.get_document(&s2, &"only-s1".into()).is_none());
    }

    #[test]
    fn test_remove_document() {
        let store = DocumentStore::new();
        let session = store.create_session();
        store.put_document(&session, record("doc-1"));
        assert!(store.remove_document(&session, &"doc-1".into()).is_some());
        assert!(store.get_document(&session, &"doc-1".into()).is_none());
        assert!(store.remove_document(&session, &"doc-1".into()).is_none());
    }

    #[test]
    fn test_transform_replaces_document() {
        let store = DocumentStore::new();
        let session = store.create_session();
        store.put_document(&session, record("doc-1"));

        let layers = store
            .transform(&session, &"doc-1".into(), |doc| {
                let mut updated = doc.clone();
                updated.layers.push(Layer::new("b"));
                let count = updated.layers.len();
                Ok((updated, count))
            })
            .unwrap();
        assert_eq!(layers, Some(2));
        let found = store.get_document(&session, &"doc-1".into()).unwrap();
        assert_eq!(found.document.layers.len(), 2);
    }

    #[test]
    fn test_transform_missing_and_failing() {
        let store = DocumentStore::new();
        let session = store.create_session();
        let missing = store
            .transform(&session, &"nope".into(), |doc| Ok((doc.clone(), ())))
            .unwrap();
        assert!(missing.is_none());

        store.put_document(&session, record("doc-1"));
        let result: LottieResult<Option<()>> =
            store.transform(&session, &"doc-1".into(), |_| Err(LottieError::EmptyPalette));
        assert!(matches!(result, Err(LottieError::EmptyPalette)));
        let found = store.get_document(&session, &"doc-1".into()).unwrap();
        assert_eq!(found.document.layers.len(), 1);
    }

    #[test]
    fn test_create_session_sweeps_expired() {
        let store = DocumentStore::new();
        let start = Utc::now();
        let old = store.create_session_at(start);
        store.put_document(&old, record("doc-1"));
        let recent = store.create_session_at(start + Duration::hours(2));

        let fresh = store.create_session_at(start + Duration::hours(25));
        assert!(!store.session_exists(&old));
        assert!(store.get_document(&old, &"doc-1".into()).is_none());
        assert!(store.session_exists(&recent));
        assert!(store.session_exists(&fresh));
        assert_eq!(store.session_count(), 2);
    }

    #[test]
    fn test_evict_expired() {
        let store = DocumentStore::new();
        let session = store.create_session();
        store.put_document(&session, record("doc-1"));

        assert_eq!(store.evict_expired(), 0);
        assert_eq!(store.evict_expired_at(Utc::now() + Duration::hours(23)), 0);
        assert!(store.session_exists(&session));

        assert_eq!(store.evict_expired_at(Utc::now() + Duration::hours(25)), 1);
        assert!(!store.session_exists(&session));
        assert!(store.get_document(&session, &"doc-1".into()).is_none());
    }

    #[test]
    fn test_custom_ttl() {
        let store = DocumentStore::with_config(StoreConfig::default().with_session_ttl_secs(60));
        let session = store.create_session();
        assert_eq!(store.evict_expired_at(Utc::now() + Duration::seconds(61)), 1);
        assert!(!store.session_exists(&session));
    }

    #[test]
    fn test_stats() {
        let store = DocumentStore::new();
        let s1 = store.create_session();
        let s2 = store.create_session();
        store.put_document(&s1, record("a"));
        store.put_document(&s1, record("b"));
        store.put_document(&s2, record("a"));
        assert_eq!(store.stats(), StoreStats { sessions: 2, documents: 3 });
    }

    #[test]
    fn test_concurrent_sessions() {
        let store = Arc::new(DocumentStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let session = store.create_session();
                    for i in 0..25 {
                        store.put_document(&session, record(&format!("doc-{}-{}", t, i)));
                    }
                    session
                })
            })
            .collect();

        let sessions: Vec<SessionId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for session in &sessions {
            assert_eq!(store.list_documents(session).len(), 25);
        }
        assert_eq!(store.stats(), StoreStats { sessions: 8, documents: 200 });
    }
}
