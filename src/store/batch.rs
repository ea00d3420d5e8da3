//! Batch operations over several documents of one session.
//!
//! Each document is processed independently; one failure does not stop the
//! rest of the batch.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::manager::DocumentStore;
use super::model::{DocumentId, SessionId};
use crate::document::{LayerSelector, Palette};
use crate::error::{LottieError, LottieResult};
use crate::transform::{apply_palette, optimize, OptimizeStats};

/// Operation applied to every document in a batch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum BatchOperation {
    Optimize,
    /// Palette applied to every layer.
    ApplyPalette { palette: Palette },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Success,
    Error,
}

/// Outcome for a single document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemResult {
    pub document_id: DocumentId,
    pub status: BatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub stats: Option<OptimizeStats>,
}

impl BatchItemResult {
    fn success(document_id: DocumentId, message: Option<String>, stats: Option<OptimizeStats>) -> Self {
        Self {
            document_id,
            status: BatchStatus::Success,
            message,
            stats,
        }
    }

    fn error(document_id: DocumentId, err: &LottieError) -> Self {
        Self {
            document_id,
            status: BatchStatus::Error,
            message: Some(err.to_string()),
            stats: None,
        }
    }
}

/// Applies `operation` to each listed document and reports per-document results.
pub fn run_batch(
    store: &DocumentStore,
    session: &SessionId,
    documents: &[DocumentId],
    operation: &BatchOperation,
) -> Vec<BatchItemResult> {
    documents
        .iter()
        .map(|id| match run_one(store, session, id, operation) {
            Ok(result) => result,
            Err(err) => {
                warn!(session = %session, document = %id, error = %err, "Batch item failed");
                BatchItemResult::error(id.clone(), &err)
            }
        })
        .collect()
}

fn run_one(
    store: &DocumentStore,
    session: &SessionId,
    id: &DocumentId,
    operation: &BatchOperation,
) -> LottieResult<BatchItemResult> {
    let outcome = match operation {
        BatchOperation::Optimize => store
            .transform(session, id, |doc| {
                let outcome = optimize(doc)?;
                Ok((outcome.document, outcome.stats))
            })?
            .map(|stats| BatchItemResult::success(id.clone(), None, Some(stats))),
        BatchOperation::ApplyPalette { palette } => store
            .transform(session, id, |doc| {
                let updated = apply_palette(doc, palette.colors(), &LayerSelector::All)?;
                Ok((updated, ()))
            })?
            .map(|()| BatchItemResult::success(id.clone(), Some("Palette applied".to_string()), None)),
    };
    outcome.ok_or_else(|| LottieError::document_not_found(id.as_str()))
}
