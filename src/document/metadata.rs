//! Summary statistics derived from a document.

use serde::{Deserialize, Serialize};

use super::model::AnimationDocument;

/// Timing and canvas summary of a document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// `outPoint - inPoint`.
    pub duration_frames: f64,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    /// Top-level layers only.
    pub layer_count: usize,
}

impl DocumentMetadata {
    /// Duration in seconds, or `None` when the frame rate is not positive.
    pub fn duration_seconds(&self) -> Option<f64> {
        (self.frame_rate > 0.0).then(|| self.duration_frames / self.frame_rate)
    }
}

/// Extracts metadata. Never fails; missing fields come through as zero.
pub fn extract_metadata(doc: &AnimationDocument) -> DocumentMetadata {
    DocumentMetadata {
        duration_frames: doc.out_point - doc.in_point,
        width: doc.width,
        height: doc.height,
        frame_rate: doc.frame_rate,
        layer_count: doc.layer_count(),
    }
}
