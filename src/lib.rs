//! LottieKit - session-scoped editing engine for Lottie vector animations.
//!
//! Two subsystems do the work:
//!
//! - **Transform engine** ([`transform`]): pure tree rewrites over an
//!   [`AnimationDocument`] (palette application, per-layer property
//!   overrides, size optimization). Inputs are never mutated.
//! - **Document store** ([`store`]): an in-memory registry of uploaded
//!   documents keyed by session and document id, with time-based eviction.
//!
//! # Example
//!
//! ```rust
//! use lottiekit::{
//!     apply_palette, optimize, AnimationDocument, DocumentRecord, DocumentStore, Layer,
//!     LayerSelector, Palette, Rgb, ShapeNode,
//! };
//!
//! let store = DocumentStore::new();
//! let session = store.create_session();
//!
//! let doc = AnimationDocument::new(512, 512, 24.0, 0.0, 48.0)
//!     .with_layer(Layer::shape_layer("logo", vec![ShapeNode::fill(Rgb::BLACK)]));
//! store.put_document(&session, DocumentRecord::new("logo", "logo.json", doc));
//!
//! // Transforms run on a copy outside the store lock.
//! let palette = Palette::from_hex(["#FF0000"]).unwrap();
//! store
//!     .transform(&session, &"logo".into(), |doc| {
//!         Ok((apply_palette(doc, palette.colors(), &LayerSelector::All)?, ()))
//!     })
//!     .unwrap();
//!
//! let stats = store
//!     .transform(&session, &"logo".into(), |doc| {
//!         let outcome = optimize(doc)?;
//!         Ok((outcome.document, outcome.stats))
//!     })
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(stats.layers_after, 1);
//! ```

pub mod document;
pub mod error;
pub mod store;
pub mod transform;

// Re-exports for convenience
pub use document::{
    extract_metadata, normalize_hex, AnimationDocument, DocumentMetadata, Layer, LayerSelector,
    LayerType, Palette, Rgb, ShapeKind, ShapeNode,
};
pub use error::{LottieError, LottieResult};
pub use store::{
    run_batch, BatchItemResult, BatchOperation, BatchStatus, DocumentId, DocumentRecord,
    DocumentStore, SessionId, StoreConfig, StoreStats,
};
pub use transform::{
    apply_palette, optimize, update_layer_properties, LayerProperties, OptimizeOutcome,
    OptimizeStats,
};
