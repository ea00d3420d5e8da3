//! Animation document module.
//!
//! Provides the Lottie document model, colors and palettes, layer selectors
//! and metadata extraction.

pub mod color;
pub mod metadata;
pub mod model;
pub mod selector;

// Re-exports for convenience
pub use color::{normalize_hex, Palette, Rgb};
pub use metadata::{extract_metadata, DocumentMetadata};
pub use model::{
    AnimatedProperty, AnimationDocument, Extra, Layer, LayerTransform, LayerType, ShapeKind,
    ShapeNode,
};
pub use selector::LayerSelector;
