//! Per-layer property overrides.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{for_each_layer_mut, for_each_paint_mut};
use crate::document::{AnimationDocument, LayerSelector, Rgb, ShapeKind};

/// Property overrides. Unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayerProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Rgb>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<Rgb>,

    /// Static opacity in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl LayerProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: Set fill color.
    pub fn with_fill_color(mut self, color: Rgb) -> Self {
        self.fill_color = Some(color);
        self
    }

    /// Builder: Set stroke color.
    pub fn with_stroke_color(mut self, color: Rgb) -> Self {
        self.stroke_color = Some(color);
        self
    }

    /// Builder: Set opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fill_color.is_none() && self.stroke_color.is_none() && self.opacity.is_none()
    }
}

/// Applies `properties` to every layer matching `selector`, at any depth.
///
/// Fill and stroke colors reach every fill/stroke in the layer's shape tree.
/// Opacity overwrites the layer's `ks.o`, creating it if absent.
pub fn update_layer_properties(
    doc: &AnimationDocument,
    selector: &LayerSelector,
    properties: &LayerProperties,
) -> AnimationDocument {
    let mut updated = doc.clone();
    if properties.is_empty() {
        return updated;
    }

    let mut matched = 0usize;
    for_each_layer_mut(&mut updated.layers, |layer| {
        if !selector.matches(layer) {
            return;
        }
        matched += 1;

        if let Some(shapes) = layer.shapes.as_mut() {
            if properties.fill_color.is_some() || properties.stroke_color.is_some() {
                for_each_paint_mut(shapes, |shape| {
                    let color = match shape.kind() {
                        ShapeKind::Fill => properties.fill_color,
                        ShapeKind::Stroke => properties.stroke_color,
                        _ => None,
                    };
                    if let Some(color) = color {
                        shape.set_color(color);
                    }
                });
            }
        }

        if let Some(opacity) = properties.opacity {
            layer.set_opacity(opacity);
        }
    });

    debug!(matched, "Updated layer properties");
    updated
}
