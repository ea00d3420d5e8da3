//! Data models for Lottie animation documents.
//!
//! Only the fields the editing engine reads or rewrites are typed. Everything
//! else is kept in a flattened `extra` map on each record and serialized back
//! untouched, so documents round-trip without losing unknown keys.

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};
use tracing::warn;

use super::color::Rgb;
use crate::error::LottieResult;

/// Pass-through storage for keys the engine does not interpret.
pub type Extra = Map<String, Value>;

// =============================================================================
// DOCUMENT ROOT
// =============================================================================

/// Root of a Lottie animation document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnimationDocument {
    /// First frame of the animation.
    #[serde(rename = "ip", default, serialize_with = "frame_number")]
    pub in_point: f64,

    /// Frame at which the animation ends.
    #[serde(rename = "op", default, serialize_with = "frame_number")]
    pub out_point: f64,

    /// Canvas width in pixels.
    #[serde(rename = "w", default, deserialize_with = "dimension")]
    pub width: u32,

    /// Canvas height in pixels.
    #[serde(rename = "h", default, deserialize_with = "dimension")]
    pub height: u32,

    /// Frames per second.
    #[serde(rename = "fr", default, serialize_with = "frame_number")]
    pub frame_rate: f64,

    /// Top-level layers. Order is z-order.
    #[serde(default)]
    pub layers: Vec<Layer>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl AnimationDocument {
    /// Creates an empty document with the given canvas and timing.
    pub fn new(width: u32, height: u32, frame_rate: f64, in_point: f64, out_point: f64) -> Self {
        Self {
            in_point,
            out_point,
            width,
            height,
            frame_rate,
            layers: Vec::new(),
            extra: Extra::new(),
        }
    }

    /// Builder: Append a top-level layer.
    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Parses a document from JSON text.
    ///
    /// JSON nesting is capped at 128 levels by the parser, which allows
    /// roughly 60 levels of nested layers. Deeper input fails with
    /// `Serialization` rather than exhausting the stack.
    pub fn from_json_str(json: &str) -> LottieResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a document from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> LottieResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Converts an already-parsed JSON value into a document.
    pub fn from_value(value: Value) -> LottieResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Compact JSON serialization.
    pub fn to_json_string(&self) -> LottieResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON serialization, as used for exports.
    pub fn to_json_pretty(&self) -> LottieResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Converts the document into a generic JSON value.
    pub fn to_value(&self) -> LottieResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Length in bytes of the compact JSON serialization.
    ///
    /// Measured one layer at a time: each layer is serialized with an empty
    /// `layers` list, and every list of `n` children adds `n - 1` commas.
    pub fn serialized_len(&self) -> LottieResult<usize> {
        let root = Self {
            in_point: self.in_point,
            out_point: self.out_point,
            width: self.width,
            height: self.height,
            frame_rate: self.frame_rate,
            layers: Vec::new(),
            extra: self.extra.clone(),
        };
        let mut len = serde_json::to_vec(&root)?.len() + separators(self.layers.len());
        for layer in self.iter_layers() {
            len += serde_json::to_vec(&layer.without_children())?.len()
                + separators(layer.child_count());
        }
        Ok(len)
    }

    /// Number of top-level layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Iterates over every layer in depth-first pre-order.
    pub fn iter_layers(&self) -> LayerIter<'_> {
        LayerIter {
            stack: self.layers.iter().rev().collect(),
        }
    }
}

fn separators(items: usize) -> usize {
    items.saturating_sub(1)
}

/// Frame numbers and rates are written back as integers when integral.
fn frame_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() < MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Canvas sizes are integers in the format, but some exporters write `512.0`.
fn dimension<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() || raw < 0.0 || raw > f64::from(u32::MAX) {
        return Err(D::Error::custom(format!("invalid canvas dimension: {}", raw)));
    }
    Ok(raw.round() as u32)
}

/// Pre-order iterator over a layer tree.
pub struct LayerIter<'a> {
    stack: Vec<&'a Layer>,
}

impl<'a> Iterator for LayerIter<'a> {
    type Item = &'a Layer;

    fn next(&mut self) -> Option<Self::Item> {
        let layer = self.stack.pop()?;
        if let Some(children) = &layer.layers {
            self.stack.extend(children.iter().rev());
        }
        Some(layer)
    }
}

// =============================================================================
// LAYER
// =============================================================================

/// Layer kind. The numeric code from the file is preserved as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum LayerType {
    Precomposition,
    Image,
    Shape,
    Other(i64),
}

impl From<i64> for LayerType {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Precomposition,
            2 => Self::Image,
            4 => Self::Shape,
            other => Self::Other(other),
        }
    }
}

impl From<LayerType> for i64 {
    fn from(kind: LayerType) -> Self {
        match kind {
            LayerType::Precomposition => 0,
            LayerType::Image => 2,
            LayerType::Shape => 4,
            LayerType::Other(code) => code,
        }
    }
}

/// A node in the layer tree.
///
/// Names are not unique. Shape layers carry `shapes`; group and
/// precomposition layers may carry nested `layers`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Layer {
    #[serde(rename = "nm", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "ty", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<LayerType>,

    #[serde(rename = "hd", default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,

    /// Transform block; opacity lives at `ks.o`.
    #[serde(rename = "ks", default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<LayerTransform>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shapes: Option<Vec<ShapeNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<Layer>>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl Layer {
    /// Creates a layer with the given name and no content.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Creates a shape layer carrying the given shape nodes.
    pub fn shape_layer(name: impl Into<String>, shapes: Vec<ShapeNode>) -> Self {
        Self {
            kind: Some(LayerType::Shape),
            shapes: Some(shapes),
            ..Self::new(name)
        }
    }

    /// Builder: Set the hidden flag.
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    /// Builder: Set the layer kind.
    pub fn with_kind(mut self, kind: LayerType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Builder: Append a nested layer.
    pub fn with_child(mut self, child: Layer) -> Self {
        self.layers.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Builder: Set a static opacity in [0, 1].
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.set_opacity(opacity);
        self
    }

    /// Layer name, or `""` if absent.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }

    /// Static opacity in [0, 1]. `None` when absent or animated.
    pub fn opacity(&self) -> Option<f64> {
        let property = self.transform.as_ref()?.opacity.as_ref()?;
        if property.is_animated() {
            return None;
        }
        property.value.as_f64().map(|percent| percent / 100.0)
    }

    /// Overwrites the opacity with a static value, creating `ks.o` if needed.
    ///
    /// The file stores opacity as a percentage; `opacity` is clamped to [0, 1].
    /// Non-finite values are ignored.
    pub fn set_opacity(&mut self, opacity: f64) {
        if !opacity.is_finite() {
            warn!(layer = self.name(), opacity, "Ignoring non-finite opacity");
            return;
        }
        let percent = opacity.clamp(0.0, 1.0) * 100.0;
        let transform = self.transform.get_or_insert_with(LayerTransform::default);
        match transform.opacity.as_mut() {
            Some(property) => property.set_static(json!(percent)),
            None => transform.opacity = Some(AnimatedProperty::fixed(json!(percent))),
        }
    }

    /// Number of nested layers directly under this one.
    pub fn child_count(&self) -> usize {
        self.layers.as_ref().map_or(0, Vec::len)
    }

    /// Copy of this layer with its nested layers dropped. A present
    /// `layers` list stays present, but empty.
    fn without_children(&self) -> Layer {
        Layer {
            name: self.name.clone(),
            kind: self.kind,
            hidden: self.hidden,
            transform: self.transform.clone(),
            shapes: self.shapes.clone(),
            layers: self.layers.as_ref().map(|_| Vec::new()),
            extra: self.extra.clone(),
        }
    }
}

/// Layer transform block (`ks`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LayerTransform {
    #[serde(rename = "o", default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<AnimatedProperty>,

    #[serde(flatten)]
    pub extra: Extra,
}

// =============================================================================
// ANIMATED PROPERTY
// =============================================================================

/// A possibly-animated property: `{ "a": 0|1, "k": value-or-keyframes }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnimatedProperty {
    #[serde(rename = "a", default, skip_serializing_if = "Option::is_none")]
    pub animated: Option<u8>,

    #[serde(rename = "k", default)]
    pub value: Value,

    #[serde(flatten)]
    pub extra: Extra,
}

impl AnimatedProperty {
    /// A static property holding `value`.
    pub fn fixed(value: Value) -> Self {
        Self {
            animated: Some(0),
            value,
            extra: Extra::new(),
        }
    }

    pub fn is_animated(&self) -> bool {
        self.animated == Some(1)
    }

    /// Replaces the value with a static one, keeping any other keys (`ix`, ...).
    pub fn set_static(&mut self, value: Value) {
        self.animated = Some(0);
        self.value = value;
    }
}

// =============================================================================
// SHAPE NODE
// =============================================================================

/// Shape kinds the engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Fill,
    Stroke,
    Group,
    Other,
}

/// An element of a layer's shape tree.
///
/// Fill (`fl`) and stroke (`st`) carry a color at `c`; any node with an `it`
/// list is treated as a group and walked recursively.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShapeNode {
    #[serde(rename = "ty", default, skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<String>,

    #[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
    pub color: Option<AnimatedProperty>,

    #[serde(rename = "it", default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ShapeNode>>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl ShapeNode {
    fn typed(shape_type: &str) -> Self {
        Self {
            shape_type: Some(shape_type.to_string()),
            ..Self::default()
        }
    }

    /// A fill with a static color.
    pub fn fill(color: Rgb) -> Self {
        let mut node = Self::typed("fl");
        node.set_color(color);
        node
    }

    /// A stroke with a static color.
    pub fn stroke(color: Rgb) -> Self {
        let mut node = Self::typed("st");
        node.set_color(color);
        node
    }

    /// A group containing `items`.
    pub fn group(items: Vec<ShapeNode>) -> Self {
        Self {
            items: Some(items),
            ..Self::typed("gr")
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self.shape_type.as_deref() {
            Some("fl") => ShapeKind::Fill,
            Some("st") => ShapeKind::Stroke,
            _ if self.items.is_some() => ShapeKind::Group,
            Some("gr") => ShapeKind::Group,
            _ => ShapeKind::Other,
        }
    }

    /// Static color of a fill/stroke, ignoring alpha.
    pub fn color(&self) -> Option<Rgb> {
        let property = self.color.as_ref()?;
        if property.is_animated() {
            return None;
        }
        let components = property.value.as_array()?;
        match components.as_slice() {
            [r, g, b, ..] => Some(Rgb::new(r.as_f64()?, g.as_f64()?, b.as_f64()?)),
            _ => None,
        }
    }

    /// Writes a static color.
    ///
    /// A static `[r, g, b]` stays three components; otherwise the existing
    /// alpha is kept, defaulting to 1. Colors with a non-finite component
    /// are ignored.
    pub fn set_color(&mut self, color: Rgb) {
        if ![color.r, color.g, color.b].iter().all(|c| c.is_finite()) {
            warn!(?color, "Ignoring non-finite color");
            return;
        }
        let existing = self
            .color
            .as_ref()
            .filter(|property| !property.is_animated())
            .and_then(|property| property.value.as_array());

        let value = match existing.map(Vec::as_slice) {
            Some([_, _, _]) => json!([color.r, color.g, color.b]),
            Some([_, _, _, alpha, ..]) => {
                json!([color.r, color.g, color.b, alpha.as_f64().unwrap_or(1.0)])
            }
            _ => json!([color.r, color.g, color.b, 1.0]),
        };

        match self.color.as_mut() {
            Some(property) => property.set_static(value),
            None => self.color = Some(AnimatedProperty::fixed(value)),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
