//! Size-reducing optimization: hidden-layer pruning plus numeric quantization.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use tracing::info;

use super::for_each_layer_mut;
use crate::document::{AnimatedProperty, AnimationDocument, Extra, Layer, ShapeNode};
use crate::error::{LottieError, LottieResult};

/// Fractional digits kept by quantization.
pub const QUANTIZE_PRECISION: i32 = 2;

/// Size and layer statistics for one optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeStats {
    /// Top-level layers before pruning.
    pub layers_before: usize,
    /// Top-level layers after pruning.
    pub layers_after: usize,
    /// Compact JSON bytes of the input.
    pub original_size: usize,
    /// Compact JSON bytes of the output.
    pub optimized_size: usize,
    /// `(original - optimized) / original * 100`, two decimals.
    pub reduction_percent: f64,
}

/// Result of [`optimize`].
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeOutcome {
    pub document: AnimationDocument,
    pub stats: OptimizeStats,
}

/// Removes hidden layers at every depth, then rounds every floating-point
/// value inside the remaining layers to [`QUANTIZE_PRECISION`] digits.
///
/// Fails with `DegenerateDocument` if the input serializes to zero bytes.
pub fn optimize(doc: &AnimationDocument) -> LottieResult<OptimizeOutcome> {
    let original_size = doc.serialized_len()?;
    if original_size == 0 {
        return Err(LottieError::degenerate_document(
            "serialized size is zero, reduction is undefined",
        ));
    }

    let mut optimized = doc.clone();
    let layers_before = optimized.layers.len();
    prune_hidden(&mut optimized.layers);
    let layers_after = optimized.layers.len();

    quantize_layers(&mut optimized.layers);

    let optimized_size = optimized.serialized_len()?;
    let reduction = (original_size as f64 - optimized_size as f64) / original_size as f64 * 100.0;

    let stats = OptimizeStats {
        layers_before,
        layers_after,
        original_size,
        optimized_size,
        reduction_percent: round_to(reduction, 2),
    };
    info!(
        layers_before,
        layers_after,
        original_size,
        optimized_size,
        reduction_percent = stats.reduction_percent,
        "Optimized document"
    );

    Ok(OptimizeOutcome {
        document: optimized,
        stats,
    })
}

/// Drops every hidden layer. A hidden layer takes its whole subtree with it.
fn prune_hidden(layers: &mut Vec<Layer>) {
    let mut pending: Vec<&mut Vec<Layer>> = vec![layers];
    while let Some(level) = pending.pop() {
        level.retain(|layer| !layer.is_hidden());
        for layer in level {
            if let Some(children) = layer.layers.as_mut() {
                pending.push(children);
            }
        }
    }
}

/// Quantizes the layer tree in place: every pass-through map, every
/// property value and every shape node at any depth.
fn quantize_layers(layers: &mut [Layer]) {
    for_each_layer_mut(layers, |layer| {
        quantize_extra(&mut layer.extra);
        if let Some(transform) = layer.transform.as_mut() {
            quantize_extra(&mut transform.extra);
            if let Some(opacity) = transform.opacity.as_mut() {
                quantize_property(opacity);
            }
        }
        if let Some(shapes) = layer.shapes.as_mut() {
            quantize_shapes(shapes);
        }
    });
}

fn quantize_shapes(shapes: &mut [ShapeNode]) {
    let mut pending: Vec<&mut ShapeNode> = shapes.iter_mut().collect();
    while let Some(shape) = pending.pop() {
        quantize_extra(&mut shape.extra);
        if let Some(color) = shape.color.as_mut() {
            quantize_property(color);
        }
        if let Some(items) = shape.items.as_mut() {
            pending.extend(items.iter_mut());
        }
    }
}

fn quantize_property(property: &mut AnimatedProperty) {
    quantize_value(&mut property.value, QUANTIZE_PRECISION);
    quantize_extra(&mut property.extra);
}

fn quantize_extra(extra: &mut Extra) {
    for value in extra.values_mut() {
        quantize_value(value, QUANTIZE_PRECISION);
    }
}

/// Rounds every float leaf under `root`. Integers are left as they are.
pub(crate) fn quantize_value(root: &mut Value, digits: i32) {
    let mut pending: Vec<&mut Value> = vec![root];
    while let Some(value) = pending.pop() {
        match value {
            Value::Number(number) => {
                if number.is_f64() {
                    let rounded = number.as_f64().map(|f| round_to(f, digits));
                    if let Some(rounded) = rounded.and_then(Number::from_f64) {
                        *number = rounded;
                    }
                }
            }
            Value::Array(items) => pending.extend(items.iter_mut()),
            Value::Object(map) => pending.extend(map.values_mut()),
            Value::Null | Value::Bool(_) | Value::String(_) => {}
        }
    }
}

/// Rounds half toward positive infinity, so `-0.125` becomes `-0.12`.
fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor + 0.5).floor() / factor
}
