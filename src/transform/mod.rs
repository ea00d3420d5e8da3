//! Transform engine.
//!
//! Every operation takes a document by reference and returns a rewritten
//! copy; the input is never touched and no locks are taken. Traversals are
//! depth-first pre-order over layers and use explicit stacks, so deep trees
//! do not grow the call stack.

pub mod optimize;
pub mod palette;
pub mod properties;

pub use optimize::{optimize, OptimizeOutcome, OptimizeStats};
pub use palette::apply_palette;
pub use properties::{update_layer_properties, LayerProperties};

use crate::document::{Layer, ShapeKind, ShapeNode};

/// Visits every layer in pre-order: a layer, then its nested layers, then
/// its next sibling.
pub(crate) fn for_each_layer_mut<F>(layers: &mut [Layer], mut visit: F)
where
    F: FnMut(&mut Layer),
{
    let mut stack: Vec<&mut Layer> = layers.iter_mut().rev().collect();
    while let Some(layer) = stack.pop() {
        visit(&mut *layer);
        if let Some(children) = layer.layers.as_mut() {
            stack.extend(children.iter_mut().rev());
        }
    }
}

/// Visits every fill and stroke in a shape tree.
///
/// Siblings are handled before descending into group children.
pub(crate) fn for_each_paint_mut<F>(shapes: &mut [ShapeNode], mut visit: F)
where
    F: FnMut(&mut ShapeNode),
{
    let mut pending: Vec<&mut [ShapeNode]> = vec![shapes];
    while let Some(level) = pending.pop() {
        for shape in level {
            match shape.kind() {
                ShapeKind::Fill | ShapeKind::Stroke => visit(shape),
                ShapeKind::Group | ShapeKind::Other => {
                    if let Some(items) = shape.items.as_mut() {
                        pending.push(items.as_mut_slice());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Rgb;

    #[test]
    fn test_for_each_layer_mut_order() {
        let mut layers = vec![
            Layer::new("a")
                .with_child(Layer::new("a1").with_child(Layer::new("a1x")))
                .with_child(Layer::new("a2")),
            Layer::new("b"),
        ];
        let mut seen = Vec::new();
        for_each_layer_mut(&mut layers, |layer| seen.push(layer.name().to_string()));
        assert_eq!(seen, vec!["a", "a1", "a1x", "a2", "b"]);
    }

    #[test]
    fn test_for_each_layer_mut_deep_tree() {
        let mut root = Layer::new("leaf");
        for i in 0..1_000 {
            root = Layer::new(format!("level-{}", i)).with_child(root);
        }
        let mut layers = vec![root];
        let mut count = 0;
        for_each_layer_mut(&mut layers, |_| count += 1);
        assert_eq!(count, 1_001);
    }

    #[test]
    fn test_for_each_paint_mut_skips_other_shapes() {
        let mut shapes = vec![
            ShapeNode::fill(Rgb::BLACK),
            ShapeNode::group(vec![
                ShapeNode::stroke(Rgb::BLACK),
                ShapeNode::group(vec![ShapeNode::fill(Rgb::BLACK)]),
            ]),
            ShapeNode::default(),
        ];
        let mut kinds = Vec::new();
        for_each_paint_mut(&mut shapes, |shape| kinds.push(shape.kind()));
        assert_eq!(kinds.len(), 3);
        assert_eq!(kinds.iter().filter(|k| **k == ShapeKind::Fill).count(), 2);
    }
}
