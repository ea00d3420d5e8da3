//! Palette application.

use tracing::debug;

use super::{for_each_layer_mut, for_each_paint_mut};
use crate::document::{AnimationDocument, LayerSelector, Rgb, ShapeKind};
use crate::error::{LottieError, LottieResult};

/// Recolors fills layer by layer, cycling through `colors`.
///
/// Each matching layer that owns shapes takes the color at the running
/// index; every fill anywhere in its shape tree gets that color, then the
/// index advances by one (wrapping). Nested layers are matched on their own
/// and take their own slot. Strokes are left alone.
pub fn apply_palette(
    doc: &AnimationDocument,
    colors: &[Rgb],
    selector: &LayerSelector,
) -> LottieResult<AnimationDocument> {
    if colors.is_empty() {
        return Err(LottieError::EmptyPalette);
    }

    let mut updated = doc.clone();
    let mut color_index = 0usize;
    let mut recolored_layers = 0usize;

    for_each_layer_mut(&mut updated.layers, |layer| {
        if !selector.matches(layer) {
            return;
        }
        let Some(shapes) = layer.shapes.as_mut() else {
            return;
        };
        let color = colors[color_index];
        for_each_paint_mut(shapes, |shape| {
            if shape.kind() == ShapeKind::Fill {
                shape.set_color(color);
            }
        });
        color_index = (color_index + 1) % colors.len();
        recolored_layers += 1;
    });

    debug!(
        palette_len = colors.len(),
        recolored_layers, "Applied palette"
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Layer, Palette, ShapeNode};

    fn red() -> Rgb {
        Rgb::new(1.0, 0.0, 0.0)
    }

    fn green() -> Rgb {
        Rgb::new(0.0, 1.0, 0.0)
    }

    fn blue() -> Rgb {
        Rgb::new(0.0, 0.0, 1.0)
    }

    fn fill_colors(layer: &Layer) -> Vec<Rgb> {
        let mut out = Vec::new();
        let mut stack: Vec<&ShapeNode> = layer.shapes.iter().flatten().collect();
        while let Some(shape) = stack.pop() {
            if shape.kind() == ShapeKind::Fill {
                out.extend(shape.color());
            }
            stack.extend(shape.items.iter().flatten());
        }
        out
    }

    #[test]
    fn test_single_fill_primary() {
        let doc = AnimationDocument::new(100, 100, 30.0, 0.0, 30.0).with_layer(
            Layer::shape_layer("shape", vec![ShapeNode::fill(Rgb::BLACK)]),
        );
        let palette: Palette = serde_json::from_str(r##"{ "primary": "#FF0000" }"##).unwrap();

        let updated = apply_palette(&doc, palette.colors(), &LayerSelector::All).unwrap();

        let fill = &updated.layers[0].shapes.as_ref().unwrap()[0];
        assert_eq!(
            fill.color.as_ref().unwrap().value,
            serde_json::json!([1.0, 0.0, 0.0, 1.0])
        );
        // Input untouched.
        assert_eq!(fill_colors(&doc.layers[0]), vec![Rgb::BLACK]);
    }

    #[test]
    fn test_palette_cycles_per_layer() {
        let mut doc = AnimationDocument::new(100, 100, 30.0, 0.0, 30.0);
        for i in 0..5 {
            doc = doc.with_layer(Layer::shape_layer(
                format!("layer-{}", i),
                vec![ShapeNode::fill(Rgb::BLACK), ShapeNode::fill(Rgb::BLACK)],
            ));
        }

        let updated = apply_palette(&doc, &[red(), green(), blue()], &LayerSelector::All).unwrap();

        let per_layer: Vec<Rgb> = updated.layers.iter().map(|l| fill_colors(l)[0]).collect();
        assert_eq!(per_layer, vec![red(), green(), blue(), red(), green()]);
        for layer in &updated.layers {
            let colors = fill_colors(layer);
            assert_eq!(colors[0], colors[1]);
        }
    }

    #[test]
    fn test_nested_groups_share_layer_color() {
        let doc = AnimationDocument::new(100, 100, 30.0, 0.0, 30.0).with_layer(Layer::shape_layer(
            "outer",
            vec![
                ShapeNode::fill(Rgb::BLACK),
                ShapeNode::group(vec![ShapeNode::group(vec![ShapeNode::fill(Rgb::BLACK)])]),
                ShapeNode::stroke(Rgb::BLACK),
            ],
        ));

        let updated = apply_palette(&doc, &[red(), green()], &LayerSelector::All).unwrap();

        assert_eq!(fill_colors(&updated.layers[0]), vec![red(), red()]);
        let stroke = &updated.layers[0].shapes.as_ref().unwrap()[2];
        assert_eq!(stroke.color(), Some(Rgb::BLACK));
    }

    #[test]
    fn test_nested_layers_take_own_slot() {
        let parent = Layer::shape_layer("parent", vec![ShapeNode::fill(Rgb::BLACK)])
            .with_child(Layer::shape_layer("child", vec![ShapeNode::fill(Rgb::BLACK)]));
        let doc = AnimationDocument::new(100, 100, 30.0, 0.0, 30.0)
            .with_layer(parent)
            .with_layer(Layer::shape_layer("sibling", vec![ShapeNode::fill(Rgb::BLACK)]));

        let updated = apply_palette(&doc, &[red(), green(), blue()], &LayerSelector::All).unwrap();

        let parent = &updated.layers[0];
        assert_eq!(fill_colors(parent), vec![red()]);
        assert_eq!(fill_colors(&parent.layers.as_ref().unwrap()[0]), vec![green()]);
        assert_eq!(fill_colors(&updated.layers[1]), vec![blue()]);
    }

    #[test]
    fn test_layers_without_shapes_do_not_consume_slot() {
        let doc = AnimationDocument::new(100, 100, 30.0, 0.0, 30.0)
            .with_layer(Layer::new("null"))
            .with_layer(Layer::shape_layer("a", vec![ShapeNode::fill(Rgb::BLACK)]))
            .with_layer(Layer::shape_layer("b", vec![ShapeNode::fill(Rgb::BLACK)]));

        let updated = apply_palette(&doc, &[red(), green()], &LayerSelector::All).unwrap();

        assert_eq!(fill_colors(&updated.layers[1]), vec![red()]);
        assert_eq!(fill_colors(&updated.layers[2]), vec![green()]);
    }

    #[test]
    fn test_named_selector_skips_other_layers() {
        let doc = AnimationDocument::new(100, 100, 30.0, 0.0, 30.0)
            .with_layer(Layer::shape_layer("logo", vec![ShapeNode::fill(Rgb::BLACK)]))
            .with_layer(Layer::shape_layer("bg", vec![ShapeNode::fill(Rgb::BLACK)]))
            .with_layer(Layer::shape_layer("logo", vec![ShapeNode::fill(Rgb::BLACK)]));
        let selector = LayerSelector::named(["logo"]).unwrap();

        let updated = apply_palette(&doc, &[red(), green()], &selector).unwrap();

        assert_eq!(fill_colors(&updated.layers[0]), vec![red()]);
        assert_eq!(fill_colors(&updated.layers[1]), vec![Rgb::BLACK]);
        assert_eq!(fill_colors(&updated.layers[2]), vec![green()]);
    }

    #[test]
    fn test_empty_palette_rejected() {
        let doc = AnimationDocument::default();
        let err = apply_palette(&doc, &[], &LayerSelector::All).unwrap_err();
        assert!(matches!(err, LottieError::EmptyPalette));
    }
}
