//! Style extraction.

use figbridge_core::{CornerRadius, Prop, SceneNode, StyleProps};
use figbridge_paint::{serialize_effects, serialize_paints};

/// Read paints, effects, corners and compositing properties of a node.
///
/// Mixed paint, stroke-weight and effect lists are omitted.
pub fn extract_style<N: SceneNode>(node: &N) -> StyleProps {
    StyleProps {
        fills: node.fills().value().map(|p| serialize_paints(p)),
        strokes: node.strokes().value().map(|p| serialize_paints(p)),
        stroke_weight: node.stroke_weight().into_value(),
        effects: node.effects().value().map(|e| serialize_effects(e)),
        opacity: node.opacity(),
        blend_mode: node.blend_mode(),
        is_mask: node.is_mask(),
        clips_content: node.clips_content(),
        corner_radius: corner_radius(node),
    }
}

/// A uniform radius wins; otherwise per-corner radii collapse to a scalar
/// when all four agree.
fn corner_radius<N: SceneNode>(node: &N) -> Option<CornerRadius> {
    match node.corner_radius() {
        Prop::Value(radius) => return Some(CornerRadius::Uniform(radius)),
        Prop::Mixed | Prop::Absent => {}
    }
    let radii = node.corner_radii()?;
    if radii.is_uniform() {
        Some(CornerRadius::Uniform(radii.top_left))
    } else {
        Some(CornerRadius::PerCorner(radii))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figbridge_core::{
        BlendMode, CornerRadii, DocumentNode, Effect, NodeType, Paint, Rgb, Rgba,
    };
    use serde_json::json;

    fn radii(top_left: f64, top_right: f64, bottom_left: f64, bottom_right: f64) -> CornerRadii {
        CornerRadii {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        }
    }

    #[test]
    fn test_equal_corner_radii_collapse() {
        let mut node = DocumentNode::new("1:1", "Box", NodeType::Rectangle);
        node.corner_radius = Prop::Mixed;
        node.corner_radii = Some(radii(8.0, 8.0, 8.0, 8.0));
        let style = extract_style(&node);
        assert_eq!(style.corner_radius, Some(CornerRadius::Uniform(8.0)));
        assert_eq!(serde_json::to_value(&style).unwrap()["cornerRadius"], json!(8.0));
    }

    #[test]
    fn test_unequal_corner_radii_stay_per_corner() {
        let mut node = DocumentNode::new("1:1", "Box", NodeType::Rectangle);
        node.corner_radius = Prop::Mixed;
        node.corner_radii = Some(radii(2.0, 2.0, 2.0, 4.0));
        let style = extract_style(&node);
        assert_eq!(
            style.corner_radius,
            Some(CornerRadius::PerCorner(radii(2.0, 2.0, 2.0, 4.0)))
        );
        assert_eq!(
            serde_json::to_value(&style).unwrap()["cornerRadius"],
            json!({"topLeft": 2.0, "topRight": 2.0, "bottomLeft": 2.0, "bottomRight": 4.0})
        );
    }

    #[test]
    fn test_uniform_radius_preferred() {
        let mut node = DocumentNode::new("1:1", "Box", NodeType::Rectangle);
        node.corner_radius = Prop::Value(12.0);
        node.corner_radii = Some(radii(1.0, 2.0, 3.0, 4.0));
        assert_eq!(
            extract_style(&node).corner_radius,
            Some(CornerRadius::Uniform(12.0))
        );
    }

    #[test]
    fn test_no_corner_capability() {
        let node = DocumentNode::new("1:1", "Line", NodeType::Line);
        assert!(extract_style(&node).corner_radius.is_none());
    }

    #[test]
    fn test_mixed_lists_are_omitted() {
        let mut node = DocumentNode::new("1:1", "Label", NodeType::Text);
        node.fills = Prop::Mixed;
        node.strokes = Prop::Value(vec![Paint::solid(Rgb::BLACK)]);
        node.stroke_weight = Prop::Mixed;
        node.effects = Prop::Value(vec![
            Effect::drop_shadow(Rgba::new(0.0, 0.0, 0.0, 0.2), 0.0, 2.0, 4.0),
            Effect::Unsupported,
        ]);
        node.opacity = Some(0.5);
        node.blend_mode = Some(BlendMode::Multiply);

        let style = extract_style(&node);
        assert!(style.fills.is_none());
        assert_eq!(style.strokes.as_ref().map(|s| s.len()), Some(1));
        assert!(style.stroke_weight.is_none());
        assert_eq!(style.effects.as_ref().map(|e| e.len()), Some(1));
        assert_eq!(style.opacity, Some(0.5));
        assert_eq!(style.blend_mode, Some(BlendMode::Multiply));
        assert!(style.is_mask.is_none());
    }
}
