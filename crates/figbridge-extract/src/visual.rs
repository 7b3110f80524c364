//! Visual context analysis.

use figbridge_core::{Paint, Prop, SceneNode, VisualContext};

/// Relative visual weight and decoration flags of a node.
pub fn analyze_visual_context<N: SceneNode>(node: &N) -> VisualContext {
    let area = node.width() * node.height();
    let visual_weight = (area + 1.0).ln() / 10.0 * node.opacity().unwrap_or(1.0);

    let has_background = match node.fills() {
        Prop::Value(fills) => fills.iter().any(|f: &Paint| f.visible() != Some(false)),
        _ => false,
    };
    let has_border = matches!(node.strokes(), Prop::Value(strokes) if !strokes.is_empty());
    let has_shadow = match node.effects() {
        Prop::Value(effects) => effects.iter().any(|e| e.is_visible_shadow()),
        _ => false,
    };

    VisualContext {
        visual_weight,
        has_background,
        has_border,
        has_shadow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figbridge_core::{DocumentNode, Effect, NodeType, Rgb, Rgba, SolidPaint};

    fn rect(width: f64, height: f64) -> DocumentNode {
        DocumentNode::new("2:1", "Rectangle", NodeType::Rectangle).with_size(width, height)
    }

    #[test]
    fn test_visual_weight() {
        let ctx = analyze_visual_context(&rect(100.0, 100.0));
        assert!((ctx.visual_weight - 10001.0f64.ln() / 10.0).abs() < 1e-12);

        let ctx = analyze_visual_context(&rect(100.0, 100.0).with_opacity(0.5));
        assert!((ctx.visual_weight - 10001.0f64.ln() / 20.0).abs() < 1e-12);

        assert_eq!(analyze_visual_context(&rect(0.0, 0.0)).visual_weight, 0.0);
    }

    #[test]
    fn test_background_ignores_hidden_fills() {
        let hidden = Paint::Solid(SolidPaint {
            color: Rgb::WHITE,
            opacity: None,
            visible: Some(false),
        });
        let ctx = analyze_visual_context(&rect(10.0, 10.0).with_fills(vec![hidden.clone()]));
        assert!(!ctx.has_background);

        let ctx = analyze_visual_context(
            &rect(10.0, 10.0).with_fills(vec![hidden, Paint::solid(Rgb::BLACK)]),
        );
        assert!(ctx.has_background);

        let mut mixed = rect(10.0, 10.0);
        mixed.fills = Prop::Mixed;
        assert!(!analyze_visual_context(&mixed).has_background);
    }

    #[test]
    fn test_border_and_shadow() {
        let mut node = rect(10.0, 10.0);
        node.strokes = Prop::Value(vec![Paint::solid(Rgb::BLACK)]);
        node.effects = Prop::Value(vec![Effect::drop_shadow(Rgba::default(), 0.0, 2.0, 4.0)]);
        let ctx = analyze_visual_context(&node);
        assert!(ctx.has_border);
        assert!(ctx.has_shadow);

        node.strokes = Prop::Value(vec![]);
        node.effects = Prop::Mixed;
        let ctx = analyze_visual_context(&node);
        assert!(!ctx.has_border);
        assert!(!ctx.has_shadow);
    }
}
