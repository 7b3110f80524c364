//! Layout extraction.

use figbridge_core::{AutoLayout, AutoLayoutProps, LayoutProps, SceneNode};

/// Read geometry and auto-layout properties of a node.
///
/// Capabilities the node does not expose are omitted, never defaulted.
pub fn extract_layout<N: SceneNode>(node: &N) -> LayoutProps {
    LayoutProps {
        width: node.width(),
        height: node.height(),
        x: node.x(),
        y: node.y(),
        rotation: node.rotation().filter(|r| *r != 0.0),
        auto_layout: node.auto_layout().map(auto_layout_props),
        layout_wrap: node.layout_wrap(),
        layout_positioning: node.layout_positioning(),
        layout_grow: node.layout_grow(),
        layout_align: node.layout_align(),
        constraints: node.constraints(),
        min_width: node.min_width(),
        max_width: node.max_width(),
        min_height: node.min_height(),
        max_height: node.max_height(),
    }
}

fn auto_layout_props(layout: AutoLayout) -> AutoLayoutProps {
    AutoLayoutProps {
        layout_mode: layout.layout_mode,
        primary_axis_sizing_mode: layout.primary_axis_sizing_mode,
        counter_axis_sizing_mode: layout.counter_axis_sizing_mode,
        primary_axis_align_items: layout.primary_axis_align_items,
        counter_axis_align_items: layout.counter_axis_align_items,
        item_spacing: layout.item_spacing,
        padding: layout.padding,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figbridge_core::{
        AutoLayoutSpec, ConstraintType, Constraints, DocumentNode, LayoutMode, NodeType, Padding,
        PrimaryAxisAlign,
    };

    #[test]
    fn test_plain_vector_has_geometry_only() {
        let node = DocumentNode::new("1:1", "Shape", NodeType::Vector)
            .with_size(24.0, 24.0)
            .with_position(4.0, 8.0);
        let layout = extract_layout(&node);
        assert_eq!(layout.width, 24.0);
        assert_eq!(layout.x, 4.0);
        assert_eq!(layout.y, 8.0);
        assert!(layout.auto_layout.is_none());
        assert!(layout.rotation.is_none());
        assert!(layout.constraints.is_none());
    }

    #[test]
    fn test_zero_rotation_is_omitted() {
        let mut node = DocumentNode::new("1:1", "Shape", NodeType::Rectangle);
        node.rotation = Some(0.0);
        assert!(extract_layout(&node).rotation.is_none());
        node.rotation = Some(45.0);
        assert_eq!(extract_layout(&node).rotation, Some(45.0));
    }

    #[test]
    fn test_auto_layout_group() {
        let mut node = DocumentNode::frame("1:1", "Column").with_size(320.0, 640.0);
        node.auto_layout = Some(AutoLayoutSpec {
            layout_mode: LayoutMode::Vertical,
            primary_axis_align_items: PrimaryAxisAlign::SpaceBetween,
            item_spacing: 12.0,
            padding: Padding::symmetric(16.0, 24.0),
            ..Default::default()
        });
        node.constraints = Some(Constraints {
            horizontal: ConstraintType::Stretch,
            vertical: ConstraintType::Min,
        });
        node.min_width = Some(200.0);

        let layout = extract_layout(&node);
        let auto = layout.auto_layout.as_ref().unwrap();
        assert_eq!(auto.layout_mode, LayoutMode::Vertical);
        assert_eq!(auto.item_spacing, 12.0);
        assert_eq!(auto.padding.left, 16.0);
        assert_eq!(auto.padding.top, 24.0);
        assert_eq!(layout.min_width, Some(200.0));
        assert!(layout.max_width.is_none());

        let json = serde_json::to_string_pretty(&layout).unwrap();
        insta::assert_snapshot!(json, @r###"
        {
          "width": 320.0,
          "height": 640.0,
          "x": 0.0,
          "y": 0.0,
          "layoutMode": "VERTICAL",
          "primaryAxisSizingMode": "FIXED",
          "counterAxisSizingMode": "FIXED",
          "primaryAxisAlignItems": "SPACE_BETWEEN",
          "counterAxisAlignItems": "MIN",
          "itemSpacing": 12.0,
          "padding": {
            "top": 24.0,
            "right": 16.0,
            "bottom": 24.0,
            "left": 16.0
          },
          "constraints": {
            "horizontal": "STRETCH",
            "vertical": "MIN"
          },
          "minWidth": 200.0
        }
        "###);
    }
}
