//! Intermediate representation emitted by the serializer.
//!
//! Everything here serializes to camelCase JSON. Optional fields are omitted
//! rather than defaulted so a consumer can tell "not applicable" apart from
//! "applicable with a default value".

use crate::types::*;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Serialized paints of one fill or stroke list.
pub type PaintList = SmallVec<[PaintDto; 2]>;

/// Serialized effects of one node.
pub type EffectList = SmallVec<[EffectDto; 2]>;

/// Node id to uploaded asset, accumulated over one serialization pass.
///
/// Insertion order depends on upload completion order and carries no meaning.
pub type AssetMap = IndexMap<String, AssetEntry>;

/// One serialized scene node and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub metadata: NodeMetadata,
    pub semantic_hints: SemanticHints,
    pub visual_context: VisualContext,
    pub layout: LayoutProps,
    pub style: StyleProps,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextProps>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SerializedNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_image_filename: Option<String>,
}

impl SerializedNode {
    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(SerializedNode::node_count)
            .sum::<usize>()
    }

    /// Depth-first search for a node by id.
    pub fn find(&self, id: &str) -> Option<&SerializedNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().flatten().find_map(|child| child.find(id))
    }
}

/// Position of a node in the serialized tree plus component linkage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    pub is_component: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_component_id: Option<String>,
    pub depth: u32,
    pub sibling_index: usize,
    pub total_siblings: usize,
}

/// Likely UI role of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticRole {
    Button,
    Input,
    Card,
    Header,
    Avatar,
    Icon,
    Divider,
    Badge,
}

impl SemanticRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticRole::Button => "button",
            SemanticRole::Input => "input",
            SemanticRole::Card => "card",
            SemanticRole::Header => "header",
            SemanticRole::Avatar => "avatar",
            SemanticRole::Icon => "icon",
            SemanticRole::Divider => "divider",
            SemanticRole::Badge => "badge",
        }
    }
}

/// Heuristic role annotations. `confidence` is in 0.0..=1.0.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likely_role: Option<SemanticRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_interactive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_decorative: Option<bool>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualContext {
    pub visual_weight: f64,
    pub has_background: bool,
    pub has_border: bool,
    pub has_shadow: bool,
}

/// Auto-layout group of [`LayoutProps`]; present as a whole or not at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoLayoutProps {
    pub layout_mode: LayoutMode,
    pub primary_axis_sizing_mode: AxisSizingMode,
    pub counter_axis_sizing_mode: AxisSizingMode,
    pub primary_axis_align_items: PrimaryAxisAlign,
    pub counter_axis_align_items: CounterAxisAlign,
    pub item_spacing: f64,
    pub padding: Padding,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutProps {
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(flatten)]
    pub auto_layout: Option<AutoLayoutProps>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_wrap: Option<LayoutWrap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_positioning: Option<LayoutPositioning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_grow: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_align: Option<LayoutAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
}

/// Corner radius, collapsed to a scalar when all corners agree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CornerRadius {
    Uniform(f64),
    PerCorner(CornerRadii),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fills: Option<PaintList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strokes: Option<PaintList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<EffectList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_mask: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clips_content: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<CornerRadius>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolidDto {
    pub color: Rgb,
    pub opacity: f64,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientDto {
    pub gradient_stops: Vec<GradientStop>,
    pub gradient_transform: Transform,
    pub opacity: f64,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDto {
    pub opacity: f64,
    pub scale_mode: ScaleMode,
    pub visible: bool,
}

/// A serialized paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintDto {
    Solid(SolidDto),
    GradientLinear(GradientDto),
    GradientRadial(GradientDto),
    GradientAngular(GradientDto),
    GradientDiamond(GradientDto),
    Image(ImageDto),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowDto {
    pub color: Rgba,
    pub offset: Vector,
    pub radius: f64,
    pub spread: f64,
    pub visible: bool,
    pub blend_mode: BlendMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlurDto {
    pub radius: f64,
    pub visible: bool,
}

/// A serialized effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectDto {
    DropShadow(ShadowDto),
    InnerShadow(ShadowDto),
    LayerBlur(BlurDto),
    BackgroundBlur(BlurDto),
}

/// A maximal run of characters sharing font size, name and weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledSegment {
    pub characters: String,
    pub start: usize,
    pub end: usize,
    pub font_size: f64,
    pub font_name: FontName,
    pub font_weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fills: Option<PaintList>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    pub characters: String,
    pub font_size: f64,
    pub font_name: FontName,
    pub font_weight: f64,
    pub text_decoration: TextDecoration,
    pub text_case: TextCase,
    pub line_height: LineHeight,
    pub letter_spacing: LetterSpacing,
    pub text_align_horizontal: TextAlignHorizontal,
    pub text_align_vertical: TextAlignVertical,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_indent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styled_segments: Option<Vec<StyledSegment>>,
}

/// An uploaded raster asset for an image-filled node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub id: String,
    pub name: String,
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_corner_radius_shapes() {
        assert_eq!(
            serde_json::to_value(CornerRadius::Uniform(8.0)).unwrap(),
            json!(8.0)
        );
        let radii = CornerRadii {
            top_left: 2.0,
            top_right: 2.0,
            bottom_left: 2.0,
            bottom_right: 4.0,
        };
        assert_eq!(
            serde_json::to_value(CornerRadius::PerCorner(radii)).unwrap(),
            json!({"topLeft": 2.0, "topRight": 2.0, "bottomLeft": 2.0, "bottomRight": 4.0})
        );
    }

    #[test]
    fn test_layout_omits_absent_fields() {
        let layout = LayoutProps {
            width: 10.0,
            height: 20.0,
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&layout).unwrap(),
            json!({"width": 10.0, "height": 20.0, "x": 0.0, "y": 0.0})
        );
    }

    #[test]
    fn test_auto_layout_flattens() {
        let layout = LayoutProps {
            auto_layout: Some(AutoLayoutProps {
                layout_mode: LayoutMode::Vertical,
                primary_axis_sizing_mode: AxisSizingMode::Auto,
                counter_axis_sizing_mode: AxisSizingMode::Fixed,
                primary_axis_align_items: PrimaryAxisAlign::SpaceBetween,
                counter_axis_align_items: CounterAxisAlign::Center,
                item_spacing: 8.0,
                padding: Padding::uniform(16.0),
            }),
            ..Default::default()
        };
        let value = serde_json::to_value(&layout).unwrap();
        assert_eq!(value["layoutMode"], json!("VERTICAL"));
        assert_eq!(value["primaryAxisAlignItems"], json!("SPACE_BETWEEN"));
        assert_eq!(value["padding"]["left"], json!(16.0));
    }

    #[test]
    fn test_paint_dto_tagging() {
        let paint = PaintDto::Solid(SolidDto {
            color: Rgb::WHITE,
            opacity: 1.0,
            visible: true,
        });
        assert_eq!(
            serde_json::to_value(&paint).unwrap(),
            json!({"type": "SOLID", "color": {"r": 1.0, "g": 1.0, "b": 1.0}, "opacity": 1.0, "visible": true})
        );
    }
}
