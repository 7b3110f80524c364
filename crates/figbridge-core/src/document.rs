//! In-memory scene document.
//!
//! A [`DocumentNode`] tree is a plain-data snapshot of a design-tool
//! selection. It implements the capability traits, so the serializer can run
//! against a JSON file exported from the tool, or against a tree built in
//! code.

use crate::errors::{DocumentError, SceneError, TextRangeError};
use crate::prop::Prop;
use crate::scene::{AutoLayout, ComponentRef, SceneNode, TextNode};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A scene node snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    /// Marks a node deleted after the snapshot handle was taken.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub removed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_layout: Option<AutoLayoutSpec>,
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
    #[serde(default, skip_serializing_if = "Prop::is_absent")]
    pub fills: Prop<Vec<Paint>>,
    #[serde(default, skip_serializing_if = "Prop::is_absent")]
    pub strokes: Prop<Vec<Paint>>,
    #[serde(default, skip_serializing_if = "Prop::is_absent")]
    pub stroke_weight: Prop<f64>,
    #[serde(default, skip_serializing_if = "Prop::is_absent")]
    pub effects: Prop<Vec<Effect>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_mask: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clips_content: Option<bool>,
    #[serde(default, skip_serializing_if = "Prop::is_absent")]
    pub corner_radius: Prop<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radii: Option<CornerRadii>,
    #[serde(default)]
    pub reactions: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_component: Option<MainComponentSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<DocumentText>,
    /// Base64-encoded PNG served when this node is exported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DocumentNode>>,
}

/// Auto-layout settings of a document frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoLayoutSpec {
    pub layout_mode: LayoutMode,
    pub primary_axis_sizing_mode: AxisSizingMode,
    pub counter_axis_sizing_mode: AxisSizingMode,
    pub primary_axis_align_items: PrimaryAxisAlign,
    pub counter_axis_align_items: CounterAxisAlign,
    pub item_spacing: f64,
    pub padding: Padding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainComponentSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Text content and typography of a document text node.
///
/// The base style applies to every character; `style_ranges` override it for
/// `start..end` (character offsets, later ranges win).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentText {
    pub characters: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub font_name: FontName,
    #[serde(default = "default_font_weight")]
    pub font_weight: f64,
    #[serde(default, skip_serializing_if = "Prop::is_absent")]
    pub text_decoration: Prop<TextDecoration>,
    #[serde(default, skip_serializing_if = "Prop::is_absent")]
    pub text_case: Prop<TextCase>,
    #[serde(default, skip_serializing_if = "Prop::is_absent")]
    pub line_height: Prop<LineHeight>,
    #[serde(default, skip_serializing_if = "Prop::is_absent")]
    pub letter_spacing: Prop<LetterSpacing>,
    #[serde(default)]
    pub text_align_horizontal: TextAlignHorizontal,
    #[serde(default)]
    pub text_align_vertical: TextAlignVertical,
    #[serde(default, skip_serializing_if = "Prop::is_absent")]
    pub paragraph_spacing: Prop<f64>,
    #[serde(default, skip_serializing_if = "Prop::is_absent")]
    pub paragraph_indent: Prop<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub style_ranges: Vec<StyleRange>,
}

fn default_font_size() -> f64 {
    14.0
}

fn default_font_weight() -> f64 {
    400.0
}

/// A per-range typography override.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRange {
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<FontName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fills: Option<Vec<Paint>>,
}

impl DocumentText {
    pub fn new(characters: impl Into<String>) -> Self {
        Self {
            characters: characters.into(),
            font_size: default_font_size(),
            font_name: FontName::default(),
            font_weight: default_font_weight(),
            text_decoration: Prop::Absent,
            text_case: Prop::Absent,
            line_height: Prop::Absent,
            letter_spacing: Prop::Absent,
            text_align_horizontal: TextAlignHorizontal::default(),
            text_align_vertical: TextAlignVertical::default(),
            paragraph_spacing: Prop::Absent,
            paragraph_indent: Prop::Absent,
            style_ranges: Vec::new(),
        }
    }

    pub fn with_font(mut self, font_name: FontName, font_size: f64, font_weight: f64) -> Self {
        self.font_name = font_name;
        self.font_size = font_size;
        self.font_weight = font_weight;
        self
    }

    pub fn with_range(mut self, range: StyleRange) -> Self {
        self.style_ranges.push(range);
        self
    }

    fn len(&self) -> usize {
        self.characters.chars().count()
    }
}

impl DocumentNode {
    /// Create a node with zero geometry and no optional capabilities.
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            removed: false,
            rotation: None,
            auto_layout: None,
            layout_wrap: None,
            layout_positioning: None,
            layout_grow: None,
            layout_align: None,
            constraints: None,
            min_width: None,
            max_width: None,
            min_height: None,
            max_height: None,
            fills: Prop::Absent,
            strokes: Prop::Absent,
            stroke_weight: Prop::Absent,
            effects: Prop::Absent,
            opacity: None,
            blend_mode: None,
            is_mask: None,
            clips_content: None,
            corner_radius: Prop::Absent,
            corner_radii: None,
            reactions: 0,
            main_component: None,
            text: None,
            raster: None,
            children: None,
        }
    }

    /// A frame with an empty child list.
    pub fn frame(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            children: Some(Vec::new()),
            ..Self::new(id, name, NodeType::Frame)
        }
    }

    /// A text node with the given content and default typography.
    pub fn text(id: impl Into<String>, name: impl Into<String>, characters: &str) -> Self {
        Self {
            text: Some(DocumentText::new(characters)),
            ..Self::new(id, name, NodeType::Text)
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_fills(mut self, fills: Vec<Paint>) -> Self {
        self.fills = Prop::Value(fills);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_raster(mut self, base64_png: impl Into<String>) -> Self {
        self.raster = Some(base64_png.into());
        self
    }

    pub fn with_text(mut self, text: DocumentText) -> Self {
        self.text = Some(text);
        self
    }

    /// Append a child, turning a leaf into a container if needed.
    pub fn with_child(mut self, child: DocumentNode) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Parse and validate a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let root: DocumentNode = serde_json::from_str(json)?;
        root.validate()?;
        Ok(root)
    }

    /// Check id uniqueness and that style ranges fit their text.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut seen = HashSet::new();
        self.validate_into(&mut seen)
    }

    fn validate_into<'a>(&'a self, seen: &mut HashSet<&'a str>) -> Result<(), DocumentError> {
        if !seen.insert(self.id.as_str()) {
            return Err(DocumentError::DuplicateId { id: self.id.clone() });
        }
        if let Some(text) = &self.text {
            let len = text.len();
            for range in &text.style_ranges {
                if range.start >= range.end || range.end > len {
                    return Err(DocumentError::InvalidStyleRange {
                        id: self.id.clone(),
                        start: range.start,
                        end: range.end,
                    });
                }
            }
        }
        for child in self.children.iter().flatten() {
            child.validate_into(seen)?;
        }
        Ok(())
    }

    /// Every node in this subtree, depth-first.
    pub fn descendants(&self) -> Vec<&DocumentNode> {
        let mut out = vec![self];
        for child in self.children.iter().flatten() {
            out.extend(child.descendants());
        }
        out
    }

    fn base_fills(&self) -> Vec<Paint> {
        self.fills.value().cloned().unwrap_or_default()
    }

    /// Typography of the character at `index`.
    fn style_at<'a>(&'a self, text: &'a DocumentText, index: usize) -> CharStyle<'a> {
        let mut style = CharStyle {
            font_size: text.font_size,
            font_name: &text.font_name,
            font_weight: text.font_weight,
            fills: None,
        };
        for range in &text.style_ranges {
            if range.start <= index && index < range.end {
                if let Some(size) = range.font_size {
                    style.font_size = size;
                }
                if let Some(name) = &range.font_name {
                    style.font_name = name;
                }
                if let Some(weight) = range.font_weight {
                    style.font_weight = weight;
                }
                if let Some(fills) = &range.fills {
                    style.fills = Some(fills);
                }
            }
        }
        style
    }

    fn range_query<T: PartialEq>(
        &self,
        start: usize,
        end: usize,
        pick: impl Fn(&CharStyle<'_>) -> T,
    ) -> Result<Prop<T>, TextRangeError> {
        let Some(text) = &self.text else {
            return Ok(Prop::Absent);
        };
        let len = text.len();
        if start >= end || end > len {
            return Err(TextRangeError::OutOfBounds { start, end, len });
        }
        Ok(Prop::uniform(
            (start..end).map(|i| pick(&self.style_at(text, i))),
        ))
    }

    fn whole_text_query<T: PartialEq>(
        &self,
        base: T,
        pick: impl Fn(&CharStyle<'_>) -> T,
    ) -> Prop<T> {
        let Some(text) = &self.text else {
            return Prop::Absent;
        };
        let len = text.len();
        if len == 0 {
            return Prop::Value(base);
        }
        Prop::uniform((0..len).map(|i| pick(&self.style_at(text, i))))
    }
}

struct CharStyle<'a> {
    font_size: f64,
    font_name: &'a FontName,
    font_weight: f64,
    fills: Option<&'a Vec<Paint>>,
}

impl SceneNode for DocumentNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn node_type(&self) -> NodeType {
        self.node_type.clone()
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }

    fn ensure_present(&self) -> Result<(), SceneError> {
        if self.removed {
            return Err(SceneError::NodeRemoved { id: self.id.clone() });
        }
        Ok(())
    }

    fn children(&self) -> Option<&[Self]> {
        self.children.as_deref()
    }

    fn rotation(&self) -> Option<f64> {
        self.rotation
    }

    fn auto_layout(&self) -> Option<AutoLayout> {
        self.auto_layout.as_ref().map(|spec| AutoLayout {
            layout_mode: spec.layout_mode,
            primary_axis_sizing_mode: spec.primary_axis_sizing_mode,
            counter_axis_sizing_mode: spec.counter_axis_sizing_mode,
            primary_axis_align_items: spec.primary_axis_align_items,
            counter_axis_align_items: spec.counter_axis_align_items,
            item_spacing: spec.item_spacing,
            padding: spec.padding,
        })
    }

    fn layout_wrap(&self) -> Option<LayoutWrap> {
        self.layout_wrap
    }

    fn layout_positioning(&self) -> Option<LayoutPositioning> {
        self.layout_positioning
    }

    fn layout_grow(&self) -> Option<f64> {
        self.layout_grow
    }

    fn layout_align(&self) -> Option<LayoutAlign> {
        self.layout_align
    }

    fn constraints(&self) -> Option<Constraints> {
        self.constraints
    }

    fn min_width(&self) -> Option<f64> {
        self.min_width
    }

    fn max_width(&self) -> Option<f64> {
        self.max_width
    }

    fn min_height(&self) -> Option<f64> {
        self.min_height
    }

    fn max_height(&self) -> Option<f64> {
        self.max_height
    }

    fn fills(&self) -> Prop<Vec<Paint>> {
        self.fills.clone()
    }

    fn strokes(&self) -> Prop<Vec<Paint>> {
        self.strokes.clone()
    }

    fn stroke_weight(&self) -> Prop<f64> {
        self.stroke_weight.clone()
    }

    fn effects(&self) -> Prop<Vec<Effect>> {
        self.effects.clone()
    }

    fn opacity(&self) -> Option<f64> {
        self.opacity
    }

    fn blend_mode(&self) -> Option<BlendMode> {
        self.blend_mode
    }

    fn is_mask(&self) -> Option<bool> {
        self.is_mask
    }

    fn clips_content(&self) -> Option<bool> {
        self.clips_content
    }

    fn corner_radius(&self) -> Prop<f64> {
        self.corner_radius.clone()
    }

    fn corner_radii(&self) -> Option<CornerRadii> {
        self.corner_radii
    }

    fn reaction_count(&self) -> usize {
        self.reactions
    }

    fn main_component(&self) -> Option<ComponentRef> {
        if let Some(spec) = &self.main_component {
            return Some(ComponentRef {
                name: spec.name.clone(),
                id: spec.id.clone(),
            });
        }
        // A component is its own main component.
        match self.node_type {
            NodeType::Component => Some(ComponentRef {
                name: self.name.clone(),
                id: Some(self.id.clone()),
            }),
            NodeType::ComponentSet => Some(ComponentRef {
                name: self.name.clone(),
                id: None,
            }),
            _ => None,
        }
    }

    /// Text nodes without a `text` block read as empty text with default
    /// typography.
    fn as_text(&self) -> Option<&dyn TextNode> {
        if self.text.is_some() || self.node_type == NodeType::Text {
            Some(self)
        } else {
            None
        }
    }
}

impl TextNode for DocumentNode {
    fn characters(&self) -> &str {
        self.text.as_ref().map(|t| t.characters.as_str()).unwrap_or("")
    }

    fn font_size(&self) -> Prop<f64> {
        let base = self.text.as_ref().map_or(default_font_size(), |t| t.font_size);
        self.whole_text_query(base, |s| s.font_size)
    }

    fn font_name(&self) -> Prop<FontName> {
        let base = self
            .text
            .as_ref()
            .map(|t| t.font_name.clone())
            .unwrap_or_default();
        self.whole_text_query(base, |s| s.font_name.clone())
    }

    fn font_weight(&self) -> Prop<f64> {
        let base = self.text.as_ref().map_or(default_font_weight(), |t| t.font_weight);
        self.whole_text_query(base, |s| s.font_weight)
    }

    fn text_decoration(&self) -> Prop<TextDecoration> {
        self.text
            .as_ref()
            .map_or(Prop::Absent, |t| t.text_decoration.clone())
    }

    fn text_case(&self) -> Prop<TextCase> {
        self.text.as_ref().map_or(Prop::Absent, |t| t.text_case.clone())
    }

    fn line_height(&self) -> Prop<LineHeight> {
        self.text.as_ref().map_or(Prop::Absent, |t| t.line_height.clone())
    }

    fn letter_spacing(&self) -> Prop<LetterSpacing> {
        self.text
            .as_ref()
            .map_or(Prop::Absent, |t| t.letter_spacing.clone())
    }

    fn text_align_horizontal(&self) -> TextAlignHorizontal {
        self.text
            .as_ref()
            .map(|t| t.text_align_horizontal)
            .unwrap_or_default()
    }

    fn text_align_vertical(&self) -> TextAlignVertical {
        self.text
            .as_ref()
            .map(|t| t.text_align_vertical)
            .unwrap_or_default()
    }

    fn paragraph_spacing(&self) -> Prop<f64> {
        self.text
            .as_ref()
            .map_or(Prop::Absent, |t| t.paragraph_spacing.clone())
    }

    fn paragraph_indent(&self) -> Prop<f64> {
        self.text
            .as_ref()
            .map_or(Prop::Absent, |t| t.paragraph_indent.clone())
    }

    fn range_font_size(&self, start: usize, end: usize) -> Result<Prop<f64>, TextRangeError> {
        self.range_query(start, end, |s| s.font_size)
    }

    fn range_font_name(&self, start: usize, end: usize) -> Result<Prop<FontName>, TextRangeError> {
        self.range_query(start, end, |s| s.font_name.clone())
    }

    fn range_font_weight(&self, start: usize, end: usize) -> Result<Prop<f64>, TextRangeError> {
        self.range_query(start, end, |s| s.font_weight)
    }

    fn range_fills(&self, start: usize, end: usize) -> Result<Prop<Vec<Paint>>, TextRangeError> {
        let base = self.base_fills();
        self.range_query(start, end, |s| s.fills.cloned().unwrap_or_else(|| base.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello_world() -> DocumentNode {
        DocumentNode::text("1:2", "Greeting", "Hello World").with_text(
            DocumentText::new("Hello World").with_range(StyleRange {
                start: 6,
                end: 11,
                font_weight: Some(700.0),
                ..Default::default()
            }),
        )
    }

    #[test]
    fn test_whole_text_weight_is_mixed() {
        let node = hello_world();
        assert_eq!(node.font_weight(), Prop::Mixed);
        assert_eq!(node.font_size(), Prop::Value(14.0));
    }

    #[test]
    fn test_range_queries() {
        let node = hello_world();
        assert_eq!(node.range_font_weight(0, 1).unwrap(), Prop::Value(400.0));
        assert_eq!(node.range_font_weight(6, 7).unwrap(), Prop::Value(700.0));
        assert_eq!(node.range_font_weight(5, 7).unwrap(), Prop::Mixed);
        assert!(node.range_font_size(10, 12).is_err());
    }

    #[test]
    fn test_from_json_rejects_duplicate_ids() {
        let json = r#"{
            "id": "1:1", "name": "Root", "type": "FRAME",
            "children": [
                {"id": "1:2", "name": "A", "type": "RECTANGLE"},
                {"id": "1:2", "name": "B", "type": "RECTANGLE"}
            ]
        }"#;
        assert!(matches!(
            DocumentNode::from_json(json),
            Err(DocumentError::DuplicateId { .. })
        ));
    }

    #[test]
    fn test_from_json_mixed_marker() {
        let json = r#"{
            "id": "1:1", "name": "Card", "type": "FRAME",
            "width": 200, "height": 120,
            "fills": "MIXED",
            "cornerRadius": 12
        }"#;
        let node = DocumentNode::from_json(json).unwrap();
        assert!(SceneNode::fills(&node).is_mixed());
        assert_eq!(SceneNode::corner_radius(&node), Prop::Value(12.0));
        assert!(SceneNode::children(&node).is_none());
    }

    #[test]
    fn test_component_is_its_own_main_component() {
        let node = DocumentNode::new("5:1", "Button/Primary", NodeType::Component);
        let main = node.main_component().unwrap();
        assert_eq!(main.name, "Button/Primary");
        assert_eq!(main.id.as_deref(), Some("5:1"));
    }

    #[test]
    fn test_text_type_exposes_text_without_block() {
        let mut node = DocumentNode::new("6:1", "Caption", NodeType::Text);
        node.text = None;
        let text = node.as_text().unwrap();
        assert_eq!(text.characters(), "");
        assert!(text.font_size().is_absent());

        let frame = DocumentNode::frame("6:2", "Row");
        assert!(frame.as_text().is_none());
    }
}
