//! Scene capability model.
//!
//! A design tool exposes a heterogeneous node graph: frames carry auto-layout,
//! text nodes carry range-queryable typography, vectors carry neither. Every
//! optional capability on [`SceneNode`] defaults to "not exposed" so a host
//! binding only implements what its node kinds actually support.

use crate::errors::{SceneError, TextRangeError};
use crate::prop::Prop;
use crate::types::*;

/// Auto-layout properties of a frame-like node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AutoLayout {
    pub layout_mode: LayoutMode,
    pub primary_axis_sizing_mode: AxisSizingMode,
    pub counter_axis_sizing_mode: AxisSizingMode,
    pub primary_axis_align_items: PrimaryAxisAlign,
    pub counter_axis_align_items: CounterAxisAlign,
    pub item_spacing: f64,
    pub padding: Padding,
}

/// Reference to the component backing a component or instance node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef {
    pub name: String,
    pub id: Option<String>,
}

/// A node of the design tool's scene graph.
pub trait SceneNode {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn node_type(&self) -> NodeType;

    fn width(&self) -> f64;

    fn height(&self) -> f64;

    /// Position relative to the parent's coordinate space.
    fn x(&self) -> f64;

    fn y(&self) -> f64;

    /// Fails when the node has been removed from its document since the
    /// handle was obtained.
    fn ensure_present(&self) -> Result<(), SceneError> {
        Ok(())
    }

    /// Children in rendering order, or `None` for leaf kinds.
    fn children(&self) -> Option<&[Self]>
    where
        Self: Sized;

    fn rotation(&self) -> Option<f64> {
        None
    }

    fn auto_layout(&self) -> Option<AutoLayout> {
        None
    }

    fn layout_wrap(&self) -> Option<LayoutWrap> {
        None
    }

    fn layout_positioning(&self) -> Option<LayoutPositioning> {
        None
    }

    fn layout_grow(&self) -> Option<f64> {
        None
    }

    fn layout_align(&self) -> Option<LayoutAlign> {
        None
    }

    fn constraints(&self) -> Option<Constraints> {
        None
    }

    fn min_width(&self) -> Option<f64> {
        None
    }

    fn max_width(&self) -> Option<f64> {
        None
    }

    fn min_height(&self) -> Option<f64> {
        None
    }

    fn max_height(&self) -> Option<f64> {
        None
    }

    fn fills(&self) -> Prop<Vec<Paint>> {
        Prop::Absent
    }

    fn strokes(&self) -> Prop<Vec<Paint>> {
        Prop::Absent
    }

    fn stroke_weight(&self) -> Prop<f64> {
        Prop::Absent
    }

    fn effects(&self) -> Prop<Vec<Effect>> {
        Prop::Absent
    }

    fn opacity(&self) -> Option<f64> {
        None
    }

    fn blend_mode(&self) -> Option<BlendMode> {
        None
    }

    fn is_mask(&self) -> Option<bool> {
        None
    }

    fn clips_content(&self) -> Option<bool> {
        None
    }

    /// A single radius applied to every corner.
    fn corner_radius(&self) -> Prop<f64> {
        Prop::Absent
    }

    /// Per-corner radii, for nodes that expose them independently.
    fn corner_radii(&self) -> Option<CornerRadii> {
        None
    }

    /// Number of registered prototype interactions (click, hover, ...).
    fn reaction_count(&self) -> usize {
        0
    }

    /// The component behind a component or instance node.
    fn main_component(&self) -> Option<ComponentRef> {
        None
    }

    /// Typography access, for text nodes.
    fn as_text(&self) -> Option<&dyn TextNode> {
        None
    }
}

/// Typography of a text node.
///
/// Whole-node getters report [`Prop::Mixed`] when the property varies across
/// the content. Range getters take character offsets `start..end` counted in
/// Unicode scalar values.
pub trait TextNode {
    fn characters(&self) -> &str;

    fn font_size(&self) -> Prop<f64>;

    fn font_name(&self) -> Prop<FontName>;

    fn font_weight(&self) -> Prop<f64>;

    fn text_decoration(&self) -> Prop<TextDecoration>;

    fn text_case(&self) -> Prop<TextCase>;

    fn line_height(&self) -> Prop<LineHeight>;

    fn letter_spacing(&self) -> Prop<LetterSpacing>;

    fn text_align_horizontal(&self) -> TextAlignHorizontal;

    fn text_align_vertical(&self) -> TextAlignVertical;

    fn paragraph_spacing(&self) -> Prop<f64>;

    fn paragraph_indent(&self) -> Prop<f64>;

    fn range_font_size(&self, start: usize, end: usize) -> Result<Prop<f64>, TextRangeError>;

    fn range_font_name(&self, start: usize, end: usize) -> Result<Prop<FontName>, TextRangeError>;

    fn range_font_weight(&self, start: usize, end: usize) -> Result<Prop<f64>, TextRangeError>;

    fn range_fills(&self, start: usize, end: usize) -> Result<Prop<Vec<Paint>>, TextRangeError>;
}
