//! Per-node extraction for the figbridge serializer.
//!
//! Each extractor is a pure read of one scene node:
//! - `layout` - geometry and auto-layout participation
//! - `style` - paints, effects, corners, opacity, blending
//! - `text` - typography and styled segments
//! - `semantics` - heuristic UI role detection
//! - `visual` - visual weight and decoration flags

pub mod layout;
pub mod semantics;
pub mod style;
pub mod text;
pub mod visual;

pub use layout::extract_layout;
pub use semantics::{ClassifierThresholds, RoleRule, SemanticClassifier, ShapeHint};
pub use style::extract_style;
pub use text::{extract_text, StyledSegmentScanner};
pub use visual::analyze_visual_context;
