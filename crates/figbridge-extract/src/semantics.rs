//! Semantic role detection for design nodes.
//!
//! Roles are inferred from node names and shapes by an ordered rule list; the
//! first matching rule wins. Interactivity and decoration flags can also be
//! raised independently of the role.

use figbridge_core::{SceneNode, SemanticHints, SemanticRole};
use tracing::trace;

/// Tunable size thresholds used by shape-based rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierThresholds {
    /// Largest side of a square node still treated as an icon.
    pub icon_max_side: f64,
    /// Thickest line still treated as a divider.
    pub divider_max_thickness: f64,
    /// Shortest line treated as a divider.
    pub divider_min_length: f64,
    /// Nodes fainter than this are decorative.
    pub decorative_max_opacity: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            icon_max_side: 48.0,
            divider_max_thickness: 2.0,
            divider_min_length: 50.0,
            decorative_max_opacity: 0.1,
        }
    }
}

/// Shape predicate a rule can match on instead of its keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeHint {
    /// Square with a side no larger than `icon_max_side`.
    SmallSquare,
    /// Thin horizontal or vertical line.
    ThinLine,
}

impl ShapeHint {
    fn matches(&self, width: f64, height: f64, t: &ClassifierThresholds) -> bool {
        match self {
            ShapeHint::SmallSquare => width == height && width <= t.icon_max_side,
            ShapeHint::ThinLine => {
                (height <= t.divider_max_thickness && width > t.divider_min_length)
                    || (width <= t.divider_max_thickness && height > t.divider_min_length)
            }
        }
    }
}

/// One entry of the ordered rule list.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleRule {
    pub role: SemanticRole,
    /// Matched as substrings of the lowercased node name.
    pub keywords: Vec<&'static str>,
    /// Alternative shape match.
    pub shape: Option<ShapeHint>,
    pub confidence: f64,
    pub interactive: bool,
    pub decorative: bool,
}

impl RoleRule {
    pub fn new(role: SemanticRole, keywords: Vec<&'static str>, confidence: f64) -> Self {
        Self {
            role,
            keywords,
            shape: None,
            confidence,
            interactive: false,
            decorative: false,
        }
    }

    pub fn with_shape(mut self, shape: ShapeHint) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    pub fn decorative(mut self) -> Self {
        self.decorative = true;
        self
    }

    fn matches(&self, name_lower: &str, width: f64, height: f64, t: &ClassifierThresholds) -> bool {
        self.keywords.iter().any(|k| name_lower.contains(k))
            || self
                .shape
                .map_or(false, |shape| shape.matches(width, height, t))
    }
}

/// Detects likely UI roles of scene nodes.
#[derive(Debug, Clone)]
pub struct SemanticClassifier {
    rules: Vec<RoleRule>,
    decorative_keywords: Vec<&'static str>,
    thresholds: ClassifierThresholds,
}

impl SemanticClassifier {
    /// Create a classifier with the default rule list.
    pub fn new() -> Self {
        Self {
            rules: vec![
                RoleRule::new(SemanticRole::Button, vec!["button", "btn", "cta"], 0.9).interactive(),
                RoleRule::new(SemanticRole::Input, vec!["input", "textfield", "field"], 0.9)
                    .interactive(),
                RoleRule::new(SemanticRole::Card, vec!["card"], 0.85),
                RoleRule::new(SemanticRole::Header, vec!["header", "navbar", "appbar"], 0.85),
                RoleRule::new(SemanticRole::Avatar, vec!["avatar", "profile"], 0.8),
                RoleRule::new(SemanticRole::Icon, vec!["icon"], 0.7)
                    .with_shape(ShapeHint::SmallSquare),
                RoleRule::new(SemanticRole::Divider, vec!["divider", "separator"], 0.8)
                    .with_shape(ShapeHint::ThinLine)
                    .decorative(),
                RoleRule::new(SemanticRole::Badge, vec!["badge", "tag", "chip"], 0.8),
            ],
            decorative_keywords: vec!["bg", "background", "overlay"],
            thresholds: ClassifierThresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: ClassifierThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Append a rule after the existing ones.
    pub fn push_rule(&mut self, rule: RoleRule) {
        self.rules.push(rule);
    }

    /// Insert a rule at `index` so it is evaluated before later rules.
    pub fn insert_rule(&mut self, index: usize, rule: RoleRule) {
        let index = index.min(self.rules.len());
        self.rules.insert(index, rule);
    }

    pub fn rules(&self) -> &[RoleRule] {
        &self.rules
    }

    /// Classify a node found at `depth` in the walk.
    pub fn classify<N: SceneNode>(&self, node: &N, depth: u32) -> SemanticHints {
        let name_lower = node.name().to_lowercase();
        let (width, height) = (node.width(), node.height());
        let mut hints = SemanticHints::default();

        if let Some(rule) = self
            .rules
            .iter()
            .find(|rule| rule.matches(&name_lower, width, height, &self.thresholds))
        {
            hints.likely_role = Some(rule.role);
            hints.confidence = rule.confidence;
            if rule.interactive {
                hints.is_interactive = Some(true);
            }
            if rule.decorative {
                hints.is_decorative = Some(true);
            }
        }

        if node.reaction_count() > 0 {
            hints.is_interactive = Some(true);
        }
        if node
            .opacity()
            .map_or(false, |o| o < self.thresholds.decorative_max_opacity)
        {
            hints.is_decorative = Some(true);
        }
        if self
            .decorative_keywords
            .iter()
            .any(|k| name_lower.contains(k))
        {
            hints.is_decorative = Some(true);
        }

        trace!(
            depth,
            name = node.name(),
            role = hints.likely_role.map(|r| r.as_str()),
            "classified node"
        );
        hints
    }
}

impl Default for SemanticClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figbridge_core::{DocumentNode, NodeType};
    use proptest::prelude::*;

    fn node(name: &str, width: f64, height: f64) -> DocumentNode {
        DocumentNode::new("1:1", name, NodeType::Frame).with_size(width, height)
    }

    #[test]
    fn test_primary_button() {
        let hints = SemanticClassifier::new().classify(&node("Primary Button", 160.0, 48.0), 1);
        assert_eq!(hints.likely_role, Some(SemanticRole::Button));
        assert_eq!(hints.is_interactive, Some(true));
        assert_eq!(hints.confidence, 0.9);
    }

    #[test]
    fn test_divider_by_name_and_shape() {
        let hints = SemanticClassifier::new().classify(&node("Divider", 200.0, 1.0), 2);
        assert_eq!(hints.likely_role, Some(SemanticRole::Divider));
        assert_eq!(hints.is_decorative, Some(true));
        assert_eq!(hints.confidence, 0.8);

        let hints = SemanticClassifier::new().classify(&node("Line 4", 1.0, 120.0), 2);
        assert_eq!(hints.likely_role, Some(SemanticRole::Divider));
    }

    #[test]
    fn test_small_square_is_icon() {
        let hints = SemanticClassifier::new().classify(&node("Vector 12", 24.0, 24.0), 3);
        assert_eq!(hints.likely_role, Some(SemanticRole::Icon));
        assert_eq!(hints.confidence, 0.7);

        let hints = SemanticClassifier::new().classify(&node("Photo", 64.0, 64.0), 3);
        assert_eq!(hints.likely_role, None);
        assert_eq!(hints.confidence, 0.0);
    }

    #[test]
    fn test_first_match_wins() {
        // "Card Header" matches card before header.
        let hints = SemanticClassifier::new().classify(&node("Card Header", 300.0, 60.0), 1);
        assert_eq!(hints.likely_role, Some(SemanticRole::Card));
        assert_eq!(hints.confidence, 0.85);
    }

    #[test]
    fn test_reactions_force_interactive() {
        let mut n = node("Row", 300.0, 60.0);
        n.reactions = 1;
        let hints = SemanticClassifier::new().classify(&n, 1);
        assert_eq!(hints.likely_role, None);
        assert_eq!(hints.is_interactive, Some(true));
    }

    #[test]
    fn test_decorative_overrides() {
        let hints =
            SemanticClassifier::new().classify(&node("Card", 300.0, 200.0).with_opacity(0.05), 1);
        assert_eq!(hints.likely_role, Some(SemanticRole::Card));
        assert_eq!(hints.is_decorative, Some(true));

        let hints = SemanticClassifier::new().classify(&node("Hero Background", 375.0, 300.0), 1);
        assert_eq!(hints.is_decorative, Some(true));
        assert_eq!(hints.is_interactive, None);
    }

    #[test]
    fn test_custom_rule_order() {
        let mut classifier = SemanticClassifier::new();
        classifier.insert_rule(0, RoleRule::new(SemanticRole::Header, vec!["toolbar"], 0.6));
        let hints = classifier.classify(&node("Toolbar Button", 300.0, 56.0), 1);
        assert_eq!(hints.likely_role, Some(SemanticRole::Header));
        assert_eq!(hints.confidence, 0.6);
        assert_eq!(hints.is_interactive, None);
    }

    #[test]
    fn test_tuned_thresholds() {
        let classifier = SemanticClassifier::new().with_thresholds(ClassifierThresholds {
            icon_max_side: 16.0,
            ..Default::default()
        });
        let hints = classifier.classify(&node("Vector", 24.0, 24.0), 1);
        assert_eq!(hints.likely_role, None);
    }

    proptest! {
        #[test]
        fn prop_flags_are_never_false(
            name in "[A-Za-z ]{0,16}",
            width in 0.0f64..500.0,
            height in 0.0f64..500.0,
            opacity in 0.0f64..1.0,
            reactions in 0usize..3,
        ) {
            let mut n = node(&name, width, height).with_opacity(opacity);
            n.reactions = reactions;
            let hints = SemanticClassifier::new().classify(&n, 0);
            prop_assert!((0.0..=1.0).contains(&hints.confidence));
            prop_assert_ne!(hints.is_interactive, Some(false));
            prop_assert_ne!(hints.is_decorative, Some(false));
            if hints.likely_role.is_none() {
                prop_assert_eq!(hints.confidence, 0.0);
            }
        }
    }
}
