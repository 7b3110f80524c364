//! Tri-state property values.
//!
//! Design-tool properties can be missing from a node entirely, vary across a
//! composite or text range ("mixed"), or carry a single value.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A property read from a scene node.
///
/// In JSON a value is written as-is, a mixed value as the string `"MIXED"`
/// and an absent one as `null` or a missing field.
#[derive(Debug, Clone, PartialEq)]
pub enum Prop<T> {
    /// The node does not expose this property.
    Absent,
    /// The property has no single value across the node or range.
    Mixed,
    /// A uniform value.
    Value(T),
}

impl<T> Prop<T> {
    /// Get the uniform value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Prop::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Take the uniform value, if any. Absent and mixed both collapse to `None`.
    pub fn into_value(self) -> Option<T> {
        match self {
            Prop::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_mixed(&self) -> bool {
        matches!(self, Prop::Mixed)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Prop::Absent)
    }

    pub fn as_ref(&self) -> Prop<&T> {
        match self {
            Prop::Absent => Prop::Absent,
            Prop::Mixed => Prop::Mixed,
            Prop::Value(v) => Prop::Value(v),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Prop<U> {
        match self {
            Prop::Absent => Prop::Absent,
            Prop::Mixed => Prop::Mixed,
            Prop::Value(v) => Prop::Value(f(v)),
        }
    }

    /// Resolve to the uniform value or a fallback when absent or mixed.
    pub fn unwrap_or(self, default: T) -> T {
        self.into_value().unwrap_or(default)
    }

    pub fn unwrap_or_else(self, f: impl FnOnce() -> T) -> T {
        self.into_value().unwrap_or_else(f)
    }

    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.into_value().unwrap_or_default()
    }
}

impl<T: Serialize> Serialize for Prop<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Prop::Absent => serializer.serialize_none(),
            Prop::Mixed => serializer.serialize_str(MIXED),
            Prop::Value(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Prop<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<PropRepr<T>>::deserialize(deserializer)? {
            None => Prop::Absent,
            Some(PropRepr::Marker(MixedMarker::Mixed)) => Prop::Mixed,
            Some(PropRepr::Value(v)) => Prop::Value(v),
        })
    }
}

const MIXED: &str = "MIXED";

#[derive(Deserialize)]
#[serde(untagged)]
enum PropRepr<T> {
    Marker(MixedMarker),
    Value(T),
}

#[derive(Deserialize)]
enum MixedMarker {
    #[serde(rename = "MIXED")]
    Mixed,
}

impl<T> Default for Prop<T> {
    fn default() -> Self {
        Prop::Absent
    }
}

impl<T> From<Option<T>> for Prop<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Prop::Value(v),
            None => Prop::Absent,
        }
    }
}

impl<T: PartialEq> Prop<T> {
    /// Collapse a sequence of per-item values into one property.
    ///
    /// Returns `Absent` for an empty sequence, `Value` when every item agrees
    /// and `Mixed` otherwise.
    pub fn uniform<I: IntoIterator<Item = T>>(items: I) -> Self {
        let mut iter = items.into_iter();
        let Some(first) = iter.next() else {
            return Prop::Absent;
        };
        for item in iter {
            if item != first {
                return Prop::Mixed;
            }
        }
        Prop::Value(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_collapses_to_none() {
        assert_eq!(Prop::<f64>::Mixed.into_value(), None);
        assert_eq!(Prop::<f64>::Absent.into_value(), None);
        assert_eq!(Prop::Value(2.0).into_value(), Some(2.0));
    }

    #[test]
    fn test_unwrap_or() {
        assert_eq!(Prop::<f64>::Mixed.unwrap_or(14.0), 14.0);
        assert_eq!(Prop::Value(12.0).unwrap_or(14.0), 12.0);
    }

    #[test]
    fn test_unwrap_or_default() {
        assert_eq!(Prop::<String>::Mixed.unwrap_or_default(), "");
        assert_eq!(Prop::<u32>::Absent.unwrap_or_default(), 0);
        assert_eq!(Prop::Value(7u32).unwrap_or_default(), 7);
    }

    #[test]
    fn test_json_representation() {
        let mixed: Prop<f64> = serde_json::from_str("\"MIXED\"").unwrap();
        assert_eq!(mixed, Prop::Mixed);
        let value: Prop<f64> = serde_json::from_str("12.5").unwrap();
        assert_eq!(value, Prop::Value(12.5));
        let absent: Prop<f64> = serde_json::from_str("null").unwrap();
        assert_eq!(absent, Prop::Absent);
        assert_eq!(serde_json::to_string(&Prop::<f64>::Mixed).unwrap(), "\"MIXED\"");
    }

    #[test]
    fn test_uniform() {
        assert_eq!(Prop::uniform(vec![1, 1, 1]), Prop::Value(1));
        assert_eq!(Prop::uniform(vec![1, 2]), Prop::Mixed);
        assert_eq!(Prop::<i32>::uniform(Vec::new()), Prop::Absent);
    }
}
