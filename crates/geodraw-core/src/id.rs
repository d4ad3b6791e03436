use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shape::ShapeKind;

/// Shape identifier: `<kind>-<unix millis>-<random suffix>`, never reused
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    /// Generate a fresh id for a shape of the given kind
    pub fn generate(kind: ShapeKind) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!(
            "{}-{}-{}",
            kind.as_str(),
            Utc::now().timestamp_millis(),
            &suffix[..9]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ShapeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ShapeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_tagged_and_distinct() {
        let a = ShapeId::generate(ShapeKind::Polygon);
        let b = ShapeId::generate(ShapeKind::Polygon);
        assert!(a.as_str().starts_with("polygon-"));
        assert!(ShapeId::generate(ShapeKind::Circle).as_str().starts_with("circle-"));
        assert_ne!(a, b);
    }
}
