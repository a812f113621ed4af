use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of one piece of authority-published state.
///
/// Identity is stable across ticks: two messages carrying an equal
/// `(category, name)` pair refer to the same logical widget regardless of
/// their payload kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId {
    /// Ordered category path, outermost first.
    pub category: Vec<String>,
    /// Leaf name, unique within its category.
    pub name: String,
}

impl ElementId {
    pub fn new<C, S>(category: C, name: impl Into<String>) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            category: category.into_iter().map(Into::into).collect(),
            name: name.into(),
        }
    }

    /// Identity directly under the root, with an empty category path.
    pub fn rooted(name: impl Into<String>) -> Self {
        Self {
            category: Vec::new(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.category {
            write!(f, "{part}/")?;
        }
        write!(f, "{}", self.name)
    }
}
