//! Handle kind tokens

use serde::{Deserialize, Serialize};
use std::fmt;

/// Concrete handle kind a caller may request for an attribute
///
/// Storage strategies that dispatch on a kind token enumerate the kinds
/// they support and reject everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
    /// `Property<String>`
    String,

    /// `Property<Option<T>>` holding an object reference
    Object,

    /// `ObservableList<T>`
    List,

    /// `Property<i64>`
    Integer,

    /// `Property<f64>`
    Double,

    /// `Property<bool>`
    Boolean,
}

impl HandleKind {
    /// Every kind token, in declaration order
    pub const ALL: [HandleKind; 6] = [
        HandleKind::String,
        HandleKind::Object,
        HandleKind::List,
        HandleKind::Integer,
        HandleKind::Double,
        HandleKind::Boolean,
    ];

    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Object => "object",
            Self::List => "list",
            Self::Integer => "integer",
            Self::Double => "double",
            Self::Boolean => "boolean",
        }
    }

    /// Whether this kind wraps a collection
    #[inline]
    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::List)
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_list_is_collection() {
        let collections: Vec<_> = HandleKind::ALL
            .iter()
            .filter(|k| k.is_collection())
            .collect();
        assert_eq!(collections, vec![&HandleKind::List]);
    }

    #[test]
    fn display_matches_as_str() {
        for kind in HandleKind::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }
}
