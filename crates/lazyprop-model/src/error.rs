//! Error types for lazy property access

use lazyprop_observable::HandleKind;

/// Failure to produce a handle for an attribute
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertyError {
    /// Requested handle kind is not one this storage supports
    #[error("unsupported handle kind `{kind}` requested for `{field}`")]
    UnsupportedHandleKind {
        /// Attribute the handle was requested for
        field: String,
        /// Requested kind
        kind: HandleKind,
    },

    /// No attribute with this name
    #[error("unknown field `{0}`")]
    UnknownField(String),

    /// Supported kind, but not the one the attribute is declared with
    #[error("field `{field}` is declared as `{declared}`, not `{requested}`")]
    KindMismatch {
        /// Attribute name
        field: String,
        /// Declared kind
        declared: HandleKind,
        /// Requested kind
        requested: HandleKind,
    },
}

impl PropertyError {
    /// Create unsupported-kind error
    #[inline]
    #[must_use]
    pub fn unsupported(field: impl Into<String>, kind: HandleKind) -> Self {
        Self::UnsupportedHandleKind {
            field: field.into(),
            kind,
        }
    }

    /// Whether this is an unsupported-kind failure
    #[inline]
    #[must_use]
    pub fn is_unsupported_kind(&self) -> bool {
        matches!(self, Self::UnsupportedHandleKind { .. })
    }
}

/// Assert that a raw slot and a handle never both claim an attribute
///
/// A violation means a strategy's promotion is broken, so it is never
/// reported as a recoverable error. Checked in debug builds, and in every
/// build with the `strict-debug` feature.
#[track_caller]
#[inline]
pub(crate) fn assert_single_authority(field: &str, raw_present: bool, handle_present: bool) {
    let single = !(raw_present && handle_present);

    #[cfg(feature = "strict-debug")]
    assert!(single, "stale raw value: `{field}` has both a raw slot and a handle");

    debug_assert!(single, "stale raw value: `{field}` has both a raw slot and a handle");
    let _ = (field, single);
}
