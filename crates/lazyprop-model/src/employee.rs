//! Employee entity shape and the lazy property contract
//!
//! Provides the [`Employee`] trait every storage strategy implements, plus
//! the field schema shared by all of them.

use crate::error::PropertyError;
use lazyprop_observable::{BeanId, HandleKind, ObservableList, Property};

/// Identity of an employee node
///
/// `supervisor` and `minions` hold ids rather than owning pointers, so any
/// real hierarchy lives in an arena addressed by `NodeId`.
pub type NodeId = BeanId;

/// Attributes of an employee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// `name: String`
    Name,

    /// `powers: String`
    Powers,

    /// `supervisor: Option<NodeId>`
    Supervisor,

    /// `minions: [NodeId]`
    Minions,
}

impl Field {
    /// Every field, in declaration order
    pub const ALL: [Field; 4] = [Field::Name, Field::Powers, Field::Supervisor, Field::Minions];

    /// Attribute name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Powers => "powers",
            Self::Supervisor => "supervisor",
            Self::Minions => "minions",
        }
    }

    /// Declared handle kind
    #[must_use]
    pub const fn kind(self) -> HandleKind {
        match self {
            Self::Name | Self::Powers => HandleKind::String,
            Self::Supervisor => HandleKind::Object,
            Self::Minions => HandleKind::List,
        }
    }

    /// Schema entry for this field
    #[must_use]
    pub const fn spec(self) -> FieldSpec {
        FieldSpec::new(self.name(), self.kind())
    }

    /// Look up a field by attribute name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Attribute name paired with the handle kind to request for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    /// Attribute name
    pub name: &'static str,

    /// Handle kind
    pub kind: HandleKind,
}

impl FieldSpec {
    /// Create new spec
    #[inline]
    #[must_use]
    pub const fn new(name: &'static str, kind: HandleKind) -> Self {
        Self { name, kind }
    }
}

/// Default schema: every employee attribute with its declared kind
pub const EMPLOYEE_FIELDS: [FieldSpec; 4] = [
    Field::Name.spec(),
    Field::Powers.spec(),
    Field::Supervisor.spec(),
    Field::Minions.spec(),
];

/// Handle of any kind an employee attribute can be promoted to
#[derive(Debug, Clone)]
pub enum AnyHandle {
    /// String property (`name`, `powers`)
    Text(Property<String>),

    /// Object property (`supervisor`)
    Link(Property<Option<NodeId>>),

    /// Observable collection (`minions`)
    Items(ObservableList<NodeId>),
}

impl AnyHandle {
    /// Kind of the wrapped handle
    #[must_use]
    pub fn kind(&self) -> HandleKind {
        match self {
            Self::Text(_) => HandleKind::String,
            Self::Link(_) => HandleKind::Object,
            Self::Items(_) => HandleKind::List,
        }
    }

    /// Identity comparison; handles of different kinds are never equal
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        match (a, b) {
            (Self::Text(x), Self::Text(y)) => Property::ptr_eq(x, y),
            (Self::Link(x), Self::Link(y)) => Property::ptr_eq(x, y),
            (Self::Items(x), Self::Items(y)) => ObservableList::ptr_eq(x, y),
            _ => false,
        }
    }

    /// String property, if this is one
    #[must_use]
    pub fn as_text(&self) -> Option<&Property<String>> {
        match self {
            Self::Text(p) => Some(p),
            _ => None,
        }
    }

    /// Object property, if this is one
    #[must_use]
    pub fn as_link(&self) -> Option<&Property<Option<NodeId>>> {
        match self {
            Self::Link(p) => Some(p),
            _ => None,
        }
    }

    /// Observable collection, if this is one
    #[must_use]
    pub fn as_items(&self) -> Option<&ObservableList<NodeId>> {
        match self {
            Self::Items(l) => Some(l),
            _ => None,
        }
    }
}

/// Lazy property contract over the employee shape
///
/// Value accessors never create a handle. Handle accessors create one on
/// first call, seeded with the current raw value, and return the same
/// instance afterwards; from then on value reads and writes go through
/// that handle. Promotion is strictly per instance.
pub trait Employee: Sized {
    /// Strategy identifier
    const STRATEGY: &'static str;

    /// One-time per-type setup, run before the first instance is built
    fn prepare() {}

    /// Construct with the two scalar attributes set through the value path
    fn new(name: &str, powers: &str) -> Self;

    /// Instance identity
    fn id(&self) -> NodeId;

    /// Current name
    fn name(&self) -> String;

    /// Set name
    fn set_name(&mut self, name: String);

    /// Name handle, promoted on first call
    fn name_property(&mut self) -> Property<String>;

    /// Current powers
    fn powers(&self) -> String;

    /// Set powers
    fn set_powers(&mut self, powers: String);

    /// Powers handle, promoted on first call
    fn powers_property(&mut self) -> Property<String>;

    /// Current supervisor
    fn supervisor(&self) -> Option<NodeId>;

    /// Set supervisor
    fn set_supervisor(&mut self, supervisor: Option<NodeId>);

    /// Supervisor handle, promoted on first call
    fn supervisor_property(&mut self) -> Property<Option<NodeId>>;

    /// Current minions; empty when never populated
    fn minions(&self) -> Vec<NodeId>;

    /// Observable minions collection, allocated on first call
    fn minions_list(&mut self) -> ObservableList<NodeId>;

    /// Replace minions; an already promoted collection is updated in place
    fn set_minions(&mut self, minions: Vec<NodeId>);

    /// Whether `field` is currently backed by a handle
    fn is_promoted(&self, field: Field) -> bool;

    /// Give back any storage held outside the instance
    ///
    /// Instances dropped without `release` keep their external entries.
    fn release(self) {}

    /// Reflective handle lookup by attribute name and kind token
    ///
    /// Only `String`, `Object` and `List` kinds are recognised; any other
    /// kind fails with [`PropertyError::UnsupportedHandleKind`] before the
    /// field is even looked at.
    ///
    /// # Errors
    /// Unsupported kind, unknown field, or a kind the field is not declared with.
    fn handle(&mut self, field: &str, kind: HandleKind) -> Result<AnyHandle, PropertyError> {
        match kind {
            HandleKind::String | HandleKind::Object | HandleKind::List => {}
            HandleKind::Integer | HandleKind::Double | HandleKind::Boolean => {
                return Err(PropertyError::unsupported(field, kind));
            }
        }

        let resolved =
            Field::from_name(field).ok_or_else(|| PropertyError::UnknownField(field.to_string()))?;
        if resolved.kind() != kind {
            return Err(PropertyError::KindMismatch {
                field: field.to_string(),
                declared: resolved.kind(),
                requested: kind,
            });
        }

        Ok(match resolved {
            Field::Name => AnyHandle::Text(self.name_property()),
            Field::Powers => AnyHandle::Text(self.powers_property()),
            Field::Supervisor => AnyHandle::Link(self.supervisor_property()),
            Field::Minions => AnyHandle::Items(self.minions_list()),
        })
    }

    /// Promote every field named in `plan`
    ///
    /// # Errors
    /// Stops at the first entry [`Employee::handle`] rejects.
    fn materialize(&mut self, plan: &[FieldSpec]) -> Result<(), PropertyError> {
        for spec in plan {
            self.handle(spec.name, spec.kind)?;
        }
        Ok(())
    }

    /// Promote every attribute and the minions collection
    ///
    /// # Errors
    /// See [`Employee::materialize`].
    fn materialize_all(&mut self) -> Result<(), PropertyError> {
        self.materialize(&EMPLOYEE_FIELDS)
    }
}

/// Collection allocated on first access and cached afterwards
pub(crate) fn lazy_list(slot: &mut Option<ObservableList<NodeId>>) -> ObservableList<NodeId> {
    slot.get_or_insert_with(ObservableList::new).clone()
}
