//! Per-type field registry
//!
//! Provides [`FieldRegistry`], the type-wide `name -> index` table that lets
//! index-addressed strategies skip any per-access name lookup.
//!
//! Every key records the registry that minted it. Storage only honours keys
//! from its own layout's registry; see [`FieldRegistry::owns`].

use crate::employee::{FieldSpec, NodeId, EMPLOYEE_FIELDS};
use crate::slot::SlotValue;
use indexmap::IndexMap;
use lazyprop_observable::HandleKind;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_REGISTRY: AtomicU32 = AtomicU32::new(0);

/// Identity of one [`FieldRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RegistryId(u32);

impl RegistryId {
    fn next() -> Self {
        Self(NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed))
    }
}

/// Storage coordinates of one attribute: its name and registered index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    registry: RegistryId,
    name: &'static str,
    index: usize,
}

impl SlotKey {
    /// Attribute name
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// Registered index
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

/// Typed key for a scalar attribute holding `V`
pub struct FieldKey<V> {
    slot: SlotKey,
    _value: PhantomData<fn() -> V>,
}

impl<V> FieldKey<V> {
    /// Storage coordinates
    #[inline]
    #[must_use]
    pub const fn slot(self) -> SlotKey {
        self.slot
    }

    /// Attribute name
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.slot.name
    }
}

impl<V> Clone for FieldKey<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for FieldKey<V> {}

impl<V> fmt::Debug for FieldKey<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldKey").field(&self.slot).finish()
    }
}

/// Key for a collection attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListKey {
    slot: SlotKey,
}

impl ListKey {
    /// Storage coordinates
    #[inline]
    #[must_use]
    pub const fn slot(self) -> SlotKey {
        self.slot
    }
}

/// Insertion-ordered registry of attribute names
///
/// Indices are dense, start at zero and never change once assigned. Each
/// registry has its own identity, so keys minted by one are never owned by
/// another, even when both register the same names.
#[derive(Debug)]
pub struct FieldRegistry {
    id: RegistryId,
    fields: IndexMap<&'static str, HandleKind>,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: RegistryId::next(),
            fields: IndexMap::new(),
        }
    }

    /// Create registry holding `specs` in order
    #[must_use]
    pub fn from_specs(specs: &[FieldSpec]) -> Self {
        let mut registry = Self::new();
        for spec in specs {
            registry.register(*spec);
        }
        registry
    }

    /// Register a field, returning its index
    ///
    /// Registering an existing name returns the index it already has; the
    /// first declared kind wins.
    pub fn register(&mut self, spec: FieldSpec) -> SlotKey {
        let entry = self.fields.entry(spec.name);
        let index = entry.index();
        let declared = *entry.or_insert(spec.kind);
        debug_assert_eq!(declared, spec.kind, "field `{}` re-registered", spec.name);
        SlotKey {
            registry: self.id,
            name: spec.name,
            index,
        }
    }

    /// Register a scalar field holding `V` and mint its typed key
    pub fn scalar<V: SlotValue>(&mut self, name: &'static str) -> FieldKey<V> {
        FieldKey {
            slot: self.register(FieldSpec::new(name, V::KIND)),
            _value: PhantomData,
        }
    }

    /// Register a collection field and mint its key
    pub fn list(&mut self, name: &'static str) -> ListKey {
        ListKey {
            slot: self.register(FieldSpec::new(name, HandleKind::List)),
        }
    }

    /// Whether `key` was minted by this registry
    #[inline]
    #[must_use]
    pub fn owns(&self, key: SlotKey) -> bool {
        key.registry == self.id && key.index < self.fields.len()
    }

    /// Index of `name`
    #[inline]
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.get_index_of(name)
    }

    /// Spec registered at `index`
    #[must_use]
    pub fn spec_at(&self, index: usize) -> Option<FieldSpec> {
        self.fields
            .get_index(index)
            .map(|(name, kind)| FieldSpec::new(*name, *kind))
    }

    /// Every registered spec, in index order
    pub fn iter(&self) -> impl Iterator<Item = FieldSpec> + '_ {
        self.fields
            .iter()
            .map(|(name, kind)| FieldSpec::new(*name, *kind))
    }

    /// Number of registered fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Registry plus resolved keys for the employee attributes
///
/// Built once per strategy type, behind a `Lazy`, before the first instance.
#[derive(Debug)]
pub struct EmployeeLayout {
    /// Registered fields
    pub registry: FieldRegistry,
    /// `name`
    pub name: FieldKey<String>,
    /// `powers`
    pub powers: FieldKey<String>,
    /// `supervisor`
    pub supervisor: FieldKey<Option<NodeId>>,
    /// `minions`
    pub minions: ListKey,
}

impl EmployeeLayout {
    /// Register the employee schema for `strategy`
    #[must_use]
    pub fn register(strategy: &'static str) -> Self {
        let mut registry = FieldRegistry::new();
        let [name, powers, supervisor, minions] = EMPLOYEE_FIELDS;

        let layout = Self {
            name: registry.scalar(name.name),
            powers: registry.scalar(powers.name),
            supervisor: registry.scalar(supervisor.name),
            minions: registry.list(minions.name),
            registry,
        };

        tracing::debug!(
            strategy,
            fields = layout.registry.len(),
            "registered field layout"
        );
        layout
    }

    /// Whether `key` belongs to this layout
    #[inline]
    #[must_use]
    pub fn owns(&self, key: SlotKey) -> bool {
        self.registry.owns(key)
    }

    /// Number of slots an instance needs
    #[inline]
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.registry.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense_and_ordered() {
        let registry = FieldRegistry::from_specs(&EMPLOYEE_FIELDS);
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.index_of("name"), Some(0));
        assert_eq!(registry.index_of("minions"), Some(3));
        assert_eq!(registry.index_of("rank"), None);
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = FieldRegistry::new();
        let first = registry.register(FieldSpec::new("name", HandleKind::String));
        let again = registry.register(FieldSpec::new("name", HandleKind::String));
        assert_eq!(first, again);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn spec_at_returns_declared_kind() {
        let registry = FieldRegistry::from_specs(&EMPLOYEE_FIELDS);
        let spec = registry.spec_at(2).unwrap();
        assert_eq!(spec.name, "supervisor");
        assert_eq!(spec.kind, HandleKind::Object);
        assert!(registry.spec_at(9).is_none());
    }

    #[test]
    fn keys_belong_to_their_registry() {
        let mut ours = FieldRegistry::new();
        let mut theirs = FieldRegistry::new();
        let name = ours.scalar::<String>("name");
        let same_name = theirs.scalar::<String>("name");

        assert_eq!(name.slot().index(), same_name.slot().index());
        assert_ne!(name.slot(), same_name.slot());
        assert!(ours.owns(name.slot()));
        assert!(!ours.owns(same_name.slot()));
        assert!(!theirs.owns(name.slot()));
    }

    #[test]
    fn scalar_kind_follows_value_type() {
        let mut registry = FieldRegistry::new();
        registry.scalar::<Option<NodeId>>("supervisor");
        assert_eq!(registry.spec_at(0).unwrap().kind, HandleKind::Object);
    }

    #[test]
    fn layout_keys_match_registry() {
        let layout = EmployeeLayout::register("test");
        assert_eq!(layout.slot_count(), 4);
        assert_eq!(layout.name.slot().index(), 0);
        assert_eq!(layout.powers.name(), "powers");
        assert_eq!(layout.minions.slot().index(), 3);
        assert!(layout.owns(layout.supervisor.slot()));
        assert!(!layout.owns(EmployeeLayout::register("other").name.slot()));
        let specs: Vec<_> = layout.registry.iter().collect();
        assert_eq!(specs, EMPLOYEE_FIELDS.to_vec());
    }
}
