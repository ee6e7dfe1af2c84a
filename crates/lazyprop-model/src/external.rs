//! External keyed-map strategies
//!
//! Attribute storage lives outside the node, in a thread-local map; the node
//! itself carries only its [`NodeId`]. Two key schemes are provided:
//!
//! - [`KeyedStoreEmployee`]: `(NodeId, attribute name)`
//! - [`OrdinalStoreEmployee`]: `(NodeId, registered field index)`
//!
//! Keys use the explicit monotonic node id rather than an identity hash, so
//! distinct live nodes never share a key.
//!
//! # Cost profile
//!
//! Nothing is removed when a node is dropped. Entries stay in the map until
//! [`Employee::release`] is called for the node or the whole store is
//! reclaimed, so the map grows without bound for callers that do neither.

use crate::employee::{Employee, Field, NodeId};
use crate::registry::{EmployeeLayout, SlotKey};
use crate::slot::{detached, Slot, SlotAccess};
use lazyprop_observable::{ObservableList, Property};
use once_cell::sync::Lazy;
use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;

/// Slot map keyed by `K`
#[derive(Debug)]
pub struct ExternalStore<K> {
    slots: RefCell<HashMap<K, Slot>>,
}

impl<K: Eq + Hash + Copy> ExternalStore<K> {
    fn new() -> Self {
        Self {
            slots: RefCell::new(HashMap::new()),
        }
    }

    fn read<R>(&self, key: K, f: impl FnOnce(Option<&Slot>) -> R) -> R {
        f(self.slots.borrow().get(&key))
    }

    fn write<R>(&self, key: K, f: impl FnOnce(&mut Option<Slot>) -> R) -> R {
        let mut slot = self.slots.borrow_mut().remove(&key);
        let out = f(&mut slot);
        if let Some(slot) = slot {
            self.slots.borrow_mut().insert(key, slot);
        }
        out
    }

    fn evict(&self, keys: impl IntoIterator<Item = K>) {
        let mut slots = self.slots.borrow_mut();
        for key in keys {
            slots.remove(&key);
        }
    }

    fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    fn clear(&self) {
        let mut slots = self.slots.borrow_mut();
        slots.clear();
        slots.shrink_to_fit();
    }
}

thread_local! {
    static NAMED_STORE: ExternalStore<(NodeId, &'static str)> = ExternalStore::new();
    static ORDINAL_STORE: ExternalStore<(NodeId, usize)> = ExternalStore::new();
}

static KEYED_LAYOUT: Lazy<EmployeeLayout> =
    Lazy::new(|| EmployeeLayout::register(KeyedStoreEmployee::STRATEGY));

static ORDINAL_LAYOUT: Lazy<EmployeeLayout> =
    Lazy::new(|| EmployeeLayout::register(OrdinalStoreEmployee::STRATEGY));

fn field_key(layout: &EmployeeLayout, field: Field) -> SlotKey {
    match field {
        Field::Name => layout.name.slot(),
        Field::Powers => layout.powers.slot(),
        Field::Supervisor => layout.supervisor.slot(),
        Field::Minions => layout.minions.slot(),
    }
}

/// Employee whose attributes live in a store keyed by `(id, name)`
#[derive(Debug)]
pub struct KeyedStoreEmployee {
    id: NodeId,
}

/// Employee whose attributes live in a store keyed by `(id, index)`
#[derive(Debug)]
pub struct OrdinalStoreEmployee {
    id: NodeId,
}

macro_rules! external_employee {
    ($ty:ident, $strategy:literal, $store:ident, $layout:ident, |$key:ident| $store_key:expr) => {
        impl $ty {
            /// Entries currently held by this type's store on this thread
            #[must_use]
            pub fn store_len() -> usize {
                $store.with(ExternalStore::len)
            }

            /// Drop every entry of this type's store on this thread
            ///
            /// Values of instances still alive read as defaults afterwards.
            pub fn reclaim() {
                $store.with(ExternalStore::clear);
            }
        }

        impl SlotAccess for $ty {
            fn bean(&self) -> NodeId {
                self.id
            }

            fn with_slot<R>(&self, $key: SlotKey, f: impl FnOnce(Option<&Slot>) -> R) -> R {
                if !$layout.owns($key) {
                    return f(None);
                }
                let id = self.id;
                $store.with(|store| store.read((id, $store_key), f))
            }

            fn with_slot_mut<R>(
                &mut self,
                $key: SlotKey,
                f: impl FnOnce(&mut Option<Slot>) -> R,
            ) -> R {
                if !$layout.owns($key) {
                    return detached($key, f);
                }
                let id = self.id;
                $store.with(|store| store.write((id, $store_key), f))
            }
        }

        impl Employee for $ty {
            const STRATEGY: &'static str = $strategy;

            fn prepare() {
                Lazy::force(&$layout);
            }

            fn new(name: &str, powers: &str) -> Self {
                let mut employee = Self { id: NodeId::next() };
                employee.set_value($layout.name, name.to_string());
                employee.set_value($layout.powers, powers.to_string());
                employee
            }

            fn id(&self) -> NodeId {
                self.id
            }

            fn name(&self) -> String {
                self.get_value($layout.name)
            }

            fn set_name(&mut self, name: String) {
                self.set_value($layout.name, name);
            }

            fn name_property(&mut self) -> Property<String> {
                self.ref_property($layout.name)
            }

            fn powers(&self) -> String {
                self.get_value($layout.powers)
            }

            fn set_powers(&mut self, powers: String) {
                self.set_value($layout.powers, powers);
            }

            fn powers_property(&mut self) -> Property<String> {
                self.ref_property($layout.powers)
            }

            fn supervisor(&self) -> Option<NodeId> {
                self.get_value($layout.supervisor)
            }

            fn set_supervisor(&mut self, supervisor: Option<NodeId>) {
                self.set_value($layout.supervisor, supervisor);
            }

            fn supervisor_property(&mut self) -> Property<Option<NodeId>> {
                self.ref_property($layout.supervisor)
            }

            fn minions(&self) -> Vec<NodeId> {
                self.get_values($layout.minions)
            }

            fn minions_list(&mut self) -> ObservableList<NodeId> {
                self.ref_observables($layout.minions)
            }

            fn set_minions(&mut self, minions: Vec<NodeId>) {
                self.set_values($layout.minions, minions);
            }

            fn is_promoted(&self, field: Field) -> bool {
                self.slot_is_handle(field_key(&$layout, field))
            }

            fn release(self) {
                let id = self.id;
                let keys = Field::ALL.map(|field| {
                    let $key = field_key(&$layout, field);
                    (id, $store_key)
                });
                $store.with(|store| store.evict(keys));
            }
        }
    };
}

external_employee!(KeyedStoreEmployee, "keyed-store", NAMED_STORE, KEYED_LAYOUT, |key| key.name());
external_employee!(OrdinalStoreEmployee, "ordinal-store", ORDINAL_STORE, ORDINAL_LAYOUT, |key| key.index());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_carries_only_its_id() {
        assert_eq!(
            std::mem::size_of::<KeyedStoreEmployee>(),
            std::mem::size_of::<NodeId>()
        );
        assert_eq!(
            std::mem::size_of::<OrdinalStoreEmployee>(),
            std::mem::size_of::<NodeId>()
        );
    }

    #[test]
    fn dropped_nodes_keep_their_entries() {
        let before = KeyedStoreEmployee::store_len();
        drop(KeyedStoreEmployee::new("Gru", "freeze ray"));
        assert_eq!(KeyedStoreEmployee::store_len(), before + 2);
    }

    #[test]
    fn release_evicts_entries() {
        let before = OrdinalStoreEmployee::store_len();
        let mut e = OrdinalStoreEmployee::new("Gru", "freeze ray");
        e.set_minions(vec![NodeId::next()]);
        e.supervisor_property();
        assert_eq!(OrdinalStoreEmployee::store_len(), before + 4);

        e.release();
        assert_eq!(OrdinalStoreEmployee::store_len(), before);
    }

    #[test]
    fn reclaim_empties_the_store() {
        let e = KeyedStoreEmployee::new("Gru", "freeze ray");
        KeyedStoreEmployee::reclaim();
        assert_eq!(KeyedStoreEmployee::store_len(), 0);
        assert_eq!(e.name(), "");
    }

    #[test]
    fn foreign_keys_leave_the_store_alone() {
        let mut registry = crate::registry::FieldRegistry::new();
        let name = registry.scalar::<String>("name");

        let mut e = OrdinalStoreEmployee::new("Gru", "freeze ray");
        let before = OrdinalStoreEmployee::store_len();
        e.set_value(name, "Dru".to_string());
        e.ref_property(name);

        assert_eq!(OrdinalStoreEmployee::store_len(), before);
        assert_eq!(e.name(), "Gru");
        assert!(!e.is_promoted(Field::Name));
        e.release();
    }

    #[test]
    fn stores_are_separate_per_type() {
        let k = KeyedStoreEmployee::new("Gru", "freeze ray");
        let o = OrdinalStoreEmployee::new("Dru", "hair");
        assert_eq!(k.name(), "Gru");
        assert_eq!(o.name(), "Dru");
    }
}
