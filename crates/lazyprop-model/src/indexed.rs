//! Indexed slot array strategy
//!
//! Every instance holds one boxed slot array sized by the type's field
//! registry. Attributes are addressed by the index registered once per
//! type, never by name.

use crate::employee::{Employee, Field, NodeId};
use crate::registry::{EmployeeLayout, SlotKey};
use crate::slot::{detached, Slot, SlotAccess};
use lazyprop_observable::{ObservableList, Property};
use once_cell::sync::Lazy;

static LAYOUT: Lazy<EmployeeLayout> = Lazy::new(|| EmployeeLayout::register(IndexedEmployee::STRATEGY));

/// Employee with all attributes in one index-addressed slot array
#[derive(Debug)]
pub struct IndexedEmployee {
    id: NodeId,
    slots: Box<[Option<Slot>]>,
}

impl IndexedEmployee {
    /// Registered layout shared by every instance of this type
    #[must_use]
    pub fn layout() -> &'static EmployeeLayout {
        &LAYOUT
    }

    /// Length of each instance's slot array
    #[inline]
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn key(field: Field) -> SlotKey {
        let layout = Self::layout();
        match field {
            Field::Name => layout.name.slot(),
            Field::Powers => layout.powers.slot(),
            Field::Supervisor => layout.supervisor.slot(),
            Field::Minions => layout.minions.slot(),
        }
    }
}

impl SlotAccess for IndexedEmployee {
    fn bean(&self) -> NodeId {
        self.id
    }

    fn with_slot<R>(&self, key: SlotKey, f: impl FnOnce(Option<&Slot>) -> R) -> R {
        if !LAYOUT.owns(key) {
            return f(None);
        }
        f(self.slots.get(key.index()).and_then(Option::as_ref))
    }

    fn with_slot_mut<R>(&mut self, key: SlotKey, f: impl FnOnce(&mut Option<Slot>) -> R) -> R {
        match self.slots.get_mut(key.index()) {
            Some(slot) if LAYOUT.owns(key) => f(slot),
            _ => detached(key, f),
        }
    }
}

impl Employee for IndexedEmployee {
    const STRATEGY: &'static str = "indexed-slots";

    fn prepare() {
        Lazy::force(&LAYOUT);
    }

    fn new(name: &str, powers: &str) -> Self {
        let layout = Self::layout();
        let mut employee = Self {
            id: NodeId::next(),
            slots: (0..layout.slot_count()).map(|_| None).collect(),
        };
        employee.set_value(layout.name, name.to_string());
        employee.set_value(layout.powers, powers.to_string());
        employee
    }

    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> String {
        self.get_value(Self::layout().name)
    }

    fn set_name(&mut self, name: String) {
        self.set_value(Self::layout().name, name);
    }

    fn name_property(&mut self) -> Property<String> {
        self.ref_property(Self::layout().name)
    }

    fn powers(&self) -> String {
        self.get_value(Self::layout().powers)
    }

    fn set_powers(&mut self, powers: String) {
        self.set_value(Self::layout().powers, powers);
    }

    fn powers_property(&mut self) -> Property<String> {
        self.ref_property(Self::layout().powers)
    }

    fn supervisor(&self) -> Option<NodeId> {
        self.get_value(Self::layout().supervisor)
    }

    fn set_supervisor(&mut self, supervisor: Option<NodeId>) {
        self.set_value(Self::layout().supervisor, supervisor);
    }

    fn supervisor_property(&mut self) -> Property<Option<NodeId>> {
        self.ref_property(Self::layout().supervisor)
    }

    fn minions(&self) -> Vec<NodeId> {
        self.get_values(Self::layout().minions)
    }

    fn minions_list(&mut self) -> ObservableList<NodeId> {
        self.ref_observables(Self::layout().minions)
    }

    fn set_minions(&mut self, minions: Vec<NodeId>) {
        self.set_values(Self::layout().minions, minions);
    }

    fn is_promoted(&self, field: Field) -> bool {
        self.slot_is_handle(Self::key(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FieldRegistry;

    #[test]
    fn slot_array_matches_registry() {
        let e = IndexedEmployee::new("Gru", "freeze ray");
        assert_eq!(e.slot_count(), IndexedEmployee::layout().registry.len());
    }

    #[test]
    fn unset_attributes_leave_slots_empty() {
        let e = IndexedEmployee::new("Gru", "freeze ray");
        let supervisor = IndexedEmployee::key(Field::Supervisor).index();
        assert!(e.slots[supervisor].is_none());
        assert_eq!(e.supervisor(), None);
    }

    #[test]
    fn keys_from_other_registries_are_ignored() {
        let mut registry = FieldRegistry::new();
        let name = registry.scalar::<String>("name");
        let link = registry.scalar::<Option<NodeId>>("supervisor");
        for extra in ["rank", "team", "badge"] {
            registry.scalar::<String>(extra);
        }
        let past_end = registry.scalar::<String>("office");
        assert!(past_end.slot().index() >= IndexedEmployee::layout().slot_count());

        let mut e = IndexedEmployee::new("Gru", "freeze ray");
        assert_eq!(e.get_value(name), "");

        e.set_value(past_end, "Kevin".to_string());
        let stray = e.ref_property(link);
        stray.set(Some(NodeId::next()));
        e.set_value(name, "Dru".to_string());

        assert_eq!(e.name(), "Gru");
        assert_eq!(e.supervisor(), None);
        assert!(!e.is_promoted(Field::Name));
        assert!(!e.is_promoted(Field::Supervisor));
    }

    #[test]
    fn promotion_is_per_instance() {
        let mut a = IndexedEmployee::new("Gru", "freeze ray");
        let b = IndexedEmployee::new("Gru", "freeze ray");
        a.name_property().set("Dru".to_string());

        assert!(a.is_promoted(Field::Name));
        assert!(!b.is_promoted(Field::Name));
        assert_eq!(b.name(), "Gru");
    }
}
