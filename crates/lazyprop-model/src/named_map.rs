//! Named map strategy
//!
//! Each instance owns a model-properties map keyed by attribute name, holding
//! raw values until a handle is requested.

use crate::employee::{Employee, Field, NodeId};
use crate::registry::{EmployeeLayout, SlotKey};
use crate::slot::{detached, Slot, SlotAccess};
use lazyprop_observable::{ObservableList, Property};
use once_cell::sync::Lazy;
use std::collections::HashMap;

static LAYOUT: Lazy<EmployeeLayout> = Lazy::new(|| EmployeeLayout::register(NamedMapEmployee::STRATEGY));

/// Employee storing attributes in a per-instance `name -> slot` map
#[derive(Debug)]
pub struct NamedMapEmployee {
    id: NodeId,
    properties: HashMap<&'static str, Slot>,
}

impl NamedMapEmployee {
    /// Number of attributes currently stored
    #[inline]
    #[must_use]
    pub fn stored_len(&self) -> usize {
        self.properties.len()
    }
}

impl SlotAccess for NamedMapEmployee {
    fn bean(&self) -> NodeId {
        self.id
    }

    fn with_slot<R>(&self, key: SlotKey, f: impl FnOnce(Option<&Slot>) -> R) -> R {
        if !LAYOUT.owns(key) {
            return f(None);
        }
        f(self.properties.get(key.name()))
    }

    fn with_slot_mut<R>(&mut self, key: SlotKey, f: impl FnOnce(&mut Option<Slot>) -> R) -> R {
        if !LAYOUT.owns(key) {
            return detached(key, f);
        }
        let mut slot = self.properties.remove(key.name());
        let out = f(&mut slot);
        if let Some(slot) = slot {
            self.properties.insert(key.name(), slot);
        }
        out
    }
}

impl Employee for NamedMapEmployee {
    const STRATEGY: &'static str = "named-map";

    fn prepare() {
        Lazy::force(&LAYOUT);
    }

    fn new(name: &str, powers: &str) -> Self {
        let mut employee = Self {
            id: NodeId::next(),
            properties: HashMap::new(),
        };
        employee.set_value(LAYOUT.name, name.to_string());
        employee.set_value(LAYOUT.powers, powers.to_string());
        employee
    }

    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> String {
        self.get_value(LAYOUT.name)
    }

    fn set_name(&mut self, name: String) {
        self.set_value(LAYOUT.name, name);
    }

    fn name_property(&mut self) -> Property<String> {
        self.ref_property(LAYOUT.name)
    }

    fn powers(&self) -> String {
        self.get_value(LAYOUT.powers)
    }

    fn set_powers(&mut self, powers: String) {
        self.set_value(LAYOUT.powers, powers);
    }

    fn powers_property(&mut self) -> Property<String> {
        self.ref_property(LAYOUT.powers)
    }

    fn supervisor(&self) -> Option<NodeId> {
        self.get_value(LAYOUT.supervisor)
    }

    fn set_supervisor(&mut self, supervisor: Option<NodeId>) {
        self.set_value(LAYOUT.supervisor, supervisor);
    }

    fn supervisor_property(&mut self) -> Property<Option<NodeId>> {
        self.ref_property(LAYOUT.supervisor)
    }

    fn minions(&self) -> Vec<NodeId> {
        self.get_values(LAYOUT.minions)
    }

    fn minions_list(&mut self) -> ObservableList<NodeId> {
        self.ref_observables(LAYOUT.minions)
    }

    fn set_minions(&mut self, minions: Vec<NodeId>) {
        self.set_values(LAYOUT.minions, minions);
    }

    fn is_promoted(&self, field: Field) -> bool {
        self.properties
            .get(field.name())
            .is_some_and(Slot::is_handle)
    }
}
