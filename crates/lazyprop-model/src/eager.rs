//! Eager strategy
//!
//! Baseline with no lazy optimisation: every scalar attribute is a handle
//! from construction on.

use crate::employee::{lazy_list, Employee, Field, NodeId};
use lazyprop_observable::{ObservableList, Property};

/// Employee storing every scalar attribute as a handle
#[derive(Debug)]
pub struct EagerEmployee {
    id: NodeId,
    name: Property<String>,
    powers: Property<String>,
    supervisor: Property<Option<NodeId>>,
    minions: Option<ObservableList<NodeId>>,
}

impl Employee for EagerEmployee {
    const STRATEGY: &'static str = "eager";

    fn new(name: &str, powers: &str) -> Self {
        let id = NodeId::next();
        let mut employee = Self {
            id,
            name: Property::new(id, Field::Name.name(), String::new()),
            powers: Property::new(id, Field::Powers.name(), String::new()),
            supervisor: Property::new(id, Field::Supervisor.name(), None),
            minions: None,
        };
        employee.set_name(name.to_string());
        employee.set_powers(powers.to_string());
        employee
    }

    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> String {
        self.name.get()
    }

    fn set_name(&mut self, name: String) {
        self.name.set(name);
    }

    fn name_property(&mut self) -> Property<String> {
        self.name.clone()
    }

    fn powers(&self) -> String {
        self.powers.get()
    }

    fn set_powers(&mut self, powers: String) {
        self.powers.set(powers);
    }

    fn powers_property(&mut self) -> Property<String> {
        self.powers.clone()
    }

    fn supervisor(&self) -> Option<NodeId> {
        self.supervisor.get()
    }

    fn set_supervisor(&mut self, supervisor: Option<NodeId>) {
        self.supervisor.set(supervisor);
    }

    fn supervisor_property(&mut self) -> Property<Option<NodeId>> {
        self.supervisor.clone()
    }

    fn minions(&self) -> Vec<NodeId> {
        self.minions.as_ref().map(ObservableList::to_vec).unwrap_or_default()
    }

    fn minions_list(&mut self) -> ObservableList<NodeId> {
        lazy_list(&mut self.minions)
    }

    fn set_minions(&mut self, minions: Vec<NodeId>) {
        self.minions_list().set_all(minions);
    }

    fn is_promoted(&self, field: Field) -> bool {
        match field {
            Field::Name | Field::Powers | Field::Supervisor => true,
            Field::Minions => self.minions.is_some(),
        }
    }
}
