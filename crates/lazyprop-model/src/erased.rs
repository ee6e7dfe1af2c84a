//! Type-erased slot strategy
//!
//! One slot per attribute that is either the raw value or its handle. The
//! slot is a two-variant sum type, so promotion is an exhaustive match
//! instead of a runtime type test.

use crate::employee::{lazy_list, Employee, Field, NodeId};
use lazyprop_observable::{ObservableList, Property};

/// Raw value or handle, in one slot
#[derive(Debug)]
pub enum ErasedSlot<T> {
    /// Not yet promoted
    Raw(T),

    /// Promoted; the handle is the only source of truth
    Handle(Property<T>),
}

impl<T: Clone + PartialEq + Default + 'static> ErasedSlot<T> {
    /// Current logical value
    #[inline]
    pub fn get(&self) -> T {
        match self {
            Self::Raw(value) => value.clone(),
            Self::Handle(handle) => handle.get(),
        }
    }

    /// Store `value`, routing through the handle when promoted
    #[inline]
    pub fn set(&mut self, value: T) {
        match self {
            Self::Raw(raw) => *raw = value,
            Self::Handle(handle) => handle.set(value),
        }
    }

    /// Replace the slot content with a handle seeded from the raw value
    pub fn promote(&mut self, bean: NodeId, name: &'static str) -> Property<T> {
        match self {
            Self::Handle(handle) => handle.clone(),
            Self::Raw(raw) => {
                let handle = Property::new(bean, name, std::mem::take(raw));
                *self = Self::Handle(handle.clone());
                handle
            }
        }
    }

    /// Whether the slot holds a handle
    #[inline]
    pub fn is_handle(&self) -> bool {
        matches!(self, Self::Handle(_))
    }
}

/// Employee with one erased slot per scalar attribute
#[derive(Debug)]
pub struct ErasedSlotEmployee {
    id: NodeId,
    name: ErasedSlot<String>,
    powers: ErasedSlot<String>,
    supervisor: ErasedSlot<Option<NodeId>>,
    minions: Option<ObservableList<NodeId>>,
}

impl Employee for ErasedSlotEmployee {
    const STRATEGY: &'static str = "erased-slot";

    fn new(name: &str, powers: &str) -> Self {
        let mut employee = Self {
            id: NodeId::next(),
            name: ErasedSlot::Raw(String::new()),
            powers: ErasedSlot::Raw(String::new()),
            supervisor: ErasedSlot::Raw(None),
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
        self.name.promote(self.id, Field::Name.name())
    }

    fn powers(&self) -> String {
        self.powers.get()
    }

    fn set_powers(&mut self, powers: String) {
        self.powers.set(powers);
    }

    fn powers_property(&mut self) -> Property<String> {
        self.powers.promote(self.id, Field::Powers.name())
    }

    fn supervisor(&self) -> Option<NodeId> {
        self.supervisor.get()
    }

    fn set_supervisor(&mut self, supervisor: Option<NodeId>) {
        self.supervisor.set(supervisor);
    }

    fn supervisor_property(&mut self) -> Property<Option<NodeId>> {
        self.supervisor.promote(self.id, Field::Supervisor.name())
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
            Field::Name => self.name.is_handle(),
            Field::Powers => self.powers.is_handle(),
            Field::Supervisor => self.supervisor.is_handle(),
            Field::Minions => self.minions.is_some(),
        }
    }
}
