//! Shadow-field strategy
//!
//! Two slots per attribute: the raw value and the handle. Accessors check
//! whether the handle slot is populated; promotion moves the raw value into
//! a new handle and clears the raw slot exactly once.

use crate::employee::{lazy_list, Employee, Field, NodeId};
use crate::error::assert_single_authority;
use lazyprop_observable::{ObservableList, Property};

/// Raw slot plus lazily created handle slot
#[derive(Debug)]
pub struct ShadowField<T> {
    raw: Option<T>,
    handle: Option<Property<T>>,
}

impl<T: Clone + PartialEq + Default + 'static> ShadowField<T> {
    /// Create with a raw value
    #[inline]
    pub fn new(value: T) -> Self {
        Self {
            raw: Some(value),
            handle: None,
        }
    }

    /// Current logical value
    #[inline]
    pub fn get(&self) -> T {
        match &self.handle {
            Some(handle) => handle.get(),
            None => self.raw.clone().unwrap_or_default(),
        }
    }

    /// Store `value`, routing through the handle when promoted
    #[inline]
    pub fn set(&mut self, value: T) {
        match &self.handle {
            Some(handle) => handle.set(value),
            None => self.raw = Some(value),
        }
    }

    /// Handle, created from the raw value on first call
    pub fn property(&mut self, bean: NodeId, name: &'static str) -> Property<T> {
        if let Some(handle) = &self.handle {
            assert_single_authority(name, self.raw.is_some(), true);
            return handle.clone();
        }
        let handle = Property::new(bean, name, self.raw.take().unwrap_or_default());
        self.handle = Some(handle.clone());
        handle
    }

    /// Whether the handle slot is populated
    #[inline]
    pub fn is_promoted(&self) -> bool {
        self.handle.is_some()
    }
}

/// Employee keeping a raw and a handle slot per scalar attribute
#[derive(Debug)]
pub struct ShadowEmployee {
    id: NodeId,
    name: ShadowField<String>,
    powers: ShadowField<String>,
    supervisor: ShadowField<Option<NodeId>>,
    minions: Option<ObservableList<NodeId>>,
}

impl Employee for ShadowEmployee {
    const STRATEGY: &'static str = "shadow-field";

    fn new(name: &str, powers: &str) -> Self {
        Self {
            id: NodeId::next(),
            name: ShadowField::new(name.to_string()),
            powers: ShadowField::new(powers.to_string()),
            supervisor: ShadowField::new(None),
            minions: None,
        }
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
        self.name.property(self.id, Field::Name.name())
    }

    fn powers(&self) -> String {
        self.powers.get()
    }

    fn set_powers(&mut self, powers: String) {
        self.powers.set(powers);
    }

    fn powers_property(&mut self) -> Property<String> {
        self.powers.property(self.id, Field::Powers.name())
    }

    fn supervisor(&self) -> Option<NodeId> {
        self.supervisor.get()
    }

    fn set_supervisor(&mut self, supervisor: Option<NodeId>) {
        self.supervisor.set(supervisor);
    }

    fn supervisor_property(&mut self) -> Property<Option<NodeId>> {
        self.supervisor.property(self.id, Field::Supervisor.name())
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
            Field::Name => self.name.is_promoted(),
            Field::Powers => self.powers.is_promoted(),
            Field::Supervisor => self.supervisor.is_promoted(),
            Field::Minions => self.minions.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_clears_raw_slot() {
        let mut field = ShadowField::new("Gru".to_string());
        let handle = field.property(NodeId::next(), "name");

        assert!(field.raw.is_none());
        assert!(field.is_promoted());
        assert_eq!(handle.get(), "Gru");
    }

    #[test]
    fn set_after_promotion_leaves_raw_empty() {
        let mut field = ShadowField::new(Some(NodeId::from_raw(1)));
        let handle = field.property(NodeId::next(), "supervisor");
        field.set(None);

        assert!(field.raw.is_none());
        assert_eq!(handle.get(), None);
        assert_eq!(field.get(), None);
    }

    #[test]
    fn constructor_keeps_values_raw() {
        let e = ShadowEmployee::new("Gru", "freeze ray");
        assert_eq!(e.powers(), "freeze ray");
        assert!(!e.is_promoted(Field::Powers));
    }
}
