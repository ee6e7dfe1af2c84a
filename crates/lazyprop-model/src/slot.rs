//! Dynamic slot storage shared by the array and map strategies
//!
//! A [`Slot`] holds one attribute either as a raw value or as its handle.
//! [`SlotAccess`] implements the lazy property contract once, as default
//! methods over whatever keyed storage a strategy provides.

use crate::employee::NodeId;
use crate::registry::{FieldKey, ListKey, SlotKey};
use lazyprop_observable::{HandleKind, ObservableList, Property};

/// One attribute's storage: raw value or promoted handle, never both
#[derive(Debug, Clone)]
pub enum Slot {
    /// Raw string
    Text(String),

    /// Raw object reference
    Link(Option<NodeId>),

    /// Raw collection
    Items(Vec<NodeId>),

    /// Promoted string
    TextHandle(Property<String>),

    /// Promoted object reference
    LinkHandle(Property<Option<NodeId>>),

    /// Promoted collection
    ItemsHandle(ObservableList<NodeId>),
}

impl Slot {
    /// Whether this slot holds a handle
    #[inline]
    #[must_use]
    pub fn is_handle(&self) -> bool {
        matches!(
            self,
            Self::TextHandle(_) | Self::LinkHandle(_) | Self::ItemsHandle(_)
        )
    }

    /// Kind of value stored, raw or not
    #[must_use]
    pub fn kind(&self) -> HandleKind {
        match self {
            Self::Text(_) | Self::TextHandle(_) => HandleKind::String,
            Self::Link(_) | Self::LinkHandle(_) => HandleKind::Object,
            Self::Items(_) | Self::ItemsHandle(_) => HandleKind::List,
        }
    }
}

/// Scalar value type that can live in a [`Slot`]
pub trait SlotValue: Clone + PartialEq + Default + 'static {
    /// Handle kind this value promotes to
    const KIND: HandleKind;

    /// Wrap as a raw slot
    fn into_raw(self) -> Slot;

    /// Wrap a handle as a slot
    fn into_handle(handle: Property<Self>) -> Slot;

    /// Logical value of a slot of this type
    fn read(slot: &Slot) -> Option<Self>;

    /// Handle held by a slot of this type
    fn as_handle(slot: &Slot) -> Option<&Property<Self>>;

    /// Consume a raw slot of this type
    fn take_raw(slot: Slot) -> Option<Self>;
}

impl SlotValue for String {
    const KIND: HandleKind = HandleKind::String;

    fn into_raw(self) -> Slot {
        Slot::Text(self)
    }

    fn into_handle(handle: Property<Self>) -> Slot {
        Slot::TextHandle(handle)
    }

    fn read(slot: &Slot) -> Option<Self> {
        match slot {
            Slot::Text(v) => Some(v.clone()),
            Slot::TextHandle(h) => Some(h.get()),
            _ => None,
        }
    }

    fn as_handle(slot: &Slot) -> Option<&Property<Self>> {
        match slot {
            Slot::TextHandle(h) => Some(h),
            _ => None,
        }
    }

    fn take_raw(slot: Slot) -> Option<Self> {
        match slot {
            Slot::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl SlotValue for Option<NodeId> {
    const KIND: HandleKind = HandleKind::Object;

    fn into_raw(self) -> Slot {
        Slot::Link(self)
    }

    fn into_handle(handle: Property<Self>) -> Slot {
        Slot::LinkHandle(handle)
    }

    fn read(slot: &Slot) -> Option<Self> {
        match slot {
            Slot::Link(v) => Some(*v),
            Slot::LinkHandle(h) => Some(h.get()),
            _ => None,
        }
    }

    fn as_handle(slot: &Slot) -> Option<&Property<Self>> {
        match slot {
            Slot::LinkHandle(h) => Some(h),
            _ => None,
        }
    }

    fn take_raw(slot: Slot) -> Option<Self> {
        match slot {
            Slot::Link(v) => Some(v),
            _ => None,
        }
    }
}

/// Stand-in for a key the storage does not own: reads see nothing and writes
/// land in a scratch slot that is dropped
pub(crate) fn detached<R>(key: SlotKey, f: impl FnOnce(&mut Option<Slot>) -> R) -> R {
    tracing::warn!(field = key.name(), "ignoring slot key from another registry");
    f(&mut None)
}

/// Keyed slot storage with the lazy property contract on top
///
/// Implementors only say where a slot lives, and must ignore keys minted by
/// a registry other than their own. Handles are cloned out of the
/// storage before they are written to, so listeners triggered by a write may
/// read the same storage again.
pub trait SlotAccess {
    /// Owner recorded on created handles
    fn bean(&self) -> NodeId;

    /// Read access to the slot at `key`
    fn with_slot<R>(&self, key: SlotKey, f: impl FnOnce(Option<&Slot>) -> R) -> R;

    /// Write access to the slot at `key`; leaving `None` empties it
    fn with_slot_mut<R>(&mut self, key: SlotKey, f: impl FnOnce(&mut Option<Slot>) -> R) -> R;

    /// Logical value, or `V::default()` when never set
    fn get_value<V: SlotValue>(&self, key: FieldKey<V>) -> V {
        self.with_slot(key.slot(), |slot| slot.and_then(V::read))
            .unwrap_or_default()
    }

    /// Write through the handle if there is one, else store raw
    fn set_value<V: SlotValue>(&mut self, key: FieldKey<V>, value: V) {
        let handle = self.with_slot(key.slot(), |slot| slot.and_then(V::as_handle).cloned());
        match handle {
            Some(handle) => handle.set(value),
            None => self.with_slot_mut(key.slot(), |slot| *slot = Some(value.into_raw())),
        }
    }

    /// Handle for `key`, promoting the raw value on first call
    fn ref_property<V: SlotValue>(&mut self, key: FieldKey<V>) -> Property<V> {
        let bean = self.bean();
        self.with_slot_mut(key.slot(), |slot| {
            if let Some(handle) = slot.as_ref().and_then(V::as_handle) {
                return handle.clone();
            }
            let initial = slot.take().and_then(V::take_raw).unwrap_or_default();
            let handle = Property::new(bean, key.name(), initial);
            *slot = Some(V::into_handle(handle.clone()));
            handle
        })
    }

    /// Collection content, empty when never set
    fn get_values(&self, key: ListKey) -> Vec<NodeId> {
        self.with_slot(key.slot(), |slot| match slot {
            Some(Slot::Items(items)) => items.clone(),
            Some(Slot::ItemsHandle(list)) => list.to_vec(),
            _ => Vec::new(),
        })
    }

    /// Replace collection content; a promoted list is updated in place
    fn set_values(&mut self, key: ListKey, items: Vec<NodeId>) {
        let list = self.with_slot(key.slot(), |slot| match slot {
            Some(Slot::ItemsHandle(list)) => Some(list.clone()),
            _ => None,
        });
        match list {
            Some(list) => list.set_all(items),
            None => self.with_slot_mut(key.slot(), |slot| *slot = Some(Slot::Items(items))),
        }
    }

    /// Observable collection for `key`, promoting raw content on first call
    fn ref_observables(&mut self, key: ListKey) -> ObservableList<NodeId> {
        self.with_slot_mut(key.slot(), |slot| {
            if let Some(Slot::ItemsHandle(list)) = slot {
                return list.clone();
            }
            let seed = match slot.take() {
                Some(Slot::Items(items)) => items,
                _ => Vec::new(),
            };
            let list = ObservableList::from_vec(seed);
            *slot = Some(Slot::ItemsHandle(list.clone()));
            list
        })
    }

    /// Whether the slot at `key` holds a handle
    fn slot_is_handle(&self, key: SlotKey) -> bool {
        self.with_slot(key, |slot| slot.is_some_and(Slot::is_handle))
    }
}
