//! Observable ordered collection

use crate::property::ListenerId;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Change delivered to list listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListChange<T> {
    /// Items inserted starting at `from`
    Added {
        /// Index of the first inserted item
        from: usize,
        /// Inserted items, in order
        items: Vec<T>,
    },

    /// Items removed starting at `from`
    Removed {
        /// Index of the first removed item
        from: usize,
        /// Removed items, in order
        items: Vec<T>,
    },

    /// Whole content replaced
    Replaced {
        /// Previous content
        removed: Vec<T>,
        /// New content
        added: Vec<T>,
    },
}

type ListListener<T> = Rc<dyn Fn(&ListChange<T>)>;

/// Observable list handle
///
/// Like [`Property`](crate::Property), clones share one underlying list.
pub struct ObservableList<T> {
    inner: Rc<ListCell<T>>,
}

struct ListCell<T> {
    items: RefCell<Vec<T>>,
    listeners: RefCell<Vec<(ListenerId, ListListener<T>)>>,
}

impl<T: Clone + 'static> ObservableList<T> {
    /// Create an empty list
    #[must_use]
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Create a list seeded with `items`
    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            inner: Rc::new(ListCell {
                items: RefCell::new(items),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Number of items
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    /// Item at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.items.borrow().get(index).cloned()
    }

    /// Copy of the current content
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.inner.items.borrow().clone()
    }

    /// Run `f` against the current content without copying it
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.inner.items.borrow())
    }

    /// Append one item
    pub fn push(&self, item: T) {
        let from = {
            let mut items = self.inner.items.borrow_mut();
            items.push(item.clone());
            items.len() - 1
        };
        self.notify(&ListChange::Added {
            from,
            items: vec![item],
        });
    }

    /// Append every item of `items`, in iteration order
    pub fn add_all(&self, items: impl IntoIterator<Item = T>) {
        let added: Vec<T> = items.into_iter().collect();
        if added.is_empty() {
            return;
        }
        let from = {
            let mut current = self.inner.items.borrow_mut();
            let from = current.len();
            current.extend(added.iter().cloned());
            from
        };
        self.notify(&ListChange::Added { from, items: added });
    }

    /// Remove the item at `index`
    pub fn remove(&self, index: usize) -> Option<T> {
        let removed = {
            let mut items = self.inner.items.borrow_mut();
            if index >= items.len() {
                return None;
            }
            items.remove(index)
        };
        self.notify(&ListChange::Removed {
            from: index,
            items: vec![removed.clone()],
        });
        Some(removed)
    }

    /// Remove every item
    pub fn clear(&self) {
        let removed = std::mem::take(&mut *self.inner.items.borrow_mut());
        if removed.is_empty() {
            return;
        }
        self.notify(&ListChange::Removed {
            from: 0,
            items: removed,
        });
    }

    /// Replace the content in place with `items`, in iteration order
    ///
    /// The list instance is kept, so every holder of this handle observes
    /// the new content. Listeners receive a single `Replaced` change.
    pub fn set_all(&self, items: impl IntoIterator<Item = T>) {
        let added: Vec<T> = items.into_iter().collect();
        let removed = {
            let mut current = self.inner.items.borrow_mut();
            let removed = std::mem::take(&mut *current);
            current.extend(added.iter().cloned());
            removed
        };
        if removed.is_empty() && added.is_empty() {
            return;
        }
        self.notify(&ListChange::Replaced { removed, added });
    }

    /// Register a change listener
    pub fn add_listener(&self, listener: impl Fn(&ListChange<T>) + 'static) -> ListenerId {
        let id = ListenerId::next();
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener; returns `false` if it was not registered
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    fn notify(&self, change: &ListChange<T>) {
        let listeners: Vec<ListListener<T>> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(change);
        }
    }
}

impl<T> ObservableList<T> {
    /// Identity comparison
    #[inline]
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }
}

impl<T: Clone + 'static> Default for ObservableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ObservableList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.items.borrow().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn recorder(list: &ObservableList<u32>) -> Rc<RefCell<Vec<ListChange<u32>>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        list.add_listener(move |c| sink.borrow_mut().push(c.clone()));
        seen
    }

    #[test]
    fn new_is_empty() {
        let list: ObservableList<u32> = ObservableList::new();
        assert!(list.is_empty());
        assert_eq!(list.get(0), None);
    }

    #[test]
    fn push_and_remove_emit_changes() {
        let list = ObservableList::new();
        let seen = recorder(&list);

        list.push(1);
        list.push(2);
        assert_eq!(list.remove(0), Some(1));
        assert_eq!(list.remove(5), None);

        assert_eq!(
            *seen.borrow(),
            vec![
                ListChange::Added { from: 0, items: vec![1] },
                ListChange::Added { from: 1, items: vec![2] },
                ListChange::Removed { from: 0, items: vec![1] },
            ]
        );
        assert_eq!(list.to_vec(), vec![2]);
    }

    #[test]
    fn set_all_replaces_in_place() {
        let list = ObservableList::from_vec(vec![9, 9]);
        let held = list.clone();
        let seen = recorder(&list);

        list.set_all([1, 2, 3]);

        assert_eq!(held.to_vec(), vec![1, 2, 3]);
        assert!(ObservableList::ptr_eq(&list, &held));
        assert_eq!(
            *seen.borrow(),
            vec![ListChange::Replaced {
                removed: vec![9, 9],
                added: vec![1, 2, 3],
            }]
        );
    }

    #[test]
    fn clear_on_empty_is_silent() {
        let list: ObservableList<u32> = ObservableList::new();
        let seen = recorder(&list);
        list.clear();
        list.add_all(Vec::new());
        list.set_all(Vec::new());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn add_all_appends_in_order() {
        let list = ObservableList::from_vec(vec![1]);
        list.add_all(vec![2, 3]);
        assert_eq!(list.with(|items| items.to_vec()), vec![1, 2, 3]);
        assert_eq!(list.len(), 3);
    }
}
