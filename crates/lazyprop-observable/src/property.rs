//! Observable scalar handle
//!
//! Provides [`Property<T>`], the handle a lazy attribute is promoted to.

use crate::bean::BeanId;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LISTENER: AtomicU64 = AtomicU64::new(1);

/// Registration token returned by `add_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) fn next() -> Self {
        Self(NEXT_LISTENER.fetch_add(1, Ordering::Relaxed))
    }
}

type ChangeListener<T> = Rc<dyn Fn(&T, &T)>;

/// Observable handle around a single attribute value
///
/// Cloning a `Property` clones the handle, not the value: every clone
/// observes the same state and compares equal under [`Property::ptr_eq`].
pub struct Property<T> {
    inner: Rc<PropertyCell<T>>,
}

struct PropertyCell<T> {
    bean: BeanId,
    name: &'static str,
    value: RefCell<T>,
    listeners: RefCell<Vec<(ListenerId, ChangeListener<T>)>>,
    binding: RefCell<Option<Binding<T>>>,
}

struct Binding<T> {
    source: Weak<PropertyCell<T>>,
    listener: ListenerId,
}

impl<T: Clone + PartialEq + 'static> Property<T> {
    /// Create a handle owned by `bean` for the attribute `name`
    #[must_use]
    pub fn new(bean: BeanId, name: &'static str, initial: T) -> Self {
        Self {
            inner: Rc::new(PropertyCell {
                bean,
                name,
                value: RefCell::new(initial),
                listeners: RefCell::new(Vec::new()),
                binding: RefCell::new(None),
            }),
        }
    }

    /// Current value
    #[inline]
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Run `f` against the current value without cloning it
    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Replace the value, notifying listeners if it changed
    ///
    /// A bound property keeps following its source: a direct `set` is
    /// overwritten by the source's next change.
    pub fn set(&self, value: T) {
        let old = {
            let mut slot = self.inner.value.borrow_mut();
            if *slot == value {
                return;
            }
            std::mem::replace(&mut *slot, value.clone())
        };

        // Snapshot so listeners may (un)register while being notified
        let listeners: Vec<ChangeListener<T>> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(&old, &value);
        }
    }

    /// Register a change listener receiving `(old, new)`
    pub fn add_listener(&self, listener: impl Fn(&T, &T) + 'static) -> ListenerId {
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

    /// Number of registered listeners
    #[inline]
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Follow `source`: adopt its value now and on every later change
    ///
    /// The source only holds a weak reference back to this handle, so a
    /// dropped target never keeps itself alive through the binding.
    pub fn bind(&self, source: &Property<T>) {
        self.unbind();
        self.set(source.get());

        let target = Rc::downgrade(&self.inner);
        let listener = source.add_listener(move |_, new| {
            if let Some(inner) = target.upgrade() {
                Property { inner }.set(new.clone());
            }
        });

        *self.inner.binding.borrow_mut() = Some(Binding {
            source: Rc::downgrade(&source.inner),
            listener,
        });
    }

    /// Stop following the bound source, if any
    pub fn unbind(&self) {
        let binding = self.inner.binding.borrow_mut().take();
        if let Some(binding) = binding {
            if let Some(source) = binding.source.upgrade() {
                Property { inner: source }.remove_listener(binding.listener);
            }
        }
    }

    /// Whether this handle currently follows a source
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.inner
            .binding
            .borrow()
            .as_ref()
            .is_some_and(|b| b.source.strong_count() > 0)
    }
}

impl<T> Property<T> {
    /// Identity comparison
    #[inline]
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    /// Owning bean
    #[inline]
    #[must_use]
    pub fn bean(&self) -> BeanId {
        self.inner.bean
    }

    /// Attribute name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.inner.name
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("bean", &self.inner.bean)
            .field("name", &self.inner.name)
            .field("value", &*self.inner.value.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn text(initial: &str) -> Property<String> {
        Property::new(BeanId::next(), "name", initial.to_string())
    }

    #[test]
    fn get_returns_initial() {
        let p = text("Gru");
        assert_eq!(p.get(), "Gru");
        assert_eq!(p.name(), "name");
    }

    #[test]
    fn set_notifies_old_and_new() {
        let p = text("a");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        p.add_listener(move |old, new| sink.borrow_mut().push((old.clone(), new.clone())));

        p.set("b".to_string());

        assert_eq!(*seen.borrow(), vec![("a".to_string(), "b".to_string())]);
    }

    #[test]
    fn set_same_value_is_silent() {
        let p = text("a");
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        p.add_listener(move |_, _| counter.set(counter.get() + 1));

        p.set("a".to_string());
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn remove_listener_stops_notifications() {
        let p = text("a");
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let id = p.add_listener(move |_, _| counter.set(counter.get() + 1));

        assert!(p.remove_listener(id));
        assert!(!p.remove_listener(id));
        p.set("b".to_string());
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn clones_share_identity() {
        let p = text("a");
        let q = p.clone();
        q.set("b".to_string());
        assert_eq!(p.get(), "b");
        assert!(Property::ptr_eq(&p, &q));
        assert!(!Property::ptr_eq(&p, &text("b")));
    }

    #[test]
    fn bind_follows_source() {
        let source = text("boss");
        let target = text("minion");

        target.bind(&source);
        assert_eq!(target.get(), "boss");
        assert!(target.is_bound());

        source.set("new boss".to_string());
        assert_eq!(target.get(), "new boss");
    }

    #[test]
    fn unbind_detaches_listener() {
        let source = text("a");
        let target = text("b");
        target.bind(&source);
        assert_eq!(source.listener_count(), 1);

        target.unbind();
        assert!(!target.is_bound());
        assert_eq!(source.listener_count(), 0);

        source.set("c".to_string());
        assert_eq!(target.get(), "a");
    }

    #[test]
    fn dropped_target_does_not_break_source() {
        let source = text("a");
        {
            let target = text("b");
            target.bind(&source);
        }
        source.set("c".to_string());
        assert_eq!(source.get(), "c");
    }

    #[test]
    fn listener_may_register_during_dispatch() {
        let p = text("a");
        let handle = p.clone();
        p.add_listener(move |_, _| {
            handle.add_listener(|_, _| {});
        });
        p.set("b".to_string());
        assert_eq!(p.listener_count(), 2);
    }
}
