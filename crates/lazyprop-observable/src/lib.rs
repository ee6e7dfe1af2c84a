//! Lazyprop Observable Handles
//!
//! Single-threaded observable wrappers for attribute values.
//!
//! # Core Concepts
//!
//! - [`Property<T>`]: Observable scalar handle (change listeners, one-way binding)
//! - [`ObservableList<T>`]: Observable ordered collection
//! - [`HandleKind`]: Concrete handle kind tokens callers may request
//! - [`BeanId`]: Identity of the object that owns a handle
//!
//! Handles have identity semantics: cloning a handle yields the same
//! instance, and [`Property::ptr_eq`] / [`ObservableList::ptr_eq`] compare
//! identity rather than value.
//!
//! # Example
//!
//! ```rust
//! use lazyprop_observable::{BeanId, Property};
//!
//! let owner = BeanId::next();
//! let name = Property::new(owner, "name", String::from("Gru"));
//! let held = name.clone();
//!
//! name.set(String::from("Dr. Nefario"));
//! assert_eq!(held.get(), "Dr. Nefario");
//! assert!(Property::ptr_eq(&name, &held));
//! ```

#![warn(unreachable_pub)]

mod bean;
mod kind;
mod list;
mod property;

pub use bean::BeanId;
pub use kind::HandleKind;
pub use list::{ListChange, ObservableList};
pub use property::{ListenerId, Property};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
