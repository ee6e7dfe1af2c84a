//! Lazyprop Employee Model
//!
//! The employee entity and the storage strategies that implement its lazy
//! property contract.
//!
//! # Core Concepts
//!
//! - [`Employee`]: The contract. Value accessors never allocate a handle;
//!   handle accessors promote an attribute on first call.
//! - [`FieldRegistry`]: Type-wide `name -> index` table, built once per type
//! - [`SlotAccess`]: The contract written once over keyed slot storage
//! - [`PropertyError`]: Failures of reflective handle lookup
//!
//! # Strategies
//!
//! | Id | Type | Storage |
//! |----|------|---------|
//! | `eager` | [`EagerEmployee`] | handles from construction on |
//! | `erased-slot` | [`ErasedSlotEmployee`] | one raw-or-handle slot per attribute |
//! | `shadow-field` | [`ShadowEmployee`] | raw slot plus handle slot per attribute |
//! | `indexed-slots` | [`IndexedEmployee`] | boxed slot array addressed by registry index |
//! | `named-map` | [`NamedMapEmployee`] | per-instance map keyed by name |
//! | `keyed-store` | [`KeyedStoreEmployee`] | thread-local map keyed by `(id, name)` |
//! | `ordinal-store` | [`OrdinalStoreEmployee`] | thread-local map keyed by `(id, index)` |
//!
//! # Example
//!
//! ```rust
//! use lazyprop_model::{Employee, Field, IndexedEmployee};
//! use lazyprop_observable::{HandleKind, Property};
//!
//! let mut gru = IndexedEmployee::new("Gru", "freeze ray");
//! assert!(!gru.is_promoted(Field::Name));
//!
//! let name = gru.name_property();
//! gru.set_name(String::from("Felonious"));
//! assert_eq!(name.get(), "Felonious");
//!
//! let again = gru.handle("name", HandleKind::String).unwrap();
//! assert!(Property::ptr_eq(&name, again.as_text().unwrap()));
//! assert!(gru.handle("name", HandleKind::Integer).is_err());
//! ```

#![warn(unreachable_pub)]

pub mod eager;
pub mod employee;
pub mod erased;
pub mod error;
pub mod external;
pub mod indexed;
pub mod named_map;
pub mod registry;
pub mod shadow;
pub mod slot;

pub use eager::EagerEmployee;
pub use employee::{AnyHandle, Employee, Field, FieldSpec, NodeId, EMPLOYEE_FIELDS};
pub use erased::{ErasedSlot, ErasedSlotEmployee};
pub use error::PropertyError;
pub use external::{ExternalStore, KeyedStoreEmployee, OrdinalStoreEmployee};
pub use indexed::IndexedEmployee;
pub use named_map::NamedMapEmployee;
pub use registry::{EmployeeLayout, FieldKey, FieldRegistry, ListKey, SlotKey};
pub use shadow::{ShadowEmployee, ShadowField};
pub use slot::{Slot, SlotAccess, SlotValue};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
