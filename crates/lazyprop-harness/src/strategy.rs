//! Benchmark strategies
//!
//! Provides the object-safe [`Strategy`] trait the harness drives, the
//! [`EmployeeStrategy`] adapter that runs any [`Employee`] implementation
//! through it, and [`StrategySet`], the ordered registry of strategies for
//! one run.

use crate::error::HarnessError;
use lazyprop_model::{
    EagerEmployee, Employee, ErasedSlotEmployee, FieldSpec, IndexedEmployee, KeyedStoreEmployee,
    NamedMapEmployee, OrdinalStoreEmployee, PropertyError, ShadowEmployee,
};
use std::fmt;

/// Name every benchmark node is built with
pub const NODE_NAME: &str = "name";

/// Powers every benchmark node is built with
pub const NODE_POWERS: &str = "powers";

/// One storage layout under measurement
///
/// The strategy owns the trial's working collection; the harness only
/// tells it when to prepare, build and let go.
pub trait Strategy: fmt::Debug {
    /// Strategy identifier
    fn name(&self) -> &'static str;

    /// Empty the working collection and run one-time type setup
    ///
    /// Called before the baseline sample, so nothing allocated here counts
    /// towards the trial.
    fn prime(&mut self);

    /// Build `count` nodes into the working collection
    ///
    /// With `access_handles`, every node's handles are materialized as it
    /// is built.
    ///
    /// # Errors
    /// The first handle request the storage rejects; nodes built so far
    /// stay in the working collection until [`Strategy::drain`].
    fn construct(&mut self, count: usize, access_handles: bool) -> Result<(), PropertyError>;

    /// Release every node in the working collection
    fn drain(&mut self);

    /// Nodes currently held
    fn live_instances(&self) -> usize;
}

/// [`Strategy`] over one [`Employee`] implementation
pub struct EmployeeStrategy<E> {
    working: Vec<E>,
    plan: Option<Vec<FieldSpec>>,
}

impl<E: Employee> EmployeeStrategy<E> {
    /// Create new strategy that materializes every attribute
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            working: Vec::new(),
            plan: None,
        }
    }

    /// Materialize exactly `plan` instead of every attribute
    #[must_use]
    pub fn with_handle_plan(mut self, plan: Vec<FieldSpec>) -> Self {
        self.plan = Some(plan);
        self
    }

    fn build_one(&self, access_handles: bool) -> Result<E, PropertyError> {
        let mut node = E::new(NODE_NAME, NODE_POWERS);
        if access_handles {
            let materialized = match &self.plan {
                Some(plan) => node.materialize(plan),
                None => node.materialize_all(),
            };
            if let Err(err) = materialized {
                node.release();
                return Err(err);
            }
        }
        Ok(node)
    }
}

impl<E: Employee> Default for EmployeeStrategy<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EmployeeStrategy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmployeeStrategy")
            .field("type", &std::any::type_name::<E>())
            .field("live", &self.working.len())
            .field("plan", &self.plan)
            .finish()
    }
}

impl<E: Employee> Strategy for EmployeeStrategy<E> {
    fn name(&self) -> &'static str {
        E::STRATEGY
    }

    fn prime(&mut self) {
        self.drain();
        E::prepare();
    }

    fn construct(&mut self, count: usize, access_handles: bool) -> Result<(), PropertyError> {
        // Node storage is part of the measured footprint
        self.working.reserve_exact(count);
        for _ in 0..count {
            let node = self.build_one(access_handles)?;
            self.working.push(node);
        }
        Ok(())
    }

    fn drain(&mut self) {
        for node in self.working.drain(..) {
            node.release();
        }
        self.working.shrink_to_fit();
    }

    fn live_instances(&self) -> usize {
        self.working.len()
    }
}

/// Strategies in registration order
#[derive(Debug, Default)]
pub struct StrategySet {
    strategies: Vec<Box<dyn Strategy>>,
}

impl StrategySet {
    /// Create new empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Create set with every built-in strategy
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut set = Self::new();
        set.register(EmployeeStrategy::<EagerEmployee>::new());
        set.register(EmployeeStrategy::<ErasedSlotEmployee>::new());
        set.register(EmployeeStrategy::<ShadowEmployee>::new());
        set.register(EmployeeStrategy::<IndexedEmployee>::new());
        set.register(EmployeeStrategy::<NamedMapEmployee>::new());
        set.register(EmployeeStrategy::<KeyedStoreEmployee>::new());
        set.register(EmployeeStrategy::<OrdinalStoreEmployee>::new());
        set
    }

    /// Create set holding the built-in strategies named in `names`, in that order
    ///
    /// # Errors
    /// [`HarnessError::UnknownStrategy`] for a name that is not built in,
    /// [`HarnessError::DuplicateStrategy`] for a name given twice.
    pub fn select<S: AsRef<str>>(names: &[S]) -> Result<Self, HarnessError> {
        let mut pool: Vec<Option<Box<dyn Strategy>>> =
            Self::with_defaults().strategies.into_iter().map(Some).collect();
        let mut set = Self::new();
        for name in names {
            let name = name.as_ref();
            let slot = pool
                .iter_mut()
                .find(|s| s.as_ref().is_some_and(|s| s.name() == name))
                .ok_or_else(|| {
                    if set.contains(name) {
                        HarnessError::DuplicateStrategy(name.to_string())
                    } else {
                        HarnessError::unknown_strategy(name)
                    }
                })?;
            if let Some(strategy) = slot.take() {
                set.strategies.push(strategy);
            }
        }
        Ok(set)
    }

    /// Identifiers of every built-in strategy
    #[must_use]
    pub fn builtin_names() -> Vec<&'static str> {
        Self::with_defaults().names()
    }

    /// Append a strategy
    pub fn register(&mut self, strategy: impl Strategy + 'static) {
        self.strategies.push(Box::new(strategy));
    }

    /// Registered identifiers, in order
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Check if a strategy is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.strategies.iter().any(|s| s.name() == name)
    }

    /// Get number of registered strategies
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Check if set is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut (dyn Strategy + 'static)> {
        self.strategies.get_mut(index).map(|s| &mut **s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyprop_observable::HandleKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_keep_registration_order() {
        assert_eq!(
            StrategySet::with_defaults().names(),
            vec![
                "eager",
                "erased-slot",
                "shadow-field",
                "indexed-slots",
                "named-map",
                "keyed-store",
                "ordinal-store",
            ]
        );
    }

    #[test]
    fn select_follows_requested_order() {
        let set = StrategySet::select(&["named-map", "eager"]).unwrap();
        assert_eq!(set.names(), vec!["named-map", "eager"]);
        assert!(set.contains("eager"));
        assert!(!set.contains("shadow-field"));
    }

    #[test]
    fn select_rejects_unknown_and_duplicates() {
        let err = StrategySet::select(&["soup"]).unwrap_err();
        assert!(matches!(err, HarnessError::UnknownStrategy(ref n) if n == "soup"));
        let err = StrategySet::select(&["eager", "named-map", "eager"]).unwrap_err();
        assert!(matches!(err, HarnessError::DuplicateStrategy(ref n) if n == "eager"));
    }

    #[test]
    fn construct_and_drain() {
        let mut strategy = EmployeeStrategy::<ShadowEmployee>::new();
        strategy.prime();
        strategy.construct(16, true).unwrap();
        assert_eq!(strategy.live_instances(), 16);
        strategy.drain();
        assert_eq!(strategy.live_instances(), 0);
    }

    #[test]
    fn unsupported_plan_fails_construction() {
        let mut strategy = EmployeeStrategy::<KeyedStoreEmployee>::new()
            .with_handle_plan(vec![FieldSpec::new("name", HandleKind::Boolean)]);
        strategy.prime();
        let before = KeyedStoreEmployee::store_len();

        let err = strategy.construct(3, true).unwrap_err();
        assert!(err.is_unsupported_kind());
        assert_eq!(strategy.live_instances(), 0);
        assert_eq!(KeyedStoreEmployee::store_len(), before);

        // The plan is only consulted when handles are accessed
        strategy.construct(3, false).unwrap();
        assert_eq!(strategy.live_instances(), 3);
        strategy.drain();
        assert_eq!(KeyedStoreEmployee::store_len(), before);
    }
}
