//! Testing utilities for the lazyprop workspace
//!
//! Shared fixtures for harness and model integration tests.

#![allow(missing_docs)]

use lazyprop_harness::{EmployeeStrategy, Harness, MemoryProbe, StrategySet};
use lazyprop_model::{
    EagerEmployee, Employee, FieldSpec, KeyedStoreEmployee, NodeId, ShadowEmployee,
};
use lazyprop_observable::HandleKind;
use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Handle plan that asks for a kind no strategy supports
pub fn unsupported_plan() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("name", HandleKind::String),
        FieldSpec::new("powers", HandleKind::Integer),
    ]
}

/// `eager` and `shadow-field`, in that order
pub fn two_strategies() -> StrategySet {
    let mut set = StrategySet::new();
    set.register(EmployeeStrategy::<EagerEmployee>::new());
    set.register(EmployeeStrategy::<ShadowEmployee>::new());
    set
}

/// `eager`, a `keyed-store` configured with [`unsupported_plan`], then `shadow-field`
pub fn strategies_with_failing_middle() -> StrategySet {
    let mut set = StrategySet::new();
    set.register(EmployeeStrategy::<EagerEmployee>::new());
    set.register(EmployeeStrategy::<KeyedStoreEmployee>::new().with_handle_plan(unsupported_plan()));
    set.register(EmployeeStrategy::<ShadowEmployee>::new());
    set
}

pub fn two_strategy_harness() -> Harness {
    Harness::new(two_strategies())
}

/// Probe replaying fixed readings; the last one repeats once the script runs out
///
/// Clones share the `collect` counter, so a clone kept by the test sees the
/// calls made on the one handed to the harness.
#[derive(Debug, Clone)]
pub struct ScriptedProbe {
    readings: VecDeque<i64>,
    current: i64,
    collections: Rc<Cell<usize>>,
}

impl ScriptedProbe {
    pub fn new(readings: impl IntoIterator<Item = i64>) -> Self {
        Self {
            readings: readings.into_iter().collect(),
            current: 0,
            collections: Rc::new(Cell::new(0)),
        }
    }

    /// Number of `collect` calls so far
    pub fn collections(&self) -> usize {
        self.collections.get()
    }
}

impl MemoryProbe for ScriptedProbe {
    fn collect(&mut self) {
        self.collections.set(self.collections.get() + 1);
        if let Some(next) = self.readings.pop_front() {
            self.current = next;
        }
    }

    fn used_bytes(&self) -> i64 {
        self.current
    }
}

/// Supervisor with `minions` subordinates, wired both ways
pub fn sample_team<E: Employee>(minions: usize) -> (E, Vec<E>) {
    let mut boss = E::new("Gru", "freeze ray");
    let team: Vec<E> = (0..minions)
        .map(|i| {
            let mut minion = E::new(&format!("minion-{i}"), "banana");
            minion.set_supervisor(Some(boss.id()));
            minion
        })
        .collect();
    boss.set_minions(team.iter().map(Employee::id).collect::<Vec<NodeId>>());
    (boss, team)
}
