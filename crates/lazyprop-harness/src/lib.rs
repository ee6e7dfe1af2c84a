//! Lazyprop Benchmark Harness
//!
//! Measures construction time and memory footprint of every lazy property
//! storage strategy across a range of instance counts.
//!
//! # Core Concepts
//!
//! - [`Harness`]: Runs one trial per (count, strategy) pair, in order
//! - [`Strategy`]: Object-safe view of one storage layout under test
//! - [`TrialPhase`]: Per-trial state machine
//!   (`Idle -> Priming -> Constructing -> PostGcSampling -> Draining -> Idle`)
//! - [`MemoryProbe`]: Live-byte sampling, backed by [`CountingAllocator`]
//! - [`ResultAggregator`]: Regroups results per count for comparison
//!
//! A trial that fails during construction is recorded as a failed
//! [`TestResult`]; it never aborts the run.
//!
//! # Example
//!
//! ```rust
//! use lazyprop_harness::{Harness, StrategySet};
//!
//! let strategies = StrategySet::select(&["eager", "shadow-field"]).unwrap();
//! let mut harness = Harness::new(strategies);
//! let results = harness.run(&[100, 200], true).unwrap();
//!
//! assert_eq!(results.len(), 4);
//! assert!(results.iter().all(|r| r.is_completed()));
//! ```

#![warn(unreachable_pub)]

pub mod aggregate;
pub mod alloc;
pub mod config;
pub mod error;
pub mod harness;
pub mod logging;
pub mod probe;
pub mod result;
pub mod state_machine;
pub mod strategy;

pub use aggregate::{CountRow, Measurement, ResultAggregator};
pub use alloc::CountingAllocator;
pub use config::HarnessConfig;
pub use error::HarnessError;
pub use harness::{Harness, Trials};
pub use probe::{AllocationProbe, MemoryProbe, ProbeScope};
pub use result::{format_bytes, MemoryUnits, TestResult, TrialOutcome};
pub use state_machine::{allowed_transitions, validate_transition, PhaseTracker, TrialPhase};
pub use strategy::{EmployeeStrategy, Strategy, StrategySet};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
