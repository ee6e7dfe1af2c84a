//! Memory probes
//!
//! A probe answers "how many bytes are live right now". The harness samples
//! once before and once after a trial's construction phase and records the
//! difference.

use crate::alloc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Once;

/// Source of memory usage samples
pub trait MemoryProbe: fmt::Debug {
    /// Settle memory before a sample
    ///
    /// Plays the part of a collection request: advisory, and free to do
    /// nothing at all.
    fn collect(&mut self) {}

    /// Bytes currently in use; only differences between samples are meaningful
    fn used_bytes(&self) -> i64;
}

/// Which live-byte counter an [`AllocationProbe`] reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeScope {
    /// Allocations made by the sampling thread only
    #[default]
    Thread,

    /// Allocations made anywhere in the process
    Global,
}

/// Probe backed by [`CountingAllocator`](crate::CountingAllocator)
///
/// Reads zero when the allocator is not installed, after warning once.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationProbe {
    scope: ProbeScope,
}

static MISSING_ALLOCATOR: Once = Once::new();

impl AllocationProbe {
    /// Create new probe
    #[inline]
    #[must_use]
    pub const fn new(scope: ProbeScope) -> Self {
        Self { scope }
    }

    /// Counter this probe reads
    #[inline]
    #[must_use]
    pub const fn scope(&self) -> ProbeScope {
        self.scope
    }
}

impl MemoryProbe for AllocationProbe {
    fn collect(&mut self) {
        if !alloc::is_installed() {
            MISSING_ALLOCATOR.call_once(|| {
                tracing::warn!("counting allocator not installed; memory deltas will read zero");
            });
        }
    }

    fn used_bytes(&self) -> i64 {
        match self.scope {
            ProbeScope::Thread => alloc::thread_live_bytes(),
            ProbeScope::Global => alloc::global_live_bytes(),
        }
    }
}

impl<P: MemoryProbe + ?Sized> MemoryProbe for Box<P> {
    fn collect(&mut self) {
        (**self).collect();
    }

    fn used_bytes(&self) -> i64 {
        (**self).used_bytes()
    }
}
