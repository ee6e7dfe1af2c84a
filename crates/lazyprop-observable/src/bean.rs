//! Owner identity for handles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BEAN: AtomicU64 = AtomicU64::new(1);

/// Identity of an object owning observable handles
///
/// Assigned from a process-wide monotonic counter, so two live beans never
/// share an id and keys derived from it never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BeanId(u64);

impl BeanId {
    /// Allocate the next unused id
    #[inline]
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_BEAN.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a raw id (tests and fixtures)
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw integer value
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BeanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
