//! Allocation-counting global allocator
//!
//! Wraps [`System`] and keeps a running total of live heap bytes, both for
//! the whole process and for the calling thread. Rust frees memory as soon
//! as its owner is dropped, so the live-byte count after a trial's
//! construction phase is an exact measure of what the trial still holds.
//!
//! Install it once per binary or test target:
//!
//! ```rust,ignore
//! #[global_allocator]
//! static ALLOC: lazyprop_harness::CountingAllocator = lazyprop_harness::CountingAllocator::new();
//! ```
//!
//! # Safety
//!
//! Every method forwards to [`System`] with the caller's arguments
//! unchanged; the only extra work is integer bookkeeping that never
//! allocates.

#![allow(unsafe_code)]

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

static GLOBAL_LIVE: AtomicI64 = AtomicI64::new(0);
static INSTALLED: AtomicBool = AtomicBool::new(false);

// Const-initialised `Cell` has no destructor, so access never registers a
// TLS destructor and never allocates.
thread_local! {
    static THREAD_LIVE: Cell<i64> = const { Cell::new(0) };
}

/// Global allocator that counts live bytes
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingAllocator;

impl CountingAllocator {
    /// Create new allocator
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[inline]
#[allow(clippy::cast_possible_wrap)]
fn record(delta: isize) {
    let delta = delta as i64;
    if !INSTALLED.load(Ordering::Relaxed) {
        INSTALLED.store(true, Ordering::Relaxed);
    }
    GLOBAL_LIVE.fetch_add(delta, Ordering::Relaxed);
    // Fails only while the thread is being torn down
    let _ = THREAD_LIVE.try_with(|live| live.set(live.get() + delta));
}

#[inline]
#[allow(clippy::cast_possible_wrap)]
fn size_of(layout: Layout) -> isize {
    layout.size() as isize
}

// SAFETY: all allocation is delegated to `System`, which upholds the
// `GlobalAlloc` contract; bookkeeping happens only on success.
unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            record(size_of(layout));
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            record(size_of(layout));
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        record(-size_of(layout));
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            #[allow(clippy::cast_possible_wrap)]
            record(new_size as isize - size_of(layout));
        }
        new_ptr
    }
}

/// Whether a [`CountingAllocator`] has served any allocation in this process
#[inline]
#[must_use]
pub fn is_installed() -> bool {
    INSTALLED.load(Ordering::Relaxed)
}

/// Live bytes allocated minus freed, process-wide
#[inline]
#[must_use]
pub fn global_live_bytes() -> i64 {
    GLOBAL_LIVE.load(Ordering::Relaxed)
}

/// Live bytes allocated minus freed by the calling thread
///
/// Memory freed on a different thread than it was allocated on shows up as
/// a drift between threads; trials never hand nodes across threads.
#[inline]
#[must_use]
pub fn thread_live_bytes() -> i64 {
    THREAD_LIVE.try_with(Cell::get).unwrap_or(0)
}
