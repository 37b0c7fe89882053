//! Batch-wide device numbering.
//!
//! Switch and host numbers name emulated devices (`s12`, `hs12`) and must be
//! unique across every worker of a batch, because all workers share one
//! emulation host.  A single [`IndexAllocator`] is created per batch and
//! handed to each worker behind an `Arc`; callers never touch the counters
//! directly.

use std::sync::{Mutex, PoisonError};

use nc_core::{HostId, SwitchId};

#[derive(Default)]
struct Counters {
    next_switch: u32,
    next_host:   u32,
}

/// Thread-safe allocator of globally unique switch and host ids.
///
/// One lock guards both counters.  Every allocation appends the new ids to
/// the caller's list while the lock is still held, so a list always receives
/// a contiguous, gap-free block.
#[derive(Default)]
pub struct IndexAllocator {
    counters: Mutex<Counters>,
}

impl IndexAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate one switch id and append it to `into`.
    pub fn allocate_switch_into(&self, into: &mut Vec<SwitchId>) -> SwitchId {
        let mut c = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        let id = SwitchId(c.next_switch);
        c.next_switch += 1;
        into.push(id);
        id
    }

    /// Allocate `count` consecutive switch ids and append them to `into`.
    pub fn allocate_switches_into(&self, count: usize, into: &mut Vec<SwitchId>) {
        let mut c = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        into.reserve(count);
        for _ in 0..count {
            into.push(SwitchId(c.next_switch));
            c.next_switch += 1;
        }
    }

    /// Allocate `count` consecutive host ids.
    pub fn allocate_hosts(&self, count: usize) -> Vec<HostId> {
        let mut c = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        let start = c.next_host;
        c.next_host += count as u32;
        (start..c.next_host).map(HostId).collect()
    }

    /// Number of switch ids handed out so far.
    pub fn switches_issued(&self) -> u32 {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner).next_switch
    }

    /// Number of host ids handed out so far.
    pub fn hosts_issued(&self) -> u32 {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner).next_host
    }
}
