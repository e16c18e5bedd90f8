//! Handle synthesis for the null driver.
//!
//! Two strategies, fixed at context construction:
//!
//! - counter mode: handles are `HANDLE_BASE + n`, unique integers with
//!   no bookkeeping, for drivers with no introspection support;
//! - capability-record mode: each handle is the address of an
//!   `ObjectRecord` carrying the owning context's table sets, so a
//!   consumer can dispatch through the bare handle.
//!
//! Records are kept alive in an append-only list and batch-freed when
//! the allocator drops. Destroy-style entry points never free handles
//! here; that is the null driver's documented leak-is-fine policy.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use axle_api::object::{ObjectRecord, ObjectTableSet};
use parking_lot::Mutex;

/// Base value for counter-mode handles. Never returned itself; the
/// first handle is `HANDLE_BASE + 1`.
pub const HANDLE_BASE: usize = 0x8080_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocMode {
    Counter,
    CapabilityRecord,
}

pub struct HandleAllocator {
    mode: AllocMode,
    next: AtomicUsize,
    tables: OnceLock<ObjectTableSet>,
    records: Mutex<Vec<Box<ObjectRecord>>>,
}

impl HandleAllocator {
    pub fn new(mode: AllocMode) -> Self {
        HandleAllocator {
            mode,
            next: AtomicUsize::new(HANDLE_BASE + 1),
            tables: OnceLock::new(),
            records: Mutex::new(Vec::new()),
        }
    }

    /// Install the table set embedded into capability records. Called by
    /// the owning context before it is published; only the first call
    /// takes effect.
    pub fn install_tables(&self, tables: ObjectTableSet) {
        let _ = self.tables.set(tables);
    }

    /// Synthesize a fresh handle.
    pub fn get(&self) -> usize {
        match self.mode {
            AllocMode::Counter => self.next.fetch_add(1, Ordering::Relaxed),
            AllocMode::CapabilityRecord => match self.tables.get() {
                Some(tables) => {
                    let record = ObjectRecord::new(tables.clone());
                    let raw = record.as_handle();
                    self.records.lock().push(record);
                    raw
                }
                // Tables not installed yet; fall back to counter values
                // rather than hand out a dangling record.
                None => self.next.fetch_add(1, Ordering::Relaxed),
            },
        }
    }

    pub fn mode(&self) -> AllocMode {
        self.mode
    }

    /// Number of capability records currently owned.
    pub fn record_count(&self) -> usize {
        self.records.lock().len()
    }
}
