//! The capability record attached to handles synthesized in
//! capability-record mode.
//!
//! A handle in this mode is the address of an `ObjectRecord`, so a
//! dispatch call made through the bare handle can find the owning
//! driver's tables without consulting any global registry.

use std::sync::Arc;

use crate::tables::{CoreTables, RuntimeTables, SysmanTables, ToolsTables};

/// The four interface-family table sets a driver publishes.
#[derive(Default, Clone)]
pub struct ObjectTableSet {
    pub core: Arc<CoreTables>,
    pub tools: Arc<ToolsTables>,
    pub sysman: Arc<SysmanTables>,
    pub runtime: Arc<RuntimeTables>,
}

pub struct ObjectRecord {
    pub tables: ObjectTableSet,
}

impl ObjectRecord {
    pub fn new(tables: ObjectTableSet) -> Box<Self> {
        Box::new(ObjectRecord { tables })
    }

    /// The handle value for this record: its own address. Stable for as
    /// long as the owning allocator keeps the record boxed.
    pub fn as_handle(&self) -> usize {
        self as *const ObjectRecord as usize
    }

    /// Reinterpret a raw handle as a capability record.
    ///
    /// # Safety
    /// `raw` must have been produced by an allocator in
    /// capability-record mode and the owning allocator must still be
    /// alive. Dispatching a handle through a driver that did not create
    /// it is undefined behavior the design does not protect against.
    pub unsafe fn from_raw<'a>(raw: usize) -> &'a ObjectRecord {
        unsafe { &*(raw as *const ObjectRecord) }
    }
}
