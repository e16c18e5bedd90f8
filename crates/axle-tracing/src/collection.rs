//! Tracer record storage.
//!
//! Records are appended, never removed; a disabled tracer stays in the
//! list and is skipped with one atomic load per dispatch. Index 0 is
//! reserved so a tracer handle is never the null handle.

use std::sync::atomic::{AtomicBool, Ordering};

use axle_api::callbacks::{Callback, CoreCallbacks};
use axle_api::handles::TracerHandle;
use axle_api::properties::TracerDesc;
use axle_api::status::Status;
use parking_lot::RwLock;

struct TracerRecord {
    enabled: AtomicBool,
    user_data: usize,
    prologues: RwLock<CoreCallbacks>,
    epilogues: RwLock<CoreCallbacks>,
}

impl TracerRecord {
    fn new(user_data: usize) -> Self {
        TracerRecord {
            enabled: AtomicBool::new(false),
            user_data,
            prologues: RwLock::new(CoreCallbacks::default()),
            epilogues: RwLock::new(CoreCallbacks::default()),
        }
    }
}

pub struct TracerCollection {
    records: RwLock<Vec<TracerRecord>>,
}

impl TracerCollection {
    pub fn new() -> Self {
        // index 0 reserved
        TracerCollection {
            records: RwLock::new(vec![TracerRecord::new(0)]),
        }
    }

    /// Register a tracer; the returned handle is its list index.
    pub fn create(&self, desc: &TracerDesc) -> TracerHandle {
        let mut records = self.records.write();
        records.push(TracerRecord::new(desc.user_data));
        TracerHandle::from_raw(records.len() - 1)
    }

    pub fn set_prologues(&self, tracer: TracerHandle, cbs: CoreCallbacks) -> Status {
        self.with_record(tracer, |rec| *rec.prologues.write() = cbs)
    }

    pub fn set_epilogues(&self, tracer: TracerHandle, cbs: CoreCallbacks) -> Status {
        self.with_record(tracer, |rec| *rec.epilogues.write() = cbs)
    }

    /// Enabling and disabling are idempotent and independent of the
    /// callback tables.
    pub fn set_enabled(&self, tracer: TracerHandle, enabled: bool) -> Status {
        self.with_record(tracer, |rec| rec.enabled.store(enabled, Ordering::Release))
    }

    pub fn user_data(&self, tracer: TracerHandle) -> Option<usize> {
        let records = self.records.read();
        if tracer.as_raw() == 0 {
            return None;
        }
        records.get(tracer.as_raw()).map(|rec| rec.user_data)
    }

    /// Number of registered tracers, the reserved slot excluded.
    pub fn len(&self) -> usize {
        self.records.read().len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run the enabled tracers' prologue callbacks for one entry point,
    /// in registration order.
    pub fn prologue<P>(
        &self,
        select: impl Fn(&CoreCallbacks) -> Option<Callback<P>>,
        params: &P,
    ) {
        for cb in self.collect(|rec| select(&rec.prologues.read())) {
            cb(params);
        }
    }

    /// Run the enabled tracers' epilogue callbacks, in registration
    /// order.
    pub fn epilogue<P>(
        &self,
        select: impl Fn(&CoreCallbacks) -> Option<Callback<P>>,
        params: &P,
    ) {
        for cb in self.collect(|rec| select(&rec.epilogues.read())) {
            cb(params);
        }
    }

    // Snapshot the callbacks before invoking any of them, so a callback
    // that registers or reconfigures tracers cannot deadlock against
    // the record lock.
    fn collect<P>(
        &self,
        select: impl Fn(&TracerRecord) -> Option<Callback<P>>,
    ) -> Vec<Callback<P>> {
        let records = self.records.read();
        records
            .iter()
            .skip(1)
            .filter(|rec| rec.enabled.load(Ordering::Acquire))
            .filter_map(select)
            .collect()
    }

    fn with_record(&self, tracer: TracerHandle, f: impl FnOnce(&TracerRecord)) -> Status {
        if tracer.as_raw() == 0 {
            return Status::ErrorInvalidNullHandle;
        }
        match self.records.read().get(tracer.as_raw()) {
            Some(rec) => {
                f(rec);
                Status::Success
            }
            None => Status::ErrorInvalidNullHandle,
        }
    }
}

impl Default for TracerCollection {
    fn default() -> Self {
        Self::new()
    }
}
