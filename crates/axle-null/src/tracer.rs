//! Tracer record storage for the instrumented null driver.
//!
//! The null driver only stores what a consumer registers; it never
//! invokes the callbacks itself. (The dispatch-wrapping tracing layer
//! lives in `axle-tracing` and is a loader concern.) Records are indexed
//! by their position in the list, index 0 is reserved, and records are
//! never individually destroyed.

use axle_api::callbacks::CoreCallbacks;
use axle_api::status::Status;
use parking_lot::Mutex;

#[derive(Default, Clone)]
pub struct TracerData {
    pub enabled: bool,
    pub user_data: usize,
    pub prologues: CoreCallbacks,
    pub epilogues: CoreCallbacks,
}

pub struct TracerStore {
    records: Mutex<Vec<TracerData>>,
}

impl TracerStore {
    pub fn new() -> Self {
        // reserve index 0 so no tracer handle is ever null
        TracerStore {
            records: Mutex::new(vec![TracerData::default()]),
        }
    }

    /// Append a record and return its index as the synthetic handle.
    pub fn create(&self, user_data: usize) -> usize {
        let mut records = self.records.lock();
        records.push(TracerData {
            user_data,
            ..TracerData::default()
        });
        records.len() - 1
    }

    pub fn set_prologues(&self, index: usize, cbs: CoreCallbacks) -> Status {
        self.with_record(index, |rec| rec.prologues = cbs)
    }

    pub fn set_epilogues(&self, index: usize, cbs: CoreCallbacks) -> Status {
        self.with_record(index, |rec| rec.epilogues = cbs)
    }

    pub fn set_enabled(&self, index: usize, enabled: bool) -> Status {
        self.with_record(index, |rec| rec.enabled = enabled)
    }

    pub fn get(&self, index: usize) -> Option<TracerData> {
        if index == 0 {
            return None;
        }
        self.records.lock().get(index).cloned()
    }

    /// Number of live records, the reserved slot excluded.
    pub fn len(&self) -> usize {
        self.records.lock().len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_record(&self, index: usize, f: impl FnOnce(&mut TracerData)) -> Status {
        if index == 0 {
            return Status::ErrorInvalidNullHandle;
        }
        match self.records.lock().get_mut(index) {
            Some(rec) => {
                f(rec);
                Status::Success
            }
            None => Status::ErrorInvalidNullHandle,
        }
    }
}

impl Default for TracerStore {
    fn default() -> Self {
        Self::new()
    }
}
