//! Handle-to-driver ownership tracking.
//!
//! Every handle a driver returns through the loader is registered here
//! so later calls made with that handle dispatch to the driver that
//! created it. Destroy-style entry points release entries; the null
//! driver's leak-is-fine policy applies only inside the driver, not to
//! this registry.

use axle_api::version::ApiVersion;
use dashmap::DashMap;

#[derive(Debug, Clone, Copy)]
pub struct HandleOwner {
    /// Index of the owning entry in the driver registry.
    pub driver: usize,
    /// The owning driver's negotiated version.
    pub version: ApiVersion,
}

pub struct HandleRegistry {
    owners: DashMap<usize, HandleOwner>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        HandleRegistry {
            owners: DashMap::new(),
        }
    }

    pub fn register(&self, raw: usize, owner: HandleOwner) {
        if raw != 0 {
            self.owners.insert(raw, owner);
        }
    }

    pub fn owner(&self, raw: usize) -> Option<HandleOwner> {
        self.owners.get(&raw).map(|v| *v)
    }

    pub fn release(&self, raw: usize) -> Option<HandleOwner> {
        self.owners.remove(&raw).map(|(_, v)| v)
    }

    /// Number of live registered handles.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
