//! Shared API surface for the axle loader and drivers.
//!
//! Everything in this crate is data: result codes, versions, opaque
//! handles, dispatch tables ("dditables"), tracer callback tables, the
//! per-handle capability record, and the `DriverProvider` seam a backing
//! driver implements. Behavior lives in the driver and loader crates.

pub mod callbacks;
pub mod handles;
pub mod object;
pub mod properties;
pub mod provider;
pub mod status;
pub mod tables;
pub mod version;

pub use handles::{
    CommandListHandle, ContextHandle, DeviceHandle, DriverHandle, EventHandle, EventPoolHandle,
    TracerHandle,
};
pub use object::{ObjectRecord, ObjectTableSet};
pub use provider::DriverProvider;
pub use status::Status;
pub use version::ApiVersion;
