//! axle loader
//!
//! The dispatch-table loader sitting between applications and one or
//! more backing drivers: discovers drivers, builds their per-interface
//! dispatch tables, tracks which driver owns each handle, layers the
//! optional validation and tracing interposers in front of every call,
//! and exposes the driver-independent runtime entry points with their
//! checked failure cascade.

pub mod abi;
pub mod config;
pub mod context;
pub mod discovery;
pub mod dispatch;
pub mod error_state;
pub mod registry;
pub mod runtime;
pub mod tables;

pub use config::{ConfigError, DefaultDriverPolicy, LoaderConfig};
pub use context::{DriverEntry, LoaderContext};
pub use discovery::{DiscoveredDriver, DiscoveryError};
pub use registry::{HandleOwner, HandleRegistry};
