//! The seam between the loader and a backing driver.
//!
//! A driver library's table-fill exports are modeled as one trait; the
//! loader calls the `fill_*` methods once per interface family during
//! init. External libraries surface a provider through the
//! `axle_driver_provider` C symbol (see `axle-loader`'s discovery).

use crate::status::Status;
use crate::tables::{CoreTables, RuntimeTables, SysmanTables, ToolsTables};
use crate::version::ApiVersion;

/// Symbol an external driver library exports. The function returns a
/// `Box<Arc<dyn DriverProvider>>` cast to a raw pointer.
pub const DRIVER_PROVIDER_SYMBOL: &[u8] = b"axle_driver_provider";

pub trait DriverProvider: Send + Sync {
    fn name(&self) -> &str;

    fn api_version(&self) -> ApiVersion;

    /// Whether handles synthesized by this driver embed a capability
    /// record, letting the loader dispatch without a registry lookup.
    fn handle_record_capable(&self) -> bool {
        false
    }

    /// Populate the core table family. A failure here makes the driver
    /// unusable and the loader skips it.
    fn fill_core(&self, version: ApiVersion, tables: &mut CoreTables) -> Status;

    fn fill_tools(&self, version: ApiVersion, tables: &mut ToolsTables) -> Status {
        let _ = (version, tables);
        Status::ErrorUnsupportedFeature
    }

    fn fill_sysman(&self, version: ApiVersion, tables: &mut SysmanTables) -> Status {
        let _ = (version, tables);
        Status::ErrorUnsupportedFeature
    }

    /// Populate the runtime (Global) family. Drivers may decline with
    /// `ErrorUnsupportedFeature`; the loader remembers the answer.
    fn fill_runtime(&self, version: ApiVersion, tables: &mut RuntimeTables) -> Status {
        let _ = (version, tables);
        Status::ErrorUnsupportedFeature
    }
}
