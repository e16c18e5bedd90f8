//! Environment-derived configuration for the null driver.
//!
//! Everything here is read exactly once, when a `DriverContext` is
//! constructed, and is immutable afterwards. The `AXLE_TEST_*` variables
//! exist so tests can exercise degraded driver shapes without a second
//! driver build.

use std::str::FromStr;

use axle_api::properties::DeviceType;
use axle_api::version::ApiVersion;
use axle_common::env::{env_string, env_to_bool};

pub const DEFAULT_DRIVER_ID: u32 = 1;

/// Extension the null driver reports from `driver_get_extension_properties`.
pub const TRACING_EXT_NAME: &str = "AXLE_extension_api_tracing";
pub const TRACING_EXT_VERSION_1_0: u32 = ApiVersion::new(1, 0).as_raw();
pub const TRACING_EXT_VERSION_1_1: u32 = ApiVersion::new(1, 1).as_raw();

/// Disables capability-record handles when set to this driver's id, or
/// to the legacy sentinel "0".
pub const ENV_DISABLE_DDI_EXT: &str = "AXLE_TEST_NULL_DRIVER_DISABLE_DDI_EXT";
/// Forces the reported device type ("GPU" or "NPU").
pub const ENV_DEVICE_TYPE: &str = "AXLE_TEST_NULL_DRIVER_TYPE";
/// Makes the runtime (Global) table-fill decline for this driver's id.
pub const ENV_DISABLE_RUNTIME: &str = "AXLE_TEST_NULL_DRIVER_DISABLE_RUNTIME";
/// Selects the reported tracing extension version ("1.0" or "1.1").
pub const ENV_TRACING_EXT_VERSION: &str = "AXLE_TEST_TRACING_EXT_VERSION";
/// Enables the tracer store wired into the tools table.
pub const ENV_ENABLE_TRACING: &str = "AXLE_ENABLE_API_TRACING";

#[derive(Debug, Clone)]
pub struct NullConfig {
    pub driver_id: u32,
    pub device_type: DeviceType,
    pub ddi_ext_disabled: bool,
    pub runtime_disabled: bool,
    pub tracing_enabled: bool,
    pub tracing_ext_version: u32,
}

impl Default for NullConfig {
    fn default() -> Self {
        NullConfig {
            driver_id: DEFAULT_DRIVER_ID,
            device_type: DeviceType::Gpu,
            ddi_ext_disabled: false,
            runtime_disabled: false,
            tracing_enabled: false,
            tracing_ext_version: TRACING_EXT_VERSION_1_0,
        }
    }
}

impl NullConfig {
    pub fn from_env() -> Self {
        Self::from_env_with_driver_id(DEFAULT_DRIVER_ID)
    }

    /// Derive a configuration for a synthetic driver id. Tests running
    /// several null driver instances give each its own id so the
    /// per-driver toggles stay independent.
    pub fn from_env_with_driver_id(driver_id: u32) -> Self {
        let id_str = driver_id.to_string();

        let device_type = env_string(ENV_DEVICE_TYPE)
            .and_then(|v| DeviceType::from_str(&v).ok())
            .unwrap_or_default();

        // "0" is the legacy spelling that predates per-driver ids.
        let ddi_ext_disabled = matches!(
            env_string(ENV_DISABLE_DDI_EXT),
            Some(ref v) if *v == id_str || v == "0"
        );

        let runtime_disabled = matches!(
            env_string(ENV_DISABLE_RUNTIME),
            Some(ref v) if *v == id_str
        );

        let tracing_ext_version = match env_string(ENV_TRACING_EXT_VERSION).as_deref() {
            Some("1.1") => TRACING_EXT_VERSION_1_1,
            _ => TRACING_EXT_VERSION_1_0,
        };

        NullConfig {
            driver_id,
            device_type,
            ddi_ext_disabled,
            runtime_disabled,
            tracing_enabled: env_to_bool(ENV_ENABLE_TRACING),
            tracing_ext_version,
        }
    }
}
