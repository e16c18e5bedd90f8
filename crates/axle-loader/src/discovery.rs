//! Driver discovery.
//!
//! External drivers are shared libraries exporting the
//! `axle_driver_provider` symbol; the in-process null driver joins the
//! list when enabled. A library that fails to load or export the entry
//! point is logged and skipped; discovery never aborts the loader.

use std::ffi::c_void;
use std::sync::Arc;

use axle_api::provider::{DriverProvider, DRIVER_PROVIDER_SYMBOL};
use libloading::{Library, Symbol};
use tracing::{info, warn};

use crate::config::LoaderConfig;

pub struct DiscoveredDriver {
    pub name: String,
    pub provider: Arc<dyn DriverProvider>,
    /// Kept alive for the lifetime of the registry entry; dropping it
    /// would unload the code behind the provider's tables.
    pub library: Option<Library>,
}

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("failed to load driver library {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: libloading::Error,
    },
    #[error("driver library {path} does not export the provider entry point: {source}")]
    MissingEntry {
        path: String,
        #[source]
        source: libloading::Error,
    },
}

type ProviderEntryFn = unsafe extern "C" fn() -> *mut c_void;

pub fn discover(config: &LoaderConfig) -> Vec<DiscoveredDriver> {
    let mut found = Vec::new();

    for path in &config.driver_paths {
        // SAFETY: loading an arbitrary library runs its initializers;
        // the paths come from the user's own configuration.
        match unsafe { load_external(path) } {
            Ok(driver) => {
                info!(driver = %driver.name, path = %path, "discovered driver library");
                found.push(driver);
            }
            Err(err) => warn!(error = %err, "skipping driver library"),
        }
    }

    if config.enable_null_driver {
        let provider: Arc<dyn DriverProvider> = Arc::new(axle_null::NullDriver::from_env());
        found.push(DiscoveredDriver {
            name: provider.name().to_string(),
            provider,
            library: None,
        });
    }

    found
}

/// Load one driver library and take ownership of its provider.
///
/// # Safety
/// The library's initializers run, and the entry point must follow the
/// provider protocol: return a `Box<Arc<dyn DriverProvider>>` the caller
/// owns afterwards.
pub unsafe fn load_external(path: &str) -> Result<DiscoveredDriver, DiscoveryError> {
    let library = unsafe { Library::new(path) }.map_err(|source| DiscoveryError::Load {
        path: path.to_string(),
        source,
    })?;

    let raw = {
        let entry: Symbol<ProviderEntryFn> = unsafe { library.get(DRIVER_PROVIDER_SYMBOL) }
            .map_err(|source| DiscoveryError::MissingEntry {
                path: path.to_string(),
                source,
            })?;
        unsafe { entry() }
    };

    let provider = *unsafe { Box::from_raw(raw as *mut Arc<dyn DriverProvider>) };
    Ok(DiscoveredDriver {
        name: provider.name().to_string(),
        provider,
        library: Some(library),
    })
}
