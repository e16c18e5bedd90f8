//! The loader context: driver registry, default-driver selection,
//! handle ownership, and layer composition.
//!
//! All wiring happens in `LoaderContext::init`: a single explicit
//! initializer builds each driver's tables, interposes the optional
//! validation and tracing layers, selects the default driver, and
//! enumerates the loader-visible driver handles. After `init` returns
//! the context is immutable apart from the handle registry and tracer
//! list.

use std::sync::Arc;

use axle_api::handles::DriverHandle;
use axle_api::object::{ObjectRecord, ObjectTableSet};
use axle_api::provider::DriverProvider;
use axle_api::status::Status;
use axle_api::tables::{CoreTables, RuntimeTables, SysmanTables, ToolsTables};
use axle_api::version::ApiVersion;
use axle_tracing::TracerCollection;
use libloading::Library;
use tracing::{debug, info, warn};

use crate::config::{DefaultDriverPolicy, LoaderConfig};
use crate::discovery::{self, DiscoveredDriver};
use crate::error_state::ErrorState;
use crate::registry::{HandleOwner, HandleRegistry};

pub struct DriverEntry {
    pub name: String,
    pub tables: ObjectTableSet,
    pub valid: bool,
    pub version: ApiVersion,
    /// What the driver answered when asked for the runtime interface.
    pub runtime_init: Status,
    /// Whether this driver's handles embed capability records.
    pub ddi_ext: bool,
    // The provider owns the driver's context; the library owns its
    // code. Both must outlive the tables above.
    _provider: Arc<dyn DriverProvider>,
    _library: Option<Library>,
}

/// A resolved dispatch target: the tables to call through and the
/// owning driver's registry index.
pub(crate) struct Resolved {
    pub tables: ObjectTableSet,
    pub driver: usize,
    pub version: ApiVersion,
}

pub struct LoaderContext {
    version: ApiVersion,
    drivers: Vec<DriverEntry>,
    driver_handles: Vec<DriverHandle>,
    default_driver: Option<usize>,
    default_runtime: Option<usize>,
    handles: HandleRegistry,
    error: ErrorState,
    tracers: Option<Arc<TracerCollection>>,
    init_status: Status,
}

impl LoaderContext {
    /// Discover, initialize, and wire every driver. `extra` providers
    /// are registered after the discovered ones, in order; tests use
    /// this to inject drivers without touching the environment.
    pub fn init(
        config: LoaderConfig,
        extra: Vec<Arc<dyn DriverProvider>>,
    ) -> Arc<LoaderContext> {
        let mut discovered = discovery::discover(&config);
        for provider in extra {
            discovered.push(DiscoveredDriver {
                name: provider.name().to_string(),
                provider,
                library: None,
            });
        }

        let tracers = if config.enable_tracing {
            Some(Arc::new(TracerCollection::new()))
        } else {
            None
        };

        let mut drivers = Vec::new();
        for candidate in discovered {
            if let Some(entry) = init_driver(&config, candidate, tracers.as_ref()) {
                drivers.push(entry);
            }
        }

        let default_driver = select_default(&config.default_driver_policy(), &drivers);
        // Validity and version of the runtime tables are re-checked by
        // the accessor cascade on every call; only outright decline or
        // failure removes the default runtime driver.
        let default_runtime =
            default_driver.filter(|&idx| drivers[idx].runtime_init.is_success());

        let handles = HandleRegistry::new();
        let mut driver_handles = Vec::new();
        for (idx, entry) in drivers.iter().enumerate() {
            if !entry.valid {
                continue;
            }
            enumerate_driver_handles(entry, idx, &handles, &mut driver_handles);
        }

        let init_status = if drivers.iter().any(|d| d.valid) {
            Status::Success
        } else {
            Status::ErrorUninitialized
        };

        info!(
            drivers = drivers.len(),
            default = ?default_driver,
            status = %init_status,
            "loader initialized"
        );

        Arc::new(LoaderContext {
            version: ApiVersion::CURRENT,
            drivers,
            driver_handles,
            default_driver,
            default_runtime,
            handles,
            error: ErrorState::new(),
            tracers,
            init_status,
        })
    }

    pub fn api_version(&self) -> ApiVersion {
        self.version
    }

    pub fn init_status(&self) -> Status {
        self.init_status
    }

    pub fn drivers(&self) -> &[DriverEntry] {
        &self.drivers
    }

    pub fn default_driver(&self) -> Option<&DriverEntry> {
        self.default_driver.and_then(|idx| self.drivers.get(idx))
    }

    pub(crate) fn default_runtime(&self) -> Option<usize> {
        self.default_runtime
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.handles
    }

    pub fn error(&self) -> &ErrorState {
        &self.error
    }

    /// The loader's tracer list; present only when tracing is enabled.
    pub fn tracers(&self) -> Option<&Arc<TracerCollection>> {
        self.tracers.as_ref()
    }

    pub(crate) fn driver_handles(&self) -> &[DriverHandle] {
        &self.driver_handles
    }

    pub(crate) fn register_handle(&self, raw: usize, driver: usize, version: ApiVersion) {
        self.handles.register(raw, HandleOwner { driver, version });
    }

    /// Find the tables a handle dispatches through: registry lookup
    /// first, then the default driver, via the handle's own capability
    /// record when the default driver negotiated handle records.
    pub(crate) fn resolve(&self, raw: usize) -> Option<Resolved> {
        if raw == 0 {
            return None;
        }
        if let Some(owner) = self.handles.owner(raw) {
            return self.drivers.get(owner.driver).map(|entry| Resolved {
                tables: entry.tables.clone(),
                driver: owner.driver,
                version: owner.version,
            });
        }

        let idx = self.default_driver?;
        let entry = self.drivers.get(idx)?;
        if entry.ddi_ext {
            // SAFETY: the default driver synthesizes every handle as a
            // capability record while it negotiated the extension;
            // handles from unrelated drivers are undefined behavior the
            // design does not protect against.
            let record = unsafe { ObjectRecord::from_raw(raw) };
            return Some(Resolved {
                tables: record.tables.clone(),
                driver: idx,
                version: entry.version,
            });
        }
        Some(Resolved {
            tables: entry.tables.clone(),
            driver: idx,
            version: entry.version,
        })
    }
}

/// Build one registry entry: negotiate the version, fill each table
/// family, then interpose the enabled layers on the core tables.
fn init_driver(
    config: &LoaderConfig,
    candidate: DiscoveredDriver,
    tracers: Option<&Arc<TracerCollection>>,
) -> Option<DriverEntry> {
    let version = candidate.provider.api_version().min(ApiVersion::CURRENT);

    let mut core = CoreTables::default();
    let status = candidate.provider.fill_core(version, &mut core);
    if !status.is_success() {
        warn!(driver = %candidate.name, status = %status, "core table fill failed; driver skipped");
        return None;
    }

    let mut tools = ToolsTables::default();
    let tools_status = candidate.provider.fill_tools(version, &mut tools);
    if !tools_status.is_success() {
        debug!(driver = %candidate.name, status = %tools_status, "tools interface unavailable");
    }

    let mut sysman = SysmanTables::default();
    let sysman_status = candidate.provider.fill_sysman(version, &mut sysman);
    if !sysman_status.is_success() {
        debug!(driver = %candidate.name, status = %sysman_status, "sysman interface unavailable");
    }

    let mut runtime = RuntimeTables::default();
    let runtime_init = candidate.provider.fill_runtime(version, &mut runtime);
    if !runtime_init.is_success() {
        runtime.valid = false;
        runtime.global = None;
        debug!(driver = %candidate.name, status = %runtime_init, "runtime interface unavailable");
    }

    // Layer composition: validation checks closest to the driver,
    // tracing outermost so callbacks observe rejected calls too.
    let mut core = core;
    if config.enable_validation {
        core = axle_validation::wrap_core(&core);
    }
    if let Some(coll) = tracers {
        core = axle_tracing::wrap_core(&core, coll);
    }

    Some(DriverEntry {
        name: candidate.name,
        tables: ObjectTableSet {
            core: Arc::new(core),
            tools: Arc::new(tools),
            sysman: Arc::new(sysman),
            runtime: Arc::new(runtime),
        },
        valid: true,
        version,
        runtime_init,
        ddi_ext: candidate.provider.handle_record_capable(),
        _provider: candidate.provider,
        _library: candidate.library,
    })
}

fn select_default(policy: &DefaultDriverPolicy, drivers: &[DriverEntry]) -> Option<usize> {
    let first_valid = drivers.iter().position(|d| d.valid);
    match policy {
        DefaultDriverPolicy::First => first_valid,
        DefaultDriverPolicy::ByIndex(index) => {
            let idx = *index as usize;
            match drivers.get(idx) {
                Some(entry) if entry.valid => Some(idx),
                _ => {
                    warn!(index = idx, "default driver index invalid; falling back to first");
                    first_valid
                }
            }
        }
        DefaultDriverPolicy::ByName(name) => {
            match drivers.iter().position(|d| d.valid && d.name == *name) {
                Some(idx) => Some(idx),
                None => {
                    warn!(name = %name, "default driver name not found; falling back to first");
                    first_valid
                }
            }
        }
    }
}

/// Ask a driver for its driver-instance handles and register them.
fn enumerate_driver_handles(
    entry: &DriverEntry,
    idx: usize,
    registry: &HandleRegistry,
    out: &mut Vec<DriverHandle>,
) {
    let Some(get) = entry.tables.core.driver.get.clone() else {
        warn!(driver = %entry.name, "driver exposes no driver_get; contributes no handles");
        return;
    };

    let mut count = 0u32;
    if !get(&mut count, None).is_success() || count == 0 {
        return;
    }

    let mut handles = vec![DriverHandle::NULL; count as usize];
    if !get(&mut count, Some(&mut handles)).is_success() {
        return;
    }

    for handle in handles.into_iter().filter(|h| !h.is_null()) {
        registry.register(
            handle.as_raw(),
            HandleOwner {
                driver: idx,
                version: entry.version,
            },
        );
        out.push(handle);
    }
}
