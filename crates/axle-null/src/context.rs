//! The null driver's context: configuration, installed overrides, the
//! handle allocator, and the tracer store.
//!
//! A context is constructed explicitly and handed to the trampolines by
//! reference; there is no process-wide driver singleton. Overrides are
//! installed once here and are read-only for the context's lifetime,
//! matching the initialize-then-dispatch discipline of the tables.

use std::sync::{Arc, OnceLock};

use axle_api::callbacks::CoreCallbacks;
use axle_api::handles::{ContextHandle, DeviceHandle, DriverHandle, TracerHandle};
use axle_api::object::ObjectTableSet;
use axle_api::properties::*;
use axle_api::status::Status;
use axle_api::tables::{CoreTables, RuntimeTables, SysmanTables, ToolsTables};
use axle_api::version::ApiVersion;
use parking_lot::Mutex;
use tracing::debug;

use crate::alloc::{AllocMode, HandleAllocator};
use crate::config::{NullConfig, TRACING_EXT_NAME};
use crate::tables;
use crate::tracer::TracerStore;

/// Per-family override tables. A populated slot replaces the generic
/// fallback for that entry point; an empty slot leaves it in force.
#[derive(Default)]
pub struct Overrides {
    pub core: CoreTables,
    pub tools: ToolsTables,
    pub sysman: SysmanTables,
    pub runtime: RuntimeTables,
}

pub struct DriverContext {
    pub version: ApiVersion,
    pub config: NullConfig,
    pub(crate) overrides: Overrides,
    pub handles: Arc<HandleAllocator>,
    pub tracers: Arc<TracerStore>,
    published: OnceLock<ObjectTableSet>,
    env_log: Mutex<Vec<String>>,
}

impl DriverContext {
    pub fn new(config: NullConfig) -> Arc<Self> {
        Self::with_overrides(config, |_| {})
    }

    /// Construct a context, letting the caller replace or add override
    /// slots before the tables are published. This is how a consumer
    /// installs custom entry-point implementations in front of the
    /// generic fallbacks.
    pub fn with_overrides(
        config: NullConfig,
        install: impl FnOnce(&mut Overrides),
    ) -> Arc<Self> {
        let mode = if config.ddi_ext_disabled {
            AllocMode::Counter
        } else {
            AllocMode::CapabilityRecord
        };
        let handles = Arc::new(HandleAllocator::new(mode));
        let tracers = Arc::new(TracerStore::new());

        let mut overrides = build_overrides(&config, &handles, &tracers);
        install(&mut overrides);

        let ctx = Arc::new(DriverContext {
            version: ApiVersion::CURRENT,
            config,
            overrides,
            handles: handles.clone(),
            tracers,
            published: OnceLock::new(),
            env_log: Mutex::new(Vec::new()),
        });

        let set = tables::build_table_set(&ctx);
        let _ = ctx.published.set(set.clone());
        handles.install_tables(set);

        debug!(
            driver_id = ctx.config.driver_id,
            mode = ?ctx.handles.mode(),
            "null driver context created"
        );
        ctx
    }

    /// The published table set: every slot filled with this context's
    /// trampolines. This is what capability records embed.
    pub fn tables(&self) -> ObjectTableSet {
        self.published.get().cloned().unwrap_or_default()
    }

    /// Test-observability hook: record that an entry point ran, as an
    /// environment variable named after it holding this driver's id.
    /// Recorded variables are removed when the context drops.
    pub(crate) fn record_call_env(&self, entry: &str) {
        std::env::set_var(entry, self.config.driver_id.to_string());
        self.env_log.lock().push(entry.to_string());
    }
}

impl Drop for DriverContext {
    fn drop(&mut self) {
        for name in self.env_log.lock().drain(..) {
            std::env::remove_var(name);
        }
    }
}

/// Install the null driver's own entry-point implementations, the way a
/// real driver would publish concrete functions. Everything not listed
/// here stays on the generic path.
fn build_overrides(
    config: &NullConfig,
    handles: &Arc<HandleAllocator>,
    tracers: &Arc<TracerStore>,
) -> Overrides {
    let mut ov = Overrides::default();

    {
        let handles = handles.clone();
        ov.core.driver.get = Some(Arc::new(
            move |count: &mut u32, out: Option<&mut [DriverHandle]>| {
                *count = 1;
                if let Some(out) = out {
                    if let Some(slot) = out.first_mut() {
                        *slot = DriverHandle::from_raw(handles.get());
                    }
                }
                Status::Success
            },
        ));
    }

    ov.core.driver.get_api_version = Some(Arc::new(
        |_driver: DriverHandle, version: &mut ApiVersion| {
            *version = ApiVersion::CURRENT;
            Status::Success
        },
    ));

    ov.core.driver.get_properties = Some(Arc::new(
        |_driver: DriverHandle, props: &mut DriverProperties| {
            *props = DriverProperties::default();
            Status::Success
        },
    ));

    {
        let ext_version = config.tracing_ext_version;
        ov.core.driver.get_extension_properties = Some(Arc::new(
            move |_driver: DriverHandle,
                  count: &mut u32,
                  out: Option<&mut [ExtensionProperties]>| {
                if let Some(out) = out {
                    if let Some(slot) = out.first_mut() {
                        *slot = ExtensionProperties {
                            name: TRACING_EXT_NAME.to_string(),
                            version: ext_version,
                        };
                    }
                }
                *count = 1;
                Status::Success
            },
        ));
    }

    {
        let handles = handles.clone();
        ov.core.device.get = Some(Arc::new(
            move |_driver: DriverHandle, count: &mut u32, out: Option<&mut [DeviceHandle]>| {
                *count = 1;
                if let Some(out) = out {
                    if let Some(slot) = out.first_mut() {
                        *slot = DeviceHandle::from_raw(handles.get());
                    }
                }
                Status::Success
            },
        ));
    }

    {
        let device_type = config.device_type;
        ov.core.device.get_properties = Some(Arc::new(
            move |_device: DeviceHandle, props: &mut DeviceProperties| {
                *props = DeviceProperties {
                    device_type,
                    vendor_id: 0,
                    device_id: 0,
                    name: "Null Device".to_string(),
                };
                Status::Success
            },
        ));
    }

    ov.core.device.get_compute_properties = Some(Arc::new(
        |_device: DeviceHandle, props: &mut ComputeProperties| {
            *props = Default::default();
            Status::Success
        },
    ));

    ov.core.device.get_memory_properties = Some(Arc::new(
        |_device: DeviceHandle, count: &mut u32, out: Option<&mut [MemoryProperties]>| {
            if let Some(out) = out {
                if let Some(slot) = out.first_mut() {
                    *slot = Default::default();
                }
            }
            *count = 1;
            Status::Success
        },
    ));

    ov.core.device.get_memory_access_properties = Some(Arc::new(
        |_device: DeviceHandle, props: &mut MemoryAccessProperties| {
            *props = Default::default();
            Status::Success
        },
    ));

    ov.core.device.get_cache_properties = Some(Arc::new(
        |_device: DeviceHandle, count: &mut u32, out: Option<&mut [CacheProperties]>| {
            if let Some(out) = out {
                if let Some(slot) = out.first_mut() {
                    *slot = Default::default();
                }
            }
            *count = 1;
            Status::Success
        },
    ));

    ov.core.device.get_image_properties = Some(Arc::new(
        |_device: DeviceHandle, props: &mut ImageProperties| {
            *props = Default::default();
            Status::Success
        },
    ));

    ov.core.device.get_queue_group_properties = Some(Arc::new(
        |_device: DeviceHandle, count: &mut u32, out: Option<&mut [QueueGroupProperties]>| {
            if let Some(out) = out {
                if let Some(slot) = out.first_mut() {
                    *slot = QueueGroupProperties {
                        flags: QueueGroupFlags::COMPUTE | QueueGroupFlags::COPY,
                        num_queues: 1,
                    };
                }
            }
            *count = 1;
            Status::Success
        },
    ));

    // The instrumented context: tracer entry points store records
    // instead of synthesizing anonymous handles.
    if config.tracing_enabled {
        {
            let tracers = tracers.clone();
            ov.tools.tracer.create = Some(Arc::new(
                move |_context: ContextHandle, desc: &TracerDesc, out: &mut TracerHandle| {
                    *out = TracerHandle::from_raw(tracers.create(desc.user_data));
                    Status::Success
                },
            ));
        }
        {
            let tracers = tracers.clone();
            ov.tools.tracer.set_prologues = Some(Arc::new(
                move |tracer: TracerHandle, cbs: &CoreCallbacks| {
                    tracers.set_prologues(tracer.as_raw(), cbs.clone())
                },
            ));
        }
        {
            let tracers = tracers.clone();
            ov.tools.tracer.set_epilogues = Some(Arc::new(
                move |tracer: TracerHandle, cbs: &CoreCallbacks| {
                    tracers.set_epilogues(tracer.as_raw(), cbs.clone())
                },
            ));
        }
        {
            let tracers = tracers.clone();
            ov.tools.tracer.set_enabled = Some(Arc::new(
                move |tracer: TracerHandle, enabled: bool| {
                    tracers.set_enabled(tracer.as_raw(), enabled)
                },
            ));
        }
    }

    ov
}
