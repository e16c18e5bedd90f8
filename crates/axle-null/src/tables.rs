//! Table-fill entry points: populate a consumer-supplied dditable with
//! this context's trampolines after a version check.
//!
//! Contract per fill function: absent output table reports
//! `ErrorInvalidNullPointer`; a requested version newer than the
//! context's reports `ErrorUnsupportedVersion` and leaves the table
//! untouched; otherwise every slot is populated and the call succeeds.
//!
//! Trampolines hold the context weakly: the context itself owns the
//! published tables (and the capability records embed them), so a
//! strong capture would keep every context alive forever. A call that
//! outlives its context reports `ErrorUninitialized` or the entry
//! point's failure sentinel.

use std::sync::Arc;

use axle_api::callbacks::CoreCallbacks;
use axle_api::handles::*;
use axle_api::object::ObjectTableSet;
use axle_api::properties::*;
use axle_api::status::Status;
use axle_api::tables::*;
use axle_api::version::ApiVersion;

use crate::context::DriverContext;
use crate::dispatch;

macro_rules! slot {
    ($ctx:expr, $dead:expr, |$cx:ident, $($arg:ident : $ty:ty),*| $body:expr) => {
        Some({
            let weak = Arc::downgrade($ctx);
            Arc::new(move |$($arg: $ty),*| match weak.upgrade() {
                Some($cx) => $body,
                None => $dead,
            })
        })
    };
    ($ctx:expr, $dead:expr, |$cx:ident| $body:expr) => {
        Some({
            let weak = Arc::downgrade($ctx);
            Arc::new(move || match weak.upgrade() {
                Some($cx) => $body,
                None => $dead,
            })
        })
    };
}

pub fn get_driver_proc_addr_table(
    ctx: &Arc<DriverContext>,
    version: ApiVersion,
    table: Option<&mut DriverTable>,
) -> Status {
    let Some(table) = table else {
        return Status::ErrorInvalidNullPointer;
    };
    if ctx.version < version {
        return Status::ErrorUnsupportedVersion;
    }

    table.get = slot!(ctx, Status::ErrorUninitialized,
        |c, count: &mut u32, out: Option<&mut [DriverHandle]>| {
            dispatch::driver_get(&c, count, out)
        });
    table.get_api_version = slot!(ctx, Status::ErrorUninitialized,
        |c, driver: DriverHandle, version: &mut ApiVersion| {
            dispatch::driver_get_api_version(&c, driver, version)
        });
    table.get_properties = slot!(ctx, Status::ErrorUninitialized,
        |c, driver: DriverHandle, props: &mut DriverProperties| {
            dispatch::driver_get_properties(&c, driver, props)
        });
    table.get_extension_properties = slot!(ctx, Status::ErrorUninitialized,
        |c, driver: DriverHandle, count: &mut u32, props: Option<&mut [ExtensionProperties]>| {
            dispatch::driver_get_extension_properties(&c, driver, count, props)
        });

    Status::Success
}

pub fn get_device_proc_addr_table(
    ctx: &Arc<DriverContext>,
    version: ApiVersion,
    table: Option<&mut DeviceTable>,
) -> Status {
    let Some(table) = table else {
        return Status::ErrorInvalidNullPointer;
    };
    if ctx.version < version {
        return Status::ErrorUnsupportedVersion;
    }

    table.get = slot!(ctx, Status::ErrorUninitialized,
        |c, driver: DriverHandle, count: &mut u32, out: Option<&mut [DeviceHandle]>| {
            dispatch::device_get(&c, driver, count, out)
        });
    table.get_sub_devices = slot!(ctx, Status::ErrorUninitialized,
        |c, device: DeviceHandle, count: &mut u32, out: Option<&mut [DeviceHandle]>| {
            dispatch::device_get_sub_devices(&c, device, count, out)
        });
    table.get_properties = slot!(ctx, Status::ErrorUninitialized,
        |c, device: DeviceHandle, props: &mut DeviceProperties| {
            dispatch::device_get_properties(&c, device, props)
        });
    table.get_compute_properties = slot!(ctx, Status::ErrorUninitialized,
        |c, device: DeviceHandle, props: &mut ComputeProperties| {
            dispatch::device_get_compute_properties(&c, device, props)
        });
    table.get_memory_properties = slot!(ctx, Status::ErrorUninitialized,
        |c, device: DeviceHandle, count: &mut u32, props: Option<&mut [MemoryProperties]>| {
            dispatch::device_get_memory_properties(&c, device, count, props)
        });
    table.get_memory_access_properties = slot!(ctx, Status::ErrorUninitialized,
        |c, device: DeviceHandle, props: &mut MemoryAccessProperties| {
            dispatch::device_get_memory_access_properties(&c, device, props)
        });
    table.get_cache_properties = slot!(ctx, Status::ErrorUninitialized,
        |c, device: DeviceHandle, count: &mut u32, props: Option<&mut [CacheProperties]>| {
            dispatch::device_get_cache_properties(&c, device, count, props)
        });
    table.get_image_properties = slot!(ctx, Status::ErrorUninitialized,
        |c, device: DeviceHandle, props: &mut ImageProperties| {
            dispatch::device_get_image_properties(&c, device, props)
        });
    table.get_queue_group_properties = slot!(ctx, Status::ErrorUninitialized,
        |c, device: DeviceHandle, count: &mut u32, props: Option<&mut [QueueGroupProperties]>| {
            dispatch::device_get_queue_group_properties(&c, device, count, props)
        });
    table.get_status = slot!(ctx, Status::ErrorUninitialized,
        |c, device: DeviceHandle| dispatch::device_get_status(&c, device));

    Status::Success
}

pub fn get_context_proc_addr_table(
    ctx: &Arc<DriverContext>,
    version: ApiVersion,
    table: Option<&mut ContextTable>,
) -> Status {
    let Some(table) = table else {
        return Status::ErrorInvalidNullPointer;
    };
    if ctx.version < version {
        return Status::ErrorUnsupportedVersion;
    }

    table.create = slot!(ctx, Status::ErrorUninitialized,
        |c, driver: DriverHandle, desc: &ContextDesc, out: &mut ContextHandle| {
            dispatch::context_create(&c, driver, desc, out)
        });
    table.destroy = slot!(ctx, Status::ErrorUninitialized,
        |c, context: ContextHandle| dispatch::context_destroy(&c, context));
    table.get_status = slot!(ctx, Status::ErrorUninitialized,
        |c, context: ContextHandle| dispatch::context_get_status(&c, context));

    Status::Success
}

pub fn get_command_list_proc_addr_table(
    ctx: &Arc<DriverContext>,
    version: ApiVersion,
    table: Option<&mut CommandListTable>,
) -> Status {
    let Some(table) = table else {
        return Status::ErrorInvalidNullPointer;
    };
    if ctx.version < version {
        return Status::ErrorUnsupportedVersion;
    }

    table.create = slot!(ctx, Status::ErrorUninitialized,
        |c, context: ContextHandle, device: DeviceHandle, desc: &CommandListDesc,
         out: &mut CommandListHandle| {
            dispatch::command_list_create(&c, context, device, desc, out)
        });
    table.destroy = slot!(ctx, Status::ErrorUninitialized,
        |c, list: CommandListHandle| dispatch::command_list_destroy(&c, list));
    table.close = slot!(ctx, Status::ErrorUninitialized,
        |c, list: CommandListHandle| dispatch::command_list_close(&c, list));
    table.append_barrier = slot!(ctx, Status::ErrorUninitialized,
        |c, list: CommandListHandle, signal: EventHandle, num_wait: u32,
         wait: Option<&[EventHandle]>| {
            dispatch::command_list_append_barrier(&c, list, signal, num_wait, wait)
        });

    Status::Success
}

pub fn get_event_proc_addr_table(
    ctx: &Arc<DriverContext>,
    version: ApiVersion,
    table: Option<&mut EventTable>,
) -> Status {
    let Some(table) = table else {
        return Status::ErrorInvalidNullPointer;
    };
    if ctx.version < version {
        return Status::ErrorUnsupportedVersion;
    }

    table.pool_create = slot!(ctx, Status::ErrorUninitialized,
        |c, context: ContextHandle, desc: &EventPoolDesc, num_devices: u32,
         devices: Option<&[DeviceHandle]>, out: &mut EventPoolHandle| {
            dispatch::event_pool_create(&c, context, desc, num_devices, devices, out)
        });
    table.pool_destroy = slot!(ctx, Status::ErrorUninitialized,
        |c, pool: EventPoolHandle| dispatch::event_pool_destroy(&c, pool));
    table.create = slot!(ctx, Status::ErrorUninitialized,
        |c, pool: EventPoolHandle, desc: &EventDesc, out: &mut EventHandle| {
            dispatch::event_create(&c, pool, desc, out)
        });
    table.destroy = slot!(ctx, Status::ErrorUninitialized,
        |c, event: EventHandle| dispatch::event_destroy(&c, event));
    table.host_synchronize = slot!(ctx, Status::ErrorUninitialized,
        |c, event: EventHandle, timeout: u64| {
            dispatch::event_host_synchronize(&c, event, timeout)
        });
    table.query_status = slot!(ctx, Status::ErrorUninitialized,
        |c, event: EventHandle| dispatch::event_query_status(&c, event));

    Status::Success
}

pub fn get_tracer_proc_addr_table(
    ctx: &Arc<DriverContext>,
    version: ApiVersion,
    table: Option<&mut TracerTable>,
) -> Status {
    let Some(table) = table else {
        return Status::ErrorInvalidNullPointer;
    };
    if ctx.version < version {
        return Status::ErrorUnsupportedVersion;
    }

    table.create = slot!(ctx, Status::ErrorUninitialized,
        |c, context: ContextHandle, desc: &TracerDesc, out: &mut TracerHandle| {
            dispatch::tracer_create(&c, context, desc, out)
        });
    table.set_prologues = slot!(ctx, Status::ErrorUninitialized,
        |c, tracer: TracerHandle, cbs: &CoreCallbacks| {
            dispatch::tracer_set_prologues(&c, tracer, cbs)
        });
    table.set_epilogues = slot!(ctx, Status::ErrorUninitialized,
        |c, tracer: TracerHandle, cbs: &CoreCallbacks| {
            dispatch::tracer_set_epilogues(&c, tracer, cbs)
        });
    table.set_enabled = slot!(ctx, Status::ErrorUninitialized,
        |c, tracer: TracerHandle, enabled: bool| {
            dispatch::tracer_set_enabled(&c, tracer, enabled)
        });

    Status::Success
}

pub fn get_sysman_device_proc_addr_table(
    ctx: &Arc<DriverContext>,
    version: ApiVersion,
    table: Option<&mut SysmanDeviceTable>,
) -> Status {
    let Some(table) = table else {
        return Status::ErrorInvalidNullPointer;
    };
    if ctx.version < version {
        return Status::ErrorUnsupportedVersion;
    }

    table.get_state = slot!(ctx, Status::ErrorUninitialized,
        |c, device: DeviceHandle, state: &mut DeviceState| {
            dispatch::sysman_device_get_state(&c, device, state)
        });

    Status::Success
}

/// Runtime (Global) table-fill. Declines outright when the
/// runtime-disable override names this driver id, before any other
/// check; a driver that opted out must look exactly like a driver that
/// never had the interface.
pub fn get_global_proc_addr_table(
    ctx: &Arc<DriverContext>,
    version: ApiVersion,
    table: Option<&mut GlobalTable>,
) -> Status {
    if ctx.config.runtime_disabled {
        return Status::ErrorUnsupportedFeature;
    }
    let Some(table) = table else {
        return Status::ErrorInvalidNullPointer;
    };
    if ctx.version < version {
        return Status::ErrorUnsupportedVersion;
    }

    table.get_last_error_description = slot!(ctx, Status::ErrorUninitialized,
        |c, description: &mut String| dispatch::get_last_error_description(&c, description));
    table.translate_device_handle_to_identifier = slot!(ctx, u32::MAX,
        |c, device: DeviceHandle| dispatch::translate_device_handle_to_identifier(&c, device));
    table.translate_identifier_to_device_handle = slot!(ctx, DeviceHandle::NULL,
        |c, identifier: u32| dispatch::translate_identifier_to_device_handle(&c, identifier));
    table.get_default_context = slot!(ctx, ContextHandle::NULL,
        |c| dispatch::get_default_context(&c));

    Status::Success
}

/// Assemble the context's published table set: every family filled with
/// this context's trampolines. Capability records embed clones of the
/// returned `Arc`s.
pub(crate) fn build_table_set(ctx: &Arc<DriverContext>) -> ObjectTableSet {
    let version = ctx.version;

    let mut core = CoreTables::default();
    let _ = get_driver_proc_addr_table(ctx, version, Some(&mut core.driver));
    let _ = get_device_proc_addr_table(ctx, version, Some(&mut core.device));
    let _ = get_context_proc_addr_table(ctx, version, Some(&mut core.context));
    let _ = get_command_list_proc_addr_table(ctx, version, Some(&mut core.command_list));
    let _ = get_event_proc_addr_table(ctx, version, Some(&mut core.event));
    core.version = version;
    core.valid = true;

    let mut tools = ToolsTables::default();
    let _ = get_tracer_proc_addr_table(ctx, version, Some(&mut tools.tracer));
    tools.version = version;
    tools.valid = true;

    let mut sysman = SysmanTables::default();
    let _ = get_sysman_device_proc_addr_table(ctx, version, Some(&mut sysman.device));
    sysman.version = version;
    sysman.valid = true;

    let mut runtime = RuntimeTables::default();
    runtime.version = version;
    let mut global = GlobalTable::default();
    match get_global_proc_addr_table(ctx, version, Some(&mut global)) {
        Status::Success => {
            runtime.global = Some(global);
            runtime.valid = true;
        }
        _ => {
            runtime.global = None;
            runtime.valid = false;
        }
    }

    ObjectTableSet {
        core: Arc::new(core),
        tools: Arc::new(tools),
        sysman: Arc::new(sysman),
        runtime: Arc::new(runtime),
    }
}
