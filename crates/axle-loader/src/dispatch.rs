//! Loader-side dispatch trampolines.
//!
//! Unlike the null driver, the loader has no generic fallbacks: a call
//! must reach a concrete implementation, so an unresolvable handle or a
//! missing slot reports `ErrorUninitialized`. Handles a driver returns
//! are registered against their owner; destroy-style calls release the
//! registration after forwarding.

use axle_api::handles::*;
use axle_api::properties::*;
use axle_api::status::Status;
use axle_api::version::ApiVersion;

use crate::context::LoaderContext;

// ── Driver ──────────────────────────────────────────────────

/// Enumerate the loader's view of the registered drivers, following the
/// count/array convention: a zero count (or no array) queries the total.
pub fn driver_get(
    ctx: &LoaderContext,
    count: &mut u32,
    drivers: Option<&mut [DriverHandle]>,
) -> Status {
    if !ctx.init_status().is_success() {
        return Status::ErrorUninitialized;
    }
    let known = ctx.driver_handles();
    let total = known.len() as u32;

    match drivers {
        None => *count = total,
        Some(out) => {
            if *count == 0 {
                *count = total;
            } else {
                let n = (*count).min(total) as usize;
                let n = n.min(out.len());
                out[..n].copy_from_slice(&known[..n]);
                *count = n as u32;
            }
        }
    }
    Status::Success
}

pub fn driver_get_api_version(
    ctx: &LoaderContext,
    driver: DriverHandle,
    version: &mut ApiVersion,
) -> Status {
    let Some(r) = ctx.resolve(driver.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.driver.get_api_version.clone() else {
        return Status::ErrorUninitialized;
    };
    pfn(driver, version)
}

pub fn driver_get_properties(
    ctx: &LoaderContext,
    driver: DriverHandle,
    props: &mut DriverProperties,
) -> Status {
    let Some(r) = ctx.resolve(driver.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.driver.get_properties.clone() else {
        return Status::ErrorUninitialized;
    };
    pfn(driver, props)
}

pub fn driver_get_extension_properties(
    ctx: &LoaderContext,
    driver: DriverHandle,
    count: &mut u32,
    props: Option<&mut [ExtensionProperties]>,
) -> Status {
    let Some(r) = ctx.resolve(driver.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.driver.get_extension_properties.clone() else {
        return Status::ErrorUninitialized;
    };
    pfn(driver, count, props)
}

// ── Device ──────────────────────────────────────────────────

pub fn device_get(
    ctx: &LoaderContext,
    driver: DriverHandle,
    count: &mut u32,
    devices: Option<&mut [DeviceHandle]>,
) -> Status {
    let Some(r) = ctx.resolve(driver.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.device.get.clone() else {
        return Status::ErrorUninitialized;
    };
    match devices {
        None => pfn(driver, count, None),
        Some(out) => {
            let status = pfn(driver, count, Some(&mut *out));
            if status.is_success() {
                let n = (*count as usize).min(out.len());
                for handle in out[..n].iter().filter(|h| !h.is_null()) {
                    ctx.register_handle(handle.as_raw(), r.driver, r.version);
                }
            }
            status
        }
    }
}

pub fn device_get_sub_devices(
    ctx: &LoaderContext,
    device: DeviceHandle,
    count: &mut u32,
    sub_devices: Option<&mut [DeviceHandle]>,
) -> Status {
    let Some(r) = ctx.resolve(device.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.device.get_sub_devices.clone() else {
        return Status::ErrorUninitialized;
    };
    match sub_devices {
        None => pfn(device, count, None),
        Some(out) => {
            let status = pfn(device, count, Some(&mut *out));
            if status.is_success() {
                let n = (*count as usize).min(out.len());
                for handle in out[..n].iter().filter(|h| !h.is_null()) {
                    ctx.register_handle(handle.as_raw(), r.driver, r.version);
                }
            }
            status
        }
    }
}

pub fn device_get_properties(
    ctx: &LoaderContext,
    device: DeviceHandle,
    props: &mut DeviceProperties,
) -> Status {
    let Some(r) = ctx.resolve(device.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.device.get_properties.clone() else {
        return Status::ErrorUninitialized;
    };
    pfn(device, props)
}

pub fn device_get_compute_properties(
    ctx: &LoaderContext,
    device: DeviceHandle,
    props: &mut ComputeProperties,
) -> Status {
    let Some(r) = ctx.resolve(device.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.device.get_compute_properties.clone() else {
        return Status::ErrorUninitialized;
    };
    pfn(device, props)
}

pub fn device_get_memory_properties(
    ctx: &LoaderContext,
    device: DeviceHandle,
    count: &mut u32,
    props: Option<&mut [MemoryProperties]>,
) -> Status {
    let Some(r) = ctx.resolve(device.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.device.get_memory_properties.clone() else {
        return Status::ErrorUninitialized;
    };
    pfn(device, count, props)
}

pub fn device_get_memory_access_properties(
    ctx: &LoaderContext,
    device: DeviceHandle,
    props: &mut MemoryAccessProperties,
) -> Status {
    let Some(r) = ctx.resolve(device.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.device.get_memory_access_properties.clone() else {
        return Status::ErrorUninitialized;
    };
    pfn(device, props)
}

pub fn device_get_cache_properties(
    ctx: &LoaderContext,
    device: DeviceHandle,
    count: &mut u32,
    props: Option<&mut [CacheProperties]>,
) -> Status {
    let Some(r) = ctx.resolve(device.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.device.get_cache_properties.clone() else {
        return Status::ErrorUninitialized;
    };
    pfn(device, count, props)
}

pub fn device_get_image_properties(
    ctx: &LoaderContext,
    device: DeviceHandle,
    props: &mut ImageProperties,
) -> Status {
    let Some(r) = ctx.resolve(device.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.device.get_image_properties.clone() else {
        return Status::ErrorUninitialized;
    };
    pfn(device, props)
}

pub fn device_get_queue_group_properties(
    ctx: &LoaderContext,
    device: DeviceHandle,
    count: &mut u32,
    props: Option<&mut [QueueGroupProperties]>,
) -> Status {
    let Some(r) = ctx.resolve(device.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.device.get_queue_group_properties.clone() else {
        return Status::ErrorUninitialized;
    };
    pfn(device, count, props)
}

pub fn device_get_status(ctx: &LoaderContext, device: DeviceHandle) -> Status {
    let Some(r) = ctx.resolve(device.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.device.get_status.clone() else {
        return Status::ErrorUninitialized;
    };
    pfn(device)
}

// ── Context ─────────────────────────────────────────────────

pub fn context_create(
    ctx: &LoaderContext,
    driver: DriverHandle,
    desc: &ContextDesc,
    context: &mut ContextHandle,
) -> Status {
    let Some(r) = ctx.resolve(driver.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.context.create.clone() else {
        return Status::ErrorUninitialized;
    };
    let status = pfn(driver, desc, context);
    if status.is_success() && !context.is_null() {
        ctx.register_handle(context.as_raw(), r.driver, r.version);
    }
    status
}

pub fn context_destroy(ctx: &LoaderContext, context: ContextHandle) -> Status {
    let Some(r) = ctx.resolve(context.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.context.destroy.clone() else {
        return Status::ErrorUninitialized;
    };
    let status = pfn(context);
    if status.is_success() {
        ctx.registry().release(context.as_raw());
    }
    status
}

pub fn context_get_status(ctx: &LoaderContext, context: ContextHandle) -> Status {
    let Some(r) = ctx.resolve(context.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.context.get_status.clone() else {
        return Status::ErrorUninitialized;
    };
    pfn(context)
}

// ── Command list ────────────────────────────────────────────

pub fn command_list_create(
    ctx: &LoaderContext,
    context: ContextHandle,
    device: DeviceHandle,
    desc: &CommandListDesc,
    command_list: &mut CommandListHandle,
) -> Status {
    let Some(r) = ctx.resolve(context.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.command_list.create.clone() else {
        return Status::ErrorUninitialized;
    };
    let status = pfn(context, device, desc, command_list);
    if status.is_success() && !command_list.is_null() {
        ctx.register_handle(command_list.as_raw(), r.driver, r.version);
    }
    status
}

pub fn command_list_destroy(ctx: &LoaderContext, command_list: CommandListHandle) -> Status {
    let Some(r) = ctx.resolve(command_list.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.command_list.destroy.clone() else {
        return Status::ErrorUninitialized;
    };
    let status = pfn(command_list);
    if status.is_success() {
        ctx.registry().release(command_list.as_raw());
    }
    status
}

pub fn command_list_close(ctx: &LoaderContext, command_list: CommandListHandle) -> Status {
    let Some(r) = ctx.resolve(command_list.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.command_list.close.clone() else {
        return Status::ErrorUninitialized;
    };
    pfn(command_list)
}

pub fn command_list_append_barrier(
    ctx: &LoaderContext,
    command_list: CommandListHandle,
    signal_event: EventHandle,
    num_wait_events: u32,
    wait_events: Option<&[EventHandle]>,
) -> Status {
    let Some(r) = ctx.resolve(command_list.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.command_list.append_barrier.clone() else {
        return Status::ErrorUninitialized;
    };
    pfn(command_list, signal_event, num_wait_events, wait_events)
}

// ── Event ───────────────────────────────────────────────────

pub fn event_pool_create(
    ctx: &LoaderContext,
    context: ContextHandle,
    desc: &EventPoolDesc,
    num_devices: u32,
    devices: Option<&[DeviceHandle]>,
    pool: &mut EventPoolHandle,
) -> Status {
    let Some(r) = ctx.resolve(context.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.event.pool_create.clone() else {
        return Status::ErrorUninitialized;
    };
    let status = pfn(context, desc, num_devices, devices, pool);
    if status.is_success() && !pool.is_null() {
        ctx.register_handle(pool.as_raw(), r.driver, r.version);
    }
    status
}

pub fn event_pool_destroy(ctx: &LoaderContext, pool: EventPoolHandle) -> Status {
    let Some(r) = ctx.resolve(pool.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.event.pool_destroy.clone() else {
        return Status::ErrorUninitialized;
    };
    let status = pfn(pool);
    if status.is_success() {
        ctx.registry().release(pool.as_raw());
    }
    status
}

pub fn event_create(
    ctx: &LoaderContext,
    pool: EventPoolHandle,
    desc: &EventDesc,
    event: &mut EventHandle,
) -> Status {
    let Some(r) = ctx.resolve(pool.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.event.create.clone() else {
        return Status::ErrorUninitialized;
    };
    let status = pfn(pool, desc, event);
    if status.is_success() && !event.is_null() {
        ctx.register_handle(event.as_raw(), r.driver, r.version);
    }
    status
}

pub fn event_destroy(ctx: &LoaderContext, event: EventHandle) -> Status {
    let Some(r) = ctx.resolve(event.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.event.destroy.clone() else {
        return Status::ErrorUninitialized;
    };
    let status = pfn(event);
    if status.is_success() {
        ctx.registry().release(event.as_raw());
    }
    status
}

pub fn event_host_synchronize(
    ctx: &LoaderContext,
    event: EventHandle,
    timeout: u64,
) -> Status {
    let Some(r) = ctx.resolve(event.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.event.host_synchronize.clone() else {
        return Status::ErrorUninitialized;
    };
    pfn(event, timeout)
}

pub fn event_query_status(ctx: &LoaderContext, event: EventHandle) -> Status {
    let Some(r) = ctx.resolve(event.as_raw()) else {
        return Status::ErrorUninitialized;
    };
    let Some(pfn) = r.tables.core.event.query_status.clone() else {
        return Status::ErrorUninitialized;
    };
    pfn(event)
}

// ── Tracer management (loader tracing layer) ────────────────

pub fn tracer_create(
    ctx: &LoaderContext,
    desc: &TracerDesc,
    tracer: &mut TracerHandle,
) -> Status {
    match ctx.tracers() {
        Some(coll) => {
            *tracer = coll.create(desc);
            Status::Success
        }
        None => Status::ErrorUnsupportedFeature,
    }
}

pub fn tracer_set_prologues(
    ctx: &LoaderContext,
    tracer: TracerHandle,
    cbs: &axle_api::callbacks::CoreCallbacks,
) -> Status {
    match ctx.tracers() {
        Some(coll) => coll.set_prologues(tracer, cbs.clone()),
        None => Status::ErrorUnsupportedFeature,
    }
}

pub fn tracer_set_epilogues(
    ctx: &LoaderContext,
    tracer: TracerHandle,
    cbs: &axle_api::callbacks::CoreCallbacks,
) -> Status {
    match ctx.tracers() {
        Some(coll) => coll.set_epilogues(tracer, cbs.clone()),
        None => Status::ErrorUnsupportedFeature,
    }
}

pub fn tracer_set_enabled(
    ctx: &LoaderContext,
    tracer: TracerHandle,
    enabled: bool,
) -> Status {
    match ctx.tracers() {
        Some(coll) => coll.set_enabled(tracer, enabled),
        None => Status::ErrorUnsupportedFeature,
    }
}
