//! Loader table-fill: populate a consumer-supplied dditable with the
//! loader's trampolines, so an embedding runtime can dispatch through
//! the multi-driver machinery with its own table layout.
//!
//! Same contract as the driver-side fills: absent table is an invalid
//! null pointer, a requested version newer than the loader's is
//! unsupported and leaves the table untouched.

use std::sync::Arc;

use axle_api::handles::*;
use axle_api::properties::*;
use axle_api::status::Status;
use axle_api::tables::*;
use axle_api::version::ApiVersion;

use crate::context::LoaderContext;
use crate::dispatch;

pub fn get_driver_proc_addr_table(
    ctx: &Arc<LoaderContext>,
    version: ApiVersion,
    table: Option<&mut DriverTable>,
) -> Status {
    let Some(table) = table else {
        return Status::ErrorInvalidNullPointer;
    };
    if ctx.api_version() < version {
        return Status::ErrorUnsupportedVersion;
    }

    table.get = Some({
        let c = ctx.clone();
        Arc::new(move |count: &mut u32, out: Option<&mut [DriverHandle]>| {
            dispatch::driver_get(&c, count, out)
        })
    });
    table.get_api_version = Some({
        let c = ctx.clone();
        Arc::new(move |driver: DriverHandle, version: &mut ApiVersion| {
            dispatch::driver_get_api_version(&c, driver, version)
        })
    });
    table.get_properties = Some({
        let c = ctx.clone();
        Arc::new(move |driver: DriverHandle, props: &mut DriverProperties| {
            dispatch::driver_get_properties(&c, driver, props)
        })
    });
    table.get_extension_properties = Some({
        let c = ctx.clone();
        Arc::new(
            move |driver: DriverHandle,
                  count: &mut u32,
                  props: Option<&mut [ExtensionProperties]>| {
                dispatch::driver_get_extension_properties(&c, driver, count, props)
            },
        )
    });

    Status::Success
}

pub fn get_device_proc_addr_table(
    ctx: &Arc<LoaderContext>,
    version: ApiVersion,
    table: Option<&mut DeviceTable>,
) -> Status {
    let Some(table) = table else {
        return Status::ErrorInvalidNullPointer;
    };
    if ctx.api_version() < version {
        return Status::ErrorUnsupportedVersion;
    }

    table.get = Some({
        let c = ctx.clone();
        Arc::new(
            move |driver: DriverHandle, count: &mut u32, out: Option<&mut [DeviceHandle]>| {
                dispatch::device_get(&c, driver, count, out)
            },
        )
    });
    table.get_sub_devices = Some({
        let c = ctx.clone();
        Arc::new(
            move |device: DeviceHandle, count: &mut u32, out: Option<&mut [DeviceHandle]>| {
                dispatch::device_get_sub_devices(&c, device, count, out)
            },
        )
    });
    table.get_properties = Some({
        let c = ctx.clone();
        Arc::new(move |device: DeviceHandle, props: &mut DeviceProperties| {
            dispatch::device_get_properties(&c, device, props)
        })
    });
    table.get_compute_properties = Some({
        let c = ctx.clone();
        Arc::new(move |device: DeviceHandle, props: &mut ComputeProperties| {
            dispatch::device_get_compute_properties(&c, device, props)
        })
    });
    table.get_memory_properties = Some({
        let c = ctx.clone();
        Arc::new(
            move |device: DeviceHandle,
                  count: &mut u32,
                  props: Option<&mut [MemoryProperties]>| {
                dispatch::device_get_memory_properties(&c, device, count, props)
            },
        )
    });
    table.get_memory_access_properties = Some({
        let c = ctx.clone();
        Arc::new(
            move |device: DeviceHandle, props: &mut MemoryAccessProperties| {
                dispatch::device_get_memory_access_properties(&c, device, props)
            },
        )
    });
    table.get_cache_properties = Some({
        let c = ctx.clone();
        Arc::new(
            move |device: DeviceHandle,
                  count: &mut u32,
                  props: Option<&mut [CacheProperties]>| {
                dispatch::device_get_cache_properties(&c, device, count, props)
            },
        )
    });
    table.get_image_properties = Some({
        let c = ctx.clone();
        Arc::new(move |device: DeviceHandle, props: &mut ImageProperties| {
            dispatch::device_get_image_properties(&c, device, props)
        })
    });
    table.get_queue_group_properties = Some({
        let c = ctx.clone();
        Arc::new(
            move |device: DeviceHandle,
                  count: &mut u32,
                  props: Option<&mut [QueueGroupProperties]>| {
                dispatch::device_get_queue_group_properties(&c, device, count, props)
            },
        )
    });
    table.get_status = Some({
        let c = ctx.clone();
        Arc::new(move |device: DeviceHandle| dispatch::device_get_status(&c, device))
    });

    Status::Success
}

pub fn get_context_proc_addr_table(
    ctx: &Arc<LoaderContext>,
    version: ApiVersion,
    table: Option<&mut ContextTable>,
) -> Status {
    let Some(table) = table else {
        return Status::ErrorInvalidNullPointer;
    };
    if ctx.api_version() < version {
        return Status::ErrorUnsupportedVersion;
    }

    table.create = Some({
        let c = ctx.clone();
        Arc::new(
            move |driver: DriverHandle, desc: &ContextDesc, out: &mut ContextHandle| {
                dispatch::context_create(&c, driver, desc, out)
            },
        )
    });
    table.destroy = Some({
        let c = ctx.clone();
        Arc::new(move |context: ContextHandle| dispatch::context_destroy(&c, context))
    });
    table.get_status = Some({
        let c = ctx.clone();
        Arc::new(move |context: ContextHandle| dispatch::context_get_status(&c, context))
    });

    Status::Success
}

pub fn get_command_list_proc_addr_table(
    ctx: &Arc<LoaderContext>,
    version: ApiVersion,
    table: Option<&mut CommandListTable>,
) -> Status {
    let Some(table) = table else {
        return Status::ErrorInvalidNullPointer;
    };
    if ctx.api_version() < version {
        return Status::ErrorUnsupportedVersion;
    }

    table.create = Some({
        let c = ctx.clone();
        Arc::new(
            move |context: ContextHandle,
                  device: DeviceHandle,
                  desc: &CommandListDesc,
                  out: &mut CommandListHandle| {
                dispatch::command_list_create(&c, context, device, desc, out)
            },
        )
    });
    table.destroy = Some({
        let c = ctx.clone();
        Arc::new(move |list: CommandListHandle| dispatch::command_list_destroy(&c, list))
    });
    table.close = Some({
        let c = ctx.clone();
        Arc::new(move |list: CommandListHandle| dispatch::command_list_close(&c, list))
    });
    table.append_barrier = Some({
        let c = ctx.clone();
        Arc::new(
            move |list: CommandListHandle,
                  signal: EventHandle,
                  num_wait: u32,
                  wait: Option<&[EventHandle]>| {
                dispatch::command_list_append_barrier(&c, list, signal, num_wait, wait)
            },
        )
    });

    Status::Success
}

pub fn get_event_proc_addr_table(
    ctx: &Arc<LoaderContext>,
    version: ApiVersion,
    table: Option<&mut EventTable>,
) -> Status {
    let Some(table) = table else {
        return Status::ErrorInvalidNullPointer;
    };
    if ctx.api_version() < version {
        return Status::ErrorUnsupportedVersion;
    }

    table.pool_create = Some({
        let c = ctx.clone();
        Arc::new(
            move |context: ContextHandle,
                  desc: &EventPoolDesc,
                  num_devices: u32,
                  devices: Option<&[DeviceHandle]>,
                  out: &mut EventPoolHandle| {
                dispatch::event_pool_create(&c, context, desc, num_devices, devices, out)
            },
        )
    });
    table.pool_destroy = Some({
        let c = ctx.clone();
        Arc::new(move |pool: EventPoolHandle| dispatch::event_pool_destroy(&c, pool))
    });
    table.create = Some({
        let c = ctx.clone();
        Arc::new(
            move |pool: EventPoolHandle, desc: &EventDesc, out: &mut EventHandle| {
                dispatch::event_create(&c, pool, desc, out)
            },
        )
    });
    table.destroy = Some({
        let c = ctx.clone();
        Arc::new(move |event: EventHandle| dispatch::event_destroy(&c, event))
    });
    table.host_synchronize = Some({
        let c = ctx.clone();
        Arc::new(move |event: EventHandle, timeout: u64| {
            dispatch::event_host_synchronize(&c, event, timeout)
        })
    });
    table.query_status = Some({
        let c = ctx.clone();
        Arc::new(move |event: EventHandle| dispatch::event_query_status(&c, event))
    });

    Status::Success
}
