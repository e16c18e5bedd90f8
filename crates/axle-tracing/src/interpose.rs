//! Rewrite a core table so every dispatch is bracketed by tracer
//! callbacks: enabled prologues in registration order, the inner slot,
//! then enabled epilogues in registration order.
//!
//! Empty slots stay empty; the tracing layer never invents behavior.

use std::sync::Arc;

use axle_api::callbacks::*;
use axle_api::handles::*;
use axle_api::properties::*;
use axle_api::tables::CoreTables;
use axle_api::version::ApiVersion;

use crate::collection::TracerCollection;

macro_rules! traced {
    ($dst:expr, $src:expr, $coll:expr, $cb:ident, $Params:ident,
     |$($arg:ident : $ty:ty),*| { $($field:ident : $value:expr),* $(,)? }) => {
        $dst = match $src.clone() {
            Some(inner) => {
                let coll = Arc::clone($coll);
                Some(Arc::new(move |$($arg: $ty),*| {
                    coll.prologue(
                        |cbs| cbs.$cb.clone(),
                        &$Params { $($field: $value,)* result: None },
                    );
                    let result = inner($($arg),*);
                    coll.epilogue(
                        |cbs| cbs.$cb.clone(),
                        &$Params { $($field: $value,)* result: Some(result) },
                    );
                    result
                }))
            }
            None => None,
        };
    };
}

/// Wrap every populated slot of `inner` with the collection's
/// prologue/epilogue dispatch.
pub fn wrap_core(inner: &CoreTables, coll: &Arc<TracerCollection>) -> CoreTables {
    let mut out = CoreTables {
        version: inner.version,
        valid: inner.valid,
        ..CoreTables::default()
    };

    traced!(out.driver.get, inner.driver.get, coll, driver_get, DriverGetParams,
        |count: &mut u32, drivers: Option<&mut [DriverHandle]>| { count: *count });
    traced!(out.driver.get_api_version, inner.driver.get_api_version, coll,
        driver_get_api_version, DriverGetApiVersionParams,
        |driver: DriverHandle, version: &mut ApiVersion| { driver: driver });
    traced!(out.driver.get_properties, inner.driver.get_properties, coll,
        driver_get_properties, DriverGetPropertiesParams,
        |driver: DriverHandle, props: &mut DriverProperties| { driver: driver });
    traced!(out.driver.get_extension_properties, inner.driver.get_extension_properties, coll,
        driver_get_extension_properties, DriverGetExtensionPropertiesParams,
        |driver: DriverHandle, count: &mut u32, props: Option<&mut [ExtensionProperties]>| {
            driver: driver, count: *count
        });

    traced!(out.device.get, inner.device.get, coll, device_get, DeviceGetParams,
        |driver: DriverHandle, count: &mut u32, devices: Option<&mut [DeviceHandle]>| {
            driver: driver, count: *count
        });
    traced!(out.device.get_sub_devices, inner.device.get_sub_devices, coll,
        device_get_sub_devices, DeviceGetSubDevicesParams,
        |device: DeviceHandle, count: &mut u32, subs: Option<&mut [DeviceHandle]>| {
            device: device, count: *count
        });
    traced!(out.device.get_properties, inner.device.get_properties, coll,
        device_get_properties, DeviceGetPropertiesParams,
        |device: DeviceHandle, props: &mut DeviceProperties| { device: device });
    traced!(out.device.get_compute_properties, inner.device.get_compute_properties, coll,
        device_get_compute_properties, DeviceGetComputePropertiesParams,
        |device: DeviceHandle, props: &mut ComputeProperties| { device: device });
    traced!(out.device.get_memory_properties, inner.device.get_memory_properties, coll,
        device_get_memory_properties, DeviceGetMemoryPropertiesParams,
        |device: DeviceHandle, count: &mut u32, props: Option<&mut [MemoryProperties]>| {
            device: device, count: *count
        });
    traced!(out.device.get_memory_access_properties,
        inner.device.get_memory_access_properties, coll,
        device_get_memory_access_properties, DeviceGetMemoryAccessPropertiesParams,
        |device: DeviceHandle, props: &mut MemoryAccessProperties| { device: device });
    traced!(out.device.get_cache_properties, inner.device.get_cache_properties, coll,
        device_get_cache_properties, DeviceGetCachePropertiesParams,
        |device: DeviceHandle, count: &mut u32, props: Option<&mut [CacheProperties]>| {
            device: device, count: *count
        });
    traced!(out.device.get_image_properties, inner.device.get_image_properties, coll,
        device_get_image_properties, DeviceGetImagePropertiesParams,
        |device: DeviceHandle, props: &mut ImageProperties| { device: device });
    traced!(out.device.get_queue_group_properties,
        inner.device.get_queue_group_properties, coll,
        device_get_queue_group_properties, DeviceGetQueueGroupPropertiesParams,
        |device: DeviceHandle, count: &mut u32, props: Option<&mut [QueueGroupProperties]>| {
            device: device, count: *count
        });
    traced!(out.device.get_status, inner.device.get_status, coll,
        device_get_status, DeviceGetStatusParams,
        |device: DeviceHandle| { device: device });

    traced!(out.context.create, inner.context.create, coll,
        context_create, ContextCreateParams,
        |driver: DriverHandle, desc: &ContextDesc, context: &mut ContextHandle| {
            driver: driver
        });
    traced!(out.context.destroy, inner.context.destroy, coll,
        context_destroy, ContextDestroyParams,
        |context: ContextHandle| { context: context });
    traced!(out.context.get_status, inner.context.get_status, coll,
        context_get_status, ContextGetStatusParams,
        |context: ContextHandle| { context: context });

    traced!(out.command_list.create, inner.command_list.create, coll,
        command_list_create, CommandListCreateParams,
        |context: ContextHandle, device: DeviceHandle, desc: &CommandListDesc,
         list: &mut CommandListHandle| {
            context: context, device: device
        });
    traced!(out.command_list.destroy, inner.command_list.destroy, coll,
        command_list_destroy, CommandListDestroyParams,
        |list: CommandListHandle| { command_list: list });
    traced!(out.command_list.close, inner.command_list.close, coll,
        command_list_close, CommandListCloseParams,
        |list: CommandListHandle| { command_list: list });
    traced!(out.command_list.append_barrier, inner.command_list.append_barrier, coll,
        command_list_append_barrier, CommandListAppendBarrierParams,
        |list: CommandListHandle, signal: EventHandle, num_wait: u32,
         wait: Option<&[EventHandle]>| {
            command_list: list, num_wait_events: num_wait
        });

    traced!(out.event.pool_create, inner.event.pool_create, coll,
        event_pool_create, EventPoolCreateParams,
        |context: ContextHandle, desc: &EventPoolDesc, num_devices: u32,
         devices: Option<&[DeviceHandle]>, pool: &mut EventPoolHandle| {
            context: context, num_devices: num_devices
        });
    traced!(out.event.pool_destroy, inner.event.pool_destroy, coll,
        event_pool_destroy, EventPoolDestroyParams,
        |pool: EventPoolHandle| { pool: pool });
    traced!(out.event.create, inner.event.create, coll,
        event_create, EventCreateParams,
        |pool: EventPoolHandle, desc: &EventDesc, event: &mut EventHandle| { pool: pool });
    traced!(out.event.destroy, inner.event.destroy, coll,
        event_destroy, EventDestroyParams,
        |event: EventHandle| { event: event });
    traced!(out.event.host_synchronize, inner.event.host_synchronize, coll,
        event_host_synchronize, EventHostSynchronizeParams,
        |event: EventHandle, timeout: u64| { event: event, timeout: timeout });
    traced!(out.event.query_status, inner.event.query_status, coll,
        event_query_status, EventQueryStatusParams,
        |event: EventHandle| { event: event });

    out
}
