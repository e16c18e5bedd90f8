//! Compose the argument checks in front of an existing core table.
//!
//! Slots left empty in the inner table stay empty; the validation
//! layer must not turn a generic-fallback slot into a populated one.

use std::sync::Arc;

use axle_api::handles::*;
use axle_api::properties::*;
use axle_api::status::Status;
use axle_api::tables::CoreTables;
use axle_api::version::ApiVersion;

use crate::checks;

macro_rules! guarded {
    ($slot:expr, |$($arg:ident : $ty:ty),*| $check:expr) => {
        match $slot.clone() {
            Some(inner) => Some(Arc::new(move |$($arg: $ty),*| {
                let st: Status = $check;
                if !st.is_success() {
                    return st;
                }
                inner($($arg),*)
            })),
            None => None,
        }
    };
}

/// Return a copy of `inner` with every populated slot preceded by its
/// parameter checks.
pub fn wrap_core(inner: &CoreTables) -> CoreTables {
    let mut out = CoreTables {
        version: inner.version,
        valid: inner.valid,
        ..CoreTables::default()
    };

    out.driver.get = guarded!(
        inner.driver.get,
        |count: &mut u32, _drivers: Option<&mut [DriverHandle]>| checks::driver_get(Some(count))
    );
    out.driver.get_api_version = guarded!(
        inner.driver.get_api_version,
        |driver: DriverHandle, version: &mut ApiVersion| {
            checks::driver_get_api_version(driver, Some(version))
        }
    );
    out.driver.get_properties = guarded!(
        inner.driver.get_properties,
        |driver: DriverHandle, props: &mut DriverProperties| {
            checks::driver_get_properties(driver, Some(props))
        }
    );
    out.driver.get_extension_properties = guarded!(
        inner.driver.get_extension_properties,
        |driver: DriverHandle, count: &mut u32, _props: Option<&mut [ExtensionProperties]>| {
            checks::driver_get_extension_properties(driver, Some(count))
        }
    );

    out.device.get = guarded!(
        inner.device.get,
        |driver: DriverHandle, count: &mut u32, _devices: Option<&mut [DeviceHandle]>| {
            checks::device_get(driver, Some(count))
        }
    );
    out.device.get_sub_devices = guarded!(
        inner.device.get_sub_devices,
        |device: DeviceHandle, count: &mut u32, _subs: Option<&mut [DeviceHandle]>| {
            checks::device_get_sub_devices(device, Some(count))
        }
    );
    out.device.get_properties = guarded!(
        inner.device.get_properties,
        |device: DeviceHandle, props: &mut DeviceProperties| {
            checks::device_get_properties(device, Some(props))
        }
    );
    out.device.get_compute_properties = guarded!(
        inner.device.get_compute_properties,
        |device: DeviceHandle, props: &mut ComputeProperties| {
            checks::device_get_compute_properties(device, Some(props))
        }
    );
    out.device.get_memory_properties = guarded!(
        inner.device.get_memory_properties,
        |device: DeviceHandle, count: &mut u32, _props: Option<&mut [MemoryProperties]>| {
            checks::device_get_memory_properties(device, Some(count))
        }
    );
    out.device.get_memory_access_properties = guarded!(
        inner.device.get_memory_access_properties,
        |device: DeviceHandle, props: &mut MemoryAccessProperties| {
            checks::device_get_memory_access_properties(device, Some(props))
        }
    );
    out.device.get_cache_properties = guarded!(
        inner.device.get_cache_properties,
        |device: DeviceHandle, count: &mut u32, _props: Option<&mut [CacheProperties]>| {
            checks::device_get_cache_properties(device, Some(count))
        }
    );
    out.device.get_image_properties = guarded!(
        inner.device.get_image_properties,
        |device: DeviceHandle, props: &mut ImageProperties| {
            checks::device_get_image_properties(device, Some(props))
        }
    );
    out.device.get_queue_group_properties = guarded!(
        inner.device.get_queue_group_properties,
        |device: DeviceHandle, count: &mut u32, _props: Option<&mut [QueueGroupProperties]>| {
            checks::device_get_queue_group_properties(device, Some(count))
        }
    );
    out.device.get_status = guarded!(inner.device.get_status, |device: DeviceHandle| {
        checks::device_get_status(device)
    });

    out.context.create = guarded!(
        inner.context.create,
        |driver: DriverHandle, desc: &ContextDesc, context: &mut ContextHandle| {
            checks::context_create(driver, Some(desc), Some(context))
        }
    );
    out.context.destroy = guarded!(inner.context.destroy, |context: ContextHandle| {
        checks::context_destroy(context)
    });
    out.context.get_status = guarded!(inner.context.get_status, |context: ContextHandle| {
        checks::context_get_status(context)
    });

    out.command_list.create = guarded!(
        inner.command_list.create,
        |context: ContextHandle,
         device: DeviceHandle,
         desc: &CommandListDesc,
         list: &mut CommandListHandle| {
            checks::command_list_create(context, device, Some(desc), Some(list))
        }
    );
    out.command_list.destroy = guarded!(
        inner.command_list.destroy,
        |list: CommandListHandle| checks::command_list_destroy(list)
    );
    out.command_list.close = guarded!(inner.command_list.close, |list: CommandListHandle| {
        checks::command_list_close(list)
    });
    out.command_list.append_barrier = guarded!(
        inner.command_list.append_barrier,
        |list: CommandListHandle,
         _signal: EventHandle,
         num_wait: u32,
         wait: Option<&[EventHandle]>| {
            checks::command_list_append_barrier(list, num_wait, wait)
        }
    );

    out.event.pool_create = guarded!(
        inner.event.pool_create,
        |context: ContextHandle,
         desc: &EventPoolDesc,
         num_devices: u32,
         devices: Option<&[DeviceHandle]>,
         pool: &mut EventPoolHandle| {
            checks::event_pool_create(context, Some(desc), num_devices, devices, Some(pool))
        }
    );
    out.event.pool_destroy = guarded!(inner.event.pool_destroy, |pool: EventPoolHandle| {
        checks::event_pool_destroy(pool)
    });
    out.event.create = guarded!(
        inner.event.create,
        |pool: EventPoolHandle, desc: &EventDesc, event: &mut EventHandle| {
            checks::event_create(pool, Some(desc), Some(event))
        }
    );
    out.event.destroy = guarded!(inner.event.destroy, |event: EventHandle| {
        checks::event_destroy(event)
    });
    out.event.host_synchronize = guarded!(
        inner.event.host_synchronize,
        |event: EventHandle, _timeout: u64| checks::event_host_synchronize(event)
    );
    out.event.query_status = guarded!(inner.event.query_status, |event: EventHandle| {
        checks::event_query_status(event)
    });

    out
}
