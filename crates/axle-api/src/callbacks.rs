//! Tracer callback tables.
//!
//! One typed slot per core entry point, mirroring the dispatch tables.
//! The same `CoreCallbacks` shape is registered twice per tracer, once
//! as prologues and once as epilogues; a prologue sees `result == None`,
//! an epilogue sees the status the implementation returned.

use std::sync::Arc;

use crate::handles::*;
use crate::status::Status;

pub type Callback<P> = Arc<dyn Fn(&P) + Send + Sync>;

macro_rules! callback_params {
    ($(#[$meta:meta])* $name:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name {
            $(pub $field: $ty,)*
            /// `None` in prologues, the implementation's status in epilogues.
            pub result: Option<Status>,
        }
    };
}

callback_params!(DriverGetParams { count: u32 });
callback_params!(DriverGetApiVersionParams { driver: DriverHandle });
callback_params!(DriverGetPropertiesParams { driver: DriverHandle });
callback_params!(DriverGetExtensionPropertiesParams { driver: DriverHandle, count: u32 });

callback_params!(DeviceGetParams { driver: DriverHandle, count: u32 });
callback_params!(DeviceGetSubDevicesParams { device: DeviceHandle, count: u32 });
callback_params!(DeviceGetPropertiesParams { device: DeviceHandle });
callback_params!(DeviceGetComputePropertiesParams { device: DeviceHandle });
callback_params!(DeviceGetMemoryPropertiesParams { device: DeviceHandle, count: u32 });
callback_params!(DeviceGetMemoryAccessPropertiesParams { device: DeviceHandle });
callback_params!(DeviceGetCachePropertiesParams { device: DeviceHandle, count: u32 });
callback_params!(DeviceGetImagePropertiesParams { device: DeviceHandle });
callback_params!(DeviceGetQueueGroupPropertiesParams { device: DeviceHandle, count: u32 });
callback_params!(DeviceGetStatusParams { device: DeviceHandle });

callback_params!(ContextCreateParams { driver: DriverHandle });
callback_params!(ContextDestroyParams { context: ContextHandle });
callback_params!(ContextGetStatusParams { context: ContextHandle });

callback_params!(CommandListCreateParams { context: ContextHandle, device: DeviceHandle });
callback_params!(CommandListDestroyParams { command_list: CommandListHandle });
callback_params!(CommandListCloseParams { command_list: CommandListHandle });
callback_params!(CommandListAppendBarrierParams {
    command_list: CommandListHandle,
    num_wait_events: u32,
});

callback_params!(EventPoolCreateParams { context: ContextHandle, num_devices: u32 });
callback_params!(EventPoolDestroyParams { pool: EventPoolHandle });
callback_params!(EventCreateParams { pool: EventPoolHandle });
callback_params!(EventDestroyParams { event: EventHandle });
callback_params!(EventHostSynchronizeParams { event: EventHandle, timeout: u64 });
callback_params!(EventQueryStatusParams { event: EventHandle });

#[derive(Default, Clone)]
pub struct CoreCallbacks {
    pub driver_get: Option<Callback<DriverGetParams>>,
    pub driver_get_api_version: Option<Callback<DriverGetApiVersionParams>>,
    pub driver_get_properties: Option<Callback<DriverGetPropertiesParams>>,
    pub driver_get_extension_properties: Option<Callback<DriverGetExtensionPropertiesParams>>,

    pub device_get: Option<Callback<DeviceGetParams>>,
    pub device_get_sub_devices: Option<Callback<DeviceGetSubDevicesParams>>,
    pub device_get_properties: Option<Callback<DeviceGetPropertiesParams>>,
    pub device_get_compute_properties: Option<Callback<DeviceGetComputePropertiesParams>>,
    pub device_get_memory_properties: Option<Callback<DeviceGetMemoryPropertiesParams>>,
    pub device_get_memory_access_properties:
        Option<Callback<DeviceGetMemoryAccessPropertiesParams>>,
    pub device_get_cache_properties: Option<Callback<DeviceGetCachePropertiesParams>>,
    pub device_get_image_properties: Option<Callback<DeviceGetImagePropertiesParams>>,
    pub device_get_queue_group_properties:
        Option<Callback<DeviceGetQueueGroupPropertiesParams>>,
    pub device_get_status: Option<Callback<DeviceGetStatusParams>>,

    pub context_create: Option<Callback<ContextCreateParams>>,
    pub context_destroy: Option<Callback<ContextDestroyParams>>,
    pub context_get_status: Option<Callback<ContextGetStatusParams>>,

    pub command_list_create: Option<Callback<CommandListCreateParams>>,
    pub command_list_destroy: Option<Callback<CommandListDestroyParams>>,
    pub command_list_close: Option<Callback<CommandListCloseParams>>,
    pub command_list_append_barrier: Option<Callback<CommandListAppendBarrierParams>>,

    pub event_pool_create: Option<Callback<EventPoolCreateParams>>,
    pub event_pool_destroy: Option<Callback<EventPoolDestroyParams>>,
    pub event_create: Option<Callback<EventCreateParams>>,
    pub event_destroy: Option<Callback<EventDestroyParams>>,
    pub event_host_synchronize: Option<Callback<EventHostSynchronizeParams>>,
    pub event_query_status: Option<Callback<EventQueryStatusParams>>,
}
