//! Dispatch tables ("dditables"): one struct per interface group, one
//! slot per entry point.
//!
//! A slot is `None` when no override is installed; the trampoline that
//! reads it runs its generic fallback (null driver) or reports
//! `ErrorUninitialized` (loader path). Slots are populated during
//! initialization/table-fill and treated as read-only afterwards.

use std::sync::Arc;

use crate::handles::*;
use crate::properties::*;
use crate::status::Status;
use crate::version::ApiVersion;

// ── Slot signatures ─────────────────────────────────────────

pub type DriverGetFn =
    Arc<dyn Fn(&mut u32, Option<&mut [DriverHandle]>) -> Status + Send + Sync>;
pub type DriverGetApiVersionFn =
    Arc<dyn Fn(DriverHandle, &mut ApiVersion) -> Status + Send + Sync>;
pub type DriverGetPropertiesFn =
    Arc<dyn Fn(DriverHandle, &mut DriverProperties) -> Status + Send + Sync>;
pub type DriverGetExtensionPropertiesFn =
    Arc<dyn Fn(DriverHandle, &mut u32, Option<&mut [ExtensionProperties]>) -> Status + Send + Sync>;

pub type DeviceGetFn =
    Arc<dyn Fn(DriverHandle, &mut u32, Option<&mut [DeviceHandle]>) -> Status + Send + Sync>;
pub type DeviceGetSubDevicesFn =
    Arc<dyn Fn(DeviceHandle, &mut u32, Option<&mut [DeviceHandle]>) -> Status + Send + Sync>;
pub type DeviceGetPropertiesFn =
    Arc<dyn Fn(DeviceHandle, &mut DeviceProperties) -> Status + Send + Sync>;
pub type DeviceGetComputePropertiesFn =
    Arc<dyn Fn(DeviceHandle, &mut ComputeProperties) -> Status + Send + Sync>;
pub type DeviceGetMemoryPropertiesFn =
    Arc<dyn Fn(DeviceHandle, &mut u32, Option<&mut [MemoryProperties]>) -> Status + Send + Sync>;
pub type DeviceGetMemoryAccessPropertiesFn =
    Arc<dyn Fn(DeviceHandle, &mut MemoryAccessProperties) -> Status + Send + Sync>;
pub type DeviceGetCachePropertiesFn =
    Arc<dyn Fn(DeviceHandle, &mut u32, Option<&mut [CacheProperties]>) -> Status + Send + Sync>;
pub type DeviceGetImagePropertiesFn =
    Arc<dyn Fn(DeviceHandle, &mut ImageProperties) -> Status + Send + Sync>;
pub type DeviceGetQueueGroupPropertiesFn = Arc<
    dyn Fn(DeviceHandle, &mut u32, Option<&mut [QueueGroupProperties]>) -> Status + Send + Sync,
>;
pub type DeviceGetStatusFn = Arc<dyn Fn(DeviceHandle) -> Status + Send + Sync>;

pub type ContextCreateFn =
    Arc<dyn Fn(DriverHandle, &ContextDesc, &mut ContextHandle) -> Status + Send + Sync>;
pub type ContextDestroyFn = Arc<dyn Fn(ContextHandle) -> Status + Send + Sync>;
pub type ContextGetStatusFn = Arc<dyn Fn(ContextHandle) -> Status + Send + Sync>;

pub type CommandListCreateFn = Arc<
    dyn Fn(ContextHandle, DeviceHandle, &CommandListDesc, &mut CommandListHandle) -> Status
        + Send
        + Sync,
>;
pub type CommandListDestroyFn = Arc<dyn Fn(CommandListHandle) -> Status + Send + Sync>;
pub type CommandListCloseFn = Arc<dyn Fn(CommandListHandle) -> Status + Send + Sync>;
pub type CommandListAppendBarrierFn = Arc<
    dyn Fn(CommandListHandle, EventHandle, u32, Option<&[EventHandle]>) -> Status + Send + Sync,
>;

pub type EventPoolCreateFn = Arc<
    dyn Fn(ContextHandle, &EventPoolDesc, u32, Option<&[DeviceHandle]>, &mut EventPoolHandle)
            -> Status
        + Send
        + Sync,
>;
pub type EventPoolDestroyFn = Arc<dyn Fn(EventPoolHandle) -> Status + Send + Sync>;
pub type EventCreateFn =
    Arc<dyn Fn(EventPoolHandle, &EventDesc, &mut EventHandle) -> Status + Send + Sync>;
pub type EventDestroyFn = Arc<dyn Fn(EventHandle) -> Status + Send + Sync>;
pub type EventHostSynchronizeFn = Arc<dyn Fn(EventHandle, u64) -> Status + Send + Sync>;
pub type EventQueryStatusFn = Arc<dyn Fn(EventHandle) -> Status + Send + Sync>;

pub type TracerCreateFn =
    Arc<dyn Fn(ContextHandle, &TracerDesc, &mut TracerHandle) -> Status + Send + Sync>;
pub type TracerSetProloguesFn =
    Arc<dyn Fn(TracerHandle, &crate::callbacks::CoreCallbacks) -> Status + Send + Sync>;
pub type TracerSetEpiloguesFn =
    Arc<dyn Fn(TracerHandle, &crate::callbacks::CoreCallbacks) -> Status + Send + Sync>;
pub type TracerSetEnabledFn = Arc<dyn Fn(TracerHandle, bool) -> Status + Send + Sync>;

pub type SysmanDeviceGetStateFn =
    Arc<dyn Fn(DeviceHandle, &mut DeviceState) -> Status + Send + Sync>;

pub type GetLastErrorDescriptionFn = Arc<dyn Fn(&mut String) -> Status + Send + Sync>;
pub type TranslateDeviceHandleToIdentifierFn = Arc<dyn Fn(DeviceHandle) -> u32 + Send + Sync>;
pub type TranslateIdentifierToDeviceHandleFn = Arc<dyn Fn(u32) -> DeviceHandle + Send + Sync>;
pub type GetDefaultContextFn = Arc<dyn Fn() -> ContextHandle + Send + Sync>;

// ── Interface-group tables ──────────────────────────────────

#[derive(Default, Clone)]
pub struct DriverTable {
    pub get: Option<DriverGetFn>,
    pub get_api_version: Option<DriverGetApiVersionFn>,
    pub get_properties: Option<DriverGetPropertiesFn>,
    pub get_extension_properties: Option<DriverGetExtensionPropertiesFn>,
}

#[derive(Default, Clone)]
pub struct DeviceTable {
    pub get: Option<DeviceGetFn>,
    pub get_sub_devices: Option<DeviceGetSubDevicesFn>,
    pub get_properties: Option<DeviceGetPropertiesFn>,
    pub get_compute_properties: Option<DeviceGetComputePropertiesFn>,
    pub get_memory_properties: Option<DeviceGetMemoryPropertiesFn>,
    pub get_memory_access_properties: Option<DeviceGetMemoryAccessPropertiesFn>,
    pub get_cache_properties: Option<DeviceGetCachePropertiesFn>,
    pub get_image_properties: Option<DeviceGetImagePropertiesFn>,
    pub get_queue_group_properties: Option<DeviceGetQueueGroupPropertiesFn>,
    pub get_status: Option<DeviceGetStatusFn>,
}

#[derive(Default, Clone)]
pub struct ContextTable {
    pub create: Option<ContextCreateFn>,
    pub destroy: Option<ContextDestroyFn>,
    pub get_status: Option<ContextGetStatusFn>,
}

#[derive(Default, Clone)]
pub struct CommandListTable {
    pub create: Option<CommandListCreateFn>,
    pub destroy: Option<CommandListDestroyFn>,
    pub close: Option<CommandListCloseFn>,
    pub append_barrier: Option<CommandListAppendBarrierFn>,
}

#[derive(Default, Clone)]
pub struct EventTable {
    pub pool_create: Option<EventPoolCreateFn>,
    pub pool_destroy: Option<EventPoolDestroyFn>,
    pub create: Option<EventCreateFn>,
    pub destroy: Option<EventDestroyFn>,
    pub host_synchronize: Option<EventHostSynchronizeFn>,
    pub query_status: Option<EventQueryStatusFn>,
}

#[derive(Default, Clone)]
pub struct TracerTable {
    pub create: Option<TracerCreateFn>,
    pub set_prologues: Option<TracerSetProloguesFn>,
    pub set_epilogues: Option<TracerSetEpiloguesFn>,
    pub set_enabled: Option<TracerSetEnabledFn>,
}

#[derive(Default, Clone)]
pub struct SysmanDeviceTable {
    pub get_state: Option<SysmanDeviceGetStateFn>,
}

/// Driver- and handle-independent runtime operations.
#[derive(Default, Clone)]
pub struct GlobalTable {
    pub get_last_error_description: Option<GetLastErrorDescriptionFn>,
    pub translate_device_handle_to_identifier: Option<TranslateDeviceHandleToIdentifierFn>,
    pub translate_identifier_to_device_handle: Option<TranslateIdentifierToDeviceHandleFn>,
    pub get_default_context: Option<GetDefaultContextFn>,
}

// ── Interface families ──────────────────────────────────────

#[derive(Default, Clone)]
pub struct CoreTables {
    pub version: ApiVersion,
    pub valid: bool,
    pub driver: DriverTable,
    pub device: DeviceTable,
    pub context: ContextTable,
    pub command_list: CommandListTable,
    pub event: EventTable,
}

#[derive(Default, Clone)]
pub struct ToolsTables {
    pub version: ApiVersion,
    pub valid: bool,
    pub tracer: TracerTable,
}

#[derive(Default, Clone)]
pub struct SysmanTables {
    pub version: ApiVersion,
    pub valid: bool,
    pub device: SysmanDeviceTable,
}

#[derive(Default, Clone)]
pub struct RuntimeTables {
    pub version: ApiVersion,
    pub valid: bool,
    /// The whole group may be absent on drivers that declined the
    /// runtime interface; checked before any slot is.
    pub global: Option<GlobalTable>,
}
