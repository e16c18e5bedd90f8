//! Per-entry-point argument checks.
//!
//! The order of checks is fixed: handles, then pointers, then
//! enumeration ranges, then count/array consistency. Flag words are
//! validated against the bitflags masks declared in `axle-api`; any set
//! bit outside a mask is an invalid enumeration.

use axle_api::handles::*;
use axle_api::properties::*;
use axle_api::status::Status;
use axle_api::version::ApiVersion;

fn check_flags(flags: u32, mask: u32) -> Status {
    if flags & !mask != 0 {
        return Status::ErrorInvalidEnumeration;
    }
    Status::Success
}

// ── Driver ──────────────────────────────────────────────────

pub fn driver_get(count: Option<&u32>) -> Status {
    if count.is_none() {
        return Status::ErrorInvalidNullPointer;
    }
    Status::Success
}

pub fn driver_get_api_version(driver: DriverHandle, version: Option<&ApiVersion>) -> Status {
    if driver.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    if version.is_none() {
        return Status::ErrorInvalidNullPointer;
    }
    Status::Success
}

pub fn driver_get_properties(
    driver: DriverHandle,
    props: Option<&DriverProperties>,
) -> Status {
    if driver.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    if props.is_none() {
        return Status::ErrorInvalidNullPointer;
    }
    Status::Success
}

pub fn driver_get_extension_properties(driver: DriverHandle, count: Option<&u32>) -> Status {
    if driver.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    if count.is_none() {
        return Status::ErrorInvalidNullPointer;
    }
    Status::Success
}

// ── Device ──────────────────────────────────────────────────

pub fn device_get(driver: DriverHandle, count: Option<&u32>) -> Status {
    if driver.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    if count.is_none() {
        return Status::ErrorInvalidNullPointer;
    }
    Status::Success
}

pub fn device_get_sub_devices(device: DeviceHandle, count: Option<&u32>) -> Status {
    if device.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    if count.is_none() {
        return Status::ErrorInvalidNullPointer;
    }
    Status::Success
}

pub fn device_get_properties(device: DeviceHandle, props: Option<&DeviceProperties>) -> Status {
    if device.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    if props.is_none() {
        return Status::ErrorInvalidNullPointer;
    }
    Status::Success
}

pub fn device_get_compute_properties(
    device: DeviceHandle,
    props: Option<&ComputeProperties>,
) -> Status {
    if device.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    if props.is_none() {
        return Status::ErrorInvalidNullPointer;
    }
    Status::Success
}

pub fn device_get_memory_properties(device: DeviceHandle, count: Option<&u32>) -> Status {
    if device.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    if count.is_none() {
        return Status::ErrorInvalidNullPointer;
    }
    Status::Success
}

pub fn device_get_memory_access_properties(
    device: DeviceHandle,
    props: Option<&MemoryAccessProperties>,
) -> Status {
    if device.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    if props.is_none() {
        return Status::ErrorInvalidNullPointer;
    }
    Status::Success
}

pub fn device_get_cache_properties(device: DeviceHandle, count: Option<&u32>) -> Status {
    if device.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    if count.is_none() {
        return Status::ErrorInvalidNullPointer;
    }
    Status::Success
}

pub fn device_get_image_properties(
    device: DeviceHandle,
    props: Option<&ImageProperties>,
) -> Status {
    if device.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    if props.is_none() {
        return Status::ErrorInvalidNullPointer;
    }
    Status::Success
}

pub fn device_get_queue_group_properties(device: DeviceHandle, count: Option<&u32>) -> Status {
    if device.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    if count.is_none() {
        return Status::ErrorInvalidNullPointer;
    }
    Status::Success
}

pub fn device_get_status(device: DeviceHandle) -> Status {
    if device.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    Status::Success
}

// ── Context ─────────────────────────────────────────────────

pub fn context_create(
    driver: DriverHandle,
    desc: Option<&ContextDesc>,
    context: Option<&ContextHandle>,
) -> Status {
    if driver.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    let Some(desc) = desc else {
        return Status::ErrorInvalidNullPointer;
    };
    if context.is_none() {
        return Status::ErrorInvalidNullPointer;
    }
    check_flags(desc.flags, ContextFlags::all().bits())
}

pub fn context_destroy(context: ContextHandle) -> Status {
    if context.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    Status::Success
}

pub fn context_get_status(context: ContextHandle) -> Status {
    if context.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    Status::Success
}

// ── Command list ────────────────────────────────────────────

pub fn command_list_create(
    context: ContextHandle,
    device: DeviceHandle,
    desc: Option<&CommandListDesc>,
    command_list: Option<&CommandListHandle>,
) -> Status {
    if context.is_null() || device.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    let Some(desc) = desc else {
        return Status::ErrorInvalidNullPointer;
    };
    if command_list.is_none() {
        return Status::ErrorInvalidNullPointer;
    }
    check_flags(desc.flags, CommandListFlags::all().bits())
}

pub fn command_list_destroy(command_list: CommandListHandle) -> Status {
    if command_list.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    Status::Success
}

pub fn command_list_close(command_list: CommandListHandle) -> Status {
    if command_list.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    Status::Success
}

pub fn command_list_append_barrier(
    command_list: CommandListHandle,
    num_wait_events: u32,
    wait_events: Option<&[EventHandle]>,
) -> Status {
    if command_list.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    // a wait list is mandatory whenever its count is non-zero
    if num_wait_events > 0 && wait_events.is_none() {
        return Status::ErrorInvalidSize;
    }
    Status::Success
}

// ── Event ───────────────────────────────────────────────────

pub fn event_pool_create(
    context: ContextHandle,
    desc: Option<&EventPoolDesc>,
    num_devices: u32,
    devices: Option<&[DeviceHandle]>,
    pool: Option<&EventPoolHandle>,
) -> Status {
    if context.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    let Some(desc) = desc else {
        return Status::ErrorInvalidNullPointer;
    };
    if pool.is_none() {
        return Status::ErrorInvalidNullPointer;
    }
    let st = check_flags(desc.flags, EventPoolFlags::all().bits());
    if !st.is_success() {
        return st;
    }
    if desc.count == 0 {
        return Status::ErrorInvalidSize;
    }
    if num_devices > 0 && devices.is_none() {
        return Status::ErrorInvalidSize;
    }
    Status::Success
}

pub fn event_pool_destroy(pool: EventPoolHandle) -> Status {
    if pool.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    Status::Success
}

pub fn event_create(
    pool: EventPoolHandle,
    desc: Option<&EventDesc>,
    event: Option<&EventHandle>,
) -> Status {
    if pool.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    let Some(desc) = desc else {
        return Status::ErrorInvalidNullPointer;
    };
    if event.is_none() {
        return Status::ErrorInvalidNullPointer;
    }
    let st = check_flags(desc.signal_scope, EventScopeFlags::all().bits());
    if !st.is_success() {
        return st;
    }
    check_flags(desc.wait_scope, EventScopeFlags::all().bits())
}

pub fn event_destroy(event: EventHandle) -> Status {
    if event.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    Status::Success
}

pub fn event_host_synchronize(event: EventHandle) -> Status {
    if event.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    Status::Success
}

pub fn event_query_status(event: EventHandle) -> Status {
    if event.is_null() {
        return Status::ErrorInvalidNullHandle;
    }
    Status::Success
}
