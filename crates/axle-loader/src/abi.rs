//! C-ABI export surface.
//!
//! The exported symbols operate on a process-global loader instance
//! created lazily by `axleInit` from the environment; everything else
//! in this crate works against an explicit `LoaderContext`. Raw-pointer
//! null checks happen only here, at the ABI edge; the Rust-level
//! trampolines never see a null reference.

use std::ffi::{c_char, CString};
use std::sync::{Arc, OnceLock};

use axle_api::handles::{ContextHandle, DeviceHandle, DriverHandle};
use axle_api::status::Status;
use parking_lot::Mutex;

use crate::config::LoaderConfig;
use crate::context::LoaderContext;
use crate::{dispatch, runtime};

static GLOBAL: OnceLock<Arc<LoaderContext>> = OnceLock::new();

/// Keeps the last description alive so the returned pointer stays valid
/// until the next call.
static LAST_ERROR: Mutex<Option<CString>> = Mutex::new(None);

fn global() -> Option<&'static Arc<LoaderContext>> {
    GLOBAL.get()
}

/// Initialize the process-global loader from the environment. Safe to
/// call more than once; later calls return the first init's status.
#[no_mangle]
pub extern "C" fn axleInit(_flags: u32) -> Status {
    axle_common::logging::try_init_logging();
    let ctx = GLOBAL.get_or_init(|| LoaderContext::init(LoaderConfig::from_env(), Vec::new()));
    ctx.init_status()
}

/// # Safety
/// `p_count` must be valid for writes; `ph_drivers`, when non-null,
/// must point to at least `*p_count` handles.
#[no_mangle]
pub unsafe extern "C" fn axleDriverGet(
    p_count: *mut u32,
    ph_drivers: *mut DriverHandle,
) -> Status {
    let Some(ctx) = global() else {
        return Status::ErrorUninitialized;
    };
    if p_count.is_null() {
        return Status::ErrorInvalidNullPointer;
    }
    let count = unsafe { &mut *p_count };
    let out = if ph_drivers.is_null() {
        None
    } else {
        Some(unsafe { std::slice::from_raw_parts_mut(ph_drivers, *count as usize) })
    };
    dispatch::driver_get(ctx, count, out)
}

/// # Safety
/// `p_count` must be valid for writes; `ph_devices`, when non-null,
/// must point to at least `*p_count` handles.
#[no_mangle]
pub unsafe extern "C" fn axleDeviceGet(
    h_driver: DriverHandle,
    p_count: *mut u32,
    ph_devices: *mut DeviceHandle,
) -> Status {
    let Some(ctx) = global() else {
        return Status::ErrorUninitialized;
    };
    if p_count.is_null() {
        return Status::ErrorInvalidNullPointer;
    }
    let count = unsafe { &mut *p_count };
    let out = if ph_devices.is_null() {
        None
    } else {
        Some(unsafe { std::slice::from_raw_parts_mut(ph_devices, *count as usize) })
    };
    dispatch::device_get(ctx, h_driver, count, out)
}

/// # Safety
/// `pp_string` must be valid for writes. The written pointer remains
/// valid until the next `axleGetLastErrorDescription` call.
#[no_mangle]
pub unsafe extern "C" fn axleGetLastErrorDescription(
    pp_string: *mut *const c_char,
) -> Status {
    let Some(ctx) = global() else {
        return Status::ErrorUninitialized;
    };
    if pp_string.is_null() {
        return Status::ErrorInvalidNullPointer;
    }

    let mut description = String::new();
    let status = runtime::get_last_error_description(ctx, &mut description);
    if status.is_success() {
        let cstr = CString::new(description).unwrap_or_default();
        let mut guard = LAST_ERROR.lock();
        *guard = Some(cstr);
        let ptr = guard
            .as_ref()
            .map(|c| c.as_ptr())
            .unwrap_or(std::ptr::null());
        unsafe { *pp_string = ptr };
    }
    status
}

#[no_mangle]
pub extern "C" fn axleTranslateDeviceHandleToIdentifier(h_device: DeviceHandle) -> u32 {
    match global() {
        Some(ctx) => runtime::translate_device_handle_to_identifier(ctx, h_device),
        None => u32::MAX,
    }
}

#[no_mangle]
pub extern "C" fn axleTranslateIdentifierToDeviceHandle(identifier: u32) -> DeviceHandle {
    match global() {
        Some(ctx) => runtime::translate_identifier_to_device_handle(ctx, identifier),
        None => DeviceHandle::NULL,
    }
}

#[no_mangle]
pub extern "C" fn axleGetDefaultContext() -> ContextHandle {
    match global() {
        Some(ctx) => runtime::get_default_context(ctx),
        None => ContextHandle::NULL,
    }
}
