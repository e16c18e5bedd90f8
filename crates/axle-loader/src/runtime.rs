//! Runtime (Global) entry points: driver- and handle-independent
//! operations routed through the driver registry.
//!
//! Every accessor walks the same checked cascade before touching a
//! slot: default runtime driver present → table valid → version
//! sufficient → Global group present → slot present. The first failing
//! check wins, a description lands in the last-error state, and the
//! documented sentinel is returned instead of dereferencing anything.

use axle_api::handles::{ContextHandle, DeviceHandle};
use axle_api::status::Status;
use axle_api::tables::GlobalTable;
use axle_api::version::ApiVersion;

use crate::context::LoaderContext;

fn describe(status: Status) -> &'static str {
    match status {
        Status::ErrorUnsupportedFeature => "ERROR UNSUPPORTED FEATURE",
        Status::ErrorUnsupportedVersion => "ERROR UNSUPPORTED VERSION",
        _ => "ERROR UNINITIALIZED",
    }
}

/// The five-check cascade, minus the per-slot check each entry point
/// finishes itself.
fn runtime_global(ctx: &LoaderContext) -> Result<GlobalTable, Status> {
    let Some(idx) = ctx.default_runtime() else {
        // Distinguish "the driver declined the runtime interface" from
        // "nothing usable was ever registered".
        let declined = ctx
            .drivers()
            .first()
            .map(|d| d.runtime_init == Status::ErrorUnsupportedFeature)
            .unwrap_or(false);
        return Err(if declined {
            Status::ErrorUnsupportedFeature
        } else {
            Status::ErrorUninitialized
        });
    };

    let runtime = &ctx.drivers()[idx].tables.runtime;
    if !runtime.valid {
        return Err(Status::ErrorUninitialized);
    }
    if runtime.version < ApiVersion::RUNTIME_MIN {
        return Err(Status::ErrorUnsupportedVersion);
    }
    match &runtime.global {
        Some(global) => Ok(global.clone()),
        None => Err(Status::ErrorUninitialized),
    }
}

/// Retrieve the last recorded error description. The loader's own
/// stored description wins; only when it is empty is the call forwarded
/// to the default driver.
pub fn get_last_error_description(ctx: &LoaderContext, description: &mut String) -> Status {
    let stored = ctx.error().get();
    if !stored.is_empty() {
        *description = stored;
        return Status::Success;
    }

    let global = match runtime_global(ctx) {
        Ok(global) => global,
        Err(status) => return status,
    };
    let Some(pfn) = global.get_last_error_description.clone() else {
        return Status::ErrorUninitialized;
    };
    pfn(description)
}

/// Translate a device handle to its stable integer identifier.
/// Sentinel on failure: `u32::MAX`.
pub fn translate_device_handle_to_identifier(ctx: &LoaderContext, device: DeviceHandle) -> u32 {
    let global = match runtime_global(ctx) {
        Ok(global) => global,
        Err(status) => {
            ctx.error().set(describe(status));
            return u32::MAX;
        }
    };
    let Some(pfn) = global.translate_device_handle_to_identifier.clone() else {
        ctx.error().set("ERROR UNINITIALIZED");
        return u32::MAX;
    };
    pfn(device)
}

/// Translate a stable integer identifier back to a device handle.
/// Sentinel on failure: the null handle.
pub fn translate_identifier_to_device_handle(
    ctx: &LoaderContext,
    identifier: u32,
) -> DeviceHandle {
    let global = match runtime_global(ctx) {
        Ok(global) => global,
        Err(status) => {
            ctx.error().set(describe(status));
            return DeviceHandle::NULL;
        }
    };
    let Some(pfn) = global.translate_identifier_to_device_handle.clone() else {
        ctx.error().set("ERROR UNINITIALIZED");
        return DeviceHandle::NULL;
    };
    pfn(identifier)
}

/// Default context of the default driver. Sentinel on failure: the null
/// handle.
pub fn get_default_context(ctx: &LoaderContext) -> ContextHandle {
    let global = match runtime_global(ctx) {
        Ok(global) => global,
        Err(status) => {
            ctx.error().set(describe(status));
            return ContextHandle::NULL;
        }
    };
    let Some(pfn) = global.get_default_context.clone() else {
        ctx.error().set("ERROR UNINITIALIZED");
        return ContextHandle::NULL;
    };
    pfn()
}
