//! The runtime (Global) entry points' checked failure cascade: each
//! precondition is broken one at a time while the others stay healthy,
//! and each deficiency must produce its documented sentinel and
//! last-error description.

use std::sync::Arc;

use axle_api::handles::*;
use axle_api::provider::DriverProvider;
use axle_api::status::Status;
use axle_api::tables::{CoreTables, GlobalTable, RuntimeTables};
use axle_api::version::ApiVersion;
use axle_loader::{runtime, LoaderConfig, LoaderContext};

const CANNED_IDENTIFIER: u32 = 7;
const CANNED_DEVICE: DeviceHandle = DeviceHandle(0xBEEF);
const CANNED_CONTEXT: ContextHandle = ContextHandle(0xCAFE);

#[derive(Clone, Copy, PartialEq)]
enum RuntimeShape {
    Healthy,
    /// fill_runtime declines with unsupported-feature.
    Declined,
    /// Table filled but its validity flag is down.
    Invalid,
    /// Table valid but older than the runtime minimum.
    OldVersion,
    /// Table valid but the Global group is absent.
    MissingGlobal,
    /// Global group present but the queried slot is empty.
    MissingSlot,
}

struct RtDriver {
    shape: RuntimeShape,
}

fn healthy_global() -> GlobalTable {
    GlobalTable {
        get_last_error_description: Some(Arc::new(|_description: &mut String| Status::Success)),
        translate_device_handle_to_identifier: Some(Arc::new(|_device: DeviceHandle| {
            CANNED_IDENTIFIER
        })),
        translate_identifier_to_device_handle: Some(Arc::new(|_identifier: u32| CANNED_DEVICE)),
        get_default_context: Some(Arc::new(|| CANNED_CONTEXT)),
    }
}

impl DriverProvider for RtDriver {
    fn name(&self) -> &str {
        "rt-test"
    }

    fn api_version(&self) -> ApiVersion {
        ApiVersion::CURRENT
    }

    fn fill_core(&self, _version: ApiVersion, t: &mut CoreTables) -> Status {
        t.driver.get = Some(Arc::new(
            |count: &mut u32, out: Option<&mut [DriverHandle]>| {
                *count = 1;
                if let Some(out) = out {
                    if let Some(slot) = out.first_mut() {
                        *slot = DriverHandle::from_raw(0x9000);
                    }
                }
                Status::Success
            },
        ));
        t.version = ApiVersion::CURRENT;
        t.valid = true;
        Status::Success
    }

    fn fill_runtime(&self, _version: ApiVersion, t: &mut RuntimeTables) -> Status {
        match self.shape {
            RuntimeShape::Declined => Status::ErrorUnsupportedFeature,
            RuntimeShape::Invalid => {
                t.version = ApiVersion::CURRENT;
                t.valid = false;
                t.global = Some(healthy_global());
                Status::Success
            }
            RuntimeShape::OldVersion => {
                t.version = ApiVersion::new(1, 2);
                t.valid = true;
                t.global = Some(healthy_global());
                Status::Success
            }
            RuntimeShape::MissingGlobal => {
                t.version = ApiVersion::CURRENT;
                t.valid = true;
                t.global = None;
                Status::Success
            }
            RuntimeShape::MissingSlot => {
                t.version = ApiVersion::CURRENT;
                t.valid = true;
                t.global = Some(GlobalTable {
                    get_default_context: None,
                    ..healthy_global()
                });
                Status::Success
            }
            RuntimeShape::Healthy => {
                t.version = ApiVersion::CURRENT;
                t.valid = true;
                t.global = Some(healthy_global());
                Status::Success
            }
        }
    }
}

fn loader_with(shape: RuntimeShape) -> Arc<LoaderContext> {
    LoaderContext::init(
        LoaderConfig::default(),
        vec![Arc::new(RtDriver { shape })],
    )
}

#[test]
fn no_registered_driver_reports_uninitialized() {
    let ctx = LoaderContext::init(LoaderConfig::default(), Vec::new());

    assert_eq!(
        runtime::translate_device_handle_to_identifier(&ctx, CANNED_DEVICE),
        u32::MAX
    );
    assert_eq!(ctx.error().get(), "ERROR UNINITIALIZED");

    let mut description = String::new();
    assert_eq!(
        runtime::get_last_error_description(&ctx, &mut description),
        Status::Success,
        "the loader's own stored description is returned first"
    );
    assert_eq!(description, "ERROR UNINITIALIZED");
}

#[test]
fn declined_runtime_reports_unsupported_feature() {
    let ctx = loader_with(RuntimeShape::Declined);

    // queried before any failure stored a description, the cascade
    // answer itself comes back
    let mut description = String::new();
    assert_eq!(
        runtime::get_last_error_description(&ctx, &mut description),
        Status::ErrorUnsupportedFeature
    );

    assert!(runtime::get_default_context(&ctx).is_null());
    assert_eq!(ctx.error().get(), "ERROR UNSUPPORTED FEATURE");
}

#[test]
fn invalid_table_reports_uninitialized() {
    let ctx = loader_with(RuntimeShape::Invalid);

    assert_eq!(
        runtime::translate_device_handle_to_identifier(&ctx, CANNED_DEVICE),
        u32::MAX
    );
    assert_eq!(ctx.error().get(), "ERROR UNINITIALIZED");
}

#[test]
fn old_version_reports_unsupported_version() {
    let ctx = loader_with(RuntimeShape::OldVersion);

    assert!(runtime::translate_identifier_to_device_handle(&ctx, 1).is_null());
    assert_eq!(ctx.error().get(), "ERROR UNSUPPORTED VERSION");

    let mut description = String::new();
    assert_eq!(
        runtime::get_last_error_description(&ctx, &mut description),
        Status::Success
    );
    assert_eq!(description, "ERROR UNSUPPORTED VERSION");
}

#[test]
fn missing_global_group_reports_uninitialized() {
    let ctx = loader_with(RuntimeShape::MissingGlobal);

    assert!(runtime::get_default_context(&ctx).is_null());
    assert_eq!(ctx.error().get(), "ERROR UNINITIALIZED");
}

#[test]
fn missing_slot_fails_while_other_slots_forward() {
    let ctx = loader_with(RuntimeShape::MissingSlot);

    // the absent slot fails
    assert!(runtime::get_default_context(&ctx).is_null());
    assert_eq!(ctx.error().get(), "ERROR UNINITIALIZED");

    // its siblings still reach the driver
    assert_eq!(
        runtime::translate_device_handle_to_identifier(&ctx, CANNED_DEVICE),
        CANNED_IDENTIFIER
    );
    assert_eq!(
        runtime::translate_identifier_to_device_handle(&ctx, CANNED_IDENTIFIER),
        CANNED_DEVICE
    );
}

#[test]
fn healthy_runtime_forwards_every_entry_point() {
    let ctx = loader_with(RuntimeShape::Healthy);

    assert_eq!(
        runtime::translate_device_handle_to_identifier(&ctx, CANNED_DEVICE),
        CANNED_IDENTIFIER
    );
    assert_eq!(
        runtime::translate_identifier_to_device_handle(&ctx, CANNED_IDENTIFIER),
        CANNED_DEVICE
    );
    assert_eq!(runtime::get_default_context(&ctx), CANNED_CONTEXT);

    let mut description = String::new();
    assert_eq!(
        runtime::get_last_error_description(&ctx, &mut description),
        Status::Success
    );
    assert!(description.is_empty());
}
