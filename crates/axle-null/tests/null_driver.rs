//! Integration tests for the null driver: generic fallbacks, override
//! precedence, table-fill gating, and the two handle allocation modes.

use std::sync::Arc;

use axle_api::handles::*;
use axle_api::object::ObjectRecord;
use axle_api::properties::*;
use axle_api::status::Status;
use axle_api::version::ApiVersion;
use axle_null::alloc::{AllocMode, HANDLE_BASE};
use axle_null::config::{
    NullConfig, ENV_DEVICE_TYPE, ENV_DISABLE_DDI_EXT, TRACING_EXT_NAME, TRACING_EXT_VERSION_1_1,
};
use axle_null::{dispatch, tables, DriverContext};

fn counter_config() -> NullConfig {
    NullConfig {
        ddi_ext_disabled: true,
        ..NullConfig::default()
    }
}

#[test]
fn fallback_count_query_is_idempotent() {
    let ctx = DriverContext::new(counter_config());
    let device = DeviceHandle::from_raw(0x1000);

    // get_sub_devices has no override installed, so the generic
    // enumeration fallback runs.
    let mut count = 0u32;
    let st = dispatch::device_get_sub_devices(&ctx, device, &mut count, None);
    assert_eq!(st, Status::Success);
    assert_eq!(count, 1);

    let mut count_again = 0u32;
    let st = dispatch::device_get_sub_devices(&ctx, device, &mut count_again, None);
    assert_eq!(st, Status::Success);
    assert_eq!(count_again, count);

    let mut fill = count;
    let mut handles = vec![DeviceHandle::NULL; count as usize];
    let st = dispatch::device_get_sub_devices(&ctx, device, &mut fill, Some(&mut handles));
    assert_eq!(st, Status::Success);
    assert_eq!(fill, count, "fill call must leave the count unchanged");
    assert!(!handles[0].is_null());

    let mut fill = count;
    let mut second = vec![DeviceHandle::NULL; count as usize];
    let st = dispatch::device_get_sub_devices(&ctx, device, &mut fill, Some(&mut second));
    assert_eq!(st, Status::Success);
    assert_ne!(
        handles[0], second[0],
        "every synthesized handle must be distinct"
    );
}

#[test]
fn create_fallback_synthesizes_distinct_handles() {
    let ctx = DriverContext::new(counter_config());
    let driver = DriverHandle::from_raw(0x1000);

    let mut first = ContextHandle::NULL;
    let mut second = ContextHandle::NULL;
    assert_eq!(
        dispatch::context_create(&ctx, driver, &ContextDesc::default(), &mut first),
        Status::Success
    );
    assert_eq!(
        dispatch::context_create(&ctx, driver, &ContextDesc::default(), &mut second),
        Status::Success
    );
    assert!(!first.is_null());
    assert_ne!(first, second);

    // destroy is a deliberate no-op on the generic path
    assert_eq!(dispatch::context_destroy(&ctx, first), Status::Success);
    assert_eq!(dispatch::context_destroy(&ctx, first), Status::Success);
}

#[test]
fn override_takes_precedence_over_fallback() {
    let ctx = DriverContext::with_overrides(NullConfig::default(), |ov| {
        ov.core.device.get_properties = Some(Arc::new(
            |_device: DeviceHandle, props: &mut DeviceProperties| {
                props.name = "sentinel".to_string();
                Status::ErrorUnknown
            },
        ));
    });

    let mut props = DeviceProperties::default();
    let st = dispatch::device_get_properties(&ctx, DeviceHandle::from_raw(0x2000), &mut props);
    assert_eq!(st, Status::ErrorUnknown, "override result must pass through unmodified");
    assert_eq!(props.name, "sentinel");
}

#[test]
fn table_fill_rejects_future_version_without_mutation() {
    let ctx = DriverContext::new(NullConfig::default());

    let mut table = axle_api::tables::DeviceTable::default();
    let st = tables::get_device_proc_addr_table(&ctx, ApiVersion::new(99, 0), Some(&mut table));
    assert_eq!(st, Status::ErrorUnsupportedVersion);
    assert!(table.get.is_none());
    assert!(table.get_properties.is_none());
    assert!(table.get_status.is_none());

    let st = tables::get_device_proc_addr_table(&ctx, ApiVersion::CURRENT, None);
    assert_eq!(st, Status::ErrorInvalidNullPointer);

    let st = tables::get_device_proc_addr_table(&ctx, ApiVersion::CURRENT, Some(&mut table));
    assert_eq!(st, Status::Success);
    assert!(table.get.is_some());
    assert!(table.get_queue_group_properties.is_some());
}

#[test]
fn capability_records_expose_owning_tables() {
    let ctx = DriverContext::new(NullConfig::default());
    assert_eq!(ctx.handles.mode(), AllocMode::CapabilityRecord);

    let raw = ctx.handles.get();
    assert_eq!(ctx.handles.record_count(), 1);

    let record = unsafe { ObjectRecord::from_raw(raw) };
    let published = ctx.tables();
    assert!(Arc::ptr_eq(&record.tables.core, &published.core));
    assert!(Arc::ptr_eq(&record.tables.tools, &published.tools));
    assert!(Arc::ptr_eq(&record.tables.sysman, &published.sysman));
    assert!(Arc::ptr_eq(&record.tables.runtime, &published.runtime));
}

#[test]
fn counter_mode_increments_and_skips_base() {
    let ctx = DriverContext::new(counter_config());
    assert_eq!(ctx.handles.mode(), AllocMode::Counter);

    let a = ctx.handles.get();
    let b = ctx.handles.get();
    let c = ctx.handles.get();
    assert_eq!(b, a + 1);
    assert_eq!(c, b + 1);
    assert_ne!(a, HANDLE_BASE);
    assert_ne!(b, HANDLE_BASE);
    assert_eq!(ctx.handles.record_count(), 0);
}

#[test]
fn device_type_follows_config() {
    let ctx = DriverContext::new(NullConfig {
        device_type: DeviceType::Npu,
        ..NullConfig::default()
    });

    let mut props = DeviceProperties::default();
    let st = dispatch::device_get_properties(&ctx, DeviceHandle::from_raw(0x3000), &mut props);
    assert_eq!(st, Status::Success);
    assert_eq!(props.device_type, DeviceType::Npu);
    assert_eq!(props.name, "Null Device");
}

#[test]
fn device_type_env_override_is_read_once() {
    std::env::set_var(ENV_DEVICE_TYPE, "NPU");
    let cfg = NullConfig::from_env();
    std::env::remove_var(ENV_DEVICE_TYPE);

    assert_eq!(cfg.device_type, DeviceType::Npu);

    // derived after the variable is gone: back to the default
    let cfg = NullConfig::from_env();
    assert_eq!(cfg.device_type, DeviceType::Gpu);
}

#[test]
fn ddi_ext_disable_matches_driver_id_or_legacy_sentinel() {
    std::env::set_var(ENV_DISABLE_DDI_EXT, "7");
    assert!(NullConfig::from_env_with_driver_id(7).ddi_ext_disabled);
    assert!(!NullConfig::from_env_with_driver_id(3).ddi_ext_disabled);

    std::env::set_var(ENV_DISABLE_DDI_EXT, "0");
    assert!(
        NullConfig::from_env_with_driver_id(3).ddi_ext_disabled,
        "legacy sentinel 0 disables the extension for every driver id"
    );
    std::env::remove_var(ENV_DISABLE_DDI_EXT);
}

#[test]
fn disabled_runtime_declines_table_fill() {
    let ctx = DriverContext::new(NullConfig {
        runtime_disabled: true,
        ..NullConfig::default()
    });

    let mut global = axle_api::tables::GlobalTable::default();
    let st = tables::get_global_proc_addr_table(&ctx, ApiVersion::CURRENT, Some(&mut global));
    assert_eq!(st, Status::ErrorUnsupportedFeature);
    assert!(global.get_default_context.is_none());

    let published = ctx.tables();
    assert!(!published.runtime.valid);
    assert!(published.runtime.global.is_none());
}

#[test]
fn runtime_entry_points_record_calling_driver_id() {
    let ctx = DriverContext::new(NullConfig {
        driver_id: 42,
        ..NullConfig::default()
    });

    let result = dispatch::get_default_context(&ctx);
    assert!(result.is_null(), "no override installed: generic null result");
    assert_eq!(
        std::env::var("axleGetDefaultContext").as_deref(),
        Ok("42"),
        "entry point must record its driver id"
    );

    drop(ctx);
    assert!(
        std::env::var("axleGetDefaultContext").is_err(),
        "recorded variables are removed at context teardown"
    );
}

#[test]
fn tracer_store_is_wired_through_tools_table() {
    let ctx = DriverContext::new(NullConfig {
        tracing_enabled: true,
        ..NullConfig::default()
    });

    let mut first = TracerHandle::NULL;
    let st = dispatch::tracer_create(
        &ctx,
        ContextHandle::from_raw(0x4000),
        &TracerDesc { user_data: 0xabc },
        &mut first,
    );
    assert_eq!(st, Status::Success);
    assert_eq!(first.as_raw(), 1, "index 0 is reserved");

    let mut second = TracerHandle::NULL;
    let st = dispatch::tracer_create(
        &ctx,
        ContextHandle::from_raw(0x4000),
        &TracerDesc::default(),
        &mut second,
    );
    assert_eq!(st, Status::Success);
    assert_eq!(second.as_raw(), 2);

    assert_eq!(dispatch::tracer_set_enabled(&ctx, first, true), Status::Success);
    assert_eq!(
        dispatch::tracer_set_enabled(&ctx, TracerHandle::NULL, true),
        Status::ErrorInvalidNullHandle
    );

    assert_eq!(ctx.tracers.len(), 2);
    let data = match ctx.tracers.get(1) {
        Some(data) => data,
        None => panic!("expected tracer record at index 1"),
    };
    assert_eq!(data.user_data, 0xabc);
    assert!(data.enabled);
}

#[test]
fn extension_properties_report_configured_version() {
    let ctx = DriverContext::new(NullConfig {
        tracing_ext_version: TRACING_EXT_VERSION_1_1,
        ..NullConfig::default()
    });
    let driver = DriverHandle::from_raw(0x5000);

    let mut count = 0u32;
    let st = dispatch::driver_get_extension_properties(&ctx, driver, &mut count, None);
    assert_eq!(st, Status::Success);
    assert_eq!(count, 1);

    let mut props = vec![ExtensionProperties::default(); count as usize];
    let st =
        dispatch::driver_get_extension_properties(&ctx, driver, &mut count, Some(&mut props));
    assert_eq!(st, Status::Success);
    assert_eq!(props[0].name, TRACING_EXT_NAME);
    assert_eq!(props[0].version, TRACING_EXT_VERSION_1_1);
}

#[test]
fn driver_get_reports_single_instance() {
    let ctx = DriverContext::new(NullConfig::default());

    let mut count = 0u32;
    assert_eq!(dispatch::driver_get(&ctx, &mut count, None), Status::Success);
    assert_eq!(count, 1);

    let mut handles = vec![DriverHandle::NULL; 1];
    assert_eq!(
        dispatch::driver_get(&ctx, &mut count, Some(&mut handles)),
        Status::Success
    );
    assert!(!handles[0].is_null());
}
