//! Tracer composition: prologues in registration order, then the
//! implementation, then epilogues; disabled tracers are skipped.

use std::sync::Arc;

use axle_api::callbacks::{CoreCallbacks, DeviceGetParams};
use axle_api::handles::*;
use axle_api::properties::TracerDesc;
use axle_api::status::Status;
use axle_api::tables::CoreTables;
use axle_tracing::{wrap_core, TracerCollection};
use parking_lot::Mutex;

type Log = Arc<Mutex<Vec<String>>>;

fn logging_callbacks(log: &Log, tag: &str) -> CoreCallbacks {
    let mut cbs = CoreCallbacks::default();
    let log = log.clone();
    let tag = tag.to_string();
    cbs.device_get = Some(Arc::new(move |params: &DeviceGetParams| {
        let stage = match params.result {
            None => "pro",
            Some(_) => "epi",
        };
        log.lock().push(format!("{stage}:{tag}"));
    }));
    cbs
}

fn inner_tables(log: &Log) -> CoreTables {
    let mut inner = CoreTables::default();
    inner.device.get = Some({
        let log = log.clone();
        Arc::new(
            move |_driver: DriverHandle, count: &mut u32, _out: Option<&mut [DeviceHandle]>| {
                *count = 1;
                log.lock().push("impl".to_string());
                Status::Success
            },
        )
    });
    inner
}

#[test]
fn two_tracers_bracket_the_call_in_registration_order() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let coll = Arc::new(TracerCollection::new());

    let t1 = coll.create(&TracerDesc { user_data: 1 });
    let t2 = coll.create(&TracerDesc { user_data: 2 });
    assert_eq!(t1.as_raw(), 1, "index 0 is reserved");
    assert_eq!(t2.as_raw(), 2);

    assert_eq!(coll.set_prologues(t1, logging_callbacks(&log, "t1")), Status::Success);
    assert_eq!(coll.set_epilogues(t1, logging_callbacks(&log, "t1")), Status::Success);
    assert_eq!(coll.set_prologues(t2, logging_callbacks(&log, "t2")), Status::Success);
    assert_eq!(coll.set_epilogues(t2, logging_callbacks(&log, "t2")), Status::Success);
    assert_eq!(coll.set_enabled(t1, true), Status::Success);
    assert_eq!(coll.set_enabled(t2, true), Status::Success);

    let wrapped = wrap_core(&inner_tables(&log), &coll);
    let pfn = match wrapped.device.get.clone() {
        Some(pfn) => pfn,
        None => panic!("wrapped slot must be populated"),
    };

    let mut count = 0u32;
    assert_eq!(pfn(DriverHandle(0x1000), &mut count, None), Status::Success);
    assert_eq!(count, 1);
    assert_eq!(
        *log.lock(),
        vec!["pro:t1", "pro:t2", "impl", "epi:t1", "epi:t2"]
    );

    // disabling one tracer removes only its callbacks
    log.lock().clear();
    assert_eq!(coll.set_enabled(t1, false), Status::Success);
    assert_eq!(pfn(DriverHandle(0x1000), &mut count, None), Status::Success);
    assert_eq!(*log.lock(), vec!["pro:t2", "impl", "epi:t2"]);
}

#[test]
fn tracers_are_disabled_until_enabled() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let coll = Arc::new(TracerCollection::new());

    let t = coll.create(&TracerDesc::default());
    assert_eq!(coll.set_prologues(t, logging_callbacks(&log, "t")), Status::Success);

    let wrapped = wrap_core(&inner_tables(&log), &coll);
    let pfn = match wrapped.device.get.clone() {
        Some(pfn) => pfn,
        None => panic!("wrapped slot must be populated"),
    };

    let mut count = 0u32;
    assert_eq!(pfn(DriverHandle(0x1000), &mut count, None), Status::Success);
    assert_eq!(*log.lock(), vec!["impl"], "disabled tracer callbacks are skipped");
}

#[test]
fn epilogues_observe_the_result() {
    let seen: Arc<Mutex<Vec<Option<Status>>>> = Arc::new(Mutex::new(Vec::new()));
    let coll = Arc::new(TracerCollection::new());

    let t = coll.create(&TracerDesc::default());
    let mut cbs = CoreCallbacks::default();
    cbs.device_get = Some({
        let seen = seen.clone();
        Arc::new(move |params: &DeviceGetParams| {
            seen.lock().push(params.result);
        })
    });
    assert_eq!(coll.set_prologues(t, cbs.clone()), Status::Success);
    assert_eq!(coll.set_epilogues(t, cbs), Status::Success);
    assert_eq!(coll.set_enabled(t, true), Status::Success);

    let mut inner = CoreTables::default();
    inner.device.get = Some(Arc::new(
        |_driver: DriverHandle, _count: &mut u32, _out: Option<&mut [DeviceHandle]>| {
            Status::ErrorUnknown
        },
    ));

    let wrapped = wrap_core(&inner, &coll);
    let pfn = match wrapped.device.get.clone() {
        Some(pfn) => pfn,
        None => panic!("wrapped slot must be populated"),
    };

    let mut count = 0u32;
    assert_eq!(pfn(DriverHandle(0x1000), &mut count, None), Status::ErrorUnknown);
    assert_eq!(
        *seen.lock(),
        vec![None, Some(Status::ErrorUnknown)],
        "prologue sees no result, epilogue sees the implementation's"
    );
}

#[test]
fn reserved_and_unknown_handles_are_rejected() {
    let coll = TracerCollection::new();
    assert_eq!(
        coll.set_enabled(TracerHandle::NULL, true),
        Status::ErrorInvalidNullHandle
    );
    assert_eq!(
        coll.set_enabled(TracerHandle::from_raw(99), true),
        Status::ErrorInvalidNullHandle
    );
    assert!(coll.is_empty());
    assert_eq!(coll.user_data(TracerHandle::from_raw(0)), None);
}

#[test]
fn user_data_is_retained() {
    let coll = TracerCollection::new();
    let t = coll.create(&TracerDesc { user_data: 0xfeed });
    assert_eq!(coll.user_data(t), Some(0xfeed));
    assert_eq!(coll.len(), 1);
}
