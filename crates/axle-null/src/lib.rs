//! axle null driver
//!
//! A driver implementation with no hardware behind it: every entry point
//! either runs an installed override or a generic fallback that
//! synthesizes handles and fixed counts. Used for testing the loader and
//! the cross-cutting layers without a real device, and as the reference
//! for what a backing driver must provide.

use std::ffi::c_void;
use std::sync::Arc;

pub mod alloc;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod tables;
pub mod tracer;

use axle_api::provider::DriverProvider;
use axle_api::status::Status;
use axle_api::tables::{CoreTables, GlobalTable, RuntimeTables, SysmanTables, ToolsTables};
use axle_api::version::ApiVersion;

pub use config::NullConfig;
pub use context::DriverContext;

/// The null driver as the loader sees it.
pub struct NullDriver {
    ctx: Arc<DriverContext>,
}

impl NullDriver {
    pub fn new(config: NullConfig) -> Self {
        NullDriver {
            ctx: DriverContext::new(config),
        }
    }

    pub fn from_env() -> Self {
        Self::new(NullConfig::from_env())
    }

    pub fn context(&self) -> &Arc<DriverContext> {
        &self.ctx
    }
}

impl DriverProvider for NullDriver {
    fn name(&self) -> &str {
        "null"
    }

    fn api_version(&self) -> ApiVersion {
        self.ctx.version
    }

    fn handle_record_capable(&self) -> bool {
        !self.ctx.config.ddi_ext_disabled
    }

    fn fill_core(&self, version: ApiVersion, t: &mut CoreTables) -> Status {
        let st = tables::get_driver_proc_addr_table(&self.ctx, version, Some(&mut t.driver));
        if !st.is_success() {
            return st;
        }
        let st = tables::get_device_proc_addr_table(&self.ctx, version, Some(&mut t.device));
        if !st.is_success() {
            return st;
        }
        let st = tables::get_context_proc_addr_table(&self.ctx, version, Some(&mut t.context));
        if !st.is_success() {
            return st;
        }
        let st =
            tables::get_command_list_proc_addr_table(&self.ctx, version, Some(&mut t.command_list));
        if !st.is_success() {
            return st;
        }
        let st = tables::get_event_proc_addr_table(&self.ctx, version, Some(&mut t.event));
        if !st.is_success() {
            return st;
        }
        t.version = self.ctx.version;
        t.valid = true;
        Status::Success
    }

    fn fill_tools(&self, version: ApiVersion, t: &mut ToolsTables) -> Status {
        let st = tables::get_tracer_proc_addr_table(&self.ctx, version, Some(&mut t.tracer));
        if !st.is_success() {
            return st;
        }
        t.version = self.ctx.version;
        t.valid = true;
        Status::Success
    }

    fn fill_sysman(&self, version: ApiVersion, t: &mut SysmanTables) -> Status {
        let st =
            tables::get_sysman_device_proc_addr_table(&self.ctx, version, Some(&mut t.device));
        if !st.is_success() {
            return st;
        }
        t.version = self.ctx.version;
        t.valid = true;
        Status::Success
    }

    fn fill_runtime(&self, version: ApiVersion, t: &mut RuntimeTables) -> Status {
        let mut global = GlobalTable::default();
        let st = tables::get_global_proc_addr_table(&self.ctx, version, Some(&mut global));
        if !st.is_success() {
            return st;
        }
        t.global = Some(global);
        t.version = self.ctx.version;
        t.valid = true;
        Status::Success
    }
}

/// Discovery entry point for loading this driver as a shared library.
/// Returns a `Box<Arc<dyn DriverProvider>>` cast to a raw pointer; the
/// loader takes ownership.
#[no_mangle]
pub extern "C" fn axle_driver_provider() -> *mut c_void {
    let provider: Arc<dyn DriverProvider> = Arc::new(NullDriver::from_env());
    Box::into_raw(Box::new(provider)) as *mut c_void
}
