//! Descriptor and property structures.
//!
//! These are deliberately small: the real API treats property layouts as
//! opaque wire structures, and the dispatch layer never interprets them.
//! Descriptor flag words stay raw `u32` so the validation layer can
//! reject bits outside the declared masks.

use std::str::FromStr;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ContextFlags: u32 {
        const TBD = 0b0000_0001;
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CommandListFlags: u32 {
        const RELAXED_ORDERING   = 0b0000_0001;
        const MAXIMIZE_THROUGHPUT = 0b0000_0010;
        const EXPLICIT_ONLY      = 0b0000_0100;
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EventPoolFlags: u32 {
        const HOST_VISIBLE = 0b0000_0001;
        const IPC          = 0b0000_0010;
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EventScopeFlags: u32 {
        const SUBDEVICE = 0b0000_0001;
        const DEVICE    = 0b0000_0010;
        const HOST      = 0b0000_0100;
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct QueueGroupFlags: u32 {
        const COMPUTE = 0b0000_0001;
        const COPY    = 0b0000_0010;
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MemoryAccessFlags: u32 {
        const RW         = 0b0000_0001;
        const ATOMIC     = 0b0000_0010;
        const CONCURRENT = 0b0000_0100;
    }
}

/// Device classification reported through `DeviceProperties`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Gpu,
    Npu,
}

impl Default for DeviceType {
    fn default() -> Self {
        DeviceType::Gpu
    }
}

impl FromStr for DeviceType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GPU" => Ok(DeviceType::Gpu),
            "NPU" => Ok(DeviceType::Npu),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverProperties {
    pub uuid: [u8; 16],
    pub driver_version: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionProperties {
    pub name: String,
    pub version: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceProperties {
    pub device_type: DeviceType,
    pub vendor_id: u32,
    pub device_id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComputeProperties {
    pub max_group_size: [u32; 3],
    pub max_shared_local_memory: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryProperties {
    pub total_size: u64,
    pub max_clock_rate: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryAccessProperties {
    pub host_alloc: MemoryAccessFlags,
    pub device_alloc: MemoryAccessFlags,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheProperties {
    pub cache_size: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageProperties {
    pub max_dims_1d: u32,
    pub max_dims_2d: u32,
    pub max_dims_3d: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueGroupProperties {
    pub flags: QueueGroupFlags,
    pub num_queues: u32,
}

/// Sysman-side device state. The sysman domain itself is out of scope;
/// this exists so the sysman table family has a real slot shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceState {
    pub reset_pending: bool,
}

// ── Descriptors (inputs to create-style entry points) ───────

#[derive(Debug, Clone, Copy, Default)]
pub struct ContextDesc {
    pub flags: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandListDesc {
    pub queue_group_ordinal: u32,
    pub flags: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EventPoolDesc {
    pub flags: u32,
    /// Number of events the pool can hold; must be non-zero.
    pub count: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EventDesc {
    pub index: u32,
    pub signal_scope: u32,
    pub wait_scope: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracerDesc {
    /// Opaque pointer-sized value handed back to every callback.
    pub user_data: usize,
}
