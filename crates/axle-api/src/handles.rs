//! Opaque handle types, one newtype per API object category.
//!
//! Externally a handle is always a pointer-sized integer. What the bits
//! mean (counter value vs. capability-record address) is decided by the
//! allocator that produced it; see `axle_null::alloc` and
//! `crate::object::ObjectRecord`.

macro_rules! handle_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(pub usize);

        impl $name {
            pub const NULL: Self = Self(0);

            pub fn is_null(self) -> bool {
                self.0 == 0
            }

            pub fn as_raw(self) -> usize {
                self.0
            }

            pub fn from_raw(raw: usize) -> Self {
                Self(raw)
            }
        }
    };
}

handle_type!(
    /// A loaded driver instance.
    DriverHandle
);
handle_type!(
    /// A device exposed by a driver.
    DeviceHandle
);
handle_type!(
    /// A driver context.
    ContextHandle
);
handle_type!(CommandListHandle);
handle_type!(EventPoolHandle);
handle_type!(EventHandle);
handle_type!(
    /// Synthetic tracer handle: the record's index in the tracer list.
    TracerHandle
);
