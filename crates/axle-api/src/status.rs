use std::fmt;

/// Result code returned by every API entry point.
///
/// All failures are reported synchronously through this closed set; no
/// panics or unwinds cross the dispatch boundary.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success = 0,
    /// A query-style operation completed but the queried condition has
    /// not been reached yet (e.g. an unsignaled event).
    NotReady = 1,
    ErrorUninitialized = 0x7000_0001,
    ErrorUnsupportedVersion = 0x7000_0002,
    ErrorUnsupportedFeature = 0x7000_0003,
    ErrorInvalidNullHandle = 0x7000_0010,
    ErrorInvalidNullPointer = 0x7000_0011,
    ErrorInvalidEnumeration = 0x7000_0012,
    ErrorInvalidSize = 0x7000_0013,
    ErrorUnknown = 0x7fff_ffff,
}

impl Status {
    pub fn is_success(self) -> bool {
        self == Status::Success
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "SUCCESS",
            Status::NotReady => "NOT_READY",
            Status::ErrorUninitialized => "ERROR_UNINITIALIZED",
            Status::ErrorUnsupportedVersion => "ERROR_UNSUPPORTED_VERSION",
            Status::ErrorUnsupportedFeature => "ERROR_UNSUPPORTED_FEATURE",
            Status::ErrorInvalidNullHandle => "ERROR_INVALID_NULL_HANDLE",
            Status::ErrorInvalidNullPointer => "ERROR_INVALID_NULL_POINTER",
            Status::ErrorInvalidEnumeration => "ERROR_INVALID_ENUMERATION",
            Status::ErrorInvalidSize => "ERROR_INVALID_SIZE",
            Status::ErrorUnknown => "ERROR_UNKNOWN",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Success
    }
}
