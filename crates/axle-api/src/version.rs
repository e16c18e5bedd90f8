use std::fmt;

/// API version, major.minor packed into a u32 so versions compare as
/// plain integers. Negotiated once per driver during loader init and
/// stamped onto every table family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ApiVersion(u32);

impl ApiVersion {
    /// The version this build of the loader and null driver speak.
    pub const CURRENT: ApiVersion = ApiVersion::new(1, 6);

    /// Minimum version required for the runtime (Global) entry points.
    pub const RUNTIME_MIN: ApiVersion = ApiVersion::new(1, 4);

    pub const fn new(major: u16, minor: u16) -> Self {
        ApiVersion(((major as u32) << 16) | minor as u32)
    }

    pub const fn major(self) -> u16 {
        (self.0 >> 16) as u16
    }

    pub const fn minor(self) -> u16 {
        (self.0 & 0xffff) as u16
    }

    pub const fn as_raw(self) -> u32 {
        self.0
    }

    pub const fn from_raw(raw: u32) -> Self {
        ApiVersion(raw)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())
    }
}
