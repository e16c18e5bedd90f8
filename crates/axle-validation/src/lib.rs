//! Parameter-validation layer.
//!
//! `checks` holds one pure function per entry point with the same
//! parameters viewed through nullable references; each returns the
//! specific invalid-argument status or `Success` and never forwards
//! anywhere. `interpose` composes those checks in front of an existing
//! core table without touching the trampolines underneath.

pub mod checks;
pub mod interpose;

pub use interpose::wrap_core;
