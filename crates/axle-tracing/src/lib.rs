//! API tracing layer.
//!
//! `collection` keeps the tracer records (enabled flag, user data,
//! prologue/epilogue callback tables) behind synthetic index handles;
//! `interpose` rewrites a core table so every dispatch runs the enabled
//! tracers' prologues, then the real slot, then the epilogues, without
//! the underlying trampolines knowing anything about it.

pub mod collection;
pub mod interpose;

pub use collection::TracerCollection;
pub use interpose::wrap_core;
