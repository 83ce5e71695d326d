//! Human-readable summary rendering.

pub mod format;

pub use format::*;
