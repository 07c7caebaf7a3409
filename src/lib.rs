//! Workspace facade crate.
//!
//! Host applications can depend on `media-library-workspace` to pull in the
//! runtime infrastructure and the artist data-access layer without wiring
//! each crate individually.

pub use core_library as library;
pub use core_runtime as runtime;
