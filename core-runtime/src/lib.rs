//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the media library server:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the library crates depend
//! on. It establishes the logging conventions and carries the settings that
//! repositories receive at construction time.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{CoreConfig, LibraryConfig};
pub use error::{Error, Result};
