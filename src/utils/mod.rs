//! Utility modules
//!
//! Error types, logging setup and time helpers shared by the library and the `benjis` binary.

pub mod debug;
pub mod error;
pub mod logger;
pub mod time;
