//! Logging utilities.
//!
//! Centralizes logger initialization. Library code only uses the `log` facade;
//! binaries call [`init_logging`] once early in `main`.

mod init;

pub use init::{init_logging, LoggingConfig};
