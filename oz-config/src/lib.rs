//! Trusted configuration loading for the oz sandboxing daemon
//!
//! The daemon runs privileged, so its configuration file is only parsed once
//! the file and its directory are shown to be writable by root alone. Values
//! read from the file are merged over a locked-down baseline.

pub mod args;
pub mod config;
pub mod error;

pub use args::ConfigArgs;
pub use config::{
    defaults, Config, ConfigFormat, ConfigLoader, TrustScope, TrustValidator,
    DEFAULT_CONFIG_PATH, OZ_VERSION,
};
pub use error::{DecodeError, LoadError, Result, TrustError};
