//! Configuration system for the oz daemon
//!
//! - defaults: hardened baseline every load starts from
//! - trust: ownership/permission checks on the file and its directory
//! - loader: existence, trust, read and merge pipeline
//! - schema: the configuration value and its all-optional file form

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod trust;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export commonly used types
pub use defaults::{defaults, DEFAULT_CONFIG_PATH, OZ_VERSION};
pub use loader::{ConfigFormat, ConfigLoader};
pub use schema::{Config, FieldRow, PartialConfig, FIELDS};
pub use trust::{TrustScope, TrustValidator};
