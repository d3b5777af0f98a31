//! Configuration file loading
//!
//! Loading is a fixed pipeline: the file must exist, pass the trust checks,
//! be readable, and decode cleanly. The decoded fields are then merged over
//! [`defaults`]. Any failure is returned to the caller; there is no fallback
//! to the defaults.
//!
//! The trust checks run on paths, and the file is opened afterwards, so a
//! swap between the two steps is possible. To keep that from reaching the
//! parser, the opened handle is checked again with `fstat` before it is read.

use super::defaults::{defaults, DEFAULT_CONFIG_PATH};
use super::schema::{Config, PartialConfig};
use super::trust::{self, TrustScope, TrustValidator};
use crate::error::{DecodeError, LoadError, Result};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

/// Encoding of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML, everything else (`oz.conf` included) is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }

    pub fn decode(self, bytes: &[u8]) -> std::result::Result<PartialConfig, DecodeError> {
        match self {
            ConfigFormat::Json => decode_json(bytes),
            ConfigFormat::Toml => Ok(toml::from_str(std::str::from_utf8(bytes)?)?),
        }
    }
}

/// The top level must be an object: a derived struct would also accept an
/// array and fill fields by position. Repeated keys keep the last value.
fn decode_json(bytes: &[u8]) -> std::result::Result<PartialConfig, DecodeError> {
    match serde_json::from_slice(bytes)? {
        Value::Object(map) => Ok(serde_json::from_value(Value::Object(map))?),
        Value::Null => Err(DecodeError::NotAnObject("null")),
        Value::Bool(_) => Err(DecodeError::NotAnObject("a boolean")),
        Value::Number(_) => Err(DecodeError::NotAnObject("a number")),
        Value::String(_) => Err(DecodeError::NotAnObject("a string")),
        Value::Array(_) => Err(DecodeError::NotAnObject("an array")),
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    validator: TrustValidator,
    format: Option<ConfigFormat>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(mut self, scope: TrustScope) -> Self {
        self.validator = TrustValidator::with_scope(scope);
        self
    }

    /// Force a format instead of guessing from the extension
    pub fn with_format(mut self, format: ConfigFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Load `path` with the default two-level trust checks
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        Self::new().load(path)
    }

    /// Load the system-wide configuration file
    pub fn load_default() -> Result<Config> {
        Self::load_from_file(DEFAULT_CONFIG_PATH)
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Config> {
        let path = path.as_ref();

        if let Err(e) = fs::metadata(path) {
            if e.kind() == io::ErrorKind::NotFound {
                return Err(LoadError::NotFound(path.to_path_buf()));
            }
        }

        self.validator
            .validate(path)
            .map_err(|reason| LoadError::Untrusted {
                path: path.to_path_buf(),
                reason,
            })?;

        let bytes = read_trusted(path)?;

        let format = self.format.unwrap_or_else(|| ConfigFormat::from_path(path));
        tracing::debug!(path = %path.display(), ?format, "Decoding config");
        let partial = format
            .decode(&bytes)
            .map_err(|source| LoadError::DecodeFailed {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(overrides = ?partial.present_keys(), "Merging config over defaults");
        Ok(partial.apply(defaults()))
    }
}

/// Open `path`, re-check the open handle and read it to the end
fn read_trusted(path: &Path) -> Result<Vec<u8>> {
    let read_failed = |source| LoadError::ReadFailed {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(read_failed)?;
    let metadata = file.metadata().map_err(read_failed)?;
    trust::check_metadata(path, &metadata).map_err(|reason| LoadError::Untrusted {
        path: path.to_path_buf(),
        reason,
    })?;
    if !metadata.is_file() {
        return Err(read_failed(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_failed)?;
    Ok(bytes)
}
