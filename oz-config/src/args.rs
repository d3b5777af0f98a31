//! Common CLI arguments for tools that read the oz configuration

use crate::config::{Config, ConfigFormat, ConfigLoader, TrustScope, DEFAULT_CONFIG_PATH};
use crate::error::Result;
use clap::Args;
use std::path::PathBuf;

/// Where to find the configuration file and how strictly to check it
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Configuration file path
    #[arg(long, short = 'c', value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Check every directory up to / instead of only the parent directory
    #[arg(long)]
    pub ancestors: bool,

    /// File format (default: guessed from the extension)
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<ConfigFormat>,
}

impl ConfigArgs {
    pub fn loader(&self) -> ConfigLoader {
        let scope = if self.ancestors {
            TrustScope::Ancestors
        } else {
            TrustScope::ParentOnly
        };
        let loader = ConfigLoader::new().with_scope(scope);
        match self.format {
            Some(format) => loader.with_format(format),
            None => loader,
        }
    }

    pub fn load(&self) -> Result<Config> {
        self.loader().load(&self.config)
    }
}
