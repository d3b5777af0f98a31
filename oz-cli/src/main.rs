//! Inspect and validate the oz daemon configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use oz_config::{defaults, Config, ConfigArgs, ConfigFormat, OZ_VERSION};
use std::process::ExitCode;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[derive(Parser, Debug)]
#[command(
    name = "oz-config",
    about = "Validate and inspect the oz daemon configuration",
    version = OZ_VERSION
)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the configuration file is trusted and decodes cleanly
    Check {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print every setting with its description and effective value
    Show {
        #[command(flatten)]
        config: ConfigArgs,

        /// Show the built-in defaults instead of loading a file
        #[arg(long)]
        defaults: bool,
    },

    /// Print the effective configuration
    Dump {
        #[command(flatten)]
        config: ConfigArgs,

        /// Dump the built-in defaults instead of loading a file
        #[arg(long)]
        defaults: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = ConfigFormat::Json)]
        output: ConfigFormat,
    },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(?args, "Parsed arguments");

    match args.command {
        Command::Check { config } => Ok(check(&config)),
        Command::Show { config, defaults } => {
            let config = effective(&config, defaults)?;
            for row in config.describe() {
                println!("{}: {}", row.key, row.description);
                println!("    {}", row.value);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Dump {
            config,
            defaults,
            output,
        } => {
            let config = effective(&config, defaults)?;
            let rendered = match output {
                ConfigFormat::Json => serde_json::to_string_pretty(&config)
                    .context("Failed to serialize config as JSON")?,
                ConfigFormat::Toml => {
                    toml::to_string(&config).context("Failed to serialize config as TOML")?
                }
            };
            println!("{}", rendered.trim_end());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn check(args: &ConfigArgs) -> ExitCode {
    match args.load() {
        Ok(_) => {
            println!("ok: {}", args.config.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            let kind = if e.is_trust_failure() {
                "untrusted"
            } else {
                "error"
            };
            eprintln!("{kind}: {e}");
            ExitCode::FAILURE
        }
    }
}

fn effective(args: &ConfigArgs, use_defaults: bool) -> Result<Config> {
    if use_defaults {
        return Ok(defaults());
    }
    args.load()
        .with_context(|| format!("Failed to load {}", args.config.display()))
}
