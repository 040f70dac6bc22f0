//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod model_list;
pub mod provider_list;
pub mod settings;
pub mod theme_list;

use std::error::Error;
use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::model_list::list_models;
use crate::cli::provider_list::list_providers;
use crate::cli::settings::{SetContext, SettingError, SettingRegistry};
use crate::cli::theme_list::list_themes;
use crate::core::config::data::Config;
use crate::core::config::orchestrator::ConfigOrchestrator;
use crate::ui::switcher::run_switcher;
use crate::utils::logging::{init_logging, LogTarget};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ")"
);

#[derive(Parser)]
#[command(name = "rycode")]
#[command(version = VERSION)]
#[command(about = "Provider themes and model catalog for RyCode")]
#[command(
    long_about = "RyCode gives every AI provider its own terminal theme and merges the \
providers found by the local auth CLI with those served by the RyCode API.\n\n\
Run without a command to open the interactive provider switcher.\n\n\
Switcher controls:\n\
  Tab / Right       Next provider\n\
  Shift-Tab / Left  Previous provider\n\
  1-9               Jump to a provider\n\
  Enter             Select the highlighted provider\n\
  Esc / q           Quit\n\n\
Environment Variables:\n\
  RYCODE_CONFIG      Path of the config file\n\
  RYCODE_LOG         tracing filter directives (default: warn)\n\
  RYCODE_APPEARANCE  Force 'light' or 'dark' colors\n\
  RYCODE_COLOR       Force color depth: truecolor, 256 or 16"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Write diagnostics to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Provider to start on instead of the configured default
    #[arg(short = 'p', long, global = true, value_name = "PROVIDER")]
    pub provider: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Open the interactive provider switcher (default)
    Switch,
    /// List provider themes
    Themes,
    /// List providers from the merged catalog
    Providers,
    /// List models for a provider (default: the configured provider)
    Models {
        /// Provider to list models for
        provider: Option<String>,
    },
    /// Set configuration values, or print them all without a key
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

impl Commands {
    fn is_interactive(&self) -> bool {
        matches!(self, Commands::Switch)
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let interactive = args
        .command
        .as_ref()
        .is_none_or(Commands::is_interactive)
        && std::io::stdout().is_terminal();
    if let Err(err) = init_logging(&LogTarget::resolve(args.log.clone(), interactive)) {
        eprintln!("⚠️  Logging disabled: {err}");
    }

    handle_args(args).await
}

/// `rycode set [KEY [VALUE...]]` against `store`. Without a key every
/// setting is listed.
pub fn apply_set(
    store: &ConfigOrchestrator,
    key: Option<&str>,
    value: &[String],
) -> Result<String, SettingError> {
    let config = store
        .load_with_cache()
        .map_err(|e| SettingError::ConfigError(e.to_string()))?;
    let registry = SettingRegistry::new();

    let Some(key) = key else {
        return Ok(registry.format_all(&config));
    };
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;

    let ctx = SetContext {
        config: &config,
        store,
    };
    handler.set(value, &ctx)
}

pub fn apply_unset(store: &ConfigOrchestrator, key: &str) -> Result<String, SettingError> {
    let config = store
        .load_with_cache()
        .map_err(|e| SettingError::ConfigError(e.to_string()))?;
    let registry = SettingRegistry::new();
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;

    let ctx = SetContext {
        config: &config,
        store,
    };
    handler.unset(&ctx)
}

fn report_setting(result: Result<String, SettingError>) {
    match result {
        Ok(message) => println!("{message}"),
        Err(err) => {
            err.print();
            std::process::exit(err.exit_code());
        }
    }
}

pub async fn handle_args(args: Args) -> Result<(), Box<dyn Error>> {
    let store = ConfigOrchestrator::global()?;

    match args.command.unwrap_or(Commands::Switch) {
        Commands::Set { key, value } => {
            report_setting(apply_set(store, key.as_deref(), &value));
            Ok(())
        }
        Commands::Unset { key } => {
            report_setting(apply_unset(store, &key));
            Ok(())
        }
        command => {
            let mut config = store.load_with_cache()?;
            if let Some(provider) = args.provider.filter(|p| !p.trim().is_empty()) {
                config.default_provider = Some(provider);
            }
            run_command(command, &config).await
        }
    }
}

async fn run_command(command: Commands, config: &Config) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Switch => run_switcher(config).await,
        Commands::Themes => list_themes(config),
        Commands::Providers => list_providers(config).await,
        Commands::Models { provider } => list_models(config, provider).await,
        Commands::Set { .. } | Commands::Unset { .. } => Ok(()),
    }
}
