//! Settings management for CLI set/unset commands.
//!
//! Each configuration key has a [`SettingHandler`]; the handler kinds are:
//!
//! - Simple settings validated against known values (`default-provider`)
//! - Boolean settings (`telemetry`, `verify-cli-auth`)
//! - String settings (`api-url`, `bridge-command`, `project-root`)
//! - Timeout settings in milliseconds (`source-timeout-ms`, ...)

pub mod error;
pub mod handlers;
pub mod helpers;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::config::data::Config;
use crate::core::config::orchestrator::ConfigOrchestrator;

/// Context provided to setting handlers during set/unset operations.
pub struct SetContext<'a> {
    /// Snapshot of the configuration before the change
    pub config: &'a Config,
    /// Store the change is persisted through
    pub store: &'a ConfigOrchestrator,
}

/// Handles one configuration key.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Set the value from the arguments after the key. Returns the message
    /// to display.
    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError>;

    /// Clear the value so the default applies again.
    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError>;

    /// Format the current value for display in `rycode set` output.
    fn format(&self, config: &Config) -> String;
}
