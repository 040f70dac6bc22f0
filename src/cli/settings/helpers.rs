//! Helper functions for settings operations.

use crate::core::config::data::Config;
use crate::ui::registry::ThemeRegistry;

use super::error::SettingError;
use super::SetContext;

/// Apply `f` through the context's config store, mapping failures to
/// `SettingError::ConfigError`.
pub fn mutate_config<F>(ctx: &SetContext<'_>, f: F) -> Result<(), SettingError>
where
    F: FnOnce(&mut Config) -> Result<(), Box<dyn std::error::Error>>,
{
    ctx.store
        .mutate(f)
        .map_err(|e| SettingError::ConfigError(e.to_string()))
}

/// [`mutate_config`], returning `message` on success.
pub fn mutate_config_with_message<F>(
    ctx: &SetContext<'_>,
    f: F,
    message: String,
) -> Result<String, SettingError>
where
    F: FnOnce(&mut Config) -> Result<(), Box<dyn std::error::Error>>,
{
    mutate_config(ctx, f)?;
    Ok(message)
}

pub fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}

pub fn success_unset(key: &str) -> String {
    format!("✅ Unset {key}")
}

/// Parse a boolean value from user input.
///
/// Accepts: on/off, true/false, yes/no, 1/0 (case-insensitive).
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// Resolve a provider ID to the canonical ID of a registered theme, built-in
/// or custom.
pub fn validate_provider(config: &Config, input: &str) -> Result<String, SettingError> {
    ThemeRegistry::from_config(config)
        .get(input.trim())
        .map(|theme| theme.provider_id.clone())
        .ok_or_else(|| SettingError::UnknownProvider {
            input: input.to_string(),
        })
}
