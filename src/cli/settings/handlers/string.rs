//! String setting handlers for text and path settings.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{mutate_config_with_message, success_set};
use crate::cli::settings::{SetContext, SettingHandler};
use crate::core::config::data::{
    path_display, Config, DEFAULT_API_BASE_URL, DEFAULT_BRIDGE_COMMAND,
};
use crate::utils::url::normalize_base_url;
use std::path::{Path, PathBuf};

/// Data-driven handler for free-form string settings.
pub struct StringHandler {
    key: &'static str,
    hint: &'static str,
    example: &'static str,
    default_display: &'static str,
    get: fn(&Config) -> Option<String>,
    set_field: fn(&mut Config, Option<String>),
    /// Check and normalize user input before it is stored
    validate: fn(&'static str, &str) -> Result<String, SettingError>,
}

impl SettingHandler for StringHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: self.hint,
                example: self.example,
            });
        }

        let value = (self.validate)(self.key, &args.join(" "))?;
        let message = success_set(self.key, &value);
        let set_field = self.set_field;

        mutate_config_with_message(
            ctx,
            move |config| {
                set_field(config, Some(value));
                Ok(())
            },
            message,
        )
    }

    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError> {
        let set_field = self.set_field;
        mutate_config_with_message(
            ctx,
            move |config| {
                set_field(config, None);
                Ok(())
            },
            format!(
                "✅ Unset {} (will use default: {})",
                self.key, self.default_display
            ),
        )
    }

    fn format(&self, config: &Config) -> String {
        match (self.get)(config) {
            Some(value) => format!("  {}: {}", self.key, value),
            None => format!("  {}: (unset, default: {})", self.key, self.default_display),
        }
    }
}

fn validate_url(key: &'static str, input: &str) -> Result<String, SettingError> {
    let trimmed = input.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(SettingError::InvalidValue {
            key,
            input: input.to_string(),
            reason: "expected an http:// or https:// URL",
        });
    }
    Ok(normalize_base_url(trimmed))
}

fn validate_non_empty(key: &'static str, input: &str) -> Result<String, SettingError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SettingError::InvalidValue {
            key,
            input: input.to_string(),
            reason: "value must not be empty",
        });
    }
    Ok(trimmed.to_string())
}

fn validate_directory(key: &'static str, input: &str) -> Result<String, SettingError> {
    let path = Path::new(input.trim());
    if !path.is_dir() {
        return Err(SettingError::InvalidValue {
            key,
            input: input.to_string(),
            reason: "not a directory",
        });
    }
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    Ok(absolute.to_string_lossy().into_owned())
}

/// Handler for the `api-url` setting.
pub fn api_url_handler() -> StringHandler {
    StringHandler {
        key: "api-url",
        hint: "To set the RyCode server URL, provide the base URL:",
        example: "rycode set api-url http://127.0.0.1:4096",
        default_display: DEFAULT_API_BASE_URL,
        get: |c| c.api_base_url.clone(),
        set_field: |c, v| c.api_base_url = v,
        validate: validate_url,
    }
}

/// Handler for the `bridge-command` setting.
pub fn bridge_command_handler() -> StringHandler {
    StringHandler {
        key: "bridge-command",
        hint: "To set the runtime that launches the auth CLI, provide the command:",
        example: "rycode set bridge-command /opt/homebrew/bin/bun",
        default_display: DEFAULT_BRIDGE_COMMAND,
        get: |c| c.bridge_command.clone(),
        set_field: |c, v| c.bridge_command = v,
        validate: validate_non_empty,
    }
}

/// Handler for the `project-root` setting.
pub fn project_root_handler() -> StringHandler {
    StringHandler {
        key: "project-root",
        hint: "To set the RyCode checkout used by the auth CLI, provide its path:",
        example: "rycode set project-root ~/src/rycode",
        default_display: "current directory",
        get: |c| c.project_root.as_ref().map(path_display),
        set_field: |c, v| c.project_root = v.map(PathBuf::from),
        validate: validate_directory,
    }
}
