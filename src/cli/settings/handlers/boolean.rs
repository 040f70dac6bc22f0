//! Boolean setting handlers for on/off settings.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{format_bool, mutate_config, parse_bool};
use crate::cli::settings::{SetContext, SettingHandler};
use crate::core::config::data::{CatalogSettings, Config};

/// Data-driven handler for boolean (on/off) settings.
pub struct BooleanHandler {
    key: &'static str,
    hint: &'static str,
    example: &'static str,
    /// Effective value, default applied
    get: fn(&Config) -> bool,
    /// Whether the config file sets the value explicitly
    is_set: fn(&Config) -> bool,
    set_field: fn(&mut Config, Option<bool>),
    default_value: bool,
}

impl SettingHandler for BooleanHandler {
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

        let input = args.join(" ");
        let value = parse_bool(&input).ok_or(SettingError::InvalidBoolean(input))?;
        let set_field = self.set_field;

        mutate_config(ctx, move |config| {
            set_field(config, Some(value));
            Ok(())
        })?;

        Ok(format!("✅ Set {} to: {}", self.key, format_bool(value)))
    }

    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError> {
        let set_field = self.set_field;

        mutate_config(ctx, move |config| {
            set_field(config, None);
            Ok(())
        })?;

        Ok(format!(
            "✅ Unset {} (will use default: {})",
            self.key,
            format_bool(self.default_value)
        ))
    }

    fn format(&self, config: &Config) -> String {
        if (self.is_set)(config) {
            format!("  {}: {}", self.key, format_bool((self.get)(config)))
        } else {
            format!(
                "  {}: (unset, default: {})",
                self.key,
                format_bool(self.default_value)
            )
        }
    }
}

/// Handler for the `telemetry` setting.
pub fn telemetry_handler() -> BooleanHandler {
    BooleanHandler {
        key: "telemetry",
        hint: "To turn in-memory theme statistics on or off, specify on or off:",
        example: "rycode set telemetry off",
        get: |c| c.telemetry_enabled(),
        is_set: |c| c.telemetry.is_some(),
        set_field: |c, v| c.telemetry = v,
        default_value: true,
    }
}

/// Handler for the `verify-cli-auth` setting.
pub fn verify_cli_auth_handler() -> BooleanHandler {
    BooleanHandler {
        key: "verify-cli-auth",
        hint: "To control auth checks for CLI-detected providers, specify on or off:",
        example: "rycode set verify-cli-auth off",
        get: |c| c.catalog.verify_cli_auth,
        is_set: |c| c.catalog.verify_cli_auth != CatalogSettings::default().verify_cli_auth,
        set_field: |c, v| {
            c.catalog.verify_cli_auth = v.unwrap_or(CatalogSettings::default().verify_cli_auth)
        },
        default_value: CatalogSettings::default().verify_cli_auth,
    }
}
