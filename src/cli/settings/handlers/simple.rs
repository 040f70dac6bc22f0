//! Simple setting handlers for single-value settings.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{
    mutate_config_with_message, success_set, validate_provider,
};
use crate::cli::settings::{SetContext, SettingHandler};
use crate::core::config::data::Config;
use crate::ui::builtin_themes::DEFAULT_THEME_ID;

/// Handler for the `default-provider` setting.
pub struct DefaultProviderHandler;

impl SettingHandler for DefaultProviderHandler {
    fn key(&self) -> &'static str {
        "default-provider"
    }

    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To set a default provider, specify the provider:",
                example: "rycode set default-provider gemini",
            });
        }

        let provider = validate_provider(ctx.config, &args.join(" "))?;
        let message = success_set("default-provider", &provider);

        mutate_config_with_message(
            ctx,
            move |config| {
                config.default_provider = Some(provider);
                Ok(())
            },
            message,
        )
    }

    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError> {
        mutate_config_with_message(
            ctx,
            |config| {
                config.default_provider = None;
                Ok(())
            },
            format!("✅ Unset default-provider (will use default: {DEFAULT_THEME_ID})"),
        )
    }

    fn format(&self, config: &Config) -> String {
        match &config.default_provider {
            Some(provider) => format!("  default-provider: {provider}"),
            None => format!("  default-provider: (unset, default: {DEFAULT_THEME_ID})"),
        }
    }
}
