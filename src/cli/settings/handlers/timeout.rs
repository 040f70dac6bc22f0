//! Millisecond timeout settings under `[catalog]`.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{mutate_config_with_message, success_set};
use crate::cli::settings::{SetContext, SettingHandler};
use crate::core::config::data::{CatalogSettings, Config};

/// Longest accepted timeout; anything larger is almost certainly a typo.
const MAX_TIMEOUT_MS: u64 = 120_000;

pub struct TimeoutHandler {
    key: &'static str,
    example: &'static str,
    field: fn(&mut CatalogSettings) -> &mut u64,
}

impl TimeoutHandler {
    fn current(&self, config: &Config) -> u64 {
        let mut settings = config.catalog.clone();
        *(self.field)(&mut settings)
    }

    fn default_value(&self) -> u64 {
        let mut settings = CatalogSettings::default();
        *(self.field)(&mut settings)
    }
}

impl SettingHandler for TimeoutHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError> {
        let Some(input) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To set a timeout, provide the number of milliseconds:",
                example: self.example,
            });
        };

        let value = input
            .trim()
            .trim_end_matches("ms")
            .parse::<u64>()
            .ok()
            .filter(|ms| (1..=MAX_TIMEOUT_MS).contains(ms))
            .ok_or_else(|| SettingError::InvalidValue {
                key: self.key,
                input: input.clone(),
                reason: "expected milliseconds between 1 and 120000",
            })?;
        let field = self.field;

        mutate_config_with_message(
            ctx,
            move |config| {
                *field(&mut config.catalog) = value;
                Ok(())
            },
            success_set(self.key, &format!("{value}ms")),
        )
    }

    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError> {
        let field = self.field;
        let default = self.default_value();
        mutate_config_with_message(
            ctx,
            move |config| {
                *field(&mut config.catalog) = default;
                Ok(())
            },
            format!("✅ Unset {} (will use default: {default}ms)", self.key),
        )
    }

    fn format(&self, config: &Config) -> String {
        let value = self.current(config);
        if value == self.default_value() {
            format!("  {}: {value}ms (default)", self.key)
        } else {
            format!("  {}: {value}ms", self.key)
        }
    }
}

pub fn source_timeout_handler() -> TimeoutHandler {
    TimeoutHandler {
        key: "source-timeout-ms",
        example: "rycode set source-timeout-ms 3000",
        field: |c| &mut c.source_timeout_ms,
    }
}

pub fn overall_timeout_handler() -> TimeoutHandler {
    TimeoutHandler {
        key: "overall-timeout-ms",
        example: "rycode set overall-timeout-ms 6000",
        field: |c| &mut c.overall_timeout_ms,
    }
}

pub fn auth_check_timeout_handler() -> TimeoutHandler {
    TimeoutHandler {
        key: "auth-check-timeout-ms",
        example: "rycode set auth-check-timeout-ms 1500",
        field: |c| &mut c.auth_check_timeout_ms,
    }
}
