//! Registry of setting handlers.

use std::collections::HashMap;

use super::handlers::{
    api_url_handler, auth_check_timeout_handler, bridge_command_handler, overall_timeout_handler,
    project_root_handler, source_timeout_handler, telemetry_handler, verify_cli_auth_handler,
    DefaultProviderHandler,
};
use super::SettingHandler;
use crate::core::config::data::Config;

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
    /// Keys in display order for `rycode set` output.
    display_order: Vec<&'static str>,
}

impl SettingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            display_order: Vec::new(),
        };

        registry.register(Box::new(DefaultProviderHandler));
        registry.register(Box::new(api_url_handler()));
        registry.register(Box::new(project_root_handler()));
        registry.register(Box::new(bridge_command_handler()));
        registry.register(Box::new(telemetry_handler()));
        registry.register(Box::new(verify_cli_auth_handler()));
        registry.register(Box::new(source_timeout_handler()));
        registry.register(Box::new(overall_timeout_handler()));
        registry.register(Box::new(auth_check_timeout_handler()));

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.display_order.push(key);
        self.handlers.insert(key, handler);
    }

    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }

    pub fn keys_display_order(&self) -> &[&'static str] {
        &self.display_order
    }

    /// Every setting's current value, one per line, plus the custom themes.
    pub fn format_all(&self, config: &Config) -> String {
        let mut out = String::from("Current configuration:\n");
        for key in &self.display_order {
            if let Some(handler) = self.handlers.get(key) {
                out.push_str(&handler.format(config));
                out.push('\n');
            }
        }
        if config.custom_themes.is_empty() {
            out.push_str("  custom-themes: (none)\n");
        } else {
            out.push_str("  custom-themes:\n");
            for theme in config.list_custom_themes() {
                out.push_str(&format!("    {}: {}\n", theme.id, theme.display_name));
            }
        }
        out
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
