use crate::core::config::data::{ColorSpec, CustomTheme, DecorationSpec};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Declarative form of a provider theme, shared by the embedded built-ins and
/// user-defined themes from the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeSpec {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub palette: BTreeMap<String, ColorSpec>,
    #[serde(default)]
    pub decorations: Option<DecorationSpec>,
}

#[derive(Debug, Deserialize)]
struct BuiltinThemesConfig {
    themes: Vec<ThemeSpec>,
}

/// Provider theme used when nothing else is configured.
pub const DEFAULT_THEME_ID: &str = "claude";

pub fn load_builtin_themes() -> Vec<ThemeSpec> {
    const CONFIG_CONTENT: &str = include_str!("../builtin_themes.toml");
    let config: BuiltinThemesConfig =
        toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtin_themes.toml");
    config.themes
}

/// Convert a `CustomTheme` from config into a `ThemeSpec`.
pub fn theme_spec_from_custom(ct: &CustomTheme) -> ThemeSpec {
    ThemeSpec {
        id: ct.id.clone(),
        display_name: ct.display_name.clone(),
        extends: ct.extends.clone(),
        palette: ct.palette.clone(),
        decorations: ct.decorations.clone(),
    }
}
