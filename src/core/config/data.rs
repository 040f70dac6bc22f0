use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:4096";
pub const DEFAULT_BRIDGE_COMMAND: &str = "bun";

/// A palette entry: one color for both appearances, or a dark/light pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Same(String),
    Adaptive { dark: String, light: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationSpec {
    pub logo: Option<String>,
    pub spinner: Option<String>,
    pub welcome: Option<String>,
    pub typing_text: Option<String>,
    pub typing_animation: Option<String>,
    pub typing_gradient: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTheme {
    /// Provider ID the theme belongs to; reusing a built-in ID replaces it.
    pub id: String,
    pub display_name: String,
    /// Built-in theme to inherit unspecified slots from (defaults to claude)
    pub extends: Option<String>,
    #[serde(default)]
    pub palette: BTreeMap<String, ColorSpec>,
    pub decorations: Option<DecorationSpec>,
}

/// Timeouts and policy for merging the provider catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub source_timeout_ms: u64,
    pub overall_timeout_ms: u64,
    pub auth_check_timeout_ms: u64,
    /// Drop CLI-detected providers whose auth check does not confirm them
    pub verify_cli_auth: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            source_timeout_ms: 5_000,
            overall_timeout_ms: 8_000,
            auth_check_timeout_ms: 2_000,
            verify_cli_auth: true,
        }
    }
}

impl CatalogSettings {
    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source_timeout_ms)
    }

    pub fn overall_timeout(&self) -> Duration {
        Duration::from_millis(self.overall_timeout_ms)
    }

    pub fn auth_check_timeout(&self) -> Duration {
        Duration::from_millis(self.auth_check_timeout_ms)
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Provider whose theme is active at startup (e.g., "claude", "gemini")
    pub default_provider: Option<String>,
    /// Base URL of the local RyCode server that lists API-configured providers
    pub api_base_url: Option<String>,
    /// Checkout containing `packages/rycode/src/auth/cli.ts`
    pub project_root: Option<PathBuf>,
    /// Runtime used to launch the auth CLI (defaults to "bun")
    pub bridge_command: Option<String>,
    /// Keep in-memory theme usage statistics (never written anywhere)
    pub telemetry: Option<bool>,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub custom_themes: Vec<CustomTheme>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn bridge_command(&self) -> &str {
        self.bridge_command
            .as_deref()
            .unwrap_or(DEFAULT_BRIDGE_COMMAND)
    }

    /// Project root for the auth CLI, falling back to the working directory.
    pub fn project_root(&self) -> PathBuf {
        self.project_root
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn telemetry_enabled(&self) -> bool {
        self.telemetry.unwrap_or(true)
    }

    pub fn get_custom_theme(&self, id: &str) -> Option<&CustomTheme> {
        self.custom_themes
            .iter()
            .find(|t| t.id.eq_ignore_ascii_case(id))
    }

    pub fn list_custom_themes(&self) -> Vec<&CustomTheme> {
        self.custom_themes.iter().collect()
    }
}

#[cfg(test)]
impl Config {
    pub fn add_custom_theme(&mut self, theme: CustomTheme) {
        self.custom_themes.push(theme);
    }
}
