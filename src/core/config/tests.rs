use super::data::{path_display, CatalogSettings, ColorSpec, Config, CustomTheme, DecorationSpec};
use super::io::ConfigError;
use super::orchestrator::ConfigOrchestrator;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn config_orchestrator_detects_external_updates() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    let orchestrator = ConfigOrchestrator::new(config_path.clone());

    orchestrator
        .mutate(|config| {
            config.default_provider = Some("gemini".to_string());
            Ok(())
        })
        .expect("mutate failed");

    let persisted = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(persisted.default_provider.as_deref(), Some("gemini"));

    let cached = orchestrator.load_with_cache().expect("cached load failed");
    assert_eq!(cached.default_provider.as_deref(), Some("gemini"));

    std::thread::sleep(Duration::from_millis(1100));

    let external = Config {
        default_provider: Some("qwen".to_string()),
        ..Default::default()
    };
    external
        .save_to_path(&config_path)
        .expect("external save failed");

    let reloaded = orchestrator.load_with_cache().expect("reload failed");
    assert_eq!(reloaded.default_provider.as_deref(), Some("qwen"));
}

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.catalog, CatalogSettings::default());
    assert!(config.telemetry_enabled());
    assert_eq!(config.bridge_command(), "bun");
    assert_eq!(config.api_base_url(), "http://127.0.0.1:4096");
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        default_provider: Some("codex".to_string()),
        api_base_url: Some("http://localhost:9999".to_string()),
        telemetry: Some(false),
        ..Default::default()
    };
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");
    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded, config);

    let mut config = loaded;
    config.default_provider = None;
    config
        .save_to_path(&config_path)
        .expect("Failed to save unset config");
    let loaded = Config::load_from_path(&config_path).expect("Failed to load unset config");
    assert_eq!(loaded.default_provider, None);
    assert_eq!(loaded.api_base_url(), "http://localhost:9999");
    assert!(!loaded.telemetry_enabled());
}

#[test]
fn partial_catalog_table_keeps_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        "[catalog]\nsource_timeout_ms = 1500\nverify_cli_auth = false\n",
    )
    .expect("write config");

    let config = Config::load_from_path(&config_path).expect("load");
    assert_eq!(config.catalog.source_timeout(), Duration::from_millis(1500));
    assert!(!config.catalog.verify_cli_auth);
    assert_eq!(
        config.catalog.overall_timeout(),
        CatalogSettings::default().overall_timeout()
    );
}

#[test]
fn custom_themes_round_trip_with_both_color_forms() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");

    let mut config = Config::default();
    config.add_custom_theme(CustomTheme {
        id: "grok".to_string(),
        display_name: "Grok".to_string(),
        extends: Some("codex".to_string()),
        palette: BTreeMap::from([
            ("primary".to_string(), ColorSpec::Same("#FFFFFF".to_string())),
            (
                "background".to_string(),
                ColorSpec::Adaptive {
                    dark: "#000000".to_string(),
                    light: "#FAFAFA".to_string(),
                },
            ),
        ]),
        decorations: Some(DecorationSpec {
            welcome: Some("Hello from Grok".to_string()),
            ..Default::default()
        }),
    });
    config.save_to_path(&config_path).expect("save");

    let loaded = Config::load_from_path(&config_path).expect("load");
    assert_eq!(loaded.custom_themes, config.custom_themes);
    assert!(loaded.get_custom_theme("GROK").is_some());
    assert_eq!(loaded.list_custom_themes().len(), 1);
}

#[test]
fn parse_error_names_the_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "default_provider = [").expect("write config");

    let err = Config::load_from_path(&config_path).expect_err("invalid TOML");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("Failed to parse config"));
}

#[cfg(unix)]
#[test]
fn path_display_abbreviates_home() {
    if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home).join(".config/rycode/config.toml");
        assert_eq!(path_display(&path), "~/.config/rycode/config.toml");
    }
    assert_eq!(path_display("/etc/rycode.toml"), "/etc/rycode.toml");
}
