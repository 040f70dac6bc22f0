use crate::core::config::data::Config;
use crate::ui::registry::ThemeRegistry;

/// Registered provider themes, built-in first, with the startup theme marked.
pub fn format_theme_list(registry: &ThemeRegistry, config: &Config) -> String {
    let current = registry.current();
    let mut out = String::from("Available provider themes:\n\n");

    let (custom, builtin): (Vec<_>, Vec<_>) = registry
        .themes()
        .partition(|t| config.get_custom_theme(&t.provider_id).is_some());

    out.push_str("Built-in:\n");
    for theme in builtin {
        let mark = if theme.provider_id == current.provider_id {
            "*"
        } else {
            " "
        };
        out.push_str(&format!(
            "  {} {} - {}\n",
            mark,
            theme.provider_id,
            theme.name()
        ));
    }

    if !custom.is_empty() {
        out.push_str("\nCustom:\n");
        for theme in custom {
            let mark = if theme.provider_id == current.provider_id {
                "*"
            } else {
                " "
            };
            out.push_str(&format!(
                "  {} {} - {}\n",
                mark,
                theme.provider_id,
                theme.name()
            ));
        }
    }

    out.push_str(&format!("\nStartup theme: {}\n", current.provider_id));
    out
}

pub fn list_themes(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let registry = ThemeRegistry::from_config(config);
    print!("{}", format_theme_list(&registry, config));
    Ok(())
}
