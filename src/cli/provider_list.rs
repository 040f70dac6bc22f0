use std::error::Error;

use crate::core::catalog::{CatalogProvider, ProviderCatalog};
use crate::core::config::data::Config;

/// Plain-text table of the merged catalog; `*` marks the default provider.
pub fn format_provider_table(
    providers: &[CatalogProvider],
    default_provider: Option<&str>,
) -> String {
    if providers.is_empty() {
        return "No providers available.\n".to_string();
    }

    let rows: Vec<(String, &str, usize)> = providers
        .iter()
        .map(|p| {
            let id = if default_provider.is_some_and(|d| d.eq_ignore_ascii_case(&p.id)) {
                format!("{}*", p.id)
            } else {
                p.id.clone()
            };
            (id, p.display_name.as_str(), p.models.len())
        })
        .collect();

    let id_width = rows
        .iter()
        .map(|(id, _, _)| id.len())
        .chain(std::iter::once("Provider".len()))
        .max()
        .unwrap_or_default();
    let name_width = rows
        .iter()
        .map(|(_, name, _)| name.chars().count())
        .chain(std::iter::once("Display Name".len()))
        .max()
        .unwrap_or_default();

    let mut out = String::from("Available Providers:\n\n");
    out.push_str(&format!(
        "  {:<id_width$}  {:<name_width$}  Models\n",
        "Provider", "Display Name"
    ));
    for (id, name, count) in &rows {
        out.push_str(&format!("  {id:<id_width$}  {name:<name_width$}  {count}\n"));
    }

    if default_provider.is_some() {
        out.push_str("\n* = default provider\n");
    }
    out
}

pub async fn list_providers(config: &Config) -> Result<(), Box<dyn Error>> {
    let providers = ProviderCatalog::from_config(config).fetch().await?;
    print!(
        "{}",
        format_provider_table(&providers, config.default_provider.as_deref())
    );
    Ok(())
}
