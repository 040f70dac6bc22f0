//! Model listing for one provider of the merged catalog.

use crate::core::catalog::{find_provider, CatalogProvider, ProviderCatalog};
use crate::core::config::data::Config;
use std::error::Error;

pub fn format_models(provider: &CatalogProvider) -> String {
    let mut out = match provider.health.indicator() {
        Some(mark) => format!("🤖 Available Models for {} {mark}\n", provider.display_name),
        None => format!("🤖 Available Models for {}\n", provider.display_name),
    };
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    if provider.models.is_empty() {
        out.push_str("No models found for this provider.\n");
        return out;
    }

    out.push_str(&format!("Found {} models:\n\n", provider.models.len()));
    for model in provider.models.values() {
        out.push_str(&format!("  • {}/{}\n", provider.id, model.id));
        if model.name != model.id {
            out.push_str(&format!("    Name: {}\n", model.name));
        }
        if let Some(context) = model.context_window {
            out.push_str(&format!("    Context: {context} tokens\n"));
        }
        if let Some(tier) = model.cost_tier {
            out.push_str(&format!("    Cost: {tier}\n"));
        }
    }
    out
}

/// List models for `provider`, or for the configured default provider.
pub async fn list_models(config: &Config, provider: Option<String>) -> Result<(), Box<dyn Error>> {
    let providers = ProviderCatalog::from_config(config).fetch().await?;

    let requested = provider.or_else(|| config.default_provider.clone());
    let selected: Vec<&CatalogProvider> = match requested.as_deref() {
        Some(id) => vec![find_provider(&providers, id).ok_or_else(|| {
            format!("Unknown provider '{id}'. Run 'rycode providers' to list available providers.")
        })?],
        None => providers.iter().collect(),
    };

    for (i, provider) in selected.into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", format_models(provider));
    }
    Ok(())
}
