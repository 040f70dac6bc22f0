use crate::core::catalog::{ApiProvider, CatalogProvider, CliProvider, HealthStatus, ModelInfo};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Providers listed first, in this order; everything else follows by ID.
const PROVIDER_PRIORITY: &[&str] = &["claude", "codex", "gemini", "grok", "qwen"];

/// Turn a model ID into a display name: `claude-sonnet-4` -> `Claude Sonnet 4`.
pub fn format_model_name(model_id: &str) -> String {
    model_id
        .split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn priority_rank(provider_id: &str) -> usize {
    PROVIDER_PRIORITY
        .iter()
        .position(|id| *id == provider_id)
        .unwrap_or(PROVIDER_PRIORITY.len())
}

fn compare_providers(a: &CatalogProvider, b: &CatalogProvider) -> Ordering {
    priority_rank(&a.id)
        .cmp(&priority_rank(&b.id))
        .then_with(|| a.id.cmp(&b.id))
}

/// Union both sources into one list with unique provider IDs.
///
/// API metadata wins where both sources know a provider or model; CLI-only
/// providers are named by their ID and CLI-only models get a name derived
/// from the model ID. Health only ever comes from the CLI side.
pub fn merge_catalog(cli: &[CliProvider], api: &[ApiProvider]) -> Vec<CatalogProvider> {
    let mut merged: HashMap<&str, CatalogProvider> = HashMap::new();

    for provider in api {
        let entry = merged
            .entry(provider.id.as_str())
            .or_insert_with(|| CatalogProvider {
                id: provider.id.clone(),
                display_name: provider.display_name.clone(),
                models: BTreeMap::new(),
                health: HealthStatus::Unknown,
            });
        for model in &provider.models {
            entry.models.insert(
                model.id.clone(),
                ModelInfo {
                    id: model.id.clone(),
                    name: model
                        .name
                        .clone()
                        .filter(|name| !name.trim().is_empty())
                        .unwrap_or_else(|| format_model_name(&model.id)),
                    context_window: model.context_window,
                    cost_tier: model.cost_tier,
                },
            );
        }
    }

    for provider in cli {
        let entry = merged
            .entry(provider.provider.as_str())
            .or_insert_with(|| CatalogProvider {
                id: provider.provider.clone(),
                display_name: provider.provider.clone(),
                models: BTreeMap::new(),
                health: HealthStatus::Unknown,
            });
        if provider.health != HealthStatus::Unknown {
            entry.health = provider.health;
        }
        for model_id in &provider.models {
            entry
                .models
                .entry(model_id.clone())
                .or_insert_with(|| ModelInfo {
                    id: model_id.clone(),
                    name: format_model_name(model_id),
                    context_window: None,
                    cost_tier: None,
                });
        }
    }

    let mut providers: Vec<CatalogProvider> = merged.into_values().collect();
    providers.sort_by(compare_providers);
    providers
}

pub fn find_provider<'a>(
    providers: &'a [CatalogProvider],
    provider_id: &str,
) -> Option<&'a CatalogProvider> {
    providers.iter().find(|p| p.id == provider_id)
}

/// Look up a `provider/model` reference. Model IDs may themselves contain
/// `/`, so only the first separator splits.
pub fn find_model<'a>(
    providers: &'a [CatalogProvider],
    reference: &str,
) -> Option<(&'a CatalogProvider, &'a ModelInfo)> {
    let (provider_id, model_id) = reference.split_once('/')?;
    let provider = find_provider(providers, provider_id)?;
    let model = provider.models.get(model_id)?;
    Some((provider, model))
}
