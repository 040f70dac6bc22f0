//! Wire types for the RyCode API server.

use serde::Deserialize;
use std::collections::BTreeMap;

pub mod providers;

#[derive(Deserialize)]
pub struct ProvidersResponse {
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,
}

#[derive(Deserialize)]
pub struct ProviderEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub models: BTreeMap<String, ModelEntry>,
}

#[derive(Deserialize)]
pub struct ModelEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub limit: Option<ModelLimit>,
    #[serde(default)]
    pub cost: Option<ModelCost>,
}

#[derive(Deserialize)]
pub struct ModelLimit {
    pub context: Option<u64>,
}

/// Prices in USD per million tokens.
#[derive(Deserialize)]
pub struct ModelCost {
    pub input: Option<f64>,
    pub output: Option<f64>,
}
