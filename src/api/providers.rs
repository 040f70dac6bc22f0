use crate::api::{ProviderEntry, ProvidersResponse};
use crate::core::catalog::{ApiModel, ApiProvider, ApiProviderSource, CostTier, SourceError};
use crate::core::config::data::Config;
use crate::utils::url::construct_api_url;
use async_trait::async_trait;
use tracing::debug;

/// Lists providers configured on the RyCode API server.
#[derive(Clone)]
pub struct HttpProviderSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProviderSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(reqwest::Client::new(), config.api_base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

pub async fn fetch_providers(
    client: &reqwest::Client,
    base_url: &str,
) -> Result<ProvidersResponse, SourceError> {
    let url = construct_api_url(base_url, "config/providers");
    debug!(url = %url, "listing API providers");
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await?
        .error_for_status()?;

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

fn into_api_provider(entry: ProviderEntry) -> ApiProvider {
    let models = entry
        .models
        .into_iter()
        .map(|(key, model)| ApiModel {
            id: model.id.filter(|id| !id.is_empty()).unwrap_or(key),
            name: model.name,
            context_window: model.limit.and_then(|limit| limit.context),
            cost_tier: model
                .cost
                .and_then(|cost| cost.input)
                .map(CostTier::from_input_cost),
        })
        .collect();

    ApiProvider {
        display_name: entry
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| entry.id.clone()),
        id: entry.id,
        models,
    }
}

#[async_trait]
impl ApiProviderSource for HttpProviderSource {
    async fn list_providers(&self) -> Result<Vec<ApiProvider>, SourceError> {
        let response = fetch_providers(&self.client, &self.base_url).await?;
        Ok(response
            .providers
            .into_iter()
            .map(into_api_provider)
            .collect())
    }
}
