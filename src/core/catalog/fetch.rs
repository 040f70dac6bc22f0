use crate::api::providers::HttpProviderSource;
use crate::core::bridge::CliBridge;
use crate::core::catalog::merge::merge_catalog;
use crate::core::catalog::{
    ApiProvider, ApiProviderSource, CatalogError, CatalogProvider, CliCredentialSource,
    CliProvider, HealthStatus, SourceError,
};
use crate::core::config::data::{CatalogSettings, Config};
use futures_util::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::time::{timeout_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Queries both provider sources concurrently and merges what comes back.
pub struct ProviderCatalog {
    cli: Arc<dyn CliCredentialSource>,
    api: Arc<dyn ApiProviderSource>,
    settings: CatalogSettings,
}

impl ProviderCatalog {
    pub fn new(cli: Arc<dyn CliCredentialSource>, api: Arc<dyn ApiProviderSource>) -> Self {
        Self {
            cli,
            api,
            settings: CatalogSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: CatalogSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Catalog backed by the auth CLI bridge and the local API server.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(CliBridge::from_config(config)),
            Arc::new(HttpProviderSource::from_config(config)),
        )
        .with_settings(config.catalog.clone())
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    pub async fn fetch(&self) -> Result<Vec<CatalogProvider>, CatalogError> {
        self.fetch_cancellable(&CancellationToken::new()).await
    }

    /// Like [`fetch`](Self::fetch), but gives up with
    /// [`CatalogError::Cancelled`] as soon as `cancel` fires. In-flight
    /// source calls are dropped, which also kills a running auth CLI.
    pub async fn fetch_cancellable(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<CatalogProvider>, CatalogError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("provider catalog fetch cancelled");
                Err(CatalogError::Cancelled)
            }
            result = self.fetch_sources() => result,
        }
    }

    async fn fetch_sources(&self) -> Result<Vec<CatalogProvider>, CatalogError> {
        let deadline = Instant::now() + self.settings.overall_timeout();
        let (cli, api) = tokio::join!(self.cli_providers(deadline), self.api_providers(deadline));

        match (cli, api) {
            (Ok(cli), Ok(api)) => {
                debug!(
                    cli_providers = cli.len(),
                    api_providers = api.len(),
                    "merging provider sources"
                );
                Ok(merge_catalog(&cli, &api))
            }
            (Err(err), Ok(api)) => {
                warn!(error = %err, "CLI provider detection failed, using API providers only");
                Ok(merge_catalog(&[], &api))
            }
            (Ok(cli), Err(err)) => {
                warn!(error = %err, "API provider listing failed, using CLI providers only");
                Ok(merge_catalog(&cli, &[]))
            }
            (Err(cli), Err(api)) => Err(CatalogError::SourcesUnavailable { cli, api }),
        }
    }

    fn source_deadline(&self, overall: Instant) -> Instant {
        (Instant::now() + self.settings.source_timeout()).min(overall)
    }

    /// Detected CLI providers that pass their auth check, tagged with their
    /// health. If every check fails the source itself counts as failed.
    async fn cli_providers(&self, overall: Instant) -> Result<Vec<CliProvider>, SourceError> {
        let deadline = self.source_deadline(overall);
        let detected = bounded(deadline, self.cli.list_detected_providers()).await?;
        if !self.settings.verify_cli_auth || detected.is_empty() {
            return Ok(detected);
        }

        let check_deadline = (Instant::now() + self.settings.auth_check_timeout()).min(deadline);
        let checks = detected.iter().map(|p| async move {
            tokio::join!(
                bounded(check_deadline, self.cli.check_auth_status(&p.provider)),
                bounded(check_deadline, self.cli.provider_health(&p.provider)),
            )
        });
        let results = join_all(checks).await;

        let mut verified = Vec::new();
        let mut last_error = None;
        let mut any_answered = false;
        for (mut provider, (status, health)) in detected.into_iter().zip(results) {
            match status {
                Ok(status) if status.is_authenticated => {
                    any_answered = true;
                    provider.health = match health {
                        Ok(health) => health.status,
                        Err(err) => {
                            debug!(
                                provider = %provider.provider,
                                error = %err,
                                "health check failed"
                            );
                            HealthStatus::Unknown
                        }
                    };
                    verified.push(provider);
                }
                Ok(_) => {
                    any_answered = true;
                    debug!(
                        provider = %provider.provider,
                        "CLI provider not authenticated, skipping"
                    );
                }
                Err(err) => {
                    debug!(
                        provider = %provider.provider,
                        error = %err,
                        "auth check failed, skipping"
                    );
                    last_error = Some(err);
                }
            }
        }

        match last_error {
            Some(err) if !any_answered => Err(err),
            _ => Ok(verified),
        }
    }

    async fn api_providers(&self, overall: Instant) -> Result<Vec<ApiProvider>, SourceError> {
        bounded(self.source_deadline(overall), self.api.list_providers()).await
    }
}

/// Run `future` until `deadline`; an overrun is a [`SourceError::TimedOut`].
async fn bounded<T, F>(deadline: Instant, future: F) -> Result<T, SourceError>
where
    F: Future<Output = Result<T, SourceError>>,
{
    let budget = deadline.saturating_duration_since(Instant::now());
    timeout_at(deadline, future)
        .await
        .unwrap_or(Err(SourceError::TimedOut(budget)))
}
