//! Unified provider/model catalog built from CLI-detected credentials and
//! API-configured providers.

pub mod fetch;
pub mod merge;


use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

pub use fetch::ProviderCatalog;
pub use merge::{find_model, find_provider, format_model_name, merge_catalog};

/// Rough price bracket of a model, from its input cost per million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    Free,
    Low,
    Standard,
    Premium,
}

impl CostTier {
    pub fn from_input_cost(cost_per_million: f64) -> Self {
        if cost_per_million <= 0.0 {
            CostTier::Free
        } else if cost_per_million <= 1.0 {
            CostTier::Low
        } else if cost_per_million <= 5.0 {
            CostTier::Standard
        } else {
            CostTier::Premium
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CostTier::Free => "free",
            CostTier::Low => "low",
            CostTier::Standard => "standard",
            CostTier::Premium => "premium",
        }
    }
}

impl fmt::Display for CostTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Circuit-breaker state the auth CLI reports for a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Down,
    #[default]
    #[serde(other)]
    Unknown,
}

impl HealthStatus {
    /// Marker shown next to a provider name; nothing when health is unknown.
    pub fn indicator(self) -> Option<&'static str> {
        match self {
            HealthStatus::Healthy => Some("✓"),
            HealthStatus::Degraded => Some("⚠"),
            HealthStatus::Down => Some("✗"),
            HealthStatus::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub context_window: Option<u64>,
    pub cost_tier: Option<CostTier>,
}

/// A provider in the merged catalog. Model IDs are unique per provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogProvider {
    pub id: String,
    pub display_name: String,
    pub models: BTreeMap<String, ModelInfo>,
    pub health: HealthStatus,
}

/// A provider detected through local CLI tool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CliProvider {
    pub provider: String,
    #[serde(default)]
    pub models: Vec<String>,
    /// Where the credential was found (e.g. "claude-cli")
    #[serde(default)]
    pub source: Option<String>,
    /// Filled in from the health check, never part of the CLI listing
    #[serde(skip)]
    pub health: HealthStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub is_authenticated: bool,
    pub provider: String,
    #[serde(default)]
    pub models_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderHealth {
    pub provider: String,
    pub status: HealthStatus,
    #[serde(default)]
    pub failure_count: u32,
    /// When an open circuit will next let a request through
    #[serde(default)]
    pub next_attempt_at: Option<DateTime<Utc>>,
}

/// Credentials the auth CLI found in well-known locations for one provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DetectedCredential {
    pub provider: String,
    #[serde(default)]
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AutoDetectResult {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub found: usize,
    #[serde(default)]
    pub credentials: Vec<DetectedCredential>,
}

impl AutoDetectResult {
    pub fn has_credentials_for(&self, provider_id: &str) -> bool {
        self.credentials
            .iter()
            .any(|c| c.provider.eq_ignore_ascii_case(provider_id))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiModel {
    pub id: String,
    pub name: Option<String>,
    pub context_window: Option<u64>,
    pub cost_tier: Option<CostTier>,
}

/// A provider configured on the API server.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiProvider {
    pub id: String,
    pub display_name: String,
    pub models: Vec<ApiModel>,
}

/// Provider credentials discovered from locally installed CLI tools.
#[async_trait]
pub trait CliCredentialSource: Send + Sync {
    async fn list_detected_providers(&self) -> Result<Vec<CliProvider>, SourceError>;

    async fn check_auth_status(&self, provider_id: &str) -> Result<AuthStatus, SourceError>;

    async fn provider_health(&self, provider_id: &str) -> Result<ProviderHealth, SourceError>;

    /// Scan well-known locations for credentials the user has not registered yet.
    async fn auto_detect(&self) -> Result<AutoDetectResult, SourceError>;
}

/// Providers configured on the API server.
#[async_trait]
pub trait ApiProviderSource: Send + Sync {
    async fn list_providers(&self) -> Result<Vec<ApiProvider>, SourceError>;
}

/// A catalog source failed or did not answer in time.
#[derive(Debug)]
pub enum SourceError {
    TimedOut(Duration),
    Io(std::io::Error),
    /// The auth CLI exited unsuccessfully
    Command {
        status: Option<i32>,
        message: String,
    },
    Http(reqwest::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::TimedOut(after) => write!(f, "timed out after {}ms", after.as_millis()),
            SourceError::Io(err) => write!(f, "failed to run auth CLI: {err}"),
            SourceError::Command {
                status: Some(code),
                message,
            } => write!(f, "auth CLI exited with status {code}: {message}"),
            SourceError::Command {
                status: None,
                message,
            } => write!(f, "auth CLI error: {message}"),
            SourceError::Http(err) => write!(f, "provider request failed: {err}"),
            SourceError::Parse(err) => write!(f, "failed to parse response: {err}"),
        }
    }
}

impl StdError for SourceError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            SourceError::Io(err) => Some(err),
            SourceError::Http(err) => Some(err),
            SourceError::Parse(err) => Some(err),
            SourceError::TimedOut(_) | SourceError::Command { .. } => None,
        }
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Io(err)
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Http(err)
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(err)
    }
}

#[derive(Debug)]
pub enum CatalogError {
    /// Both sources failed; there is no partial result.
    SourcesUnavailable { cli: SourceError, api: SourceError },
    Cancelled,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::SourcesUnavailable { cli, api } => write!(
                f,
                "no provider source available (cli: {cli}; api: {api})"
            ),
            CatalogError::Cancelled => write!(f, "provider catalog request cancelled"),
        }
    }
}

impl StdError for CatalogError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CatalogError::SourcesUnavailable { api, .. } => Some(api),
            CatalogError::Cancelled => None,
        }
    }
}
