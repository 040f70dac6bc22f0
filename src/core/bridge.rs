//! Bridge to the TypeScript auth CLI that knows which provider credentials are
//! installed locally.

use crate::core::catalog::{
    AuthStatus, AutoDetectResult, CliCredentialSource, CliProvider, ProviderHealth, SourceError,
};
use crate::core::config::data::Config;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Location of the auth CLI inside a RyCode checkout.
const CLI_RELATIVE_PATH: [&str; 5] = ["packages", "rycode", "src", "auth", "cli.ts"];

#[derive(Deserialize)]
struct CliProvidersResponse {
    #[serde(default)]
    providers: Vec<CliProvider>,
}

#[derive(Deserialize)]
struct CliErrorPayload {
    #[serde(default)]
    error: Option<String>,
}

/// Runs `<command> run <project_root>/packages/rycode/src/auth/cli.ts <args>`.
#[derive(Debug, Clone)]
pub struct CliBridge {
    command: String,
    project_root: PathBuf,
    cli_path: PathBuf,
}

impl CliBridge {
    pub fn new(command: impl Into<String>, project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let project_root = std::path::absolute(&project_root).unwrap_or(project_root);
        let cli_path = CLI_RELATIVE_PATH
            .iter()
            .fold(project_root.clone(), |path, part| path.join(part));
        Self {
            command: command.into(),
            project_root,
            cli_path,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.bridge_command(), config.project_root())
    }

    pub fn cli_path(&self) -> &Path {
        &self.cli_path
    }

    /// Run one CLI command and return its stdout. The child is killed if the
    /// returned future is dropped before it finishes.
    async fn run(&self, args: &[&str]) -> Result<Vec<u8>, SourceError> {
        debug!(command = %self.command, cli = %self.cli_path.display(), ?args, "running auth CLI");
        let output = Command::new(&self.command)
            .arg("run")
            .arg(&self.cli_path)
            .args(args)
            .current_dir(&self.project_root)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(command_error(output.status.code(), &output.stderr));
        }
        debug!(bytes = output.stdout.len(), "auth CLI finished");
        Ok(output.stdout)
    }
}

/// Prefer the `error` field of a `{"success":false,"error":...}` payload on
/// stderr, else the raw stderr text.
fn command_error(status: Option<i32>, stderr: &[u8]) -> SourceError {
    let message = serde_json::from_slice::<CliErrorPayload>(stderr)
        .ok()
        .and_then(|payload| payload.error)
        .unwrap_or_else(|| String::from_utf8_lossy(stderr).trim().to_string());
    SourceError::Command { status, message }
}

#[async_trait]
impl CliCredentialSource for CliBridge {
    async fn list_detected_providers(&self) -> Result<Vec<CliProvider>, SourceError> {
        let stdout = self.run(&["cli-providers"]).await?;
        let response: CliProvidersResponse = serde_json::from_slice(&stdout)?;
        Ok(response.providers)
    }

    async fn check_auth_status(&self, provider_id: &str) -> Result<AuthStatus, SourceError> {
        let stdout = self.run(&["check", provider_id]).await?;
        Ok(serde_json::from_slice(&stdout)?)
    }

    async fn provider_health(&self, provider_id: &str) -> Result<ProviderHealth, SourceError> {
        let stdout = self.run(&["health", provider_id]).await?;
        Ok(serde_json::from_slice(&stdout)?)
    }

    async fn auto_detect(&self) -> Result<AutoDetectResult, SourceError> {
        let stdout = self.run(&["auto-detect"]).await?;
        Ok(serde_json::from_slice(&stdout)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_path_is_under_project_root() {
        let bridge = CliBridge::new("bun", "/opt/rycode");
        assert_eq!(
            bridge.cli_path(),
            Path::new("/opt/rycode/packages/rycode/src/auth/cli.ts")
        );
    }

    #[test]
    fn command_error_prefers_json_error_field() {
        let err = command_error(Some(1), br#"{"success":false,"error":"Unknown provider: foo"}"#);
        match err {
            SourceError::Command { status, message } => {
                assert_eq!(status, Some(1));
                assert_eq!(message, "Unknown provider: foo");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = command_error(None, b"  segfault\n");
        assert_eq!(err.to_string(), "auth CLI error: segfault");
    }

    #[cfg(unix)]
    mod process {
        use crate::core::bridge::CliBridge;
        use crate::core::catalog::{CliCredentialSource, HealthStatus, SourceError};
        use tempfile::TempDir;

        /// A `run` script in the project root stands in for `bun run`, so
        /// `sh run <cli.ts> <args>` dispatches on the CLI arguments.
        fn fake_project() -> TempDir {
            let dir = TempDir::new().expect("temp dir");
            let script = r#"
case "$2" in
  cli-providers)
    echo '{"providers":[{"provider":"claude","models":["claude-sonnet-4","claude-haiku"],"source":"claude-cli"},{"provider":"qwen","models":[]}]}'
    ;;
  check)
    if [ "$3" = "claude" ]; then auth=true; else auth=false; fi
    echo "{\"isAuthenticated\":$auth,\"provider\":\"$3\",\"modelsCount\":2}"
    ;;
  health)
    case "$3" in
      claude) echo '{"provider":"claude","status":"healthy","failureCount":0}' ;;
      codex) echo '{"provider":"codex","status":"down","failureCount":5,"nextAttemptAt":"2025-01-01T12:00:00Z"}' ;;
      *) echo "{\"provider\":\"$3\",\"status\":\"half-open\"}" ;;
    esac
    ;;
  auto-detect)
    echo '{"message":"Found 2 credentials","found":2,"credentials":[{"provider":"gemini","count":3},{"provider":"qwen","count":1}]}'
    ;;
  *)
    echo '{"success":false,"error":"Unknown command"}' >&2
    exit 3
    ;;
esac
"#;
            std::fs::write(dir.path().join("run"), script).expect("write script");
            dir
        }

        #[tokio::test]
        async fn lists_detected_providers() {
            let project = fake_project();
            let bridge = CliBridge::new("sh", project.path());
            let providers = bridge
                .list_detected_providers()
                .await
                .expect("providers");
            assert_eq!(providers.len(), 2);
            assert_eq!(providers[0].provider, "claude");
            assert_eq!(providers[0].models, vec!["claude-sonnet-4", "claude-haiku"]);
            assert_eq!(providers[0].source.as_deref(), Some("claude-cli"));
            assert!(providers[1].models.is_empty());
        }

        #[tokio::test]
        async fn checks_auth_status() {
            let project = fake_project();
            let bridge = CliBridge::new("sh", project.path());
            let claude = bridge.check_auth_status("claude").await.expect("status");
            assert!(claude.is_authenticated);
            assert_eq!(claude.models_count, 2);
            let qwen = bridge.check_auth_status("qwen").await.expect("status");
            assert!(!qwen.is_authenticated);
        }

        #[tokio::test]
        async fn reads_provider_health() {
            let project = fake_project();
            let bridge = CliBridge::new("sh", project.path());

            let claude = bridge.provider_health("claude").await.expect("health");
            assert_eq!(claude.status, HealthStatus::Healthy);
            assert_eq!(claude.failure_count, 0);
            assert!(claude.next_attempt_at.is_none());

            let codex = bridge.provider_health("codex").await.expect("health");
            assert_eq!(codex.status, HealthStatus::Down);
            assert_eq!(codex.failure_count, 5);
            assert_eq!(
                codex.next_attempt_at.map(|at| at.to_rfc3339()),
                Some("2025-01-01T12:00:00+00:00".to_string())
            );

            let qwen = bridge.provider_health("qwen").await.expect("health");
            assert_eq!(qwen.status, HealthStatus::Unknown);
        }

        #[tokio::test]
        async fn auto_detect_lists_found_credentials() {
            let project = fake_project();
            let bridge = CliBridge::new("sh", project.path());
            let result = bridge.auto_detect().await.expect("auto-detect");
            assert_eq!(result.found, 2);
            assert_eq!(result.message, "Found 2 credentials");
            assert_eq!(result.credentials[0].provider, "gemini");
            assert_eq!(result.credentials[0].count, 3);
            assert!(result.has_credentials_for("Qwen"));
            assert!(!result.has_credentials_for("claude"));
        }

        #[tokio::test]
        async fn failing_command_reports_stderr_error() {
            let project = fake_project();
            let bridge = CliBridge::new("sh", project.path());
            let err = bridge.run(&["bogus"]).await.expect_err("should fail");
            assert_eq!(
                err.to_string(),
                "auth CLI exited with status 3: Unknown command"
            );
        }

        #[tokio::test]
        async fn missing_runtime_is_an_io_error() {
            let project = fake_project();
            let bridge = CliBridge::new("rycode-definitely-not-installed", project.path());
            let err = bridge
                .list_detected_providers()
                .await
                .expect_err("should fail");
            assert!(matches!(err, SourceError::Io(_)));
        }
    }
}
