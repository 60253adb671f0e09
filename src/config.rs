//! Application-level configuration: webhook target, sync mode, fallback interval and retry
//! policy.

use std::{env, fs, io::ErrorKind, path::PathBuf, str::FromStr, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SCOREBOARD_SYNC_CONFIG_PATH";
const DEFAULT_WEBHOOK_URL: &str = "http://localhost:5000";
const DEFAULT_SYNC_INTERVAL_SECS: u64 = 120;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Which edits the trigger coordinator reacts to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Apply toggles and ticket recomputation, then publish.
    #[default]
    Ledger,
    /// Only republish when a balance or ticket output cell is edited directly.
    Mirror,
}

/// Error returned when parsing a [`SyncMode`] from text.
#[derive(Debug, Error)]
#[error("unknown sync mode `{0}` (expected `ledger` or `mirror`)")]
pub struct UnknownSyncMode(String);

impl FromStr for SyncMode {
    type Err = UnknownSyncMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ledger" => Ok(SyncMode::Ledger),
            "mirror" => Ok(SyncMode::Mirror),
            _ => Err(UnknownSyncMode(s.to_string())),
        }
    }
}

/// Bounded retry with exponential backoff applied to each webhook delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one; 1 disables retries.
    pub max_attempts: u32,
    /// Wait before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound for any single wait.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Single attempt, failures wait for the next trigger.
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay to wait after the failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Base URL of the dashboard receiving the webhooks.
    pub webhook_base_url: String,
    /// Identifier of the workbook being mirrored; informational only.
    pub spreadsheet_id: String,
    pub mode: SyncMode,
    /// Period of the fallback full sync.
    pub sync_interval: Duration,
    /// Per-request timeout for webhook calls.
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    /// Optional JSON workbook loaded at startup.
    pub seed_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to built-in defaults, then apply
    /// environment overrides.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        mode = ?app_config.mode,
                        "loaded sync configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        config.with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(url) = non_empty_env("WEBHOOK_URL") {
            self.webhook_base_url = url;
        }
        if let Some(id) = non_empty_env("SHEET_ID") {
            self.spreadsheet_id = id;
        }
        if let Some(mode) = non_empty_env("SYNC_MODE") {
            match mode.parse() {
                Ok(mode) => self.mode = mode,
                Err(err) => warn!(error = %err, "ignoring SYNC_MODE override"),
            }
        }
        if let Some(path) = non_empty_env("SEED_PATH") {
            self.seed_path = Some(PathBuf::from(path));
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    webhook_base_url: String,
    spreadsheet_id: String,
    mode: SyncMode,
    sync_interval_secs: u64,
    request_timeout_ms: u64,
    retry: RawRetry,
    seed_path: Option<PathBuf>,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            webhook_base_url: DEFAULT_WEBHOOK_URL.into(),
            spreadsheet_id: String::new(),
            mode: SyncMode::default(),
            sync_interval_secs: DEFAULT_SYNC_INTERVAL_SECS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            retry: RawRetry::default(),
            seed_path: None,
        }
    }
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            webhook_base_url: value.webhook_base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: value.spreadsheet_id,
            mode: value.mode,
            sync_interval: Duration::from_secs(value.sync_interval_secs.max(1)),
            request_timeout: Duration::from_millis(value.request_timeout_ms.max(1)),
            retry: value.retry.into(),
            seed_path: value.seed_path,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
/// JSON representation of the retry section.
struct RawRetry {
    max_attempts: u32,
    initial_delay_ms: u64,
    max_delay_ms: u64,
}

impl Default for RawRetry {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            initial_delay_ms: policy.initial_delay.as_millis() as u64,
            max_delay_ms: policy.max_delay.as_millis() as u64,
        }
    }
}

impl From<RawRetry> for RetryPolicy {
    fn from(value: RawRetry) -> Self {
        Self {
            max_attempts: value.max_attempts.max(1),
            initial_delay: Duration::from_millis(value.initial_delay_ms),
            max_delay: Duration::from_millis(value.max_delay_ms),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let raw: RawConfig = serde_json::from_str(
            r#"{ "webhook_base_url": "https://scores.example/", "mode": "mirror", "retry": { "max_attempts": 0 } }"#,
        )
        .unwrap();
        let config = AppConfig::from(raw);

        assert_eq!(config.webhook_base_url, "https://scores.example");
        assert_eq!(config.mode, SyncMode::Mirror);
        assert_eq!(config.sync_interval, Duration::from_secs(120));
        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.retry.initial_delay, Duration::from_millis(500));
    }

    #[test]
    fn sync_mode_parses_case_insensitively() {
        assert_eq!("Ledger".parse::<SyncMode>().unwrap(), SyncMode::Ledger);
        assert_eq!(" mirror ".parse::<SyncMode>().unwrap(), SyncMode::Mirror);
        assert!("basic".parse::<SyncMode>().is_err());
    }

    #[test]
    fn backoff_doubles_up_to_the_cap() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(1),
        };
        assert_eq!(policy.delay_after(1), Duration::from_millis(500));
        assert_eq!(policy.delay_after(2), Duration::from_secs(1));
        assert_eq!(policy.delay_after(4), Duration::from_secs(1));
    }
}
