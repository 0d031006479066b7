use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::registration::UnreachablePolicy;

pub const DEFAULT_API_BASE_URL: &str = "https://api.festivaldamusicagospelparaense.com";

const DEFAULT_SUBMIT_TIMEOUT_MS: u64 = 8_000;
const DEFAULT_CITIES_TIMEOUT_MS: u64 = 3_000;

/// Distinguishes runtime behavior for different stages of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Only development builds may pretend an unreachable backend accepted a submission.
    pub fn default_unreachable_policy(self) -> UnreachablePolicy {
        match self {
            Self::Development => UnreachablePolicy::Lenient,
            Self::Test | Self::Production => UnreachablePolicy::Strict,
        }
    }
}

/// Top-level configuration for the registration client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub api: ApiConfig,
    pub voting: VotingConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("FESTIVAL_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url = env::var("FESTIVAL_API_BASE_URL")
            .ok()
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        if !is_http_url(&base_url) {
            return Err(ConfigError::InvalidBaseUrl(base_url));
        }

        let app_version = env::var("FESTIVAL_APP_VERSION").unwrap_or_else(|_| "1".to_string());

        let submit_timeout = millis_var("FESTIVAL_SUBMIT_TIMEOUT_MS", DEFAULT_SUBMIT_TIMEOUT_MS)?;
        let cities_timeout = millis_var("FESTIVAL_CITIES_TIMEOUT_MS", DEFAULT_CITIES_TIMEOUT_MS)?;

        let unreachable_policy = match env::var("FESTIVAL_UNREACHABLE_POLICY") {
            Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "strict" => UnreachablePolicy::Strict,
                "lenient" => UnreachablePolicy::Lenient,
                _ => return Err(ConfigError::InvalidUnreachablePolicy(raw)),
            },
            Err(_) => environment.default_unreachable_policy(),
        };

        let schedule_path = env::var("FESTIVAL_VOTING_SCHEDULE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let log_level = env::var("FESTIVAL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            api: ApiConfig {
                base_url,
                app_version,
                submit_timeout,
                cities_timeout,
                unreachable_policy,
            },
            voting: VotingConfig { schedule_path },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// True for absolute `http`/`https` URLs that name a host.
pub(crate) fn is_http_url(raw: &str) -> bool {
    match reqwest::Url::parse(raw) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}

fn millis_var(key: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|value| *value > 0)
            .map(Duration::from_millis)
            .ok_or(ConfigError::InvalidTimeout { key }),
        Err(_) => Ok(Duration::from_millis(default)),
    }
}

/// Backend service settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub app_version: String,
    pub submit_timeout: Duration,
    pub cities_timeout: Duration,
    pub unreachable_policy: UnreachablePolicy,
}

/// Where the voting schedule artifact lives; `None` uses the built-in table.
#[derive(Debug, Clone)]
pub struct VotingConfig {
    pub schedule_path: Option<PathBuf>,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidBaseUrl(String),
    InvalidTimeout { key: &'static str },
    InvalidUnreachablePolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBaseUrl(value) => write!(
                f,
                "FESTIVAL_API_BASE_URL must be an http(s) URL, got '{}'",
                value
            ),
            ConfigError::InvalidTimeout { key } => {
                write!(f, "{} must be a positive number of milliseconds", key)
            }
            ConfigError::InvalidUnreachablePolicy(value) => write!(
                f,
                "FESTIVAL_UNREACHABLE_POLICY must be 'strict' or 'lenient', got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
