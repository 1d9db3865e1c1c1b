use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::coordination::{OverloadConfig, OverloadDetector, ResourceCounts};
use crate::triage::service::DEFAULT_ENRICHMENT_TIMEOUT;

/// Distinguishes runtime behavior for different stages of the service.
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
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let format = env::var("APP_LOG_FORMAT")
            .map(|value| LogFormat::from_str(&value))
            .unwrap_or_default();

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, format },
            engine: EngineConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

/// Output shape of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Tunables for overload detection and explanation enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub overload: OverloadConfig,
    pub capacity: ResourceCounts,
    pub enrichment_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            overload: OverloadConfig::default(),
            capacity: ResourceCounts::DEFAULT_CAPACITY,
            enrichment_timeout: DEFAULT_ENRICHMENT_TIMEOUT,
        }
    }
}

impl EngineConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let overload = OverloadConfig {
            cluster_radius_miles: read_var(
                "CRISIS_CLUSTER_RADIUS_MILES",
                defaults.overload.cluster_radius_miles,
            )?,
            overload_threshold: read_var(
                "CRISIS_OVERLOAD_THRESHOLD",
                defaults.overload.overload_threshold,
            )?,
            critical_overload_threshold: read_var(
                "CRISIS_CRITICAL_OVERLOAD_THRESHOLD",
                defaults.overload.critical_overload_threshold,
            )?,
            ..defaults.overload
        };

        if !(overload.cluster_radius_miles.is_finite() && overload.cluster_radius_miles > 0.0) {
            return Err(ConfigError::InvalidValue {
                variable: "CRISIS_CLUSTER_RADIUS_MILES",
                value: overload.cluster_radius_miles.to_string(),
            });
        }

        let capacity = ResourceCounts {
            ambulance: read_var("CRISIS_CAPACITY_AMBULANCE", defaults.capacity.ambulance)?,
            fire: read_var("CRISIS_CAPACITY_FIRE", defaults.capacity.fire)?,
            police: read_var("CRISIS_CAPACITY_POLICE", defaults.capacity.police)?,
            rescue: read_var("CRISIS_CAPACITY_RESCUE", defaults.capacity.rescue)?,
        };

        let timeout_ms = read_var(
            "CRISIS_ENRICHMENT_TIMEOUT_MS",
            defaults.enrichment_timeout.as_millis() as u64,
        )?;

        Ok(Self {
            overload,
            capacity,
            enrichment_timeout: Duration::from_millis(timeout_ms),
        })
    }

    pub fn overload_detector(&self) -> OverloadDetector {
        OverloadDetector::new(self.overload, self.capacity)
    }
}

fn read_var<T: FromStr>(variable: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(variable) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidValue {
                    variable,
                    value: raw,
                })
        }
        _ => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValue { variable: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { variable, value } => {
                write!(f, "{} has an invalid value '{}'", variable, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidValue { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
