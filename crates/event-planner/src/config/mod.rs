use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::engine::{EngineError, SalienceClassifier, ThresholdConfig, ThresholdStatusClassifier};
use crate::planning::PlannerSettings;

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
    pub planning: PlanningConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            planning: PlanningConfig::load()?,
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Tunable planner thresholds. Everything else uses the planners' defaults.
#[derive(Debug, Clone)]
pub struct PlanningConfig {
    pub thresholds: ThresholdConfig,
    pub salience_threshold: f64,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            salience_threshold: crate::engine::salience::DEFAULT_THRESHOLD,
        }
    }
}

impl PlanningConfig {
    /// Reads `PLANNER_*` overrides and validates them against the engine.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            thresholds: ThresholdConfig {
                alert_ratio: number_var("PLANNER_ALERT_RATIO", defaults.thresholds.alert_ratio)?,
                critical_ratio: number_var(
                    "PLANNER_CRITICAL_RATIO",
                    defaults.thresholds.critical_ratio,
                )?,
                stable_band_pct: number_var(
                    "PLANNER_STABLE_BAND_PCT",
                    defaults.thresholds.stable_band_pct,
                )?,
            },
            salience_threshold: number_var(
                "PLANNER_SALIENCE_THRESHOLD",
                defaults.salience_threshold,
            )?,
        };

        ThresholdStatusClassifier::new(config.thresholds)
            .map_err(|source| ConfigError::InvalidPlanner { source })?;
        SalienceClassifier::new(config.salience_threshold)
            .map_err(|source| ConfigError::InvalidPlanner { source })?;

        Ok(config)
    }

    pub fn planner_settings(&self) -> PlannerSettings {
        let mut settings = PlannerSettings {
            thresholds: self.thresholds,
            ..PlannerSettings::default()
        };
        settings.stakeholders.salience_threshold = self.salience_threshold;
        settings
    }
}

fn number_var(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or(ConfigError::InvalidNumber { name }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { name: &'static str },
    InvalidPlanner { source: EngineError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { name } => write!(f, "{} must be a finite number", name),
            ConfigError::InvalidPlanner { source } => {
                write!(f, "planner settings rejected: {}", source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPlanner { source } => Some(source),
        }
    }
}
