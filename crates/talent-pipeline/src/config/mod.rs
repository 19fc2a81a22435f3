//! Service settings read from the process environment (and `.env` when
//! present). Every value has a local-development default.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_DRAFTS_DIR: &str = ".drafts";

/// Deployment stage, taken from `APP_ENV`. Unrecognised values mean development.
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

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub drafts: DraftsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&var_or("APP_ENV", "development"));

        let port = match env::var("APP_PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_PORT,
        };
        let server = ServerConfig {
            host: var_or("APP_HOST", DEFAULT_HOST),
            port,
        };

        let telemetry = TelemetryConfig {
            log_level: var_or("APP_LOG_LEVEL", DEFAULT_LOG_LEVEL),
        };

        let drafts_dir = var_or("APP_DRAFTS_DIR", DEFAULT_DRAFTS_DIR);
        if drafts_dir.trim().is_empty() {
            return Err(ConfigError::EmptyDraftsDir);
        }

        Ok(Self {
            environment,
            server,
            telemetry,
            drafts: DraftsConfig {
                directory: PathBuf::from(drafts_dir),
            },
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Bind address for the pipeline HTTP API.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost {
                    host: self.host.clone(),
                    source,
                })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Fallback filter for the tracing subscriber when `RUST_LOG` is unset.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Directory holding one JSON file per editor draft.
#[derive(Debug, Clone)]
pub struct DraftsConfig {
    pub directory: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT '{0}' is not a port number")]
    InvalidPort(String),
    #[error("APP_HOST '{host}' is neither 'localhost' nor an IP address")]
    InvalidHost {
        host: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("APP_DRAFTS_DIR is set but blank")]
    EmptyDraftsDir,
}
