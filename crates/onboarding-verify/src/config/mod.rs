use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

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
    pub sources: SourcesConfig,
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
            sources: SourcesConfig::from_env()?,
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
}

/// Endpoints and credentials for the external verification sources.
#[derive(Clone)]
pub struct SourcesConfig {
    pub dns_resolver_url: String,
    pub phone_validation_url: String,
    pub phone_api_key: Option<String>,
    pub geocoder_url: String,
    pub registry_url: String,
    pub registry_jurisdiction: String,
    pub user_agent: String,
    /// Upper bound on each check's network call.
    pub check_timeout: Duration,
}

impl SourcesConfig {
    pub const DEFAULT_TIMEOUT_MS: u64 = 8_000;

    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let check_timeout = match env::var("VERIFY_TIMEOUT_MS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(millis) if millis > 0 => Duration::from_millis(millis),
                _ => return Err(ConfigError::InvalidTimeout { value: raw }),
            },
            Err(_) => defaults.check_timeout,
        };

        let phone_api_key = env::var("VERIFY_PHONE_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(Self {
            dns_resolver_url: env::var("VERIFY_DNS_URL").unwrap_or(defaults.dns_resolver_url),
            phone_validation_url: env::var("VERIFY_PHONE_URL")
                .unwrap_or(defaults.phone_validation_url),
            phone_api_key,
            geocoder_url: env::var("VERIFY_GEOCODER_URL").unwrap_or(defaults.geocoder_url),
            registry_url: env::var("VERIFY_REGISTRY_URL").unwrap_or(defaults.registry_url),
            registry_jurisdiction: env::var("VERIFY_REGISTRY_JURISDICTION")
                .unwrap_or(defaults.registry_jurisdiction),
            user_agent: env::var("VERIFY_USER_AGENT").unwrap_or(defaults.user_agent),
            check_timeout,
        })
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            dns_resolver_url: "https://dns.google/resolve".to_string(),
            phone_validation_url: "https://phonevalidation.abstractapi.com/v1/".to_string(),
            phone_api_key: None,
            geocoder_url: "https://nominatim.openstreetmap.org/search".to_string(),
            registry_url: "https://api.opencorporates.com/v0.4/companies/search".to_string(),
            registry_jurisdiction: "us".to_string(),
            user_agent: "VendorOnboarding/1.0".to_string(),
            check_timeout: Duration::from_millis(Self::DEFAULT_TIMEOUT_MS),
        }
    }
}

// The API key never reaches logs.
impl fmt::Debug for SourcesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourcesConfig")
            .field("dns_resolver_url", &self.dns_resolver_url)
            .field("phone_validation_url", &self.phone_validation_url)
            .field("phone_api_key", &self.phone_api_key.as_ref().map(|_| "<redacted>"))
            .field("geocoder_url", &self.geocoder_url)
            .field("registry_url", &self.registry_url)
            .field("registry_jurisdiction", &self.registry_jurisdiction)
            .field("user_agent", &self.user_agent)
            .field("check_timeout", &self.check_timeout)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout { value } => write!(
                f,
                "VERIFY_TIMEOUT_MS must be a positive number of milliseconds (got '{}')",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidTimeout { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
