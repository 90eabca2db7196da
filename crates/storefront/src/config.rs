//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Catalog (one of)
//! - `SANITY_PROJECT_ID` + `SANITY_DATASET` - Sanity project serving the catalog
//! - `STOREFRONT_CATALOG_FILE` - JSON file of product records (offline/dev)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `STOREFRONT_DATA_DIR` - Directory for visitor carts/wishlists (default: ./data)
//! - `STOREFRONT_PAGE_SIZE` - Products per listing page (default: 9)
//! - `SANITY_API_VERSION` - Query API version (default: 2021-08-31)
//! - `SANITY_USE_CDN` - Query the API CDN (default: false)
//! - `SANITY_API_TOKEN` - Read token for private datasets
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `STOREFRONT_LOG_JSON` - Emit JSON log lines (default: false)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

use stride_core::pagination::DEFAULT_PAGE_SIZE;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Root directory for per-visitor cart and wishlist files
    pub data_dir: PathBuf,
    /// Products per listing page
    pub page_size: usize,
    /// Where products come from
    pub catalog: CatalogConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., production, staging)
    pub sentry_environment: Option<String>,
    /// Emit structured JSON logs instead of human-readable text
    pub log_json: bool,
}

/// Product catalog source.
#[derive(Debug, Clone)]
pub enum CatalogConfig {
    /// Query a Sanity dataset over HTTP.
    Sanity(SanityConfig),
    /// Read product records from a local JSON file.
    File(PathBuf),
}

/// Sanity content API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct SanityConfig {
    /// Project ID (subdomain of api.sanity.io)
    pub project_id: String,
    /// Dataset name (e.g., production)
    pub dataset: String,
    /// Dated API version (e.g., 2021-08-31)
    pub api_version: String,
    /// Query the edge-cached API instead of the live one
    pub use_cdn: bool,
    /// Read token for private datasets
    pub token: Option<SecretString>,
}

impl std::fmt::Debug for SanityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("use_cdn", &self.use_cdn)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl SanityConfig {
    /// Base URL of the GROQ query endpoint for this dataset.
    #[must_use]
    pub fn query_endpoint(&self) -> String {
        let host = if self.use_cdn {
            "apicdn.sanity.io"
        } else {
            "api.sanity.io"
        };
        format!(
            "https://{}.{host}/v{}/data/query/{}",
            self.project_id, self.api_version, self.dataset
        )
    }

    fn from_env() -> Result<Self, ConfigError> {
        let use_cdn = parse_bool("SANITY_USE_CDN", &get_env_or_default("SANITY_USE_CDN", "false"))?;
        let token = match get_optional_env("SANITY_API_TOKEN") {
            Some(value) => {
                validate_secret_strength(&value, "SANITY_API_TOKEN")?;
                Some(SecretString::from(value))
            }
            None => None,
        };

        Ok(Self {
            project_id: get_required_env("SANITY_PROJECT_ID")?,
            dataset: get_required_env("SANITY_DATASET")?,
            api_version: get_env_or_default("SANITY_API_VERSION", "2021-08-31"),
            use_cdn,
            token,
        })
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the Sanity token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let page_size = parse_page_size(&get_env_or_default(
            "STOREFRONT_PAGE_SIZE",
            &DEFAULT_PAGE_SIZE.to_string(),
        ))?;

        let log_json = parse_bool(
            "STOREFRONT_LOG_JSON",
            &get_env_or_default("STOREFRONT_LOG_JSON", "false"),
        )?;

        let catalog = match get_optional_env("STOREFRONT_CATALOG_FILE") {
            Some(path) => CatalogConfig::File(PathBuf::from(path)),
            None => CatalogConfig::Sanity(SanityConfig::from_env()?),
        };

        Ok(Self {
            host,
            port,
            base_url: get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000"),
            data_dir: PathBuf::from(get_env_or_default("STOREFRONT_DATA_DIR", "./data")),
            page_size,
            catalog,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            log_json,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

fn parse_page_size(value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        Ok(_) => Err(ConfigError::InvalidEnvVar(
            "STOREFRONT_PAGE_SIZE".to_string(),
            "must be at least 1".to_string(),
        )),
        Err(e) => Err(ConfigError::InvalidEnvVar(
            "STOREFRONT_PAGE_SIZE".to_string(),
            e.to_string(),
        )),
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Copy the token from the Sanity dashboard."
            ),
        ));
    }

    Ok(())
}
