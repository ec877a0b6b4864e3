use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration shared by the server, the indexer and every slice.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub sparql: SparqlConfig,
    pub rest: RestConfig,
    pub search: SearchConfig,
    pub pagination: PaginationConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
    /// Scheme and authority used in generated links when running behind a proxy,
    /// e.g. `https://api.example.org`. Without it links follow the request's `Host`.
    pub public_url: Option<String>,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// API key protection. Disabled while `api_key` is unset or blank.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub api_key: Option<String>,
}

impl SecurityConfig {
    /// The configured key, ignoring blank values.
    #[must_use]
    pub fn active_api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }
}

/// Triple store endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SparqlConfig {
    pub endpoint: String,
    pub subscription_key: String,
    pub timeout_secs: u64,
    /// Development escape hatch for endpoints with self-signed certificates.
    pub accept_invalid_certs: bool,
    pub terms_count_ttl_secs: u64,
}

/// Upstream REST APIs (committees).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    /// Replaces each resource's built-in base URL (staging upstreams, local mocks).
    pub base_url: Option<String>,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub list_ttl_secs: u64,
    pub item_ttl_secs: u64,
    pub cache_capacity: u64,
}

/// Elasticsearch cluster used by search and the indexer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub url: String,
    pub index: String,
    pub timeout_secs: u64,
}

/// Page size limits for `/api/v1` list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_per_page: u64,
    pub max_per_page: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Enables rolling file output into this directory.
    pub directory: Option<PathBuf>,
    /// JSON lines for the file output.
    pub json: bool,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 3000, ssl: None, public_url: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for SparqlConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://data-services.parliament.uk/sparql".to_owned(),
            subscription_key: String::new(),
            timeout_secs: 30,
            accept_invalid_certs: false,
            terms_count_ttl_secs: 3600,
        }
    }
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
            list_ttl_secs: 300,
            item_ttl_secs: 900,
            cache_capacity: 10_000,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_owned(),
            index: "parliament_resources".to_owned(),
            timeout_secs: 30,
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { default_per_page: 20, max_per_page: 250 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), directory: None, json: false }
    }
}
