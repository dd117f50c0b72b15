use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Edge service configuration, one section per concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub server: ServerSettings,
    pub cors: CorsSettings,
    pub upstream: UpstreamSettings,
    pub client: ClientSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_address: String,
    /// Directory for the rolling log file. Stdout only when unset.
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
    /// Echoed back when the request origin is not recognised.
    pub production_origin: String,
    pub allowed_origins: Vec<String>,
    /// Any `https://*<suffix>` origin is accepted (preview deployments).
    pub preview_domain_suffix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    /// Internal backend; versioned service paths are served under
    /// `<internal_host>/apiserver`.
    pub internal_host: String,
    pub public_api_host: String,
    pub default_locale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub dev_origin: String,
    /// Hosts served from the edge. A leading dot matches any subdomain.
    pub edge_domains: Vec<String>,
    pub proxy_path: String,
    pub direct_api_host: String,
}

impl EdgeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
