use super::model::*;

pub const DEFAULT_PRODUCTION_ORIGIN: &str = "https://join.boulders.dk";
pub const DEFAULT_LOCALE: &str = "da-DK";

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8787".to_string(),
            log_dir: None,
        }
    }
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            production_origin: DEFAULT_PRODUCTION_ORIGIN.to_string(),
            allowed_origins: vec![
                DEFAULT_PRODUCTION_ORIGIN.to_string(),
                "https://boulders.dk".to_string(),
                "https://www.boulders.dk".to_string(),
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
            preview_domain_suffix: ".netlify.app".to_string(),
        }
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            internal_host: "https://boulders.brpsystems.com".to_string(),
            public_api_host: "https://api-join.boulders.dk".to_string(),
            default_locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            dev_origin: "http://localhost:5173".to_string(),
            edge_domains: vec![".netlify.app".to_string(), "join.boulders.dk".to_string()],
            proxy_path: "/api/proxy".to_string(),
            direct_api_host: "https://api-join.boulders.dk".to_string(),
        }
    }
}
