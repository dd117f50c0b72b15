use serde::Serialize;
use url::form_urlencoded;

use crate::config::ClientSettings;

const LOCAL_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

/// Where API requests are sent, decided once at start-up from the host the
/// application is served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ApiBase {
    /// Local development: the dev server forwards relative paths itself.
    SameOrigin { origin: String },
    /// Edge-hosted deployment: every call goes through the edge proxy with
    /// the upstream path in the `path` query parameter.
    Proxy { endpoint: String },
    /// Anything else talks to the public API host directly.
    Direct { host: String },
}

impl ApiBase {
    /// `host` is the serving host, optionally with a port.
    pub fn resolve(host: &str, settings: &ClientSettings) -> Self {
        let hostname = strip_port(host.trim()).to_ascii_lowercase();

        if LOCAL_HOSTS.contains(&hostname.as_str()) {
            return ApiBase::SameOrigin {
                origin: settings.dev_origin.trim_end_matches('/').to_string(),
            };
        }

        if settings
            .edge_domains
            .iter()
            .any(|domain| domain_matches(&hostname, domain))
        {
            return ApiBase::Proxy {
                endpoint: format!(
                    "https://{}/{}",
                    host.trim(),
                    settings.proxy_path.trim_start_matches('/')
                ),
            };
        }

        ApiBase::Direct {
            host: settings.direct_api_host.trim_end_matches('/').to_string(),
        }
    }

    /// Full URL for an upstream API path such as `/api/products/addons`.
    pub fn url_for(&self, path: &str) -> String {
        match self {
            ApiBase::SameOrigin { origin } => format!("{origin}{}", ensure_leading_slash(path)),
            ApiBase::Direct { host } => format!("{host}{}", ensure_leading_slash(path)),
            ApiBase::Proxy { endpoint } => {
                let encoded: String =
                    form_urlencoded::byte_serialize(ensure_leading_slash(path).as_bytes()).collect();
                format!("{endpoint}?path={encoded}")
            }
        }
    }
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        // IPv6 literal, keep the brackets
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    host.split(':').next().unwrap_or(host)
}

/// `.example.app` matches any subdomain, anything else matches exactly.
fn domain_matches(hostname: &str, domain: &str) -> bool {
    let domain = domain.trim().to_ascii_lowercase();
    match domain.strip_prefix('.') {
        Some(suffix) => hostname.ends_with(&format!(".{suffix}")),
        None => hostname == domain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ClientSettings {
        ClientSettings::default()
    }

    #[test]
    fn localhost_uses_same_origin() {
        let base = ApiBase::resolve("localhost:5173", &settings());
        assert_eq!(
            base,
            ApiBase::SameOrigin {
                origin: settings().dev_origin
            }
        );
        assert!(matches!(
            ApiBase::resolve("[::1]:8080", &settings()),
            ApiBase::SameOrigin { .. }
        ));
    }

    #[test]
    fn edge_domain_routes_through_proxy() {
        let base = ApiBase::resolve("deploy-preview-12--boulders.netlify.app", &settings());
        assert_eq!(
            base.url_for("/api/ver3/services/x?y=1"),
            "https://deploy-preview-12--boulders.netlify.app/api/proxy?path=%2Fapi%2Fver3%2Fservices%2Fx%3Fy%3D1"
        );
    }

    #[test]
    fn unknown_host_calls_upstream_directly() {
        let base = ApiBase::resolve("members.example.org", &settings());
        assert_eq!(
            base.url_for("api/products/addons"),
            format!("{}/api/products/addons", settings().direct_api_host)
        );
    }

    #[test]
    fn suffix_does_not_match_lookalike_domains() {
        assert!(!domain_matches("evilnetlify.app", ".netlify.app"));
        assert!(domain_matches("x.netlify.app", ".netlify.app"));
        assert!(domain_matches("join.boulders.dk", "join.boulders.dk"));
    }
}
