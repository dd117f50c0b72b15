use url::Url;

use crate::config::CorsSettings;

pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization, Accept-Language";

/// Origin to echo in `Access-Control-Allow-Origin`.
///
/// Exact allow-list match, then any https origin under the preview suffix,
/// otherwise the production origin. Unknown origins are never rejected.
pub fn resolve_allowed_origin(origin: Option<&str>, settings: &CorsSettings) -> String {
    let Some(origin) = origin.map(str::trim).filter(|o| !o.is_empty()) else {
        return settings.production_origin.clone();
    };

    if settings.allowed_origins.iter().any(|allowed| allowed == origin) {
        return origin.to_string();
    }

    if is_preview_origin(origin, &settings.preview_domain_suffix) {
        return origin.to_string();
    }

    settings.production_origin.clone()
}

fn is_preview_origin(origin: &str, suffix: &str) -> bool {
    let suffix = suffix.trim().trim_start_matches('.');
    if suffix.is_empty() {
        return false;
    }
    match Url::parse(origin) {
        Ok(url) if url.scheme() == "https" => url
            .host_str()
            .is_some_and(|host| host.ends_with(&format!(".{suffix}"))),
        _ => false,
    }
}

pub fn cors_headers(allowed_origin: &str) -> Vec<(&'static str, String)> {
    vec![
        ("access-control-allow-origin", allowed_origin.to_string()),
        ("access-control-allow-methods", ALLOW_METHODS.to_string()),
        ("access-control-allow-headers", ALLOW_HEADERS.to_string()),
    ]
}

pub fn security_headers() -> Vec<(&'static str, String)> {
    vec![
        ("x-content-type-options", "nosniff".to_string()),
        ("x-frame-options", "DENY".to_string()),
        (
            "referrer-policy",
            "strict-origin-when-cross-origin".to_string(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> CorsSettings {
        CorsSettings::default()
    }

    #[test]
    fn allow_listed_origin_is_echoed() {
        assert_eq!(
            resolve_allowed_origin(Some("http://localhost:5173"), &settings()),
            "http://localhost:5173"
        );
    }

    #[test]
    fn preview_deployment_origin_is_echoed() {
        let origin = "https://deploy-preview-7--boulders.netlify.app";
        assert_eq!(resolve_allowed_origin(Some(origin), &settings()), origin);
    }

    #[test]
    fn plain_http_preview_origin_falls_back() {
        assert_eq!(
            resolve_allowed_origin(Some("http://x.netlify.app"), &settings()),
            settings().production_origin
        );
    }

    #[test]
    fn unknown_or_missing_origin_falls_back_to_production() {
        assert_eq!(
            resolve_allowed_origin(Some("https://evil.example"), &settings()),
            settings().production_origin
        );
        assert_eq!(
            resolve_allowed_origin(Some("https://netlify.app.evil.example"), &settings()),
            settings().production_origin
        );
        assert_eq!(resolve_allowed_origin(None, &settings()), settings().production_origin);
    }
}
