//! Conversion between axum requests and the framework-agnostic proxy handler.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::{ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use boulders_app::{ProxyRequest, ProxyRequestHandler, ProxyResponse};
use tracing::warn;
use url::form_urlencoded;

pub(super) async fn proxy(
    State(handler): State<Arc<ProxyRequestHandler>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = ProxyRequest {
        method: method.as_str().to_string(),
        origin: header_text(&headers, &ORIGIN),
        path: path_param(&uri),
        accept_language: header_text(&headers, &ACCEPT_LANGUAGE),
        authorization: header_text(&headers, &AUTHORIZATION),
        body: (!body.is_empty()).then(|| body.to_vec()),
    };
    into_response(handler.handle(request).await)
}

fn header_text(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// URL-decoded `path` query parameter.
fn path_param(uri: &Uri) -> Option<String> {
    let query = uri.query()?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "path")
        .map(|(_, value)| value.into_owned())
}

fn into_response(proxied: ProxyResponse) -> Response {
    let status = StatusCode::from_u16(proxied.status).unwrap_or(StatusCode::BAD_GATEWAY);

    let mut response = match proxied.body {
        Some(body) => {
            let mut response = Response::new(Body::from(body.to_string()));
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            response
        }
        None => Response::new(Body::empty()),
    };
    *response.status_mut() = status;

    for (name, value) in proxied.headers {
        match HeaderValue::from_str(&value) {
            Ok(value) => {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(name), value);
            }
            Err(_) => warn!(header = name, "dropping response header with invalid value"),
        }
    }
    response.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_param_is_url_decoded() {
        let uri: Uri = "/api/proxy?lang=da&path=%2Fapi%2Fproducts%2Faddons%3Fgym%3D1"
            .parse()
            .unwrap();
        assert_eq!(
            path_param(&uri).as_deref(),
            Some("/api/products/addons?gym=1")
        );
    }

    #[test]
    fn missing_query_means_no_path() {
        let uri: Uri = "/api/proxy".parse().unwrap();
        assert_eq!(path_param(&uri), None);
    }

    #[test]
    fn preflight_response_has_no_body() {
        let response = into_response(ProxyResponse {
            status: 200,
            headers: vec![("access-control-allow-origin", "https://join.boulders.dk".into())],
            body: None,
        });
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(CONTENT_TYPE).is_none());
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "https://join.boulders.dk"
        );
    }
}
