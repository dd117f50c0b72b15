//! axum surface of the edge proxy.

mod proxy_route;

use std::sync::Arc;

use axum::routing::{any, get};
use axum::{Json, Router};
use boulders_app::ProxyRequestHandler;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

pub const PROXY_ROUTE: &str = "/api/proxy";
pub const HEALTH_ROUTE: &str = "/healthz";

pub fn build_router(handler: Arc<ProxyRequestHandler>) -> Router {
    Router::new()
        .route(PROXY_ROUTE, any(proxy_route::proxy))
        .route(HEALTH_ROUTE, get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(handler)
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
