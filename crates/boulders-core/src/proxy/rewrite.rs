use serde::Serialize;

use crate::config::UpstreamSettings;

const VERSIONED_SERVICES_PREFIX: &str = "/api/ver3/services/";
const SERVICES_PREFIX: &str = "/services/";
const VERSION_PREFIX: &str = "/ver3/";
const INTERNAL_ROOT: &str = "/apiserver";

/// The same logical service is published under three path conventions;
/// all of them land on the internal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamRoute {
    /// `/api/ver3/services/..` forwarded verbatim.
    InternalVersioned,
    /// `/services/..` with `/api/ver3` re-inserted.
    InternalServices,
    /// `/ver3/..` with `/api` re-inserted.
    InternalVersion,
    Public,
}

pub fn route_for(path: &str) -> UpstreamRoute {
    if path.starts_with(VERSIONED_SERVICES_PREFIX) {
        UpstreamRoute::InternalVersioned
    } else if path.starts_with(SERVICES_PREFIX) {
        UpstreamRoute::InternalServices
    } else if path.starts_with(VERSION_PREFIX) {
        UpstreamRoute::InternalVersion
    } else {
        UpstreamRoute::Public
    }
}

pub fn upstream_url(path: &str, settings: &UpstreamSettings) -> String {
    let internal = format!(
        "{}{INTERNAL_ROOT}",
        settings.internal_host.trim_end_matches('/')
    );
    match route_for(path) {
        UpstreamRoute::InternalVersioned => format!("{internal}{path}"),
        UpstreamRoute::InternalServices => format!("{internal}/api/ver3{path}"),
        UpstreamRoute::InternalVersion => format!("{internal}/api{path}"),
        UpstreamRoute::Public => format!(
            "{}{path}",
            settings.public_api_host.trim_end_matches('/')
        ),
    }
}
