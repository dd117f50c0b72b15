mod handler;

pub use handler::{ProxyError, ProxyRequest, ProxyRequestHandler, ProxyResponse};
