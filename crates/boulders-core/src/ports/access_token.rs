/// Capability handed to the HTTP client: "give me the current access token".
pub trait AccessTokenPort: Send + Sync {
    fn access_token(&self) -> Option<String>;
}
