use std::sync::Arc;

use tracing::info;

use super::TokenStore;

/// Sign the member out everywhere the credentials were persisted.
pub struct Logout {
    tokens: Arc<TokenStore>,
}

impl Logout {
    pub fn new(tokens: Arc<TokenStore>) -> Self {
        Self { tokens }
    }

    #[tracing::instrument(name = "usecase.logout.execute", skip(self))]
    pub fn execute(&self) {
        self.tokens.clear_tokens();
        info!("member signed out");
    }
}
