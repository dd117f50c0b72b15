use std::sync::Arc;

use boulders_core::ports::{SignupApiError, SignupApiPort};
use tracing::{info, info_span, Instrument};

use super::TokenStore;

/// Sign a member in and store the granted credentials.
pub struct Login {
    api: Arc<dyn SignupApiPort>,
    tokens: Arc<TokenStore>,
}

impl Login {
    pub fn new(api: Arc<dyn SignupApiPort>, tokens: Arc<TokenStore>) -> Self {
        Self { api, tokens }
    }

    pub async fn execute(&self, email: &str, password: &str) -> Result<(), SignupApiError> {
        let span = info_span!("usecase.login.execute");

        async {
            let grant = self.api.login(email.trim(), password).await?;
            self.tokens.save_record(grant.into());
            info!("member signed in");
            Ok(())
        }
        .instrument(span)
        .await
    }
}
