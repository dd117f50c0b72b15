//! Client-side composition: one token store shared by the HTTP client and
//! the auth use cases, and the signup flow on top of the signup API.

use std::sync::Arc;

use boulders_app::{Login, Logout, SignupFlow, TokenStore};
use boulders_core::api::ApiBase;
use boulders_core::config::EdgeConfig;
use boulders_core::ports::{ClockPort, SignupApiPort, TokenPersistencePort};
use boulders_infra::{
    ApiClient, CookieTier, FileCookieJar, HttpSignupApi, SessionStorage, SessionStorageTier,
    SystemClock,
};
use tracing::info;

pub struct SignupClient {
    api_base: ApiBase,
    session: SessionStorage,
    tokens: Arc<TokenStore>,
    api: Arc<dyn SignupApiPort>,
    clock: Arc<dyn ClockPort>,
}

impl SignupClient {
    /// `serving_host` is the host the signup pages are served from; it picks
    /// the [`ApiBase`] once for the lifetime of the client.
    pub fn wire(
        serving_host: &str,
        config: &EdgeConfig,
        cookie_jar: FileCookieJar,
    ) -> anyhow::Result<Self> {
        let api_base = ApiBase::resolve(serving_host, &config.client);
        let secure_cookies = !matches!(api_base, ApiBase::SameOrigin { .. });
        info!(?api_base, "signup client wired");

        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);
        let session = SessionStorage::new();
        let tiers: Vec<Arc<dyn TokenPersistencePort>> = vec![
            Arc::new(SessionStorageTier::new(session.clone())),
            Arc::new(CookieTier::new(Arc::new(cookie_jar), secure_cookies)),
        ];
        let tokens = Arc::new(TokenStore::new(tiers, clock.clone()));

        let client = ApiClient::new(api_base.clone(), config.upstream.default_locale.clone())?
            .with_access_tokens(tokens.clone());
        let api: Arc<dyn SignupApiPort> = Arc::new(HttpSignupApi::new(Arc::new(client)));

        Ok(Self {
            api_base,
            session,
            tokens,
            api,
            clock,
        })
    }

    pub fn api_base(&self) -> &ApiBase {
        &self.api_base
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// The ephemeral storage behind the session tier.
    pub fn session(&self) -> &SessionStorage {
        &self.session
    }

    pub fn signup_flow(&self) -> SignupFlow {
        SignupFlow::new(self.api.clone(), self.clock.clone())
    }

    pub fn login(&self) -> Login {
        Login::new(self.api.clone(), self.tokens.clone())
    }

    pub fn logout(&self) -> Logout {
        Logout::new(self.tokens.clone())
    }
}
