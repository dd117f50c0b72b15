//! Tier 3: the token record as a cookie that outlives the session.

use std::sync::Arc;

use boulders_core::auth::TokenRecord;
use boulders_core::ports::{TokenPersistencePort, TokenTierError};
use tracing::warn;

use super::cookie_jar::{Cookie, FileCookieJar};
use crate::codec::{decode_cookie_value, encode_cookie_value, CookieEncoding};

pub const LOGIN_SESSION_COOKIE: &str = "boulders_login_session";

pub struct CookieTier {
    jar: Arc<FileCookieJar>,
    encoding: CookieEncoding,
    secure: bool,
}

impl CookieTier {
    /// `secure` marks the cookie `Secure`; set it when served over TLS.
    pub fn new(jar: Arc<FileCookieJar>, secure: bool) -> Self {
        Self {
            jar,
            encoding: CookieEncoding::default(),
            secure,
        }
    }

    pub fn with_encoding(mut self, encoding: CookieEncoding) -> Self {
        self.encoding = encoding;
        self
    }
}

fn is_token_json(text: &str) -> bool {
    serde_json::from_str::<TokenRecord>(text).is_ok()
}

impl TokenPersistencePort for CookieTier {
    fn tier_name(&self) -> &'static str {
        "cookie"
    }

    fn load(&self) -> Result<Option<TokenRecord>, TokenTierError> {
        let cookie = self
            .jar
            .get(LOGIN_SESSION_COOKIE)
            .map_err(|e| TokenTierError::Io(e.to_string()))?;
        let Some(cookie) = cookie else {
            return Ok(None);
        };

        // Undecodable cookies count as empty.
        let Some(json) = decode_cookie_value(&cookie.value, is_token_json) else {
            warn!(cookie = LOGIN_SESSION_COOKIE, "login session cookie could not be decoded");
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| TokenTierError::Corrupt(e.to_string()))
    }

    fn save(&self, record: &TokenRecord) -> Result<(), TokenTierError> {
        let json =
            serde_json::to_string(record).map_err(|e| TokenTierError::Corrupt(e.to_string()))?;
        let value = encode_cookie_value(&json, self.encoding);
        self.jar
            .set(Cookie::session(LOGIN_SESSION_COOKIE, value, self.secure))
            .map_err(|e| TokenTierError::Io(e.to_string()))
    }

    fn clear(&self) -> Result<(), TokenTierError> {
        self.jar
            .remove(LOGIN_SESSION_COOKIE)
            .map_err(|e| TokenTierError::Io(e.to_string()))
    }
}
