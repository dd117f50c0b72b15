use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tokens count as expired this long before their recorded expiry.
pub const EXPIRY_SAFETY_MARGIN_MS: i64 = 5 * 60 * 1000;

/// Credentials held for the signed-in member.
///
/// Serialized with the same field names in every persistence tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl TokenRecord {
    /// A record without `expires_at` never expires.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => now_ms >= expires_at.saturating_sub(EXPIRY_SAFETY_MARGIN_MS),
            None => false,
        }
    }
}

/// Token payload returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl From<TokenGrant> for TokenRecord {
    fn from(grant: TokenGrant) -> Self {
        Self {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            expires_at: grant.expires_at,
            metadata: grant.metadata,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    SignedOut,
    SignedIn,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(expires_at: Option<i64>) -> TokenRecord {
        TokenRecord {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            expires_at,
            metadata: None,
        }
    }

    #[test]
    fn record_without_expiry_never_expires() {
        assert!(!record(None).is_expired_at(i64::MAX));
    }

    #[test]
    fn expiry_applies_five_minute_margin() {
        let expires_at = 10_000_000;
        let token = record(Some(expires_at));

        assert!(!token.is_expired_at(expires_at - EXPIRY_SAFETY_MARGIN_MS - 1));
        assert!(token.is_expired_at(expires_at - EXPIRY_SAFETY_MARGIN_MS));
        assert!(token.is_expired_at(expires_at + 1));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(record(Some(42))).unwrap();
        assert_eq!(json["accessToken"], "access");
        assert_eq!(json["refreshToken"], "refresh");
        assert_eq!(json["expiresAt"], 42);
        assert!(json.get("metadata").is_none());
    }
}
