use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::HttpError;
use crate::auth::TokenGrant;
use crate::signup::{AddonProduct, MembershipPlan, PaymentMethod, PersonalInfo, SignupDraft};

#[derive(Debug, Error)]
pub enum SignupApiError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("unexpected response shape: {0}")]
    Decode(String),
}

impl SignupApiError {
    pub fn as_http(&self) -> Option<&HttpError> {
        match self {
            SignupApiError::Http(err) => Some(err),
            SignupApiError::Decode(_) => None,
        }
    }
}

/// Hosted checkout the browser is sent to after finalizing the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRedirect {
    pub redirect_url: String,
    #[serde(default)]
    pub order_id: Option<String>,
}

/// Upstream calls made by the signup screens.
#[async_trait]
pub trait SignupApiPort: Send + Sync {
    async fn membership_plans(&self) -> Result<Vec<MembershipPlan>, SignupApiError>;

    async fn addons(&self) -> Result<Vec<AddonProduct>, SignupApiError>;

    /// Server-side checks (e.g. email already registered).
    async fn validate_personal_info(&self, info: &PersonalInfo) -> Result<(), SignupApiError>;

    async fn finalize_payment(
        &self,
        draft: &SignupDraft,
        method: PaymentMethod,
    ) -> Result<PaymentRedirect, SignupApiError>;

    async fn login(&self, email: &str, password: &str) -> Result<TokenGrant, SignupApiError>;
}
