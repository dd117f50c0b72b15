//! Signup API over the JSON client.

use std::sync::Arc;

use async_trait::async_trait;
use boulders_core::auth::TokenGrant;
use boulders_core::ports::{PaymentRedirect, SignupApiError, SignupApiPort};
use boulders_core::signup::{
    AddonProduct, MembershipPlan, PaymentMethod, PersonalInfo, SignupDraft,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::api_client::ApiClient;

pub const MEMBERSHIP_PLANS_PATH: &str = "/api/products/memberships";
pub const ADDONS_PATH: &str = "/api/products/addons";
pub const VALIDATE_CUSTOMER_PATH: &str = "/api/ver3/services/customers/validate";
pub const FINALIZE_ORDER_PATH: &str = "/api/ver3/services/orders/finalize";
pub const LOGIN_PATH: &str = "/api/ver3/services/auth/login";

pub struct HttpSignupApi {
    client: Arc<ApiClient>,
}

impl HttpSignupApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

/// Upstream responses are usually wrapped as `{ "data": ... }`.
fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, SignupApiError> {
    serde_json::from_value(unwrap_envelope(body)).map_err(|e| SignupApiError::Decode(e.to_string()))
}

fn order_payload(draft: &SignupDraft, method: PaymentMethod) -> Value {
    json!({
        "customer": draft.personal_info,
        "membership": draft.membership,
        "addons": draft.addons.clone().unwrap_or_default(),
        "paymentMethod": method.as_str(),
        "totalPrice": draft.total_price(),
    })
}

#[async_trait]
impl SignupApiPort for HttpSignupApi {
    async fn membership_plans(&self) -> Result<Vec<MembershipPlan>, SignupApiError> {
        decode(self.client.get(MEMBERSHIP_PLANS_PATH).await?)
    }

    async fn addons(&self) -> Result<Vec<AddonProduct>, SignupApiError> {
        decode(self.client.get(ADDONS_PATH).await?)
    }

    async fn validate_personal_info(&self, info: &PersonalInfo) -> Result<(), SignupApiError> {
        let body =
            serde_json::to_value(info).map_err(|e| SignupApiError::Decode(e.to_string()))?;
        self.client.post(VALIDATE_CUSTOMER_PATH, &body).await?;
        Ok(())
    }

    async fn finalize_payment(
        &self,
        draft: &SignupDraft,
        method: PaymentMethod,
    ) -> Result<PaymentRedirect, SignupApiError> {
        let body = order_payload(draft, method);
        decode(self.client.post(FINALIZE_ORDER_PATH, &body).await?)
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenGrant, SignupApiError> {
        let body = json!({ "email": email, "password": password });
        decode(self.client.post(LOGIN_PATH, &body).await?)
    }
}
