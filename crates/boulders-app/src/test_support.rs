//! Port mocks shared by the use case tests.

use async_trait::async_trait;
use boulders_core::auth::TokenGrant;
use boulders_core::ports::{
    PaymentRedirect, SignupApiError, SignupApiPort, UpstreamError, UpstreamPort, UpstreamRequest,
    UpstreamResponse,
};
use boulders_core::signup::{
    AddonProduct, MembershipPlan, PaymentMethod, PersonalInfo, SignupDraft,
};
use chrono::NaiveDate;
use mockall::mock;

mock! {
    pub SignupApi {}

    #[async_trait]
    impl SignupApiPort for SignupApi {
        async fn membership_plans(&self) -> Result<Vec<MembershipPlan>, SignupApiError>;
        async fn addons(&self) -> Result<Vec<AddonProduct>, SignupApiError>;
        async fn validate_personal_info(&self, info: &PersonalInfo) -> Result<(), SignupApiError>;
        async fn finalize_payment(
            &self,
            draft: &SignupDraft,
            method: PaymentMethod,
        ) -> Result<PaymentRedirect, SignupApiError>;
        async fn login(&self, email: &str, password: &str) -> Result<TokenGrant, SignupApiError>;
    }
}

mock! {
    pub Upstream {}

    #[async_trait]
    impl UpstreamPort for Upstream {
        async fn forward(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError>;
    }
}

pub fn personal_info() -> PersonalInfo {
    PersonalInfo {
        first_name: "Freja".into(),
        last_name: "Holm".into(),
        email: "freja.holm@example.com".into(),
        phone: "+4512345678".into(),
        birth_date: NaiveDate::from_ymd_opt(1994, 5, 17).unwrap(),
        street: "Vesterbrogade 1".into(),
        postal_code: "1620".into(),
        city: "København V".into(),
        primary_gym: None,
        accepts_terms: true,
        accepts_marketing: false,
    }
}
