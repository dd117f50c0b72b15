use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::selection::{AddonSelections, MembershipSelection};

/// Contact and consent details collected on the first step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_gym: Option<String>,
    pub accepts_terms: bool,
    #[serde(default)]
    pub accepts_marketing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    MobilePay,
}

impl PaymentMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::MobilePay => "mobile_pay",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub method: PaymentMethod,
    /// Hosted checkout URL returned by the payment finalize call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

/// Signup record accumulated across the wizard steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership: Option<MembershipSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addons: Option<AddonSelections>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentInfo>,
}

/// Partial draft. `None` fields leave the draft untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftUpdate {
    pub personal_info: Option<PersonalInfo>,
    pub membership: Option<MembershipSelection>,
    pub addons: Option<AddonSelections>,
    pub payment: Option<PaymentInfo>,
}

impl DraftUpdate {
    pub fn personal_info(info: PersonalInfo) -> Self {
        Self {
            personal_info: Some(info),
            ..Default::default()
        }
    }

    pub fn membership(selection: MembershipSelection) -> Self {
        Self {
            membership: Some(selection),
            ..Default::default()
        }
    }

    pub fn addons(addons: AddonSelections) -> Self {
        Self {
            addons: Some(addons),
            ..Default::default()
        }
    }

    pub fn payment(payment: PaymentInfo) -> Self {
        Self {
            payment: Some(payment),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.personal_info.is_none()
            && self.membership.is_none()
            && self.addons.is_none()
            && self.payment.is_none()
    }
}

impl SignupDraft {
    /// Shallow per-field merge: present fields replace, absent fields keep.
    pub fn merge(&mut self, update: DraftUpdate) {
        if let Some(personal_info) = update.personal_info {
            self.personal_info = Some(personal_info);
        }
        if let Some(membership) = update.membership {
            self.membership = Some(membership);
        }
        if let Some(addons) = update.addons {
            self.addons = Some(addons);
        }
        if let Some(payment) = update.payment {
            self.payment = Some(payment);
        }
    }

    /// Membership plus addons.
    pub fn total_price(&self) -> u64 {
        let membership = self.membership.as_ref().map_or(0, |m| m.total_price);
        let addons = self.addons.as_ref().map_or(0, AddonSelections::total_price);
        membership + addons
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::signup::catalog::MembershipKind;

    fn membership() -> MembershipSelection {
        MembershipSelection {
            kind: MembershipKind::Membership,
            plan_id: "adult-monthly".into(),
            quantity: None,
            total_price: 445,
        }
    }

    #[test]
    fn merge_keeps_fields_absent_from_the_update() {
        let mut draft = SignupDraft::default();
        draft.merge(DraftUpdate::personal_info(fixtures::personal_info()));
        draft.merge(DraftUpdate::membership(membership()));

        assert_eq!(draft.personal_info, Some(fixtures::personal_info()));
        assert_eq!(draft.membership, Some(membership()));
        assert!(draft.addons.is_none());
    }

    #[test]
    fn merge_replaces_a_present_field_wholesale() {
        let mut draft = SignupDraft::default();
        draft.merge(DraftUpdate::membership(membership()));

        let mut cheaper = membership();
        cheaper.total_price = 299;
        draft.merge(DraftUpdate::membership(cheaper.clone()));

        assert_eq!(draft.membership, Some(cheaper));
    }

    #[test]
    fn empty_update_changes_nothing() {
        let mut draft = SignupDraft::default();
        draft.merge(DraftUpdate::personal_info(fixtures::personal_info()));
        let before = draft.clone();
        assert!(DraftUpdate::default().is_empty());
        draft.merge(DraftUpdate::default());
        assert_eq!(draft, before);
    }
}
