//! Per-step validation schemas.
//!
//! Each step owns one schema; the review step validates the whole draft and
//! the success step validates nothing.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use super::catalog::MembershipKind;
use super::draft::{PaymentInfo, PersonalInfo, SignupDraft};
use super::selection::{AddonSelections, MembershipSelection, ADDON_MAX_QUANTITY, ADDON_MIN_QUANTITY};
use super::step::Step;

const MAX_NAME_LEN: usize = 100;
const MAX_AGE_YEARS: i32 = 120;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 ]{6,18}[0-9]$").expect("valid phone regex"));
static POSTAL_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("valid postal code regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("validation failed:{}", describe(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!(" {}: {};", e.field, e.message))
        .collect()
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Validate what `step` contributes to the draft. `today` anchors the birth
/// date checks.
pub fn validate_step(
    step: Step,
    draft: &SignupDraft,
    today: NaiveDate,
) -> Result<(), ValidationErrors> {
    match step {
        Step::Personal => match &draft.personal_info {
            Some(info) => validate_personal_info(info, today),
            None => missing("personalInfo"),
        },
        Step::Membership => match &draft.membership {
            Some(selection) => validate_membership(selection),
            None => missing("membership"),
        },
        Step::Addons => draft
            .addons
            .as_ref()
            .map_or(Ok(()), validate_addons),
        Step::Review => validate_review(draft, today),
        Step::Payment => match &draft.payment {
            Some(payment) => validate_payment(payment),
            None => missing("payment"),
        },
        Step::Success => Ok(()),
    }
}

pub fn validate_personal_info(info: &PersonalInfo, today: NaiveDate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    for (field, value) in [
        ("firstName", &info.first_name),
        ("lastName", &info.last_name),
        ("street", &info.street),
        ("city", &info.city),
    ] {
        let value = value.trim();
        if value.is_empty() {
            errors.push(field, "required");
        } else if value.chars().count() > MAX_NAME_LEN {
            errors.push(field, format!("at most {MAX_NAME_LEN} characters"));
        }
    }

    if !EMAIL_RE.is_match(info.email.trim()) {
        errors.push("email", "invalid email address");
    }
    if !PHONE_RE.is_match(info.phone.trim()) {
        errors.push("phone", "invalid phone number");
    }
    if !POSTAL_CODE_RE.is_match(info.postal_code.trim()) {
        errors.push("postalCode", "postal code must be 4 digits");
    }

    if info.birth_date > today {
        errors.push("birthDate", "birth date is in the future");
    } else if today.year() - info.birth_date.year() > MAX_AGE_YEARS {
        errors.push("birthDate", "birth date is too far in the past");
    }

    if !info.accepts_terms {
        errors.push("acceptsTerms", "terms must be accepted");
    }

    errors.into_result()
}

pub fn validate_membership(selection: &MembershipSelection) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if selection.plan_id.trim().is_empty() {
        errors.push("planId", "required");
    }
    match (selection.kind, selection.quantity) {
        (MembershipKind::PunchCard, None) => errors.push("quantity", "required for punch cards"),
        (MembershipKind::PunchCard, Some(0)) => errors.push("quantity", "must be at least 1"),
        (MembershipKind::Membership, Some(_)) => {
            errors.push("quantity", "not applicable to memberships")
        }
        _ => {}
    }
    if selection.total_price == 0 {
        errors.push("totalPrice", "must be positive");
    }

    errors.into_result()
}

pub fn validate_addons(addons: &AddonSelections) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut seen: Vec<&str> = Vec::with_capacity(addons.len());

    for (i, addon) in addons.iter().enumerate() {
        if addon.id.trim().is_empty() {
            errors.push(format!("addons[{i}].id"), "required");
        } else if seen.contains(&addon.id.as_str()) {
            errors.push(format!("addons[{i}].id"), "duplicate addon");
        }
        seen.push(addon.id.as_str());

        if !(ADDON_MIN_QUANTITY..=ADDON_MAX_QUANTITY).contains(&addon.quantity) {
            errors.push(
                format!("addons[{i}].quantity"),
                format!("must be between {ADDON_MIN_QUANTITY} and {ADDON_MAX_QUANTITY}"),
            );
        }
    }

    errors.into_result()
}

/// The full draft as it must look before payment.
pub fn validate_review(draft: &SignupDraft, today: NaiveDate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    match &draft.personal_info {
        Some(info) => {
            if let Err(e) = validate_personal_info(info, today) {
                errors.extend(e);
            }
        }
        None => errors.push("personalInfo", "required"),
    }
    match &draft.membership {
        Some(selection) => {
            if let Err(e) = validate_membership(selection) {
                errors.extend(e);
            }
        }
        None => errors.push("membership", "required"),
    }
    if let Some(addons) = &draft.addons {
        if let Err(e) = validate_addons(addons) {
            errors.extend(e);
        }
    }

    errors.into_result()
}

pub fn validate_payment(payment: &PaymentInfo) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if let Some(redirect) = &payment.redirect_url {
        match Url::parse(redirect) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => errors.push("redirectUrl", "must be an absolute http(s) URL"),
        }
    }

    errors.into_result()
}

fn missing(field: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.push(field, "required");
    Err(errors)
}
