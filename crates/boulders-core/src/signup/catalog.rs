//! Product catalog entries offered by the signup wizard.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_QUANTITY: u32 = 1;
pub const DEFAULT_MAX_QUANTITY: u32 = 5;

/// Whether a plan is a recurring membership or a punch card bought in units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MembershipKind {
    Membership,
    PunchCard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipPlan {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MembershipKind,
    /// Unit price in whole currency units.
    pub price: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_quantity: Option<u32>,
}

impl MembershipPlan {
    /// Inclusive quantity bounds. Only meaningful for punch cards.
    pub fn quantity_bounds(&self) -> (u32, u32) {
        (
            self.min_quantity.unwrap_or(DEFAULT_MIN_QUANTITY),
            self.max_quantity.unwrap_or(DEFAULT_MAX_QUANTITY),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonProduct {
    pub id: String,
    pub name: String,
    pub price: u32,
}
