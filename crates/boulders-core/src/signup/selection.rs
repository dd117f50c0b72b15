use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::{AddonProduct, MembershipKind, MembershipPlan};

pub const ADDON_MIN_QUANTITY: u32 = 1;
pub const ADDON_MAX_QUANTITY: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("quantity {quantity} outside allowed range {min}..={max}")]
    QuantityOutOfRange { quantity: u32, min: u32, max: u32 },

    #[error("addon {0} is not selected")]
    AddonNotSelected(String),
}

/// The membership or punch card chosen on the membership step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipSelection {
    #[serde(rename = "type")]
    pub kind: MembershipKind,
    pub plan_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    pub total_price: u64,
}

impl MembershipSelection {
    /// Price a plan. `quantity` is ignored for memberships.
    pub fn for_plan(plan: &MembershipPlan, quantity: u32) -> Result<Self, SelectionError> {
        match plan.kind {
            MembershipKind::Membership => Ok(Self {
                kind: plan.kind,
                plan_id: plan.id.clone(),
                quantity: None,
                total_price: u64::from(plan.price),
            }),
            MembershipKind::PunchCard => {
                let (min, max) = plan.quantity_bounds();
                if !(min..=max).contains(&quantity) {
                    return Err(SelectionError::QuantityOutOfRange { quantity, min, max });
                }
                Ok(Self {
                    kind: plan.kind,
                    plan_id: plan.id.clone(),
                    quantity: Some(quantity),
                    total_price: u64::from(plan.price) * u64::from(quantity),
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonSelection {
    pub id: String,
    pub name: String,
    pub price: u32,
    pub quantity: u32,
}

impl AddonSelection {
    pub fn total_price(&self) -> u64 {
        u64::from(self.price) * u64::from(self.quantity)
    }
}

/// Selected addons in selection order, unique by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddonSelections(Vec<AddonSelection>);

impl AddonSelections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the product with quantity 1, or remove it when already selected.
    /// Returns whether the product is selected afterwards.
    pub fn toggle(&mut self, product: &AddonProduct) -> bool {
        if let Some(pos) = self.0.iter().position(|a| a.id == product.id) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(AddonSelection {
                id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                quantity: ADDON_MIN_QUANTITY,
            });
            true
        }
    }

    pub fn set_quantity(&mut self, id: &str, quantity: u32) -> Result<(), SelectionError> {
        if !(ADDON_MIN_QUANTITY..=ADDON_MAX_QUANTITY).contains(&quantity) {
            return Err(SelectionError::QuantityOutOfRange {
                quantity,
                min: ADDON_MIN_QUANTITY,
                max: ADDON_MAX_QUANTITY,
            });
        }
        let selection = self
            .0
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| SelectionError::AddonNotSelected(id.to_string()))?;
        selection.quantity = quantity;
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|a| a.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&AddonSelection> {
        self.0.iter().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AddonSelection> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_price(&self) -> u64 {
        self.0.iter().map(AddonSelection::total_price).sum()
    }
}

impl From<Vec<AddonSelection>> for AddonSelections {
    /// Later duplicates of an id are dropped.
    fn from(items: Vec<AddonSelection>) -> Self {
        let mut unique: Vec<AddonSelection> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.iter().any(|a| a.id == item.id) {
                unique.push(item);
            }
        }
        Self(unique)
    }
}
