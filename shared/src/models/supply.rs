//! Material supplies (restock orders) and their status machine

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{MaterialCategory, MaterialUnit, SupplierBrief};
use crate::listing::{Searchable, SortKey, SortValue, Sortable};
use crate::types::{Id, Language};
use crate::validation::validate_required_id;

/// A restock order linking a material and a supplier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSupply {
    pub id: Id,
    pub material: SupplyMaterial,
    pub supplier: SupplierBrief,
    /// Units ordered
    pub amount: i64,
    /// Expected delivery date
    pub supply_date: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub status: SupplyStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MaterialSupply {
    /// Confirm and reject controls are only offered while pending
    pub fn is_actionable(&self) -> bool {
        self.status == SupplyStatus::Pending
    }
}

/// Material as embedded in a supply record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SupplyMaterial {
    pub id: Id,
    pub name: String,
    pub unit: MaterialUnit,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(default)]
    pub amount: i64,
    pub category: MaterialCategory,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Supply lifecycle. CONFIRMED and RETURNED are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplyStatus {
    Pending,
    Confirmed,
    Returned,
}

/// Action an admin can take on a pending supply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyAction {
    Confirm,
    Reject,
}

/// Rejected status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("supply is already {from:?}; {action:?} is not allowed")]
pub struct InvalidTransition {
    pub from: SupplyStatus,
    pub action: SupplyAction,
}

impl SupplyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplyStatus::Pending => "PENDING",
            SupplyStatus::Confirmed => "CONFIRMED",
            SupplyStatus::Returned => "RETURNED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SupplyStatus::Pending)
    }

    /// Next status for an action, if the machine allows it
    pub fn apply(self, action: SupplyAction) -> Result<SupplyStatus, InvalidTransition> {
        match (self, action) {
            (SupplyStatus::Pending, SupplyAction::Confirm) => Ok(SupplyStatus::Confirmed),
            (SupplyStatus::Pending, SupplyAction::Reject) => Ok(SupplyStatus::Returned),
            (from, action) => Err(InvalidTransition { from, action }),
        }
    }

    pub fn label(&self, lang: Language) -> &'static str {
        match self {
            SupplyStatus::Pending => lang.pick("Очікує підтвердження", "Awaiting confirmation"),
            SupplyStatus::Confirmed => lang.pick("Підтверджено", "Confirmed"),
            SupplyStatus::Returned => lang.pick("Повернено", "Returned"),
        }
    }
}

impl std::fmt::Display for SupplyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order payload for a new supply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SupplyInput {
    #[validate(custom = "validate_required_id")]
    pub material_id: Id,
    #[validate(custom = "validate_required_id")]
    pub supplier_id: Id,
    #[validate(range(min = 1, code = "not_positive"))]
    pub amount: i64,
    pub supply_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Server-side filters of the supplies list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SupplyFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SupplyStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplySortKey {
    Amount,
    TotalPrice,
}

impl SortKey for SupplySortKey {
    fn all() -> &'static [Self] {
        &[SupplySortKey::Amount, SupplySortKey::TotalPrice]
    }

    fn value(&self) -> &'static str {
        match self {
            SupplySortKey::Amount => "amount",
            SupplySortKey::TotalPrice => "totalPrice",
        }
    }

    fn label(&self, lang: Language) -> &'static str {
        match self {
            SupplySortKey::Amount => lang.pick("Кількість", "Amount"),
            SupplySortKey::TotalPrice => lang.pick("Загальна ціна", "Total price"),
        }
    }
}

impl Searchable for MaterialSupply {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.supplier.name.as_str(), self.material.name.as_str()]
    }
}

impl Sortable for MaterialSupply {
    type Key = SupplySortKey;

    fn sort_value(&self, key: SupplySortKey) -> SortValue {
        match key {
            SupplySortKey::Amount => self.amount.into(),
            SupplySortKey::TotalPrice => self.total_price.into(),
        }
    }
}
