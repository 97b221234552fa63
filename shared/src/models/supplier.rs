//! Suppliers of salon materials

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{MaterialCategory, MaterialUnit};
use crate::listing::{Searchable, SortKey, SortValue, Sortable};
use crate::types::{Id, Language};
use crate::validation::{validate_rating, validate_ua_phone_field};

/// Highest rating a supplier can be given
pub const MAX_RATE: f64 = 5.0;

/// A supplier of materials
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: Id,
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub rating: f64,
    /// Stamped when a supply from this supplier is confirmed
    #[serde(default)]
    pub last_supply_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub materials: Vec<SupplierMaterial>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Material as embedded in a supplier record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SupplierMaterial {
    pub id: Id,
    pub name: String,
    pub category: MaterialCategory,
    pub unit: MaterialUnit,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub amount: i64,
}

/// Lightweight projection for selection controls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SupplierBrief {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub rating: f64,
}

/// Create/update payload for a supplier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SupplierInput {
    #[validate(length(min = 1, code = "required"))]
    pub name: String,
    #[validate(length(min = 3, code = "too_short"))]
    pub contact_person: String,
    #[validate(email(code = "email"))]
    pub email: String,
    #[validate(custom = "validate_ua_phone_field")]
    pub phone_number: String,
    #[validate(length(min = 3, code = "too_short"))]
    pub address: String,
    #[validate(custom = "validate_rating")]
    pub rating: f64,
    #[serde(default)]
    pub material_ids: Vec<Id>,
}

/// Server-side filters of the suppliers list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SupplierFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_id: Option<Id>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplierSortKey {
    Rating,
    LastSupplyDate,
}

impl SortKey for SupplierSortKey {
    fn all() -> &'static [Self] {
        &[SupplierSortKey::Rating, SupplierSortKey::LastSupplyDate]
    }

    fn value(&self) -> &'static str {
        match self {
            SupplierSortKey::Rating => "rating",
            SupplierSortKey::LastSupplyDate => "lastSupplyDate",
        }
    }

    fn label(&self, lang: Language) -> &'static str {
        match self {
            SupplierSortKey::Rating => lang.pick("За рейтингом", "Rating"),
            SupplierSortKey::LastSupplyDate => lang.pick("Остання поставка", "Last supply"),
        }
    }
}

impl Searchable for Supplier {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Sortable for Supplier {
    type Key = SupplierSortKey;

    fn sort_value(&self, key: SupplierSortKey) -> SortValue {
        match key {
            SupplierSortKey::Rating => self.rating.into(),
            SupplierSortKey::LastSupplyDate => self.last_supply_date.into(),
        }
    }
}
