//! Material usage log

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{MaterialCategory, MaterialUnit, Position, Role};
use crate::listing::{Searchable, SortKey, SortValue, Sortable};
use crate::types::{Id, Language};
use crate::validation::{validate_not_future, validate_required_id};

/// Immutable record of material consumed by an employee
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaterialUsage {
    pub id: Id,
    pub material: UsageMaterial,
    pub employee: UsageEmployee,
    pub amount_used: i64,
    pub usage_date: DateTime<Utc>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageMaterial {
    pub id: Id,
    pub name: String,
    pub unit: MaterialUnit,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    pub category: MaterialCategory,
    #[serde(default)]
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageEmployee {
    pub id: Id,
    pub username: String,
    pub full_name: String,
    pub position: Position,
    pub role: Role,
}

/// Payload for logging consumption
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UsageInput {
    #[validate(custom = "validate_required_id")]
    pub material_id: Id,
    #[validate(custom = "validate_required_id")]
    pub employee_id: Id,
    #[validate(range(min = 1, code = "not_positive"))]
    pub amount_used: i64,
    #[validate(custom = "validate_not_future")]
    pub usage_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Server-side filters of the usage log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UsageFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<Id>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageSortKey {
    AmountUsed,
    UsageDate,
}

impl SortKey for UsageSortKey {
    fn all() -> &'static [Self] {
        &[UsageSortKey::AmountUsed, UsageSortKey::UsageDate]
    }

    fn value(&self) -> &'static str {
        match self {
            UsageSortKey::AmountUsed => "amountUsed",
            UsageSortKey::UsageDate => "usageDate",
        }
    }

    fn label(&self, lang: Language) -> &'static str {
        match self {
            UsageSortKey::AmountUsed => lang.pick("Використанням", "Amount used"),
            UsageSortKey::UsageDate => lang.pick("Датою використання", "Usage date"),
        }
    }
}

impl Searchable for MaterialUsage {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.material.name.as_str(), self.employee.full_name.as_str()]
    }
}

impl Sortable for MaterialUsage {
    type Key = UsageSortKey;

    fn sort_value(&self, key: UsageSortKey) -> SortValue {
        match key {
            UsageSortKey::AmountUsed => self.amount_used.into(),
            UsageSortKey::UsageDate => self.usage_date.into(),
        }
    }
}
