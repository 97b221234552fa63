//! Materials (stock items) and their stock classification

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::SupplierBrief;
use crate::listing::{Searchable, SortKey, SortValue, Sortable};
use crate::types::{Id, Language};
use crate::validation::{
    validate_material_thresholds, validate_non_negative_decimal, validate_positive_price,
};

/// A stock item kept by the salon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: MaterialCategory,
    pub unit: MaterialUnit,
    /// Capacity of one unit, e.g. 250 ml per bottle
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    /// Units currently in stock
    pub amount: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub min_amount_threshold: i64,
    pub enough_amount_threshold: i64,
    #[serde(default)]
    pub suppliers: Vec<SupplierBrief>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Material {
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::classify(
            self.amount,
            self.min_amount_threshold,
            self.enough_amount_threshold,
        )
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.amount <= 0
    }
}

/// Material categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialCategory {
    HairCare,
    SkinCare,
    NailCare,
    Tools,
    Other,
}

impl MaterialCategory {
    pub const ALL: [MaterialCategory; 5] = [
        MaterialCategory::HairCare,
        MaterialCategory::SkinCare,
        MaterialCategory::NailCare,
        MaterialCategory::Tools,
        MaterialCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialCategory::HairCare => "HAIR_CARE",
            MaterialCategory::SkinCare => "SKIN_CARE",
            MaterialCategory::NailCare => "NAIL_CARE",
            MaterialCategory::Tools => "TOOLS",
            MaterialCategory::Other => "OTHER",
        }
    }

    pub fn label(&self, lang: Language) -> &'static str {
        match self {
            MaterialCategory::HairCare => lang.pick("Догляд за волоссям", "Hair care"),
            MaterialCategory::SkinCare => lang.pick("Догляд за шкірою", "Skin care"),
            MaterialCategory::NailCare => lang.pick("Догляд за нігтями", "Nail care"),
            MaterialCategory::Tools => lang.pick("Інструменти", "Tools"),
            MaterialCategory::Other => lang.pick("Інше", "Other"),
        }
    }
}

/// Measurement unit of a material
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialUnit {
    Ml,
    Gr,
    Ones,
}

impl MaterialUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialUnit::Ml => "ML",
            MaterialUnit::Gr => "GR",
            MaterialUnit::Ones => "ONES",
        }
    }

    pub fn label(&self, lang: Language) -> &'static str {
        match self {
            MaterialUnit::Ml => lang.pick("мл", "ml"),
            MaterialUnit::Gr => lang.pick("гр", "g"),
            MaterialUnit::Ones => lang.pick("шт", "pcs"),
        }
    }
}

/// Stock badge shown next to a material's amount
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    /// At or below the minimum threshold
    Low,
    /// Between the two thresholds
    Medium,
    /// At or above the sufficient threshold
    Sufficient,
}

impl StockLevel {
    pub fn classify(amount: i64, min_threshold: i64, enough_threshold: i64) -> Self {
        if amount <= min_threshold {
            StockLevel::Low
        } else if amount < enough_threshold {
            StockLevel::Medium
        } else {
            StockLevel::Sufficient
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockLevel::Low => "low",
            StockLevel::Medium => "medium",
            StockLevel::Sufficient => "sufficient",
        }
    }

    pub fn label(&self, lang: Language) -> &'static str {
        match self {
            StockLevel::Low => lang.pick("Мало", "Low"),
            StockLevel::Medium => lang.pick("Середньо", "Medium"),
            StockLevel::Sufficient => lang.pick("Достатньо", "Sufficient"),
        }
    }
}

impl std::fmt::Display for StockLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Materials with nothing left, for the dashboard alert
pub fn out_of_stock(materials: &[Material]) -> Vec<&Material> {
    materials.iter().filter(|m| m.is_out_of_stock()).collect()
}

/// Lightweight projection for selection controls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaterialBrief {
    pub id: Id,
    pub name: String,
    pub category: MaterialCategory,
}

/// Create/update payload for a material
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_material_thresholds", skip_on_field_errors = false))]
pub struct MaterialInput {
    #[validate(length(min = 1, code = "required"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: MaterialCategory,
    pub unit: MaterialUnit,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_non_negative_decimal")]
    pub quantity: Decimal,
    #[validate(range(min = 0, code = "negative"))]
    pub amount: i64,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_positive_price")]
    pub price: Decimal,
    #[validate(range(min = 1, code = "not_positive"))]
    pub min_amount_threshold: i64,
    pub enough_amount_threshold: i64,
    #[serde(default)]
    pub supplier_ids: Vec<Id>,
}

impl Default for MaterialInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            category: MaterialCategory::Other,
            unit: MaterialUnit::Ones,
            quantity: Decimal::ZERO,
            amount: 0,
            price: Decimal::ZERO,
            min_amount_threshold: 3,
            enough_amount_threshold: 10,
            supplier_ids: Vec::new(),
        }
    }
}

impl From<&Material> for MaterialInput {
    fn from(m: &Material) -> Self {
        Self {
            name: m.name.clone(),
            description: m.description.clone(),
            category: m.category,
            unit: m.unit,
            quantity: m.quantity,
            amount: m.amount,
            price: m.price,
            min_amount_threshold: m.min_amount_threshold,
            enough_amount_threshold: m.enough_amount_threshold,
            supplier_ids: m.suppliers.iter().map(|s| s.id).collect(),
        }
    }
}

/// Server-side filters of the materials list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MaterialFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<MaterialCategory>,
}

/// Sort fields of the materials list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialSortKey {
    Quantity,
    Price,
    Amount,
}

impl SortKey for MaterialSortKey {
    fn all() -> &'static [Self] {
        &[
            MaterialSortKey::Quantity,
            MaterialSortKey::Price,
            MaterialSortKey::Amount,
        ]
    }

    fn value(&self) -> &'static str {
        match self {
            MaterialSortKey::Quantity => "quantity",
            MaterialSortKey::Price => "price",
            MaterialSortKey::Amount => "amount",
        }
    }

    fn label(&self, lang: Language) -> &'static str {
        match self {
            MaterialSortKey::Quantity => lang.pick("Ємністю", "Capacity"),
            MaterialSortKey::Price => lang.pick("Ціною", "Price"),
            MaterialSortKey::Amount => lang.pick("Кількістю", "Amount"),
        }
    }
}

impl Searchable for Material {
    fn search_fields(&self) -> Vec<&str> {
        std::iter::once(self.name.as_str())
            .chain(self.suppliers.iter().map(|s| s.name.as_str()))
            .collect()
    }
}

impl Sortable for Material {
    type Key = MaterialSortKey;

    fn sort_value(&self, key: MaterialSortKey) -> SortValue {
        match key {
            MaterialSortKey::Quantity => self.quantity.into(),
            MaterialSortKey::Price => self.price.into(),
            MaterialSortKey::Amount => self.amount.into(),
        }
    }
}
