//! WebAssembly module for the Salon Inventory front end
//!
//! Provides client-side computation for:
//! - Stock level badges
//! - Form validation before submit
//! - Local search and sort of loaded materials
//! - Supply status labels and allowed actions

use serde::Serialize;
use wasm_bindgen::prelude::*;

use shared::{
    check, project, thresholds_consistent, FormErrors, Language, Material, MaterialInput,
    MaterialSortKey, RegisterData, SortKey, SortOrder, StockLevel, SupplierInput, SupplyAction,
    SupplyInput, SupplyStatus, UsageInput,
};

fn language(code: &str) -> Language {
    Language::from_code(code).unwrap_or_default()
}

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    let message = format!("{}: {}", context, err);
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

/// Stock badge code (`low`, `medium`, `sufficient`)
#[wasm_bindgen]
pub fn stock_level(amount: i64, min_threshold: i64, enough_threshold: i64) -> String {
    StockLevel::classify(amount, min_threshold, enough_threshold)
        .as_str()
        .to_string()
}

#[wasm_bindgen]
pub fn stock_level_label(amount: i64, min_threshold: i64, enough_threshold: i64, lang: &str) -> String {
    StockLevel::classify(amount, min_threshold, enough_threshold)
        .label(language(lang))
        .to_string()
}

/// Threshold pair check for the material form. Empty string when consistent.
#[wasm_bindgen]
pub fn threshold_error(min_threshold: i64, enough_threshold: i64) -> String {
    thresholds_consistent(min_threshold, enough_threshold)
        .err()
        .unwrap_or_default()
        .to_string()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldMessage {
    field: String,
    code: String,
    message: String,
}

fn localize(errors: &FormErrors, lang: Language) -> Vec<FieldMessage> {
    errors
        .errors
        .iter()
        .map(|e| FieldMessage {
            field: e.field.clone(),
            code: e.code.clone(),
            message: e.message(lang).to_string(),
        })
        .collect()
}

fn validate_json<T>(json: &str, lang: Language) -> Result<Vec<FieldMessage>, JsValue>
where
    T: serde::de::DeserializeOwned + validator::Validate,
{
    let form: T = serde_json::from_str(json).map_err(|e| js_error("Invalid form JSON", e))?;
    Ok(match check(&form) {
        Ok(()) => Vec::new(),
        Err(errors) => localize(&errors, lang),
    })
}

/// Validate a form before submit.
///
/// `form` is one of `material`, `supplier`, `supply`, `usage`, `register`.
/// Returns a JSON array of `{field, code, message}`; empty when valid.
#[wasm_bindgen]
pub fn validate_form(form: &str, json: &str, lang: &str) -> Result<String, JsValue> {
    let lang = language(lang);
    let messages = match form {
        "material" => validate_json::<MaterialInput>(json, lang)?,
        "supplier" => validate_json::<SupplierInput>(json, lang)?,
        "supply" => validate_json::<SupplyInput>(json, lang)?,
        "usage" => validate_json::<UsageInput>(json, lang)?,
        "register" => validate_json::<RegisterData>(json, lang)?,
        other => return Err(js_error("Unknown form", other)),
    };
    serde_json::to_string(&messages).map_err(|e| js_error("Encoding failed", e))
}

/// Search and sort a JSON array of materials.
///
/// `sort_key` is empty for no sort, otherwise `quantity`, `price` or `amount`.
#[wasm_bindgen]
pub fn filter_materials(
    materials_json: &str,
    query: &str,
    sort_key: &str,
    descending: bool,
) -> Result<String, JsValue> {
    let materials: Vec<Material> =
        serde_json::from_str(materials_json).map_err(|e| js_error("Invalid materials JSON", e))?;
    let order = if descending { SortOrder::Desc } else { SortOrder::Asc };
    let sort = MaterialSortKey::parse(sort_key).map(|key| (key, order));
    let visible = project(&materials, query, sort);
    serde_json::to_string(&visible).map_err(|e| js_error("Encoding failed", e))
}

fn parse_status(status: &str) -> Result<SupplyStatus, JsValue> {
    serde_json::from_value(serde_json::Value::String(status.to_string()))
        .map_err(|e| js_error("Unknown supply status", e))
}

#[wasm_bindgen]
pub fn supply_status_label(status: &str, lang: &str) -> Result<String, JsValue> {
    Ok(parse_status(status)?.label(language(lang)).to_string())
}

/// Whether the confirm and return buttons are shown for a supply
#[wasm_bindgen]
pub fn supply_actions_allowed(status: &str) -> Result<bool, JsValue> {
    Ok(parse_status(status)?.apply(SupplyAction::Confirm).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_level_badges() {
        assert_eq!(stock_level(0, 3, 10), "low");
        assert_eq!(stock_level(5, 3, 10), "medium");
        assert_eq!(stock_level(12, 3, 10), "sufficient");
        assert_eq!(stock_level_label(5, 3, 10, "uk"), "Середньо");
        assert_eq!(stock_level_label(5, 3, 10, "en"), "Medium");
    }

    #[test]
    fn test_threshold_error() {
        assert!(threshold_error(3, 10).is_empty());
        assert!(!threshold_error(10, 10).is_empty());
    }

    #[test]
    fn test_filter_materials_searches_and_sorts() {
        let json = r#"[
            {"id":1,"name":"Shampoo","category":"HAIR_CARE","unit":"ML","quantity":250.0,
             "amount":7,"price":180.5,"minAmountThreshold":3,"enoughAmountThreshold":10},
            {"id":2,"name":"Mask","category":"HAIR_CARE","unit":"ML","quantity":200.0,
             "amount":2,"price":99.0,"minAmountThreshold":3,"enoughAmountThreshold":10},
            {"id":3,"name":"Dry shampoo","category":"HAIR_CARE","unit":"ML","quantity":150.0,
             "amount":4,"price":120.0,"minAmountThreshold":3,"enoughAmountThreshold":10}
        ]"#;
        let out = filter_materials(json, "shampoo", "amount", false).unwrap();
        let visible: Vec<Material> = serde_json::from_str(&out).unwrap();
        let ids: Vec<i64> = visible.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_supply_actions_only_for_pending() {
        assert!(supply_actions_allowed("PENDING").unwrap());
        assert!(!supply_actions_allowed("CONFIRMED").unwrap());
        assert!(!supply_actions_allowed("RETURNED").unwrap());
    }
}
