//! Dashboard summaries

use serde::{Deserialize, Serialize};

use super::{out_of_stock, Material, MaterialUsage};

/// Counters and recent activity shown on the landing page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardInfo {
    pub total_materials: u64,
    pub total_amount_in_stock: i64,
    pub total_suppliers: u64,
    pub total_employees: u64,
    pub recent_usages: Vec<MaterialUsage>,
    pub low_stock_materials: Vec<Material>,
}

impl DashboardInfo {
    /// Materials for the "ran out" alert
    pub fn out_of_stock_alert(&self) -> Vec<&Material> {
        out_of_stock(&self.low_stock_materials)
    }
}
