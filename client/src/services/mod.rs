//! Typed services over the salon backend

pub mod auth;
pub mod dashboard;
pub mod employees;
pub mod materials;
pub mod suppliers;
pub mod supplies;
pub mod usage;

pub use auth::AuthService;
pub use dashboard::DashboardService;
pub use employees::EmployeeService;
pub use materials::MaterialService;
pub use suppliers::SupplierService;
pub use supplies::SupplyService;
pub use usage::UsageService;

use crate::api::ApiClient;

/// Every service over one shared API client
#[derive(Debug, Clone)]
pub struct Services {
    pub auth: AuthService,
    pub dashboard: DashboardService,
    pub employees: EmployeeService,
    pub materials: MaterialService,
    pub suppliers: SupplierService,
    pub supplies: SupplyService,
    pub usage: UsageService,
}

impl Services {
    pub fn new(api: ApiClient) -> Self {
        Self {
            auth: AuthService::new(api.clone()),
            dashboard: DashboardService::new(api.clone()),
            employees: EmployeeService::new(api.clone()),
            materials: MaterialService::new(api.clone()),
            suppliers: SupplierService::new(api.clone()),
            supplies: SupplyService::new(api.clone()),
            usage: UsageService::new(api),
        }
    }
}
