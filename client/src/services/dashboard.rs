//! Dashboard summaries

use shared::{DashboardInfo, Id};

use crate::api::ApiClient;
use crate::error::ClientResult;

#[derive(Debug, Clone)]
pub struct DashboardService {
    api: ApiClient,
}

impl DashboardService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn admin(&self) -> ClientResult<DashboardInfo> {
        self.api.session().require_admin()?;
        self.api.fetch("/dashboard/admin").await
    }

    pub async fn employee(&self, id: Id) -> ClientResult<DashboardInfo> {
        self.api.fetch(&format!("/dashboard/employee/{}", id)).await
    }

    /// Dashboard for whoever is signed in
    pub async fn current(&self) -> ClientResult<DashboardInfo> {
        let user = self.api.session().require_user()?;
        if user.is_admin() {
            self.admin().await
        } else {
            self.employee(user.id).await
        }
    }
}
