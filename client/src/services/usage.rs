//! Material usage log and reports

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use shared::{check, DateRange, Id, MaterialUsage, Page, UsageFilter, UsageInput};

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::listing::PageSource;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportQuery {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct UsageService {
    api: ApiClient,
}

impl UsageService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, page: u32, filters: &UsageFilter) -> ClientResult<Page<MaterialUsage>> {
        self.api.get_page("/usage", page, filters).await
    }

    pub async fn by_employee(&self, employee_id: Id, page: u32) -> ClientResult<Page<MaterialUsage>> {
        self.api
            .get(&format!("/usage/by-employee/{}", employee_id), &[("page", page)])
            .await
    }

    /// Log consumption; employees may only log for themselves
    pub async fn log(&self, input: &UsageInput) -> ClientResult<MaterialUsage> {
        let user = self.api.session().require_user()?;
        if !user.is_admin() && user.id != input.employee_id {
            return Err(ClientError::Forbidden);
        }
        check(input)?;
        let usage: MaterialUsage = self.api.post("/usage", input).await?;
        tracing::info!("Logged {} of {}", usage.amount_used, usage.material.name);
        Ok(usage)
    }

    /// Every usage within the range, for reports
    pub async fn report(&self, range: DateRange) -> ClientResult<Vec<MaterialUsage>> {
        self.api.session().require_admin()?;
        let query = ReportQuery {
            start_date: range.start,
            end_date: range.end,
        };
        self.api.get("/usage/report", &query).await
    }

    /// Page source over one employee's own log
    pub fn for_employee(&self, employee_id: Id) -> EmployeeUsageLog {
        EmployeeUsageLog {
            usage: self.clone(),
            employee_id,
        }
    }
}

#[async_trait]
impl PageSource for UsageService {
    type Item = MaterialUsage;
    type Filter = UsageFilter;

    fn collection(&self) -> &'static str {
        "usage"
    }

    async fn fetch_page(&self, page: u32, filters: &UsageFilter) -> ClientResult<Page<MaterialUsage>> {
        self.list(page, filters).await
    }
}

/// Usage log of a single employee
#[derive(Debug, Clone)]
pub struct EmployeeUsageLog {
    usage: UsageService,
    employee_id: Id,
}

#[async_trait]
impl PageSource for EmployeeUsageLog {
    type Item = MaterialUsage;
    type Filter = ();

    fn collection(&self) -> &'static str {
        "employee usage"
    }

    async fn fetch_page(&self, page: u32, _filters: &()) -> ClientResult<Page<MaterialUsage>> {
        self.usage.by_employee(self.employee_id, page).await
    }
}
