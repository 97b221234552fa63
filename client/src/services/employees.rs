//! Employees

use async_trait::async_trait;
use shared::{
    check, Employee, EmployeeAccessUpdate, EmployeeBrief, EmployeeFilter, EmployeeProfileUpdate,
    Id, NewEmployee, Page,
};

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::listing::PageSource;

#[derive(Debug, Clone)]
pub struct EmployeeService {
    api: ApiClient,
}

impl EmployeeService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, page: u32, filters: &EmployeeFilter) -> ClientResult<Page<Employee>> {
        self.api.session().require_admin()?;
        self.api.get_page("/employees", page, filters).await
    }

    pub async fn brief(&self) -> ClientResult<Vec<EmployeeBrief>> {
        self.api.fetch("/employees/brief").await
    }

    pub async fn get(&self, id: Id) -> ClientResult<Employee> {
        self.api.fetch(&format!("/employees/{}", id)).await
    }

    pub async fn create(&self, input: &NewEmployee) -> ClientResult<Employee> {
        self.api.session().require_admin()?;
        check(input)?;
        let employee: Employee = self.api.post("/employees", input).await?;
        tracing::info!("Hired {} as {:?}", employee.full_name, employee.position);
        Ok(employee)
    }

    /// Contact details; admins edit anyone, employees only themselves
    pub async fn update_profile(&self, id: Id, input: &EmployeeProfileUpdate) -> ClientResult<Employee> {
        let user = self.api.session().require_user()?;
        if !user.is_admin() && user.id != id {
            return Err(ClientError::Forbidden);
        }
        check(input)?;
        self.api.put(&format!("/employees/{}", id), input).await
    }

    pub async fn update_access(&self, id: Id, input: &EmployeeAccessUpdate) -> ClientResult<Employee> {
        self.api.session().require_admin()?;
        self.api.patch(&format!("/employees/{}", id), input).await
    }

    pub async fn delete(&self, id: Id) -> ClientResult<()> {
        self.api.session().require_admin()?;
        self.api.delete(&format!("/employees/{}", id)).await
    }
}

#[async_trait]
impl PageSource for EmployeeService {
    type Item = Employee;
    type Filter = EmployeeFilter;

    fn collection(&self) -> &'static str {
        "employees"
    }

    async fn fetch_page(&self, page: u32, filters: &EmployeeFilter) -> ClientResult<Page<Employee>> {
        self.list(page, filters).await
    }
}
