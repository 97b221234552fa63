//! Supplies (restock orders)

use async_trait::async_trait;
use shared::{check, Id, MaterialSupply, Page, SupplyFilter, SupplyInput, SupplyStatus};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::listing::PageSource;

#[derive(Debug, Clone)]
pub struct SupplyService {
    api: ApiClient,
}

impl SupplyService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, page: u32, filters: &SupplyFilter) -> ClientResult<Page<MaterialSupply>> {
        self.api.get_page("/supplies", page, filters).await
    }

    pub async fn get(&self, id: Id) -> ClientResult<MaterialSupply> {
        self.api.fetch(&format!("/supplies/{}", id)).await
    }

    pub async fn create(&self, input: &SupplyInput) -> ClientResult<MaterialSupply> {
        self.api.session().require_admin()?;
        check(input)?;
        let supply: MaterialSupply = self.api.post("/supplies", input).await?;
        tracing::info!("Ordered {} x {} from {}", supply.amount, supply.material.name, supply.supplier.name);
        Ok(supply)
    }

    pub async fn update(&self, id: Id, input: &SupplyInput) -> ClientResult<MaterialSupply> {
        self.api.session().require_admin()?;
        check(input)?;
        self.api.put(&format!("/supplies/{}", id), input).await
    }

    pub async fn delete(&self, id: Id) -> ClientResult<()> {
        self.api.session().require_admin()?;
        self.api.delete(&format!("/supplies/{}", id)).await
    }

    pub async fn set_status(&self, id: Id, status: SupplyStatus) -> ClientResult<()> {
        self.api.patch_unit(&format!("/supplies/{}/status", id), &status).await
    }
}

#[async_trait]
impl PageSource for SupplyService {
    type Item = MaterialSupply;
    type Filter = SupplyFilter;

    fn collection(&self) -> &'static str {
        "supplies"
    }

    async fn fetch_page(&self, page: u32, filters: &SupplyFilter) -> ClientResult<Page<MaterialSupply>> {
        self.list(page, filters).await
    }
}
