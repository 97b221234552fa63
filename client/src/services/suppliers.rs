//! Suppliers

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{check, Id, Page, Supplier, SupplierBrief, SupplierFilter, SupplierInput};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::listing::PageSource;

#[derive(Debug, Clone)]
pub struct SupplierService {
    api: ApiClient,
}

impl SupplierService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, page: u32, filters: &SupplierFilter) -> ClientResult<Page<Supplier>> {
        self.api.get_page("/suppliers", page, filters).await
    }

    pub async fn brief(&self) -> ClientResult<Vec<SupplierBrief>> {
        self.api.fetch("/suppliers/brief").await
    }

    pub async fn get(&self, id: Id) -> ClientResult<Supplier> {
        self.api.fetch(&format!("/suppliers/{}", id)).await
    }

    pub async fn create(&self, input: &SupplierInput) -> ClientResult<Supplier> {
        self.api.session().require_admin()?;
        check(input)?;
        let supplier: Supplier = self.api.post("/suppliers", input).await?;
        tracing::info!("Created supplier {} ({})", supplier.name, supplier.id);
        Ok(supplier)
    }

    pub async fn update(&self, id: Id, input: &SupplierInput) -> ClientResult<Supplier> {
        self.api.session().require_admin()?;
        check(input)?;
        self.api.put(&format!("/suppliers/{}", id), input).await
    }

    pub async fn delete(&self, id: Id) -> ClientResult<()> {
        self.api.session().require_admin()?;
        self.api.delete(&format!("/suppliers/{}", id)).await
    }

    /// Record when the supplier last delivered
    pub async fn stamp_last_supply(&self, id: Id, at: DateTime<Utc>) -> ClientResult<()> {
        self.api.patch_unit(&format!("/suppliers/{}/lastSupplyDate", id), &at).await
    }
}

#[async_trait]
impl PageSource for SupplierService {
    type Item = Supplier;
    type Filter = SupplierFilter;

    fn collection(&self) -> &'static str {
        "suppliers"
    }

    async fn fetch_page(&self, page: u32, filters: &SupplierFilter) -> ClientResult<Page<Supplier>> {
        self.list(page, filters).await
    }
}
