//! Materials (stock items)

use async_trait::async_trait;
use shared::{check, Id, Material, MaterialBrief, MaterialFilter, MaterialInput, Page, SupplierBrief};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::listing::PageSource;

#[derive(Debug, Clone)]
pub struct MaterialService {
    api: ApiClient,
}

impl MaterialService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, page: u32, filters: &MaterialFilter) -> ClientResult<Page<Material>> {
        self.api.get_page("/materials", page, filters).await
    }

    pub async fn brief(&self) -> ClientResult<Vec<MaterialBrief>> {
        self.api.fetch("/materials/brief").await
    }

    pub async fn get(&self, id: Id) -> ClientResult<Material> {
        self.api.fetch(&format!("/materials/{}", id)).await
    }

    /// Suppliers that deliver this material
    pub async fn suppliers(&self, id: Id) -> ClientResult<Vec<SupplierBrief>> {
        self.api.fetch(&format!("/materials/{}/suppliers", id)).await
    }

    pub async fn create(&self, input: &MaterialInput) -> ClientResult<Material> {
        self.api.session().require_admin()?;
        check(input)?;
        let material: Material = self.api.post("/materials", input).await?;
        tracing::info!("Created material {} ({})", material.name, material.id);
        Ok(material)
    }

    pub async fn update(&self, id: Id, input: &MaterialInput) -> ClientResult<Material> {
        self.api.session().require_admin()?;
        check(input)?;
        self.api.put(&format!("/materials/{}", id), input).await
    }

    pub async fn delete(&self, id: Id) -> ClientResult<()> {
        self.api.session().require_admin()?;
        self.api.delete(&format!("/materials/{}", id)).await?;
        tracing::info!("Deleted material {}", id);
        Ok(())
    }

    /// Add delivered units to the stock count
    pub async fn increment_amount(&self, id: Id, by: i64) -> ClientResult<()> {
        self.api.patch_unit(&format!("/materials/{}/amount/inc", id), &by).await
    }

    pub async fn decrement_amount(&self, id: Id, by: i64) -> ClientResult<()> {
        self.api.patch_unit(&format!("/materials/{}/amount/dec", id), &by).await
    }
}

#[async_trait]
impl PageSource for MaterialService {
    type Item = Material;
    type Filter = MaterialFilter;

    fn collection(&self) -> &'static str {
        "materials"
    }

    async fn fetch_page(&self, page: u32, filters: &MaterialFilter) -> ClientResult<Page<Material>> {
        self.list(page, filters).await
    }
}
