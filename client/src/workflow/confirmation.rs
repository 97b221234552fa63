use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{Id, MaterialSupply, SupplyStatus};

use crate::config::WorkflowConfig;
use crate::error::{ClientError, ClientResult};
use crate::services::Services;

/// Backend calls made by supply actions
#[async_trait]
pub trait SupplyBackend: Send + Sync {
    async fn set_supply_status(&self, supply_id: Id, status: SupplyStatus) -> ClientResult<()>;

    async fn increment_material(&self, material_id: Id, amount: i64) -> ClientResult<()>;

    async fn decrement_material(&self, material_id: Id, amount: i64) -> ClientResult<()>;

    async fn stamp_supplier(&self, supplier_id: Id, at: DateTime<Utc>) -> ClientResult<()>;
}

#[async_trait]
impl SupplyBackend for Services {
    async fn set_supply_status(&self, supply_id: Id, status: SupplyStatus) -> ClientResult<()> {
        self.supplies.set_status(supply_id, status).await
    }

    async fn increment_material(&self, material_id: Id, amount: i64) -> ClientResult<()> {
        self.materials.increment_amount(material_id, amount).await
    }

    async fn decrement_material(&self, material_id: Id, amount: i64) -> ClientResult<()> {
        self.materials.decrement_amount(material_id, amount).await
    }

    async fn stamp_supplier(&self, supplier_id: Id, at: DateTime<Utc>) -> ClientResult<()> {
        self.suppliers.stamp_last_supply(supplier_id, at).await
    }
}

/// One side effect of a supply action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    MarkConfirmed,
    IncrementStock,
    StampSupplier,
    MarkReturned,
}

impl WorkflowStep {
    /// Whether a completed step can be undone
    pub fn is_compensable(&self) -> bool {
        matches!(self, WorkflowStep::IncrementStock)
    }
}

/// What confirming a supply needs to know
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub supply_id: Id,
    pub material_id: Id,
    pub supplier_id: Id,
    pub amount: i64,
}

impl From<&MaterialSupply> for ConfirmRequest {
    fn from(supply: &MaterialSupply) -> Self {
        Self {
            supply_id: supply.id,
            material_id: supply.material.id,
            supplier_id: supply.supplier.id,
            amount: supply.amount,
        }
    }
}

/// A fully applied confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmReport {
    pub supply_id: Id,
    pub confirmed_at: DateTime<Utc>,
}

pub struct ConfirmationWorkflow<B: ?Sized> {
    backend: Arc<B>,
    compensate: bool,
}

impl<B: SupplyBackend + ?Sized> ConfirmationWorkflow<B> {
    pub fn new(backend: Arc<B>, compensate: bool) -> Self {
        Self {
            backend,
            compensate,
        }
    }

    pub fn from_config(backend: Arc<B>, config: &WorkflowConfig) -> Self {
        Self::new(backend, config.compensate_on_failure)
    }

    /// Mark the supply confirmed, add its amount to stock and stamp the
    /// supplier, all at once. Succeeds only if every call succeeds.
    ///
    /// The stock increment is undone only while the supply is still
    /// PENDING, i.e. when the status step itself failed.
    pub async fn confirm(&self, request: ConfirmRequest) -> ClientResult<ConfirmReport> {
        let now = Utc::now();
        let backend = self.backend.as_ref();

        let (status, stock, stamp) = tokio::join!(
            backend.set_supply_status(request.supply_id, SupplyStatus::Confirmed),
            backend.increment_material(request.material_id, request.amount),
            backend.stamp_supplier(request.supplier_id, now),
        );

        let results = [
            (WorkflowStep::MarkConfirmed, status),
            (WorkflowStep::IncrementStock, stock),
            (WorkflowStep::StampSupplier, stamp),
        ];

        if results.iter().all(|(_, r)| r.is_ok()) {
            tracing::info!(
                "Supply {} confirmed: +{} to material {}",
                request.supply_id,
                request.amount,
                request.material_id
            );
            return Ok(ConfirmReport {
                supply_id: request.supply_id,
                confirmed_at: now,
            });
        }

        let mut failed = Vec::new();
        let mut succeeded = Vec::new();
        let mut all_expired = true;
        for (step, result) in results {
            match result {
                Ok(()) => succeeded.push(step),
                Err(e) => {
                    tracing::error!("Supply {} step {:?} failed: {}", request.supply_id, step, e);
                    all_expired &= e.is_session_expired();
                    failed.push(step);
                }
            }
        }

        if all_expired && succeeded.is_empty() {
            return Err(ClientError::SessionExpired);
        }

        // Once the supply is CONFIRMED it is terminal and cannot be confirmed
        // again, so whatever else landed stays in place.
        if !failed.contains(&WorkflowStep::MarkConfirmed) {
            tracing::error!(
                "Supply {} confirmed with failed steps {:?}",
                request.supply_id,
                failed
            );
            return Err(ClientError::WorkflowFailed {
                failed,
                compensated: Vec::new(),
                uncompensated: Vec::new(),
            });
        }

        let mut compensated = Vec::new();
        let mut uncompensated = Vec::new();
        for step in succeeded {
            if self.compensate && step.is_compensable() && self.undo(step, &request).await {
                compensated.push(step);
            } else {
                uncompensated.push(step);
            }
        }

        if !uncompensated.is_empty() {
            tracing::error!(
                "Supply {} left partially applied: {:?}",
                request.supply_id,
                uncompensated
            );
        }

        Err(ClientError::WorkflowFailed {
            failed,
            compensated,
            uncompensated,
        })
    }

    async fn undo(&self, step: WorkflowStep, request: &ConfirmRequest) -> bool {
        let result = match step {
            WorkflowStep::IncrementStock => {
                self.backend
                    .decrement_material(request.material_id, request.amount)
                    .await
            }
            _ => return false,
        };
        match result {
            Ok(()) => {
                tracing::warn!("Compensated {:?} for supply {}", step, request.supply_id);
                true
            }
            Err(e) => {
                tracing::error!("Compensation of {:?} for supply {} failed: {}", step, request.supply_id, e);
                false
            }
        }
    }

    /// Mark the supply returned; nothing else changes
    pub async fn reject(&self, supply_id: Id) -> ClientResult<()> {
        self.backend
            .set_supply_status(supply_id, SupplyStatus::Returned)
            .await?;
        tracing::info!("Supply {} returned", supply_id);
        Ok(())
    }
}
