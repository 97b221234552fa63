//! Supply confirmation and rejection
//!
//! Confirming a pending supply touches three resources with no backend
//! transaction around them. [`ConfirmationWorkflow`] issues the calls
//! concurrently and undoes what it can when one of them fails;
//! [`SupplyBoard`] ties it to the supplies list with per-row state.

mod board;
mod confirmation;

pub use board::{ActionTicket, RowState, SupplyBoard, SupplyRow};
pub use confirmation::{
    ConfirmReport, ConfirmRequest, ConfirmationWorkflow, SupplyBackend, WorkflowStep,
};
