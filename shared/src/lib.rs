//! Shared types and models for the Salon Inventory client
//!
//! This crate holds the domain model, form validation and the list
//! search/sort rules used by the native client and the WASM bindings.

pub mod listing;
pub mod models;
pub mod types;
pub mod validation;

pub use listing::*;
pub use models::*;
pub use types::*;
pub use validation::*;
