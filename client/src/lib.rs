//! Salon Inventory client
//!
//! Typed client over the salon backend: entity list controllers with
//! local search and sort, the supply confirmation workflow, session
//! handling, and usage report export.

pub mod api;
pub mod config;
pub mod error;
pub mod listing;
pub mod notify;
pub mod reports;
pub mod services;
pub mod session;
pub mod workflow;

pub use api::ApiClient;
pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use listing::{ApplyOutcome, EntityListController, FetchTicket, PageSource};
pub use notify::{Notification, NotificationQueue, Notifier, Severity, TracingNotifier};
pub use services::Services;
pub use session::{Session, TokenFile};
pub use workflow::{ActionTicket, ConfirmationWorkflow, RowState, SupplyBoard, SupplyRow};
