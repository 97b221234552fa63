//! Domain models for the salon inventory

mod dashboard;
mod employee;
mod material;
mod supplier;
mod supply;
mod usage;
mod user;

pub use dashboard::*;
pub use employee::*;
pub use material::*;
pub use supplier::*;
pub use supply::*;
pub use usage::*;
pub use user::*;
