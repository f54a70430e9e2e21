//! Salary prediction service: one regression model, one JSON endpoint.
pub mod api;
pub mod common;
pub mod features;
pub mod inference;
pub mod model;

pub use common::error::{ErrorCode, SalaryError, SalaryResult};
pub use inference::{format_currency, Prediction};
pub use model::ModelHandle;
