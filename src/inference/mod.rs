//! Inference domain: turns a request body into a formatted salary prediction.

pub mod domain;
pub mod service;

pub use domain::{format_currency, Prediction};
pub use service::predict;
