//! Feature domain: the fixed salary feature schema and request-to-record mapping.

pub mod domain;
pub mod service;

pub use domain::{FeatureRecord, FeatureValue, FieldKind, FieldSpec, FIELDS};
