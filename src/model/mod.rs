//! Model domain: artefact format, loading, and the shared model handle.

pub mod domain;
pub mod repo_fs;
pub mod service;

pub use domain::{ModelArtifact, ObliviousEnsemble, Regressor};
pub use repo_fs::{FsModelRepo, ModelRepo};
pub use service::{load_handle, ModelHandle};
