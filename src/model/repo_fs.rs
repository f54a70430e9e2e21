//! Filesystem repository for the trained model artefact.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::common::config::AppCfg;
use crate::common::error::ModelLoadError;

use super::domain::{ModelArtifact, ObliviousEnsemble};

/// Source of the model artefact.
pub trait ModelRepo {
    fn load(&self) -> Result<ObliviousEnsemble, ModelLoadError>;
    fn location(&self) -> String;
}

/// Reads the artefact from one fixed path on local disk. Read-only.
pub struct FsModelRepo {
    path: PathBuf,
}

impl FsModelRepo {
    pub fn new(cfg: &AppCfg) -> Self {
        Self::at(&cfg.model_path)
    }

    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ModelRepo for FsModelRepo {
    fn load(&self) -> Result<ObliviousEnsemble, ModelLoadError> {
        let file = File::open(&self.path)?;
        let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file))?;
        ObliviousEnsemble::try_from(artifact)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_tmp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_valid_artefact() {
        let file = write_tmp(
            r#"{"format_version": 1,
                "features": [{"name": "Current_CTC", "kind": "float"}],
                "bias": 5.0,
                "trees": [{"splits": [{"type": "float", "feature": "Current_CTC", "border": 10.0}],
                           "leaf_values": [0.0, 1.0]}]}"#,
        );
        let model = FsModelRepo::at(file.path()).load().unwrap();
        assert_eq!(model.tree_count(), 1);
        assert_eq!(model.feature_count(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsModelRepo::at(dir.path().join("absent.json")).load().unwrap_err();
        assert!(matches!(err, ModelLoadError::Io(_)));
    }

    #[test]
    fn corrupt_file_is_parse_error() {
        let file = write_tmp("\u{1}\u{2}not a model");
        let err = FsModelRepo::at(file.path()).load().unwrap_err();
        assert!(matches!(err, ModelLoadError::Parse(_)));
    }

    #[test]
    fn incompatible_file_is_schema_error() {
        let file = write_tmp(r#"{"format_version": 9, "features": [], "trees": []}"#);
        let err = FsModelRepo::at(file.path()).load().unwrap_err();
        assert!(matches!(err, ModelLoadError::Schema(_)));
    }
}
