//! Domain types for the regression model artefact.
//!
//! The artefact is a symmetric (oblivious) tree ensemble: every level of a
//! tree shares one split, so a row's leaf is the bit pattern of its split
//! outcomes. Trees are evaluated independently and summed.

use std::collections::HashMap;

use serde::Deserialize;

use crate::common::error::{ModelLoadError, SalaryError, SalaryResult};
use crate::features::domain::{self as features, FeatureRecord, FeatureValue};

/// Artefact layout version understood by this build.
pub const FORMAT_VERSION: u32 = 1;

/// Deepest tree accepted. Keeps `2^depth` leaf tables bounded.
pub const MAX_DEPTH: usize = 16;

/// Anything that turns one feature row into one scalar.
pub trait Regressor: Send + Sync {
    fn predict(&self, row: &FeatureRecord) -> SalaryResult<f64>;
}

/// Column type as declared by the artefact.
#[derive(Copy, Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Float,
    Categorical,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FeatureDecl {
    pub name: String,
    pub kind: FeatureKind,
}

/// How missing float values are routed through float splits.
#[derive(Copy, Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum NanMode {
    /// Missing sorts below every border.
    #[default]
    Min,
    /// Missing sorts above every border.
    Max,
    /// Missing values are an inference error.
    Forbidden,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Split {
    /// True when the value is strictly greater than `border`.
    Float { feature: String, border: f64 },
    /// True when the category equals `value`.
    OneHot { feature: String, value: String },
}

impl Split {
    pub fn feature(&self) -> &str {
        match self {
            Split::Float { feature, .. } | Split::OneHot { feature, .. } => feature,
        }
    }

    fn expected_kind(&self) -> FeatureKind {
        match self {
            Split::Float { .. } => FeatureKind::Float,
            Split::OneHot { .. } => FeatureKind::Categorical,
        }
    }

    fn evaluate(&self, value: &FeatureValue, nan_mode: NanMode) -> SalaryResult<bool> {
        match self {
            Split::Float { feature, border } => {
                if value.is_missing() {
                    return match nan_mode {
                        NanMode::Min => Ok(false),
                        NanMode::Max => Ok(true),
                        NanMode::Forbidden => Err(SalaryError::inference(format!(
                            "missing value for {feature} is not allowed by this model"
                        ))),
                    };
                }
                let x = value.as_f64().ok_or_else(|| {
                    SalaryError::inference(format!("{feature} must be numeric, got {value}"))
                })?;
                Ok(x > *border)
            }
            Split::OneHot { feature, value: label } => {
                let got = value.as_category().ok_or_else(|| {
                    SalaryError::inference(format!("{feature} must be categorical, got {value}"))
                })?;
                Ok(got == label)
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ObliviousTree {
    pub splits: Vec<Split>,
    pub leaf_values: Vec<f64>,
}

impl ObliviousTree {
    fn leaf_index(&self, row: &FeatureRecord, nan_mode: NanMode) -> SalaryResult<usize> {
        let mut index = 0usize;
        for (bit, split) in self.splits.iter().enumerate() {
            let value = row.get(split.feature()).ok_or_else(|| {
                SalaryError::inference(format!("row has no column {}", split.feature()))
            })?;
            if split.evaluate(value, nan_mode)? {
                index |= 1 << bit;
            }
        }
        Ok(index)
    }
}

/// Serialized form of the whole artefact.
#[derive(Clone, Debug, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub features: Vec<FeatureDecl>,
    #[serde(default)]
    pub nan_mode: NanMode,
    #[serde(default)]
    pub bias: f64,
    #[serde(default = "unit_scale")]
    pub scale: f64,
    pub trees: Vec<ObliviousTree>,
}

fn unit_scale() -> f64 {
    1.0
}

/// Validated, ready-to-evaluate ensemble.
#[derive(Clone, Debug)]
pub struct ObliviousEnsemble {
    features: Vec<FeatureDecl>,
    nan_mode: NanMode,
    bias: f64,
    scale: f64,
    trees: Vec<ObliviousTree>,
}

impl ObliviousEnsemble {
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

impl TryFrom<ModelArtifact> for ObliviousEnsemble {
    type Error = ModelLoadError;

    fn try_from(artifact: ModelArtifact) -> Result<Self, Self::Error> {
        if artifact.format_version != FORMAT_VERSION {
            return Err(ModelLoadError::schema(format!(
                "unsupported format_version {} (expected {FORMAT_VERSION})",
                artifact.format_version
            )));
        }
        if !artifact.bias.is_finite() || !artifact.scale.is_finite() {
            return Err(ModelLoadError::schema("bias and scale must be finite"));
        }

        let mut declared: HashMap<&str, FeatureKind> = HashMap::new();
        for decl in &artifact.features {
            let field = features::field(&decl.name).ok_or_else(|| {
                ModelLoadError::schema(format!(
                    "feature {} is not part of the salary schema",
                    decl.name
                ))
            })?;
            let compatible = match decl.kind {
                FeatureKind::Float => field.kind.is_numeric(),
                FeatureKind::Categorical => !field.kind.is_numeric(),
            };
            if !compatible {
                return Err(ModelLoadError::schema(format!(
                    "feature {} declared as {:?} but the schema field is {:?}",
                    decl.name, decl.kind, field.kind
                )));
            }
            if declared.insert(decl.name.as_str(), decl.kind).is_some() {
                return Err(ModelLoadError::schema(format!("feature {} declared twice", decl.name)));
            }
        }

        for (idx, tree) in artifact.trees.iter().enumerate() {
            let depth = tree.splits.len();
            if depth > MAX_DEPTH {
                return Err(ModelLoadError::schema(format!(
                    "tree {idx} has depth {depth}, limit is {MAX_DEPTH}"
                )));
            }
            if tree.leaf_values.len() != 1 << depth {
                return Err(ModelLoadError::schema(format!(
                    "tree {idx} has {} leaves, expected {}",
                    tree.leaf_values.len(),
                    1usize << depth
                )));
            }
            if tree.leaf_values.iter().any(|v| !v.is_finite()) {
                return Err(ModelLoadError::schema(format!("tree {idx} has a non-finite leaf")));
            }
            for split in &tree.splits {
                match declared.get(split.feature()) {
                    None => {
                        return Err(ModelLoadError::schema(format!(
                            "tree {idx} splits on undeclared feature {}",
                            split.feature()
                        )))
                    }
                    Some(kind) if *kind != split.expected_kind() => {
                        return Err(ModelLoadError::schema(format!(
                            "tree {idx} uses a {:?} split on {:?} feature {}",
                            split.expected_kind(),
                            kind,
                            split.feature()
                        )))
                    }
                    Some(_) => {}
                }
                if let Split::Float { border, .. } = split {
                    if !border.is_finite() {
                        return Err(ModelLoadError::schema(format!(
                            "tree {idx} has a non-finite border"
                        )));
                    }
                }
            }
        }

        Ok(Self {
            features: artifact.features,
            nan_mode: artifact.nan_mode,
            bias: artifact.bias,
            scale: artifact.scale,
            trees: artifact.trees,
        })
    }
}

impl Regressor for ObliviousEnsemble {
    fn predict(&self, row: &FeatureRecord) -> SalaryResult<f64> {
        for decl in &self.features {
            if row.get(&decl.name).is_none() {
                return Err(SalaryError::inference(format!("row has no column {}", decl.name)));
            }
        }

        let mut sum = 0.0;
        for tree in &self.trees {
            let leaf = tree.leaf_index(row, self.nan_mode)?;
            sum += tree.leaf_values[leaf];
        }

        let value = self.bias + self.scale * sum;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(SalaryError::inference("model produced a non-finite value"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn artifact(value: serde_json::Value) -> ModelArtifact {
        serde_json::from_value(value).unwrap()
    }

    fn two_level() -> ObliviousEnsemble {
        artifact(json!({
            "format_version": 1,
            "features": [
                {"name": "Total_Experience", "kind": "float"},
                {"name": "Department", "kind": "categorical"}
            ],
            "bias": 100.0,
            "scale": 2.0,
            "trees": [{
                "splits": [
                    {"type": "float", "feature": "Total_Experience", "border": 4.5},
                    {"type": "one_hot", "feature": "Department", "value": "IT"}
                ],
                "leaf_values": [1.0, 10.0, 20.0, 30.0]
            }]
        }))
        .try_into()
        .unwrap()
    }

    fn row(pairs: &[(&str, FeatureValue)]) -> FeatureRecord {
        let mut record = FeatureRecord::defaults();
        for (name, value) in pairs {
            record.set(name, value.clone());
        }
        record
    }

    #[test]
    fn leaf_index_follows_split_bits() {
        let model = two_level();
        let cases = [
            (1.0, "HR", 100.0 + 2.0 * 1.0),
            (5.0, "HR", 100.0 + 2.0 * 10.0),
            (1.0, "IT", 100.0 + 2.0 * 20.0),
            (5.0, "IT", 100.0 + 2.0 * 30.0),
        ];
        for (exp, dept, expected) in cases {
            let r = row(&[
                ("Total_Experience", FeatureValue::Number(exp)),
                ("Department", FeatureValue::Category(dept.into())),
            ]);
            assert_eq!(model.predict(&r).unwrap(), expected, "exp={exp} dept={dept}");
        }
    }

    #[test]
    fn border_is_exclusive() {
        let model = two_level();
        let r = row(&[("Total_Experience", FeatureValue::Number(4.5))]);
        assert_eq!(model.predict(&r).unwrap(), 102.0);
    }

    #[test]
    fn integer_columns_feed_float_splits() {
        let model: ObliviousEnsemble = artifact(json!({
            "format_version": 1,
            "features": [{"name": "Certifications", "kind": "float"}],
            "trees": [{
                "splits": [{"type": "float", "feature": "Certifications", "border": 1.5}],
                "leaf_values": [0.0, 7.0]
            }]
        }))
        .try_into()
        .unwrap();
        let r = row(&[("Certifications", FeatureValue::Integer(2))]);
        assert_eq!(model.predict(&r).unwrap(), 7.0);
    }

    fn year_model(nan_mode: &str) -> ObliviousEnsemble {
        artifact(json!({
            "format_version": 1,
            "features": [{"name": "Passing_Year_Of_PG", "kind": "float"}],
            "nan_mode": nan_mode,
            "trees": [{
                "splits": [{"type": "float", "feature": "Passing_Year_Of_PG", "border": 2015.0}],
                "leaf_values": [-1.0, 1.0]
            }]
        }))
        .try_into()
        .unwrap()
    }

    #[test]
    fn nan_mode_routes_missing_values() {
        let missing = FeatureRecord::defaults();
        assert_eq!(year_model("min").predict(&missing).unwrap(), -1.0);
        assert_eq!(year_model("max").predict(&missing).unwrap(), 1.0);
        let err = year_model("forbidden").predict(&missing).unwrap_err();
        assert!(matches!(err, SalaryError::InferenceFailure(_)));
    }

    #[test]
    fn empty_ensemble_predicts_bias() {
        let model: ObliviousEnsemble = artifact(json!({
            "format_version": 1,
            "features": [],
            "bias": 42.0,
            "trees": []
        }))
        .try_into()
        .unwrap();
        assert_eq!(model.predict(&FeatureRecord::defaults()).unwrap(), 42.0);
    }

    #[test]
    fn rejects_inconsistent_artifacts() {
        let float_ctc = json!([{"name": "Current_CTC", "kind": "float"}]);
        let bad = [
            json!({"format_version": 2, "features": [], "trees": []}),
            json!({
                "format_version": 1,
                "features": [{"name": "Shoe_Size", "kind": "float"}],
                "trees": []
            }),
            json!({
                "format_version": 1,
                "features": [{"name": "Department", "kind": "float"}],
                "trees": []
            }),
            json!({"format_version": 1, "features": [
                {"name": "Role", "kind": "categorical"},
                {"name": "Role", "kind": "categorical"}
            ], "trees": []}),
            json!({"format_version": 1, "features": float_ctc.clone(), "trees": [{
                "splits": [{"type": "float", "feature": "Current_CTC", "border": 1.0}],
                "leaf_values": [1.0]
            }]}),
            json!({"format_version": 1, "features": float_ctc, "trees": [{
                "splits": [{"type": "float", "feature": "Total_Experience", "border": 1.0}],
                "leaf_values": [1.0, 2.0]
            }]}),
            json!({
                "format_version": 1,
                "features": [{"name": "Role", "kind": "categorical"}],
                "trees": [{
                    "splits": [{"type": "float", "feature": "Role", "border": 1.0}],
                    "leaf_values": [1.0, 2.0]
                }]
            }),
        ];
        for value in bad {
            let result = ObliviousEnsemble::try_from(artifact(value.clone()));
            assert!(
                matches!(result, Err(ModelLoadError::Schema(_))),
                "accepted {value}"
            );
        }
    }

    #[test]
    fn non_finite_result_is_an_inference_failure() {
        let model: ObliviousEnsemble = artifact(json!({
            "format_version": 1,
            "features": [],
            "bias": 1.0e308,
            "scale": 1.0e308,
            "trees": [{"splits": [], "leaf_values": [10.0]}]
        }))
        .try_into()
        .unwrap();
        let err = model.predict(&FeatureRecord::defaults()).unwrap_err();
        assert!(matches!(err, SalaryError::InferenceFailure(_)));
    }
}
