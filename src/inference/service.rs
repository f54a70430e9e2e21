//! Inference orchestration: model check, feature mapping, scoring, formatting.

use crate::common::error::SalaryResult;
use crate::features::domain::FeatureRecord;
use crate::features::service as features;
use crate::model::domain::Regressor;
use crate::model::service::ModelHandle;

use super::domain::Prediction;

/// Serve one prediction request from its raw JSON body.
///
/// The model check runs before the body is looked at, so an unavailable
/// model always wins over a malformed request.
pub fn predict(handle: &ModelHandle, body: &[u8]) -> SalaryResult<Prediction> {
    let model = handle.regressor()?;
    let payload = features::parse_payload(body)?;
    let record = features::build_record(&payload)?;
    predict_record(model, &record)
}

/// Score an already built feature record.
pub fn predict_record(model: &dyn Regressor, record: &FeatureRecord) -> SalaryResult<Prediction> {
    let value = model.predict(record)?;
    tracing::debug!(predicted = value, "scored feature record");
    Ok(Prediction::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::SalaryError;
    use crate::features::FeatureValue;

    /// Echoes experience plus CTC so tests can see what reached the model.
    struct Echo;

    impl Regressor for Echo {
        fn predict(&self, row: &FeatureRecord) -> SalaryResult<f64> {
            let exp = row.get("Total_Experience").and_then(FeatureValue::as_f64).unwrap_or(-1.0);
            let ctc = row.get("Current_CTC").and_then(FeatureValue::as_f64).unwrap_or(-1.0);
            if row.get("Passing_Year_Of_PG") != Some(&FeatureValue::Missing) {
                return Err(SalaryError::inference("PG year reached the model"));
            }
            Ok(exp * 100_000.0 + ctc)
        }
    }

    #[test]
    fn unavailable_model_short_circuits() {
        let handle = ModelHandle::unavailable("no file");
        let err = predict(&handle, b"this is not even json").unwrap_err();
        assert!(matches!(err, SalaryError::ModelUnavailable));
    }

    #[test]
    fn end_to_end_with_defaults() {
        let handle = ModelHandle::available(Echo);
        let prediction = predict(
            &handle,
            br#"{"Total_Experience": 5, "Department": "IT", "Education": "Grad"}"#,
        )
        .unwrap();
        assert_eq!(prediction.predicted_salary, 500_000.0);
        assert_eq!(prediction.formatted_salary, "₹500,000.00");
    }

    #[test]
    fn zero_year_never_reaches_model() {
        let handle = ModelHandle::available(Echo);
        assert!(predict(&handle, br#"{"Passing_Year_Of_PG": 0}"#).is_ok());
        let err = predict(&handle, br#"{"Passing_Year_Of_PG": 2016}"#).unwrap_err();
        assert!(matches!(err, SalaryError::InferenceFailure(_)));
    }

    #[test]
    fn identical_bodies_give_identical_predictions() {
        let handle = ModelHandle::available(Echo);
        let body = br#"{"Total_Experience": "3.5", "Current_CTC": 420000}"#;
        let first = predict(&handle, body).unwrap();
        let second = predict(&handle, body).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn bad_numeric_input_is_invalid_input() {
        let handle = ModelHandle::available(Echo);
        let err = predict(&handle, br#"{"Total_Experience": "abc"}"#).unwrap_err();
        assert!(matches!(err, SalaryError::InvalidInput { .. }));
    }
}
