//! Per-host metric readings

use serde::{Deserialize, Serialize};

/// Why a host produced no usable reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum MetricError {
    #[error("No such metric")]
    NoSuchMetric,

    #[error("Metric not collected yet")]
    NotCollectedYet,

    #[error("Metric collection timed out")]
    Timeout,

    #[error("Metric query failed: {0}")]
    Query(String),

    #[error("Metric reading is not a finite number")]
    NotFinite,
}

/// Outcome of measuring one host at one point in time.
///
/// Larger values are worse (e.g. seconds of replication lag). A failure is
/// never coerced into a number; callers go through [`MetricResult::get`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricResult {
    Value(f64),
    Failure(MetricError),
}

impl MetricResult {
    pub fn value(value: f64) -> Self {
        Self::Value(value)
    }

    pub fn failure(error: MetricError) -> Self {
        Self::Failure(error)
    }

    pub fn no_such_metric() -> Self {
        Self::Failure(MetricError::NoSuchMetric)
    }

    pub fn get(&self) -> Result<f64, MetricError> {
        match self {
            Self::Value(value) => Ok(*value),
            Self::Failure(error) => Err(error.clone()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The reading if it is a finite number. NaN and infinities yield `None`,
    /// same as a failure.
    pub fn finite_value(&self) -> Option<f64> {
        match self {
            Self::Value(value) if value.is_finite() => Some(*value),
            _ => None,
        }
    }

    /// Turn a non-finite value into a `NotFinite` failure so it can never
    /// pass for a measured lag.
    pub fn into_finite(self) -> Self {
        match self {
            Self::Value(value) if !value.is_finite() => Self::Failure(MetricError::NotFinite),
            other => other,
        }
    }
}

impl From<Result<f64, MetricError>> for MetricResult {
    fn from(result: Result<f64, MetricError>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(error) => Self::Failure(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_value() {
        assert_eq!(MetricResult::value(1.5).get(), Ok(1.5));
        assert!(!MetricResult::value(1.5).is_failure());
    }

    #[test]
    fn test_get_failure_keeps_kind() {
        let result = MetricResult::failure(MetricError::Query("access denied".into()));
        assert_eq!(
            result.get(),
            Err(MetricError::Query("access denied".into()))
        );
        assert!(result.is_failure());
        assert_eq!(MetricResult::no_such_metric().get(), Err(MetricError::NoSuchMetric));
    }

    #[test]
    fn test_from_result() {
        assert_eq!(MetricResult::from(Ok(0.3)), MetricResult::Value(0.3));
        assert_eq!(
            MetricResult::from(Err(MetricError::Timeout)),
            MetricResult::Failure(MetricError::Timeout)
        );
    }

    #[test]
    fn test_non_finite_values_become_failures() {
        let negative_nan = -f64::NAN;
        assert!(negative_nan.is_sign_negative());

        for value in [f64::NAN, negative_nan, f64::INFINITY, f64::NEG_INFINITY] {
            let result = MetricResult::value(value);
            assert_eq!(result.finite_value(), None);
            assert_eq!(result.into_finite().get(), Err(MetricError::NotFinite));
        }

        assert_eq!(MetricResult::value(0.0).finite_value(), Some(0.0));
        assert_eq!(MetricResult::value(1.5).into_finite(), MetricResult::value(1.5));
        assert_eq!(
            MetricResult::failure(MetricError::Timeout).into_finite(),
            MetricResult::failure(MetricError::Timeout)
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(MetricError::NoSuchMetric.to_string(), "No such metric");
        assert_eq!(MetricError::NotCollectedYet.to_string(), "Metric not collected yet");
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&MetricResult::value(0.6)).unwrap();
        assert_eq!(json, r#"{"value":0.6}"#);
        let back: MetricResult = serde_json::from_str(r#"{"failure":"NoSuchMetric"}"#).unwrap();
        assert_eq!(back, MetricResult::no_such_metric());
    }
}
