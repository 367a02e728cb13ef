//! Prediction request and response types

use serde::{Deserialize, Serialize};

use crate::domain::{AdvisoryLookup, FeatureVector, LocalizedAdvice, PredictionOutcome};

/// Seven form inputs plus the selected model id
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    #[serde(flatten)]
    pub features: FeatureVector,
    pub model: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub label: String,
    pub model: String,
    pub language: String,
    pub advisory_unavailable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<LocalizedAdvice>,
}

impl From<PredictionOutcome> for PredictResponse {
    fn from(outcome: PredictionOutcome) -> Self {
        let advisory = match outcome.advisory {
            AdvisoryLookup::Found(advice) => Some(advice),
            AdvisoryLookup::Unavailable => None,
        };

        Self {
            label: outcome.label,
            model: outcome.model.as_str().to_string(),
            language: outcome.language,
            advisory_unavailable: advisory.is_none(),
            advisory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelKind;

    #[test]
    fn test_request_deserialization() {
        let request: PredictRequest = serde_json::from_value(serde_json::json!({
            "n": 90, "p": 42, "k": 43, "temperature": 20.8,
            "humidity": 82.0, "ph": 6.5, "rainfall": 202.9,
            "model": "random_forest"
        }))
        .unwrap();

        assert_eq!(request.features.n, 90.0);
        assert_eq!(request.model, "random_forest");
    }

    #[test]
    fn test_unavailable_advisory_response() {
        let response = PredictResponse::from(PredictionOutcome {
            label: "Quinoa".to_string(),
            model: ModelKind::Mlp,
            language: "English".to_string(),
            advisory: AdvisoryLookup::Unavailable,
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["advisory_unavailable"], true);
        assert!(json.get("advisory").is_none());
    }
}
