//! Feature schema shared by training and prediction

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Number of input features every model is fit on
pub const FEATURE_COUNT: usize = 7;

/// Canonical feature order: N, P, K, temperature, humidity, pH, rainfall
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"];

/// One input feature with the bounds accepted from the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Nitrogen,
    Phosphorus,
    Potassium,
    Temperature,
    Humidity,
    Ph,
    Rainfall,
}

impl Feature {
    /// All features in canonical order
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Nitrogen,
        Feature::Phosphorus,
        Feature::Potassium,
        Feature::Temperature,
        Feature::Humidity,
        Feature::Ph,
        Feature::Rainfall,
    ];

    /// Column name in the dataset file
    pub fn column_name(&self) -> &'static str {
        FEATURE_NAMES[self.index()]
    }

    /// Field name in request bodies
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Nitrogen => "n",
            Self::Phosphorus => "p",
            Self::Potassium => "k",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Ph => "ph",
            Self::Rainfall => "rainfall",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Nitrogen => 0,
            Self::Phosphorus => 1,
            Self::Potassium => 2,
            Self::Temperature => 3,
            Self::Humidity => 4,
            Self::Ph => 5,
            Self::Rainfall => 6,
        }
    }

    /// Inclusive (min, max) range accepted for this feature
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Nitrogen => (0.0, 140.0),
            Self::Phosphorus => (0.0, 140.0),
            Self::Potassium => (0.0, 200.0),
            Self::Temperature => (10.0, 45.0),
            Self::Humidity => (10.0, 100.0),
            Self::Ph => (3.5, 9.0),
            Self::Rainfall => (0.0, 400.0),
        }
    }

    /// Initial slider value before the user touches the form
    pub fn default_value(&self) -> f64 {
        match self {
            Self::Nitrogen => 60.0,
            Self::Phosphorus => 30.0,
            Self::Potassium => 70.0,
            Self::Temperature => 24.0,
            Self::Humidity => 60.0,
            Self::Ph => 6.8,
            Self::Rainfall => 150.0,
        }
    }

    /// Clamp a value into the accepted range
    pub fn clamp(&self, value: f64) -> f64 {
        let (min, max) = self.range();
        value.clamp(min, max)
    }
}

/// The seven numeric inputs of one submission
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub n: f64,
    pub p: f64,
    pub k: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

impl FeatureVector {
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        let [n, p, k, temperature, humidity, ph, rainfall] = values;
        Self {
            n,
            p,
            k,
            temperature,
            humidity,
            ph,
            rainfall,
        }
    }

    /// Values in canonical order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.n,
            self.p,
            self.k,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.to_array()[feature.index()]
    }

    /// Form defaults, with temperature and humidity taken from the weather snapshot
    pub fn defaults_with_weather(temperature: f64, humidity: f64) -> Self {
        let mut values = Feature::ALL.map(|f| f.default_value());
        values[Feature::Temperature.index()] = Feature::Temperature.clamp(temperature);
        values[Feature::Humidity.index()] = Feature::Humidity.clamp(humidity);
        Self::from_array(values)
    }

    /// Check every value is finite and inside its accepted range
    pub fn validate(&self) -> Result<(), DomainError> {
        for feature in Feature::ALL {
            let value = self.get(feature);
            let (min, max) = feature.range();

            if !value.is_finite() || value < min || value > max {
                return Err(DomainError::invalid_field(
                    feature.field_name(),
                    format!(
                        "{} must be between {} and {} (got {})",
                        feature.field_name(),
                        min,
                        max,
                        value
                    ),
                ));
            }
        }

        Ok(())
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::from_array(Feature::ALL.map(|f| f.default_value()))
    }
}

/// Labeled row of the training dataset
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    pub features: FeatureVector,
    pub label: String,
}

impl SampleRecord {
    pub fn new(features: FeatureVector, label: impl Into<String>) -> Self {
        Self {
            features,
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let fv = FeatureVector::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(fv.n, 1.0);
        assert_eq!(fv.ph, 6.0);
        assert_eq!(fv.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);

        for feature in Feature::ALL {
            assert_eq!(FEATURE_NAMES[feature.index()], feature.column_name());
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(FeatureVector::default().validate().is_ok());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let low = FeatureVector::from_array(Feature::ALL.map(|f| f.range().0));
        let high = FeatureVector::from_array(Feature::ALL.map(|f| f.range().1));
        assert!(low.validate().is_ok());
        assert!(high.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_names_field() {
        let fv = FeatureVector {
            ph: 9.5,
            ..FeatureVector::default()
        };

        match fv.validate() {
            Err(DomainError::Validation { field, .. }) => assert_eq!(field.as_deref(), Some("ph")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_nan_rejected() {
        let fv = FeatureVector {
            rainfall: f64::NAN,
            ..FeatureVector::default()
        };
        assert!(fv.validate().is_err());
    }

    #[test]
    fn test_weather_prefill_is_clamped() {
        let fv = FeatureVector::defaults_with_weather(-3.0, 120.0);
        assert_eq!(fv.temperature, 10.0);
        assert_eq!(fv.humidity, 100.0);
        assert_eq!(fv.n, 60.0);
    }
}
