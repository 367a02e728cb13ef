//! CSV loader for labeled agricultural records

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::domain::crop::{Feature, FeatureVector, SampleRecord, FEATURE_COUNT};
use crate::domain::DomainError;

/// Labeled records read from one dataset file
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<SampleRecord>,
}

impl Dataset {
    pub fn new(records: Vec<SampleRecord>) -> Self {
        Self { records }
    }

    /// Parse CSV from any reader; the label column must be named explicitly
    pub fn from_reader<R: Read>(reader: R, label_column: &str) -> Result<Self, DomainError> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| DomainError::data_load(format!("Failed to read header row: {}", e)))?
            .clone();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(DomainError::data_load("Dataset is empty: no header row"));
        }

        let label_index = headers
            .iter()
            .position(|h| h == label_column)
            .ok_or_else(|| {
                DomainError::data_load(format!(
                    "Label column '{}' not found; available columns: {}",
                    label_column,
                    headers.iter().collect::<Vec<_>>().join(", ")
                ))
            })?;

        let mut feature_indices = [0usize; FEATURE_COUNT];
        for feature in Feature::ALL {
            feature_indices[feature.index()] = headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(feature.column_name()))
                .ok_or_else(|| {
                    DomainError::data_load(format!(
                        "Feature column '{}' not found",
                        feature.column_name()
                    ))
                })?;
        }

        let mut records = Vec::new();

        for (row, result) in reader.records().enumerate() {
            // header is line 1
            let line = row + 2;
            let record = result
                .map_err(|e| DomainError::data_load(format!("Line {}: {}", line, e)))?;

            let label = record.get(label_index).unwrap_or_default().trim();
            if label.is_empty() {
                return Err(DomainError::data_load(format!(
                    "Line {}: empty value in label column '{}'",
                    line, label_column
                )));
            }

            let mut values = [0.0f64; FEATURE_COUNT];
            for feature in Feature::ALL {
                let raw = record.get(feature_indices[feature.index()]).unwrap_or_default();
                values[feature.index()] = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| {
                        DomainError::data_load(format!(
                            "Line {}: column '{}' is not numeric ('{}')",
                            line,
                            feature.column_name(),
                            raw
                        ))
                    })?;
            }

            records.push(SampleRecord::new(FeatureVector::from_array(values), label));
        }

        if records.is_empty() {
            return Err(DomainError::data_load("Dataset is empty: no data rows"));
        }

        debug!(rows = records.len(), "Parsed dataset");
        Ok(Self { records })
    }

    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Feature rows in canonical order
    pub fn feature_rows(&self) -> Vec<Vec<f64>> {
        self.records
            .iter()
            .map(|r| r.features.to_array().to_vec())
            .collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.records.iter().map(|r| r.label.clone()).collect()
    }

    /// Distinct labels, sorted
    pub fn classes(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Read the dataset file at `path`
pub fn load_dataset(path: impl AsRef<Path>, label_column: &str) -> Result<Dataset, DomainError> {
    let path = path.as_ref();

    let file = std::fs::File::open(path).map_err(|e| {
        DomainError::data_load(format!("Cannot open dataset '{}': {}", path.display(), e))
    })?;

    let dataset = Dataset::from_reader(file, label_column)?;

    info!(
        path = %path.display(),
        rows = dataset.len(),
        classes = dataset.classes().len(),
        "Dataset loaded"
    );

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "N,P,K,temperature,humidity,ph,rainfall,label\n\
        90,42,43,20.8,82.0,6.5,202.9,rice\n\
        85,58,41,21.7,80.3,7.0,226.6,rice\n\
        20,67,20,22.6,21.4,5.7,77.0,chickpea\n";

    #[test]
    fn test_parse_valid_csv() {
        let dataset = Dataset::from_reader(CSV.as_bytes(), "label").unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.classes(), vec!["chickpea", "rice"]);
        assert_eq!(dataset.records()[0].features.n, 90.0);
        assert_eq!(dataset.records()[2].features.rainfall, 77.0);
    }

    #[test]
    fn test_label_column_must_exist() {
        let err = Dataset::from_reader(CSV.as_bytes(), "Crop").unwrap_err();
        assert!(matches!(err, DomainError::DataLoad { .. }));
        assert!(err.to_string().contains("'Crop'"));
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let csv = "Crop,rainfall,ph,humidity,temperature,K,P,N\nmaize,100,6,60,25,30,40,50\n";
        let dataset = Dataset::from_reader(csv.as_bytes(), "Crop").unwrap();
        let features = dataset.records()[0].features;

        assert_eq!(features.n, 50.0);
        assert_eq!(features.k, 30.0);
        assert_eq!(features.rainfall, 100.0);
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(Dataset::from_reader("".as_bytes(), "label").is_err());

        let header_only = "N,P,K,temperature,humidity,ph,rainfall,label\n";
        let err = Dataset::from_reader(header_only.as_bytes(), "label").unwrap_err();
        assert!(err.to_string().contains("no data rows"));
    }

    #[test]
    fn test_non_numeric_cell_names_line() {
        let csv = "N,P,K,temperature,humidity,ph,rainfall,label\n1,2,x,4,5,6,7,rice\n";
        let err = Dataset::from_reader(csv.as_bytes(), "label").unwrap_err();
        assert!(err.to_string().contains("Line 2"));
        assert!(err.to_string().contains("'K'"));
    }

    #[test]
    fn test_non_finite_cells_rejected() {
        let nan = "N,P,K,temperature,humidity,ph,rainfall,label\n\
            90,42,43,20.8,82.0,6.5,202.9,rice\n\
            NaN,58,41,21.7,80.3,7.0,226.6,rice\n";
        let err = Dataset::from_reader(nan.as_bytes(), "label").unwrap_err();
        assert!(matches!(err, DomainError::DataLoad { .. }));
        assert!(err.to_string().contains("Line 3"));
        assert!(err.to_string().contains("'N'"));

        let inf = "N,P,K,temperature,humidity,ph,rainfall,label\n20,67,inf,22.6,21.4,5.7,77.0,chickpea\n";
        let err = Dataset::from_reader(inf.as_bytes(), "label").unwrap_err();
        assert!(err.to_string().contains("'K'"));

        let neg_inf = "N,P,K,temperature,humidity,ph,rainfall,label\n20,67,20,22.6,21.4,5.7,-inf,chickpea\n";
        assert!(Dataset::from_reader(neg_inf.as_bytes(), "label").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_dataset("/definitely/not/here.csv", "label").unwrap_err();
        assert!(matches!(err, DomainError::DataLoad { .. }));
    }
}
