//! Held-out evaluation: accuracy and a per-class report

use std::collections::BTreeSet;
use std::fmt;

use aprender::metrics::classification::{
    accuracy, confusion_matrix, f1_score, precision, recall, Average,
};
use serde::Serialize;

use crate::domain::DomainError;

/// Precision, recall and F1 for one class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Averaged precision, recall and F1
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AveragedMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl AveragedMetrics {
    fn compute(y_pred: &[usize], y_true: &[usize], average: Average) -> Self {
        Self {
            precision: f64::from(precision(y_pred, y_true, average)),
            recall: f64::from(recall(y_pred, y_true, average)),
            f1: f64::from(f1_score(y_pred, y_true, average)),
        }
    }
}

/// Classification report for one fitted model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub per_class: Vec<ClassMetrics>,
    pub macro_avg: AveragedMetrics,
    pub weighted_avg: AveragedMetrics,
    pub support: usize,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Compare predictions to the true labels
///
/// Classes are the union of both label sets, sorted. Mismatched or empty
/// label slices are rejected before they reach the metric functions.
pub fn evaluate(y_true: &[String], y_pred: &[String]) -> Result<EvaluationReport, DomainError> {
    if y_true.len() != y_pred.len() {
        return Err(DomainError::model(format!(
            "Cannot score {} predictions against {} labels",
            y_pred.len(),
            y_true.len()
        )));
    }
    if y_true.is_empty() {
        return Err(DomainError::validation("No held-out rows to evaluate on"));
    }

    let labels: Vec<&str> = y_true
        .iter()
        .chain(y_pred.iter())
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let ids = |values: &[String]| -> Vec<usize> {
        values
            .iter()
            .filter_map(|v| labels.binary_search(&v.as_str()).ok())
            .collect()
    };
    let true_ids = ids(y_true);
    let pred_ids = ids(y_pred);

    // rows are true classes, columns predicted
    let matrix = confusion_matrix(&pred_ids, &true_ids);

    let per_class = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let tp = matrix.get(i, i);
            let support: usize = (0..labels.len()).map(|j| matrix.get(i, j)).sum();
            let predicted: usize = (0..labels.len()).map(|j| matrix.get(j, i)).sum();

            let precision = ratio(tp, predicted);
            let recall = ratio(tp, support);
            let f1 = if precision + recall == 0.0 {
                0.0
            } else {
                2.0 * precision * recall / (precision + recall)
            };

            ClassMetrics {
                label: label.to_string(),
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect();

    Ok(EvaluationReport {
        accuracy: f64::from(accuracy(&pred_ids, &true_ids)),
        per_class,
        macro_avg: AveragedMetrics::compute(&pred_ids, &true_ids, Average::Macro),
        weighted_avg: AveragedMetrics::compute(&pred_ids, &true_ids, Average::Weighted),
        support: y_true.len(),
    })
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .per_class
            .iter()
            .map(|c| c.label.len())
            .chain(std::iter::once("weighted avg".len()))
            .max()
            .unwrap_or(12);

        writeln!(
            f,
            "{:>width$}  {:>9}  {:>9}  {:>9}  {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;

        for c in &self.per_class {
            writeln!(
                f,
                "{:>width$}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9}",
                c.label, c.precision, c.recall, c.f1, c.support
            )?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "{:>width$}  {:>9}  {:>9}  {:>9.2}  {:>9}",
            "accuracy", "", "", self.accuracy, self.support
        )?;
        writeln!(
            f,
            "{:>width$}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9}",
            "macro avg",
            self.macro_avg.precision,
            self.macro_avg.recall,
            self.macro_avg.f1,
            self.support
        )?;
        write!(
            f,
            "{:>width$}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9}",
            "weighted avg",
            self.weighted_avg.precision,
            self.weighted_avg.recall,
            self.weighted_avg.f1,
            self.support
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_perfect_predictions() {
        let y = labels(&["rice", "maize", "rice"]);
        let report = evaluate(&y, &y).unwrap();

        assert_eq!(report.accuracy, 1.0);
        assert!(report.per_class.iter().all(|c| c.f1 == 1.0));
        assert_eq!(report.macro_avg.precision, 1.0);
    }

    #[test]
    fn test_per_class_counts() {
        let y_true = labels(&["rice", "rice", "maize", "maize"]);
        let y_pred = labels(&["rice", "maize", "maize", "maize"]);
        let report = evaluate(&y_true, &y_pred).unwrap();

        assert_eq!(report.accuracy, 0.75);

        let maize = &report.per_class[0];
        assert_eq!(maize.label, "maize");
        assert!((maize.precision - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(maize.recall, 1.0);
        assert_eq!(maize.support, 2);

        let rice = &report.per_class[1];
        assert_eq!(rice.precision, 1.0);
        assert_eq!(rice.recall, 0.5);
    }

    #[test]
    fn test_predicted_only_class_has_zero_support() {
        let report = evaluate(&labels(&["rice"]), &labels(&["wheat"])).unwrap();
        let wheat = report.per_class.iter().find(|c| c.label == "wheat").unwrap();

        assert_eq!(wheat.support, 0);
        assert_eq!(wheat.precision, 0.0);
        assert_eq!(report.accuracy, 0.0);
    }

    #[test]
    fn test_report_rendering() {
        let y = labels(&["rice", "maize"]);
        let text = evaluate(&y, &y).unwrap().to_string();

        assert!(text.contains("precision"));
        assert!(text.contains("weighted avg"));
        assert!(text.contains("rice"));
    }

    #[test]
    fn test_averages_follow_support() {
        let y_true = labels(&["rice", "rice", "rice", "maize"]);
        let y_pred = labels(&["rice", "rice", "rice", "rice"]);
        let report = evaluate(&y_true, &y_pred).unwrap();

        // maize: f1 0, rice: precision 0.75, recall 1
        let rice_f1 = 2.0 * 0.75 / 1.75;
        assert!((report.macro_avg.f1 - rice_f1 / 2.0).abs() < 1e-6);
        assert!((report.weighted_avg.f1 - rice_f1 * 0.75).abs() < 1e-6);
        assert!((report.weighted_avg.recall - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let err = evaluate(&labels(&["rice", "maize"]), &labels(&["rice"])).unwrap_err();
        assert!(matches!(err, DomainError::Model { .. }));
    }

    #[test]
    fn test_empty_partition_rejected() {
        assert!(evaluate(&[], &[]).is_err());
    }
}
