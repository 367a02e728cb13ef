use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::DomainError;

pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Numeric-column correlation matrix of an uploaded CSV
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationReport {
    pub columns: Vec<String>,
    pub row_count: usize,
    /// First rows of the file, as text
    pub preview: Vec<Vec<String>>,
    pub numeric_columns: Vec<String>,
    /// Pearson coefficients; `None` where a pair has fewer than two rows or no variance
    pub matrix: Vec<Vec<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Parse CSV bytes and correlate every numeric column
///
/// A column is numeric when every non-empty cell parses as a float. Empty input,
/// a header without rows or ragged rows are validation errors.
pub fn analyze_csv(bytes: &[u8], preview_rows: usize) -> Result<CorrelationReport, DomainError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(DomainError::validation("Uploaded file is empty"));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| DomainError::validation(format!("Cannot parse CSV header: {}", e)))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            DomainError::validation(format!("Cannot parse CSV row {}: {}", i + 1, e))
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    if rows.is_empty() {
        return Err(DomainError::validation("Uploaded CSV has no data rows"));
    }

    let mut numeric_columns = Vec::new();
    let mut series: Vec<Vec<Option<f64>>> = Vec::new();

    for (j, name) in columns.iter().enumerate() {
        if let Some(values) = numeric_series(&rows, j) {
            numeric_columns.push(name.clone());
            series.push(values);
        }
    }

    let matrix: Vec<Vec<Option<f64>>> = series
        .iter()
        .map(|a| series.iter().map(|b| pearson(a, b)).collect())
        .collect();

    let warning = numeric_columns
        .is_empty()
        .then(|| "No numeric columns to correlate".to_string());

    if warning.is_some() {
        warn!(columns = columns.len(), rows = rows.len(), "Uploaded CSV has no numeric columns");
    }

    debug!(
        rows = rows.len(),
        numeric = numeric_columns.len(),
        "Correlation matrix computed"
    );

    Ok(CorrelationReport {
        row_count: rows.len(),
        preview: rows.iter().take(preview_rows).cloned().collect(),
        columns,
        numeric_columns,
        matrix,
        warning,
    })
}

fn numeric_series(rows: &[Vec<String>], column: usize) -> Option<Vec<Option<f64>>> {
    let mut values = Vec::with_capacity(rows.len());
    let mut seen = false;

    for row in rows {
        let cell = row.get(column).map(String::as_str).unwrap_or("");
        if cell.is_empty() {
            values.push(None);
        } else {
            values.push(Some(cell.parse::<f64>().ok().filter(|v| v.is_finite())?));
            seen = true;
        }
    }

    seen.then_some(values)
}

/// Pearson correlation over rows where both values are present
fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
