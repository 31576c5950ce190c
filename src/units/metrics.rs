use super::UnitId;
use crate::error::DataError;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

const UNIT_ID_COLUMN: &str = "unit_id";

/// Named quality metrics for one unit, in configured column order
#[derive(Debug, Clone, PartialEq)]
pub struct UnitMetrics {
    pub values: Vec<(String, f64)>,
}

impl UnitMetrics {
    /// `name: value` pairs at five decimals, comma separated
    pub fn describe(&self) -> String {
        self.values
            .iter()
            .map(|(name, value)| format!("{}: {:.5}", name, value))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetricsTable {
    rows: BTreeMap<UnitId, UnitMetrics>,
}

impl MetricsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit: UnitId, metrics: UnitMetrics) {
        self.rows.insert(unit, metrics);
    }

    pub fn get(&self, unit: UnitId) -> Option<&UnitMetrics> {
        self.rows.get(&unit)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read `columns` from a metrics CSV
///
/// Every row is kept unless `only` restricts the load to a sorted list of
/// units. A unit id appearing on more than one row is an error.
pub fn load_metrics(
    path: &Path,
    columns: &[String],
    only: Option<&[UnitId]>,
) -> Result<MetricsTable, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let column_index = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    };

    let id_idx = column_index(UNIT_ID_COLUMN)?;
    let metric_idx = columns
        .iter()
        .map(|c| column_index(c))
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::new();
    let mut table = MetricsTable::new();
    for record in reader.records() {
        let record = record?;
        let raw_id = record.get(id_idx).unwrap_or_default();
        let unit: UnitId = raw_id.parse().map_err(|_| DataError::InvalidValue {
            column: UNIT_ID_COLUMN.to_string(),
            value: raw_id.to_string(),
        })?;
        if !seen.insert(unit) {
            return Err(DataError::DuplicateUnit(unit));
        }
        if let Some(ids) = only {
            if ids.binary_search(&unit).is_err() {
                continue;
            }
        }

        let mut values = Vec::with_capacity(columns.len());
        for (name, &idx) in columns.iter().zip(&metric_idx) {
            let raw = record.get(idx).unwrap_or_default();
            let value = parse_metric(raw).ok_or_else(|| DataError::InvalidValue {
                column: name.clone(),
                value: raw.to_string(),
            })?;
            values.push((name.clone(), value));
        }

        table.insert(unit, UnitMetrics { values });
    }

    Ok(table)
}

/// Empty cells and `nan` are read as NaN; quality metrics are often undefined
fn parse_metric(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return Some(f64::NAN);
    }
    raw.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
unit_id,snr,isi_violations_ratio,presence_ratio,amplitude_cutoff,firing_rate
1,5.25,0.01,0.99,0.002,3.1
2,1.5,0.4,0.5,,0.7
3,8.0,0.0,1.0,0.0,12.0
";

    fn columns() -> Vec<String> {
        vec!["snr".to_string(), "amplitude_cutoff".to_string()]
    }

    #[test]
    fn test_load_selected_units_and_columns() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), CSV).unwrap();

        let table = load_metrics(tmp.path(), &columns(), Some(&[1, 2][..])).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.get(3).is_none());

        let one = table.get(1).unwrap();
        assert_eq!(one.values[0], ("snr".to_string(), 5.25));
        assert_eq!(one.describe(), "snr: 5.25000,amplitude_cutoff: 0.00200");

        let two = table.get(2).unwrap();
        assert!(two.values[1].1.is_nan());
    }

    #[test]
    fn test_missing_column() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), CSV).unwrap();

        let err = load_metrics(tmp.path(), &["drift".to_string()], None).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(c) if c == "drift"));
    }

    #[test]
    fn test_invalid_value() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "unit_id,snr\n1,high\n").unwrap();

        let err = load_metrics(tmp.path(), &["snr".to_string()], None).unwrap_err();
        assert!(matches!(err, DataError::InvalidValue { .. }));
    }

    #[test]
    fn test_unfiltered_load_keeps_every_row() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), CSV).unwrap();

        let table = load_metrics(tmp.path(), &columns(), None).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.get(3).is_some());
    }

    #[test]
    fn test_repeated_unit_id_rejected() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "unit_id,snr\n1,1.0\n1,9.0\n2,2.0\n").unwrap();

        let err = load_metrics(tmp.path(), &["snr".to_string()], None).unwrap_err();
        assert!(matches!(err, DataError::DuplicateUnit(1)));

        // Repeats are caught even when the filter would drop them
        let err = load_metrics(tmp.path(), &["snr".to_string()], Some(&[2][..])).unwrap_err();
        assert!(matches!(err, DataError::DuplicateUnit(1)));
    }
}
