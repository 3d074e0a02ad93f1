//! Feature records and single-row tables
//!
//! A [`FeatureRecord`] is what the caller sends: named values in the caller's
//! order. A [`FeatureRow`] is the labelled single-row table the preprocessing
//! chain and the models work on.

mod scalar;

pub use scalar::Scalar;

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Named feature values, in the order they were supplied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    entries: Vec<(String, Scalar)>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing an existing entry with the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Scalar>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for FeatureRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = FeatureRecord::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(n, v)| (n, v)))
    }
}

impl<'de> Deserialize<'de> for FeatureRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = FeatureRecord;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a map of feature name to scalar value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, Scalar)> =
                    Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, value)) = map.next_entry::<String, Scalar>()? {
                    if entries.iter().any(|(n, _)| *n == name) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate feature '{}'",
                            name
                        )));
                    }
                    entries.push((name, value));
                }
                Ok(FeatureRecord { entries })
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// A labelled single-row table
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    columns: Vec<String>,
    values: Vec<Scalar>,
}

impl FeatureRow {
    /// Build a row, rejecting mismatched label and value counts
    pub fn new(columns: Vec<String>, values: Vec<Scalar>) -> Result<Self, String> {
        if columns.len() != values.len() {
            return Err(format!(
                "{} column labels for {} values",
                columns.len(),
                values.len()
            ));
        }
        Ok(Self { columns, values })
    }

    /// Row with positional labels `0..n`
    pub fn positional(values: Vec<f64>) -> Self {
        let columns = (0..values.len()).map(|i| i.to_string()).collect();
        let values = values.into_iter().map(Scalar::Float).collect();
        Self { columns, values }
    }

    /// Row holding the record's entries in their supplied order
    pub fn from_record(record: &FeatureRecord) -> Self {
        let (columns, values) = record
            .iter()
            .map(|(n, v)| (n.to_string(), v.clone()))
            .unzip();
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    pub fn width(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    /// Numeric view of every value, naming the first column that cannot convert
    pub fn to_numeric(&self) -> Result<Vec<f64>, String> {
        self.columns
            .iter()
            .zip(&self.values)
            .map(|(column, value)| {
                value.to_f64().ok_or_else(|| {
                    format!(
                        "could not convert value '{}' of column '{}' to float",
                        value, column
                    )
                })
            })
            .collect()
    }

    /// Same labels, new numeric values
    pub fn with_numeric(&self, values: Vec<f64>) -> Result<Self, String> {
        FeatureRow::new(
            self.columns.clone(),
            values.into_iter().map(Scalar::Float).collect(),
        )
    }
}

/// Sparse single-row output of an encoder
#[derive(Debug, Clone, PartialEq)]
pub struct SparseRow {
    width: usize,
    entries: Vec<(usize, f64)>,
}

impl SparseRow {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            entries: Vec::new(),
        }
    }

    /// Set a non-zero entry; zeros are not stored
    pub fn set(&mut self, index: usize, value: f64) -> Result<(), String> {
        if index >= self.width {
            return Err(format!("index {} out of bounds for width {}", index, self.width));
        }
        if value != 0.0 {
            self.entries.retain(|(i, _)| *i != index);
            self.entries.push((index, value));
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Dense values in column order
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.width];
        for &(i, v) in &self.entries {
            dense[i] = v;
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_preserves_order() {
        let record: FeatureRecord = serde_json::from_str(r#"{"c": 3, "a": 1, "b": 2}"#).unwrap();
        assert_eq!(record.names().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(record.get("a"), Some(&Scalar::Int(1)));
    }

    #[test]
    fn test_record_rejects_duplicates() {
        let result: Result<FeatureRecord, _> = serde_json::from_str(r#"{"a": 1, "a": 2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_record_serializes_as_map() {
        let record: FeatureRecord = [("x", 1.5), ("y", 2.0)].into_iter().collect();
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"x":1.5,"y":2.0}"#);
    }

    #[test]
    fn test_row_numeric_conversion_error() {
        let row = FeatureRow::new(
            vec!["a".into(), "b".into()],
            vec![Scalar::Int(1), Scalar::Text("blue".into())],
        )
        .unwrap();
        let err = row.to_numeric().unwrap_err();
        assert!(err.contains("'b'"));
    }

    #[test]
    fn test_row_rejects_mismatched_widths() {
        assert!(FeatureRow::new(vec!["a".into()], vec![]).is_err());
    }

    #[test]
    fn test_sparse_to_dense() {
        let mut sparse = SparseRow::new(4);
        sparse.set(2, 1.0).unwrap();
        sparse.set(0, 0.0).unwrap();
        assert_eq!(sparse.nnz(), 1);
        assert_eq!(sparse.to_dense(), vec![0.0, 0.0, 1.0, 0.0]);
        assert!(sparse.set(4, 1.0).is_err());
    }
}
