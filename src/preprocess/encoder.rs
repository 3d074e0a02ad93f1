//! Categorical encoders

use serde::{Deserialize, Serialize};

use super::{RowTransform, TransformError, TransformOutput};
use crate::frame::{FeatureRow, Scalar, SparseRow};

/// A categorical column and the categories seen while fitting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedColumn {
    pub name: String,
    pub categories: Vec<Scalar>,
}

impl EncodedColumn {
    fn position(&self, value: &Scalar) -> Option<usize> {
        self.categories.iter().position(|c| c.same_category(value))
    }
}

/// What to do with a category not seen during fitting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Error,
    Ignore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Encoder {
    /// Indicator columns for each category, followed by the untouched columns
    OneHot {
        columns: Vec<EncodedColumn>,
        #[serde(default = "default_sparse_output")]
        sparse_output: bool,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
    /// Category index in place of the category
    Ordinal {
        columns: Vec<EncodedColumn>,
        #[serde(default)]
        unknown_value: Option<f64>,
    },
}

fn default_sparse_output() -> bool {
    true
}

fn lookup<'a>(row: &'a FeatureRow, column: &str) -> Result<&'a Scalar, TransformError> {
    row.get(column)
        .ok_or_else(|| TransformError(format!("column '{}' not found in input", column)))
}

impl Encoder {
    fn one_hot(
        columns: &[EncodedColumn],
        sparse_output: bool,
        handle_unknown: HandleUnknown,
        row: &FeatureRow,
    ) -> Result<TransformOutput, TransformError> {
        // Indicator positions set to one, in output order
        let mut hot = Vec::with_capacity(columns.len());
        let mut offset = 0;
        for column in columns {
            let value = lookup(row, &column.name)?;
            match (column.position(value), handle_unknown) {
                (Some(i), _) => hot.push(offset + i),
                (None, HandleUnknown::Ignore) => {}
                (None, HandleUnknown::Error) => {
                    return Err(TransformError(format!(
                        "found unknown category '{}' in column '{}' during transform",
                        value, column.name
                    )));
                }
            }
            offset += column.categories.len();
        }
        let encoded_width = offset;

        let passthrough: Vec<(&String, &Scalar)> = row
            .columns()
            .iter()
            .zip(row.values())
            .filter(|(name, _)| !columns.iter().any(|c| &c.name == *name))
            .collect();

        if sparse_output {
            let mut sparse = SparseRow::new(encoded_width + passthrough.len());
            for i in hot {
                sparse.set(i, 1.0)?;
            }
            for (j, (name, value)) in passthrough.iter().enumerate() {
                let v = value.to_f64().ok_or_else(|| {
                    TransformError(format!(
                        "column '{}' must be numeric for sparse output, got '{}'",
                        name, value
                    ))
                })?;
                sparse.set(encoded_width + j, v)?;
            }
            return Ok(TransformOutput::Sparse(sparse));
        }

        let mut labels = Vec::with_capacity(encoded_width + passthrough.len());
        let mut values = Vec::with_capacity(encoded_width + passthrough.len());
        let mut position = 0;
        for column in columns {
            for category in &column.categories {
                labels.push(format!("{}_{}", column.name, category));
                values.push(Scalar::Float(if hot.contains(&position) { 1.0 } else { 0.0 }));
                position += 1;
            }
        }
        for (name, value) in passthrough {
            labels.push(name.clone());
            values.push(value.clone());
        }
        Ok(TransformOutput::Dense(FeatureRow::new(labels, values)?))
    }

    fn ordinal(
        columns: &[EncodedColumn],
        unknown_value: Option<f64>,
        row: &FeatureRow,
    ) -> Result<TransformOutput, TransformError> {
        let mut values = row.values().to_vec();
        for column in columns {
            let index = row
                .columns()
                .iter()
                .position(|c| *c == column.name)
                .ok_or_else(|| {
                    TransformError(format!("column '{}' not found in input", column.name))
                })?;
            let code = match (column.position(&values[index]), unknown_value) {
                (Some(i), _) => i as f64,
                (None, Some(fallback)) => fallback,
                (None, None) => {
                    return Err(TransformError(format!(
                        "found unknown category '{}' in column '{}' during transform",
                        values[index], column.name
                    )));
                }
            };
            values[index] = Scalar::Float(code);
        }
        Ok(TransformOutput::Dense(FeatureRow::new(
            row.columns().to_vec(),
            values,
        )?))
    }
}

impl RowTransform for Encoder {
    fn transform(&self, row: &FeatureRow) -> Result<TransformOutput, TransformError> {
        match self {
            Encoder::OneHot {
                columns,
                sparse_output,
                handle_unknown,
            } => Encoder::one_hot(columns, *sparse_output, *handle_unknown, row),
            Encoder::Ordinal {
                columns,
                unknown_value,
            } => Encoder::ordinal(columns, *unknown_value, row),
        }
    }
}
