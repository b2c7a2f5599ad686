//! Shape summary of a loaded dataset

use polars::prelude::DataFrame;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: String,
}

/// Row count plus column names and inferred types
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
}

impl DatasetSummary {
    pub fn from_frame(frame: &DataFrame) -> Self {
        let columns = frame
            .get_columns()
            .iter()
            .map(|series| ColumnSummary {
                name: series.name().to_string(),
                dtype: series.dtype().to_string(),
            })
            .collect();

        Self {
            rows: frame.height(),
            columns,
        }
    }
}

impl std::fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} rows x {} columns", self.rows, self.columns.len())?;
        for column in &self.columns {
            writeln!(f, "  {:<40} {}", column.name, column.dtype)?;
        }
        Ok(())
    }
}
