//! Process-wide table processing context

use once_cell::sync::OnceCell;
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info};

use super::error::{LoadError, Result};

static CONTEXT: OnceCell<ProcessingContext> = OnceCell::new();

/// Shared handle for reading and combining tables
///
/// One instance per process, created on first use and never torn down.
#[derive(Debug)]
pub struct ProcessingContext {
    app_name: String,
}

/// Builder for [`ProcessingContext::get_or_create`]
#[derive(Debug, Clone, Default)]
pub struct ProcessingContextBuilder {
    app_name: Option<String>,
}

impl ProcessingContextBuilder {
    pub fn app_name<S: Into<String>>(mut self, app_name: S) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Return the process context, creating it on first call
    ///
    /// Settings only apply to the call that creates the context.
    pub fn get_or_create(self) -> &'static ProcessingContext {
        CONTEXT.get_or_init(|| {
            let app_name = self.app_name.unwrap_or_else(|| super::APP_NAME.to_string());
            info!("Created processing context '{}'", app_name);
            ProcessingContext { app_name }
        })
    }
}

impl ProcessingContext {
    pub fn builder() -> ProcessingContextBuilder {
        ProcessingContextBuilder::default()
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Parse a CSV with a header row, inferring column types from every row
    pub fn read_csv(&self, path: &Path) -> Result<DataFrame> {
        if !path.exists() {
            return Err(LoadError::MissingCache {
                path: path.to_path_buf(),
            });
        }

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .and_then(|reader| reader.finish())
            .map_err(|source| LoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Read {} rows x {} columns from {}", frame.height(), frame.width(), path.display());
        Ok(frame)
    }

    /// Row-wise union, `first` rows then `second` rows
    ///
    /// Columns are matched by position; the result keeps the first table's
    /// names. Where the inferred types differ, numeric pairs widen to Float64,
    /// an all-null column takes the other side's type, and anything else
    /// widens to String. Only a column count mismatch is rejected.
    pub fn union(&self, first: DataFrame, mut second: DataFrame) -> Result<DataFrame> {
        if first.width() != second.width() {
            return Err(LoadError::SchemaMismatch {
                detail: format!(
                    "first table has {} columns, second has {}",
                    first.width(),
                    second.width()
                ),
            });
        }

        let names: Vec<String> = first.get_column_names().iter().map(|n| n.to_string()).collect();
        if second.get_column_names().iter().zip(&names).any(|(right, left)| *right != left.as_str()) {
            debug!("Renaming second table columns to {:?}", names);
            second.set_column_names(&names)?;
        }

        let mut widen = Vec::new();
        for (left, right) in first.get_columns().iter().zip(second.get_columns()) {
            if left.dtype() != right.dtype() {
                let target = common_type(left.dtype(), right.dtype());
                widen.push((left.name().to_string(), target));
            }
        }

        let mut first = first;
        for (name, target) in &widen {
            debug!("Widening column '{}' to {}", name, target);
            let left = first.column(name)?.cast(target)?;
            first.with_column(left)?;
            let right = second.column(name)?.cast(target)?;
            second.with_column(right)?;
        }

        Ok(first.vstack(&second)?)
    }
}

fn common_type(left: &DataType, right: &DataType) -> DataType {
    match (left, right) {
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),
        (l, r) if l.is_numeric() && r.is_numeric() => DataType::Float64,
        _ => DataType::String,
    }
}
