//! Layout - shared column schema
//!
//! A `Layout` names the columns a row must populate, in order. It is
//! immutable once built and cheap to clone, so every sink attached to the
//! same table can hold its own handle.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Row, TableError};

/// Ordered, duplicate-free column list
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Layout {
    columns: Arc<[String]>,
}

impl Layout {
    /// Create a layout from column names
    ///
    /// # Errors
    /// Returns `TableError::Layout` on an empty or duplicate column name.
    pub fn new<I, S>(columns: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();

        let mut seen = HashSet::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            if name.is_empty() {
                return Err(TableError::layout(format!("column {idx} has an empty name")));
            }
            if !seen.insert(name.as_str()) {
                return Err(TableError::layout(format!("duplicate column '{name}'")));
            }
        }

        Ok(Self {
            columns: columns.into(),
        })
    }

    /// Start building a layout column by column
    pub fn builder() -> LayoutBuilder {
        LayoutBuilder::default()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Name of the column at `index`
    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(String::as_str)
    }

    /// Check that `row` has exactly one value per column
    ///
    /// Used by concrete sinks; the multiplexer passes rows through unchecked.
    pub fn check_row(&self, sink_name: &str, row: &Row) -> Result<(), TableError> {
        if row.len() == self.column_count() {
            Ok(())
        } else {
            Err(TableError::RowArity {
                sink_name: sink_name.to_string(),
                expected: self.column_count(),
                actual: row.len(),
            })
        }
    }

    /// Layout of the columns after the first `n`
    ///
    /// # Errors
    /// Fails when `n` exceeds the column count.
    pub fn skip_columns(&self, n: usize) -> Result<Self, TableError> {
        if n > self.column_count() {
            return Err(TableError::layout(format!(
                "cannot skip {n} columns of a {}-column layout",
                self.column_count()
            )));
        }
        Ok(Self {
            columns: self.columns[n..].into(),
        })
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Layout").field(&self.columns).finish()
    }
}

impl TryFrom<Vec<String>> for Layout {
    type Error = TableError;

    fn try_from(columns: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(columns)
    }
}

impl From<Layout> for Vec<String> {
    fn from(layout: Layout) -> Self {
        layout.columns.to_vec()
    }
}

/// Incremental layout construction
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    columns: Vec<String>,
}

impl LayoutBuilder {
    /// Append a column
    pub fn add_column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(name.into());
        self
    }

    /// Finish the layout, validating column names
    pub fn build(self) -> Result<Layout, TableError> {
        Layout::new(self.columns)
    }
}
