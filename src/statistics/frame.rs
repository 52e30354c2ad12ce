use ndarray::{Array1, Array2};

use crate::error::{LinearModelError, Result};
use crate::Float;

/// A named column of a [`Table`]. `None` marks a missing value; a NaN in a
/// numeric column is treated as missing as well.
#[derive(Debug, Clone, PartialEq)]
pub enum Column<F> {
    Numeric(Vec<Option<F>>),
    Categorical(Vec<Option<String>>),
}

impl<F: Float> Column<F> {
    /// Builds a numeric column without missing values.
    pub fn numeric<I: IntoIterator<Item = F>>(values: I) -> Self {
        Column::Numeric(values.into_iter().map(Some).collect())
    }

    /// Builds a categorical column without missing values.
    pub fn categorical<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Column::Categorical(values.into_iter().map(|v| Some(v.into())).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    /// Number of missing entries.
    pub fn n_missing(&self) -> usize {
        match self {
            Column::Numeric(values) => values.iter().filter(|v| present(v).is_none()).count(),
            Column::Categorical(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }
}

/// Returns the value of a numeric cell, or `None` if it is missing.
pub(crate) fn present<F: Float>(cell: &Option<F>) -> Option<F> {
    match cell {
        Some(v) if !v.is_nan() => Some(*v),
        _ => None,
    }
}

/// An in-memory table of equally long, uniquely named columns.
///
/// The table is the explicitly owned data object handed to
/// [`summary`](super::summary) and [`correlation_matrix`](super::correlation_matrix),
/// and from which design matrices are extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<F> {
    names: Vec<String>,
    columns: Vec<Column<F>>,
}

impl<F: Float> Default for Table<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> Table<F> {
    pub fn new() -> Self {
        Table {
            names: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Appends a column, builder style.
    pub fn with_column<S: Into<String>>(mut self, name: S, column: Column<F>) -> Result<Self> {
        self.push_column(name, column)?;
        Ok(self)
    }

    /// Appends a column. Fails if the name is already taken or if the column
    /// length differs from the existing ones.
    pub fn push_column<S: Into<String>>(&mut self, name: S, column: Column<F>) -> Result<()> {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(LinearModelError::InvalidInput(format!(
                "duplicate column name {:?}",
                name
            )));
        }
        if let Some(first) = self.columns.first() {
            if first.len() != column.len() {
                return Err(LinearModelError::shape_mismatch(
                    &format!("length of column {:?}", name),
                    first.len(),
                    column.len(),
                ));
            }
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&Column<F>> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| &self.columns[idx])
    }

    /// Iterates over the columns in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column<F>)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter())
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = (&str, &[Option<F>])> {
        self.iter().filter_map(|(name, column)| match column {
            Column::Numeric(values) => Some((name, values.as_slice())),
            Column::Categorical(_) => None,
        })
    }

    pub fn categorical_columns(&self) -> impl Iterator<Item = (&str, &[Option<String>])> {
        self.iter().filter_map(|(name, column)| match column {
            Column::Categorical(values) => Some((name, values.as_slice())),
            Column::Numeric(_) => None,
        })
    }

    fn complete_numeric(&self, name: &str) -> Result<Vec<F>> {
        match self.column(name) {
            Some(Column::Numeric(values)) => values
                .iter()
                .map(|cell| {
                    present(cell).ok_or_else(|| {
                        LinearModelError::InvalidInput(format!(
                            "column {:?} contains missing values",
                            name
                        ))
                    })
                })
                .collect(),
            Some(Column::Categorical(_)) => Err(LinearModelError::InvalidInput(format!(
                "column {:?} is not numeric",
                name
            ))),
            None => Err(LinearModelError::InvalidInput(format!(
                "unknown column {:?}",
                name
            ))),
        }
    }

    /// Extracts a numeric column as a target vector.
    pub fn targets(&self, name: &str) -> Result<Array1<F>> {
        Ok(Array1::from(self.complete_numeric(name)?))
    }

    /// Stacks the requested numeric columns into an `n × d` design matrix.
    /// Missing values are rejected: a design matrix must be complete.
    pub fn design_matrix(&self, names: &[&str]) -> Result<Array2<F>> {
        let mut X = Array2::<F>::zeros((self.n_rows(), names.len()));
        for (j, name) in names.iter().enumerate() {
            let values = self.complete_numeric(name)?;
            X.column_mut(j).assign(&Array1::from(values));
        }
        Ok(X)
    }
}
