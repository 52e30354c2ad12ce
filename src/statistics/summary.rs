use std::collections::BTreeMap;
use std::fmt;

use ndarray::Array1;
use ndarray_stats::errors::MinMaxError;
use ndarray_stats::QuantileExt;

use super::frame::{present, Table};
use super::{mean, median, q1, q3};
use crate::error::{Degeneracy, LinearModelError, Result};
use crate::Float;

/// Location statistics of the non-missing values of a numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericStats<F> {
    pub min: F,
    pub q1: F,
    pub median: F,
    pub mean: F,
    pub q3: F,
    pub max: F,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary<F> {
    pub name: String,
    /// `None` when every value of the column is missing.
    pub stats: Option<NumericStats<F>>,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalSummary {
    pub name: String,
    /// Distinct values in ascending order with their number of occurrences.
    pub counts: Vec<(String, usize)>,
    pub missing: usize,
}

impl CategoricalSummary {
    pub fn count(&self, value: &str) -> usize {
        self.counts
            .iter()
            .find(|(v, _)| v == value)
            .map_or(0, |(_, count)| *count)
    }
}

/// Descriptive summary of a [`Table`]: numeric columns first, in table
/// order, then categorical columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary<F> {
    pub numeric: Vec<NumericSummary<F>>,
    pub categorical: Vec<CategoricalSummary>,
}

impl<F> Summary<F> {
    pub fn numeric_column(&self, name: &str) -> Option<&NumericSummary<F>> {
        self.numeric.iter().find(|s| s.name == name)
    }

    pub fn categorical_column(&self, name: &str) -> Option<&CategoricalSummary> {
        self.categorical.iter().find(|s| s.name == name)
    }
}

fn min_max_error(err: MinMaxError) -> LinearModelError {
    match err {
        MinMaxError::EmptyInput => Degeneracy::EmptyCollection.into(),
        MinMaxError::UndefinedOrder => {
            LinearModelError::InvalidInput("values without a total order".to_string())
        }
    }
}

fn numeric_stats<F: Float>(values: Array1<F>) -> Result<NumericStats<F>> {
    let view = values.view();
    Ok(NumericStats {
        min: *values.min().map_err(min_max_error)?,
        q1: q1(view)?,
        median: median(view)?,
        mean: mean(view)?,
        q3: q3(view)?,
        max: *values.max().map_err(min_max_error)?,
    })
}

/// Partitions the columns of `table` into numeric and categorical ones and
/// summarizes each of them.
pub fn summary<F: Float>(table: &Table<F>) -> Result<Summary<F>> {
    let mut numeric = Vec::new();
    for (name, cells) in table.numeric_columns() {
        let values: Vec<F> = cells.iter().filter_map(present).collect();
        let missing = cells.len() - values.len();
        let stats = if values.is_empty() {
            None
        } else {
            Some(numeric_stats(Array1::from(values))?)
        };
        numeric.push(NumericSummary {
            name: name.to_string(),
            stats,
            missing,
        });
    }

    let categorical = table
        .categorical_columns()
        .map(|(name, cells)| {
            let mut counts = BTreeMap::<&str, usize>::new();
            let mut missing = 0;
            for cell in cells {
                match cell {
                    Some(value) => *counts.entry(value.as_str()).or_insert(0) += 1,
                    None => missing += 1,
                }
            }
            CategoricalSummary {
                name: name.to_string(),
                counts: counts
                    .into_iter()
                    .map(|(value, count)| (value.to_string(), count))
                    .collect(),
                missing,
            }
        })
        .collect();

    Ok(Summary {
        numeric,
        categorical,
    })
}

impl<F: fmt::Display> fmt::Display for Summary<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for column in &self.numeric {
            writeln!(f, "{:<30}", column.name)?;
            if let Some(s) = &column.stats {
                write!(
                    f,
                    "Min.: {:<15} 1st Qu.: {:<15} Median: {:<15} Mean: {:<15} 3rd Qu.: {:<15} Max.: {:<15} ",
                    s.min, s.q1, s.median, s.mean, s.q3, s.max
                )?;
            }
            writeln!(f, "NA's: {:<15} ", column.missing)?;
        }

        for column in &self.categorical {
            write!(f, "\n{}:\n", column.name)?;
            for (value, count) in &column.counts {
                writeln!(f, "{}: {} observations", value, count)?;
            }
            if column.missing > 0 {
                writeln!(f, "NA's: {} observations", column.missing)?;
            }
        }
        Ok(())
    }
}
