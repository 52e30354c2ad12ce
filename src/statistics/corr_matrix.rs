use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use super::correlation;
use super::frame::{present, Table};
use crate::error::{LinearModelError, Result};
use crate::Float;

/// Symmetric matrix of pairwise Pearson correlations between the numeric
/// columns of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix<F> {
    names: Vec<String>,
    values: Array2<F>,
}

impl<F: Float> CorrelationMatrix<F> {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> ArrayView2<F> {
        self.values.view()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Correlation between two named columns.
    pub fn get(&self, a: &str, b: &str) -> Option<F> {
        Some(self.values[[self.index_of(a)?, self.index_of(b)?]])
    }

    /// Correlations of every numeric column with `name`.
    pub fn column(&self, name: &str) -> Option<ArrayView1<F>> {
        self.index_of(name).map(|j| self.values.column(j))
    }

    /// Screens the explanatory variables of a regression: returns the other
    /// columns whose correlation with `name` is strictly greater than
    /// `threshold`, in column order.
    pub fn correlated_with(&self, name: &str, threshold: F) -> Result<Vec<(String, F)>> {
        let j = self.index_of(name).ok_or_else(|| {
            LinearModelError::InvalidInput(format!("unknown numeric column {:?}", name))
        })?;
        Ok(self
            .names
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != j && self.values[[i, j]] > threshold)
            .map(|(i, other)| (other.clone(), self.values[[i, j]]))
            .collect())
    }
}

/// Computes the correlation matrix of the numeric columns of `table`. Each
/// pair is correlated over the rows where both values are present.
pub fn correlation_matrix<F: Float>(table: &Table<F>) -> Result<CorrelationMatrix<F>> {
    let columns: Vec<(&str, &[Option<F>])> = table.numeric_columns().collect();
    let n = columns.len();
    let mut values = Array2::<F>::eye(n);

    for i in 0..n {
        for j in (i + 1)..n {
            let (x, y): (Vec<F>, Vec<F>) = columns[i]
                .1
                .iter()
                .zip(columns[j].1.iter())
                .filter_map(|(a, b)| Some((present(a)?, present(b)?)))
                .unzip();
            let r = correlation(Array1::from(x).view(), Array1::from(y).view()).map_err(|err| {
                log::warn!(
                    "cannot correlate columns {:?} and {:?}: {}",
                    columns[i].0,
                    columns[j].0,
                    err
                );
                err
            })?;
            values[[i, j]] = r;
            values[[j, i]] = r;
        }
    }

    Ok(CorrelationMatrix {
        names: columns.iter().map(|(name, _)| name.to_string()).collect(),
        values,
    })
}
