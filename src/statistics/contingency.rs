use std::collections::BTreeSet;
use std::fmt;

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::error::{LinearModelError, Result};

/// Cross-tabulation of two categorical sequences: `counts[[i, j]]` is the
/// number of positions where the first sequence holds `rows[i]` and the
/// second one holds `columns[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContingencyTable<A, B> {
    rows: Vec<A>,
    columns: Vec<B>,
    counts: Array2<usize>,
}

impl<A: Ord, B: Ord> ContingencyTable<A, B> {
    /// Distinct values of the first sequence, ascending.
    pub fn row_labels(&self) -> &[A] {
        &self.rows
    }

    /// Distinct values of the second sequence, ascending.
    pub fn column_labels(&self) -> &[B] {
        &self.columns
    }

    pub fn counts(&self) -> ArrayView2<usize> {
        self.counts.view()
    }

    pub fn count(&self, a: &A, b: &B) -> usize {
        match (self.rows.binary_search(a), self.columns.binary_search(b)) {
            (Ok(i), Ok(j)) => self.counts[[i, j]],
            _ => 0,
        }
    }

    pub fn row_totals(&self) -> Array1<usize> {
        self.counts.sum_axis(Axis(1))
    }

    pub fn column_totals(&self) -> Array1<usize> {
        self.counts.sum_axis(Axis(0))
    }

    pub fn total(&self) -> usize {
        self.counts.sum()
    }
}

/// Builds the contingency table of two equal-length categorical sequences.
pub fn table<A, B>(a: &[A], b: &[B]) -> Result<ContingencyTable<A, B>>
where
    A: Ord + Clone,
    B: Ord + Clone,
{
    if a.len() != b.len() {
        return Err(LinearModelError::shape_mismatch(
            "contingency sequence length",
            a.len(),
            b.len(),
        ));
    }

    let rows: Vec<A> = a.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
    let columns: Vec<B> = b.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
    let mut counts = Array2::<usize>::zeros((rows.len(), columns.len()));
    for (va, vb) in a.iter().zip(b.iter()) {
        if let (Ok(i), Ok(j)) = (rows.binary_search(va), columns.binary_search(vb)) {
            counts[[i, j]] += 1;
        }
    }

    Ok(ContingencyTable {
        rows,
        columns,
        counts,
    })
}

impl<A: fmt::Display, B: fmt::Display> fmt::Display for ContingencyTable<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>12}", "")?;
        for column in &self.columns {
            write!(f, " {:>12}", column.to_string())?;
        }
        writeln!(f)?;
        for (i, row) in self.rows.iter().enumerate() {
            write!(f, "{:>12}", row.to_string())?;
            for j in 0..self.columns.len() {
                write!(f, " {:>12}", self.counts[[i, j]])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
