//! Descriptive statistics over numeric collections and tables.
//!
//! Every function is pure: it borrows its input and returns an independent
//! value, so the module holds no state at all.

use std::cmp::Ordering;

use ndarray::ArrayView1;

use crate::error::{Degeneracy, LinearModelError, Result};
use crate::Float;

mod contingency;
mod corr_matrix;
mod frame;
mod summary;


pub use contingency::{table, ContingencyTable};
pub use corr_matrix::{correlation_matrix, CorrelationMatrix};
pub use frame::{Column, Table};
pub use summary::{summary, CategoricalSummary, NumericStats, NumericSummary, Summary};

/// Arithmetic mean.
pub fn mean<F: Float>(data: ArrayView1<F>) -> Result<F> {
    if data.is_empty() {
        return Err(Degeneracy::EmptyCollection.into());
    }
    Ok(data.sum() / F::cast(data.len()))
}

/// Population variance, i.e. the mean of the squared deviations from
/// [`mean`] (denominator `n`, not `n - 1`).
pub fn variance<F: Float>(data: ArrayView1<F>) -> Result<F> {
    let mu = mean(data)?;
    let sum_sq = data.fold(F::zero(), |acc, &xi| acc + (xi - mu).powi(2));
    Ok(sum_sq / F::cast(data.len()))
}

/// Population standard deviation.
pub fn std_deviation<F: Float>(data: ArrayView1<F>) -> Result<F> {
    Ok(variance(data)?.sqrt())
}

/// Whether every value equals the first one. Sums of squared deviations
/// cannot answer this: the mean of a constant sample is rounded, so a
/// constant such as `0.1` leaves tiny nonzero deviations.
pub(crate) fn is_constant<F: Float>(data: ArrayView1<F>) -> bool {
    match data.iter().next() {
        Some(first) => data.iter().all(|x| x == first),
        None => true,
    }
}

/// Pearson correlation coefficient between two samples of the same length.
pub fn correlation<F: Float>(x: ArrayView1<F>, y: ArrayView1<F>) -> Result<F> {
    if x.len() != y.len() {
        return Err(LinearModelError::shape_mismatch(
            "correlation sample length",
            x.len(),
            y.len(),
        ));
    }
    if x.len() < 2 {
        return Err(LinearModelError::InvalidInput(format!(
            "correlation requires at least 2 observations, found {}",
            x.len()
        )));
    }

    if is_constant(x) || is_constant(y) {
        return Err(Degeneracy::ZeroVariance.into());
    }

    let mean_x = mean(x)?;
    let mean_y = mean(y)?;
    let mut numer = F::zero();
    let mut ss_x = F::zero();
    let mut ss_y = F::zero();
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        numer += dx * dy;
        ss_x += dx * dx;
        ss_y += dy * dy;
    }

    if ss_x == F::zero() || ss_y == F::zero() {
        return Err(Degeneracy::ZeroVariance.into());
    }
    Ok(numer / (ss_x * ss_y).sqrt())
}

/// Copies and sorts the data in ascending order. NaN has no rank.
fn sorted<F: Float>(data: ArrayView1<F>) -> Result<Vec<F>> {
    if data.is_empty() {
        return Err(Degeneracy::EmptyCollection.into());
    }
    if data.iter().any(|x| x.is_nan()) {
        return Err(LinearModelError::InvalidInput(
            "cannot rank a collection containing NaN".to_string(),
        ));
    }
    let mut values = data.to_vec();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Ok(values)
}

/// Median. With an even count, the two central elements are averaged.
pub fn median<F: Float>(data: ArrayView1<F>) -> Result<F> {
    let values = sorted(data)?;
    let n = values.len();
    if n % 2 == 0 {
        Ok((values[n / 2 - 1] + values[n / 2]) / F::cast(2))
    } else {
        Ok(values[n / 2])
    }
}

/// Nearest-lower-rank quantile: the element of rank `floor(p * (n - 1))` in
/// the sorted data. No interpolation is performed between ranks.
pub fn quantile<F: Float>(data: ArrayView1<F>, p: F) -> Result<F> {
    if !(p >= F::zero() && p <= F::one()) {
        return Err(LinearModelError::InvalidInput(format!(
            "quantile probability must lie in [0, 1], found {}",
            p
        )));
    }
    let values = sorted(data)?;
    let last = values.len() - 1;
    let index: usize = (p * F::cast(last)).floor().as_();
    Ok(values[index.min(last)])
}

/// First quartile.
pub fn q1<F: Float>(data: ArrayView1<F>) -> Result<F> {
    quantile(data, F::cast(0.25))
}

/// Third quartile.
pub fn q3<F: Float>(data: ArrayView1<F>) -> Result<F> {
    quantile(data, F::cast(0.75))
}
