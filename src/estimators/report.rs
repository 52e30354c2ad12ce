use std::fmt;

use ndarray::Array1;

use crate::error::{LinearModelError, Result};
use crate::Float;

/// One row of a [`FitReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct Term<F> {
    pub name: String,
    pub estimate: F,
    pub std_error: F,
    pub t_statistic: F,
}

impl<F> Term<F> {
    pub const INTERCEPT: &'static str = "(Intercept)";
}

/// Inferential summary of a fitted [`OrdinaryLeastSquares`](super::ols::OrdinaryLeastSquares)
/// model, produced by its `report` method.
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport<F> {
    terms: Vec<Term<F>>,
    fit_intercept: bool,
    r_squared: F,
    residual_std_error: F,
    n_samples: usize,
    degrees_of_freedom: usize,
}

impl<F: Float> FitReport<F> {
    pub(crate) fn new(
        terms: Vec<Term<F>>,
        fit_intercept: bool,
        r_squared: F,
        residual_std_error: F,
        n_samples: usize,
        degrees_of_freedom: usize,
    ) -> Self {
        FitReport {
            terms,
            fit_intercept,
            r_squared,
            residual_std_error,
            n_samples,
            degrees_of_freedom,
        }
    }

    /// Renames the feature terms, in column order. The intercept keeps its
    /// name.
    pub fn with_feature_names<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        let offset = usize::from(self.fit_intercept);
        let n_features = self.terms.len() - offset;
        if names.len() != n_features {
            return Err(LinearModelError::shape_mismatch(
                "number of feature names",
                n_features,
                names.len(),
            ));
        }
        for (term, name) in self.terms[offset..].iter_mut().zip(names) {
            term.name = name.as_ref().to_string();
        }
        Ok(self)
    }

    pub fn terms(&self) -> &[Term<F>] {
        &self.terms
    }

    /// The intercept row, absent when the model goes through the origin.
    pub fn intercept(&self) -> Option<&Term<F>> {
        if self.fit_intercept {
            self.terms.first()
        } else {
            None
        }
    }

    /// The feature rows, in column order.
    pub fn features(&self) -> &[Term<F>] {
        &self.terms[usize::from(self.fit_intercept)..]
    }

    pub fn estimates(&self) -> Array1<F> {
        self.terms.iter().map(|t| t.estimate).collect()
    }

    pub fn standard_errors(&self) -> Array1<F> {
        self.terms.iter().map(|t| t.std_error).collect()
    }

    pub fn t_statistics(&self) -> Array1<F> {
        self.terms.iter().map(|t| t.t_statistic).collect()
    }

    pub fn r_squared(&self) -> F {
        self.r_squared
    }

    /// Square root of the residual variance estimate.
    pub fn residual_std_error(&self) -> F {
        self.residual_std_error
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn degrees_of_freedom(&self) -> usize {
        self.degrees_of_freedom
    }
}

impl<F: Float> fmt::Display for FitReport<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .terms
            .iter()
            .map(|t| t.name.chars().count())
            .max()
            .unwrap_or(0)
            .max(11);

        writeln!(f, "Coefficients:")?;
        writeln!(
            f,
            "{:<width$} {:>14} {:>14} {:>10}",
            "",
            "Estimate",
            "Std. Error",
            "t value",
            width = width
        )?;
        for term in &self.terms {
            writeln!(
                f,
                "{:<width$} {:>14.6} {:>14.6} {:>10.3}",
                term.name,
                term.estimate,
                term.std_error,
                term.t_statistic,
                width = width
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Residual standard error: {:.6} on {} degrees of freedom",
            self.residual_std_error, self.degrees_of_freedom
        )?;
        write!(f, "R-squared: {:.4}", self.r_squared)
    }
}
