use super::param_guard::ParamGuard;
use crate::error::{LinearModelError, Result};
use crate::Float;

/// A verified hyperparameter set ready for the fitting of an ordinary least
/// squares model
#[derive(Debug, Clone, PartialEq)]
pub struct OlsValidParams<F> {
    fit_intercept: bool,
    tolerance: F,
    verbose: bool,
}

impl<F: Float> Default for OlsValidParams<F> {
    fn default() -> Self {
        OlsValidParams {
            fit_intercept: true,
            tolerance: F::epsilon().sqrt(),
            verbose: false,
        }
    }
}

impl<F: Float> OlsValidParams<F> {
    pub fn fit_intercept(&self) -> bool {
        self.fit_intercept
    }

    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

/// A hyper-parameter set during construction
///
/// Configures and minimizes the following objective function:
/// ```ignore
/// ||y - b_0 - Xb||^2_2
/// ```
/// in closed form through the normal equations.
#[derive(Debug, Clone, PartialEq)]
pub struct OlsParams<F>(OlsValidParams<F>);

impl<F: Float> Default for OlsParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Configure and fit an ordinary least squares model
impl<F: Float> OlsParams<F> {
    /// Create default ordinary least squares hyper parameters
    pub fn new() -> OlsParams<F> {
        Self(OlsValidParams::default())
    }

    /// Estimate a constant offset. When disabled the intercept coefficient is
    /// fixed at zero and the regression goes through the origin.
    /// Defaults to `true` if not set.
    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.0.fit_intercept = fit_intercept;
        self
    }

    /// Set the relative pivot threshold under which the Gram matrix is
    /// considered singular. A pivot equals the share of a column left
    /// unexplained by the previous columns. With an intercept the test runs
    /// on mean-centred columns, so a large offset such as a year or a
    /// timestamp does not count against a feature. Without one it runs on
    /// the raw columns.
    ///
    /// Defaults to the square root of the machine epsilon if not set.
    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    /// Log the fitted coefficients at the `info` level.
    ///
    /// Defaults to `false` if not set.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.0.verbose = verbose;
        self
    }
}

impl<F: Float> ParamGuard for OlsParams<F> {
    type Checked = OlsValidParams<F>;
    type Error = LinearModelError;

    /// Validate the hyper parameters
    fn check_ref(&self) -> Result<&Self::Checked> {
        let tolerance = self.0.tolerance;
        if !(tolerance >= F::zero() && tolerance < F::one()) {
            Err(LinearModelError::InvalidTolerance(
                tolerance.to_f32().unwrap_or(f32::NAN),
            ))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
