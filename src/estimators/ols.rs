use ndarray::{s, Array1, ArrayBase, ArrayView1, Data, Ix1, Ix2};

use super::hyperparams::{OlsParams, OlsValidParams};
use super::report::{FitReport, Term};
use super::traits::Fit;
use crate::datasets::{DatasetBase, DesignMatrix, Targets};
use crate::error::{Degeneracy, LinearModelError, Result};
use crate::linalg::{center_columns, gram, inv_gram, with_intercept};
use crate::statistics::{is_constant, mean};
use crate::Float;

/// The ordinary least squares estimator
///
/// The estimator solves the normal equations `(X̃ᵗX̃)β = X̃ᵗy` in closed form,
/// where `X̃` is the design matrix with a prepended column of ones. The
/// coefficient vector always holds `n_features + 1` entries, intercept first.
///
/// A freshly built estimator is unfitted: [`predict`](Self::predict) and the
/// diagnostics return [`LinearModelError::NotFitted`] until
/// [`fit`](Self::fit) succeeds. Fitting again replaces the coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinaryLeastSquares<F> {
    params: OlsValidParams<F>,
    coefficients: Option<Array1<F>>,
}

impl<F: Float> Default for OrdinaryLeastSquares<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> OrdinaryLeastSquares<F> {
    /// This method instantiates the hyperparameters of an ordinary least
    /// squares estimator with their default values.
    pub fn params() -> OlsParams<F> {
        OlsParams::new()
    }

    /// An unfitted estimator with default hyperparameters.
    pub fn new() -> Self {
        Self::with_params(OlsValidParams::default())
    }

    /// An unfitted estimator with the given hyperparameters.
    pub fn with_params(params: OlsValidParams<F>) -> Self {
        OrdinaryLeastSquares {
            params,
            coefficients: None,
        }
    }

    pub fn hyperparams(&self) -> &OlsValidParams<F> {
        &self.params
    }

    pub fn fit_intercept(&self) -> bool {
        self.params.fit_intercept()
    }

    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Number of features seen by the last successful fit.
    pub fn n_features(&self) -> Option<usize> {
        self.coefficients.as_ref().map(|w| w.len() - 1)
    }

    /// This method is a getter for the coefficients vector, intercept first.
    pub fn coefficients(&self) -> Result<ArrayView1<F>> {
        self.coefficients
            .as_ref()
            .map(|w| w.view())
            .ok_or(LinearModelError::NotFitted)
    }

    /// Fits the estimator in place. On failure the previous state, fitted or
    /// not, is kept.
    pub fn fit<DM, T>(&mut self, dataset: &DatasetBase<DM, T>) -> Result<()>
    where
        DM: DesignMatrix<Elem = F>,
        T: Targets<Elem = F>,
    {
        let coefficients = least_squares(&self.params, dataset)?;
        self.coefficients = Some(coefficients);
        Ok(())
    }

    /// Computes the predictions `X̃β` for a design matrix with the same
    /// number of features as the one used for fitting.
    pub fn predict<D: Data<Elem = F>>(&self, X: &ArrayBase<D, Ix2>) -> Result<Array1<F>> {
        let coefficients = self.coefficients()?;
        let n_features = coefficients.len() - 1;
        if X.ncols() != n_features {
            return Err(LinearModelError::shape_mismatch(
                "number of features",
                n_features,
                X.ncols(),
            ));
        }
        Ok(with_intercept(X).dot(&coefficients))
    }

    /// Observed minus predicted values.
    pub fn residuals<D, S>(&self, X: &ArrayBase<D, Ix2>, y: &ArrayBase<S, Ix1>) -> Result<Array1<F>>
    where
        D: Data<Elem = F>,
        S: Data<Elem = F>,
    {
        let y_pred = self.predict(X)?;
        if y.len() != y_pred.len() {
            return Err(LinearModelError::shape_mismatch(
                "number of targets",
                y_pred.len(),
                y.len(),
            ));
        }
        Ok(y - &y_pred)
    }

    /// Standard errors of the coefficients of a least squares fit on `X`.
    ///
    /// The matrix is used exactly as given: with `n` rows and `k` columns the
    /// residual variance is `Σr² / (n - k)` and the covariance matrix is
    /// `σ²(XᵗX)⁻¹`, so one error is returned per column of `X`. Passing the
    /// raw design matrix yields one error per feature; passing
    /// [`with_intercept`](crate::linalg::with_intercept)`(X)` yields errors
    /// for every coefficient, intercept included.
    pub fn calculate_standard_errors<D, S, P>(
        &self,
        X: &ArrayBase<D, Ix2>,
        y: &ArrayBase<S, Ix1>,
        y_pred: &ArrayBase<P, Ix1>,
    ) -> Result<Array1<F>>
    where
        D: Data<Elem = F>,
        S: Data<Elem = F>,
        P: Data<Elem = F>,
    {
        self.coefficients()?;
        let (n_samples, n_columns) = X.dim();
        if y.len() != n_samples {
            return Err(LinearModelError::shape_mismatch(
                "number of targets",
                n_samples,
                y.len(),
            ));
        }
        if y_pred.len() != n_samples {
            return Err(LinearModelError::shape_mismatch(
                "number of predictions",
                n_samples,
                y_pred.len(),
            ));
        }
        if n_samples <= n_columns {
            return Err(Degeneracy::NonPositiveDegreesOfFreedom {
                n_samples,
                n_columns,
            }
            .into());
        }

        let rss = (y - y_pred).mapv(|r| r * r).sum();
        let sigma_squared = rss / F::cast(n_samples - n_columns);
        let covariance = inv_gram(gram(X).view(), self.params.tolerance())? * sigma_squared;
        Ok(covariance.diag().mapv(|v| v.max(F::zero()).sqrt()))
    }

    /// Elementwise ratio of the coefficients to their standard errors.
    pub fn calculate_t_statistics(
        coefficients: ArrayView1<F>,
        standard_errors: ArrayView1<F>,
    ) -> Result<Array1<F>> {
        if coefficients.len() != standard_errors.len() {
            return Err(LinearModelError::shape_mismatch(
                "number of standard errors",
                coefficients.len(),
                standard_errors.len(),
            ));
        }
        if let Some(index) = standard_errors.iter().position(|se| *se == F::zero()) {
            return Err(Degeneracy::ZeroStandardError { index }.into());
        }
        Ok(&coefficients / &standard_errors)
    }

    /// Coefficient of determination `R² = 1 - SS_res / SS_tot` of the model
    /// on `(X, y)`.
    pub fn coefficient_determination<D, S>(
        &self,
        X: &ArrayBase<D, Ix2>,
        y: &ArrayBase<S, Ix1>,
    ) -> Result<F>
    where
        D: Data<Elem = F>,
        S: Data<Elem = F>,
    {
        let residuals = self.residuals(X, y)?;
        if is_constant(y.view()) {
            return Err(Degeneracy::ConstantTarget.into());
        }
        let y_mean = mean(y.view())?;
        let ss_total = y.fold(F::zero(), |acc, &yi| acc + (yi - y_mean).powi(2));
        let ss_residual = residuals.mapv(|r| r * r).sum();
        Ok(F::one() - ss_residual / ss_total)
    }

    /// Bundles the coefficients with their standard errors, t-statistics and
    /// the coefficient of determination.
    ///
    /// Inference uses the design the model was fitted on: with an intercept,
    /// the augmented matrix and `n - (d + 1)` degrees of freedom; without,
    /// the raw matrix and `n - d` degrees of freedom.
    pub fn report<D, S>(&self, X: &ArrayBase<D, Ix2>, y: &ArrayBase<S, Ix1>) -> Result<FitReport<F>>
    where
        D: Data<Elem = F>,
        S: Data<Elem = F>,
    {
        let coefficients = self.coefficients()?;
        let y_pred = self.predict(X)?;

        let (estimates, standard_errors) = if self.fit_intercept() {
            let standard_errors = self.intercept_standard_errors(X, y, &y_pred)?;
            (coefficients, standard_errors)
        } else {
            let standard_errors = self.calculate_standard_errors(X, y, &y_pred)?;
            (coefficients.slice_move(s![1..]), standard_errors)
        };
        let t_statistics = Self::calculate_t_statistics(estimates, standard_errors.view())?;
        let r_squared = self.coefficient_determination(X, y)?;

        let n_samples = X.nrows();
        let degrees_of_freedom = n_samples - estimates.len();
        let rss = (y - &y_pred).mapv(|r| r * r).sum();
        let residual_std_error = (rss / F::cast(degrees_of_freedom)).sqrt();

        let offset = usize::from(!self.fit_intercept());
        let terms = estimates
            .iter()
            .zip(standard_errors.iter())
            .zip(t_statistics.iter())
            .enumerate()
            .map(|(i, ((&estimate, &std_error), &t_statistic))| Term {
                name: if i + offset == 0 {
                    Term::<F>::INTERCEPT.to_string()
                } else {
                    format!("x{}", i + offset)
                },
                estimate,
                std_error,
                t_statistic,
            })
            .collect();

        Ok(FitReport::new(
            terms,
            self.fit_intercept(),
            r_squared,
            residual_std_error,
            n_samples,
            degrees_of_freedom,
        ))
    }
}

impl<F: Float> OrdinaryLeastSquares<F> {
    /// Standard errors of all `d + 1` coefficients of a model with an
    /// intercept, from the centred design `X_c`:
    /// `Var(β_j) = σ²[(X_cᵗX_c)⁻¹]_jj` and
    /// `Var(β_0) = σ²(1/n + x̄ᵗ(X_cᵗX_c)⁻¹x̄)`, with `σ² = Σr² / (n - d - 1)`.
    /// Equal to [`calculate_standard_errors`](Self::calculate_standard_errors)
    /// on the augmented design, without its loss of precision on columns
    /// with a large offset.
    fn intercept_standard_errors<D, S>(
        &self,
        X: &ArrayBase<D, Ix2>,
        y: &ArrayBase<S, Ix1>,
        y_pred: &Array1<F>,
    ) -> Result<Array1<F>>
    where
        D: Data<Elem = F>,
        S: Data<Elem = F>,
    {
        let (n_samples, n_features) = X.dim();
        if y.len() != n_samples {
            return Err(LinearModelError::shape_mismatch(
                "number of targets",
                n_samples,
                y.len(),
            ));
        }
        let n_columns = n_features + 1;
        if n_samples <= n_columns {
            return Err(Degeneracy::NonPositiveDegreesOfFreedom {
                n_samples,
                n_columns,
            }
            .into());
        }

        let rss = (y - y_pred).mapv(|r| r * r).sum();
        let sigma_squared = rss / F::cast(n_samples - n_columns);
        let (X_c, means) = center_columns(X);
        let gram_inv = inv_gram(gram(&X_c).view(), self.params.tolerance())?;

        let intercept_variance =
            sigma_squared * (F::one() / F::cast(n_samples) + means.dot(&gram_inv.dot(&means)));
        let mut variances = Array1::<F>::zeros(n_columns);
        variances[0] = intercept_variance;
        variances
            .slice_mut(s![1..])
            .assign(&gram_inv.diag().mapv(|v| v * sigma_squared));
        Ok(variances.mapv(|v| v.max(F::zero()).sqrt()))
    }
}

/// Solves the normal equations for a dataset and returns the coefficient
/// vector, intercept first.
fn least_squares<F, DM, T>(params: &OlsValidParams<F>, dataset: &DatasetBase<DM, T>) -> Result<Array1<F>>
where
    F: Float,
    DM: DesignMatrix<Elem = F>,
    T: Targets<Elem = F>,
{
    dataset.validate()?;
    let X = dataset.design_matrix().as_design();
    let y = dataset.targets().as_targets();
    let (n_samples, n_features) = X.dim();

    let n_parameters = n_features + usize::from(params.fit_intercept());
    log::debug!(
        "fitting OLS on {} samples and {} features ({} parameters)",
        n_samples,
        n_features,
        n_parameters
    );

    if n_samples < n_parameters {
        log::warn!(
            "{} samples are not enough to estimate {} parameters",
            n_samples,
            n_parameters
        );
        return Err(Degeneracy::Underdetermined {
            n_samples,
            n_parameters,
        }
        .into());
    }

    // With an intercept the slopes are solved on centred data and the
    // intercept recovered as ȳ - x̄ᵗβ.
    let (design, x_means, y_mean) = if params.fit_intercept() {
        let (X_c, x_means) = center_columns(&X);
        (X_c, Some(x_means), mean(y)?)
    } else {
        (X.to_owned(), None, F::zero())
    };

    let gram_inv = inv_gram(gram(&design).view(), params.tolerance()).map_err(|err| {
        log::warn!("cannot invert the Gram matrix of the design: {}", err);
        err
    })?;
    let Xty = design.t().dot(&y.mapv(|yi| yi - y_mean));
    let beta = gram_inv.dot(&Xty);

    let mut coefficients = Array1::<F>::zeros(n_features + 1);
    coefficients.slice_mut(s![1..]).assign(&beta);
    if let Some(x_means) = x_means {
        coefficients[0] = y_mean - x_means.dot(&beta);
    }
    if coefficients.iter().any(|b| !b.is_finite()) {
        log::warn!("the normal equations produced non-finite coefficients");
        return Err(Degeneracy::SingularMatrix.into());
    }

    if params.verbose() {
        log::info!(
            "OLS fit: intercept {}, coefficients {}",
            coefficients[0],
            coefficients.slice(s![1..])
        );
    }
    Ok(coefficients)
}

/// Fits an [`OrdinaryLeastSquares`] estimator to a dataset with a dense
/// design matrix and returns it.
impl<F, DM, T> Fit<DM, T, LinearModelError> for OlsValidParams<F>
where
    F: Float,
    DM: DesignMatrix<Elem = F>,
    T: Targets<Elem = F>,
{
    type Object = OrdinaryLeastSquares<F>;

    fn fit(&self, dataset: &DatasetBase<DM, T>) -> Result<Self::Object> {
        let coefficients = least_squares(self, dataset)?;
        Ok(OrdinaryLeastSquares {
            params: self.clone(),
            coefficients: Some(coefficients),
        })
    }
}
