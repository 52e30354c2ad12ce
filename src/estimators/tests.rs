use approx::assert_abs_diff_eq;
use ndarray::{array, s, Array1, Array2};

use super::hyperparams::OlsValidParams;
use super::ols::OrdinaryLeastSquares;
use super::param_guard::ParamGuard;
use super::report::Term;
use super::traits::Fit;
use crate::datasets::{DatasetBase, DenseDataset};
use crate::error::{Degeneracy, LinearModelError};
use crate::helpers::test_helpers::*;
use crate::linalg::with_intercept;

fn simple_regression() -> (Array2<f64>, Array1<f64>) {
    let x = array![[1.], [2.], [3.], [4.], [5.]];
    let y = array![2.2, 2.8, 3.6, 4.5, 5.1];
    (x, y)
}

fn fitted(x: &Array2<f64>, y: &Array1<f64>) -> OrdinaryLeastSquares<f64> {
    let mut model = OrdinaryLeastSquares::new();
    model.fit(&DatasetBase::new(x.view(), y.view())).unwrap();
    model
}

#[test]
fn test_fit_returns_one_coefficient_per_feature_plus_intercept() {
    let x = array![[1., 1.], [2., 3.], [3., 4.]];
    let y = array![1., 2., 3.];
    let model = fitted(&x, &y);

    let coefficients = model.coefficients().unwrap();
    assert_eq!(coefficients.len(), 3);
    assert_eq!(model.n_features(), Some(2));
    assert_array_all_close(coefficients, array![0., 1., 0.].view(), 1e-10);

    let predictions = model.predict(&x).unwrap();
    assert_eq!(predictions.len(), 3);
    assert_array_all_close(predictions.view(), y.view(), 1e-10);
}

#[test]
fn test_fit_simple_regression() {
    let (x, y) = simple_regression();
    let model = fitted(&x, &y);
    assert_array_all_close(
        model.coefficients().unwrap(),
        array![1.39, 0.75].view(),
        1e-12,
    );
}

#[test]
fn test_collinear_reference_design_is_singular() {
    // x2 = 2 * x1 - 1 is a combination of x1 and the intercept column
    let x = array![[1., 1.], [2., 3.], [3., 5.]];
    let y = array![1., 2., 3.];
    let mut model = OrdinaryLeastSquares::new();
    let res = model.fit(&DatasetBase::new(x.view(), y.view()));

    assert_eq!(
        res,
        Err(LinearModelError::NumericalDegeneracy(
            Degeneracy::SingularMatrix
        ))
    );
    assert!(!model.is_fitted());
}

#[test]
fn test_duplicated_column_is_singular() {
    let (x, y, _) = generate_linear_data(30, 3, 0.1);
    let mut x_dup = Array2::<f64>::zeros((30, 4));
    x_dup.slice_mut(s![.., ..3]).assign(&x);
    x_dup.column_mut(3).assign(&x.column(1));

    let res = OrdinaryLeastSquares::<f64>::params().fit(&DenseDataset::from((x_dup, y)));
    assert!(matches!(
        res,
        Err(LinearModelError::NumericalDegeneracy(
            Degeneracy::SingularMatrix
        ))
    ));
}

#[test]
fn test_underdetermined_problem() {
    let x = array![[1., 2.], [3., 5.]];
    let y = array![1., 2.];
    let mut model = OrdinaryLeastSquares::new();
    assert_eq!(
        model.fit(&DatasetBase::new(x.view(), y.view())),
        Err(LinearModelError::NumericalDegeneracy(
            Degeneracy::Underdetermined {
                n_samples: 2,
                n_parameters: 3,
            }
        ))
    );
}

#[test]
fn test_fit_rejects_invalid_datasets() {
    let mut model = OrdinaryLeastSquares::new();

    let x = array![[1.], [2.], [3.]];
    let y = array![1., 2.];
    assert!(matches!(
        model.fit(&DatasetBase::new(x.view(), y.view())),
        Err(LinearModelError::InvalidInput(_))
    ));

    let x = array![[1.], [f64::NAN], [3.]];
    let y = array![1., 2., 3.];
    assert!(matches!(
        model.fit(&DatasetBase::new(x.view(), y.view())),
        Err(LinearModelError::InvalidInput(_))
    ));
}

#[test]
fn test_unfitted_model() {
    let (x, y) = simple_regression();
    let model = OrdinaryLeastSquares::<f64>::new();

    assert!(!model.is_fitted());
    assert_eq!(model.n_features(), None);
    assert_eq!(model.coefficients(), Err(LinearModelError::NotFitted));
    assert_eq!(model.predict(&x), Err(LinearModelError::NotFitted));
    assert_eq!(
        model.coefficient_determination(&x, &y),
        Err(LinearModelError::NotFitted)
    );
    assert_eq!(
        model.calculate_standard_errors(&x, &y, &y),
        Err(LinearModelError::NotFitted)
    );
    assert_eq!(model.report(&x, &y), Err(LinearModelError::NotFitted));
}

#[test]
fn test_predict_rejects_wrong_number_of_features() {
    let (x, y) = simple_regression();
    let model = fitted(&x, &y);
    let wider = array![[1., 2.], [3., 4.]];
    assert!(matches!(
        model.predict(&wider),
        Err(LinearModelError::InvalidInput(_))
    ));
}

#[test]
fn test_recovers_true_coefficients() {
    let (x, y, true_w) = generate_linear_data(200, 5, 0.01);
    let model = OrdinaryLeastSquares::<f64>::params()
        .verbose(true)
        .fit(&DenseDataset::from((x, y)))
        .unwrap();
    assert_array_all_close(model.coefficients().unwrap(), true_w.view(), 5e-3);
}

#[test]
fn test_normal_equations_hold() {
    let (x, y) = generate_random_data(50, 4);
    let model = fitted(&x, &y);

    // the residuals are orthogonal to every column of the augmented design
    let residuals = model.residuals(&x, &y).unwrap();
    let orthogonality = with_intercept(&x).t().dot(&residuals);
    assert_array_all_close(orthogonality.view(), Array1::zeros(5).view(), 1e-9);
}

#[test]
fn test_residual_sum_of_squares_is_minimal() {
    let (x, y) = generate_random_data(40, 3);
    let model = fitted(&x, &y);
    let x_tilde = with_intercept(&x);
    let w = model.coefficients().unwrap().to_owned();
    let rss = |w: &Array1<f64>| (&y - &x_tilde.dot(w)).mapv(|r| r * r).sum();

    let best = rss(&w);
    for j in 0..w.len() {
        for delta in [-0.1, -1e-3, 1e-3, 0.1] {
            let mut perturbed = w.clone();
            perturbed[j] += delta;
            assert!(rss(&perturbed) > best);
        }
    }
}

#[test]
fn test_coefficient_determination() {
    let (x, y) = simple_regression();
    let model = fitted(&x, &y);
    let r2 = model.coefficient_determination(&x, &y).unwrap();
    assert_abs_diff_eq!(r2, 1. - 0.027 / 5.652, epsilon = 1e-12);
    assert!(r2 <= 1.);

    // out of sample, R² can be negative but never exceeds one
    let x_new = array![[10.], [0.], [4.]];
    let y_new = array![0., 10., 4.];
    assert!(model.coefficient_determination(&x_new, &y_new).unwrap() < 0.);
}

#[test]
fn test_coefficient_determination_of_perfect_fit() {
    let x = array![[1., 1.], [2., 3.], [3., 4.]];
    let y = array![1., 2., 3.];
    let model = fitted(&x, &y);
    assert_abs_diff_eq!(
        model.coefficient_determination(&x, &y).unwrap(),
        1.,
        epsilon = 1e-10
    );
}

#[test]
fn test_coefficient_determination_of_constant_target() {
    let (x, y) = simple_regression();
    let model = fitted(&x, &y);
    let constant = Array1::from_elem(5, 3.);
    assert_eq!(
        model.coefficient_determination(&x, &constant),
        Err(LinearModelError::NumericalDegeneracy(
            Degeneracy::ConstantTarget
        ))
    );
}

#[test]
fn test_coefficient_determination_of_inexact_constant_target() {
    let x = array![[1.], [2.], [4.]];
    let model = fitted(&x, &array![1., 2., 4.]);
    assert_eq!(
        model.coefficient_determination(&x, &array![0.1, 0.1, 0.1]),
        Err(LinearModelError::NumericalDegeneracy(
            Degeneracy::ConstantTarget
        ))
    );
}

#[test]
fn test_standard_errors_on_raw_design() {
    let x = array![[1., 1.], [2., 3.], [3., 4.]];
    let y = array![1., 2., 3.];
    let model = fitted(&x, &y);
    let y_pred = model.predict(&x).unwrap();
    let errors = model.calculate_standard_errors(&x, &y, &y_pred).unwrap();
    assert_eq!(errors.len(), model.coefficients().unwrap().len() - 1);

    let (x, y) = simple_regression();
    let model = fitted(&x, &y);
    let y_pred = model.predict(&x).unwrap();
    let errors = model.calculate_standard_errors(&x, &y, &y_pred).unwrap();
    // sigma² = 0.027 / (5 - 1), XᵗX = 55
    assert_array_all_close(
        errors.view(),
        array![(0.027f64 / 4. / 55.).sqrt()].view(),
        1e-10,
    );
}

#[test]
fn test_standard_errors_on_augmented_design() {
    let (x, y) = simple_regression();
    let model = fitted(&x, &y);
    let y_pred = model.predict(&x).unwrap();
    let errors = model
        .calculate_standard_errors(&with_intercept(&x), &y, &y_pred)
        .unwrap();
    // sigma² = 0.027 / 3, se(b1) = sqrt(sigma² / Sxx), se(b0) = sqrt(sigma² (1/n + x̄²/Sxx))
    let sigma_squared = 0.009f64;
    let ans = array![(sigma_squared * 1.1).sqrt(), (sigma_squared / 10.).sqrt()];
    assert_array_all_close(errors.view(), ans.view(), 1e-10);
}

#[test]
fn test_standard_errors_errors() {
    let (x, y) = simple_regression();
    let model = fitted(&x, &y);
    let y_pred = model.predict(&x).unwrap();

    assert!(matches!(
        model.calculate_standard_errors(&x, &y.slice(s![..4]), &y_pred),
        Err(LinearModelError::InvalidInput(_))
    ));
    assert!(matches!(
        model.calculate_standard_errors(&x, &y, &y_pred.slice(s![..4])),
        Err(LinearModelError::InvalidInput(_))
    ));

    let square = array![[1., 2.], [3., 4.]];
    assert_eq!(
        model.calculate_standard_errors(&square, &array![1., 2.], &array![1., 2.]),
        Err(LinearModelError::NumericalDegeneracy(
            Degeneracy::NonPositiveDegreesOfFreedom {
                n_samples: 2,
                n_columns: 2,
            }
        ))
    );
}

#[test]
fn test_t_statistics() {
    let coefficients = array![1.39, 0.75];
    let standard_errors = array![0.5, 0.03];
    let t = OrdinaryLeastSquares::calculate_t_statistics(
        coefficients.view(),
        standard_errors.view(),
    )
    .unwrap();
    assert_array_all_close(t.view(), array![2.78, 25.].view(), 1e-10);

    assert!(matches!(
        OrdinaryLeastSquares::calculate_t_statistics(
            coefficients.view(),
            standard_errors.slice(s![..1]),
        ),
        Err(LinearModelError::InvalidInput(_))
    ));

    let zero = array![0.5, 0.];
    assert_eq!(
        OrdinaryLeastSquares::calculate_t_statistics(coefficients.view(), zero.view()),
        Err(LinearModelError::NumericalDegeneracy(
            Degeneracy::ZeroStandardError { index: 1 }
        ))
    );
}

#[test]
fn test_fit_without_intercept() {
    let x = array![[1.], [2.], [3.], [4.]];
    let y = array![2., 4., 6., 8.];
    let model = OrdinaryLeastSquares::<f64>::params()
        .fit_intercept(false)
        .fit(&DenseDataset::from((x.clone(), y.clone())))
        .unwrap();

    assert!(!model.fit_intercept());
    let coefficients = model.coefficients().unwrap();
    assert_eq!(coefficients.len(), 2);
    assert_eq!(coefficients[0], 0.);
    assert_abs_diff_eq!(coefficients[1], 2., epsilon = 1e-12);
    assert_array_all_close(model.predict(&x).unwrap().view(), y.view(), 1e-12);
}

#[test]
fn test_refit_replaces_coefficients() {
    let (x, y) = simple_regression();
    let mut model = fitted(&x, &y);
    let first = model.coefficients().unwrap().to_owned();

    let (x2, y2) = generate_random_data(20, 2);
    model.fit(&DatasetBase::new(x2.view(), y2.view())).unwrap();
    assert_eq!(model.n_features(), Some(2));
    assert_ne!(model.coefficients().unwrap(), first.view());

    // a failed fit keeps the previous model
    let singular = array![[1., 1.], [1., 1.], [1., 1.]];
    assert!(model
        .fit(&DatasetBase::new(singular.view(), array![1., 2., 3.].view()))
        .is_err());
    assert_eq!(model.n_features(), Some(2));
}

#[test]
fn test_params_validation() {
    let params = OrdinaryLeastSquares::<f64>::params().tolerance(-1.);
    assert_eq!(
        params.check_ref(),
        Err(LinearModelError::InvalidTolerance(-1.))
    );

    let (x, y) = simple_regression();
    let res = OrdinaryLeastSquares::<f64>::params()
        .tolerance(1.5)
        .fit(&DenseDataset::from((x, y)));
    assert!(matches!(res, Err(LinearModelError::InvalidTolerance(_))));

    let valid = OrdinaryLeastSquares::<f64>::params()
        .fit_intercept(false)
        .verbose(true)
        .check_unwrap();
    assert!(!valid.fit_intercept());
    assert!(valid.verbose());
    assert_eq!(
        OlsValidParams::<f64>::default().tolerance(),
        f64::EPSILON.sqrt()
    );
}

#[test]
fn test_estimator_from_valid_params() {
    let (x, y) = simple_regression();
    let params = OrdinaryLeastSquares::<f64>::params()
        .tolerance(1e-12)
        .check()
        .unwrap();
    let mut model = OrdinaryLeastSquares::with_params(params.clone());
    assert_eq!(model.hyperparams(), &params);

    model.fit(&DatasetBase::new(x.view(), y.view())).unwrap();
    let direct = params.fit(&DenseDataset::from((x, y))).unwrap();
    assert_eq!(model, direct);
}

#[test]
fn test_fit_single_precision() {
    let x = array![[1f32], [2.], [3.], [4.], [5.]];
    let y = array![2.2f32, 2.8, 3.6, 4.5, 5.1];
    let mut model = OrdinaryLeastSquares::<f32>::new();
    model.fit(&DatasetBase::new(x.view(), y.view())).unwrap();
    assert_array_all_close(
        model.coefficients().unwrap(),
        array![1.39f32, 0.75].view(),
        1e-4,
    );
}

#[test]
fn test_fit_feature_with_large_offset_in_single_precision() {
    let x = Array1::linspace(2000f32, 2009., 10).insert_axis(ndarray::Axis(1));
    let y = x.column(0).mapv(|year| 3. * year - 5990.);
    let mut model = OrdinaryLeastSquares::<f32>::new();
    model.fit(&DatasetBase::new(x.view(), y.view())).unwrap();
    assert_array_all_close(
        model.coefficients().unwrap(),
        array![-5990f32, 3.].view(),
        1e-2,
    );
}

#[test]
fn test_report_on_timestamps_matches_shifted_feature() {
    let steps = array![[0.], [1.], [2.], [3.], [4.], [5.]];
    let timestamps = steps.mapv(|i| 1.7e9 + 60. * i);
    let y = array![1.0, 2.1, 2.9, 4.2, 5.0, 5.9];

    let model = fitted(&timestamps, &y);
    let reference = fitted(&steps, &y);
    // Sxy = 17.25, Sxx = 17.5 on the step index
    assert_abs_diff_eq!(
        model.coefficients().unwrap()[1] * 60.,
        17.25 / 17.5,
        epsilon = 1e-9
    );
    assert_array_all_close(
        model.predict(&timestamps).unwrap().view(),
        reference.predict(&steps).unwrap().view(),
        1e-6,
    );

    let report = model.report(&timestamps, &y).unwrap();
    let expected = reference.report(&steps, &y).unwrap();
    let slope = &report.features()[0];
    let expected_slope = &expected.features()[0];
    assert_abs_diff_eq!(slope.std_error * 60., expected_slope.std_error, epsilon = 1e-7);
    assert_abs_diff_eq!(slope.t_statistic, expected_slope.t_statistic, epsilon = 1e-5);
    assert_abs_diff_eq!(report.r_squared(), expected.r_squared(), epsilon = 1e-7);
}

#[test]
fn test_report() {
    let (x, y) = simple_regression();
    let model = fitted(&x, &y);
    let report = model.report(&x, &y).unwrap();

    assert_eq!(report.terms().len(), 2);
    let intercept = report.intercept().unwrap();
    assert_eq!(intercept.name, Term::<f64>::INTERCEPT);
    assert_abs_diff_eq!(intercept.estimate, 1.39, epsilon = 1e-12);
    assert_abs_diff_eq!(intercept.std_error, (0.009f64 * 1.1).sqrt(), epsilon = 1e-10);

    let slope = &report.features()[0];
    assert_eq!(slope.name, "x1");
    assert_abs_diff_eq!(slope.t_statistic, 25., epsilon = 1e-8);

    assert_eq!(report.n_samples(), 5);
    assert_eq!(report.degrees_of_freedom(), 3);
    assert_abs_diff_eq!(report.residual_std_error(), 0.009f64.sqrt(), epsilon = 1e-10);
    assert_abs_diff_eq!(report.r_squared(), 1. - 0.027 / 5.652, epsilon = 1e-12);
    assert_eq!(report.estimates().len(), 2);
    assert_eq!(report.standard_errors().len(), 2);
    assert_eq!(report.t_statistics().len(), 2);

    let report = report.with_feature_names(&["Consommation"]).unwrap();
    assert_eq!(report.features()[0].name, "Consommation");
    let rendered = report.to_string();
    assert!(rendered.contains("(Intercept)"));
    assert!(rendered.contains("Consommation"));
    assert!(rendered.contains("on 3 degrees of freedom"));
    assert!(rendered.contains("R-squared: 0.9952"));

    assert!(report.with_feature_names(&["a", "b"]).is_err());
}

#[test]
fn test_report_without_intercept() {
    let x = array![[1.], [2.], [3.], [4.]];
    let y = array![2.1, 3.9, 6.2, 7.8];
    let model = OrdinaryLeastSquares::<f64>::params()
        .fit_intercept(false)
        .fit(&DenseDataset::from((x.clone(), y.clone())))
        .unwrap();
    let report = model.report(&x, &y).unwrap();

    assert!(report.intercept().is_none());
    assert_eq!(report.terms().len(), 1);
    assert_eq!(report.features()[0].name, "x1");
    assert_eq!(report.degrees_of_freedom(), 3);
}
