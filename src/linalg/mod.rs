//! Dense linear algebra primitives for the normal equations.
//!
//! Only what the least-squares estimator needs is provided: intercept
//! augmentation, a Cholesky factorization with a scale-invariant rank test,
//! triangular solves and the inversion of a Gram matrix `XᵗX`. We made the
//! choice not to use a LAPACK binding since it introduces unsafe code and a
//! significantly larger bundle size.

use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Axis, Data, Ix2};

use crate::error::{Degeneracy, LinearModelError, Result};
use crate::Float;


/// Prepends a column of ones to the design matrix, so that the first
/// coefficient of a linear model acts as a constant offset.
pub fn with_intercept<F: Float, S: Data<Elem = F>>(X: &ArrayBase<S, Ix2>) -> Array2<F> {
    let (n_samples, n_features) = X.dim();
    let mut X_tilde = Array2::<F>::ones((n_samples, n_features + 1));
    X_tilde.slice_mut(ndarray::s![.., 1..]).assign(X);
    X_tilde
}

/// Subtracts from each column its mean. Returns the centred matrix and the
/// column means.
pub fn center_columns<F: Float, S: Data<Elem = F>>(X: &ArrayBase<S, Ix2>) -> (Array2<F>, Array1<F>) {
    let n_samples = F::cast(X.nrows().max(1));
    let means = X.sum_axis(Axis(0)).mapv(|s| s / n_samples);
    let centred = X - &means;
    (centred, means)
}

/// Computes the Gram matrix `XᵗX`.
pub fn gram<F: Float, S: Data<Elem = F>>(X: &ArrayBase<S, Ix2>) -> Array2<F> {
    X.t().dot(X)
}

fn check_square<F>(A: &ArrayView2<F>) -> Result<usize> {
    let (n_rows, n_cols) = A.dim();
    if n_rows != n_cols {
        return Err(LinearModelError::InvalidInput(format!(
            "expected a square matrix, found shape ({}, {})",
            n_rows, n_cols
        )));
    }
    Ok(n_rows)
}

/// This function computes the lower-triangular factor `L` such that
/// `A = LLᵗ` for a symmetric positive definite matrix `A`.
///
/// The j-th pivot equals `A_jj (1 - R²_j)` where `R²_j` is the share of the
/// j-th column explained by the previous ones. A pivot lower than
/// `tolerance * A_jj` flags the matrix as singular, which makes the test
/// independent of the scale of each column. It is not independent of the
/// offset: on an uncentred Gram matrix a column with a large mean and a
/// small spread has `1 - R²_j` close to zero against the column of ones.
/// Centre such columns first (see [`center_columns`]).
pub fn cholesky_factorization<F: Float>(A: ArrayView2<F>, tolerance: F) -> Result<Array2<F>> {
    let n = check_square(&A)?;
    let mut L = Array2::<F>::zeros((n, n));

    for j in 0..n {
        let mut pivot = A[[j, j]];
        for k in 0..j {
            pivot -= L[[j, k]] * L[[j, k]];
        }
        // Also catches NaN pivots and zero columns.
        if !(pivot > tolerance * A[[j, j]]) || !(A[[j, j]] > F::zero()) {
            return Err(Degeneracy::SingularMatrix.into());
        }
        let l_jj = pivot.sqrt();
        L[[j, j]] = l_jj;

        for i in (j + 1)..n {
            let mut acc = A[[i, j]];
            for k in 0..j {
                acc -= L[[i, k]] * L[[j, k]];
            }
            L[[i, j]] = acc / l_jj;
        }
    }

    Ok(L)
}

/// Solves `Lx = b` for a lower-triangular `L`.
pub fn forward_substitution<F: Float>(L: ArrayView2<F>, b: ArrayView1<F>) -> Result<Array1<F>> {
    let n = check_square(&L)?;
    if b.len() != n {
        return Err(LinearModelError::shape_mismatch("right-hand side length", n, b.len()));
    }

    let mut x = Array1::<F>::zeros(n);
    for i in 0..n {
        if L[[i, i]] == F::zero() {
            return Err(Degeneracy::SingularMatrix.into());
        }
        let mut acc = b[i];
        for k in 0..i {
            acc -= L[[i, k]] * x[k];
        }
        x[i] = acc / L[[i, i]];
    }
    Ok(x)
}

/// Solves `Ux = b` for an upper-triangular `U`.
pub fn backward_substitution<F: Float>(U: ArrayView2<F>, b: ArrayView1<F>) -> Result<Array1<F>> {
    let n = check_square(&U)?;
    if b.len() != n {
        return Err(LinearModelError::shape_mismatch("right-hand side length", n, b.len()));
    }

    let mut x = Array1::<F>::zeros(n);
    for i in (0..n).rev() {
        if U[[i, i]] == F::zero() {
            return Err(Degeneracy::SingularMatrix.into());
        }
        let mut acc = b[i];
        for k in (i + 1)..n {
            acc -= U[[i, k]] * x[k];
        }
        x[i] = acc / U[[i, i]];
    }
    Ok(x)
}

/// Inverts a Gram matrix `XᵗX` by solving `LLᵗx = e_i` for every column
/// `e_i` of the identity. The result is symmetrized to remove the rounding
/// asymmetry of the two triangular solves.
pub fn inv_gram<F: Float>(A: ArrayView2<F>, tolerance: F) -> Result<Array2<F>> {
    let L = cholesky_factorization(A, tolerance)?;
    let n = L.nrows();

    let mut inverse = Array2::<F>::zeros((n, n));
    let mut e = Array1::<F>::zeros(n);
    for i in 0..n {
        e.fill(F::zero());
        e[i] = F::one();
        let z = forward_substitution(L.view(), e.view())?;
        let x = backward_substitution(L.t(), z.view())?;
        inverse.index_axis_mut(Axis(1), i).assign(&x);
    }

    let half = F::cast(0.5);
    let symmetric = (&inverse + &inverse.t()) * half;
    if symmetric.iter().any(|v| !v.is_finite()) {
        return Err(Degeneracy::SingularMatrix.into());
    }
    Ok(symmetric)
}
