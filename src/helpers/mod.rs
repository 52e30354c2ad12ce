/// This module contains helpers functions to efficiently write tests.
pub mod test_helpers {
    use crate::Float;
    use approx::AbsDiffEq;
    use ndarray::prelude::*;
    use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    pub fn assert_array_all_close<F>(x: ArrayView1<F>, y: ArrayView1<F>, delta: F)
    where
        F: Float + AbsDiffEq<Epsilon = F>,
    {
        assert_eq!(x.len(), y.len());
        for i in 0..x.len() {
            if x[i].abs_diff_ne(&y[i], delta) {
                panic!("x: {}, y: {} ; with precision level {}", x[i], y[i], delta);
            }
        }
    }

    pub fn assert_array2d_all_close<F>(x: ArrayView2<F>, y: ArrayView2<F>, delta: F)
    where
        F: Float + AbsDiffEq<Epsilon = F>,
    {
        assert_eq!(x.shape()[0], y.shape()[0]);
        assert_eq!(x.shape()[1], y.shape()[1]);
        for i in 0..x.shape()[0] {
            for j in 0..x.shape()[1] {
                if x[[i, j]].abs_diff_ne(&y[[i, j]], delta) {
                    panic!(
                        "x: {}, y: {} ; with precision level {}",
                        x[[i, j]],
                        y[[i, j]],
                        delta
                    );
                }
            }
        }
    }

    /// Draws `capacity` standard normal samples from a generator seeded with
    /// `seed`, so that every call site gets a reproducible, independent stream.
    pub fn fill_random_vector(capacity: usize, seed: u64) -> Vec<f64> {
        let mut r = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0., 1.).unwrap();

        let mut data_x: Vec<f64> = Vec::with_capacity(capacity);
        for _ in 0..data_x.capacity() {
            data_x.push(normal.sample(&mut r));
        }
        data_x
    }

    /// Generates a linear problem `y = b_0 + X b + noise_std * e` and returns
    /// the design matrix, the targets and the true coefficients (intercept
    /// first).
    pub fn generate_linear_data(
        n_samples: usize,
        n_features: usize,
        noise_std: f64,
    ) -> (Array2<f64>, Array1<f64>, Array1<f64>) {
        let data_x = fill_random_vector(n_samples * n_features, 42);
        let data_w = fill_random_vector(n_features + 1, 7);
        let data_e = fill_random_vector(n_samples, 1234);
        let X = Array2::from_shape_vec((n_samples, n_features).f(), data_x).unwrap();
        let true_w = Array1::from_shape_vec(n_features + 1, data_w).unwrap();
        let noise = Array1::from_shape_vec(n_samples, data_e).unwrap();
        let y = X.dot(&true_w.slice(s![1..])) + true_w[0] + noise * noise_std;

        (X, y, true_w)
    }

    pub fn generate_random_data(n_samples: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
        let (X, y, _) = generate_linear_data(n_samples, n_features, 1.);
        (X, y)
    }
}
