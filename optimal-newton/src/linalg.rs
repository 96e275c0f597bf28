//! Dense linear algebra for Newton steps.
//!
//! Singularity is not checked.
//! Zero and tiny pivots produce
//! whatever infinite or NaN values
//! the arithmetic produces.

use ndarray::Array2;
use num_traits::Float;

/// LU factorization with partial pivoting,
/// `PA = LU`,
/// stored compactly:
/// `U` on and above the diagonal,
/// unit-lower-triangular `L` below.
#[derive(Clone, Debug, PartialEq)]
pub struct Lu<A> {
    lu: Array2<A>,
    permutation: Vec<usize>,
    swaps: usize,
}

impl<A> Lu<A>
where
    A: Float,
{
    /// Factor a square matrix.
    ///
    /// A column with an exactly zero pivot
    /// is left uneliminated,
    /// so an exactly singular matrix
    /// has determinant zero.
    pub fn factor(matrix: Array2<A>) -> Self {
        debug_assert_eq!(matrix.nrows(), matrix.ncols());

        let len = matrix.nrows();
        let mut lu = matrix;
        let mut permutation = (0..len).collect::<Vec<_>>();
        let mut swaps = 0;

        for k in 0..len {
            let mut pivot_row = k;
            for i in (k + 1)..len {
                if lu[[i, k]].abs() > lu[[pivot_row, k]].abs() {
                    pivot_row = i;
                }
            }
            if pivot_row != k {
                for j in 0..len {
                    lu.swap([k, j], [pivot_row, j]);
                }
                permutation.swap(k, pivot_row);
                swaps += 1;
            }

            let pivot = lu[[k, k]];
            if pivot == A::zero() {
                continue;
            }
            for i in (k + 1)..len {
                let factor = lu[[i, k]] / pivot;
                lu[[i, k]] = factor;
                for j in (k + 1)..len {
                    lu[[i, j]] = lu[[i, j]] - factor * lu[[k, j]];
                }
            }
        }

        Self {
            lu,
            permutation,
            swaps,
        }
    }

    /// Return number of rows and columns
    /// of the factored matrix.
    pub fn len(&self) -> usize {
        self.permutation.len()
    }

    /// Return whether the factored matrix is empty.
    pub fn is_empty(&self) -> bool {
        self.permutation.is_empty()
    }

    /// Return the determinant of the factored matrix.
    ///
    /// The determinant of an empty matrix is one.
    pub fn determinant(&self) -> A {
        let det = self.lu.diag().iter().fold(A::one(), |acc, x| acc * *x);
        if self.swaps % 2 == 0 {
            det
        } else {
            -det
        }
    }

    /// Return `x` solving `Ax = b`.
    pub fn solve(&self, b: &[A]) -> Vec<A> {
        let mut x = vec![A::zero(); b.len()];
        self.solve_into(b, &mut x);
        x
    }

    /// Write `x` solving `Ax = b`
    /// into `x`.
    pub fn solve_into(&self, b: &[A], x: &mut [A]) {
        debug_assert_eq!(b.len(), self.len());
        debug_assert_eq!(x.len(), self.len());

        // Forward substitution, `Ly = Pb`.
        for i in 0..self.len() {
            let mut sum = b[self.permutation[i]];
            for j in 0..i {
                sum = sum - self.lu[[i, j]] * x[j];
            }
            x[i] = sum;
        }

        // Back substitution, `Ux = y`.
        for i in (0..self.len()).rev() {
            let mut sum = x[i];
            for j in (i + 1)..self.len() {
                sum = sum - self.lu[[i, j]] * x[j];
            }
            x[i] = sum / self.lu[[i, i]];
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn determinant_should_match_known_values() {
        assert_abs_diff_eq!(
            Lu::factor(array![[2.0, 1.0], [1.0, 3.0]]).determinant(),
            5.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            Lu::factor(array![[2.0, 0.5, 0.0], [0.5, 1.0, 0.2], [0.0, 0.2, 3.0]]).determinant(),
            5.17,
            epsilon = 1e-12
        );
    }

    #[test]
    fn determinant_should_account_for_row_swaps() {
        assert_eq!(
            Lu::factor(array![[0.0, 1.0], [1.0, 0.0]]).determinant(),
            -1.0
        );
    }

    #[test]
    fn determinant_should_be_zero_for_singular_matrices() {
        assert_eq!(
            Lu::factor(array![[1.0, 2.0], [2.0, 4.0]]).determinant(),
            0.0
        );
        assert_eq!(Lu::factor(Array2::<f64>::zeros((3, 3))).determinant(), 0.0);
    }

    #[test]
    fn determinant_should_be_one_for_empty_matrices() {
        assert_eq!(Lu::factor(Array2::<f64>::zeros((0, 0))).determinant(), 1.0);
    }

    #[test]
    fn solve_should_solve_linear_systems() {
        let x = Lu::factor(array![[2.0, 1.0], [1.0, 3.0]]).solve(&[3.0, 5.0]);
        assert_abs_diff_eq!(x[0], 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 1.4, epsilon = 1e-12);
    }

    #[test]
    fn solve_should_handle_pivoted_systems() {
        let matrix = array![[0.0, 2.0, 1.0], [1.0, 1.0, 0.0], [3.0, 0.0, 1.0]];
        let b = [5.0, 3.0, 6.0];
        let x = Lu::factor(matrix.clone()).solve(&b);
        for (row, b) in matrix.rows().into_iter().zip(b) {
            let ax = row.iter().zip(&x).map(|(a, x)| a * x).sum::<f64>();
            assert_abs_diff_eq!(ax, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn solve_should_produce_non_finite_values_for_singular_matrices() {
        let x = Lu::factor(array![[1.0, 2.0], [2.0, 4.0]]).solve(&[1.0, 1.0]);
        assert!(x.iter().any(|x| !x.is_finite()));
    }
}
