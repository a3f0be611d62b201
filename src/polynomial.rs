//! Polynomial helpers.
//!
//! Polynomials are represented by their coefficients in decreasing powers, so
//! that `[1.0, 3.0, 3.0]` is `s^2 + 3s + 3`.

use crate::{
    eigenvalues::EigenvalueBackend,
    error::Result,
    types::{TransferFunction, Zpk},
};
use ndarray::Array2;
use num_complex::Complex;
use num_traits::Float;

/// Polynomial root finder.
///
/// This trait models an algorithm that finds all the complex roots of a
/// polynomial with real coefficients. It is used to compute the poles of the
/// prototypes that have no closed form, such as the Bessel prototype.
pub trait RootFinder<T> {
    /// Returns the roots of the polynomial with the given coefficients, in
    /// decreasing powers.
    ///
    /// Leading zero coefficients are ignored, so a polynomial of degree `n`
    /// has exactly `n` roots, counted with multiplicity.
    fn roots(&self, coefficients: &[T]) -> Result<Vec<Complex<T>>>;
}

/// Root finder based on the eigenvalues of the companion matrix.
///
/// The companion matrix of the polynomial is balanced and its eigenvalues are
/// computed with an [`EigenvalueBackend`]. Each eigenvalue is then refined
/// with a few Newton iterations on the original polynomial. This refinement
/// recovers full accuracy when the backend works in a lower precision than
/// `T`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CompanionRootFinder<'a, B> {
    backend: &'a B,
    polish_iterations: usize,
}

impl<'a, B> CompanionRootFinder<'a, B> {
    /// Creates a root finder that uses `backend` and refines each root with
    /// at most `polish_iterations` Newton steps.
    pub fn new(backend: &'a B, polish_iterations: usize) -> CompanionRootFinder<'a, B> {
        CompanionRootFinder {
            backend,
            polish_iterations,
        }
    }
}

impl<T: Float, B: EigenvalueBackend<T>> RootFinder<T> for CompanionRootFinder<'_, B> {
    fn roots(&self, coefficients: &[T]) -> Result<Vec<Complex<T>>> {
        let coefficients = strip_leading_zeros(coefficients);
        let degree = coefficients.len().saturating_sub(1);
        if degree == 0 {
            return Ok(Vec::new());
        }
        let lead = coefficients[0];
        let mut companion = Array2::<T>::zeros((degree, degree));
        for (j, &c) in coefficients[1..].iter().enumerate() {
            companion[(0, j)] = -c / lead;
        }
        for j in 1..degree {
            companion[(j, j - 1)] = T::one();
        }
        balance_matrix(&mut companion);

        let eig = self.backend.eigenvalues(companion)?;
        tracing::trace!(degree, "computed companion matrix eigenvalues");
        Ok(eig
            .into_iter()
            .map(|z| polish_root(coefficients, z, self.polish_iterations))
            .collect())
    }
}

/// Number of Newton iterations used by [`polynomial_roots`].
pub const DEFAULT_POLISH_ITERATIONS: usize = 8;

/// Returns the roots of a polynomial, using a [`CompanionRootFinder`] with
/// [`DEFAULT_POLISH_ITERATIONS`].
pub fn polynomial_roots<T: Float, B: EigenvalueBackend<T>>(
    coefficients: &[T],
    backend: &B,
) -> Result<Vec<Complex<T>>> {
    CompanionRootFinder::new(backend, DEFAULT_POLISH_ITERATIONS).roots(coefficients)
}

fn strip_leading_zeros<T: Float>(coefficients: &[T]) -> &[T] {
    let start = coefficients
        .iter()
        .position(|c| !c.is_zero())
        .unwrap_or(coefficients.len());
    &coefficients[start..]
}

/// Evaluates a real polynomial at a complex point with Horner's rule.
pub fn polyval<T: Float>(coefficients: &[T], z: Complex<T>) -> Complex<T> {
    coefficients
        .iter()
        .fold(Complex::new(T::zero(), T::zero()), |acc, &c| acc * z + c)
}

// Value and derivative with Horner's rule.
fn polyval_derivative<T: Float>(coefficients: &[T], z: Complex<T>) -> (Complex<T>, Complex<T>) {
    let zero = Complex::new(T::zero(), T::zero());
    coefficients.iter().fold((zero, zero), |(p, dp), &c| {
        (p * z + c, dp * z + p)
    })
}

// Newton refinement of a root. A step is only accepted if it decreases the
// magnitude of the polynomial.
fn polish_root<T: Float>(coefficients: &[T], z: Complex<T>, iterations: usize) -> Complex<T> {
    let mut z = z;
    let (mut p, mut dp) = polyval_derivative(coefficients, z);
    for _ in 0..iterations {
        if p.norm_sqr().is_zero() || dp.norm_sqr().is_zero() {
            break;
        }
        let candidate = z - p / dp;
        if !(candidate.re.is_finite() && candidate.im.is_finite()) {
            break;
        }
        let (p_next, dp_next) = polyval_derivative(coefficients, candidate);
        if p_next.norm_sqr() >= p.norm_sqr() {
            break;
        }
        z = candidate;
        p = p_next;
        dp = dp_next;
    }
    z
}

/// Returns the coefficients of the monic polynomial with the given roots, in
/// decreasing powers.
pub fn poly<T: Float>(roots: &[Complex<T>]) -> Vec<Complex<T>> {
    let mut coefficients = Vec::with_capacity(roots.len() + 1);
    coefficients.push(Complex::new(T::one(), T::zero()));
    for &r in roots {
        coefficients.push(Complex::new(T::zero(), T::zero()));
        for j in (1..coefficients.len()).rev() {
            let prev = coefficients[j - 1];
            coefficients[j] = coefficients[j] - r * prev;
        }
    }
    coefficients
}

/// Converts a zero-pole-gain representation to transfer function
/// coefficients.
///
/// The zeros and poles are expected to come in conjugate pairs, so the
/// imaginary parts of the coefficients are rounding noise and are discarded.
pub fn zpk2tf<T: Float>(zpk: &Zpk<T>) -> TransferFunction<T> {
    TransferFunction {
        b: poly(&zpk.zeros)
            .into_iter()
            .map(|c| (c * zpk.gain).re)
            .collect(),
        a: poly(&zpk.poles).into_iter().map(|c| c.re).collect(),
    }
}

// Balance a matrix for eigenvalue calculation, following B.N. Parlett and
// C. Reinsch, "Balancing a matrix for calculation of eigenvalues and
// eigenvectors". Numer. Math. 13, 293–304 (1969).
fn balance_matrix<T: Float>(a: &mut Array2<T>) {
    let gamma = T::from(0.95).unwrap();
    let two = T::from(2.0).unwrap();
    let four = T::from(4.0).unwrap();
    let half = T::from(0.5).unwrap();
    let one = T::one();
    let zero = T::zero();

    // The companion matrix has no rows or columns that isolate an eigenvalue
    // unless the polynomial has roots at zero, in which case the row or
    // column norm is zero and the index is skipped below.
    let n = a.nrows();
    let mut converged = false;
    while !converged {
        converged = true;
        for j in 0..n {
            let mut row_norm = zero;
            let mut col_norm = zero;
            for k in 0..n {
                // only the off-diagonal part is balanced
                if k != j {
                    row_norm = row_norm + a[(j, k)].abs();
                    col_norm = col_norm + a[(k, j)].abs();
                }
            }
            if row_norm == zero || col_norm == zero {
                continue;
            }
            let norm_sum = row_norm + col_norm;
            // Find f = 2^sigma such that
            // 2^{2*sigma - 1} < row_norm / col_norm <= 2^{2*sigma + 1}.
            // After these loops col_norm holds col_norm * f^2.
            let mut f = one;
            let row_norm_half = row_norm * half;
            while col_norm.is_normal() && col_norm <= row_norm_half {
                f = f * two;
                col_norm = col_norm * four;
            }
            let row_norm_twice = row_norm * two;
            while col_norm.is_normal() && col_norm > row_norm_twice {
                f = f / two;
                col_norm = col_norm / four;
            }
            if !col_norm.is_normal() {
                return;
            }

            // col_norm * f + row_norm / f < gamma * (col_norm + row_norm),
            // multiplied by f on both sides.
            if row_norm + col_norm < gamma * norm_sum * f {
                converged = false;
                let f_recip = f.recip();
                // A <- D^{-1} A D, with D = diag(1, ..., f, ..., 1)
                for k in 0..n {
                    if k != j {
                        a[(j, k)] = a[(j, k)] * f_recip;
                        a[(k, j)] = a[(k, j)] * f;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn poly_from_roots() {
        let roots = [
            Complex::new(1.0, 0.0),
            Complex::new(-2.0, 1.0),
            Complex::new(-2.0, -1.0),
        ];
        // (s - 1)(s^2 + 4s + 5) = s^3 + 3s^2 + s - 5
        let c: Vec<f64> = poly(&roots).into_iter().map(|c| c.re).collect();
        assert_eq!(c, vec![1.0, 3.0, 1.0, -5.0]);
        assert_eq!(poly::<f64>(&[]).len(), 1);
    }

    #[test]
    fn zpk_to_transfer_function() {
        let zpk = Zpk {
            zeros: vec![Complex::new(-1.0, 0.0); 2],
            poles: vec![Complex::new(0.5, 0.5), Complex::new(0.5, -0.5)],
            gain: 0.25,
        };
        let tf = zpk2tf(&zpk);
        assert_eq!(tf.b, vec![0.25, 0.5, 0.25]);
        assert_eq!(tf.a, vec![1.0, -1.0, 0.5]);
    }

    #[test]
    fn evaluation() {
        let c = [1.0, 0.0, 1.0];
        let v = polyval(&c, Complex::new(0.0, 1.0));
        assert!(v.norm() < 1e-15);
        let (p, dp) = polyval_derivative(&c, Complex::new(2.0, 0.0));
        assert_eq!(p, Complex::new(5.0, 0.0));
        assert_eq!(dp, Complex::new(4.0, 0.0));
    }

    #[test]
    fn newton_polish() {
        let c = [1.0, 0.0, -2.0];
        let z = polish_root(&c, Complex::new(1.4, 0.0), 8);
        assert!((z.re - 2.0f64.sqrt()).abs() < 1e-15);
        assert_eq!(z.im, 0.0);
    }

    #[cfg(any(
        feature = "faer-backend",
        feature = "lapack-backend",
        feature = "nalgebra-backend"
    ))]
    #[test]
    fn companion_roots() {
        use crate::eigenvalues::DefaultEigenvalueBackend;
        let backend = DefaultEigenvalueBackend::default();
        let finder = CompanionRootFinder::new(&backend, 8);
        // leading zeros are ignored
        let mut roots = finder.roots(&[0.0, 1.0, -6.0, 11.0, -6.0]).unwrap();
        roots.sort_by(|a, b| a.re.partial_cmp(&b.re).unwrap());
        for (r, expected) in roots.iter().zip([1.0, 2.0, 3.0]) {
            assert!((r.re - expected).abs() < 1e-12);
            assert!(r.im.abs() < 1e-12);
        }
        let roots = polynomial_roots(&[1.0, 3.0, 3.0], &backend).unwrap();
        for r in &roots {
            assert!((r.re + 1.5).abs() < 1e-14);
            assert!((r.im.abs() - 0.75f64.sqrt()).abs() < 1e-14);
        }
        assert!(finder.roots(&[2.0]).unwrap().is_empty());
    }
}
