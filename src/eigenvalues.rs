use crate::error::Error;
use ndarray::Array2;
use num_complex::Complex;

/// Eigenvalue backend.
///
/// Polynomials without a closed-form factorization, such as the reverse
/// Bessel polynomials that give the poles of Bessel filters, are solved by
/// computing the eigenvalues of their companion matrix (see
/// [`CompanionRootFinder`](crate::CompanionRootFinder)). This trait abstracts
/// the library that computes these eigenvalues for real square matrices with
/// scalar type `T`.
///
/// The backends are optional and selected with feature flags:
///
/// - `faer-backend` (enabled by default) defines `FaerBackend`, a pure Rust
///   backend using `faer`.
///
/// - `lapack-backend` defines `LapackBackend`, which calls LAPACK through
///   `ndarray_linalg`.
///
/// - `nalgebra-backend` defines `NalgebraBackend`, using `nalgebra`.
pub trait EigenvalueBackend<T> {
    /// Returns the eigenvalues of a real square matrix, in no particular
    /// order.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `matrix` is not square.
    fn eigenvalues(&self, matrix: Array2<T>) -> Result<Vec<Complex<T>>>;
}

type Result<T> = std::result::Result<T, EigenvaluesError>;

/// Error reported by an eigenvalue backend.
///
/// The string describes the failure. It is converted into
/// [`Error::EigenvaluesError`] when it reaches the public API.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct EigenvaluesError(pub String);

impl From<EigenvaluesError> for Error {
    fn from(value: EigenvaluesError) -> Error {
        Error::EigenvaluesError(value.0)
    }
}

// Runs an f64 eigenvalue solver on a matrix of another scalar type.
#[cfg(all(
    feature = "num-bigfloat",
    any(feature = "faer-backend", feature = "nalgebra-backend")
))]
fn through_f64<T, F>(matrix: Array2<T>, solve: F) -> Result<Vec<Complex<T>>>
where
    T: crate::Convf64,
    F: FnOnce(Array2<f64>) -> Result<Vec<Complex<f64>>>,
{
    let eig = solve(matrix.map(|x| x.to_f64()))?;
    Ok(eig
        .into_iter()
        .map(|z| Complex::new(T::from_f64(z.re), T::from_f64(z.im)))
        .collect())
}

#[cfg(any(
    feature = "lapack-backend",
    feature = "faer-backend",
    feature = "nalgebra-backend"
))]
macro_rules! default_eigenvalue_doc {
    () => {
        r#" Default eigenvalue backend.

 This is the backend used by [`FilterSession::new`](crate::FilterSession::new)
 and [`PrototypeDispatcher::new`](crate::PrototypeDispatcher::new). It is the
 first backend enabled by the feature flags in this list:

 - `lapack-backend`
 - `faer-backend`
 - `nalgebra-backend`
"#
    };
}

#[doc = default_eigenvalue_doc!()]
#[cfg(feature = "lapack-backend")]
pub type DefaultEigenvalueBackend = LapackBackend;

#[doc = default_eigenvalue_doc!()]
#[cfg(all(not(feature = "lapack-backend"), feature = "faer-backend"))]
pub type DefaultEigenvalueBackend = FaerBackend;

#[doc = default_eigenvalue_doc!()]
#[cfg(all(
    not(any(feature = "lapack-backend", feature = "faer-backend")),
    feature = "nalgebra-backend"
))]
pub type DefaultEigenvalueBackend = NalgebraBackend;

#[cfg(feature = "lapack-backend")]
pub use lapack::LapackBackend;

#[cfg(feature = "lapack-backend")]
mod lapack {
    use super::*;
    use crate::lapack::ToLapack;
    use ndarray_linalg::{EigVals, Scalar, error::LinalgError};

    /// LAPACK eigenvalue backend.
    ///
    /// Uses [`ndarray_linalg`]. Scalars other than `f64` and `f32` are
    /// converted with [`ToLapack`] before calling LAPACK.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
    pub struct LapackBackend {}

    impl<T: ToLapack> EigenvalueBackend<T> for LapackBackend {
        fn eigenvalues(&self, matrix: Array2<T>) -> Result<Vec<Complex<T>>> {
            let eig = T::array_to_lapack(matrix).eigvals()?;
            Ok(eig
                .into_iter()
                .map(|z| {
                    Complex::new(
                        T::from_lapack(&<T::Lapack>::from_real(z.re())),
                        T::from_lapack(&<T::Lapack>::from_real(z.im())),
                    )
                })
                .collect())
        }
    }

    impl From<LinalgError> for EigenvaluesError {
        fn from(value: LinalgError) -> EigenvaluesError {
            EigenvaluesError(value.to_string())
        }
    }
}

#[cfg(feature = "faer-backend")]
pub use faer::FaerBackend;

#[cfg(feature = "faer-backend")]
mod faer {
    use super::*;
    use ::faer::{linalg::evd::EvdError, traits::RealField};
    use faer_ext::IntoFaer;

    #[allow(rustdoc::broken_intra_doc_links)]
    /// faer eigenvalue backend.
    ///
    /// Uses [`faer`](::faer). Scalars supported by `faer` are used natively. A
    /// [`num_bigfloat::BigFloat`] matrix is solved in `f64`.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
    pub struct FaerBackend {}

    /// Scalars that [`FaerBackend`] passes to `faer` without conversion.
    ///
    /// A blanket implementation over [`RealField`] would prevent the
    /// conversion-based implementations for other scalars, since `faer` is
    /// free to implement `RealField` for more types.
    pub trait IsRealField: RealField {}
    impl IsRealField for f64 {}
    impl IsRealField for f32 {}
    impl IsRealField for ::faer::fx128 {}

    impl<T: IsRealField> EigenvalueBackend<T> for FaerBackend {
        fn eigenvalues(&self, matrix: Array2<T>) -> Result<Vec<Complex<T>>> {
            Ok(matrix.view().into_faer().eigenvalues()?)
        }
    }

    #[cfg(feature = "num-bigfloat")]
    impl EigenvalueBackend<num_bigfloat::BigFloat> for FaerBackend {
        fn eigenvalues(
            &self,
            matrix: Array2<num_bigfloat::BigFloat>,
        ) -> Result<Vec<Complex<num_bigfloat::BigFloat>>> {
            through_f64(matrix, |m| Ok(m.view().into_faer().eigenvalues()?))
        }
    }

    impl From<EvdError> for EigenvaluesError {
        fn from(value: EvdError) -> EigenvaluesError {
            match value {
                EvdError::NoConvergence => EigenvaluesError("no convergence".to_string()),
            }
        }
    }
}

#[cfg(feature = "nalgebra-backend")]
pub use nalgebra::NalgebraBackend;

#[cfg(feature = "nalgebra-backend")]
mod nalgebra {
    use super::*;
    use ::nalgebra::{DMatrix, RealField};

    #[allow(rustdoc::broken_intra_doc_links)]
    /// nalgebra eigenvalue backend.
    ///
    /// Uses [`nalgebra`](::nalgebra), natively for `f32` and `f64`. A
    /// [`num_bigfloat::BigFloat`] matrix is solved in `f64`.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
    pub struct NalgebraBackend {}

    /// Scalars that [`NalgebraBackend`] passes to `nalgebra` without
    /// conversion.
    pub trait IsRealField: RealField {}
    impl IsRealField for f64 {}
    impl IsRealField for f32 {}

    fn solve<T: IsRealField>(matrix: Array2<T>) -> Vec<Complex<T>> {
        let (rows, cols) = matrix.dim();
        // ndarray iterates in row-major order.
        let matrix = DMatrix::from_row_iterator(rows, cols, matrix);
        matrix.complex_eigenvalues().iter().cloned().collect()
    }

    impl<T: IsRealField> EigenvalueBackend<T> for NalgebraBackend {
        fn eigenvalues(&self, matrix: Array2<T>) -> Result<Vec<Complex<T>>> {
            Ok(solve(matrix))
        }
    }

    #[cfg(feature = "num-bigfloat")]
    impl EigenvalueBackend<num_bigfloat::BigFloat> for NalgebraBackend {
        fn eigenvalues(
            &self,
            matrix: Array2<num_bigfloat::BigFloat>,
        ) -> Result<Vec<Complex<num_bigfloat::BigFloat>>> {
            through_f64(matrix, |m| Ok(solve(m)))
        }
    }
}

#[cfg(all(
    test,
    any(
        feature = "faer-backend",
        feature = "lapack-backend",
        feature = "nalgebra-backend"
    )
))]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn rotation_eigenvalues() {
        // Companion matrix of s^2 + 1.
        let matrix = array![[0.0f64, -1.0], [1.0, 0.0]];
        let mut eig = DefaultEigenvalueBackend::default()
            .eigenvalues(matrix)
            .unwrap();
        eig.sort_by(|a, b| a.im.total_cmp(&b.im));
        assert!((eig[0] - Complex::new(0.0, -1.0)).norm() < 1e-12);
        assert!((eig[1] - Complex::new(0.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn bessel_companion_eigenvalues() {
        // Companion matrix of the reverse Bessel polynomial s^2 + 3s + 3.
        let matrix = array![[-3.0f64, -3.0], [1.0, 0.0]];
        for z in DefaultEigenvalueBackend::default()
            .eigenvalues(matrix)
            .unwrap()
        {
            assert!((z.re + 1.5).abs() < 1e-12);
            assert!((z.im.abs() - 0.75f64.sqrt()).abs() < 1e-12);
        }
    }

    #[test]
    fn error_conversion() {
        let err: Error = EigenvaluesError("no convergence".to_string()).into();
        assert_eq!(err, Error::EigenvaluesError("no convergence".to_string()));
    }
}
