use ndarray::{Array, Dimension};

/// Conversion to a LAPACK-compatible scalar.
///
/// Filter design is generic over any scalar implementing
/// [`Float`](num_traits::Float) and [`FloatConst`](num_traits::FloatConst),
/// but [`LapackBackend`](crate::LapackBackend) can only hand `f64` and `f32`
/// matrices to LAPACK. This trait converts the companion matrices built for
/// polynomial root finding into one of those types, and the eigenvalues back.
pub trait ToLapack: Sized + 'static {
    /// The LAPACK-supported type to which the scalar is converted.
    type Lapack: ndarray_linalg::Lapack;

    /// Returns the conversion of `self` to a `Self::Lapack` scalar.
    fn to_lapack(&self) -> Self::Lapack;

    /// Returns the conversion of a `Self::Lapack` scalar to a `Self` scalar.
    fn from_lapack(lapack: &Self::Lapack) -> Self;

    /// Converts an [`ndarray`] [`Array`] elementwise with
    /// [`ToLapack::to_lapack`].
    ///
    /// Types that need no conversion override this to return the array
    /// unchanged.
    fn array_to_lapack<D: Dimension>(array: Array<Self, D>) -> Array<Self::Lapack, D> {
        array.map(|s| s.to_lapack())
    }
}

/// Scalars for which [`ToLapack`] is the identity.
///
/// A blanket implementation over [`Lapack`](ndarray_linalg::Lapack) would
/// conflict with the implementation for `BigFloat`.
pub trait IsLapack: ndarray_linalg::Lapack {}
impl IsLapack for f64 {}
impl IsLapack for f32 {}

impl<T: IsLapack> ToLapack for T {
    type Lapack = Self;

    fn to_lapack(&self) -> Self::Lapack {
        *self
    }

    fn from_lapack(lapack: &Self::Lapack) -> Self {
        *lapack
    }

    fn array_to_lapack<D: Dimension>(array: Array<Self, D>) -> Array<Self::Lapack, D> {
        array
    }
}

#[cfg(feature = "num-bigfloat")]
impl ToLapack for num_bigfloat::BigFloat {
    type Lapack = f64;

    fn to_lapack(&self) -> Self::Lapack {
        self.to_f64()
    }

    fn from_lapack(lapack: &Self::Lapack) -> Self {
        Self::from_f64(*lapack)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn identity_conversion() {
        let matrix = array![[1.0f32, 2.0], [3.0, 4.0]];
        assert_eq!(f32::array_to_lapack(matrix.clone()), matrix);
        assert_eq!(2.5f64.to_lapack(), 2.5);
    }

    #[cfg(feature = "num-bigfloat")]
    #[test]
    fn bigfloat_conversion() {
        use num_bigfloat::BigFloat;
        let x = BigFloat::from_f64(0.25);
        assert_eq!(x.to_lapack(), 0.25);
        assert_eq!(BigFloat::from_lapack(&0.25), x);
    }
}
