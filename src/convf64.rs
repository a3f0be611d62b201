#[allow(rustdoc::broken_intra_doc_links)]
/// Conversion between a type and [`f64`].
///
/// The conversions may be lossy. They are used where a computation is only
/// available in `f64`: eigenvalue backends without native support for a
/// scalar, and the Python bindings, which exchange `f64` with Python and may
/// design in [`num_bigfloat::BigFloat`] internally.
pub trait Convf64 {
    /// Converts self to an `f64`, possibly in a lossy way.
    fn to_f64(&self) -> f64;

    /// Converts an `f64` to the type `Self`, possibly in a lossy way.
    fn from_f64(x: f64) -> Self;
}

impl Convf64 for f32 {
    fn to_f64(&self) -> f64 {
        (*self).into()
    }

    fn from_f64(x: f64) -> f32 {
        x as f32
    }
}

impl Convf64 for f64 {
    fn to_f64(&self) -> f64 {
        *self
    }

    fn from_f64(x: f64) -> f64 {
        x
    }
}

#[cfg(feature = "num-bigfloat")]
impl Convf64 for num_bigfloat::BigFloat {
    fn to_f64(&self) -> f64 {
        self.to_f64()
    }

    fn from_f64(x: f64) -> Self {
        x.into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lossy_conversions() {
        assert_eq!(Convf64::to_f64(&0.5f32), 0.5);
        assert_eq!(<f32 as Convf64>::from_f64(0.1), 0.1f32);
        assert_eq!(<f64 as Convf64>::from_f64(0.1), 0.1);
    }

    #[cfg(feature = "num-bigfloat")]
    #[test]
    fn bigfloat() {
        let x = <num_bigfloat::BigFloat as Convf64>::from_f64(1.5);
        assert_eq!(Convf64::to_f64(&x), 1.5);
    }
}
