//! Frequency response of transfer functions.

use crate::{polynomial::polyval, types::TransferFunction};
use num_complex::Complex;
use num_traits::{Float, FloatConst};

/// Magnitude of an analog transfer function at `w` rad/s.
///
/// Returns `|B(iw) / A(iw)|`.
pub fn analog_magnitude<T: Float>(tf: &TransferFunction<T>, w: T) -> T {
    let s = Complex::new(T::zero(), w);
    (polyval(&tf.b, s) / polyval(&tf.a, s)).norm()
}

// Evaluates sum_k c[k] x^k.
fn eval_ascending<T: Float>(coefficients: &[T], x: Complex<T>) -> Complex<T> {
    coefficients
        .iter()
        .rev()
        .fold(Complex::new(T::zero(), T::zero()), |acc, &c| acc * x + c)
}

/// Magnitude of a digital transfer function at `w`, given as a fraction of
/// the Nyquist frequency.
///
/// The coefficients are in powers of `z^{-1}`, and the transfer function is
/// evaluated at `z = exp(i pi w)`.
pub fn digital_magnitude<T: Float + FloatConst>(tf: &TransferFunction<T>, w: T) -> T {
    let z_inv = Complex::from_polar(T::one(), -T::PI() * w);
    (eval_ascending(&tf.b, z_inv) / eval_ascending(&tf.a, z_inv)).norm()
}

/// Converts a magnitude to dB.
pub fn magnitude_db<T: Float>(magnitude: T) -> T {
    T::from(20.0).unwrap() * magnitude.log10()
}
