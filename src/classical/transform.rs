//! Frequency transformations of analog prototypes and the bilinear transform.
//!
//! All the transformations work on zero-pole-gain representations, which are
//! numerically better behaved than transfer function coefficients for high
//! orders.

use crate::types::Zpk;
use num_complex::Complex;
use num_traits::Float;

fn prod<T: Float, F: Fn(Complex<T>) -> Complex<T>>(values: &[Complex<T>], f: F) -> Complex<T> {
    values
        .iter()
        .fold(Complex::new(T::one(), T::zero()), |acc, &x| acc * f(x))
}

// Re(prod(-z) / prod(-p))
fn inverse_gain_factor<T: Float>(zpk: &Zpk<T>) -> T {
    (prod(&zpk.zeros, |z| -z) / prod(&zpk.poles, |p| -p)).re
}

/// Transforms a lowpass prototype into a lowpass filter with cutoff `wo`.
pub fn lp2lp<T: Float>(zpk: &Zpk<T>, wo: T) -> Zpk<T> {
    let degree = zpk.relative_degree();
    Zpk {
        zeros: zpk.zeros.iter().map(|&z| z * wo).collect(),
        poles: zpk.poles.iter().map(|&p| p * wo).collect(),
        gain: zpk.gain * wo.powi(degree as i32),
    }
}

/// Transforms a lowpass prototype into a highpass filter with cutoff `wo`.
///
/// The zeros at infinity of the prototype are moved to the origin.
pub fn lp2hp<T: Float>(zpk: &Zpk<T>, wo: T) -> Zpk<T> {
    let degree = zpk.relative_degree();
    let wo = Complex::new(wo, T::zero());
    let mut zeros: Vec<Complex<T>> = zpk.zeros.iter().map(|&z| wo / z).collect();
    zeros.extend(std::iter::repeat_n(Complex::new(T::zero(), T::zero()), degree));
    Zpk {
        zeros,
        poles: zpk.poles.iter().map(|&p| wo / p).collect(),
        gain: zpk.gain * inverse_gain_factor(zpk),
    }
}

// Maps each root r to the pair s +/- sqrt(s^2 - wo^2), with s = f(r).
fn split_roots<T: Float, F: Fn(Complex<T>) -> Complex<T>>(
    roots: &[Complex<T>],
    wo: T,
    f: F,
) -> Vec<Complex<T>> {
    let wo_sq = wo * wo;
    let scaled: Vec<Complex<T>> = roots.iter().map(|&r| f(r)).collect();
    let plus = scaled.iter().map(|&s| s + (s * s - wo_sq).sqrt());
    let minus = scaled.iter().map(|&s| s - (s * s - wo_sq).sqrt());
    plus.chain(minus).collect()
}

/// Transforms a lowpass prototype into a bandpass filter with center
/// frequency `wo` and bandwidth `bw`.
pub fn lp2bp<T: Float>(zpk: &Zpk<T>, wo: T, bw: T) -> Zpk<T> {
    let degree = zpk.relative_degree();
    let half_bw = bw / T::from(2.0).unwrap();
    let mut zeros = split_roots(&zpk.zeros, wo, |z| z * half_bw);
    zeros.extend(std::iter::repeat_n(Complex::new(T::zero(), T::zero()), degree));
    Zpk {
        zeros,
        poles: split_roots(&zpk.poles, wo, |p| p * half_bw),
        gain: zpk.gain * bw.powi(degree as i32),
    }
}

/// Transforms a lowpass prototype into a bandstop filter with center
/// frequency `wo` and bandwidth `bw`.
///
/// The zeros at infinity of the prototype are moved to `+/- i wo`.
pub fn lp2bs<T: Float>(zpk: &Zpk<T>, wo: T, bw: T) -> Zpk<T> {
    let degree = zpk.relative_degree();
    let half_bw = Complex::new(bw / T::from(2.0).unwrap(), T::zero());
    let mut zeros = split_roots(&zpk.zeros, wo, |z| half_bw / z);
    zeros.extend(std::iter::repeat_n(Complex::new(T::zero(), wo), degree));
    zeros.extend(std::iter::repeat_n(Complex::new(T::zero(), -wo), degree));
    Zpk {
        zeros,
        poles: split_roots(&zpk.poles, wo, |p| half_bw / p),
        gain: zpk.gain * inverse_gain_factor(zpk),
    }
}

/// Bilinear transform of an analog filter for a sample rate `fs`.
///
/// The zeros at infinity of the analog filter are mapped to the Nyquist
/// frequency, `z = -1`.
pub fn bilinear<T: Float>(zpk: &Zpk<T>, fs: T) -> Zpk<T> {
    let degree = zpk.relative_degree();
    let fs2 = fs + fs;
    let map = |x: Complex<T>| (x + fs2) / (-x + fs2);
    let mut zeros: Vec<Complex<T>> = zpk.zeros.iter().map(|&z| map(z)).collect();
    zeros.extend(std::iter::repeat_n(Complex::new(-T::one(), T::zero()), degree));
    let gain = (prod(&zpk.zeros, |z| -z + fs2) / prod(&zpk.poles, |p| -p + fs2)).re;
    Zpk {
        zeros,
        poles: zpk.poles.iter().map(|&p| map(p)).collect(),
        gain: zpk.gain * gain,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::polynomial::{polyval, zpk2tf};

    fn first_order() -> Zpk<f64> {
        Zpk {
            zeros: Vec::new(),
            poles: vec![Complex::new(-1.0, 0.0)],
            gain: 1.0,
        }
    }

    fn analog_response(zpk: &Zpk<f64>, w: f64) -> f64 {
        let tf = zpk2tf(zpk);
        let s = Complex::new(0.0, w);
        (polyval(&tf.b, s) / polyval(&tf.a, s)).norm()
    }

    #[test]
    fn lowpass_scaling() {
        let zpk = lp2lp(&first_order(), 3.0);
        assert_eq!(zpk.poles, vec![Complex::new(-3.0, 0.0)]);
        assert_eq!(zpk.gain, 3.0);
        assert!((analog_response(&zpk, 3.0) - 0.5f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn highpass() {
        let zpk = lp2hp(&first_order(), 2.0);
        assert_eq!(zpk.zeros, vec![Complex::new(0.0, 0.0)]);
        assert_eq!(zpk.poles, vec![Complex::new(-2.0, 0.0)]);
        assert_eq!(zpk.gain, 1.0);
        assert!((analog_response(&zpk, 2.0) - 0.5f64.sqrt()).abs() < 1e-15);
        assert!((analog_response(&zpk, 1e6) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn bandpass_and_bandstop() {
        let (wo, bw) = (2.0, 1.0);
        let bp = lp2bp(&first_order(), wo, bw);
        assert_eq!(bp.zeros.len(), 1);
        assert_eq!(bp.poles.len(), 2);
        assert!((analog_response(&bp, wo) - 1.0).abs() < 1e-12);

        let bs = lp2bs(&first_order(), wo, bw);
        assert_eq!(bs.zeros.len(), 2);
        assert!(bs.zeros.iter().all(|z| z.re == 0.0 && z.im.abs() == wo));
        assert!(analog_response(&bs, wo) < 1e-12);
        assert!((analog_response(&bs, 1e-6) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn bilinear_first_order() {
        // H(s) = 1 / (s + 1) at fs = 2
        let zpk = bilinear(&first_order(), 2.0);
        assert_eq!(zpk.zeros, vec![Complex::new(-1.0, 0.0)]);
        assert!((zpk.poles[0] - Complex::new(0.6, 0.0)).norm() < 1e-15);
        assert!((zpk.gain - 0.2).abs() < 1e-15);
        // DC gain is preserved
        let tf = zpk2tf(&zpk);
        let dc: f64 = tf.b.iter().sum::<f64>() / tf.a.iter().sum::<f64>();
        assert!((dc - 1.0).abs() < 1e-15);
    }
}
