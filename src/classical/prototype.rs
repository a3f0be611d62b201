//! Analog lowpass prototypes.
//!
//! Every prototype has its cutoff at 1 rad/s. For Butterworth filters this is
//! the -3 dB frequency, for Chebyshev I and elliptic filters it is the edge of
//! the equiripple passband, for Chebyshev II filters it is the edge of the
//! equiripple stopband, and for Bessel filters it is the frequency where the
//! phase reaches half of its asymptotic value.

use super::elliptic::{arc_jac_sc1, ellipdeg, ellipj, ellipk};
use crate::{
    error::{InvalidParameter, Result},
    polynomial::RootFinder,
    types::Zpk,
};
use num_complex::Complex;
use num_traits::{Float, FloatConst};

// Threshold used to discard zeros at infinity and to detect real poles in
// elliptic prototypes.
const ELLIP_EPSILON: f64 = 2e-16;

fn check_order(order: usize) -> Result<()> {
    if order == 0 {
        Err(InvalidParameter::ZeroOrder.into())
    } else {
        Ok(())
    }
}

// Angles pi * m / (2 * N) for m = -N+1, -N+3, ..., N-1.
fn pole_angles<T: Float + FloatConst>(order: usize) -> impl Iterator<Item = T> {
    let n = T::from(order).unwrap();
    (0..order).map(move |j| {
        let m = T::from(2 * j + 1).unwrap() - n;
        T::PI() * m / (n + n)
    })
}

// Re(prod(-p) / prod(-z))
fn dc_gain<T: Float>(zeros: &[Complex<T>], poles: &[Complex<T>]) -> T {
    let one = Complex::new(T::one(), T::zero());
    let num = poles.iter().fold(one, |acc, &p| acc * -p);
    let den = zeros.iter().fold(one, |acc, &z| acc * -z);
    (num / den).re
}

// Linear power ratio 10^(0.1 * db) - 1.
fn db_excess<T: Float>(db: T) -> T {
    T::from(10.0).unwrap().powf(T::from(0.1).unwrap() * db) - T::one()
}

/// Butterworth analog lowpass prototype of order `order`.
///
/// The poles lie evenly spaced on the left half of the unit circle and the
/// gain is one.
pub fn buttap<T: Float + FloatConst>(order: usize) -> Result<Zpk<T>> {
    check_order(order)?;
    let poles = pole_angles(order)
        .map(|theta: T| -Complex::new(theta.cos(), theta.sin()))
        .collect();
    Ok(Zpk {
        zeros: Vec::new(),
        poles,
        gain: T::one(),
    })
}

/// Chebyshev type I analog lowpass prototype.
///
/// The passband ripple `rp` is given in dB. The response of even order
/// prototypes is `-rp` dB at DC; that of odd order prototypes is 0 dB.
pub fn cheb1ap<T: Float + FloatConst>(order: usize, rp: T) -> Result<Zpk<T>> {
    check_order(order)?;
    let eps_sq = db_excess(rp);
    let eps = eps_sq.sqrt();
    let mu = eps.recip().asinh() / T::from(order).unwrap();
    let poles: Vec<Complex<T>> = pole_angles(order)
        .map(|theta: T| -Complex::new(mu.sinh() * theta.cos(), mu.cosh() * theta.sin()))
        .collect();
    let mut gain = dc_gain(&[], &poles);
    if order % 2 == 0 {
        gain = gain / (T::one() + eps_sq).sqrt();
    }
    Ok(Zpk {
        zeros: Vec::new(),
        poles,
        gain,
    })
}

/// Chebyshev type II analog lowpass prototype.
///
/// The stopband attenuation `rs` is given in dB. The zeros lie on the
/// imaginary axis and the response is 0 dB at DC.
pub fn cheb2ap<T: Float + FloatConst>(order: usize, rs: T) -> Result<Zpk<T>> {
    check_order(order)?;
    let n = T::from(order).unwrap();
    let de = db_excess(rs).sqrt().recip();
    let mu = de.recip().asinh() / n;

    // The m = 0 zero of odd orders is at infinity.
    let zeros: Vec<Complex<T>> = pole_angles(order)
        .zip(0..order)
        .filter(|&(_, j)| order % 2 == 0 || 2 * j + 1 != order)
        .map(|(theta, _): (T, usize)| Complex::new(T::zero(), theta.sin().recip()))
        .collect();
    let poles: Vec<Complex<T>> = pole_angles(order)
        .map(|theta: T| {
            let p = -Complex::new(theta.cos(), theta.sin());
            Complex::new(mu.sinh() * p.re, mu.cosh() * p.im).inv()
        })
        .collect();
    let gain = dc_gain(&zeros, &poles);
    Ok(Zpk { zeros, poles, gain })
}

/// Elliptic (Cauer) analog lowpass prototype.
///
/// The passband ripple `rp` and the minimum stopband attenuation `rs` are
/// given in dB. The response of even order prototypes is `-rp` dB at DC.
pub fn ellipap<T: Float + FloatConst>(order: usize, rp: T, rs: T) -> Result<Zpk<T>> {
    check_order(order)?;
    let one = T::one();
    if order == 1 {
        let p = -db_excess(rp).recip().sqrt();
        return Ok(Zpk {
            zeros: Vec::new(),
            poles: vec![Complex::new(p, T::zero())],
            gain: -p,
        });
    }

    let threshold = T::from(ELLIP_EPSILON).unwrap();
    let n = T::from(order).unwrap();
    let eps_sq = db_excess(rp);
    let eps = eps_sq.sqrt();
    let ck1_sq = eps_sq / db_excess(rs);
    let m = ellipdeg(order, ck1_sq);
    let capk = ellipk(m);

    // j = 1 - N % 2, 3 - N % 2, ... < N
    let jacobi: Vec<_> = ((order + 1) % 2..order)
        .step_by(2)
        .map(|j| ellipj(T::from(j).unwrap() * capk / n, m))
        .collect();

    let mut zeros: Vec<Complex<T>> = jacobi
        .iter()
        .filter(|v| v.sn.abs() > threshold)
        .map(|v| Complex::new(T::zero(), (m.sqrt() * v.sn).recip()))
        .collect();
    let conjugates: Vec<Complex<T>> = zeros.iter().map(|z| z.conj()).collect();
    zeros.extend(conjugates);

    let r = arc_jac_sc1(eps.recip(), ck1_sq);
    let v0 = capk * r / (n * ellipk(ck1_sq));
    let jv = ellipj(v0, one - m);
    let mut poles: Vec<Complex<T>> = jacobi
        .iter()
        .map(|v| {
            let den = one - (v.dn * jv.sn).powi(2);
            -Complex::new(v.cn * v.dn * jv.sn * jv.cn, v.sn * jv.dn) / den
        })
        .collect();
    let conjugates: Vec<Complex<T>> = if order % 2 == 1 {
        let norm = poles
            .iter()
            .fold(T::zero(), |acc, p| acc + p.norm_sqr())
            .sqrt();
        poles
            .iter()
            .filter(|p| p.im.abs() > threshold * norm)
            .map(|p| p.conj())
            .collect()
    } else {
        poles.iter().map(|p| p.conj()).collect()
    };
    poles.extend(conjugates);

    let mut gain = dc_gain(&zeros, &poles);
    if order % 2 == 0 {
        gain = gain / (one + eps_sq).sqrt();
    }
    Ok(Zpk { zeros, poles, gain })
}

/// Coefficients of the reverse Bessel polynomial of degree `order`, in
/// decreasing powers.
///
/// The coefficient of `s^k` is `(2N - k)! / (2^(N - k) k! (N - k)!)`.
pub fn reverse_bessel_polynomial<T: Float>(order: usize) -> Vec<T> {
    let two = T::from(2.0).unwrap();
    let mut coefficients = Vec::with_capacity(order + 1);
    let mut a = T::one();
    coefficients.push(a);
    // a_{k-1} = a_k * k * (2N - k + 1) / (2 (N - k + 1))
    for k in (1..=order).rev() {
        let num = T::from(k * (2 * order - k + 1)).unwrap();
        let den = two * T::from(order - k + 1).unwrap();
        a = a * num / den;
        coefficients.push(a);
    }
    coefficients
}

/// Bessel analog lowpass prototype, normalized in phase.
///
/// The poles are the roots of the reverse Bessel polynomial, found with
/// `root_finder` and scaled so that the phase response reaches half of its
/// asymptotic value at 1 rad/s. The gain is one, which gives 0 dB at DC.
pub fn besselap<T: Float + FloatConst>(
    order: usize,
    root_finder: &dyn RootFinder<T>,
) -> Result<Zpk<T>> {
    check_order(order)?;
    let coefficients = reverse_bessel_polynomial::<T>(order);
    let a0 = coefficients[order];
    let scale = a0.powf(-T::from(order).unwrap().recip());
    let poles = root_finder
        .roots(&coefficients)?
        .into_iter()
        .map(|p| p * scale)
        .collect();
    Ok(Zpk {
        zeros: Vec::new(),
        poles,
        gain: T::one(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn prod_neg(values: &[Complex<f64>]) -> Complex<f64> {
        values.iter().fold(Complex::new(1.0, 0.0), |acc, &x| acc * -x)
    }

    #[test]
    fn butterworth_poles() {
        let zpk = buttap::<f64>(3).unwrap();
        assert!(zpk.zeros.is_empty());
        assert_eq!(zpk.gain, 1.0);
        for p in &zpk.poles {
            assert!((p.norm() - 1.0).abs() < 1e-15);
            assert!(p.re < 0.0);
        }
        assert!(zpk.poles.iter().any(|p| (p.re + 1.0).abs() < 1e-15));
        assert!(buttap::<f64>(0).is_err());
    }

    #[test]
    fn chebyshev1_poles() {
        let zpk = cheb1ap::<f64>(2, 1.0).unwrap();
        let expected = Complex::new(-0.5488671642819638, 0.8951285740199136);
        assert!(zpk.poles.iter().any(|p| (p - expected).norm() < 1e-12));
        assert!(
            zpk.poles
                .iter()
                .any(|p| (p - expected.conj()).norm() < 1e-12)
        );
        // Even orders have -rp dB at DC.
        let dc = zpk.gain / prod_neg(&zpk.poles).re;
        assert!((20.0 * dc.log10() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn chebyshev2_zeros() {
        let zpk = cheb2ap::<f64>(3, 40.0).unwrap();
        assert_eq!(zpk.zeros.len(), 2);
        assert_eq!(zpk.poles.len(), 3);
        let z = 2.0 / 3.0f64.sqrt();
        assert!(zpk.zeros.iter().all(|x| x.re == 0.0 && (x.im.abs() - z).abs() < 1e-12));
        let dc = zpk.gain * prod_neg(&zpk.zeros).re / prod_neg(&zpk.poles).re;
        assert!((dc - 1.0).abs() < 1e-12);
        assert_eq!(cheb2ap::<f64>(4, 40.0).unwrap().zeros.len(), 4);
    }

    #[test]
    fn elliptic_prototype() {
        let zpk = ellipap::<f64>(3, 1.0, 80.0).unwrap();
        assert_eq!(zpk.zeros.len(), 2);
        assert_eq!(zpk.poles.len(), 3);
        assert!(
            zpk.zeros
                .iter()
                .all(|z| (z.im.abs() - 12.386344100739514).abs() < 1e-9)
        );
        let expected = [
            Complex::new(-0.4955122820819891, 0.0),
            Complex::new(-0.24614973536766133, 0.9665234031080074),
            Complex::new(-0.24614973536766133, -0.9665234031080074),
        ];
        for e in expected {
            assert!(zpk.poles.iter().any(|p| (p - e).norm() < 1e-9));
        }
        assert!((zpk.gain - 0.003212811346666992).abs() < 1e-12);

        let zpk = ellipap::<f64>(1, 1.0, 80.0).unwrap();
        assert!((zpk.poles[0].re + 1.9652267283602716).abs() < 1e-12);
        assert_eq!(zpk.gain, -zpk.poles[0].re);
    }

    #[test]
    fn bessel_polynomial() {
        assert_eq!(reverse_bessel_polynomial::<f64>(1), vec![1.0, 1.0]);
        assert_eq!(reverse_bessel_polynomial::<f64>(2), vec![1.0, 3.0, 3.0]);
        assert_eq!(
            reverse_bessel_polynomial::<f64>(4),
            vec![1.0, 10.0, 45.0, 105.0, 105.0]
        );
    }
}
