//! Complete elliptic integrals and Jacobian elliptic functions.
//!
//! All the functions use the parameter `m = k^2` convention.

use num_complex::Complex;
use num_traits::{Float, FloatConst};

// Bound on the number of arithmetic-geometric mean iterations. Convergence is
// quadratic, so this is only reached with non-finite inputs.
const AGM_MAX_ITERATIONS: usize = 64;

// Bound on the number of descending Landen transformations.
const LANDEN_MAX_ITERATIONS: usize = 10;

// pi / (2 * agm(1, b))
fn quarter_period<T: Float + FloatConst>(b: T) -> T {
    if b.is_zero() {
        return T::infinity();
    }
    let half = T::from(0.5).unwrap();
    let mut a = T::one();
    let mut b = b;
    for _ in 0..AGM_MAX_ITERATIONS {
        if (a - b).abs() <= T::epsilon() * a {
            break;
        }
        let a_next = half * (a + b);
        b = (a * b).sqrt();
        a = a_next;
    }
    T::FRAC_PI_2() / a
}

/// Complete elliptic integral of the first kind, `K(m)`.
///
/// Returns infinity for `m == 1` and NaN for `m > 1`.
pub fn ellipk<T: Float + FloatConst>(m: T) -> T {
    if m > T::one() {
        return T::nan();
    }
    quarter_period((T::one() - m).sqrt())
}

/// Complete elliptic integral of the first kind around `m = 1`.
///
/// Returns `K(1 - p)`, computed without forming `1 - p`, so that it remains
/// accurate for small `p`.
pub fn ellipkm1<T: Float + FloatConst>(p: T) -> T {
    if p < T::zero() {
        return T::nan();
    }
    quarter_period(p.sqrt())
}

/// Values of the Jacobian elliptic functions at a point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Jacobi<T> {
    /// `sn(u, m)`.
    pub sn: T,
    /// `cn(u, m)`.
    pub cn: T,
    /// `dn(u, m)`.
    pub dn: T,
    /// Amplitude `phi`, such that `sn = sin(phi)` and `cn = cos(phi)`.
    pub phi: T,
}

/// Jacobian elliptic functions `sn`, `cn`, `dn` and the amplitude.
///
/// This uses the descending arithmetic-geometric mean, with series
/// approximations for `m` very close to 0 and to 1. All the results are NaN
/// if `m` is outside `[0, 1]`.
pub fn ellipj<T: Float + FloatConst>(u: T, m: T) -> Jacobi<T> {
    let zero = T::zero();
    let one = T::one();
    let half = T::from(0.5).unwrap();
    let quarter = T::from(0.25).unwrap();
    if m < zero || m > one || m.is_nan() {
        let nan = T::nan();
        return Jacobi {
            sn: nan,
            cn: nan,
            dn: nan,
            phi: nan,
        };
    }
    if m < T::from(1e-9).unwrap() {
        let t = u.sin();
        let b = u.cos();
        let ai = quarter * m * (u - t * b);
        return Jacobi {
            sn: t - ai * b,
            cn: b + ai * t,
            dn: one - half * m * t * t,
            phi: u - ai,
        };
    }
    if m >= T::from(0.9999999999).unwrap() {
        let ai = quarter * (one - m);
        let b = u.cosh();
        let t = u.tanh();
        let phi = b.recip();
        let twon = b * u.sinh();
        let ai_t = ai * t * phi;
        return Jacobi {
            sn: t + ai * (twon - u) / (b * b),
            cn: phi - ai_t * (twon - u),
            dn: phi + ai_t * (twon + u),
            phi: T::from(2.0).unwrap() * u.exp().atan() - T::FRAC_PI_2() + ai * (twon - u) / b,
        };
    }

    let mut a = [zero; 9];
    let mut c = [zero; 9];
    a[0] = one;
    c[0] = m.sqrt();
    let mut b = (one - m).sqrt();
    let mut twon = one;
    let mut i = 0;
    while (c[i] / a[i]).abs() > T::epsilon() && i < 8 {
        let ai = a[i];
        i += 1;
        c[i] = half * (ai - b);
        let t = (ai * b).sqrt();
        a[i] = half * (ai + b);
        b = t;
        twon = twon + twon;
    }
    let mut phi = twon * a[i] * u;
    let mut prev = phi;
    while i > 0 {
        let t = c[i] * phi.sin() / a[i];
        prev = phi;
        phi = half * (t.asin() + phi);
        i -= 1;
    }
    let cn = phi.cos();
    Jacobi {
        sn: phi.sin(),
        cn,
        dn: cn / (phi - prev).cos(),
        phi,
    }
}

/// Solves the degree equation of elliptic filters.
///
/// Given the order `n` and the parameter `m1`, returns the parameter `m` such
/// that `n * K'(m) / K(m) = K'(m1) / K(m1)`, where `K'(m) = K(1 - m)`. The
/// equation is solved through the nomes, using truncated theta series.
pub fn ellipdeg<T: Float + FloatConst>(n: usize, m1: T) -> T {
    let k1 = ellipk(m1);
    let k1p = ellipkm1(m1);
    let q1 = (-T::PI() * k1p / k1).exp();
    let q = q1.powf(T::from(n).unwrap().recip());
    let num = (0..=7).fold(T::zero(), |acc, j: i32| acc + q.powi(j * (j + 1)));
    let den = (1..=8).fold(T::zero(), |acc, j: i32| acc + q.powi(j * j));
    let den = T::one() + T::from(2.0).unwrap() * den;
    T::from(16.0).unwrap() * q * (num / den).powi(4)
}

/// Inverse Jacobian elliptic `sn` for complex arguments.
///
/// Returns `z` such that `sn(z, m) = w`, computed with descending Landen
/// transformations. Returns NaN for `m > 1`.
pub fn arc_jac_sn<T: Float + FloatConst>(w: Complex<T>, m: T) -> Complex<T> {
    let one = T::one();
    let two = T::from(2.0).unwrap();
    let k = m.sqrt();
    if k > one || k.is_nan() {
        return Complex::new(T::nan(), T::nan());
    }
    if k == one {
        return w.atanh();
    }

    let mut ks = vec![k];
    for _ in 0..LANDEN_MAX_ITERATIONS {
        let kn = ks[ks.len() - 1];
        if kn == T::zero() {
            break;
        }
        let kp = ((one - kn) * (one + kn)).sqrt();
        ks.push((one - kp) / (one + kp));
    }
    let quarter_period = ks[1..]
        .iter()
        .fold(T::FRAC_PI_2(), |acc, &kn| acc * (one + kn));

    let mut wn = w;
    for pair in ks.windows(2) {
        let (kn, knext) = (pair[0], pair[1]);
        let root = ((-wn * kn + one) * (wn * kn + one)).sqrt();
        wn = wn * two / ((root + one) * (one + knext));
    }
    wn.asin() * (quarter_period * two / T::PI())
}

/// Real inverse Jacobian elliptic `sc` with complementary parameter.
///
/// Returns the real `z` such that `w = sc(z, 1 - m)`, using the identity
/// `sn(i z, m) = i sc(z, 1 - m)`.
pub fn arc_jac_sc1<T: Float + FloatConst>(w: T, m: T) -> T {
    arc_jac_sn(Complex::new(T::zero(), w), m).im
}
