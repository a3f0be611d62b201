//! Bounded scalar minimization.

use crate::error::{InvalidParameter, Result};
use num_traits::Float;

/// Result of a bounded scalar minimization.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Minimum<T> {
    /// Abscissa of the minimum.
    pub x: T,
    /// Value of the objective at `x`.
    pub value: T,
    /// Number of objective evaluations.
    pub evaluations: usize,
    /// False if the evaluation limit was reached before the tolerance.
    pub converged: bool,
}

/// Brent's method for minimizing a scalar function on a closed interval.
///
/// The search combines golden section steps with parabolic interpolation and
/// stops when the bracket around the current best point is narrower than an
/// absolute tolerance (plus a relative term of the order of the square root of
/// the machine epsilon). The first evaluation is at the golden section point
/// of the interval and the endpoints are never evaluated, matching the
/// bounded minimizer used by SciPy's `fminbound`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundedMinimizer<T> {
    xatol: T,
    max_evaluations: usize,
}

impl<T: Float> BoundedMinimizer<T> {
    /// Creates a minimizer with an absolute tolerance `xatol` and a maximum
    /// number of objective evaluations.
    pub fn new(xatol: T, max_evaluations: usize) -> BoundedMinimizer<T> {
        BoundedMinimizer {
            xatol,
            max_evaluations,
        }
    }

    /// Minimizes `f` on `[lower, upper]`.
    ///
    /// An error is returned if `lower > upper`. A minimization that reaches
    /// the evaluation limit is not an error; it is reported by
    /// [`Minimum::converged`].
    pub fn minimize<F: FnMut(T) -> T>(&self, mut f: F, lower: T, upper: T) -> Result<Minimum<T>> {
        if lower > upper {
            return Err(InvalidParameter::EmptyBracket.into());
        }
        let zero = T::zero();
        let one = T::one();
        let half = T::from(0.5).unwrap();
        let two = T::from(2.0).unwrap();
        let three = T::from(3.0).unwrap();
        let sqrt_eps = T::from(2.2e-16).unwrap().sqrt();
        let golden_mean = half * (three - T::from(5.0).unwrap().sqrt());

        let (mut a, mut b) = (lower, upper);
        // xf is the best point so far, nfc the second best and fulc the
        // previous value of nfc.
        let mut fulc = a + golden_mean * (b - a);
        let mut nfc = fulc;
        let mut xf = fulc;
        let mut rat = zero;
        let mut e = zero;
        let mut fx = f(xf);
        let mut evaluations = 1;
        let mut ffulc = fx;
        let mut fnfc = fx;
        let mut xm = half * (a + b);
        let mut tol1 = sqrt_eps * xf.abs() + self.xatol / three;
        let mut tol2 = two * tol1;
        let mut converged = true;

        while (xf - xm).abs() > tol2 - half * (b - a) {
            let mut golden = true;
            if e.abs() > tol1 {
                // Parabolic fit through xf, nfc and fulc.
                let r = (xf - nfc) * (fx - ffulc);
                let mut q = (xf - fulc) * (fx - fnfc);
                let mut p = (xf - fulc) * q - (xf - nfc) * r;
                q = two * (q - r);
                if q > zero {
                    p = -p;
                }
                q = q.abs();
                let e_prev = e;
                e = rat;
                if p.abs() < (half * q * e_prev).abs() && p > q * (a - xf) && p < q * (b - xf) {
                    golden = false;
                    rat = p / q;
                    let u = xf + rat;
                    // Do not evaluate too close to the bracket ends.
                    if (u - a) < tol2 || (b - u) < tol2 {
                        rat = if xm - xf >= zero { tol1 } else { -tol1 };
                    }
                }
            }
            if golden {
                e = if xf >= xm { a - xf } else { b - xf };
                rat = golden_mean * e;
            }

            let step_sign = if rat >= zero { one } else { -one };
            let x = xf + step_sign * rat.abs().max(tol1);
            let fu = f(x);
            evaluations += 1;
            tracing::trace!(evaluations, "bounded minimizer step");

            if fu <= fx {
                if x >= xf {
                    a = xf;
                } else {
                    b = xf;
                }
                fulc = nfc;
                ffulc = fnfc;
                nfc = xf;
                fnfc = fx;
                xf = x;
                fx = fu;
            } else {
                if x < xf {
                    a = x;
                } else {
                    b = x;
                }
                if fu <= fnfc || nfc == xf {
                    fulc = nfc;
                    ffulc = fnfc;
                    nfc = x;
                    fnfc = fu;
                } else if fu <= ffulc || fulc == xf || fulc == nfc {
                    fulc = x;
                    ffulc = fu;
                }
            }

            xm = half * (a + b);
            tol1 = sqrt_eps * xf.abs() + self.xatol / three;
            tol2 = two * tol1;

            if evaluations >= self.max_evaluations {
                converged = false;
                break;
            }
        }

        if !converged {
            tracing::warn!(
                evaluations,
                "bounded minimization reached the maximum number of evaluations"
            );
        }
        Ok(Minimum {
            x: xf,
            value: fx,
            evaluations,
            converged,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;

    fn minimizer() -> BoundedMinimizer<f64> {
        BoundedMinimizer::new(1e-5, 500)
    }

    #[test]
    fn parabola() {
        let min = minimizer()
            .minimize(|x| (x - 2.0) * (x - 2.0) + 1.0, 0.0, 5.0)
            .unwrap();
        assert!(min.converged);
        assert!((min.x - 2.0).abs() < 1e-5);
        assert!((min.value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine() {
        let min = minimizer().minimize(f64::cos, 3.0, 4.0).unwrap();
        assert!((min.x - std::f64::consts::PI).abs() < 1e-5);
        assert!(min.evaluations < 50);
    }

    #[test]
    fn minimum_at_boundary() {
        let min = minimizer().minimize(|x| x, 1.0, 2.0).unwrap();
        assert!(min.x >= 1.0);
        assert!(min.x - 1.0 < 1e-4);
    }

    #[test]
    fn degenerate_bracket() {
        let min = minimizer().minimize(|x| x * x, 0.5, 0.5).unwrap();
        assert_eq!(min.x, 0.5);
        assert_eq!(min.evaluations, 1);
    }

    #[test]
    fn empty_bracket() {
        assert_eq!(
            minimizer().minimize(|x| x, 2.0, 1.0),
            Err(Error::InvalidParameter(InvalidParameter::EmptyBracket))
        );
    }

    #[test]
    fn evaluation_limit() {
        let min = BoundedMinimizer::new(1e-12, 3)
            .minimize(|x| (x - 0.3).abs(), 0.0, 1.0)
            .unwrap();
        assert!(!min.converged);
        assert_eq!(min.evaluations, 3);
    }
}
