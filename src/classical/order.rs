//! Order selection functions of the classical families.
//!
//! These functions compute the minimum order of a filter that meets a
//! specification, and the critical frequency that makes the response exact at
//! the passband edge. Digital specifications are pre-warped before applying
//! the analog formulas, and the resulting critical frequencies are mapped back
//! to fractions of the Nyquist frequency.
//!
//! If the passband and stopband edges of the prototype coincide, the order
//! formulas break down. In this case the functions return an order of zero
//! instead of an error, and emit a warning.

use crate::{
    band_edge::{
        AttenuationExcess, BandEdgeOptimizer, FilterShape, OrderObjective, check_attenuations,
        finish, order_from_quotient, prototype_to_edges, working_edges,
    },
    error::Result,
    normalize::NormalizedSpec,
    types::{DesignResult, Edges},
};
use num_traits::{Float, FloatConst};

/// Butterworth order selection with exact attenuation at the passband edge.
pub fn buttord<T: Float + FloatConst>(
    optimizer: &BandEdgeOptimizer<T>,
    spec: &NormalizedSpec<T>,
) -> Result<DesignResult<T>> {
    let (gpass, gstop) = check_attenuations(spec)?;
    let (passband, stopband) = working_edges(spec);
    let shape = FilterShape::of(&passband, &stopband);
    let ratio = optimizer.natural_ratio(
        passband,
        stopband,
        gpass,
        gstop,
        OrderObjective::Butterworth,
    )?;
    let order = order_from_quotient(OrderObjective::Butterworth.order(ratio.nat, gpass, gstop));
    let w0 = match order {
        Some(order) => {
            let excess = AttenuationExcess::new(gpass, gstop);
            let order = T::from(order).unwrap();
            excess.pass.powf(-(order + order).recip())
        }
        None => T::one(),
    };
    let wn = prototype_to_edges(w0, shape, &ratio.passband);
    Ok(finish(order.unwrap_or(0), wn, spec.domain()))
}

/// Chebyshev type I order selection.
///
/// The critical frequency is the passband edge, after the optimization of
/// the edges for bandstop filters.
pub fn cheb1ord<T: Float + FloatConst>(
    optimizer: &BandEdgeOptimizer<T>,
    spec: &NormalizedSpec<T>,
) -> Result<DesignResult<T>> {
    let (gpass, gstop) = check_attenuations(spec)?;
    let (passband, stopband) = working_edges(spec);
    let ratio =
        optimizer.natural_ratio(passband, stopband, gpass, gstop, OrderObjective::Chebyshev)?;
    let order = order_from_quotient(OrderObjective::Chebyshev.order(ratio.nat, gpass, gstop));
    Ok(finish(order.unwrap_or(0), ratio.passband, spec.domain()))
}

/// Chebyshev type II order selection.
///
/// The critical frequency is the edge of the equiripple stopband, placed so
/// that the attenuation at the passband edge is exactly the passband
/// attenuation.
pub fn cheb2ord<T: Float + FloatConst>(
    optimizer: &BandEdgeOptimizer<T>,
    spec: &NormalizedSpec<T>,
) -> Result<DesignResult<T>> {
    let (gpass, gstop) = check_attenuations(spec)?;
    let (passband, stopband) = working_edges(spec);
    let shape = FilterShape::of(&passband, &stopband);
    let ratio =
        optimizer.natural_ratio(passband, stopband, gpass, gstop, OrderObjective::Chebyshev)?;
    let order = order_from_quotient(OrderObjective::Chebyshev.order(ratio.nat, gpass, gstop));
    let new_freq = match order {
        Some(order) => {
            let excess = AttenuationExcess::new(gpass, gstop);
            let v = (excess.stop / excess.pass).sqrt().acosh();
            (v / T::from(order).unwrap()).cosh().recip()
        }
        None => T::one(),
    };
    let two = T::from(2.0).unwrap();
    let wn = match (shape, ratio.passband) {
        (FilterShape::Lowpass, Edges::Single(p)) => Edges::Single(p / new_freq),
        (FilterShape::Highpass, Edges::Single(p)) => Edges::Single(p * new_freq),
        (FilterShape::Bandstop, Edges::Pair(p0, p1)) => {
            let n0 = new_freq / two * (p0 - p1)
                + (new_freq * new_freq * (p1 - p0) * (p1 - p0) / T::from(4.0).unwrap() + p1 * p0)
                    .sqrt();
            Edges::Pair(n0, p1 * p0 / n0)
        }
        (FilterShape::Bandpass, Edges::Pair(p0, p1)) => {
            let n0 = (p0 - p1) / (two * new_freq)
                + ((p1 - p0) * (p1 - p0) / (T::from(4.0).unwrap() * new_freq * new_freq)
                    + p1 * p0)
                    .sqrt();
            Edges::Pair(n0, p0 * p1 / n0)
        }
        _ => unreachable!("filter shape does not match the passband edges"),
    };
    Ok(finish(order.unwrap_or(0), wn, spec.domain()))
}

/// Elliptic order selection.
///
/// The critical frequency is the passband edge, after the optimization of
/// the edges for bandstop filters.
pub fn ellipord<T: Float + FloatConst>(
    optimizer: &BandEdgeOptimizer<T>,
    spec: &NormalizedSpec<T>,
) -> Result<DesignResult<T>> {
    let (gpass, gstop) = check_attenuations(spec)?;
    let (passband, stopband) = working_edges(spec);
    let ratio =
        optimizer.natural_ratio(passband, stopband, gpass, gstop, OrderObjective::Elliptic)?;
    let order = order_from_quotient(OrderObjective::Elliptic.order(ratio.nat, gpass, gstop));
    Ok(finish(order.unwrap_or(0), ratio.passband, spec.domain()))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::Domain;
    use std::f64::consts::TAU;

    type OrderFn = fn(&BandEdgeOptimizer<f64>, &NormalizedSpec<f64>) -> Result<DesignResult<f64>>;

    fn optimizer() -> BandEdgeOptimizer<f64> {
        BandEdgeOptimizer::new(1e-5, 500, 1e-12)
    }

    fn digital(pb: impl Into<Edges<f64>>, sb: impl Into<Edges<f64>>, gstop: f64) -> NormalizedSpec<f64> {
        NormalizedSpec::from_normalized(Domain::Digital, pb, sb, 1.0, gstop).unwrap()
    }

    fn check(f: OrderFn, spec: NormalizedSpec<f64>, order: usize, wn: Edges<f64>, tol: f64) {
        let design = f(&optimizer(), &spec).unwrap();
        assert_eq!(design.order, order);
        assert!(design.wn.same_shape(&wn));
        for (a, b) in design.wn.to_vec().into_iter().zip(wn.to_vec()) {
            assert!((a - b).abs() <= tol * b, "{:?} != {wn:?}", design.wn);
        }
    }

    #[test]
    fn butterworth_passband() {
        let analog = |pb: Edges<f64>, sb: Edges<f64>| {
            NormalizedSpec::from_normalized(
                Domain::Analog,
                pb.map(|f| f * TAU),
                sb.map(|f| f * TAU),
                1.0,
                80.0,
            )
            .unwrap()
        };
        check(
            buttord,
            analog(10.0.into(), 100.0.into()),
            5,
            Edges::Single(71.92210683023319),
            1e-12,
        );
        check(
            buttord,
            analog(100.0.into(), 10.0.into()),
            5,
            Edges::Single(548.9051884637266),
            1e-12,
        );
        check(
            buttord,
            analog([1.0, 2.0].into(), [0.1, 5.0].into()),
            7,
            Edges::Pair(6.075691690783447, 12.99553025847063),
            1e-12,
        );
        check(
            buttord,
            analog([1.0, 7.0].into(), [2.0, 6.0].into()),
            36,
            Edges::Pair(10.893748794934174, 43.487407881565005),
            1e-6,
        );
        check(
            buttord,
            digital(0.04, 0.4, 80.0),
            5,
            Edges::Single(0.04576836816285087),
            1e-9,
        );
        check(
            buttord,
            digital(0.4, 0.04, 80.0),
            5,
            Edges::Single(0.36004326343144744),
            1e-9,
        );
        check(
            buttord,
            digital([0.04, 0.08], [0.004, 0.2], 80.0),
            7,
            Edges::Pair(0.038675590426020465, 0.08271632361810313),
            1e-9,
        );
    }

    #[test]
    fn chebyshev1() {
        check(cheb1ord, digital(0.04, 0.4, 80.0), 4, Edges::Single(0.04), 1e-12);
        check(
            cheb1ord,
            digital([0.04, 0.08], [0.004, 0.2], 80.0),
            5,
            Edges::Pair(0.04, 0.08),
            1e-12,
        );
        check(
            cheb1ord,
            digital([0.04, 0.28], [0.08, 0.24], 80.0),
            13,
            Edges::Pair(0.06741309631965733, 0.27999758001018027),
            1e-6,
        );
    }

    #[test]
    fn chebyshev2() {
        check(
            cheb2ord,
            digital(0.04, 0.4, 80.0),
            4,
            Edges::Single(0.2666310073964557),
            1e-9,
        );
        check(
            cheb2ord,
            digital(0.4, 0.04, 80.0),
            4,
            Edges::Single(0.06514123425602089),
            1e-9,
        );
        check(
            cheb2ord,
            digital([0.04, 0.08], [0.004, 0.2], 80.0),
            5,
            Edges::Pair(0.017210851459767147, 0.18198981972522055),
            1e-9,
        );
        check(
            cheb2ord,
            digital([0.04, 0.28], [0.08, 0.24], 5.0),
            3,
            Edges::Pair(0.07401412826840091, 0.2575953489561726),
            1e-6,
        );
    }

    #[test]
    fn elliptic() {
        check(ellipord, digital(0.04, 0.4, 80.0), 3, Edges::Single(0.04), 1e-12);
        check(
            ellipord,
            digital([0.04, 0.08], [0.004, 0.2], 80.0),
            4,
            Edges::Pair(0.04, 0.08),
            1e-12,
        );
        check(
            ellipord,
            digital([0.04, 0.28], [0.08, 0.24], 5.0),
            2,
            Edges::Pair(0.06741310017661478, 0.27999758001018027),
            1e-6,
        );
    }

    #[test]
    fn degenerate() {
        for f in [buttord, cheb1ord, cheb2ord, ellipord] as [OrderFn; 4] {
            let design = f(&optimizer(), &digital(0.3, 0.3, 40.0)).unwrap();
            assert_eq!(design.order, 0);
            assert!((design.wn.first() - 0.3).abs() < 1e-12);
        }
    }
}
