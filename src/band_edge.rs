//! Band edge optimization and stopband-matched Butterworth order selection.
//!
//! The order formulas of the classical families work on a lowpass prototype
//! whose passband edge is at 1 rad/s. The ratio between the stopband edge and
//! the passband edge of this prototype is called here the natural ratio. For
//! bandstop filters the natural ratio depends on where the passband edges are
//! placed inside their allowed range, so the edges are first moved to the
//! position that minimizes the required order.

use crate::{
    classical::elliptic::{ellipk, ellipkm1},
    error::{InvalidParameter, Result},
    minimize::BoundedMinimizer,
    normalize::{NormalizedSpec, prewarp, unwarp},
    types::{DesignResult, Domain, Edges},
};
use itertools::{Itertools, MinMaxResult};
use num_traits::{Float, FloatConst};

/// Shape of a filter as seen by the order formulas.
///
/// This is a coarser classification than [`FilterKind`](crate::FilterKind):
/// single edges with `wp >= ws` (which includes the allpass case) are treated
/// as highpass, and pairs are told apart by the first edges only.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FilterShape {
    /// Single edges with `wp < ws`.
    Lowpass,
    /// Single edges with `wp >= ws`.
    Highpass,
    /// Pairs with `wp0 < ws0`.
    Bandstop,
    /// Pairs with `wp0 >= ws0`.
    Bandpass,
}

impl FilterShape {
    /// Determines the shape of a pair of passband and stopband edges.
    pub fn of<T: Float>(passband: &Edges<T>, stopband: &Edges<T>) -> FilterShape {
        let below = passband.first() < stopband.first();
        match (passband.is_pair(), below) {
            (false, true) => FilterShape::Lowpass,
            (false, false) => FilterShape::Highpass,
            (true, true) => FilterShape::Bandstop,
            (true, false) => FilterShape::Bandpass,
        }
    }
}

/// Order formula that is minimized when optimizing bandstop edges.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum OrderObjective {
    /// Butterworth order formula.
    Butterworth,
    /// Chebyshev order formula (shared by types I and II).
    Chebyshev,
    /// Elliptic order formula.
    Elliptic,
}

impl OrderObjective {
    /// Returns the non-integer order that a filter with natural ratio `nat`
    /// needs to meet the attenuations `gpass` and `gstop` (in dB).
    pub fn order<T: Float + FloatConst>(self, nat: T, gpass: T, gstop: T) -> T {
        let excess = AttenuationExcess::new(gpass, gstop);
        match self {
            OrderObjective::Butterworth => {
                (excess.stop / excess.pass).log10() / (T::from(2.0).unwrap() * nat.log10())
            }
            OrderObjective::Chebyshev => (excess.stop / excess.pass).sqrt().acosh() / nat.acosh(),
            OrderObjective::Elliptic => {
                let m0 = (nat * nat).recip();
                let m1 = excess.pass / excess.stop;
                ellipk(m0) * ellipkm1(m1) / (ellipkm1(m0) * ellipk(m1))
            }
        }
    }
}

// GPASS - 1 and GSTOP - 1, with G = 10^(0.1 |g|).
#[derive(Debug, Copy, Clone)]
pub(crate) struct AttenuationExcess<T> {
    pub pass: T,
    pub stop: T,
}

impl<T: Float> AttenuationExcess<T> {
    pub fn new(gpass: T, gstop: T) -> AttenuationExcess<T> {
        let excess = |g: T| T::from(10.0).unwrap().powf(T::from(0.1).unwrap() * g.abs()) - T::one();
        AttenuationExcess {
            pass: excess(gpass),
            stop: excess(gstop),
        }
    }
}

/// Natural ratio of a specification, together with the passband edges it was
/// computed with.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NaturalRatio<T> {
    /// Ratio between the stopband and passband edges of the lowpass
    /// prototype.
    pub nat: T,
    /// Passband edges. These differ from the input edges only for bandstop
    /// filters, whose edges are optimized.
    pub passband: Edges<T>,
}

// Natural ratio of a bandstop filter for given passband edges, minimized over
// both stopband edges.
fn bandstop_nat<T: Float>(p0: T, p1: T, stopband: &Edges<T>) -> T {
    stopband
        .to_vec()
        .into_iter()
        .map(|s| (s * (p0 - p1) / (s * s - p0 * p1)).abs())
        .fold(T::infinity(), T::min)
}

/// Band edge optimizer.
///
/// This implements the computation of the natural ratio for all the filter
/// shapes, including the optimization of bandstop passband edges, and the
/// Butterworth order selection that meets the stopband attenuation exactly.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BandEdgeOptimizer<T> {
    minimizer: BoundedMinimizer<T>,
    bracket_epsilon: T,
}

impl<T: Float + FloatConst> BandEdgeOptimizer<T> {
    /// Creates a band edge optimizer.
    ///
    /// The arguments are the absolute tolerance and maximum number of
    /// objective evaluations of the bounded minimization, and the gap left
    /// between each search bracket and the stopband edge.
    pub fn new(xatol: T, max_evaluations: usize, bracket_epsilon: T) -> BandEdgeOptimizer<T> {
        BandEdgeOptimizer {
            minimizer: BoundedMinimizer::new(xatol, max_evaluations),
            bracket_epsilon,
        }
    }

    /// Computes the natural ratio of pre-warped edges.
    ///
    /// For bandstop shapes, the first passband edge is searched in
    /// `[wp0, ws0 - eps]` and then the second in `[ws1 + eps, wp1]`, each
    /// minimizing `objective`. The natural ratio is the smallest over the
    /// stopband edges.
    pub fn natural_ratio(
        &self,
        passband: Edges<T>,
        stopband: Edges<T>,
        gpass: T,
        gstop: T,
        objective: OrderObjective,
    ) -> Result<NaturalRatio<T>> {
        let shape = FilterShape::of(&passband, &stopband);
        let (nat, passband) = match (shape, passband, stopband) {
            (FilterShape::Lowpass, Edges::Single(p), Edges::Single(s)) => (s / p, passband),
            (FilterShape::Highpass, Edges::Single(p), Edges::Single(s)) => (p / s, passband),
            (FilterShape::Bandstop, Edges::Pair(p0, p1), Edges::Pair(s0, s1)) => {
                let eps = self.bracket_epsilon;
                let order =
                    |p0: T, p1: T| objective.order(bandstop_nat(p0, p1, &stopband), gpass, gstop);
                let p0 = self.minimizer.minimize(|x| order(x, p1), p0, s0 - eps)?.x;
                let p1 = self.minimizer.minimize(|x| order(p0, x), s1 + eps, p1)?.x;
                tracing::debug!(
                    p0 = ?p0.to_f64(),
                    p1 = ?p1.to_f64(),
                    "optimized bandstop passband edges"
                );
                (bandstop_nat(p0, p1, &stopband), Edges::Pair(p0, p1))
            }
            (FilterShape::Bandpass, Edges::Pair(p0, p1), _) => {
                let nat = stopband
                    .to_vec()
                    .into_iter()
                    .map(|s| ((s * s - p0 * p1) / (s * (p0 - p1))).abs())
                    .fold(T::infinity(), T::min);
                (nat, passband)
            }
            _ => return Err(InvalidParameter::ShapeMismatch.into()),
        };
        Ok(NaturalRatio { nat, passband })
    }

    /// Butterworth order selection with exact attenuation at the stopband
    /// edge.
    ///
    /// The order is the smallest that meets the specification, as in the
    /// usual passband-matched selection, but the critical frequency is
    /// placed so that the response is exactly `-gstop` dB at the stopband
    /// edge. This leaves all the excess attenuation margin in the passband.
    ///
    /// If the specification is degenerate (the natural ratio is one, for
    /// instance for an allpass), the result has order zero and the critical
    /// frequency is computed with a prototype cutoff of one.
    pub fn stopband_matched(&self, spec: &NormalizedSpec<T>) -> Result<DesignResult<T>> {
        let (gpass, gstop) = check_attenuations(spec)?;
        let (passband, stopband) = working_edges(spec);
        let shape = FilterShape::of(&passband, &stopband);
        let ratio = self.natural_ratio(
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
                ratio.nat / excess.stop.powf((order + order).recip())
            }
            None => T::one(),
        };
        let wn = prototype_to_edges(w0, shape, &ratio.passband);
        Ok(finish(order.unwrap_or(0), wn, spec.domain()))
    }
}

/// Checks that `0 < gpass < gstop` and returns both attenuations.
pub(crate) fn check_attenuations<T: Float>(spec: &NormalizedSpec<T>) -> Result<(T, T)> {
    let gpass = spec.passband_attenuation();
    let gstop = spec.stopband_attenuation();
    if gpass > T::zero() && gpass < gstop {
        Ok((gpass, gstop))
    } else {
        Err(InvalidParameter::AttenuationOrder.into())
    }
}

// Pre-warps the edges of digital specifications.
pub(crate) fn working_edges<T: Float + FloatConst>(
    spec: &NormalizedSpec<T>,
) -> (Edges<T>, Edges<T>) {
    match spec.domain() {
        Domain::Analog => (spec.passband(), spec.stopband()),
        Domain::Digital => (spec.passband().map(prewarp), spec.stopband().map(prewarp)),
    }
}

// Undoes the pre-warping of digital critical frequencies.
pub(crate) fn finish<T: Float + FloatConst>(
    order: usize,
    wn: Edges<T>,
    domain: Domain,
) -> DesignResult<T> {
    let wn = match domain {
        Domain::Analog => wn,
        Domain::Digital => wn.map(unwarp),
    };
    tracing::debug!(order, wn = ?wn.map(|w| w.to_f64()), "selected order");
    DesignResult { order, wn }
}

/// Rounds up a non-integer order.
///
/// A quotient that is not a finite positive number gives `None` and emits a
/// warning. This is the degenerate case, in which the passband and stopband
/// edges of the prototype coincide. A finite quotient too large for `usize`
/// saturates to `usize::MAX`, also with a warning.
pub(crate) fn order_from_quotient<T: Float>(quotient: T) -> Option<usize> {
    if !(quotient.is_finite() && quotient > T::zero()) {
        tracing::warn!("order is zero: the passband and stopband edges are too close together");
        return None;
    }
    let order = quotient.ceil().to_usize().unwrap_or_else(|| {
        tracing::warn!(
            quotient = ?quotient.to_f64(),
            "order does not fit in usize: saturating"
        );
        usize::MAX
    });
    Some(order)
}

/// Maps the critical frequency `w0` of the lowpass prototype to the
/// pre-warped critical frequency of a filter with the given shape and
/// passband edges.
pub(crate) fn prototype_to_edges<T: Float>(
    w0: T,
    shape: FilterShape,
    passband: &Edges<T>,
) -> Edges<T> {
    let two = T::from(2.0).unwrap();
    match (shape, *passband) {
        (FilterShape::Lowpass, Edges::Single(p)) => Edges::Single(w0 * p),
        (FilterShape::Highpass, Edges::Single(p)) => Edges::Single(p / w0),
        (FilterShape::Bandstop, Edges::Pair(p0, p1)) => {
            let bw = p1 - p0;
            let d = (bw * bw + T::from(4.0).unwrap() * w0 * w0 * p0 * p1).sqrt();
            sorted_abs((bw + d) / (two * w0), (bw - d) / (two * w0))
        }
        (FilterShape::Bandpass, Edges::Pair(p0, p1)) => {
            let bw = p1 - p0;
            let edge = |w: T| -w * bw / two + (w * w / T::from(4.0).unwrap() * bw * bw + p0 * p1).sqrt();
            sorted_abs(edge(-w0), edge(w0))
        }
        _ => unreachable!("filter shape does not match the passband edges"),
    }
}

fn sorted_abs<T: Float>(a: T, b: T) -> Edges<T> {
    let MinMaxResult::MinMax(lo, hi) = [a.abs(), b.abs()].into_iter().minmax() else {
        unreachable!("minmax of two elements")
    };
    Edges::Pair(lo, hi)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{error::Error, types::FilterKind};
    use std::f64::consts::TAU;

    fn optimizer() -> BandEdgeOptimizer<f64> {
        BandEdgeOptimizer::new(1e-5, 500, 1e-12)
    }

    fn analog(pb: impl Into<Edges<f64>>, sb: impl Into<Edges<f64>>) -> NormalizedSpec<f64> {
        let pb = pb.into().map(|f| f * TAU);
        let sb = sb.into().map(|f| f * TAU);
        NormalizedSpec::from_normalized(Domain::Analog, pb, sb, 1.0, 80.0).unwrap()
    }

    fn assert_edges(wn: Edges<f64>, expected: Edges<f64>, tol: f64) {
        assert!(wn.same_shape(&expected));
        for (a, b) in wn.to_vec().into_iter().zip(expected.to_vec()) {
            assert!((a - b).abs() <= tol * b, "{wn:?} != {expected:?}");
        }
    }

    #[test]
    fn shapes() {
        let s = |p: f64, q: f64| FilterShape::of(&Edges::Single(p), &Edges::Single(q));
        assert_eq!(s(1.0, 2.0), FilterShape::Lowpass);
        assert_eq!(s(2.0, 1.0), FilterShape::Highpass);
        assert_eq!(s(1.0, 1.0), FilterShape::Highpass);
        assert_eq!(
            FilterShape::of(&Edges::Pair(1.0, 7.0), &Edges::Pair(2.0, 6.0)),
            FilterShape::Bandstop
        );
        assert_eq!(
            FilterShape::of(&Edges::Pair(1.0, 2.0), &Edges::Pair(0.1, 5.0)),
            FilterShape::Bandpass
        );
    }

    #[test]
    fn natural_ratios() {
        let opt = optimizer();
        let nat = |p, s| {
            opt.natural_ratio(p, s, 1.0, 80.0, OrderObjective::Butterworth)
                .unwrap()
                .nat
        };
        assert!((nat(Edges::Single(10.0), Edges::Single(100.0)) - 10.0).abs() < 1e-12);
        assert!((nat(Edges::Single(100.0), Edges::Single(10.0)) - 10.0).abs() < 1e-12);
        // min(|(0.01 - 2) / (0.1 * -1)|, |(25 - 2) / (5 * -1)|) = 4.6
        assert!((nat(Edges::Pair(1.0, 2.0), Edges::Pair(0.1, 5.0)) - 4.6).abs() < 1e-12);
        assert_eq!(
            opt.natural_ratio(
                Edges::Single(1.0),
                Edges::Pair(0.5, 2.0),
                1.0,
                80.0,
                OrderObjective::Chebyshev
            ),
            Err(InvalidParameter::ShapeMismatch.into())
        );
    }

    #[test]
    fn bandstop_edges_move_towards_stopband() {
        let ratio = optimizer()
            .natural_ratio(
                Edges::Pair(1.0, 7.0),
                Edges::Pair(2.0, 6.0),
                1.0,
                80.0,
                OrderObjective::Butterworth,
            )
            .unwrap();
        let Edges::Pair(p0, p1) = ratio.passband else {
            panic!("bandstop passband is not a pair");
        };
        assert!((1.0..2.0).contains(&p0));
        assert!(p1 > 6.0 && p1 <= 7.0);
        assert!(ratio.nat > 1.0);
    }

    #[test]
    fn stopband_matched_analog() {
        let opt = optimizer();
        let cases = [
            (analog(10.0, 100.0), 5, Edges::Single(99.58177630278793)),
            (analog(100.0, 10.0), 5, Edges::Single(396.44219123305777)),
            (
                analog([1.0, 2.0], [0.1, 5.0]),
                7,
                Edges::Pair(5.81782828643783, 13.571530702061843),
            ),
            (
                analog([1.0, 7.0], [2.0, 6.0]),
                36,
                Edges::Pair(10.920538677969954, 43.38072609552577),
            ),
        ];
        for (spec, order, wn) in cases {
            let design = opt.stopband_matched(&spec).unwrap();
            assert_eq!(design.order, order);
            assert_edges(design.wn, wn, 1e-6);
        }
    }

    #[test]
    fn stopband_matched_digital() {
        let spec =
            NormalizedSpec::from_normalized(Domain::Digital, 0.04, 0.4, 1.0, 80.0).unwrap();
        let design = optimizer().stopband_matched(&spec).unwrap();
        assert_eq!(design.order, 5);
        assert_edges(design.wn, Edges::Single(0.07298483277625024), 1e-9);

        let spec = NormalizedSpec::from_normalized(
            Domain::Digital,
            [0.04, 0.28],
            [0.08, 0.24],
            1.0,
            5.0,
        )
        .unwrap();
        let design = optimizer().stopband_matched(&spec).unwrap();
        assert_eq!(design.order, 4);
        assert_edges(
            design.wn,
            Edges::Pair(0.076018239965718, 0.25143968885666007),
            1e-6,
        );
    }

    #[test]
    fn degenerate_allpass() {
        let spec = analog(50.0, 50.0);
        assert_eq!(spec.kind(), FilterKind::Allpass);
        let design = optimizer().stopband_matched(&spec).unwrap();
        assert_eq!(design.order, 0);
        assert!(!design.is_usable());
        assert_edges(design.wn, Edges::Single(50.0 * TAU), 1e-12);
    }

    #[test]
    fn attenuations_must_be_ordered() {
        let spec =
            NormalizedSpec::from_normalized(Domain::Analog, 1.0, 2.0, 80.0, 1.0).unwrap();
        assert_eq!(
            optimizer().stopband_matched(&spec),
            Err(Error::InvalidParameter(InvalidParameter::AttenuationOrder))
        );
        let spec = NormalizedSpec::from_normalized(Domain::Analog, 1.0, 2.0, 0.0, 1.0).unwrap();
        assert!(optimizer().stopband_matched(&spec).is_err());
    }

    #[test]
    fn gstop_monotonicity() {
        let opt = optimizer();
        let mut last = 0;
        for gstop in [10.0, 20.0, 40.0, 60.0, 80.0, 100.0] {
            let spec =
                NormalizedSpec::from_normalized(Domain::Analog, 1.0, 3.0, 1.0, gstop).unwrap();
            let order = opt.stopband_matched(&spec).unwrap().order;
            assert!(order >= last);
            last = order;
        }
    }

    #[test]
    fn order_rounding() {
        assert_eq!(order_from_quotient(4.04), Some(5));
        assert_eq!(order_from_quotient(5.0), Some(5));
        assert_eq!(order_from_quotient(f64::INFINITY), None);
        assert_eq!(order_from_quotient(f64::NAN), None);
        assert_eq!(order_from_quotient(-1.0), None);
        assert_eq!(order_from_quotient(1e30), Some(usize::MAX));
    }
}
