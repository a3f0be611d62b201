use crate::{
    band_edge::BandEdgeOptimizer,
    error::Result,
    normalize::NormalizedSpec,
    types::{DesignResult, FilterFamily, Target},
};
use num_traits::{Float, FloatConst};

/// Order selector.
///
/// The order selector computes the order and critical frequency of a filter
/// of a given family that meets a [`NormalizedSpec`]. It holds the settings of
/// the bounded minimization used to optimize the passband edges of bandstop
/// filters. These are given reasonable defaults by [`OrderSelector::new`] and
/// can be changed with the methods of the [`SelectorBuilder`] trait.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrderSelector<T> {
    xatol: T,
    max_iterations: usize,
    bracket_epsilon: T,
}

/// Order selector builder.
///
/// This trait is implemented by [`OrderSelector`] and allows its default
/// settings to be modified.
pub trait SelectorBuilder<T> {
    /// Sets the absolute tolerance of the band edge minimization.
    fn set_xatol(&mut self, xatol: T) -> &mut Self;

    /// Sets the maximum number of objective evaluations of the band edge
    /// minimization.
    fn set_max_iterations(&mut self, max_iterations: usize) -> &mut Self;

    /// Sets the gap between the band edge search brackets and the stopband
    /// edges.
    fn set_bracket_epsilon(&mut self, bracket_epsilon: T) -> &mut Self;
}

impl<T: Float + FloatConst + 'static> OrderSelector<T> {
    /// Creates an order selector with default settings.
    ///
    /// The absolute tolerance is `1e-5`, the maximum number of evaluations is
    /// 500, and the bracket gap is `1e-12`.
    pub fn new() -> OrderSelector<T> {
        OrderSelector {
            xatol: T::from(1e-5).unwrap(),
            max_iterations: 500,
            bracket_epsilon: T::from(1e-12).unwrap(),
        }
    }

    /// Returns the absolute tolerance of the band edge minimization.
    pub fn xatol(&self) -> T {
        self.xatol
    }

    /// Returns the maximum number of objective evaluations of the band edge
    /// minimization.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Returns the gap between the band edge search brackets and the stopband
    /// edges.
    pub fn bracket_epsilon(&self) -> T {
        self.bracket_epsilon
    }

    /// Returns a band edge optimizer with the settings of this selector.
    pub fn band_edge_optimizer(&self) -> BandEdgeOptimizer<T> {
        BandEdgeOptimizer::new(self.xatol, self.max_iterations, self.bracket_epsilon)
    }

    /// Selects the order and critical frequency of a filter.
    ///
    /// With [`Target::Passband`], the response is exact at the passband edge,
    /// which is the usual convention of the classical order formulas. With
    /// [`Target::Stopband`], the response is exact at the stopband edge. Only
    /// the Butterworth family supports the stopband target; other families
    /// return [`Error::UnsupportedFamily`](crate::error::Error::UnsupportedFamily).
    ///
    /// The Chebyshev I and elliptic families require the specification to
    /// have a ripple. The attenuations must satisfy `0 < gpass < gstop`.
    ///
    /// A degenerate specification, such as an allpass, is not an error. It
    /// produces a result with order zero (see [`DesignResult::is_usable`]).
    pub fn select_order(
        &self,
        spec: &NormalizedSpec<T>,
        family: FilterFamily,
        target: Target,
    ) -> Result<DesignResult<T>> {
        let optimizer = self.band_edge_optimizer();
        family
            .strategy()
            .compute_order(&optimizer, spec, target)
    }
}

impl<T: Float + FloatConst + 'static> Default for OrderSelector<T> {
    fn default() -> OrderSelector<T> {
        OrderSelector::new()
    }
}

impl<T> SelectorBuilder<T> for OrderSelector<T> {
    fn set_xatol(&mut self, xatol: T) -> &mut Self {
        self.xatol = xatol;
        self
    }

    fn set_max_iterations(&mut self, max_iterations: usize) -> &mut Self {
        self.max_iterations = max_iterations;
        self
    }

    fn set_bracket_epsilon(&mut self, bracket_epsilon: T) -> &mut Self {
        self.bracket_epsilon = bracket_epsilon;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        error::{Error, InvalidParameter},
        types::{Domain, Edges},
    };

    fn lowpass() -> NormalizedSpec<f64> {
        NormalizedSpec::from_normalized(Domain::Digital, 0.04, 0.4, 1.0, 80.0).unwrap()
    }

    #[test]
    fn defaults() {
        let selector = OrderSelector::<f64>::new();
        assert_eq!(selector.xatol(), 1e-5);
        assert_eq!(selector.max_iterations(), 500);
        assert_eq!(selector.bracket_epsilon(), 1e-12);
        let mut selector = OrderSelector::<f64>::default();
        selector.set_xatol(1e-8).set_max_iterations(1000);
        assert_eq!(selector.xatol(), 1e-8);
        assert_eq!(selector.max_iterations(), 1000);
    }

    #[test]
    fn butterworth_targets() {
        let selector = OrderSelector::new();
        let passband = selector
            .select_order(&lowpass(), FilterFamily::Butterworth, Target::Passband)
            .unwrap();
        let stopband = selector
            .select_order(&lowpass(), FilterFamily::Butterworth, Target::Stopband)
            .unwrap();
        assert_eq!(passband.order, 5);
        assert_eq!(stopband.order, 5);
        assert!((passband.wn.first() - 0.04576836816285087).abs() < 1e-12);
        assert!((stopband.wn.first() - 0.07298483277625024).abs() < 1e-12);
    }

    #[test]
    fn families() {
        let selector = OrderSelector::new();
        let spec = lowpass().with_ripple(1.0).unwrap();
        let order = |family| {
            selector
                .select_order(&spec, family, Target::Passband)
                .unwrap()
                .order
        };
        assert_eq!(order(FilterFamily::ChebyshevI), 4);
        assert_eq!(order(FilterFamily::ChebyshevII), 4);
        assert_eq!(order(FilterFamily::Elliptic), 3);
        assert_eq!(order(FilterFamily::Bessel), 5);
    }

    #[test]
    fn unsupported_and_missing() {
        let selector = OrderSelector::new();
        assert_eq!(
            selector.select_order(&lowpass(), FilterFamily::ChebyshevII, Target::Stopband),
            Err(Error::UnsupportedFamily {
                family: FilterFamily::ChebyshevII,
                target: Target::Stopband
            })
        );
        assert_eq!(
            selector.select_order(&lowpass(), FilterFamily::Elliptic, Target::Passband),
            Err(InvalidParameter::MissingExtra {
                family: FilterFamily::Elliptic,
                extra: "ripple"
            }
            .into())
        );
    }

    #[test]
    fn allpass_is_degenerate() {
        let spec = NormalizedSpec::from_normalized(Domain::Analog, 3.0, 3.0, 1.0, 40.0).unwrap();
        let design = OrderSelector::new()
            .select_order(&spec, FilterFamily::Butterworth, Target::Stopband)
            .unwrap();
        assert_eq!(design.order, 0);
        assert_eq!(design.wn, Edges::Single(3.0));
    }
}
