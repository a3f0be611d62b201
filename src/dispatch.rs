//! Prototype synthesis.
//!
//! The [`PrototypeDispatcher`] obtains the analog lowpass prototype of a
//! family, moves it to the requested critical frequency and filter kind, and
//! for digital designs applies the bilinear transform.

#[cfg(any(
    feature = "faer-backend",
    feature = "lapack-backend",
    feature = "nalgebra-backend"
))]
use crate::eigenvalues::DefaultEigenvalueBackend;
use crate::{
    classical::{bilinear, lp2bp, lp2bs, lp2hp, lp2lp},
    eigenvalues::EigenvalueBackend,
    error::{Error, InvalidParameter, Result},
    normalize::prewarp,
    polynomial::{CompanionRootFinder, DEFAULT_POLISH_ITERATIONS},
    types::{DesignResult, Domain, Edges, FilterFamily, FilterKind, Zpk},
};
use num_traits::{Float, FloatConst};
use std::{collections::BTreeMap, fmt};

/// Family-specific extra parameter.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Extra {
    /// Passband ripple, in dB.
    Ripple,
    /// Minimum stopband attenuation, in dB.
    StopbandAttenuation,
}

impl Extra {
    /// Returns the name of the parameter.
    pub fn name(self) -> &'static str {
        match self {
            Extra::Ripple => "ripple",
            Extra::StopbandAttenuation => "stopband_attenuation",
        }
    }
}

impl fmt::Display for Extra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extra parameters of a prototype.
///
/// This is a map from [`Extra`] to strictly positive values. Which keys are
/// needed depends on the family, as given by
/// [`FamilyStrategy::required_extras`](crate::FamilyStrategy::required_extras).
#[derive(Debug, Clone, PartialEq)]
pub struct Extras<T>(BTreeMap<Extra, T>);

impl<T: Float> Extras<T> {
    /// Creates an empty set of extra parameters.
    pub fn new() -> Extras<T> {
        Extras(BTreeMap::new())
    }

    /// Sets the value of an extra parameter.
    ///
    /// The value must be finite and strictly positive.
    pub fn set(&mut self, extra: Extra, value: T) -> Result<&mut Self> {
        if !value.is_finite() {
            return Err(InvalidParameter::NonFinite(extra.name()).into());
        }
        if value <= T::zero() {
            return Err(InvalidParameter::NonPositiveExtra(extra.name()).into());
        }
        self.0.insert(extra, value);
        Ok(self)
    }

    /// Returns the value of an extra parameter, if it is set.
    pub fn get(&self, extra: Extra) -> Option<T> {
        self.0.get(&extra).copied()
    }

    /// Returns the value of an extra parameter required by `family`.
    pub fn require(&self, family: FilterFamily, extra: Extra) -> Result<T> {
        self.get(extra).ok_or_else(|| {
            InvalidParameter::MissingExtra {
                family,
                extra: extra.name(),
            }
            .into()
        })
    }

    /// Fills an extra parameter that is not set with a default value.
    ///
    /// Values that are already set are kept.
    pub fn set_default(&mut self, extra: Extra, value: Option<T>) -> Result<&mut Self> {
        match (self.get(extra), value) {
            (None, Some(value)) => self.set(extra, value),
            _ => Ok(self),
        }
    }

    /// Returns an iterator over the parameters that are set.
    pub fn iter(&self) -> impl Iterator<Item = (Extra, T)> + '_ {
        self.0.iter().map(|(&k, &v)| (k, v))
    }
}

impl<T: Float> Default for Extras<T> {
    fn default() -> Extras<T> {
        Extras::new()
    }
}

/// Prototype dispatcher.
///
/// The dispatcher synthesizes the zero-pole-gain representation of a filter
/// from its family, kind, order and critical frequency. Digital filters are
/// designed by pre-warping the critical frequency, designing an analog filter
/// with a sample rate of 2, and applying the bilinear transform.
///
/// The roots of the prototypes that have no closed form are computed with an
/// eigenvalue backend of type `B` and refined with Newton iterations. The
/// number of iterations can be changed with the [`DispatcherBuilder`] trait.
#[derive(Debug, Clone, PartialEq)]
pub struct PrototypeDispatcher<B> {
    backend: B,
    polish_iterations: usize,
}

/// Prototype dispatcher builder.
///
/// This trait is implemented by [`PrototypeDispatcher`] and allows its default
/// settings to be modified.
pub trait DispatcherBuilder {
    /// Sets the maximum number of Newton iterations used to refine
    /// polynomial roots.
    fn set_polish_iterations(&mut self, polish_iterations: usize) -> &mut Self;
}

#[cfg(any(
    feature = "faer-backend",
    feature = "lapack-backend",
    feature = "nalgebra-backend"
))]
impl PrototypeDispatcher<DefaultEigenvalueBackend> {
    /// Creates a dispatcher that uses the [`DefaultEigenvalueBackend`].
    pub fn new() -> PrototypeDispatcher<DefaultEigenvalueBackend> {
        PrototypeDispatcher::with_backend(DefaultEigenvalueBackend::default())
    }
}

#[cfg(any(
    feature = "faer-backend",
    feature = "lapack-backend",
    feature = "nalgebra-backend"
))]
impl Default for PrototypeDispatcher<DefaultEigenvalueBackend> {
    fn default() -> PrototypeDispatcher<DefaultEigenvalueBackend> {
        PrototypeDispatcher::new()
    }
}

impl<B> PrototypeDispatcher<B> {
    /// Creates a dispatcher that uses a particular eigenvalue backend.
    pub fn with_backend(backend: B) -> PrototypeDispatcher<B> {
        PrototypeDispatcher {
            backend,
            polish_iterations: DEFAULT_POLISH_ITERATIONS,
        }
    }

    /// Returns the eigenvalue backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the maximum number of Newton iterations used to refine
    /// polynomial roots.
    pub fn polish_iterations(&self) -> usize {
        self.polish_iterations
    }

    /// Synthesizes a filter.
    ///
    /// The critical frequency in `design` is given in rad/s for analog
    /// designs and in fractions of the Nyquist frequency for digital designs.
    /// It must be a single frequency for lowpass and highpass filters and an
    /// ascending pair for bandpass and bandstop filters.
    ///
    /// Errors are returned for allpass filters, for an order of zero, and if
    /// any of the extra parameters required by the family is missing from
    /// `extras`.
    pub fn prototype<T>(
        &self,
        family: FilterFamily,
        kind: FilterKind,
        domain: Domain,
        design: &DesignResult<T>,
        extras: &Extras<T>,
    ) -> Result<Zpk<T>>
    where
        T: Float + FloatConst + 'static,
        B: EigenvalueBackend<T>,
    {
        if kind == FilterKind::Allpass {
            return Err(Error::UnsupportedKind(kind));
        }
        if design.order == 0 {
            return Err(InvalidParameter::ZeroOrder.into());
        }
        check_critical_frequency(kind, domain, &design.wn)?;
        let strategy = family.strategy::<T>();
        for &extra in strategy.required_extras() {
            extras.require(family, extra)?;
        }

        let root_finder = CompanionRootFinder::new(&self.backend, self.polish_iterations);
        let prototype = strategy.analog_prototype(design.order, extras, &root_finder)?;

        // Digital designs use an analog design at fs = 2.
        let fs = T::from(2.0).unwrap();
        let warped = match domain {
            Domain::Analog => design.wn,
            Domain::Digital => design.wn.map(|w| T::from(4.0).unwrap() * prewarp(w)),
        };
        let analog = match (kind, warped) {
            (FilterKind::Lowpass, Edges::Single(w)) => lp2lp(&prototype, w),
            (FilterKind::Highpass, Edges::Single(w)) => lp2hp(&prototype, w),
            (FilterKind::Bandpass, Edges::Pair(w0, w1)) => {
                lp2bp(&prototype, (w0 * w1).sqrt(), w1 - w0)
            }
            (FilterKind::Bandstop, Edges::Pair(w0, w1)) => {
                lp2bs(&prototype, (w0 * w1).sqrt(), w1 - w0)
            }
            _ => unreachable!("critical frequency shape has been checked"),
        };
        let zpk = match domain {
            Domain::Analog => analog,
            Domain::Digital => bilinear(&analog, fs),
        };
        tracing::debug!(
            %family,
            %kind,
            zeros = zpk.zeros.len(),
            poles = zpk.poles.len(),
            "synthesized prototype"
        );
        Ok(zpk)
    }
}

impl<B> DispatcherBuilder for PrototypeDispatcher<B> {
    fn set_polish_iterations(&mut self, polish_iterations: usize) -> &mut Self {
        self.polish_iterations = polish_iterations;
        self
    }
}

/// Checks that a critical frequency is valid for a filter kind.
pub(crate) fn check_critical_frequency<T: Float>(
    kind: FilterKind,
    domain: Domain,
    wn: &Edges<T>,
) -> Result<()> {
    if kind.is_band() != wn.is_pair() {
        let expected = if kind.is_band() { "a pair of" } else { "a single" };
        return Err(InvalidParameter::CriticalFrequencyShape(kind, expected).into());
    }
    wn.check_positive()?;
    if let Edges::Pair(w0, w1) = *wn {
        if w0 >= w1 {
            return Err(InvalidParameter::UnorderedPair.into());
        }
    }
    if domain == Domain::Digital && wn.to_vec().into_iter().any(|w| w >= T::one()) {
        return Err(InvalidParameter::AboveNyquist.into());
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extras() {
        let mut extras = Extras::<f64>::new();
        assert_eq!(
            extras.set(Extra::Ripple, 0.0).map(|_| ()),
            Err(InvalidParameter::NonPositiveExtra("ripple").into())
        );
        assert_eq!(
            extras.set(Extra::Ripple, f64::NAN).map(|_| ()),
            Err(InvalidParameter::NonFinite("ripple").into())
        );
        extras.set(Extra::Ripple, 0.5).unwrap();
        extras
            .set_default(Extra::Ripple, Some(3.0))
            .unwrap()
            .set_default(Extra::StopbandAttenuation, Some(60.0))
            .unwrap()
            .set_default(Extra::StopbandAttenuation, None)
            .unwrap();
        assert_eq!(extras.get(Extra::Ripple), Some(0.5));
        assert_eq!(extras.get(Extra::StopbandAttenuation), Some(60.0));
        assert_eq!(extras.iter().count(), 2);
        assert_eq!(
            Extras::<f64>::new().require(FilterFamily::ChebyshevI, Extra::Ripple),
            Err(InvalidParameter::MissingExtra {
                family: FilterFamily::ChebyshevI,
                extra: "ripple"
            }
            .into())
        );
    }

    #[test]
    fn critical_frequency() {
        let check = |kind, domain, wn| check_critical_frequency::<f64>(kind, domain, &wn);
        assert!(check(FilterKind::Lowpass, Domain::Digital, Edges::Single(0.5)).is_ok());
        assert_eq!(
            check(FilterKind::Bandpass, Domain::Digital, Edges::Single(0.5)),
            Err(InvalidParameter::CriticalFrequencyShape(FilterKind::Bandpass, "a pair of").into())
        );
        assert_eq!(
            check(FilterKind::Highpass, Domain::Analog, Edges::Pair(1.0, 2.0)),
            Err(InvalidParameter::CriticalFrequencyShape(FilterKind::Highpass, "a single").into())
        );
        assert_eq!(
            check(FilterKind::Bandstop, Domain::Analog, Edges::Pair(2.0, 1.0)),
            Err(InvalidParameter::UnorderedPair.into())
        );
        assert_eq!(
            check(FilterKind::Lowpass, Domain::Digital, Edges::Single(1.0)),
            Err(InvalidParameter::AboveNyquist.into())
        );
        assert!(check(FilterKind::Lowpass, Domain::Analog, Edges::Single(100.0)).is_ok());
    }

    #[cfg(any(
        feature = "faer-backend",
        feature = "lapack-backend",
        feature = "nalgebra-backend"
    ))]
    mod synthesis {
        use super::*;
        use crate::polynomial::zpk2tf;

        fn butterworth(order: usize, kind: FilterKind, wn: Edges<f64>) -> Result<Zpk<f64>> {
            PrototypeDispatcher::new().prototype(
                FilterFamily::Butterworth,
                kind,
                Domain::Digital,
                &DesignResult { order, wn },
                &Extras::new(),
            )
        }

        #[test]
        fn lowpass_coefficients() {
            let zpk = butterworth(2, FilterKind::Lowpass, Edges::Single(0.01)).unwrap();
            let tf = zpk2tf(&zpk);
            let b = [2.41359049041981e-4, 4.82718098083962e-4, 2.41359049041981e-4];
            let a = [1.0, -1.95557824031504, 0.956543676511203];
            for (x, y) in tf.b.iter().zip(b.iter()).chain(tf.a.iter().zip(a.iter())) {
                assert!((x - y).abs() < 1e-12, "{tf:?}");
            }
        }

        #[test]
        fn rejected() {
            assert_eq!(
                butterworth(2, FilterKind::Allpass, Edges::Single(0.1)),
                Err(Error::UnsupportedKind(FilterKind::Allpass))
            );
            assert_eq!(
                butterworth(0, FilterKind::Lowpass, Edges::Single(0.1)),
                Err(InvalidParameter::ZeroOrder.into())
            );
            let dispatcher = PrototypeDispatcher::new();
            let design = DesignResult {
                order: 3,
                wn: Edges::Single(0.1),
            };
            assert_eq!(
                dispatcher.prototype(
                    FilterFamily::Elliptic,
                    FilterKind::Lowpass,
                    Domain::Digital,
                    &design,
                    Extras::new().set(Extra::Ripple, 1.0).unwrap(),
                ),
                Err(InvalidParameter::MissingExtra {
                    family: FilterFamily::Elliptic,
                    extra: "stopband_attenuation"
                }
                .into())
            );
        }

        #[test]
        fn bessel() {
            let mut dispatcher = PrototypeDispatcher::new();
            dispatcher.set_polish_iterations(4);
            let zpk = dispatcher
                .prototype(
                    FilterFamily::Bessel,
                    FilterKind::Lowpass,
                    Domain::Analog,
                    &DesignResult {
                        order: 2,
                        wn: Edges::Single(1.0),
                    },
                    &Extras::new(),
                )
                .unwrap();
            // Poles of the phase-normalized second order Bessel filter.
            for p in &zpk.poles {
                assert!((p.re + 1.5 / 3.0f64.sqrt()).abs() < 1e-12);
                assert!((p.im.abs() - 0.5).abs() < 1e-12);
            }
        }
    }
}
