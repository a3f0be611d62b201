//! Filter design session.

#[cfg(any(
    feature = "faer-backend",
    feature = "lapack-backend",
    feature = "nalgebra-backend"
))]
use crate::eigenvalues::DefaultEigenvalueBackend;
use crate::{
    dispatch::{Extra, Extras, PrototypeDispatcher, check_critical_frequency},
    eigenvalues::EigenvalueBackend,
    error::{Error, InvalidParameter, Result},
    normalize::{NormalizedSpec, normalize, normalize_edges},
    order::OrderSelector,
    spec::FilterSpecification,
    transfer::TransferFunctionBuilder,
    types::{DesignResult, Domain, Edges, FilterFamily, FilterKind, Target, TransferFunction, Zpk},
};
use num_traits::{Float, FloatConst};
use std::fmt;

/// Stage reached by a [`FilterSession`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum SessionState {
    /// Nothing has been configured.
    Unconfigured,
    /// The filter kind is known, but there is no specification. This is the
    /// state after [`FilterSession::configure_direct`].
    Classified,
    /// A specification has been classified and normalized.
    Normalized,
    /// The order and critical frequency are known.
    OrderSelected,
    /// The filter has been synthesized.
    Synthesized,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::Unconfigured => "unconfigured",
            SessionState::Classified => "classified",
            SessionState::Normalized => "normalized",
            SessionState::OrderSelected => "order_selected",
            SessionState::Synthesized => "synthesized",
        })
    }
}

// What the session was configured with.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Configuration<T> {
    kind: FilterKind,
    domain: Domain,
    sample_rate: Option<T>,
}

/// Filter design session.
///
/// A session carries a filter through the design stages: configuration,
/// order selection, synthesis and conversion to a transfer function. Each
/// stage requires the previous one to have succeeded, and out of order calls
/// return [`Error::Sequence`].
///
/// There are two ways of configuring a session. [`FilterSession::configure`]
/// takes a [`FilterSpecification`], whose filter kind is derived from the band
/// edges and whose order is selected with [`FilterSession::select_order`].
/// [`FilterSession::configure_direct`] takes the filter kind, and the order
/// and critical frequency are then given with [`FilterSession::set_order`].
///
/// A successful stage replaces its own result and discards the results of
/// all the later stages. A failed stage leaves the session unchanged.
///
/// The type parameter `B` is the eigenvalue backend used to find polynomial
/// roots during synthesis.
#[derive(Debug, Clone)]
pub struct FilterSession<T, B> {
    selector: OrderSelector<T>,
    dispatcher: PrototypeDispatcher<B>,
    configuration: Option<Configuration<T>>,
    normalized: Option<NormalizedSpec<T>>,
    design: Option<DesignResult<T>>,
    prototype: Option<Zpk<T>>,
    transfer_function: Option<TransferFunction<T>>,
}

#[cfg(any(
    feature = "faer-backend",
    feature = "lapack-backend",
    feature = "nalgebra-backend"
))]
impl<T> FilterSession<T, DefaultEigenvalueBackend>
where
    T: Float + FloatConst + 'static,
    DefaultEigenvalueBackend: EigenvalueBackend<T>,
{
    /// Creates an unconfigured session that uses the
    /// [`DefaultEigenvalueBackend`].
    pub fn new() -> FilterSession<T, DefaultEigenvalueBackend> {
        FilterSession::with_backend(DefaultEigenvalueBackend::default())
    }
}

#[cfg(any(
    feature = "faer-backend",
    feature = "lapack-backend",
    feature = "nalgebra-backend"
))]
impl<T> Default for FilterSession<T, DefaultEigenvalueBackend>
where
    T: Float + FloatConst + 'static,
    DefaultEigenvalueBackend: EigenvalueBackend<T>,
{
    fn default() -> FilterSession<T, DefaultEigenvalueBackend> {
        FilterSession::new()
    }
}

impl<T: Float + FloatConst + 'static, B: EigenvalueBackend<T>> FilterSession<T, B> {
    /// Creates an unconfigured session that uses a particular eigenvalue
    /// backend.
    pub fn with_backend(backend: B) -> FilterSession<T, B> {
        FilterSession {
            selector: OrderSelector::new(),
            dispatcher: PrototypeDispatcher::with_backend(backend),
            configuration: None,
            normalized: None,
            design: None,
            prototype: None,
            transfer_function: None,
        }
    }

    /// Returns the order selector, so that its settings can be changed with
    /// [`SelectorBuilder`](crate::SelectorBuilder).
    pub fn selector_mut(&mut self) -> &mut OrderSelector<T> {
        &mut self.selector
    }

    /// Returns the prototype dispatcher, so that its settings can be changed
    /// with [`DispatcherBuilder`](crate::DispatcherBuilder).
    pub fn dispatcher_mut(&mut self) -> &mut PrototypeDispatcher<B> {
        &mut self.dispatcher
    }

    /// Configures the session with a filter specification.
    ///
    /// The specification is classified and normalized for `domain`, and all
    /// the previous state of the session is discarded.
    pub fn configure(&mut self, spec: &FilterSpecification<T>, domain: Domain) -> Result<()> {
        let normalized = normalize(spec, domain)?;
        self.reset(Some(Configuration {
            kind: normalized.kind(),
            domain,
            sample_rate: spec.sample_rate(),
        }));
        self.normalized = Some(normalized);
        Ok(())
    }

    /// Configures the session for direct design.
    ///
    /// The filter kind is given by the caller, and the order and critical
    /// frequency are later given with [`FilterSession::set_order`]. The sample
    /// rate, in Hz, is required for digital designs. All the previous state of
    /// the session is discarded.
    pub fn configure_direct(
        &mut self,
        kind: FilterKind,
        domain: Domain,
        sample_rate: Option<T>,
    ) -> Result<()> {
        if let Some(fs) = sample_rate {
            if !fs.is_finite() {
                return Err(InvalidParameter::NonFinite("sample rate").into());
            }
            if fs <= T::zero() {
                return Err(InvalidParameter::NonPositiveSampleRate.into());
            }
        }
        if domain == Domain::Digital && sample_rate.is_none() {
            return Err(InvalidParameter::MissingSampleRate.into());
        }
        self.reset(Some(Configuration {
            kind,
            domain,
            sample_rate,
        }));
        Ok(())
    }

    fn reset(&mut self, configuration: Option<Configuration<T>>) {
        self.configuration = configuration;
        self.normalized = None;
        self.design = None;
        self.prototype = None;
        self.transfer_function = None;
    }

    fn configuration(&self, operation: &'static str) -> Result<Configuration<T>> {
        self.configuration.ok_or(Error::Sequence {
            operation,
            prerequisite: "configure",
        })
    }

    /// Returns the filter kind.
    pub fn classify(&self) -> Result<FilterKind> {
        Ok(self.configuration("classify")?.kind)
    }

    /// Selects the order and critical frequency of a filter of `family`.
    ///
    /// This requires a session configured with
    /// [`FilterSession::configure`]. See [`OrderSelector::select_order`].
    pub fn select_order(&mut self, family: FilterFamily, target: Target) -> Result<DesignResult<T>> {
        let normalized = self.normalized.as_ref().ok_or(Error::Sequence {
            operation: "select_order",
            prerequisite: "configure",
        })?;
        let design = self.selector.select_order(normalized, family, target)?;
        self.design = Some(design);
        self.prototype = None;
        self.transfer_function = None;
        Ok(design)
    }

    /// Sets the order and critical frequency directly.
    ///
    /// The critical frequency is given in Hz. It must be a single frequency
    /// for lowpass and highpass filters and an ascending pair for bandpass and
    /// bandstop filters. It is normalized like the edges of a specification.
    pub fn set_order(&mut self, order: usize, wn: impl Into<Edges<T>>) -> Result<DesignResult<T>> {
        let configuration = self.configuration("set_order")?;
        if order == 0 {
            return Err(InvalidParameter::ZeroOrder.into());
        }
        let wn = wn.into();
        if configuration.kind.is_band() != wn.is_pair() {
            // Report the shape before any unit conversion problem.
            check_critical_frequency(configuration.kind, configuration.domain, &wn)?;
        }
        let wn = normalize_edges(wn, configuration.domain, configuration.sample_rate)?;
        check_critical_frequency(configuration.kind, configuration.domain, &wn)?;
        let design = DesignResult { order, wn };
        self.design = Some(design);
        self.prototype = None;
        self.transfer_function = None;
        Ok(design)
    }

    /// Synthesizes the filter of `family`.
    ///
    /// The extra parameters that the family needs and that are not given in
    /// `extras` are taken from the specification, if the session was
    /// configured with one: [`Extra::Ripple`] from its ripple and
    /// [`Extra::StopbandAttenuation`] from its stopband attenuation.
    pub fn synthesize(&mut self, family: FilterFamily, extras: &Extras<T>) -> Result<Zpk<T>> {
        let design = self.design.as_ref().ok_or(Error::Sequence {
            operation: "synthesize",
            prerequisite: "select_order",
        })?;
        let configuration = self.configuration("synthesize")?;
        let mut merged = extras.clone();
        if let Some(normalized) = &self.normalized {
            merged
                .set_default(Extra::Ripple, normalized.ripple())?
                .set_default(
                    Extra::StopbandAttenuation,
                    Some(normalized.stopband_attenuation()),
                )?;
        }
        let zpk = self.dispatcher.prototype(
            family,
            configuration.kind,
            configuration.domain,
            design,
            &merged,
        )?;
        self.prototype = Some(zpk.clone());
        self.transfer_function = None;
        Ok(zpk)
    }

    /// Converts the synthesized filter to a transfer function.
    pub fn build_transfer_function(&mut self) -> Result<TransferFunction<T>> {
        let zpk = self.prototype.as_ref().ok_or(Error::Sequence {
            operation: "build_transfer_function",
            prerequisite: "synthesize",
        })?;
        let tf = TransferFunctionBuilder::build(zpk);
        self.transfer_function = Some(tf.clone());
        Ok(tf)
    }
}

impl<T, B> FilterSession<T, B> {
    /// Returns the stage reached by the session.
    pub fn state(&self) -> SessionState {
        if self.prototype.is_some() {
            SessionState::Synthesized
        } else if self.design.is_some() {
            SessionState::OrderSelected
        } else if self.normalized.is_some() {
            SessionState::Normalized
        } else if self.configuration.is_some() {
            SessionState::Classified
        } else {
            SessionState::Unconfigured
        }
    }

    /// Returns the filter kind, if the session is configured.
    pub fn kind(&self) -> Option<FilterKind> {
        self.configuration.as_ref().map(|c| c.kind)
    }

    /// Returns the design domain, if the session is configured.
    pub fn domain(&self) -> Option<Domain> {
        self.configuration.as_ref().map(|c| c.domain)
    }

    /// Returns the normalized specification.
    pub fn normalized_spec(&self) -> Option<&NormalizedSpec<T>> {
        self.normalized.as_ref()
    }

    /// Returns the order and critical frequency.
    pub fn design(&self) -> Option<&DesignResult<T>> {
        self.design.as_ref()
    }

    /// Returns the synthesized zero-pole-gain representation.
    pub fn prototype(&self) -> Option<&Zpk<T>> {
        self.prototype.as_ref()
    }

    /// Returns the transfer function.
    pub fn transfer_function(&self) -> Option<&TransferFunction<T>> {
        self.transfer_function.as_ref()
    }
}

#[cfg(all(
    test,
    any(
        feature = "faer-backend",
        feature = "lapack-backend",
        feature = "nalgebra-backend"
    )
))]
mod test {
    use super::*;
    use crate::spec::SpecificationBuilder;

    fn lowpass() -> FilterSpecification<f64> {
        let mut spec = FilterSpecification::new(10.0, 100.0, 1.0, 80.0).unwrap();
        spec.set_sample_rate(500.0).unwrap();
        spec
    }

    #[test]
    fn sequencing() {
        let mut session = FilterSession::<f64, _>::new();
        assert_eq!(session.state(), SessionState::Unconfigured);
        assert_eq!(
            session.classify(),
            Err(Error::Sequence {
                operation: "classify",
                prerequisite: "configure"
            })
        );
        assert!(matches!(
            session.select_order(FilterFamily::Butterworth, Target::Passband),
            Err(Error::Sequence { .. })
        ));
        assert!(matches!(
            session.synthesize(FilterFamily::Butterworth, &Extras::new()),
            Err(Error::Sequence { .. })
        ));
        assert!(matches!(
            session.build_transfer_function(),
            Err(Error::Sequence { .. })
        ));

        session.configure(&lowpass(), Domain::Digital).unwrap();
        assert_eq!(session.state(), SessionState::Normalized);
        assert_eq!(session.classify(), Ok(FilterKind::Lowpass));
        assert_eq!(
            session.synthesize(FilterFamily::Butterworth, &Extras::new()),
            Err(Error::Sequence {
                operation: "synthesize",
                prerequisite: "select_order"
            })
        );
        session
            .select_order(FilterFamily::Butterworth, Target::Stopband)
            .unwrap();
        assert_eq!(session.state(), SessionState::OrderSelected);
        session
            .synthesize(FilterFamily::Butterworth, &Extras::new())
            .unwrap();
        assert_eq!(session.state(), SessionState::Synthesized);
        let tf = session.build_transfer_function().unwrap();
        assert_eq!(tf.b.len(), 6);
        assert_eq!(session.transfer_function(), Some(&tf));
    }

    #[test]
    fn downstream_results_are_discarded() {
        let mut session = FilterSession::<f64, _>::new();
        session.configure(&lowpass(), Domain::Digital).unwrap();
        session
            .select_order(FilterFamily::Butterworth, Target::Passband)
            .unwrap();
        session
            .synthesize(FilterFamily::Butterworth, &Extras::new())
            .unwrap();
        session.build_transfer_function().unwrap();

        session
            .select_order(FilterFamily::ChebyshevII, Target::Passband)
            .unwrap();
        assert_eq!(session.state(), SessionState::OrderSelected);
        assert!(session.prototype().is_none());
        assert!(session.transfer_function().is_none());

        let spec = FilterSpecification::new([1.0, 2.0], [0.1, 5.0], 1.0, 80.0).unwrap();
        session.configure(&spec, Domain::Analog).unwrap();
        assert_eq!(session.state(), SessionState::Normalized);
        assert_eq!(session.classify(), Ok(FilterKind::Bandpass));
        assert!(session.design().is_none());
    }

    #[test]
    fn failures_leave_state_unchanged() {
        let mut session = FilterSession::<f64, _>::new();
        session.configure(&lowpass(), Domain::Digital).unwrap();
        let design = session
            .select_order(FilterFamily::Butterworth, Target::Passband)
            .unwrap();

        // No ripple in the specification.
        assert!(
            session
                .select_order(FilterFamily::ChebyshevI, Target::Passband)
                .is_err()
        );
        assert!(
            session
                .select_order(FilterFamily::Elliptic, Target::Stopband)
                .is_err()
        );
        assert_eq!(session.design(), Some(&design));

        let meaningless = FilterSpecification::new([6.0, 1.0], [6.0, 6.0], 1.0, 80.0).unwrap();
        assert_eq!(
            session.configure(&meaningless, Domain::Analog),
            Err(Error::MeaninglessFilter)
        );
        assert_eq!(session.state(), SessionState::OrderSelected);
        assert_eq!(session.classify(), Ok(FilterKind::Lowpass));

        let no_rate = FilterSpecification::new(10.0, 100.0, 1.0, 80.0).unwrap();
        assert!(session.configure(&no_rate, Domain::Digital).is_err());
        assert_eq!(session.domain(), Some(Domain::Digital));
        assert_eq!(session.design(), Some(&design));
    }

    #[test]
    fn extras_from_specification() {
        let mut spec = lowpass();
        spec.set_ripple(1.0).unwrap();
        let mut session = FilterSession::<f64, _>::new();
        session.configure(&spec, Domain::Digital).unwrap();
        session
            .select_order(FilterFamily::Elliptic, Target::Passband)
            .unwrap();
        let zpk = session
            .synthesize(FilterFamily::Elliptic, &Extras::new())
            .unwrap();
        assert_eq!(zpk.poles.len(), 3);

        // Explicit extras take precedence.
        let mut extras = Extras::new();
        extras.set(Extra::StopbandAttenuation, 40.0).unwrap();
        let weaker = session
            .synthesize(FilterFamily::Elliptic, &extras)
            .unwrap();
        assert_ne!(weaker, zpk);
    }

    #[test]
    fn direct_mode() {
        let mut session = FilterSession::<f64, _>::new();
        assert_eq!(
            session.configure_direct(FilterKind::Lowpass, Domain::Digital, None),
            Err(InvalidParameter::MissingSampleRate.into())
        );
        session
            .configure_direct(FilterKind::Bandpass, Domain::Digital, Some(50000.0))
            .unwrap();
        assert_eq!(session.state(), SessionState::Classified);
        assert!(matches!(
            session.select_order(FilterFamily::Butterworth, Target::Passband),
            Err(Error::Sequence { .. })
        ));
        assert_eq!(
            session.set_order(2, 250.0),
            Err(
                InvalidParameter::CriticalFrequencyShape(FilterKind::Bandpass, "a pair of").into()
            )
        );
        assert_eq!(
            session.set_order(2, [500.0, 250.0]),
            Err(InvalidParameter::UnorderedPair.into())
        );
        assert_eq!(
            session.set_order(0, [250.0, 500.0]),
            Err(InvalidParameter::ZeroOrder.into())
        );
        let design = session.set_order(2, [250.0, 500.0]).unwrap();
        assert_eq!(design.wn, Edges::Pair(0.01, 0.02));
        assert_eq!(session.state(), SessionState::OrderSelected);

        // Chebyshev I needs an explicit ripple in direct mode.
        assert!(matches!(
            session.synthesize(FilterFamily::ChebyshevI, &Extras::new()),
            Err(Error::InvalidParameter(InvalidParameter::MissingExtra { .. }))
        ));
        session
            .synthesize(FilterFamily::Butterworth, &Extras::new())
            .unwrap();
        let tf = session.build_transfer_function().unwrap();
        assert_eq!(tf.a.len(), 5);
    }

    #[test]
    fn allpass() {
        let spec = FilterSpecification::new(50.0, 50.0, 1.0, 40.0).unwrap();
        let mut session = FilterSession::<f64, _>::new();
        session.configure(&spec, Domain::Analog).unwrap();
        assert_eq!(session.classify(), Ok(FilterKind::Allpass));
        let design = session
            .select_order(FilterFamily::Butterworth, Target::Passband)
            .unwrap();
        assert!(!design.is_usable());
        assert_eq!(
            session.synthesize(FilterFamily::Butterworth, &Extras::new()),
            Err(Error::UnsupportedKind(FilterKind::Allpass))
        );
        assert_eq!(session.state(), SessionState::OrderSelected);
    }

    #[test]
    fn default_backend_constructors() {
        let mut session = FilterSession::<f64, DefaultEigenvalueBackend>::default();
        session.configure(&lowpass(), Domain::Digital).unwrap();
        assert_eq!(session.state(), SessionState::Normalized);

        let mut spec = FilterSpecification::<f32>::new(10.0, 100.0, 1.0, 80.0).unwrap();
        spec.set_sample_rate(500.0).unwrap();
        let mut session = FilterSession::<f32, _>::new();
        session.configure(&spec, Domain::Digital).unwrap();
        let design = session
            .select_order(FilterFamily::Butterworth, Target::Stopband)
            .unwrap();
        assert_eq!(design.order, 5);
        session
            .synthesize(FilterFamily::Butterworth, &Extras::new())
            .unwrap();
        assert_eq!(session.state(), SessionState::Synthesized);
    }
}
