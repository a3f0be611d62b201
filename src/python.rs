#![cfg(not(doctest))]

// Do not run doctests, since otherwise Rust attempts to build the Python
// examples as Rust code.

use crate::{
    Convf64, DefaultEigenvalueBackend, DesignResult, Domain, Edges, EigenvalueBackend, Extra,
    Extras, FilterFamily, FilterKind, FilterSpecification, NormalizedSpec, OrderSelector,
    PrototypeDispatcher, SpecificationBuilder, Target, TransferFunctionBuilder, error::Error,
};
use num_bigfloat::BigFloat;
use num_complex::Complex;
use num_traits::{Float, FloatConst};
use pyo3::{
    exceptions::{PyRuntimeError, PyValueError},
    prelude::*,
};

/// iir-design selects the order and critical frequency of classical IIR
/// filters (Butterworth, Chebyshev I and II, elliptic and Bessel) and
/// synthesizes them as zeros, poles and gain or as transfer function
/// coefficients.
///
/// Besides the usual order selection, where the filter meets its passband
/// attenuation exactly, Butterworth filters can be matched at the stopband
/// edge, so that all the design margin is left in the passband.
///
/// The order selection functions follow the conventions of
/// :py:func:`scipy.signal.buttord` and related functions. Calculations can be
/// done in double precision or with `num-bigfloat`_.
///
/// .. _num-bigfloat: https://docs.rs/num-bigfloat/latest/num_bigfloat/
#[pymodule]
fn iir_design(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(buttord, m)?)?;
    m.add_function(wrap_pyfunction!(cheb1ord, m)?)?;
    m.add_function(wrap_pyfunction!(cheb2ord, m)?)?;
    m.add_function(wrap_pyfunction!(ellipord, m)?)?;
    m.add_function(wrap_pyfunction!(iirdesign, m)?)?;
    m.add_class::<FilterSession>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("__author__", env!("CARGO_PKG_AUTHORS"))?;
    m.add("__license__", env!("CARGO_PKG_LICENSE"))?;
    Ok(())
}

/// Butterworth filter order selection.
///
/// Return the order of the lowest order digital or analog Butterworth filter
/// that loses no more than `gpass` dB in the passband and has at least
/// `gstop` dB attenuation in the stopband.
///
/// Parameters
/// ----------
/// wp, ws : float or array_like
///     Passband and stopband edge frequencies. For digital filters, these are
///     in the same units as `fs`, which defaults to 2 half-cycles/sample
///     (so that 1 is the Nyquist frequency). For analog filters, they are
///     angular frequencies in rad/s. A pair of frequencies describes a
///     bandpass or bandstop filter.
/// gpass : float
///     The maximum loss in the passband (dB).
/// gstop : float
///     The minimum attenuation in the stopband (dB).
/// analog : bool, optional
///     When True, return the order of an analog filter. Default is `False`.
/// fs : float, optional
///     The sampling frequency of the digital system.
/// target : {'passband', 'stopband'}, optional
///     The band edge at which the attenuation is met exactly. The default,
///     'passband', is the convention of :py:func:`scipy.signal.buttord`.
/// bigfloat : bool, optional
///     Use `num_bigfloat`_ for the calculations. Default is `False`.
///
/// Returns
/// -------
/// ord : int
///     The lowest order that meets the specification.
/// wn : float or List[float]
///     The Butterworth natural frequency, in the units of `wp`.
///
/// Examples
/// --------
///
/// >>> import iir_design
/// >>> iir_design.buttord(10, 100, 1, 80, fs=500)
/// (5, 11.442092040712718)
/// >>> iir_design.buttord(10, 100, 1, 80, fs=500, target='stopband')
/// (5, 18.24620819406256)
#[allow(clippy::too_many_arguments)]
#[pyfunction]
#[pyo3(signature = (wp, ws, gpass, gstop, *, analog=false, fs=None, target="passband", bigfloat=false))]
fn buttord(
    wp: Bound<'_, PyAny>,
    ws: Bound<'_, PyAny>,
    gpass: f64,
    gstop: f64,
    analog: bool,
    fs: Option<f64>,
    target: &str,
    bigfloat: bool,
) -> PyResult<(usize, Wn)> {
    let request = OrderRequest::new(&wp, &ws, gpass, gstop, analog, fs)?;
    let target = target.parse()?;
    request.select(FilterFamily::Butterworth, target, bigfloat)
}

/// Chebyshev type I filter order selection.
///
/// The parameters are those of :py:func:`buttord`, except that only the
/// passband target is available. The passband ripple of the filter is
/// `gpass`.
///
/// Returns
/// -------
/// ord : int
///     The lowest order that meets the specification.
/// wn : float or List[float]
///     The Chebyshev natural frequency, in the units of `wp`.
#[pyfunction]
#[pyo3(signature = (wp, ws, gpass, gstop, *, analog=false, fs=None, bigfloat=false))]
fn cheb1ord(
    wp: Bound<'_, PyAny>,
    ws: Bound<'_, PyAny>,
    gpass: f64,
    gstop: f64,
    analog: bool,
    fs: Option<f64>,
    bigfloat: bool,
) -> PyResult<(usize, Wn)> {
    OrderRequest::new(&wp, &ws, gpass, gstop, analog, fs)?.select(
        FilterFamily::ChebyshevI,
        Target::Passband,
        bigfloat,
    )
}

/// Chebyshev type II filter order selection.
///
/// The parameters are those of :py:func:`buttord`, except that only the
/// passband target is available.
///
/// Returns
/// -------
/// ord : int
///     The lowest order that meets the specification.
/// wn : float or List[float]
///     The frequency at which the filter reaches `gstop`, in the units of
///     `wp`.
#[pyfunction]
#[pyo3(signature = (wp, ws, gpass, gstop, *, analog=false, fs=None, bigfloat=false))]
fn cheb2ord(
    wp: Bound<'_, PyAny>,
    ws: Bound<'_, PyAny>,
    gpass: f64,
    gstop: f64,
    analog: bool,
    fs: Option<f64>,
    bigfloat: bool,
) -> PyResult<(usize, Wn)> {
    OrderRequest::new(&wp, &ws, gpass, gstop, analog, fs)?.select(
        FilterFamily::ChebyshevII,
        Target::Passband,
        bigfloat,
    )
}

/// Elliptic (Cauer) filter order selection.
///
/// The parameters are those of :py:func:`buttord`, except that only the
/// passband target is available. The passband ripple of the filter is
/// `gpass`.
///
/// Returns
/// -------
/// ord : int
///     The lowest order that meets the specification.
/// wn : float or List[float]
///     The natural frequency, in the units of `wp`.
#[pyfunction]
#[pyo3(signature = (wp, ws, gpass, gstop, *, analog=false, fs=None, bigfloat=false))]
fn ellipord(
    wp: Bound<'_, PyAny>,
    ws: Bound<'_, PyAny>,
    gpass: f64,
    gstop: f64,
    analog: bool,
    fs: Option<f64>,
    bigfloat: bool,
) -> PyResult<(usize, Wn)> {
    OrderRequest::new(&wp, &ws, gpass, gstop, analog, fs)?.select(
        FilterFamily::Elliptic,
        Target::Passband,
        bigfloat,
    )
}

/// Complete IIR filter design.
///
/// Selects the order of a filter of type `ftype` that meets the
/// specification and returns its transfer function coefficients. The
/// parameters `wp`, `ws`, `gpass`, `gstop`, `analog`, `fs`, `target` and
/// `bigfloat` are those of :py:func:`buttord`.
///
/// Parameters
/// ----------
/// ftype : str, optional
///     The filter family: 'butter', 'cheby1', 'cheby2', 'ellip' or
///     'bessel'. Default is 'butter'.
///
/// Returns
/// -------
/// b, a : List[float]
///     Numerator and denominator polynomials of the filter.
///
/// Examples
/// --------
///
/// >>> import iir_design
/// >>> import scipy
/// >>> b, a = iir_design.iirdesign(10, 100, 1, 80, fs=500, target='stopband')
/// >>> w, h = scipy.signal.freqz(b, a, fs=500)
#[allow(clippy::too_many_arguments)]
#[pyfunction]
#[pyo3(signature = (wp, ws, gpass, gstop, *, ftype="butter", analog=false, fs=None, target="passband", bigfloat=false))]
fn iirdesign(
    wp: Bound<'_, PyAny>,
    ws: Bound<'_, PyAny>,
    gpass: f64,
    gstop: f64,
    ftype: &str,
    analog: bool,
    fs: Option<f64>,
    target: &str,
    bigfloat: bool,
) -> PyResult<(Vec<f64>, Vec<f64>)> {
    let request = OrderRequest::new(&wp, &ws, gpass, gstop, analog, fs)?;
    let family = ftype.parse()?;
    let target = target.parse()?;
    if bigfloat {
        request.design::<BigFloat>(family, target)
    } else {
        request.design::<f64>(family, target)
    }
}

/// Critical frequency returned to Python: a float or a list of two floats.
#[derive(Debug, Clone, IntoPyObject)]
enum Wn {
    Single(f64),
    Pair([f64; 2]),
}

impl Wn {
    fn new<T: Convf64 + Copy>(wn: Edges<T>, scale: f64) -> Wn {
        match wn.map(|w| Convf64::to_f64(&w) * scale) {
            Edges::Single(w) => Wn::Single(w),
            Edges::Pair(w0, w1) => Wn::Pair([w0, w1]),
        }
    }
}

// Order selection arguments in the units used by the Python functions.
struct OrderRequest {
    domain: Domain,
    passband: Vec<f64>,
    stopband: Vec<f64>,
    gpass: f64,
    gstop: f64,
    // Multiplies the frequencies given by the caller to obtain normalized
    // frequencies.
    scale: f64,
}

impl OrderRequest {
    fn new(
        wp: &Bound<'_, PyAny>,
        ws: &Bound<'_, PyAny>,
        gpass: f64,
        gstop: f64,
        analog: bool,
        fs: Option<f64>,
    ) -> PyResult<OrderRequest> {
        let scale = match (analog, fs) {
            (true, Some(_)) => {
                return Err(PyValueError::new_err(
                    "fs cannot be specified for an analog filter",
                ));
            }
            (false, Some(fs)) if !(fs.is_finite() && fs > 0.0) => {
                return Err(PyValueError::new_err(
                    "fs must be a finite and strictly positive number",
                ));
            }
            (false, Some(fs)) => 2.0 / fs,
            (_, None) => 1.0,
        };
        Ok(OrderRequest {
            domain: domain(analog),
            passband: pyany_to_frequencies(wp, "wp")?,
            stopband: pyany_to_frequencies(ws, "ws")?,
            gpass,
            gstop,
            scale,
        })
    }

    fn spec<T>(&self, family: FilterFamily) -> PyResult<NormalizedSpec<T>>
    where
        T: Convf64 + Float + FloatConst,
    {
        let edges = |values: &[f64]| {
            let values = values
                .iter()
                .map(|&f| T::from_f64(f * self.scale))
                .collect::<Vec<T>>();
            Edges::from_slice(&values)
        };
        let spec = NormalizedSpec::from_normalized(
            self.domain,
            edges(&self.passband)?,
            edges(&self.stopband)?,
            T::from_f64(self.gpass),
            T::from_f64(self.gstop),
        )?;
        // The ripple of these families is the passband attenuation.
        Ok(match family {
            FilterFamily::ChebyshevI | FilterFamily::Elliptic => {
                spec.with_ripple(T::from_f64(self.gpass))?
            }
            _ => spec,
        })
    }

    fn select_impl<T>(&self, family: FilterFamily, target: Target) -> PyResult<(usize, Wn)>
    where
        T: Convf64 + Float + FloatConst + 'static,
    {
        let spec = self.spec::<T>(family)?;
        let design = OrderSelector::new().select_order(&spec, family, target)?;
        Ok((design.order, Wn::new(design.wn, 1.0 / self.scale)))
    }

    fn select(&self, family: FilterFamily, target: Target, bigfloat: bool) -> PyResult<(usize, Wn)> {
        if bigfloat {
            self.select_impl::<BigFloat>(family, target)
        } else {
            self.select_impl::<f64>(family, target)
        }
    }

    fn design<T>(&self, family: FilterFamily, target: Target) -> PyResult<(Vec<f64>, Vec<f64>)>
    where
        T: Convf64 + Float + FloatConst + 'static,
        DefaultEigenvalueBackend: EigenvalueBackend<T>,
    {
        let spec = self.spec::<T>(family)?;
        let design = OrderSelector::new().select_order(&spec, family, target)?;
        let mut extras = Extras::new();
        extras
            .set_default(Extra::Ripple, spec.ripple())?
            .set_default(Extra::StopbandAttenuation, Some(spec.stopband_attenuation()))?;
        let zpk = PrototypeDispatcher::new().prototype(
            family,
            spec.kind(),
            spec.domain(),
            &design,
            &extras,
        )?;
        let tf = TransferFunctionBuilder::build(&zpk);
        let to_f64 = |v: Vec<T>| -> Vec<f64> { v.iter().map(Convf64::to_f64).collect() };
        Ok((to_f64(tf.b), to_f64(tf.a)))
    }
}

/// Step by step filter design.
///
/// A session is configured either with a specification, using
/// :py:meth:`configure`, or directly with the filter kind, using
/// :py:meth:`configure_direct`. Then the order and critical frequency are
/// selected (:py:meth:`select_order`) or given (:py:meth:`set_order`), the
/// filter is synthesized (:py:meth:`synthesize`) and its transfer function
/// is computed (:py:meth:`build_transfer_function`). Calling a stage before
/// its prerequisites raises a `RuntimeError`.
///
/// Frequencies are given to the session in Hz. Critical frequencies are
/// returned in rad/s for analog designs and as fractions of the Nyquist
/// frequency for digital designs.
///
/// Examples
/// --------
///
/// >>> import iir_design
/// >>> session = iir_design.FilterSession()
/// >>> session.configure([1000, 2000], [500, 3000], 1, 60, fs=48000)
/// >>> session.classify()
/// 'bandpass'
/// >>> order, wn = session.select_order('butter', 'stopband')
/// >>> zeros, poles, gain = session.synthesize('butter')
/// >>> b, a = session.build_transfer_function()
#[pyclass]
struct FilterSession(crate::FilterSession<f64, DefaultEigenvalueBackend>);

#[pymethods]
impl FilterSession {
    #[new]
    fn new() -> FilterSession {
        FilterSession(crate::FilterSession::new())
    }

    /// Configure the session with a filter specification.
    ///
    /// Parameters
    /// ----------
    /// passband, stopband : float or array_like
    ///     Passband and stopband edges in Hz.
    /// gpass, gstop : float
    ///     Maximum passband loss and minimum stopband attenuation in dB.
    /// ripple : float, optional
    ///     Passband ripple in dB, used by the Chebyshev I and elliptic
    ///     families.
    /// fs : float, optional
    ///     Sample rate in Hz. Required for digital designs.
    /// analog : bool, optional
    ///     Design an analog filter. Default is `False`.
    #[allow(clippy::too_many_arguments)]
    #[pyo3(signature = (passband, stopband, gpass, gstop, *, ripple=None, fs=None, analog=false))]
    fn configure(
        &mut self,
        passband: Bound<'_, PyAny>,
        stopband: Bound<'_, PyAny>,
        gpass: f64,
        gstop: f64,
        ripple: Option<f64>,
        fs: Option<f64>,
        analog: bool,
    ) -> PyResult<()> {
        let mut spec = FilterSpecification::new(
            Edges::from_slice(&pyany_to_frequencies(&passband, "passband")?)?,
            Edges::from_slice(&pyany_to_frequencies(&stopband, "stopband")?)?,
            gpass,
            gstop,
        )?;
        if let Some(ripple) = ripple {
            spec.set_ripple(ripple)?;
        }
        if let Some(fs) = fs {
            spec.set_sample_rate(fs)?;
        }
        Ok(self.0.configure(&spec, domain(analog))?)
    }

    /// Configure the session for a filter of a given kind.
    ///
    /// `kind` is one of 'lowpass', 'highpass', 'bandpass' or 'bandstop'. The
    /// sample rate `fs`, in Hz, is required unless `analog` is `True`.
    #[pyo3(signature = (kind, *, fs=None, analog=false))]
    fn configure_direct(&mut self, kind: &str, fs: Option<f64>, analog: bool) -> PyResult<()> {
        let kind: FilterKind = kind.parse()?;
        Ok(self.0.configure_direct(kind, domain(analog), fs)?)
    }

    /// Return the filter kind as a string.
    fn classify(&self) -> PyResult<String> {
        Ok(self.0.classify()?.to_string())
    }

    /// Select the order and critical frequency for a filter family.
    ///
    /// Returns the order and the critical frequency.
    #[pyo3(signature = (family, target="passband"))]
    fn select_order(&mut self, family: &str, target: &str) -> PyResult<(usize, Wn)> {
        let design = self.0.select_order(family.parse()?, target.parse()?)?;
        Ok(design_to_py(design))
    }

    /// Set the order and the critical frequency, in Hz.
    fn set_order(&mut self, order: usize, wn: Bound<'_, PyAny>) -> PyResult<(usize, Wn)> {
        let wn = Edges::from_slice(&pyany_to_frequencies(&wn, "wn")?)?;
        Ok(design_to_py(self.0.set_order(order, wn)?))
    }

    /// Synthesize the filter.
    ///
    /// `ripple` (passband ripple in dB) and `rs` (stopband attenuation in dB)
    /// override the values taken from the specification.
    ///
    /// Returns the zeros, the poles and the gain of the filter.
    #[pyo3(signature = (family, *, ripple=None, rs=None))]
    fn synthesize(
        &mut self,
        family: &str,
        ripple: Option<f64>,
        rs: Option<f64>,
    ) -> PyResult<(Vec<Complex<f64>>, Vec<Complex<f64>>, f64)> {
        let mut extras = Extras::new();
        extras
            .set_default(Extra::Ripple, ripple)?
            .set_default(Extra::StopbandAttenuation, rs)?;
        let zpk = self.0.synthesize(family.parse()?, &extras)?;
        Ok((zpk.zeros, zpk.poles, zpk.gain))
    }

    /// Return the numerator and denominator of the synthesized filter.
    fn build_transfer_function(&mut self) -> PyResult<(Vec<f64>, Vec<f64>)> {
        let tf = self.0.build_transfer_function()?;
        Ok((tf.b, tf.a))
    }

    /// Stage reached by the session.
    #[getter]
    fn state(&self) -> String {
        self.0.state().to_string()
    }

    fn __repr__(&self) -> String {
        match self.0.kind() {
            Some(kind) => format!("FilterSession(state={}, kind={kind})", self.0.state()),
            None => format!("FilterSession(state={})", self.0.state()),
        }
    }
}

fn design_to_py(design: DesignResult<f64>) -> (usize, Wn) {
    (design.order, Wn::new(design.wn, 1.0))
}

fn domain(analog: bool) -> Domain {
    if analog {
        Domain::Analog
    } else {
        Domain::Digital
    }
}

fn pyany_to_frequencies(obj: &Bound<'_, PyAny>, thing: &str) -> PyResult<Vec<f64>> {
    if let Ok(x) = obj.extract::<f64>() {
        Ok(vec![x])
    } else if let Ok(v) = obj.extract::<Vec<f64>>() {
        if v.len() != 1 && v.len() != 2 {
            return Err(PyValueError::new_err(format!(
                "{thing} must contain one or two frequencies"
            )));
        }
        Ok(v)
    } else {
        Err(PyValueError::new_err(format!(
            "{thing} must be a float or a sequence of two floats"
        )))
    }
}

impl From<Error> for PyErr {
    fn from(error: Error) -> PyErr {
        match error {
            Error::InvalidParameter(_)
            | Error::MeaninglessFilter
            | Error::UnsupportedFamily { .. }
            | Error::UnsupportedKind(_) => PyValueError::new_err(error.to_string()),
            Error::Sequence { .. } | Error::EigenvaluesError(_) => {
                PyRuntimeError::new_err(error.to_string())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn request(scale: f64) -> OrderRequest {
        OrderRequest {
            domain: Domain::Digital,
            passband: vec![10.0],
            stopband: vec![100.0],
            gpass: 1.0,
            gstop: 80.0,
            scale,
        }
    }

    #[test]
    fn scaled_specification() {
        let request = request(2.0 / 500.0);
        let spec = request.spec::<f64>(FilterFamily::ChebyshevI).unwrap();
        assert_eq!(spec.passband(), Edges::Single(0.04));
        assert_eq!(spec.ripple(), Some(1.0));
        let spec = request.spec::<f64>(FilterFamily::Butterworth).unwrap();
        assert_eq!(spec.ripple(), None);
        let spec = request.spec::<BigFloat>(FilterFamily::Elliptic).unwrap();
        assert_eq!(spec.ripple().map(|r| Convf64::to_f64(&r)), Some(1.0));
    }

    #[test]
    fn orders_in_both_precisions() {
        let request = request(2.0 / 500.0);
        let (order, _) = request
            .select(FilterFamily::Butterworth, Target::Stopband, false)
            .unwrap();
        assert_eq!(order, 5);
        let (order, _) = request
            .select(FilterFamily::Butterworth, Target::Stopband, true)
            .unwrap();
        assert_eq!(order, 5);
    }
}
