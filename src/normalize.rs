//! Frequency normalization.
//!
//! Specifications are given in Hz. Order selection works in rad/s for analog
//! designs and in fractions of the Nyquist frequency for digital designs. The
//! functions in this module convert between these units and implement the
//! tangent pre-warping used to run analog order formulas on digital edges.

use crate::{
    classify::classify,
    error::{InvalidParameter, Result},
    spec::FilterSpecification,
    types::{Domain, Edges, FilterKind},
};
use num_traits::{Float, FloatConst};

/// Filter specification in the working units of the order selection
/// algorithms.
///
/// Frequencies are in rad/s for [`Domain::Analog`] and in fractions of the
/// Nyquist frequency for [`Domain::Digital`]. Attenuations, ripple and sample
/// rate are carried over unchanged, and the filter kind is the classification
/// of the edges. A `NormalizedSpec` is only produced by [`normalize`] and is
/// never modified afterwards.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NormalizedSpec<T> {
    domain: Domain,
    kind: FilterKind,
    passband: Edges<T>,
    stopband: Edges<T>,
    passband_attenuation: T,
    stopband_attenuation: T,
    ripple: Option<T>,
    sample_rate: Option<T>,
}

impl<T: Copy> NormalizedSpec<T> {
    /// Returns the design domain.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Returns the filter kind.
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Returns the normalized passband edges.
    pub fn passband(&self) -> Edges<T> {
        self.passband
    }

    /// Returns the normalized stopband edges.
    pub fn stopband(&self) -> Edges<T> {
        self.stopband
    }

    /// Returns the maximum passband loss, in dB.
    pub fn passband_attenuation(&self) -> T {
        self.passband_attenuation
    }

    /// Returns the minimum stopband rejection, in dB.
    pub fn stopband_attenuation(&self) -> T {
        self.stopband_attenuation
    }

    /// Returns the passband ripple, in dB, if the specification had one.
    pub fn ripple(&self) -> Option<T> {
        self.ripple
    }

    /// Returns the sample rate, in Hz, if the specification had one.
    pub fn sample_rate(&self) -> Option<T> {
        self.sample_rate
    }
}

impl<T: Float + FloatConst> NormalizedSpec<T> {
    /// Creates a specification from edges that are already in the working
    /// units of `domain`.
    ///
    /// The edges and attenuations are validated as in
    /// [`FilterSpecification::new`] and classified. Digital edges must be
    /// below one (the Nyquist frequency).
    pub fn from_normalized(
        domain: Domain,
        passband: impl Into<Edges<T>>,
        stopband: impl Into<Edges<T>>,
        passband_attenuation: T,
        stopband_attenuation: T,
    ) -> Result<NormalizedSpec<T>> {
        let spec = FilterSpecification::new(
            passband,
            stopband,
            passband_attenuation,
            stopband_attenuation,
        )?;
        let passband = spec.passband_frequency();
        let stopband = spec.stopband_frequency();
        let kind = classify(&passband, &stopband)?;
        if domain == Domain::Digital
            && passband
                .to_vec()
                .into_iter()
                .chain(stopband.to_vec())
                .any(|x| x >= T::one())
        {
            return Err(InvalidParameter::AboveNyquist.into());
        }
        Ok(NormalizedSpec {
            domain,
            kind,
            passband,
            stopband,
            passband_attenuation,
            stopband_attenuation,
            ripple: None,
            sample_rate: None,
        })
    }

    /// Returns a copy of the specification with the given ripple, in dB.
    pub fn with_ripple(mut self, ripple: T) -> Result<NormalizedSpec<T>> {
        if !ripple.is_finite() {
            return Err(InvalidParameter::NonFinite("ripple").into());
        }
        if ripple <= T::zero() {
            return Err(InvalidParameter::NonPositiveRipple.into());
        }
        self.ripple = Some(ripple);
        Ok(self)
    }
}

/// Classifies a filter specification and converts it to the working units of
/// `domain`.
///
/// The classification is done as in [`classify`]. For analog designs every frequency is multiplied by `2*pi`. For digital
/// designs the specification must have a sample rate, every edge must be
/// below the Nyquist frequency, and the edges are divided by the Nyquist
/// frequency.
pub fn normalize<T: Float + FloatConst>(
    spec: &FilterSpecification<T>,
    domain: Domain,
) -> Result<NormalizedSpec<T>> {
    let kind = classify(&spec.passband_frequency(), &spec.stopband_frequency())?;
    let sample_rate = spec.sample_rate();
    let passband = normalize_edges(spec.passband_frequency(), domain, sample_rate)?;
    let stopband = normalize_edges(spec.stopband_frequency(), domain, sample_rate)?;
    tracing::debug!(?domain, %kind, "normalized edges");
    Ok(NormalizedSpec {
        domain,
        kind,
        passband,
        stopband,
        passband_attenuation: spec.passband_attenuation(),
        stopband_attenuation: spec.stopband_attenuation(),
        ripple: spec.ripple(),
        sample_rate,
    })
}

/// Converts frequencies in Hz to the working units of `domain`.
///
/// This is the conversion used by [`normalize`]. It is also used to convert
/// critical frequencies given directly by the caller.
pub fn normalize_edges<T: Float + FloatConst>(
    edges: Edges<T>,
    domain: Domain,
    sample_rate: Option<T>,
) -> Result<Edges<T>> {
    edges.check_positive()?;
    match domain {
        Domain::Analog => Ok(edges.map(|f| f * T::TAU())),
        Domain::Digital => {
            let sample_rate = sample_rate.ok_or(InvalidParameter::MissingSampleRate)?;
            let nyquist = sample_rate / T::from(2.0).unwrap();
            edges.try_map(|f| {
                if f >= nyquist {
                    Err(InvalidParameter::AboveNyquist.into())
                } else {
                    Ok(f / nyquist)
                }
            })
        }
    }
}

/// Pre-warps a frequency given as a fraction of the Nyquist frequency.
///
/// Returns `tan(pi * x / 2)`, which is the analog frequency that the bilinear
/// transform with a sample rate of 2 maps onto `x`.
pub fn prewarp<T: Float + FloatConst>(x: T) -> T {
    (T::FRAC_PI_2() * x).tan()
}

/// Inverse of [`prewarp`].
///
/// Returns `(2 / pi) * atan(w)`.
pub fn unwarp<T: Float + FloatConst>(w: T) -> T {
    w.atan() / T::FRAC_PI_2()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{error::Error, spec::SpecificationBuilder};
    use std::f64::consts::PI;

    #[test]
    fn analog_round_trip() {
        for f in [1e-3, 0.1, 1.0, 7.5, 100.0, 44100.0] {
            let normalized = normalize_edges(Edges::Single(f), Domain::Analog, None).unwrap();
            assert!((normalized.first() / (2.0 * PI) - f).abs() <= 1e-12 * f);
        }
        let spec = FilterSpecification::new([1.0, 7.0], [2.0, 6.0], 1.0, 80.0).unwrap();
        let normalized = normalize(&spec, Domain::Analog).unwrap();
        assert_eq!(normalized.passband(), Edges::Pair(2.0 * PI, 14.0 * PI));
        assert_eq!(normalized.stopband(), Edges::Pair(4.0 * PI, 12.0 * PI));
        assert_eq!(normalized.passband_attenuation(), 1.0);
        assert_eq!(normalized.stopband_attenuation(), 80.0);
        assert_eq!(normalized.kind(), FilterKind::Bandstop);
    }

    #[test]
    fn meaningless_edges() {
        let spec = FilterSpecification::new([6.0, 1.0], [6.0, 6.0], 1.0, 80.0).unwrap();
        assert_eq!(normalize(&spec, Domain::Analog), Err(Error::MeaninglessFilter));
    }

    #[test]
    fn digital() {
        let mut spec = FilterSpecification::new(10.0, 100.0, 1.0, 80.0).unwrap();
        assert_eq!(
            normalize(&spec, Domain::Digital),
            Err(InvalidParameter::MissingSampleRate.into())
        );
        spec.set_sample_rate(500.0).unwrap();
        let normalized = normalize(&spec, Domain::Digital).unwrap();
        assert_eq!(normalized.passband(), Edges::Single(0.04));
        assert_eq!(normalized.stopband(), Edges::Single(0.4));
        spec.set_sample_rate(200.0).unwrap();
        assert_eq!(
            normalize(&spec, Domain::Digital),
            Err(Error::InvalidParameter(InvalidParameter::AboveNyquist))
        );
    }

    #[test]
    fn already_normalized() {
        let spec =
            NormalizedSpec::from_normalized(Domain::Digital, [0.1, 0.2], [0.05, 0.3], 1.0, 40.0)
                .unwrap();
        assert_eq!(spec.kind(), FilterKind::Bandpass);
        assert_eq!(spec.sample_rate(), None);
        assert_eq!(
            NormalizedSpec::from_normalized(Domain::Digital, 0.5, 1.0, 1.0, 40.0),
            Err(InvalidParameter::AboveNyquist.into())
        );
        assert!(NormalizedSpec::from_normalized(Domain::Analog, 5.0, 1.0, 1.0, 40.0).is_ok());
        let spec = spec.with_ripple(0.5).unwrap();
        assert_eq!(spec.ripple(), Some(0.5));
    }

    #[test]
    fn prewarp_inverse() {
        for x in [0.001, 0.04, 0.25, 0.5, 0.9] {
            assert!((unwarp(prewarp(x)) - x).abs() < 1e-14);
        }
        assert!((prewarp(0.5) - 1.0).abs() < 1e-15);
    }
}
