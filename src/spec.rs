use crate::{
    error::{InvalidParameter, Result},
    types::Edges,
};
use num_traits::Float;

/// Frequency-domain filter specification.
///
/// The specification defines the passband and stopband edges, in Hz, and the
/// maximum loss in the passband and minimum rejection in the stopband, in
/// dB. The passband and stopband edges must have the same shape: both single
/// frequencies (lowpass and highpass filters) or both pairs (bandpass and
/// bandstop filters).
///
/// The ripple (required by the Chebyshev I and elliptic families) and the
/// sample rate (required by digital designs) are optional and can be set with
/// the methods of the [`SpecificationBuilder`] trait.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FilterSpecification<T> {
    passband_frequency: Edges<T>,
    stopband_frequency: Edges<T>,
    passband_attenuation: T,
    stopband_attenuation: T,
    ripple: Option<T>,
    sample_rate: Option<T>,
}

impl<T: Float> FilterSpecification<T> {
    /// Creates a new filter specification.
    ///
    /// The passband and stopband frequencies are given in Hz and must be
    /// finite and strictly positive, with the same shape. The passband
    /// attenuation must be non-negative and the stopband attenuation strictly
    /// positive, both in dB.
    pub fn new(
        passband_frequency: impl Into<Edges<T>>,
        stopband_frequency: impl Into<Edges<T>>,
        passband_attenuation: T,
        stopband_attenuation: T,
    ) -> Result<FilterSpecification<T>> {
        let passband_frequency = passband_frequency.into();
        let stopband_frequency = stopband_frequency.into();
        if !passband_frequency.same_shape(&stopband_frequency) {
            return Err(InvalidParameter::ShapeMismatch.into());
        }
        passband_frequency.check_positive()?;
        stopband_frequency.check_positive()?;
        if !passband_attenuation.is_finite() {
            return Err(InvalidParameter::NonFinite("passband attenuation").into());
        }
        if passband_attenuation < T::zero() {
            return Err(InvalidParameter::NegativePassbandAttenuation.into());
        }
        if !stopband_attenuation.is_finite() {
            return Err(InvalidParameter::NonFinite("stopband attenuation").into());
        }
        if stopband_attenuation <= T::zero() {
            return Err(InvalidParameter::NonPositiveStopbandAttenuation.into());
        }
        Ok(FilterSpecification {
            passband_frequency,
            stopband_frequency,
            passband_attenuation,
            stopband_attenuation,
            ripple: None,
            sample_rate: None,
        })
    }
}

impl<T: Copy> FilterSpecification<T> {
    /// Returns the passband edge frequencies, in Hz.
    pub fn passband_frequency(&self) -> Edges<T> {
        self.passband_frequency
    }

    /// Returns the stopband edge frequencies, in Hz.
    pub fn stopband_frequency(&self) -> Edges<T> {
        self.stopband_frequency
    }

    /// Returns the maximum passband loss, in dB.
    pub fn passband_attenuation(&self) -> T {
        self.passband_attenuation
    }

    /// Returns the minimum stopband rejection, in dB.
    pub fn stopband_attenuation(&self) -> T {
        self.stopband_attenuation
    }

    /// Returns the passband ripple, in dB, if it has been set.
    pub fn ripple(&self) -> Option<T> {
        self.ripple
    }

    /// Returns the sample rate, in Hz, if it has been set.
    pub fn sample_rate(&self) -> Option<T> {
        self.sample_rate
    }
}

/// Filter specification setter trait.
///
/// This trait allows the optional fields of a [`FilterSpecification`] to be
/// set. The setters validate their argument and return the specification so
/// that calls can be chained with `?`.
pub trait SpecificationBuilder<T> {
    /// Sets the passband ripple, in dB.
    ///
    /// The ripple must be finite and strictly positive. It is required by the
    /// Chebyshev I and elliptic families.
    fn set_ripple(&mut self, ripple: T) -> Result<&mut Self>;

    /// Sets the sample rate, in Hz.
    ///
    /// The sample rate must be finite and strictly positive. It is required
    /// for digital designs.
    fn set_sample_rate(&mut self, sample_rate: T) -> Result<&mut Self>;
}

impl<T: Float> SpecificationBuilder<T> for FilterSpecification<T> {
    fn set_ripple(&mut self, ripple: T) -> Result<&mut Self> {
        if !ripple.is_finite() {
            return Err(InvalidParameter::NonFinite("ripple").into());
        }
        if ripple <= T::zero() {
            return Err(InvalidParameter::NonPositiveRipple.into());
        }
        self.ripple = Some(ripple);
        Ok(self)
    }

    fn set_sample_rate(&mut self, sample_rate: T) -> Result<&mut Self> {
        if !sample_rate.is_finite() {
            return Err(InvalidParameter::NonFinite("sample rate").into());
        }
        if sample_rate <= T::zero() {
            return Err(InvalidParameter::NonPositiveSampleRate.into());
        }
        self.sample_rate = Some(sample_rate);
        Ok(self)
    }
}
