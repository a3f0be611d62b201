//! Error types used by `iir_design`.

use crate::types::{FilterFamily, FilterKind, Target};
use thiserror::Error;

/// `iir_design` `Result` type.
pub type Result<T> = core::result::Result<T, Error>;

/// `iir_design` error.
///
/// This enum represents all the errors that can be produced by `iir_design`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A parameter is malformed or out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(InvalidParameter),
    /// The band edges are structurally valid but do not describe a filter.
    ///
    /// This is produced when a pair of passband edges and a pair of stopband
    /// edges are not nested one inside the other.
    #[error("meaningless filter: passband and stopband edges are not nested")]
    MeaninglessFilter,
    /// A stage of a [`FilterSession`](crate::FilterSession) was invoked before
    /// the stage it depends on had succeeded.
    #[error("{operation} requires {prerequisite} to be run first")]
    Sequence {
        /// Operation that was invoked.
        operation: &'static str,
        /// Operation that needs to succeed first.
        prerequisite: &'static str,
    },
    /// There is no algorithm for this combination of filter family and target.
    #[error("{family} filters do not support the {target} target")]
    UnsupportedFamily {
        /// Filter family.
        family: FilterFamily,
        /// Requested target.
        target: Target,
    },
    /// There is no lowpass prototype for this filter kind.
    #[error("cannot synthesize a {0} filter")]
    UnsupportedKind(FilterKind),
    /// An error happened during the computation of eigenvalues.
    ///
    /// Eigenvalues are computed to find the roots of polynomials, for
    /// instance the poles of Bessel prototypes. This error is typically
    /// produced by the eigenvalue backend.
    #[error("unable to compute eigenvalues: {0}")]
    EigenvaluesError(String),
}

/// Invalid parameter error.
///
/// This enum classifies the ways in which a parameter can be invalid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidParameter {
    /// A frequency is zero or negative.
    #[error("frequencies must be strictly positive")]
    NonPositiveFrequency,
    /// A value is NaN or infinite.
    #[error("{0} must be a finite number")]
    NonFinite(&'static str),
    /// The passband and stopband frequencies do not have the same shape.
    #[error("passband and stopband frequencies must be both scalars or both pairs")]
    ShapeMismatch,
    /// A frequency pair is not in ascending order.
    #[error("frequency pairs must be in ascending order")]
    UnorderedPair,
    /// A digital frequency is at or above the Nyquist frequency.
    #[error("digital frequencies must be below the Nyquist frequency")]
    AboveNyquist,
    /// A digital design was requested without a sample rate.
    #[error("a sample rate is required for digital designs")]
    MissingSampleRate,
    /// The sample rate is zero or negative.
    #[error("the sample rate must be strictly positive")]
    NonPositiveSampleRate,
    /// The passband attenuation is negative.
    #[error("the passband attenuation must be non-negative")]
    NegativePassbandAttenuation,
    /// The stopband attenuation is zero or negative.
    #[error("the stopband attenuation must be strictly positive")]
    NonPositiveStopbandAttenuation,
    /// The attenuations cannot be used for order selection.
    #[error("order selection requires 0 < passband attenuation < stopband attenuation")]
    AttenuationOrder,
    /// The ripple is zero or negative.
    #[error("the ripple must be strictly positive")]
    NonPositiveRipple,
    /// A family-specific extra parameter is missing.
    #[error("the {family} family requires the {extra} parameter")]
    MissingExtra {
        /// Filter family that requires the parameter.
        family: FilterFamily,
        /// Name of the missing parameter.
        extra: &'static str,
    },
    /// A family-specific extra parameter is zero or negative.
    #[error("the {0} parameter must be strictly positive")]
    NonPositiveExtra(&'static str),
    /// The target is not one of the recognized values.
    #[error("unknown target {0:?}, expected \"passband\" or \"stopband\"")]
    UnknownTarget(String),
    /// The filter family name is not recognized.
    #[error("unknown filter family {0:?}")]
    UnknownFamily(String),
    /// The filter kind name is not recognized.
    #[error("unknown filter kind {0:?}")]
    UnknownKind(String),
    /// The filter order is zero.
    #[error("the filter order must be at least 1")]
    ZeroOrder,
    /// The critical frequency shape does not match the filter kind.
    #[error("a {0} filter needs {1} critical frequency")]
    CriticalFrequencyShape(FilterKind, &'static str),
    /// The search bracket of a bounded minimization is empty.
    #[error("the lower bound of the search bracket is greater than the upper bound")]
    EmptyBracket,
}

impl From<InvalidParameter> for Error {
    fn from(value: InvalidParameter) -> Error {
        Error::InvalidParameter(value)
    }
}
