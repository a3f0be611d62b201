use crate::error::{Error, InvalidParameter, Result};
use num_complex::Complex;
use num_traits::Float;
use std::{fmt, str::FromStr};

/// Frequency edges.
///
/// Passband and stopband edges, as well as critical frequencies, are either a
/// single frequency (lowpass, highpass and allpass filters) or an ordered
/// pair of frequencies (bandpass and bandstop filters).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Edges<T> {
    /// A single frequency.
    Single(T),
    /// A pair of frequencies.
    Pair(T, T),
}

impl<T> Edges<T> {
    /// Returns true if the edges are a pair.
    pub fn is_pair(&self) -> bool {
        matches!(self, Edges::Pair(..))
    }

    /// Returns true if both edges have the same shape.
    pub fn same_shape<U>(&self, other: &Edges<U>) -> bool {
        self.is_pair() == other.is_pair()
    }
}

impl<T: Copy> Edges<T> {
    /// Returns the first (or only) frequency.
    pub fn first(&self) -> T {
        match *self {
            Edges::Single(x) | Edges::Pair(x, _) => x,
        }
    }

    /// Returns the frequencies as a vector.
    pub fn to_vec(&self) -> Vec<T> {
        match *self {
            Edges::Single(x) => vec![x],
            Edges::Pair(x, y) => vec![x, y],
        }
    }

    /// Applies a function to each frequency, keeping the shape.
    pub fn map<U, F: FnMut(T) -> U>(&self, mut f: F) -> Edges<U> {
        match *self {
            Edges::Single(x) => Edges::Single(f(x)),
            Edges::Pair(x, y) => Edges::Pair(f(x), f(y)),
        }
    }

    /// Applies a fallible function to each frequency, keeping the shape.
    pub fn try_map<U, F: FnMut(T) -> Result<U>>(&self, mut f: F) -> Result<Edges<U>> {
        Ok(match *self {
            Edges::Single(x) => Edges::Single(f(x)?),
            Edges::Pair(x, y) => Edges::Pair(f(x)?, f(y)?),
        })
    }
}

impl<T: Float> Edges<T> {
    /// Builds edges from a slice containing one or two frequencies.
    ///
    /// Other lengths are rejected with
    /// [`InvalidParameter::ShapeMismatch`].
    pub fn from_slice(values: &[T]) -> Result<Edges<T>> {
        match *values {
            [x] => Ok(Edges::Single(x)),
            [x, y] => Ok(Edges::Pair(x, y)),
            _ => Err(InvalidParameter::ShapeMismatch.into()),
        }
    }

    /// Checks that all frequencies are finite and strictly positive.
    pub(crate) fn check_positive(&self) -> Result<()> {
        for x in self.to_vec() {
            if !x.is_finite() {
                return Err(InvalidParameter::NonFinite("frequency").into());
            }
            if x <= T::zero() {
                return Err(InvalidParameter::NonPositiveFrequency.into());
            }
        }
        Ok(())
    }
}

impl<T> From<T> for Edges<T> {
    fn from(value: T) -> Edges<T> {
        Edges::Single(value)
    }
}

impl<T> From<[T; 2]> for Edges<T> {
    fn from([x, y]: [T; 2]) -> Edges<T> {
        Edges::Pair(x, y)
    }
}

impl<T> From<(T, T)> for Edges<T> {
    fn from((x, y): (T, T)) -> Edges<T> {
        Edges::Pair(x, y)
    }
}

/// Design domain.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Domain {
    /// Continuous-time design. Frequencies are worked in rad/s.
    Analog,
    /// Sampled design. Frequencies are worked as fractions of the Nyquist
    /// frequency.
    Digital,
}

impl Domain {
    /// Returns true for the analog domain.
    pub fn is_analog(self) -> bool {
        self == Domain::Analog
    }
}

/// Shape of the frequency response.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FilterKind {
    /// Lowpass filter.
    Lowpass,
    /// Highpass filter.
    Highpass,
    /// Bandpass filter.
    Bandpass,
    /// Bandstop filter.
    Bandstop,
    /// Allpass filter (passband and stopband edges coincide).
    Allpass,
}

impl FilterKind {
    /// Returns true for the band-shaped kinds, which use a pair of
    /// frequencies.
    pub fn is_band(self) -> bool {
        matches!(self, FilterKind::Bandpass | FilterKind::Bandstop)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FilterKind::Lowpass => "lowpass",
            FilterKind::Highpass => "highpass",
            FilterKind::Bandpass => "bandpass",
            FilterKind::Bandstop => "bandstop",
            FilterKind::Allpass => "allpass",
        })
    }
}

impl FromStr for FilterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<FilterKind> {
        match s {
            "lowpass" => Ok(FilterKind::Lowpass),
            "highpass" => Ok(FilterKind::Highpass),
            "bandpass" => Ok(FilterKind::Bandpass),
            "bandstop" => Ok(FilterKind::Bandstop),
            "allpass" => Ok(FilterKind::Allpass),
            _ => Err(InvalidParameter::UnknownKind(s.to_string()).into()),
        }
    }
}

/// Classical filter family.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FilterFamily {
    /// Butterworth (maximally flat) filter.
    Butterworth,
    /// Chebyshev type I filter (equiripple passband).
    ChebyshevI,
    /// Chebyshev type II filter (equiripple stopband).
    ChebyshevII,
    /// Elliptic (Cauer) filter.
    Elliptic,
    /// Bessel (maximally flat group delay) filter.
    Bessel,
}

impl fmt::Display for FilterFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FilterFamily::Butterworth => "Butterworth",
            FilterFamily::ChebyshevI => "Chebyshev I",
            FilterFamily::ChebyshevII => "Chebyshev II",
            FilterFamily::Elliptic => "elliptic",
            FilterFamily::Bessel => "Bessel",
        })
    }
}

impl FromStr for FilterFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<FilterFamily> {
        match s.to_ascii_lowercase().as_str() {
            "butter" | "butterworth" => Ok(FilterFamily::Butterworth),
            "cheby1" | "chebyshev1" | "chebyshev_i" => Ok(FilterFamily::ChebyshevI),
            "cheby2" | "chebyshev2" | "chebyshev_ii" => Ok(FilterFamily::ChebyshevII),
            "ellip" | "elliptic" | "elliptical" | "cauer" => Ok(FilterFamily::Elliptic),
            "bessel" => Ok(FilterFamily::Bessel),
            _ => Err(InvalidParameter::UnknownFamily(s.to_string()).into()),
        }
    }
}

/// Band edge at which the designed filter meets its attenuation exactly.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Target {
    /// Exact attenuation at the passband edge (textbook convention).
    Passband,
    /// Exact attenuation at the stopband edge.
    Stopband,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Target::Passband => "passband",
            Target::Stopband => "stopband",
        })
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Target> {
        match s {
            "passband" => Ok(Target::Passband),
            "stopband" => Ok(Target::Stopband),
            _ => Err(InvalidParameter::UnknownTarget(s.to_string()).into()),
        }
    }
}

/// Order and critical frequency of a filter.
///
/// The critical frequency `wn` is given in the same units as the
/// [`NormalizedSpec`](crate::NormalizedSpec) it was computed from: rad/s for
/// analog designs and fractions of the Nyquist frequency for digital designs.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DesignResult<T> {
    /// Filter order.
    ///
    /// An order of zero indicates a degenerate specification (for instance
    /// coincident passband and stopband edges). Such a result cannot be
    /// synthesized.
    pub order: usize,
    /// Critical frequency.
    pub wn: Edges<T>,
}

impl<T> DesignResult<T> {
    /// Returns true if the order is at least one.
    pub fn is_usable(&self) -> bool {
        self.order >= 1
    }
}

/// Zero-pole-gain representation of a transfer function.
#[derive(Debug, Clone, PartialEq)]
pub struct Zpk<T> {
    /// Zeros of the transfer function.
    pub zeros: Vec<Complex<T>>,
    /// Poles of the transfer function.
    pub poles: Vec<Complex<T>>,
    /// Gain of the transfer function.
    pub gain: T,
}

impl<T> Zpk<T> {
    /// Returns the number of poles minus the number of zeros.
    pub fn relative_degree(&self) -> usize {
        self.poles.len().saturating_sub(self.zeros.len())
    }
}

/// Transfer function polynomial coefficients.
///
/// Both polynomials are given in decreasing powers of `s` (analog) or
/// `z^{-1}` (digital), and `a[0]` is one.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction<T> {
    /// Numerator coefficients.
    pub b: Vec<T>,
    /// Denominator coefficients.
    pub a: Vec<T>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn edge_shapes() {
        let single = Edges::Single(1.0);
        let pair = Edges::Pair(1.0, 2.0);
        assert!(!single.is_pair());
        assert!(pair.is_pair());
        assert!(pair.same_shape(&Edges::Pair("low".to_string(), "high".to_string())));
        assert!(!single.same_shape(&Edges::Pair(vec![1u8], vec![2u8])));
        assert!(Edges::Single(String::new()).same_shape(&single));
        assert_eq!(pair.map(|x| 2.0 * x), Edges::Pair(2.0, 4.0));
        assert_eq!(pair.to_vec(), vec![1.0, 2.0]);
    }
}
