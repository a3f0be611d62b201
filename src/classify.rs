use crate::{
    error::{Error, InvalidParameter, Result},
    types::{Edges, FilterKind},
};
use num_traits::Float;

/// Classifies a filter from its passband and stopband edges.
///
/// The edges must have the same shape and all frequencies must be finite
/// and strictly positive. They can be given in any units, as long as both
/// use the same ones.
///
/// - Single frequencies: `pb < sb` is a lowpass, `pb > sb` is a highpass and
///   `pb == sb` is an allpass.
///
/// - Pairs: a passband nested inside the stopband (`pb0 > sb0` and
///   `pb1 < sb1`) is a bandpass, and a stopband nested inside the passband
///   (`pb0 < sb0` and `pb1 > sb1`) is a bandstop. Any other combination
///   produces [`Error::MeaninglessFilter`].
pub fn classify<T: Float>(passband: &Edges<T>, stopband: &Edges<T>) -> Result<FilterKind> {
    passband.check_positive()?;
    stopband.check_positive()?;
    let kind = match (*passband, *stopband) {
        (Edges::Single(pb), Edges::Single(sb)) => {
            if pb < sb {
                FilterKind::Lowpass
            } else if pb > sb {
                FilterKind::Highpass
            } else {
                FilterKind::Allpass
            }
        }
        (Edges::Pair(pb0, pb1), Edges::Pair(sb0, sb1)) => {
            if pb0 > sb0 && pb1 < sb1 {
                FilterKind::Bandpass
            } else if pb0 < sb0 && pb1 > sb1 {
                FilterKind::Bandstop
            } else {
                return Err(Error::MeaninglessFilter);
            }
        }
        _ => return Err(InvalidParameter::ShapeMismatch.into()),
    };
    tracing::debug!(%kind, "classified filter");
    Ok(kind)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scalar_kinds() {
        assert_eq!(
            classify(&Edges::Single(10.0), &Edges::Single(100.0)),
            Ok(FilterKind::Lowpass)
        );
        assert_eq!(
            classify(&Edges::Single(100.0), &Edges::Single(10.0)),
            Ok(FilterKind::Highpass)
        );
        assert_eq!(
            classify(&Edges::Single(5.0), &Edges::Single(5.0)),
            Ok(FilterKind::Allpass)
        );
    }

    #[test]
    fn band_kinds() {
        assert_eq!(
            classify(&Edges::Pair(1.0, 2.0), &Edges::Pair(0.1, 5.0)),
            Ok(FilterKind::Bandpass)
        );
        assert_eq!(
            classify(&Edges::Pair(1.0, 7.0), &Edges::Pair(2.0, 6.0)),
            Ok(FilterKind::Bandstop)
        );
    }

    #[test]
    fn meaningless() {
        for (pb, sb) in [
            ((6.0, 1.0), (6.0, 6.0)),
            ((1.0, 6.0), (2.0, 7.0)),
            ((2.0, 5.0), (1.0, 5.0)),
            ((1.0, 2.0), (3.0, 4.0)),
        ] {
            assert_eq!(
                classify(&Edges::Pair(pb.0, pb.1), &Edges::Pair(sb.0, sb.1)),
                Err(Error::MeaninglessFilter)
            );
        }
    }

    #[test]
    fn invalid() {
        assert_eq!(
            classify(&Edges::Single(1.0), &Edges::Pair(1.0, 2.0)),
            Err(InvalidParameter::ShapeMismatch.into())
        );
        assert_eq!(
            classify(&Edges::Single(-1.0), &Edges::Single(2.0)),
            Err(InvalidParameter::NonPositiveFrequency.into())
        );
        assert_eq!(
            classify(&Edges::Single(f64::NAN), &Edges::Single(2.0)),
            Err(InvalidParameter::NonFinite("frequency").into())
        );
    }

    #[test]
    fn totality() {
        let values = [0.01, 0.5, 1.0, 2.0, 3.5, 10.0, 1e4];
        for &pb in &values {
            for &sb in &values {
                let kind = classify(&Edges::Single(pb), &Edges::Single(sb)).unwrap();
                assert!(matches!(
                    kind,
                    FilterKind::Lowpass | FilterKind::Highpass | FilterKind::Allpass
                ));
            }
        }
        for &a in &values {
            for &b in &values {
                for &c in &values {
                    for &d in &values {
                        let nested = (a > c && b < d) || (a < c && b > d);
                        match classify(&Edges::Pair(a, b), &Edges::Pair(c, d)) {
                            Ok(kind) => {
                                assert!(nested);
                                assert!(kind.is_band());
                            }
                            Err(e) => {
                                assert!(!nested);
                                assert_eq!(e, Error::MeaninglessFilter);
                            }
                        }
                    }
                }
            }
        }
    }
}
