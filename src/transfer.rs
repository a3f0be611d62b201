use crate::{
    polynomial::zpk2tf,
    types::{TransferFunction, Zpk},
};
use num_traits::Float;

/// Transfer function builder.
///
/// Converts a zero-pole-gain representation into numerator and denominator
/// polynomial coefficients. Filters are always synthesized in zero-pole-gain
/// form and converted at the end, since the coefficients of high order
/// filters are very sensitive to rounding.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TransferFunctionBuilder;

impl TransferFunctionBuilder {
    /// Builds the transfer function of `zpk`.
    ///
    /// The denominator is monic. For digital filters both polynomials have
    /// the same length and are in powers of `z^{-1}`.
    pub fn build<T: Float>(zpk: &Zpk<T>) -> TransferFunction<T> {
        let tf = zpk2tf(zpk);
        tracing::debug!(
            numerator = tf.b.len(),
            denominator = tf.a.len(),
            "built transfer function"
        );
        tf
    }
}
