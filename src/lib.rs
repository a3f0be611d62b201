//! # IIR filter order selection and synthesis
//!
//! The [`iir_design`](crate) crate computes the order and critical frequency
//! of classical IIR filters (Butterworth, Chebyshev I and II, elliptic and
//! Bessel) from a frequency-domain specification, and synthesizes the
//! resulting filters as zeros, poles and gain or as transfer function
//! coefficients. Analog and digital (bilinear transform) designs are
//! supported, for lowpass, highpass, bandpass and bandstop filters.
//!
//! Besides the textbook order selection, in which the filter meets its
//! passband attenuation exactly and has some excess attenuation in the
//! stopband, the Butterworth family supports order selection that meets the
//! stopband attenuation exactly, leaving the design margin in the
//! passband. This is selected with [`Target::Stopband`].
//!
//! All the calculations are generic over any scalar that implements the
//! [`Float`](num_traits::Float) and [`FloatConst`](num_traits::FloatConst)
//! traits, which includes
//! [`num-bigfloat`](https://docs.rs/num-bigfloat/latest/num_bigfloat/).
//!
//! ## Examples
//!
//! The main entry point is [`FilterSession`], which carries a filter
//! through the design stages. The following designs a digital Butterworth
//! lowpass filter that has exactly 80 dB of attenuation at its stopband edge.
//!
//! ```
//! # #[cfg(any(feature = "lapack-backend", feature = "faer-backend", feature = "nalgebra-backend"))]
//! # fn main() -> Result<(), iir_design::error::Error> {
//! use iir_design::{
//!     Domain, Extras, FilterFamily, FilterKind, FilterSession, FilterSpecification,
//!     SpecificationBuilder, Target,
//! };
//! let mut spec = FilterSpecification::new(10.0, 100.0, 1.0, 80.0)?;
//! spec.set_sample_rate(500.0)?;
//! let mut session = FilterSession::new();
//! session.configure(&spec, Domain::Digital)?;
//! assert_eq!(session.classify()?, FilterKind::Lowpass);
//! let design = session.select_order(FilterFamily::Butterworth, Target::Stopband)?;
//! assert_eq!(design.order, 5);
//! session.synthesize(FilterFamily::Butterworth, &Extras::new())?;
//! let tf = session.build_transfer_function()?;
//! assert_eq!(tf.a.len(), 6);
//! # Ok(())
//! # }
//! # #[cfg(not(any(feature = "lapack-backend", feature = "faer-backend", feature = "nalgebra-backend")))]
//! # fn main() {}
//! ```
//!
//! The stages can also be used on their own. Order selection only needs a
//! [`NormalizedSpec`], whose frequencies are given in rad/s (analog) or as
//! fractions of the Nyquist frequency (digital), and an [`OrderSelector`].
//!
//! ```
//! # fn main() -> Result<(), iir_design::error::Error> {
//! use iir_design::{Domain, FilterFamily, FilterKind, NormalizedSpec, OrderSelector, Target};
//! let spec = NormalizedSpec::from_normalized(Domain::Digital, [0.2, 0.5], [0.1, 0.6], 1.0, 40.0)?;
//! assert_eq!(spec.kind(), FilterKind::Bandpass);
//! let selector = OrderSelector::new();
//! let passband = selector.select_order(&spec, FilterFamily::Butterworth, Target::Passband)?;
//! let stopband = selector.select_order(&spec, FilterFamily::Butterworth, Target::Stopband)?;
//! assert_eq!(passband.order, stopband.order);
//! # Ok(())
//! # }
//! ```
//!
//! ## Building
//!
//! The poles of Bessel filters are the roots of a polynomial, which are found
//! as the eigenvalues of its companion matrix. Eigenvalues are computed by
//! one of several backends, selected with feature flags. See
//! [`EigenvalueBackend`] for more details. By default, only the faer backend
//! is enabled, which is a pure Rust implementation.
//!
//! The LAPACK backend uses `ndarray_linalg`. It is enabled with the
//! `lapack-backend` feature flag, together with exactly one of the flags that
//! select the LAPACK implementation: `openblas-static`, `openblas-system`,
//! `netlib-static`, `netlib-system`, `intel-mkl-static` and
//! `intel-mkl-system`. The `-static` versions link statically against the
//! library, and the `-system` versions link against a system-installed
//! library.
//!
//! The `python` feature flag builds the Python bindings.
//!
//! ## References
//!
//! \[1\] A. V. Oppenheim and R. W. Schafer, "Discrete-Time Signal
//! Processing", 3rd ed. Pearson, 2010.
//!
//! \[2\] S. J. Orfanidis, "Lecture Notes on Elliptic Filter Design", Rutgers
//! University, 2006.
//!
//! \[3\] R. P. Brent, "Algorithms for Minimization Without Derivatives",
//! Prentice-Hall, 1973.
//!
//! \[4\] B.N. Parlett and C. Reinsch, "Balancing a matrix for calculation of
//! eigenvalues and eigenvectors". Numer. Math. 13, 293–304 (1969).
//!

#![warn(missing_docs)]

mod band_edge;
pub use band_edge::{BandEdgeOptimizer, FilterShape, NaturalRatio, OrderObjective};
pub mod classical;
mod classify;
pub use classify::classify;
mod convf64;
pub use convf64::Convf64;
mod dispatch;
pub use dispatch::{DispatcherBuilder, Extra, Extras, PrototypeDispatcher};
mod eigenvalues;
#[cfg(any(
    feature = "faer-backend",
    feature = "lapack-backend",
    feature = "nalgebra-backend"
))]
pub use eigenvalues::DefaultEigenvalueBackend;
#[cfg(feature = "faer-backend")]
pub use eigenvalues::FaerBackend;
#[cfg(feature = "lapack-backend")]
pub use eigenvalues::LapackBackend;
#[cfg(feature = "nalgebra-backend")]
pub use eigenvalues::NalgebraBackend;
pub use eigenvalues::{EigenvalueBackend, EigenvaluesError};
pub mod error;
mod family;
pub use family::{Bessel, Butterworth, ChebyshevI, ChebyshevII, Elliptic, FamilyStrategy};
#[cfg(feature = "lapack-backend")]
mod lapack;
#[cfg(feature = "lapack-backend")]
pub use lapack::{IsLapack, ToLapack};
mod minimize;
pub use minimize::{BoundedMinimizer, Minimum};
mod normalize;
pub use normalize::{NormalizedSpec, normalize, normalize_edges, prewarp, unwarp};
mod order;
pub use order::{OrderSelector, SelectorBuilder};
pub mod polynomial;
pub use polynomial::{CompanionRootFinder, RootFinder};
#[cfg(all(
    feature = "python",
    any(
        feature = "faer-backend",
        feature = "lapack-backend",
        feature = "nalgebra-backend"
    )
))]
mod python;
pub mod response;
mod session;
pub use session::{FilterSession, SessionState};
mod spec;
pub use spec::{FilterSpecification, SpecificationBuilder};
mod transfer;
pub use transfer::TransferFunctionBuilder;
mod types;
pub use types::{
    DesignResult, Domain, Edges, FilterFamily, FilterKind, Target, TransferFunction, Zpk,
};
