//! Filter family strategies.
//!
//! Each classical family is a unit struct implementing [`FamilyStrategy`],
//! which bundles the order selection algorithm, the analog lowpass prototype
//! and the extra parameters that the prototype needs.
//! [`FilterFamily::strategy`] maps each family to its strategy.

use crate::{
    band_edge::BandEdgeOptimizer,
    classical::{
        besselap, buttap, buttord, cheb1ap, cheb1ord, cheb2ap, cheb2ord, ellipap, ellipord,
    },
    dispatch::{Extra, Extras},
    error::{Error, InvalidParameter, Result},
    normalize::NormalizedSpec,
    polynomial::RootFinder,
    types::{DesignResult, FilterFamily, Target, Zpk},
};
use num_traits::{Float, FloatConst};

/// Algorithms of a classical filter family.
pub trait FamilyStrategy<T> {
    /// Returns the family implemented by this strategy.
    fn family(&self) -> FilterFamily;

    /// Returns the extra parameters required by [`analog_prototype`].
    ///
    /// [`analog_prototype`]: FamilyStrategy::analog_prototype
    fn required_extras(&self) -> &'static [Extra];

    /// Selects the order and critical frequency of a filter of this family.
    fn compute_order(
        &self,
        optimizer: &BandEdgeOptimizer<T>,
        spec: &NormalizedSpec<T>,
        target: Target,
    ) -> Result<DesignResult<T>>;

    /// Returns the analog lowpass prototype of the given order.
    ///
    /// The `root_finder` is used by the families whose prototypes have no
    /// closed form.
    fn analog_prototype(
        &self,
        order: usize,
        extras: &Extras<T>,
        root_finder: &dyn RootFinder<T>,
    ) -> Result<Zpk<T>>;
}

impl FilterFamily {
    /// Returns the strategy that implements this family.
    pub fn strategy<T: Float + FloatConst + 'static>(self) -> Box<dyn FamilyStrategy<T>> {
        match self {
            FilterFamily::Butterworth => Box::new(Butterworth),
            FilterFamily::ChebyshevI => Box::new(ChebyshevI),
            FilterFamily::ChebyshevII => Box::new(ChebyshevII),
            FilterFamily::Elliptic => Box::new(Elliptic),
            FilterFamily::Bessel => Box::new(Bessel),
        }
    }
}

// Only the Butterworth family has a stopband-matched algorithm.
fn passband_only(family: FilterFamily, target: Target) -> Result<()> {
    match target {
        Target::Passband => Ok(()),
        Target::Stopband => Err(Error::UnsupportedFamily { family, target }),
    }
}

fn require_ripple<T: Copy>(family: FilterFamily, spec: &NormalizedSpec<T>) -> Result<()> {
    match spec.ripple() {
        Some(_) => Ok(()),
        None => Err(InvalidParameter::MissingExtra {
            family,
            extra: Extra::Ripple.name(),
        }
        .into()),
    }
}

/// Butterworth family.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Butterworth;

impl<T: Float + FloatConst> FamilyStrategy<T> for Butterworth {
    fn family(&self) -> FilterFamily {
        FilterFamily::Butterworth
    }

    fn required_extras(&self) -> &'static [Extra] {
        &[]
    }

    fn compute_order(
        &self,
        optimizer: &BandEdgeOptimizer<T>,
        spec: &NormalizedSpec<T>,
        target: Target,
    ) -> Result<DesignResult<T>> {
        match target {
            Target::Passband => buttord(optimizer, spec),
            Target::Stopband => optimizer.stopband_matched(spec),
        }
    }

    fn analog_prototype(
        &self,
        order: usize,
        _extras: &Extras<T>,
        _root_finder: &dyn RootFinder<T>,
    ) -> Result<Zpk<T>> {
        buttap(order)
    }
}

/// Chebyshev type I family.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct ChebyshevI;

impl<T: Float + FloatConst> FamilyStrategy<T> for ChebyshevI {
    fn family(&self) -> FilterFamily {
        FilterFamily::ChebyshevI
    }

    fn required_extras(&self) -> &'static [Extra] {
        &[Extra::Ripple]
    }

    fn compute_order(
        &self,
        optimizer: &BandEdgeOptimizer<T>,
        spec: &NormalizedSpec<T>,
        target: Target,
    ) -> Result<DesignResult<T>> {
        passband_only(FilterFamily::ChebyshevI, target)?;
        require_ripple(FilterFamily::ChebyshevI, spec)?;
        cheb1ord(optimizer, spec)
    }

    fn analog_prototype(
        &self,
        order: usize,
        extras: &Extras<T>,
        _root_finder: &dyn RootFinder<T>,
    ) -> Result<Zpk<T>> {
        cheb1ap(order, extras.require(FilterFamily::ChebyshevI, Extra::Ripple)?)
    }
}

/// Chebyshev type II family.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct ChebyshevII;

impl<T: Float + FloatConst> FamilyStrategy<T> for ChebyshevII {
    fn family(&self) -> FilterFamily {
        FilterFamily::ChebyshevII
    }

    fn required_extras(&self) -> &'static [Extra] {
        &[Extra::StopbandAttenuation]
    }

    fn compute_order(
        &self,
        optimizer: &BandEdgeOptimizer<T>,
        spec: &NormalizedSpec<T>,
        target: Target,
    ) -> Result<DesignResult<T>> {
        passband_only(FilterFamily::ChebyshevII, target)?;
        cheb2ord(optimizer, spec)
    }

    fn analog_prototype(
        &self,
        order: usize,
        extras: &Extras<T>,
        _root_finder: &dyn RootFinder<T>,
    ) -> Result<Zpk<T>> {
        let rs = extras.require(FilterFamily::ChebyshevII, Extra::StopbandAttenuation)?;
        cheb2ap(order, rs)
    }
}

/// Elliptic (Cauer) family.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Elliptic;

impl<T: Float + FloatConst> FamilyStrategy<T> for Elliptic {
    fn family(&self) -> FilterFamily {
        FilterFamily::Elliptic
    }

    fn required_extras(&self) -> &'static [Extra] {
        &[Extra::Ripple, Extra::StopbandAttenuation]
    }

    fn compute_order(
        &self,
        optimizer: &BandEdgeOptimizer<T>,
        spec: &NormalizedSpec<T>,
        target: Target,
    ) -> Result<DesignResult<T>> {
        passband_only(FilterFamily::Elliptic, target)?;
        require_ripple(FilterFamily::Elliptic, spec)?;
        ellipord(optimizer, spec)
    }

    fn analog_prototype(
        &self,
        order: usize,
        extras: &Extras<T>,
        _root_finder: &dyn RootFinder<T>,
    ) -> Result<Zpk<T>> {
        let rp = extras.require(FilterFamily::Elliptic, Extra::Ripple)?;
        let rs = extras.require(FilterFamily::Elliptic, Extra::StopbandAttenuation)?;
        ellipap(order, rp, rs)
    }
}

/// Bessel family.
///
/// There is no order formula for Bessel filters. The Butterworth order
/// formula matched at the passband is used instead.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Bessel;

impl<T: Float + FloatConst> FamilyStrategy<T> for Bessel {
    fn family(&self) -> FilterFamily {
        FilterFamily::Bessel
    }

    fn required_extras(&self) -> &'static [Extra] {
        &[]
    }

    fn compute_order(
        &self,
        optimizer: &BandEdgeOptimizer<T>,
        spec: &NormalizedSpec<T>,
        target: Target,
    ) -> Result<DesignResult<T>> {
        passband_only(FilterFamily::Bessel, target)?;
        buttord(optimizer, spec)
    }

    fn analog_prototype(
        &self,
        order: usize,
        _extras: &Extras<T>,
        root_finder: &dyn RootFinder<T>,
    ) -> Result<Zpk<T>> {
        besselap(order, root_finder)
    }
}
