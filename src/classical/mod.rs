//! Classical IIR filter design.
//!
//! This module contains the building blocks used to design Butterworth,
//! Chebyshev, elliptic and Bessel filters: order selection functions, analog
//! lowpass prototypes, frequency transformations, and the elliptic functions
//! that the elliptic family requires.

pub mod elliptic;
pub mod order;
pub mod prototype;
pub mod transform;

pub use order::{buttord, cheb1ord, cheb2ord, ellipord};
pub use prototype::{besselap, buttap, cheb1ap, cheb2ap, ellipap};
pub use transform::{bilinear, lp2bp, lp2bs, lp2hp, lp2lp};
