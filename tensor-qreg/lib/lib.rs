//! Tools for benchmarking random ("chaotic") circuits and quantum Fourier
//! transforms on registers of qubits, simulated either as bond-truncated
//! matrix product states or as dense statevectors.
//!
//! The matrix product side represents register states as chains of rank-3
//! site tensors ([`mps::Mps`]) and circuit layers as chains of rank-4 site
//! tensors ([`mpo::Mpo`]), with index identity tracked through explicit
//! priming tags ([`site::Q`]). The [`circuit`] module holds the benchmark
//! drivers proper: brick-wall random-circuit construction, reusable layer
//! sequences, and a staged evaluator for deep sandwiched overlaps. The
//! [`statevector`] module is the dense comparison engine.

use num_complex::{ ComplexFloat, Complex };
use num_traits::{ Float, Zero };

pub mod site;
pub mod gate;
pub mod mps;
pub mod mpo;
pub mod circuit;
pub mod statevector;

/// Extension trait for [`ComplexFloat`].
pub trait ComplexFloatExt: ComplexFloat {
    /// Return the imaginary unit, *i*.
    fn i() -> Self;

    /// Convert from `Self::Real`.
    ///
    /// Should adhere to the usual relationship between ordinary complex and
    /// real numbers, i.e. the result should have imaginary part equal to zero.
    fn from_re(x: Self::Real) -> Self;

    /// Construct from real and imaginary components.
    fn from_components(re: Self::Real, im: Self::Real) -> Self;

    /// Create a new value of unit magnitude with a given phase angle.
    fn cis(angle: Self::Real) -> Self;
}

impl<T> ComplexFloatExt for Complex<T>
where
    Complex<T>: ComplexFloat<Real = T>,
    T: Zero + Float,
{
    fn i() -> Self { Complex::i() }

    fn from_re(x: Self::Real) -> Self {
        Self { re: x, im: <Self::Real as Zero>::zero() }
    }

    fn from_components(re: Self::Real, im: Self::Real) -> Self {
        Self { re, im }
    }

    fn cis(angle: Self::Real) -> Self { Complex::cis(angle) }
}
