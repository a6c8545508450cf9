//! Definitions of the one- and two-qubit gates applied by the benchmark
//! circuits.
//!
//! All matrices are written in the computational basis with the row index
//! as the output state. The random-circuit gate set is the fixed triple
//! {[`Sx`][RotGate::Sx], [`Sy`][RotGate::Sy], [`Sw`][RotGate::Sw]} of π/2
//! rotations about the X, Y, and X+Y axes (up to global phase); entangling
//! is done exclusively with [`make_crot`].

use ndarray as nd;
use num_complex::{ ComplexFloat, Complex64 as C64 };
use num_traits::{ Float, FloatConst, One, Zero };
use once_cell::sync::Lazy;
use rand::Rng;
use crate::ComplexFloatExt;

/// Make a Hadamard gate.
///
/// Since this gate takes no arguments, consider using the lazily-constructed,
/// [`Complex64`][C64]-valued [`HMAT`] instead.
pub fn make_h<A>() -> nd::Array2<A>
where
    A: ComplexFloat + ComplexFloatExt,
    <A as ComplexFloat>::Real: std::fmt::Debug,
{
    let h = A::from_re((A::Real::one() + A::Real::one()).recip().sqrt());
    nd::array![
        [h,  h],
        [h, -h],
    ]
}

/// Lazy-static version of [`make_h`] for a [`Complex64`][C64] element type.
pub static HMAT: Lazy<nd::Array2<C64>> = Lazy::new(make_h);

/// Make a √X gate: ((1+i)∣0⟩⟨0∣ + (1−i)∣0⟩⟨1∣ + (1−i)∣1⟩⟨0∣ + (1+i)∣1⟩⟨1∣)/2.
pub fn make_sx<A>() -> nd::Array2<A>
where
    A: ComplexFloat + ComplexFloatExt,
    <A as ComplexFloat>::Real: std::fmt::Debug,
{
    let half = A::from_re((A::Real::one() + A::Real::one()).recip());
    let a = half * (A::one() + A::i());
    let b = half * (A::one() - A::i());
    nd::array![
        [a, b],
        [b, a],
    ]
}

/// Lazy-static version of [`make_sx`] for a [`Complex64`][C64] element type.
pub static SXMAT: Lazy<nd::Array2<C64>> = Lazy::new(make_sx);

/// Make a √Y gate: (1+i)(∣0⟩⟨0∣ − ∣0⟩⟨1∣ + ∣1⟩⟨0∣ + ∣1⟩⟨1∣)/2.
pub fn make_sy<A>() -> nd::Array2<A>
where
    A: ComplexFloat + ComplexFloatExt,
    <A as ComplexFloat>::Real: std::fmt::Debug,
{
    let half = A::from_re((A::Real::one() + A::Real::one()).recip());
    let a = half * (A::one() + A::i());
    nd::array![
        [a, -a],
        [a,  a],
    ]
}

/// Lazy-static version of [`make_sy`] for a [`Complex64`][C64] element type.
pub static SYMAT: Lazy<nd::Array2<C64>> = Lazy::new(make_sy);

/// Make a √W gate, the π/2 rotation about the X+Y axis:
/// (1+i)(∣0⟩⟨0∣ + ∣1⟩⟨1∣)/2 + ∣0⟩⟨1∣/√2 − i∣1⟩⟨0∣/√2.
pub fn make_sw<A>() -> nd::Array2<A>
where
    A: ComplexFloat + ComplexFloatExt,
    <A as ComplexFloat>::Real: std::fmt::Debug,
{
    let half = A::from_re((A::Real::one() + A::Real::one()).recip());
    let rt2inv
        = A::from_re((A::Real::one() + A::Real::one()).recip().sqrt());
    let a = half * (A::one() + A::i());
    nd::array![
        [         a,  rt2inv],
        [-A::i() * rt2inv, a],
    ]
}

/// Lazy-static version of [`make_sw`] for a [`Complex64`][C64] element type.
pub static SWMAT: Lazy<nd::Array2<C64>> = Lazy::new(make_sw);

/// Make a controlled-phase "CROT" gate with phase π/2<sup>*k*</sup> on the
/// ∣11⟩ subspace, in the (control, target) basis ordering.
pub fn make_crot<A>(k: i32) -> nd::Array2<A>
where
    A: ComplexFloat + ComplexFloatExt,
    <A as ComplexFloat>::Real: Float + FloatConst + std::fmt::Debug,
{
    let two = A::Real::one() + A::Real::one();
    let ph = A::cis(A::Real::PI() / Float::powi(two, k));
    let o = A::one();
    let z = A::zero();
    nd::array![
        [o, z, z, z ],
        [z, o, z, z ],
        [z, z, o, z ],
        [z, z, z, ph],
    ]
}

/// Make a projector onto ∣0⟩.
pub fn make_projup<A>() -> nd::Array2<A>
where
    A: ComplexFloat + ComplexFloatExt,
    <A as ComplexFloat>::Real: std::fmt::Debug,
{
    nd::array![
        [A::one(),  A::zero()],
        [A::zero(), A::zero()],
    ]
}

/// Make a projector onto ∣1⟩.
pub fn make_projdn<A>() -> nd::Array2<A>
where
    A: ComplexFloat + ComplexFloatExt,
    <A as ComplexFloat>::Real: std::fmt::Debug,
{
    nd::array![
        [A::zero(), A::zero()],
        [A::zero(), A::one() ],
    ]
}

/// Token for a single random-circuit rotation gate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RotGate {
    /// π/2 rotation about X.
    Sx,
    /// π/2 rotation about Y.
    Sy,
    /// π/2 rotation about X+Y.
    Sw,
}

impl RotGate {
    /// Draw a gate uniformly from the set.
    pub fn sample<R>(rng: &mut R) -> Self
    where R: Rng + ?Sized
    {
        match rng.gen_range(0..3_usize) {
            0 => Self::Sx,
            1 => Self::Sy,
            _ => Self::Sw,
        }
    }

    /// The gate's matrix.
    pub fn matrix<A>(self) -> nd::Array2<A>
    where
        A: ComplexFloat + ComplexFloatExt,
        <A as ComplexFloat>::Real: std::fmt::Debug,
    {
        match self {
            Self::Sx => make_sx(),
            Self::Sy => make_sy(),
            Self::Sw => make_sw(),
        }
    }

    /// Returns `true` if `self` is `Sx`.
    pub fn is_sx(&self) -> bool { matches!(self, Self::Sx) }

    /// Returns `true` if `self` is `Sy`.
    pub fn is_sy(&self) -> bool { matches!(self, Self::Sy) }

    /// Returns `true` if `self` is `Sw`.
    pub fn is_sw(&self) -> bool { matches!(self, Self::Sw) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unitary(u: &nd::Array2<C64>) {
        let n = u.nrows();
        let uh = u.t().mapv(|a| a.conj());
        let prod = uh.dot(u);
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { C64::from(1.0) } else { C64::from(0.0) };
                assert!(
                    (prod[[i, j]] - expected).norm() < 1e-12,
                    "non-unitary at ({i}, {j}): {:?}", prod,
                );
            }
        }
    }

    #[test]
    fn gates_are_unitary() {
        assert_unitary(&make_h());
        assert_unitary(&make_sx());
        assert_unitary(&make_sy());
        assert_unitary(&make_sw());
        for k in 1..5 { assert_unitary(&make_crot(k)); }
    }

    #[test]
    fn crot_phase() {
        let crot: nd::Array2<C64> = make_crot(1);
        assert!((crot[[3, 3]] - C64::cis(std::f64::consts::FRAC_PI_2)).norm()
            < 1e-15);
        for i in 0..3 {
            assert!((crot[[i, i]] - C64::from(1.0)).norm() < 1e-15);
        }
    }

    #[test]
    fn squared_rotations() {
        // SX² = X and SY² = Y exactly
        let one = C64::from(1.0);
        let i = C64::i();
        let sx2 = SXMAT.dot(&*SXMAT);
        assert!((sx2[[0, 1]] - one).norm() < 1e-12);
        assert!((sx2[[1, 0]] - one).norm() < 1e-12);
        assert!(sx2[[0, 0]].norm() < 1e-12);
        assert!(sx2[[1, 1]].norm() < 1e-12);
        let sy2 = SYMAT.dot(&*SYMAT);
        assert!((sy2[[0, 1]] + i).norm() < 1e-12);
        assert!((sy2[[1, 0]] - i).norm() < 1e-12);
        assert!(sy2[[0, 0]].norm() < 1e-12);
        assert!(sy2[[1, 1]].norm() < 1e-12);
    }
}
