//! Matrix product register states with bounded bond dimension.
//!
//! A register of *N* two-level sites is stored as a chain of rank-3 site
//! tensors with axis signature `[left bond, physical, right bond]` and
//! fixed end caps of dimension 1:
//!
//! ```text
//! G[0] --- G[1] --- ... --- G[n-1]
//!  |        |                 |
//!  | <- physical index 0      | <- physical index n-1
//! ```
//!
//! Physical indices are [`Q`] values carrying a priming tag; inner products
//! and operator applications only contract indices that agree exactly, so
//! the priming discipline of layered circuits is enforced rather than
//! assumed.
//!
//! After every operator application the chain is re-compressed: a
//! left-to-right orthogonalization sweep followed by a right-to-left sweep
//! of singular value decompositions that keeps at most
//! [`maxdim`][Truncation::maxdim] values per bond, discarding contributions
//! below [`cutoff`][Truncation::cutoff]. Discarded weight is lost — the
//! state is *not* renormalized, so the post-run norm is itself a measure of
//! truncation severity.

use std::{ fmt, str::FromStr };
use itertools::Itertools;
use ndarray as nd;
use ndarray_linalg::SVDInto;
use num_complex::ComplexFloat;
use num_traits::{ Float, NumCast, One, Zero };
use thiserror::Error;
use crate::{ ComplexFloatExt, site::Q };

#[derive(Debug, Error)]
pub enum MpsError {
    /// Returned when attempting to create a new state for a register of
    /// less than 1 site.
    #[error("error in MPS creation: cannot create for an empty register")]
    EmptySystem,

    /// Returned when an initial-state template name is not recognized.
    #[error(
        "unknown initial-state template '{0}', please use one of the \
        following: '|0..0>', '|1..1>', '|+..+>', '|-..->', '|GHZn>', '|Wn>'"
    )]
    UnknownTemplate(String),

    /// Returned when an inner product is attempted between states whose
    /// site indices do not match.
    #[error("error in inner product: non-matching site indices")]
    IncompatibleIndices,
}
use MpsError::*;
pub type MpsResult<T> = Result<T, MpsError>;

/// A named initial-state template.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Template {
    /// ∣0...0⟩
    AllZero,
    /// ∣1...1⟩
    AllOne,
    /// ∣+...+⟩
    AllPlus,
    /// ∣−...−⟩
    AllMinus,
    /// (∣0...0⟩ + ∣1...1⟩)/√2
    Ghz,
    /// Equal superposition of all single-excitation basis states.
    W,
}

impl Template {
    /// The template's name at the command-line surface.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AllZero => "|0..0>",
            Self::AllOne => "|1..1>",
            Self::AllPlus => "|+..+>",
            Self::AllMinus => "|-..->",
            Self::Ghz => "|GHZn>",
            Self::W => "|Wn>",
        }
    }
}

impl FromStr for Template {
    type Err = MpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "|0..0>" => Ok(Self::AllZero),
            "|1..1>" => Ok(Self::AllOne),
            "|+..+>" => Ok(Self::AllPlus),
            "|-..->" => Ok(Self::AllMinus),
            "|GHZn>" => Ok(Self::Ghz),
            "|Wn>" => Ok(Self::W),
            _ => Err(UnknownTemplate(s.to_string())),
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Bond truncation parameters, applied uniformly to every operator
/// application in a run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Truncation<R> {
    /// Maximum number of singular values retained per bond.
    pub maxdim: usize,
    /// Relative threshold below which singular values are discarded.
    pub cutoff: R,
}

impl<R> Truncation<R> {
    pub fn new(maxdim: usize, cutoff: R) -> Self { Self { maxdim, cutoff } }
}

/// A matrix product register state.
#[derive(Clone, Debug, PartialEq)]
pub struct Mps<A>
where A: ComplexFloat
{
    // Number of sites.
    pub(crate) n: usize, // ≥ 1
    // Site tensors; tensor `k` has axis signature
    //   [ u{k - 1}, s{k}, u{k} ]
    // where `u{j}` is a bond index and `s{j}` a physical index, with
    // dim(u{-1}) == dim(u{n - 1}) == 1.
    pub(crate) data: Vec<nd::Array3<A>>, // length n
    // Physical indices.
    pub(crate) outs: Vec<Q>, // length n
}

impl<A> Mps<A>
where A: ComplexFloat + ComplexFloatExt
{
    // Separable product state with per-site amplitudes from `amps`.
    fn product<F>(n: usize, mut amps: F) -> MpsResult<Self>
    where F: FnMut(usize) -> (A, A)
    {
        if n == 0 { return Err(EmptySystem); }
        let data: Vec<nd::Array3<A>>
            = (0..n)
            .map(|k| {
                let (a0, a1) = amps(k);
                let mut g: nd::Array3<A> = nd::Array3::zeros((1, 2, 1));
                g[[0, 0, 0]] = a0;
                g[[0, 1, 0]] = a1;
                g
            })
            .collect();
        let outs: Vec<Q> = (0..n).map(Q::new).collect();
        Ok(Self { n, data, outs })
    }

    /// Initialize a register of `n` sites to a named template state.
    ///
    /// All templates are unit-norm. The product templates are bond-1
    /// chains; `|GHZn>` and `|Wn>` are bond-2 chains.
    ///
    /// Fails if `n == 0`.
    pub fn from_template(n: usize, form: Template) -> MpsResult<Self> {
        if n == 0 { return Err(EmptySystem); }
        let rt2inv: A
            = A::from_re((A::Real::one() + A::Real::one()).recip().sqrt());
        match form {
            Template::AllZero =>
                Self::product(n, |_| (A::one(), A::zero())),
            Template::AllOne =>
                Self::product(n, |_| (A::zero(), A::one())),
            Template::AllPlus =>
                Self::product(n, |_| (rt2inv, rt2inv)),
            Template::AllMinus =>
                Self::product(n, |_| (rt2inv, -rt2inv)),
            Template::Ghz => {
                if n == 1 {
                    return Self::product(1, |_| (rt2inv, rt2inv));
                }
                let mut data: Vec<nd::Array3<A>> = Vec::with_capacity(n);
                let mut g0: nd::Array3<A> = nd::Array3::zeros((1, 2, 2));
                g0[[0, 0, 0]] = rt2inv;
                g0[[0, 1, 1]] = rt2inv;
                data.push(g0);
                for _ in 1..n - 1 {
                    let mut g: nd::Array3<A> = nd::Array3::zeros((2, 2, 2));
                    g[[0, 0, 0]] = A::one();
                    g[[1, 1, 1]] = A::one();
                    data.push(g);
                }
                let mut gl: nd::Array3<A> = nd::Array3::zeros((2, 2, 1));
                gl[[0, 0, 0]] = A::one();
                gl[[1, 1, 0]] = A::one();
                data.push(gl);
                let outs: Vec<Q> = (0..n).map(Q::new).collect();
                Ok(Self { n, data, outs })
            },
            Template::W => {
                if n == 1 {
                    return Self::product(1, |_| (A::zero(), A::one()));
                }
                let nr: A::Real = NumCast::from(n).unwrap();
                let c: A = A::from_re(nr.sqrt().recip());
                let mut data: Vec<nd::Array3<A>> = Vec::with_capacity(n);
                // bond value 0: excitation not yet placed; 1: placed
                let mut g0: nd::Array3<A> = nd::Array3::zeros((1, 2, 2));
                g0[[0, 0, 0]] = A::one();
                g0[[0, 1, 1]] = c;
                data.push(g0);
                for _ in 1..n - 1 {
                    let mut g: nd::Array3<A> = nd::Array3::zeros((2, 2, 2));
                    g[[0, 0, 0]] = A::one();
                    g[[0, 1, 1]] = c;
                    g[[1, 0, 1]] = A::one();
                    data.push(g);
                }
                let mut gl: nd::Array3<A> = nd::Array3::zeros((2, 2, 1));
                gl[[0, 1, 0]] = c;
                gl[[1, 0, 0]] = A::one();
                data.push(gl);
                let outs: Vec<Q> = (0..n).map(Q::new).collect();
                Ok(Self { n, data, outs })
            },
        }
    }

    /// Return the number of sites.
    pub fn nqubits(&self) -> usize { self.n }

    /// Return the physical indices.
    pub fn indices(&self) -> &[Q] { &self.outs }

    /// Return the common priming level of the physical indices.
    pub fn prime_level(&self) -> usize {
        self.outs.first().map(|q| q.prime).unwrap_or(0)
    }

    /// Raise the priming tag of every physical index by `p`.
    pub fn prime(&mut self, p: usize) -> &mut Self {
        self.outs.iter_mut().for_each(|q| { q.prime(p); });
        self
    }

    /// Reset the priming tag of every physical index to zero.
    pub fn no_prime(&mut self) -> &mut Self {
        self.outs.iter_mut().for_each(|q| { q.no_prime(); });
        self
    }

    /// Like [`Self::prime`], but consuming.
    pub fn primed(mut self, p: usize) -> Self {
        self.prime(p);
        self
    }

    /// Return the maximum bond dimension across the chain.
    pub fn max_bond_dim(&self) -> usize {
        self.data.iter().take(self.n - 1)
            .map(|g| g.shape()[2])
            .max()
            .unwrap_or(1)
    }

    /// Return the average bond dimension across the chain.
    pub fn avg_bond_dim(&self) -> f64 {
        if self.n < 2 { return 1.0; }
        let total: usize
            = self.data.iter().take(self.n - 1)
            .map(|g| g.shape()[2])
            .sum();
        total as f64 / (self.n - 1) as f64
    }

    /// Compute the inner product ⟨`self`∣`other`⟩.
    ///
    /// Fails if the two states' site indices (including priming tags) do
    /// not match.
    pub fn inner(&self, other: &Self) -> MpsResult<A> {
        if self.n != other.n || self.outs != other.outs {
            return Err(IncompatibleIndices);
        }
        let mut env: nd::Array2<A> = nd::Array2::from_elem((1, 1), A::one());
        for (l, r) in self.data.iter().zip(other.data.iter()) {
            let (la, d, la2) = (l.shape()[0], l.shape()[1], l.shape()[2]);
            let (rb, rb2) = (r.shape()[0], r.shape()[2]);
            let t: nd::Array3<A>
                = nd::Array3::from_shape_fn(
                    (la2, d, rb),
                    |(a2, s, b)| {
                        (0..la)
                            .map(|a| l[[a, s, a2]].conj() * env[[a, b]])
                            .fold(A::zero(), |acc, x| acc + x)
                    },
                );
            env = nd::Array2::from_shape_fn(
                (la2, rb2),
                |(a2, b2)| {
                    (0..d).cartesian_product(0..rb)
                        .map(|(s, b)| t[[a2, s, b]] * r[[b, s, b2]])
                        .fold(A::zero(), |acc, x| acc + x)
                },
            );
        }
        Ok(env[[0, 0]])
    }

    /// Return the norm of the state.
    pub fn norm(&self) -> A::Real {
        // self-overlap indices always match
        let n2 = self.inner(self).unwrap();
        Float::sqrt(n2.re())
    }

    /// Contract the chain into a dense amplitude vector, with site 0 as the
    /// most significant bit of the basis index.
    pub fn into_vector(self) -> nd::Array1<A> {
        let mut acc: nd::Array2<A> = nd::Array2::from_elem((1, 1), A::one());
        for g in self.data.iter() {
            let (b, d, r) = (g.shape()[0], g.shape()[1], g.shape()[2]);
            let p = acc.shape()[0];
            let next: nd::Array2<A>
                = nd::Array2::from_shape_fn(
                    (p * d, r),
                    |(ps, rr)| {
                        let (pi, s) = (ps / d, ps % d);
                        (0..b)
                            .map(|bb| acc[[pi, bb]] * g[[bb, s, rr]])
                            .fold(A::zero(), |acc, x| acc + x)
                    },
                );
            acc = next;
        }
        let len = acc.shape()[0];
        acc.into_shape(len).unwrap()
    }
}

impl<A> Mps<A>
where
    A: ComplexFloat + ComplexFloatExt,
    nd::Array2<A>: SVDInto<U = nd::Array2<A>, Sigma = nd::Array1<A::Real>, VT = nd::Array2<A>>,
{
    /// Re-factor the chain, truncating every bond to the given parameters.
    ///
    /// This is a left-to-right orthogonalization sweep followed by a
    /// right-to-left truncation sweep; at each bond at most
    /// [`maxdim`][Truncation::maxdim] singular values are retained (never
    /// fewer than one), discarding values below
    /// [`cutoff`][Truncation::cutoff] relative to the spectrum norm.
    pub fn compress(&mut self, trunc: Truncation<A::Real>) -> &mut Self {
        if self.n < 2 { return self; }
        let placeholder = || nd::Array3::zeros((0, 0, 0));
        for k in 0..self.n - 1 {
            let g = std::mem::replace(&mut self.data[k], placeholder());
            let (l, d, r) = (g.shape()[0], g.shape()[1], g.shape()[2]);
            let q = g.into_shape((l * d, r)).unwrap();
            let (Some(u), s, Some(vh)) = q.svd_into(true, true).unwrap()
                else { unreachable!() };
            let rank = s.len();
            self.data[k]
                = u.slice(nd::s![.., ..rank]).to_owned()
                .into_shape((l, d, rank))
                .unwrap();
            let gk1 = &self.data[k + 1];
            let (r1, d1, r2) = (gk1.shape()[0], gk1.shape()[1], gk1.shape()[2]);
            let next: nd::Array3<A>
                = nd::Array3::from_shape_fn(
                    (rank, d1, r2),
                    |(x, s1, b2)| {
                        (0..r1)
                            .map(|b| {
                                A::from_re(s[x]) * vh[[x, b]]
                                    * gk1[[b, s1, b2]]
                            })
                            .fold(A::zero(), |acc, z| acc + z)
                    },
                );
            self.data[k + 1] = next;
        }
        for k in (1..self.n).rev() {
            let g = std::mem::replace(&mut self.data[k], placeholder());
            let (l, d, r) = (g.shape()[0], g.shape()[1], g.shape()[2]);
            let q = g.into_shape((l, d * r)).unwrap();
            let (Some(u), s, Some(vh)) = q.svd_into(true, true).unwrap()
                else { unreachable!() };
            let snorm: A::Real = Float::sqrt(
                s.iter()
                    .map(|sj| Float::powi(*sj, 2))
                    .fold(A::Real::zero(), |acc, x| acc + x)
            );
            let rank =
                if snorm > A::Real::zero() {
                    s.iter()
                        .take_while(|sj| **sj / snorm > trunc.cutoff)
                        .count()
                } else {
                    0
                };
            let rank = rank.min(trunc.maxdim).max(1);
            self.data[k]
                = vh.slice(nd::s![..rank, ..]).to_owned()
                .into_shape((rank, d, r))
                .unwrap();
            let gkm1 = &self.data[k - 1];
            let (l0, d0) = (gkm1.shape()[0], gkm1.shape()[1]);
            let next: nd::Array3<A>
                = nd::Array3::from_shape_fn(
                    (l0, d0, rank),
                    |(a, s0, x)| {
                        (0..l)
                            .map(|b| {
                                gkm1[[a, s0, b]] * u[[b, x]]
                                    * A::from_re(s[x])
                            })
                            .fold(A::zero(), |acc, z| acc + z)
                    },
                );
            self.data[k - 1] = next;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use num_complex::Complex64 as C64;
    use super::*;

    const TEMPLATES: [Template; 6] = [
        Template::AllZero,
        Template::AllOne,
        Template::AllPlus,
        Template::AllMinus,
        Template::Ghz,
        Template::W,
    ];

    #[test]
    fn template_parsing() {
        for form in TEMPLATES {
            assert_eq!(form.label().parse::<Template>().unwrap(), form);
        }
        assert!("|GHZ>".parse::<Template>().is_err());
        assert!(matches!(
            "bogus".parse::<Template>(),
            Err(MpsError::UnknownTemplate(_)),
        ));
    }

    #[test]
    fn template_norms() {
        for form in TEMPLATES {
            for n in 1..6 {
                let state: Mps<C64> = Mps::from_template(n, form).unwrap();
                assert!(
                    (state.norm() - 1.0).abs() < 1e-12,
                    "{form} at n = {n}: norm = {}", state.norm(),
                );
            }
        }
    }

    #[test]
    fn ghz_amplitudes() {
        let state: Mps<C64> = Mps::from_template(3, Template::Ghz).unwrap();
        let v = state.into_vector();
        let rt2inv = C64::from(0.5_f64.sqrt());
        assert!((v[0] - rt2inv).norm() < 1e-12);
        assert!((v[7] - rt2inv).norm() < 1e-12);
        for k in 1..7 { assert!(v[k].norm() < 1e-12); }
    }

    #[test]
    fn w_amplitudes() {
        let n = 4;
        let state: Mps<C64> = Mps::from_template(n, Template::W).unwrap();
        let v = state.into_vector();
        let c = C64::from(0.5);
        for k in 0..(1 << n) {
            let expected =
                if k != 0 && (k & (k - 1)) == 0 { c } else { C64::from(0.0) };
            assert!(
                (v[k] - expected).norm() < 1e-12,
                "amp({k}) = {}", v[k],
            );
        }
    }

    #[test]
    fn compress_is_lossless_when_untruncated() {
        let trunc = Truncation::new(1 << 30, 1e-16);
        for form in TEMPLATES {
            let mut state: Mps<C64> = Mps::from_template(5, form).unwrap();
            let reference = state.clone().into_vector();
            state.compress(trunc);
            let v = state.into_vector();
            for (a, b) in v.iter().zip(reference.iter()) {
                assert!((*a - *b).norm() < 1e-12);
            }
        }
    }

    #[test]
    fn compress_caps_bond_dimension() {
        let mut state: Mps<C64> = Mps::from_template(6, Template::Ghz).unwrap();
        assert_eq!(state.max_bond_dim(), 2);
        state.compress(Truncation::new(1, 1e-16));
        assert_eq!(state.max_bond_dim(), 1);
        // a GHZ state truncated to a product state keeps one branch
        assert!((state.norm() - 0.5_f64.sqrt()).abs() < 1e-12);
    }
}
