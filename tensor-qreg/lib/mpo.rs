//! Matrix product operators: circuit layers in the same tensor formalism
//! as the register states.
//!
//! An operator over *N* sites is a chain of rank-4 site tensors with axis
//! signature `[left bond, output, input, right bond]`. On construction the
//! output indices sit one priming level above the input indices, so an
//! operator maps level-0 states to level-1 states; composition
//! ([`Mpo::mult`]) and application ([`Mpo::apply`]) check the full index
//! chain and fail on priming misalignment instead of contracting the wrong
//! legs.
//!
//! Two-site gates with arbitrary separation are built from sums of
//! single-site operator products ([`Mpo::gate2`]): one operator bond
//! channel per term, with identity channels threaded through any
//! intermediate sites.

use itertools::Itertools;
use ndarray as nd;
use ndarray_linalg::SVDInto;
use num_complex::ComplexFloat;
use num_traits::{ Float, FloatConst, One, Zero };
use thiserror::Error;
use crate::{
    ComplexFloatExt,
    gate::{ make_projup, make_projdn },
    mps::{ Mps, Truncation },
    site::Q,
};

#[derive(Debug, Error)]
pub enum MpoError {
    /// Returned when attempting to create a new MPO for a register of less
    /// than 1 site.
    #[error("error in MPO creation: cannot create for an empty register")]
    EmptySystem,

    /// Returned when attempting to create a gate for an out-of-range site.
    #[error("error in MPO creation: site {0} out of range for {1} sites")]
    SiteOutOfBounds(usize, usize),

    /// Returned when a two-site gate is given the same site twice.
    #[error("error in MPO creation: two-site operator requires distinct sites")]
    DegenerateSites,

    /// Returned when a gate matrix does not have the expected shape.
    #[error("error in MPO creation: gate matrix must be 2x2")]
    OperatorIncompatibleShape,

    /// Returned when an operator product is attempted with misaligned
    /// indices.
    #[error("error in operator product: input indices do not match operand \
        output indices")]
    ProductIndexMismatch,

    /// Returned when operator application is attempted with misaligned
    /// indices.
    #[error("error in operator application: input indices do not match \
        state indices")]
    ApplyIndexMismatch,

    /// Returned when a sandwiched inner product's index chain does not
    /// align end to end.
    #[error("error in sandwiched inner product: index chain does not align")]
    SandwichIndexMismatch,
}
use MpoError::*;
pub type MpoResult<T> = Result<T, MpoError>;

/// A matrix product operator over a register of two-level sites.
#[derive(Clone, Debug, PartialEq)]
pub struct Mpo<A>
where A: ComplexFloat
{
    // Number of sites.
    pub(crate) n: usize, // ≥ 1
    // Site tensors; tensor `k` has axis signature
    //   [ w{k - 1}, s{k}', s{k}, w{k} ]
    // with dim(w{-1}) == dim(w{n - 1}) == 1.
    pub(crate) data: Vec<nd::Array4<A>>, // length n
    // Output indices.
    pub(crate) outs: Vec<Q>, // length n
    // Input indices.
    pub(crate) ins: Vec<Q>, // length n
}

impl<A> Mpo<A>
where A: ComplexFloat + ComplexFloatExt
{
    fn fresh_indices(n: usize) -> (Vec<Q>, Vec<Q>) {
        let outs: Vec<Q> = (0..n).map(|k| Q::new(k).primed(1)).collect();
        let ins: Vec<Q> = (0..n).map(Q::new).collect();
        (outs, ins)
    }

    fn site_identity() -> nd::Array4<A> {
        let mut w: nd::Array4<A> = nd::Array4::zeros((1, 2, 2, 1));
        w[[0, 0, 0, 0]] = A::one();
        w[[0, 1, 1, 0]] = A::one();
        w
    }

    /// The identity operator on `n` sites.
    ///
    /// Fails if `n == 0`.
    pub fn identity(n: usize) -> MpoResult<Self> {
        if n == 0 { return Err(EmptySystem); }
        let data: Vec<nd::Array4<A>>
            = (0..n).map(|_| Self::site_identity()).collect();
        let (outs, ins) = Self::fresh_indices(n);
        Ok(Self { n, data, outs, ins })
    }

    /// A single-site gate on site `k`, identity elsewhere.
    ///
    /// Fails if `n == 0`, `k` is out of range, or `u` is not 2×2.
    pub fn gate1(n: usize, k: usize, u: &nd::Array2<A>) -> MpoResult<Self> {
        if n == 0 { return Err(EmptySystem); }
        if k >= n { return Err(SiteOutOfBounds(k, n)); }
        if u.shape() != [2, 2] { return Err(OperatorIncompatibleShape); }
        let mut new = Self::identity(n)?;
        let w: nd::Array4<A>
            = nd::Array4::from_shape_fn(
                (1, 2, 2, 1),
                |(_, s, s2, _)| u[[s, s2]],
            );
        new.data[k] = w;
        Ok(new)
    }

    /// A two-site gate given as a sum of single-site operator products
    /// Σ<sub>t</sub> c<sub>t</sub> · u<sub>t</sub>(`a`) ⊗ v<sub>t</sub>(`b`),
    /// with one operator bond channel per term and identity channels
    /// threaded through any sites between `a` and `b`.
    ///
    /// Fails if `n == 0`, either site is out of range, `a == b`, or any
    /// term matrix is not 2×2.
    pub fn gate2(
        n: usize,
        a: usize,
        b: usize,
        terms: &[(A, nd::Array2<A>, nd::Array2<A>)],
    ) -> MpoResult<Self>
    {
        if n == 0 { return Err(EmptySystem); }
        if a >= n { return Err(SiteOutOfBounds(a, n)); }
        if b >= n { return Err(SiteOutOfBounds(b, n)); }
        if a == b { return Err(DegenerateSites); }
        if terms.iter().any(|(_, u, v)| {
            u.shape() != [2, 2] || v.shape() != [2, 2]
        }) {
            return Err(OperatorIncompatibleShape);
        }
        let nt = terms.len();
        let (lo, hi) = (a.min(b), a.max(b));
        // the first matrix of each term acts on `a`, the second on `b`
        let lo_ops: Vec<&nd::Array2<A>>
            = terms.iter()
            .map(|(_, u, v)| if a < b { u } else { v })
            .collect();
        let hi_ops: Vec<&nd::Array2<A>>
            = terms.iter()
            .map(|(_, u, v)| if a < b { v } else { u })
            .collect();
        let mut new = Self::identity(n)?;
        new.data[lo]
            = nd::Array4::from_shape_fn(
                (1, 2, 2, nt),
                |(_, s, s2, t)| terms[t].0 * lo_ops[t][[s, s2]],
            );
        for k in lo + 1..hi {
            new.data[k]
                = nd::Array4::from_shape_fn(
                    (nt, 2, 2, nt),
                    |(t, s, s2, t2)| {
                        if t == t2 && s == s2 { A::one() } else { A::zero() }
                    },
                );
        }
        new.data[hi]
            = nd::Array4::from_shape_fn(
                (nt, 2, 2, 1),
                |(t, s, s2, _)| hi_ops[t][[s, s2]],
            );
        Ok(new)
    }

    /// The controlled-phase "CROT" gate: identity on the (control = 0)
    /// subspace, phase π/2<sup>*k*</sup> on ∣11⟩.
    ///
    /// `control` and `target` may be any two distinct sites.
    pub fn crot(n: usize, control: usize, target: usize, k: i32)
        -> MpoResult<Self>
    where <A as ComplexFloat>::Real: FloatConst + std::fmt::Debug
    {
        let two = A::Real::one() + A::Real::one();
        let ph = A::cis(A::Real::PI() / Float::powi(two, k));
        let terms: [(A, nd::Array2<A>, nd::Array2<A>); 3] = [
            (A::one(), make_projup(), nd::Array2::eye(2)),
            (A::one(), make_projdn(), make_projup()),
            (ph,       make_projdn(), make_projdn()),
        ];
        Self::gate2(n, control, target, &terms)
    }

    /// Return the number of sites.
    pub fn nsites(&self) -> usize { self.n }

    /// Return the output indices.
    pub fn outputs(&self) -> &[Q] { &self.outs }

    /// Return the input indices.
    pub fn inputs(&self) -> &[Q] { &self.ins }

    /// Return the maximum operator bond dimension across the chain.
    pub fn max_bond_dim(&self) -> usize {
        self.data.iter().take(self.n - 1)
            .map(|w| w.shape()[3])
            .max()
            .unwrap_or(1)
    }

    /// Return the operator bond dimension to the right of site `k`.
    pub fn bond_dim(&self, k: usize) -> Option<usize> {
        (k + 1 < self.n).then(|| self.data[k].shape()[3])
    }

    /// Raise the priming tag of every index (input and output) by `p`.
    pub fn prime(&mut self, p: usize) -> &mut Self {
        self.outs.iter_mut().for_each(|q| { q.prime(p); });
        self.ins.iter_mut().for_each(|q| { q.prime(p); });
        self
    }

    /// Like [`Self::prime`], but consuming.
    pub fn primed(mut self, p: usize) -> Self {
        self.prime(p);
        self
    }

    /// Remap every index at priming level `from` to level `to`.
    pub fn map_prime(&mut self, from: usize, to: usize) -> &mut Self {
        self.outs.iter_mut().for_each(|q| { q.map_prime(from, to); });
        self.ins.iter_mut().for_each(|q| { q.map_prime(from, to); });
        self
    }

    /// Return the conjugate transpose of `self`.
    ///
    /// Output and input indices swap roles, so the adjoint of a level-1 →
    /// level-0 operator maps level-1 states to level-0 states.
    pub fn adjoint(&self) -> Self {
        let data: Vec<nd::Array4<A>>
            = self.data.iter()
            .map(|w| {
                let sh = (
                    w.shape()[0], w.shape()[2], w.shape()[1], w.shape()[3],
                );
                nd::Array4::from_shape_fn(
                    sh,
                    |(wl, s, s2, wr)| w[[wl, s2, s, wr]].conj(),
                )
            })
            .collect();
        Self {
            n: self.n,
            data,
            outs: self.ins.clone(),
            ins: self.outs.clone(),
        }
    }

    /// Multiply `self` with `rhs` as operators (`self` applied second),
    /// contracting `self`'s input indices against `rhs`'s output indices.
    ///
    /// Fails unless `self`'s input index chain matches `rhs`'s output
    /// index chain exactly, priming tags included.
    pub fn mult(self, rhs: Self) -> MpoResult<Self> {
        if self.n != rhs.n || self.ins != rhs.outs {
            return Err(ProductIndexMismatch);
        }
        let data: Vec<nd::Array4<A>>
            = self.data.iter().zip(rhs.data.iter())
            .map(|(a, b)| {
                let (al, d, ar) = (a.shape()[0], a.shape()[1], a.shape()[3]);
                let (bl, br) = (b.shape()[0], b.shape()[3]);
                nd::Array4::from_shape_fn(
                    (al * bl, d, d, ar * br),
                    |(wl, s, s2, wr)| {
                        let (a_l, b_l) = (wl / bl, wl % bl);
                        let (a_r, b_r) = (wr / br, wr % br);
                        (0..d)
                            .map(|m| {
                                a[[a_l, s, m, a_r]] * b[[b_l, m, s2, b_r]]
                            })
                            .fold(A::zero(), |acc, x| acc + x)
                    },
                )
            })
            .collect();
        Ok(Self { n: self.n, data, outs: self.outs, ins: rhs.ins })
    }

    /// Contract the chain into a dense matrix, with site 0 as the most
    /// significant bit of both the row (output) and column (input) basis
    /// indices.
    pub fn into_matrix(self) -> nd::Array2<A> {
        let mut acc: nd::Array3<A>
            = nd::Array3::from_elem((1, 1, 1), A::one());
        for w in self.data.iter() {
            let (wl, d, wr) = (w.shape()[0], w.shape()[1], w.shape()[3]);
            let (po, pi) = (acc.shape()[0], acc.shape()[1]);
            let next: nd::Array3<A>
                = nd::Array3::from_shape_fn(
                    (po * d, pi * d, wr),
                    |(row, col, w2)| {
                        let (o, s) = (row / d, row % d);
                        let (i, s2) = (col / d, col % d);
                        (0..wl)
                            .map(|wb| acc[[o, i, wb]] * w[[wb, s, s2, w2]])
                            .fold(A::zero(), |acc, x| acc + x)
                    },
                );
            acc = next;
        }
        let dim = acc.shape()[0];
        acc.into_shape((dim, dim)).unwrap()
    }
}

impl<A> Mpo<A>
where
    A: ComplexFloat + ComplexFloatExt,
    nd::Array2<A>: SVDInto<U = nd::Array2<A>, Sigma = nd::Array1<A::Real>, VT = nd::Array2<A>>,
{
    /// Apply `self` to a register state and re-compress the result with
    /// the given truncation parameters.
    ///
    /// The state's indices become `self`'s output indices.
    ///
    /// Fails unless `self`'s input index chain matches the state's index
    /// chain exactly, priming tags included.
    pub fn apply(&self, state: Mps<A>, trunc: Truncation<A::Real>)
        -> MpoResult<Mps<A>>
    {
        if self.n != state.n || self.ins != state.outs {
            return Err(ApplyIndexMismatch);
        }
        let data: Vec<nd::Array3<A>>
            = self.data.iter().zip(state.data.iter())
            .map(|(w, g)| {
                let (wl, d, wr) = (w.shape()[0], w.shape()[1], w.shape()[3]);
                let (vl, vr) = (g.shape()[0], g.shape()[2]);
                nd::Array3::from_shape_fn(
                    (wl * vl, d, wr * vr),
                    |(bl, s, br)| {
                        let (w_l, v_l) = (bl / vl, bl % vl);
                        let (w_r, v_r) = (br / vr, br % vr);
                        (0..d)
                            .map(|s2| {
                                w[[w_l, s, s2, w_r]] * g[[v_l, s2, v_r]]
                            })
                            .fold(A::zero(), |acc, x| acc + x)
                    },
                )
            })
            .collect();
        let mut applied = Mps {
            n: state.n,
            data,
            outs: self.outs.clone(),
        };
        applied.compress(trunc);
        Ok(applied)
    }
}

/// Compute the sandwiched inner product ⟨`left`∣`op`∣`right`⟩ as a single
/// environment contraction, without applying `op` to either state.
///
/// Fails unless `op`'s output indices match `left`'s and its input indices
/// match `right`'s.
pub fn overlap1<A>(left: &Mps<A>, op: &Mpo<A>, right: &Mps<A>)
    -> MpoResult<A>
where A: ComplexFloat + ComplexFloatExt
{
    if op.n != left.n || op.n != right.n
        || op.outs != left.outs
        || op.ins != right.outs
    {
        return Err(SandwichIndexMismatch);
    }
    let mut env: nd::Array3<A> = nd::Array3::from_elem((1, 1, 1), A::one());
    for ((l, w), r) in
        left.data.iter().zip(op.data.iter()).zip(right.data.iter())
    {
        let (la, d, la2) = (l.shape()[0], l.shape()[1], l.shape()[2]);
        let (ww, ww2) = (w.shape()[0], w.shape()[3]);
        let (rb, rb2) = (r.shape()[0], r.shape()[2]);
        let t1: nd::Array4<A>
            = nd::Array4::from_shape_fn(
                (la2, d, ww, rb),
                |(a2, s, wb, b)| {
                    (0..la)
                        .map(|a| l[[a, s, a2]].conj() * env[[a, wb, b]])
                        .fold(A::zero(), |acc, x| acc + x)
                },
            );
        let t2: nd::Array4<A>
            = nd::Array4::from_shape_fn(
                (la2, ww2, d, rb),
                |(a2, w2, s2, b)| {
                    (0..d).cartesian_product(0..ww)
                        .map(|(s, wb)| {
                            w[[wb, s, s2, w2]] * t1[[a2, s, wb, b]]
                        })
                        .fold(A::zero(), |acc, x| acc + x)
                },
            );
        env = nd::Array3::from_shape_fn(
            (la2, ww2, rb2),
            |(a2, w2, b2)| {
                (0..d).cartesian_product(0..rb)
                    .map(|(s2, b)| t2[[a2, w2, s2, b]] * r[[b, s2, b2]])
                    .fold(A::zero(), |acc, x| acc + x)
            },
        );
    }
    Ok(env[[0, 0, 0]])
}

/// Compute the four-term sandwiched inner product
/// ⟨`left`∣`upper`·`lower`∣`right`⟩ as a single environment contraction.
///
/// Fails unless the index chain aligns end to end: `upper`'s outputs with
/// `left`, `upper`'s inputs with `lower`'s outputs, and `lower`'s inputs
/// with `right`.
pub fn overlap2<A>(
    left: &Mps<A>,
    upper: &Mpo<A>,
    lower: &Mpo<A>,
    right: &Mps<A>,
) -> MpoResult<A>
where A: ComplexFloat + ComplexFloatExt
{
    if upper.n != left.n || lower.n != left.n || right.n != left.n
        || upper.outs != left.outs
        || upper.ins != lower.outs
        || lower.ins != right.outs
    {
        return Err(SandwichIndexMismatch);
    }
    let mut env: nd::Array4<A>
        = nd::Array4::from_elem((1, 1, 1, 1), A::one());
    for (((l, wu), wv), r) in
        left.data.iter()
        .zip(upper.data.iter())
        .zip(lower.data.iter())
        .zip(right.data.iter())
    {
        let (la, d, la2) = (l.shape()[0], l.shape()[1], l.shape()[2]);
        let (wa, wa2) = (wu.shape()[0], wu.shape()[3]);
        let (va, va2) = (wv.shape()[0], wv.shape()[3]);
        let (rb, rb2) = (r.shape()[0], r.shape()[2]);
        let t1: nd::Array5<A>
            = nd::Array5::from_shape_fn(
                (la2, d, wa, va, rb),
                |(a2, s, wb, vb, b)| {
                    (0..la)
                        .map(|a| l[[a, s, a2]].conj() * env[[a, wb, vb, b]])
                        .fold(A::zero(), |acc, x| acc + x)
                },
            );
        let t2: nd::Array5<A>
            = nd::Array5::from_shape_fn(
                (la2, d, wa2, va, rb),
                |(a2, m, w2, vb, b)| {
                    (0..d).cartesian_product(0..wa)
                        .map(|(s, wb)| {
                            wu[[wb, s, m, w2]] * t1[[a2, s, wb, vb, b]]
                        })
                        .fold(A::zero(), |acc, x| acc + x)
                },
            );
        let t3: nd::Array5<A>
            = nd::Array5::from_shape_fn(
                (la2, d, wa2, va2, rb),
                |(a2, s2, w2, v2, b)| {
                    (0..d).cartesian_product(0..va)
                        .map(|(m, vb)| {
                            wv[[vb, m, s2, v2]] * t2[[a2, m, w2, vb, b]]
                        })
                        .fold(A::zero(), |acc, x| acc + x)
                },
            );
        env = nd::Array4::from_shape_fn(
            (la2, wa2, va2, rb2),
            |(a2, w2, v2, b2)| {
                (0..d).cartesian_product(0..rb)
                    .map(|(s2, b)| {
                        t3[[a2, s2, w2, v2, b]] * r[[b, s2, b2]]
                    })
                    .fold(A::zero(), |acc, x| acc + x)
            },
        );
    }
    Ok(env[[0, 0, 0, 0]])
}
