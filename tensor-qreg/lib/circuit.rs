//! Benchmark circuit drivers: brick-wall random circuits and the quantum
//! Fourier transform, applied to matrix product register states.
//!
//! A circuit time step is a pair of full-register layers: a *random* layer
//! (one freshly drawn [`RotGate`] per site) followed by an *entangling*
//! layer (CROT on nearest-neighbor pairs in a brick-wall pattern that
//! alternates parity with the step index, covering every bond over two
//! consecutive steps). Layers are composed gate by gate: the accumulator is
//! primed once, multiplied against the next gate, and the doubled priming
//! level collapsed back to one, so the running product always maps level-0
//! inputs to level-1 outputs.
//!
//! Layers can be applied directly ([`apply_random_circuit`]) or collected
//! into a reusable sequence ([`layer_sequence`]) in which layer *i* is
//! shifted to map level-*i* to level-(*i*+1); [`staged_overlap`] consumes
//! such a sequence to evaluate a depth-*D* sandwiched overlap by pushing
//! layers onto both ends of the bracket and contracting only the two middle
//! layers directly, halving the number of truncated applications relative
//! to one-sided evaluation.

use num_complex::ComplexFloat;
use num_traits::FloatConst;
use rand::Rng;
use thiserror::Error;
use ndarray as nd;
use ndarray_linalg::SVDInto;
use crate::{
    ComplexFloatExt,
    gate::{ self, RotGate },
    mpo::{ self, Mpo, MpoError },
    mps::{ Mps, MpsError, Truncation },
};

#[derive(Debug, Error)]
pub enum CircuitError {
    #[error(transparent)]
    Mps(#[from] MpsError),

    #[error(transparent)]
    Mpo(#[from] MpoError),
}
pub type CircuitResult<T> = Result<T, CircuitError>;

// Fold one more gate into a running layer product: prime the accumulator,
// multiply, and collapse the doubled priming level back to one.
fn compose<A>(acc: Mpo<A>, gate: Mpo<A>) -> CircuitResult<Mpo<A>>
where A: ComplexFloat + ComplexFloatExt
{
    let mut acc = acc.primed(1).mult(gate)?;
    acc.map_prime(2, 1);
    Ok(acc)
}

/// Build the two layers of one circuit time step: the random single-site
/// rotation layer and the brick-wall entangling layer for parity
/// `step % 2`.
///
/// Both layers map level-0 inputs to level-1 outputs. The random layer
/// draws one gate per site, in site order, from `rng`.
pub fn random_layers<A, R>(n: usize, step: usize, rng: &mut R)
    -> CircuitResult<(Mpo<A>, Mpo<A>)>
where
    A: ComplexFloat + ComplexFloatExt,
    <A as ComplexFloat>::Real: FloatConst + std::fmt::Debug,
    R: Rng + ?Sized,
{
    let mut rot: Mpo<A> = Mpo::identity(n)?;
    for j in 0..n {
        let g = RotGate::sample(rng);
        rot = compose(rot, Mpo::gate1(n, j, &g.matrix())?)?;
    }
    let mut ent: Mpo<A> = Mpo::identity(n)?;
    let mut j = step % 2;
    while j + 1 < n {
        ent = compose(ent, Mpo::crot(n, j, j + 1, 1)?)?;
        j += 2;
    }
    Ok((rot, ent))
}

/// Run a depth-`depth` random circuit on a register state, truncating the
/// state after every layer application.
pub fn apply_random_circuit<A, R>(
    mut state: Mps<A>,
    depth: usize,
    trunc: Truncation<A::Real>,
    rng: &mut R,
) -> CircuitResult<Mps<A>>
where
    A: ComplexFloat + ComplexFloatExt,
    <A as ComplexFloat>::Real: FloatConst + std::fmt::Debug,
    R: Rng + ?Sized,
    nd::Array2<A>: SVDInto<U = nd::Array2<A>, Sigma = nd::Array1<A::Real>, VT = nd::Array2<A>>,
{
    let n = state.nqubits();
    for step in 0..depth {
        let (rot, ent) = random_layers(n, step, rng)?;
        state.no_prime();
        state = rot.apply(state, trunc)?;
        state.no_prime();
        state = ent.apply(state, trunc)?;
    }
    state.no_prime();
    Ok(state)
}

/// Build a reusable sequence of `depth` combined circuit layers.
///
/// Layer `i` is the product (entangling · random) for step `i`, shifted by
/// `i` priming levels: it maps level-`i` inputs to level-(`i`+1) outputs,
/// so distinct layers in the sequence never collide on index identity.
///
/// Under the same `rng` seed, the gates drawn here are exactly those drawn
/// by [`apply_random_circuit`].
pub fn layer_sequence<A, R>(n: usize, depth: usize, rng: &mut R)
    -> CircuitResult<Vec<Mpo<A>>>
where
    A: ComplexFloat + ComplexFloatExt,
    <A as ComplexFloat>::Real: FloatConst + std::fmt::Debug,
    R: Rng + ?Sized,
{
    let mut layers: Vec<Mpo<A>> = Vec::with_capacity(depth);
    for step in 0..depth {
        let (rot, ent) = random_layers(n, step, rng)?;
        let layer = compose(ent, rot)?;
        layers.push(layer.primed(step));
    }
    Ok(layers)
}

/// Evaluate ⟨`left`∣ L<sub>D−1</sub> ··· L<sub>0</sub> ∣`right`⟩ for a
/// layer sequence of depth D, staging the evaluation from both ends.
///
/// `left` is first raised by D priming levels to match the top of the
/// sequence. D = 0 reduces to the plain inner product and D = 1 to the
/// three-term sandwich, both evaluated without any truncating
/// pre-application. For D ≥ 2, layers `0 .. (D−1)/2` are applied to
/// `right` and layers `D−1 ..= (D+1)/2 + 1` (descending, as adjoints) to
/// `left`, truncating after each application; the remaining two middle
/// layers are contracted directly in a single four-term evaluation.
///
/// The middle indices `(D−1)/2` and `(D+1)/2` use integer division and are
/// adjacent for every D; their uneven split between the two sides for even
/// vs. odd D is part of the evaluation order contract and is pinned by the
/// crate's tests.
pub fn staged_overlap<A>(
    mut left: Mps<A>,
    layers: &[Mpo<A>],
    mut right: Mps<A>,
    trunc: Truncation<A::Real>,
) -> CircuitResult<A>
where
    A: ComplexFloat + ComplexFloatExt,
    nd::Array2<A>: SVDInto<U = nd::Array2<A>, Sigma = nd::Array1<A::Real>, VT = nd::Array2<A>>,
{
    let depth = layers.len();
    left.prime(depth);
    if depth == 0 {
        return Ok(left.inner(&right)?);
    }
    if depth == 1 {
        return Ok(mpo::overlap1(&left, &layers[0], &right)?);
    }
    let mid_lo = (depth - 1) / 2;
    let mid_hi = (depth + 1) / 2;
    for layer in layers.iter().take(mid_lo) {
        right = layer.apply(right, trunc)?;
    }
    for layer in layers[mid_hi + 1..].iter().rev() {
        left = layer.adjoint().apply(left, trunc)?;
    }
    Ok(mpo::overlap2(&left, &layers[mid_hi], &layers[mid_lo], &right)?)
}

/// Run the quantum Fourier transform on a register state: for each site
/// `i` in order, a Hadamard on `i` followed by CROT(`j`, `i`, `j − i`) for
/// every `j > i`, truncating after each application.
///
/// No bit-reversal swaps are performed at the end.
pub fn apply_qft<A>(mut state: Mps<A>, trunc: Truncation<A::Real>)
    -> CircuitResult<Mps<A>>
where
    A: ComplexFloat + ComplexFloatExt,
    <A as ComplexFloat>::Real: FloatConst + std::fmt::Debug,
    nd::Array2<A>: SVDInto<U = nd::Array2<A>, Sigma = nd::Array1<A::Real>, VT = nd::Array2<A>>,
{
    let n = state.nqubits();
    for i in 0..n {
        state.no_prime();
        state = Mpo::gate1(n, i, &gate::make_h())?.apply(state, trunc)?;
        for j in i + 1..n {
            state.no_prime();
            state = Mpo::crot(n, j, i, (j - i) as i32)?
                .apply(state, trunc)?;
        }
    }
    state.no_prime();
    Ok(state)
}
