//! Dense statevector register, the full-simulation comparison engine.
//!
//! Stores all 2<sup>*n*</sup> amplitudes with site 0 as the most
//! significant bit of the basis index — the same ordering produced by
//! [`Mps::into_vector`][crate::mps::Mps::into_vector], so the two engines
//! can be compared amplitude for amplitude. The random circuit here draws
//! from the same [`RotGate`] set in the same order as the matrix product
//! driver, so a shared seed yields the same circuit on both engines.

use std::f64::consts::{ FRAC_PI_2, TAU };
use ndarray as nd;
use num_complex::Complex64 as C64;
use rand::Rng;
use crate::{
    gate::{ self, RotGate },
    mps::{ MpsError, MpsResult, Template },
};

/// A dense statevector over a register of two-level sites.
#[derive(Clone, Debug, PartialEq)]
pub struct StateVector {
    n: usize, // ≥ 1
    amps: Vec<C64>, // length 2^n
}

impl StateVector {
    /// Initialize a register of `n` sites to a named template state.
    ///
    /// Fails if `n == 0`.
    pub fn from_template(n: usize, form: Template) -> MpsResult<Self> {
        if n == 0 { return Err(MpsError::EmptySystem); }
        let len: usize = 1 << n;
        let mut amps: Vec<C64> = vec![C64::from(0.0); len];
        match form {
            Template::AllZero => { amps[0] = C64::from(1.0); },
            Template::AllOne => { amps[len - 1] = C64::from(1.0); },
            Template::AllPlus => {
                let c = C64::from((len as f64).sqrt().recip());
                amps.iter_mut().for_each(|a| { *a = c; });
            },
            Template::AllMinus => {
                let c = C64::from((len as f64).sqrt().recip());
                amps.iter_mut().enumerate()
                    .for_each(|(b, a)| {
                        let sign =
                            if (b as u32).count_ones() % 2 == 0
                            { 1.0 } else { -1.0 };
                        *a = c * sign;
                    });
            },
            Template::Ghz => {
                let c = C64::from(0.5_f64.sqrt());
                amps[0] = c;
                amps[len - 1] = c;
            },
            Template::W => {
                let c = C64::from((n as f64).sqrt().recip());
                for k in 0..n { amps[1 << k] = c; }
            },
        }
        Ok(Self { n, amps })
    }

    /// Return the number of sites.
    pub fn nqubits(&self) -> usize { self.n }

    /// Return the amplitude of the `k`-th basis state.
    pub fn amp(&self, k: usize) -> C64 { self.amps[k] }

    /// Return the norm of the state.
    pub fn norm(&self) -> f64 {
        self.amps.iter()
            .map(|a| a.norm_sqr())
            .sum::<f64>()
            .sqrt()
    }

    /// Compute the inner product ⟨`self`∣`other`⟩.
    pub fn inner(&self, other: &Self) -> C64 {
        self.amps.iter().zip(other.amps.iter())
            .map(|(a, b)| a.conj() * b)
            .sum()
    }

    /// Apply a single-site gate to site `k`.
    pub fn apply_gate1(&mut self, k: usize, u: &nd::Array2<C64>)
        -> &mut Self
    {
        let mask: usize = 1 << (self.n - 1 - k);
        for i in 0..self.amps.len() {
            if i & mask != 0 { continue; }
            let j = i | mask;
            let (a0, a1) = (self.amps[i], self.amps[j]);
            self.amps[i] = u[[0, 0]] * a0 + u[[0, 1]] * a1;
            self.amps[j] = u[[1, 0]] * a0 + u[[1, 1]] * a1;
        }
        self
    }

    /// Multiply basis states with sites `c` and `t` both in ∣1⟩ by
    /// e<sup>iθ</sup>.
    pub fn apply_controlled_phase(&mut self, c: usize, t: usize, theta: f64)
        -> &mut Self
    {
        let mask: usize = (1 << (self.n - 1 - c)) | (1 << (self.n - 1 - t));
        let ph = C64::cis(theta);
        for (i, a) in self.amps.iter_mut().enumerate() {
            if i & mask == mask { *a *= ph; }
        }
        self
    }

    /// Exchange sites `a` and `b`.
    pub fn apply_swap(&mut self, a: usize, b: usize) -> &mut Self {
        let ma: usize = 1 << (self.n - 1 - a);
        let mb: usize = 1 << (self.n - 1 - b);
        for i in 0..self.amps.len() {
            if i & ma != 0 && i & mb == 0 {
                self.amps.swap(i, i ^ ma ^ mb);
            }
        }
        self
    }

    /// Run a depth-`depth` random circuit: per step, one random rotation
    /// per site followed by the brick-wall controlled-phase layer with
    /// parity `step % 2`.
    ///
    /// Under the same `rng` seed, the gates drawn here match the matrix
    /// product driver's.
    pub fn random_circuit<R>(&mut self, depth: usize, rng: &mut R)
        -> &mut Self
    where R: Rng + ?Sized
    {
        for step in 0..depth {
            for j in 0..self.n {
                self.apply_gate1(j, &RotGate::sample(rng).matrix());
            }
            let mut j = step % 2;
            while j + 1 < self.n {
                self.apply_controlled_phase(j, j + 1, FRAC_PI_2);
                j += 2;
            }
        }
        self
    }

    /// Run the quantum Fourier transform: per site, a Hadamard followed by
    /// the controlled-phase ladder, with bit-reversal swaps at the end.
    pub fn qft(&mut self) -> &mut Self {
        for i in 0..self.n {
            self.apply_gate1(i, &gate::HMAT);
            for d in 2..=(self.n - i) {
                self.apply_controlled_phase(
                    i + d - 1, i, TAU / (1 << d) as f64);
            }
        }
        for i in 0..self.n / 2 {
            self.apply_swap(i, self.n - 1 - i);
        }
        self
    }
}

#[cfg(test)]
mod tests {
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
    fn template_norms() {
        for form in TEMPLATES {
            for n in 1..6 {
                let state = StateVector::from_template(n, form).unwrap();
                assert!((state.norm() - 1.0).abs() < 1e-12);
                assert!((state.inner(&state) - C64::from(1.0)).norm() < 1e-12);
            }
        }
    }

    #[test]
    fn qft_of_zero_is_uniform() {
        let n = 4;
        let mut state
            = StateVector::from_template(n, Template::AllZero).unwrap();
        state.qft();
        let c = C64::from(0.25);
        for k in 0..(1 << n) {
            assert!((state.amp(k) - c).norm() < 1e-12);
        }
    }

    #[test]
    fn swap_exchanges_sites() {
        // |100> -> |001>
        let mut state
            = StateVector::from_template(3, Template::AllZero).unwrap();
        state.apply_gate1(0, &gate::make_sx());
        state.apply_gate1(0, &gate::make_sx()); // SX² = X
        assert!((state.amp(0b100) - C64::from(1.0)).norm() < 1e-12);
        state.apply_swap(0, 2);
        assert!((state.amp(0b001) - C64::from(1.0)).norm() < 1e-12);
        assert!(state.amp(0b100).norm() < 1e-12);
    }

    #[test]
    fn controlled_phase_targets_ones() {
        let mut state
            = StateVector::from_template(2, Template::AllPlus).unwrap();
        state.apply_controlled_phase(0, 1, FRAC_PI_2);
        let half = C64::from(0.5);
        assert!((state.amp(0b00) - half).norm() < 1e-12);
        assert!((state.amp(0b01) - half).norm() < 1e-12);
        assert!((state.amp(0b10) - half).norm() < 1e-12);
        assert!((state.amp(0b11) - half * C64::i()).norm() < 1e-12);
    }
}
