//! Physical site indices with explicit priming tags.
//!
//! Every physical index in this crate is a [`Q`]: the position of a
//! two-level site in the register plus an integer *prime* tag. The tag
//! exists to disambiguate multiple uses of the same site within one
//! expression — an operator's output index sits one prime level above its
//! input index, and layers held in a sequence are shifted by their step
//! index so no two layers collide on index identity. Contractions in
//! [`mps`][crate::mps] and [`mpo`][crate::mpo] only join indices that agree
//! on both fields, so priming mistakes surface as index-mismatch errors
//! instead of silently contracting the wrong legs.

use std::fmt;

/// A primed physical index for a two-level site.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Q {
    /// Position of the site in the register.
    pub site: usize,
    /// Priming tag.
    pub prime: usize,
}

impl Q {
    /// A fresh, unprimed index for the `site`-th site.
    pub fn new(site: usize) -> Self { Self { site, prime: 0 } }

    /// Raise the priming tag by `p`.
    pub fn prime(&mut self, p: usize) { self.prime += p; }

    /// Return a copy of `self` with the priming tag raised by `p`.
    pub fn primed(self, p: usize) -> Self {
        Self { site: self.site, prime: self.prime + p }
    }

    /// If the priming tag equals `from`, set it to `to`.
    pub fn map_prime(&mut self, from: usize, to: usize) {
        if self.prime == from { self.prime = to; }
    }

    /// Reset the priming tag to zero.
    pub fn no_prime(&mut self) { self.prime = 0; }
}

impl From<usize> for Q {
    fn from(site: usize) -> Self { Self::new(site) }
}

impl fmt::Display for Q {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q:{}", self.site)?;
        for _ in 0..self.prime { write!(f, "'")?; }
        Ok(())
    }
}
