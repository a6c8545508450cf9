//! Shared plumbing for the benchmark binaries: the verbosity toggle, phase
//! timing, and the fixed circuit seed.

use std::time::Instant;

/// Seed used by every random-circuit phase.
///
/// Phases that must run the same circuit (full simulation vs. staged
/// overlap) each reseed their own generator with this value, so the gate
/// draws are bit-for-bit identical between them.
pub const SEED: u64 = 2140;

/// Whether `VERBOSE=1` is set in the environment.
pub fn verbose() -> bool {
    std::env::var("VERBOSE").map(|v| v == "1").unwrap_or(false)
}

/// Milliseconds elapsed since `start`.
pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1e3
}
