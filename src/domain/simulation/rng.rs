//! Random source handed explicitly to every simulation component.
//!
//! A run owns exactly one `SimRng`. The generator, the fault injector and the
//! active strategy all draw from it through `&mut SimRng`, so a seed fully
//! determines a trial.

use rand::SeedableRng;
use rand::rngs::StdRng;

pub type SimRng = StdRng;

/// Creates the run's generator from `seed`, or from a freshly drawn seed.
///
/// Returns the seed actually used so it can be reported and replayed.
pub fn seeded_rng(seed: Option<u64>) -> (SimRng, u64) {
    let seed = seed.unwrap_or_else(rand::random::<u64>);
    (StdRng::seed_from_u64(seed), seed)
}
