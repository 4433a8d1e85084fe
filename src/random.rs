//! Random number generation helpers.
//!
//! Engines never touch a global generator: a seeded [`StdRng`] is created
//! once per run (or supplied by the caller) and threaded through every
//! operator that draws random numbers.

use crate::error::FacilityError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Rejection-sampling draws allowed per candidate site before giving up.
const ATTEMPTS_PER_SITE: usize = 64;

/// Creates a reproducible generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from `seed`, or from fresh entropy when `None`.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}

/// Draws a site in `[0, num_sites)` that is not contained in `open`.
///
/// Uses rejection sampling with an attempt cap so that a pathological
/// input (every site already open) surfaces as
/// [`FacilityError::SamplingExhausted`] instead of looping forever.
pub fn sample_closed_site<R: Rng>(
    open: &[usize],
    num_sites: usize,
    rng: &mut R,
) -> Result<usize, FacilityError> {
    if open.len() >= num_sites {
        return Err(FacilityError::SamplingExhausted { attempts: 0 });
    }
    let cap = ATTEMPTS_PER_SITE * num_sites;
    for _ in 0..cap {
        let site = rng.random_range(0..num_sites);
        if !open.contains(&site) {
            return Ok(site);
        }
    }
    Err(FacilityError::SamplingExhausted { attempts: cap })
}

/// Draws `count` distinct sites in `[0, num_sites)` in draw order.
pub fn random_facility_set<R: Rng>(
    count: usize,
    num_sites: usize,
    rng: &mut R,
) -> Result<Vec<usize>, FacilityError> {
    let mut facilities = Vec::with_capacity(count);
    for _ in 0..count {
        let site = sample_closed_site(&facilities, num_sites, rng)?;
        facilities.push(site);
    }
    Ok(facilities)
}
