//! Particles and the swarm they form.
//!
//! Particles carry facility sets only. Customer assignments are never
//! stored; fitness is recomputed from the position whenever it changes.

use crate::error::FacilityError;
use crate::problem::{Comparator, FacilityProblem};
use crate::random::{random_facility_set, sample_closed_site};
use rand::Rng;

/// Perturbation probabilities applied to one particle update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub inertia: f64,
    pub cognitive: f64,
    pub social: f64,
}

/// One candidate facility set with its personal best.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Particle {
    position: Vec<usize>,
    fitness: i64,
    best_position: Vec<usize>,
    best_fitness: i64,
}

impl Particle {
    /// Creates a particle at `position`, which also becomes its personal best.
    pub fn from_position(problem: &FacilityProblem, position: Vec<usize>) -> Self {
        let fitness = problem.evaluate(&position);
        Self {
            best_position: position.clone(),
            best_fitness: fitness,
            position,
            fitness,
        }
    }

    /// Creates a particle at a random set of `p` distinct sites.
    pub fn random<R: Rng>(problem: &FacilityProblem, rng: &mut R) -> Result<Self, FacilityError> {
        let position = random_facility_set(problem.num_facilities(), problem.num_sites(), rng)?;
        Ok(Self::from_position(problem, position))
    }

    pub fn position(&self) -> &[usize] {
        &self.position
    }

    pub fn fitness(&self) -> i64 {
        self.fitness
    }

    pub fn best_position(&self) -> &[usize] {
        &self.best_position
    }

    pub fn best_fitness(&self) -> i64 {
        self.best_fitness
    }

    /// Customer assignment of the current position, computed on demand.
    pub fn customer_assignment(&self, problem: &FacilityProblem) -> Vec<usize> {
        problem.assign(&self.position)
    }

    /// Moves the particle to the best of three perturbed candidates.
    ///
    /// Candidates derive from the current position (`inertia`), the personal
    /// best (`cognitive`) and `guide`'s position (`social`). Ties between
    /// candidates go to the later one. The personal best is replaced only on
    /// strict improvement.
    pub fn update<R: Rng>(
        &mut self,
        guide: &Particle,
        coefficients: Coefficients,
        problem: &FacilityProblem,
        rng: &mut R,
    ) -> Result<(), FacilityError> {
        let comparator = problem.comparator();
        let candidates = [
            perturb(&self.position, self.fitness, coefficients.inertia, problem, rng)?,
            perturb(
                &self.best_position,
                self.best_fitness,
                coefficients.cognitive,
                problem,
                rng,
            )?,
            perturb(&guide.position, guide.fitness, coefficients.social, problem, rng)?,
        ];

        let [first, second, third] = candidates;
        let chosen = [second, third]
            .into_iter()
            .fold(first, |best, next| pick_later_on_tie(&comparator, best, next));

        self.position = chosen.0;
        self.fitness = chosen.1;
        if comparator.better_than(self.fitness, self.best_fitness) {
            self.best_position = self.position.clone();
            self.best_fitness = self.fitness;
        }
        Ok(())
    }
}

fn pick_later_on_tie(
    comparator: &Comparator,
    current: (Vec<usize>, i64),
    next: (Vec<usize>, i64),
) -> (Vec<usize>, i64) {
    if comparator.better_than(current.1, next.1) {
        current
    } else {
        next
    }
}

/// With probability `probability`, exchanges one facility of `source`;
/// otherwise returns `source` unchanged.
fn perturb<R: Rng>(
    source: &[usize],
    fitness: i64,
    probability: f64,
    problem: &FacilityProblem,
    rng: &mut R,
) -> Result<(Vec<usize>, i64), FacilityError> {
    if rng.random_range(0.0..1.0) < probability {
        let position = exchange(source, problem.num_sites(), rng)?;
        let fitness = problem.evaluate(&position);
        Ok((position, fitness))
    } else {
        Ok((source.to_vec(), fitness))
    }
}

/// Replaces one random slot with a random site not already in `position`.
pub fn exchange<R: Rng>(
    position: &[usize],
    num_sites: usize,
    rng: &mut R,
) -> Result<Vec<usize>, FacilityError> {
    let mut next = position.to_vec();
    if next.is_empty() {
        return Ok(next);
    }
    let slot = rng.random_range(0..next.len());
    next[slot] = sample_closed_site(position, num_sites, rng)?;
    Ok(next)
}

/// A population of particles.
#[derive(Debug, Clone)]
pub struct Swarm {
    particles: Vec<Particle>,
}

impl Swarm {
    /// Creates `size` particles at random positions.
    pub fn random<R: Rng>(
        size: usize,
        problem: &FacilityProblem,
        rng: &mut R,
    ) -> Result<Self, FacilityError> {
        let particles = (0..size)
            .map(|_| Particle::random(problem, rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { particles })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Best particle by current fitness; ties keep the first found.
    pub fn global_best(&self, comparator: &Comparator) -> Option<&Particle> {
        self.particles.iter().reduce(|best, p| {
            if comparator.better_than(p.fitness, best.fitness) {
                p
            } else {
                best
            }
        })
    }

    /// Updates every particle in order against the same `guide`.
    pub fn update_all<R: Rng>(
        &mut self,
        guide: &Particle,
        coefficients: Coefficients,
        problem: &FacilityProblem,
        rng: &mut R,
    ) -> Result<(), FacilityError> {
        for particle in &mut self.particles {
            particle.update(guide, coefficients, problem, rng)?;
        }
        Ok(())
    }
}
