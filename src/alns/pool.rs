//! Adaptive operator pools with roulette-wheel selection.

use super::types::FacilityOperator;
use crate::error::FacilityError;
use rand::Rng;

/// One pool member with its selection weight and segment statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorRecord<O> {
    operator: O,
    weight: f64,
    segment_score: f64,
    segment_uses: usize,
}

impl<O> OperatorRecord<O> {
    fn new(operator: O) -> Self {
        Self {
            operator,
            weight: 1.0,
            segment_score: 0.0,
            segment_uses: 0,
        }
    }

    pub fn operator(&self) -> &O {
        &self.operator
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn add_reward(&mut self, amount: f64) {
        self.segment_score += amount;
    }

    pub fn mark_used(&mut self) {
        self.segment_uses += 1;
    }

    /// Uses since the last segment boundary.
    pub fn usage_count(&self) -> usize {
        self.segment_uses
    }

    pub fn score(&self) -> f64 {
        self.segment_score
    }

    pub fn reset_since_last_segment(&mut self) {
        self.segment_score = 0.0;
        self.segment_uses = 0;
    }

    /// Smooths the weight toward the segment's average score.
    ///
    /// w_new = w * (1 - r) + r * (score / uses)
    ///
    /// Unused operators keep their weight. Counters are reset either way.
    ///
    /// Reference: Ropke & Pisinger (2006), Equation (1)
    fn react(&mut self, reaction_factor: f64) {
        if self.segment_uses > 0 {
            let average = self.segment_score / self.segment_uses as f64;
            self.weight = self.weight * (1.0 - reaction_factor) + reaction_factor * average;
        }
        self.reset_since_last_segment();
    }
}

/// Indexed operator records sharing one roulette wheel.
///
/// Selection, rewards and resets all address operators by their index in
/// the pool, which is the order they were supplied in.
#[derive(Debug, Clone)]
pub struct OperatorPool<O> {
    records: Vec<OperatorRecord<O>>,
    fitness_sum: f64,
}

impl<O: FacilityOperator> OperatorPool<O> {
    /// Builds a pool with every weight at 1.
    ///
    /// `kind` names the pool in the error returned when `operators` is empty.
    pub fn new(kind: &'static str, operators: Vec<O>) -> Result<Self, FacilityError> {
        if operators.is_empty() {
            return Err(FacilityError::EmptyOperatorPool(kind));
        }
        let records: Vec<_> = operators.into_iter().map(OperatorRecord::new).collect();
        let fitness_sum = records.len() as f64;
        Ok(Self {
            records,
            fitness_sum,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[OperatorRecord<O>] {
        &self.records
    }

    pub fn operator(&self, index: usize) -> &O {
        &self.records[index].operator
    }

    /// Sum of all weights.
    pub fn fitness_sum(&self) -> f64 {
        self.fitness_sum
    }

    pub fn weights(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.weight).collect()
    }

    /// Draws an operator index by roulette wheel.
    ///
    /// The roll lies in `(0, fitness_sum]`. A pool whose weights have all
    /// decayed to zero falls back to a uniform draw.
    pub fn select<R: Rng>(&self, rng: &mut R) -> usize {
        if self.fitness_sum <= 0.0 || !self.fitness_sum.is_finite() {
            return rng.random_range(0..self.records.len());
        }
        let roll = self.fitness_sum - rng.random_range(0.0..self.fitness_sum);
        self.select_with(roll)
    }

    /// Index of the first operator whose cumulative weight reaches `roll`.
    pub fn select_with(&self, roll: f64) -> usize {
        let mut cumulative = 0.0;
        for (index, record) in self.records.iter().enumerate() {
            cumulative += record.weight;
            if cumulative >= roll {
                return index;
            }
        }
        self.records.len() - 1
    }

    /// Counts one use of the operator at `index`.
    pub fn use_operator(&mut self, index: usize) -> &O {
        let record = &mut self.records[index];
        record.mark_used();
        &record.operator
    }

    pub fn reward(&mut self, index: usize, amount: f64) {
        self.records[index].add_reward(amount);
    }

    /// Reacts every weight to its segment score, then recomputes the sum.
    pub fn end_segment(&mut self, reaction_factor: f64) {
        for record in &mut self.records {
            record.react(reaction_factor);
        }
        self.fitness_sum = self.records.iter().map(|r| r.weight).sum();
    }

    /// `name=weight` pairs for logging.
    pub fn describe(&self) -> String {
        self.records
            .iter()
            .map(|r| format!("{}={:.3}", r.operator.name(), r.weight))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
