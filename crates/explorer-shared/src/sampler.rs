//! Perturbation sampler.
//!
//! Picks `k` distinct categories (without replacement) and one lens per
//! category (uniform, with replacement across calls). All randomness comes
//! from the caller's RNG; the sampler holds no state.

use crate::catalog::PerturbationCatalog;
use crate::error::{RangeError, SamplingError};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One category with the lens drawn from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerturbationChoice {
    pub category: String,
    pub instruction: String,
}

/// Closed integer range `min..=max` with `1 <= min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: usize,
    pub max: usize,
}

impl CountRange {
    pub fn new(min: usize, max: usize) -> Result<Self, RangeError> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    /// A range that always draws `n`.
    pub fn exactly(n: usize) -> Result<Self, RangeError> {
        Self::new(n, n)
    }

    /// Checks a range that came from deserialization.
    pub fn validate(&self) -> Result<(), RangeError> {
        if self.min == 0 {
            return Err(RangeError::ZeroMinimum(self.min));
        }
        if self.min > self.max {
            return Err(RangeError::Inverted {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    pub fn contains(&self, n: usize) -> bool {
        (self.min..=self.max).contains(&n)
    }

    /// Uniform draw from the closed range.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

impl std::fmt::Display for CountRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Draw exactly `k` choices with pairwise-distinct categories.
pub fn sample<R: Rng + ?Sized>(
    catalog: &PerturbationCatalog,
    k: usize,
    rng: &mut R,
) -> Result<Vec<PerturbationChoice>, SamplingError> {
    let categories = catalog.categories();
    if k > categories.len() {
        return Err(SamplingError::TooManyCategories {
            requested: k,
            available: categories.len(),
        });
    }

    let picked = index::sample(rng, categories.len(), k);
    let choices = picked
        .into_iter()
        .map(|i| {
            let category = &categories[i];
            let lens = rng.gen_range(0..category.lenses.len());
            PerturbationChoice {
                category: category.name.clone(),
                instruction: category.lenses[lens].clone(),
            }
        })
        .collect();

    Ok(choices)
}

/// Draw `k` from `range`, then sample that many choices.
pub fn sample_in_range<R: Rng + ?Sized>(
    catalog: &PerturbationCatalog,
    range: CountRange,
    rng: &mut R,
) -> Result<Vec<PerturbationChoice>, SamplingError> {
    let k = range.draw(rng);
    sample(catalog, k, rng)
}

/// Category names of a set of choices, in order.
pub fn category_names(choices: &[PerturbationChoice]) -> Vec<String> {
    choices.iter().map(|c| c.category.clone()).collect()
}

/// Instruction strings of a set of choices, in order.
pub fn instructions(choices: &[PerturbationChoice]) -> Vec<String> {
    choices.iter().map(|c| c.instruction.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_range_validation() {
        assert!(CountRange::new(1, 3).is_ok());
        assert_eq!(CountRange::new(0, 3), Err(RangeError::ZeroMinimum(0)));
        assert_eq!(
            CountRange::new(4, 2),
            Err(RangeError::Inverted { min: 4, max: 2 })
        );
    }

    #[test]
    fn test_range_draw_stays_inside() {
        let range = CountRange::new(8, 20).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            assert!(range.contains(range.draw(&mut rng)));
        }
    }

    #[test]
    fn test_degenerate_range() {
        let range = CountRange::exactly(3).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(range.draw(&mut rng), 3);
        assert_eq!(range.to_string(), "3-3");
    }
}
