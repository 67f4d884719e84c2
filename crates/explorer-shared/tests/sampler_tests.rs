//! Tests for sampler.rs

use explorer_shared::catalog::{PerturbationCatalog, PerturbationCategory};
use explorer_shared::error::SamplingError;
use explorer_shared::sampler::{sample, sample_in_range, CountRange};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn small_catalog() -> PerturbationCatalog {
    PerturbationCatalog::new(vec![
        PerturbationCategory::new("alpha", &["a1", "a2"]),
        PerturbationCategory::new("beta", &["b1"]),
        PerturbationCategory::new("gamma", &["g1", "g2", "g3"]),
    ])
    .unwrap()
}

#[test]
fn test_sample_categories_are_distinct() {
    let catalog = PerturbationCatalog::builtin();
    let mut rng = StdRng::seed_from_u64(11);

    for k in 0..=catalog.len() {
        for _ in 0..20 {
            let choices = sample(&catalog, k, &mut rng).unwrap();
            assert_eq!(choices.len(), k);
            let names: HashSet<_> = choices.iter().map(|c| c.category.as_str()).collect();
            assert_eq!(names.len(), k);
        }
    }
}

#[test]
fn test_sample_instruction_belongs_to_category() {
    let catalog = small_catalog();
    let mut rng = StdRng::seed_from_u64(5);

    for _ in 0..50 {
        for choice in sample(&catalog, 3, &mut rng).unwrap() {
            let category = catalog.get(&choice.category).unwrap();
            assert!(category.lenses.contains(&choice.instruction));
        }
    }
}

#[test]
fn test_sample_too_many_categories_fails() {
    let catalog = small_catalog();
    let mut rng = StdRng::seed_from_u64(5);

    let result = sample(&catalog, 4, &mut rng);
    assert_eq!(
        result,
        Err(SamplingError::TooManyCategories {
            requested: 4,
            available: 3,
        })
    );
}

#[test]
fn test_sample_in_range_misconfigured_range_fails() {
    let catalog = small_catalog();
    let mut rng = StdRng::seed_from_u64(5);
    let range = CountRange::exactly(5).unwrap();

    assert!(matches!(
        sample_in_range(&catalog, range, &mut rng),
        Err(SamplingError::TooManyCategories { requested: 5, .. })
    ));
}

#[test]
fn test_sample_in_range_respects_bounds() {
    let catalog = PerturbationCatalog::builtin();
    let range = CountRange::new(1, 3).unwrap();
    let mut rng = StdRng::seed_from_u64(99);

    let mut seen = HashSet::new();
    for _ in 0..300 {
        let n = sample_in_range(&catalog, range, &mut rng).unwrap().len();
        assert!(range.contains(n));
        seen.insert(n);
    }
    // all three counts show up over enough draws
    assert_eq!(seen.len(), 3);
}

#[test]
fn test_sample_reproducible_with_seed() {
    let catalog = PerturbationCatalog::builtin();
    let range = CountRange::new(1, 3).unwrap();

    let mut first = StdRng::seed_from_u64(2024);
    let mut second = StdRng::seed_from_u64(2024);
    for _ in 0..25 {
        assert_eq!(
            sample_in_range(&catalog, range, &mut first).unwrap(),
            sample_in_range(&catalog, range, &mut second).unwrap()
        );
    }
}
