//! Immutable run settings injected into the orchestrator.
//!
//! Scaffolding calls (boundary, initial idea) get large budgets; per-iteration
//! reflection and translation get small ones.

use crate::error::RangeError;
use crate::sampler::CountRange;
use serde::{Deserialize, Serialize};

/// Max output tokens per stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageBudgets {
    #[serde(default = "default_topic_budget")]
    pub topic: u32,

    #[serde(default = "default_boundary_budget")]
    pub boundary: u32,

    #[serde(default = "default_initial_idea_budget")]
    pub initial_idea: u32,

    #[serde(default = "default_reflection_budget")]
    pub reflection: u32,

    #[serde(default = "default_translation_budget")]
    pub translation: u32,
}

fn default_topic_budget() -> u32 {
    100
}

fn default_boundary_budget() -> u32 {
    4000
}

fn default_initial_idea_budget() -> u32 {
    1500
}

fn default_reflection_budget() -> u32 {
    800
}

fn default_translation_budget() -> u32 {
    400
}

impl Default for StageBudgets {
    fn default() -> Self {
        Self {
            topic: default_topic_budget(),
            boundary: default_boundary_budget(),
            initial_idea: default_initial_idea_budget(),
            reflection: default_reflection_budget(),
            translation: default_translation_budget(),
        }
    }
}

impl StageBudgets {
    /// Name of the first zero budget, if any.
    pub fn first_zero(&self) -> Option<&'static str> {
        [
            ("topic", self.topic),
            ("boundary", self.boundary),
            ("initial_idea", self.initial_idea),
            ("reflection", self.reflection),
            ("translation", self.translation),
        ]
        .into_iter()
        .find(|(_, budget)| *budget == 0)
        .map(|(name, _)| name)
    }
}

/// Gauntlet shape: how many iterations and how hard each one perturbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GauntletSettings {
    /// Prefix length of before/after previews in the transcript
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,

    #[serde(default = "default_iterations")]
    pub iterations: CountRange,

    #[serde(default = "default_initial_perturbations")]
    pub initial_perturbations: CountRange,

    #[serde(default = "default_reflection_perturbations")]
    pub reflection_perturbations: CountRange,
}

fn default_iterations() -> CountRange {
    CountRange { min: 8, max: 20 }
}

fn default_initial_perturbations() -> CountRange {
    CountRange { min: 1, max: 2 }
}

fn default_reflection_perturbations() -> CountRange {
    CountRange { min: 1, max: 3 }
}

fn default_preview_chars() -> usize {
    100
}

impl Default for GauntletSettings {
    fn default() -> Self {
        Self {
            preview_chars: default_preview_chars(),
            iterations: default_iterations(),
            initial_perturbations: default_initial_perturbations(),
            reflection_perturbations: default_reflection_perturbations(),
        }
    }
}

impl GauntletSettings {
    pub fn validate(&self) -> Result<(), RangeError> {
        self.iterations.validate()?;
        self.initial_perturbations.validate()?;
        self.reflection_perturbations.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_defaults() {
        let budgets = StageBudgets::default();
        assert_eq!(budgets.boundary, 4000);
        assert_eq!(budgets.initial_idea, 1500);
        assert_eq!(budgets.reflection, 800);
        assert_eq!(budgets.translation, 400);
        assert!(budgets.reflection < budgets.initial_idea);
        assert_eq!(budgets.first_zero(), None);
    }

    #[test]
    fn test_first_zero_budget() {
        let budgets = StageBudgets {
            reflection: 0,
            ..StageBudgets::default()
        };
        assert_eq!(budgets.first_zero(), Some("reflection"));
    }

    #[test]
    fn test_gauntlet_defaults_validate() {
        let settings = GauntletSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.iterations, CountRange { min: 8, max: 20 });
        assert_eq!(settings.preview_chars, 100);
    }
}
