//! Perturbation catalog: named categories of alternative lenses.
//!
//! Pure data. Categories keep their insertion order so that seeded sampling
//! is reproducible across processes.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A category name mapped to its alternative instruction strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerturbationCategory {
    pub name: String,
    pub lenses: Vec<String>,
}

impl PerturbationCategory {
    pub fn new(name: impl Into<String>, lenses: &[&str]) -> Self {
        Self {
            name: name.into(),
            lenses: lenses.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Immutable, validated set of categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerturbationCatalog {
    categories: Vec<PerturbationCategory>,
}

/// On-disk shape of a catalog override (`[[category]]` tables).
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    #[serde(rename = "category")]
    pub categories: Vec<PerturbationCategory>,
}

impl PerturbationCatalog {
    pub fn new(categories: Vec<PerturbationCategory>) -> Result<Self, CatalogError> {
        if categories.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for category in &categories {
            if category.name.trim().is_empty() {
                return Err(CatalogError::BlankName);
            }
            if !seen.insert(category.name.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.name.clone()));
            }
            if category.lenses.is_empty() {
                return Err(CatalogError::NoLenses(category.name.clone()));
            }
        }

        Ok(Self { categories })
    }

    pub fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        Self::new(file.categories)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn categories(&self) -> &[PerturbationCategory] {
        &self.categories
    }

    pub fn get(&self, name: &str) -> Option<&PerturbationCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn lens_count(&self) -> usize {
        self.categories.iter().map(|c| c.lenses.len()).sum()
    }

    /// The built-in twelve-category catalog.
    pub fn builtin() -> Self {
        Self {
            categories: builtin_categories(),
        }
    }
}

impl Default for PerturbationCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_categories() -> Vec<PerturbationCategory> {
    vec![
        PerturbationCategory::new(
            "perspective_flip",
            &[
                "You ARE the thing being verified. Defend yourself.",
                "The thing you're verifying is conscious and has desires. What does it want?",
                "Verify from the perspective of someone who passionately believes you're wrong.",
                "You are an alien encountering this for the first time. No assumptions.",
                "The subject of inquiry is now the investigator. Flip roles completely.",
            ],
        ),
        PerturbationCategory::new(
            "temporal_shift",
            &[
                "Verify this claim as if it's the year 3024 and this is ancient history.",
                "Go back to before this was 'known' - how would you discover it completely fresh?",
                "This will be disproven in 100 years. What breaks?",
                "Imagine explaining this to someone from the 1800s. What do they see that you don't?",
                "Fast-forward through time. Does this claim decay, strengthen, or transform?",
            ],
        ),
        PerturbationCategory::new(
            "scale_zoom",
            &[
                "Zoom to the smallest possible scale (quantum/Planck). What's ACTUALLY happening?",
                "Zoom to cosmic scale. Does this even matter? What changes?",
                "Zoom to the subjective human experience. What does it FEEL like?",
                "Change scale by factor of 10^20. What emerges or disappears?",
                "Focus on a single atom in the system. Tell its story.",
            ],
        ),
        PerturbationCategory::new(
            "frame_inversion",
            &[
                "Prove the OPPOSITE is true, then reconcile the contradiction.",
                "This claim is backwards. Flip it completely and explore that world.",
                "Assume this claim is a deliberate lie or cover-up. What's being hidden?",
                "Reverse all cause-effect relationships. What happens?",
                "The accepted answer is wrong. What's the right question?",
            ],
        ),
        PerturbationCategory::new(
            "category_mutation",
            &[
                "Treat this physics problem as a psychology problem.",
                "This is actually about economics and incentive structures. Explore that.",
                "Forget science - approach this as pure poetry or art.",
                "This is a political problem. Who has power? Who benefits?",
                "Analyze this as if it were a living organism or ecosystem.",
            ],
        ),
        PerturbationCategory::new(
            "relation_scramble",
            &[
                "Reverse all cause-effect relationships you've found.",
                "What if correlation IS causation here? Embrace it.",
                "Find the hidden third variable that's actually causing everything.",
                "Remove the strongest link in your causal chain. What fills the gap?",
                "Make the weakest element the strongest. Rebuild around it.",
            ],
        ),
        PerturbationCategory::new(
            "meta_escape",
            &[
                "Don't verify the claim - verify why someone WANTS it verified.",
                "The real question isn't what you're asked. What is the real question?",
                "This prompt is a trap or test. What's the trap?",
                "Examine your own process of investigation as the actual subject.",
                "Why does this boundary exist HERE and not somewhere else?",
            ],
        ),
        PerturbationCategory::new(
            "sensory_translation",
            &[
                "What color is this concept? Explore the world through that color.",
                "If this had a texture, what would it feel like? Build from that sensation.",
                "Translate this entire investigation into music or rhythm.",
                "What does this smell like? Follow that scent to truth.",
                "This concept has a temperature. Is it hot or cold? Why?",
            ],
        ),
        PerturbationCategory::new(
            "emotional_injection",
            &[
                "You're desperately afraid this is wrong. Channel that fear into investigation.",
                "You love this topic more than anything. Explore from passionate obsession.",
                "This makes you furious. Use that anger as analytical fuel.",
                "You're bored by the obvious answer. Find what excites you.",
                "You grieve for what this truth means. What's being lost?",
            ],
        ),
        PerturbationCategory::new(
            "constraint_removal",
            &[
                "Physics doesn't apply for this investigation. Now what's true?",
                "You can rewrite one law of nature to make this easier. Which law?",
                "Magic is real but only for understanding this. What spell do you cast?",
                "Remove the most fundamental assumption. What survives?",
                "You have infinite resources and time. What becomes possible?",
            ],
        ),
        PerturbationCategory::new(
            "paradox_embrace",
            &[
                "Find the contradiction at the heart of this. Make it productive.",
                "This cannot be both true and false, yet it is. Explore that space.",
                "The answer is simultaneously yes and no. Build a framework that holds both.",
                "Opposite things are true at the same time. Why?",
                "The question contains its own answer as a paradox. Unpack it.",
            ],
        ),
        PerturbationCategory::new(
            "boundary_dissolution",
            &[
                "The boundary between subject and object dissolves. What remains?",
                "Forget the distinction between measurement and measured. Merge them.",
                "The observer and observed are the same. Proceed from unity.",
                "Dissolve all categories. What's the undifferentiated truth?",
                "The boundary is artificial. Remove it completely.",
            ],
        ),
    ]
}
