//! The gauntlet: a fixed-count loop that perturbs and re-generates an idea.
//!
//! States run `NotStarted -> Running(i) -> Completed`. Iterations are strictly
//! sequential because each prompt embeds the previous output. The iteration
//! count is fixed at construction and there is no early exit.
//!
//! A failed model call does not stop the loop: its error marker becomes the
//! next idea verbatim and is recorded like any other transition.

use crate::catalog::PerturbationCatalog;
use crate::error::SamplingError;
use crate::gateway::{complete_trimmed_or_marker, GatewayRequest, ModelGateway};
use crate::prompts;
use crate::sampler::{self, CountRange, PerturbationChoice};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Audit entry for one iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// 1-based, contiguous
    pub iteration: usize,
    pub perturbations: Vec<PerturbationChoice>,
    pub categories: Vec<String>,
    pub idea_before: String,
    pub idea_after: String,
}

/// Outcome of a completed gauntlet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GauntletResult {
    pub initial_idea: String,
    pub final_idea: String,
    pub iterations: usize,
    pub reflection_chain: Vec<TransitionRecord>,
}

impl GauntletResult {
    /// Checks the chain invariants: length, contiguous indices, continuity.
    pub fn is_consistent(&self) -> bool {
        if self.reflection_chain.len() != self.iterations {
            return false;
        }
        let mut expected_before = self.initial_idea.as_str();
        for (i, record) in self.reflection_chain.iter().enumerate() {
            if record.iteration != i + 1 || record.idea_before != expected_before {
                return false;
            }
            expected_before = record.idea_after.as_str();
        }
        expected_before == self.final_idea
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GauntletPhase {
    NotStarted,
    /// Iteration `i` is the next one to run
    Running(usize),
    Completed,
}

/// Per-iteration knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GauntletConfig {
    pub perturbations: CountRange,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
}

/// Draw the iteration count once, before the loop starts.
pub fn draw_iterations<R: Rng + ?Sized>(range: CountRange, rng: &mut R) -> usize {
    range.draw(rng)
}

pub struct Gauntlet<'a, G: ?Sized> {
    catalog: &'a PerturbationCatalog,
    gateway: &'a G,
    config: GauntletConfig,
    iterations: usize,
    initial_idea: String,
    current_idea: String,
    chain: Vec<TransitionRecord>,
}

impl<'a, G: ModelGateway + ?Sized> Gauntlet<'a, G> {
    pub fn new(
        initial_idea: impl Into<String>,
        iterations: usize,
        catalog: &'a PerturbationCatalog,
        gateway: &'a G,
        config: GauntletConfig,
    ) -> Self {
        let initial_idea = initial_idea.into();
        Self {
            catalog,
            gateway,
            config,
            iterations,
            current_idea: initial_idea.clone(),
            initial_idea,
            chain: Vec::with_capacity(iterations),
        }
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn current_idea(&self) -> &str {
        &self.current_idea
    }

    pub fn chain(&self) -> &[TransitionRecord] {
        &self.chain
    }

    pub fn phase(&self) -> GauntletPhase {
        let done = self.chain.len();
        if done >= self.iterations {
            GauntletPhase::Completed
        } else if done == 0 {
            GauntletPhase::NotStarted
        } else {
            GauntletPhase::Running(done + 1)
        }
    }

    /// Run one iteration. Returns `None` once all iterations are done.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Option<&TransitionRecord>, SamplingError> {
        if self.phase() == GauntletPhase::Completed {
            return Ok(None);
        }
        let iteration = self.chain.len() + 1;

        let choices = sampler::sample_in_range(self.catalog, self.config.perturbations, rng)?;
        let categories = sampler::category_names(&choices);
        info!(
            iteration,
            total = self.iterations,
            perturbations = %categories.join(", "),
            "gauntlet iteration"
        );

        let prompt = prompts::reflection_prompt(&self.current_idea, &sampler::instructions(&choices));
        let request = GatewayRequest::new(
            prompt,
            self.config.max_output_tokens,
            self.config.timeout_secs,
        );
        let evolved = complete_trimmed_or_marker(self.gateway, "reflection", &request);
        debug!(iteration, preview = %preview(&evolved, 80), "evolved");

        let idea_before = std::mem::replace(&mut self.current_idea, evolved.clone());
        self.chain.push(TransitionRecord {
            iteration,
            perturbations: choices,
            categories,
            idea_before,
            idea_after: evolved,
        });

        Ok(self.chain.last())
    }

    /// Drive the remaining iterations and produce the result.
    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<GauntletResult, SamplingError> {
        info!(iterations = self.iterations, "entering gauntlet");
        while self.step(rng)?.is_some() {}
        info!("gauntlet complete");
        Ok(self.finish())
    }

    fn finish(self) -> GauntletResult {
        GauntletResult {
            initial_idea: self.initial_idea,
            final_idea: self.current_idea,
            iterations: self.iterations,
            reflection_chain: self.chain,
        }
    }
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
