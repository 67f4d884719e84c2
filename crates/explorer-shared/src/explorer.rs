//! Run orchestrator.
//!
//! Sequences boundary exploration, initial idea, gauntlet and translation
//! into a `RunRecord`. Model failures degrade into the affected field; only a
//! sampling misconfiguration aborts the run.

use crate::catalog::PerturbationCatalog;
use crate::clock::Clock;
use crate::error::SamplingError;
use crate::extractor::IdeaExtractor;
use crate::gateway::{complete_or_marker, GatewayRequest, ModelGateway};
use crate::gauntlet::{draw_iterations, Gauntlet, GauntletConfig, GauntletResult};
use crate::prompts;
use crate::sampler::{self, PerturbationChoice};
use crate::settings::{GauntletSettings, StageBudgets};
use crate::translator;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Everything the orchestrator needs besides its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerSettings {
    pub budgets: StageBudgets,
    pub gauntlet: GauntletSettings,
    pub timeout_secs: u64,
    pub extractor: IdeaExtractor,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            budgets: StageBudgets::default(),
            gauntlet: GauntletSettings::default(),
            timeout_secs: 180,
            extractor: IdeaExtractor::default(),
        }
    }
}

/// Full record of one exploration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub cycle: u64,
    pub topic: String,
    pub boundary: String,
    /// Raw model response of the initial-idea stage
    pub initial_response: String,
    pub initial_perturbations: Vec<PerturbationChoice>,
    pub gauntlet: GauntletResult,
    pub translation: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunRecord {
    pub fn elapsed_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

pub struct Explorer<'a, G: ?Sized, C: ?Sized> {
    catalog: &'a PerturbationCatalog,
    gateway: &'a G,
    clock: &'a C,
    settings: ExplorerSettings,
}

impl<'a, G, C> Explorer<'a, G, C>
where
    G: ModelGateway + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(
        catalog: &'a PerturbationCatalog,
        gateway: &'a G,
        clock: &'a C,
        settings: ExplorerSettings,
    ) -> Self {
        Self {
            catalog,
            gateway,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &ExplorerSettings {
        &self.settings
    }

    fn request(&self, prompt: String, budget: u32) -> GatewayRequest {
        GatewayRequest::new(prompt, budget, self.settings.timeout_secs)
    }

    /// Phases 1-2, unperturbed.
    pub fn explore_boundary(&self, topic: &str) -> String {
        info!("reaching boundary");
        let request = self.request(prompts::boundary_prompt(topic), self.settings.budgets.boundary);
        complete_or_marker(self.gateway, "boundary", &request)
    }

    /// Phase 3: initial idea under light perturbation.
    pub fn generate_initial_idea<R: Rng + ?Sized>(
        &self,
        boundary: &str,
        rng: &mut R,
    ) -> Result<(String, Vec<PerturbationChoice>), SamplingError> {
        info!("generating initial idea");
        let choices =
            sampler::sample_in_range(self.catalog, self.settings.gauntlet.initial_perturbations, rng)?;
        let prompt = prompts::initial_idea_prompt(boundary, &sampler::instructions(&choices));
        let request = self.request(prompt, self.settings.budgets.initial_idea);
        let response = complete_or_marker(self.gateway, "initial_idea", &request);
        Ok((response, choices))
    }

    /// Run the gauntlet on an already extracted idea.
    pub fn run_gauntlet<R: Rng + ?Sized>(
        &self,
        initial_idea: &str,
        iterations: usize,
        rng: &mut R,
    ) -> Result<GauntletResult, SamplingError> {
        let config = GauntletConfig {
            perturbations: self.settings.gauntlet.reflection_perturbations,
            max_output_tokens: self.settings.budgets.reflection,
            timeout_secs: self.settings.timeout_secs,
        };
        Gauntlet::new(initial_idea, iterations, self.catalog, self.gateway, config).run(rng)
    }

    /// Full run for one cycle.
    pub fn run<R: Rng + ?Sized>(
        &self,
        cycle: u64,
        topic: &str,
        rng: &mut R,
    ) -> Result<RunRecord, SamplingError> {
        let started_at = self.clock.now();
        info!(cycle, topic, "explorer run starting");

        let boundary = self.explore_boundary(topic);
        let (initial_response, initial_perturbations) = self.generate_initial_idea(&boundary, rng)?;

        let initial_idea = self.settings.extractor.extract(&initial_response);
        let iterations = draw_iterations(self.settings.gauntlet.iterations, rng);
        let gauntlet = self.run_gauntlet(&initial_idea, iterations, rng)?;

        info!("translating final idea");
        let translation = translator::translate(
            self.gateway,
            &gauntlet.final_idea,
            self.settings.budgets.translation,
            self.settings.timeout_secs,
        );

        let finished_at = self.clock.now();
        let record = RunRecord {
            cycle,
            topic: topic.to_string(),
            boundary,
            initial_response,
            initial_perturbations,
            gauntlet,
            translation,
            started_at,
            finished_at,
        };
        info!(
            cycle,
            iterations = record.gauntlet.iterations,
            elapsed_secs = record.elapsed_secs(),
            "explorer run complete"
        );
        Ok(record)
    }
}
