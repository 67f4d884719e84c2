//! Core of the edge explorer: perturbation catalog and sampler, idea
//! extraction, the gauntlet loop, translation and run orchestration.
//!
//! Nothing here touches the network or writes files. The model and the
//! storage target are reached through the `ModelGateway`, `TranscriptSink`
//! and `Publisher` traits.

pub mod catalog;
pub mod clock;
pub mod error;
pub mod explorer;
pub mod extractor;
pub mod gateway;
pub mod gauntlet;
pub mod persist;
pub mod prompts;
pub mod sampler;
pub mod settings;
pub mod synthesis;
pub mod topic;
pub mod transcript;
pub mod translator;

pub use catalog::{PerturbationCatalog, PerturbationCategory};
pub use error::{CatalogError, GatewayError, PersistenceError, RangeError, SamplingError};
pub use explorer::{Explorer, ExplorerSettings, RunRecord};
pub use gateway::{GatewayRequest, GatewayResponse, ModelGateway};
pub use gauntlet::{GauntletResult, TransitionRecord};
pub use sampler::{CountRange, PerturbationChoice};
