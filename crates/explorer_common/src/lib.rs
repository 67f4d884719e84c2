//! Explorer Common - the environment edge of the explorer.
//!
//! Configuration, the HTTP model gateway, the local transcript store, git
//! publishing and logging setup.

pub mod config;
pub mod llm_client;
pub mod logging;
pub mod publisher;
pub mod store;

pub use config::{ConfigError, ExplorerConfig};
pub use llm_client::HttpGateway;
pub use publisher::GitPublisher;
pub use store::LocalStore;
