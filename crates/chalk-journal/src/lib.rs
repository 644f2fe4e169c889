//! # chalk-journal
//!
//! The journaling core: exponential-backoff retry for the analysis call, the
//! orchestrator that turns submitted text into a persisted entry, and the
//! helpers that order and render the live feed.

pub mod error;
pub mod feed;
pub mod orchestrator;
pub mod retry;

pub use error::SubmitError;
pub use orchestrator::{AnalysisOrchestrator, OrchestratorSettings, SubmitOutcome};
pub use retry::RetryPolicy;
