//! # chalk-core
//!
//! Core types shared across the chalk crates:
//! - Journal entry structs (stored entries, drafts, analysis results)
//! - Session identity and the identity lifecycle states
//! - The submission state machine published by the orchestrator
//! - ID prefix constants
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod placeholders;

pub use entities::{AnalysisResult, JournalEntry, NewJournalEntry};
pub use errors::CoreError;
pub use identity::{IdentityState, SessionIdentity};
