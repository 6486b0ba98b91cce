//! Rx-Interactions Core Library
//!
//! Drug-safety interaction discovery for a prescribing workflow, over a
//! read-only relational reference dataset.
//!
//! # Architecture
//!
//! ```text
//!                 Patient ──► CandidateSet (sorted by drug id)
//!                                     │
//!        ┌────────────────────────────┼────────────────────────────┐
//!        │                            │                            │
//!        ▼                            ▼                            ▼
//!   food query                  allergy query               drug-to-drug query
//!  (own connection)            (own connection)              (own connection)
//!        │                            │                            │
//!        │                            │                      merge-join vs
//!        │                            │                      candidate set
//!        └────────────────────────────┼────────────────────────────┘
//!                                     ▼
//!                        Vec<DrugInteraction> or one error
//! ```
//!
//! # Core Principle
//!
//! **All or nothing.** The three branches run concurrently; the first failure
//! cancels the others and is returned alone. A partial interaction list is
//! never handed back as if it were complete.
//!
//! # Modules
//!
//! - [`db`]: SQLite reference store, catalog lookups and interaction queries
//! - [`models`]: Domain types (Drug, Allergy, Patient, DrugInteraction)
//! - [`engine`]: Candidate assembly, merge-join and concurrent fan-out
//! - [`config`]: Prescriber configuration
//! - [`cancel`]: Shared cancellation token

pub mod cancel;
pub mod config;
pub mod db;
pub mod engine;
pub mod models;
mod prescriber;

// Re-export commonly used types
pub use cancel::CancelToken;
pub use config::{ConfigError, PrescriberConfig};
pub use db::{Database, QueryCategory, ReferenceStore, SqliteReferenceStore, StoreError};
pub use engine::{CandidateSet, EngineError, InteractionEngine};
pub use models::{Allergy, Drug, DrugInteraction, InteractionKind, Participants, Patient};
pub use prescriber::Prescriber;

// =========================================================================
// Top-level Error Type
// =========================================================================

#[derive(Debug, thiserror::Error)]
pub enum PrescriberError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Reference store error: {0}")]
    Store(#[from] StoreError),

    #[error("Interaction lookup failed: {0}")]
    Engine(#[from] EngineError),
}

impl PrescriberError {
    /// Category of the query that failed, when there is one.
    pub fn category(&self) -> Option<QueryCategory> {
        match self {
            PrescriberError::Config(_) => None,
            PrescriberError::Store(err) => err.category(),
            PrescriberError::Engine(err) => err.category(),
        }
    }
}
