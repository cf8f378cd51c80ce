//! Domain models and types for consentsync.
//!
//! This module contains the core domain models, types, and business rules.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`Mrn`], [`GlobalId`], [`StudyGroup`])
//! - **Record models** ([`SourceRecord`], [`ProjectedRecord`],
//!   [`ReconciliationBatch`], [`DestinationKnowledge`])
//! - **Consent vocabulary** ([`ConsentStatus`])
//! - **Error types** ([`SyncError`], [`RippleError`], [`RedcapError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Newtype wrappers prevent mixing identifier kinds:
//!
//! ```rust
//! use consentsync::domain::{GlobalId, Mrn};
//!
//! # fn example() -> std::result::Result<(), String> {
//! let mrn = Mrn::parse("12345")?;
//! let global_id = GlobalId::new("5f3a...")?;
//!
//! // This won't compile - type safety prevents mixing IDs
//! // let wrong: Mrn = global_id;  // Compile error!
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, SyncError>`](Result). The
//! `NoEligibleData` variant is a control signal, not a failure; only the run
//! orchestrator recovers from it.

pub mod consent;
pub mod errors;
pub mod ids;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use consent::ConsentStatus;
pub use errors::{RedcapError, RippleError, SyncError};
pub use ids::{GlobalId, Mrn, StudyGroup};
pub use record::{
    ConsentTransitionGroup, DestinationKnowledge, ProjectedRecord, ReconciliationBatch,
    SourceRecord,
};
pub use result::Result;
