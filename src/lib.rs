//! # consentsync - Ripple to REDCap Consent Forwarding
//!
//! consentsync is a batch synchronization tool built in Rust that forwards
//! newly consented research participants from a Ripple registry into a REDCap
//! project, and confirms each forwarded participant back in Ripple.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Extracting** recently changed participants from Ripple, one export per
//!   configured study group
//! - **Projecting** eligible rows into the destination schema
//!   (`record_id`, `mrn`, `email_consent`)
//! - **Reconciling** against the records REDCap already holds, splitting the
//!   batch into an update partition and a create partition
//! - **Writing back** the terminal consent label to Ripple so a participant
//!   is never forwarded twice
//!
//! ## Architecture
//!
//! consentsync follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (contact discovery, projection, reconciliation,
//!   staging, run orchestration)
//! - [`adapters`] - External integrations (Ripple, REDCap)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use consentsync::config::{load_config, ProjectEnv};
//! use consentsync::core::run::RunCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load configuration
//!     let config = load_config("consentsync.toml")?;
//!
//!     // Create run coordinator
//!     let coordinator = RunCoordinator::new(config, ProjectEnv::Dev)?;
//!
//!     // Execute one sync run
//!     let summary = coordinator.execute_run().await?;
//!
//!     println!("Created {}, updated {}", summary.created, summary.updated);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! consentsync uses the [`domain::SyncError`] type for all errors. One variant
//! is special: `NoEligibleData` is a control signal, not a failure. It means
//! nothing changed upstream since the cutoff, and the run coordinator reports
//! it as a successful no-op run.
//!
//! ```rust,no_run
//! use consentsync::domain::SyncError;
//!
//! fn example() -> Result<(), SyncError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = consentsync::config::load_config("consentsync.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! consentsync uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn, error};
//!
//! info!("Starting run");
//! warn!(mrn = 12345, "Duplicate MRN in destination lookup");
//! error!(error = "timeout", "Push failed");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
