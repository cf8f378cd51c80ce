//! Core reconciliation engine for consentsync.
//!
//! This module contains the run pipeline and its pure building blocks:
//!
//! - [`contact`] - dynamic contact-column discovery and channel extraction
//! - [`project`] - projection of source rows into the destination schema
//! - [`reconcile`] - new-vs-known partitioning against the destination
//! - [`staging`] - per-run staged import artifacts and cleanup
//! - [`run`] - the orchestrator composing the above with the two adapters
//!
//! # Run Workflow
//!
//! 1. **Extract**: export each configured study group from Ripple, filter
//!    to consenting rows; zero rows short-circuits the run as a no-op
//! 2. **Project**: reduce to `{record_id, mrn, email_consent}`
//! 3. **Reconcile**: fetch REDCap's `mrn -> record_id` map, split into
//!    update and create partitions
//! 4. **Write**: push the update partition, then the create partition
//! 5. **Confirm upstream**: write the terminal consent label back to
//!    Ripple, one call per study group
//! 6. **Cleanup**: delete every staged artifact, on every exit path

pub mod contact;
pub mod project;
pub mod reconcile;
pub mod run;
pub mod staging;
