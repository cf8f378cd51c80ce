//! Column projection into the destination schema
//!
//! Reduces a source batch to `{record_id, mrn, email_consent}`. The join
//! key is coerced to an integer MRN; a non-numeric value indicates upstream
//! data corruption and fails the run. The input batch is not consumed or
//! mutated, since the same rows feed the status writeback later.

use crate::core::contact::ContactSchema;
use crate::domain::{Mrn, ProjectedRecord, Result, SourceRecord, SyncError};
use std::collections::HashSet;

/// Contact channel used for the projected email field
const EMAIL_CHANNEL: &str = "email";

/// Projects a source batch into destination-shaped records
///
/// - `email_consent` is the first email-typed contact value per row
/// - `record_id` starts as the MRN guess; the reconciler corrects it for
///   rows the destination already knows
/// - exact-duplicate output rows are collapsed, preserving first occurrence
///   order
///
/// # Errors
///
/// Returns `SyncError::DataShape` if any row's join key is non-numeric.
pub fn project(batch: &[SourceRecord]) -> Result<Vec<ProjectedRecord>> {
    let headers: Vec<&str> = batch
        .iter()
        .flat_map(|record| record.columns.keys().map(String::as_str))
        .collect();
    let schema = ContactSchema::from_headers(&headers);

    let mut seen = HashSet::new();
    let mut projected = Vec::with_capacity(batch.len());

    for record in batch {
        let mrn = Mrn::parse(&record.custom_id).map_err(|e| {
            SyncError::DataShape(format!(
                "bad join key for global_id {}: {e}",
                record.global_id
            ))
        })?;
        let email_consent = schema.extract_channel(record, EMAIL_CHANNEL);

        let row = ProjectedRecord {
            record_id: mrn.value(),
            mrn,
            email_consent,
        };
        if seen.insert(row.clone()) {
            projected.push(row);
        }
    }

    tracing::debug!(
        input_rows = batch.len(),
        projected_rows = projected.len(),
        contact_groups = schema.groups().len(),
        "Projected source batch"
    );

    Ok(projected)
}
