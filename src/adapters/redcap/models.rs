//! REDCap wire-format models
//!
//! The lookup export and the import payload are both flat CSV. The only
//! thing distinguishing the two import modes on the wire is the
//! `forceAutoNumber` flag.

use crate::domain::{DestinationKnowledge, Mrn, RedcapError, Result, SyncError};

/// Import mode for a partition push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// New records; REDCap assigns record_ids (autonumber)
    Create,
    /// Existing records, keyed by their destination record_id
    Update,
}

impl ImportMode {
    /// Wire value of the `forceAutoNumber` parameter
    pub fn force_autonumber(&self) -> &'static str {
        match self {
            ImportMode::Create => "true",
            ImportMode::Update => "false",
        }
    }

    /// Human-readable partition label, also used for staged file names
    pub fn label(&self) -> &'static str {
        match self {
            ImportMode::Create => "create",
            ImportMode::Update => "update",
        }
    }
}

impl std::fmt::Display for ImportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Outcome of pushing one partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Partition was empty; no call was made
    Skipped,
    /// Import succeeded; REDCap reported this many rows
    Imported { count: u64, http_status: u16 },
}

/// Parses the minimal `mrn,record_id` lookup export
///
/// Rows without a parsable MRN are skipped with a warning; REDCap projects
/// can hold records created outside this pipeline that have no MRN yet.
/// Duplicate MRNs resolve first-match-wins inside [`DestinationKnowledge`].
pub fn parse_lookup(payload: &str) -> Result<DestinationKnowledge> {
    if payload.trim().is_empty() {
        return Ok(DestinationKnowledge::default());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(payload.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| {
            SyncError::Redcap(RedcapError::InvalidResponse(format!(
                "unreadable lookup header: {e}"
            )))
        })?
        .clone();

    let mrn_idx = headers.iter().position(|h| h == "mrn").ok_or_else(|| {
        SyncError::Redcap(RedcapError::InvalidResponse(
            "lookup export is missing the 'mrn' column".to_string(),
        ))
    })?;
    let record_id_idx = headers
        .iter()
        .position(|h| h == "record_id")
        .ok_or_else(|| {
            SyncError::Redcap(RedcapError::InvalidResponse(
                "lookup export is missing the 'record_id' column".to_string(),
            ))
        })?;

    let mut pairs = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| {
            SyncError::Redcap(RedcapError::InvalidResponse(format!(
                "unreadable lookup row: {e}"
            )))
        })?;

        let raw_mrn = row.get(mrn_idx).unwrap_or_default();
        let raw_record_id = row.get(record_id_idx).unwrap_or_default();

        let mrn = match Mrn::parse(raw_mrn) {
            Ok(mrn) => mrn,
            Err(_) => {
                tracing::warn!(mrn = raw_mrn, "Skipping lookup row with unparsable MRN");
                continue;
            }
        };
        let record_id: i64 = match raw_record_id.trim().parse() {
            Ok(id) => id,
            Err(_) => {
                return Err(SyncError::Redcap(RedcapError::InvalidResponse(format!(
                    "non-numeric record_id '{raw_record_id}' for mrn {mrn}"
                ))));
            }
        };

        pairs.push((mrn, record_id));
    }

    Ok(DestinationKnowledge::from_pairs(pairs))
}

/// Parses the plain-text row count an import returns on success
pub fn parse_import_count(body: &str) -> Result<u64> {
    body.trim().parse().map_err(|_| {
        SyncError::Redcap(RedcapError::InvalidResponse(format!(
            "expected a row count, got '{}'",
            body.trim()
        )))
    })
}
