//! Participant record models
//!
//! Everything here is transient: records are owned by a single run of the
//! orchestrator, and no cross-run state exists outside the two remote
//! systems.

use crate::domain::consent::ConsentStatus;
use crate::domain::ids::{GlobalId, Mrn, StudyGroup};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One row pulled from the Ripple registry
///
/// The typed fields carry what the engine itself needs; `columns` keeps the
/// full raw row because the set of `contact.<n>.infos.<m>.*` columns is
/// discovered at run time, not fixed in a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Opaque Ripple identity, used for the status writeback
    pub global_id: GlobalId,

    /// Raw medical record number, coerced to [`Mrn`] during projection
    pub custom_id: String,

    /// Consent state parsed from the raw label
    pub consent_status: ConsentStatus,

    /// Which study group (and therefore writeback batch) this row belongs to
    pub study_group: StudyGroup,

    /// Full raw row, keyed by source column name
    pub columns: BTreeMap<String, String>,
}

impl SourceRecord {
    /// Returns a raw cell value by source column name
    pub fn column(&self, name: &str) -> Option<&str> {
        self.columns.get(name).map(String::as_str)
    }
}

/// A source record reduced to the destination schema
///
/// `record_id` starts out equal to `mrn` (the initial destination key
/// guess); the reconciler substitutes the destination-assigned key for rows
/// REDCap already knows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectedRecord {
    /// Destination primary key (guess until reconciled)
    pub record_id: i64,

    /// Cross-system join key
    pub mrn: Mrn,

    /// Information value of the first email-typed contact group, if any
    pub email_consent: Option<String>,
}

/// What the destination currently knows: `mrn -> record_id`
///
/// Fetched fresh each run and used only for partitioning; never mutated.
#[derive(Debug, Clone, Default)]
pub struct DestinationKnowledge {
    known: HashMap<Mrn, i64>,
}

impl DestinationKnowledge {
    /// Builds the mapping from `(mrn, record_id)` pairs
    ///
    /// A duplicate MRN in the destination export should not happen; it is
    /// flagged as a data-integrity warning and resolved first-match-wins.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Mrn, i64)>) -> Self {
        let mut known = HashMap::new();
        for (mrn, record_id) in pairs {
            if let Some(existing) = known.get(&mrn) {
                tracing::warn!(
                    mrn = %mrn,
                    kept_record_id = existing,
                    dropped_record_id = record_id,
                    "Duplicate MRN in destination lookup, keeping first match"
                );
                continue;
            }
            known.insert(mrn, record_id);
        }
        Self { known }
    }

    /// Returns the destination record_id for an MRN, if known
    pub fn record_id_for(&self, mrn: Mrn) -> Option<i64> {
        self.known.get(&mrn).copied()
    }

    /// Number of known MRNs
    pub fn len(&self) -> usize {
        self.known.len()
    }

    /// Whether the destination knows no MRNs at all
    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

/// The two disjoint output partitions of a reconciliation
///
/// `to_update` rows carry the destination's existing `record_id`;
/// `to_create` rows keep the source-derived guess and are imported in
/// autonumber mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationBatch {
    /// Rows REDCap already knows, keyed by the destination record_id
    pub to_update: Vec<ProjectedRecord>,

    /// Rows REDCap has never seen
    pub to_create: Vec<ProjectedRecord>,
}

impl ReconciliationBatch {
    /// Total rows across both partitions
    pub fn total(&self) -> usize {
        self.to_update.len() + self.to_create.len()
    }
}

/// Per-study-group subset of submitted rows, retagged with the terminal
/// consent label for the status writeback
///
/// Created after a successful destination push, consumed exactly once by
/// the writeback step, never persisted beyond the run.
#[derive(Debug, Clone)]
pub struct ConsentTransitionGroup {
    /// The study group these rows belong to
    pub study_group: StudyGroup,

    /// The submitted rows, with `consent_status` rewritten to the terminal
    /// forwarded state
    pub rows: Vec<SourceRecord>,
}

impl ConsentTransitionGroup {
    /// Filters `submitted` down to rows belonging to `study_group` and
    /// retags them with the terminal forwarded label
    ///
    /// The input rows are cloned, not mutated; the caller's batch stays
    /// untouched.
    pub fn from_submitted(study_group: StudyGroup, submitted: &[SourceRecord]) -> Self {
        let rows = submitted
            .iter()
            .filter(|record| record.study_group == study_group)
            .cloned()
            .map(|mut record| {
                record.consent_status = ConsentStatus::ForwardedToRedcap;
                record
            })
            .collect();
        Self { study_group, rows }
    }

    /// Whether the group contains no rows (a legitimate no-op for writeback)
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(global_id: &str, custom_id: &str, group: &str) -> SourceRecord {
        SourceRecord {
            global_id: GlobalId::new(global_id).unwrap(),
            custom_id: custom_id.to_string(),
            consent_status: ConsentStatus::SendToRedcap,
            study_group: StudyGroup::new(group).unwrap(),
            columns: BTreeMap::new(),
        }
    }

    #[test]
    fn test_destination_knowledge_first_match_wins() {
        let knowledge = DestinationKnowledge::from_pairs([
            (Mrn::new(12345), 7),
            (Mrn::new(12345), 99),
            (Mrn::new(555), 1),
        ]);
        assert_eq!(knowledge.len(), 2);
        assert_eq!(knowledge.record_id_for(Mrn::new(12345)), Some(7));
        assert_eq!(knowledge.record_id_for(Mrn::new(555)), Some(1));
        assert_eq!(knowledge.record_id_for(Mrn::new(999)), None);
    }

    #[test]
    fn test_transition_group_filters_and_retags() {
        let submitted = vec![
            record("g1", "100", "HBN - Main"),
            record("g2", "200", "HBN - Waitlist"),
            record("g3", "300", "HBN - Main"),
        ];

        let group = ConsentTransitionGroup::from_submitted(
            StudyGroup::new("HBN - Main").unwrap(),
            &submitted,
        );

        assert_eq!(group.rows.len(), 2);
        assert!(group
            .rows
            .iter()
            .all(|r| r.consent_status == ConsentStatus::ForwardedToRedcap));
        // Source batch untouched
        assert!(submitted
            .iter()
            .all(|r| r.consent_status == ConsentStatus::SendToRedcap));
    }

    #[test]
    fn test_transition_group_can_be_empty() {
        let submitted = vec![record("g1", "100", "HBN - Main")];
        let group = ConsentTransitionGroup::from_submitted(
            StudyGroup::new("HBN - Waitlist").unwrap(),
            &submitted,
        );
        assert!(group.is_empty());
    }

    #[test]
    fn test_reconciliation_batch_total() {
        let batch = ReconciliationBatch {
            to_update: vec![ProjectedRecord {
                record_id: 7,
                mrn: Mrn::new(12345),
                email_consent: None,
            }],
            to_create: vec![],
        };
        assert_eq!(batch.total(), 1);
    }
}
