//! New-vs-known partitioning against the destination
//!
//! Given the projected batch and the `mrn -> record_id` mapping REDCap
//! currently holds, splits rows into an update partition (destination key
//! substituted in) and a create partition (autonumbered on import). The
//! lookup itself is a network call made by the orchestrator; the partition
//! logic here is pure.

use crate::domain::{DestinationKnowledge, ProjectedRecord, ReconciliationBatch};

/// Partitions projected rows by membership in the destination's knowledge
///
/// Invariants:
/// - every input row lands in exactly one partition
/// - update rows carry the destination-supplied `record_id`, not the guess
/// - create rows keep the source-derived guess (`record_id == mrn`)
pub fn reconcile(
    projected: Vec<ProjectedRecord>,
    knowledge: &DestinationKnowledge,
) -> ReconciliationBatch {
    let mut batch = ReconciliationBatch::default();

    for mut row in projected {
        match knowledge.record_id_for(row.mrn) {
            Some(record_id) => {
                row.record_id = record_id;
                batch.to_update.push(row);
            }
            None => batch.to_create.push(row),
        }
    }

    tracing::info!(
        to_update = batch.to_update.len(),
        to_create = batch.to_create.len(),
        known_mrns = knowledge.len(),
        "Reconciled batch against destination"
    );

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mrn;
    use std::collections::HashSet;

    fn row(mrn: i64, email: Option<&str>) -> ProjectedRecord {
        ProjectedRecord {
            record_id: mrn,
            mrn: Mrn::new(mrn),
            email_consent: email.map(str::to_string),
        }
    }

    #[test]
    fn test_partition_coverage_and_disjointness() {
        let projected = vec![row(1, None), row(2, None), row(3, None), row(4, None)];
        let knowledge = DestinationKnowledge::from_pairs([(Mrn::new(2), 20), (Mrn::new(4), 40)]);

        let batch = reconcile(projected.clone(), &knowledge);

        assert_eq!(batch.total(), projected.len());
        let update_mrns: HashSet<Mrn> = batch.to_update.iter().map(|r| r.mrn).collect();
        let create_mrns: HashSet<Mrn> = batch.to_create.iter().map(|r| r.mrn).collect();
        assert!(update_mrns.is_disjoint(&create_mrns));

        let mut all: Vec<i64> = update_mrns
            .union(&create_mrns)
            .map(|mrn| mrn.value())
            .collect();
        all.sort_unstable();
        assert_eq!(all, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_update_rows_carry_destination_record_id() {
        let projected = vec![row(12345, Some("a@x.com"))];
        let knowledge = DestinationKnowledge::from_pairs([(Mrn::new(12345), 7)]);

        let batch = reconcile(projected, &knowledge);

        assert_eq!(batch.to_update.len(), 1);
        assert_eq!(batch.to_update[0].record_id, 7);
        assert_eq!(batch.to_update[0].mrn, Mrn::new(12345));
        assert_eq!(batch.to_update[0].email_consent, Some("a@x.com".to_string()));
    }

    #[test]
    fn test_create_rows_keep_guessed_record_id() {
        let projected = vec![row(99001, None)];
        let knowledge = DestinationKnowledge::default();

        let batch = reconcile(projected, &knowledge);

        assert!(batch.to_update.is_empty());
        assert_eq!(batch.to_create[0].record_id, 99001);
    }

    #[test]
    fn test_empty_input_yields_empty_partitions() {
        let knowledge = DestinationKnowledge::from_pairs([(Mrn::new(1), 1)]);
        let batch = reconcile(vec![], &knowledge);
        assert!(batch.to_update.is_empty());
        assert!(batch.to_create.is_empty());
    }

    #[test]
    fn test_all_known_yields_empty_create() {
        let projected = vec![row(1, None), row(2, None)];
        let knowledge = DestinationKnowledge::from_pairs([(Mrn::new(1), 10), (Mrn::new(2), 20)]);
        let batch = reconcile(projected, &knowledge);
        assert_eq!(batch.to_update.len(), 2);
        assert!(batch.to_create.is_empty());
    }
}
