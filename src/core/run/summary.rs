//! Run summary reporting

use std::time::Duration;
use uuid::Uuid;

/// Summary of one completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Unique run identifier (matches the staging directory name)
    pub run_id: Uuid,

    /// Rows returned by the source export across all study groups
    pub extracted_rows: usize,

    /// Rows that passed the consent filter
    pub eligible_rows: usize,

    /// Distinct rows after projection and de-duplication
    pub projected_rows: usize,

    /// Rows pushed in create/autonumber mode
    pub created: usize,

    /// Rows pushed in update mode
    pub updated: usize,

    /// Study groups that received a status writeback
    pub groups_written_back: usize,

    /// The run short-circuited because there was nothing to forward
    pub no_eligible_data: bool,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl RunSummary {
    /// Creates an empty summary for a starting run
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            extracted_rows: 0,
            eligible_rows: 0,
            projected_rows: 0,
            created: 0,
            updated: 0,
            groups_written_back: 0,
            no_eligible_data: false,
            duration: Duration::ZERO,
        }
    }

    /// Sets the run duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Total rows that reached the destination
    pub fn total_pushed(&self) -> usize {
        self.created + self.updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_totals() {
        let mut summary = RunSummary::new(Uuid::new_v4());
        summary.created = 3;
        summary.updated = 2;
        assert_eq!(summary.total_pushed(), 5);
        assert!(!summary.no_eligible_data);
    }

    #[test]
    fn test_no_op_summary_keeps_extraction_counts() {
        let mut summary = RunSummary::new(Uuid::new_v4());
        summary.extracted_rows = 7;
        summary.no_eligible_data = true;
        assert_eq!(summary.extracted_rows, 7);
        assert_eq!(summary.total_pushed(), 0);
    }

    #[test]
    fn test_with_duration() {
        let summary =
            RunSummary::new(Uuid::new_v4()).with_duration(Duration::from_millis(1500));
        assert_eq!(summary.duration.as_millis(), 1500);
    }
}
