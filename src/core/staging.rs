//! Per-run staging artifacts
//!
//! Both import payloads are staged to disk before submission: the REDCap
//! partition CSVs and one Ripple writeback CSV per study group. Each run
//! stages under its own uuid-named directory so concurrent runs cannot
//! collide, and cleanup removes the whole directory regardless of how the
//! run ended.

use crate::domain::{ConsentTransitionGroup, ProjectedRecord, Result, SyncError};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Column order of the REDCap import payload
pub const REDCAP_COLUMNS: [&str; 3] = ["record_id", "mrn", "email_consent"];

/// Column order of the Ripple writeback payload
pub const RIPPLE_COLUMNS: [&str; 2] = ["globalId", "cv.consent_form"];

/// A run-scoped staging directory
#[derive(Debug)]
pub struct StagingArea {
    dir: PathBuf,
    run_id: Uuid,
}

impl StagingArea {
    /// Creates a fresh staging directory under `base_dir`
    pub fn create(base_dir: impl AsRef<Path>) -> Result<Self> {
        let run_id = Uuid::new_v4();
        let dir = base_dir.as_ref().join(format!("run-{run_id}"));
        fs::create_dir_all(&dir).map_err(|e| {
            SyncError::Staging(format!(
                "failed to create staging directory {}: {e}",
                dir.display()
            ))
        })?;
        tracing::debug!(dir = %dir.display(), "Created staging directory");
        Ok(Self { dir, run_id })
    }

    /// The unique run identifier baked into the directory name
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// The staging directory path
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stages one REDCap partition as a CSV artifact
    ///
    /// Column order is fixed (`record_id,mrn,email_consent`); an absent
    /// email serializes as an empty field.
    pub fn stage_redcap_partition(
        &self,
        label: &str,
        rows: &[ProjectedRecord],
    ) -> Result<PathBuf> {
        let path = self.dir.join(format!("redcap-{label}.csv"));
        let mut writer = csv::Writer::from_path(&path).map_err(|e| {
            SyncError::Staging(format!("failed to open {}: {e}", path.display()))
        })?;

        writer.write_record(REDCAP_COLUMNS)?;
        for row in rows {
            writer.write_record([
                row.record_id.to_string(),
                row.mrn.to_string(),
                row.email_consent.clone().unwrap_or_default(),
            ])?;
        }
        writer.flush().map_err(SyncError::from)?;

        tracing::debug!(
            label = label,
            rows = rows.len(),
            path = %path.display(),
            "Staged REDCap partition"
        );
        Ok(path)
    }

    /// Stages one study group's writeback rows as a CSV artifact
    ///
    /// Carries only what the Ripple import needs: the global ID and the
    /// rewritten consent label.
    pub fn stage_ripple_writeback(&self, group: &ConsentTransitionGroup) -> Result<PathBuf> {
        let slug = sanitize_file_stem(group.study_group.as_str());
        let path = self.dir.join(format!("ripple-{slug}.csv"));
        let mut writer = csv::Writer::from_path(&path).map_err(|e| {
            SyncError::Staging(format!("failed to open {}: {e}", path.display()))
        })?;

        writer.write_record(RIPPLE_COLUMNS)?;
        for record in &group.rows {
            writer.write_record([
                record.global_id.as_str(),
                record.consent_status.as_label(),
            ])?;
        }
        writer.flush().map_err(SyncError::from)?;

        tracing::debug!(
            study_group = %group.study_group,
            rows = group.rows.len(),
            path = %path.display(),
            "Staged Ripple writeback"
        );
        Ok(path)
    }

    /// Re-reads a staged artifact for submission
    pub fn read_payload(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| {
            SyncError::Staging(format!("failed to re-read {}: {e}", path.display()))
        })
    }

    /// Deletes the staging directory and everything in it
    ///
    /// Cleanup never fails the run; a directory that is already gone or
    /// cannot be removed is logged and ignored.
    pub fn cleanup(&self) {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => tracing::debug!(dir = %self.dir.display(), "Removed staging directory"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(dir = %self.dir.display(), "Staging directory already gone");
            }
            Err(e) => {
                tracing::warn!(
                    dir = %self.dir.display(),
                    error = %e,
                    "Failed to remove staging directory"
                );
            }
        }
    }
}

/// Whether a staged CSV payload contains no data rows
///
/// Header-only or blank payloads are logically empty; submitting them would
/// be a pointless network call, not an error.
pub fn is_logically_empty(payload: &str) -> bool {
    payload.lines().filter(|line| !line.trim().is_empty()).count() <= 1
}

fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConsentStatus, GlobalId, Mrn, SourceRecord, StudyGroup};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn projected(record_id: i64, mrn: i64, email: Option<&str>) -> ProjectedRecord {
        ProjectedRecord {
            record_id,
            mrn: Mrn::new(mrn),
            email_consent: email.map(str::to_string),
        }
    }

    #[test]
    fn test_staging_dir_is_unique_per_run() {
        let base = TempDir::new().unwrap();
        let a = StagingArea::create(base.path()).unwrap();
        let b = StagingArea::create(base.path()).unwrap();
        assert_ne!(a.dir(), b.dir());
        assert_ne!(a.run_id(), b.run_id());
    }

    #[test]
    fn test_stage_redcap_partition_format() {
        let base = TempDir::new().unwrap();
        let staging = StagingArea::create(base.path()).unwrap();

        let path = staging
            .stage_redcap_partition(
                "update",
                &[projected(7, 12345, Some("a@x.com")), projected(8, 555, None)],
            )
            .unwrap();

        let payload = staging.read_payload(&path).unwrap();
        let mut lines = payload.lines();
        assert_eq!(lines.next(), Some("record_id,mrn,email_consent"));
        assert_eq!(lines.next(), Some("7,12345,a@x.com"));
        assert_eq!(lines.next(), Some("8,555,"));
    }

    #[test]
    fn test_stage_ripple_writeback_format() {
        let base = TempDir::new().unwrap();
        let staging = StagingArea::create(base.path()).unwrap();

        let group = ConsentTransitionGroup {
            study_group: StudyGroup::new("HBN - Main").unwrap(),
            rows: vec![SourceRecord {
                global_id: GlobalId::new("g1").unwrap(),
                custom_id: "100".to_string(),
                consent_status: ConsentStatus::ForwardedToRedcap,
                study_group: StudyGroup::new("HBN - Main").unwrap(),
                columns: BTreeMap::new(),
            }],
        };

        let path = staging.stage_ripple_writeback(&group).unwrap();
        let payload = staging.read_payload(&path).unwrap();
        let mut lines = payload.lines();
        assert_eq!(lines.next(), Some("globalId,cv.consent_form"));
        assert_eq!(lines.next(), Some("g1,consent_form_created_in_redcap"));
        // Study group name sanitized into the file name
        assert!(path.file_name().unwrap().to_str().unwrap().contains("HBN___Main"));
    }

    #[test]
    fn test_is_logically_empty() {
        assert!(is_logically_empty(""));
        assert!(is_logically_empty("record_id,mrn,email_consent\n"));
        assert!(is_logically_empty("record_id,mrn,email_consent\n\n"));
        assert!(!is_logically_empty("record_id,mrn,email_consent\n1,1,\n"));
    }

    #[test]
    fn test_cleanup_removes_everything() {
        let base = TempDir::new().unwrap();
        let staging = StagingArea::create(base.path()).unwrap();
        staging
            .stage_redcap_partition("create", &[projected(1, 1, None)])
            .unwrap();

        assert!(staging.dir().exists());
        staging.cleanup();
        assert!(!staging.dir().exists());
    }

    #[test]
    fn test_cleanup_tolerates_missing_dir() {
        let base = TempDir::new().unwrap();
        let staging = StagingArea::create(base.path()).unwrap();
        std::fs::remove_dir_all(staging.dir()).unwrap();
        // Must not panic
        staging.cleanup();
    }
}
