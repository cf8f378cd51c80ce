//! Run coordinator - main orchestrator for one sync run
//!
//! Drives a run through its phases: extract from Ripple, project into the
//! destination shape, reconcile against what REDCap already knows, push the
//! two partitions, and confirm upstream by writing the terminal consent
//! label back per study group. Staging cleanup runs exactly once no matter
//! how the run ends: success, no-data short circuit, or failure.

use crate::adapters::redcap::{ImportMode, PushOutcome, RedcapClient};
use crate::adapters::ripple::RippleClient;
use crate::config::{ProjectEnv, SyncConfig};
use crate::core::project::project;
use crate::core::reconcile::reconcile;
use crate::core::staging::{is_logically_empty, StagingArea};
use crate::domain::{ConsentTransitionGroup, Result, SourceRecord, StudyGroup, SyncError};
use crate::core::run::summary::RunSummary;
use chrono::{Days, NaiveDate, Utc};
use std::time::Instant;

/// Phase labels used in structured logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Extracting,
    Projecting,
    Reconciling,
    Writing,
    ConfirmingUpstream,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Phase::Extracting => "extracting",
            Phase::Projecting => "projecting",
            Phase::Reconciling => "reconciling",
            Phase::Writing => "writing",
            Phase::ConfirmingUpstream => "confirming_upstream",
        };
        write!(f, "{label}")
    }
}

/// Run coordinator
pub struct RunCoordinator {
    config: SyncConfig,
    env: ProjectEnv,
    ripple: RippleClient,
    redcap: RedcapClient,
}

impl RunCoordinator {
    /// Creates a new run coordinator
    pub fn new(config: SyncConfig, env: ProjectEnv) -> Result<Self> {
        let ripple = RippleClient::new(&config.ripple)?;
        let redcap = RedcapClient::new(&config.redcap)?;
        Ok(Self {
            config,
            env,
            ripple,
            redcap,
        })
    }

    /// Executes one full run
    ///
    /// At most one run should be in flight at a time; that discipline is
    /// external scheduling, not enforced here. Staged artifacts use a
    /// uuid-unique directory so a violated discipline cannot corrupt
    /// another run's files.
    ///
    /// # Errors
    ///
    /// Propagates the first fatal error encountered, after cleanup. The
    /// no-data signal is swallowed here and reported as a no-op summary.
    pub async fn execute_run(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let staging = StagingArea::create(&self.config.staging.dir)?;
        let run_id = staging.run_id();
        let mut summary = RunSummary::new(run_id);

        tracing::info!(run_id = %run_id, env = %self.env, "Starting sync run");

        let result = self.run_phases(&staging, &mut summary).await;

        // Cleanup runs on every exit path before the result is surfaced
        staging.cleanup();

        match result {
            Ok(()) => {
                let summary = summary.with_duration(start_time.elapsed());
                tracing::info!(
                    run_id = %run_id,
                    pushed = summary.total_pushed(),
                    created = summary.created,
                    updated = summary.updated,
                    groups_written_back = summary.groups_written_back,
                    duration_ms = summary.duration.as_millis() as u64,
                    "Sync run complete"
                );
                Ok(summary)
            }
            // The partial summary keeps the extraction counts accumulated
            // before the short circuit
            Err(e) if e.is_no_eligible_data() => {
                tracing::info!(
                    run_id = %run_id,
                    extracted_rows = summary.extracted_rows,
                    "No eligible data, run is a no-op"
                );
                summary.no_eligible_data = true;
                Ok(summary.with_duration(start_time.elapsed()))
            }
            Err(e) => {
                tracing::error!(run_id = %run_id, error = %e, "Sync run failed");
                Err(e)
            }
        }
    }

    async fn run_phases(&self, staging: &StagingArea, summary: &mut RunSummary) -> Result<()> {
        // Extracting
        let eligible = self.extract(summary).await?;

        // Projecting
        tracing::debug!(phase = %Phase::Projecting, rows = eligible.len(), "Entering phase");
        let projected = project(&eligible)?;
        summary.projected_rows = projected.len();

        // Reconciling: the single destination lookup of the run
        tracing::debug!(phase = %Phase::Reconciling, "Entering phase");
        let token = self.config.redcap.token_for(self.env);
        let knowledge = self.redcap.fetch_known_records(token).await?;
        let batch = reconcile(projected, &knowledge);

        // Writing: update first, then create. If the update push fails the
        // create push never runs; if the create push fails after a
        // successful update, the destination keeps the updated rows (no
        // compensating transaction) and the next run's reconciliation
        // makes the resend idempotent.
        tracing::debug!(phase = %Phase::Writing, "Entering phase");
        let write_started = Instant::now();
        let update_outcome = self
            .redcap
            .write_partition(ImportMode::Update, &batch.to_update, token, staging)
            .await?;
        let create_outcome = self
            .redcap
            .write_partition(ImportMode::Create, &batch.to_create, token, staging)
            .await?;
        summary.updated = pushed_rows(&update_outcome, batch.to_update.len());
        summary.created = pushed_rows(&create_outcome, batch.to_create.len());
        crate::log_push_complete!(summary.created + summary.updated, write_started.elapsed());

        // ConfirmingUpstream: one writeback per configured study group
        tracing::debug!(phase = %Phase::ConfirmingUpstream, "Entering phase");
        summary.groups_written_back = self.write_back(&eligible, staging).await?;

        Ok(())
    }

    /// Pulls and filters the source batch
    ///
    /// Zero exported rows and zero eligible rows are both the no-data
    /// signal, which is the only error this coordinator recovers from.
    async fn extract(&self, summary: &mut RunSummary) -> Result<Vec<SourceRecord>> {
        tracing::debug!(phase = %Phase::Extracting, "Entering phase");
        let since = yesterday();

        let mut extracted = Vec::new();
        for group in &self.config.ripple.study_groups {
            crate::log_export_start!(group.name, group.study_id);
            let mut rows = self.ripple.export_participants(group, since).await?;
            extracted.append(&mut rows);
        }
        summary.extracted_rows = extracted.len();
        tracing::info!(rows = extracted.len(), "Ripple returned rows");

        if extracted.is_empty() {
            tracing::info!("Export returned no data");
            return Err(SyncError::NoEligibleData);
        }

        let eligible: Vec<SourceRecord> = extracted
            .into_iter()
            .filter(|record| record.consent_status.is_eligible())
            .collect();
        summary.eligible_rows = eligible.len();

        if eligible.is_empty() {
            tracing::info!("No participants are marked for forwarding");
            return Err(SyncError::NoEligibleData);
        }

        tracing::info!(rows = eligible.len(), "Eligible rows after consent filter");
        Ok(eligible)
    }

    /// Marks the submitted rows as forwarded, one call per study group
    ///
    /// A group whose staged artifact is logically empty gets no network
    /// call; a rejection from Ripple aborts the remaining groups and
    /// propagates.
    async fn write_back(
        &self,
        submitted: &[SourceRecord],
        staging: &StagingArea,
    ) -> Result<usize> {
        let mut written = 0;

        for group_config in &self.config.ripple.study_groups {
            let study_group = StudyGroup::new(group_config.name.clone())
                .map_err(|e| SyncError::Configuration(format!("bad study group name: {e}")))?;
            let group = ConsentTransitionGroup::from_submitted(study_group, submitted);

            let path = staging.stage_ripple_writeback(&group)?;
            let payload = staging.read_payload(&path)?;

            if is_logically_empty(&payload) {
                tracing::info!(
                    study_group = %group.study_group,
                    "Writeback artifact is empty, no API request sent"
                );
                continue;
            }

            self.ripple.import_status(group_config, payload).await?;
            written += 1;
        }

        Ok(written)
    }
}

fn pushed_rows(outcome: &PushOutcome, partition_len: usize) -> usize {
    match outcome {
        PushOutcome::Skipped => 0,
        PushOutcome::Imported { .. } => partition_len,
    }
}

/// The "changed since" cutoff: one day before the current UTC date
fn yesterday() -> NaiveDate {
    Utc::now().date_naive() - Days::new(1)
}
