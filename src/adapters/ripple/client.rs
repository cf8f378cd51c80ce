//! Ripple API client
//!
//! Two operations: the per-study participant export that feeds a run, and
//! the status import that writes the terminal consent label back after a
//! successful push. Both are synchronous from the run's point of view; any
//! transport failure is fatal and propagates without retry.

use crate::adapters::ripple::models::parse_export;
use crate::config::{RippleConfig, SecretString, StudyGroupConfig};
use crate::domain::{Result, RippleError, SourceRecord, StudyGroup, SyncError};
use chrono::NaiveDate;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::collections::BTreeMap;
use std::time::Duration;

/// Client for the Ripple registry API
pub struct RippleClient {
    client: Client,
    base_url: String,
    api_token: SecretString,
    extra_headers: BTreeMap<String, String>,
    export_fields: Vec<String>,
}

impl RippleClient {
    /// Creates a new Ripple client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &RippleConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                SyncError::Ripple(RippleError::ConnectionFailed(format!(
                    "failed to build HTTP client: {e}"
                )))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            extra_headers: config.extra_headers.clone(),
            export_fields: config.export_fields.clone(),
        })
    }

    /// Exports participants for one study group changed since `since`
    ///
    /// Issues the "changed-since" filtered export with the configured field
    /// list and parses the CSV payload into source records tagged with the
    /// group.
    pub async fn export_participants(
        &self,
        group: &StudyGroupConfig,
        since: NaiveDate,
    ) -> Result<Vec<SourceRecord>> {
        let url = format!(
            "{}/studies/{}/participants/export",
            self.base_url, group.study_id
        );
        let study_group = StudyGroup::new(group.name.clone())
            .map_err(|e| SyncError::Configuration(format!("bad study group name: {e}")))?;

        tracing::debug!(
            study_group = %study_group,
            since = %since,
            url = %url,
            "Requesting Ripple export"
        );

        let mut request = self
            .client
            .post(&url)
            .query(&[
                ("surveyExportSince", since.format("%Y-%m-%d").to_string()),
                ("fields", self.export_fields.join(",")),
            ])
            .bearer_auth(self.api_token.expose_secret());
        for (name, value) in &self.extra_headers {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(|e| map_transport_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            SyncError::Ripple(RippleError::InvalidPayload(format!(
                "failed to read export body: {e}"
            )))
        })?;

        if !status.is_success() {
            return Err(SyncError::Ripple(RippleError::ExportFailed {
                status: status.as_u16(),
                message: truncate(&body),
            }));
        }

        let records = parse_export(&body, &study_group)?;
        tracing::info!(
            study_group = %study_group,
            rows = records.len(),
            "Ripple export returned rows"
        );
        Ok(records)
    }

    /// Imports a status-writeback payload for one study group
    ///
    /// The payload is the staged CSV artifact re-read from disk. A non-2xx
    /// response surfaces to the orchestrator; silently continuing here
    /// would allow undetected double-forwarding on the next run.
    pub async fn import_status(
        &self,
        group: &StudyGroupConfig,
        payload: String,
    ) -> Result<()> {
        let url = format!(
            "{}/studies/{}/participants/import",
            self.base_url, group.study_id
        );

        tracing::debug!(study_group = %group.name, url = %url, "Submitting Ripple status import");

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "text/csv")
            .bearer_auth(self.api_token.expose_secret())
            .body(payload);
        for (name, value) in &self.extra_headers {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(|e| map_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Ripple(RippleError::ImportFailed {
                study_group: group.name.clone(),
                status: status.as_u16(),
                message: truncate(&body),
            }));
        }

        tracing::info!(
            study_group = %group.name,
            http_status = status.as_u16(),
            "Ripple status import succeeded"
        );
        Ok(())
    }
}

fn map_transport_error(e: &reqwest::Error) -> SyncError {
    if e.is_timeout() {
        SyncError::Ripple(RippleError::Timeout(e.to_string()))
    } else {
        SyncError::Ripple(RippleError::ConnectionFailed(e.to_string()))
    }
}

fn truncate(body: &str) -> String {
    const MAX: usize = 500;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}
