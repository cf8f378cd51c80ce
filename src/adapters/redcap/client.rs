//! REDCap API client
//!
//! Two operations: the minimal `mrn,record_id` lookup export used for
//! reconciliation, and the partition import. Partitions are staged to disk
//! first and the staged artifact is what gets submitted, so a failed run
//! leaves an inspectable payload until cleanup removes it.

use crate::adapters::redcap::models::{parse_import_count, parse_lookup, ImportMode, PushOutcome};
use crate::config::{RedcapConfig, SecretString};
use crate::core::staging::StagingArea;
use crate::domain::{DestinationKnowledge, ProjectedRecord, RedcapError, Result, SyncError};
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Client for the REDCap API
pub struct RedcapClient {
    client: Client,
    base_url: String,
}

impl RedcapClient {
    /// Creates a new REDCap client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &RedcapConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                SyncError::Redcap(RedcapError::ConnectionFailed(format!(
                    "failed to build HTTP client: {e}"
                )))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.to_string(),
        })
    }

    /// Fetches the `mrn -> record_id` mapping the project currently holds
    ///
    /// Called exactly once per run; the result is used only for
    /// partitioning and never mutated.
    pub async fn fetch_known_records(&self, token: &SecretString) -> Result<DestinationKnowledge> {
        tracing::debug!("Requesting REDCap record lookup");

        let response = self
            .client
            .post(&self.base_url)
            .form(&[
                ("token", token.expose_secret().as_ref()),
                ("content", "record"),
                ("format", "csv"),
                ("type", "flat"),
                ("fields", "mrn,record_id"),
            ])
            .send()
            .await
            .map_err(|e| map_transport_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            SyncError::Redcap(RedcapError::InvalidResponse(format!(
                "failed to read lookup body: {e}"
            )))
        })?;

        if !status.is_success() {
            return Err(SyncError::Redcap(RedcapError::LookupFailed {
                status: status.as_u16(),
                message: truncate(&body),
            }));
        }

        let knowledge = parse_lookup(&body)?;
        tracing::info!(known_mrns = knowledge.len(), "REDCap lookup complete");
        Ok(knowledge)
    }

    /// Pushes one partition to REDCap
    ///
    /// An empty partition is a valid steady state: no artifact is staged,
    /// no call is made, and the outcome is `Skipped`. A non-2xx response is
    /// fatal for the partition and is not retried; whether the other
    /// partition already ran is the orchestrator's problem, not hidden
    /// here.
    pub async fn write_partition(
        &self,
        mode: ImportMode,
        rows: &[ProjectedRecord],
        token: &SecretString,
        staging: &StagingArea,
    ) -> Result<PushOutcome> {
        if rows.is_empty() {
            tracing::info!(partition = %mode, "Partition is empty, skipping import");
            return Ok(PushOutcome::Skipped);
        }

        let path = staging.stage_redcap_partition(mode.label(), rows)?;
        let payload = staging.read_payload(&path)?;

        let response = self
            .client
            .post(&self.base_url)
            .form(&[
                ("token", token.expose_secret().as_ref()),
                ("content", "record"),
                ("action", "import"),
                ("format", "csv"),
                ("type", "flat"),
                ("overwriteBehavior", "normal"),
                ("forceAutoNumber", mode.force_autonumber()),
                ("data", payload.as_str()),
                ("returnContent", "count"),
                ("returnFormat", "csv"),
            ])
            .send()
            .await
            .map_err(|e| map_transport_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            SyncError::Redcap(RedcapError::InvalidResponse(format!(
                "failed to read import body: {e}"
            )))
        })?;

        if !status.is_success() {
            return Err(SyncError::Redcap(RedcapError::ImportFailed {
                mode: mode.label().to_string(),
                status: status.as_u16(),
                message: truncate(&body),
            }));
        }

        let count = parse_import_count(&body)?;
        tracing::info!(
            partition = %mode,
            http_status = status.as_u16(),
            rows_imported = count,
            "REDCap import succeeded"
        );
        Ok(PushOutcome::Imported {
            count,
            http_status: status.as_u16(),
        })
    }
}

fn map_transport_error(e: &reqwest::Error) -> SyncError {
    if e.is_timeout() {
        SyncError::Redcap(RedcapError::Timeout(e.to_string()))
    } else {
        SyncError::Redcap(RedcapError::ConnectionFailed(e.to_string()))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::domain::Mrn;
    use tempfile::TempDir;

    fn config(base_url: &str) -> RedcapConfig {
        RedcapConfig {
            base_url: base_url.to_string(),
            dev_token: secret_string("dev-token".to_string()),
            prod_token: secret_string("prod-token".to_string()),
            timeout_seconds: 5,
        }
    }

    fn row(record_id: i64, mrn: i64) -> ProjectedRecord {
        ProjectedRecord {
            record_id,
            mrn: Mrn::new(mrn),
            email_consent: Some("a@x.com".to_string()),
        }
    }

    #[tokio::test]
    async fn test_fetch_known_records() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("content".into(), "record".into()),
                mockito::Matcher::UrlEncoded("fields".into(), "mrn,record_id".into()),
            ]))
            .with_status(200)
            .with_body("record_id,mrn\n1,12345\n")
            .create_async()
            .await;

        let client = RedcapClient::new(&config(&server.url())).unwrap();
        let token = secret_string("dev-token".to_string());
        let knowledge = client.fetch_known_records(&token).await.unwrap();

        assert_eq!(knowledge.record_id_for(Mrn::new(12345)), Some(1));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_known_records_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(403)
            .with_body("bad token")
            .create_async()
            .await;

        let client = RedcapClient::new(&config(&server.url())).unwrap();
        let token = secret_string("bad".to_string());
        let err = client.fetch_known_records(&token).await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::Redcap(RedcapError::LookupFailed { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn test_write_partition_empty_is_noop() {
        // No mock registered: any request would fail the test
        let server = mockito::Server::new_async().await;
        let base = TempDir::new().unwrap();
        let staging = StagingArea::create(base.path()).unwrap();

        let client = RedcapClient::new(&config(&server.url())).unwrap();
        let token = secret_string("dev-token".to_string());
        let outcome = client
            .write_partition(ImportMode::Update, &[], &token, &staging)
            .await
            .unwrap();

        assert_eq!(outcome, PushOutcome::Skipped);
        staging.cleanup();
    }

    #[tokio::test]
    async fn test_write_partition_create_sets_autonumber() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("forceAutoNumber".into(), "true".into()),
                mockito::Matcher::UrlEncoded("action".into(), "import".into()),
            ]))
            .with_status(200)
            .with_body("1")
            .create_async()
            .await;

        let base = TempDir::new().unwrap();
        let staging = StagingArea::create(base.path()).unwrap();
        let client = RedcapClient::new(&config(&server.url())).unwrap();
        let token = secret_string("dev-token".to_string());

        let outcome = client
            .write_partition(ImportMode::Create, &[row(99001, 99001)], &token, &staging)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PushOutcome::Imported {
                count: 1,
                http_status: 200
            }
        );
        mock.assert_async().await;
        staging.cleanup();
    }

    #[tokio::test]
    async fn test_write_partition_update_clears_autonumber() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(mockito::Matcher::UrlEncoded(
                "forceAutoNumber".into(),
                "false".into(),
            ))
            .with_status(200)
            .with_body("1")
            .create_async()
            .await;

        let base = TempDir::new().unwrap();
        let staging = StagingArea::create(base.path()).unwrap();
        let client = RedcapClient::new(&config(&server.url())).unwrap();
        let token = secret_string("dev-token".to_string());

        client
            .write_partition(ImportMode::Update, &[row(7, 12345)], &token, &staging)
            .await
            .unwrap();

        mock.assert_async().await;
        staging.cleanup();
    }

    #[tokio::test]
    async fn test_write_partition_non_2xx_raises() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(400)
            .with_body("ERROR: invalid data")
            .create_async()
            .await;

        let base = TempDir::new().unwrap();
        let staging = StagingArea::create(base.path()).unwrap();
        let client = RedcapClient::new(&config(&server.url())).unwrap();
        let token = secret_string("dev-token".to_string());

        let err = client
            .write_partition(ImportMode::Create, &[row(1, 1)], &token, &staging)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SyncError::Redcap(RedcapError::ImportFailed { status: 400, .. })
        ));
        staging.cleanup();
    }
}
