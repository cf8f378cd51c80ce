//! Ripple export payload parsing
//!
//! The export endpoint returns a flat CSV whose column set varies by study:
//! the contact columns (`contact.<n>.infos.<m>.*`) repeat an unknown number
//! of times. Rows are parsed into [`SourceRecord`]s keeping the full raw
//! column map so the contact schema can be discovered downstream.

use crate::domain::{
    ConsentStatus, GlobalId, Result, SourceRecord, StudyGroup, SyncError,
};
use std::collections::BTreeMap;

/// Column holding the Ripple-side identity
pub const COL_GLOBAL_ID: &str = "globalId";

/// Column holding the medical record number
pub const COL_CUSTOM_ID: &str = "customId";

/// Column holding the raw consent label
pub const COL_CONSENT_FORM: &str = "cv.consent_form";

/// Parses a Ripple export CSV into source records tagged with `study_group`
///
/// # Errors
///
/// Returns `SyncError::DataShape` if a required column is missing from the
/// header or a row has an empty global ID. An empty payload parses to an
/// empty batch, which the orchestrator turns into the no-data signal.
pub fn parse_export(payload: &str, study_group: &StudyGroup) -> Result<Vec<SourceRecord>> {
    if payload.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(payload.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| SyncError::DataShape(format!("unreadable export header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    for required in [COL_GLOBAL_ID, COL_CUSTOM_ID, COL_CONSENT_FORM] {
        if !headers.iter().any(|h| h == required) {
            return Err(SyncError::DataShape(format!(
                "export for study group '{study_group}' is missing column '{required}'"
            )));
        }
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| SyncError::DataShape(format!("unreadable export row: {e}")))?;

        let columns: BTreeMap<String, String> = headers
            .iter()
            .zip(row.iter())
            .map(|(header, cell)| (header.clone(), cell.to_string()))
            .collect();

        let global_id = columns
            .get(COL_GLOBAL_ID)
            .map(String::as_str)
            .unwrap_or_default();
        let global_id = GlobalId::new(global_id)
            .map_err(|e| SyncError::DataShape(format!("bad export row: {e}")))?;

        let custom_id = columns
            .get(COL_CUSTOM_ID)
            .cloned()
            .unwrap_or_default();
        let consent_status = ConsentStatus::from_label(
            columns
                .get(COL_CONSENT_FORM)
                .map(String::as_str)
                .unwrap_or_default(),
        );

        records.push(SourceRecord {
            global_id,
            custom_id,
            consent_status,
            study_group: study_group.clone(),
            columns,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> StudyGroup {
        StudyGroup::new("HBN - Main").unwrap()
    }

    #[test]
    fn test_parse_export_basic() {
        let payload = "globalId,customId,cv.consent_form,contact.1.infos.1.contactType,contact.1.infos.1.information\n\
                       g1,12345,Send to RedCap,email,a@x.com\n\
                       g2,99001,Do Not Send,phone,555-0101\n";

        let records = parse_export(payload, &group()).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].global_id.as_str(), "g1");
        assert_eq!(records[0].custom_id, "12345");
        assert_eq!(records[0].consent_status, ConsentStatus::SendToRedcap);
        assert_eq!(records[0].study_group, group());
        assert_eq!(
            records[0].column("contact.1.infos.1.information"),
            Some("a@x.com")
        );

        assert_eq!(records[1].consent_status, ConsentStatus::DoNotSend);
    }

    #[test]
    fn test_parse_export_empty_payload() {
        assert!(parse_export("", &group()).unwrap().is_empty());
        assert!(parse_export("  \n", &group()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_export_header_only() {
        let payload = "globalId,customId,cv.consent_form\n";
        assert!(parse_export(payload, &group()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_export_missing_required_column() {
        let payload = "globalId,cv.consent_form\ng1,Send to RedCap\n";
        let err = parse_export(payload, &group()).unwrap_err();
        assert!(matches!(err, SyncError::DataShape(_)));
        assert!(err.to_string().contains("customId"));
    }

    #[test]
    fn test_parse_export_empty_global_id_fails() {
        let payload = "globalId,customId,cv.consent_form\n,12345,Send to RedCap\n";
        let err = parse_export(payload, &group()).unwrap_err();
        assert!(matches!(err, SyncError::DataShape(_)));
    }

    #[test]
    fn test_parse_export_unknown_consent_label() {
        let payload = "globalId,customId,cv.consent_form\ng1,1,pending review\n";
        let records = parse_export(payload, &group()).unwrap();
        assert_eq!(
            records[0].consent_status,
            ConsentStatus::Other("pending review".to_string())
        );
    }

    #[test]
    fn test_parse_export_ragged_row_tolerated() {
        // Trailing columns can be absent in a ragged export; missing cells
        // simply don't appear in the column map.
        let payload = "globalId,customId,cv.consent_form,contact.1.infos.1.contactType\n\
                       g1,1,Send to RedCap\n";
        let records = parse_export(payload, &group()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].column("contact.1.infos.1.contactType"), None);
    }
}
