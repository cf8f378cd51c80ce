//! Consent-status vocabulary
//!
//! The source registry stores consent as free-text labels. This module
//! closes that vocabulary into an enum with a single mapping table, so the
//! magic strings live in exactly one place.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw label marking a record as eligible for forwarding.
pub const LABEL_SEND_TO_REDCAP: &str = "Send to RedCap";

/// Raw label marking a record as explicitly excluded.
pub const LABEL_DO_NOT_SEND: &str = "Do Not Send";

/// Terminal raw label written back after a successful push.
pub const LABEL_FORWARDED: &str = "consent_form_created_in_redcap";

/// Consent state of a source record
///
/// `Other` captures any label outside the known vocabulary; such records
/// are never forwarded but are not an error either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsentStatus {
    /// Participant consented; record should be forwarded to REDCap
    SendToRedcap,
    /// Participant declined; never forward
    DoNotSend,
    /// Record was already forwarded in a previous run (terminal state)
    ForwardedToRedcap,
    /// Unrecognized label, preserved verbatim
    Other(String),
}

impl ConsentStatus {
    /// Maps a raw source label to its variant
    pub fn from_label(label: &str) -> Self {
        match label {
            LABEL_SEND_TO_REDCAP => ConsentStatus::SendToRedcap,
            LABEL_DO_NOT_SEND => ConsentStatus::DoNotSend,
            LABEL_FORWARDED => ConsentStatus::ForwardedToRedcap,
            other => ConsentStatus::Other(other.to_string()),
        }
    }

    /// Returns the raw label the source system expects
    pub fn as_label(&self) -> &str {
        match self {
            ConsentStatus::SendToRedcap => LABEL_SEND_TO_REDCAP,
            ConsentStatus::DoNotSend => LABEL_DO_NOT_SEND,
            ConsentStatus::ForwardedToRedcap => LABEL_FORWARDED,
            ConsentStatus::Other(label) => label,
        }
    }

    /// Whether this record is eligible for forwarding this run
    pub fn is_eligible(&self) -> bool {
        matches!(self, ConsentStatus::SendToRedcap)
    }
}

impl fmt::Display for ConsentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Send to RedCap", ConsentStatus::SendToRedcap; "eligible label")]
    #[test_case("Do Not Send", ConsentStatus::DoNotSend; "declined label")]
    #[test_case(
        "consent_form_created_in_redcap",
        ConsentStatus::ForwardedToRedcap;
        "terminal label"
    )]
    fn test_from_label_known(label: &str, expected: ConsentStatus) {
        assert_eq!(ConsentStatus::from_label(label), expected);
    }

    #[test]
    fn test_from_label_is_case_sensitive() {
        // "send to redcap" is not the configured vocabulary; treat as Other
        let status = ConsentStatus::from_label("send to redcap");
        assert_eq!(status, ConsentStatus::Other("send to redcap".to_string()));
        assert!(!status.is_eligible());
    }

    #[test]
    fn test_label_round_trip() {
        for label in [LABEL_SEND_TO_REDCAP, LABEL_DO_NOT_SEND, LABEL_FORWARDED] {
            assert_eq!(ConsentStatus::from_label(label).as_label(), label);
        }
    }

    #[test]
    fn test_only_send_to_redcap_is_eligible() {
        assert!(ConsentStatus::SendToRedcap.is_eligible());
        assert!(!ConsentStatus::DoNotSend.is_eligible());
        assert!(!ConsentStatus::ForwardedToRedcap.is_eligible());
        assert!(!ConsentStatus::Other("pending".to_string()).is_eligible());
    }
}
