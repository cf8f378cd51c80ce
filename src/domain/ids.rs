//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers that cross system boundaries, so a
//! medical record number can never be confused with a study-group tag or a
//! Ripple global ID.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Medical record number newtype wrapper
///
/// The MRN is the cross-system join key between Ripple and REDCap. It is
/// numeric; a non-numeric value in the source data indicates upstream
/// corruption and must fail loudly.
///
/// # Examples
///
/// ```
/// use consentsync::domain::Mrn;
/// use std::str::FromStr;
///
/// let mrn = Mrn::from_str("12345").unwrap();
/// assert_eq!(mrn.value(), 12345);
/// assert!(Mrn::from_str("MRN-12345").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Mrn(i64);

impl Mrn {
    /// Creates an Mrn from an already-numeric value
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Parses an Mrn from the source system's string representation
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty or not an integer.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("MRN cannot be empty".to_string());
        }
        trimmed
            .parse::<i64>()
            .map(Self)
            .map_err(|_| format!("MRN is not numeric: '{raw}'"))
    }

    /// Returns the numeric MRN value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Mrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Mrn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Ripple global identifier newtype wrapper
///
/// Opaque source-system identity for a participant row. Used only for the
/// status writeback; never sent to REDCap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlobalId(String);

impl GlobalId {
    /// Creates a new GlobalId from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("global ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the global ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for GlobalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Study-group tag newtype wrapper
///
/// Partitions records into separate import batches; each group maps to its
/// own Ripple study and gets its own status-writeback call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StudyGroup(String);

impl StudyGroup {
    /// Creates a new StudyGroup from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is empty.
    pub fn new(tag: impl Into<String>) -> Result<Self, String> {
        let tag = tag.into();
        if tag.trim().is_empty() {
            return Err("study group cannot be empty".to_string());
        }
        Ok(Self(tag))
    }

    /// Returns the study group tag as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StudyGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for StudyGroup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mrn_parse_numeric() {
        let mrn = Mrn::parse("12345").unwrap();
        assert_eq!(mrn.value(), 12345);
        assert_eq!(mrn.to_string(), "12345");
    }

    #[test]
    fn test_mrn_parse_trims_whitespace() {
        let mrn = Mrn::parse(" 99001 ").unwrap();
        assert_eq!(mrn.value(), 99001);
    }

    #[test]
    fn test_mrn_parse_non_numeric_fails() {
        assert!(Mrn::parse("MRN-12345").is_err());
        assert!(Mrn::parse("").is_err());
        assert!(Mrn::parse("12.5").is_err());
    }

    #[test]
    fn test_global_id_rejects_empty() {
        assert!(GlobalId::new("abc123").is_ok());
        assert!(GlobalId::new("   ").is_err());
    }

    #[test]
    fn test_study_group_rejects_empty() {
        let group = StudyGroup::new("HBN - Main").unwrap();
        assert_eq!(group.as_str(), "HBN - Main");
        assert!(StudyGroup::new("").is_err());
    }

    #[test]
    fn test_mrn_is_hashable_and_ordered() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(Mrn::new(1), "a");
        assert_eq!(map.get(&Mrn::new(1)), Some(&"a"));
        assert!(Mrn::new(1) < Mrn::new(2));
    }
}
