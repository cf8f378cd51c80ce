//! Contact-channel extraction
//!
//! Ripple exports contact information as repeated column groups named
//! `contact.<n>.infos.<m>.contactType` / `contact.<n>.infos.<m>.information`.
//! The number of groups is not fixed; it is discovered per batch from the
//! column headers. Extraction returns the information value of the first
//! group (lowest `(n, m)` index) whose type matches the requested channel.

use crate::domain::SourceRecord;
use regex::Regex;

/// One discovered contact-column pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactGroup {
    /// Outer contact index (`<n>`)
    pub contact_index: u32,

    /// Inner info index (`<m>`)
    pub info_index: u32,

    /// Column holding the channel type, e.g. "email" or "phone"
    pub type_column: String,

    /// Sibling column holding the channel value
    pub value_column: String,
}

/// The ordered set of contact-column pairs present in a batch
///
/// Built once per batch from the header list; rows are then read against it
/// without re-scanning column names.
#[derive(Debug, Clone, Default)]
pub struct ContactSchema {
    groups: Vec<ContactGroup>,
}

impl ContactSchema {
    /// Discovers contact groups from a batch's column headers
    ///
    /// Only `contactType` columns are matched; the sibling `information`
    /// column name is derived from the same group index, which is how the
    /// source pairs them. Groups are ordered ascending by `(n, m)` so the
    /// lowest-indexed group wins ties during extraction.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let pattern = Regex::new(r"^contact\.(\d+)\.infos\.(\d+)\.contactType$")
            .expect("contact column pattern is valid");

        let mut groups: Vec<ContactGroup> = headers
            .iter()
            .filter_map(|header| {
                let header = header.as_ref();
                let caps = pattern.captures(header)?;
                let contact_index: u32 = caps[1].parse().ok()?;
                let info_index: u32 = caps[2].parse().ok()?;
                Some(ContactGroup {
                    contact_index,
                    info_index,
                    type_column: header.to_string(),
                    value_column: format!("contact.{contact_index}.infos.{info_index}.information"),
                })
            })
            .collect();

        groups.sort_by_key(|g| (g.contact_index, g.info_index));
        Self { groups }
    }

    /// Returns the discovered groups in extraction order
    pub fn groups(&self) -> &[ContactGroup] {
        &self.groups
    }

    /// Extracts the first contact value of the requested channel type
    ///
    /// The type match is exact and case-sensitive. Returns `None` when no
    /// group matches; downstream treats that as "no contact on file", not
    /// an error.
    pub fn extract_channel(&self, record: &SourceRecord, channel_type: &str) -> Option<String> {
        for group in &self.groups {
            if record.column(&group.type_column) == Some(channel_type) {
                return record
                    .column(&group.value_column)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string);
            }
        }
        None
    }
}
