use serde::{Deserialize, Serialize};

/// One person to look up, as read from the target file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub username: String,
    pub birthday: String,
}

impl InputRecord {
    pub fn new(username: impl Into<String>, birthday: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            birthday: birthday.into(),
        }
    }
}

/// Verdict for a single [`InputRecord`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupOutcome {
    pub found: bool,
    pub username: String,
    pub birthday: String,
    pub link: Option<String>,
}

impl LookupOutcome {
    /// Outcome for a record whose detail page carried the expected birthday
    pub fn found(record: &InputRecord, link: impl Into<String>) -> Self {
        Self {
            found: true,
            username: record.username.clone(),
            birthday: record.birthday.clone(),
            link: Some(link.into()),
        }
    }

    /// Outcome for a record with no matching card or a mismatching detail page
    pub fn not_found(record: &InputRecord) -> Self {
        Self {
            found: false,
            username: record.username.clone(),
            birthday: record.birthday.clone(),
            link: None,
        }
    }
}

/// A label/value pair read from a registry detail page.
///
/// Either side may be missing when the element has no text content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoItem {
    pub label: Option<String>,
    pub value: Option<String>,
}

impl InfoItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            value: Some(value.into()),
        }
    }
}
