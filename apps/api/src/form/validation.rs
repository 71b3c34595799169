use serde::{Deserialize, Serialize};

use crate::form::record::{FormRecord, TextField};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionValidation {
    pub passed: bool,
    pub missing_required: Vec<String>,
}

impl SubmissionValidation {
    pub fn message(&self) -> String {
        format!(
            "Missing required fields: {}",
            self.missing_required.join(", ")
        )
    }
}

/// Submit-time gate. Only the required fields are checked; the rest of the
/// record may be empty.
pub fn validate_for_submit(record: &FormRecord) -> SubmissionValidation {
    let missing_required: Vec<String> = TextField::ALL
        .into_iter()
        .filter(|f| f.is_required() && !record.is_filled(*f))
        .map(|f| f.label().to_string())
        .collect();

    SubmissionValidation {
        passed: missing_required.is_empty(),
        missing_required,
    }
}
