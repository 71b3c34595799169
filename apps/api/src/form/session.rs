//! Event-driven owner of one form record and its photo selection.
//!
//! Every event mutates the record synchronously; progress is recomputed from
//! the whole record afterwards, never patched incrementally.

use crate::form::attachment::PhotoAttachment;
use crate::form::evaluator::{evaluate, FieldEvaluations};
use crate::form::progress::{summarize, ProgressSummary};
use crate::form::record::{FormRecord, TextField};
use crate::form::validation::{validate_for_submit, SubmissionValidation};

#[derive(Debug, Clone)]
pub enum FormEvent {
    SetText { field: TextField, value: String },
    /// Unchecking also drops the selected photo.
    SetIncludePhoto(bool),
    AttachPhoto(PhotoAttachment),
    ClearPhoto,
}

/// What gets handed to the document generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub record: FormRecord,
    /// Present only when the record asks for a photo.
    pub photo: Option<PhotoAttachment>,
}

impl Submission {
    /// `CV_<name>_Package.zip`, whitespace runs in the name collapsed to `_`.
    pub fn package_file_name(&self) -> String {
        let name = self
            .record
            .full_name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        if name.is_empty() {
            "CV_Package.zip".to_string()
        } else {
            format!("CV_{name}_Package.zip")
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormSession {
    record: FormRecord,
    photo: Option<PhotoAttachment>,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn photo(&self) -> Option<&PhotoAttachment> {
        self.photo.as_ref()
    }

    pub fn apply(&mut self, event: FormEvent) -> ProgressSummary {
        match event {
            FormEvent::SetText { field, value } => self.record.set_text(field, value),
            FormEvent::SetIncludePhoto(include) => {
                self.record.include_photo = include;
                if !include {
                    self.photo = None;
                }
            }
            FormEvent::AttachPhoto(photo) => self.photo = Some(photo),
            FormEvent::ClearPhoto => self.photo = None,
        }
        self.summary()
    }

    pub fn evaluations(&self) -> FieldEvaluations {
        evaluate(&self.record, self.photo.is_some())
    }

    pub fn summary(&self) -> ProgressSummary {
        summarize(&self.evaluations())
    }

    pub fn validate_for_submit(&self) -> SubmissionValidation {
        validate_for_submit(&self.record)
    }

    pub fn into_submission(self) -> Submission {
        let photo = if self.record.include_photo {
            self.photo
        } else {
            None
        };
        Submission {
            record: self.record,
            photo,
        }
    }
}
