//! Body encodings for the document-generation request.
//!
//! Both encodings carry the same record; they differ only in transport.
//! `Json` sends the photo's file name but not its bytes.

use std::str::FromStr;

use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::form::record::TextField;
use crate::form::session::Submission;
use crate::generator::GeneratorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionEncoding {
    Multipart,
    Json,
}

impl FromStr for SubmissionEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "multipart" => Ok(SubmissionEncoding::Multipart),
            "json" => Ok(SubmissionEncoding::Json),
            other => Err(format!("unknown submission encoding '{other}'")),
        }
    }
}

impl SubmissionEncoding {
    /// Attaches the submission body to `request`.
    pub fn encode(
        self,
        request: RequestBuilder,
        submission: &Submission,
    ) -> Result<RequestBuilder, GeneratorError> {
        match self {
            SubmissionEncoding::Multipart => Ok(request.multipart(multipart_form(submission)?)),
            SubmissionEncoding::Json => Ok(request.json(&json_body(submission))),
        }
    }
}

/// Text parts in wire order, `includePhoto` rendered as `"true"`/`"false"`.
pub fn multipart_fields(submission: &Submission) -> Vec<(&'static str, String)> {
    let record = &submission.record;
    TextField::ALL
        .into_iter()
        .map(|f| (f.wire_name(), record.text(f).to_string()))
        .chain(std::iter::once((
            "includePhoto",
            record.include_photo.to_string(),
        )))
        .collect()
}

fn multipart_form(submission: &Submission) -> Result<Form, GeneratorError> {
    let mut form = multipart_fields(submission)
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value));

    if let Some(photo) = &submission.photo {
        let part = Part::bytes(photo.bytes().to_vec())
            .file_name(photo.file_name().to_string())
            .mime_str(photo.content_type())?;
        form = form.part("photo", part);
    }

    Ok(form)
}

pub fn json_body(submission: &Submission) -> Value {
    let record = &submission.record;
    let mut body: Map<String, Value> = TextField::ALL
        .into_iter()
        .map(|f| (f.wire_name().to_string(), json!(record.text(f))))
        .collect();
    body.insert("includePhoto".to_string(), json!(record.include_photo));
    body.insert(
        "photoFileName".to_string(),
        json!(submission
            .photo
            .as_ref()
            .map(|p| p.file_name())
            .unwrap_or_default()),
    );
    Value::Object(body)
}
