use serde::{Deserialize, Deserializer, Serialize};

/// The user-entered CV fields plus the photo-inclusion flag.
///
/// Every field defaults when absent on the wire, so a partially sent record
/// deserializes into the same shape as an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormRecord {
    #[serde(deserialize_with = "null_as_empty")]
    pub full_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub target_position: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub industry: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub education: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub experience: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub skills: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub languages: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub objective: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub style: String,
    pub include_photo: bool,
}

/// `null` on the wire counts as an empty field rather than a parse failure.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The ten free-text fields of a [`FormRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextField {
    FullName,
    Email,
    TargetPosition,
    Industry,
    Education,
    Experience,
    Skills,
    Languages,
    Objective,
    Style,
}

impl TextField {
    pub const ALL: [TextField; 10] = [
        TextField::FullName,
        TextField::Email,
        TextField::TargetPosition,
        TextField::Industry,
        TextField::Education,
        TextField::Experience,
        TextField::Skills,
        TextField::Languages,
        TextField::Objective,
        TextField::Style,
    ];

    /// Name used for multipart parts and JSON keys.
    pub fn wire_name(self) -> &'static str {
        match self {
            TextField::FullName => "fullName",
            TextField::Email => "email",
            TextField::TargetPosition => "targetPosition",
            TextField::Industry => "industry",
            TextField::Education => "education",
            TextField::Experience => "experience",
            TextField::Skills => "skills",
            TextField::Languages => "languages",
            TextField::Objective => "objective",
            TextField::Style => "style",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.wire_name() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            TextField::FullName => "Full name",
            TextField::Email => "Email",
            TextField::TargetPosition => "Target position",
            TextField::Industry => "Industry",
            TextField::Education => "Education",
            TextField::Experience => "Experience",
            TextField::Skills => "Skills",
            TextField::Languages => "Languages",
            TextField::Objective => "Objective",
            TextField::Style => "Style",
        }
    }

    /// Required fields gate submission only; progress weighs every field equally.
    pub fn is_required(self) -> bool {
        matches!(self, TextField::FullName | TextField::Email)
    }
}

/// A slot counted in the progress denominator: every text field plus the photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedField {
    Text(TextField),
    Photo,
}

impl TrackedField {
    pub const COUNT: usize = TextField::ALL.len() + 1;

    /// All tracked slots in display order, photo last.
    pub fn all() -> impl Iterator<Item = TrackedField> {
        TextField::ALL
            .into_iter()
            .map(TrackedField::Text)
            .chain(std::iter::once(TrackedField::Photo))
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            TrackedField::Text(field) => field.wire_name(),
            TrackedField::Photo => "photo",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrackedField::Text(field) => field.label(),
            TrackedField::Photo => "Photo",
        }
    }
}

impl FormRecord {
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::FullName => &self.full_name,
            TextField::Email => &self.email,
            TextField::TargetPosition => &self.target_position,
            TextField::Industry => &self.industry,
            TextField::Education => &self.education,
            TextField::Experience => &self.experience,
            TextField::Skills => &self.skills,
            TextField::Languages => &self.languages,
            TextField::Objective => &self.objective,
            TextField::Style => &self.style,
        }
    }

    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) {
        let slot = match field {
            TextField::FullName => &mut self.full_name,
            TextField::Email => &mut self.email,
            TextField::TargetPosition => &mut self.target_position,
            TextField::Industry => &mut self.industry,
            TextField::Education => &mut self.education,
            TextField::Experience => &mut self.experience,
            TextField::Skills => &mut self.skills,
            TextField::Languages => &mut self.languages,
            TextField::Objective => &mut self.objective,
            TextField::Style => &mut self.style,
        };
        *slot = value.into();
    }

    /// Presence rule shared by every text field: non-empty after trimming.
    pub fn is_filled(&self, field: TextField) -> bool {
        !self.text(field).trim().is_empty()
    }
}

/// Layout styles offered by the document service.
pub const STYLE_OPTIONS: &[(&str, &str)] = &[
    ("sober", "Elegant and professional"),
    ("design", "Modern and creative"),
    ("startup", "Dynamic and innovative"),
    ("academic", "Structured and formal"),
    ("creative", "Artistic and original"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_deserialize_as_empty() {
        let record: FormRecord = serde_json::from_str(r#"{"fullName":"Jean"}"#).unwrap();
        assert_eq!(record.full_name, "Jean");
        assert_eq!(record.email, "");
        assert!(!record.include_photo);
    }

    #[test]
    fn test_null_fields_deserialize_as_empty() {
        let record: FormRecord =
            serde_json::from_str(r#"{"fullName":null,"skills":"Rust"}"#).unwrap();
        assert_eq!(record.full_name, "");
        assert_eq!(record.skills, "Rust");
    }

    #[test]
    fn test_wire_names_roundtrip_through_lookup() {
        for field in TextField::ALL {
            assert_eq!(TextField::from_wire_name(field.wire_name()), Some(field));
        }
        assert_eq!(TextField::from_wire_name("photo"), None);
    }

    #[test]
    fn test_tracked_field_count_includes_photo() {
        assert_eq!(TrackedField::COUNT, 11);
        assert_eq!(TrackedField::all().count(), TrackedField::COUNT);
        assert_eq!(TrackedField::all().last(), Some(TrackedField::Photo));
    }

    #[test]
    fn test_whitespace_is_not_filled() {
        let mut record = FormRecord::default();
        record.set_text(TextField::Skills, "  \t\n");
        assert!(!record.is_filled(TextField::Skills));
        record.set_text(TextField::Skills, " Rust ");
        assert!(record.is_filled(TextField::Skills));
    }

    #[test]
    fn test_only_name_and_email_are_required() {
        let required: Vec<_> = TextField::ALL.into_iter().filter(|f| f.is_required()).collect();
        assert_eq!(required, vec![TextField::FullName, TextField::Email]);
    }
}
