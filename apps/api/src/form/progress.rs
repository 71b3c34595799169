use serde::{Deserialize, Serialize};

use crate::form::evaluator::{FieldEvaluation, FieldResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusLabel {
    Complete,
    AlmostDone,
    PastHalfway,
    JustStarted,
}

impl StatusLabel {
    pub fn for_percentage(percentage: u8) -> Self {
        match percentage {
            100.. => StatusLabel::Complete,
            80..=99 => StatusLabel::AlmostDone,
            50..=79 => StatusLabel::PastHalfway,
            _ => StatusLabel::JustStarted,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            StatusLabel::Complete => "complete / ready to generate",
            StatusLabel::AlmostDone => "almost done",
            StatusLabel::PastHalfway => "in progress, more than halfway",
            StatusLabel::JustStarted => "just started / continue",
        }
    }
}

/// Colour band of the progress indicator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgressTone {
    Success,
    Warning,
    Accent,
}

impl ProgressTone {
    pub fn for_percentage(percentage: u8) -> Self {
        match percentage {
            80.. => ProgressTone::Success,
            50..=79 => ProgressTone::Warning,
            _ => ProgressTone::Accent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub completed_count: usize,
    pub total_count: usize,
    pub percentage: u8,
    pub status_label: StatusLabel,
    pub status_message: String,
    pub show_hint: bool,
    pub tone: ProgressTone,
    /// Labels of the fields still unsatisfied, in tracked order.
    pub missing: Vec<String>,
}

/// The encouragement hint shows from 30% up to, but not including, 100%.
pub fn shows_hint(percentage: u8) -> bool {
    (30..100).contains(&percentage)
}

/// `round(100 * completed / total)` with half-up rounding, in integer arithmetic.
pub fn percentage_of(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    ((200 * completed + total) / (2 * total)) as u8
}

pub fn summarize(evaluations: &[FieldResult]) -> ProgressSummary {
    let total_count = evaluations.len();
    let completed_count = evaluations
        .iter()
        .filter(|r| r.evaluation.counts_as_complete())
        .count();
    let missing = evaluations
        .iter()
        .filter(|r| r.evaluation == FieldEvaluation::Unsatisfied)
        .map(|r| r.field.label().to_string())
        .collect();

    let percentage = percentage_of(completed_count, total_count);
    let status_label = StatusLabel::for_percentage(percentage);

    ProgressSummary {
        completed_count,
        total_count,
        percentage,
        status_label,
        status_message: status_label.message().to_string(),
        show_hint: shows_hint(percentage),
        tone: ProgressTone::for_percentage(percentage),
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::evaluator::evaluate;
    use crate::form::record::{FormRecord, TextField, TrackedField};

    fn filled_record() -> FormRecord {
        let mut record = FormRecord::default();
        for field in TextField::ALL {
            record.set_text(field, format!("value for {}", field.wire_name()));
        }
        record
    }

    #[test]
    fn test_empty_record_counts_only_photo() {
        let summary = summarize(&evaluate(&FormRecord::default(), false));
        assert_eq!(summary.completed_count, 1);
        assert_eq!(summary.total_count, 11);
        assert_eq!(summary.percentage, 9);
        assert_eq!(summary.status_label, StatusLabel::JustStarted);
        assert_eq!(summary.missing.len(), 10);
        assert!(!summary.show_hint);
    }

    #[test]
    fn test_name_and_email_scenario() {
        let mut record = FormRecord::default();
        record.set_text(TextField::FullName, "Jean Dupont");
        record.set_text(TextField::Email, "jean@x.com");

        let summary = summarize(&evaluate(&record, false));
        assert_eq!(summary.completed_count, 3);
        assert_eq!(summary.total_count, 11);
        // 300 / 11 = 27.27
        assert_eq!(summary.percentage, 27);
        assert_eq!(summary.status_label, StatusLabel::JustStarted);
        assert_eq!(summary.status_message, "just started / continue");
        assert!(!summary.show_hint);
        assert_eq!(summary.tone, ProgressTone::Accent);
    }

    #[test]
    fn test_full_record_without_photo_is_complete() {
        let summary = summarize(&evaluate(&filled_record(), false));
        assert_eq!(summary.percentage, 100);
        assert_eq!(summary.status_label, StatusLabel::Complete);
        assert!(!summary.show_hint);
        assert!(summary.missing.is_empty());
    }

    #[test]
    fn test_full_record_with_attached_photo_is_complete() {
        let mut record = filled_record();
        record.include_photo = true;
        let summary = summarize(&evaluate(&record, true));
        assert_eq!(summary.completed_count, 11);
        assert_eq!(summary.percentage, 100);
        assert_eq!(summary.status_label, StatusLabel::Complete);
    }

    #[test]
    fn test_photo_requested_but_missing_blocks_completion() {
        let mut record = filled_record();
        record.include_photo = true;
        let summary = summarize(&evaluate(&record, false));
        assert_eq!(summary.completed_count, 10);
        assert_eq!(summary.percentage, 91);
        assert_eq!(summary.status_label, StatusLabel::AlmostDone);
        assert!(summary.show_hint);
        assert_eq!(summary.missing, vec!["Photo".to_string()]);
    }

    #[test]
    fn test_toggling_photo_flag_moves_count_by_one() {
        let mut record = FormRecord::default();
        record.set_text(TextField::Skills, "Rust");
        let before = summarize(&evaluate(&record, false)).completed_count;

        record.include_photo = true;
        let toggled = summarize(&evaluate(&record, false)).completed_count;
        assert_eq!(toggled, before - 1);

        record.include_photo = false;
        assert_eq!(summarize(&evaluate(&record, false)).completed_count, before);
    }

    #[test]
    fn test_filling_a_field_never_decreases_percentage() {
        let mut record = FormRecord::default();
        record.include_photo = true;
        let mut last = summarize(&evaluate(&record, false)).percentage;
        for field in TextField::ALL {
            record.set_text(field, "x");
            let next = summarize(&evaluate(&record, false)).percentage;
            assert!(next >= last, "{} dropped progress", field.wire_name());
            last = next;
        }
    }

    #[test]
    fn test_summary_is_idempotent() {
        let mut record = FormRecord::default();
        record.set_text(TextField::Objective, "Lead a platform team");
        let a = summarize(&evaluate(&record, false));
        let b = summarize(&evaluate(&record, false));
        assert_eq!(a, b);
    }

    #[test]
    fn test_percentage_matches_rounded_ratio() {
        for completed in 0..=TrackedField::COUNT {
            let expected = (100.0 * completed as f64 / TrackedField::COUNT as f64).round() as u8;
            assert_eq!(percentage_of(completed, TrackedField::COUNT), expected);
        }
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(percentage_of(1, 8), 13); // 12.5
        assert_eq!(percentage_of(1, 200), 1); // 0.5
        assert_eq!(percentage_of(0, 0), 0);
    }

    #[test]
    fn test_hint_boundaries() {
        assert!(!shows_hint(29));
        assert!(shows_hint(30));
        assert!(shows_hint(99));
        assert!(!shows_hint(100));
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(StatusLabel::for_percentage(49), StatusLabel::JustStarted);
        assert_eq!(StatusLabel::for_percentage(50), StatusLabel::PastHalfway);
        assert_eq!(StatusLabel::for_percentage(79), StatusLabel::PastHalfway);
        assert_eq!(StatusLabel::for_percentage(80), StatusLabel::AlmostDone);
        assert_eq!(StatusLabel::for_percentage(99), StatusLabel::AlmostDone);
        assert_eq!(StatusLabel::for_percentage(100), StatusLabel::Complete);
    }

    #[test]
    fn test_tone_bands() {
        assert_eq!(ProgressTone::for_percentage(49), ProgressTone::Accent);
        assert_eq!(ProgressTone::for_percentage(50), ProgressTone::Warning);
        assert_eq!(ProgressTone::for_percentage(80), ProgressTone::Success);
    }
}
