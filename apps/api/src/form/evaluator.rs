use serde::{Deserialize, Serialize};

use crate::form::record::{FormRecord, TrackedField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldEvaluation {
    Satisfied,
    Unsatisfied,
    /// Excused from completion; counts toward the numerator.
    NotApplicable,
}

impl FieldEvaluation {
    pub fn counts_as_complete(self) -> bool {
        !matches!(self, FieldEvaluation::Unsatisfied)
    }
}

/// One tracked slot with its outcome, in tracked-field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldResult {
    pub field: TrackedField,
    pub evaluation: FieldEvaluation,
}

pub type FieldEvaluations = Vec<FieldResult>;

/// Evaluates every tracked field of `record`.
///
/// `photo_present` reports whether an already-validated attachment is held by
/// the caller; it only matters when the record asks for a photo.
pub fn evaluate(record: &FormRecord, photo_present: bool) -> FieldEvaluations {
    TrackedField::all()
        .map(|field| FieldResult {
            field,
            evaluation: evaluate_field(record, photo_present, field),
        })
        .collect()
}

fn evaluate_field(record: &FormRecord, photo_present: bool, field: TrackedField) -> FieldEvaluation {
    match field {
        TrackedField::Text(text) if record.is_filled(text) => FieldEvaluation::Satisfied,
        TrackedField::Text(_) => FieldEvaluation::Unsatisfied,
        TrackedField::Photo => match (record.include_photo, photo_present) {
            (false, _) => FieldEvaluation::NotApplicable,
            (true, true) => FieldEvaluation::Satisfied,
            (true, false) => FieldEvaluation::Unsatisfied,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::record::TextField;

    fn photo(evals: &FieldEvaluations) -> FieldEvaluation {
        evals
            .iter()
            .find(|r| r.field == TrackedField::Photo)
            .map(|r| r.evaluation)
            .unwrap()
    }

    #[test]
    fn test_every_tracked_field_evaluated_once() {
        let evals = evaluate(&FormRecord::default(), false);
        assert_eq!(evals.len(), TrackedField::COUNT);
        let fields: Vec<_> = evals.iter().map(|r| r.field).collect();
        assert_eq!(fields, TrackedField::all().collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_record_only_photo_excused() {
        let evals = evaluate(&FormRecord::default(), false);
        for r in &evals {
            match r.field {
                TrackedField::Photo => assert_eq!(r.evaluation, FieldEvaluation::NotApplicable),
                _ => assert_eq!(r.evaluation, FieldEvaluation::Unsatisfied),
            }
        }
    }

    #[test]
    fn test_photo_three_way_rule() {
        let mut record = FormRecord::default();
        assert_eq!(photo(&evaluate(&record, false)), FieldEvaluation::NotApplicable);
        // A stray attachment without the flag is still excused.
        assert_eq!(photo(&evaluate(&record, true)), FieldEvaluation::NotApplicable);

        record.include_photo = true;
        assert_eq!(photo(&evaluate(&record, false)), FieldEvaluation::Unsatisfied);
        assert_eq!(photo(&evaluate(&record, true)), FieldEvaluation::Satisfied);
    }

    #[test]
    fn test_required_and_optional_use_same_rule() {
        let mut record = FormRecord::default();
        record.set_text(TextField::FullName, "Jean Dupont");
        record.set_text(TextField::Languages, "French, English");
        record.set_text(TextField::Email, "   ");

        let evals = evaluate(&record, false);
        let get = |f: TextField| {
            evals
                .iter()
                .find(|r| r.field == TrackedField::Text(f))
                .map(|r| r.evaluation)
        };
        assert_eq!(get(TextField::FullName), Some(FieldEvaluation::Satisfied));
        assert_eq!(get(TextField::Languages), Some(FieldEvaluation::Satisfied));
        assert_eq!(get(TextField::Email), Some(FieldEvaluation::Unsatisfied));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let mut record = FormRecord::default();
        record.set_text(TextField::Skills, "Rust");
        record.include_photo = true;
        assert_eq!(evaluate(&record, false), evaluate(&record, false));
    }
}
