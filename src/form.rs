use serde::{Deserialize, Serialize};

use crate::validation::{self, Field, ValidationReport};

/// The structured support request collected by the form. All fields are
/// required for a valid submission; an empty string means "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub clinic: String,
    pub department: String,
    pub room: String,
    pub phone: String,
    pub description: String,
    pub priority: String,
}

impl IncidentRecord {
    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Clinic => self.clinic = value,
            Field::Department => self.department = value,
            Field::Room => self.room = value,
            Field::Phone => self.phone = value,
            Field::Description => self.description = value,
            Field::Priority => self.priority = value,
        }
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    Editing,
    Reviewing,
    Submitting,
    Succeeded,
    Cancelled,
}

/// What a submit request did to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAdvance {
    /// Validation failed; still editing, errors stored.
    Rejected,
    /// Moved from editing to the review phase. No network call yet.
    Review,
    /// Moved from review to submitting; the caller starts the gateway call.
    Dispatch,
    /// Submit is not a legal action in the current phase.
    Ignored,
}

/// Two-phase incident form: edit, review, then a single submission attempt.
/// The record and error report are only ever recomputed together, never
/// merged incrementally.
#[derive(Debug, Clone)]
pub struct FormSession {
    record: IncidentRecord,
    report: ValidationReport,
    phase: FormPhase,
}

impl FormSession {
    pub fn new() -> Self {
        Self {
            record: IncidentRecord::default(),
            report: ValidationReport::default(),
            phase: FormPhase::Editing,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn record(&self) -> &IncidentRecord {
        &self.record
    }

    pub fn errors(&self) -> &ValidationReport {
        &self.report
    }

    /// Edits one field. Only legal while editing; eagerly clears that
    /// field's error, leaving other entries alone.
    pub fn set_field(&mut self, field: Field, value: String) -> bool {
        if self.phase != FormPhase::Editing {
            return false;
        }
        self.record.set(field, value);
        self.report.clear(field);
        true
    }

    /// Advances the submit flow one step: editing validates and moves to
    /// review, review moves to submitting.
    pub fn request_submit(&mut self) -> SubmitAdvance {
        match self.phase {
            FormPhase::Editing => {
                let report = validation::validate(&self.record);
                let valid = report.is_valid();
                self.report = report;
                if valid {
                    self.phase = FormPhase::Reviewing;
                    SubmitAdvance::Review
                } else {
                    SubmitAdvance::Rejected
                }
            }
            FormPhase::Reviewing => {
                self.phase = FormPhase::Submitting;
                SubmitAdvance::Dispatch
            }
            _ => SubmitAdvance::Ignored,
        }
    }

    /// Returns from review to editing, keeping all field values.
    pub fn back(&mut self) -> bool {
        if self.phase != FormPhase::Reviewing {
            return false;
        }
        self.phase = FormPhase::Editing;
        true
    }

    /// Abandons the form from the editing phase.
    pub fn cancel(&mut self) -> bool {
        if self.phase != FormPhase::Editing {
            return false;
        }
        self.phase = FormPhase::Cancelled;
        true
    }

    /// Feeds the gateway resolution back in. Failure returns to review with
    /// the record intact so the user can re-attempt; nothing retries
    /// automatically.
    pub fn complete_submit(&mut self, success: bool) -> bool {
        if self.phase != FormPhase::Submitting {
            return false;
        }
        self.phase = if success {
            FormPhase::Succeeded
        } else {
            FormPhase::Reviewing
        };
        true
    }
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_session() -> FormSession {
        let mut session = FormSession::new();
        session.set_field(Field::Clinic, "clinic1".to_string());
        session.set_field(Field::Department, "dept3".to_string());
        session.set_field(Field::Room, "Reception Desk".to_string());
        session.set_field(Field::Phone, "+1 5551234567".to_string());
        session.set_field(Field::Description, "printer is broken today".to_string());
        session.set_field(Field::Priority, "high".to_string());
        session
    }

    #[test]
    fn valid_record_advances_to_review_then_submitting_then_succeeded() {
        let mut session = filled_session();
        let record_before = session.record().clone();

        assert_eq!(session.request_submit(), SubmitAdvance::Review);
        assert_eq!(session.phase(), FormPhase::Reviewing);
        assert_eq!(session.record(), &record_before);

        assert_eq!(session.request_submit(), SubmitAdvance::Dispatch);
        assert_eq!(session.phase(), FormPhase::Submitting);

        assert!(session.complete_submit(true));
        assert_eq!(session.phase(), FormPhase::Succeeded);
    }

    #[test]
    fn invalid_record_stays_in_editing_with_errors() {
        let mut session = FormSession::new();
        assert_eq!(session.request_submit(), SubmitAdvance::Rejected);
        assert_eq!(session.phase(), FormPhase::Editing);
        assert_eq!(session.errors().len(), 6);
    }

    #[test]
    fn failed_submission_returns_to_review_with_record_intact() {
        let mut session = filled_session();
        session.request_submit();
        session.request_submit();
        let record_before = session.record().clone();

        assert!(session.complete_submit(false));
        assert_eq!(session.phase(), FormPhase::Reviewing);
        assert_eq!(session.record(), &record_before);

        // The user may manually re-attempt.
        assert_eq!(session.request_submit(), SubmitAdvance::Dispatch);
    }

    #[test]
    fn back_returns_to_editing_without_reset() {
        let mut session = filled_session();
        session.request_submit();
        assert!(session.back());
        assert_eq!(session.phase(), FormPhase::Editing);
        assert_eq!(session.record().room, "Reception Desk");
    }

    #[test]
    fn back_is_only_legal_from_review() {
        let mut session = FormSession::new();
        assert!(!session.back());
        assert_eq!(session.phase(), FormPhase::Editing);
    }

    #[test]
    fn cancel_is_only_legal_from_editing() {
        let mut session = filled_session();
        session.request_submit();
        assert!(!session.cancel());
        assert_eq!(session.phase(), FormPhase::Reviewing);

        session.back();
        assert!(session.cancel());
        assert_eq!(session.phase(), FormPhase::Cancelled);
    }

    #[test]
    fn edits_are_rejected_outside_editing() {
        let mut session = filled_session();
        session.request_submit();
        assert!(!session.set_field(Field::Room, "changed".to_string()));
        assert_eq!(session.record().room, "Reception Desk");
    }

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let mut session = FormSession::new();
        session.request_submit();
        assert_eq!(session.errors().len(), 6);

        assert!(session.set_field(Field::Phone, "123456789".to_string()));
        assert!(session.errors().error_for(Field::Phone).is_none());
        assert_eq!(session.errors().len(), 5);
        assert!(session.errors().error_for(Field::Clinic).is_some());
    }

    #[test]
    fn submit_after_terminal_phase_is_ignored() {
        let mut session = filled_session();
        session.request_submit();
        session.request_submit();
        session.complete_submit(true);
        assert_eq!(session.request_submit(), SubmitAdvance::Ignored);
        assert!(!session.complete_submit(true));
    }
}
