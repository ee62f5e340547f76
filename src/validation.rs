use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::form::IncidentRecord;

/// The six incident fields, in form order. Wire names are snake_case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Clinic,
    Department,
    Room,
    Phone,
    Description,
    Priority,
}

// Optional "+" and 1-3 digit country code (with optional space or hyphen),
// then 9-15 digits.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+\d{1,3}[- ]?)?\d{9,15}$").expect("phone pattern"));

const MIN_DESCRIPTION_CHARS: usize = 10;

/// Per-field error messages for the current record. Recomputed wholesale on
/// every validation pass; a field appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    errors: BTreeMap<Field, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Removes the entry for one field, leaving the rest untouched. Returns
    /// whether an entry was present.
    pub fn clear(&mut self, field: Field) -> bool {
        self.errors.remove(&field).is_some()
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.errors.insert(field, message.to_string());
    }
}

/// Validates the whole record, one independent check per field. Pure and
/// deterministic; never merges with a previous report.
pub fn validate(record: &IncidentRecord) -> ValidationReport {
    let mut report = ValidationReport::default();

    if record.clinic.is_empty() {
        report.insert(Field::Clinic, "Please select a clinic");
    }

    if record.department.is_empty() {
        report.insert(Field::Department, "Please select a department");
    }

    if record.room.is_empty() {
        report.insert(Field::Room, "Please provide a room or office location");
    }

    if record.phone.is_empty() {
        report.insert(Field::Phone, "Please provide a contact phone number");
    } else if !PHONE_RE.is_match(&record.phone) {
        report.insert(Field::Phone, "Please provide a valid phone number");
    }

    if record.description.is_empty() {
        report.insert(Field::Description, "Please provide a problem description");
    } else if record.description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
        report.insert(
            Field::Description,
            "Please provide a more detailed description (at least 10 characters)",
        );
    }

    if record.priority.is_empty() {
        report.insert(Field::Priority, "Please select a priority level");
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_record() -> IncidentRecord {
        IncidentRecord {
            clinic: "clinic1".to_string(),
            department: "dept1".to_string(),
            room: "Room 302".to_string(),
            phone: "+1 5551234567".to_string(),
            description: "printer is broken today".to_string(),
            priority: "high".to_string(),
        }
    }

    #[test]
    fn empty_record_yields_one_error_per_field() {
        let report = validate(&IncidentRecord::default());
        assert!(!report.is_valid());
        assert_eq!(report.len(), 6);
        for field in [
            Field::Clinic,
            Field::Department,
            Field::Room,
            Field::Phone,
            Field::Description,
            Field::Priority,
        ] {
            assert!(report.error_for(field).is_some(), "missing error for {field:?}");
        }
    }

    #[test]
    fn complete_record_is_valid() {
        let report = validate(&valid_record());
        assert!(report.is_valid());
        assert!(report.is_empty());
    }

    #[test]
    fn phone_length_bounds() {
        let mut record = valid_record();

        record.phone = "12345".to_string();
        assert_eq!(
            validate(&record).error_for(Field::Phone),
            Some("Please provide a valid phone number")
        );

        record.phone = "123456789".to_string();
        assert!(validate(&record).error_for(Field::Phone).is_none());

        record.phone = "+44 7911123456".to_string();
        assert!(validate(&record).error_for(Field::Phone).is_none());

        record.phone = "+44-7911123456".to_string();
        assert!(validate(&record).error_for(Field::Phone).is_none());
    }

    #[test]
    fn phone_rejects_non_numeric_noise() {
        let mut record = valid_record();
        record.phone = "call me maybe".to_string();
        assert_eq!(
            validate(&record).error_for(Field::Phone),
            Some("Please provide a valid phone number")
        );
    }

    #[test]
    fn phone_has_at_most_one_error() {
        let mut record = valid_record();
        record.phone = String::new();
        let report = validate(&record);
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.error_for(Field::Phone),
            Some("Please provide a contact phone number")
        );
    }

    #[test]
    fn description_minimum_length_boundary() {
        let mut record = valid_record();

        record.description = "123456789".to_string(); // 9 chars
        assert!(validate(&record).error_for(Field::Description).is_some());

        record.description = "1234567890".to_string(); // 10 chars
        assert!(validate(&record).error_for(Field::Description).is_none());
    }

    #[test]
    fn description_length_counts_trimmed_text() {
        let mut record = valid_record();
        record.description = "  short   ".to_string();
        assert!(validate(&record).error_for(Field::Description).is_some());
    }

    #[test]
    fn clearing_one_field_leaves_other_errors() {
        let mut report = validate(&IncidentRecord::default());
        assert!(report.clear(Field::Phone));
        assert_eq!(report.len(), 5);
        assert!(report.error_for(Field::Phone).is_none());
        assert!(report.error_for(Field::Clinic).is_some());
        // Clearing again is a no-op.
        assert!(!report.clear(Field::Phone));
    }
}
