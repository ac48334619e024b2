//! Intake validation
//!
//! Gates every query on the presence of the required profile fields.
//! Types and ranges are the form layer's concern; only presence is checked here.

use crate::models::StudentRecord;
use thiserror::Error;

/// Required fields, in the order they are checked.
pub const REQUIRED_FIELDS: &[&str] = &["name", "age", "course_applied", "marks_10th", "marks_12th"];

/// First required field found absent or empty.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing or invalid field: {field}")]
pub struct MissingField {
    pub field: &'static str,
}

/// Check required fields, short-circuiting on the first one missing.
pub fn validate(record: &StudentRecord) -> Result<(), MissingField> {
    for &field in REQUIRED_FIELDS {
        if !is_present(record, field) {
            return Err(MissingField { field });
        }
    }
    Ok(())
}

fn is_present(record: &StudentRecord, field: &str) -> bool {
    match field {
        "name" => !record.name.is_empty(),
        "age" => record.age.is_some(),
        "course_applied" => !record.course_applied.is_empty(),
        "marks_10th" => record.marks_10th.is_some(),
        "marks_12th" => record.marks_12th.is_some(),
        _ => true,
    }
}
