//! Flat string attribute encoding for stored student profiles
//!
//! The record store only holds string values. This codec is the single place
//! that turns a typed `StudentRecord` into that map and back again.

use crate::models::StudentRecord;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::warn;

pub type AttributeMap = BTreeMap<String, String>;

const LIST_SEPARATOR: &str = ", ";

pub fn encode(record: &StudentRecord) -> AttributeMap {
    let mut attrs = AttributeMap::new();

    attrs.insert("name".to_string(), record.name.clone());
    if let Some(age) = record.age {
        attrs.insert("age".to_string(), age.to_string());
    }
    attrs.insert("course_applied".to_string(), record.course_applied.clone());
    if let Some(marks) = record.marks_10th {
        attrs.insert("marks_10th".to_string(), marks.to_string());
    }
    if let Some(marks) = record.marks_12th {
        attrs.insert("marks_12th".to_string(), marks.to_string());
    }
    attrs.insert(
        "documents_submitted".to_string(),
        record.documents_submitted.join(LIST_SEPARATOR),
    );
    attrs.insert("loan_requested".to_string(), record.loan_requested.to_string());
    attrs.insert(
        "income_certificate".to_string(),
        record.income_certificate.to_string(),
    );

    attrs
}

/// Decode with fixed per-field rules: lists split on commas, unparseable
/// numbers fall back to zero, booleans are a case-insensitive "true".
pub fn decode(attrs: &AttributeMap) -> StudentRecord {
    StudentRecord {
        name: attrs.get("name").cloned().unwrap_or_default(),
        age: attrs.get("age").map(|raw| parse_or_zero("age", raw)),
        course_applied: attrs.get("course_applied").cloned().unwrap_or_default(),
        marks_10th: attrs.get("marks_10th").map(|raw| parse_or_zero("marks_10th", raw)),
        marks_12th: attrs.get("marks_12th").map(|raw| parse_or_zero("marks_12th", raw)),
        documents_submitted: attrs
            .get("documents_submitted")
            .map(|raw| split_list(raw))
            .unwrap_or_default(),
        loan_requested: attrs
            .get("loan_requested")
            .map(|raw| parse_or_zero("loan_requested", raw))
            .unwrap_or(0.0),
        income_certificate: attrs
            .get("income_certificate")
            .map(|raw| raw.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|doc| !doc.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_or_zero<T: FromStr + Default>(field: &str, raw: &str) -> T {
    raw.trim().parse().unwrap_or_else(|_| {
        warn!(field, raw, "Unparseable stored value, defaulting to zero");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StudentRecord {
        StudentRecord {
            name: "Nisha Iyer".to_string(),
            age: Some(17),
            course_applied: "B.Tech CSE".to_string(),
            marks_10th: Some(91.4),
            marks_12th: Some(88.0),
            documents_submitted: vec![
                "Marksheet 10th".to_string(),
                "Aadhar Card".to_string(),
                "Photo".to_string(),
            ],
            loan_requested: 250000.5,
            income_certificate: true,
        }
    }

    #[test]
    fn test_encode_is_flat_strings() {
        let attrs = encode(&sample());
        assert_eq!(attrs["age"], "17");
        assert_eq!(attrs["marks_10th"], "91.4");
        assert_eq!(attrs["documents_submitted"], "Marksheet 10th, Aadhar Card, Photo");
        assert_eq!(attrs["income_certificate"], "true");
    }

    #[test]
    fn test_decode_restores_types() {
        let record = sample();
        assert_eq!(decode(&encode(&record)), record);
    }

    #[test]
    fn test_decode_fallbacks() {
        let mut attrs = AttributeMap::new();
        attrs.insert("name".into(), "Omar".into());
        attrs.insert("age".into(), "seventeen".into());
        attrs.insert("marks_10th".into(), "n/a".into());
        attrs.insert("loan_requested".into(), "".into());
        attrs.insert("income_certificate".into(), "TRUE".into());
        attrs.insert("documents_submitted".into(), " Photo ,Aadhar Card,, ".into());

        let record = decode(&attrs);
        assert_eq!(record.age, Some(0));
        assert_eq!(record.marks_10th, Some(0.0));
        assert_eq!(record.marks_12th, None);
        assert_eq!(record.loan_requested, 0.0);
        assert!(record.income_certificate);
        assert_eq!(record.documents_submitted, vec!["Photo", "Aadhar Card"]);
    }

    #[test]
    fn test_python_style_boolean() {
        let mut attrs = AttributeMap::new();
        attrs.insert("income_certificate".into(), "False".into());
        assert!(!decode(&attrs).income_certificate);

        attrs.insert("income_certificate".into(), "True".into());
        assert!(decode(&attrs).income_certificate);
    }
}
