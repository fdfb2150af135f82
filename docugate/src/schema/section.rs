//! Section Schema: a named record of related field constraints.
//!
//! Every section carries its own confidence score, validated as a field
//! constraint (`number`, required, range [0, 100]). Validation is
//! exhaustive: all violated constraints in a section are collected and
//! reported together rather than failing on the first one.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::confidence::Confidence;
use crate::errors::{ConstraintViolation, SectionValidationError, ViolationReason};
use crate::schema::field::{FieldConstraint, FieldValue};

/// Payload key carrying a section's confidence score.
pub const CONFIDENCE_KEY: &str = "confidenceScore";

/// A named group of field constraints with a designated primary field.
///
/// The primary field is the single required field whose extraction
/// accuracy solely determines the section's confidence score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionSchema {
    /// Section name, used in error reports.
    pub name: String,
    /// Field constraints in declaration order.
    pub fields: Vec<FieldConstraint>,
    /// Name of the primary required field.
    pub primary_field: String,
    confidence: FieldConstraint,
}

impl SectionSchema {
    /// Creates a schema whose primary field is the given constraint.
    ///
    /// The primary constraint is forced required: a section without its
    /// primary field is meaningless.
    #[must_use]
    pub fn new(name: impl Into<String>, primary: FieldConstraint) -> Self {
        let mut primary = primary;
        primary.required = true;
        primary.nullable = false;
        let primary_field = primary.name.clone();
        Self {
            name: name.into(),
            fields: vec![primary],
            primary_field,
            confidence: FieldConstraint::number(CONFIDENCE_KEY)
                .with_range(Confidence::MIN, Confidence::MAX)
                .describe("Extraction confidence score from 0-100 for this section"),
        }
    }

    /// Adds a non-primary field constraint.
    #[must_use]
    pub fn field(mut self, constraint: FieldConstraint) -> Self {
        self.fields.push(constraint);
        self
    }

    /// Validates a raw JSON object against this schema.
    ///
    /// Unknown keys in the input are ignored. On failure, every violated
    /// constraint is reported, not just the first.
    pub fn validate(
        &self,
        raw: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<SectionRecord, SectionValidationError> {
        let mut violations = Vec::new();
        let mut values = BTreeMap::new();

        for constraint in &self.fields {
            match constraint.validate(raw.get(&constraint.name)) {
                Ok(value) => {
                    values.insert(constraint.name.clone(), value);
                }
                Err(violation) => violations.push(violation),
            }
        }

        let confidence = match self.confidence.validate(raw.get(CONFIDENCE_KEY)) {
            Ok(Some(FieldValue::Number(score))) => Confidence::new(score).ok(),
            Ok(_) => None,
            Err(violation) => {
                violations.push(violation);
                None
            }
        };

        if !violations.is_empty() {
            tracing::debug!(
                section = %self.name,
                count = violations.len(),
                "section validation failed"
            );
            return Err(SectionValidationError::new(&self.name, violations));
        }

        // The range constraint guarantees the score is in [0, 100]; a None
        // here means the constraint itself was mis-built.
        let confidence = confidence.ok_or_else(|| {
            SectionValidationError::new(
                &self.name,
                vec![ConstraintViolation::new(
                    CONFIDENCE_KEY,
                    ViolationReason::MissingRequired,
                )],
            )
        })?;

        Ok(SectionRecord {
            section: self.name.clone(),
            values,
            confidence,
        })
    }
}

/// A validated section: field values plus the section confidence score.
///
/// Immutable after construction. Optional fields that were absent or null
/// are present in the map as `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionRecord {
    section: String,
    values: BTreeMap<String, Option<FieldValue>>,
    confidence: Confidence,
}

impl SectionRecord {
    /// Name of the section this record was validated against.
    #[must_use]
    pub fn section(&self) -> &str {
        &self.section
    }

    /// The section confidence score.
    #[must_use]
    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    /// A field's validated value, flattened across unknown/absent.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field).and_then(Option::as_ref)
    }

    /// A numeric field's value, if present.
    #[must_use]
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_number)
    }

    /// A text field's value, if present.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn invoice_schema() -> SectionSchema {
        SectionSchema::new(
            "invoice",
            FieldConstraint::number("totalAmount_ExclVAT")
                .describe("Total amount excluding VAT"),
        )
        .field(FieldConstraint::text("vendor").optional())
        .field(FieldConstraint::number("vatAmount").optional())
        .field(FieldConstraint::text("currency").optional())
    }

    #[test]
    fn test_valid_section_with_optionals_absent() {
        let schema = invoice_schema();
        let raw = serde_json::json!({
            "totalAmount_ExclVAT": 1_000_000.50,
            "confidenceScore": 88
        });

        let record = schema.validate(raw.as_object().unwrap()).unwrap();
        assert_eq!(record.number("totalAmount_ExclVAT"), Some(1_000_000.50));
        assert_eq!(record.confidence().value(), 88.0);
        // Absent optional fields resolve to None, never a default.
        assert_eq!(record.text("vendor"), None);
        assert_eq!(record.number("vatAmount"), None);
    }

    #[test]
    fn test_missing_primary_field_cited() {
        let schema = invoice_schema();
        let raw = serde_json::json!({
            "vendor": "Chevron",
            "confidenceScore": 90
        });

        let err = schema.validate(raw.as_object().unwrap()).unwrap_err();
        assert!(err.cites("totalAmount_ExclVAT"));
    }

    #[test]
    fn test_validation_is_exhaustive() {
        let schema = invoice_schema();
        // Primary missing AND vendor has the wrong type AND confidence
        // out of range: all three must be reported together.
        let raw = serde_json::json!({
            "vendor": 42,
            "confidenceScore": 120
        });

        let err = schema.validate(raw.as_object().unwrap()).unwrap_err();
        assert_eq!(err.violations.len(), 3);
        assert!(err.cites("totalAmount_ExclVAT"));
        assert!(err.cites("vendor"));
        assert!(err.cites("confidenceScore"));
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        let schema = invoice_schema();
        let raw = serde_json::json!({
            "totalAmount_ExclVAT": 500.0,
            "confidenceScore": 150
        });

        let err = schema.validate(raw.as_object().unwrap()).unwrap_err();
        assert!(err.cites("confidenceScore"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let schema = invoice_schema();
        let raw = serde_json::json!({
            "totalAmount_ExclVAT": 500.0,
            "confidenceScore": 75,
            "glAccountCode": "9999",
            "postingDate": "2025-08-01"
        });

        let record = schema.validate(raw.as_object().unwrap()).unwrap();
        assert_eq!(record.get("glAccountCode"), None);
    }

    #[test]
    fn test_primary_forced_required() {
        let schema = SectionSchema::new(
            "heat",
            FieldConstraint::number("heatQuantity_MMBTU").optional(),
        );
        let raw = serde_json::json!({ "confidenceScore": 50 });
        let err = schema.validate(raw.as_object().unwrap()).unwrap_err();
        assert!(err.cites("heatQuantity_MMBTU"));
    }

    #[test]
    fn test_idempotent_validation() {
        let schema = invoice_schema();
        let raw = serde_json::json!({
            "totalAmount_ExclVAT": 123.456,
            "vendor": "Mitsui",
            "confidenceScore": 95.5
        });
        let object = raw.as_object().unwrap();

        let first = schema.validate(object).unwrap();
        let second = schema.validate(object).unwrap();
        assert_eq!(first, second);
    }
}
