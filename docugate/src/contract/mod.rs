//! Document Contract: the full expected output shape for a document class.
//!
//! A contract composes singular (zero-or-one) and repeated (zero-or-many)
//! section schemas plus a document-wide confidence field. Validation
//! distinguishes three states that must never be conflated: a key omitted
//! outright (malformed upstream output), an explicit `null` (valid
//! domain-negative value), and a present value (validated normally).

mod result;

pub use result::DocumentResult;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::confidence::Confidence;
use crate::errors::{
    json_type_name, ContractViolation, SectionValidationError, ValidationFailure,
};
use crate::schema::{FieldConstraint, FieldValue, SectionSchema};

/// Default payload key carrying the document-wide confidence score.
pub const OVERALL_CONFIDENCE_KEY: &str = "overallConfidenceScore";

/// One named slot in a contract, singular or repeated.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct SectionSlot {
    key: String,
    schema: SectionSchema,
}

/// The composed output shape for one document class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentContract {
    class: String,
    singular: Vec<SectionSlot>,
    repeated: Vec<SectionSlot>,
    overall: FieldConstraint,
}

impl DocumentContract {
    /// Creates an empty contract for the given document class.
    #[must_use]
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            singular: Vec::new(),
            repeated: Vec::new(),
            overall: FieldConstraint::number(OVERALL_CONFIDENCE_KEY)
                .with_range(Confidence::MIN, Confidence::MAX)
                .describe("Overall extraction confidence across the entire document"),
        }
    }

    /// Adds a singular section under the given payload key.
    ///
    /// Singular sections are optional at the document level: an explicit
    /// `null` is valid and distinct from a missing key.
    #[must_use]
    pub fn singular(mut self, key: impl Into<String>, schema: SectionSchema) -> Self {
        self.singular.push(SectionSlot {
            key: key.into(),
            schema,
        });
        self
    }

    /// Adds a repeated section under the given payload key.
    ///
    /// The payload must carry an array; zero entries is valid.
    #[must_use]
    pub fn repeated(mut self, key: impl Into<String>, schema: SectionSchema) -> Self {
        self.repeated.push(SectionSlot {
            key: key.into(),
            schema,
        });
        self
    }

    /// The document class this contract describes.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Section schemas in declaration order, singular then repeated.
    pub fn schemas(&self) -> impl Iterator<Item = &SectionSchema> {
        self.singular
            .iter()
            .chain(self.repeated.iter())
            .map(|slot| &slot.schema)
    }

    /// The domain-negative terminal result for this contract: every
    /// singular section `None`, every repeated section empty, overall
    /// confidence zero.
    #[must_use]
    pub fn domain_negative(&self) -> DocumentResult {
        let singular = self
            .singular
            .iter()
            .map(|slot| (slot.key.clone(), None))
            .collect();
        let repeated = self
            .repeated
            .iter()
            .map(|slot| (slot.key.clone(), Vec::new()))
            .collect();
        DocumentResult::new(self.class.clone(), singular, repeated, Confidence::zero())
    }

    /// Validates an upstream payload against this contract.
    ///
    /// Validation is exhaustive across sections: every contract-level,
    /// document-level and per-section violation found in the payload is
    /// collected into the failure. Extra top-level keys are ignored.
    /// Validating the same payload twice yields identical results.
    pub fn validate(&self, payload: &serde_json::Value) -> Result<DocumentResult, ValidationFailure> {
        let mut failure = ValidationFailure::empty(&self.class);

        let Some(object) = payload.as_object() else {
            failure.contract.push(ContractViolation::PayloadNotObject {
                found: json_type_name(payload),
            });
            return Err(failure);
        };

        let mut singular = BTreeMap::new();
        for slot in &self.singular {
            match object.get(&slot.key) {
                None => failure.contract.push(ContractViolation::MissingKey {
                    key: slot.key.clone(),
                }),
                Some(serde_json::Value::Null) => {
                    singular.insert(slot.key.clone(), None);
                }
                Some(serde_json::Value::Object(raw)) => match slot.schema.validate(raw) {
                    Ok(record) => {
                        singular.insert(slot.key.clone(), Some(record));
                    }
                    Err(err) => failure.sections.push(err),
                },
                Some(other) => failure.contract.push(ContractViolation::SectionNotObject {
                    key: slot.key.clone(),
                    found: json_type_name(other),
                }),
            }
        }

        let mut repeated = BTreeMap::new();
        for slot in &self.repeated {
            match object.get(&slot.key) {
                None => failure.contract.push(ContractViolation::MissingKey {
                    key: slot.key.clone(),
                }),
                Some(serde_json::Value::Array(items)) => {
                    let mut records = Vec::with_capacity(items.len());
                    for (index, item) in items.iter().enumerate() {
                        match item.as_object() {
                            Some(raw) => match slot.schema.validate(raw) {
                                Ok(record) => records.push(record),
                                Err(err) => failure.sections.push(err.at_entry(index)),
                            },
                            None => failure.contract.push(ContractViolation::EntryNotObject {
                                key: slot.key.clone(),
                                index,
                                found: json_type_name(item),
                            }),
                        }
                    }
                    repeated.insert(slot.key.clone(), records);
                }
                Some(other) => failure.contract.push(ContractViolation::SectionNotArray {
                    key: slot.key.clone(),
                    found: json_type_name(other),
                }),
            }
        }

        // Overall confidence is an independently supplied score; only its
        // requiredness and range are enforced, it is never derived from
        // section scores.
        let overall = match self.overall.validate(object.get(&self.overall.name)) {
            Ok(Some(FieldValue::Number(score))) => Confidence::new(score).ok(),
            Ok(_) => None,
            Err(violation) => {
                failure.document.push(violation);
                None
            }
        };

        if !failure.is_empty() {
            tracing::debug!(
                class = %self.class,
                violations = failure.total(),
                "document validation failed"
            );
            return Err(failure);
        }

        match overall {
            Some(overall) => Ok(DocumentResult::new(
                self.class.clone(),
                singular,
                repeated,
                overall,
            )),
            None => {
                // Unreachable with a well-formed overall constraint.
                failure.document.push(crate::errors::ConstraintViolation::new(
                    &self.overall.name,
                    crate::errors::ViolationReason::MissingRequired,
                ));
                Err(failure)
            }
        }
    }
}

/// Groups the per-section aggregate errors by section name.
#[must_use]
pub fn violations_by_section(
    errors: &[SectionValidationError],
) -> BTreeMap<&str, Vec<&SectionValidationError>> {
    let mut grouped: BTreeMap<&str, Vec<&SectionValidationError>> = BTreeMap::new();
    for err in errors {
        grouped.entry(err.section.as_str()).or_default().push(err);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn gas_contract() -> DocumentContract {
        DocumentContract::new("gas_invoice_and_heat")
            .singular(
                "heatQuantityData",
                SectionSchema::new(
                    "heat_quantity",
                    FieldConstraint::number("heatQuantity_MMBTU"),
                ),
            )
            .repeated(
                "invoiceData",
                SectionSchema::new(
                    "invoice",
                    FieldConstraint::number("totalAmount_ExclVAT"),
                )
                .field(FieldConstraint::text("vendor").optional())
                .field(FieldConstraint::number("vatAmount").optional()),
            )
    }

    #[test]
    fn test_domain_negative_payload_is_valid() {
        // Scenario A: gate-rejected upstream output.
        let payload = serde_json::json!({
            "heatQuantityData": null,
            "invoiceData": [],
            "overallConfidenceScore": 0
        });

        let result = gas_contract().validate(&payload).unwrap();
        assert!(result.is_domain_negative());
        assert_eq!(result.singular("heatQuantityData"), None);
        assert_eq!(result.repeated("invoiceData").len(), 0);
        assert_eq!(result.overall_confidence().value(), 0.0);
    }

    #[test]
    fn test_both_sections_present() {
        // Scenario B.
        let payload = serde_json::json!({
            "heatQuantityData": {
                "heatQuantity_MMBTU": 12345.6,
                "confidenceScore": 95
            },
            "invoiceData": [{
                "totalAmount_ExclVAT": 1_000_000.50,
                "confidenceScore": 88
            }],
            "overallConfidenceScore": 90
        });

        let result = gas_contract().validate(&payload).unwrap();
        let heat = result.singular("heatQuantityData").unwrap();
        assert_eq!(heat.number("heatQuantity_MMBTU"), Some(12345.6));
        assert_eq!(heat.confidence().value(), 95.0);

        let entries = result.repeated("invoiceData");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].number("totalAmount_ExclVAT"), Some(1_000_000.50));
        // Optional fields resolve to None.
        assert_eq!(entries[0].text("vendor"), None);
    }

    #[test]
    fn test_entry_missing_primary_field_cited() {
        // Scenario C.
        let payload = serde_json::json!({
            "heatQuantityData": null,
            "invoiceData": [{
                "vendor": "Chevron",
                "confidenceScore": 70
            }],
            "overallConfidenceScore": 40
        });

        let failure = gas_contract().validate(&payload).unwrap_err();
        assert_eq!(failure.sections.len(), 1);
        assert!(failure.sections[0].cites("totalAmount_ExclVAT"));
        assert_eq!(failure.sections[0].entry, Some(0));
    }

    #[test]
    fn test_overall_confidence_range_violation_not_clamped() {
        // Scenario D.
        let payload = serde_json::json!({
            "heatQuantityData": null,
            "invoiceData": [],
            "overallConfidenceScore": 150
        });

        let failure = gas_contract().validate(&payload).unwrap_err();
        assert_eq!(failure.document.len(), 1);
        assert_eq!(failure.document[0].field, OVERALL_CONFIDENCE_KEY);
    }

    #[test]
    fn test_entries_preserve_order() {
        // Scenario E.
        let payload = serde_json::json!({
            "heatQuantityData": null,
            "invoiceData": [
                { "totalAmount_ExclVAT": 111.0, "vendor": "Chevron", "confidenceScore": 90 },
                { "totalAmount_ExclVAT": 222.0, "vendor": "Mitsui", "confidenceScore": 85 }
            ],
            "overallConfidenceScore": 80
        });

        let result = gas_contract().validate(&payload).unwrap();
        let entries = result.repeated("invoiceData");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text("vendor"), Some("Chevron"));
        assert_eq!(entries[1].text("vendor"), Some("Mitsui"));
    }

    #[test]
    fn test_missing_key_distinct_from_null() {
        // Key omitted entirely: malformed upstream output, not a valid
        // domain-negative null.
        let payload = serde_json::json!({
            "invoiceData": [],
            "overallConfidenceScore": 0
        });

        let failure = gas_contract().validate(&payload).unwrap_err();
        assert_eq!(
            failure.contract,
            vec![ContractViolation::MissingKey {
                key: "heatQuantityData".to_string()
            }]
        );
    }

    #[test]
    fn test_repeated_section_null_is_malformed() {
        let payload = serde_json::json!({
            "heatQuantityData": null,
            "invoiceData": null,
            "overallConfidenceScore": 0
        });

        let failure = gas_contract().validate(&payload).unwrap_err();
        assert!(matches!(
            failure.contract[0],
            ContractViolation::SectionNotArray { .. }
        ));
    }

    #[test]
    fn test_extra_keys_ignored() {
        let payload = serde_json::json!({
            "heatQuantityData": null,
            "invoiceData": [],
            "overallConfidenceScore": 0,
            "modelVersion": "v3",
            "pageCount": 12
        });

        assert!(gas_contract().validate(&payload).is_ok());
    }

    #[test]
    fn test_payload_root_must_be_object() {
        let failure = gas_contract().validate(&serde_json::json!([1, 2])).unwrap_err();
        assert_eq!(
            failure.contract,
            vec![ContractViolation::PayloadNotObject {
                found: "array".to_string()
            }]
        );
    }

    #[test]
    fn test_failures_collected_across_sections() {
        let payload = serde_json::json!({
            "heatQuantityData": { "confidenceScore": 95 },
            "invoiceData": [
                { "confidenceScore": 80 },
                "not-an-object"
            ],
            "overallConfidenceScore": 200
        });

        let failure = gas_contract().validate(&payload).unwrap_err();
        // Heat section error, invoice entry 0 error, entry 1 shape error,
        // and the overall-confidence range violation: all reported.
        assert_eq!(failure.sections.len(), 2);
        assert_eq!(failure.contract.len(), 1);
        assert_eq!(failure.document.len(), 1);
        assert_eq!(failure.total(), 4);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let payload = serde_json::json!({
            "heatQuantityData": { "heatQuantity_MMBTU": 99.9, "confidenceScore": 91 },
            "invoiceData": [],
            "overallConfidenceScore": 77.5
        });

        let contract = gas_contract();
        let first = contract.validate(&payload).unwrap();
        let second = contract.validate(&payload).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_violations_by_section_grouping() {
        let errors = vec![
            SectionValidationError::new("invoice", vec![]).at_entry(0),
            SectionValidationError::new("invoice", vec![]).at_entry(1),
            SectionValidationError::new("heat_quantity", vec![]),
        ];
        let grouped = violations_by_section(&errors);
        assert_eq!(grouped["invoice"].len(), 2);
        assert_eq!(grouped["heat_quantity"].len(), 1);
    }
}
