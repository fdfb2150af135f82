//! Error types for the docugate extraction-contract engine.
//!
//! The taxonomy distinguishes recoverable validation failures (single
//! field, whole section, whole document) from caller mistakes such as
//! looking up an unregistered document class. Domain-gate rejection is
//! deliberately NOT represented here: an off-domain document is a valid
//! terminal result, not an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for docugate operations.
#[derive(Debug, Error)]
pub enum DocugateError {
    /// A single field failed its constraint.
    #[error("{0}")]
    Constraint(#[from] ConstraintViolation),

    /// One or more fields failed within a section.
    #[error("{0}")]
    Section(#[from] SectionValidationError),

    /// The upstream payload was malformed at the contract level.
    #[error("{0}")]
    Contract(#[from] ContractViolation),

    /// Aggregate document validation failure.
    #[error("{0}")]
    Validation(#[from] ValidationFailure),

    /// A contract lookup was attempted for an unregistered class.
    #[error("{0}")]
    UnknownClass(#[from] UnknownDocumentClass),

    /// A document class was registered more than once.
    #[error("{0}")]
    DuplicateClass(#[from] DuplicateDocumentClass),

    /// A domain-gate signal pattern failed to compile.
    #[error("invalid gate signal pattern: {0}")]
    GatePattern(#[from] regex::Error),

    /// The external extraction collaborator failed.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// A generic internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Why a single field constraint was violated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ViolationReason {
    /// The raw value had the wrong JSON type.
    TypeMismatch {
        /// Type the constraint expected.
        expected: String,
        /// Type actually found in the payload.
        found: String,
    },
    /// A required field was absent from the payload.
    MissingRequired,
    /// An explicit `null` was supplied for a non-nullable field.
    NullNotAllowed,
    /// A numeric value fell outside the constraint's closed range.
    OutOfRange {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
        /// The offending value.
        value: f64,
    },
}

impl std::fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::MissingRequired => write!(f, "required value is missing"),
            Self::NullNotAllowed => write!(f, "null is not allowed"),
            Self::OutOfRange { min, max, value } => {
                write!(f, "value {value} outside range [{min}, {max}]")
            }
        }
    }
}

/// A single field failed its type/range/nullability check.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("field '{field}': {reason}")]
pub struct ConstraintViolation {
    /// Name of the violated field.
    pub field: String,
    /// Why the constraint failed.
    pub reason: ViolationReason,
}

impl ConstraintViolation {
    /// Creates a new constraint violation.
    #[must_use]
    pub fn new(field: impl Into<String>, reason: ViolationReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }
}

/// Aggregate of every constraint violated within one section.
///
/// Validation is exhaustive: all violations for a section are collected
/// before failing, so a caller can present every problem at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionValidationError {
    /// Name of the failing section.
    pub section: String,
    /// Index within a repeated section, when applicable.
    pub entry: Option<usize>,
    /// Every violated constraint, in field declaration order.
    pub violations: Vec<ConstraintViolation>,
}

impl SectionValidationError {
    /// Creates a new section validation error.
    #[must_use]
    pub fn new(section: impl Into<String>, violations: Vec<ConstraintViolation>) -> Self {
        Self {
            section: section.into(),
            entry: None,
            violations,
        }
    }

    /// Attaches the index of the failing entry in a repeated section.
    #[must_use]
    pub fn at_entry(mut self, index: usize) -> Self {
        self.entry = Some(index);
        self
    }

    /// True if the given field is among the violations.
    #[must_use]
    pub fn cites(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl std::fmt::Display for SectionValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "section '{}'", self.section)?;
        if let Some(index) = self.entry {
            write!(f, " entry {index}")?;
        }
        write!(f, ": {} constraint violation(s)", self.violations.len())
    }
}

impl std::error::Error for SectionValidationError {}

/// The upstream payload was malformed at the contract level.
///
/// Distinct from a domain-negative result: a required section key that is
/// missing outright signals a broken upstream response, while an explicit
/// `null` for a nullable section is a valid value.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ContractViolation {
    /// The payload root was not a JSON object.
    #[error("payload root must be an object, found {found}")]
    PayloadNotObject {
        /// Type actually found at the root.
        found: String,
    },
    /// A required section key was entirely absent from the payload.
    #[error("required key '{key}' missing from payload")]
    MissingKey {
        /// The missing key.
        key: String,
    },
    /// A singular section held something other than an object or `null`.
    #[error("section '{key}' must be an object or null, found {found}")]
    SectionNotObject {
        /// The offending key.
        key: String,
        /// Type actually found.
        found: String,
    },
    /// A repeated section held something other than an array.
    #[error("section '{key}' must be an array, found {found}")]
    SectionNotArray {
        /// The offending key.
        key: String,
        /// Type actually found.
        found: String,
    },
    /// An entry of a repeated section was not an object.
    #[error("section '{key}' entry {index} must be an object, found {found}")]
    EntryNotObject {
        /// The repeated section key.
        key: String,
        /// Index of the offending entry.
        index: usize,
        /// Type actually found.
        found: String,
    },
}

/// Every violation found while validating one payload against a contract.
///
/// Document validation does not short-circuit across sections; contract,
/// document-level and per-section failures are all collected so the caller
/// sees the full picture in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// The document class whose contract was violated.
    pub class: String,
    /// Contract-level (shape) violations.
    pub contract: Vec<ContractViolation>,
    /// Violations on document-level scalar fields (overall confidence).
    pub document: Vec<ConstraintViolation>,
    /// Per-section aggregates.
    pub sections: Vec<SectionValidationError>,
}

impl ValidationFailure {
    /// Creates an empty failure for the given class.
    #[must_use]
    pub fn empty(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            contract: Vec::new(),
            document: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Total number of collected violations.
    #[must_use]
    pub fn total(&self) -> usize {
        self.contract.len()
            + self.document.len()
            + self.sections.iter().map(|s| s.violations.len()).sum::<usize>()
    }

    /// True when no violations were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contract.is_empty() && self.document.is_empty() && self.sections.is_empty()
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "validation of class '{}' failed with {} violation(s)",
            self.class,
            self.total()
        )
    }
}

impl std::error::Error for ValidationFailure {}

/// A contract lookup was attempted for a class with no registration.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("unknown document class '{0}'")]
pub struct UnknownDocumentClass(pub String);

/// A document class was registered more than once.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("document class '{0}' already registered")]
pub struct DuplicateDocumentClass(pub String);

/// JSON type name used in violation reports.
#[must_use]
pub fn json_type_name(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_violation_display() {
        let v = ConstraintViolation::new("totalAmount_ExclVAT", ViolationReason::MissingRequired);
        assert_eq!(
            v.to_string(),
            "field 'totalAmount_ExclVAT': required value is missing"
        );
    }

    #[test]
    fn test_out_of_range_display() {
        let v = ConstraintViolation::new(
            "confidenceScore",
            ViolationReason::OutOfRange {
                min: 0.0,
                max: 100.0,
                value: 150.0,
            },
        );
        assert!(v.to_string().contains("150"));
        assert!(v.to_string().contains("[0, 100]"));
    }

    #[test]
    fn test_section_error_display_with_entry() {
        let err = SectionValidationError::new(
            "invoice",
            vec![ConstraintViolation::new("vendor", ViolationReason::NullNotAllowed)],
        )
        .at_entry(2);
        assert_eq!(err.to_string(), "section 'invoice' entry 2: 1 constraint violation(s)");
        assert!(err.cites("vendor"));
        assert!(!err.cites("currency"));
    }

    #[test]
    fn test_validation_failure_total() {
        let mut failure = ValidationFailure::empty("gas");
        assert!(failure.is_empty());

        failure.contract.push(ContractViolation::MissingKey {
            key: "invoiceData".to_string(),
        });
        failure.sections.push(SectionValidationError::new(
            "heat",
            vec![
                ConstraintViolation::new("a", ViolationReason::MissingRequired),
                ConstraintViolation::new("b", ViolationReason::NullNotAllowed),
            ],
        ));

        assert!(!failure.is_empty());
        assert_eq!(failure.total(), 3);
    }

    #[test]
    fn test_contract_violation_serialization() {
        let v = ContractViolation::MissingKey {
            key: "heatQuantityData".to_string(),
        };
        let json = serde_json::to_string(&v).unwrap();
        let back: ContractViolation = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }

    #[test]
    fn test_json_type_name() {
        assert_eq!(json_type_name(&serde_json::json!(null)), "null");
        assert_eq!(json_type_name(&serde_json::json!(1.5)), "number");
        assert_eq!(json_type_name(&serde_json::json!("x")), "string");
        assert_eq!(json_type_name(&serde_json::json!([])), "array");
    }
}
