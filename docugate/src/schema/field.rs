//! Field Constraint Model: the primitive building block of a section.
//!
//! A [`FieldConstraint`] describes one typed, optionally-nullable,
//! optionally-required field with its semantic intent and an optional
//! numeric validation range. Validation is pure: it either coerces the raw
//! JSON value into a [`FieldValue`] or fails with a
//! [`ConstraintViolation`]; nothing is defaulted or clamped.

use serde::{Deserialize, Serialize};

use crate::errors::{json_type_name, ConstraintViolation, ViolationReason};

/// The value type a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Numeric values, integer or fractional. Precision is preserved.
    Number,
    /// Free-form text.
    Text,
}

impl ValueType {
    /// Name used in violation reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Text => "string",
        }
    }
}

/// A validated field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A numeric value.
    Number(f64),
    /// A text value.
    Text(String),
}

impl FieldValue {
    /// Returns the numeric value, if this is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Returns the text value, if this is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

/// A typed, optionally-nullable, optionally-required field constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConstraint {
    /// Field name as it appears in the upstream payload.
    pub name: String,
    /// Accepted value type.
    pub value_type: ValueType,
    /// Whether an explicit `null` is a valid value.
    pub nullable: bool,
    /// Whether the field must be present in the payload.
    pub required: bool,
    /// Semantic intent, surfaced in extraction guidance.
    pub description: String,
    /// Inclusive numeric range, for `Number` fields only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<(f64, f64)>,
}

impl FieldConstraint {
    /// A required, non-nullable numeric field.
    #[must_use]
    pub fn number(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: ValueType::Number,
            nullable: false,
            required: true,
            description: String::new(),
            range: None,
        }
    }

    /// A required, non-nullable text field.
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: ValueType::Text,
            nullable: false,
            required: true,
            description: String::new(),
            range: None,
        }
    }

    /// Marks the field optional and nullable.
    ///
    /// An absent optional field resolves to `None`, never to a default
    /// like `0` or `""`.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self.nullable = true;
        self
    }

    /// Sets the semantic description.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the inclusive numeric range.
    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Validates a raw value against this constraint.
    ///
    /// `raw` is `None` when the key was absent from the payload. Returns
    /// `Ok(None)` for a validly absent or null optional field.
    pub fn validate(
        &self,
        raw: Option<&serde_json::Value>,
    ) -> Result<Option<FieldValue>, ConstraintViolation> {
        let value = match raw {
            None => {
                if self.required {
                    return Err(self.violation(ViolationReason::MissingRequired));
                }
                return Ok(None);
            }
            Some(serde_json::Value::Null) => {
                if self.nullable {
                    return Ok(None);
                }
                return Err(self.violation(ViolationReason::NullNotAllowed));
            }
            Some(value) => value,
        };

        match (self.value_type, value) {
            (ValueType::Number, serde_json::Value::Number(n)) => {
                let number = n.as_f64().ok_or_else(|| {
                    self.violation(ViolationReason::TypeMismatch {
                        expected: "number".to_string(),
                        found: "non-finite number".to_string(),
                    })
                })?;
                if let Some((min, max)) = self.range {
                    if !(min..=max).contains(&number) {
                        return Err(self.violation(ViolationReason::OutOfRange {
                            min,
                            max,
                            value: number,
                        }));
                    }
                }
                Ok(Some(FieldValue::Number(number)))
            }
            (ValueType::Text, serde_json::Value::String(s)) => {
                Ok(Some(FieldValue::Text(s.clone())))
            }
            (expected, found) => Err(self.violation(ViolationReason::TypeMismatch {
                expected: expected.name().to_string(),
                found: json_type_name(found),
            })),
        }
    }

    fn violation(&self, reason: ViolationReason) -> ConstraintViolation {
        ConstraintViolation::new(&self.name, reason)
    }
}
