//! Field and section schemas: the shape layer of an extraction contract.

pub mod field;
pub mod section;

pub use field::{FieldConstraint, FieldValue, ValueType};
pub use section::{SectionRecord, SectionSchema, CONFIDENCE_KEY};
