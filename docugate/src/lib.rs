//! # Docugate
//!
//! Extraction contracts for pulling structured financial and measurement
//! data out of domain-specific documents (gas-purchase invoices,
//! energy-measurement memos) that may be multilingual, noisy, and only
//! sometimes relevant to a target domain.
//!
//! Docugate is the contract/validation/confidence engine, not the
//! extractor: the OCR/AI mechanism that turns document bytes into
//! candidate values is an external collaborator behind the
//! [`ports::DocumentExtractor`] trait. What this crate owns:
//!
//! - **Domain gating**: a document must affirmatively match the target
//!   domain before any field extraction; otherwise the result is the
//!   domain-negative terminal value (null sections, empty arrays, zero
//!   confidence).
//! - **Shape contracts**: typed, nullable-aware field constraints grouped
//!   into sections, composed into per-document-class contracts.
//! - **Exhaustive validation**: every violation in a payload is collected
//!   and reported together.
//! - **Confidence policy**: scores live in [0, 100], are keyed to each
//!   section's primary field only, and map to a fixed band table.
//!
//! ## Quick start
//!
//! ```rust
//! use docugate::classes::gas::{self, GasDocument};
//! use docugate::registry::REGISTRY;
//!
//! let registration = REGISTRY.lookup(gas::CLASS)?;
//! let payload = serde_json::json!({
//!     "heatQuantityData": { "heatQuantity_MMBTU": 12345.6, "confidenceScore": 95 },
//!     "invoiceData": [],
//!     "overallConfidenceScore": 90
//! });
//! let result = registration.contract.validate(&payload)?;
//! let document = GasDocument::from_result(&result)?;
//! assert_eq!(document.heat_quantity.unwrap().heat_quantity_mmbtu, 12345.6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Validation is pure and synchronous; the registry is read-only after
//! initialization, so independent documents can be validated concurrently
//! without locking.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, missing_docs, rust_2018_idioms)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod classes;
pub mod confidence;
pub mod contract;
pub mod errors;
pub mod gate;
pub mod observability;
pub mod ports;
pub mod registry;
pub mod schema;


/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::confidence::{Confidence, ConfidenceBand, ConfidencePolicy};
    pub use crate::contract::{DocumentContract, DocumentResult, OVERALL_CONFIDENCE_KEY};
    pub use crate::errors::{
        ConstraintViolation, ContractViolation, DocugateError, SectionValidationError,
        UnknownDocumentClass, ValidationFailure, ViolationReason,
    };
    pub use crate::gate::{DomainGatePolicy, GateState};
    pub use crate::ports::{extract_and_validate, DocumentExtractor, ExtractionOutcome};
    pub use crate::registry::{ContractRegistration, ContractRegistry, REGISTRY};
    pub use crate::schema::{FieldConstraint, FieldValue, SectionRecord, SectionSchema, ValueType};
}
