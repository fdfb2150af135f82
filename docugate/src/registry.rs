//! Contract Registry: document-class to contract lookup.
//!
//! Registrations are assembled once through a consuming builder and frozen
//! afterwards; the process-wide [`REGISTRY`] static carries the default
//! document classes. Lookup is read-only, so concurrent use needs no
//! locking.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};

use crate::classes;
use crate::confidence::ConfidencePolicy;
use crate::contract::DocumentContract;
use crate::errors::{DocugateError, DuplicateDocumentClass, UnknownDocumentClass};
use crate::gate::DomainGatePolicy;

/// Everything registered for one document class: the output contract, the
/// domain gate, the per-section confidence policies, and the plain-text
/// extraction guidance forwarded verbatim to the collaborator. Guidance is
/// part of the contract and versioned with it.
#[derive(Debug, Clone)]
pub struct ContractRegistration {
    /// The composed output shape.
    pub contract: DocumentContract,
    /// Admissibility gate evaluated before extraction.
    pub gate: DomainGatePolicy,
    /// Confidence policy per section, in contract declaration order.
    pub confidence: Vec<ConfidencePolicy>,
    /// Extraction instructions for the external collaborator.
    pub guidance: String,
    /// Contract version; bumped together with guidance changes.
    pub version: String,
    /// When the registration was built.
    pub created_at: DateTime<Utc>,
}

impl ContractRegistration {
    /// Creates a registration with version "1.0.0".
    #[must_use]
    pub fn new(
        contract: DocumentContract,
        gate: DomainGatePolicy,
        guidance: impl Into<String>,
    ) -> Self {
        let confidence = contract
            .schemas()
            .map(|schema| ConfidencePolicy::keyed_to(&schema.primary_field))
            .collect();
        Self {
            contract,
            gate,
            confidence,
            guidance: guidance.into(),
            version: "1.0.0".to_string(),
            created_at: Utc::now(),
        }
    }

    /// Sets the contract version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The document class this registration serves.
    #[must_use]
    pub fn class(&self) -> &str {
        self.contract.class()
    }
}

/// Immutable mapping from document-class identifier to registration.
#[derive(Debug, Default)]
pub struct ContractRegistry {
    entries: HashMap<String, ContractRegistration>,
}

impl ContractRegistry {
    /// Starts building a registry.
    #[must_use]
    pub fn builder() -> ContractRegistryBuilder {
        ContractRegistryBuilder {
            entries: HashMap::new(),
        }
    }

    /// Looks up the registration for a document class.
    pub fn lookup(&self, class: &str) -> Result<&ContractRegistration, UnknownDocumentClass> {
        self.entries
            .get(class)
            .ok_or_else(|| UnknownDocumentClass(class.to_string()))
    }

    /// Registered class identifiers, sorted.
    #[must_use]
    pub fn classes(&self) -> Vec<&str> {
        let mut classes: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        classes.sort_unstable();
        classes
    }

    /// Number of registered classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Consuming builder; the registry is immutable once built.
#[derive(Debug)]
pub struct ContractRegistryBuilder {
    entries: HashMap<String, ContractRegistration>,
}

impl ContractRegistryBuilder {
    /// Adds a registration, failing on a duplicate class identifier.
    pub fn register(
        mut self,
        registration: ContractRegistration,
    ) -> Result<Self, DuplicateDocumentClass> {
        let class = registration.class().to_string();
        if self.entries.contains_key(&class) {
            return Err(DuplicateDocumentClass(class));
        }
        tracing::debug!(class = %class, version = %registration.version, "registered contract");
        self.entries.insert(class, registration);
        Ok(self)
    }

    /// Freezes the registry.
    #[must_use]
    pub fn build(self) -> ContractRegistry {
        ContractRegistry {
            entries: self.entries,
        }
    }
}

/// Builds the default registry with every known document class.
pub fn default_registry() -> Result<ContractRegistry, DocugateError> {
    Ok(ContractRegistry::builder()
        .register(classes::gas::registration()?)?
        .register(classes::lng::registration()?)?
        .build())
}

/// Process-wide read-only registry of the default document classes.
///
/// Populated on first access, immutable thereafter.
#[allow(clippy::expect_used)]
pub static REGISTRY: LazyLock<ContractRegistry> = LazyLock::new(|| {
    default_registry().expect("default contract registrations are valid")
});

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::schema::{FieldConstraint, SectionSchema};

    fn test_registration(class: &str) -> ContractRegistration {
        let contract = DocumentContract::new(class).singular(
            "data",
            SectionSchema::new("data", FieldConstraint::number("value")),
        );
        let gate = DomainGatePolicy::new("test", &["TEST"]).unwrap();
        ContractRegistration::new(contract, gate, "extract the value")
    }

    #[test]
    fn test_lookup_known_class() {
        let registry = ContractRegistry::builder()
            .register(test_registration("memo"))
            .unwrap()
            .build();

        let registration = registry.lookup("memo").unwrap();
        assert_eq!(registration.class(), "memo");
        assert_eq!(registration.guidance, "extract the value");
    }

    #[test]
    fn test_lookup_unknown_class_fails() {
        let registry = ContractRegistry::builder().build();
        let err = registry.lookup("nope").unwrap_err();
        assert_eq!(err, UnknownDocumentClass("nope".to_string()));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let result = ContractRegistry::builder()
            .register(test_registration("memo"))
            .unwrap()
            .register(test_registration("memo"));
        assert!(result.is_err());
    }

    #[test]
    fn test_confidence_policies_follow_sections() {
        let registration = test_registration("memo");
        assert_eq!(registration.confidence.len(), 1);
        assert_eq!(registration.confidence[0].primary_field, "value");
    }

    #[test]
    fn test_default_registry_classes() {
        let registry = default_registry().unwrap();
        assert_eq!(
            registry.classes(),
            vec![classes::gas::CLASS, classes::lng::CLASS]
        );
    }

    #[test]
    fn test_static_registry_is_populated() {
        assert!(!REGISTRY.is_empty());
        assert!(REGISTRY.lookup(classes::gas::CLASS).is_ok());
    }
}
