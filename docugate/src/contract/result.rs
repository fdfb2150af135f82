//! The validated output of one extraction attempt.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::confidence::Confidence;
use crate::schema::SectionRecord;

/// A validated Document Result.
///
/// Constructed once per extraction attempt from a single document,
/// immutable afterwards, never merged with another result. Singular
/// sections are `None` when the document validly omitted them; repeated
/// sections preserve upstream order and are never deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentResult {
    class: String,
    singular: BTreeMap<String, Option<SectionRecord>>,
    repeated: BTreeMap<String, Vec<SectionRecord>>,
    overall_confidence: Confidence,
}

impl DocumentResult {
    pub(crate) fn new(
        class: String,
        singular: BTreeMap<String, Option<SectionRecord>>,
        repeated: BTreeMap<String, Vec<SectionRecord>>,
        overall_confidence: Confidence,
    ) -> Self {
        Self {
            class,
            singular,
            repeated,
            overall_confidence,
        }
    }

    /// The document class this result was validated against.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// A singular section's record, `None` if absent or unknown.
    #[must_use]
    pub fn singular(&self, key: &str) -> Option<&SectionRecord> {
        self.singular.get(key).and_then(Option::as_ref)
    }

    /// A repeated section's records in upstream order, empty if unknown.
    #[must_use]
    pub fn repeated(&self, key: &str) -> &[SectionRecord] {
        self.repeated.get(key).map_or(&[], Vec::as_slice)
    }

    /// The independently supplied document-wide confidence score.
    #[must_use]
    pub fn overall_confidence(&self) -> Confidence {
        self.overall_confidence
    }

    /// True when this is the domain-negative terminal result: every
    /// singular section absent, every repeated section empty, overall
    /// confidence zero.
    #[must_use]
    pub fn is_domain_negative(&self) -> bool {
        self.singular.values().all(Option::is_none)
            && self.repeated.values().all(Vec::is_empty)
            && self.overall_confidence.value() == 0.0
    }
}
