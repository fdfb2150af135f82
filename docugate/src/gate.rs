//! Domain Gate Policy: binary admissibility check run before extraction.
//!
//! A document must affirmatively match the target domain before any field
//! extraction is attempted. The gate is a two-transition state machine,
//! `Unverified -> {Matched, Rejected}`, both terminal. Rejection is the
//! default: it takes at least one positive signal in the document text to
//! reach `Matched`, and finding only signals of a rival, non-overlapping
//! domain also rejects. Evaluating the gate first avoids spurious partial
//! matches on unrelated documents with coincidentally similar numbers.

use regex::RegexSet;
use serde::{Deserialize, Serialize};

/// Outcome of the gate state machine. `Unverified` only exists before
/// evaluation; `evaluate` always returns a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// No evaluation has happened yet.
    Unverified,
    /// A positive domain signal was found; extraction may proceed.
    Matched,
    /// No positive signal, or only rival-domain signals. Terminal: the
    /// document resolves to the domain-negative result.
    Rejected,
}

impl GateState {
    /// True when extraction may proceed.
    #[must_use]
    pub const fn is_matched(self) -> bool {
        matches!(self, Self::Matched)
    }
}

/// Keyword-driven domain gate for one document class.
///
/// Signals are matched case-insensitively as literal substrings of the
/// document text, so Thai labels and slash-containing field designations
/// ("G4/48") work as-is.
#[derive(Debug, Clone)]
pub struct DomainGatePolicy {
    domain: String,
    signal_keywords: Vec<String>,
    rival_keywords: Vec<String>,
    signals: RegexSet,
    rivals: Option<RegexSet>,
}

impl DomainGatePolicy {
    /// Creates a gate requiring at least one of the given keywords.
    pub fn new<S: AsRef<str>>(
        domain: impl Into<String>,
        keywords: &[S],
    ) -> Result<Self, regex::Error> {
        let signal_keywords: Vec<String> =
            keywords.iter().map(|k| k.as_ref().to_string()).collect();
        let signals = keyword_set(&signal_keywords)?;
        Ok(Self {
            domain: domain.into(),
            signal_keywords,
            rival_keywords: Vec::new(),
            signals,
            rivals: None,
        })
    }

    /// Adds rival-domain keywords whose presence (without any positive
    /// signal) confirms rejection of an otherwise silent document.
    pub fn with_rival_keywords<S: AsRef<str>>(
        mut self,
        keywords: &[S],
    ) -> Result<Self, regex::Error> {
        self.rival_keywords = keywords.iter().map(|k| k.as_ref().to_string()).collect();
        self.rivals = Some(keyword_set(&self.rival_keywords)?);
        Ok(self)
    }

    /// The target domain label, used in guidance and logs.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Positive signal keywords, as registered.
    #[must_use]
    pub fn signal_keywords(&self) -> &[String] {
        &self.signal_keywords
    }

    /// Evaluates the gate over the source document text.
    ///
    /// Runs before field extraction; the returned state is terminal.
    #[must_use]
    pub fn evaluate(&self, document_text: &str) -> GateState {
        if self.signals.is_match(document_text) {
            tracing::debug!(domain = %self.domain, "domain gate matched");
            return GateState::Matched;
        }
        if let Some(rivals) = &self.rivals {
            if rivals.is_match(document_text) {
                tracing::debug!(domain = %self.domain, "rival-domain signal found, gate rejected");
                return GateState::Rejected;
            }
        }
        tracing::debug!(domain = %self.domain, "no domain signal found, gate rejected");
        GateState::Rejected
    }
}

fn keyword_set(keywords: &[String]) -> Result<RegexSet, regex::Error> {
    RegexSet::new(
        keywords
            .iter()
            .map(|k| format!("(?i){}", regex::escape(k))),
    )
}
