//! Confidence scores and the band policy that interprets them.
//!
//! A [`Confidence`] is a number in the closed range [0, 100]. Construction
//! rejects anything outside the range; values are never clamped. The band
//! table maps a score to the qualitative extraction-certainty level used
//! identically for every section, keyed to the primary required field only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A confidence value outside the closed range [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("confidence {0} outside range [0, 100]")]
pub struct ConfidenceRangeError(pub f64);

/// An extraction confidence score in the closed range [0, 100].
///
/// Integer or fractional. A section's confidence must be derivable solely
/// from the section's primary required field; absent optional fields never
/// lower it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Lowest representable score.
    pub const MIN: f64 = 0.0;
    /// Highest representable score.
    pub const MAX: f64 = 100.0;
    /// Upper bound applied when candidate selection is genuinely ambiguous.
    pub const AMBIGUOUS_CAP: f64 = 49.0;

    /// Creates a confidence score, rejecting out-of-range and NaN input.
    pub fn new(value: f64) -> Result<Self, ConfidenceRangeError> {
        if value.is_nan() || !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ConfidenceRangeError(value));
        }
        Ok(Self(value))
    }

    /// The zero score used for domain-negative results.
    #[must_use]
    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// The qualitative band this score falls into.
    #[must_use]
    pub fn band(self) -> ConfidenceBand {
        ConfidenceBand::for_score(self.0)
    }

    /// Applies the tie-break rule: when several candidates could satisfy
    /// the primary field and none is adjacent to the canonical label, the
    /// score is capped at 49 regardless of apparent plausibility.
    #[must_use]
    pub fn cap_ambiguous(self) -> Self {
        Self(self.0.min(Self::AMBIGUOUS_CAP))
    }
}

impl TryFrom<f64> for Confidence {
    type Error = ConfidenceRangeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(confidence: Confidence) -> Self {
        confidence.0
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Qualitative extraction-certainty levels, one per numeric band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    /// 90-100: primary field unambiguous, labeled, domain-confirmed.
    Certain,
    /// 70-89: primary field found, minor formatting/OCR uncertainty.
    MinorUncertainty,
    /// 50-69: primary field present, provenance or label uncertain.
    Inferred,
    /// 30-49: candidate value found, significant ambiguity.
    Ambiguous,
    /// 0-29: primary field not found or domain gate rejected.
    NotFound,
}

impl ConfidenceBand {
    /// Maps a raw score to its band. Assumes the score is in range.
    #[must_use]
    pub fn for_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Certain
        } else if score >= 70.0 {
            Self::MinorUncertainty
        } else if score >= 50.0 {
            Self::Inferred
        } else if score >= 30.0 {
            Self::Ambiguous
        } else {
            Self::NotFound
        }
    }

    /// The inclusive numeric bounds of this band.
    #[must_use]
    pub const fn bounds(self) -> (f64, f64) {
        match self {
            Self::Certain => (90.0, 100.0),
            Self::MinorUncertainty => (70.0, 89.0),
            Self::Inferred => (50.0, 69.0),
            Self::Ambiguous => (30.0, 49.0),
            Self::NotFound => (0.0, 29.0),
        }
    }

    /// One-line description used when rendering extraction guidance.
    #[must_use]
    pub const fn meaning(self) -> &'static str {
        match self {
            Self::Certain => "value clearly visible, labeled, and domain-confirmed",
            Self::MinorUncertainty => "value found with minor formatting or OCR uncertainty",
            Self::Inferred => "value likely correct but label unclear or inferred from context",
            Self::Ambiguous => "candidate found with significant ambiguity about correctness",
            Self::NotFound => "value not found or document not in the target domain",
        }
    }

    /// All bands, highest first.
    pub const ALL: [Self; 5] = [
        Self::Certain,
        Self::MinorUncertainty,
        Self::Inferred,
        Self::Ambiguous,
        Self::NotFound,
    ];
}

/// Per-section confidence rule: which field the score is keyed to, and how
/// the band table should be narrated to the extraction collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidencePolicy {
    /// Primary field the section score is keyed to.
    pub primary_field: String,
}

impl ConfidencePolicy {
    /// Creates a policy keyed to the given primary field.
    #[must_use]
    pub fn keyed_to(primary_field: impl Into<String>) -> Self {
        Self {
            primary_field: primary_field.into(),
        }
    }

    /// Renders the band table as guidance text for the collaborator.
    ///
    /// The text instructs scoring based ONLY on the primary field, so
    /// missing optional fields never drag a section's score down.
    #[must_use]
    pub fn banding_guidance(&self) -> String {
        let mut lines = vec![format!(
            "Score confidence from 0-100 based ONLY on the '{}' extraction quality:",
            self.primary_field
        )];
        for band in ConfidenceBand::ALL {
            let (lo, hi) = band.bounds();
            lines.push(format!("- {lo}-{hi}: {}", band.meaning()));
        }
        lines.push(
            "If several candidate values could match, prefer the one adjacent to the \
             canonical label; if genuinely ambiguous, cap the score at 49."
                .to_string(),
        );
        lines.push("Do NOT let missing optional fields lower the score.".to_string());
        lines.join("\n")
    }
}
