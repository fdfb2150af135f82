//! Extraction collaborator boundary.
//!
//! The document-to-data extraction mechanism (OCR/AI inference) lives
//! outside this crate; [`DocumentExtractor`] is the port it implements.
//! [`extract_and_validate`] is the canonical flow: evaluate the domain
//! gate over the document text first, forward the registered guidance to
//! the collaborator only on a match, then validate whatever comes back
//! against the contract.

use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::DocumentResult;
use crate::errors::DocugateError;
use crate::registry::ContractRegistration;

/// Port implemented by the external extraction collaborator.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Turns raw document bytes into a candidate structured payload.
    ///
    /// Returns `Ok(None)` when the extraction was aborted or cancelled by
    /// the caller; that is not an error, just nothing to validate.
    async fn extract(
        &self,
        document: &[u8],
        guidance: &str,
    ) -> anyhow::Result<Option<serde_json::Value>>;
}

/// Terminal outcome of one gate-then-extract-then-validate attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// The domain gate rejected the document before extraction; the
    /// result is the contract's domain-negative value.
    DomainNegative(DocumentResult),
    /// The collaborator was cancelled or produced nothing to validate.
    NoResult,
    /// The payload validated successfully.
    Validated(DocumentResult),
}

impl ExtractionOutcome {
    /// The validated or domain-negative result, if one exists.
    #[must_use]
    pub fn result(&self) -> Option<&DocumentResult> {
        match self {
            Self::DomainNegative(result) | Self::Validated(result) => Some(result),
            Self::NoResult => None,
        }
    }
}

/// Runs one extraction attempt end to end.
///
/// The gate is evaluated over `document_text` before the collaborator is
/// invoked at all; a rejected document never reaches extraction. A
/// collaborator error is surfaced as [`DocugateError::Extraction`]; a
/// validation failure enumerates every violation.
pub async fn extract_and_validate<E>(
    registration: &ContractRegistration,
    document_text: &str,
    document: &[u8],
    extractor: &E,
) -> Result<ExtractionOutcome, DocugateError>
where
    E: DocumentExtractor + ?Sized,
{
    let attempt = Uuid::new_v4();
    let class = registration.class();

    if !registration.gate.evaluate(document_text).is_matched() {
        tracing::info!(%attempt, class, "domain gate rejected document");
        return Ok(ExtractionOutcome::DomainNegative(
            registration.contract.domain_negative(),
        ));
    }

    let payload = extractor
        .extract(document, &registration.guidance)
        .await
        .map_err(|e| DocugateError::Extraction(e.to_string()))?;

    let Some(payload) = payload else {
        tracing::info!(%attempt, class, "extraction returned no result");
        return Ok(ExtractionOutcome::NoResult);
    };

    let result = registration.contract.validate(&payload)?;
    tracing::info!(
        %attempt,
        class,
        overall = result.overall_confidence().value(),
        "extraction validated"
    );
    Ok(ExtractionOutcome::Validated(result))
}
