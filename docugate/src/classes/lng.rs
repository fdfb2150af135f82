//! LNG throughput document class: regasification sendout summary.
//!
//! Covers LNG import and cost-calculation summary reports. A single
//! section is extracted: the total Regas. Sendout quantity in MMBtu, read
//! from the summary row at the bottom of the transaction table.

use serde::Serialize;

use crate::confidence::{Confidence, ConfidencePolicy};
use crate::contract::{DocumentContract, DocumentResult};
use crate::errors::DocugateError;
use crate::gate::DomainGatePolicy;
use crate::registry::ContractRegistration;
use crate::schema::{FieldConstraint, SectionSchema};

/// Document-class identifier.
pub const CLASS: &str = "lng_regas_sendout";

/// Payload key of the singular sendout section.
pub const SENDOUT_KEY: &str = "regasSendoutData";

fn sendout_schema() -> SectionSchema {
    SectionSchema::new(
        "regas_sendout",
        FieldConstraint::number("totalRegasSendout")
            .describe("Total Regas. Sendout quantity (ปริมาณ Regas. Sendout รวม) in MMBtu"),
    )
}

/// The composed output contract for this class.
#[must_use]
pub fn contract() -> DocumentContract {
    DocumentContract::new(CLASS).singular(SENDOUT_KEY, sendout_schema())
}

/// The domain gate: documents must carry LNG regasification signals.
pub fn gate() -> Result<DomainGatePolicy, regex::Error> {
    DomainGatePolicy::new(
        "LNG regasification",
        &["Regas. Sendout", "Regasification", "LNG"],
    )
}

fn guidance() -> String {
    let bands = ConfidencePolicy::keyed_to("totalRegasSendout").banding_guidance();
    format!(
        "You are extracting a single field from an LNG import and cost-calculation \
summary report.

FIRST verify the document is an LNG regasification report; if it is not, return null \
for {SENDOUT_KEY} and an overall confidence of 0.

totalRegasSendout: locate the large transaction table. The required value is in the \
final summary section at the bottom, in the quantity column next to the text \
\"ปริมาณ Regas. Sendout\". Extract the numeric value in MMBtu, removing thousand \
separators and units. Preserve every decimal place.
{bands}

Output only the fields of the schema; ignore all other tables, rates and totals."
    )
}

/// Builds the full registration for this class.
pub fn registration() -> Result<ContractRegistration, DocugateError> {
    Ok(ContractRegistration::new(contract(), gate()?, guidance()))
}

/// Typed view of the sendout section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegasSendoutRecord {
    /// Total Regas. Sendout quantity in MMBtu.
    pub total_regas_sendout: f64,
    /// Section confidence, keyed to the sendout quantity.
    pub confidence: Confidence,
}

/// Typed view of a validated LNG document result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LngDocument {
    /// Sendout section, `None` when validly absent.
    pub regas_sendout: Option<RegasSendoutRecord>,
    /// Document-wide confidence score.
    pub overall_confidence: Confidence,
}

impl LngDocument {
    /// Builds the typed view from a validated result of this class.
    pub fn from_result(result: &DocumentResult) -> Result<Self, DocugateError> {
        if result.class() != CLASS {
            return Err(DocugateError::Internal(format!(
                "expected a '{CLASS}' result, got '{}'",
                result.class()
            )));
        }

        let regas_sendout = result
            .singular(SENDOUT_KEY)
            .map(|record| {
                record
                    .number("totalRegasSendout")
                    .map(|total_regas_sendout| RegasSendoutRecord {
                        total_regas_sendout,
                        confidence: record.confidence(),
                    })
                    .ok_or_else(|| {
                        DocugateError::Internal(
                            "validated sendout section lost its primary field".to_string(),
                        )
                    })
            })
            .transpose()?;

        Ok(Self {
            regas_sendout,
            overall_confidence: result.overall_confidence(),
        })
    }
}
