//! Gas-purchase document class: invoice register plus heat-quantity memo.
//!
//! Covers multilingual (Thai/English) documents about the C5 and G4/48
//! gas fields: SAP invoice registers, vendor statements and internal
//! measurement memos. Two sections are extracted: a singular heat-quantity
//! record (MMBTU) and a repeated invoice entry record keyed to the total
//! amount excluding tax.

use serde::Serialize;

use crate::confidence::{Confidence, ConfidencePolicy};
use crate::contract::{DocumentContract, DocumentResult};
use crate::errors::DocugateError;
use crate::gate::DomainGatePolicy;
use crate::registry::ContractRegistration;
use crate::schema::{FieldConstraint, SectionSchema};

/// Document-class identifier.
pub const CLASS: &str = "gas_invoice_and_heat";

/// Payload key of the singular heat-quantity section.
pub const HEAT_KEY: &str = "heatQuantityData";

/// Payload key of the repeated invoice section.
pub const INVOICE_KEY: &str = "invoiceData";

fn heat_schema() -> SectionSchema {
    SectionSchema::new(
        "heat_quantity",
        FieldConstraint::number("heatQuantity_MMBTU")
            .describe("Heat/energy quantity (ปริมาณความร้อน) in MMBTU"),
    )
}

fn invoice_schema() -> SectionSchema {
    SectionSchema::new(
        "invoice",
        FieldConstraint::number("totalAmount_ExclVAT")
            .describe("Total amount excluding VAT (จำนวนเงินรวม) - the primary field"),
    )
    .field(
        FieldConstraint::text("vendor")
            .optional()
            .describe("Vendor or supplier company name in original language"),
    )
    .field(
        FieldConstraint::number("vatAmount")
            .optional()
            .describe("VAT amount (ภาษีซื้อ) in stated currency"),
    )
    .field(
        FieldConstraint::number("netAmount_InclVAT")
            .optional()
            .describe("Net amount including VAT (จำนวนเงินจ่ายสุทธิ)"),
    )
    .field(
        FieldConstraint::text("currency")
            .optional()
            .describe("Currency code (THB, USD, ...)"),
    )
    .field(
        FieldConstraint::text("description")
            .optional()
            .describe("Invoice or line item description (e.g. ค่าก๊าซฯแหล่ง C5)"),
    )
}

/// The composed output contract for this class.
#[must_use]
pub fn contract() -> DocumentContract {
    DocumentContract::new(CLASS)
        .singular(HEAT_KEY, heat_schema())
        .repeated(INVOICE_KEY, invoice_schema())
}

/// The domain gate: documents must mention the C5 or G4/48 fields.
pub fn gate() -> Result<DomainGatePolicy, regex::Error> {
    DomainGatePolicy::new(
        "C5 and G4/48 gas fields",
        &["C5", "G4/48", "G4-48", "แหล่ง C5", "Field C5"],
    )
}

fn guidance() -> String {
    let heat_bands = ConfidencePolicy::keyed_to("heatQuantity_MMBTU").banding_guidance();
    let invoice_bands = ConfidencePolicy::keyed_to("totalAmount_ExclVAT").banding_guidance();
    format!(
        "You are extracting data from PTT natural gas purchase documents. Documents may \
be in Thai, English, or mixed languages, in varied formats (invoice registers, internal \
memos, vendor statements).

FIRST verify the document concerns the C5 and/or G4/48 gas fields. Look for \"C5\", \
\"G4/48\", \"G4-48\", \"แหล่ง C5\" or \"Field C5\". If the document is about other \
fields or unrelated entirely, return null for {HEAT_KEY}, an empty array for \
{INVOICE_KEY}, and an overall confidence of 0. Do not extract anything else.

SECTION 1 - heat quantity (ปริมาณความร้อน): find the section titled \
\"ปริมาณความร้อน\" or \"Heat Quantity\", typically in memos from the gas quantity \
measurement section. Extract ONLY the heat quantity value in MMBTU. Ignore gas volume \
in MMSCF.
{heat_bands}

SECTION 2 - invoice entries (จำนวนเงินรวม): one entry per vendor or invoice line. The \
primary field is totalAmount_ExclVAT (จำนวนเงินรวม), the subtotal BEFORE VAT. If it is \
not explicitly labeled, look for \"subtotal\", \"amount before VAT\" or \"amount \
excluding tax\". When several amounts appear on one page, prefer the one adjacent to \
the จำนวนเงินรวม label, not a restated total elsewhere. Optional per entry: vendor, \
vatAmount (ภาษีซื้อ), netAmount_InclVAT (จำนวนเงินจ่ายสุทธิ), currency, description. \
Preserve the original language of vendor names and descriptions, and be precise with \
decimal places.
{invoice_bands}

IGNORE: daily delivery tables, fuel gas deduction detail, payment terms, bank details, \
approval stamps, dates, document and invoice numbers, GL account postings.

The overall confidence score reflects extraction quality and completeness across the \
entire document; it is reported separately from the per-section scores."
    )
}

/// Builds the full registration for this class.
pub fn registration() -> Result<ContractRegistration, DocugateError> {
    Ok(ContractRegistration::new(contract(), gate()?, guidance()))
}

/// Typed view of the heat-quantity section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatQuantityRecord {
    /// Heat/energy quantity in MMBTU.
    pub heat_quantity_mmbtu: f64,
    /// Section confidence, keyed to the heat quantity field.
    pub confidence: Confidence,
}

/// Typed view of one invoice entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceEntryRecord {
    /// Total amount excluding tax, the primary field.
    pub total_amount_excl_tax: f64,
    /// Vendor or supplier name, original language.
    pub vendor: Option<String>,
    /// Tax amount.
    pub tax_amount: Option<f64>,
    /// Net amount including tax.
    pub net_amount_incl_tax: Option<f64>,
    /// Currency code.
    pub currency: Option<String>,
    /// Invoice or line item description.
    pub description: Option<String>,
    /// Section confidence, keyed to the total amount only.
    pub confidence: Confidence,
}

/// Typed view of a validated gas-purchase document result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GasDocument {
    /// Heat-quantity section, `None` when validly absent.
    pub heat_quantity: Option<HeatQuantityRecord>,
    /// Invoice entries in upstream order; empty is valid.
    pub invoice_entries: Vec<InvoiceEntryRecord>,
    /// Document-wide confidence score.
    pub overall_confidence: Confidence,
}

impl GasDocument {
    /// Builds the typed view from a validated result of this class.
    pub fn from_result(result: &DocumentResult) -> Result<Self, DocugateError> {
        if result.class() != CLASS {
            return Err(DocugateError::Internal(format!(
                "expected a '{CLASS}' result, got '{}'",
                result.class()
            )));
        }

        let heat_quantity = result
            .singular(HEAT_KEY)
            .map(|record| {
                record
                    .number("heatQuantity_MMBTU")
                    .map(|heat_quantity_mmbtu| HeatQuantityRecord {
                        heat_quantity_mmbtu,
                        confidence: record.confidence(),
                    })
                    .ok_or_else(|| {
                        DocugateError::Internal(
                            "validated heat section lost its primary field".to_string(),
                        )
                    })
            })
            .transpose()?;

        let invoice_entries = result
            .repeated(INVOICE_KEY)
            .iter()
            .map(|record| {
                record
                    .number("totalAmount_ExclVAT")
                    .map(|total_amount_excl_tax| InvoiceEntryRecord {
                        total_amount_excl_tax,
                        vendor: record.text("vendor").map(String::from),
                        tax_amount: record.number("vatAmount"),
                        net_amount_incl_tax: record.number("netAmount_InclVAT"),
                        currency: record.text("currency").map(String::from),
                        description: record.text("description").map(String::from),
                        confidence: record.confidence(),
                    })
                    .ok_or_else(|| {
                        DocugateError::Internal(
                            "validated invoice entry lost its primary field".to_string(),
                        )
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            heat_quantity,
            invoice_entries,
            overall_confidence: result.overall_confidence(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_typed_view_full_document() {
        let payload = serde_json::json!({
            "heatQuantityData": {
                "heatQuantity_MMBTU": 12345.6,
                "confidenceScore": 95
            },
            "invoiceData": [
                {
                    "totalAmount_ExclVAT": 1_000_000.50,
                    "vendor": "Chevron Thailand",
                    "vatAmount": 70_000.04,
                    "currency": "THB",
                    "confidenceScore": 88
                },
                {
                    "totalAmount_ExclVAT": 500_000.0,
                    "confidenceScore": 72
                }
            ],
            "overallConfidenceScore": 85
        });

        let result = contract().validate(&payload).unwrap();
        let doc = GasDocument::from_result(&result).unwrap();

        let heat = doc.heat_quantity.unwrap();
        assert_eq!(heat.heat_quantity_mmbtu, 12345.6);
        assert_eq!(heat.confidence.value(), 95.0);

        assert_eq!(doc.invoice_entries.len(), 2);
        assert_eq!(doc.invoice_entries[0].vendor.as_deref(), Some("Chevron Thailand"));
        assert_eq!(doc.invoice_entries[0].tax_amount, Some(70_000.04));
        assert_eq!(doc.invoice_entries[1].vendor, None);
        assert_eq!(doc.invoice_entries[1].net_amount_incl_tax, None);
        assert_eq!(doc.overall_confidence.value(), 85.0);
    }

    #[test]
    fn test_typed_view_domain_negative() {
        let result = contract().domain_negative();
        let doc = GasDocument::from_result(&result).unwrap();
        assert_eq!(doc.heat_quantity, None);
        assert!(doc.invoice_entries.is_empty());
        assert_eq!(doc.overall_confidence.value(), 0.0);
    }

    #[test]
    fn test_typed_view_rejects_wrong_class() {
        let other = DocumentContract::new("something_else").domain_negative();
        assert!(GasDocument::from_result(&other).is_err());
    }

    #[test]
    fn test_guidance_names_domain_and_bands() {
        let text = guidance();
        assert!(text.contains("G4/48"));
        assert!(text.contains("จำนวนเงินรวม"));
        assert!(text.contains("totalAmount_ExclVAT"));
        assert!(text.contains("90-100"));
    }

    #[test]
    fn test_registration_builds() {
        let registration = registration().unwrap();
        assert_eq!(registration.class(), CLASS);
        assert_eq!(registration.confidence.len(), 2);
        assert_eq!(registration.confidence[0].primary_field, "heatQuantity_MMBTU");
        assert_eq!(registration.confidence[1].primary_field, "totalAmount_ExclVAT");
    }
}
