//! Quotegen - fills Word quotation templates from structured data
//!
//! A price quotation is collected as a set of scalar fields plus an ordered
//! list of line items, then merged into a `.docx` template:
//!
//! - **Placeholder substitution**: every `{{FIELD}}` token in body text and
//!   table cells is replaced with its rendered value, preserving run
//!   formatting (including tokens split across formatting runs)
//! - **Items table**: the template's line-item table is found by its header
//!   labels and rebuilt with one row per item, replacing any example rows
//! - **Passthrough**: styling, boilerplate, headers, footers, and embedded
//!   media are carried through byte-identical
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use quotegen::{LineItem, Quotation, QuotationGenerator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut quotation = Quotation::new(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
//! quotation.quotation_no = "Q-100".to_string();
//! quotation.client_name = "Acme Industries".to_string();
//! quotation.items.push(LineItem {
//!     sequence: 1,
//!     description: "Mosaic panel, 60x60".to_string(),
//!     quantity: 3.0,
//!     unit_price: 10.5,
//!     notes: String::new(),
//! });
//!
//! let generator = QuotationGenerator::new("templates/quotation.docx");
//! let output = generator.generate(&quotation)?;
//! std::fs::write(&output.file_name, &output.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Lower-level access
//!
//! The document layer is public for callers that need to merge arbitrary
//! field sets or inspect the output:
//!
//! ```no_run
//! use quotegen::docx::{Document, DocxPackage};
//! use quotegen::{PlaceholderMap, merge_template};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let template = std::fs::read("templates/quotation.docx")?;
//! let fields = PlaceholderMap::from_entries([("QUOTATION_NO", "Q-100")])?;
//! let output = merge_template(&template, &fields, &[])?;
//!
//! let pkg = DocxPackage::from_bytes(&output.bytes)?;
//! let doc = Document::parse(pkg.document_xml()?)?;
//! println!("{}", doc.text()?);
//! # Ok(())
//! # }
//! ```

pub mod docx;
pub mod error;
pub mod generate;
pub mod merge;
pub mod quotation;

pub use error::{Error, Result};
pub use generate::{GeneratedQuotation, MergeOutput, QuotationGenerator, merge_template};
pub use merge::{
    ItemColumn, LineItem, MergeField, PlaceholderMap, fill_items_table, replace_in_document,
    subtotal,
};
pub use quotation::{Quotation, format_amount};
