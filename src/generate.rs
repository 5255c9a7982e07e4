//! Document assembly: template in, finished quotation out.
//!
//! Stateless by design. Every call loads a fresh copy of the template, so
//! concurrent generations cannot interfere as long as the template file is
//! not rewritten while the process runs.

use crate::docx::{Document, DocxPackage};
use crate::error::{Error, Result};
use crate::merge::fields::PlaceholderMap;
use crate::merge::items::{LineItem, fill_items_table};
use crate::merge::placeholder::replace_in_document;
use crate::quotation::Quotation;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Result of a template merge.
#[derive(Debug, Clone)]
pub struct MergeOutput {
    /// The finished `.docx` file
    pub bytes: Vec<u8>,
    /// Whether an items table was found and rebuilt; callers may warn the
    /// user when the template has none
    pub items_table_filled: bool,
}

/// Merge placeholder values and line items into a template.
///
/// Runs placeholder substitution over the whole document, rebuilds the items
/// table, and reserializes the package. The template bytes are never
/// modified; a failed call returns no partial output.
pub fn merge_template(
    template: &[u8],
    fields: &PlaceholderMap,
    items: &[LineItem],
) -> Result<MergeOutput> {
    let mut pkg = DocxPackage::from_bytes(template)?;
    let mut doc = Document::parse(pkg.document_xml()?)?;

    replace_in_document(&mut doc, fields)?;
    let items_table_filled = fill_items_table(&mut doc, items)?;

    pkg.set_document_xml(doc.to_bytes()?);
    let bytes = pkg.to_bytes()?;
    debug!(
        parts = pkg.part_count(),
        items = items.len(),
        items_table_filled,
        "template merge complete"
    );
    Ok(MergeOutput {
        bytes,
        items_table_filled,
    })
}

/// A finished quotation document ready for download.
#[derive(Debug, Clone)]
pub struct GeneratedQuotation {
    /// Suggested download name, derived from the quotation number
    pub file_name: String,
    /// The finished `.docx` file
    pub bytes: Vec<u8>,
    /// Whether the template contained an items table
    pub items_table_filled: bool,
}

/// Generates quotation documents from a template file.
///
/// Holds nothing but the template path; each [`Self::generate`] call reads
/// the template afresh and retains no state.
///
/// # Examples
///
/// ```rust,no_run
/// use chrono::NaiveDate;
/// use quotegen::{Quotation, QuotationGenerator};
///
/// let generator = QuotationGenerator::new("templates/quotation.docx");
/// let mut quotation = Quotation::new(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
/// quotation.quotation_no = "Q-100".to_string();
///
/// let output = generator.generate(&quotation)?;
/// std::fs::write(&output.file_name, &output.bytes)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct QuotationGenerator {
    /// Path of the template `.docx`
    template_path: PathBuf,
}

impl QuotationGenerator {
    /// Create a generator for the given template path.
    pub fn new<P: Into<PathBuf>>(template_path: P) -> Self {
        Self {
            template_path: template_path.into(),
        }
    }

    /// The configured template path.
    #[inline]
    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Generate the quotation document.
    ///
    /// A missing or unreadable template fails the whole call; placeholder
    /// and table merging never fail on content (see the merge modules).
    pub fn generate(&self, quotation: &Quotation) -> Result<GeneratedQuotation> {
        if !self.template_path.exists() {
            return Err(Error::TemplateNotFound(
                self.template_path.display().to_string(),
            ));
        }
        let template = std::fs::read(&self.template_path)?;
        let output = merge_template(&template, &quotation.placeholder_map(), &quotation.items)?;
        Ok(GeneratedQuotation {
            file_name: quotation.download_file_name(),
            bytes: output.bytes,
            items_table_filled: output.items_table_filled,
        })
    }
}
