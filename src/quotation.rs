//! Quotation data model and its derived values.
//!
//! The collecting UI owns input validation and the editable item grid; this
//! model owns everything derivable from the collected fields: the expiry
//! date, the composed delivery/validity sentences, the aggregate total, and
//! the placeholder map handed to the merger.

use crate::merge::fields::{MergeField, PlaceholderMap};
use crate::merge::items::{LineItem, subtotal};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date rendering used throughout the printed quotation.
const DATE_FORMAT: &str = "%Y/%m/%d";

/// A price quotation as collected from the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    /// Purchase order number
    #[serde(default)]
    pub po_no: String,
    /// Quotation number; also used for the download file name
    #[serde(default)]
    pub quotation_no: String,
    /// Client company name
    #[serde(default)]
    pub client_name: String,
    /// Attention engineer
    #[serde(default)]
    pub attn_engineer: String,
    /// Issue date
    pub quotation_date: NaiveDate,
    /// Delivery period in days
    pub delivery_days: u32,
    /// Price-validity period in days
    pub validity_days: u32,
    /// Free-form notes printed in the notes box
    #[serde(default)]
    pub notes: String,
    /// Bill of items, in print order
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl Quotation {
    /// Create an empty quotation issued on the given date, with the
    /// standard delivery (30 days) and validity (20 days) periods.
    pub fn new(quotation_date: NaiveDate) -> Self {
        Self {
            po_no: String::new(),
            quotation_no: String::new(),
            client_name: String::new(),
            attn_engineer: String::new(),
            quotation_date,
            delivery_days: 30,
            validity_days: 20,
            notes: String::new(),
            items: Vec::new(),
        }
    }

    /// The date the quoted prices stop being binding.
    pub fn expiry_date(&self) -> NaiveDate {
        self.quotation_date
            .checked_add_days(Days::new(u64::from(self.validity_days)))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Aggregate of all line totals.
    pub fn subtotal(&self) -> f64 {
        subtotal(&self.items)
    }

    /// The delivery-terms sentence as printed in the document.
    pub fn delivery_text(&self) -> String {
        format!(
            "مدة التوريد {} يوم من تاريخ استلام العينات من الشركة",
            self.delivery_days
        )
    }

    /// The price-validity sentence as printed in the document.
    pub fn validity_text(&self) -> String {
        format!(
            "مدة الارتباط بالاسعار {} يوم حتى تاريخ {}",
            self.validity_days,
            self.expiry_date().format(DATE_FORMAT)
        )
    }

    /// Rendered values for every placeholder field.
    pub fn placeholder_map(&self) -> PlaceholderMap {
        let mut map = PlaceholderMap::new();
        map.set(MergeField::PoNo, self.po_no.clone())
            .set(MergeField::QuotationNo, self.quotation_no.clone())
            .set(MergeField::ClientName, self.client_name.clone())
            .set(MergeField::AttnEngineer, self.attn_engineer.clone())
            .set(
                MergeField::QuotationDate,
                self.quotation_date.format(DATE_FORMAT).to_string(),
            )
            .set(
                MergeField::ExpiryDate,
                self.expiry_date().format(DATE_FORMAT).to_string(),
            )
            .set(MergeField::DeliveryText, self.delivery_text())
            .set(MergeField::ValidityText, self.validity_text())
            .set(MergeField::Subtotal, format_amount(self.subtotal()))
            .set(MergeField::NotesBox, self.notes.clone());
        map
    }

    /// Download file name: `Quotation_<no>.docx`, `NA` when unnumbered.
    pub fn download_file_name(&self) -> String {
        let number = if self.quotation_no.is_empty() {
            "NA"
        } else {
            self.quotation_no.as_str()
        };
        format!("Quotation_{number}.docx")
    }
}

/// Render a monetary amount with two decimals and thousands separators.
///
/// `41.5` becomes `41.50`, `1234567.891` becomes `1,234,567.89`.
pub fn format_amount(value: f64) -> String {
    let rendered = format!("{:.2}", value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some(parts) => parts,
        None => (rendered.as_str(), "00"),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value.is_sign_negative() && rendered != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac_part}")
}
