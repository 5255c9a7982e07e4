//! The placeholder field set and its rendered-value map.
//!
//! Placeholders in the template have the literal form `{{KEY}}`. The key set
//! is closed: every key the merger recognizes is a [`MergeField`] variant, so
//! a typo in calling code fails at compile time rather than leaving a stray
//! token in a customer-facing document. Open string maps coming from outside
//! (e.g. a deserialized request) are validated at the boundary with
//! [`PlaceholderMap::from_entries`].

use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// A placeholder field recognized by the quotation template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MergeField {
    /// Purchase order number
    PoNo,
    /// Quotation number
    QuotationNo,
    /// Client company name
    ClientName,
    /// Attention engineer
    AttnEngineer,
    /// Quotation issue date
    QuotationDate,
    /// Computed price-validity expiry date
    ExpiryDate,
    /// Composed delivery-terms sentence
    DeliveryText,
    /// Composed price-validity sentence
    ValidityText,
    /// Formatted aggregate of line totals
    Subtotal,
    /// Free-form notes block
    NotesBox,
}

impl MergeField {
    /// Every recognized field.
    pub const ALL: [MergeField; 10] = [
        MergeField::PoNo,
        MergeField::QuotationNo,
        MergeField::ClientName,
        MergeField::AttnEngineer,
        MergeField::QuotationDate,
        MergeField::ExpiryDate,
        MergeField::DeliveryText,
        MergeField::ValidityText,
        MergeField::Subtotal,
        MergeField::NotesBox,
    ];

    /// The key as it appears between the braces in the template.
    pub const fn key(self) -> &'static str {
        match self {
            MergeField::PoNo => "PO_NO",
            MergeField::QuotationNo => "QUOTATION_NO",
            MergeField::ClientName => "CLIENT_NAME",
            MergeField::AttnEngineer => "ATTN_ENGINEER",
            MergeField::QuotationDate => "QUOTATION_DATE",
            MergeField::ExpiryDate => "EXPIRY_DATE",
            MergeField::DeliveryText => "DELIVERY_TEXT",
            MergeField::ValidityText => "VALIDITY_TEXT",
            MergeField::Subtotal => "SUBTOTAL",
            MergeField::NotesBox => "NOTES_BOX",
        }
    }

    /// Look up a field by its template key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// The full token form, e.g. `{{QUOTATION_NO}}`.
    pub fn token(self) -> String {
        format!("{{{{{}}}}}", self.key())
    }
}

/// Rendered string values for the placeholder fields of one merge.
///
/// Built fresh per generation request and discarded afterwards; fields that
/// are never set simply leave their tokens untouched in the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceholderMap {
    values: BTreeMap<MergeField, String>,
}

impl PlaceholderMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field's rendered value.
    pub fn set(&mut self, field: MergeField, value: impl Into<String>) -> &mut Self {
        self.values.insert(field, value.into());
        self
    }

    /// Get a field's rendered value.
    pub fn get(&self, field: MergeField) -> Option<&str> {
        self.values.get(&field).map(|s| s.as_str())
    }

    /// Number of populated fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no field is populated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over populated fields.
    pub fn iter(&self) -> impl Iterator<Item = (MergeField, &str)> {
        self.values.iter().map(|(field, value)| (*field, value.as_str()))
    }

    /// Build a map from `(key, value)` string pairs, validating every key
    /// against the recognized field set.
    pub fn from_entries<K, V, I>(entries: I) -> Result<Self>
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::new();
        for (key, value) in entries {
            let field = MergeField::from_key(key.as_ref())
                .ok_or_else(|| Error::UnknownField(key.as_ref().to_string()))?;
            map.set(field, value);
        }
        Ok(map)
    }

    /// Precomputed `({{KEY}}, value)` pairs for the substitution passes.
    pub(crate) fn tokens(&self) -> Vec<(String, &str)> {
        self.values
            .iter()
            .map(|(field, value)| (field.token(), value.as_str()))
            .collect()
    }
}
