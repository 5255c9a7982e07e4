//! Line items and the items-table locate/fill pass.
//!
//! The quotation template carries one table meant to hold the bill of items.
//! It is found by content, not position: the first body-level table whose
//! header row mentions one of the recognized column labels. Columns bind to
//! item fields the same way, by header substring, so template authors can
//! reorder or drop columns freely.

use crate::docx::Document;
use crate::docx::table;
use crate::docx::xml::{XmlElement, XmlNode};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One line of the quotation's bill of items.
///
/// Values are rendered as-is; validating quantities and prices is the
/// collecting UI's job, not the merger's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Position number as printed in the first column
    pub sequence: u32,
    /// Item description
    pub description: String,
    /// Quantity
    pub quantity: f64,
    /// Price per unit
    pub unit_price: f64,
    /// Free-form remarks
    #[serde(default)]
    pub notes: String,
}

impl LineItem {
    /// The item's total: `quantity × unit_price`.
    #[inline]
    pub fn line_total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// Sum of all line totals.
pub fn subtotal(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::line_total).sum()
}

/// A logical column of the items table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemColumn {
    Sequence,
    Description,
    Quantity,
    UnitPrice,
    LineTotal,
    Notes,
}

impl ItemColumn {
    /// Every logical column, in binding order.
    pub const ALL: [ItemColumn; 6] = [
        ItemColumn::Sequence,
        ItemColumn::Description,
        ItemColumn::Quantity,
        ItemColumn::UnitPrice,
        ItemColumn::LineTotal,
        ItemColumn::Notes,
    ];

    /// The header substring that marks this column in the template.
    pub const fn header_label(self) -> &'static str {
        match self {
            ItemColumn::Sequence => "م",
            ItemColumn::Description => "التوصيف",
            ItemColumn::Quantity => "الكمية",
            ItemColumn::UnitPrice => "سعر الوحدة",
            ItemColumn::LineTotal => "سعر البند",
            ItemColumn::Notes => "ملاحظات",
        }
    }

    /// Render the item field this column shows.
    fn render(self, item: &LineItem) -> String {
        match self {
            ItemColumn::Sequence => item.sequence.to_string(),
            ItemColumn::Description => item.description.clone(),
            ItemColumn::Quantity => format_number(item.quantity),
            ItemColumn::UnitPrice => format_number(item.unit_price),
            ItemColumn::LineTotal => format_number(item.line_total()),
            ItemColumn::Notes => item.notes.clone(),
        }
    }
}

/// Labels whose presence in a header row marks the items table.
///
/// The sequence and notes labels are too generic to identify the table on
/// their own, so only the four substantive columns count.
const TABLE_MARKERS: [ItemColumn; 4] = [
    ItemColumn::Description,
    ItemColumn::Quantity,
    ItemColumn::UnitPrice,
    ItemColumn::LineTotal,
];

/// Header-resolved column positions, computed once per merge.
///
/// For each logical column, the index of the first header cell containing
/// its label, or `None` when the template has no such column.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnBinding {
    indices: [Option<usize>; 6],
}

impl ColumnBinding {
    fn resolve(headers: &[String]) -> Self {
        let mut indices = [None; 6];
        for (slot, column) in ItemColumn::ALL.into_iter().enumerate() {
            indices[slot] = headers
                .iter()
                .position(|header| header.contains(column.header_label()));
        }
        Self { indices }
    }

    #[inline]
    fn index(&self, column: ItemColumn) -> Option<usize> {
        self.indices[column as usize]
    }
}

/// Header-row text of a table: first-row cell texts joined with spaces.
fn header_row_text(tbl: &XmlElement) -> Option<String> {
    let first_row = table::rows(tbl).next()?;
    let cells: Vec<String> = table::cells(first_row).map(table::cell_text).collect();
    Some(cells.join(" "))
}

/// Find the items table among the body's tables.
///
/// Returns the child index of the first body-level `w:tbl` whose header row
/// contains any marker label. First match wins; `None` means the template
/// has no recognizable items table, which callers treat as skippable.
pub(crate) fn locate_items_table(body: &XmlElement) -> Option<usize> {
    body.children.iter().position(|node| match node {
        XmlNode::Element(el) if el.is("tbl") => header_row_text(el).is_some_and(|header| {
            TABLE_MARKERS
                .into_iter()
                .any(|column| header.contains(column.header_label()))
        }),
        _ => false,
    })
}

/// Rebuild the items table from the item list.
///
/// Keeps the header row, drops every other row the template shipped with,
/// and appends one structurally fresh row per item in sequence order. Cells
/// of columns whose header was not found keep their default empty content.
///
/// Returns whether an items table was found; `Ok(false)` lets the caller
/// surface a warning without failing the merge.
pub fn fill_items_table(doc: &mut Document, items: &[LineItem]) -> Result<bool> {
    let body = doc.body_mut()?;
    let Some(table_index) = locate_items_table(body) else {
        warn!("template has no recognizable items table; row fill skipped");
        return Ok(false);
    };
    let XmlNode::Element(tbl) = &mut body.children[table_index] else {
        return Ok(false);
    };

    let headers: Vec<String> = match table::rows(tbl).next() {
        Some(header_row) => table::cells(header_row).map(table::cell_text).collect(),
        None => Vec::new(),
    };
    let binding = ColumnBinding::resolve(&headers);
    let columns = table::grid_column_count(tbl);

    table::remove_data_rows(tbl);
    for item in items {
        let row = table::append_row(tbl, columns);
        for column in ItemColumn::ALL {
            if let Some(index) = binding.index(column) {
                if let Some(cell) = table::cells_mut(row).nth(index) {
                    table::set_cell_text(cell, &column.render(item));
                }
            }
        }
    }

    debug!(rows = items.len(), "items table rebuilt");
    Ok(true)
}

/// Shortest display form for quantities and prices (`3`, `31.5`).
fn format_number(value: f64) -> String {
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::test_support::{document_xml, para, table as table_xml};

    fn item(seq: u32, desc: &str, qty: f64, price: f64) -> LineItem {
        LineItem {
            sequence: seq,
            description: desc.to_string(),
            quantity: qty,
            unit_price: price,
            notes: String::new(),
        }
    }

    fn full_header() -> [&'static str; 6] {
        ["م", "التوصيف", "الكمية", "سعر الوحدة", "سعر البند", "ملاحظات"]
    }

    fn parse_doc(body: &str) -> Document {
        Document::parse(document_xml(body).as_bytes()).unwrap()
    }

    fn items_table(doc: &Document) -> XmlElement {
        let body = doc.body().unwrap();
        let index = locate_items_table(body).unwrap();
        match &body.children[index] {
            XmlNode::Element(el) => el.clone(),
            _ => panic!("expected element"),
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(item(1, "x", 3.0, 10.5).line_total(), 31.5);
    }

    #[test]
    fn test_subtotal() {
        let items = [item(1, "a", 3.0, 10.5), item(2, "b", 1.0, 10.0)];
        assert_eq!(subtotal(&items), 41.5);
    }

    #[test]
    fn test_locator_matches_by_header_substring() {
        let plain = table_xml(&["x", "y"], &[]);
        let items = table_xml(&full_header(), &[]);
        let doc = parse_doc(&format!("{}{}{}", para("intro"), plain, items));

        let body = doc.body().unwrap();
        let index = locate_items_table(body).unwrap();
        // The plain table is skipped; the items table is matched
        let matched = match &body.children[index] {
            XmlNode::Element(el) => el.clone(),
            _ => panic!("expected element"),
        };
        let header = header_row_text(&matched).unwrap();
        assert!(header.contains("التوصيف"));
    }

    #[test]
    fn test_locator_first_match_wins() {
        let first = table_xml(&["التوصيف", "الكمية"], &[&["A", "1"]]);
        let second = table_xml(&full_header(), &[]);
        let doc = parse_doc(&format!("{first}{second}"));

        let body = doc.body().unwrap();
        let index = locate_items_table(body).unwrap();
        let matched = match &body.children[index] {
            XmlNode::Element(el) => el.clone(),
            _ => panic!("expected element"),
        };
        // The first candidate has only two columns
        let header_row = table::rows(&matched).next().unwrap();
        assert_eq!(table::cells(header_row).count(), 2);
    }

    #[test]
    fn test_no_table_reports_not_found() {
        let mut doc = parse_doc(&para("no tables here"));
        let filled = fill_items_table(&mut doc, &[item(1, "a", 1.0, 1.0)]).unwrap();
        assert!(!filled);
    }

    #[test]
    fn test_row_count_invariant_replaces_example_rows() {
        // Template ships with 3 example rows
        let tbl = table_xml(
            &full_header(),
            &[
                &["1", "ex", "1", "1", "1", ""],
                &["2", "ex", "1", "1", "1", ""],
                &["3", "ex", "1", "1", "1", ""],
            ],
        );
        let mut doc = parse_doc(&tbl);
        let items: Vec<LineItem> = (1..=5).map(|i| item(i, "item", 1.0, 2.0)).collect();
        assert!(fill_items_table(&mut doc, &items).unwrap());

        let tbl = items_table(&doc);
        assert_eq!(table::row_count(&tbl), 6); // 1 header + 5 data
    }

    #[test]
    fn test_row_order_and_values() {
        let tbl = table_xml(&full_header(), &[]);
        let mut doc = parse_doc(&tbl);
        let items = [item(1, "first", 3.0, 10.5), item(2, "second", 2.0, 5.0)];
        assert!(fill_items_table(&mut doc, &items).unwrap());

        let tbl = items_table(&doc);
        let rows: Vec<_> = table::rows(&tbl).collect();
        assert_eq!(rows.len(), 3);

        let first: Vec<String> = table::cells(rows[1]).map(table::cell_text).collect();
        assert_eq!(first, vec!["1", "first", "3", "10.5", "31.5", ""]);
        let second: Vec<String> = table::cells(rows[2]).map(table::cell_text).collect();
        assert_eq!(second, vec!["2", "second", "2", "5", "10", ""]);
    }

    #[test]
    fn test_absent_column_skipped() {
        // No notes column; sequence bound via its dedicated header
        let tbl = table_xml(&["م", "التوصيف", "الكمية"], &[]);
        let mut doc = parse_doc(&tbl);
        let mut it = item(1, "desc", 2.0, 7.0);
        it.notes = "ignored".to_string();
        assert!(fill_items_table(&mut doc, &[it]).unwrap());

        let tbl = items_table(&doc);
        let data_row = table::rows(&tbl).nth(1).unwrap();
        let cells: Vec<String> = table::cells(data_row).map(table::cell_text).collect();
        assert_eq!(cells, vec!["1", "desc", "2"]);
    }

    #[test]
    fn test_column_binding_first_header_match_wins() {
        // Two cells contain the description label; the first one takes the
        // binding.
        let binding = ColumnBinding::resolve(&[
            "م".to_string(),
            "التوصيف".to_string(),
            "التوصيف الإضافي".to_string(),
        ]);
        assert_eq!(binding.index(ItemColumn::Sequence), Some(0));
        assert_eq!(binding.index(ItemColumn::Description), Some(1));
        assert_eq!(binding.index(ItemColumn::Quantity), None);
    }

    #[test]
    fn test_format_number_shortest_form() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(31.5), "31.5");
        assert_eq!(format_number(0.0), "0");
    }
}
