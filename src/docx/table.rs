//! Table, row, and cell views over `w:tbl` elements.

use crate::docx::paragraph;
use crate::docx::xml::{XmlElement, XmlNode};

/// Iterate over a table's rows.
pub fn rows<'a>(tbl: &'a XmlElement) -> impl Iterator<Item = &'a XmlElement> {
    tbl.children_named("tr")
}

/// Iterate mutably over a table's rows.
pub fn rows_mut<'a>(tbl: &'a mut XmlElement) -> impl Iterator<Item = &'a mut XmlElement> {
    tbl.children_named_mut("tr")
}

/// Iterate over a row's cells.
pub fn cells<'a>(tr: &'a XmlElement) -> impl Iterator<Item = &'a XmlElement> {
    tr.children_named("tc")
}

/// Iterate mutably over a row's cells.
pub fn cells_mut<'a>(tr: &'a mut XmlElement) -> impl Iterator<Item = &'a mut XmlElement> {
    tr.children_named_mut("tc")
}

/// Number of rows in a table.
pub fn row_count(tbl: &XmlElement) -> usize {
    rows(tbl).count()
}

/// Text content of a cell: its paragraphs joined with newlines.
pub fn cell_text(tc: &XmlElement) -> String {
    let texts: Vec<String> = tc.children_named("p").map(paragraph::paragraph_text).collect();
    texts.join("\n")
}

/// Replace a cell's content with a single paragraph holding the given text.
///
/// Cell properties (`w:tcPr`) are kept; existing paragraphs and nested
/// tables are removed.
pub fn set_cell_text(tc: &mut XmlElement, text: &str) {
    tc.children.retain(|node| match node {
        XmlNode::Element(el) => !matches!(el.local_name(), "p" | "tbl"),
        XmlNode::Text(_) => false,
        XmlNode::Comment(_) => true,
    });

    let mut p = XmlElement::new("w:p");
    let mut r = XmlElement::new("w:r");
    paragraph::set_run_text(&mut r, text);
    p.push_element(r);
    tc.push_element(p);
}

/// Column count from the table grid.
///
/// Counts `w:gridCol` entries under `w:tblGrid`; templates without a grid
/// fall back to the first row's cell count.
pub fn grid_column_count(tbl: &XmlElement) -> usize {
    let grid_cols = tbl
        .first_child("tblGrid")
        .map(|grid| grid.children_named("gridCol").count())
        .unwrap_or(0);
    if grid_cols > 0 {
        return grid_cols;
    }
    rows(tbl).next().map(|row| cells(row).count()).unwrap_or(0)
}

/// Remove every row after the header row.
///
/// Non-row children (`w:tblPr`, `w:tblGrid`) are untouched. Templates often
/// ship with example rows; those go away before the item rows are appended.
pub fn remove_data_rows(tbl: &mut XmlElement) {
    let mut seen_header = false;
    tbl.children.retain(|node| match node {
        XmlNode::Element(el) if el.is("tr") => {
            if seen_header {
                false
            } else {
                seen_header = true;
                true
            }
        },
        _ => true,
    });
}

/// Append a structurally fresh row with `cols` empty cells.
///
/// Each cell carries one empty paragraph, the minimum valid cell content.
/// The new row shares the table's grid and style definitions by virtue of
/// living in the same `w:tbl`.
pub fn append_row(tbl: &mut XmlElement, cols: usize) -> &mut XmlElement {
    let mut row = XmlElement::new("w:tr");
    for _ in 0..cols {
        let mut cell = XmlElement::new("w:tc");
        cell.push_element(XmlElement::new("w:p"));
        row.push_element(cell);
    }
    tbl.push_element(row);
    match tbl.children.last_mut() {
        Some(XmlNode::Element(el)) => el,
        _ => unreachable!("row was just appended"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::xml::XmlPart;

    fn sample_table() -> XmlElement {
        let xml = r#"<w:tbl><w:tblPr><w:tblStyle w:val="Grid"/></w:tblPr><w:tblGrid><w:gridCol w:w="100"/><w:gridCol w:w="200"/><w:gridCol w:w="300"/></w:tblGrid><w:tr><w:tc><w:p><w:r><w:t>h1</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>h2</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>h3</w:t></w:r></w:p></w:tc></w:tr><w:tr><w:tc><w:p><w:r><w:t>a</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>b</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>c</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#;
        XmlPart::parse(xml.as_bytes()).unwrap().root
    }

    #[test]
    fn test_rows_and_cells() {
        let tbl = sample_table();
        assert_eq!(row_count(&tbl), 2);
        let header = rows(&tbl).next().unwrap();
        let texts: Vec<String> = cells(header).map(cell_text).collect();
        assert_eq!(texts, vec!["h1", "h2", "h3"]);
    }

    #[test]
    fn test_cell_text_joins_paragraphs() {
        let xml = r#"<w:tc><w:p><w:r><w:t>line1</w:t></w:r></w:p><w:p><w:r><w:t>line2</w:t></w:r></w:p></w:tc>"#;
        let tc = XmlPart::parse(xml.as_bytes()).unwrap().root;
        assert_eq!(cell_text(&tc), "line1\nline2");
    }

    #[test]
    fn test_grid_column_count() {
        assert_eq!(grid_column_count(&sample_table()), 3);

        let no_grid = r#"<w:tbl><w:tr><w:tc><w:p/></w:tc><w:tc><w:p/></w:tc></w:tr></w:tbl>"#;
        let tbl = XmlPart::parse(no_grid.as_bytes()).unwrap().root;
        assert_eq!(grid_column_count(&tbl), 2);
    }

    #[test]
    fn test_remove_data_rows_keeps_header_and_props() {
        let mut tbl = sample_table();
        remove_data_rows(&mut tbl);
        assert_eq!(row_count(&tbl), 1);
        assert!(tbl.first_child("tblPr").is_some());
        assert!(tbl.first_child("tblGrid").is_some());
        let header = rows(&tbl).next().unwrap();
        assert_eq!(cell_text(cells(header).next().unwrap()), "h1");
    }

    #[test]
    fn test_append_row_structure() {
        let mut tbl = sample_table();
        let row = append_row(&mut tbl, 3);
        assert_eq!(cells(row).count(), 3);
        for cell in cells(row) {
            assert!(cell.first_child("p").is_some());
            assert_eq!(cell_text(cell), "");
        }
        assert_eq!(row_count(&tbl), 3);
    }

    #[test]
    fn test_set_cell_text_keeps_tc_pr() {
        let xml = r#"<w:tc><w:tcPr><w:shd w:fill="EEEEEE"/></w:tcPr><w:p><w:r><w:t>old</w:t></w:r></w:p></w:tc>"#;
        let mut tc = XmlPart::parse(xml.as_bytes()).unwrap().root;
        set_cell_text(&mut tc, "new");
        assert!(tc.first_child("tcPr").is_some());
        assert_eq!(cell_text(&tc), "new");
        // tcPr stays ahead of the paragraph
        assert!(tc.child_elements().next().unwrap().is("tcPr"));
    }
}
