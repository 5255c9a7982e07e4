/// Word (.docx) document support.
///
/// A `.docx` file is an OPC package (a ZIP archive) whose main part,
/// `word/document.xml`, holds the document content. This module provides the
/// pieces the merger needs:
///
/// - `DocxPackage`: the physical package; reads and writes the archive,
///   carrying every part except the main document through unchanged
/// - `Document`: the parsed main document with body access and paragraph
///   visitation
/// - `paragraph` / `table`: views over `w:p` and `w:tbl` elements
/// - `xml`: the lossless element tree both are built on
pub mod document;
pub mod package;
pub mod paragraph;
pub mod table;
pub mod xml;

#[cfg(test)]
pub(crate) mod test_support;

pub use document::Document;
pub use package::DocxPackage;
