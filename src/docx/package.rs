//! Physical `.docx` package handling.
//!
//! A `.docx` file is a ZIP archive of OPC parts. The merger only rewrites the
//! main document part (`word/document.xml`); every other part (styles,
//! numbering, headers, footers, embedded media, relationships) is carried
//! through byte-identical, so template styling and boilerplate survive.

use crate::error::{Error, Result};
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Part name of the main WordprocessingML document.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Part name of the OPC content-types index.
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// An opened `.docx` package.
///
/// Holds every part's bytes in archive order. Parts are read eagerly; the
/// package borrows nothing from the source, so the template file can be
/// closed as soon as the package is constructed.
#[derive(Debug, Clone)]
pub struct DocxPackage {
    /// `(part name, part bytes)` in original archive order
    parts: Vec<(String, Vec<u8>)>,
}

impl DocxPackage {
    /// Open a package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::TemplateNotFound(path.display().to_string()));
        }
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Open a package from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| Error::InvalidFormat(format!("not a ZIP archive: {}", e)))?;

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut bytes)?;
            parts.push((name, bytes));
        }

        let pkg = Self { parts };
        if pkg.part(CONTENT_TYPES_PART).is_none() {
            return Err(Error::InvalidFormat(
                "missing [Content_Types].xml; not an OPC package".to_string(),
            ));
        }
        if pkg.part(DOCUMENT_PART).is_none() {
            return Err(Error::PartNotFound(DOCUMENT_PART.to_string()));
        }
        Ok(pkg)
    }

    /// Get a part's bytes by name.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, bytes)| bytes.as_slice())
    }

    /// Bytes of the main document part.
    pub fn document_xml(&self) -> Result<&[u8]> {
        self.part(DOCUMENT_PART)
            .ok_or_else(|| Error::PartNotFound(DOCUMENT_PART.to_string()))
    }

    /// Replace the main document part.
    pub fn set_document_xml(&mut self, bytes: Vec<u8>) {
        for (name, content) in &mut self.parts {
            if name == DOCUMENT_PART {
                *content = bytes;
                return;
            }
        }
        self.parts.push((DOCUMENT_PART.to_string(), bytes));
    }

    /// Number of parts in the package.
    #[inline]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Serialize the package back to a ZIP byte stream.
    ///
    /// Parts are written in their original order with deflate compression.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, bytes) in &self.parts {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(bytes)?;
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::test_support::docx_from_document_xml;

    const MINIMAL_DOC: &str = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p/></w:body></w:document>"#;

    #[test]
    fn test_open_from_bytes() {
        let data = docx_from_document_xml(MINIMAL_DOC);
        let pkg = DocxPackage::from_bytes(&data).unwrap();
        assert!(pkg.part_count() >= 3);
        let doc = pkg.document_xml().unwrap();
        assert!(std::str::from_utf8(doc).unwrap().contains("<w:body>"));
    }

    #[test]
    fn test_round_trip_preserves_other_parts() {
        let data = docx_from_document_xml(MINIMAL_DOC);
        let mut pkg = DocxPackage::from_bytes(&data).unwrap();
        let rels_before = pkg.part("_rels/.rels").unwrap().to_vec();

        pkg.set_document_xml(b"<w:document/>".to_vec());
        let out = pkg.to_bytes().unwrap();

        let reopened = DocxPackage::from_bytes(&out).unwrap();
        assert_eq!(reopened.part("_rels/.rels").unwrap(), rels_before.as_slice());
        assert_eq!(reopened.document_xml().unwrap(), b"<w:document/>");
        assert_eq!(reopened.part_count(), pkg.part_count());
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = DocxPackage::from_bytes(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_zip_without_document_part_rejected() {
        use std::io::Write as _;
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        writer.start_file("[Content_Types].xml", options).unwrap();
        writer.write_all(b"<Types/>").unwrap();
        let data = writer.finish().unwrap().into_inner();

        let err = DocxPackage::from_bytes(&data).unwrap_err();
        assert!(matches!(err, Error::PartNotFound(_)));
    }

    #[test]
    fn test_open_missing_file() {
        let err = DocxPackage::open("/no/such/template.docx").unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound(_)));
    }
}
